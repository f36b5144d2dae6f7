//! Focus timer commands for CLI.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use scholarsync_core::timer::{run_interval, TickDriver, TimerEngine, TimerMode};
use serde_json::json;

use super::{print_json, AppContext, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run focus/break cycles in the foreground
    Run {
        /// Number of focus intervals to complete
        #[arg(long, default_value_t = 1)]
        cycles: u32,
        /// Focus minutes (default: from config)
        #[arg(long)]
        focus: Option<u32>,
        /// Break minutes (default: from config)
        #[arg(long = "break")]
        break_minutes: Option<u32>,
        /// Skip the break after the last focus interval
        #[arg(long)]
        no_final_break: bool,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000, hide = true)]
        tick_ms: u64,
    },
    /// Show timer settings and today's focus totals
    Status,
}

pub async fn run(action: TimerAction) -> CmdResult {
    let mut ctx = AppContext::open()?;
    let result = execute(&mut ctx, action).await;
    ctx.close().await;
    result
}

async fn execute(ctx: &mut AppContext, action: TimerAction) -> CmdResult {
    match action {
        TimerAction::Run {
            cycles,
            focus,
            break_minutes,
            no_final_break,
            tick_ms,
        } => {
            let focus = focus.unwrap_or(ctx.config.timer.focus_minutes);
            let break_minutes = break_minutes.unwrap_or(ctx.config.timer.break_minutes);
            if focus == 0 || break_minutes == 0 {
                return Err("focus and break durations must be positive".into());
            }
            let mut engine = TimerEngine::new(focus, break_minutes);
            let mut driver = TickDriver::with_period(Duration::from_millis(tick_ms.max(1)));

            for cycle in 1..=cycles {
                for _ in 0..2 {
                    if engine.mode() == TimerMode::Break && cycle == cycles && no_final_break {
                        break;
                    }
                    let label = match engine.mode() {
                        TimerMode::Focus => format!("Focus {cycle}/{cycles}"),
                        TimerMode::Break => "Break".to_string(),
                    };
                    let Some(event) = run_interval(&mut engine, &mut driver, |e| {
                        eprint!("\r{label} {} ({:>3.0}%)", e.clock(), e.progress() * 100.0);
                        let _ = std::io::stderr().flush();
                    })
                    .await
                    else {
                        eprintln!();
                        return Err("timer tick source stopped".into());
                    };
                    eprintln!();
                    if ctx.store.apply_timer_event(&event)? {
                        println!(
                            "Focus interval complete: +{} min (today: {} min)",
                            engine.focus_minutes(),
                            ctx.store.state().stats.study_minutes_today
                        );
                    } else {
                        println!("Break over");
                    }
                }
            }
            println!("Completed {} focus intervals", engine.completed_sessions());
        }
        TimerAction::Status => {
            let stats = &ctx.store.state().stats;
            print_json(&json!({
                "focusMinutes": ctx.config.timer.focus_minutes,
                "breakMinutes": ctx.config.timer.break_minutes,
                "studyMinutesToday": stats.study_minutes_today,
                "xp": stats.xp,
                "snapshot": ctx.config.timer.engine().snapshot(),
            }))?;
        }
    }
    Ok(())
}
