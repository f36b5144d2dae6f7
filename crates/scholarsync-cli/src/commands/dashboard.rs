//! Dashboard view for CLI.

use clap::Args;
use scholarsync_core::dashboard::{progress_bar, Dashboard};
use scholarsync_core::planning::GeminiPlanner;

use super::{print_json, today, AppContext, CmdResult};

#[derive(Args)]
pub struct DashboardArgs {
    /// Fetch a new motivational quote first
    #[arg(long)]
    refresh_quote: bool,
    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: DashboardArgs) -> CmdResult {
    let mut ctx = AppContext::open()?;
    let result = execute(&mut ctx, args).await;
    ctx.close().await;
    result
}

async fn execute(ctx: &mut AppContext, args: DashboardArgs) -> CmdResult {
    if args.refresh_quote {
        let quote = GeminiPlanner::new(&ctx.config.planner)
            .motivational_quote()
            .await;
        ctx.store.set_motivation(quote)?;
    }

    let state = ctx.store.state();
    let dash = Dashboard::compute(state, today());
    if args.json {
        return print_json(&dash);
    }

    println!("Welcome back, {}!", ctx.config.profile.user_name);
    println!("\"{}\"", state.motivation);
    println!();
    println!("Streak: {} days    XP: {}", dash.streak_days, dash.xp);
    println!();
    println!("Today ({})", dash.today.format("%A, %B %-d"));
    if dash.is_free_today() {
        println!("  Nothing scheduled. Enjoy your free time!");
    }
    for entry in &dash.todays_sessions {
        println!(
            "  [study] {}: {} ({}m)",
            entry.exam_subject, entry.session.topic, entry.session.duration_minutes
        );
    }
    for task in &dash.todays_tasks {
        println!("  [task]  {} ({})", task.title, task.priority);
    }
    println!();
    println!("Tasks completed    {}", progress_bar(dash.metrics.tasks_completed));
    println!("Study workload     {}", progress_bar(dash.metrics.study_workload));
    println!("Focus consistency  {}", progress_bar(dash.metrics.focus_consistency));
    Ok(())
}
