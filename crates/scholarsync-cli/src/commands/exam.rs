//! Exam management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use scholarsync_core::dashboard::progress_bar;
use scholarsync_core::model::{Difficulty, Exam, ExamOverview};
use scholarsync_core::planning::{GeminiPlanner, PlanRequests};

use super::{date_arg, print_json, today, AppContext, CmdResult};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Add an exam
    Add {
        /// Subject name
        subject: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        /// Easy, Moderate, Hard or Extreme
        #[arg(long, default_value = "Moderate")]
        difficulty: Difficulty,
        /// Relative weight
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
        /// Display colour
        #[arg(long)]
        color: Option<String>,
    },
    /// List exams, earliest first, with countdown and session progress
    List {
        /// Print the overview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an exam
    Update {
        /// Exam ID
        id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an exam and its study sessions
    Delete {
        /// Exam ID
        id: String,
    },
    /// Generate study sessions for one or more exams
    Plan {
        /// Exam IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// First day of the plan (default: today)
        #[arg(long, value_parser = date_arg)]
        start: Option<NaiveDate>,
    },
}

pub async fn run(action: ExamAction) -> CmdResult {
    let mut ctx = AppContext::open()?;
    let result = execute(&mut ctx, action).await;
    ctx.close().await;
    result
}

async fn execute(ctx: &mut AppContext, action: ExamAction) -> CmdResult {
    match action {
        ExamAction::Add {
            subject,
            date,
            difficulty,
            weight,
            color,
        } => {
            let mut exam = Exam::new(subject, date, difficulty);
            exam.weight = weight;
            if let Some(color) = color {
                exam.color = color;
            }
            ctx.store.add_exam(exam.clone())?;
            println!("Exam created: {}", exam.id);
            print_json(&exam)?;
        }
        ExamAction::List { json } => {
            let overview = ctx.store.state().exam_overview(today());
            if json {
                print_json(&overview)?;
            } else if overview.is_empty() {
                println!("No exams scheduled");
            } else {
                for row in &overview {
                    print!("{}", render_overview(row));
                }
            }
        }
        ExamAction::Update {
            id,
            subject,
            date,
            difficulty,
            weight,
            color,
        } => {
            let Some(mut exam) = ctx.store.state().exam(&id).cloned() else {
                println!("Exam not found: {id}");
                return Ok(());
            };
            if let Some(subject) = subject {
                exam.subject = subject;
            }
            if let Some(date) = date {
                exam.date = date;
            }
            if let Some(difficulty) = difficulty {
                exam.difficulty = difficulty;
            }
            if let Some(weight) = weight {
                exam.weight = weight;
            }
            if let Some(color) = color {
                exam.color = color;
            }
            ctx.store.update_exam(exam.clone())?;
            println!("Exam updated: {id}");
            print_json(&exam)?;
        }
        ExamAction::Delete { id } => {
            let sessions = ctx.store.state().sessions_for_exam(&id).count();
            if ctx.store.state().exam(&id).is_none() {
                println!("Exam not found: {id}");
                return Ok(());
            }
            ctx.store.delete_exam(&id)?;
            println!("Exam deleted: {id} ({sessions} study sessions removed)");
        }
        ExamAction::Plan { ids, start } => {
            let start = start.unwrap_or_else(today);
            let planner = GeminiPlanner::new(&ctx.config.planner);
            if !planner.is_configured() {
                eprintln!("warning: no planner API key configured (set planner.api_key or GEMINI_API_KEY)");
            }

            // Every request is started before any runs, so an id given twice
            // is refused while its first request is still outstanding.
            let requests = PlanRequests::new();
            let mut pending = Vec::new();
            for id in &ids {
                let Some(exam) = ctx.store.state().exam(id).cloned() else {
                    println!("Exam not found: {id}");
                    continue;
                };
                if exam.date < start {
                    println!("Exam {} on {} has already passed, not planning", exam.subject, exam.date);
                    continue;
                }
                match requests.try_begin(&exam, start) {
                    Some(plan) => pending.push((exam.subject, plan)),
                    None => println!("A plan for {id} is already being generated"),
                }
            }

            for (subject, plan) in pending {
                let outcome = plan.run(&planner).await;
                let sessions = outcome.sessions().to_vec();
                let added = outcome.apply(&mut ctx.store)?;
                println!("Planned {added} study sessions for {subject}");
                print_json(&sessions)?;
            }
        }
    }
    Ok(())
}

fn render_overview(row: &ExamOverview<'_>) -> String {
    let exam = row.exam;
    let countdown = match row.days_left {
        d if d < 0 => "passed".to_string(),
        0 => "today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{d} days left"),
    };
    format!(
        "{} ({}, {})  {}  [{}]\n  {} {}/{} sessions done\n",
        exam.subject,
        exam.difficulty,
        exam.date,
        countdown,
        exam.id,
        progress_bar(row.progress_percent()),
        row.sessions_completed,
        row.sessions_total,
    )
}
