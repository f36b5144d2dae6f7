//! Study session commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use scholarsync_core::model::StudySession;
use serde::Serialize;

use super::{date_arg, print_json, AppContext, CmdResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List study sessions by date
    List {
        /// Only sessions of this exam
        #[arg(long)]
        exam: Option<String>,
    },
    /// Add a study session by hand
    Add {
        /// Exam ID
        exam_id: String,
        /// Topic
        topic: String,
        /// Session date (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        /// Duration in minutes
        #[arg(long, default_value_t = 60)]
        minutes: u32,
    },
    /// Flip a session's completed flag
    Toggle {
        /// Session ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRow<'a> {
    #[serde(flatten)]
    session: &'a StudySession,
    exam_subject: &'a str,
}

pub async fn run(action: SessionAction) -> CmdResult {
    let mut ctx = AppContext::open()?;
    let result = execute(&mut ctx, action);
    ctx.close().await;
    result
}

fn execute(ctx: &mut AppContext, action: SessionAction) -> CmdResult {
    match action {
        SessionAction::List { exam } => {
            let state = ctx.store.state();
            let mut rows: Vec<SessionRow<'_>> = state
                .sessions
                .iter()
                .filter(|s| exam.as_deref().is_none_or(|id| s.exam_id == id))
                .map(|session| SessionRow {
                    session,
                    exam_subject: state.exam_subject(&session.exam_id),
                })
                .collect();
            rows.sort_by_key(|r| r.session.date);
            print_json(&rows)?;
        }
        SessionAction::Add {
            exam_id,
            topic,
            date,
            minutes,
        } => {
            if ctx.store.state().exam(&exam_id).is_none() {
                println!("Exam not found: {exam_id}");
                return Ok(());
            }
            let session = StudySession::new(exam_id, topic, date, minutes);
            ctx.store.add_sessions(vec![session.clone()])?;
            println!("Session created: {}", session.id);
            print_json(&session)?;
        }
        SessionAction::Toggle { id } => {
            let state = ctx.store.toggle_session(&id)?;
            match state.session(&id) {
                Some(session) => {
                    let status = if session.completed { "completed" } else { "pending" };
                    println!("Session {id} is now {status}");
                }
                None => println!("Session not found: {id}"),
            }
        }
    }
    Ok(())
}
