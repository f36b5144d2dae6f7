//! Progress statistics for CLI.

use serde_json::json;

use super::{print_json, AppContext, CmdResult};

pub async fn run() -> CmdResult {
    let ctx = AppContext::open()?;
    let state = ctx.store.state();
    let result = print_json(&json!({
        "stats": state.stats,
        "tasks": state.task_overview(),
        "exams": state.exams.len(),
        "sessions": {
            "total": state.sessions.len(),
            "completed": state.sessions.iter().filter(|s| s.completed).count(),
        },
    }));
    ctx.close().await;
    result
}
