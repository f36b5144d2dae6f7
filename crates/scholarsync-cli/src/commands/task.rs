//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use scholarsync_core::model::{Priority, Task};
use scholarsync_core::planning::GeminiPlanner;

use super::{date_arg, print_json, today, AppContext, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date (default: today)
        #[arg(long, value_parser = date_arg)]
        due: Option<NaiveDate>,
        /// Low, Medium or High
        #[arg(long, default_value = "Medium")]
        priority: Priority,
        /// Estimated minutes
        #[arg(long, default_value_t = 30)]
        estimate: u32,
    },
    /// List tasks, pending first
    List {
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = date_arg)]
        due: Option<NaiveDate>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Ask the planner which pending task to do first
    Suggest,
}

pub async fn run(action: TaskAction) -> CmdResult {
    let mut ctx = AppContext::open()?;
    let result = execute(&mut ctx, action).await;
    ctx.close().await;
    result
}

async fn execute(ctx: &mut AppContext, action: TaskAction) -> CmdResult {
    match action {
        TaskAction::Add {
            title,
            due,
            priority,
            estimate,
        } => {
            let mut task = Task::new(title, due.unwrap_or_else(today), priority);
            task.estimated_minutes = estimate;
            ctx.store.add_task(task.clone())?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { pending } => {
            let tasks: Vec<&Task> = ctx
                .store
                .state()
                .tasks_sorted()
                .into_iter()
                .filter(|t| !pending || !t.completed)
                .collect();
            print_json(&tasks)?;
        }
        TaskAction::Update {
            id,
            title,
            due,
            priority,
            estimate,
        } => {
            let Some(mut task) = ctx.store.state().task(&id).cloned() else {
                println!("Task not found: {id}");
                return Ok(());
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(due) = due {
                task.due_date = due;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            if let Some(estimate) = estimate {
                task.estimated_minutes = estimate;
            }
            ctx.store.update_task(task.clone())?;
            println!("Task updated: {id}");
            print_json(&task)?;
        }
        TaskAction::Toggle { id } => {
            let state = ctx.store.toggle_task(&id)?;
            match state.task(&id) {
                Some(task) => {
                    let status = if task.completed { "completed" } else { "pending" };
                    println!("Task {id} is now {status}");
                }
                None => println!("Task not found: {id}"),
            }
        }
        TaskAction::Delete { id } => {
            if ctx.store.state().task(&id).is_none() {
                println!("Task not found: {id}");
                return Ok(());
            }
            ctx.store.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Suggest => {
            let titles: Vec<String> = ctx
                .store
                .state()
                .tasks_sorted()
                .into_iter()
                .filter(|t| !t.completed)
                .map(|t| t.title.clone())
                .collect();
            if titles.is_empty() {
                println!("No pending tasks");
                return Ok(());
            }
            let planner = GeminiPlanner::new(&ctx.config.planner);
            let suggestion = planner.suggest_priority(&titles).await;
            if suggestion.is_empty() {
                println!("No suggestion available");
            } else {
                println!("{suggestion}");
            }
        }
    }
    Ok(())
}
