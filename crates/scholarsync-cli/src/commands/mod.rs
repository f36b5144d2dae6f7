//! Subcommand implementations.
//!
//! Every command opens the persisted state through [`AppContext`], mutates it
//! via the core store, and flushes the background writer before returning.

pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod exam;
pub mod session;
pub mod stats;
pub mod task;
pub mod timer;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use scholarsync_core::error::{CoreError, ValidationError};
use scholarsync_core::model::parse_date;
use scholarsync_core::storage::{load_or_default, Config, PersistenceWriter, SqliteRepository};
use scholarsync_core::store::Store;
use serde::Serialize;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Store, config and writer for one CLI invocation.
pub struct AppContext {
    pub store: Store,
    pub config: Config,
    writer: Arc<PersistenceWriter>,
}

impl AppContext {
    pub fn open() -> Result<Self, CoreError> {
        let config = Config::load_or_default();
        let repo = SqliteRepository::open()?;
        let state = load_or_default(&repo);
        debug!(
            exams = state.exams.len(),
            tasks = state.tasks.len(),
            sessions = state.sessions.len(),
            "state loaded"
        );
        let writer = Arc::new(PersistenceWriter::spawn(repo));
        let store = Store::with_sink(state, writer.clone());
        Ok(Self {
            store,
            config,
            writer,
        })
    }

    /// Wait for pending writes. Call once the command is done.
    pub async fn close(self) {
        self.writer.flush().await;
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// clap value parser for `YYYY-MM-DD` arguments.
pub fn date_arg(value: &str) -> Result<NaiveDate, ValidationError> {
    parse_date("date", value)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
