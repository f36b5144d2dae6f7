//! Persistence of the application state as a single named blob.
//!
//! The core treats storage as a key-value blob store with `load`/`save`.
//! Startup never fails because of storage: a missing or corrupted blob is
//! replaced by the default state.

mod config;
pub mod database;
mod memory;
mod writer;

pub use config::{Config, PlannerConfig, ProfileConfig, TimerConfig};
pub use database::SqliteRepository;
pub use memory::MemoryRepository;
pub use writer::PersistenceWriter;

use std::path::PathBuf;

use tracing::warn;

use crate::error::{Result, StorageError};
use crate::model::AppState;

/// Name of the blob holding the serialized [`AppState`].
pub const STATE_KEY: &str = "scholarSyncData";

/// Storage collaborator for the application state.
pub trait StateRepository: Send + Sync {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AppState>, StorageError>;

    fn save(&self, state: &AppState) -> Result<(), StorageError>;
}

impl<R: StateRepository + ?Sized> StateRepository for std::sync::Arc<R> {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        (**self).save(state)
    }
}

/// Load the persisted state, falling back to [`AppState::default`] when the
/// blob is absent or unreadable.
pub fn load_or_default(repo: &dyn StateRepository) -> AppState {
    match repo.load() {
        Ok(Some(state)) => state.normalized(),
        Ok(None) => AppState::default(),
        Err(e) => {
            warn!(error = %e, "discarding unreadable state, starting from defaults");
            AppState::default()
        }
    }
}

pub(crate) fn decode_state(json: &str) -> Result<AppState, StorageError> {
    serde_json::from_str(json).map_err(|source| StorageError::Decode {
        key: STATE_KEY.to_string(),
        source,
    })
}

pub(crate) fn encode_state(state: &AppState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(StorageError::Encode)
}

/// Returns the data directory.
///
/// `SCHOLARSYNC_DATA_DIR` wins when set; otherwise `~/.config/scholarsync[-dev]/`
/// based on `SCHOLARSYNC_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("SCHOLARSYNC_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("SCHOLARSYNC_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("scholarsync-dev")
            } else {
                base_dir.join("scholarsync")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
