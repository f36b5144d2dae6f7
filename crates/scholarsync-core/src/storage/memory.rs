use std::sync::Mutex;

use super::{decode_state, encode_state, StateRepository};
use crate::error::StorageError;
use crate::model::AppState;

/// In-memory blob store. Holds the raw JSON so decode failures can be
/// exercised exactly as with a real backend.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    blob: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        let blob = self.blob.lock().map_err(|_| StorageError::Poisoned)?;
        blob.as_deref().map(decode_state).transpose()
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let json = encode_state(state)?;
        *self.blob.lock().map_err(|_| StorageError::Poisoned)? = Some(json);
        Ok(())
    }
}
