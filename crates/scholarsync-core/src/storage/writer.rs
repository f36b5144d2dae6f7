//! Fire-and-forget persistence.
//!
//! [`PersistenceWriter`] is the store's [`StateSink`]: `publish` only swaps
//! the newest state into a `watch` channel and returns. A background task
//! saves whatever is newest, so bursts of writes collapse and the last
//! published state is always the one that ends up on disk.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::StateRepository;
use crate::model::AppState;
use crate::store::StateSink;

type Pending = Option<(u64, AppState)>;

pub struct PersistenceWriter {
    latest: watch::Sender<Pending>,
    /// Generation of the last save attempt that finished.
    saved: watch::Receiver<u64>,
    generation: AtomicU64,
    handle: JoinHandle<()>,
}

impl PersistenceWriter {
    /// Spawn the writer task on the current tokio runtime.
    pub fn spawn<R>(repo: R) -> Self
    where
        R: StateRepository + 'static,
    {
        let repo = Arc::new(repo);
        let (latest, mut rx) = watch::channel::<Pending>(None);
        let (saved_tx, saved) = watch::channel(0u64);

        let handle = tokio::spawn(async move {
            let mut last_saved = 0;
            loop {
                let changed = rx.changed().await;
                let pending = rx.borrow_and_update().clone();
                if let Some((generation, state)) = pending {
                    if generation > last_saved {
                        save(Arc::clone(&repo), generation, state).await;
                        last_saved = generation;
                        saved_tx.send_replace(generation);
                    }
                }
                if changed.is_err() {
                    break;
                }
            }
        });

        Self {
            latest,
            saved,
            generation: AtomicU64::new(0),
            handle,
        }
    }

    /// Wait until everything published so far has been written (or has
    /// failed and been logged).
    pub async fn flush(&self) {
        let target = self.generation.load(Ordering::SeqCst);
        let mut saved = self.saved.clone();
        if saved.wait_for(|g| *g >= target).await.is_err() {
            warn!("persistence writer stopped before flushing");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl StateSink for PersistenceWriter {
    fn publish(&self, state: &AppState) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.send_replace(Some((generation, state.clone())));
    }
}

async fn save<R>(repo: Arc<R>, generation: u64, state: AppState)
where
    R: StateRepository + 'static,
{
    let result = tokio::task::spawn_blocking(move || repo.save(&state)).await;
    match result {
        Ok(Ok(())) => debug!(generation, "state persisted"),
        Ok(Err(e)) => warn!(generation, error = %e, "failed to persist state"),
        Err(e) => warn!(generation, error = %e, "persistence task panicked"),
    }
}
