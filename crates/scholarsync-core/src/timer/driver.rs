//! Periodic tick source for the focus timer.
//!
//! A [`TickDriver`] owns at most one background interval task. The task is
//! aborted whenever the driver is cancelled or dropped, so a paused or
//! discarded timer never leaves a perpetual interval behind.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::TimerEngine;
use crate::events::Event;

/// One-second tick source backed by `tokio::time::interval`.
pub struct TickDriver {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TickDriver {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Start a fresh subscription, cancelling any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&mut self) -> mpsc::Receiver<()> {
        self.cancel();
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
        debug!(period_ms = self.period.as_millis() as u64, "tick subscription started");
        rx
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("tick subscription cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start `engine` and feed it ticks until the current mode completes.
///
/// `on_tick` observes the engine after every tick. The subscription is
/// cancelled before the completion event is returned; `None` means the tick
/// source went away first.
pub async fn run_interval<F>(
    engine: &mut TimerEngine,
    driver: &mut TickDriver,
    mut on_tick: F,
) -> Option<Event>
where
    F: FnMut(&TimerEngine),
{
    engine.start();
    let mut ticks = driver.subscribe();
    while ticks.recv().await.is_some() {
        let completed = engine.tick();
        on_tick(engine);
        if completed.is_some() {
            driver.cancel();
            return completed;
        }
        if !engine.is_running() {
            break;
        }
    }
    driver.cancel();
    None
}
