use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerState};

/// Every focus-timer state change produces an Event.
/// Views render them; the store consumes `FocusCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A focus interval ran out; the engine is now in Break and paused.
    FocusCompleted {
        minutes: u32,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    /// A break ran out; the engine is back in Focus and paused.
    BreakCompleted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        remaining_secs: u64,
        total_secs: u64,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Minutes to credit to the study stats, if this event completes a focus interval.
    pub fn focus_minutes(&self) -> Option<u32> {
        match self {
            Event::FocusCompleted { minutes, .. } => Some(*minutes),
            _ => None,
        }
    }
}
