//! Focus timer engine.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or the wall clock: the caller invokes `tick()` once per second
//! (see [`TickDriver`](super::TickDriver)) and tests can drive it directly.
//!
//! ## State Transitions
//!
//! ```text
//! Paused --start--> Running --pause--> Paused
//! Running --tick reaches 0--> (mode switch) Paused
//! any --reset--> Paused (full duration of current mode)
//! ```
//!
//! The Focus/Break mode persists across Paused/Running and flips on every
//! completion. There is no terminal state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::Event;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Paused,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    pub fn other(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }
}

/// Core focus timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    focus_minutes: u32,
    break_minutes: u32,
    state: TimerState,
    mode: TimerMode,
    /// Remaining time in seconds for the current mode.
    remaining_secs: u64,
    /// Focus intervals completed since the engine was created.
    completed_sessions: u32,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

impl TimerEngine {
    /// Create an engine in `Paused`/`Focus` with a full focus interval.
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_minutes,
            break_minutes,
            state: TimerState::Paused,
            mode: TimerMode::Focus,
            remaining_secs: minutes_to_secs(focus_minutes),
            completed_sessions: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    /// Full length of the current mode in seconds.
    pub fn total_secs(&self) -> u64 {
        self.duration_of(self.mode)
    }

    /// 0.0 .. 1.0 progress within the current mode.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            completed_sessions: self.completed_sessions,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => None,
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Paused;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns the completion event when the current
    /// mode runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.switch_mode());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_mode(&mut self) -> Event {
        let finished = self.mode;
        self.mode = finished.other();
        self.remaining_secs = self.total_secs();
        self.state = TimerState::Paused;

        match finished {
            TimerMode::Focus => {
                self.completed_sessions += 1;
                info!(
                    minutes = self.focus_minutes,
                    completed_sessions = self.completed_sessions,
                    "focus interval completed"
                );
                Event::FocusCompleted {
                    minutes: self.focus_minutes,
                    completed_sessions: self.completed_sessions,
                    at: Utc::now(),
                }
            }
            TimerMode::Break => {
                info!("break completed");
                Event::BreakCompleted { at: Utc::now() }
            }
        }
    }

    fn duration_of(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => minutes_to_secs(self.focus_minutes),
            TimerMode::Break => minutes_to_secs(self.break_minutes),
        }
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_paused_focus_full_duration() {
        let engine = TimerEngine::default();
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.remaining_secs(), 1500);
        assert_eq!(engine.clock(), "25:00");
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert_eq!(engine.state(), TimerState::Running);

        assert!(engine.pause().is_some());
        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), TimerState::Paused);
    }

    #[test]
    fn ticks_only_count_while_running() {
        let mut engine = TimerEngine::default();
        engine.tick();
        assert_eq!(engine.remaining_secs(), 1500);
        engine.start();
        engine.tick();
        engine.tick();
        assert_eq!(engine.remaining_secs(), 1498);
        assert_eq!(engine.clock(), "24:58");
    }

    #[test]
    fn full_focus_interval_switches_to_break_once() {
        let mut engine = TimerEngine::default();
        engine.start();
        let mut events = Vec::new();
        for _ in 0..1500 {
            if let Some(event) = engine.tick() {
                events.push(event);
            }
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].focus_minutes(), Some(25));
        assert_eq!(engine.mode(), TimerMode::Break);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.completed_sessions(), 1);

        // Paused after the switch: further ticks are ignored.
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 300);
    }

    #[test]
    fn break_completion_does_not_credit_minutes() {
        let mut engine = TimerEngine::new(1, 1);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.mode(), TimerMode::Break);
        engine.start();
        let mut last = None;
        for _ in 0..60 {
            if let Some(event) = engine.tick() {
                last = Some(event);
            }
        }
        let event = last.expect("break should complete");
        assert!(matches!(event, Event::BreakCompleted { .. }));
        assert_eq!(event.focus_minutes(), None);
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.completed_sessions(), 1);
    }

    #[test]
    fn reset_restores_current_mode_duration() {
        let mut engine = TimerEngine::new(1, 2);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.mode(), TimerMode::Break);
        assert_eq!(engine.remaining_secs(), 120);
        assert_eq!(engine.state(), TimerState::Paused);
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(300), "05:00");
    }
}
