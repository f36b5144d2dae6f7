//! # ScholarSync Core Library
//!
//! This library provides the core logic for ScholarSync, a personal study
//! planner that tracks exams, tasks and generated study sessions. It follows
//! a CLI-first philosophy: every operation is available through the
//! `scholarsync` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Store**: A pure transition function over [`AppState`] plus a [`Store`]
//!   wrapper that hands every new state to a persistence sink
//! - **Calendar**: Day/week/month grid projection of exams, sessions and tasks
//! - **Timer**: A tick-driven focus/break state machine that feeds study
//!   minutes back into the store
//! - **Planning**: Async boundary to a study-plan generator, with a Gemini adapter
//! - **Storage**: SQLite blob persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Store`]: Owner of all domain entities
//! - [`TimerEngine`]: Core timer state machine
//! - [`CalendarCursor`]: Calendar navigation and grid generation
//! - [`SqliteRepository`]: State persistence
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod model;
pub mod planning;
pub mod storage;
pub mod store;
pub mod timer;

pub use calendar::{build_grid, CalendarCursor, CalendarGrid, Cell, DayCell, Direction, ViewMode};
pub use dashboard::{Dashboard, ProgressMetrics};
pub use error::{ConfigError, CoreError, PlanningError, StorageError, ValidationError};
pub use events::Event;
pub use model::{AppState, Difficulty, Exam, Priority, StudySession, Task, UserStats};
pub use planning::{GeminiPlanner, PlanProposal, PlanRequest, PlanRequests, StudyPlanner};
pub use storage::{Config, MemoryRepository, PersistenceWriter, SqliteRepository, StateRepository};
pub use store::{Action, StateSink, Store};
pub use timer::{TickDriver, TimerEngine, TimerMode, TimerState};
