mod driver;
mod engine;

pub use driver::{run_interval, TickDriver};
pub use engine::{
    format_clock, TimerEngine, TimerMode, TimerState, DEFAULT_BREAK_MINUTES,
    DEFAULT_FOCUS_MINUTES,
};
