//! Domain entities and the aggregate application state.
//!
//! These shapes double as the persisted-state schema, so field names are
//! serialized in camelCase and dates as `YYYY-MM-DD`.

mod exam;
mod session;
mod state;
mod task;

pub use exam::{Difficulty, Exam};
pub use session::StudySession;
pub use state::{AppState, ExamOverview, TaskOverview, UserStats};
pub use task::{Priority, Task};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ValidationError;

/// Fresh collision-resistant identifier for any entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a `YYYY-MM-DD` date key.
///
/// Empty input is reported as a missing field rather than a malformed date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: trimmed.to_string(),
    })
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}
