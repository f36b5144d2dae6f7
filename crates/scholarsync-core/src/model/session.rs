use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, require_text};
use crate::error::ValidationError;

/// A planned block of study for one exam. Lives only as long as its exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub exam_id: String,
    pub topic: String,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    #[serde(default)]
    pub completed: bool,
}

impl StudySession {
    pub fn new(
        exam_id: impl Into<String>,
        topic: impl Into<String>,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: new_id(),
            exam_id: exam_id.into(),
            topic: topic.into(),
            date,
            duration_minutes,
            completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("examId", &self.exam_id)?;
        require_text("topic", &self.topic)?;
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "durationMinutes".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }
}
