use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, require_text};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(ValidationError::InvalidValue {
                field: "difficulty".into(),
                message: format!("unknown difficulty '{other}'"),
            }),
        }
    }
}

/// An exam the student is preparing for. Owns its study sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub subject: String,
    pub date: NaiveDate,
    /// Percentage of the final grade. Persisted, not used in computation.
    #[serde(default)]
    pub weight: f64,
    pub difficulty: Difficulty,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#ffffff".into()
}

impl Exam {
    pub fn new(subject: impl Into<String>, date: NaiveDate, difficulty: Difficulty) -> Self {
        Self {
            id: new_id(),
            subject: subject.into(),
            date,
            weight: 0.0,
            difficulty,
            color: default_color(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("subject", &self.subject)
    }
}
