//! Study-plan generation boundary.
//!
//! The planner itself is an opaque async collaborator ([`StudyPlanner`]).
//! This module owns what happens to its answer: proposals are filtered,
//! clamped and turned into [`StudySession`]s for one exam.

mod coordinator;
mod gemini;

pub use coordinator::{PendingPlan, PlanOutcome, PlanRequests};
pub use gemini::{GeminiPlanner, FALLBACK_QUOTE, UNCONFIGURED_QUOTE};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PlanningError;
use crate::model::{Difficulty, Exam, StudySession};

pub const MIN_SESSION_MINUTES: u32 = 30;
pub const MAX_SESSION_MINUTES: u32 = 120;

/// What the planner is told about an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub subject: String,
    pub date: NaiveDate,
    pub difficulty: Difficulty,
    pub start_date: NaiveDate,
}

impl PlanRequest {
    pub fn for_exam(exam: &Exam, start_date: NaiveDate) -> Self {
        Self {
            subject: exam.subject.clone(),
            date: exam.date,
            difficulty: exam.difficulty,
            start_date,
        }
    }

    /// Whole days between the start date and the exam.
    pub fn days_until(&self) -> i64 {
        (self.date - self.start_date).num_days()
    }
}

/// One session suggested by the planner, relative to the request's start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProposal {
    pub topic: String,
    pub days_from_now: i64,
    pub duration_minutes: u32,
}

#[async_trait]
pub trait StudyPlanner: Send + Sync {
    async fn generate_plan(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<PlanProposal>, PlanningError>;
}

/// Turn raw proposals into sessions for `exam`.
///
/// Proposals before the start date or on/after the exam date are dropped,
/// and durations are clamped into the allowed session length.
pub fn ingest_proposals(
    exam: &Exam,
    start_date: NaiveDate,
    proposals: Vec<PlanProposal>,
) -> Vec<StudySession> {
    let total = proposals.len();
    let sessions: Vec<StudySession> = proposals
        .into_iter()
        .filter_map(|p| {
            let offset = u64::try_from(p.days_from_now).ok()?;
            let date = start_date.checked_add_days(Days::new(offset))?;
            if date >= exam.date {
                return None;
            }
            let topic = p.topic.trim();
            let topic = if topic.is_empty() { exam.subject.as_str() } else { topic };
            let minutes = p
                .duration_minutes
                .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);
            Some(StudySession::new(&exam.id, topic, date, minutes))
        })
        .collect();

    if sessions.len() < total {
        debug!(
            exam_id = %exam.id,
            dropped = total - sessions.len(),
            "discarded out-of-range proposals"
        );
    }
    sessions
}

/// Ask `planner` for a plan and ingest it. Every failure degrades to an
/// empty plan.
pub async fn plan_for_exam(
    planner: &dyn StudyPlanner,
    exam: &Exam,
    start_date: NaiveDate,
) -> Vec<StudySession> {
    let request = PlanRequest::for_exam(exam, start_date);
    if request.days_until() <= 0 {
        debug!(exam_id = %exam.id, "exam is not in the future, nothing to plan");
        return Vec::new();
    }

    match planner.generate_plan(&request).await {
        Ok(proposals) => ingest_proposals(exam, start_date, proposals),
        Err(e) => {
            warn!(exam_id = %exam.id, error = %e, "study plan generation failed");
            Vec::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{proposal, FixedPlanner};
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn exam_on(d: NaiveDate) -> Exam {
        Exam::new("Organic Chemistry", d, Difficulty::Hard)
    }

    #[test]
    fn ingest_maps_offsets_to_dates() {
        let exam = exam_on(date(2024, 3, 10));
        let sessions = ingest_proposals(
            &exam,
            date(2024, 3, 1),
            vec![proposal("Alkenes", 0, 60), proposal("Aromatics", 3, 90)],
        );

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].date, date(2024, 3, 1));
        assert_eq!(sessions[1].date, date(2024, 3, 4));
        assert!(sessions.iter().all(|s| s.exam_id == exam.id && !s.completed));
        assert_ne!(sessions[0].id, sessions[1].id);
    }

    #[test]
    fn ingest_drops_exam_day_and_negative_offsets() {
        let exam = exam_on(date(2024, 3, 10));
        let sessions = ingest_proposals(
            &exam,
            date(2024, 3, 1),
            vec![
                proposal("Too early", -1, 60),
                proposal("Exam day", 9, 60),
                proposal("After", 12, 60),
                proposal("Eve", 8, 60),
            ],
        );
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].topic, "Eve");
        assert_eq!(sessions[0].date, date(2024, 3, 9));
    }

    #[test]
    fn ingest_clamps_duration() {
        let exam = exam_on(date(2024, 3, 10));
        let sessions = ingest_proposals(
            &exam,
            date(2024, 3, 1),
            vec![proposal("Short", 1, 5), proposal("Long", 2, 400), proposal("Blank", 3, 45)],
        );
        let minutes: Vec<u32> = sessions.iter().map(|s| s.duration_minutes).collect();
        assert_eq!(minutes, vec![30, 120, 45]);
    }

    #[test]
    fn blank_topic_falls_back_to_subject() {
        let exam = exam_on(date(2024, 3, 10));
        let sessions = ingest_proposals(&exam, date(2024, 3, 1), vec![proposal("  ", 1, 45)]);
        assert_eq!(sessions[0].topic, "Organic Chemistry");
    }

    #[test]
    fn proposal_uses_camel_case_wire_names() {
        let parsed: Vec<PlanProposal> =
            serde_json::from_str(r#"[{"topic":"Kinetics","daysFromNow":2,"durationMinutes":50}]"#)
                .unwrap();
        assert_eq!(parsed, vec![proposal("Kinetics", 2, 50)]);
    }

    #[tokio::test]
    async fn plan_for_past_exam_skips_planner() {
        let planner = FixedPlanner::ok(vec![proposal("Anything", 0, 60)]);
        let exam = exam_on(date(2024, 3, 1));
        let sessions = plan_for_exam(&planner, &exam, date(2024, 3, 1)).await;
        assert!(sessions.is_empty());
        assert_eq!(planner.calls(), 0);
    }

    #[tokio::test]
    async fn planner_failure_yields_empty_plan() {
        let planner = FixedPlanner::failing("boom");
        let exam = exam_on(date(2024, 3, 10));
        let sessions = plan_for_exam(&planner, &exam, date(2024, 3, 1)).await;
        assert!(sessions.is_empty());
        assert_eq!(planner.calls(), 1);
    }

    #[tokio::test]
    async fn plan_for_exam_ingests_answer() {
        let planner = FixedPlanner::ok(vec![proposal("Spectroscopy", 2, 75)]);
        let exam = exam_on(date(2024, 3, 10));
        let sessions = plan_for_exam(&planner, &exam, date(2024, 3, 1)).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].date, date(2024, 3, 3));
    }
}
