//! At most one outstanding plan request per exam.
//!
//! The store is never borrowed across the planner's await: a request is
//! started from a snapshot of the exam, and its result is applied later
//! against whatever the store looks like by then.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{plan_for_exam, StudyPlanner};
use crate::error::ValidationError;
use crate::model::{Exam, StudySession};
use crate::store::Store;

type InFlight = Arc<Mutex<HashSet<String>>>;

/// Tracks which exams currently have a plan request outstanding.
#[derive(Debug, Clone, Default)]
pub struct PlanRequests {
    in_flight: InFlight,
}

impl PlanRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `exam`, or `None` if one is already running.
    pub fn try_begin(&self, exam: &Exam, start_date: NaiveDate) -> Option<PendingPlan> {
        if !lock(&self.in_flight).insert(exam.id.clone()) {
            debug!(exam_id = %exam.id, "plan request already in flight");
            return None;
        }
        Some(PendingPlan {
            exam: exam.clone(),
            start_date,
            guard: InFlightGuard {
                in_flight: Arc::clone(&self.in_flight),
                exam_id: exam.id.clone(),
            },
        })
    }

    pub fn is_pending(&self, exam_id: &str) -> bool {
        lock(&self.in_flight).contains(exam_id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.in_flight).len()
    }
}

fn lock(set: &InFlight) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an exam as in flight until dropped.
#[derive(Debug)]
struct InFlightGuard {
    in_flight: InFlight,
    exam_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.exam_id);
    }
}

/// A started request that has not asked the planner yet.
#[derive(Debug)]
pub struct PendingPlan {
    exam: Exam,
    start_date: NaiveDate,
    guard: InFlightGuard,
}

impl PendingPlan {
    pub fn exam_id(&self) -> &str {
        &self.exam.id
    }

    pub async fn run(self, planner: &dyn StudyPlanner) -> PlanOutcome {
        let sessions = plan_for_exam(planner, &self.exam, self.start_date).await;
        PlanOutcome {
            sessions,
            guard: self.guard,
        }
    }
}

/// The planner's answer, waiting to be applied. The exam stays marked in
/// flight until this is applied or dropped.
#[derive(Debug)]
pub struct PlanOutcome {
    sessions: Vec<StudySession>,
    guard: InFlightGuard,
}

impl PlanOutcome {
    pub fn exam_id(&self) -> &str {
        &self.guard.exam_id
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    /// Append the sessions to `store`. Returns how many were added, which is
    /// zero when the plan was empty or the exam was deleted meanwhile.
    pub fn apply(self, store: &mut Store) -> Result<usize, ValidationError> {
        let exam_id = self.guard.exam_id.as_str();
        if store.state().exam(exam_id).is_none() {
            info!(exam_id, "exam deleted while planning, discarding plan");
            return Ok(0);
        }
        if self.sessions.is_empty() {
            return Ok(0);
        }
        let added = self.sessions.len();
        store.add_sessions(self.sessions)?;
        info!(exam_id, added, "study plan applied");
        Ok(added)
    }
}
