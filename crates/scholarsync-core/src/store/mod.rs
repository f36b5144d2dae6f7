//! Entity store.
//!
//! The store is an explicit state-transition function ([`reduce`]) plus a thin
//! [`Store`] holder that keeps the current state and hands every new state to
//! an injected [`StateSink`]. Transitions are total: an unknown identifier is a
//! silent no-op, and a validation failure leaves the state untouched.
//!
//! `stats.tasks_completed` is maintained incrementally and only here:
//! [`Action::ToggleTask`] is the sole way to flip a task's completion flag
//! (updates keep the stored flag), so the counter never drifts from the
//! number of completed tasks.

use std::sync::Arc;

use tracing::debug;

use crate::error::ValidationError;
use crate::events::Event;
use crate::model::{AppState, Exam, StudySession, Task};

/// XP earned per focused minute.
pub const XP_PER_FOCUS_MINUTE: u64 = 5;

/// A single state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddExam(Exam),
    UpdateExam(Exam),
    /// Removes the exam and every study session that references it.
    DeleteExam(String),
    AddTask(Task),
    /// Replaces editable fields; the completion flag is left as stored.
    UpdateTask(Task),
    DeleteTask(String),
    ToggleTask(String),
    AddSessions(Vec<StudySession>),
    ToggleSession(String),
    RecordFocusCompletion(u32),
    SetMotivation(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddExam(_) => "add_exam",
            Action::UpdateExam(_) => "update_exam",
            Action::DeleteExam(_) => "delete_exam",
            Action::AddTask(_) => "add_task",
            Action::UpdateTask(_) => "update_task",
            Action::DeleteTask(_) => "delete_task",
            Action::ToggleTask(_) => "toggle_task",
            Action::AddSessions(_) => "add_sessions",
            Action::ToggleSession(_) => "toggle_session",
            Action::RecordFocusCompletion(_) => "record_focus_completion",
            Action::SetMotivation(_) => "set_motivation",
        }
    }
}

/// Compute the state that follows `state` under `action`.
pub fn reduce(state: &AppState, action: Action) -> Result<AppState, ValidationError> {
    let mut next = state.clone();
    match action {
        Action::AddExam(exam) => {
            exam.validate()?;
            ensure_unique(next.exams.iter().map(|e| e.id.as_str()), &exam.id, "exams")?;
            next.exams.push(exam);
        }
        Action::UpdateExam(exam) => {
            exam.validate()?;
            if let Some(slot) = next.exams.iter_mut().find(|e| e.id == exam.id) {
                *slot = exam;
            }
        }
        Action::DeleteExam(id) => {
            next.exams.retain(|e| e.id != id);
            next.sessions.retain(|s| s.exam_id != id);
        }
        Action::AddTask(task) => {
            task.validate()?;
            ensure_unique(next.tasks.iter().map(|t| t.id.as_str()), &task.id, "tasks")?;
            if task.completed {
                next.stats.tasks_completed += 1;
            }
            next.tasks.push(task);
        }
        Action::UpdateTask(task) => {
            task.validate()?;
            if let Some(slot) = next.tasks.iter_mut().find(|t| t.id == task.id) {
                let completed = slot.completed;
                *slot = Task { completed, ..task };
            }
        }
        Action::DeleteTask(id) => {
            if let Some(pos) = next.tasks.iter().position(|t| t.id == id) {
                let removed = next.tasks.remove(pos);
                if removed.completed {
                    next.stats.tasks_completed = next.stats.tasks_completed.saturating_sub(1);
                }
            }
        }
        Action::ToggleTask(id) => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == id) {
                let was_completed = task.completed;
                task.completed = !was_completed;
                next.stats.tasks_completed = if was_completed {
                    next.stats.tasks_completed.saturating_sub(1)
                } else {
                    next.stats.tasks_completed + 1
                };
            }
        }
        Action::AddSessions(sessions) => {
            for (i, session) in sessions.iter().enumerate() {
                session.validate()?;
                let earlier = sessions[..i].iter().map(|s| s.id.as_str());
                ensure_unique(
                    next.sessions.iter().map(|s| s.id.as_str()).chain(earlier),
                    &session.id,
                    "sessions",
                )?;
            }
            next.sessions.extend(sessions);
        }
        Action::ToggleSession(id) => {
            if let Some(session) = next.sessions.iter_mut().find(|s| s.id == id) {
                session.completed = !session.completed;
            }
        }
        Action::RecordFocusCompletion(minutes) => {
            next.stats.study_minutes_today = next.stats.study_minutes_today.saturating_add(minutes);
            next.stats.xp = next
                .stats
                .xp
                .saturating_add(u64::from(minutes) * XP_PER_FOCUS_MINUTE);
        }
        Action::SetMotivation(text) => {
            next.motivation = text;
        }
    }
    Ok(next)
}

fn ensure_unique<'a>(
    mut existing: impl Iterator<Item = &'a str>,
    id: &str,
    collection: &'static str,
) -> Result<(), ValidationError> {
    if existing.any(|e| e == id) {
        Err(ValidationError::DuplicateId {
            collection,
            id: id.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Receives every state produced by a successful transition.
///
/// Implementations must not block; persistence is fire-and-forget.
pub trait StateSink: Send + Sync {
    fn publish(&self, state: &AppState);
}

/// Owner of the canonical [`AppState`].
pub struct Store {
    state: AppState,
    sink: Option<Arc<dyn StateSink>>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state, sink: None }
    }

    pub fn with_sink(state: AppState, sink: Arc<dyn StateSink>) -> Self {
        Self {
            state,
            sink: Some(sink),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Apply `action`, then publish the new state to the sink.
    pub fn dispatch(&mut self, action: Action) -> Result<&AppState, ValidationError> {
        let name = action.name();
        let next = reduce(&self.state, action)?;
        debug!(action = name, "applied store action");
        self.state = next;
        if let Some(sink) = &self.sink {
            sink.publish(&self.state);
        }
        Ok(&self.state)
    }

    pub fn add_exam(&mut self, exam: Exam) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::AddExam(exam))
    }

    pub fn update_exam(&mut self, exam: Exam) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::UpdateExam(exam))
    }

    pub fn delete_exam(&mut self, id: &str) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::DeleteExam(id.to_string()))
    }

    pub fn add_task(&mut self, task: Task) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::AddTask(task))
    }

    pub fn update_task(&mut self, task: Task) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::UpdateTask(task))
    }

    pub fn delete_task(&mut self, id: &str) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::DeleteTask(id.to_string()))
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::ToggleTask(id.to_string()))
    }

    pub fn add_sessions(
        &mut self,
        sessions: Vec<StudySession>,
    ) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::AddSessions(sessions))
    }

    pub fn toggle_session(&mut self, id: &str) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::ToggleSession(id.to_string()))
    }

    pub fn record_focus_completion(&mut self, minutes: u32) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::RecordFocusCompletion(minutes))
    }

    pub fn set_motivation(&mut self, text: impl Into<String>) -> Result<&AppState, ValidationError> {
        self.dispatch(Action::SetMotivation(text.into()))
    }

    /// Feed a timer event back into the stats. Only focus completions count.
    pub fn apply_timer_event(&mut self, event: &Event) -> Result<bool, ValidationError> {
        match event.focus_minutes() {
            Some(minutes) => {
                self.record_focus_completion(minutes)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Priority};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<AppState>>);

    impl StateSink for Recorder {
        fn publish(&self, state: &AppState) {
            self.0.lock().unwrap().push(state.clone());
        }
    }

    #[test]
    fn delete_exam_cascades_only_its_sessions() {
        let mut store = Store::new(AppState::default());
        let math = Exam::new("Math", date(2024, 6, 10), Difficulty::Hard);
        let bio = Exam::new("Biology", date(2024, 6, 12), Difficulty::Easy);
        let sessions = vec![
            StudySession::new(&math.id, "Limits", date(2024, 6, 1), 60),
            StudySession::new(&math.id, "Series", date(2024, 6, 2), 90),
            StudySession::new(&bio.id, "Cells", date(2024, 6, 3), 45),
        ];
        let math_id = math.id.clone();
        let bio_id = bio.id.clone();
        store.add_exam(math).unwrap();
        store.add_exam(bio).unwrap();
        store.add_sessions(sessions).unwrap();

        let state = store.delete_exam(&math_id).unwrap();
        assert!(state.exam(&math_id).is_none());
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.sessions[0].exam_id, bio_id);
        assert_eq!(state.exams.len(), 1);
    }

    #[test]
    fn toggle_task_twice_is_identity() {
        let mut store = Store::new(AppState::default());
        let task = Task::new("Essay", date(2024, 2, 1), Priority::High);
        let id = task.id.clone();
        store.add_task(task).unwrap();
        let before = store.state().clone();

        let after_one = store.toggle_task(&id).unwrap();
        assert!(after_one.task(&id).unwrap().completed);
        assert_eq!(after_one.stats.tasks_completed, 1);

        let after_two = store.toggle_task(&id).unwrap();
        assert_eq!(after_two, &before);
    }

    #[test]
    fn update_task_keeps_completion_flag() {
        let mut store = Store::new(AppState::default());
        let task = Task::new("Lab report", date(2024, 2, 1), Priority::Low);
        let id = task.id.clone();
        store.add_task(task.clone()).unwrap();
        store.toggle_task(&id).unwrap();

        let edited = Task {
            title: "Lab report v2".into(),
            completed: false,
            ..task
        };
        let state = store.update_task(edited).unwrap();
        let stored = state.task(&id).unwrap();
        assert_eq!(stored.title, "Lab report v2");
        assert!(stored.completed);
        assert_eq!(state.stats.tasks_completed, 1);
    }

    #[test]
    fn deleting_completed_task_decrements_counter() {
        let mut store = Store::new(AppState::default());
        let task = Task::new("Quiz", date(2024, 2, 1), Priority::Medium);
        let id = task.id.clone();
        store.add_task(task).unwrap();
        store.toggle_task(&id).unwrap();
        let state = store.delete_task(&id).unwrap();
        assert_eq!(state.stats.tasks_completed, 0);
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn validation_failure_leaves_state_untouched() {
        let mut store = Store::new(AppState::default());
        let err = store
            .add_exam(Exam::new("", date(2024, 1, 1), Difficulty::Easy))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "subject" });
        assert_eq!(store.state(), &AppState::default());

        let err = store
            .add_task(Task::new("  ", date(2024, 1, 1), Priority::Low))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "title" });
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut store = Store::new(AppState::default());
        let exam = Exam::new("History", date(2024, 1, 1), Difficulty::Moderate);
        store.add_exam(exam.clone()).unwrap();
        assert!(matches!(
            store.add_exam(exam.clone()),
            Err(ValidationError::DuplicateId { collection: "exams", .. })
        ));

        let s = StudySession::new(&exam.id, "Rome", date(2023, 12, 30), 30);
        let result = store.add_sessions(vec![s.clone(), s]);
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateId { collection: "sessions", .. })
        ));
        assert!(store.state().sessions.is_empty());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = Store::new(AppState::default());
        let before = store.state().clone();
        store.delete_exam("nope").unwrap();
        store.toggle_task("nope").unwrap();
        store.delete_task("nope").unwrap();
        store.toggle_session("nope").unwrap();
        store
            .update_exam(Exam::new("Ghost", date(2024, 1, 1), Difficulty::Easy))
            .unwrap();
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn focus_completion_accrues_minutes_and_xp() {
        let mut store = Store::new(AppState::default());
        let state = store.record_focus_completion(25).unwrap();
        assert_eq!(state.stats.study_minutes_today, 25);
        assert_eq!(state.stats.xp, 450 + 125);
    }

    #[test]
    fn every_transition_is_published() {
        let recorder = Arc::new(Recorder::default());
        let mut store = Store::with_sink(AppState::default(), recorder.clone());
        store.set_motivation("Keep going").unwrap();
        store.record_focus_completion(5).unwrap();
        let _ = store.add_task(Task::new("", date(2024, 1, 1), Priority::Low));

        let published = recorder.0.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].motivation, "Keep going");
        assert_eq!(published[1].stats.study_minutes_today, 5);
    }

    #[test]
    fn toggle_session_flips_flag() {
        let mut store = Store::new(AppState::default());
        let exam = Exam::new("Art", date(2024, 3, 3), Difficulty::Easy);
        let session = StudySession::new(&exam.id, "Color theory", date(2024, 3, 1), 30);
        let id = session.id.clone();
        store.add_exam(exam).unwrap();
        store.add_sessions(vec![session]).unwrap();
        assert!(store.toggle_session(&id).unwrap().session(&id).unwrap().completed);
    }
}
