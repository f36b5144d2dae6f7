//! Property tests for the entity store.
//!
//! Random sequences of operations must keep the completed-task counter,
//! session ownership and id uniqueness intact.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use scholarsync_core::model::{AppState, Difficulty, Exam, Priority, StudySession, Task};
use scholarsync_core::store::{Action, Store};

#[derive(Debug, Clone)]
enum Op {
    AddExam,
    DeleteExam(usize),
    AddTask { completed: bool },
    UpdateTask { index: usize, completed: bool },
    DeleteTask(usize),
    ToggleTask(usize),
    AddSessions { exam: usize, count: usize },
    ToggleSession(usize),
    Focus(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddExam),
        (0usize..8).prop_map(Op::DeleteExam),
        any::<bool>().prop_map(|completed| Op::AddTask { completed }),
        (0usize..8, any::<bool>()).prop_map(|(index, completed)| Op::UpdateTask { index, completed }),
        (0usize..8).prop_map(Op::DeleteTask),
        (0usize..8).prop_map(Op::ToggleTask),
        (0usize..8, 1usize..4).prop_map(|(exam, count)| Op::AddSessions { exam, count }),
        (0usize..16).prop_map(Op::ToggleSession),
        (1u32..120).prop_map(Op::Focus),
    ]
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(offset)))
        .unwrap_or_else(|| panic!("bad offset {offset}"))
}

/// Resolve an op against the current state; indices wrap around the
/// collection so most ops hit a live entity.
fn to_action(op: &Op, state: &AppState) -> Option<Action> {
    let pick = |len: usize, i: usize| (len > 0).then(|| i % len);
    Some(match op {
        Op::AddExam => Action::AddExam(Exam::new("Subject", day(30), Difficulty::Moderate)),
        Op::DeleteExam(i) => Action::DeleteExam(state.exams[pick(state.exams.len(), *i)?].id.clone()),
        Op::AddTask { completed } => {
            let mut task = Task::new("Read chapter", day(3), Priority::Medium);
            task.completed = *completed;
            Action::AddTask(task)
        }
        Op::UpdateTask { index, completed } => {
            let mut task = state.tasks[pick(state.tasks.len(), *index)?].clone();
            task.title = "Renamed".into();
            task.completed = *completed;
            Action::UpdateTask(task)
        }
        Op::DeleteTask(i) => Action::DeleteTask(state.tasks[pick(state.tasks.len(), *i)?].id.clone()),
        Op::ToggleTask(i) => Action::ToggleTask(state.tasks[pick(state.tasks.len(), *i)?].id.clone()),
        Op::AddSessions { exam, count } => {
            let exam = &state.exams[pick(state.exams.len(), *exam)?];
            Action::AddSessions(
                (0..*count)
                    .map(|n| StudySession::new(&exam.id, "Review", day(n as u64), 45))
                    .collect(),
            )
        }
        Op::ToggleSession(i) => {
            Action::ToggleSession(state.sessions[pick(state.sessions.len(), *i)?].id.clone())
        }
        Op::Focus(minutes) => Action::RecordFocusCompletion(*minutes),
    })
}

fn assert_invariants(state: &AppState) {
    let completed = state.tasks.iter().filter(|t| t.completed).count() as u32;
    assert_eq!(state.stats.tasks_completed, completed);

    let exam_ids: HashSet<&str> = state.exams.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(exam_ids.len(), state.exams.len());
    assert!(state.sessions.iter().all(|s| exam_ids.contains(s.exam_id.as_str())));

    let task_ids: HashSet<&str> = state.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(task_ids.len(), state.tasks.len());
    let session_ids: HashSet<&str> = state.sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(session_ids.len(), state.sessions.len());
}

proptest! {
    #[test]
    fn invariants_hold_under_random_operations(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut store = Store::new(AppState::default());
        let mut expected_minutes = 0u32;

        for op in &ops {
            if let Some(action) = to_action(op, store.state()) {
                if let Action::RecordFocusCompletion(m) = action {
                    expected_minutes += m;
                }
                store.dispatch(action).unwrap();
            }
            assert_invariants(store.state());
        }

        prop_assert_eq!(store.state().stats.study_minutes_today, expected_minutes);
        prop_assert_eq!(store.state().stats.xp, 450 + u64::from(expected_minutes) * 5);
    }

    #[test]
    fn double_toggle_is_identity(completed in any::<bool>(), toggles in 0usize..10) {
        let mut task = Task::new("Flashcards", day(1), Priority::High);
        task.completed = completed;
        let id = task.id.clone();
        let mut store = Store::new(AppState::default());
        store.add_task(task).unwrap();
        let before = store.state().clone();

        for _ in 0..toggles * 2 {
            store.toggle_task(&id).unwrap();
        }
        prop_assert_eq!(store.state(), &before);
    }
}

#[test]
fn delete_exam_cascades_only_its_sessions() {
    let mut store = Store::new(AppState::default());
    let keep = Exam::new("Keep", day(20), Difficulty::Easy);
    let drop = Exam::new("Drop", day(21), Difficulty::Hard);
    store.add_exam(keep.clone()).unwrap();
    store.add_exam(drop.clone()).unwrap();
    store
        .add_sessions(vec![
            StudySession::new(&keep.id, "A", day(1), 30),
            StudySession::new(&drop.id, "B", day(2), 30),
            StudySession::new(&drop.id, "C", day(3), 30),
        ])
        .unwrap();

    store.delete_exam(&drop.id).unwrap();

    let state = store.state();
    assert_eq!(state.exams.len(), 1);
    assert_eq!(state.sessions.len(), 1);
    assert_eq!(state.sessions[0].topic, "A");
}

#[test]
fn rejected_action_leaves_state_untouched() {
    let mut store = Store::new(AppState::default());
    let exam = Exam::new("Physics", day(10), Difficulty::Moderate);
    store.add_exam(exam.clone()).unwrap();
    let before = store.state().clone();

    assert!(store.add_exam(exam).is_err());
    assert!(store.add_exam(Exam::new("   ", day(10), Difficulty::Easy)).is_err());
    assert!(store.add_task(Task::new("", day(1), Priority::Low)).is_err());
    assert_eq!(store.state(), &before);
}
