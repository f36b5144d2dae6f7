//! Dashboard metrics: today's agenda and progress bars.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{AppState, StudySession, Task};

const BAR_SLOTS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub streak_days: u32,
    pub xp: u64,
    /// Pending tasks due today.
    pub todays_tasks: Vec<Task>,
    /// Pending study sessions scheduled today.
    pub todays_sessions: Vec<AgendaSession>,
    pub metrics: ProgressMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaSession {
    pub session: StudySession,
    pub exam_subject: String,
}

/// Percentages in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressMetrics {
    pub tasks_completed: u32,
    pub study_workload: u32,
    pub focus_consistency: u32,
}

impl Dashboard {
    pub fn compute(state: &AppState, today: NaiveDate) -> Self {
        let todays_tasks = state
            .tasks
            .iter()
            .filter(|t| t.due_date == today && !t.completed)
            .cloned()
            .collect();
        let todays_sessions = state
            .sessions
            .iter()
            .filter(|s| s.date == today && !s.completed)
            .map(|s| AgendaSession {
                session: s.clone(),
                exam_subject: state.exam_subject(&s.exam_id).to_string(),
            })
            .collect();

        Self {
            today,
            streak_days: state.stats.streak_days,
            xp: state.stats.xp,
            todays_tasks,
            todays_sessions,
            metrics: ProgressMetrics::from_state(state),
        }
    }

    pub fn is_free_today(&self) -> bool {
        self.todays_tasks.is_empty() && self.todays_sessions.is_empty()
    }
}

impl ProgressMetrics {
    pub fn from_state(state: &AppState) -> Self {
        let exams = u32::try_from(state.exams.len()).unwrap_or(u32::MAX);
        Self {
            tasks_completed: state.stats.tasks_completed.saturating_mul(2).min(100),
            study_workload: exams.saturating_mul(10).min(100),
            focus_consistency: state.stats.study_minutes_today.min(100),
        }
    }
}

/// Render a percentage as a 20-slot text bar: `[####................] 20%`.
pub fn progress_bar(percent: u32) -> String {
    let percent = percent.min(100);
    let filled = (percent / 5) as usize;
    let empty = BAR_SLOTS as usize - filled;
    format!("[{}{}] {}%", "#".repeat(filled), ".".repeat(empty), percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Exam, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn agenda_lists_only_pending_items_for_today() {
        let today = date(2024, 5, 20);
        let mut state = AppState::default();
        let exam = Exam::new("Economics", date(2024, 5, 30), Difficulty::Hard);
        let mut done = StudySession::new(&exam.id, "Supply", today, 45);
        done.completed = true;
        state.sessions.push(StudySession::new(&exam.id, "Demand", today, 60));
        state.sessions.push(done);
        state.sessions.push(StudySession::new(&exam.id, "Elasticity", date(2024, 5, 21), 60));
        state.exams.push(exam);
        state.tasks.push(Task::new("Buy pens", today, Priority::Low));

        let dash = Dashboard::compute(&state, today);
        assert_eq!(dash.todays_sessions.len(), 1);
        assert_eq!(dash.todays_sessions[0].exam_subject, "Economics");
        assert_eq!(dash.todays_tasks.len(), 1);
        assert!(!dash.is_free_today());
    }

    #[test]
    fn metrics_are_capped_at_100() {
        let mut state = AppState::default();
        state.stats.tasks_completed = 70;
        state.stats.study_minutes_today = 45;
        for i in 0..3 {
            state
                .exams
                .push(Exam::new(format!("E{i}"), date(2024, 1, 1), Difficulty::Easy));
        }
        let m = ProgressMetrics::from_state(&state);
        assert_eq!(m.tasks_completed, 100);
        assert_eq!(m.study_workload, 30);
        assert_eq!(m.focus_consistency, 45);
    }

    #[test]
    fn progress_bar_renders_twenty_slots() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", ".".repeat(20)));
        assert_eq!(progress_bar(40), "[########............] 40%");
        assert_eq!(progress_bar(250), format!("[{}] 100%", "#".repeat(20)));
    }
}
