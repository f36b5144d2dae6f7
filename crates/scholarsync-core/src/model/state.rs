use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Exam, StudySession, Task};

/// Aggregate progress counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub study_minutes_today: u32,
    /// Always equal to the number of completed tasks.
    pub tasks_completed: u32,
    pub streak_days: u32,
    pub xp: u64,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            study_minutes_today: 0,
            tasks_completed: 0,
            streak_days: 3,
            xp: 450,
        }
    }
}

/// The aggregate root. Only the store transition function mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub sessions: Vec<StudySession>,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default = "default_motivation")]
    pub motivation: String,
}

fn default_motivation() -> String {
    "Ready to learn?".into()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            exams: Vec::new(),
            tasks: Vec::new(),
            sessions: Vec::new(),
            stats: UserStats::default(),
            motivation: default_motivation(),
        }
    }
}

/// Task counts for the task list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskOverview {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// One row of the exam planner: countdown and study-session progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamOverview<'a> {
    #[serde(flatten)]
    pub exam: &'a Exam,
    /// Negative once the exam date has passed.
    pub days_left: i64,
    pub sessions_completed: usize,
    pub sessions_total: usize,
}

impl ExamOverview<'_> {
    /// Share of sessions completed, 0 when none are planned.
    pub fn progress_percent(&self) -> u32 {
        if self.sessions_total == 0 {
            return 0;
        }
        (self.sessions_completed * 100 / self.sessions_total) as u32
    }

    /// Past exams cannot be planned for.
    pub fn can_plan(&self) -> bool {
        self.days_left >= 0
    }
}

impl AppState {
    /// Restore the structural invariants on a state that came from outside
    /// the store (a decoded blob): orphaned sessions are dropped, duplicate
    /// ids keep their first occurrence, and the completed-task counter is
    /// recounted.
    pub fn normalized(mut self) -> Self {
        dedup_by_id(&mut self.exams, |e| &e.id, "exams");
        dedup_by_id(&mut self.tasks, |t| &t.id, "tasks");
        dedup_by_id(&mut self.sessions, |s| &s.id, "sessions");

        let live: HashSet<&str> = self.exams.iter().map(|e| e.id.as_str()).collect();
        let before = self.sessions.len();
        self.sessions.retain(|s| live.contains(s.exam_id.as_str()));
        if self.sessions.len() != before {
            warn!(
                dropped = before - self.sessions.len(),
                "dropped study sessions referencing missing exams"
            );
        }

        let completed = self.completed_task_count();
        if self.stats.tasks_completed != completed {
            warn!(
                stored = self.stats.tasks_completed,
                actual = completed,
                "recounted completed tasks"
            );
            self.stats.tasks_completed = completed;
        }
        self
    }

    pub fn exam(&self, id: &str) -> Option<&Exam> {
        self.exams.iter().find(|e| e.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&StudySession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Subject of the exam a session belongs to, or `"Unknown"`.
    pub fn exam_subject(&self, exam_id: &str) -> &str {
        self.exam(exam_id)
            .map(|e| e.subject.as_str())
            .unwrap_or("Unknown")
    }

    pub fn sessions_for_exam<'a>(&'a self, exam_id: &'a str) -> impl Iterator<Item = &'a StudySession> + 'a {
        self.sessions.iter().filter(move |s| s.exam_id == exam_id)
    }

    /// Exams ordered by date, earliest first.
    pub fn exams_by_date(&self) -> Vec<&Exam> {
        let mut exams: Vec<&Exam> = self.exams.iter().collect();
        exams.sort_by_key(|e| e.date);
        exams
    }

    /// Pending tasks first, each group ordered High, Medium, Low.
    pub fn tasks_sorted(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        tasks.sort_by_key(|t| (t.completed, t.priority.rank()));
        tasks
    }

    /// Exams by date with their countdown and session progress as of `today`.
    pub fn exam_overview(&self, today: NaiveDate) -> Vec<ExamOverview<'_>> {
        self.exams_by_date()
            .into_iter()
            .map(|exam| {
                let (completed, total) = self
                    .sessions_for_exam(&exam.id)
                    .fold((0, 0), |(done, all), s| (done + usize::from(s.completed), all + 1));
                ExamOverview {
                    exam,
                    days_left: (exam.date - today).num_days(),
                    sessions_completed: completed,
                    sessions_total: total,
                }
            })
            .collect()
    }

    pub fn task_overview(&self) -> TaskOverview {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskOverview {
            total: self.tasks.len(),
            pending: self.tasks.len() - completed,
            completed,
        }
    }

    pub(crate) fn completed_task_count(&self) -> u32 {
        self.tasks.iter().filter(|t| t.completed).count() as u32
    }
}

fn dedup_by_id<T>(items: &mut Vec<T>, id: impl Fn(&T) -> &String, collection: &str) {
    let mut seen = HashSet::new();
    let before = items.len();
    items.retain(|item| seen.insert(id(item).clone()));
    if items.len() != before {
        warn!(collection, dropped = before - items.len(), "dropped duplicate ids");
    }
}
