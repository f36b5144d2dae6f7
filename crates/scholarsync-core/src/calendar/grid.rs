//! Calendar grid generation.
//!
//! A grid is an ordered list of cells for one view. Entities are placed by
//! exact calendar-date equality; all dates here are `NaiveDate`, so cell
//! placement never depends on the local UTC offset.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::ViewMode;
use crate::model::{AppState, Exam, StudySession, Task};

/// Sessions + tasks shown per month cell before the rest is summarized.
pub const MONTH_CELL_ITEM_LIMIT: usize = 3;

/// A study session paired with its exam's subject for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub session: StudySession,
    pub exam_subject: String,
}

/// A real day in the grid with everything due or scheduled on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    /// Never truncated.
    pub exams: Vec<Exam>,
    pub sessions: Vec<SessionEntry>,
    pub tasks: Vec<Task>,
    /// Sessions and tasks left out by the month-view overflow policy.
    pub hidden: usize,
}

impl DayCell {
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    pub fn has_items(&self) -> bool {
        !self.exams.is_empty() || !self.sessions.is_empty() || !self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cell {
    /// Leading placeholder before the first of the month. Not navigable.
    Padding,
    Day(DayCell),
}

impl Cell {
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Padding => None,
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, Cell::Padding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub view: ViewMode,
    pub reference_date: NaiveDate,
    pub cells: Vec<Cell>,
}

impl CalendarGrid {
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(Cell::day)
    }

    pub fn padding_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_padding()).count()
    }

    /// Title shown above the grid.
    pub fn header_label(&self) -> String {
        match self.view {
            ViewMode::Day => self.reference_date.format("%A, %B %-d, %Y").to_string(),
            ViewMode::Week => {
                let mut days = self.days();
                match (days.next(), days.last()) {
                    (Some(first), Some(last)) => format!(
                        "{} - {}",
                        first.date.format("%b %-d"),
                        last.date.format("%b %-d, %Y")
                    ),
                    _ => self.reference_date.format("%b %-d, %Y").to_string(),
                }
            }
            ViewMode::Month => self.reference_date.format("%B %Y").to_string(),
        }
    }
}

/// Build the grid for `view` around `reference_date`.
pub fn build_grid(view: ViewMode, reference_date: NaiveDate, state: &AppState) -> CalendarGrid {
    let cells = match view {
        ViewMode::Day => vec![Cell::Day(populate(reference_date, state, None))],
        ViewMode::Week => {
            // Truncated at the ends of the representable range.
            week_start(reference_date)
                .iter_days()
                .take(7)
                .map(|d| Cell::Day(populate(d, state, None)))
                .collect()
        }
        ViewMode::Month => {
            let first = first_of_month(reference_date);
            let padding = weekday_index(first) as usize;
            let mut cells: Vec<Cell> = std::iter::repeat_with(|| Cell::Padding)
                .take(padding)
                .collect();
            cells.extend(
                month_days(first)
                    .map(|d| Cell::Day(populate(d, state, Some(MONTH_CELL_ITEM_LIMIT)))),
            );
            cells
        }
    };
    CalendarGrid {
        view,
        reference_date,
        cells,
    }
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// The Sunday on or before `date`, clamped to [`NaiveDate::MIN`].
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(weekday_index(date))))
        .unwrap_or(NaiveDate::MIN)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn days_in_month(date: NaiveDate) -> usize {
    month_days(first_of_month(date)).count()
}

fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = first.month();
    first.iter_days().take_while(move |d| d.month() == month)
}

fn populate(date: NaiveDate, state: &AppState, limit: Option<usize>) -> DayCell {
    let exams: Vec<Exam> = state.exams.iter().filter(|e| e.date == date).cloned().collect();
    let mut sessions: Vec<SessionEntry> = state
        .sessions
        .iter()
        .filter(|s| s.date == date)
        .map(|s| SessionEntry {
            session: s.clone(),
            exam_subject: state.exam_subject(&s.exam_id).to_string(),
        })
        .collect();
    let mut tasks: Vec<Task> = state.tasks.iter().filter(|t| t.due_date == date).cloned().collect();

    let mut hidden = 0;
    if let Some(limit) = limit {
        let total = sessions.len() + tasks.len();
        if total > limit {
            hidden = total - limit;
            sessions.truncate(limit);
            tasks.truncate(limit - sessions.len());
        }
    }

    DayCell {
        date,
        exams,
        sessions,
        tasks,
        hidden,
    }
}
