//! Calendar views: grid generation and navigation.
//!
//! Navigation only moves a reference date; it never touches entities.

mod grid;

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub use grid::{
    build_grid, days_in_month, first_of_month, week_start, weekday_index, CalendarGrid, Cell,
    DayCell, SessionEntry, MONTH_CELL_ITEM_LIMIT,
};

use crate::error::ValidationError;
use crate::model::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            other => Err(ValidationError::InvalidValue {
                field: "view".into(),
                message: format!("expected day, week or month, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Current view and reference date of the calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCursor {
    pub view: ViewMode,
    pub reference_date: NaiveDate,
}

impl CalendarCursor {
    pub fn new(view: ViewMode, reference_date: NaiveDate) -> Self {
        Self {
            view,
            reference_date,
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Move by one day, one week, or one calendar month. Month steps clamp
    /// the day to the target month's length (Jan 31 -> Feb 29).
    pub fn navigate(&mut self, direction: Direction) {
        let d = self.reference_date;
        let moved = match (self.view, direction) {
            (ViewMode::Day, Direction::Next) => d.checked_add_signed(Duration::days(1)),
            (ViewMode::Day, Direction::Prev) => d.checked_sub_signed(Duration::days(1)),
            (ViewMode::Week, Direction::Next) => d.checked_add_signed(Duration::days(7)),
            (ViewMode::Week, Direction::Prev) => d.checked_sub_signed(Duration::days(7)),
            (ViewMode::Month, Direction::Next) => d.checked_add_months(Months::new(1)),
            (ViewMode::Month, Direction::Prev) => d.checked_sub_months(Months::new(1)),
        };
        // Out of chrono's range: stay put.
        if let Some(moved) = moved {
            self.reference_date = moved;
        }
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) {
        self.reference_date = today;
    }

    pub fn grid(&self, state: &AppState) -> CalendarGrid {
        build_grid(self.view, self.reference_date, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn navigate_steps_by_view() {
        let mut cursor = CalendarCursor::new(ViewMode::Day, date(2024, 2, 28));
        cursor.navigate(Direction::Next);
        assert_eq!(cursor.reference_date, date(2024, 2, 29));

        cursor.set_view(ViewMode::Week);
        cursor.navigate(Direction::Prev);
        assert_eq!(cursor.reference_date, date(2024, 2, 22));

        cursor.set_view(ViewMode::Month);
        cursor.navigate(Direction::Next);
        assert_eq!(cursor.reference_date, date(2024, 3, 22));
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut cursor = CalendarCursor::new(ViewMode::Month, date(2024, 1, 31));
        cursor.navigate(Direction::Next);
        assert_eq!(cursor.reference_date, date(2024, 2, 29));
        cursor.navigate(Direction::Prev);
        assert_eq!(cursor.reference_date, date(2024, 1, 29));
    }

    #[test]
    fn navigation_crosses_year_boundaries() {
        let mut cursor = CalendarCursor::new(ViewMode::Month, date(2024, 12, 15));
        cursor.navigate(Direction::Next);
        assert_eq!(cursor.reference_date, date(2025, 1, 15));
    }

    #[test]
    fn jump_to_today_resets_reference() {
        let mut cursor = CalendarCursor::new(ViewMode::Week, date(2020, 1, 1));
        cursor.jump_to_today(date(2024, 6, 1));
        assert_eq!(cursor.reference_date, date(2024, 6, 1));
        assert_eq!(cursor.view, ViewMode::Week);
    }

    #[test]
    fn view_mode_parses() {
        assert_eq!("Week".parse::<ViewMode>().unwrap(), ViewMode::Week);
        assert!("year".parse::<ViewMode>().is_err());
    }
}
