//! Grid shape and navigation properties across arbitrary dates.

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use scholarsync_core::calendar::{build_grid, days_in_month, CalendarCursor, Direction, ViewMode};
use scholarsync_core::model::{AppState, Difficulty, Exam, Priority, StudySession, Task};

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2100, 1u32..=12, 1u32..=31).prop_filter_map("valid date", |(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
    })
}

proptest! {
    #[test]
    fn month_grid_has_padding_plus_days(reference in date_strategy()) {
        let grid = build_grid(ViewMode::Month, reference, &AppState::default());
        let first = reference.with_day(1).unwrap();
        let padding = first.weekday().num_days_from_sunday() as usize;

        prop_assert_eq!(grid.cells.len(), padding + days_in_month(reference));
        prop_assert!(grid.cells[..padding].iter().all(|c| c.is_padding()));
        let days: Vec<NaiveDate> = grid.days().map(|d| d.date).collect();
        prop_assert_eq!(days.first().copied(), Some(first));
        prop_assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn week_grid_starts_on_sunday(reference in date_strategy()) {
        let grid = build_grid(ViewMode::Week, reference, &AppState::default());
        let days: Vec<NaiveDate> = grid.days().map(|d| d.date).collect();

        prop_assert_eq!(days.len(), 7);
        prop_assert_eq!(days[0].weekday(), Weekday::Sun);
        prop_assert!(days.contains(&reference));
        prop_assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn week_navigation_is_reversible(reference in date_strategy(), steps in 1usize..20) {
        let mut cursor = CalendarCursor::new(ViewMode::Week, reference);
        for _ in 0..steps {
            cursor.navigate(Direction::Next);
        }
        for _ in 0..steps {
            cursor.navigate(Direction::Prev);
        }
        prop_assert_eq!(cursor.reference_date, reference);
    }

    #[test]
    fn month_navigation_lands_in_adjacent_month(reference in date_strategy()) {
        let mut cursor = CalendarCursor::new(ViewMode::Month, reference);
        cursor.navigate(Direction::Next);
        let next = cursor.reference_date;
        let expected = if reference.month() == 12 {
            (reference.year() + 1, 1)
        } else {
            (reference.year(), reference.month() + 1)
        };
        prop_assert_eq!((next.year(), next.month()), expected);
        prop_assert!(next.day() <= reference.day());
    }
}

#[test]
fn entities_land_on_their_own_day_only() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
    let mut state = AppState::default();
    let exam = Exam::new("Calculus", day, Difficulty::Hard);
    state
        .sessions
        .push(StudySession::new(&exam.id, "Integrals", day.pred_opt().unwrap(), 60));
    state.exams.push(exam);
    state.tasks.push(Task::new("Problem set", day, Priority::High));

    let grid = build_grid(ViewMode::Month, day, &state);
    for cell in grid.days() {
        if cell.date == day {
            assert_eq!(cell.exams.len(), 1);
            assert_eq!(cell.tasks.len(), 1);
            assert!(cell.sessions.is_empty());
        } else if cell.date == day.pred_opt().unwrap() {
            assert_eq!(cell.sessions.len(), 1);
            assert_eq!(cell.sessions[0].exam_subject, "Calculus");
        } else {
            assert!(!cell.has_items(), "unexpected items on {}", cell.date);
        }
    }
}

#[test]
fn navigation_never_touches_entities() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let mut state = AppState::default();
    state.tasks.push(Task::new("Essay", day, Priority::Low));
    let before = state.clone();

    let mut cursor = CalendarCursor::new(ViewMode::Month, day);
    cursor.navigate(Direction::Next);
    assert_eq!(cursor.reference_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    let _ = cursor.grid(&state);
    assert_eq!(state, before);
}
