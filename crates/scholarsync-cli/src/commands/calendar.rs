//! Calendar view for CLI.

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use scholarsync_core::calendar::{CalendarCursor, CalendarGrid, Cell, DayCell, Direction, ViewMode};

use super::{date_arg, print_json, today, AppContext, CmdResult};

#[derive(Args)]
pub struct CalendarArgs {
    /// day, week or month
    #[arg(long, default_value = "month")]
    view: ViewMode,
    /// Reference date (default: today)
    #[arg(long, value_parser = date_arg)]
    date: Option<NaiveDate>,
    /// Step the reference date; may be repeated
    #[arg(long, value_enum)]
    nav: Vec<Nav>,
    /// Print the grid as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Nav {
    Prev,
    Next,
}

impl From<Nav> for Direction {
    fn from(nav: Nav) -> Self {
        match nav {
            Nav::Prev => Direction::Prev,
            Nav::Next => Direction::Next,
        }
    }
}

pub async fn run(args: CalendarArgs) -> CmdResult {
    let ctx = AppContext::open()?;
    let now = today();
    let mut cursor = CalendarCursor::new(args.view, now);
    if let Some(date) = args.date {
        cursor.reference_date = date;
    }
    for step in args.nav {
        cursor.navigate(step.into());
    }

    let grid = cursor.grid(ctx.store.state());
    let result = if args.json {
        print_json(&grid)
    } else {
        print!("{}", render(&grid, now));
        Ok(())
    };
    ctx.close().await;
    result
}

fn render(grid: &CalendarGrid, today: NaiveDate) -> String {
    let mut out = format!("{}\n\n", grid.header_label());
    if grid.view == ViewMode::Month {
        out.push_str(&render_month_table(grid, today));
        out.push('\n');
    }
    for day in grid.days().filter(|d| d.has_items() || grid.view != ViewMode::Month) {
        out.push_str(&render_day(day, today));
    }
    out
}

fn render_month_table(grid: &CalendarGrid, today: NaiveDate) -> String {
    let mut out = String::from(" Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");
    for week in grid.cells.chunks(7) {
        for cell in week {
            match cell {
                Cell::Padding => out.push_str("     "),
                Cell::Day(day) => {
                    let mark = if day.is_today(today) {
                        '>'
                    } else if day.has_items() {
                        '*'
                    } else {
                        ' '
                    };
                    out.push_str(&format!(" {mark}{:>2} ", day.date.format("%-d")));
                }
            }
        }
        out.push('\n');
    }
    out
}

fn render_day(day: &DayCell, today: NaiveDate) -> String {
    let marker = if day.is_today(today) { " (today)" } else { "" };
    let mut out = format!("{}{marker}\n", day.date.format("%a %Y-%m-%d"));
    for exam in &day.exams {
        out.push_str(&format!("  [exam]    {} ({})\n", exam.subject, exam.difficulty));
    }
    for entry in &day.sessions {
        let done = if entry.session.completed { "x" } else { " " };
        out.push_str(&format!(
            "  [study]   [{done}] {}: {} ({}m)\n",
            entry.exam_subject, entry.session.topic, entry.session.duration_minutes
        ));
    }
    for task in &day.tasks {
        let done = if task.completed { "x" } else { " " };
        out.push_str(&format!("  [task]    [{done}] {} ({})\n", task.title, task.priority));
    }
    if day.hidden > 0 {
        out.push_str(&format!("  +{} more\n", day.hidden));
    }
    if !day.has_items() {
        out.push_str("  -\n");
    }
    out
}
