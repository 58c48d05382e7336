//! Plain-text rendering of the dashboard, for terminals and debugging

use chrono::{NaiveDate, TimeZone};

use crate::binder::DayPreview;
use crate::event::{Event, EventType};
use crate::grid::{DayCell, DAY_NAMES};
use crate::shell::Tab;
use crate::traits::EventStore;
use crate::view::CalendarView;

/// Width of a day column, in characters
const CELL_WIDTH: usize = 12;

pub const HEADER_TITLE: &str = "My Homepage";


/// The page header, with the active tab between brackets
pub fn render_nav(active: Tab) -> String {
    let tabs: Vec<String> = Tab::ALL.iter()
        .map(|tab| match *tab == active {
            true => format!("[{}]", tab.label()),
            false => format!(" {} ", tab.label()),
        })
        .collect();
    format!("{}\n{}\n", HEADER_TITLE, tabs.join("  "))
}

fn type_marker(event_type: EventType) -> char {
    match event_type {
        EventType::Event => '*',
        EventType::Activity => '+',
        EventType::Note => '~',
    }
}

/// Cuts (or pads) a text so that it is exactly `width` characters long
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

/// The lines of a single grid cell (always `2 + MAX_PILLS_PER_DAY` lines)
fn cell_lines(cell: &DayCell, preview: &DayPreview<'_>, is_today: bool) -> Vec<String> {
    let mut lines = Vec::new();
    match cell.day() {
        None => {},
        Some(day) => {
            lines.push(match is_today {
                true => format!("[{}]", day),
                false => format!(" {}", day),
            });
            for event in preview.shown() {
                lines.push(format!("{} {}", type_marker(event.event_type()), event.title()));
            }
            if let Some(more) = preview.more_label() {
                lines.push(more);
            }
        },
    }
    lines.resize(2 + crate::binder::MAX_PILLS_PER_DAY, String::new());
    lines.into_iter().map(|line| fit(&line, CELL_WIDTH)).collect()
}

/// Renders the month of a calendar view as a grid.
///
/// `today` gets highlighted if it is part of the displayed month.
pub fn render_month<S, Tz>(view: &CalendarView<S, Tz>, today: Option<NaiveDate>) -> String
where
    S: EventStore,
    Tz: TimeZone,
{
    let mut out = String::new();
    out.push_str(&view.title());
    out.push('\n');

    let header: Vec<String> = DAY_NAMES.iter().map(|name| fit(name, CELL_WIDTH)).collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    let cells = view.grid();
    for week in cells.chunks(7) {
        let columns: Vec<Vec<String>> = week.iter()
            .map(|(cell, preview)| {
                let is_today = match (cell.day(), today) {
                    (Some(day), Some(today)) => view.is_day(day, today),
                    _ => false,
                };
                cell_lines(cell, preview, is_today)
            })
            .collect();

        let height = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        for row in 0..height {
            let line: Vec<&str> = columns.iter().map(|c| c[row].as_str()).collect();
            let line = line.join(" ");
            if line.trim().is_empty() == false {
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out.push_str(&"-".repeat(7 * CELL_WIDTH + 6));
        out.push('\n');
    }
    out
}

/// One entry of the "events on this day" list
pub fn render_event<Tz: TimeZone>(event: &Event, tz: &Tz) -> String {
    let time = event.date().with_timezone(tz).naive_local().format("%H:%M");
    let mut out = format!("{} {} ({} • {})  [id {}]\n", type_marker(event.event_type()), event.title(), event.event_type(), time, event.id());
    if let Some(description) = event.description() {
        out.push_str(&format!("    {}\n", description));
    }
    out
}

/// The modal, with the events of the selected day. Empty when no day is selected
pub fn render_modal<S, Tz>(view: &CalendarView<S, Tz>) -> String
where
    S: EventStore,
    Tz: TimeZone,
{
    let date = match view.selected_date() {
        None => return String::new(),
        Some(date) => date,
    };

    let mut out = format!("Add Event for {}\n", date.format("%-m/%-d/%Y"));
    out.push_str("Events on this day:\n");
    for event in view.selected_day_events() {
        out.push_str(&render_event(event, view.timezone()));
    }
    out
}
