//! Binds loaded events to the day cells they fall on

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::event::Event;
use crate::grid::MonthRef;

/// A day cell shows at most this many events, the other ones are summed up in a "+N more" label
pub const MAX_PILLS_PER_DAY: usize = 3;


/// The `YYYY-MM-DD` representation of a date
pub fn date_string(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The calendar date an instant falls on, in the timezone `tz`
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Returns the events that fall on `day` of `month`, in the timezone `tz`.
///
/// `day` is `None` for a blank cell, which never has any event.
/// The order of `events` is kept.
pub fn events_for_day<'a, Tz: TimeZone>(events: &'a [Event], month: &MonthRef, day: Option<u32>, tz: &Tz) -> Vec<&'a Event> {
    let date = match day.and_then(|d| month.date_of(d)) {
        None => return Vec::new(),
        Some(date) => date,
    };
    let wanted = date_string(&date);

    events.iter()
        .filter(|event| date_string(&local_date(&event.date(), tz)) == wanted)
        .collect()
}


/// What a day cell displays of its events
#[derive(Clone, Debug, PartialEq)]
pub struct DayPreview<'a> {
    shown: Vec<&'a Event>,
    hidden: usize,
}

impl<'a> DayPreview<'a> {
    pub fn of(mut events: Vec<&'a Event>) -> Self {
        let hidden = events.len().saturating_sub(MAX_PILLS_PER_DAY);
        events.truncate(MAX_PILLS_PER_DAY);
        Self { shown: events, hidden }
    }

    /// The events that get a pill of their own
    pub fn shown(&self) -> &[&'a Event] {
        &self.shown
    }

    /// How many events are not shown
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// E.g. "+2 more", or `None` when every event is shown
    pub fn more_label(&self) -> Option<String> {
        match self.hidden {
            0 => None,
            n => Some(format!("+{} more", n)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    use crate::event::{EventId, EventType, NewEvent};

    fn event_at(title: &str, rfc3339: &str) -> Event {
        let date = DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc);
        NewEvent::new(title, EventType::Event, date).into_event(EventId::random())
    }

    #[test]
    fn event_belongs_to_a_single_day() {
        let events = vec![event_at("Market", "2024-11-16T09:00:00Z")];
        let nov = MonthRef::new(2024, 10).unwrap();

        for day in 1..=30 {
            let bound = events_for_day(&events, &nov, Some(day), &Utc);
            if day == 16 {
                assert_eq!(bound.len(), 1);
                assert_eq!(bound[0].title(), "Market");
            } else {
                assert!(bound.is_empty(), "unexpected event on day {}", day);
            }
        }

        let dec = MonthRef::new(2024, 11).unwrap();
        assert!(events_for_day(&events, &dec, Some(16), &Utc).is_empty());
    }

    #[test]
    fn binding_uses_the_local_date() {
        // 23:30 UTC is already the next day one hour east of Greenwich
        let events = vec![event_at("Late", "2024-11-16T23:30:00Z")];
        let nov = MonthRef::new(2024, 10).unwrap();
        let east = FixedOffset::east_opt(3600).unwrap();

        assert_eq!(events_for_day(&events, &nov, Some(16), &Utc).len(), 1);
        assert!(events_for_day(&events, &nov, Some(16), &east).is_empty());
        assert_eq!(events_for_day(&events, &nov, Some(17), &east).len(), 1);
    }

    #[test]
    fn blank_cells_have_no_events() {
        let events = vec![event_at("Market", "2024-11-16T09:00:00Z")];
        let nov = MonthRef::new(2024, 10).unwrap();
        assert!(events_for_day(&events, &nov, None, &Utc).is_empty());
        assert!(events_for_day(&events, &nov, Some(31), &Utc).is_empty());
    }

    #[test]
    fn preview_caps_to_three_pills() {
        let events: Vec<Event> = (0..5)
            .map(|i| event_at(&format!("event {}", i), &format!("2024-11-20T0{}:00:00Z", i)))
            .collect();
        let nov = MonthRef::new(2024, 10).unwrap();

        let preview = DayPreview::of(events_for_day(&events, &nov, Some(20), &Utc));
        assert_eq!(preview.shown().len(), 3);
        assert_eq!(preview.shown()[0].title(), "event 0");
        assert_eq!(preview.hidden(), 2);
        assert_eq!(preview.more_label().as_deref(), Some("+2 more"));
    }

    #[test]
    fn preview_without_overflow() {
        let events = vec![event_at("a", "2024-11-20T08:00:00Z"), event_at("b", "2024-11-20T09:00:00Z")];
        let preview = DayPreview::of(events.iter().collect());
        assert_eq!(preview.shown().len(), 2);
        assert_eq!(preview.more_label(), None);
        assert!(DayPreview::of(Vec::new()).is_empty());
    }
}
