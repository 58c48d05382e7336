//! The calendar page
//!
//! A [`CalendarView`] shows a month grid of the events of a store, and lets the user add events
//! to a day (through a modal form) or delete them.
//!
//! Every mutation and every month change reloads the whole month from the store: the view never
//! patches its list of events. This keeps it trivially consistent with the store, at the cost of
//! one query per action.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::binder::{self, DayPreview};
use crate::error::{CalendarError, StoreError};
use crate::event::{Event, EventId, EventType, NewEvent};
use crate::grid::{self, DateRange, DayCell, MonthRef};
use crate::traits::{EventStore, UserPrompt};

/// Notice shown when the store refuses a new event
pub const SAVE_FAILED_NOTICE: &str = "Failed to save event";
/// Question asked before deleting an event
pub const DELETE_QUESTION: &str = "Delete this event?";


/// Whether the modal form is open
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Only the grid is visible
    Browsing,
    /// The modal is open to add an event to this date
    Composing { date: NaiveDate },
}


/// The content of the "add event" form
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EventForm {
    pub title: String,
    pub event_type: EventType,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` (or `HH:MM:SS`). Empty means midnight
    pub time: String,
}

impl EventForm {
    /// Reset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Combines the date and the optional time fields into an instant, reading them as wall-clock time of `tz`
    pub fn timestamp<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, CalendarError> {
        let date_text = self.date.trim();
        if date_text.is_empty() {
            return Err(CalendarError::MissingField("date"));
        }
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|err| CalendarError::InvalidDate(format!("{:?}: {}", date_text, err)))?;

        let time_text = self.time.trim();
        let time = if time_text.is_empty() {
            NaiveTime::MIN
        } else {
            NaiveTime::parse_from_str(time_text, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(time_text, "%H:%M:%S"))
                .map_err(|err| CalendarError::InvalidDate(format!("{:?}: {}", time_text, err)))?
        };

        Ok(grid::local_to_utc(tz, &date.and_time(time)))
    }

    /// Checks the required fields, and builds the insert payload
    pub fn to_new_event<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewEvent, CalendarError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CalendarError::MissingField("title"));
        }
        let mut new_event = NewEvent::new(title, self.event_type, self.timestamp(tz)?);
        if self.description.trim().is_empty() == false {
            new_event = new_event.with_description(&self.description);
        }
        Ok(new_event)
    }
}


/// A load that has been started by [`CalendarView::begin_load`]
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTicket {
    generation: u64,
    month: MonthRef,
    range: DateRange,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 { self.generation }
    pub fn month(&self) -> MonthRef { self.month }
    /// The range that must be queried
    pub fn range(&self) -> &DateRange { &self.range }
}


/// The calendar page controller
pub struct CalendarView<S, Tz = Local>
where
    S: EventStore,
    Tz: TimeZone,
{
    store: Arc<S>,
    tz: Tz,

    month: MonthRef,
    events: Vec<Event>,
    mode: ViewMode,
    form: EventForm,

    /// Incremented on every load, so that late responses of older loads can be told apart
    generation: u64,
}

impl<S: EventStore> CalendarView<S, Local> {
    /// Create a view of the current month, in the local timezone. Nothing is loaded until [`Self::mount`] is called
    pub fn new(store: Arc<S>) -> Self {
        Self::with_timezone(store, Local)
    }
}

impl<S, Tz> CalendarView<S, Tz>
where
    S: EventStore,
    Tz: TimeZone,
{
    /// Create a view of the current month, for a given timezone
    pub fn with_timezone(store: Arc<S>, tz: Tz) -> Self {
        let month = MonthRef::today_in(&tz);
        Self {
            store, tz, month,
            events: Vec::new(),
            mode: ViewMode::Browsing,
            form: EventForm::default(),
            generation: 0,
        }
    }

    /// Start on another month than the current one
    pub fn starting_at(mut self, month: MonthRef) -> Self {
        self.month = month;
        self
    }

    /// Initial load, when the page is shown
    pub async fn mount(&mut self) -> Result<(), CalendarError> {
        log::debug!("Mounting the calendar on {}", self.month);
        self.reload().await
    }

    //
    // Loading
    //

    /// Starts loading the current month. The store must then be queried for [`LoadTicket::range`], and the result given to [`Self::finish_load`]
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            month: self.month,
            range: self.month.range_in(&self.tz),
        }
    }

    /// Applies the result of a load.
    ///
    /// Results of a load that has been superseded by a more recent one are discarded, so that
    /// only the last requested month ends up displayed. Returns whether the events were replaced.
    /// In case of error, the previous events are kept.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Event>, StoreError>) -> Result<bool, CalendarError> {
        if ticket.generation != self.generation {
            log::debug!("Discarding the events of {} (load #{} superseded by load #{})", ticket.month, ticket.generation, self.generation);
            return Ok(false);
        }

        match result {
            Err(err) => {
                log::error!("Error loading events: {}", err);
                Err(CalendarError::Load(err))
            },
            Ok(events) => {
                log::debug!("Loaded {} events for {}", events.len(), ticket.month);
                self.events = events;
                Ok(true)
            },
        }
    }

    /// Replaces the events with the ones the store currently has for this month
    pub async fn reload(&mut self) -> Result<(), CalendarError> {
        let ticket = self.begin_load();
        let result = self.store.query(ticket.range()).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    //
    // Navigation
    //

    pub async fn previous_month(&mut self) -> Result<(), CalendarError> {
        let month = self.month.previous();
        self.go_to(month).await
    }

    pub async fn next_month(&mut self) -> Result<(), CalendarError> {
        let month = self.month.next();
        self.go_to(month).await
    }

    pub async fn today(&mut self) -> Result<(), CalendarError> {
        let month = MonthRef::today_in(&self.tz);
        self.go_to(month).await
    }

    /// Shows another month. A load failure leaves the previous events displayed
    pub async fn go_to(&mut self, month: MonthRef) -> Result<(), CalendarError> {
        self.month = month;
        self.reload().await
    }

    //
    // Modal
    //

    /// Opens the modal for the clicked day, with the form's date set to it.
    ///
    /// Blank cells are ignored. Returns whether the modal has been opened
    pub fn click_day(&mut self, cell: DayCell) -> bool {
        let date = match cell.day().and_then(|day| self.month.date_of(day)) {
            None => return false,
            Some(date) => date,
        };

        self.form.date = binder::date_string(&date);
        self.mode = ViewMode::Composing { date };
        true
    }

    /// Closes the modal. The form keeps its content
    pub fn cancel(&mut self) {
        self.mode = ViewMode::Browsing;
    }

    /// A click outside of the modal closes it, just like [`Self::cancel`]
    pub fn backdrop_click(&mut self) {
        self.cancel();
    }

    /// Stores the event described by the form.
    ///
    /// On success, the modal is closed, the form cleared and the month reloaded.
    /// On failure, the user is notified and the modal stays open, so that the form can be submitted again.
    pub async fn submit(&mut self, prompt: &mut dyn UserPrompt) -> Result<Event, CalendarError> {
        let new_event = match self.form.to_new_event(&self.tz) {
            Ok(new_event) => new_event,
            Err(err) => {
                log::warn!("Invalid event form: {}", err);
                prompt.alert(&err.to_string());
                return Err(err);
            },
        };

        match self.store.insert(new_event).await {
            Err(err) => {
                log::error!("Error saving event: {}", err);
                prompt.alert(SAVE_FAILED_NOTICE);
                Err(CalendarError::Save(err))
            },
            Ok(stored) => {
                log::info!("Saved event {} ({})", stored.title(), stored.id());
                self.mode = ViewMode::Browsing;
                self.form.clear();
                // A failed reload is already logged, and the event has been saved anyway
                let _ = self.reload().await;
                Ok(stored)
            },
        }
    }

    /// Deletes an event, after the user has confirmed it.
    ///
    /// Returns `Ok(false)` if the user declined. A store failure is only logged
    pub async fn delete(&mut self, id: &EventId, prompt: &mut dyn UserPrompt) -> Result<bool, CalendarError> {
        if prompt.confirm(DELETE_QUESTION) == false {
            return Ok(false);
        }

        if let Err(err) = self.store.delete_by_id(id).await {
            log::error!("Error deleting event: {}", err);
            return Err(CalendarError::Delete(err));
        }
        log::info!("Deleted event {}", id);
        let _ = self.reload().await;
        Ok(true)
    }

    //
    // Accessors
    //

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn month(&self) -> MonthRef {
        self.month
    }

    /// E.g. "November 2024"
    pub fn title(&self) -> String {
        self.month.title()
    }

    /// The events of the displayed month, by ascending date
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.mode, ViewMode::Composing { .. })
    }

    /// The date the modal is open for
    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self.mode {
            ViewMode::Browsing => None,
            ViewMode::Composing { date } => Some(date),
        }
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EventForm {
        &mut self.form
    }

    /// The loaded events that fall on a day of the displayed month
    pub fn events_for(&self, day: Option<u32>) -> Vec<&Event> {
        binder::events_for_day(&self.events, &self.month, day, &self.tz)
    }

    /// The events listed in the modal
    pub fn selected_day_events(&self) -> Vec<&Event> {
        match self.selected_date() {
            None => Vec::new(),
            Some(date) => {
                let month = MonthRef::containing(&date);
                binder::events_for_day(&self.events, &month, Some(chrono::Datelike::day(&date)), &self.tz)
            },
        }
    }

    /// Every cell of the displayed month, with what it shows
    pub fn grid(&self) -> Vec<(DayCell, DayPreview<'_>)> {
        self.month.grid()
            .into_iter()
            .map(|cell| (cell, DayPreview::of(self.events_for(cell.day()))))
            .collect()
    }

    /// Whether this day of the displayed month is `today`
    pub fn is_day(&self, day: u32, today: NaiveDate) -> bool {
        self.month.date_of(day) == Some(today)
    }

    /// Whether this day of the displayed month is the current date
    pub fn is_today(&self, day: u32) -> bool {
        let today = binder::local_date(&Utc::now(), &self.tz);
        self.is_day(day, today)
    }
}
