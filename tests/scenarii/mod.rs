//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use home_dashboard::memory::MemoryStore;
use home_dashboard::mock_behaviour::MockBehaviour;
use home_dashboard::traits::UserPrompt;
use home_dashboard::{CalendarView, Event, EventId, EventType, MonthRef, NewEvent};


/// A [`UserPrompt`] that answers from a script, and remembers what it has been asked
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    pub questions: Vec<String>,
    pub alerts: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next calls to `confirm` will return these answers. Unscripted calls return `false`
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}


pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn november_2024() -> MonthRef {
    MonthRef::new(2024, 10).unwrap()
}

/// A few events around November 2024
pub fn autumn_events() -> Vec<Event> {
    vec![
        NewEvent::new("Halloween party", EventType::Event, at(2024, 10, 31, 19, 0)).into_event(EventId::from("oct-31")),
        NewEvent::new("Groceries", EventType::Activity, at(2024, 11, 2, 10, 30)).into_event(EventId::from("nov-2")),
        NewEvent::new("Call grandma", EventType::Note, at(2024, 11, 16, 18, 0))
            .with_description("about the holidays")
            .into_event(EventId::from("nov-16")),
        NewEvent::new("Soccer", EventType::Activity, at(2024, 11, 16, 9, 0)).into_event(EventId::from("nov-16-b")),
        NewEvent::new("Advent market", EventType::Event, at(2024, 12, 1, 14, 0)).into_event(EventId::from("dec-1")),
    ]
}

/// A store pre-populated with [`autumn_events`], with an optional failure behaviour
pub fn populated_store(behaviour: Option<MockBehaviour>) -> (Arc<MemoryStore>, Option<Arc<Mutex<MockBehaviour>>>) {
    let mut store = MemoryStore::with_events(autumn_events());
    let behaviour = behaviour.map(|b| Arc::new(Mutex::new(b)));
    store.set_mock_behaviour(behaviour.clone());
    (Arc::new(store), behaviour)
}

/// A mounted calendar showing November 2024, in UTC
pub async fn mounted_view(store: Arc<MemoryStore>) -> CalendarView<MemoryStore, Utc> {
    let mut view = CalendarView::with_timezone(store, Utc).starting_at(november_2024());
    view.mount().await.unwrap();
    view
}

pub fn titles(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.title()).collect()
}
