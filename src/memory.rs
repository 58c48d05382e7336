//! This module provides an in-process event store
//!
//! It behaves like the hosted table (range queries sorted by date, ids assigned on insert), so that it can stand for it in tests or when no server is configured.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{Event, EventId, NewEvent};
use crate::grid::DateRange;
use crate::mock_behaviour::MockBehaviour;
use crate::traits::EventStore;


/// An [`EventStore`] that keeps its events in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already contains these events
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            mock_behaviour: None,
        }
    }

    /// Make this store fail (or succeed) as described by `behaviour`
    pub fn set_mock_behaviour(&mut self, behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = behaviour;
    }

    /// Every event of this store, whatever its date
    pub fn all_events(&self) -> Vec<Event> {
        self.lock_events().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<Event>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check_behaviour<F>(&self, check: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), StoreError>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => match behaviour.lock() {
                Ok(mut b) => check(&mut *b),
                Err(poisoned) => check(&mut *poisoned.into_inner()),
            },
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn query(&self, range: &DateRange) -> Result<Vec<Event>, StoreError> {
        self.check_behaviour(MockBehaviour::can_query)?;

        let mut found: Vec<Event> = self.lock_events().iter()
            .filter(|event| range.contains(&event.date()))
            .cloned()
            .collect();
        // Stable, so that events with the same date keep their insertion order
        found.sort_by_key(|event| event.date());
        log::debug!("Memory store: {} events between {} and {}", found.len(), range.start, range.end);
        Ok(found)
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        self.check_behaviour(MockBehaviour::can_insert)?;

        let stored = event.into_event(EventId::random());
        log::debug!("Memory store: inserting {} ({})", stored.title(), stored.id());
        self.lock_events().push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: &EventId) -> Result<(), StoreError> {
        self.check_behaviour(MockBehaviour::can_delete)?;

        let mut events = self.lock_events();
        let count_before = events.len();
        events.retain(|event| event.id() != id);
        // Like the hosted table, deleting an unknown id is not an error
        if events.len() == count_before {
            log::debug!("Memory store: no event {} to delete", id);
        } else {
            log::debug!("Memory store: deleted {}", id);
        }
        Ok(())
    }
}
