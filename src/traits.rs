use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{Event, EventId, NewEvent};
use crate::grid::DateRange;

/// A collection of events, usually a hosted database table.
///
/// This is the only source of truth: a view never keeps more than a snapshot of it, refreshed on every reload.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Returns the events whose date is within `range` (both bounds included), sorted by ascending date
    async fn query(&self, range: &DateRange) -> Result<Vec<Event>, StoreError>;

    /// Stores a new event, and returns it as stored (i.e. with the identifier assigned by the store)
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    /// Removes the event with this identifier
    async fn delete_by_id(&self, id: &EventId) -> Result<(), StoreError>;
}

/// Blocking dialogs shown to the user
pub trait UserPrompt {
    /// Ask a yes/no question. Returns whether the user agreed
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a failure notice, that the user has to acknowledge
    fn alert(&mut self, message: &str);
}
