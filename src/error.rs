//! Error types of this crate

use thiserror::Error;

/// Errors returned by an [`EventStore`](crate::traits::EventStore)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("The store did not return the inserted event")]
    EmptyInsert,

    #[error("{0}")]
    Mocked(String),
}

/// Errors surfaced by the [`CalendarView`](crate::view::CalendarView)
///
/// Whatever the underlying cause (network, validation or server-side rejection), every store
/// failure collapses into one of the first three variants.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Error loading events: {0}")]
    Load(#[source] StoreError),

    #[error("Error saving event: {0}")]
    Save(#[source] StoreError),

    #[error("Error deleting event: {0}")]
    Delete(#[source] StoreError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date or time: {0}")]
    InvalidDate(String),
}
