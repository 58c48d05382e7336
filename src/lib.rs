//! This crate provides the logic of a small personal dashboard.
//!
//! The dashboard has three tabs (see the [`shell`] module): an embedded sensor dashboard, a calendar, and a meal menu.
//!
//! The calendar ([`view::CalendarView`]) displays a month grid (see [`grid`]), binds the events of that month to their days (see [`binder`]),
//! and lets the user add or delete events. \
//! Events are persisted in an [`EventStore`](traits::EventStore): usually a hosted table, reached with the [`client`] module.
//! The [`memory`] module provides an in-process store with the same behaviour, that can be used for tests or when no server is available.

pub mod traits;
pub mod error;
pub mod config;

pub mod event;
pub use event::{Event, EventId, EventType, NewEvent};
pub mod grid;
pub use grid::{DayCell, MonthRef};
pub mod binder;

pub mod client;
pub mod memory;
pub mod mock_behaviour;

pub mod view;
pub use view::CalendarView;
pub mod shell;
pub use shell::Dashboard;
pub mod render;
