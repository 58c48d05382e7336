//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Name of the remote table that holds the calendar events (the `<table>` part of `/rest/v1/<table>`).
/// Feel free to override it when initing this library.
pub static EVENTS_TABLE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("calendar_events".to_string())));

/// Address of the third-party sensor dashboard shown in the Sensors tab.
/// Feel free to override it when initing this library.
pub static SENSOR_DASHBOARD_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://michael-phillips.github.io/sensor-dashboard/".to_string())));

/// Returns a copy of the current value of one of the settings above
///
/// A poisoned lock still holds a valid string, so its content is used anyway
pub fn current(setting: &Lazy<Arc<Mutex<String>>>) -> String {
    match setting.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Overrides one of the settings above
pub fn set(setting: &Lazy<Arc<Mutex<String>>>, value: &str) {
    match setting.lock() {
        Ok(mut current) => *current = value.to_string(),
        Err(poisoned) => *poisoned.into_inner() = value.to_string(),
    }
}
