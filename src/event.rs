//! Calendar events, as stored in the remote table

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;


/// The identifier of an event. It is assigned by the store.
///
/// Hosted tables either use integer or UUID primary keys, so both are accepted when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId {
    content: String,
}

impl EventId {
    /// Generate a random EventId.
    pub fn random() -> Self {
        Self { content: uuid::Uuid::new_v4().to_hyphenated().to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for EventId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for EventId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<i64> for EventId {
    fn from(number: i64) -> Self {
        Self { content: number.to_string() }
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<EventId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(content) => EventId::from(content),
            RawId::Number(number) => EventId::from(number),
        })
    }
}



/// The kind of an event. This only changes the way it is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Event,
    Activity,
    Note,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Event, EventType::Activity, EventType::Note];

    /// The value used on the wire and in CSS class names
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Event => "event",
            EventType::Activity => "activity",
            EventType::Note => "note",
        }
    }

    /// The label shown in the type selector of the event form
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Event => "Event",
            EventType::Activity => "Activity",
            EventType::Note => "Note",
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Event
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown event type {0:?} (expected event, activity or note)")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" => Ok(EventType::Event),
            "activity" => Ok(EventType::Activity),
            "note" => Ok(EventType::Note),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}



/// An event that has not been stored yet, i.e. the payload of an insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
}

impl NewEvent {
    pub fn new<T: ToString>(title: T, event_type: EventType, date: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            event_type,
            description: None,
            date,
        }
    }

    pub fn with_description<T: ToString>(mut self, description: T) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Turn this payload into a stored event, once the store has assigned it an id
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            event_type: self.event_type,
            description: self.description,
            date: self.date,
        }
    }
}


/// A calendar event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    #[serde(rename = "type", default)]
    event_type: EventType,
    #[serde(default)]
    description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    date: DateTime<Utc>,
}

impl Event {
    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The description, if it is not empty
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| d.is_empty() == false)
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}


/// Timestamps are written as RFC 3339 strings, but `timestamp` (without time zone) columns
/// are returned without any offset. These are considered to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => {
            let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
                .map_err(|_| rfc_err)?;
            Ok(Utc.from_utc_datetime(&naive))
        }
    }
}
