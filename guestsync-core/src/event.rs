//! Provider-neutral event types.
//!
//! Backends convert their API responses into these types. Everything except
//! the attendee list is read-only for guestsync.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the calendar to read and patch ("primary" or an email address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        CalendarId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single concrete calendar event (recurring series arrive expanded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Organizer email address
    pub organizer: Option<String>,
    /// Title of the application that created the event, if it reported one
    pub source_title: Option<String>,
    pub start: Option<EventTime>,
    pub attendees: Vec<Attendee>,
}

impl Event {
    /// Summary for display, with a placeholder for untitled events.
    pub fn title(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "(No title)",
        }
    }

    pub fn has_attendee(&self, email: &str) -> bool {
        contains_email(&self.attendees, email)
    }

    /// Start instant used for ordering. All-day events sort at midnight UTC.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.as_ref().map(EventTime::instant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// An event attendee.
///
/// The writable attendee properties are carried so that submitting the full
/// list back leaves existing guests exactly as they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub name: Option<String>,
    pub response_status: ResponseStatus,
    pub optional: bool,
    pub resource: bool,
    pub comment: Option<String>,
    pub additional_guests: i64,
}

impl Attendee {
    /// A new guest who has already accepted.
    pub fn accepted(email: impl Into<String>) -> Self {
        Attendee {
            email: email.into(),
            response_status: ResponseStatus::Accepted,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    #[default]
    NeedsAction,
}

impl ResponseStatus {
    /// Parse the API's wire value. Unknown or empty values mean no response yet.
    pub fn parse(value: &str) -> Self {
        match value {
            "accepted" => ResponseStatus::Accepted,
            "declined" => ResponseStatus::Declined,
            "tentative" => ResponseStatus::Tentative,
            _ => ResponseStatus::NeedsAction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Accepted => "accepted",
            ResponseStatus::Declined => "declined",
            ResponseStatus::Tentative => "tentative",
            ResponseStatus::NeedsAction => "needsAction",
        }
    }
}

/// Case-insensitive email comparison.
pub fn same_email(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub fn contains_email(attendees: &[Attendee], email: &str) -> bool {
    attendees.iter().any(|a| same_email(&a.email, email))
}
