//! Conversion between Google Calendar API types and guestsync types.

use anyhow::{Result, bail};
use guestsync_core::service::CalendarEntry;
use guestsync_core::{Attendee, Event, EventTime, ResponseStatus};
use serde::Serialize;

pub trait FromGoogle<T> {
    fn from_google(value: T) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle<google_calendar::types::Event> for Event {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        if event.id.is_empty() {
            bail!("Event has no id");
        }

        let start = event.start.as_ref().and_then(|start| {
            if let Some(dt) = start.date_time {
                Some(EventTime::DateTime(dt))
            } else {
                start.date.map(EventTime::Date)
            }
        });

        let organizer = event
            .organizer
            .as_ref()
            .map(|o| o.email.clone())
            .filter(|email| !email.is_empty());

        let source_title = event
            .source
            .as_ref()
            .map(|s| s.title.clone())
            .filter(|title| !title.is_empty());

        let attendees = event
            .attendees
            .iter()
            .map(|a| Attendee {
                email: a.email.clone(),
                name: non_empty(&a.display_name),
                response_status: ResponseStatus::parse(&a.response_status),
                optional: a.optional,
                resource: a.resource,
                comment: non_empty(&a.comment),
                additional_guests: a.additional_guests,
            })
            .collect();

        Ok(Event {
            id: event.id,
            summary: non_empty(&event.summary),
            description: non_empty(&event.description),
            location: non_empty(&event.location),
            organizer,
            source_title,
            start,
            attendees,
        })
    }
}

impl FromGoogle<google_calendar::types::CalendarListEntry> for CalendarEntry {
    fn from_google(cal: google_calendar::types::CalendarListEntry) -> Result<Self> {
        if cal.id.is_empty() {
            bail!("Calendar has no id");
        }

        Ok(CalendarEntry {
            name: if cal.summary.is_empty() {
                "(unnamed)".to_string()
            } else {
                cal.summary
            },
            id: cal.id,
            access_role: if cal.access_role.is_empty() {
                "unknown".to_string()
            } else {
                cal.access_role
            },
            primary: cal.primary,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// PATCH body that replaces the attendee list and nothing else.
#[derive(Debug, Serialize)]
pub struct AttendeesPatch<'a> {
    attendees: Vec<PatchAttendee<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PatchAttendee<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    response_status: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    resource: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "is_zero")]
    additional_guests: i64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl<'a> AttendeesPatch<'a> {
    pub fn new(attendees: &'a [Attendee]) -> Self {
        AttendeesPatch {
            attendees: attendees
                .iter()
                .map(|a| PatchAttendee {
                    email: &a.email,
                    display_name: a.name.as_deref(),
                    response_status: a.response_status.as_str(),
                    optional: a.optional,
                    resource: a.resource,
                    comment: a.comment.as_deref(),
                    additional_guests: a.additional_guests,
                })
                .collect(),
        }
    }
}
