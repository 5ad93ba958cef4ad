//! In-memory calendar for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use config::Config;

use crate::error::RemoteError;
use crate::event::{Attendee, CalendarId, Event};
use crate::service::{CalendarEntry, CalendarService};
use crate::settings::Settings;
use crate::window::TimeWindow;

/// Stores events, applies attendee patches, and records every write.
pub struct FakeCalendar {
    events: Mutex<Vec<Event>>,
    patches: Mutex<Vec<(String, Vec<Attendee>)>>,
    list_error: Option<RemoteError>,
    fail_pairs: Vec<(String, String)>,
}

impl FakeCalendar {
    pub fn new(events: Vec<Event>) -> Self {
        FakeCalendar {
            events: Mutex::new(events),
            patches: Mutex::new(Vec::new()),
            list_error: None,
            fail_pairs: Vec::new(),
        }
    }

    pub fn failing_list(error: RemoteError) -> Self {
        FakeCalendar {
            list_error: Some(error),
            ..FakeCalendar::new(Vec::new())
        }
    }

    /// Reject any write to `event_id` that would add `email`.
    pub fn fail_on(mut self, event_id: &str, email: &str) -> Self {
        self.fail_pairs.push((event_id.to_string(), email.to_string()));
        self
    }

    /// Every write as (event id, attendee emails).
    pub fn patches(&self) -> Vec<(String, Vec<String>)> {
        self.patches
            .lock()
            .unwrap()
            .iter()
            .map(|(id, attendees)| {
                (id.clone(), attendees.iter().map(|a| a.email.clone()).collect())
            })
            .collect()
    }

    pub fn last_submitted(&self, event_id: &str) -> Option<Vec<Attendee>> {
        self.patches
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| id == event_id)
            .map(|(_, attendees)| attendees.clone())
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn list_events(
        &self,
        _calendar: &CalendarId,
        _window: &TimeWindow,
    ) -> Result<Vec<Event>, RemoteError> {
        if let Some(err) = &self.list_error {
            return Err(err.clone());
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn patch_attendees(
        &self,
        _calendar: &CalendarId,
        event_id: &str,
        attendees: &[Attendee],
    ) -> Result<Event, RemoteError> {
        let rejected = self.fail_pairs.iter().any(|(id, email)| {
            id == event_id && attendees.iter().any(|a| &a.email == email)
        });
        if rejected {
            return Err(RemoteError::from_status(409, "The requested identifier already exists."));
        }

        self.patches
            .lock()
            .unwrap()
            .push((event_id.to_string(), attendees.to_vec()));

        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| RemoteError::from_status(404, "Not Found"))?;
        event.attendees = attendees.to_vec();
        Ok(event.clone())
    }

    async fn list_calendars(&self) -> Result<Vec<CalendarEntry>, RemoteError> {
        Ok(vec![CalendarEntry {
            id: "me@example.com".to_string(),
            name: "Me".to_string(),
            access_role: "owner".to_string(),
            primary: true,
        }])
    }
}

/// Settings for `me@example.com` with the given targets and the default
/// Calendly rules.
pub fn settings(targets: &[&str]) -> Settings {
    let mut builder = Config::builder()
        .set_override("primary_email", "me@example.com")
        .unwrap()
        .set_override("secondary_email", targets[0])
        .unwrap();
    if targets.len() > 1 {
        builder = builder
            .set_override("extra_target_emails", targets[1..].join(","))
            .unwrap();
    }
    Settings::from_config(builder.build().unwrap()).unwrap()
}
