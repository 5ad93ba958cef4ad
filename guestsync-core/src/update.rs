//! Per-event guest additions.
//!
//! An [`EventUpdater`] owns the authoritative attendee list for one event for
//! the duration of the update phase. Each addition submits that list plus the
//! new guest, and the list only grows once the service accepted the write.

use crate::error::{GuestSyncError, RemoteError};
use crate::event::{Attendee, CalendarId, Event, contains_email};
use crate::service::CalendarService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    AlreadyPresent,
    Added,
    Failed(RemoteError),
}

impl UpdateOutcome {
    /// The update error behind a `Failed` outcome.
    pub fn error(&self) -> Option<GuestSyncError> {
        match self {
            UpdateOutcome::Failed(err) => Some(GuestSyncError::RemoteUpdate(err.clone())),
            _ => None,
        }
    }
}

pub struct EventUpdater<'a, S: CalendarService + ?Sized> {
    service: &'a S,
    calendar: &'a CalendarId,
    event_id: &'a str,
    title: &'a str,
    attendees: Vec<Attendee>,
}

impl<'a, S: CalendarService + ?Sized> EventUpdater<'a, S> {
    pub fn new(service: &'a S, calendar: &'a CalendarId, event: &'a Event) -> Self {
        EventUpdater {
            service,
            calendar,
            event_id: &event.id,
            title: event.title(),
            attendees: event.attendees.clone(),
        }
    }

    /// Attendees as last written (or as fetched, before any write).
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    /// Add `email` as an accepted guest unless the working list already has it.
    pub async fn add_guest(&mut self, email: &str) -> UpdateOutcome {
        if contains_email(&self.attendees, email) {
            return UpdateOutcome::AlreadyPresent;
        }

        let mut candidate = self.attendees.clone();
        candidate.push(Attendee::accepted(email));

        match self
            .service
            .patch_attendees(self.calendar, self.event_id, &candidate)
            .await
        {
            Ok(_) => {
                tracing::info!(event = %self.title, %email, "added guest");
                self.attendees = candidate;
                UpdateOutcome::Added
            }
            Err(err) => {
                let outcome = UpdateOutcome::Failed(err);
                if let Some(error) = outcome.error() {
                    tracing::warn!(event = %self.title, %email, %error, "failed to add guest");
                }
                outcome
            }
        }
    }
}
