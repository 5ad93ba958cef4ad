//! Seams to the outside world: the calendar API and the credential source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GuestSyncResult, RemoteError};
use crate::event::{Attendee, CalendarId, Event};
use crate::window::TimeWindow;

/// Remote calendar operations guestsync needs.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Concrete event instances in `window`, recurring series expanded,
    /// ascending by start time.
    async fn list_events(
        &self,
        calendar: &CalendarId,
        window: &TimeWindow,
    ) -> Result<Vec<Event>, RemoteError>;

    /// Replace the event's attendee list. Must not send any other field.
    async fn patch_attendees(
        &self,
        calendar: &CalendarId,
        event_id: &str,
        attendees: &[Attendee],
    ) -> Result<Event, RemoteError>;

    /// Calendars visible to the credential. Diagnostics only.
    async fn list_calendars(&self) -> Result<Vec<CalendarEntry>, RemoteError>;
}

/// A calendar from the user's calendar list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    pub name: String,
    pub access_role: String,
    pub primary: bool,
}

/// Bearer credential for the calendar API.
#[derive(Clone)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Obtain a usable credential, refreshing if needed.
    /// Failures are `GuestSyncError::Auth`.
    async fn credentials(&self) -> GuestSyncResult<Credential>;
}
