//! Google Calendar implementation of `CalendarService`.
//!
//! Listing goes through the `google-calendar` client. Attendee updates are
//! sent as a hand-built PATCH so the request body contains the `attendees`
//! field and nothing else.

use std::fmt;

use anyhow::Context;
use async_trait::async_trait;
use google_calendar::{Client, ClientError};
use google_calendar::types::{MinAccessRole, OrderBy};
use guestsync_core::service::{CalendarEntry, CalendarService, Credential};
use guestsync_core::window::TimeWindow;
use guestsync_core::{Attendee, CalendarId, Event, RemoteError, RemoteErrorKind};
use reqwest::Url;

use crate::convert::{AttendeesPatch, FromGoogle};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub struct GoogleCalendar {
    client: Client,
    http: reqwest::Client,
    access_token: String,
    api_base: Url,
}

impl GoogleCalendar {
    pub fn new(credential: &Credential) -> anyhow::Result<Self> {
        // Token refresh is handled by the credential provider, so the API
        // client needs no OAuth app credentials of its own.
        let client = Client::new(
            String::new(),
            String::new(),
            String::new(),
            credential.access_token.clone(),
            String::new(),
        );

        Ok(GoogleCalendar {
            client,
            http: reqwest::Client::new(),
            access_token: credential.access_token.clone(),
            api_base: Url::parse(API_BASE).context("Invalid Google Calendar API base URL")?,
        })
    }

    fn event_url(&self, calendar: &CalendarId, event_id: &str) -> Result<Url, RemoteError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::new(RemoteErrorKind::Other, "API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(["calendars", calendar.as_str(), "events", event_id]);
        Ok(url)
    }
}

fn remote_error(err: anyhow::Error) -> RemoteError {
    RemoteError::new(RemoteErrorKind::Other, format!("{:#}", err))
}

/// Keep the HTTP status so callers can tell a missing or unreadable calendar
/// apart from other failures.
fn client_error(action: impl fmt::Display, err: ClientError) -> RemoteError {
    match err {
        ClientError::HttpError { status, error, .. } => RemoteError::from_status(
            status.as_u16(),
            format!("{}: {} {}", action, status, error.trim()),
        ),
        ClientError::ReqwestError(e) => {
            RemoteError::new(RemoteErrorKind::Transport, format!("{}: {}", action, e))
        }
        other => RemoteError::new(RemoteErrorKind::Other, format!("{}: {}", action, other)),
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn list_events(
        &self,
        calendar: &CalendarId,
        window: &TimeWindow,
    ) -> Result<Vec<Event>, RemoteError> {
        let time_min = window.start_rfc3339();
        let time_max = window.end_rfc3339();

        let response = self
            .client
            .events()
            .list_all(
                calendar.as_str(),
                "",                 // i_cal_uid
                0,                  // max_attendees
                OrderBy::StartTime, // order_by
                &[],                // private_extended_property
                "",                 // q (search query)
                &[],                // shared_extended_property
                false,              // show_deleted
                false,              // show_hidden_invitations
                true,               // single_events: expand recurring series into instances
                &time_max,
                &time_min,
                "", // time_zone
                "", // updated_min
            )
            .await
            .map_err(|e| client_error(format!("Failed to fetch events from {}", calendar), e))?;

        let mut events = Vec::new();
        for google_event in response.body {
            if google_event.status == "cancelled" {
                continue;
            }
            match Event::from_google(google_event) {
                Ok(event) => events.push(event),
                Err(err) => tracing::warn!(error = %err, "skipping malformed event"),
            }
        }

        tracing::debug!(count = events.len(), "fetched events");
        Ok(events)
    }

    async fn patch_attendees(
        &self,
        calendar: &CalendarId,
        event_id: &str,
        attendees: &[Attendee],
    ) -> Result<Event, RemoteError> {
        let url = self.event_url(calendar, event_id)?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "none")])
            .json(&AttendeesPatch::new(attendees))
            .send()
            .await
            .map_err(|e| RemoteError::new(RemoteErrorKind::Transport, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(
                status.as_u16(),
                format!("{}: {}", status, error_text.trim()),
            ));
        }

        let google_event: google_calendar::types::Event = response
            .json()
            .await
            .map_err(|e| RemoteError::new(RemoteErrorKind::Other, format!("Failed to parse updated event: {}", e)))?;

        Event::from_google(google_event).map_err(remote_error)
    }

    async fn list_calendars(&self) -> Result<Vec<CalendarEntry>, RemoteError> {
        let response = self
            .client
            .calendar_list()
            .list_all(MinAccessRole::default(), false, false)
            .await
            .map_err(|e| client_error("Failed to fetch calendars", e))?;

        Ok(response
            .body
            .into_iter()
            .filter_map(|cal| CalendarEntry::from_google(cal).ok())
            .collect())
    }
}
