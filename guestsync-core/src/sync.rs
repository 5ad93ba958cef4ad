//! One guest-sync run: fetch → classify → reconcile → update → summarize.
//!
//! Every remote call is awaited before the next one starts. Fetch and update
//! failures never abort the run; they are recorded in the [`RunSummary`].

use chrono::{DateTime, Utc};

use crate::classify::Classifier;
use crate::error::{GuestSyncError, GuestSyncResult};
use crate::event::{CalendarId, Event};
use crate::reconcile::missing_targets;
use crate::service::CalendarService;
use crate::settings::Settings;
use crate::summary::{PairOutcome, RunSummary};
use crate::update::EventUpdater;
use crate::window::TimeWindow;

/// Fetch concrete event instances in `window`, ascending by start time.
///
/// The sort is stable, so events sharing a start keep the service's order.
pub async fn fetch_events<S: CalendarService + ?Sized>(
    service: &S,
    calendar: &CalendarId,
    window: &TimeWindow,
) -> GuestSyncResult<Vec<Event>> {
    let mut events = service
        .list_events(calendar, window)
        .await
        .map_err(GuestSyncError::Fetch)?;

    let listed = events.len();
    events.retain(|e| !e.id.is_empty());
    if events.len() < listed {
        tracing::debug!(dropped = listed - events.len(), "ignoring events without an id");
    }
    events.sort_by_key(Event::start_instant);

    Ok(events)
}

pub struct SyncRun<'a, S: CalendarService + ?Sized> {
    service: &'a S,
    settings: &'a Settings,
    classifier: Classifier,
}

impl<'a, S: CalendarService + ?Sized> SyncRun<'a, S> {
    pub fn new(service: &'a S, settings: &'a Settings) -> Self {
        SyncRun {
            service,
            settings,
            classifier: Classifier::from_settings(&settings.provider),
        }
    }

    /// Use a custom rule set instead of the one derived from settings.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub async fn run(&self, now: DateTime<Utc>) -> RunSummary {
        let settings = self.settings;
        let window = settings.window(now);
        let mut summary = RunSummary::new(window, &settings.targets);

        tracing::info!(
            calendar = %settings.calendar,
            from = %window.start_rfc3339(),
            to = %window.end_rfc3339(),
            "fetching events"
        );

        let events = match fetch_events(self.service, &settings.calendar, &window).await {
            Ok(events) => events,
            Err(GuestSyncError::Fetch(err)) => {
                if err.is_access_error() {
                    tracing::error!(calendar = %settings.calendar, error = %err, "calendar is not accessible");
                } else {
                    tracing::error!(error = %err, "failed to fetch events");
                }
                summary.fetch_error = Some(err);
                Vec::new()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch events");
                Vec::new()
            }
        };
        summary.events_fetched = events.len();

        let classified: Vec<&Event> = events
            .iter()
            .filter(|event| self.classify(event))
            .collect();
        summary.classified = classified.len();

        let mut work: Vec<(&Event, Vec<&str>)> = Vec::new();
        for event in classified {
            let missing = missing_targets(event, &settings.targets);
            for email in settings.targets.iter() {
                if !missing.contains(&email) {
                    summary.count_present(email);
                }
            }
            if !missing.is_empty() {
                work.push((event, missing));
            }
        }

        if work.is_empty() {
            tracing::info!(classified = summary.classified, "nothing to do");
            return summary;
        }

        for (event, missing) in work {
            let mut updater = EventUpdater::new(self.service, &settings.calendar, event);
            for email in missing {
                let outcome = updater.add_guest(email).await;
                summary.record(PairOutcome {
                    event_id: event.id.clone(),
                    event_title: event.title().to_string(),
                    email: email.to_string(),
                    outcome,
                });
            }
        }

        summary
    }

    fn classify(&self, event: &Event) -> bool {
        let verdict = self.classifier.explain(event);
        if let Some(rule) = verdict.excluded_by {
            tracing::debug!(event = %event.title(), %rule, "excluded");
        } else if verdict.matched.is_empty() {
            tracing::debug!(event = %event.title(), "no scheduler signals");
        } else {
            let rules: Vec<String> = verdict.matched.iter().map(|r| r.to_string()).collect();
            tracing::debug!(event = %event.title(), signals = ?rules, "scheduled externally");
        }
        verdict.is_externally_scheduled()
    }
}
