//! Aggregated results of one sync run.

use crate::error::RemoteError;
use crate::reconcile::TargetEmails;
use crate::update::UpdateOutcome;
use crate::window::TimeWindow;

/// Counts for a single target email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTally {
    pub email: String,
    pub already_present: usize,
    pub added: usize,
    pub failed: usize,
}

impl TargetTally {
    /// Events that were missing this email when the run started.
    pub fn needed(&self) -> usize {
        self.added + self.failed
    }
}

/// What happened for one (event, email) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub event_id: String,
    pub event_title: String,
    pub email: String,
    pub outcome: UpdateOutcome,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub window: TimeWindow,
    pub events_fetched: usize,
    pub classified: usize,
    /// Set when listing failed; the run then had nothing to work on.
    pub fetch_error: Option<RemoteError>,
    pub targets: Vec<TargetTally>,
    pub outcomes: Vec<PairOutcome>,
}

impl RunSummary {
    pub fn new(window: TimeWindow, targets: &TargetEmails) -> Self {
        RunSummary {
            window,
            events_fetched: 0,
            classified: 0,
            fetch_error: None,
            targets: targets
                .iter()
                .map(|email| TargetTally {
                    email: email.to_string(),
                    ..Default::default()
                })
                .collect(),
            outcomes: Vec::new(),
        }
    }

    pub fn tally(&self, email: &str) -> Option<&TargetTally> {
        self.targets.iter().find(|t| t.email == email)
    }

    pub(crate) fn count_present(&mut self, email: &str) {
        if let Some(tally) = self.targets.iter_mut().find(|t| t.email == email) {
            tally.already_present += 1;
        }
    }

    pub(crate) fn record(&mut self, outcome: PairOutcome) {
        if let Some(tally) = self.targets.iter_mut().find(|t| t.email == outcome.email) {
            match outcome.outcome {
                UpdateOutcome::AlreadyPresent => tally.already_present += 1,
                UpdateOutcome::Added => tally.added += 1,
                UpdateOutcome::Failed(_) => tally.failed += 1,
            }
        }
        self.outcomes.push(outcome);
    }

    /// Successful writes across all targets.
    pub fn added(&self) -> usize {
        self.targets.iter().map(|t| t.added).sum()
    }

    pub fn failed(&self) -> usize {
        self.targets.iter().map(|t| t.failed).sum()
    }

    /// The fetch succeeded and every classified event already had every target.
    pub fn nothing_to_do(&self) -> bool {
        self.fetch_error.is_none() && self.targets.iter().all(|t| t.needed() == 0)
    }
}
