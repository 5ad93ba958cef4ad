//! Which target emails an event is still missing.

use crate::error::{GuestSyncError, GuestSyncResult};
use crate::event::{Event, same_email};

/// Ordered, non-empty list of addresses to ensure as guests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEmails(Vec<String>);

impl TargetEmails {
    /// Blank entries are dropped and later case-insensitive duplicates are
    /// ignored. Fails if nothing is left.
    pub fn new<I, S>(emails: I) -> GuestSyncResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets: Vec<String> = Vec::new();
        for email in emails {
            let email = email.as_ref().trim();
            if email.is_empty() || targets.iter().any(|t| same_email(t, email)) {
                continue;
            }
            targets.push(email.to_string());
        }

        if targets.is_empty() {
            return Err(GuestSyncError::Config(
                "at least one target email is required".to_string(),
            ));
        }

        Ok(TargetEmails(targets))
    }

    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Targets not yet on the event's attendee list, in target order.
pub fn missing_targets<'t>(event: &Event, targets: &'t TargetEmails) -> Vec<&'t str> {
    targets
        .iter()
        .filter(|email| !event.has_attendee(email))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Attendee, ResponseStatus};

    fn targets(emails: &[&str]) -> TargetEmails {
        TargetEmails::new(emails.iter().copied()).unwrap()
    }

    fn event_with(attendees: &[&str]) -> Event {
        Event {
            id: "evt".to_string(),
            attendees: attendees.iter().map(|e| Attendee::accepted(*e)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_present_target_is_excluded() {
        let event = event_with(&["guest@client.com", "b@x.com"]);
        let t = targets(&["a@x.com", "b@x.com", "c@x.com"]);
        assert_eq!(missing_targets(&event, &t), vec!["a@x.com", "c@x.com"]);
    }

    #[test]
    fn test_comparison_ignores_case() {
        let event = event_with(&["B@X.COM"]);
        let t = targets(&["b@x.com"]);
        assert!(missing_targets(&event, &t).is_empty());
    }

    #[test]
    fn test_declined_attendee_still_counts_as_present() {
        let mut event = event_with(&[]);
        event.attendees.push(Attendee {
            email: "a@x.com".to_string(),
            response_status: ResponseStatus::Declined,
            ..Default::default()
        });
        assert!(missing_targets(&event, &targets(&["a@x.com"])).is_empty());
    }

    #[test]
    fn test_no_attendees_means_all_missing_in_order() {
        let event = event_with(&[]);
        let t = targets(&["z@x.com", "a@x.com"]);
        assert_eq!(missing_targets(&event, &t), vec!["z@x.com", "a@x.com"]);
    }

    #[test]
    fn test_result_never_contains_an_attendee() {
        let attendees = ["A@x.com", "b@X.com", "c@x.com"];
        let event = event_with(&attendees);
        let t = targets(&["a@x.com", "d@x.com", "C@X.COM", "e@x.com"]);
        for email in missing_targets(&event, &t) {
            assert!(!attendees.iter().any(|a| same_email(a, email)));
        }
    }

    #[test]
    fn test_target_list_dedupes_and_requires_one_entry() {
        let t = targets(&[" a@x.com ", "", "A@X.com", "b@x.com"]);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec!["a@x.com", "b@x.com"]);
        assert_eq!(t.primary(), "a@x.com");
        assert_eq!(t.len(), 2);

        assert!(matches!(
            TargetEmails::new(["", "  "]),
            Err(GuestSyncError::Config(_))
        ));
    }
}
