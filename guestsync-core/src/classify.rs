//! Detection of events booked through an external scheduling service.
//!
//! Classification is driven by two lists of [`MatchRule`]s. Exclusion rules
//! are checked first and win outright; otherwise any inclusion rule marks the
//! event as externally scheduled. All matching is case-insensitive substring
//! containment, and a missing field reads as the empty string.

use std::fmt;

use crate::event::Event;
use crate::settings::ProviderSettings;

/// Event property a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Summary,
    Description,
    Location,
    OrganizerEmail,
    SourceTitle,
}

impl EventField {
    fn value<'a>(&self, event: &'a Event) -> &'a str {
        let value = match self {
            EventField::Summary => &event.summary,
            EventField::Description => &event.description,
            EventField::Location => &event.location,
            EventField::OrganizerEmail => &event.organizer,
            EventField::SourceTitle => &event.source_title,
        };
        value.as_deref().unwrap_or("")
    }

    fn label(&self) -> &'static str {
        match self {
            EventField::Summary => "summary",
            EventField::Description => "description",
            EventField::Location => "location",
            EventField::OrganizerEmail => "organizer email",
            EventField::SourceTitle => "source title",
        }
    }
}

/// "`field` contains `needle`", case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    field: EventField,
    needle: String,
}

impl MatchRule {
    pub fn new(field: EventField, needle: impl Into<String>) -> Self {
        MatchRule {
            field,
            needle: needle.into().trim().to_lowercase(),
        }
    }

    pub fn field(&self) -> EventField {
        self.field
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// An empty needle never matches.
    pub fn matches(&self, event: &Event) -> bool {
        !self.needle.is_empty() && self.field.value(event).to_lowercase().contains(&self.needle)
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} contains '{}'", self.field.label(), self.needle)
    }
}

/// Which rules fired for one event.
#[derive(Debug)]
pub struct Verdict<'a> {
    pub excluded_by: Option<&'a MatchRule>,
    pub matched: Vec<&'a MatchRule>,
}

impl Verdict<'_> {
    pub fn is_externally_scheduled(&self) -> bool {
        self.excluded_by.is_none() && !self.matched.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    exclusions: Vec<MatchRule>,
    inclusions: Vec<MatchRule>,
}

impl Classifier {
    pub fn new(exclusions: Vec<MatchRule>, inclusions: Vec<MatchRule>) -> Self {
        Classifier {
            exclusions,
            inclusions,
        }
    }

    /// Standard rule set for a scheduling provider known by `name` and `domain`,
    /// excluding events whose summary contains any of `exclude_summary_tokens`.
    pub fn for_provider(name: &str, domain: &str, exclude_summary_tokens: &[String]) -> Self {
        let exclusions = exclude_summary_tokens
            .iter()
            .map(|token| MatchRule::new(EventField::Summary, token.as_str()))
            .collect();

        let inclusions = vec![
            MatchRule::new(EventField::Description, domain),
            MatchRule::new(EventField::Location, domain),
            MatchRule::new(EventField::Summary, name),
            MatchRule::new(EventField::Description, name),
            MatchRule::new(EventField::OrganizerEmail, name),
            MatchRule::new(EventField::SourceTitle, name),
        ];

        Classifier::new(exclusions, inclusions)
    }

    pub fn from_settings(provider: &ProviderSettings) -> Self {
        Classifier::for_provider(
            &provider.name,
            &provider.domain,
            &provider.exclude_summary_tokens,
        )
    }

    pub fn is_externally_scheduled(&self, event: &Event) -> bool {
        if self.exclusions.iter().any(|rule| rule.matches(event)) {
            return false;
        }
        self.inclusions.iter().any(|rule| rule.matches(event))
    }

    /// Evaluate every rule, for diagnostics.
    pub fn explain(&self, event: &Event) -> Verdict<'_> {
        let excluded_by = self.exclusions.iter().find(|rule| rule.matches(event));
        let matched = if excluded_by.is_some() {
            Vec::new()
        } else {
            self.inclusions
                .iter()
                .filter(|rule| rule.matches(event))
                .collect()
        };

        Verdict {
            excluded_by,
            matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::for_provider("provider", "provider.com", &["buffer".to_string()])
    }

    fn event(summary: &str) -> Event {
        Event {
            id: "evt".to_string(),
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_domain_in_description_is_scheduled() {
        let mut e = event("Coffee chat");
        e.description = Some("Book time: https://provider.com/x".to_string());
        assert!(classifier().is_externally_scheduled(&e));
    }

    #[test]
    fn test_buffer_summary_is_excluded_despite_name_match() {
        let e = event("provider Buffer");
        assert!(!classifier().is_externally_scheduled(&e));
    }

    #[test]
    fn test_buffer_exclusion_wins_over_every_signal() {
        let e = Event {
            id: "evt".to_string(),
            summary: Some("BUFFER before call".to_string()),
            description: Some("https://provider.com/abc".to_string()),
            location: Some("provider.com".to_string()),
            organizer: Some("no-reply@provider.com".to_string()),
            source_title: Some("Provider".to_string()),
            ..Default::default()
        };
        let c = classifier();
        assert!(!c.is_externally_scheduled(&e));

        let verdict = c.explain(&e);
        assert!(verdict.excluded_by.is_some());
        assert!(verdict.matched.is_empty());
        assert!(!verdict.is_externally_scheduled());
    }

    #[test]
    fn test_each_signal_on_its_own() {
        let c = classifier();

        let mut e = event("Chat");
        e.location = Some("https://PROVIDER.COM/meet".to_string());
        assert!(c.is_externally_scheduled(&e));

        let mut e = event("Chat");
        e.organizer = Some("events@Provider.io".to_string());
        assert!(c.is_externally_scheduled(&e));

        let mut e = event("Chat");
        e.source_title = Some("Scheduled via Provider".to_string());
        assert!(c.is_externally_scheduled(&e));

        let mut e = event("Chat");
        e.description = Some("Made with provider".to_string());
        assert!(c.is_externally_scheduled(&e));

        assert!(c.is_externally_scheduled(&event("Provider intro")));
    }

    #[test]
    fn test_plain_event_is_not_scheduled() {
        let mut e = event("Dentist");
        e.description = Some("Bring insurance card".to_string());
        e.location = Some("Main St".to_string());
        assert!(!classifier().is_externally_scheduled(&e));
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let e = Event {
            id: "evt".to_string(),
            ..Default::default()
        };
        assert!(!classifier().is_externally_scheduled(&e));
    }

    #[test]
    fn test_classification_is_stable() {
        let c = classifier();
        let mut e = event("Coffee chat");
        e.description = Some("provider.com".to_string());
        let first = c.is_externally_scheduled(&e);
        assert_eq!(first, c.is_externally_scheduled(&e));
        assert_eq!(first, c.explain(&e).is_externally_scheduled());
    }

    #[test]
    fn test_empty_needle_never_matches() {
        let c = Classifier::new(vec![], vec![MatchRule::new(EventField::Summary, "  ")]);
        assert!(!c.is_externally_scheduled(&event("anything")));
    }

    #[test]
    fn test_explain_lists_matching_rules() {
        let mut e = event("provider call");
        e.description = Some("see provider.com".to_string());
        let c = classifier();
        let verdict = c.explain(&e);
        let rules: Vec<String> = verdict.matched.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            rules,
            vec![
                "description contains 'provider.com'",
                "summary contains 'provider'",
                "description contains 'provider'",
            ]
        );
    }
}
