//! Colored terminal output for sync results.

use guestsync_core::service::CalendarEntry;
use guestsync_core::summary::{RunSummary, TargetTally};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEntry {
    fn render(&self) -> String {
        let mut line = format!("  - {} ({}) {}", self.name, self.id, self.access_role.dimmed());
        if self.primary {
            line.push_str(" [PRIMARY]");
        }
        line
    }
}

impl Render for TargetTally {
    fn render(&self) -> String {
        let counts = format!("added to {}/{} events", self.added, self.needed());
        let counts = if self.failed > 0 {
            format!("{} ({} failed)", counts.yellow(), self.failed)
        } else {
            counts.green().to_string()
        };
        format!(
            "   {}: {}, already on {}",
            self.email, counts, self.already_present
        )
    }
}

pub fn calendar_list(calendars: &[CalendarEntry]) -> String {
    let mut lines = vec![format!("Found {} available calendars:", calendars.len())];
    lines.extend(calendars.iter().map(|c| c.render()));
    lines.join("\n")
}

/// Summary printed at the end of a sync run.
pub fn run_summary(summary: &RunSummary, provider: &str) -> String {
    let mut lines = vec![format!(
        "Scanned {} events from {} to {}",
        summary.events_fetched,
        summary.window.start_rfc3339(),
        summary.window.end_rfc3339()
    )];

    if let Some(err) = &summary.fetch_error {
        lines.push(format!("{} {}", "Could not fetch events:".red(), err));
        return lines.join("\n");
    }

    lines.push(format!("Found {} {} events", summary.classified, provider));

    if summary.nothing_to_do() {
        lines.push(format!(
            "{}",
            "Nothing to do, every target is already a guest".green()
        ));
        return lines.join("\n");
    }

    for outcome in &summary.outcomes {
        if let Some(err) = outcome.outcome.error() {
            lines.push(format!(
                "   {} {} on '{}': {}",
                "✗".red(),
                outcome.email,
                outcome.event_title,
                err
            ));
        }
    }

    lines.extend(summary.targets.iter().map(|t| t.render()));
    lines.join("\n")
}
