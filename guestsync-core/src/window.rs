//! Time window for fetching events.

use chrono::{DateTime, Duration, Utc};

use crate::error::{GuestSyncError, GuestSyncResult};

pub const DEFAULT_DAYS_BACK: u32 = 7;
pub const DEFAULT_DAYS_FORWARD: u32 = 30;

/// Bounded range of instants to scan, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> GuestSyncResult<Self> {
        if start > end {
            return Err(GuestSyncError::Config(format!(
                "time window starts after it ends ({} > {})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(TimeWindow { start, end })
    }

    /// Window from `days_back` days before `now` to `days_forward` days after it.
    /// Unsigned offsets keep `start <= now <= end`.
    pub fn around(now: DateTime<Utc>, days_back: u32, days_forward: u32) -> Self {
        TimeWindow {
            start: now - Duration::days(i64::from(days_back)),
            end: now + Duration::days(i64::from(days_forward)),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_around_brackets_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::around(now, DEFAULT_DAYS_BACK, DEFAULT_DAYS_FORWARD);

        assert_eq!(window.start(), Utc.with_ymd_and_hms(2025, 5, 25, 12, 0, 0).unwrap());
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap());
        assert!(window.contains(now));
    }

    #[test]
    fn test_zero_day_window_is_a_single_instant() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::around(now, 0, 0);
        assert_eq!(window.start(), window.end());
        assert!(window.contains(now));
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let a = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(a, b).is_ok());
        assert!(matches!(
            TimeWindow::new(b, a),
            Err(GuestSyncError::Config(_))
        ));
    }

    #[test]
    fn test_rfc3339_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let window = TimeWindow::around(now, 1, 1);
        assert_eq!(window.start_rfc3339(), "2025-05-31T12:00:00+00:00");
        assert_eq!(window.end_rfc3339(), "2025-06-02T12:00:00+00:00");
    }
}
