//! Timestamp utilities

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Truncate a timestamp to the start of its UTC day
///
/// Used as the anchor for generated timestamps so that values derived from it
/// stay identical for the lifetime of a process (and across processes started
/// on the same day).
pub fn day_anchor(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::days(1)).unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_day_anchor_truncates_to_midnight() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        let anchor = day_anchor(at);
        assert_eq!(anchor, Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_anchor_is_idempotent() {
        let anchor = day_anchor(now());
        assert_eq!(day_anchor(anchor), anchor);
        assert_eq!(anchor.hour(), 0);
        assert_eq!(anchor.minute(), 0);
    }
}
