//! Travel time helpers.
//!
//! Durations inside the router are fractional minutes (`f64`), since edge
//! times are derived from distance and speed. Timestamps are
//! `chrono::NaiveDateTime` in network-local time.

use chrono::{Duration, NaiveDateTime};

/// Timestamp format used in route output (ISO-8601 without offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Convert fractional minutes to a `chrono::Duration`, rounded to the
/// nearest millisecond.
///
/// Negative and non-finite inputs become zero.
///
/// # Examples
///
/// ```
/// use transit_router::domain::minutes_to_duration;
/// use chrono::Duration;
///
/// assert_eq!(minutes_to_duration(1.5), Duration::seconds(90));
/// assert_eq!(minutes_to_duration(-3.0), Duration::zero());
/// ```
pub fn minutes_to_duration(minutes: f64) -> Duration {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Advance a timestamp by fractional minutes.
pub fn advance(at: NaiveDateTime, minutes: f64) -> NaiveDateTime {
    at + minutes_to_duration(minutes)
}

/// Format a timestamp for route output.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn whole_minutes() {
        assert_eq!(minutes_to_duration(5.0), Duration::minutes(5));
    }

    #[test]
    fn fractional_minutes_round_to_millis() {
        // 8.6 minutes is 516 seconds
        assert_eq!(minutes_to_duration(8.6), Duration::seconds(516));
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(minutes_to_duration(f64::NAN), Duration::zero());
        assert_eq!(minutes_to_duration(f64::INFINITY), Duration::zero());
    }

    #[test]
    fn advance_crosses_midnight() {
        let t = advance(at(23, 50), 20.0);
        assert_eq!(t, at(0, 10) + Duration::days(1));
    }

    #[test]
    fn format() {
        assert_eq!(format_timestamp(at(10, 5)), "2025-01-01T10:05:00");
    }
}
