//! 时间工具函数 - 营业时区
//!
//! Timestamps are Unix millis; calendar questions are answered in the
//! operator's timezone.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use shared::types::Timestamp;

/// Operator timezone used when none is configured
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Bogota;

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// Calendar date of a timestamp in the given timezone
pub fn local_date(ts: Timestamp, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ts).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// Whether two timestamps fall on the same calendar day in `tz`
pub fn is_same_day(created_at: Timestamp, now: Timestamp, tz: Tz) -> bool {
    match (local_date(created_at, tz), local_date(now, tz)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bogota_millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        DEFAULT_TIMEZONE
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_same_day_uses_operator_timezone() {
        // 23:30 in Bogota is already the next day in UTC
        let late = bogota_millis(2026, 10, 19, 23, 30);
        let evening = bogota_millis(2026, 10, 19, 20, 0);
        assert!(is_same_day(late, evening, DEFAULT_TIMEZONE));
        assert!(!is_same_day(late, evening, chrono_tz::UTC));
    }

    #[test]
    fn test_different_days() {
        let yesterday = bogota_millis(2026, 10, 18, 12, 0);
        let today = bogota_millis(2026, 10, 19, 8, 0);
        assert!(!is_same_day(yesterday, today, DEFAULT_TIMEZONE));
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/Bogota"), Some(DEFAULT_TIMEZONE));
        assert_eq!(parse_timezone(" Europe/Madrid "), Some(chrono_tz::Europe::Madrid));
        assert_eq!(parse_timezone("Mars/Olympus"), None);
    }
}
