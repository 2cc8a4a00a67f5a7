//! Timestamp cell parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Epoch values above this magnitude are read as milliseconds.
const MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Parse a timestamp cell. Naive date-times are taken as UTC.
///
/// Accepted: RFC 3339, `%Y-%m-%d %H:%M:%S`, `%Y-%m-%dT%H:%M:%S`,
/// `%Y-%m-%d %H:%M`, `%Y-%m-%d`, and integral epoch seconds or milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    epoch(s)
}

fn epoch(s: &str) -> Option<DateTime<Utc>> {
    let value = match s.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                return None;
            }
            f as i64
        }
    };
    if value.abs() > MILLIS_CUTOFF {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan2() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_timestamp("2024-01-02T09:30:00Z"), Some(jan2()));
        assert_eq!(parse_timestamp("2024-01-02T14:30:00+05:00"), Some(jan2()));
        assert_eq!(parse_timestamp("2024-01-02 09:30:00"), Some(jan2()));
        assert_eq!(parse_timestamp("2024-01-02T09:30:00"), Some(jan2()));
        assert_eq!(parse_timestamp("2024-01-02 09:30"), Some(jan2()));
        assert_eq!(
            parse_timestamp("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_epoch_seconds_and_millis() {
        let secs = jan2().timestamp();
        assert_eq!(parse_timestamp(&secs.to_string()), Some(jan2()));
        assert_eq!(parse_timestamp(&(secs * 1000).to_string()), Some(jan2()));
        assert_eq!(parse_timestamp(&format!("{}.0", secs * 1000)), Some(jan2()));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("1.5"), None);
    }
}
