//! Instant parsing and formatting.
//!
//! Instants cross the boundary as RFC 3339 strings in UTC with second
//! precision (`2026-02-09T08:00:00Z`). `+00:00` is accepted as UTC. Other
//! offsets, fractional seconds and bare local timestamps are rejected.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::error::ReflowError;

/// Parses an RFC 3339 UTC instant with whole seconds.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ReflowError> {
    let invalid = |reason: String| ReflowError::InvalidInstant {
        value: value.to_string(),
        reason,
    };
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| invalid(e.to_string()))?;
    if parsed.offset().local_minus_utc() != 0 {
        return Err(invalid(format!("offset {} is not UTC", parsed.offset())));
    }
    if parsed.nanosecond() != 0 {
        return Err(invalid("fractional seconds are not supported".into()));
    }
    Ok(parsed.with_timezone(&Utc))
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Signed whole minutes from `from` to `to`, rounded to the nearest minute.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    ((to - from).num_seconds() as f64 / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_utc() {
        let t = parse_instant("2026-02-09T08:00:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_zero_offset_as_utc() {
        let t = parse_instant("2026-02-09T08:00:00+00:00").unwrap();
        assert_eq!(format_instant(t), "2026-02-09T08:00:00Z");
    }

    #[test]
    fn test_reject_non_utc_offset() {
        let err = parse_instant("2026-02-09T10:00:00+02:00").unwrap_err();
        assert!(matches!(err, ReflowError::InvalidInstant { ref reason, .. } if reason.contains("+02:00")));
    }

    #[test]
    fn test_reject_bare_timestamp() {
        assert!(matches!(
            parse_instant("2026-02-09T08:30:00"),
            Err(ReflowError::InvalidInstant { .. })
        ));
    }

    #[test]
    fn test_reject_fractional_seconds() {
        let err = parse_instant("2026-02-09T08:00:00.750Z").unwrap_err();
        assert!(matches!(err, ReflowError::InvalidInstant { ref reason, .. } if reason.contains("fractional")));
        assert!(parse_instant("2026-02-09T08:00:00.000Z").is_ok());
    }

    #[test]
    fn test_invalid_instant() {
        let err = parse_instant("next tuesday").unwrap_err();
        assert!(matches!(err, ReflowError::InvalidInstant { ref value, .. } if value == "next tuesday"));
    }

    #[test]
    fn test_minutes_between() {
        let a = parse_instant("2026-02-09T08:00:00Z").unwrap();
        let b = parse_instant("2026-02-09T10:30:00Z").unwrap();
        assert_eq!(minutes_between(a, b), 150);
        assert_eq!(minutes_between(b, a), -150);
        assert_eq!(minutes_between(a, a), 0);
    }
}
