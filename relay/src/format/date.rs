//! Human-readable timestamps, e.g. `Jan 1st, 2021 at 12:00:00 AM`.
//!
//! All dates are rendered in UTC.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    format!(
        "{} {}{}, {} at {}",
        dt.format("%b"),
        dt.day(),
        ordinal_suffix(dt.day()),
        dt.year(),
        dt.format("%I:%M:%S %p")
    )
}

/// Render an ISO-8601 timestamp from a payload.
///
/// Timestamps without an offset are taken as UTC. Anything unparseable is
/// returned verbatim.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| format_datetime(&dt))
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(0), "th");
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
        assert_eq!(ordinal_suffix(111), "th");
    }

    #[test]
    fn test_format_timestamp_midnight() {
        assert_eq!(
            format_timestamp("2021-01-01T00:00:00Z"),
            "Jan 1st, 2021 at 12:00:00 AM"
        );
    }

    #[test]
    fn test_format_timestamp_afternoon() {
        assert_eq!(
            format_timestamp("2020-11-22T15:04:05Z"),
            "Nov 22nd, 2020 at 03:04:05 PM"
        );
    }

    #[test]
    fn test_format_timestamp_converts_offset_to_utc() {
        assert_eq!(
            format_timestamp("2021-03-13T23:30:00-02:00"),
            "Mar 14th, 2021 at 01:30:00 AM"
        );
    }

    #[test]
    fn test_format_timestamp_fractional_seconds() {
        assert_eq!(
            format_timestamp("2019-08-19T20:58:37.391000Z"),
            "Aug 19th, 2019 at 08:58:37 PM"
        );
        assert_eq!(
            format_timestamp("2019-08-03T12:00:00.5"),
            "Aug 3rd, 2019 at 12:00:00 PM"
        );
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
