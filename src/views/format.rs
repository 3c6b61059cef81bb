//! Timestamp formatting for display

use chrono::{DateTime, Local, TimeZone};

/// `HH:MM` of a message timestamp in local time
///
/// Empty input gives an empty string; anything unparseable is shown as is.
pub fn format_time(value: &str) -> String {
    format_in(value, &Local, "%H:%M")
}

/// Full local date and time, used for the registration date
pub fn format_date_time(value: &str) -> String {
    format_in(value, &Local, "%Y-%m-%d %H:%M:%S")
}

pub(crate) fn format_in<Tz>(value: &str, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if value.is_empty() {
        return String::new();
    }

    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(tz).format(pattern).to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_in_utc() {
        assert_eq!(format_in("2024-05-01T09:05:30Z", &Utc, "%H:%M"), "09:05");
        assert_eq!(
            format_in("2024-05-01T09:05:30.123456+00:00", &Utc, "%Y-%m-%d %H:%M:%S"),
            "2024-05-01 09:05:30"
        );
    }

    #[test]
    fn test_format_converts_offset() {
        let msk = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(format_in("2024-05-01T23:30:00Z", &msk, "%H:%M"), "02:30");
    }

    #[test]
    fn test_empty_and_unparseable() {
        assert_eq!(format_time(""), "");
        assert_eq!(format_time("yesterday"), "yesterday");
        assert_eq!(format_date_time("not a date"), "not a date");
    }
}
