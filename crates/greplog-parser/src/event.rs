//! Event line shape and timestamp resolution.
//!
//! A log line is an event only if it has the exact form
//! `HH:MM:SS.mmm SEVERITY message`. Lines carry a time of day only; the
//! calendar day comes from the file name or from the day the run started.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;

use crate::error::{ParserError, Result};
use crate::severity::Severity;

static EVENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}) (ERROR|WARN|INFO|TRACE) (.*)$")
        .expect("event line regex is valid")
});

// Greedy prefix so the last date in the name wins.
static FILE_NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("file name day regex is valid")
});

/// Date format used for day strings (`2023-05-01`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used by event lines (`01:02:03.456`).
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// A line that has the event shape but whose timestamp is not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLine<'a> {
    /// The `HH:MM:SS.mmm` prefix, verbatim.
    pub time_of_day: &'a str,
    pub severity: Severity,
    /// Everything after the severity and its trailing space. May be empty.
    pub message: &'a str,
}

/// A fully resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: &'a str,
}

impl<'a> EventLine<'a> {
    /// Match `line` against the event shape. Returns `None` for any other line.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = EVENT_LINE.captures(line)?;
        let time_of_day = caps.get(1)?.as_str();
        let severity = Severity::from_str(caps.get(2)?.as_str())?;
        let message = caps.get(3)?.as_str();
        Some(EventLine {
            time_of_day,
            severity,
            message,
        })
    }

    /// Attach the calendar `day` (`YYYY-MM-DD`) to produce a [`LogEvent`].
    pub fn resolve(&self, day: &str) -> Result<LogEvent<'a>> {
        Ok(LogEvent {
            timestamp: compose_timestamp(day, self.time_of_day)?,
            severity: self.severity,
            message: self.message,
        })
    }
}

/// Extract the last `YYYY-MM-DD` substring of a file name.
pub fn day_from_filename(name: &str) -> Option<&str> {
    FILE_NAME_DAY
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Combine a day string and a time-of-day string into a timestamp.
///
/// Both parts are parsed strictly: `2023-02-30`, `24:00:00.000` and the leap
/// second `23:59:60.000` are errors, not rolled over into the next day.
pub fn compose_timestamp(day: &str, time_of_day: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map_err(|_| ParserError::InvalidDate(day.to_string()))?;
    let time = NaiveTime::parse_from_str(time_of_day, TIME_FORMAT)
        .map_err(|_| ParserError::InvalidTime(time_of_day.to_string()))?;
    // chrono encodes `:60` as nanoseconds past one second.
    if time.nanosecond() >= 1_000_000_000 {
        return Err(ParserError::InvalidTime(time_of_day.to_string()));
    }
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_line() {
        let ev = EventLine::parse("01:02:03.456 ERROR disk full on /dev/sda").unwrap();
        assert_eq!(ev.time_of_day, "01:02:03.456");
        assert_eq!(ev.severity, Severity::Error);
        assert_eq!(ev.message, "disk full on /dev/sda");
    }

    #[test]
    fn parse_event_line_empty_message() {
        let ev = EventLine::parse("01:02:03.456 INFO ").unwrap();
        assert_eq!(ev.message, "");
    }

    #[test]
    fn reject_non_event_lines() {
        assert!(EventLine::parse("").is_none());
        assert!(EventLine::parse("java.lang.NullPointerException").is_none());
        assert!(EventLine::parse("\tat org.example.Main.run(Main.java:10)").is_none());
        // Missing milliseconds
        assert!(EventLine::parse("01:02:03 ERROR boom").is_none());
        // Unknown severity
        assert!(EventLine::parse("01:02:03.456 DEBUG boom").is_none());
        // Lower-case severity
        assert!(EventLine::parse("01:02:03.456 error boom").is_none());
        // Leading text
        assert!(EventLine::parse("x 01:02:03.456 ERROR boom").is_none());
        // Two spaces after the timestamp
        assert!(EventLine::parse("01:02:03.456  ERROR boom").is_none());
        // No message separator
        assert!(EventLine::parse("01:02:03.456 ERROR").is_none());
    }

    #[test]
    fn message_keeps_inner_whitespace() {
        let ev = EventLine::parse("10:00:00.000 WARN   padded  ").unwrap();
        assert_eq!(ev.message, "  padded  ");
    }

    #[test]
    fn day_from_filename_variants() {
        assert_eq!(day_from_filename("app-2023-05-01.log"), Some("2023-05-01"));
        assert_eq!(
            day_from_filename("/var/log/2022-01-01/app-2023-05-01.log"),
            Some("2023-05-01")
        );
        assert_eq!(day_from_filename("app.log"), None);
        assert_eq!(day_from_filename("app-2023-5-1.log"), None);
    }

    #[test]
    fn compose_valid_timestamp() {
        let ts = compose_timestamp("2023-05-01", "10:00:00.250").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 250_000_000);
    }

    #[test]
    fn compose_rejects_impossible_date() {
        let err = compose_timestamp("2023-02-30", "10:00:00.000").unwrap_err();
        assert!(matches!(err, ParserError::InvalidDate(d) if d == "2023-02-30"));
    }

    #[test]
    fn compose_rejects_impossible_time() {
        let err = compose_timestamp("2023-02-01", "25:00:00.000").unwrap_err();
        assert!(matches!(err, ParserError::InvalidTime(_)));
    }

    #[test]
    fn compose_rejects_leap_second() {
        let err = compose_timestamp("2016-12-31", "23:59:60.000").unwrap_err();
        assert!(matches!(err, ParserError::InvalidTime(t) if t == "23:59:60.000"));
    }

    #[test]
    fn resolve_uses_day() {
        let ev = EventLine::parse("23:59:59.999 TRACE tick").unwrap();
        let resolved = ev.resolve("2024-02-29").unwrap();
        assert_eq!(resolved.timestamp.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(resolved.severity, Severity::Trace);
        assert_eq!(resolved.message, "tick");
    }
}
