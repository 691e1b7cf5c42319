//! Timestamp formatting utilities
//!
//! Records carry a wall-clock time with its UTC offset. Handlers render it as
//! RFC 3339 with milliseconds, the console shows a short local clock.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone};

/// Clock format used by the styled console.
pub const CONSOLE_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Current local time with its offset preserved.
#[must_use]
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Render a record time: `2025-01-08T10:30:45.123+02:00`, or `...Z` in UTC.
#[must_use]
pub fn format_record_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render the short local clock shown in front of console lines.
#[must_use]
pub fn console_clock(time: &DateTime<Local>) -> String {
    time.format(CONSOLE_CLOCK_FORMAT).to_string()
}
