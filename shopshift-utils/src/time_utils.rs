//! Clock time and money helpers.
//!
//! All clock values are naive local times without a timezone. Shift hours
//! are counted on whole-hour boundaries: only the hour component of the
//! start and end time is taken into account.

use rust_decimal::Decimal;
use thiserror::Error;
use time::Time;
use time::macros::format_description;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockTimeError {
    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),
}

/// Expands `HH:MM` to `HH:MM:00`. Any other input is returned unchanged.
pub fn normalize_time(time: &str) -> String {
    if time.len() == 5 {
        format!("{time}:00")
    } else {
        time.to_string()
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(time: &str) -> Result<Time, ClockTimeError> {
    let normalized = normalize_time(time.trim());
    Time::parse(
        &normalized,
        format_description!("[hour]:[minute]:[second]"),
    )
    .map_err(|_| ClockTimeError::InvalidClockTime(time.to_string()))
}

/// Formats a clock time as `HH:MM`.
pub fn format_clock_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// End hour minus start hour. Minutes are ignored.
pub fn hours_between(start: Time, end: Time) -> Decimal {
    Decimal::from(i64::from(end.hour()) - i64::from(start.hour()))
}

pub fn cost(hours: Decimal, hourly_rate: Decimal) -> Decimal {
    hours * hourly_rate
}
