//! Lenient time normalisation.
//!
//! Reservation payloads carry departure times in whatever shape the caller
//! had at hand: a full timestamp, a bare `HH:MM[:SS]` clock string exported
//! from a spreadsheet, a date, or epoch milliseconds. [`parse`] turns all of
//! them into a [`TimePoint`] and never fails; input it cannot make sense of
//! becomes the reference instant `1970-01-01T00:00:00Z`.

use chrono::{DateTime, NaiveDate, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Date-only formats accepted by the generic parse, tried in order.
/// `MM/DD/YYYY` is the US ordering browsers use for slash dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A normalised point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(Timestamp);

impl TimePoint {
    /// The anchor used for clock-only input and as the fallback value.
    pub fn reference() -> Self {
        Self(Timestamp::default())
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn as_datetime(&self) -> Timestamp {
        self.0
    }

    pub fn is_reference(&self) -> bool {
        *self == Self::reference()
    }
}

impl Default for TimePoint {
    fn default() -> Self {
        Self::reference()
    }
}

impl From<Timestamp> for TimePoint {
    fn from(value: Timestamp) -> Self {
        Self(value)
    }
}

impl From<TimePoint> for Timestamp {
    fn from(value: TimePoint) -> Self {
        value.0
    }
}

/// Anything [`parse`] accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeInput<'a> {
    /// Already normalised; returned as is.
    Instant(TimePoint),
    /// A chrono timestamp; returned as is.
    DateTime(Timestamp),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Free-form text.
    Text(&'a str),
}

impl From<TimePoint> for TimeInput<'_> {
    fn from(value: TimePoint) -> Self {
        TimeInput::Instant(value)
    }
}

impl From<Timestamp> for TimeInput<'_> {
    fn from(value: Timestamp) -> Self {
        TimeInput::DateTime(value)
    }
}

impl From<i64> for TimeInput<'_> {
    fn from(value: i64) -> Self {
        TimeInput::EpochMillis(value)
    }
}

impl<'a> From<&'a str> for TimeInput<'a> {
    fn from(value: &'a str) -> Self {
        TimeInput::Text(value)
    }
}

impl<'a> From<&'a String> for TimeInput<'a> {
    fn from(value: &'a String) -> Self {
        TimeInput::Text(value.as_str())
    }
}

/// Normalise `input` into a [`TimePoint`].
///
/// Strings containing `:` always take the clock path: up to three
/// components (hours, minutes, seconds) are read as integers, anything
/// unreadable or missing counts as 0, and the result is applied to the
/// reference date. Values past their natural range roll over the way
/// calendar arithmetic does, so `"25:00"` is 01:00 on 1970-01-02.
///
/// Other strings go through a generic date parse; failure yields
/// [`TimePoint::reference`].
pub fn parse<'a>(input: impl Into<TimeInput<'a>>) -> TimePoint {
    match input.into() {
        TimeInput::Instant(point) => point,
        TimeInput::DateTime(dt) => TimePoint(dt),
        TimeInput::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
            .map(TimePoint)
            .unwrap_or_default(),
        TimeInput::Text(text) if text.contains(':') => parse_clock(text).unwrap_or_default(),
        TimeInput::Text(text) => parse_date(text).unwrap_or_default(),
    }
}

/// Apply `H[:M[:S]]` to the reference date. `None` only on overflow.
fn parse_clock(text: &str) -> Option<TimePoint> {
    let mut parts = text.split(':').map(clock_component);
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    let seconds = parts.next().unwrap_or(0);

    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;

    let instant = TimePoint::reference()
        .0
        .checked_add_signed(TimeDelta::try_seconds(total)?)?;
    Some(TimePoint(instant))
}

fn clock_component(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

fn parse_date(text: &str) -> Option<TimePoint> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| TimePoint(naive.and_utc()))
    })
}
