//! Parse/format functions behind [`ValueType`](super::ValueType)

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseResult};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Pattern of date values
pub const DATE_PATTERN: &str = "%Y%m%d";
/// Pattern of time values
pub const TIME_PATTERN: &str = "%H%M%S";
/// Pattern of date-time values
pub const DATETIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// Title-case boolean vocabulary, false first
const BOOLEAN_CHOICES: [&str; 2] = ["False", "True"];

pub(super) fn parse_integer(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidValue(format!("Invalid IntegerValue: {:?}", raw)))
}

pub(super) fn parse_decimal(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|_| Error::InvalidValue(format!("Invalid DecimalValue: {:?}", raw)))
}

pub(super) fn parse_boolean(raw: &str) -> Result<bool> {
    match BOOLEAN_CHOICES.iter().position(|choice| *choice == raw) {
        Some(index) => Ok(index == 1),
        None => Err(Error::InvalidValue(format!("Invalid BooleanValue: {:?}", raw))),
    }
}

pub(super) fn format_boolean(value: bool) -> &'static str {
    BOOLEAN_CHOICES[usize::from(value)]
}

/// Date, time and date-time values share one strict pattern-driven parser
pub(super) trait Temporal: Sized {
    const PATTERN: &'static str;
    const NAME: &'static str;

    fn parse_pattern(raw: &str, pattern: &str) -> ParseResult<Self>;
}

impl Temporal for NaiveDate {
    const PATTERN: &'static str = DATE_PATTERN;
    const NAME: &'static str = "DateValue";

    fn parse_pattern(raw: &str, pattern: &str) -> ParseResult<Self> {
        NaiveDate::parse_from_str(raw, pattern)
    }
}

impl Temporal for NaiveTime {
    const PATTERN: &'static str = TIME_PATTERN;
    const NAME: &'static str = "TimeValue";

    fn parse_pattern(raw: &str, pattern: &str) -> ParseResult<Self> {
        NaiveTime::parse_from_str(raw, pattern)
    }
}

impl Temporal for NaiveDateTime {
    const PATTERN: &'static str = DATETIME_PATTERN;
    const NAME: &'static str = "DateTimeValue";

    fn parse_pattern(raw: &str, pattern: &str) -> ParseResult<Self> {
        NaiveDateTime::parse_from_str(raw, pattern)
    }
}

/// Blank text is an unset value, anything else must match the pattern
pub(super) fn parse_temporal<T: Temporal>(raw: &str) -> Result<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    T::parse_pattern(trimmed, T::PATTERN)
        .map(Some)
        .map_err(|e| Error::InvalidValue(format!("Invalid {}: {:?} ({})", T::NAME, raw, e)))
}
