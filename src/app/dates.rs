//! Sale date parsing
//!
//! The API renders dates as a day number, a month name and a year, with the
//! month either spelled out ("12 July 2021") or abbreviated ("12 Jul 2021").
//! Anything else is rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::errors::{ValidationError, ValidationResult};

/// Accepted date layouts, tried in order
const DATE_FORMATS: [&str; 2] = ["%d %B %Y", "%d %b %Y"];

/// Parse a date in either the long or the abbreviated month-name format
///
/// The day must have one or two digits and the year exactly four, with the
/// three parts separated by whitespace.
pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    let invalid = || ValidationError::Date {
        value: value.to_string(),
    };

    let normalized = normalize_date(value).ok_or_else(invalid)?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
        .ok_or_else(invalid)
}

/// Rebuild `value` as "day month year" if it has that shape
///
/// chrono's `%Y` takes any number of digits and its literal space also
/// matches no space at all, so the shape is checked here first.
fn normalize_date(value: &str) -> Option<String> {
    if value.trim() != value {
        return None;
    }

    let mut parts = value.split_whitespace();
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let day_ok = (1..=2).contains(&day.len()) && is_digits(day);
    let year_ok = year.len() == 4 && is_digits(year);
    let month_ok = !month.is_empty() && month.bytes().all(|b| b.is_ascii_alphabetic());

    (day_ok && month_ok && year_ok).then(|| format!("{} {} {}", day, month, year))
}

/// Deserialize an optional date field; `null` and absent both mean no date known
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
