//! Coercions from raw JSON cell values.
//!
//! Filtering, sorting, measuring and display all read cells through these
//! helpers so that a value means the same thing everywhere.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::CellFormat;

/// Date-time layouts accepted in addition to RFC 3339.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Text form of a value; `None` for null.
///
/// Strings are returned verbatim, scalars through their JSON text and
/// structured values as compact JSON.
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Array(_) | Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

/// Numeric value; numeric strings count, anything else does not.
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Parse a date or date-time string, time of day defaulting to midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Date-time value. Integers are Unix epoch milliseconds.
pub fn value_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Calendar day of a value, time of day dropped.
pub fn value_day(value: &Value) -> Option<NaiveDate> {
    value_datetime(value).map(|dt| dt.date())
}

/// Display text of a cell under an optional column format.
///
/// Null and missing values display as an empty string. A format that does
/// not fit the value (a date pattern on a non-date, say) falls back to the
/// plain text form.
pub fn format_value(value: Option<&Value>, format: Option<&CellFormat>) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };
    let formatted = match format {
        Some(CellFormat::Number {
            decimals: Some(decimals),
        }) => value_number(value).map(|n| format!("{n:.prec$}", prec = *decimals)),
        Some(CellFormat::Date { pattern }) => value_datetime(value).and_then(|dt| {
            let mut out = String::new();
            write!(out, "{}", dt.format(pattern)).ok().map(|()| out)
        }),
        Some(CellFormat::Boolean { yes, no }) => value
            .as_bool()
            .map(|b| if b { yes.clone() } else { no.clone() }),
        Some(CellFormat::Text | CellFormat::Number { decimals: None }) | None => None,
    };
    formatted
        .or_else(|| value_text(value).map(Cow::into_owned))
        .unwrap_or_default()
}

/// Locale-style string ordering: case-insensitive first, lowercase before
/// uppercase on ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
