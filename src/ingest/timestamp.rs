//! Lenient parsing of the period start time column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::types::RawValue;

/// Date-time layouts tried in order. Month-first dotted dates are the
/// NetAct export default, so they win over the day-first fallback.
static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m.%d.%Y %H:%M:%S",
    "%m.%d.%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m.%d.%Y", "%d.%m.%Y", "%m/%d/%Y"];

/// Converts a raw cell into a timestamp. Anything unparseable yields `None`.
pub fn parse_timestamp(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::Text(s) => parse_timestamp_str(s),
        _ => None,
    }
}

pub fn parse_timestamp_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
