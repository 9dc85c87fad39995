use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use super::Timestamp;
use crate::error::{MediaSortError, Result};

/// Zone token some container muxers put in front of the date
const UTC_PREFIX: &str = "UTC ";

/// `2014-05-19T09:19:21+0200`: no separator inside the offset
static COMPACT_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{4}$").unwrap());

const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

static ISO_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
];

static ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a metadata timestamp.
///
/// The strict `±HHMM` form is tried before the permissive ISO form, which
/// would otherwise accept it with a different reading of the offset.
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    if text.is_empty() {
        return Err(MediaSortError::EmptyTimestamp);
    }

    let body = text.strip_prefix(UTC_PREFIX).unwrap_or(text);

    parse_compact_offset(body)
        .or_else(|| parse_iso(body))
        .ok_or_else(|| MediaSortError::UnsupportedTimestamp(text.to_string()))
}

fn parse_compact_offset(s: &str) -> Option<Timestamp> {
    if !COMPACT_OFFSET_RE.is_match(s) {
        return None;
    }
    let dt = DateTime::parse_from_str(s, COMPACT_OFFSET_FORMAT).ok()?;
    Some(Timestamp::new(dt.naive_local(), Some(*dt.offset())))
}

fn parse_iso(s: &str) -> Option<Timestamp> {
    let zulu;
    let s = match s.strip_suffix('Z') {
        Some(rest) => {
            zulu = format!("{}+00:00", rest);
            zulu.as_str()
        }
        None => s,
    };

    for format in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(Timestamp::new(dt.naive_local(), Some(*dt.offset())));
        }
    }

    for format in ISO_NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Timestamp::new(dt, None));
        }
    }

    // A bare date means midnight
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Timestamp::new(date.and_hms_opt(0, 0, 0)?, None))
}
