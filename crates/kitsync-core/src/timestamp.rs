//! Timestamp normalization
//!
//! All edit timestamps are coerced to UTC instants before any comparison.
//! A timestamp without zone information is assumed to be UTC. Unparsable
//! input yields `None` — callers treat that as "no information", never as an
//! error that halts the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an optional edit-timestamp string into a canonical UTC instant.
pub fn parse(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // Zoneless ISO-8601 variants, assumed UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    // Bare dates read as midnight UTC.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Canonical serialized form of an instant, RFC 3339 with a `+00:00` offset.
pub fn format(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}
