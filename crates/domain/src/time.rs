//! Timestamps for record creation.

use chrono::{DateTime, SecondsFormat, Utc};

pub use chrono::TimeDelta;

/// UTC timestamp stored on services and geoapps.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp as RFC 3339 with microsecond precision.
///
/// The fixed precision keeps lexical order equal to chronological order,
/// which the storage layer relies on for `ORDER BY created DESC`.
#[must_use]
pub fn to_rfc3339(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 string into a UTC timestamp.
///
/// # Errors
///
/// Returns the chrono parse error when `value` is not RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.to_utc())
}
