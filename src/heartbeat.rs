//! Heartbeat timestamp parsing and formatting.
//!
//! Heartbeats are caller-supplied timestamps, not "now": clock skew between
//! a worker and the server is the worker's responsibility. Whatever offset
//! the caller sends is normalized to UTC before it is stored.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{CadenceError, Result};

/// Parse a heartbeat body into a UTC timestamp.
///
/// Accepts RFC 3339 (`2012-11-16T18:41:43Z`, with or without an offset) or
/// a bare `YYYY-MM-DDTHH:MM:SS`, which is taken as UTC. Empty or
/// unparseable input is a `BadRequest`.
pub fn parse(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CadenceError::BadRequest(
            "heartbeat must not be empty".to_string(),
        ));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    Err(CadenceError::BadRequest(format!(
        "heartbeat is not a valid timestamp: {raw}"
    )))
}

/// Format a timestamp the way heartbeats are reported: seconds precision,
/// trailing `Z`.
pub fn isotime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
