//! ISO 8601 timestamp parsing.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};


/// Parse an ISO 8601 timestamp into epoch seconds.
///
/// Fractional seconds are truncated and a trailing `Z` is read as UTC. A
/// timestamp without an offset is local time. Empty, `"null"` and
/// unparseable input all yield `None`.
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.trim();
    if ts.is_empty() || ts == "null" {
        return None;
    }

    let normalized = strip_fraction(ts).replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.timestamp() as f64);
    }

    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S").ok()?;
    let epoch = match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp(),
        // Skipped by a DST jump: read the wall clock with the zone's offset.
        None => {
            let offset = Local.offset_from_utc_datetime(&naive).local_minus_utc();
            naive.and_utc().timestamp() - i64::from(offset)
        }
    };
    Some(epoch as f64)
}


/// Drop the digits after the seconds' decimal point, keeping any offset.
fn strip_fraction(ts: &str) -> String {
    match ts.split_once('.') {
        Some((whole, rest)) => {
            let suffix = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            format!("{whole}{suffix}")
        }
        None => ts.to_string(),
    }
}
