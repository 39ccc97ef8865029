//! Conditional-request negotiation over `If-Modified-Since`.
//!
//! Timestamps are compared at one-second resolution: both the resource's
//! modification time and the client's date are truncated to whole seconds
//! before comparing. HTTP dates carry no sub-second precision, so a served
//! timestamp echoed back must still compare equal.

use chrono::{DateTime, NaiveDateTime};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Outcome of negotiating a conditional request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Serve the body and advertise the resource's timestamp.
    Fresh,
    /// The client's copy is current: 304, body suppressed.
    NotModified,
}

/// Drop sub-second precision from a timestamp.
pub fn truncate_to_secs(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => UNIX_EPOCH + Duration::from_secs(d.as_secs()),
        // pre-epoch times stay as they are; HTTP dates never reach them
        Err(_) => time,
    }
}

/// Decide a conditional request from the resource's modification time and
/// the client's `If-Modified-Since` value.
///
/// An absent or unparseable client date always serves fresh.
pub fn negotiate(resource_modified: SystemTime, if_modified_since: Option<&str>) -> CacheDecision {
    let Some(client) = if_modified_since.and_then(parse_http_date) else {
        return CacheDecision::Fresh;
    };

    if truncate_to_secs(client) >= truncate_to_secs(resource_modified) {
        CacheDecision::NotModified
    } else {
        CacheDecision::Fresh
    }
}

/// Parse an IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// Out-of-range dates (including pre-epoch ones) parse to `None`; header
/// values come from untrusted clients and must never abort the request.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let rest = value.trim().strip_suffix("GMT")?.trim_end();

    // the leading weekday is decorative
    let rest = match rest.split_once(',') {
        Some((_, r)) => r.trim_start(),
        None => rest,
    };

    let naive = NaiveDateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S").ok()?;
    let secs = u64::try_from(naive.and_utc().timestamp()).ok()?;
    Some(UNIX_EPOCH + Duration::from_secs(secs))
}

/// Format a timestamp as an IMF-fixdate.
pub fn format_http_date(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .unwrap_or(0);
    let utc = DateTime::from_timestamp(secs, 0).unwrap_or_default();
    utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
