//! Countdown text — remaining time until a snoozed automation resumes.
//!
//! Unlike [`Duration`](crate::duration::Duration) this is a display
//! decomposition with second precision, showing only the most significant
//! units.

use chrono::DateTime;

use crate::time::{Clock, Timestamp};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time from `now` until `target`, or `expired_label` once reached.
///
/// - at least a day left: `"2d 3h 15m"`
/// - at least an hour left: `"3h 15m 42s"`
/// - otherwise: `"15m 42s"`
#[must_use]
pub fn format_countdown_at(target: Timestamp, now: Timestamp, expired_label: &str) -> String {
    let remaining = (target - now).num_milliseconds();
    if remaining <= 0 {
        return expired_label.to_string();
    }

    let days = remaining / MS_PER_DAY;
    let hours = (remaining % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (remaining % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (remaining % MS_PER_MINUTE) / MS_PER_SECOND;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// [`format_countdown_at`] reading "now" from `clock`.
#[must_use]
pub fn format_countdown(target: Timestamp, clock: &impl Clock, expired_label: &str) -> String {
    format_countdown_at(target, clock.now(), expired_label)
}

/// Countdown for an RFC 3339 target as received from the host.
///
/// A target that cannot be parsed renders as `expired_label`.
#[must_use]
pub fn format_countdown_iso(target: &str, clock: &impl Clock, expired_label: &str) -> String {
    match DateTime::parse_from_rfc3339(target) {
        Ok(parsed) => format_countdown(parsed.to_utc(), clock, expired_label),
        Err(_) => expired_label.to_string(),
    }
}
