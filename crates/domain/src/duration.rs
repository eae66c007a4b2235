//! Duration — a day/hour/minute snooze span and its text codec.
//!
//! Users type durations free-form (`"1h30m"`, `"2.5d"`, `"45"`). Parsing
//! normalizes them into a canonical [`Duration`] whose hours are `0..=23`
//! and minutes `0..=59`; formatting turns a duration back into short
//! (`"1d 2h"`) or long (`"1 day, 2 hours"`) text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_HOUR: u64 = 60;
pub const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

const HOUR: u32 = 60;
const DAY: u32 = 24 * HOUR;

/// Quick-pick durations offered when no preset list is configured.
pub const DEFAULT_PRESETS: [&str; 4] = ["30m", "1h", "4h", "1d"];

/// Duration used when nothing has been snoozed yet.
pub const DEFAULT_DURATION: Duration = Duration::new(0, 0, 30);

/// A snooze span with minute granularity.
///
/// Fields are not range-checked; values built through
/// [`from_minutes`](Self::from_minutes) or [`parse`] are canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Duration {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl Duration {
    #[must_use]
    pub const fn new(days: u32, hours: u32, minutes: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Decompose a total number of minutes into canonical form.
    #[must_use]
    pub const fn from_minutes(total: u32) -> Self {
        let remainder = total % DAY;
        Self {
            days: total / DAY,
            hours: remainder / HOUR,
            minutes: remainder % HOUR,
        }
    }

    /// Total span in minutes. Non-canonical fields are summed as-is.
    #[must_use]
    pub fn to_minutes(&self) -> u64 {
        u64::from(self.days) * MINUTES_PER_DAY
            + u64::from(self.hours) * MINUTES_PER_HOUR
            + u64::from(self.minutes)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.to_minutes() == 0
    }

    /// The span as a [`chrono::TimeDelta`].
    #[must_use]
    pub fn to_time_delta(&self) -> chrono::TimeDelta {
        // u32 days * 1440 + 23h59m stays far below i64::MAX.
        chrono::TimeDelta::minutes(i64::try_from(self.to_minutes()).unwrap_or(i64::MAX))
    }

    /// Pluralized, comma-separated text such as `"1 day, 2 hours"`.
    ///
    /// Zero fields are omitted; an all-zero duration yields an empty string.
    #[must_use]
    pub fn format_long(&self) -> String {
        let parts = [
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
        ];
        parts
            .iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| {
                let plural = if *value == 1 { "" } else { "s" };
                format!("{value} {unit}{plural}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Short form: `"2d 3h 15m"`, zero fields omitted, `"0m"` when all zero.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [(self.days, 'd'), (self.hours, 'h'), (self.minutes, 'm')];
        let mut written = false;
        for (value, unit) in parts {
            if value == 0 {
                continue;
            }
            if written {
                f.write_str(" ")?;
            }
            write!(f, "{value}{unit}")?;
            written = true;
        }
        if !written {
            f.write_str("0m")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Why a duration text was rejected.
///
/// Callers keep their previous duration on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("duration is empty")]
    Empty,

    #[error("duration must not contain negative values")]
    Negative,

    #[error("no number or unit recognized in duration")]
    Unrecognized,

    #[error("duration must be at least one minute")]
    NotPositive,

    #[error("duration is too large")]
    OutOfRange,
}

/// Parse free-form duration text.
///
/// Whitespace is ignored and units are case-insensitive. Each of `d`, `h`
/// and `m` may appear once with an integer or decimal value; an `m`
/// directly followed by `i` is not read as minutes. Without any unit the
/// whole text must be a plain number of minutes. The total is rounded to
/// the nearest minute.
///
/// # Errors
///
/// Returns a [`ParseDurationError`] when the text is empty, holds a
/// negative value, contains no recognizable number, or rounds to zero.
pub fn parse(input: &str) -> Result<Duration, ParseDurationError> {
    let text: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if text.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    let days = find_unit(&text, 'd', None)?;
    let hours = find_unit(&text, 'h', None)?;
    let minutes = find_unit(&text, 'm', Some('i'))?;

    let total = if days.is_none() && hours.is_none() && minutes.is_none() {
        bare_minutes(&text)?
    } else {
        days.unwrap_or(0.0) * 1440.0 + hours.unwrap_or(0.0) * 60.0 + minutes.unwrap_or(0.0)
    };

    let rounded = total.round();
    if rounded.is_nan() || rounded < 1.0 {
        return Err(ParseDurationError::NotPositive);
    }
    if rounded > f64::from(u32::MAX) {
        return Err(ParseDurationError::OutOfRange);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = rounded as u32;
    Ok(Duration::from_minutes(total))
}

/// Whether [`parse`] accepts `input`.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    parse(input).is_ok()
}

/// Find the first `<number><unit>` token, scanning left to right.
///
/// `not_followed_by` rejects a unit letter directly followed by that char.
fn find_unit(
    text: &[char],
    unit: char,
    not_followed_by: Option<char>,
) -> Result<Option<f64>, ParseDurationError> {
    for start in 0..text.len() {
        let Some(end) = scan_number(text, start) else {
            continue;
        };
        if text.get(end) != Some(&unit) {
            continue;
        }
        if not_followed_by.is_some() && text.get(end + 1).copied() == not_followed_by {
            continue;
        }
        if start > 0 && text[start - 1] == '-' {
            return Err(ParseDurationError::Negative);
        }
        return Ok(Some(number_value(&text[start..end])));
    }
    Ok(None)
}

/// Interpret the whole text as a number of minutes.
fn bare_minutes(text: &[char]) -> Result<f64, ParseDurationError> {
    let (negative, digits) = match text.split_first() {
        Some(('-', rest)) => (true, rest),
        _ => (false, text),
    };
    match scan_number(digits, 0) {
        Some(end) if end == digits.len() => {
            if negative {
                Err(ParseDurationError::Negative)
            } else {
                Ok(number_value(digits))
            }
        }
        _ => Err(ParseDurationError::Unrecognized),
    }
}

/// Match `digits` optionally followed by `.digits` at `start`; returns the end index.
fn scan_number(text: &[char], start: usize) -> Option<usize> {
    let int_end = skip_digits(text, start);
    if int_end == start {
        return None;
    }
    if text.get(int_end) == Some(&'.') {
        let frac_end = skip_digits(text, int_end + 1);
        if frac_end > int_end + 1 {
            return Some(frac_end);
        }
    }
    Some(int_end)
}

fn skip_digits(text: &[char], start: usize) -> usize {
    let mut index = start;
    while text.get(index).is_some_and(char::is_ascii_digit) {
        index += 1;
    }
    index
}

fn number_value(chars: &[char]) -> f64 {
    // Only ASCII digits and at most one dot reach here.
    chars
        .iter()
        .collect::<String>()
        .parse()
        .unwrap_or_default()
}
