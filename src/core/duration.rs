//! `HH:MM:SS.mmm` duration parsing.
//!
//! Components are summed as an exact integer count of microseconds and only
//! converted to floating-point seconds at the end, so `01:02:03.456` yields the
//! same `f64` as dividing 3 723 456 000 microseconds by 10^6. Each component
//! may carry surrounding whitespace (`"01:02:03.456 "` parses); anything else
//! that is not an unsigned decimal integer is rejected.

use crate::utils::error::RowError;

const MICROS_PER_MILLI: u128 = 1_000;
const MICROS_PER_SECOND: u128 = 1_000_000;
const MICROS_PER_MINUTE: u128 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: u128 = 60 * MICROS_PER_MINUTE;

fn invalid(value: &str, reason: impl Into<String>) -> RowError {
    RowError::InvalidDuration {
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_component(value: &str, part: &str, name: &str) -> Result<u128, RowError> {
    part.trim()
        .parse::<u64>()
        .map(u128::from)
        .map_err(|e| invalid(value, format!("{} {:?}: {}", name, part, e)))
}

fn split_exact<'a, const N: usize>(s: &'a str, sep: char) -> Option<[&'a str; N]> {
    let mut parts = s.split(sep);
    let mut out: [&'a str; N] = [""; N];
    for slot in out.iter_mut() {
        *slot = parts.next()?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(out),
    }
}

/// Parses `H+:MM:SS.mmm` into whole microseconds.
///
/// Minutes and seconds are not range-checked; `00:90:75.000` is 91m15s.
/// The millisecond group is an integer count, so `.5` is 5 ms. Every `u64`
/// component fits, so there is no upper bound on hours.
pub fn parse_micros(value: &str) -> Result<u128, RowError> {
    let [hours, minutes, rest] = split_exact::<3>(value, ':')
        .ok_or_else(|| invalid(value, "expected HH:MM:SS.mmm"))?;
    let [seconds, millis] =
        split_exact::<2>(rest, '.').ok_or_else(|| invalid(value, "expected SS.mmm seconds"))?;

    let hours = parse_component(value, hours, "hours")?;
    let minutes = parse_component(value, minutes, "minutes")?;
    let seconds = parse_component(value, seconds, "seconds")?;
    let millis = parse_component(value, millis, "milliseconds")?;

    Ok(hours * MICROS_PER_HOUR
        + minutes * MICROS_PER_MINUTE
        + seconds * MICROS_PER_SECOND
        + millis * MICROS_PER_MILLI)
}

/// Parses `H+:MM:SS.mmm` into floating-point seconds.
pub fn parse_duration(value: &str) -> Result<f64, RowError> {
    let micros = parse_micros(value)?;
    Ok(micros as f64 / MICROS_PER_SECOND as f64)
}
