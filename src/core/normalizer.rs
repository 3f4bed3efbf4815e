use crate::core::duration::parse_duration;
use crate::domain::model::{InputRecord, NormalizedRow};
use crate::utils::error::RowError;
use chrono::{Datelike, DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::{OffsetComponents, Tz};

pub mod fields {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const ADDRESS: &str = "Address";
    pub const ZIP: &str = "ZIP";
    pub const FULL_NAME: &str = "FullName";
    pub const FOO_DURATION: &str = "FooDuration";
    pub const BAR_DURATION: &str = "BarDuration";
    pub const NOTES: &str = "Notes";

    pub const REQUIRED: [&str; 7] = [
        TIMESTAMP,
        ADDRESS,
        ZIP,
        FULL_NAME,
        FOO_DURATION,
        BAR_DURATION,
        NOTES,
    ];
}

pub const SOURCE_TZ: Tz = chrono_tz::US::Pacific;
pub const TARGET_TZ: Tz = chrono_tz::US::Eastern;
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %I:%M:%S %p";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
pub const ZIP_WIDTH: usize = 5;

/// Two-digit years 00-68 are 2000-2068 and 69-99 are 1969-1999. Anything `%y`
/// resolved to this year or later is moved back a century.
const CENTURY_PIVOT: i32 = 2069;

fn apply_century_pivot(naive: NaiveDateTime) -> Option<NaiveDateTime> {
    if naive.year() >= CENTURY_PIVOT {
        naive.with_year(naive.year() - 100)
    } else {
        Some(naive)
    }
}

fn is_standard_time(offset: &<Tz as TimeZone>::Offset) -> bool {
    offset.dst_offset() == TimeDelta::zero()
}

/// Attaches `tz` to a wall-clock time.
///
/// A time repeated by a fall-back transition resolves to standard time. A time
/// skipped by a spring-forward transition is read with the standard offset in
/// force before the gap, so `02:30` Pacific on a spring-forward day is
/// `10:30` UTC.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, latest) => {
            if is_standard_time(earliest.offset()) {
                Some(earliest)
            } else {
                Some(latest)
            }
        }
        LocalResult::None => {
            // Offsets one day either side bracket the transition that opened
            // the gap: `before` is the outgoing offset, `after` the incoming.
            let day = TimeDelta::days(1);
            let before = tz.offset_from_utc_datetime(&naive.checked_sub_signed(day)?);
            let after = tz.offset_from_utc_datetime(&naive.checked_add_signed(day)?);
            let offset = if is_standard_time(&before) { before } else { after };
            let shift = TimeDelta::seconds(i64::from(offset.fix().local_minus_utc()));
            let utc = naive.checked_sub_signed(shift)?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

/// Reads a Pacific `MM/DD/YY hh:mm:ss AM|PM` timestamp and renders the same
/// instant in Eastern time as ISO-8601 with its UTC offset.
pub fn normalize_timestamp(value: &str) -> Result<String, RowError> {
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        RowError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;
    let out_of_range = || RowError::InvalidTimestamp {
        value: value.to_string(),
        reason: "time is out of range".to_string(),
    };

    let naive = apply_century_pivot(naive).ok_or_else(out_of_range)?;
    let pacific = localize(SOURCE_TZ, naive).ok_or_else(out_of_range)?;

    Ok(pacific
        .with_timezone(&TARGET_TZ)
        .format(OUTPUT_TIMESTAMP_FORMAT)
        .to_string())
}

/// Left-pads with `0` up to five characters. Longer values pass through.
pub fn pad_zip(zip: &str) -> String {
    let len = zip.chars().count();
    if len >= ZIP_WIDTH {
        return zip.to_string();
    }
    let mut padded = "0".repeat(ZIP_WIDTH - len);
    padded.push_str(zip);
    padded
}

pub fn normalize_name(name: &str) -> String {
    name.to_uppercase()
}

/// Rounds to three decimals using the exact binary value of `value`, so ties
/// only occur for exactly representable halves.
pub fn round_millis(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}

/// Shortest round-trip text for a seconds value, always with a fractional part.
pub fn format_seconds(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

pub fn normalize_row(record: &InputRecord) -> Result<NormalizedRow, RowError> {
    let timestamp = normalize_timestamp(record.field(fields::TIMESTAMP)?)?;
    let address = record.field(fields::ADDRESS)?.to_string();
    let zip = pad_zip(record.field(fields::ZIP)?);
    let full_name = normalize_name(record.field(fields::FULL_NAME)?);
    let foo_duration = parse_duration(record.field(fields::FOO_DURATION)?)?;
    let bar_duration = parse_duration(record.field(fields::BAR_DURATION)?)?;
    let total_duration = round_millis(foo_duration + bar_duration);
    let notes = record.field(fields::NOTES)?.to_string();

    Ok(NormalizedRow {
        timestamp,
        address,
        zip,
        full_name,
        foo_duration,
        bar_duration,
        total_duration,
        notes,
    })
}
