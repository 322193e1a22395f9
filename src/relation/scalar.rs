//! Scalar helpers: temporal conversions, derived date/time columns and
//! numeric rounding.
//!
//! Dates are stored as Arrow `Date32` (days since the Unix epoch) and times
//! of day as `Time64(Microsecond)`.

use crate::error::{QueryError, Result};
use arrow::array::{Array, Date32Array, Float64Array, Int32Array, StringArray, Time64MicrosecondArray};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub const MICROS_PER_DAY: i64 = 24 * 60 * MICROS_PER_MINUTE;

pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn days_to_date(days: i32) -> Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
        .ok_or_else(|| QueryError::InvalidValue(format!("date out of range: {} days", days)))
}

pub fn time_to_micros(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * MICROS_PER_SECOND
        + (time.nanosecond() % 1_000_000_000) as i64 / 1_000
}

pub fn micros_to_time(micros: i64) -> Result<NaiveTime> {
    if !(0..MICROS_PER_DAY).contains(&micros) {
        return Err(QueryError::InvalidValue(format!(
            "time of day out of range: {} us",
            micros
        )));
    }
    let secs = (micros / MICROS_PER_SECOND) as u32;
    let nanos = ((micros % MICROS_PER_SECOND) * 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
        .ok_or_else(|| QueryError::InvalidValue(format!("invalid time of day: {} us", micros)))
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator * 100` rounded to two decimals; `None` when the
/// denominator is zero.
pub fn percentage(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(round2(numerator / denominator * 100.0))
    }
}

/// Minutes elapsed from `start` to `end`, both in microseconds since
/// midnight. An end earlier than the start crossed midnight.
pub fn elapsed_minutes(start: i64, end: i64) -> f64 {
    let mut diff = end - start;
    if diff < 0 {
        diff += MICROS_PER_DAY;
    }
    diff as f64 / MICROS_PER_MINUTE as f64
}

fn map_dates<T>(
    dates: &Date32Array,
    f: impl Fn(NaiveDate) -> T,
) -> Result<Vec<Option<T>>> {
    dates
        .iter()
        .map(|d| d.map(days_to_date).transpose().map(|d| d.map(&f)))
        .collect()
}

/// Calendar year of each date
pub fn year(dates: &Date32Array) -> Result<Int32Array> {
    Ok(Int32Array::from(map_dates(dates, |d| d.year())?))
}

/// Calendar month (1-12) of each date
pub fn month(dates: &Date32Array) -> Result<Int32Array> {
    Ok(Int32Array::from(map_dates(dates, |d| d.month() as i32)?))
}

/// `YYYY-MM` label of each date; sorts chronologically
pub fn year_month(dates: &Date32Array) -> Result<StringArray> {
    Ok(StringArray::from(map_dates(dates, |d| {
        format!("{:04}-{:02}", d.year(), d.month())
    })?))
}

/// English weekday name of each date
pub fn weekday_name(dates: &Date32Array) -> Result<StringArray> {
    Ok(StringArray::from(map_dates(dates, |d| {
        match d.weekday() {
            chrono::Weekday::Mon => "Monday",
            chrono::Weekday::Tue => "Tuesday",
            chrono::Weekday::Wed => "Wednesday",
            chrono::Weekday::Thu => "Thursday",
            chrono::Weekday::Fri => "Friday",
            chrono::Weekday::Sat => "Saturday",
            chrono::Weekday::Sun => "Sunday",
        }
        .to_string()
    })?))
}

/// Hour of day (0-23) of each time
pub fn hour(times: &Time64MicrosecondArray) -> Int32Array {
    times
        .iter()
        .map(|t| t.map(|micros| (micros.rem_euclid(MICROS_PER_DAY) / (60 * MICROS_PER_MINUTE)) as i32))
        .collect()
}

/// Round every value to two decimals, keeping nulls
pub fn round2_array(values: &Float64Array) -> Float64Array {
    values.iter().map(|v| v.map(round2)).collect()
}

/// Latest date in the array, ignoring nulls
pub fn max_date(dates: &Date32Array) -> Option<i32> {
    if dates.null_count() == dates.len() {
        return None;
    }
    dates.iter().flatten().max()
}
