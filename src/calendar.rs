//! Calendar-aware decoding of CF numeric time values
//!
//! CF time variables store offsets from a reference date, e.g. `days since 1950-01-01`,
//! interpreted in the calendar named by the variable's `calendar` attribute. Model
//! calendars such as `360_day` contain dates (February 30th) that no Gregorian date
//! type can hold, so decoded values are plain [`CfDateTime`] fields rather than
//! `chrono` types. `chrono` is used for the Gregorian arithmetic only.

use crate::errors::{NcHelpersError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// Unit token of a CF time units string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// Length of one unit in seconds
    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Days => 86_400.0,
            Self::Hours => 3_600.0,
            Self::Minutes => 60.0,
            Self::Seconds => 1.0,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "days" => Some(Self::Days),
            "hours" => Some(Self::Hours),
            "minutes" => Some(Self::Minutes),
            "seconds" => Some(Self::Seconds),
            _ => None,
        }
    }
}

/// A parsed `<unit> since <reference>` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub reference: CfDateTime,
}

/// Extracts the leading unit token of a CF time units string.
///
/// Only the `<unit> since` prefix is checked; the reference date is not parsed.
pub fn parse_unit(units: &str) -> Result<TimeUnit> {
    split_units(units).map(|(unit, _)| unit)
}

/// Parses a full CF time units string, including its reference date.
pub fn parse_units(units: &str) -> Result<TimeUnits> {
    let (unit, reference) = split_units(units)?;
    let reference = parse_reference(reference).ok_or_else(|| malformed(units))?;
    Ok(TimeUnits { unit, reference })
}

fn split_units(units: &str) -> Result<(TimeUnit, &str)> {
    let (token, rest) = units.split_once(" since").ok_or_else(|| malformed(units))?;
    let unit = TimeUnit::from_token(token).ok_or_else(|| malformed(units))?;
    Ok((unit, rest))
}

fn malformed(units: &str) -> NcHelpersError {
    NcHelpersError::MalformedUnits {
        units: units.to_string(),
    }
}

/// Parses `Y-M-D[( |T)h:m:s][Z| UTC]`
fn parse_reference(text: &str) -> Option<CfDateTime> {
    let text = text.trim();
    let text = text.strip_suffix("UTC").unwrap_or(text).trim_end();
    let text = text.strip_suffix('Z').unwrap_or(text);

    let (date, time) = match text.split_once(|c: char| c == 'T' || c.is_whitespace()) {
        Some((date, time)) => (date, time.trim()),
        None => (text, ""),
    };

    let mut ymd = date.splitn(3, '-');
    let year = ymd.next()?.trim().parse::<i32>().ok()?;
    let month = ymd.next()?.trim().parse::<u32>().ok()?;
    let day = ymd.next()?.trim().parse::<u32>().ok()?;

    // Anything after the clock time (e.g. a "+00:00" offset) is ignored
    let clock = time.split_whitespace().next().unwrap_or("");
    let (hour, minute, second) = if clock.is_empty() {
        (0, 0, 0)
    } else {
        let mut hms = clock.splitn(3, ':');
        let hour = hms.next()?.parse::<u32>().ok()?;
        let minute = hms.next().map_or(Some(0), |m| m.parse::<u32>().ok())?;
        let second = hms.next().map_or(Some(0.0), |s| s.parse::<f64>().ok())?;
        (hour, minute, second.round() as u32)
    };

    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    Some(CfDateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// A date and time in an arbitrary CF calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CfDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CfDateTime {
    /// Formats with a strftime-like pattern.
    ///
    /// Supported directives: `%Y %m %d %H %M %S %%`. Unknown directives are copied
    /// through unchanged.
    pub fn format(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('Y') => out.push_str(&format!("{:04}", self.year)),
                Some('m') => out.push_str(&format!("{:02}", self.month)),
                Some('d') => out.push_str(&format!("{:02}", self.day)),
                Some('H') => out.push_str(&format!("{:02}", self.hour)),
                Some('M') => out.push_str(&format!("{:02}", self.minute)),
                Some('S') => out.push_str(&format!("{:02}", self.second)),
                Some('%') => out.push('%'),
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        out
    }

    fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    /// `seconds_of_day` must lie in `0..86_400`
    fn from_date(year: i32, month: u32, day: u32, seconds_of_day: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour: (seconds_of_day / 3_600) as u32,
            minute: (seconds_of_day % 3_600 / 60) as u32,
            second: (seconds_of_day % 60) as u32,
        }
    }

    fn seconds_of_day(&self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

impl fmt::Display for CfDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// CF calendars with a decoding rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// `standard` and `gregorian`: Julian up to 1582-10-04, Gregorian from 1582-10-15
    Standard,
    /// `proleptic_gregorian`
    ProlepticGregorian,
    /// `julian`: a leap year every four years
    Julian,
    /// `noleap` and `365_day`
    NoLeap,
    /// `all_leap` and `366_day`
    AllLeap,
    /// `360_day`
    Day360,
}

const NOLEAP_MONTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const ALL_LEAP_MONTHS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAY360_MONTHS: [u32; 12] = [30; 12];

/// Julian day number of 0000-12-31 in the proleptic Gregorian calendar, i.e. the
/// offset between `chrono`'s day count from the common era and the Julian day number
const CE_DAY_OFFSET: i64 = 1_721_425;

/// Julian day number of 1582-10-15, the first Gregorian date of the `standard` calendar
const GREGORIAN_REFORM_DAY: i64 = 2_299_161;

impl FromStr for Calendar {
    type Err = NcHelpersError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Self::Standard),
            "proleptic_gregorian" => Ok(Self::ProlepticGregorian),
            "julian" => Ok(Self::Julian),
            "noleap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            _ => Err(NcHelpersError::UnsupportedCalendar {
                calendar: s.to_string(),
            }),
        }
    }
}

impl Calendar {
    /// Shifts `reference` by `offset` seconds in this calendar.
    ///
    /// Returns `None` if the reference is not a valid date of this calendar or the
    /// result is out of range.
    pub fn add_seconds(self, reference: &CfDateTime, offset: i64) -> Option<CfDateTime> {
        match self {
            Self::ProlepticGregorian => {
                let base = NaiveDate::from_ymd_opt(reference.year, reference.month, reference.day)?
                    .and_hms_opt(reference.hour, reference.minute, reference.second)?;
                let shifted = base.checked_add_signed(TimeDelta::try_seconds(offset)?)?;
                Some(CfDateTime::from_naive(shifted))
            }
            Self::Standard | Self::Julian => {
                let start = self
                    .day_number(reference)?
                    .checked_mul(SECONDS_PER_DAY)?
                    .checked_add(reference.seconds_of_day())?;
                let total = start.checked_add(offset)?;
                let days = total.div_euclid(SECONDS_PER_DAY);
                let (year, month, day) = self.date_of_day_number(days)?;
                Some(CfDateTime::from_date(year, month, day, total.rem_euclid(SECONDS_PER_DAY)))
            }
            Self::NoLeap => add_fixed(&NOLEAP_MONTHS, reference, offset),
            Self::AllLeap => add_fixed(&ALL_LEAP_MONTHS, reference, offset),
            Self::Day360 => add_fixed(&DAY360_MONTHS, reference, offset),
        }
    }

    /// Julian day number of the date part of `dt`
    fn day_number(self, dt: &CfDateTime) -> Option<i64> {
        let date = (dt.year, dt.month, dt.day);
        match self {
            Self::Julian => julian_day_number(dt),
            // The ten days dropped by the reform do not exist
            Self::Standard if date >= (1582, 10, 15) => gregorian_day_number(dt),
            Self::Standard if date <= (1582, 10, 4) => julian_day_number(dt),
            _ => None,
        }
    }

    fn date_of_day_number(self, day: i64) -> Option<(i32, u32, u32)> {
        match self {
            Self::Standard if day >= GREGORIAN_REFORM_DAY => gregorian_date(day),
            Self::Standard | Self::Julian => julian_date(day),
            _ => None,
        }
    }
}

fn gregorian_day_number(dt: &CfDateTime) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(dt.year, dt.month, dt.day)?;
    Some(i64::from(date.num_days_from_ce()) + CE_DAY_OFFSET)
}

fn gregorian_date(day: i64) -> Option<(i32, u32, u32)> {
    let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(day - CE_DAY_OFFSET).ok()?)?;
    Some((date.year(), date.month(), date.day()))
}

const fn is_julian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

fn julian_day_number(dt: &CfDateTime) -> Option<i64> {
    if !(1..=12).contains(&dt.month) {
        return None;
    }
    let months = if is_julian_leap_year(dt.year) {
        &ALL_LEAP_MONTHS
    } else {
        &NOLEAP_MONTHS
    };
    if dt.day == 0 || dt.day > months[(dt.month - 1) as usize] {
        return None;
    }

    // Shift the year to start in March so that February is its last month
    let a = (14 - i64::from(dt.month)) / 12;
    let year = i64::from(dt.year) + 4_800 - a;
    let month = i64::from(dt.month) + 12 * a - 3;
    Some(
        i64::from(dt.day) + (153 * month + 2) / 5 + 365 * year + year.div_euclid(4) - 32_083,
    )
}

fn julian_date(day: i64) -> Option<(i32, u32, u32)> {
    let c = day + 32_082;
    let d = (4 * c + 3).div_euclid(1_461);
    let e = c - (1_461 * d).div_euclid(4);
    let m = (5 * e + 2) / 153;

    let day_of_month = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4_800 + m / 10;
    Some((
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day_of_month).ok()?,
    ))
}

fn add_fixed(months: &[u32; 12], reference: &CfDateTime, offset: i64) -> Option<CfDateTime> {
    let start = fixed_to_seconds(months, reference)?;
    fixed_from_seconds(months, start.checked_add(offset)?)
}

fn fixed_to_seconds(months: &[u32; 12], dt: &CfDateTime) -> Option<i64> {
    if !(1..=12).contains(&dt.month) {
        return None;
    }
    let month_index = (dt.month - 1) as usize;
    if dt.day == 0 || dt.day > months[month_index] {
        return None;
    }
    let days_in_year: i64 = months.iter().map(|&m| i64::from(m)).sum();
    let day_of_year: i64 = months[..month_index].iter().map(|&m| i64::from(m)).sum::<i64>()
        + i64::from(dt.day - 1);
    let days = i64::from(dt.year) * days_in_year + day_of_year;
    Some(days * SECONDS_PER_DAY + dt.seconds_of_day())
}

fn fixed_from_seconds(months: &[u32; 12], total: i64) -> Option<CfDateTime> {
    let days_in_year: i64 = months.iter().map(|&m| i64::from(m)).sum();
    let days = total.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = total.rem_euclid(SECONDS_PER_DAY);

    let year = i32::try_from(days.div_euclid(days_in_year)).ok()?;
    let mut day_of_year = days.rem_euclid(days_in_year);
    let mut month = 1;
    for &length in months {
        let length = i64::from(length);
        if day_of_year < length {
            break;
        }
        day_of_year -= length;
        month += 1;
    }

    Some(CfDateTime::from_date(
        year,
        month,
        (day_of_year + 1) as u32,
        seconds_of_day,
    ))
}

/// Decodes numeric CF time values into calendar dates.
///
/// Offsets are rounded to whole seconds.
pub fn decode(values: &[f64], units: &str, calendar: &str) -> Result<Vec<CfDateTime>> {
    let parsed = parse_units(units)?;
    let calendar = calendar.parse::<Calendar>()?;

    values
        .iter()
        .map(|&value| {
            let offset = (value * parsed.unit.seconds()).round();
            if !offset.is_finite() {
                return Err(malformed(units));
            }
            calendar
                .add_seconds(&parsed.reference, offset as i64)
                .ok_or_else(|| malformed(units))
        })
        .collect()
}
