//! Time analysis: step size, resolution class and range of the time axis
//!
//! The resolution is derived from the numeric time values alone, never from what
//! the file's metadata claims about itself.

use crate::axes::Axis;
use crate::calendar::{self, CfDateTime};
use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::{NcHelpersError, Result};
use ndarray::{s, Array1, ArrayView1};
use std::fmt;

/// Time values of a file, with the metadata needed to interpret them
#[derive(Debug, Clone)]
pub struct TimeSteps {
    /// Name of the time variable
    pub variable: String,
    /// CF units, e.g. `days since 1950-01-01`
    pub units: String,
    pub calendar: String,
    pub numeric: Array1<f64>,
    pub datetime: Vec<CfDateTime>,
}

/// Symbolic time resolution of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    OneMinute,
    TwoMinute,
    FiveMinute,
    FifteenMinute,
    ThirtyMinute,
    Hourly,
    ThreeHourly,
    SixHourly,
    TwelveHourly,
    Daily,
    Monthly,
    Seasonal,
    Yearly,
    Other,
}

const DAY: f64 = 86_400.0;
const LOW: f64 = 0.99;
const HIGH: f64 = 1.01;

/// Closed intervals `(class, min, max)` of median step size in seconds. Steps that
/// match none are `Other`.
const RESOLUTION_BUCKETS: &[(Resolution, f64, f64)] = &[
    (Resolution::OneMinute, 60.0 * LOW, 60.0 * HIGH),
    (Resolution::TwoMinute, 120.0 * LOW, 120.0 * HIGH),
    (Resolution::FiveMinute, 300.0 * LOW, 300.0 * HIGH),
    (Resolution::FifteenMinute, 900.0 * LOW, 900.0 * HIGH),
    (Resolution::ThirtyMinute, 1_800.0 * LOW, 1_800.0 * HIGH),
    (Resolution::Hourly, 3_600.0 * LOW, 3_600.0 * HIGH),
    (Resolution::ThreeHourly, 10_800.0 * LOW, 10_800.0 * HIGH),
    (Resolution::SixHourly, 21_600.0 * LOW, 21_600.0 * HIGH),
    (Resolution::TwelveHourly, 43_200.0 * LOW, 43_200.0 * HIGH),
    (Resolution::Daily, 23.0 * 3_600.0, 25.0 * 3_600.0),
    (Resolution::Monthly, 28.0 * DAY, 31.0 * DAY),
    (Resolution::Seasonal, 89.0 * DAY, 92.0 * DAY),
    (Resolution::Yearly, 360.0 * DAY, 366.0 * DAY),
];

impl Resolution {
    /// Classifies a time step given in seconds
    #[must_use]
    pub fn from_step_seconds(seconds: f64) -> Self {
        RESOLUTION_BUCKETS
            .iter()
            .find(|&&(_, min, max)| seconds >= min && seconds <= max)
            .map_or(Self::Other, |&(resolution, _, _)| resolution)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1-minute",
            Self::TwoMinute => "2-minute",
            Self::FiveMinute => "5-minute",
            Self::FifteenMinute => "15-minute",
            Self::ThirtyMinute => "30-minute",
            Self::Hourly => "1-hourly",
            Self::ThreeHourly => "3-hourly",
            Self::SixHourly => "6-hourly",
            Self::TwelveHourly => "12-hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Seasonal => "seasonal",
            Self::Yearly => "yearly",
            Self::Other => "other",
        }
    }

    /// strftime pattern used when formatting a time range at this resolution
    #[must_use]
    pub const fn range_format(self) -> Option<&'static str> {
        match self {
            Self::Yearly => Some("%Y"),
            Self::Monthly => Some("%Y%m"),
            Self::Daily => Some("%Y%m%d"),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Median of the successive differences of `values`.
///
/// For an even number of differences the two middle values are averaged. Returns
/// `None` for fewer than two values.
pub fn median_step(values: ArrayView1<'_, f64>) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mut diffs = (&values.slice(s![1..]) - &values.slice(s![..-1])).into_raw_vec();
    diffs.sort_by(f64::total_cmp);
    let mid = diffs.len() / 2;
    if diffs.len() % 2 == 0 {
        Some((diffs[mid - 1] + diffs[mid]) / 2.0)
    } else {
        Some(diffs[mid])
    }
}

impl<D: CfSource> CfDataset<D> {
    /// Name of the variable holding the time coordinate, guessed from dimension names
    fn time_variable_name(&self) -> Result<String> {
        self.axes_from_names(None)
            .remove(&Axis::T)
            .ok_or_else(|| NcHelpersError::MissingAxis {
                axis: Axis::T.to_string(),
            })
    }

    fn required_time_attribute(&self, var: &str, attr: &str) -> Result<String> {
        self.source()
            .variable_attribute(var, attr)
            .ok_or_else(|| NcHelpersError::MissingAttribute {
                var: var.to_string(),
                attr: attr.to_string(),
            })
    }

    /// Time values of this file, numeric and decoded.
    ///
    /// # Errors
    ///
    /// - [`NcHelpersError::MissingAxis`] if no dimension denotes time
    /// - [`NcHelpersError::MissingAttribute`] if the time variable has no `units` or
    ///   `calendar` attribute
    /// - any error from reading or decoding the values
    pub fn time_steps(&self) -> Result<TimeSteps> {
        let variable = self.time_variable_name()?;
        let units = self.required_time_attribute(&variable, "units")?;
        let calendar = self.required_time_attribute(&variable, "calendar")?;

        let numeric = self.source().variable_values(&variable)?;
        let datetime = self.source().decode_times(&numeric, &units, &calendar)?;

        Ok(TimeSteps {
            variable,
            units,
            calendar,
            numeric: Array1::from_vec(numeric),
            datetime,
        })
    }

    /// Smallest and largest numeric time value
    pub fn time_range(&self) -> Result<(f64, f64)> {
        numeric_range(&self.time_steps()?)
    }

    /// Time range as `<start>-<end>`, formatted to the precision of the resolution.
    ///
    /// # Errors
    ///
    /// Returns [`NcHelpersError::UnsupportedResolution`] unless the resolution is
    /// yearly, monthly or daily.
    pub fn time_range_formatted(&self) -> Result<String> {
        let steps = self.time_steps()?;
        let resolution = Resolution::from_step_seconds(step_size(&steps)?);
        let format = resolution
            .range_format()
            .ok_or_else(|| NcHelpersError::UnsupportedResolution {
                resolution: resolution.to_string(),
            })?;

        let (min, max) = numeric_range(&steps)?;
        let bounds = self
            .source()
            .decode_times(&[min, max], &steps.units, &steps.calendar)?;
        match bounds.as_slice() {
            [start, end] => Ok(format!("{}-{}", start.format(format), end.format(format))),
            _ => Err(NcHelpersError::InsufficientTimeSteps {
                var: steps.variable,
                count: bounds.len(),
            }),
        }
    }

    /// Median time step, in seconds.
    ///
    /// The median makes the result robust to a few irregular steps.
    ///
    /// # Errors
    ///
    /// Returns [`NcHelpersError::MalformedUnits`] if the units are not of the form
    /// `<days|hours|minutes|seconds> since ...`.
    pub fn time_step_size(&self) -> Result<f64> {
        step_size(&self.time_steps()?)
    }

    /// Resolution class of the time axis
    pub fn time_resolution(&self) -> Result<Resolution> {
        Ok(Resolution::from_step_seconds(self.time_step_size()?))
    }
}

fn numeric_range(steps: &TimeSteps) -> Result<(f64, f64)> {
    if steps.numeric.is_empty() {
        return Err(NcHelpersError::InsufficientTimeSteps {
            var: steps.variable.clone(),
            count: 0,
        });
    }
    let min = steps.numeric.fold(f64::INFINITY, |acc, &v| acc.min(v));
    let max = steps.numeric.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    Ok((min, max))
}

fn step_size(steps: &TimeSteps) -> Result<f64> {
    let unit = calendar::parse_unit(&steps.units)?;
    let median =
        median_step(steps.numeric.view()).ok_or_else(|| NcHelpersError::InsufficientTimeSteps {
            var: steps.variable.clone(),
            count: steps.numeric.len(),
        })?;
    Ok(median * unit.seconds())
}
