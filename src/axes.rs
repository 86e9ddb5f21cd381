//! Axis resolution: which physical axis each dimension represents
//!
//! Files identify axes in three ways: by well-known dimension names, by an `axis`
//! attribute on the coordinate variable, and by a `compress` attribute marking a
//! compressed ("space") axis. Resolution starts from the dimension names and lets
//! the attributes override that guess.

use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::{NcHelpersError, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Canonical axis code
///
/// The derived ordering is alphabetical by code letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Compressed "space" axis
    S,
    T,
    X,
    Y,
    Z,
}

impl Axis {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::T => "T",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }

    /// Parses an `axis` attribute value, ignoring case and surrounding whitespace
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "S" => Some(Self::S),
            "T" => Some(Self::T),
            "X" => Some(Self::X),
            "Y" => Some(Self::Y),
            "Z" => Some(Self::Z),
            _ => None,
        }
    }

    /// Whether this is one of the spatio-temporal axes X, Y, Z and T
    #[must_use]
    pub const fn is_spatiotemporal(self) -> bool {
        !matches!(self, Self::S)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known dimension names and the axis they denote
pub const DIM_NAME_AXES: &[(&str, Axis)] = &[
    ("lat", Axis::Y),
    ("latitude", Axis::Y),
    ("lon", Axis::X),
    ("longitude", Axis::X),
    ("xc", Axis::X),
    ("yc", Axis::Y),
    ("x", Axis::X),
    ("y", Axis::Y),
    ("time", Axis::T),
    ("timeofyear", Axis::T),
    ("plev", Axis::Z),
    ("lev", Axis::Z),
    ("level", Axis::Z),
];

/// Looks up a dimension name in [`DIM_NAME_AXES`]
pub fn axis_for_dim_name(name: &str) -> Option<Axis> {
    DIM_NAME_AXES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(_, axis)| axis)
}

impl<D: CfSource> CfDataset<D> {
    /// Names of the dimensions of `var`, or of all dimensions in the file.
    ///
    /// # Errors
    ///
    /// Returns [`NcHelpersError::VariableNotFound`] if `var` does not exist.
    pub fn dimension_names(&self, var: Option<&str>) -> Result<Vec<String>> {
        match var {
            Some(var) => self.source().variable_dimensions(var).ok_or_else(|| {
                NcHelpersError::VariableNotFound {
                    var: var.to_string(),
                }
            }),
            None => Ok(self.source().dimension_names()),
        }
    }

    /// Guesses axes from well-known dimension names.
    ///
    /// Returns a mapping from axis to dimension name for the given dimensions, or for
    /// all dimensions when `dim_names` is `None`. Unrecognized names are dropped. If two
    /// dimensions denote the same axis, the later one wins.
    pub fn axes_from_names(&self, dim_names: Option<&[String]>) -> BTreeMap<Axis, String> {
        let all;
        let dim_names = match dim_names {
            Some(names) => names,
            None => {
                all = self.source().dimension_names();
                &all
            }
        };

        let mut axis_to_dim = BTreeMap::new();
        for dim in dim_names {
            if let Some(axis) = axis_for_dim_name(dim) {
                if let Some(previous) = axis_to_dim.insert(axis, dim.clone()) {
                    debug!(%axis, %previous, replacement = %dim, "axis collision, last dimension wins");
                }
            }
        }
        axis_to_dim
    }

    /// Resolves the axis of each dimension.
    ///
    /// Starts from [`axes_from_names`](Self::axes_from_names). A guessed dimension that
    /// is also a variable with an `axis` attribute takes the attribute's axis instead,
    /// and a `compress` attribute on that variable forces [`Axis::S`]. Returns a mapping
    /// from dimension name to axis. `Some(&[])` yields an empty mapping.
    pub fn axes(&self, dim_names: Option<&[String]>) -> BTreeMap<String, Axis> {
        if matches!(dim_names, Some(names) if names.is_empty()) {
            return BTreeMap::new();
        }

        let source = self.source();
        let mut axis_to_dim = self.axes_from_names(dim_names);
        let guessed: Vec<(Axis, String)> = axis_to_dim
            .iter()
            .map(|(axis, dim)| (*axis, dim.clone()))
            .collect();

        for (guess, dim) in guessed {
            let Some(attribute) = source.variable_attribute(&dim, "axis") else {
                continue;
            };
            let resolved = if source.has_variable_attribute(&dim, "compress") {
                Axis::S
            } else if let Some(axis) = Axis::from_attribute(&attribute) {
                axis
            } else {
                warn!(dim = %dim, axis = %attribute, "ignoring unrecognized axis attribute");
                continue;
            };

            if resolved != guess {
                debug!(dim = %dim, %guess, %resolved, "axis attribute overrides name guess");
                if axis_to_dim.get(&guess) == Some(&dim) {
                    axis_to_dim.remove(&guess);
                }
                axis_to_dim.insert(resolved, dim);
            }
        }

        axis_to_dim
            .into_iter()
            .map(|(axis, dim)| (dim, axis))
            .collect()
    }
}
