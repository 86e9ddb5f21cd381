//! Data source abstraction over CF datasets
//!
//! Everything in this crate reads a dataset through [`CfSource`]: the dimension and
//! variable listing, attributes, coordinate values and the path of the backing file.
//! [`netcdf::File`] implements it in [`crate::netcdf_io`]; [`MemoryDataset`] is an
//! in-memory implementation for callers that already hold the metadata.

use crate::calendar::{self, CfDateTime};
use crate::errors::{NcHelpersError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Read-only access to the structure and metadata of a CF dataset
pub trait CfSource {
    /// All dimension names, in file order
    fn dimension_names(&self) -> Vec<String>;

    /// All variable names, in file order
    fn variable_names(&self) -> Vec<String>;

    /// Dimension names of a variable, or `None` if the variable does not exist
    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>>;

    /// A variable attribute rendered as text, or `None` if the variable or attribute
    /// does not exist
    fn variable_attribute(&self, var: &str, name: &str) -> Option<String>;

    /// A global attribute rendered as text
    fn global_attribute(&self, name: &str) -> Option<String>;

    /// All values of a variable, flattened, as `f64`
    fn variable_values(&self, var: &str) -> Result<Vec<f64>>;

    /// Path of the file backing this dataset
    fn file_path(&self) -> Result<PathBuf>;

    /// Whether a variable carries the named attribute
    fn has_variable_attribute(&self, var: &str, name: &str) -> bool {
        self.variable_attribute(var, name).is_some()
    }

    /// Decodes numeric time values given CF `units` and `calendar` strings
    fn decode_times(&self, values: &[f64], units: &str, calendar: &str) -> Result<Vec<CfDateTime>> {
        calendar::decode(values, units, calendar)
    }
}

impl<T: CfSource + ?Sized> CfSource for &T {
    fn dimension_names(&self) -> Vec<String> {
        (**self).dimension_names()
    }

    fn variable_names(&self) -> Vec<String> {
        (**self).variable_names()
    }

    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>> {
        (**self).variable_dimensions(var)
    }

    fn variable_attribute(&self, var: &str, name: &str) -> Option<String> {
        (**self).variable_attribute(var, name)
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        (**self).global_attribute(name)
    }

    fn variable_values(&self, var: &str) -> Result<Vec<f64>> {
        (**self).variable_values(var)
    }

    fn file_path(&self) -> Result<PathBuf> {
        (**self).file_path()
    }

    fn decode_times(&self, values: &[f64], units: &str, calendar: &str) -> Result<Vec<CfDateTime>> {
        (**self).decode_times(values, units, calendar)
    }
}

/// A variable held by [`MemoryDataset`]
#[derive(Debug, Clone, Default)]
pub struct MemoryVariable {
    pub dimensions: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub values: Vec<f64>,
}

/// In-memory dataset, built up with chained calls
///
/// ```
/// use nchelpers::MemoryDataset;
///
/// let ds = MemoryDataset::new()
///     .with_dimension("time")
///     .with_variable("time", &["time"], vec![0.0, 31.0])
///     .with_variable_attribute("time", "units", "days since 1950-01-01")
///     .with_global_attribute("project_id", "CMIP5");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    dimensions: Vec<String>,
    variables: Vec<(String, MemoryVariable)>,
    attributes: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dimension; adding an existing name is a no-op
    pub fn with_dimension(mut self, name: &str) -> Self {
        if !self.dimensions.iter().any(|d| d == name) {
            self.dimensions.push(name.to_string());
        }
        self
    }

    /// Adds or replaces a variable
    pub fn with_variable(mut self, name: &str, dims: &[&str], values: Vec<f64>) -> Self {
        let var = MemoryVariable {
            dimensions: dims.iter().map(|d| d.to_string()).collect(),
            attributes: BTreeMap::new(),
            values,
        };
        match self.variables.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = var,
            None => self.variables.push((name.to_string(), var)),
        }
        self
    }

    /// Sets an attribute on an existing variable; unknown variables are ignored
    pub fn with_variable_attribute(mut self, var: &str, name: &str, value: &str) -> Self {
        if let Some((_, v)) = self.variables.iter_mut().find(|(n, _)| n == var) {
            v.attributes.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn with_global_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the path reported by [`CfSource::file_path`]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn variable(&self, name: &str) -> Option<&MemoryVariable> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl CfSource for MemoryDataset {
    fn dimension_names(&self) -> Vec<String> {
        self.dimensions.clone()
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|(n, _)| n.clone()).collect()
    }

    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>> {
        self.variable(var).map(|v| v.dimensions.clone())
    }

    fn variable_attribute(&self, var: &str, name: &str) -> Option<String> {
        self.variable(var)?.attributes.get(name).cloned()
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn variable_values(&self, var: &str) -> Result<Vec<f64>> {
        self.variable(var)
            .map(|v| v.values.clone())
            .ok_or_else(|| NcHelpersError::VariableNotFound {
                var: var.to_string(),
            })
    }

    fn file_path(&self) -> Result<PathBuf> {
        self.path.clone().ok_or_else(|| {
            NcHelpersError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "in-memory dataset has no backing file",
            ))
        })
    }
}
