//! NetCDF-backed data source
//!
//! This module implements [`CfSource`] for [`netcdf::File`], so that any open NetCDF
//! file can be wrapped in a [`CfDataset`].

use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::{NcHelpersError, Result};
use netcdf::{AttributeValue, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Opens a NetCDF file read-only and wraps it for metadata queries.
pub fn open_dataset<P: AsRef<Path>>(path: P) -> Result<CfDataset<File>> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;
    debug!(path = %path.display(), "opened NetCDF dataset");
    Ok(CfDataset::new(file))
}

/// Renders an attribute value as text.
///
/// Numeric scalars use their `Display` form (CMIP3 `realization` is an integer);
/// single-element arrays collapse to their element and longer arrays are joined with
/// a space. String lists are joined with a comma.
pub fn attribute_to_string(value: AttributeValue) -> Option<String> {
    fn join<T: ToString>(values: Vec<T>) -> String {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    let text = match value {
        AttributeValue::Str(s) => s,
        AttributeValue::Strs(ss) => ss.join(","),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Floats(vs) => join(vs),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Doubles(vs) => join(vs),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ints(vs) => join(vs),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Shorts(vs) => join(vs),
        AttributeValue::Uchar(v) => v.to_string(),
        AttributeValue::Uchars(vs) => join(vs),
        AttributeValue::Ushort(v) => v.to_string(),
        AttributeValue::Ushorts(vs) => join(vs),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Uints(vs) => join(vs),
        _ => return None,
    };
    Some(text)
}

impl CfSource for File {
    fn dimension_names(&self) -> Vec<String> {
        self.dimensions().map(|d| d.name().to_string()).collect()
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables().map(|v| v.name().to_string()).collect()
    }

    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>> {
        let var = self.variable(var)?;
        Some(
            var.dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
        )
    }

    fn variable_attribute(&self, var: &str, name: &str) -> Option<String> {
        let value = self.variable(var)?.attribute(name)?.value().ok()?;
        attribute_to_string(value)
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        let value = self.attribute(name)?.value().ok()?;
        attribute_to_string(value)
    }

    fn variable_values(&self, var: &str) -> Result<Vec<f64>> {
        let variable = self
            .variable(var)
            .ok_or_else(|| NcHelpersError::VariableNotFound {
                var: var.to_string(),
            })?;
        Ok(variable.get_values::<f64, _>(..)?)
    }

    fn file_path(&self) -> Result<PathBuf> {
        Ok(self.path()?)
    }
}
