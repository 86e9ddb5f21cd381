//! Metadata-based unique identifiers
//!
//! The id has the form `vars_tres_model_emissions_run_trange[axes]`, e.g.
//! `tasmax_monthly_CanESM2_rcp85_r1i1p1_195001-200012`.

use crate::axes::Axis;
use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::Result;
use std::collections::BTreeSet;

/// Variable names containing this marker are cell bounds, not data
const BOUNDS_MARKER: &str = "bnds";

impl<D: CfSource> CfDataset<D> {
    /// Names of the primary (dependent) variables in this file.
    ///
    /// Coordinate variables (those named like a dimension) and bounds variables
    /// describe the structure of the data; everything else is a dependent variable.
    pub fn dependent_variable_names(&self) -> BTreeSet<String> {
        let dimensions: BTreeSet<String> = self.source().dimension_names().into_iter().collect();
        self.source()
            .variable_names()
            .into_iter()
            .filter(|v| !dimensions.contains(v) && !v.contains(BOUNDS_MARKER))
            .collect()
    }

    /// `_dim` followed by all axis codes, when any axis other than X, Y, Z, T is
    /// present; empty otherwise
    fn axes_suffix(&self) -> String {
        let codes: BTreeSet<Axis> = self.axes(None).into_values().collect();
        if codes.iter().all(|axis| axis.is_spatiotemporal()) {
            return String::new();
        }
        let letters: String = codes.iter().map(|axis| axis.as_str()).collect();
        format!("_dim{letters}")
    }

    /// A metadata-based unique id for this file.
    ///
    /// Recomputed on every call; identical for an unchanged dataset.
    pub fn unique_id(&self) -> Result<String> {
        let vars = self
            .dependent_variable_names()
            .into_iter()
            .collect::<Vec<_>>()
            .join("-");
        let metadata = self.metadata();

        let id = format!(
            "{vars}_{tres}_{model}_{emissions}_{run}_{trange}{axes}",
            vars = vars,
            tres = self.time_resolution()?,
            model = metadata.model()?,
            emissions = metadata.emissions()?,
            run = metadata.run()?,
            trange = self.time_range_formatted()?,
            axes = self.axes_suffix(),
        );
        Ok(id.replace('+', "-"))
    }
}
