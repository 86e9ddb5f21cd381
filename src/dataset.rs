//! The [`CfDataset`] facade
//!
//! `CfDataset` wraps any [`CfSource`] and exposes the derived metadata of the file.
//! The queries are implemented next to the component they belong to:
//!
//! - axis resolution in [`crate::axes`]
//! - time analysis in [`crate::time`]
//! - climatology detection in [`crate::climatology`]
//! - unified CMIP metadata in [`crate::metadata`]
//! - unique ids in [`crate::unique_id`]
//! - content fingerprints in [`crate::fingerprint`]
//!
//! Nothing is cached: every query reads the source again, so results always reflect
//! its current state.

use crate::data_source::CfSource;

/// A CF (climate and forecast) dataset
#[derive(Debug, Clone)]
pub struct CfDataset<D> {
    source: D,
}

impl<D: CfSource> CfDataset<D> {
    pub fn new(source: D) -> Self {
        Self { source }
    }

    /// The underlying data source
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Unwraps the underlying data source
    pub fn into_inner(self) -> D {
        self.source
    }
}
