//! nchelpers: canonical metadata for CF-convention climate model files
//!
//! Climate model archives mix files written to different conventions: axes are
//! identified by dimension name in one file and by attribute in the next, CMIP3 and
//! CMIP5 name the same global attributes differently, and model calendars disagree on
//! the length of a year. nchelpers reduces a file to a small set of canonical facts.
//!
//! ## Key Features
//!
//! - **Axis Resolution**: X, Y, Z, T and S (compressed) axis of each dimension
//! - **Time Analysis**: median step size, resolution class and formatted time range
//! - **Climatologies**: detection of multi-year-mean files
//! - **Unified Metadata**: institution, model, emissions, run and project across CMIP3/CMIP5
//! - **Unique IDs**: deterministic identifiers such as `tasmax_monthly_CanESM2_rcp85_r1i1p1_195001-200012`
//! - **Fingerprints**: MD5 over the first MiB of a file
//!
//! ## Module Organization
//!
//! - [`data_source`]: the [`CfSource`] access trait and the in-memory [`MemoryDataset`]
//! - [`netcdf_io`]: [`CfSource`] for NetCDF files
//! - [`dataset`]: the [`CfDataset`] facade
//! - [`axes`], [`time`], [`climatology`], [`metadata`], [`unique_id`], [`fingerprint`]:
//!   the derived metadata
//! - [`calendar`]: CF calendar decoding
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nchelpers::prelude::*;
//!
//! let dataset = open_dataset("tasmax_day_CanESM2_rcp85_r1i1p1_20060101-21001231.nc").unwrap();
//! println!("{}", dataset.unique_id().unwrap());
//! println!("{}", dataset.metadata().institution().unwrap());
//! ```

pub mod axes;
pub mod calendar;
pub mod climatology;
pub mod data_source;
pub mod dataset;
pub mod errors;
pub mod fingerprint;
pub mod metadata;
pub mod netcdf_io;
pub mod time;
pub mod unique_id;

pub use axes::{axis_for_dim_name, Axis, DIM_NAME_AXES};
pub use calendar::{Calendar, CfDateTime, TimeUnit, TimeUnits};
pub use data_source::{CfSource, MemoryDataset, MemoryVariable};
pub use dataset::CfDataset;
pub use errors::{NcHelpersError, Result};
pub use fingerprint::{digest_file_prefix, ContentDigest, FINGERPRINT_PREFIX_LEN};
pub use metadata::{Concept, ProjectFamily, UnifiedMetadata};
pub use netcdf_io::open_dataset;
pub use time::{median_step, Resolution, TimeSteps};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::axes::Axis;
    pub use crate::data_source::{CfSource, MemoryDataset};
    pub use crate::dataset::CfDataset;
    pub use crate::errors::{NcHelpersError, Result};
    pub use crate::metadata::UnifiedMetadata;
    pub use crate::netcdf_io::open_dataset;
    pub use crate::time::Resolution;
}
