//! Centralized error handling for nchelpers
//!
//! Every query on a [`CfDataset`](crate::CfDataset) either succeeds completely or
//! returns one of these errors to the caller. Nothing is retried or recovered
//! locally: they describe metadata problems in the file, not transient faults.

use thiserror::Error;

/// Main error type for nchelpers operations
#[derive(Error, Debug)]
pub enum NcHelpersError {
    /// NetCDF library errors raised by the data-access layer
    #[error("NetCDF error: {0}")]
    NetCDFError(#[from] netcdf::Error),

    /// I/O errors, e.g. the backing file cannot be read for fingerprinting
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Variable not found in the dataset
    #[error("Variable '{var}' not found in file")]
    VariableNotFound { var: String },

    /// No dimension could be resolved to the required canonical axis
    #[error("No dimension is attributed with axis '{axis}'")]
    MissingAxis { axis: String },

    /// A required attribute is absent on a variable
    #[error("Variable '{var}' has no '{attr}' attribute")]
    MissingAttribute { var: String, attr: String },

    /// Time units do not follow `<units> since <reference time>`
    #[error("Time units must be of the form '<days|hours|minutes|seconds> since <reference time>', got '{units}'")]
    MalformedUnits { units: String },

    /// Calendar name has no decoding rule
    #[error("Unsupported calendar '{calendar}'")]
    UnsupportedCalendar { calendar: String },

    /// Time axis too short to derive a step size or range
    #[error("Time variable '{var}' has too few values ({count})")]
    InsufficientTimeSteps { var: String, count: usize },

    /// Time range cannot be formatted for this resolution
    #[error("Cannot format a time range with resolution '{resolution}' (only yearly, monthly or daily)")]
    UnsupportedResolution { resolution: String },

    /// Unified metadata concept could not be resolved for this file
    #[error("Metadata attribute '{concept}' is not resolvable for this file")]
    UnresolvedMetadata { concept: String },
}

/// Result type alias for nchelpers operations
pub type Result<T> = std::result::Result<T, NcHelpersError>;
