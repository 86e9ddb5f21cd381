//! Unified access to CMIP global metadata
//!
//! CMIP3 and CMIP5 files carry the same facts under different global attribute
//! names; which standard applies is given by the file's `project_id`.
//! [`UnifiedMetadata`] answers a small fixed set of questions (institution, model,
//! emissions scenario, run, project) regardless of the standard.
//!
//! A lookup fails with [`NcHelpersError::UnresolvedMetadata`] whether the project is
//! unrecognized, the concept is unknown or the attribute is missing. Callers only
//! learn that the value could not be resolved.

use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::{NcHelpersError, Result};
use std::fmt;

/// Global attribute naming the metadata standard of a file
pub const PROJECT_ATTRIBUTE: &str = "project_id";

/// Metadata standards with a known attribute naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFamily {
    Cmip3,
    Cmip5,
}

impl ProjectFamily {
    /// Family named by a `project_id` value; the match is exact
    #[must_use]
    pub fn parse(project_id: &str) -> Option<Self> {
        match project_id {
            "CMIP3" => Some(Self::Cmip3),
            "CMIP5" => Some(Self::Cmip5),
            _ => None,
        }
    }
}

/// Concepts available through [`UnifiedMetadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concept {
    Institution,
    Model,
    Emissions,
    Run,
    Project,
}

impl Concept {
    pub const ALL: [Concept; 5] = [
        Self::Institution,
        Self::Model,
        Self::Emissions,
        Self::Run,
        Self::Project,
    ];

    /// Concept called `name`, e.g. `"model"`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Institution => "institution",
            Self::Model => "model",
            Self::Emissions => "emissions",
            Self::Run => "run",
            Self::Project => "project",
        }
    }

    /// Attribute holding this concept under the given standard
    #[must_use]
    pub const fn attribute(self, family: ProjectFamily) -> &'static str {
        let (cmip3, cmip5) = match self {
            Self::Institution => ("institute", "institute_id"),
            Self::Model => ("source", "model_id"),
            Self::Emissions => ("experiment_id", "experiment_id"),
            Self::Run => ("realization", "parent_experiment_rip"),
            Self::Project => (PROJECT_ATTRIBUTE, PROJECT_ATTRIBUTE),
        };
        match family {
            ProjectFamily::Cmip3 => cmip3,
            ProjectFamily::Cmip5 => cmip5,
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// CMIP-standard-independent view of a dataset's global attributes
pub struct UnifiedMetadata<'a, D> {
    dataset: &'a CfDataset<D>,
}

impl<'a, D: CfSource> UnifiedMetadata<'a, D> {
    pub fn new(dataset: &'a CfDataset<D>) -> Self {
        Self { dataset }
    }

    /// Value of `concept` for this dataset
    pub fn get(&self, concept: Concept) -> Result<String> {
        let source = self.dataset.source();
        source
            .global_attribute(PROJECT_ATTRIBUTE)
            .and_then(|project| ProjectFamily::parse(&project))
            .and_then(|family| source.global_attribute(concept.attribute(family)))
            .ok_or_else(|| NcHelpersError::UnresolvedMetadata {
                concept: concept.to_string(),
            })
    }

    /// Value of the concept called `name`, e.g. `"model"`
    pub fn lookup(&self, name: &str) -> Result<String> {
        match Concept::parse(name) {
            Some(concept) => self.get(concept),
            None => Err(NcHelpersError::UnresolvedMetadata {
                concept: name.to_string(),
            }),
        }
    }

    pub fn institution(&self) -> Result<String> {
        self.get(Concept::Institution)
    }

    pub fn model(&self) -> Result<String> {
        self.get(Concept::Model)
    }

    /// Emissions scenario, e.g. `rcp85`
    pub fn emissions(&self) -> Result<String> {
        self.get(Concept::Emissions)
    }

    /// Run (realization) identifier, e.g. `r1i1p1`
    pub fn run(&self) -> Result<String> {
        self.get(Concept::Run)
    }

    pub fn project(&self) -> Result<String> {
        self.get(Concept::Project)
    }
}

impl<D: CfSource> CfDataset<D> {
    /// Unified view of this dataset's CMIP global metadata
    pub fn metadata(&self) -> UnifiedMetadata<'_, D> {
        UnifiedMetadata::new(self)
    }
}
