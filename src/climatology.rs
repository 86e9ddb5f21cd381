//! Multi-year mean (climatology) detection

use crate::axes::Axis;
use crate::data_source::CfSource;
use crate::dataset::CfDataset;

impl<D: CfSource> CfDataset<D> {
    /// Name of the climatology bounds variable, taken from the `climatology`
    /// attribute of the time variable. `None` if there is no time axis or no such
    /// attribute.
    pub fn climatology_bounds_var_name(&self) -> Option<String> {
        let time_dim = self
            .axes(None)
            .into_iter()
            .find_map(|(dim, axis)| (axis == Axis::T).then_some(dim))?;
        self.source().variable_attribute(&time_dim, "climatology")
    }

    /// True if the metadata marks the data as a multi-year mean
    pub fn is_multi_year_mean(&self) -> bool {
        self.climatology_bounds_var_name()
            .is_some_and(|name| !name.is_empty())
    }
}
