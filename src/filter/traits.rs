use crate::{
    foundation::error::{StrataError, StrataResult},
    raster::buffer::PixelBuffer,
};

/// A tunable numeric filter parameter, as surfaced to an option provider.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    /// Parameter name, unique per filter.
    pub name: String,
    /// Current value.
    pub value: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Increment between valid values.
    pub step: f64,
}

/// Image transform from a source raster to a new raster of the same size.
///
/// Filters never touch the layer stack; they only read the buffer they are
/// handed. See [`crate::perform`] for the active-layer protocol around them.
pub trait Filter: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Compute the destination raster. The source is never modified.
    fn process(&self, src: &PixelBuffer) -> StrataResult<PixelBuffer>;

    /// Tunable parameters; empty by default.
    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    /// Update one parameter by name.
    fn set_param(&mut self, name: &str, _value: f64) -> StrataResult<()> {
        Err(StrataError::not_found(format!(
            "filter '{}' has no parameter '{name}'",
            self.name()
        )))
    }
}

impl std::fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("name", &self.name()).finish()
    }
}
