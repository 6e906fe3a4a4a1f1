use crate::{
    filter::{
        convolution::{ConvolutionSettings, convolve, gain_param, set_gain},
        traits::{Filter, ParamSpec},
    },
    foundation::error::{StrataError, StrataResult},
    kernel::grid::Kernel,
    raster::buffer::PixelBuffer,
};

/// Convolution that sums every kernel's contribution per tap and averages
/// over the kernel count, e.g. a horizontal plus vertical gradient pair.
///
/// Boundary, gain and alpha handling match [`crate::ConvolutionFilter`].
#[derive(Clone, Debug)]
pub struct MultiKernelConvolutionFilter {
    name: String,
    kernels: Vec<Kernel>,
    settings: ConvolutionSettings,
}

impl MultiKernelConvolutionFilter {
    /// Filter over `kernels`, which must be non-empty and share one size.
    pub fn new(name: impl Into<String>, kernels: Vec<Kernel>) -> StrataResult<Self> {
        Self::with_settings(name, kernels, ConvolutionSettings::default())
    }

    /// Filter over `kernels` with explicit settings.
    pub fn with_settings(
        name: impl Into<String>,
        kernels: Vec<Kernel>,
        settings: ConvolutionSettings,
    ) -> StrataResult<Self> {
        let Some(first) = kernels.first() else {
            return Err(StrataError::validation(
                "multi-kernel filter needs at least one kernel",
            ));
        };
        let size = first.radius();
        if let Some(bad) = kernels.iter().find(|k| k.radius() != size) {
            return Err(StrataError::invalid_kernel_data(
                (size * size) as usize,
                bad.coefficients().len(),
            ));
        }
        Ok(Self {
            name: name.into(),
            kernels,
            settings,
        })
    }

    /// The owned kernels.
    pub fn kernels(&self) -> &[Kernel] {
        &self.kernels
    }

    /// Current settings.
    pub fn settings(&self) -> &ConvolutionSettings {
        &self.settings
    }

    /// Mutable settings.
    pub fn settings_mut(&mut self) -> &mut ConvolutionSettings {
        &mut self.settings
    }
}

impl Filter for MultiKernelConvolutionFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, src: &PixelBuffer) -> StrataResult<PixelBuffer> {
        convolve(src, &self.kernels, &self.settings)
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![gain_param(self.settings.gain)]
    }

    fn set_param(&mut self, name: &str, value: f64) -> StrataResult<()> {
        match name {
            "gain" => set_gain(&mut self.settings, value),
            _ => Err(StrataError::not_found(format!(
                "filter '{}' has no parameter '{name}'",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/multi.rs"]
mod tests;
