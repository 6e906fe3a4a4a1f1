use crate::{
    filter::{
        convolution::{ConvolutionFilter, ConvolutionSettings},
        multi::MultiKernelConvolutionFilter,
        point::{AlphaMode, PointFilter, PointOp},
        traits::Filter,
    },
    foundation::error::StrataResult,
    kernel::{grid::Kernel, presets},
};

/// Serializable description of a built-in filter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Unweighted square blur.
    BoxBlur {
        /// Kernel side length.
        #[serde(default = "default_radius")]
        radius: u32,
    },
    /// Equation-generated Gaussian blur.
    GaussianBlur {
        /// Kernel side length.
        #[serde(default = "default_radius")]
        radius: u32,
        /// Standard deviation in pixels.
        #[serde(default = "default_sigma")]
        sigma: f32,
    },
    /// 3x3 binomial blur.
    SoftBlur,
    /// Horizontal + vertical Prewitt gradients averaged together.
    Edge,
    /// Channel average.
    Grayscale {
        /// Alpha handling.
        #[serde(default)]
        alpha: AlphaMode,
    },
    /// Colour inversion.
    Invert {
        /// Alpha handling.
        #[serde(default)]
        alpha: AlphaMode,
    },
    /// Arbitrary raw kernel.
    Convolve {
        /// Kernel side length.
        radius: u32,
        /// Row-major `radius * radius` weights.
        coefficients: Vec<f32>,
        /// Rescale so the largest absolute weight is `1`.
        #[serde(default)]
        normalize: bool,
    },
}

fn default_radius() -> u32 {
    3
}

fn default_sigma() -> f32 {
    1.0
}

impl FilterSpec {
    /// Build the concrete filter. Convolution kinds use `settings`.
    pub fn build(&self, settings: &ConvolutionSettings) -> StrataResult<Box<dyn Filter>> {
        settings.validate()?;
        let filter: Box<dyn Filter> = match self {
            Self::BoxBlur { radius } => {
                let mut kernel = presets::box_blur(*radius)?;
                kernel.normalize()?;
                Box::new(ConvolutionFilter::with_settings(
                    "Box blur",
                    kernel,
                    settings.clone(),
                ))
            }
            Self::GaussianBlur { radius, sigma } => Box::new(ConvolutionFilter::gaussian(
                "Gaussian blur",
                *radius,
                *sigma,
                settings.clone(),
            )?),
            Self::SoftBlur => Box::new(ConvolutionFilter::with_settings(
                "Blur filter",
                presets::soft_blur()?,
                settings.clone(),
            )),
            Self::Edge => Box::new(MultiKernelConvolutionFilter::with_settings(
                "Edge filter",
                vec![presets::prewitt_horizontal()?, presets::prewitt_vertical()?],
                settings.clone(),
            )?),
            Self::Grayscale { alpha } => Box::new(PointFilter::new(
                "Grayscale filter",
                PointOp::Grayscale(*alpha),
            )),
            Self::Invert { alpha } => {
                Box::new(PointFilter::new("Invert filter", PointOp::Invert(*alpha)))
            }
            Self::Convolve {
                radius,
                coefficients,
                normalize,
            } => {
                let mut kernel = Kernel::from_raw(*radius, coefficients.clone())?;
                if *normalize {
                    kernel.normalize()?;
                }
                Box::new(ConvolutionFilter::with_settings(
                    "Convolution",
                    kernel,
                    settings.clone(),
                ))
            }
        };
        Ok(filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/spec.rs"]
mod tests;
