use rayon::prelude::*;

use crate::{
    filter::traits::{Filter, ParamSpec},
    foundation::{
        error::{StrataError, StrataResult},
        math::clamp_channel,
    },
    kernel::{
        grid::{Kernel, KernelMode},
        presets,
    },
    raster::buffer::PixelBuffer,
};

/// Brightness gain applied by the tap-count normalization.
pub const DEFAULT_GAIN: f32 = 1.3;

/// How a kernel cell maps to a source offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelAnchor {
    /// Offset `ceil(width / 2)`: a 3x3 kernel reads `x-2..=x`, shifting the
    /// output one pixel right and down.
    #[default]
    Legacy,
    /// Offset `floor(width / 2)`: odd kernels are centred on the pixel.
    Center,
}

impl KernelAnchor {
    fn offset(self, size: u32) -> i64 {
        match self {
            Self::Legacy => i64::from(size.div_ceil(2)),
            Self::Center => i64::from(size / 2),
        }
    }
}

/// Accumulation and execution settings shared by the convolution filters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConvolutionSettings {
    /// Each channel sum is divided by `taps / gain`, where `taps` counts the
    /// in-bounds kernel cells that contributed.
    pub gain: f32,
    /// Kernel centring.
    pub anchor: KernelAnchor,
    /// Process rows on the rayon pool.
    pub parallel: bool,
    /// Dedicated worker count for parallel runs; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for ConvolutionSettings {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            anchor: KernelAnchor::Legacy,
            parallel: false,
            threads: None,
        }
    }
}

impl ConvolutionSettings {
    /// Reject settings that would produce non-finite output.
    pub fn validate(&self) -> StrataResult<()> {
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(StrataError::validation("convolution gain must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(StrataError::validation(
                "convolution 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// How a `radius` parameter change rebuilds a filter's kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelShape {
    /// Resize the kernel itself with [`Kernel::set_radius`].
    Resample,
    /// Rebuild a Gaussian of `sigma` pixels centred on the new grid.
    Gaussian {
        /// Standard deviation in pixels.
        sigma: f32,
    },
}

/// Single-kernel 2D convolution.
///
/// Taps falling outside the source are skipped, alpha is forced opaque and
/// RGB sums are divided by `taps / gain` before rounding and saturating.
#[derive(Clone, Debug)]
pub struct ConvolutionFilter {
    name: String,
    kernel: Kernel,
    shape: KernelShape,
    settings: ConvolutionSettings,
}

impl ConvolutionFilter {
    /// Filter owning `kernel` with default settings.
    pub fn new(name: impl Into<String>, kernel: Kernel) -> Self {
        Self::with_settings(name, kernel, ConvolutionSettings::default())
    }

    /// Filter owning `kernel` with explicit settings.
    pub fn with_settings(
        name: impl Into<String>,
        kernel: Kernel,
        settings: ConvolutionSettings,
    ) -> Self {
        Self {
            name: name.into(),
            kernel,
            shape: KernelShape::Resample,
            settings,
        }
    }

    /// Gaussian blur filter whose `radius` and `sigma` parameters rebuild the
    /// kernel from [`presets::gaussian_blur`].
    pub fn gaussian(
        name: impl Into<String>,
        radius: u32,
        sigma: f32,
        settings: ConvolutionSettings,
    ) -> StrataResult<Self> {
        Ok(Self {
            name: name.into(),
            kernel: presets::gaussian_blur(radius, sigma)?,
            shape: KernelShape::Gaussian { sigma },
            settings,
        })
    }

    /// How radius changes rebuild the kernel.
    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    /// The owned kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Mutable access to the owned kernel.
    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
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

impl Filter for ConvolutionFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, src: &PixelBuffer) -> StrataResult<PixelBuffer> {
        convolve(src, std::slice::from_ref(&self.kernel), &self.settings)
    }

    fn params(&self) -> Vec<ParamSpec> {
        let mut params = Vec::with_capacity(3);
        // Raw grids cannot be resized without new coefficients.
        if self.kernel.mode() == KernelMode::Equation {
            params.push(radius_param(self.kernel.radius()));
        }
        if let KernelShape::Gaussian { sigma } = self.shape {
            params.push(sigma_param(sigma));
        }
        params.push(gain_param(self.settings.gain));
        params
    }

    fn set_param(&mut self, name: &str, value: f64) -> StrataResult<()> {
        match (name, self.shape) {
            ("radius", KernelShape::Resample) => self.kernel.set_radius(param_to_radius(value)?),
            ("radius", KernelShape::Gaussian { sigma }) => {
                self.kernel = presets::gaussian_blur(param_to_radius(value)?, sigma)?;
                Ok(())
            }
            ("sigma", KernelShape::Gaussian { .. }) => {
                let sigma = value as f32;
                self.kernel = presets::gaussian_blur(self.kernel.radius(), sigma)?;
                self.shape = KernelShape::Gaussian { sigma };
                Ok(())
            }
            ("gain", _) => set_gain(&mut self.settings, value),
            _ => Err(StrataError::not_found(format!(
                "filter '{}' has no parameter '{name}'",
                self.name
            ))),
        }
    }
}

pub(crate) fn radius_param(radius: u32) -> ParamSpec {
    ParamSpec {
        name: "radius".to_string(),
        value: f64::from(radius),
        min: 1.0,
        max: 31.0,
        step: 1.0,
    }
}

fn sigma_param(sigma: f32) -> ParamSpec {
    ParamSpec {
        name: "sigma".to_string(),
        value: f64::from(sigma),
        min: 0.1,
        max: 16.0,
        step: 0.1,
    }
}

pub(crate) fn gain_param(gain: f32) -> ParamSpec {
    ParamSpec {
        name: "gain".to_string(),
        value: f64::from(gain),
        min: 0.1,
        max: 10.0,
        step: 0.1,
    }
}

pub(crate) fn param_to_radius(value: f64) -> StrataResult<u32> {
    if !value.is_finite() || value < 1.0 || value > 255.0 {
        return Err(StrataError::validation(format!(
            "kernel radius {value} is out of range"
        )));
    }
    Ok(value.round() as u32)
}

pub(crate) fn set_gain(settings: &mut ConvolutionSettings, value: f64) -> StrataResult<()> {
    let next = ConvolutionSettings {
        gain: value as f32,
        ..settings.clone()
    };
    next.validate()?;
    *settings = next;
    Ok(())
}

/// Convolve `src` with every kernel in `kernels`, averaging their per-tap
/// contributions. All kernels must share one size.
pub(crate) fn convolve(
    src: &PixelBuffer,
    kernels: &[Kernel],
    settings: &ConvolutionSettings,
) -> StrataResult<PixelBuffer> {
    settings.validate()?;
    let first = kernels
        .first()
        .ok_or_else(|| StrataError::validation("convolution needs at least one kernel"))?;
    let size = first.radius();
    for k in kernels {
        if k.radius() != size || k.coefficients().len() != (size * size) as usize {
            return Err(StrataError::invalid_kernel_data(
                (size * size) as usize,
                k.coefficients().len(),
            ));
        }
    }

    let grids: Vec<&[f32]> = kernels.iter().map(Kernel::coefficients).collect();
    let pass = ConvolvePass {
        src,
        grids: &grids,
        size,
        offset: settings.anchor.offset(size),
        gain: f64::from(settings.gain),
    };

    let mut dst = PixelBuffer::new(src.width(), src.height())?;
    let row_bytes = src.width() as usize * 4;

    if settings.parallel {
        let run = |dst: &mut PixelBuffer| {
            dst.as_raw_mut()
                .par_chunks_exact_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| pass.row(y, row));
        };
        match settings.threads {
            Some(n) => build_thread_pool(n)?.install(|| run(&mut dst)),
            None => run(&mut dst),
        }
    } else {
        for (y, row) in dst.as_raw_mut().chunks_exact_mut(row_bytes).enumerate() {
            pass.row(y, row);
        }
    }

    Ok(dst)
}

struct ConvolvePass<'a> {
    src: &'a PixelBuffer,
    grids: &'a [&'a [f32]],
    size: u32,
    offset: i64,
    gain: f64,
}

impl ConvolvePass<'_> {
    fn row(&self, y: usize, out: &mut [u8]) {
        let w = i64::from(self.src.width());
        let h = i64::from(self.src.height());
        let size = self.size as usize;
        let raw = self.src.as_raw();
        let kernel_count = self.grids.len() as f64;
        let y = y as i64;

        for (x, px) in out.chunks_exact_mut(4).enumerate() {
            let x = x as i64;
            let mut acc = [0.0f64; 3];
            let mut taps = 0u32;

            for ky in 0..size {
                let sy = y + ky as i64 - self.offset;
                if sy < 0 || sy >= h {
                    continue;
                }
                for kx in 0..size {
                    let sx = x + kx as i64 - self.offset;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    taps += 1;
                    let idx = self.src.offset_unchecked(sx as usize, sy as usize);
                    let cell = ky * size + kx;
                    for (c, slot) in acc.iter_mut().enumerate() {
                        let s = f64::from(raw[idx + c]);
                        let mut tap = 0.0f64;
                        for grid in self.grids {
                            tap += f64::from(grid[cell]) * s;
                        }
                        *slot += tap;
                    }
                }
            }

            if taps == 0 {
                px.copy_from_slice(&[0, 0, 0, 255]);
                continue;
            }
            let divisor = f64::from(taps) / self.gain;
            for c in 0..3 {
                px[c] = clamp_channel(acc[c] / kernel_count / divisor);
            }
            px[3] = 255;
        }
    }
}

fn build_thread_pool(threads: usize) -> StrataResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| StrataError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/filter/convolution.rs"]
mod tests;
