use std::sync::Arc;

use crate::foundation::error::{StrataError, StrataResult};

/// Parametric kernel generator over normalized kernel space, `u, v` in `(0, 1)`.
pub type KernelEquation = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Sampling coordinate used instead of an exact `0` so equations are never
/// evaluated at the origin singularity.
pub const ORIGIN_NUDGE: f64 = 0.01;

/// Where a kernel's coefficients come from.
#[derive(Clone)]
pub enum KernelSource {
    /// Coefficients are sampled from `equation`; `samples` holds the current grid.
    Equation {
        /// Generator evaluated on `set_radius`.
        equation: KernelEquation,
        /// Current `radius * radius` coefficients.
        samples: Vec<f32>,
    },
    /// Caller-supplied coefficients, always `radius * radius` long.
    Raw(Vec<f32>),
}

/// Which [`KernelSource`] variant a kernel currently uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelMode {
    /// Equation-generated coefficients.
    Equation,
    /// Raw coefficients.
    Raw,
}

/// Square grid of convolution weights, `width == height == radius`.
#[derive(Clone)]
pub struct Kernel {
    radius: u32,
    source: KernelSource,
    // Set by `normalize`; resamples rescale again while it holds.
    normalized: bool,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("radius", &self.radius)
            .field("mode", &self.mode())
            .field("normalized", &self.normalized)
            .field("coefficients", &self.coefficients())
            .finish()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::unweighted(3)
    }
}

impl Kernel {
    /// Unweighted kernel (equation `1`); fails for a zero radius.
    pub fn new(radius: u32) -> StrataResult<Self> {
        Self::from_equation(radius, Arc::new(|_, _| 1.0))
    }

    /// Kernel sampled from `equation` at construction.
    pub fn from_equation(radius: u32, equation: KernelEquation) -> StrataResult<Self> {
        check_radius(radius)?;
        let samples = sample_equation(radius, equation.as_ref());
        Ok(Self {
            radius,
            source: KernelSource::Equation { equation, samples },
            normalized: false,
        })
    }

    /// Kernel adopting `coefficients` verbatim, which must be `radius * radius` long.
    pub fn from_raw(radius: u32, coefficients: Vec<f32>) -> StrataResult<Self> {
        check_radius(radius)?;
        check_len(radius, coefficients.len())?;
        Ok(Self {
            radius,
            source: KernelSource::Raw(coefficients),
            normalized: false,
        })
    }

    fn unweighted(radius: u32) -> Self {
        let equation: KernelEquation = Arc::new(|_, _| 1.0);
        let samples = sample_equation(radius, equation.as_ref());
        Self {
            radius,
            source: KernelSource::Equation { equation, samples },
            normalized: false,
        }
    }

    /// Side length of the kernel.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Kernel width (same as [`Kernel::radius`]).
    pub fn width(&self) -> u32 {
        self.radius
    }

    /// Kernel height (same as [`Kernel::radius`]).
    pub fn height(&self) -> u32 {
        self.radius
    }

    /// Current source mode.
    pub fn mode(&self) -> KernelMode {
        match self.source {
            KernelSource::Equation { .. } => KernelMode::Equation,
            KernelSource::Raw(_) => KernelMode::Raw,
        }
    }

    /// Whether the coefficients were rescaled by [`Kernel::normalize`].
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Current source.
    pub fn source(&self) -> &KernelSource {
        &self.source
    }

    /// Row-major coefficients, `width * height` long.
    pub fn coefficients(&self) -> &[f32] {
        match &self.source {
            KernelSource::Equation { samples, .. } => samples,
            KernelSource::Raw(data) => data,
        }
    }

    fn coefficients_mut(&mut self) -> &mut [f32] {
        match &mut self.source {
            KernelSource::Equation { samples, .. } => samples,
            KernelSource::Raw(data) => data,
        }
    }

    /// Coefficient at `(kx, ky)`; `None` outside the kernel.
    pub fn at(&self, kx: u32, ky: u32) -> Option<f32> {
        if kx >= self.radius || ky >= self.radius {
            return None;
        }
        self.coefficients()
            .get((ky * self.radius + kx) as usize)
            .copied()
    }

    /// Change the kernel size.
    ///
    /// Equation kernels are resampled, and rescaled again if they were
    /// normalized. Raw kernels cannot change size without
    /// new data: the call fails with `InvalidKernelData` and leaves the kernel
    /// untouched; supply a new grid with [`Kernel::use_raw_sized`].
    pub fn set_radius(&mut self, radius: u32) -> StrataResult<()> {
        check_radius(radius)?;
        match &mut self.source {
            KernelSource::Equation { equation, samples } => {
                let mut next = sample_equation(radius, equation.as_ref());
                if self.normalized {
                    rescale(&mut next)?;
                }
                *samples = next;
                self.radius = radius;
                Ok(())
            }
            KernelSource::Raw(data) => {
                if radius == self.radius {
                    return Ok(());
                }
                tracing::warn!(
                    from = self.radius,
                    to = radius,
                    "radius change on a raw kernel needs new coefficients"
                );
                Err(StrataError::invalid_kernel_data(
                    (radius * radius) as usize,
                    data.len(),
                ))
            }
        }
    }

    /// Adopt `coefficients` verbatim at the current radius and switch to raw mode.
    pub fn use_raw(&mut self, coefficients: Vec<f32>) -> StrataResult<()> {
        check_len(self.radius, coefficients.len())?;
        self.source = KernelSource::Raw(coefficients);
        self.normalized = false;
        Ok(())
    }

    /// Adopt `coefficients` with a new radius and switch to raw mode.
    pub fn use_raw_sized(&mut self, radius: u32, coefficients: Vec<f32>) -> StrataResult<()> {
        check_radius(radius)?;
        check_len(radius, coefficients.len())?;
        self.radius = radius;
        self.source = KernelSource::Raw(coefficients);
        self.normalized = false;
        Ok(())
    }

    /// Store `equation` and switch to equation mode. The current coefficients
    /// are kept until the next [`Kernel::set_radius`] or [`Kernel::resample`],
    /// which no longer rescale.
    pub fn use_equation(&mut self, equation: KernelEquation) {
        let samples = self.coefficients().to_vec();
        self.source = KernelSource::Equation { equation, samples };
        self.normalized = false;
    }

    /// Re-evaluate the equation at the current radius; no-op for raw kernels.
    ///
    /// A normalized kernel is rescaled again. If that fails the kernel is left
    /// unchanged.
    pub fn resample(&mut self) -> StrataResult<()> {
        if let KernelSource::Equation { equation, samples } = &mut self.source {
            let mut next = sample_equation(self.radius, equation.as_ref());
            if self.normalized {
                rescale(&mut next)?;
            }
            *samples = next;
        }
        Ok(())
    }

    /// Largest absolute coefficient.
    pub fn max_abs(&self) -> f32 {
        self.coefficients()
            .iter()
            .fold(0.0f32, |acc, c| acc.max(c.abs()))
    }

    /// Scale every coefficient by `1 / max(|c|)`.
    ///
    /// An all-zero (or non-finite) kernel fails with `DegenerateKernel` and is
    /// left unchanged.
    pub fn normalize(&mut self) -> StrataResult<()> {
        rescale(self.coefficients_mut())?;
        self.normalized = true;
        Ok(())
    }
}

fn rescale(coefficients: &mut [f32]) -> StrataResult<()> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(StrataError::degenerate_kernel(
            "kernel contains non-finite coefficients",
        ));
    }
    let max = coefficients.iter().fold(0.0f32, |acc, c| acc.max(c.abs()));
    if max == 0.0 {
        return Err(StrataError::degenerate_kernel(
            "cannot normalize an all-zero kernel",
        ));
    }
    for c in coefficients {
        *c /= max;
    }
    Ok(())
}

pub(crate) fn check_radius(radius: u32) -> StrataResult<()> {
    if radius == 0 {
        return Err(StrataError::validation("kernel radius must be > 0"));
    }
    if radius > 255 {
        return Err(StrataError::validation("kernel radius must be <= 255"));
    }
    Ok(())
}

fn check_len(radius: u32, len: usize) -> StrataResult<()> {
    let expected = (radius * radius) as usize;
    if len != expected {
        return Err(StrataError::invalid_kernel_data(expected, len));
    }
    Ok(())
}

fn sample_equation(radius: u32, equation: &(dyn Fn(f64, f64) -> f64 + Send + Sync)) -> Vec<f32> {
    let size = f64::from(radius);
    let nudge = |c: u32| {
        let t = f64::from(c) / size;
        if t == 0.0 { ORIGIN_NUDGE } else { t }
    };
    let mut out = Vec::with_capacity((radius * radius) as usize);
    for y in 0..radius {
        let v = nudge(y);
        for x in 0..radius {
            out.push(equation(nudge(x), v) as f32);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/grid.rs"]
mod tests;
