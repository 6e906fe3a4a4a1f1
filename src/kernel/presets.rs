//! Ready-made kernels used by the built-in filters.

use std::sync::Arc;

use crate::{
    foundation::error::{StrataError, StrataResult},
    kernel::grid::{Kernel, check_radius},
};

/// Unweighted `radius x radius` box blur (equation `1`).
pub fn box_blur(radius: u32) -> StrataResult<Kernel> {
    Kernel::new(radius)
}

/// The 3x3 binomial `1-2-1` blur, normalized so the centre weight is `1`.
pub fn soft_blur() -> StrataResult<Kernel> {
    let mut k = Kernel::from_raw(3, vec![1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0])?;
    k.normalize()?;
    Ok(k)
}

/// Gaussian blur sampled from an equation over normalized kernel space.
///
/// `sigma` is in pixels; the bell is centred on the middle sample. The
/// equation is tied to `radius`, so a different size needs a new kernel
/// rather than [`Kernel::set_radius`].
pub fn gaussian_blur(radius: u32, sigma: f32) -> StrataResult<Kernel> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StrataError::validation("gaussian sigma must be > 0"));
    }
    check_radius(radius)?;
    let size = f64::from(radius);
    let center = f64::from(radius / 2) / size;
    let sigma_n = f64::from(sigma) / size;
    let denom = 2.0 * sigma_n * sigma_n;
    let mut k = Kernel::from_equation(
        radius,
        Arc::new(move |u, v| {
            let du = u - center;
            let dv = v - center;
            (-(du * du + dv * dv) / denom).exp()
        }),
    )?;
    k.normalize()?;
    Ok(k)
}

/// Horizontal Prewitt gradient (left-to-right).
pub fn prewitt_horizontal() -> StrataResult<Kernel> {
    Kernel::from_raw(3, vec![-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0])
}

/// Vertical Prewitt gradient (top-to-bottom).
pub fn prewitt_vertical() -> StrataResult<Kernel> {
    Kernel::from_raw(3, vec![-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
}

/// Raw kernel with a single `1` at `(radius / 2, radius / 2)`.
pub fn identity(radius: u32) -> StrataResult<Kernel> {
    check_radius(radius)?;
    let mut data = vec![0.0; (radius * radius) as usize];
    let c = radius / 2;
    data[(c * radius + c) as usize] = 1.0;
    Kernel::from_raw(radius, data)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/presets.rs"]
mod tests;
