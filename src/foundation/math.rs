/// Row-major flat index of `(x, y)` in a grid of `width` columns.
pub(crate) fn two_dim_to_index(x: usize, y: usize, width: usize) -> usize {
    x + width * y
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Round and saturate an accumulated channel value into `0..=255`.
pub(crate) fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Opacity in `[0, 1]` to an 8-bit coverage value.
pub(crate) fn opacity_to_u8(opacity: f32) -> u8 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

pub(crate) fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    clamp_channel(f64::from(a) + t * (f64::from(b) - f64::from(a)))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
