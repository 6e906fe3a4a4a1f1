use crate::{
    foundation::{
        core::Rgba8,
        math::{mul_div255_u8, opacity_to_u8},
    },
    raster::buffer::PixelBuffer,
};

/// Straight-alpha source-over of `src` onto `dst`, with `src` scaled by `opacity`.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let op = opacity_to_u8(opacity);
    if op == 0 || src.a == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src.a), u16::from(op));
    if sa == 0 {
        return dst;
    }

    let inv = 255u32 - u32::from(sa);
    let sa32 = u32::from(sa);
    let da32 = u32::from(dst.a);
    let out_a = sa32 + (da32 * inv + 127) / 255;
    if out_a == 0 {
        return Rgba8::TRANSPARENT;
    }

    let denom = out_a * 255;
    let channel = |sc: u8, dc: u8| -> u8 {
        let num = u32::from(sc) * sa32 * 255 + u32::from(dc) * da32 * inv;
        ((num + denom / 2) / denom).min(255) as u8
    };

    Rgba8::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        out_a.min(255) as u8,
    )
}

/// Composite `src` onto `dst` with its top-left corner at `(x, y)` in `dst`
/// space. Parts of `src` outside `dst` are clipped.
pub fn draw_over(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let dw = i64::from(dst.width());
    let dh = i64::from(dst.height());
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(src.width())).min(dw);
    let y1 = (i64::from(y) + i64::from(src.height())).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for dy in y0..y1 {
        let sy = (dy - i64::from(y)) as usize;
        for dx in x0..x1 {
            let sx = (dx - i64::from(x)) as usize;
            let si = src.offset_unchecked(sx, sy);
            let di = dst.offset_unchecked(dx as usize, dy as usize);
            let s = &src.as_raw()[si..si + 4];
            let s = Rgba8::new(s[0], s[1], s[2], s[3]);
            let d = &mut dst.as_raw_mut()[di..di + 4];
            let out = over(Rgba8::new(d[0], d[1], d[2], d[3]), s, opacity);
            d.copy_from_slice(&out.to_array());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
