use crate::foundation::{
    core::Rgba8,
    error::{StrataError, StrataResult},
    math::two_dim_to_index,
};

/// A `width x height` straight-alpha RGBA8 raster.
///
/// Storage is row-major and tightly packed (4 bytes per pixel, no stride
/// padding), which is also the import/export format.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> StrataResult<Self> {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Buffer where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> StrataResult<Self> {
        let len = byte_len(width, height)?;
        let data = px.to_array().repeat(len / 4);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Adopt a raw RGBA8 byte buffer whose dimensions are known out-of-band.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> StrataResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(StrataError::validation(format!(
                "raw rgba8 buffer for {width}x{height} must be {len} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes, row-major.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give up the buffer as raw RGBA8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Whether `(x, y)` addresses a pixel of this buffer.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Read one pixel; fails with `OutOfBounds` outside the raster.
    pub fn get_pixel(&self, x: i64, y: i64) -> StrataResult<Rgba8> {
        let idx = self.offset(x, y)?;
        Ok(Rgba8::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ))
    }

    /// Write one pixel; fails with `OutOfBounds` outside the raster.
    pub fn set_pixel(&mut self, x: i64, y: i64, px: Rgba8) -> StrataResult<()> {
        let idx = self.offset(x, y)?;
        self.data[idx..idx + 4].copy_from_slice(&px.to_array());
        Ok(())
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: Rgba8) {
        let px = px.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fill the intersection of `[x0, x1) x [y0, y1)` with the raster; out-of-range
    /// parts of the rectangle are ignored.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, px: Rgba8) {
        let x0 = x0.clamp(0, i64::from(self.width)) as usize;
        let x1 = x1.clamp(0, i64::from(self.width)) as usize;
        let y0 = y0.clamp(0, i64::from(self.height)) as usize;
        let y1 = y1.clamp(0, i64::from(self.height)) as usize;
        let px = px.to_array();
        let w = self.width as usize;
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = two_dim_to_index(x, y, w) * 4;
                self.data[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    /// Iterate rows as RGBA8 byte slices.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width as usize * 4)
    }

    /// Byte offset of `(x, y)` without the bounds check; callers guarantee range.
    pub(crate) fn offset_unchecked(&self, x: usize, y: usize) -> usize {
        two_dim_to_index(x, y, self.width as usize) * 4
    }

    fn offset(&self, x: i64, y: i64) -> StrataResult<usize> {
        if !self.contains(x, y) {
            return Err(StrataError::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.offset_unchecked(x as usize, y as usize))
    }
}

fn byte_len(width: u32, height: u32) -> StrataResult<usize> {
    if width == 0 || height == 0 {
        return Err(StrataError::validation(
            "pixel buffer width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StrataError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
