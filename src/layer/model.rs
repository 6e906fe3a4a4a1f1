use crate::{
    foundation::{
        core::{LayerId, Rect},
        error::{StrataError, StrataResult},
    },
    raster::buffer::PixelBuffer,
};

/// One image layer of a document.
#[derive(Clone, Debug)]
pub struct Layer {
    id: LayerId,
    /// Display name; not required to be unique.
    pub name: String,
    /// Horizontal offset in canvas pixels.
    pub x: i32,
    /// Vertical offset in canvas pixels.
    pub y: i32,
    opacity: f32,
    width: u32,
    height: u32,
    raster: Option<PixelBuffer>,
}

impl Layer {
    pub(crate) fn new(id: LayerId, name: String, width: u32, height: u32) -> Self {
        Self {
            id,
            name,
            x: 0,
            y: 0,
            opacity: 1.0,
            width,
            height,
            raster: None,
        }
    }

    /// Stable identity within the owning stack.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set opacity; values are clamped to `[0, 1]`, NaN is rejected.
    pub fn set_opacity(&mut self, opacity: f32) -> StrataResult<()> {
        if opacity.is_nan() {
            return Err(StrataError::validation("layer opacity must be a number"));
        }
        self.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    /// Committed pixels, if any were ever saved.
    pub fn raster(&self) -> Option<&PixelBuffer> {
        self.raster.as_ref()
    }

    /// Committed pixels, or a transparent buffer of the layer size.
    pub fn raster_or_blank(&self) -> StrataResult<PixelBuffer> {
        match &self.raster {
            Some(buf) => Ok(buf.clone()),
            None => PixelBuffer::new(self.width, self.height),
        }
    }

    /// Replace the committed pixels; the layer takes the raster's size.
    pub(crate) fn replace_raster(&mut self, raster: PixelBuffer) {
        self.width = raster.width();
        self.height = raster.height();
        self.raster = Some(raster);
    }

    /// Layer bounds in canvas space.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
