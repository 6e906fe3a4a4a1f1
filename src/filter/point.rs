use crate::{
    filter::traits::Filter,
    foundation::{core::Rgba8, error::StrataResult},
    raster::buffer::PixelBuffer,
};

/// What a point filter writes into the alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    /// Keep the source alpha.
    #[default]
    Preserve,
    /// Force alpha to 255.
    Opaque,
}

impl AlphaMode {
    fn apply(self, a: u8) -> u8 {
        match self {
            Self::Preserve => a,
            Self::Opaque => 255,
        }
    }
}

/// Per-pixel transforms with no neighbourhood access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointOp {
    /// `avg = (r + g + b) / 3` (integer division) on all three channels.
    Grayscale(AlphaMode),
    /// `255 - c` on the colour channels.
    Invert(AlphaMode),
}

impl PointOp {
    /// Transform a single pixel.
    pub fn apply(self, px: Rgba8) -> Rgba8 {
        match self {
            Self::Grayscale(alpha) => {
                let avg = ((u16::from(px.r) + u16::from(px.g) + u16::from(px.b)) / 3) as u8;
                Rgba8::new(avg, avg, avg, alpha.apply(px.a))
            }
            Self::Invert(alpha) => {
                Rgba8::new(255 - px.r, 255 - px.g, 255 - px.b, alpha.apply(px.a))
            }
        }
    }
}

/// `dst[x, y] = op(src[x, y])` for every pixel.
#[derive(Clone, Debug)]
pub struct PointFilter {
    name: String,
    op: PointOp,
}

impl PointFilter {
    /// Filter applying `op`.
    pub fn new(name: impl Into<String>, op: PointOp) -> Self {
        Self {
            name: name.into(),
            op,
        }
    }

    /// Grayscale filter that keeps the source alpha.
    pub fn grayscale() -> Self {
        Self::new("Grayscale filter", PointOp::Grayscale(AlphaMode::Preserve))
    }

    /// The per-pixel operation.
    pub fn op(&self) -> PointOp {
        self.op
    }
}

impl Filter for PointFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, src: &PixelBuffer) -> StrataResult<PixelBuffer> {
        let mut dst = src.clone();
        for px in dst.as_raw_mut().chunks_exact_mut(4) {
            let out = self.op.apply(Rgba8::new(px[0], px[1], px[2], px[3]));
            px.copy_from_slice(&out.to_array());
        }
        Ok(dst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/point.rs"]
mod tests;
