use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{StrataError, StrataResult},
        math::lerp_u8,
    },
    raster::blend::over,
    tools::context::{EditorContext, StrokeEvent, Tool},
};

/// Colour at a position along the gradient axis, `0` at the drag start.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub offset: f64,
    /// Colour at `offset`.
    pub color: Rgba8,
}

/// Linear gradient from the drag start to its end, filling the active layer.
///
/// Pixels before the start take the first stop, pixels past the end the last.
#[derive(Clone, Debug)]
pub struct GradientTool {
    stops: Vec<ColorStop>,
    from: Option<Point>,
}

impl Default for GradientTool {
    fn default() -> Self {
        Self {
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: Rgba8::WHITE,
                },
                ColorStop {
                    offset: 0.5,
                    color: Rgba8::opaque(0x44, 0x88, 0xff),
                },
                ColorStop {
                    offset: 1.0,
                    color: Rgba8::BLACK,
                },
            ],
            from: None,
        }
    }
}

impl GradientTool {
    /// Gradient with the given stops (sorted by offset).
    pub fn new(stops: Vec<ColorStop>) -> StrataResult<Self> {
        let mut tool = Self {
            stops: Vec::new(),
            from: None,
        };
        for stop in stops {
            tool.add_color_stop(stop.offset, stop.color)?;
        }
        Ok(tool)
    }

    /// Insert a stop, keeping the stops ordered.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba8) -> StrataResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(StrataError::validation(format!(
                "gradient stop offset {offset} must be within [0, 1]"
            )));
        }
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        Ok(())
    }

    /// Stops in order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at axis position `t`.
    pub fn color_at(&self, t: f64) -> Rgba8 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba8::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let hi = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (self.stops[hi - 1], self.stops[hi]);
        let span = b.offset - a.offset;
        let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
        Rgba8::new(
            lerp_u8(a.color.r, b.color.r, f),
            lerp_u8(a.color.g, b.color.g, f),
            lerp_u8(a.color.b, b.color.b, f),
            lerp_u8(a.color.a, b.color.a, f),
        )
    }

    fn paint(&self, ctx: &mut EditorContext, from: Point, to: Point) -> StrataResult<()> {
        let axis = to - from;
        let len2 = axis.hypot2();
        if len2 == 0.0 {
            tracing::debug!("zero-length gradient drag ignored");
            return Ok(());
        }
        let surface = ctx
            .layers
            .active_surface_mut()
            .ok_or_else(|| StrataError::not_found("no active layer"))?;
        let w = surface.width() as usize;
        for (i, px) in surface.as_raw_mut().chunks_exact_mut(4).enumerate() {
            let centre = Point::new((i % w) as f64 + 0.5, (i / w) as f64 + 0.5);
            let t = (centre - from).dot(axis) / len2;
            let out = over(
                Rgba8::new(px[0], px[1], px[2], px[3]),
                self.color_at(t),
                1.0,
            );
            px.copy_from_slice(&out.to_array());
        }
        Ok(())
    }
}

impl Tool for GradientTool {
    fn name(&self) -> &str {
        "Gradient"
    }

    fn handle(&mut self, ctx: &mut EditorContext, event: StrokeEvent) -> StrataResult<()> {
        let p = ctx.to_layer_space(event.point())?;
        match event {
            StrokeEvent::Begin(_) => {
                self.from = Some(p);
                Ok(())
            }
            StrokeEvent::Move(_) => Ok(()),
            StrokeEvent::End(_) => {
                let Some(from) = self.from.take() else {
                    return Ok(());
                };
                self.paint(ctx, from, p)?;
                ctx.commit()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/gradient.rs"]
mod tests;
