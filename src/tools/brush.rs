use kurbo::{BezPath, Shape};

use crate::{
    foundation::{
        core::{Point, Rgba8, Vec2},
        error::{StrataError, StrataResult},
    },
    options::NumericOption,
    raster::{blend::over, buffer::PixelBuffer},
    tools::context::{EditorContext, StrokeEvent, Tool},
};

/// Option holding the brush diameter in pixels.
pub const BRUSH_SIZE: &str = "brush_size";
/// Option holding the brush opacity in `[0, 1]`.
pub const BRUSH_OPACITY: &str = "brush_opacity";

const SPACING_FACTOR: f64 = 0.05;

/// Ribbon brush: each accepted pointer sample extends the stroke with a quad
/// spanning the perpendicular offsets (half the size) at the previous and
/// current sample.
#[derive(Clone, Debug)]
pub struct BrushTool {
    /// Paint colour; its alpha multiplies the opacity option.
    pub color: Rgba8,
    stroke: Option<StrokeState>,
}

#[derive(Clone, Copy, Debug)]
struct StrokeState {
    last: Point,
    edge: Option<(Point, Point)>,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::new(Rgba8::WHITE)
    }
}

impl BrushTool {
    /// Brush painting `color`.
    pub fn new(color: Rgba8) -> Self {
        Self {
            color,
            stroke: None,
        }
    }

    fn extend(&mut self, ctx: &mut EditorContext, p: Point) -> StrataResult<()> {
        let size = ctx.option_or(BRUSH_SIZE, 1.0);
        let opacity = ctx.option_or(BRUSH_OPACITY, 1.0) as f32;
        let Some(state) = self.stroke.as_mut() else {
            return Ok(());
        };

        // Samples closer than the spacing to the last accepted one are dropped.
        let step = p - state.last;
        let dist = step.hypot();
        if dist == 0.0 || dist < SPACING_FACTOR * size {
            return Ok(());
        }

        let normal = Vec2::new(-step.y, step.x).normalize() * (size / 2.0);
        let current = (p + normal, p - normal);
        let previous = state
            .edge
            .unwrap_or((state.last + normal, state.last - normal));
        state.last = p;
        state.edge = Some(current);

        let mut quad = BezPath::new();
        quad.move_to(previous.0);
        quad.line_to(previous.1);
        quad.line_to(current.1);
        quad.line_to(current.0);
        quad.close_path();

        let surface = ctx
            .layers
            .active_surface_mut()
            .ok_or_else(|| StrataError::not_found("no active layer"))?;
        fill_path(surface, &quad, self.color, opacity);
        Ok(())
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &str {
        "Brush"
    }

    fn default_options(&self) -> StrataResult<Vec<NumericOption>> {
        Ok(vec![
            NumericOption::new(BRUSH_SIZE, 1.0, 1.0, 35.0, 0.5)?,
            NumericOption::new(BRUSH_OPACITY, 1.0, 0.0, 1.0, 0.01)?,
        ])
    }

    fn handle(&mut self, ctx: &mut EditorContext, event: StrokeEvent) -> StrataResult<()> {
        let p = ctx.to_layer_space(event.point())?;
        match event {
            StrokeEvent::Begin(_) => {
                self.stroke = Some(StrokeState {
                    last: p,
                    edge: None,
                });
                Ok(())
            }
            StrokeEvent::Move(_) => self.extend(ctx, p),
            StrokeEvent::End(_) => {
                self.extend(ctx, p)?;
                self.stroke = None;
                ctx.commit()
            }
        }
    }
}

/// Paint pixels whose centres fall inside `path` (non-zero winding).
pub(crate) fn fill_path(buf: &mut PixelBuffer, path: &BezPath, color: Rgba8, opacity: f32) {
    let bbox = path.bounding_box();
    let x0 = bbox.x0.floor().max(0.0) as i64;
    let y0 = bbox.y0.floor().max(0.0) as i64;
    let x1 = (bbox.x1.ceil() as i64).min(i64::from(buf.width()));
    let y1 = (bbox.y1.ceil() as i64).min(i64::from(buf.height()));

    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if path.winding(centre) == 0 {
                continue;
            }
            let idx = buf.offset_unchecked(x as usize, y as usize);
            let px = &mut buf.as_raw_mut()[idx..idx + 4];
            let out = over(Rgba8::new(px[0], px[1], px[2], px[3]), color, opacity);
            px.copy_from_slice(&out.to_array());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/brush.rs"]
mod tests;
