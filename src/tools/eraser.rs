use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{StrataError, StrataResult},
    },
    options::NumericOption,
    tools::context::{EditorContext, StrokeEvent, Tool},
};

/// Option holding the eraser side length in pixels.
pub const ERASER_SIZE: &str = "eraser_size";

/// Clears a `size x size` square centred on every pointer sample.
#[derive(Clone, Debug, Default)]
pub struct EraserTool;

impl EraserTool {
    fn clear_at(ctx: &mut EditorContext, p: Point) -> StrataResult<()> {
        let size = ctx.option_or(ERASER_SIZE, 1.0).max(1.0);
        let x0 = (p.x - size / 2.0).round() as i64;
        let y0 = (p.y - size / 2.0).round() as i64;
        let side = size.round() as i64;
        let surface = ctx
            .layers
            .active_surface_mut()
            .ok_or_else(|| StrataError::not_found("no active layer"))?;
        surface.fill_rect(x0, y0, x0 + side, y0 + side, Rgba8::TRANSPARENT);
        Ok(())
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &str {
        "Eraser"
    }

    fn default_options(&self) -> StrataResult<Vec<NumericOption>> {
        Ok(vec![NumericOption::new(ERASER_SIZE, 1.0, 1.0, 35.0, 0.5)?])
    }

    fn handle(&mut self, ctx: &mut EditorContext, event: StrokeEvent) -> StrataResult<()> {
        let p = ctx.to_layer_space(event.point())?;
        Self::clear_at(ctx, p)?;
        if matches!(event, StrokeEvent::End(_)) {
            ctx.commit()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/eraser.rs"]
mod tests;
