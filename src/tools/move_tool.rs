use crate::{
    foundation::{
        core::{LayerId, Point},
        error::{StrataError, StrataResult},
    },
    tools::context::{EditorContext, StrokeEvent, Tool},
};

/// Drags the active layer's offset by the pointer displacement.
#[derive(Clone, Debug, Default)]
pub struct MoveTool {
    drag: Option<Drag>,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    layer: LayerId,
    start: Point,
    origin: (i32, i32),
}

impl Tool for MoveTool {
    fn name(&self) -> &str {
        "Move"
    }

    fn handle(&mut self, ctx: &mut EditorContext, event: StrokeEvent) -> StrataResult<()> {
        let p = event.point();
        if let StrokeEvent::Begin(_) = event {
            let layer = ctx
                .layers
                .active_layer_id()
                .ok_or_else(|| StrataError::not_found("no active layer"))?;
            self.drag = Some(Drag {
                layer,
                start: p,
                origin: ctx.active_offset()?,
            });
            return Ok(());
        }

        let Some(drag) = self.drag else {
            return Ok(());
        };
        let delta = p - drag.start;
        let layer = ctx.layers.layer_mut(drag.layer)?;
        layer.x = drag.origin.0 + delta.x.round() as i32;
        layer.y = drag.origin.1 + delta.y.round() as i32;

        if let StrokeEvent::End(_) = event {
            self.drag = None;
            ctx.commit()
        } else {
            ctx.layers.render_layers()?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/move_tool.rs"]
mod tests;
