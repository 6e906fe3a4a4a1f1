use crate::{
    filter::traits::Filter,
    foundation::{
        core::LayerId,
        error::{StrataError, StrataResult},
    },
    layer::stack::LayerStack,
};

/// Run `filter` on the `target` layer.
///
/// `target` is made active for the duration of the call and the previous
/// active layer is restored afterwards, on every exit path. The filter reads
/// a snapshot of the target's pixels. With `to_new_layer` the result goes to
/// a new layer inserted directly above `target` (same offset and opacity,
/// named `"<target> (<filter>)"`); otherwise the target raster is replaced in
/// one step. When the filter fails nothing is written.
///
/// Returns the id of the layer holding the result.
#[tracing::instrument(skip(stack, filter), fields(filter = %filter.name()))]
pub fn perform(
    stack: &mut LayerStack,
    target: LayerId,
    to_new_layer: bool,
    filter: &dyn Filter,
) -> StrataResult<LayerId> {
    let mut guard = stack.scoped_active(target)?;

    let output = {
        let source = guard
            .active_surface()
            .ok_or_else(|| StrataError::not_found("no active layer"))?;
        filter.process(source)?
    };

    let affected = if to_new_layer {
        let name = match guard.layer(target) {
            Some(layer) => format!("{} ({})", layer.name, filter.name()),
            None => filter.name().to_string(),
        };
        guard.insert_layer_above(target, name, Some(output))?
    } else {
        guard.commit_active_raster(output)?;
        target
    };

    guard.finish()?;
    tracing::debug!(layer = affected.0, "filter applied");
    Ok(affected)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/perform.rs"]
mod tests;
