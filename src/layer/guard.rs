use std::ops::{Deref, DerefMut};

use crate::{
    foundation::{core::LayerId, error::StrataResult},
    layer::stack::LayerStack,
};

/// Scoped active-layer switch.
///
/// Created by [`LayerStack::scoped_active`]: the previous active layer is
/// pushed and `target` becomes active. Dropping the guard pops the history
/// again, so every exit path restores the previous active layer. Use
/// [`ActiveLayerGuard::finish`] to observe a failing pop.
#[derive(Debug)]
pub struct ActiveLayerGuard<'a> {
    stack: &'a mut LayerStack,
    armed: bool,
}

impl LayerStack {
    /// Make `target` active until the returned guard is finished or dropped.
    pub fn scoped_active(&mut self, target: LayerId) -> StrataResult<ActiveLayerGuard<'_>> {
        self.push_active_layer();
        let guard = ActiveLayerGuard {
            stack: self,
            armed: true,
        };
        guard.stack.set_active_layer(target)?;
        Ok(guard)
    }
}

impl ActiveLayerGuard<'_> {
    /// Restore the previous active layer and report the outcome.
    pub fn finish(mut self) -> StrataResult<()> {
        self.armed = false;
        self.stack.pop_active_layer()
    }
}

impl Deref for ActiveLayerGuard<'_> {
    type Target = LayerStack;

    fn deref(&self) -> &LayerStack {
        self.stack
    }
}

impl DerefMut for ActiveLayerGuard<'_> {
    fn deref_mut(&mut self) -> &mut LayerStack {
        self.stack
    }
}

impl Drop for ActiveLayerGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = self.stack.pop_active_layer() {
            tracing::warn!(error = %err, "failed to restore active layer");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/guard.rs"]
mod tests;
