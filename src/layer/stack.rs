use crate::{
    foundation::{
        core::{Canvas, LayerId, Rect},
        error::{StrataError, StrataResult},
    },
    layer::model::Layer,
    raster::{blend::draw_over, buffer::PixelBuffer},
};

/// Canvas-sized render targets split around the active layer.
///
/// Layers below the active one land in `lower`, the active layer (with its
/// opacity) in `active`, layers above it in `higher`. Stacking `lower`,
/// `active`, `higher` reproduces paint order while letting a UI highlight the
/// active layer.
#[derive(Clone, Debug)]
pub struct CompositeTiers {
    /// Layers below the active layer.
    pub lower: PixelBuffer,
    /// The active layer alone.
    pub active: PixelBuffer,
    /// Layers above the active layer.
    pub higher: PixelBuffer,
    /// Outline around the active layer, `(x-1, y-1, w+2, h+2)`, when enabled.
    pub outline: Option<Rect>,
}

impl CompositeTiers {
    /// Merge the three tiers into one buffer.
    pub fn merged(&self) -> PixelBuffer {
        let mut out = self.lower.clone();
        draw_over(&mut out, &self.active, 0, 0, 1.0);
        draw_over(&mut out, &self.higher, 0, 0, 1.0);
        out
    }
}

#[derive(Clone, Debug)]
struct ActiveSurface {
    id: LayerId,
    buffer: PixelBuffer,
    dirty: bool,
}

/// Ordered layers of one document (bottom to top) with an active layer.
///
/// Edits land on a working surface for the active layer. The surface is
/// committed to the layer's raster by [`LayerStack::save_active_layer`], which
/// every active-layer switch performs first.
#[derive(Clone, Debug)]
pub struct LayerStack {
    canvas: Canvas,
    layers: Vec<Layer>,
    next_id: u64,
    active: Option<ActiveSurface>,
    history: Vec<Option<LayerId>>,
    outline_active: bool,
    composite: Option<CompositeTiers>,
    composite_generation: u64,
}

impl LayerStack {
    /// Empty document of the given canvas size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            layers: Vec::new(),
            next_id: 0,
            active: None,
            history: Vec::new(),
            outline_active: true,
            composite: None,
            composite_generation: 0,
        }
    }

    /// Document size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the document has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Position of `id` in paint order.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Mutable layer by id, for offset, name and opacity edits.
    pub fn layer_mut(&mut self, id: LayerId) -> StrataResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or_else(|| not_in_stack(id))
    }

    /// Bottom-most layer called `name`.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Append a layer on top. Without `raster` it is canvas-sized and empty.
    ///
    /// The first layer added becomes active.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        raster: Option<PixelBuffer>,
    ) -> StrataResult<LayerId> {
        let layer = self.make_layer(name.into(), raster);
        let id = layer.id();
        self.layers.push(layer);
        self.after_insert(id)?;
        Ok(id)
    }

    /// Insert a layer directly above `anchor`, copying its offset and opacity.
    pub fn insert_layer_above(
        &mut self,
        anchor: LayerId,
        name: impl Into<String>,
        raster: Option<PixelBuffer>,
    ) -> StrataResult<LayerId> {
        let idx = self.index_of(anchor).ok_or_else(|| not_in_stack(anchor))?;
        let (x, y, opacity) = {
            let a = &self.layers[idx];
            (a.x, a.y, a.opacity())
        };
        let mut layer = self.make_layer(name.into(), raster);
        layer.x = x;
        layer.y = y;
        layer.set_opacity(opacity)?;
        let id = layer.id();
        self.layers.insert(idx + 1, layer);
        self.after_insert(id)?;
        Ok(id)
    }

    fn make_layer(&mut self, name: String, raster: Option<PixelBuffer>) -> Layer {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let mut layer = Layer::new(id, name, self.canvas.width, self.canvas.height);
        if let Some(raster) = raster {
            layer.replace_raster(raster);
        }
        layer
    }

    fn after_insert(&mut self, id: LayerId) -> StrataResult<()> {
        if self.active.is_none() {
            return self.set_active_layer(id);
        }
        self.save_active_layer()?;
        self.render_layers()?;
        Ok(())
    }

    /// Remove a layer and hand it back.
    ///
    /// Removing the active layer activates the layer that took its slot (or
    /// the new top). Pending history entries that name the removed layer fail
    /// with `NotFound` when popped.
    pub fn remove_layer(&mut self, id: LayerId) -> StrataResult<Layer> {
        let idx = self.index_of(id).ok_or_else(|| not_in_stack(id))?;
        let was_active = self.active_layer_id() == Some(id);
        if !was_active {
            self.save_active_layer()?;
        }
        let removed = self.layers.remove(idx);
        tracing::debug!(layer = id.0, name = %removed.name, "removed layer");

        if was_active {
            self.active = None;
            if !self.layers.is_empty() {
                let next = self.layers[idx.min(self.layers.len() - 1)].id();
                self.set_active_layer(next)?;
                return Ok(removed);
            }
        }
        if self.layers.is_empty() {
            self.composite = None;
        } else {
            self.render_layers()?;
        }
        Ok(removed)
    }

    /// Id of the active layer; `None` only when the stack is empty.
    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Index of the active layer.
    pub fn active_index(&self) -> Option<usize> {
        self.active_layer_id().and_then(|id| self.index_of(id))
    }

    /// The active layer.
    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_layer_id().and_then(|id| self.layer(id))
    }

    /// Working pixels of the active layer, including unsaved edits.
    pub fn active_surface(&self) -> Option<&PixelBuffer> {
        self.active.as_ref().map(|a| &a.buffer)
    }

    /// Mutable working pixels of the active layer; marks the surface dirty.
    pub fn active_surface_mut(&mut self) -> Option<&mut PixelBuffer> {
        self.active.as_mut().map(|a| {
            a.dirty = true;
            &mut a.buffer
        })
    }

    /// Commit the working surface to the active layer's raster.
    ///
    /// Returns once the snapshot is stored, so callers may switch layers
    /// immediately afterwards.
    pub fn save_active_layer(&mut self) -> StrataResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if !active.dirty {
            return Ok(());
        }
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id() == active.id)
            .ok_or_else(|| not_in_stack(active.id))?;
        layer.replace_raster(active.buffer.clone());
        active.dirty = false;
        Ok(())
    }

    /// Replace the active layer's pixels in one step (surface and raster).
    pub fn commit_active_raster(&mut self, raster: PixelBuffer) -> StrataResult<()> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| StrataError::not_found("no active layer"))?;
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id() == active.id)
            .ok_or_else(|| not_in_stack(active.id))?;
        layer.replace_raster(raster.clone());
        active.buffer = raster;
        active.dirty = false;
        Ok(())
    }

    /// Save the current active layer, then make `id` active and re-composite.
    pub fn set_active_layer(&mut self, id: LayerId) -> StrataResult<()> {
        let idx = self.index_of(id).ok_or_else(|| not_in_stack(id))?;
        self.save_active_layer()?;
        let buffer = self.layers[idx].raster_or_blank()?;
        self.active = Some(ActiveSurface {
            id,
            buffer,
            dirty: false,
        });
        tracing::debug!(layer = id.0, index = idx, "active layer switched");
        self.render_layers()?;
        Ok(())
    }

    /// Activate the layer at `index`. Returns `false` if it is already active.
    pub fn set_active_layer_by_index(&mut self, index: usize) -> StrataResult<bool> {
        if self.active_index() == Some(index) {
            return Ok(false);
        }
        let id = self
            .layers
            .get(index)
            .map(Layer::id)
            .ok_or_else(|| StrataError::not_found(format!("no layer at index {index}")))?;
        self.set_active_layer(id)?;
        Ok(true)
    }

    /// Remember the current active layer.
    pub fn push_active_layer(&mut self) {
        self.history.push(self.active_layer_id());
    }

    /// Restore the most recently pushed active layer and re-composite.
    ///
    /// Fails with `EmptyStack` when nothing was pushed, leaving the active
    /// layer unchanged.
    pub fn pop_active_layer(&mut self) -> StrataResult<()> {
        let entry = self.history.pop().ok_or(StrataError::EmptyStack)?;
        match entry {
            Some(id) => self.set_active_layer(id),
            None => {
                self.save_active_layer()?;
                self.render_layers()?;
                Ok(())
            }
        }
    }

    /// Pending pushes without a matching pop.
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Whether a pushed active-layer context is outstanding.
    pub fn is_processing(&self) -> bool {
        !self.history.is_empty()
    }

    /// Toggle the active-layer outline in [`CompositeTiers::outline`].
    pub fn set_outline_active(&mut self, outline: bool) {
        self.outline_active = outline;
    }

    /// Last composite produced by [`LayerStack::render_layers`].
    pub fn composite(&self) -> Option<&CompositeTiers> {
        self.composite.as_ref()
    }

    /// Number of composites produced so far.
    pub fn composite_generation(&self) -> u64 {
        self.composite_generation
    }

    /// Re-composite every layer into the three tiers.
    pub fn render_layers(&mut self) -> StrataResult<&CompositeTiers> {
        let tiers = self.build_tiers(self.outline_active)?;
        self.composite_generation += 1;
        tracing::debug!(
            generation = self.composite_generation,
            layers = self.layers.len(),
            "composited layers"
        );
        Ok(self.composite.insert(tiers))
    }

    /// Save the active layer and merge every layer into one canvas-sized
    /// buffer, without the outline.
    pub fn flatten(&mut self) -> StrataResult<PixelBuffer> {
        self.save_active_layer()?;
        Ok(self.build_tiers(false)?.merged())
    }

    fn build_tiers(&self, outline: bool) -> StrataResult<CompositeTiers> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut tiers = CompositeTiers {
            lower: PixelBuffer::new(w, h)?,
            active: PixelBuffer::new(w, h)?,
            higher: PixelBuffer::new(w, h)?,
            outline: None,
        };
        let active_id = self.active_layer_id();
        let mut active_seen = false;

        for layer in &self.layers {
            if Some(layer.id()) == active_id {
                active_seen = true;
                if let Some(surface) = self.active_surface() {
                    draw_over(&mut tiers.active, surface, layer.x, layer.y, layer.opacity());
                }
                if outline {
                    tiers.outline = Some(layer.bounds().inflate(1.0, 1.0));
                }
                continue;
            }
            let Some(raster) = layer.raster() else {
                continue;
            };
            let target = if active_seen {
                &mut tiers.higher
            } else {
                &mut tiers.lower
            };
            draw_over(target, raster, layer.x, layer.y, layer.opacity());
        }
        Ok(tiers)
    }
}

fn not_in_stack(id: LayerId) -> StrataError {
    StrataError::not_found(format!("layer {} is not contained in the stack", id.0))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/stack.rs"]
mod tests;
