use crate::{
    foundation::{
        core::{Canvas, Point},
        error::{StrataError, StrataResult},
    },
    layer::stack::LayerStack,
    options::{NumericOption, OptionSet},
};

/// Pointer input in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeEvent {
    /// Pointer pressed.
    Begin(Point),
    /// Pointer dragged.
    Move(Point),
    /// Pointer released.
    End(Point),
}

impl StrokeEvent {
    /// Position carried by the event.
    pub fn point(self) -> Point {
        match self {
            Self::Begin(p) | Self::Move(p) | Self::End(p) => p,
        }
    }
}

/// Everything a tool may touch: the document and the option values.
#[derive(Debug)]
pub struct EditorContext {
    /// The document.
    pub layers: LayerStack,
    /// Tool options, keyed by name.
    pub options: OptionSet,
}

impl EditorContext {
    /// Empty document with no options.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            layers: LayerStack::new(canvas),
            options: OptionSet::new(),
        }
    }

    /// Register the tool's options that are not present yet.
    pub fn install_tool(&mut self, tool: &dyn Tool) -> StrataResult<()> {
        for option in tool.default_options()? {
            if self.options.get(option.name()).is_none() {
                self.options.insert(option);
            }
        }
        Ok(())
    }

    /// Feed one event to `tool`.
    pub fn dispatch(&mut self, tool: &mut dyn Tool, event: StrokeEvent) -> StrataResult<()> {
        tool.handle(self, event)
    }

    /// Value of option `name`, falling back to the tool default.
    pub(crate) fn option_or(&self, name: &str, fallback: f64) -> f64 {
        self.options.value(name).unwrap_or(fallback)
    }

    /// Offset of the active layer.
    pub(crate) fn active_offset(&self) -> StrataResult<(i32, i32)> {
        self.layers
            .active_layer()
            .map(|l| (l.x, l.y))
            .ok_or_else(|| StrataError::not_found("no active layer"))
    }

    /// `p` in active-layer pixel space.
    pub(crate) fn to_layer_space(&self, p: Point) -> StrataResult<Point> {
        let (x, y) = self.active_offset()?;
        Ok(Point::new(p.x - f64::from(x), p.y - f64::from(y)))
    }

    /// Commit the active surface and refresh the composite.
    pub(crate) fn commit(&mut self) -> StrataResult<()> {
        self.layers.save_active_layer()?;
        self.layers.render_layers()?;
        Ok(())
    }
}

/// Interactive editing tool driven by [`StrokeEvent`]s.
pub trait Tool: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Options the tool reads from [`EditorContext::options`].
    fn default_options(&self) -> StrataResult<Vec<NumericOption>> {
        Ok(Vec::new())
    }

    /// React to one pointer event. Tools commit their edits on
    /// [`StrokeEvent::End`].
    fn handle(&mut self, ctx: &mut EditorContext, event: StrokeEvent) -> StrataResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/tools/context.rs"]
mod tests;
