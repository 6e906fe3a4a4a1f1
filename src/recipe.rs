use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    filter::{convolution::ConvolutionSettings, spec::FilterSpec},
    foundation::{
        core::{Canvas, Rgba8},
        error::{StrataError, StrataResult},
    },
    layer::stack::LayerStack,
    pipeline::perform,
    raster::{buffer::PixelBuffer, codec::load_image},
};

/// A JSON edit recipe: document layers plus a list of filter steps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recipe {
    /// Document size.
    pub canvas: Canvas,
    /// Layers bottom to top.
    pub layers: Vec<LayerSpec>,
    /// Filter steps, applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Settings for the convolution kinds.
    #[serde(default)]
    pub settings: ConvolutionSettings,
}

/// One layer of a recipe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpec {
    /// Layer name; steps refer to layers by name.
    pub name: String,
    /// Initial pixels.
    pub source: LayerSource,
    /// Horizontal offset.
    #[serde(default)]
    pub x: i32,
    /// Vertical offset.
    #[serde(default)]
    pub y: i32,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

/// Where a recipe layer's pixels come from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSource {
    /// Image file, relative to the recipe's directory.
    Path(PathBuf),
    /// Canvas-sized solid `[r, g, b, a]`.
    Fill([u8; 4]),
    /// Canvas-sized transparent layer.
    Empty,
}

/// One filter application.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// Name of the layer to filter.
    pub target: String,
    /// Filter to run.
    pub filter: FilterSpec,
    /// Write the result to a new layer above the target.
    #[serde(default)]
    pub to_new_layer: bool,
}

impl Recipe {
    /// Parse and validate a recipe from JSON.
    pub fn from_json(json: &str) -> StrataResult<Self> {
        let recipe: Self =
            serde_json::from_str(json).map_err(|e| StrataError::serde(e.to_string()))?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Read a recipe file.
    pub fn load(path: &Path) -> StrataResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read recipe '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Pretty JSON form.
    pub fn to_json(&self) -> StrataResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StrataError::serde(e.to_string()))
    }

    /// Check sizes, opacities, layer names and step targets.
    pub fn validate(&self) -> StrataResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StrataError::validation(
                "canvas width and height must be > 0",
            ));
        }
        if self.layers.is_empty() {
            return Err(StrataError::validation(
                "recipe needs at least one layer",
            ));
        }
        self.settings.validate()?;

        let mut names = HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(StrataError::validation("layer name must be non-empty"));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(StrataError::validation(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(StrataError::validation(format!(
                    "layer '{}' opacity must be within [0, 1]",
                    layer.name
                )));
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            if !names.contains(step.target.as_str()) {
                return Err(StrataError::validation(format!(
                    "step {i} targets unknown layer '{}'",
                    step.target
                )));
            }
        }
        Ok(())
    }

    /// Build the document and apply every step. Relative image paths are
    /// resolved against `base_dir`.
    #[tracing::instrument(skip(self), fields(layers = self.layers.len(), steps = self.steps.len()))]
    pub fn run(&self, base_dir: &Path) -> StrataResult<LayerStack> {
        self.validate()?;
        let mut stack = LayerStack::new(self.canvas);

        for spec in &self.layers {
            let raster = match &spec.source {
                LayerSource::Path(path) => Some(load_image(&base_dir.join(path))?),
                LayerSource::Fill(px) => Some(PixelBuffer::filled(
                    self.canvas.width,
                    self.canvas.height,
                    Rgba8::from_array(*px),
                )?),
                LayerSource::Empty => None,
            };
            let id = stack.add_layer(spec.name.clone(), raster)?;
            let layer = stack.layer_mut(id)?;
            layer.x = spec.x;
            layer.y = spec.y;
            layer.set_opacity(spec.opacity)?;
        }

        for step in &self.steps {
            let target = stack
                .layer_by_name(&step.target)
                .map(|l| l.id())
                .ok_or_else(|| StrataError::not_found(format!("layer '{}'", step.target)))?;
            let filter = step.filter.build(&self.settings)?;
            perform(&mut stack, target, step.to_new_layer, filter.as_ref())?;
        }
        Ok(stack)
    }

    /// Run the recipe and flatten the document for export.
    pub fn render(&self, base_dir: &Path) -> StrataResult<PixelBuffer> {
        self.run(base_dir)?.flatten()
    }
}

#[cfg(test)]
#[path = "../tests/unit/recipe/recipe.rs"]
mod tests;
