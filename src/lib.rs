//! Strata is a layered raster editing engine.
//!
//! A document is a [`LayerStack`]: ordered RGBA layers with one active layer
//! and a push/pop history of active-layer selections. Image transforms
//! implement [`Filter`] and run through [`perform`], which switches to the
//! target layer, filters a snapshot and writes the result back (in place or
//! to a new layer) before restoring the previous active layer.
//!
//! - Kernels: [`Kernel`] (equation-sampled or raw), with [`presets`]
//! - Filters: [`ConvolutionFilter`], [`MultiKernelConvolutionFilter`], [`PointFilter`]
//! - Editing: [`EditorContext`] with brush, eraser, gradient and move tools
//! - Batch: [`Recipe`] documents describing layers and filter steps
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod filter;
mod foundation;
mod kernel;
mod layer;
mod options;
mod pipeline;
mod raster;
mod recipe;
mod tools;

pub use crate::foundation::core::{Canvas, LayerId, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{StrataError, StrataResult};

pub use crate::filter::convolution::{
    ConvolutionFilter, ConvolutionSettings, DEFAULT_GAIN, KernelAnchor, KernelShape,
};
pub use crate::filter::multi::MultiKernelConvolutionFilter;
pub use crate::filter::point::{AlphaMode, PointFilter, PointOp};
pub use crate::filter::spec::FilterSpec;
pub use crate::filter::traits::{Filter, ParamSpec};
pub use crate::kernel::grid::{Kernel, KernelEquation, KernelMode, KernelSource};
pub use crate::kernel::presets;
pub use crate::layer::guard::ActiveLayerGuard;
pub use crate::layer::model::Layer;
pub use crate::layer::stack::{CompositeTiers, LayerStack};
pub use crate::options::{NumericOption, OptionChange, OptionSet};
pub use crate::pipeline::perform;
pub use crate::raster::blend::{draw_over, over};
pub use crate::raster::buffer::PixelBuffer;
pub use crate::raster::codec::{decode_image, encode_png, load_image, save_png};
pub use crate::recipe::{LayerSource, LayerSpec, Recipe, Step};
pub use crate::tools::brush::{BRUSH_OPACITY, BRUSH_SIZE, BrushTool};
pub use crate::tools::context::{EditorContext, StrokeEvent, Tool};
pub use crate::tools::eraser::{ERASER_SIZE, EraserTool};
pub use crate::tools::gradient::{ColorStop, GradientTool};
pub use crate::tools::move_tool::MoveTool;
