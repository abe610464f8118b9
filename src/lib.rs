#![forbid(unsafe_code)]

//! Layered raster composition driven by an external image tool.
//!
//! A [`Layer`] tree describes an image as a foundation plus effects and primitives, with overlay
//! layers composited on top. A [`Renderer`] turns the tree into as few tool invocations as it
//! can: consecutive compatible effects share one invocation, independent overlay subtrees render
//! in parallel, and every intermediate file lives in a scratch directory that is removed when the
//! render finishes.
//!
//! ```no_run
//! use laminate::{Canvas, Filter, ImageFile, Layer, LayerOpts, Offset, OutputFormat, Renderer,
//!     RendererOpts, Size};
//!
//! # fn main() -> laminate::LaminateResult<()> {
//! use std::path::Path;
//!
//! let badge = Layer::new(
//!     ImageFile::new("badge.png"),
//!     LayerOpts {
//!         effects: vec![Box::new(Filter::new("blur", "0x2"))],
//!         offset: Offset::new(20, 20),
//!         ..LayerOpts::default()
//!     },
//! )?;
//! let root = Layer::new(
//!     Canvas::new(Size::new(640, 480), "white"),
//!     LayerOpts {
//!         overlays: vec![badge],
//!         ..LayerOpts::default()
//!     },
//! )?;
//!
//! let renderer = Renderer::new(RendererOpts::default())?;
//! let stats = renderer.render(&root, Path::new("out.png"), OutputFormat::Png)?;
//! println!("{} invocation(s)", stats.invocations);
//! # Ok(())
//! # }
//! ```

pub mod compile;
pub mod drawable;
pub mod foundation;
pub mod layer;
pub mod render;
pub mod scene;

pub use compile::consolidate::{ConsolidationGroup, group_consolidatable};
pub use compile::invocation::Invocation;
pub use compile::plan::{GroupPlan, LayerPlan, RenderPlan};
pub use drawable::effect::{Command, Filter, Rotate};
pub use drawable::foundation::{Canvas, ImageFile};
pub use drawable::primitive::{Draw, Label};
pub use drawable::{CanvasChange, DEFAULT_PROCESS, Drawable, Resolved};
pub use foundation::core::{Gravity, Offset, OutputFormat, Size};
pub use foundation::error::{LaminateError, LaminateResult};
pub use layer::model::{Layer, LayerOpts, MAX_LAYER_DEPTH};
pub use layer::traverse::{FlatLayer, LayerPath, describe_hierarchy, flatten};
pub use render::composite::{OverlayInput, compose, compose_invocation};
pub use render::exec::{ProcessOutput, ProcessRunner, SystemRunner, is_tool_on_path};
pub use render::pipeline::{RenderStats, Renderer, RendererOpts};
pub use render::rotation::{compensate, rotated_bounds};
pub use render::workspace::{
    FileSystem, LocalFs, NameGenerator, ScratchDir, SequentialNames, UuidNames,
};
pub use scene::SceneDef;
