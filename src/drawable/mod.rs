//! The drawable contract consumed by the rendering pipeline, plus a small library of concrete
//! foundations, effects, and primitives.
//!
//! A drawable only knows how to describe itself as tool arguments. Where its input image comes
//! from and where its output goes is decided by the renderer.

use std::fmt;
use std::path::Path;

use crate::foundation::core::Size;
use crate::foundation::error::{LaminateError, LaminateResult};

/// Concrete effects (`Filter`, `Rotate`, `Command`).
pub mod effect;
/// Concrete foundations (`ImageFile`, `Canvas`).
pub mod foundation;
/// Concrete primitives (`Draw`, `Label`).
pub mod primitive;

/// Process used when a drawable does not name one.
pub const DEFAULT_PROCESS: &str = "convert";

/// Canvas growth introduced by an effect (for example a rotation rendered onto its bounding box).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasChange {
    /// Canvas size the effect receives.
    pub before: Size,
    /// Canvas size the effect produces.
    pub after: Size,
}

/// Anything the pipeline can turn into tool arguments: a foundation, an effect, or a primitive.
///
/// Drawables are shared read-only across render threads, hence `Send + Sync`. None of these
/// methods may have side effects.
pub trait Drawable: fmt::Debug + Send + Sync {
    /// Tool arguments for this drawable, excluding the input image and the output path.
    fn build_arguments(&self) -> Vec<String>;

    /// Executable that runs this drawable.
    fn process_name(&self) -> &str {
        DEFAULT_PROCESS
    }

    /// Whether this drawable may be appended to a preceding effect's invocation.
    fn is_consolidatable(&self) -> bool {
        false
    }

    /// Whether the first tool argument is an input image path.
    fn takes_source(&self) -> bool {
        false
    }

    /// Declared input image, if any.
    fn source(&self) -> Option<&Path> {
        None
    }

    /// Canvas growth this drawable causes, for effects that enlarge the working canvas.
    fn canvas_change(&self) -> Option<CanvasChange> {
        None
    }

    /// Short human-readable description used in diagnostics.
    fn label(&self) -> String;
}

/// A drawable together with the input image it will actually read.
///
/// The pipeline feeds each stage's output into the next one by resolving the next drawable
/// against that file. The borrowed drawable itself is never modified, so the same layer tree can
/// be rendered from several threads.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    drawable: &'a dyn Drawable,
    source: Option<&'a Path>,
}

impl<'a> Resolved<'a> {
    /// Resolve against the drawable's own declared source.
    pub fn new(drawable: &'a dyn Drawable) -> Self {
        Self {
            drawable,
            source: None,
        }
    }

    /// Resolve against `source`, replacing whatever the drawable declares.
    pub fn with_source(drawable: &'a dyn Drawable, source: &'a Path) -> Self {
        Self {
            drawable,
            source: Some(source),
        }
    }

    pub fn drawable(&self) -> &'a dyn Drawable {
        self.drawable
    }

    /// The input image this resolution reads: the override, else the declared source.
    pub fn source(&self) -> Option<&'a Path> {
        self.source.or_else(|| self.drawable.source())
    }

    /// Full argument list: the input image first (when there is one) followed by the
    /// drawable's own arguments.
    pub fn arguments(&self) -> LaminateResult<Vec<String>> {
        let own = self.drawable.build_arguments();
        let source = match self.source {
            Some(path) => Some(path),
            None if self.drawable.takes_source() => {
                Some(self.drawable.source().ok_or_else(|| {
                    LaminateError::structure(format!(
                        "drawable {} requires a source image but none was provided",
                        self.drawable.label()
                    ))
                })?)
            }
            None => None,
        };

        let mut args = Vec::with_capacity(own.len() + 1);
        if let Some(path) = source {
            args.push(path.display().to_string());
        }
        args.extend(own);
        Ok(args)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/mod.rs"]
mod tests;
