use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drawable::Drawable;
use crate::foundation::core::Size;

/// An existing image file used as the base of a layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Drawable for ImageFile {
    fn build_arguments(&self) -> Vec<String> {
        Vec::new()
    }

    fn takes_source(&self) -> bool {
        true
    }

    fn source(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn label(&self) -> String {
        format!("image({})", self.path.display())
    }
}

/// A blank canvas filled with a solid color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub size: Size,
    /// Fill color, any color string the tool accepts (`none` for transparent).
    pub color: String,
}

impl Canvas {
    pub fn new(size: Size, color: impl Into<String>) -> Self {
        Self {
            size,
            color: color.into(),
        }
    }

    /// Transparent canvas.
    pub fn transparent(size: Size) -> Self {
        Self::new(size, "none")
    }
}

impl Drawable for Canvas {
    fn build_arguments(&self) -> Vec<String> {
        vec![
            "-size".to_string(),
            self.size.geometry(),
            format!("xc:{}", self.color),
        ]
    }

    fn label(&self) -> String {
        format!("canvas({} {})", self.size.geometry(), self.color)
    }
}
