use serde::{Deserialize, Serialize};

use crate::drawable::{CanvasChange, DEFAULT_PROCESS, Drawable};
use crate::foundation::core::Size;
use crate::render::rotation::rotated_bounds;

/// A single tool operator applied to the working image, e.g. `-blur 0x2` or `-modulate 110`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Operator name without the leading dash.
    pub operator: String,
    /// Operator argument, if the operator takes one.
    pub value: Option<String>,
}

impl Filter {
    pub fn new(operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    /// An operator that takes no argument, e.g. `-negate`.
    pub fn flag(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            value: None,
        }
    }
}

impl Drawable for Filter {
    fn build_arguments(&self) -> Vec<String> {
        let mut args = vec![format!("-{}", self.operator)];
        args.extend(self.value.clone());
        args
    }

    fn is_consolidatable(&self) -> bool {
        true
    }

    fn label(&self) -> String {
        match &self.value {
            Some(v) => format!("{}({v})", self.operator),
            None => self.operator.clone(),
        }
    }
}

/// Rotation that keeps the rotated content unclipped.
///
/// The image is first extended to a square sized to its diagonal, centered, and then rotated in
/// place, so the output canvas is `rotated_bounds(canvas)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotate {
    /// Clockwise rotation in degrees.
    pub degrees: f64,
    /// Size of the canvas being rotated.
    pub canvas: Size,
    /// Fill for the area uncovered by the rotation.
    pub background: String,
}

impl Rotate {
    pub fn new(degrees: f64, canvas: Size) -> Self {
        Self {
            degrees,
            canvas,
            background: "none".to_string(),
        }
    }
}

impl Drawable for Rotate {
    fn build_arguments(&self) -> Vec<String> {
        let bounds = rotated_bounds(self.canvas);
        vec![
            "-background".to_string(),
            self.background.clone(),
            "-gravity".to_string(),
            "center".to_string(),
            "-extent".to_string(),
            bounds.geometry(),
            "+gravity".to_string(),
            "-distort".to_string(),
            "SRT".to_string(),
            self.degrees.to_string(),
        ]
    }

    fn is_consolidatable(&self) -> bool {
        true
    }

    fn canvas_change(&self) -> Option<CanvasChange> {
        Some(CanvasChange {
            before: self.canvas,
            after: rotated_bounds(self.canvas),
        })
    }

    fn label(&self) -> String {
        format!("rotate({})", self.degrees)
    }
}

/// Arbitrary arguments run by a named process.
///
/// Useful for effects that need a different executable than the default, which always starts a
/// new invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub process: String,
    pub args: Vec<String>,
    pub consolidatable: bool,
}

impl Command {
    pub fn new(process: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            process: process.into(),
            args,
            consolidatable: false,
        }
    }

    /// Arguments run by the default process, allowed to join a preceding invocation.
    pub fn consolidatable(args: Vec<String>) -> Self {
        Self {
            process: DEFAULT_PROCESS.to_string(),
            args,
            consolidatable: true,
        }
    }
}

impl Drawable for Command {
    fn build_arguments(&self) -> Vec<String> {
        self.args.clone()
    }

    fn process_name(&self) -> &str {
        &self.process
    }

    fn is_consolidatable(&self) -> bool {
        self.consolidatable
    }

    fn label(&self) -> String {
        format!("{}[{}]", self.process, self.args.join(" "))
    }
}
