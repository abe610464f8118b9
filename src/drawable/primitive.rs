use serde::{Deserialize, Serialize};

use crate::drawable::Drawable;
use crate::foundation::core::{Gravity, Offset};

/// A vector drawing instruction (`-draw`), e.g. `circle 50,50 60,60`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub shape: String,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Draw {
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            fill: None,
            stroke: None,
            stroke_width: None,
        }
    }

    pub fn filled(shape: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::new(shape)
        }
    }
}

impl Drawable for Draw {
    fn build_arguments(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(8);
        if let Some(fill) = &self.fill {
            args.extend(["-fill".to_string(), fill.clone()]);
        }
        if let Some(stroke) = &self.stroke {
            args.extend(["-stroke".to_string(), stroke.clone()]);
        }
        if let Some(width) = self.stroke_width {
            args.extend(["-strokewidth".to_string(), width.to_string()]);
        }
        args.extend(["-draw".to_string(), self.shape.clone()]);
        args
    }

    fn is_consolidatable(&self) -> bool {
        true
    }

    fn label(&self) -> String {
        format!("draw({})", self.shape)
    }
}

/// A text annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub font: Option<String>,
    pub point_size: Option<f64>,
    pub fill: Option<String>,
    /// Anchor for `offset`; the gravity is reset afterwards so it does not leak into later
    /// arguments of the same invocation.
    pub gravity: Option<Gravity>,
    pub offset: Offset,
}

impl Label {
    pub fn new(text: impl Into<String>, offset: Offset) -> Self {
        Self {
            text: text.into(),
            font: None,
            point_size: None,
            fill: None,
            gravity: None,
            offset,
        }
    }
}

impl Drawable for Label {
    fn build_arguments(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(12);
        if let Some(font) = &self.font {
            args.extend(["-font".to_string(), font.clone()]);
        }
        if let Some(size) = self.point_size {
            args.extend(["-pointsize".to_string(), size.to_string()]);
        }
        if let Some(fill) = &self.fill {
            args.extend(["-fill".to_string(), fill.clone()]);
        }
        if let Some(gravity) = self.gravity {
            args.extend(["-gravity".to_string(), gravity.as_str().to_string()]);
        }
        args.extend([
            "-annotate".to_string(),
            self.offset.geometry(),
            self.text.clone(),
        ]);
        if self.gravity.is_some() {
            args.push("+gravity".to_string());
        }
        args
    }

    fn is_consolidatable(&self) -> bool {
        true
    }

    fn label(&self) -> String {
        format!("label({:?})", self.text)
    }
}
