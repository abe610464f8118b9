use std::path::{Path, PathBuf};

use crate::drawable::{DEFAULT_PROCESS, Drawable};
use crate::drawable::effect::{Command, Filter, Rotate};
use crate::drawable::foundation::{Canvas, ImageFile};
use crate::drawable::primitive::{Draw, Label};
use crate::foundation::core::{Gravity, Offset, OutputFormat, Size};
use crate::foundation::error::{LaminateError, LaminateResult};
use crate::layer::model::{Layer, LayerOpts};

/// Scene format version understood by this crate.
pub const SCENE_VERSION: u32 = 1;

/// A layer tree as stored on disk.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDef {
    pub version: u32,
    /// Format used when the caller does not pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    pub root: LayerDef,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub foundation: FoundationDef,
    #[serde(default)]
    pub effects: Vec<EffectDef>,
    #[serde(default)]
    pub primitives: Vec<PrimitiveDef>,
    #[serde(default)]
    pub overlays: Vec<LayerDef>,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub gravity: Gravity,
    #[serde(default = "default_true")]
    pub draw_primitives_first: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FoundationDef {
    Image {
        path: PathBuf,
    },
    Canvas {
        size: Size,
        #[serde(default = "default_canvas_color")]
        color: String,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum EffectDef {
    Filter {
        operator: String,
        #[serde(default)]
        value: Option<String>,
    },
    Rotate {
        degrees: f64,
        canvas: Size,
        #[serde(default)]
        background: Option<String>,
    },
    Command {
        #[serde(default)]
        process: Option<String>,
        args: Vec<String>,
        #[serde(default)]
        consolidatable: bool,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum PrimitiveDef {
    Draw {
        shape: String,
        #[serde(default)]
        fill: Option<String>,
        #[serde(default)]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: Option<f64>,
    },
    Label {
        text: String,
        #[serde(default)]
        font: Option<String>,
        #[serde(default)]
        point_size: Option<f64>,
        #[serde(default)]
        fill: Option<String>,
        #[serde(default)]
        gravity: Option<Gravity>,
        #[serde(default)]
        offset: Offset,
    },
}

fn default_true() -> bool {
    true
}

fn default_canvas_color() -> String {
    "none".to_string()
}

impl SceneDef {
    pub fn from_json_str(json: &str) -> LaminateResult<Self> {
        let scene: Self = serde_json::from_str(json)
            .map_err(|e| LaminateError::serde(format!("invalid scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: &Path) -> LaminateResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LaminateError::io(format!("failed to read scene '{}'", path.display()), e)
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> LaminateResult<()> {
        if self.version != SCENE_VERSION {
            return Err(LaminateError::validation(format!(
                "unsupported scene version {} (expected {SCENE_VERSION})",
                self.version
            )));
        }
        let mut stack = vec![&self.root];
        while let Some(def) = stack.pop() {
            def.validate()?;
            stack.extend(def.overlays.iter());
        }
        Ok(())
    }

    /// Build the layer tree. Relative image paths are resolved against `base_dir`.
    pub fn into_layer(self, base_dir: &Path) -> LaminateResult<Layer> {
        self.root.into_layer(base_dir)
    }
}

impl LayerDef {
    fn name(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed>")
    }

    fn validate(&self) -> LaminateResult<()> {
        match &self.foundation {
            FoundationDef::Image { path } if path.as_os_str().is_empty() => {
                return Err(LaminateError::validation(format!(
                    "layer '{}' has an image foundation with an empty path",
                    self.name()
                )));
            }
            FoundationDef::Canvas { size, .. } => check_size(size, self.name(), "canvas")?,
            FoundationDef::Image { .. } => {}
        }
        for effect in &self.effects {
            match effect {
                EffectDef::Filter { operator, .. } if operator.trim().is_empty() => {
                    return Err(LaminateError::validation(format!(
                        "layer '{}' has a filter with an empty operator",
                        self.name()
                    )));
                }
                EffectDef::Rotate { canvas, .. } => check_size(canvas, self.name(), "rotate")?,
                EffectDef::Command { process, .. }
                    if process.as_deref().is_some_and(|p| p.trim().is_empty()) =>
                {
                    return Err(LaminateError::validation(format!(
                        "layer '{}' has a command with an empty process",
                        self.name()
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Convert this definition and its overlays, children first, so every layer is built from
    /// already-built overlays.
    pub fn into_layer(self, base_dir: &Path) -> LaminateResult<Layer> {
        let overlays = self
            .overlays
            .into_iter()
            .map(|def| def.into_layer(base_dir))
            .collect::<LaminateResult<Vec<_>>>()?;

        let foundation: Box<dyn Drawable> = match self.foundation {
            FoundationDef::Image { path } => Box::new(ImageFile::new(resolve(base_dir, path))),
            FoundationDef::Canvas { size, color } => Box::new(Canvas::new(size, color)),
        };
        let opts = LayerOpts {
            overlays,
            effects: self.effects.into_iter().map(EffectDef::into_drawable).collect(),
            primitives: self
                .primitives
                .into_iter()
                .map(PrimitiveDef::into_drawable)
                .collect(),
            offset: self.offset,
            gravity: self.gravity,
            draw_primitives_first: self.draw_primitives_first,
            id: self.id,
        };
        Layer::from_boxed(foundation, opts)
    }
}

impl EffectDef {
    fn into_drawable(self) -> Box<dyn Drawable> {
        match self {
            Self::Filter { operator, value } => Box::new(Filter { operator, value }),
            Self::Rotate {
                degrees,
                canvas,
                background,
            } => {
                let mut rotate = Rotate::new(degrees, canvas);
                if let Some(bg) = background {
                    rotate.background = bg;
                }
                Box::new(rotate)
            }
            Self::Command {
                process,
                args,
                consolidatable,
            } => Box::new(Command {
                process: process.unwrap_or_else(|| DEFAULT_PROCESS.to_string()),
                args,
                consolidatable,
            }),
        }
    }
}

impl PrimitiveDef {
    fn into_drawable(self) -> Box<dyn Drawable> {
        match self {
            Self::Draw {
                shape,
                fill,
                stroke,
                stroke_width,
            } => Box::new(Draw {
                shape,
                fill,
                stroke,
                stroke_width,
            }),
            Self::Label {
                text,
                font,
                point_size,
                fill,
                gravity,
                offset,
            } => Box::new(Label {
                text,
                font,
                point_size,
                fill,
                gravity,
                offset,
            }),
        }
    }
}

fn check_size(size: &Size, layer: &str, what: &str) -> LaminateResult<()> {
    if size.width == 0 || size.height == 0 {
        return Err(LaminateError::validation(format!(
            "layer '{layer}' has a {what} size with a zero dimension"
        )));
    }
    Ok(())
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
