use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Signed placement offset in pixels, relative to the parent layer's gravity anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Offset {
    /// Horizontal offset (positive moves away from the anchor towards the east).
    pub x: i64,
    /// Vertical offset (positive moves away from the anchor towards the south).
    pub y: i64,
}

impl Offset {
    /// Create an offset.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Geometry string as understood by the raster tool, e.g. `+5-3`.
    pub fn geometry(self) -> String {
        format!("{:+}{:+}", self.x, self.y)
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([i64; 2]),
            Obj { x: i64, y: i64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.geometry())
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometry string `WxH`.
    pub fn geometry(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Anchor used when compositing overlays onto a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    /// Name as accepted by the tool's `-gravity` option.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NorthWest => "NorthWest",
            Self::North => "North",
            Self::NorthEast => "NorthEast",
            Self::West => "West",
            Self::Center => "Center",
            Self::East => "East",
            Self::SouthWest => "SouthWest",
            Self::South => "South",
            Self::SouthEast => "SouthEast",
        }
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded image format for rendered files.
///
/// Intermediate files are always written as PNG; the requested format only applies to the
/// final output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    Webp,
    Tiff,
    Bmp,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }

    /// Explicit format prefix for output arguments (`PNG:out.png`).
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Webp => "WEBP",
            Self::Tiff => "TIFF",
            Self::Bmp => "BMP",
        }
    }

    /// Guess the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Output argument writing `path` in this format.
    pub fn output_arg(self, path: &Path) -> String {
        format!("{}:{}", self.tool_name(), path.display())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
