use crate::drawable::Drawable;
use crate::foundation::core::{Gravity, Offset};
use crate::foundation::error::{LaminateError, LaminateResult};

/// Deepest overlay nesting accepted, counting the root as depth 0.
pub const MAX_LAYER_DEPTH: usize = 256;

/// Everything about a [`Layer`] except its foundation.
///
/// Defaults: no overlays, effects, or primitives; offset `(0, 0)`; gravity `NorthWest`;
/// primitives drawn before effects; no id.
#[derive(Debug)]
pub struct LayerOpts {
    /// Child layers composited onto this one, bottom to top.
    pub overlays: Vec<Layer>,
    /// Effects applied to the foundation, in visual order.
    pub effects: Vec<Box<dyn Drawable>>,
    /// Primitives drawn onto the foundation.
    pub primitives: Vec<Box<dyn Drawable>>,
    /// Placement relative to the parent's gravity anchor. Ignored on the root.
    pub offset: Offset,
    /// Anchor used when compositing this layer's overlays.
    pub gravity: Gravity,
    /// Draw primitives before running effects (`true`) or onto the effect result (`false`).
    pub draw_primitives_first: bool,
    /// Diagnostic label; never used for identity.
    pub id: Option<String>,
}

impl Default for LayerOpts {
    fn default() -> Self {
        Self {
            overlays: Vec::new(),
            effects: Vec::new(),
            primitives: Vec::new(),
            offset: Offset::default(),
            gravity: Gravity::default(),
            draw_primitives_first: true,
            id: None,
        }
    }
}

/// A node of the composition tree: a foundation with its own effects and primitives, plus
/// overlay layers composited on top.
///
/// Layers own their overlays, so a tree cannot contain cycles or shared nodes. A layer is
/// immutable once built; the renderer only ever borrows it.
#[derive(Debug)]
pub struct Layer {
    foundation: Box<dyn Drawable>,
    overlays: Vec<Layer>,
    effects: Vec<Box<dyn Drawable>>,
    primitives: Vec<Box<dyn Drawable>>,
    offset: Offset,
    gravity: Gravity,
    draw_primitives_first: bool,
    id: Option<String>,
    height: usize,
}

impl Layer {
    /// Build a layer. Fails when the overlay nesting would exceed [`MAX_LAYER_DEPTH`].
    pub fn new(foundation: impl Drawable + 'static, opts: LayerOpts) -> LaminateResult<Self> {
        Self::from_boxed(Box::new(foundation), opts)
    }

    pub fn from_boxed(foundation: Box<dyn Drawable>, opts: LayerOpts) -> LaminateResult<Self> {
        let height = opts
            .overlays
            .iter()
            .map(|o| o.height + 1)
            .max()
            .unwrap_or(0);
        if height > MAX_LAYER_DEPTH {
            return Err(LaminateError::structure(format!(
                "layer nesting of {height} exceeds the maximum depth of {MAX_LAYER_DEPTH}"
            )));
        }

        let LayerOpts {
            overlays,
            effects,
            primitives,
            offset,
            gravity,
            draw_primitives_first,
            id,
        } = opts;
        Ok(Self {
            foundation,
            overlays,
            effects,
            primitives,
            offset,
            gravity,
            draw_primitives_first,
            id,
            height,
        })
    }

    /// A layer with only a foundation.
    pub fn leaf(foundation: impl Drawable + 'static) -> Self {
        Self {
            foundation: Box::new(foundation),
            overlays: Vec::new(),
            effects: Vec::new(),
            primitives: Vec::new(),
            offset: Offset::default(),
            gravity: Gravity::default(),
            draw_primitives_first: true,
            id: None,
            height: 0,
        }
    }

    pub fn foundation(&self) -> &dyn Drawable {
        self.foundation.as_ref()
    }

    pub fn overlays(&self) -> &[Layer] {
        &self.overlays
    }

    pub fn effects(&self) -> &[Box<dyn Drawable>] {
        &self.effects
    }

    pub fn primitives(&self) -> &[Box<dyn Drawable>] {
        &self.primitives
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn draw_primitives_first(&self) -> bool {
        self.draw_primitives_first
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Levels of overlays below this layer (0 for a leaf).
    pub fn height(&self) -> usize {
        self.height
    }

    /// The id when set, otherwise the foundation's label.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.foundation.label(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
