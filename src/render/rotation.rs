//! Geometry correction for effects that enlarge the working canvas.
//!
//! A rotation renders onto a square sized to the image diagonal so nothing is clipped. The
//! content stays centered, so the enlarged canvas grows by half the size difference on each
//! side, and the placement offset must move back by that amount to keep the original anchor.

use crate::drawable::Drawable;
use crate::foundation::core::{Offset, Size};

/// Bounding square of `size` rotated by any angle: `ceil(sqrt(w² + h²))` per axis.
pub fn rotated_bounds(size: Size) -> Size {
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let diagonal = (w * w + h * h).sqrt().ceil() as u32;
    Size::new(diagonal, diagonal)
}

/// Offset that places a canvas grown from `before` to `after` at the same visual anchor.
///
/// Each axis moves by half the growth, halved with floor division: when the growth is odd the
/// extra pixel lands on the far (east/south) side. Shrinking canvases move the other way.
pub fn compensate(offset: Offset, before: Size, after: Size) -> Offset {
    let dx = i64::from(after.width) - i64::from(before.width);
    let dy = i64::from(after.height) - i64::from(before.height);
    Offset::new(offset.x - dx.div_euclid(2), offset.y - dy.div_euclid(2))
}

/// Apply [`compensate`] once for every canvas-changing effect in `effects`, in order.
pub fn compensate_effects(offset: Offset, effects: &[Box<dyn Drawable>]) -> Offset {
    effects.iter().fold(offset, |offset, effect| {
        match effect.canvas_change() {
            Some(change) => {
                let corrected = compensate(offset, change.before, change.after);
                tracing::debug!(
                    effect = %effect.label(),
                    before = %change.before.geometry(),
                    after = %change.after.geometry(),
                    from = %offset,
                    to = %corrected,
                    "compensated offset for canvas growth"
                );
                corrected
            }
            None => offset,
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/rotation.rs"]
mod tests;
