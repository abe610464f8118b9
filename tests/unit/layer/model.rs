use super::*;
use crate::drawable::effect::Filter;
use crate::drawable::foundation::{Canvas, ImageFile};
use crate::drawable::primitive::Draw;
use crate::foundation::core::Size;

fn nested(levels: usize) -> LaminateResult<Layer> {
    let mut layer = Layer::leaf(ImageFile::new("leaf.png"));
    for _ in 0..levels {
        layer = Layer::new(
            Canvas::transparent(Size::new(10, 10)),
            LayerOpts {
                overlays: vec![layer],
                ..LayerOpts::default()
            },
        )?;
    }
    Ok(layer)
}

#[test]
fn defaults_draw_primitives_first_at_origin() {
    let opts = LayerOpts::default();
    assert!(opts.draw_primitives_first);
    assert_eq!(opts.offset, Offset::new(0, 0));
    assert_eq!(opts.gravity, Gravity::NorthWest);
    assert!(opts.id.is_none());
}

#[test]
fn new_keeps_every_field() {
    let layer = Layer::new(
        ImageFile::new("base.png"),
        LayerOpts {
            overlays: vec![Layer::leaf(ImageFile::new("badge.png"))],
            effects: vec![Box::new(Filter::new("blur", "0x2"))],
            primitives: vec![Box::new(Draw::new("point 1,1"))],
            offset: Offset::new(3, 4),
            gravity: Gravity::Center,
            draw_primitives_first: false,
            id: Some("hero".to_string()),
        },
    )
    .unwrap();

    assert_eq!(layer.foundation().label(), "image(base.png)");
    assert_eq!(layer.overlays().len(), 1);
    assert_eq!(layer.effects().len(), 1);
    assert_eq!(layer.primitives().len(), 1);
    assert_eq!(layer.offset(), Offset::new(3, 4));
    assert_eq!(layer.gravity(), Gravity::Center);
    assert!(!layer.draw_primitives_first());
    assert_eq!(layer.id(), Some("hero"));
    assert_eq!(layer.label(), "hero");
    assert_eq!(layer.height(), 1);
}

#[test]
fn label_falls_back_to_foundation() {
    let layer = Layer::leaf(Canvas::new(Size::new(4, 4), "red"));
    assert_eq!(layer.label(), "canvas(4x4 red)");
    assert_eq!(layer.height(), 0);
}

#[test]
fn nesting_up_to_the_limit_is_accepted() {
    let layer = nested(MAX_LAYER_DEPTH).unwrap();
    assert_eq!(layer.height(), MAX_LAYER_DEPTH);
}

#[test]
fn nesting_beyond_the_limit_is_a_structure_error() {
    let err = nested(MAX_LAYER_DEPTH + 1).unwrap_err();
    assert!(matches!(err, LaminateError::Structure(_)));
}
