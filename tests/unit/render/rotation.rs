use super::*;
use crate::drawable::effect::{Filter, Rotate};

#[test]
fn rotated_bounds_uses_the_diagonal() {
    assert_eq!(rotated_bounds(Size::new(100, 100)), Size::new(142, 142));
    assert_eq!(rotated_bounds(Size::new(3, 4)), Size::new(5, 5));
    assert_eq!(rotated_bounds(Size::new(0, 0)), Size::new(0, 0));
}

#[test]
fn square_rotation_moves_offset_by_half_the_growth() {
    let corrected = compensate(
        Offset::new(10, 10),
        Size::new(100, 100),
        rotated_bounds(Size::new(100, 100)),
    );
    assert_eq!(corrected, Offset::new(-11, -11));
}

#[test]
fn odd_growth_floors_the_half() {
    // 100x50 -> 112x112: dx = 12, dy = 62.
    let after = rotated_bounds(Size::new(100, 50));
    assert_eq!(after, Size::new(112, 112));
    assert_eq!(
        compensate(Offset::new(0, 0), Size::new(100, 50), after),
        Offset::new(-6, -31)
    );

    // dx = 5 -> 2, dy = 1 -> 0.
    assert_eq!(
        compensate(Offset::new(0, 0), Size::new(10, 10), Size::new(15, 11)),
        Offset::new(-2, 0)
    );
}

#[test]
fn shrinking_canvas_floors_towards_negative_infinity() {
    // dx = -5 -> -3 under floor division, so the offset grows by 3.
    assert_eq!(
        compensate(Offset::new(0, 0), Size::new(15, 10), Size::new(10, 10)),
        Offset::new(3, 0)
    );
}

#[test]
fn compensation_applies_once_per_canvas_changing_effect() {
    let effects: Vec<Box<dyn Drawable>> = vec![
        Box::new(Rotate::new(30.0, Size::new(100, 100))),
        Box::new(Filter::new("blur", "0x1")),
        Box::new(Rotate::new(15.0, Size::new(142, 142))),
    ];

    // 100 -> 142 (-21), then 142 -> 201 (-29).
    let out = compensate_effects(Offset::new(10, 10), &effects);
    assert_eq!(rotated_bounds(Size::new(142, 142)), Size::new(201, 201));
    assert_eq!(out, Offset::new(10 - 21 - 29, 10 - 21 - 29));
}

#[test]
fn effects_without_canvas_change_leave_offset_alone() {
    let effects: Vec<Box<dyn Drawable>> = vec![Box::new(Filter::flag("negate"))];
    assert_eq!(
        compensate_effects(Offset::new(7, -3), &effects),
        Offset::new(7, -3)
    );
}
