use super::*;
use crate::drawable::effect::{Command, Filter, Rotate};
use crate::drawable::foundation::{Canvas, ImageFile};
use crate::drawable::primitive::Draw;
use crate::foundation::core::Size;
use crate::layer::model::LayerOpts;

fn scene() -> Layer {
    let badge = Layer::new(
        ImageFile::new("badge.png"),
        LayerOpts {
            effects: vec![
                Box::new(Rotate::new(45.0, Size::new(100, 100))),
                Box::new(Filter::new("blur", "0x1")),
                Box::new(Command::new("mogrify", vec!["-flip".to_string()])),
            ],
            primitives: vec![Box::new(Draw::new("point 1,1"))],
            draw_primitives_first: false,
            offset: Offset::new(10, 10),
            ..LayerOpts::default()
        },
    )
    .unwrap();

    Layer::new(
        Canvas::new(Size::new(640, 480), "white"),
        LayerOpts {
            overlays: vec![badge, Layer::leaf(ImageFile::new("logo.png"))],
            primitives: vec![Box::new(Draw::new("line 0,0 10,10"))],
            ..LayerOpts::default()
        },
    )
    .unwrap()
}

#[test]
fn deferral_needs_effects_first_with_both_effects_and_primitives() {
    let plain = Layer::new(
        ImageFile::new("a.png"),
        LayerOpts {
            primitives: vec![Box::new(Draw::new("point 1,1"))],
            draw_primitives_first: false,
            ..LayerOpts::default()
        },
    )
    .unwrap();
    assert!(!primitives_deferred(&plain));

    let tree = scene();
    assert!(!primitives_deferred(&tree));
    assert!(primitives_deferred(&tree.overlays()[0]));
}

#[test]
fn plan_counts_every_invocation() {
    let plan = RenderPlan::build(&scene()).unwrap();
    assert_eq!(plan.layers.len(), 3);

    // root: foundation (+primitives) and composite.
    assert_eq!(plan.layers[0].invocation_count(), 2);
    // badge: foundation, two groups, deferred primitives.
    assert_eq!(plan.layers[1].invocation_count(), 4);
    // logo: foundation only.
    assert_eq!(plan.layers[2].invocation_count(), 1);

    assert_eq!(plan.invocation_count(), 7);
    assert_eq!(plan.effect_group_count(), 2);
    assert_eq!(
        plan.layers[1].groups,
        vec![
            GroupPlan {
                process: "convert".to_string(),
                effects: vec!["rotate(45)".to_string(), "blur(0x1)".to_string()],
            },
            GroupPlan {
                process: "mogrify".to_string(),
                effects: vec!["mogrify[-flip]".to_string()],
            },
        ]
    );
}

#[test]
fn plan_reports_compensated_offsets() {
    let plan = RenderPlan::build(&scene()).unwrap();
    assert_eq!(plan.layers[1].offset, Offset::new(-11, -11));
    assert_eq!(plan.layers[2].offset, Offset::new(0, 0));
}

#[test]
fn display_lists_layers_and_totals() {
    let text = RenderPlan::build(&scene()).unwrap().to_string();
    assert!(text.contains("root canvas(640x480 white) [2 invocation(s)]"));
    assert!(text.contains("  root/0 image(badge.png) [4 invocation(s)]"));
    assert!(text.contains("group 1 (mogrify): mogrify[-flip]"));
    assert!(text.contains("placed at -11-11"));
    assert!(text.contains("1 primitive(s) after effects"));
    assert!(text.ends_with("total: 7 invocation(s), 2 effect group(s)\n"));
}

#[test]
fn processes_cover_foundations_groups_and_compositing() {
    let plan = RenderPlan::build(&scene()).unwrap();
    assert_eq!(
        plan.processes().into_iter().collect::<Vec<_>>(),
        ["convert", "mogrify"]
    );
    assert_eq!(plan.layers[1].process, "convert");

    let custom = Layer::leaf(Command::new("gm", vec!["-flip".to_string()]));
    let plan = RenderPlan::build(&custom).unwrap();
    assert_eq!(plan.processes().into_iter().collect::<Vec<_>>(), ["gm"]);
}
