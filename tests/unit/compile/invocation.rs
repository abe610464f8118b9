use std::path::PathBuf;

use super::*;
use crate::compile::consolidate::group_consolidatable;
use crate::drawable::effect::{Command, Filter};
use crate::drawable::foundation::{Canvas, ImageFile};
use crate::drawable::primitive::Draw;
use crate::foundation::core::Size;

#[test]
fn foundation_with_primitives_writes_output_last() {
    let canvas = Canvas::new(Size::new(100, 100), "white");
    let prims: Vec<Box<dyn Drawable>> = vec![Box::new(Draw::filled("circle 50,50 60,60", "red"))];
    let inv = foundation_invocation(
        &canvas,
        &prims,
        Path::new("/s/a/foundation.png"),
        OutputFormat::Png,
    )
    .unwrap();

    assert_eq!(inv.command, "convert");
    assert_eq!(
        inv.args,
        vec![
            "-size",
            "100x100",
            "xc:white",
            "-fill",
            "red",
            "-draw",
            "circle 50,50 60,60",
            "PNG:/s/a/foundation.png"
        ]
    );
}

#[test]
fn group_leader_reads_previous_output_and_followers_append() {
    let effects: Vec<Box<dyn Drawable>> = vec![
        Box::new(Filter::new("blur", "0x2")),
        Box::new(Filter::new("modulate", "110")),
        Box::new(Command::new("mogrify", vec!["-flip".to_string()])),
    ];
    let groups = group_consolidatable(&effects);
    assert_eq!(groups.len(), 2);

    let input = PathBuf::from("/s/a/foundation.png");
    let first = group_invocation(
        &groups[0],
        &input,
        Path::new("/s/a/group-0.png"),
        OutputFormat::Png,
    )
    .unwrap();
    assert_eq!(
        first.args,
        vec![
            "/s/a/foundation.png",
            "-blur",
            "0x2",
            "-modulate",
            "110",
            "PNG:/s/a/group-0.png"
        ]
    );

    let second = group_invocation(
        &groups[1],
        Path::new("/s/a/group-0.png"),
        Path::new("/s/a/group-1.jpg"),
        OutputFormat::Jpeg,
    )
    .unwrap();
    assert_eq!(second.command, "mogrify");
    assert_eq!(
        second.args,
        vec!["/s/a/group-0.png", "-flip", "JPEG:/s/a/group-1.jpg"]
    );
}

#[test]
fn group_source_override_never_touches_the_effect() {
    let effects: Vec<Box<dyn Drawable>> = vec![Box::new(ImageFile::new("declared.png"))];
    let groups = group_consolidatable(&effects);
    let inv = group_invocation(
        &groups[0],
        Path::new("/s/prev.png"),
        Path::new("/s/out.png"),
        OutputFormat::Png,
    )
    .unwrap();
    assert_eq!(inv.args, vec!["/s/prev.png", "PNG:/s/out.png"]);
    assert_eq!(
        effects[0].source(),
        Some(Path::new("declared.png")),
        "declared source must survive"
    );
}

#[test]
fn deferred_primitives_use_the_given_command() {
    let prims: Vec<Box<dyn Drawable>> = vec![
        Box::new(Draw::new("point 1,1")),
        Box::new(Draw::new("point 2,2")),
    ];
    let inv = primitives_invocation(
        "magick",
        &prims,
        Path::new("in.png"),
        Path::new("out.png"),
        OutputFormat::Png,
    );
    assert_eq!(inv.command, "magick");
    assert_eq!(
        inv.args,
        vec!["in.png", "-draw", "point 1,1", "-draw", "point 2,2", "PNG:out.png"]
    );
}

#[test]
fn display_quotes_arguments_with_spaces() {
    let inv = Invocation {
        command: "convert".to_string(),
        args: vec![
            "a.png".to_string(),
            "-draw".to_string(),
            "point 1,1".to_string(),
        ],
    };
    assert_eq!(inv.to_string(), r#"convert a.png -draw "point 1,1""#);
}
