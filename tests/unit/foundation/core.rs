use super::*;

#[test]
fn offset_geometry_always_carries_signs() {
    assert_eq!(Offset::new(5, 5).geometry(), "+5+5");
    assert_eq!(Offset::new(-11, -11).geometry(), "-11-11");
    assert_eq!(Offset::new(0, -3).geometry(), "+0-3");
    assert_eq!(Offset::default().to_string(), "+0+0");
}

#[test]
fn offset_deserializes_from_array_or_object() {
    let a: Offset = serde_json::from_str("[3, -4]").unwrap();
    let b: Offset = serde_json::from_str(r#"{"x": 3, "y": -4}"#).unwrap();
    assert_eq!(a, Offset::new(3, -4));
    assert_eq!(a, b);
}

#[test]
fn gravity_uses_tool_names_and_snake_case_json() {
    assert_eq!(Gravity::NorthWest.as_str(), "NorthWest");
    assert_eq!(Gravity::Center.to_string(), "Center");
    assert_eq!(Gravity::default(), Gravity::NorthWest);

    let g: Gravity = serde_json::from_str(r#""south_east""#).unwrap();
    assert_eq!(g, Gravity::SouthEast);
}

#[test]
fn output_format_is_inferred_from_extension() {
    assert_eq!(
        OutputFormat::from_path(Path::new("out/a.PNG")),
        Some(OutputFormat::Png)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("a.jpeg")),
        Some(OutputFormat::Jpeg)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("a.tif")),
        Some(OutputFormat::Tiff)
    );
    assert_eq!(OutputFormat::from_path(Path::new("a.xcf")), None);
    assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
}

#[test]
fn output_arg_prefixes_the_format() {
    assert_eq!(
        OutputFormat::Jpeg.output_arg(Path::new("/tmp/out.jpg")),
        "JPEG:/tmp/out.jpg"
    );
    assert_eq!(Size::new(142, 142).geometry(), "142x142");
}
