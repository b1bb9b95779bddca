use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_names_case_insensitively() {
    let c: Color = serde_json::from_value(json!("White")).unwrap();
    assert_eq!(c, Color::white());
    let c: Color = serde_json::from_value(json!("black")).unwrap();
    assert_eq!(c.to_rgba8_premul(), Rgba8Premul::from_straight_rgba(0, 0, 0, 255));
    assert!(Color::parse("chartreuse-ish").is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<Color>(json!([0.1, 0.2])).is_err());
}

#[test]
fn premul_conversion_scales_by_alpha() {
    let c = Color::rgba(1.0, 1.0, 1.0, 0.5);
    let p = c.to_rgba8_premul();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(c.to_rgba8_straight(), [255, 255, 255, 128]);
}
