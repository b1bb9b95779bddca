use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    assert_eq!(over_px([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over_px([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends() {
    // Premultiplied white @ 50% over opaque black.
    let out = over_px([0, 0, 0, 255], [128, 128, 128, 128]);
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn premultiply_handles_extremes() {
    let mut px = vec![200u8, 100, 50, 0, 200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 200, 100, 50, 255]);
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]);
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]);
    assert_eq!(dst, src);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![255u8, 255, 255, 255, 64, 32, 0, 128, 9, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![255, 255, 255, 255, 128, 64, 0, 128, 9, 9, 9, 0]);
}
