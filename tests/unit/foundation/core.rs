use super::*;

#[test]
fn fps_frame_time_and_coverage() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_time_secs(FrameIndex(15)) - 0.5).abs() < 1e-12);
    assert_eq!(fps.frames_covering(5.5), 165);
    assert_eq!(fps.frames_covering(0.01), 1);
    assert_eq!(fps.frames_covering(0.0), 0);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn from_rgba_image_premultiplies_and_flags_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![200, 100, 50, 255, 200, 100, 50, 128]).unwrap();
    let frame = Frame::from_rgba_image(img);
    assert_eq!(frame.alpha, AlphaMode::Premultiplied);
    assert_eq!(frame.pixel(0, 0), [200, 100, 50, 255]);
    assert_eq!(frame.pixel(1, 0)[3], 128);
    assert!(frame.pixel(1, 0)[0] < 200);

    let opaque = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    assert!(Frame::from_rgba_image(opaque).is_opaque());
}

#[test]
fn draw_over_clips_and_blends() {
    let mut dst = Frame::solid(4, 4, Rgba8Premul::from_straight_rgba(0, 0, 255, 255));
    let top = Frame::solid(2, 2, Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    dst.draw_over(&top, 3, 3);
    assert_eq!(dst.pixel(3, 3), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(2, 2), [0, 0, 255, 255]);

    let clear = Frame::transparent(4, 4);
    dst.draw_over(&clear, 0, 0);
    assert_eq!(dst.pixel(0, 0), [0, 0, 255, 255]);
    assert!(dst.is_opaque());
}

#[test]
fn draw_over_outside_is_noop() {
    let mut dst = Frame::solid(2, 2, Rgba8Premul::from_straight_rgba(9, 9, 9, 255));
    let before = dst.clone();
    let top = Frame::solid(2, 2, Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    dst.draw_over(&top, -5, 0);
    dst.draw_over(&top, 0, 7);
    assert_eq!(dst, before);
}

#[test]
fn premul_bytes_length_is_checked() {
    assert!(Frame::from_premul_bytes(2, 2, vec![0; 15]).is_err());
    let f = Frame::from_premul_bytes(1, 1, vec![0, 0, 0, 255]).unwrap();
    assert!(f.is_opaque());
}

#[test]
fn export_unpremultiplies_translucent_frames() {
    let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([200, 100, 0, 128]));
    let frame = Frame::from_rgba_image(img);
    let out = frame.to_rgba_image().unwrap();
    let px = out.get_pixel(1, 0).0;
    assert_eq!(px[3], 128);
    assert!((i16::from(px[0]) - 200).abs() <= 1);
    assert!((i16::from(px[1]) - 100).abs() <= 1);
}
