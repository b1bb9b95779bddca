use super::*;

fn at() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(7, 5, 1)
        .unwrap()
}

#[test]
fn scene_assets_are_zero_padded() {
    assert_eq!(
        generate_filename("audio", "mp3", Some(7), at()),
        "audio_scene007_20240309_070501.mp3"
    );
    assert_eq!(
        generate_filename("image", "png", Some(1234), at()),
        "image_scene1234_20240309_070501.png"
    );
}

#[test]
fn aggregate_outputs_have_no_scene_part() {
    assert_eq!(
        generate_filename("video", "mp4", None, at()),
        "video_20240309_070501.mp4"
    );
}

#[test]
fn default_video_path_lives_in_videos_dir() {
    let dirs = OutputDirs::new("out");
    let p = default_video_path(&dirs);
    assert_eq!(p.parent().unwrap(), std::path::Path::new("out/videos"));
    let name = p.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("video_") && name.ends_with(".mp4"), "{name}");
}
