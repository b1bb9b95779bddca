use std::collections::BTreeMap;

use super::*;
use crate::config::AnimationAssignment;

#[path = "fakes.rs"]
mod fakes;
use fakes::*;

fn scene(n: u32, subtitle: &str) -> Scene {
    Scene {
        scene_number: n,
        dialogue: format!("dialogue {n}"),
        dialogue_for_tts: None,
        image_prompt: "prompt".into(),
        duration: 9.0,
        subtitle: subtitle.into(),
    }
}

fn built(outcome: SceneOutcome) -> (Clip, bool) {
    match outcome {
        SceneOutcome::Built {
            clip,
            subtitle_failed,
        } => (clip, subtitle_failed),
        SceneOutcome::Skipped(s) => panic!("unexpected skip: {s:?}"),
    }
}

#[test]
fn missing_image_skips_without_decoding_audio() {
    let dir = tempfile::tempdir().unwrap();
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(1.0, 0.1));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);

    let missing = dir.path().join("nope.png");
    let out = builder
        .build(&scene(3, ""), Some(&missing), Some(&audio), &mut decoder)
        .unwrap();
    let SceneOutcome::Skipped(skip) = out else {
        panic!("expected skip");
    };
    assert_eq!(skip.scene_number, 3);
    assert!(skip.reason.contains("image"), "{}", skip.reason);
    assert!(decoder.audio_requests.is_empty());
}

#[test]
fn missing_audio_entry_skips() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [1, 2, 3, 255]);
    let mut decoder = FakeDecoder::default();
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);

    let out = builder
        .build(&scene(1, ""), Some(&img), None, &mut decoder)
        .unwrap();
    let SceneOutcome::Skipped(skip) = out else {
        panic!("expected skip");
    };
    assert_eq!(skip.reason, "no audio asset assigned");
}

#[test]
fn narration_length_overrides_declared_duration() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 8, 8, [1, 2, 3, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(2.0, 0.25));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);

    let (clip, failed) = built(
        builder
            .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert!(!failed);
    assert_eq!(clip.duration(), 2.0);
    assert_eq!(clip.audio(), &tone(2.0, 0.25));
}

#[test]
fn explicit_null_entry_stays_static() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 8, 8, [200, 100, 50, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(3.0, 0.0));
    let mut cfg = small_config();
    cfg.enable_animation = true;
    let mut map = BTreeMap::new();
    map.insert(1, None);
    map.insert(2, Some(AnimationKind::SlideLeft));
    cfg.animation_assignment = AnimationAssignment::Explicit(map);
    let mut builder = SceneClipBuilder::new(&cfg);

    let (still, _) = built(
        builder
            .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert_eq!(still.animation(), None);
    assert_eq!(still.frame_at(0.0), still.frame_at(still.duration() / 2.0));

    let (moving, _) = built(
        builder
            .build(&scene(2, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert_eq!(moving.animation(), Some(AnimationKind::SlideLeft));
}

#[test]
fn animation_disabled_ignores_assignment() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 8, 8, [200, 100, 50, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(1.0, 0.0));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);
    let (clip, _) = built(
        builder
            .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert_eq!(clip.animation(), None);
}

#[test]
fn subtitle_is_centered_above_bottom_offset() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [0, 0, 255, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(1.0, 0.0));
    let mut cfg = small_config();
    cfg.width = 64;
    cfg.height = 128;
    let mut builder = SceneClipBuilder::new(&cfg);

    let (clip, failed) = built(
        builder
            .build(&scene(1, "A"), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert!(!failed);
    let frame = clip.frame_at(0.0);
    // Overlay: 10px line + 2 * 20px padding = 50px tall, bottom 4px above the frame edge.
    let overlay_top = 128 - 50 - 4;
    let glyph_left = (64 - 6) / 2;
    let row = overlay_top + 20 + 1;
    assert_eq!(frame.pixel(glyph_left, row), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(glyph_left - 1, row), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(0, 0), [0, 0, 255, 255]);
    assert_eq!(frame.pixel(63, 127), [0, 0, 255, 255]);
}

#[test]
fn empty_subtitle_text_draws_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [0, 0, 255, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(1.0, 0.0));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);

    let (clip, failed) = built(
        builder
            .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert!(!failed);
    let frame = clip.frame_at(0.0);
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
}

#[test]
fn undecodable_present_audio_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [0, 0, 255, 255]);
    let audio = touch(dir.path(), "broken.wav");
    let mut decoder = FakeDecoder::default();
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);
    let err = builder
        .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
        .unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
}

#[test]
fn silent_zero_length_narration_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [0, 0, 255, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(0.0, 0.0));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::new(&cfg);
    assert!(
        builder
            .build(&scene(1, ""), Some(&img), Some(&audio), &mut decoder)
            .is_err()
    );
}

#[test]
fn subtitle_failure_keeps_scene_without_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "i.png", 4, 4, [0, 0, 255, 255]);
    let audio = touch(dir.path(), "a.wav");
    let mut decoder = FakeDecoder::default().with_audio(&audio, tone(1.5, 0.2));
    let cfg = small_config();
    let mut builder = SceneClipBuilder::with_subtitles(&cfg, Some(Box::new(BrokenSubtitles)));

    let (clip, failed) = built(
        builder
            .build(&scene(1, "Hello"), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert!(failed);
    assert_eq!(clip.duration(), 1.5);
    let frame = clip.frame_at(0.0);
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));

    // Empty text never reaches the rasterizer.
    let (_, failed) = built(
        builder
            .build(&scene(2, ""), Some(&img), Some(&audio), &mut decoder)
            .unwrap(),
    );
    assert!(!failed);
}
