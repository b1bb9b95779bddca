use std::path::Path;

use super::*;
use crate::compose::progress::{NoProgress, Progress};
use crate::encode::sink::InMemorySink;
use crate::script::model::Scene;

#[path = "fakes.rs"]
mod fakes;
use fakes::*;

fn scene(n: u32) -> Scene {
    Scene {
        scene_number: n,
        dialogue: format!("line {n}"),
        dialogue_for_tts: None,
        image_prompt: "prompt".into(),
        duration: 1.0,
        subtitle: format!("S{n}"),
    }
}

fn script(numbers: &[u32]) -> Script {
    Script {
        title: "test".into(),
        description: String::new(),
        scenes: numbers.iter().copied().map(scene).collect(),
        total_duration: 0.0,
    }
}

struct Fixture {
    images: SceneAssetMap,
    audio: SceneAssetMap,
    decoder: FakeDecoder,
}

/// Scene 1 lasts 2.0s, scene 2 lasts 3.5s.
fn two_scenes(dir: &Path, rgba: [u8; 4]) -> Fixture {
    let mut images = SceneAssetMap::new();
    let mut audio = SceneAssetMap::new();
    let mut decoder = FakeDecoder::default();
    for (n, secs, level) in [(1u32, 2.0, 0.25f32), (2, 3.5, 0.5)] {
        images.insert(n, write_png(dir, &format!("img{n}.png"), 8, 12, rgba));
        let a = touch(dir, &format!("aud{n}.wav"));
        decoder = decoder.with_audio(&a, tone(secs, level));
        audio.insert(n, a);
    }
    Fixture {
        images,
        audio,
        decoder,
    }
}

fn narration() -> Vec<f32> {
    let mut expected = tone(2.0, 0.25).interleaved_f32;
    expected.extend(tone(3.5, 0.5).interleaved_f32);
    expected
}

#[test]
fn timeline_is_sum_of_narrations() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let mut sink = InMemorySink::new();

    let report = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.duration_sec, 5.5);
    assert_eq!(report.clip_count, 2);
    assert_eq!(report.frame_count, 55);
    assert!(report.skipped_scenes.is_empty());
    assert!(report.subtitle_failures.is_empty());
    assert_eq!(report.background, LayerOutcome::NotRequested);
    assert_eq!(report.music, LayerOutcome::NotRequested);

    assert!(sink.ended());
    assert_eq!(sink.frames().len(), 55);
    let sink_cfg = sink.config().unwrap();
    assert_eq!((sink_cfg.width, sink_cfg.height), (32, 48));
    assert_eq!(sink_cfg.bitrate, cfg.bitrate);
    let audio = sink_cfg.audio.as_ref().unwrap();
    assert_eq!(audio.interleaved_f32, narration());
}

#[test]
fn zero_volume_music_is_applied_but_inaudible() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let music = touch(dir.path(), "music.mp3");
    fx.decoder = fx.decoder.with_audio(&music, tone(0.8, 0.9));
    let mut cfg = small_config();
    cfg.background_music_path = Some(music);
    cfg.background_music_volume = 0.0;
    let mut sink = InMemorySink::new();

    let report = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.music, LayerOutcome::Applied);
    let audio = sink.config().unwrap().audio.as_ref().unwrap();
    assert_eq!(audio.interleaved_f32, narration());
}

#[test]
fn scene_with_missing_image_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    fx.images.insert(1, dir.path().join("gone.png"));
    let cfg = small_config();
    let mut sink = InMemorySink::new();

    let report = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.clip_count, 1);
    assert_eq!(report.duration_sec, 3.5);
    assert_eq!(report.frame_count, 35);
    assert_eq!(report.skipped_scenes.len(), 1);
    assert_eq!(report.skipped_scenes[0].scene_number, 1);
    let audio = sink.config().unwrap().audio.as_ref().unwrap();
    assert_eq!(audio.interleaved_f32, tone(3.5, 0.5).interleaved_f32);
}

#[test]
fn all_scenes_skipped_is_no_clips() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let mut sink = InMemorySink::new();

    let err = compose_with(
        &script(&[1, 2]),
        &SceneAssetMap::new(),
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::NoClips(_)), "{err}");
    assert!(sink.config().is_none());
}

#[test]
fn empty_script_is_no_clips() {
    let cfg = small_config();
    let mut sink = InMemorySink::new();
    let err = compose_with(
        &script(&[]),
        &SceneAssetMap::new(),
        &SceneAssetMap::new(),
        &cfg,
        &mut FakeDecoder::default(),
        &mut sink,
        &mut NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::NoClips(_)));
}

#[test]
fn invalid_config_fails_before_any_decode() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let mut cfg = small_config();
    cfg.fps = 0;
    let err = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut InMemorySink::new(),
        &mut NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(fx.decoder.audio_requests.is_empty());
}

#[test]
fn progress_is_monotonic_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let mut updates: Vec<Progress> = Vec::new();
    let mut on_progress = |p: &Progress| updates.push(p.clone());

    compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut InMemorySink::new(),
        &mut on_progress,
    )
    .unwrap();

    assert_eq!(updates.len(), 2 + 4);
    assert!(updates.windows(2).all(|w| w[0].fraction <= w[1].fraction));
    assert_eq!(updates.last().unwrap().fraction, 1.0);
    assert_eq!(updates.last().unwrap().stage, RenderStage::Encode);
    assert_eq!(
        updates[0].stage,
        RenderStage::Scene {
            index: 0,
            total: 2,
            scene_number: 1
        }
    );
}

#[test]
fn transparent_scenes_reveal_looping_background() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [0, 0, 0, 0]);
    let bg = touch(dir.path(), "bg.mp4");
    fx.decoder = fx.decoder.with_video(&bg, 2.0);
    let mut cfg = small_config();
    cfg.add_subtitles = false;
    cfg.background_video_path = Some(bg);
    let mut sink = InMemorySink::new();

    let report = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();
    assert_eq!(report.background, LayerOutcome::Applied);

    let fps = cfg.frame_rate().unwrap();
    let canvas = cfg.canvas();
    for i in [0usize, 19, 20, 54] {
        let (idx, frame) = &sink.frames()[i];
        let t = fps.frame_time_secs(*idx);
        let expected = FakeVideo::source_index(fps, t.rem_euclid(2.0));
        assert_eq!(frame, &index_frame(canvas, expected), "frame {}", idx.0);
    }
}

#[test]
fn opaque_scenes_hide_background() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let bg = touch(dir.path(), "bg.mp4");
    fx.decoder = fx.decoder.with_video(&bg, 2.0);
    let mut cfg = small_config();
    cfg.add_subtitles = false;
    cfg.background_video_path = Some(bg);
    let mut sink = InMemorySink::new();

    compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();
    let (_, frame) = &sink.frames()[30];
    assert_eq!(frame.pixel(16, 24), [200, 10, 10, 255]);
}

#[test]
fn missing_background_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let mut cfg = small_config();
    cfg.background_video_path = Some(dir.path().join("nowhere.mp4"));
    let mut sink = InMemorySink::new();

    let report = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();
    assert!(matches!(report.background, LayerOutcome::Skipped { .. }));
    assert_eq!(sink.frames().len(), 55);
}

/// Sink that rejects one frame, or rejects finalization when no frame index is given.
struct FailingSink {
    fail_at: Option<u64>,
    pushed: u64,
    ended_ok: bool,
}

impl FailingSink {
    fn at_frame(index: u64) -> Self {
        Self {
            fail_at: Some(index),
            pushed: 0,
            ended_ok: false,
        }
    }

    fn at_end() -> Self {
        Self {
            fail_at: None,
            pushed: 0,
            ended_ok: false,
        }
    }
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &Frame) -> ReelResult<()> {
        if self.fail_at == Some(idx.0) {
            return Err(ReelError::encode("encoder pipe closed"));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        if self.fail_at.is_none() {
            return Err(ReelError::encode("encoder exited with status 1"));
        }
        self.ended_ok = true;
        Ok(())
    }
}

#[test]
fn frame_write_failure_aborts_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let mut sink = FailingSink::at_frame(7);
    let mut updates: Vec<Progress> = Vec::new();
    let mut on_progress = |p: &Progress| updates.push(p.clone());

    let err = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut on_progress,
    )
    .unwrap_err();

    assert!(matches!(&err, ReelError::Encode(m) if m == "encoder pipe closed"));
    assert_eq!(sink.pushed, 7);
    assert!(!sink.ended_ok);
    assert!(updates.iter().all(|p| p.stage != RenderStage::Encode));
}

#[test]
fn finalize_failure_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let mut sink = FailingSink::at_end();

    let err = compose_with(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        &cfg,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap_err();

    assert!(matches!(&err, ReelError::Encode(m) if m.contains("status 1")));
    assert_eq!(sink.pushed, 55);
}

#[test]
fn subtitle_failures_are_reported_per_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mut fx = two_scenes(dir.path(), [200, 10, 10, 255]);
    let cfg = small_config();
    let builder = SceneClipBuilder::with_subtitles(&cfg, Some(Box::new(BrokenSubtitles)));
    let mut sink = InMemorySink::new();

    let report = compose_with_builder(
        &script(&[1, 2]),
        &fx.images,
        &fx.audio,
        builder,
        &mut fx.decoder,
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.subtitle_failures, vec![1, 2]);
    assert_eq!(report.clip_count, 2);
    assert_eq!(sink.frames().len(), 55);
    assert!(sink.ended());
    let (_, frame) = &sink.frames()[0];
    assert!(frame.data.chunks_exact(4).all(|px| px == [200, 10, 10, 255]));
}
