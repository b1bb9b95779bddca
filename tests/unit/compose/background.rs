use super::*;
use crate::audio::pcm::AudioPcm;

#[path = "fakes.rs"]
mod fakes;
use fakes::*;

fn canvas() -> Canvas {
    Canvas {
        width: 8,
        height: 8,
    }
}

fn fps() -> Fps {
    Fps::new(10, 1).unwrap()
}

#[test]
fn not_requested_without_path() {
    let mut decoder = FakeDecoder::default();
    let (bg, outcome) = load_background_video(None, &mut decoder, canvas(), fps(), 3.0);
    assert!(bg.is_none());
    assert_eq!(outcome, LayerOutcome::NotRequested);
}

#[test]
fn missing_file_is_skipped_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.mp4");
    let mut decoder = FakeDecoder::default();
    let (bg, outcome) = load_background_video(Some(&path), &mut decoder, canvas(), fps(), 3.0);
    assert!(bg.is_none());
    let LayerOutcome::Skipped { reason } = outcome else {
        panic!("expected skip");
    };
    assert!(reason.contains("not found"), "{reason}");
}

#[test]
fn undecodable_video_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch(dir.path(), "bg.mp4");
    let mut decoder = FakeDecoder::default();
    let (bg, outcome) = load_background_video(Some(&path), &mut decoder, canvas(), fps(), 3.0);
    assert!(bg.is_none());
    assert!(matches!(outcome, LayerOutcome::Skipped { .. }));
}

#[test]
fn short_video_loops_and_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch(dir.path(), "bg.mp4");
    let mut decoder = FakeDecoder::default().with_video(&path, 2.0);
    let (bg, outcome) = load_background_video(Some(&path), &mut decoder, canvas(), fps(), 5.5);
    assert!(outcome.is_applied());
    let mut bg = bg.unwrap();
    assert_eq!(bg.plan().loops_needed(), 3);
    assert_eq!(bg.plan().duration(), 5.5);

    let t = 5.5 - 0.05;
    let expected = FakeVideo::source_index(fps(), t % 2.0);
    assert_eq!(bg.frame_at(t).unwrap(), index_frame(canvas(), expected));
    assert_eq!(bg.frame_at(2.3).unwrap(), index_frame(canvas(), 3));
}

#[test]
fn zero_volume_music_leaves_narration_identical() {
    let narration = tone(2.0, 0.5);
    let music = tone(0.7, 0.9);
    let mixed = mix_music(&narration, &music, 0.0, 2.0).unwrap();
    assert_eq!(mixed, narration);
}

#[test]
fn music_is_summed_not_replacing() {
    let narration = tone(1.0, 0.25);
    let music = tone(0.3, 0.5);
    let mixed = mix_music(&narration, &music, 0.5, 1.0).unwrap();
    assert_eq!(mixed.frames(), narration.frames());
    assert!(mixed.interleaved_f32.iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn loud_mix_is_plain_sum() {
    let narration = tone(1.0, 0.75);
    let music = tone(0.5, 0.8);
    let mixed = mix_music(&narration, &music, 1.0, 1.0).unwrap();
    assert!(mixed.interleaved_f32.iter().all(|&s| (s - 1.55).abs() < 1e-6));
}

#[test]
fn music_becomes_sole_track_without_narration() {
    let empty = AudioPcm::silent(RATE, 2, 0);
    let music = tone(0.4, 0.5);
    let mixed = mix_music(&empty, &music, 1.0, 1.0).unwrap();
    assert_eq!(mixed.duration_sec(), 1.0);
    assert!(mixed.interleaved_f32.iter().all(|&s| s == 0.5));
}

#[test]
fn music_failure_keeps_soundtrack() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch(dir.path(), "music.mp3");
    let mut decoder = FakeDecoder::default();
    let narration = tone(1.0, 0.1);
    let (track, outcome) =
        apply_background_music(Some(&path), &mut decoder, narration.clone(), 0.3, 1.0);
    assert_eq!(track, narration);
    assert!(matches!(outcome, LayerOutcome::Skipped { .. }));
}

#[test]
fn music_applied_when_decodable() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch(dir.path(), "music.mp3");
    let mut decoder = FakeDecoder::default().with_audio(&path, tone(0.5, 0.2));
    let (track, outcome) =
        apply_background_music(Some(&path), &mut decoder, tone(1.0, 0.1), 0.5, 1.0);
    assert_eq!(outcome, LayerOutcome::Applied);
    assert!(track.interleaved_f32.iter().all(|&s| (s - 0.2).abs() < 1e-6));
}
