use std::path::{Path, PathBuf};

use crate::assets::media::{FfmpegDecoder, MediaDecoder};
use crate::compose::background::{
    BackgroundVideo, LayerOutcome, apply_background_music, load_background_video,
};
use crate::compose::clip::{SceneClipBuilder, SceneOutcome, SkippedScene};
use crate::compose::progress::{ProgressSink, ProgressTracker, RenderStage};
use crate::compose::timeline::Timeline;
use crate::config::{OutputDirs, RenderConfig};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, Frame, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::assets::SceneAssetMap;
use crate::script::model::Script;
use crate::script::naming::default_video_path;

/// Summary of a finished render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderReport {
    /// Written file, when the sink writes one.
    pub output_path: Option<PathBuf>,
    /// Timeline length in seconds (sum of narration lengths).
    pub duration_sec: f64,
    /// Frames handed to the sink.
    pub frame_count: u64,
    /// Scenes that produced a clip.
    pub clip_count: usize,
    /// Scenes left out for missing assets.
    pub skipped_scenes: Vec<SkippedScene>,
    /// Scene numbers whose subtitle overlay could not be drawn.
    pub subtitle_failures: Vec<u32>,
    /// Background video layer result.
    pub background: LayerOutcome,
    /// Background music layer result.
    pub music: LayerOutcome,
}

/// Render `script` to an MP4 file with the system `ffmpeg`.
///
/// `output_path` defaults to `videos/video_{timestamp}.mp4` under `OUTPUT_BASE_DIR`.
pub fn compose_video(
    script: &Script,
    images: &SceneAssetMap,
    audio: &SceneAssetMap,
    config: &RenderConfig,
    output_path: Option<&Path>,
    progress: &mut dyn ProgressSink,
) -> ReelResult<RenderReport> {
    if !is_ffmpeg_on_path() {
        return Err(ReelError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }
    let out_path = match output_path {
        Some(p) => p.to_path_buf(),
        None => default_video_path(&OutputDirs::from_env()),
    };

    let mut decoder = FfmpegDecoder::new();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out_path));
    let mut report = compose_with(
        script,
        images,
        audio,
        config,
        &mut decoder,
        &mut sink,
        progress,
    )?;
    tracing::info!(path = %out_path.display(), "video written");
    report.output_path = Some(out_path);
    Ok(report)
}

/// Render `script` through injectable media decoding and frame output.
///
/// Stages run in order: scene build, concatenation, background video, background music, encode.
/// Every clip and decoder resource is released before this returns, on success or failure.
#[tracing::instrument(level = "info", skip_all, fields(title = %script.title))]
pub fn compose_with(
    script: &Script,
    images: &SceneAssetMap,
    audio: &SceneAssetMap,
    config: &RenderConfig,
    decoder: &mut dyn MediaDecoder,
    sink: &mut dyn FrameSink,
    progress: &mut dyn ProgressSink,
) -> ReelResult<RenderReport> {
    config.validate()?;
    if script.scenes.is_empty() {
        return Err(ReelError::no_clips("the script has no scenes"));
    }
    compose_with_builder(
        script,
        images,
        audio,
        SceneClipBuilder::new(config),
        decoder,
        sink,
        progress,
    )
}

/// [`compose_with`] over a prepared clip builder; `config` must already be validated.
pub(crate) fn compose_with_builder(
    script: &Script,
    images: &SceneAssetMap,
    audio: &SceneAssetMap,
    mut builder: SceneClipBuilder<'_>,
    decoder: &mut dyn MediaDecoder,
    sink: &mut dyn FrameSink,
    progress: &mut dyn ProgressSink,
) -> ReelResult<RenderReport> {
    let config = builder.config();
    let fps = config.frame_rate()?;
    let canvas = config.canvas();
    let total = script.scenes.len();
    let mut tracker = ProgressTracker::new(progress, total);
    tracing::info!(scenes = total, width = canvas.width, height = canvas.height, "render started");

    let mut clips = Vec::with_capacity(total);
    let mut skipped_scenes = Vec::new();
    let mut subtitle_failures = Vec::new();
    for (index, scene) in script.scenes.iter().enumerate() {
        let n = scene.scene_number;
        let outcome = builder.build(scene, images.get(n), audio.get(n), decoder)?;
        let message = match outcome {
            SceneOutcome::Built {
                clip,
                subtitle_failed,
            } => {
                if subtitle_failed {
                    subtitle_failures.push(n);
                }
                clips.push(clip);
                format!("scene {n} built")
            }
            SceneOutcome::Skipped(skip) => {
                let message = format!("scene {n} skipped: {}", skip.reason);
                skipped_scenes.push(skip);
                message
            }
        };
        tracker.step(
            RenderStage::Scene {
                index,
                total,
                scene_number: n,
            },
            message,
        );
    }
    drop(builder);

    if clips.is_empty() {
        return Err(ReelError::no_clips(format!(
            "all {total} scenes were skipped for missing image or audio assets"
        )));
    }
    let timeline = Timeline::concatenate(clips)?;
    let duration = timeline.duration();
    tracing::info!(
        clips = timeline.clips().len(),
        duration_sec = duration,
        "scene clips concatenated"
    );
    tracker.step(
        RenderStage::Concatenate,
        format!("{} clips, {duration:.2}s", timeline.clips().len()),
    );

    let (mut background, background_outcome) = load_background_video(
        config.background_video_path.as_deref(),
        decoder,
        canvas,
        fps,
        duration,
    );
    tracker.step(RenderStage::BackgroundVideo, "background video resolved");

    let (soundtrack, music_outcome) = apply_background_music(
        config.background_music_path.as_deref(),
        decoder,
        timeline.soundtrack()?,
        config.background_music_volume,
        duration,
    );
    tracker.step(RenderStage::BackgroundMusic, "background music resolved");

    let frame_count = fps.frames_covering(duration);
    let sink_cfg = SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        bitrate: config.bitrate,
        audio: (!soundtrack.is_empty()).then_some(soundtrack),
    };
    encode_frames(&timeline, background.as_mut(), fps, frame_count, sink, sink_cfg)
        .inspect_err(|e| tracing::error!(error = %e, "encoding failed"))?;
    tracker.step(RenderStage::Encode, format!("{frame_count} frames encoded"));

    Ok(RenderReport {
        output_path: None,
        duration_sec: duration,
        frame_count,
        clip_count: timeline.clips().len(),
        skipped_scenes,
        subtitle_failures,
        background: background_outcome,
        music: music_outcome,
    })
}

fn encode_frames(
    timeline: &Timeline,
    mut background: Option<&mut BackgroundVideo>,
    fps: Fps,
    frame_count: u64,
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
) -> ReelResult<()> {
    sink.begin(cfg)?;
    for i in 0..frame_count {
        let idx = FrameIndex(i);
        let t = fps.frame_time_secs(idx);
        let frame = compose_frame(timeline, background.as_deref_mut(), t)?;
        sink.push_frame(idx, &frame)?;
    }
    sink.end()
}

/// Background (if any) at the bottom, scene picture with its subtitle on top.
pub(crate) fn compose_frame(
    timeline: &Timeline,
    background: Option<&mut BackgroundVideo>,
    t: f64,
) -> ReelResult<Frame> {
    let scene = timeline.frame_at(t);
    match background {
        Some(bg) if !scene.is_opaque() => {
            let mut base = bg.frame_at(t)?;
            base.draw_over(&scene, 0, 0);
            Ok(base)
        }
        _ => Ok(scene),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pipeline.rs"]
mod tests;
