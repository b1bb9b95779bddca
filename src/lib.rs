//! storyreel turns a scene-by-scene script into a narrated short video.
//!
//! Each scene pairs an image with a narration clip. Scenes become clips timed by their
//! narration, get an optional subtitle overlay and pan/zoom motion, and are concatenated in
//! script order. An optional looping background video and background music track are layered
//! under the result before it is encoded to H.264/AAC MP4 by the system `ffmpeg`.
//!
//! - Load a [`Script`] and the per-scene [`SceneAssetMap`]s
//! - Build a [`RenderConfig`] (defaults, JSON, environment overrides)
//! - Call [`compose_video`], or [`compose_with`] to inject a [`MediaDecoder`] and [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod audio;
pub(crate) mod compose;
/// Render configuration and output directory layout.
pub mod config;
pub(crate) mod encode;
pub(crate) mod script;
pub(crate) mod text;

pub use crate::foundation::core::{AlphaMode, Canvas, Fps, Frame, FrameIndex, Rgba8Premul};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::{AnimationKind, AnimationPicker, SceneAnimator, static_frame};
pub use crate::assets::color::Color;
pub use crate::assets::decode::{load_image, validate_audio_file, validate_image_file};
pub use crate::assets::media::{
    FfmpegDecoder, MIX_CHANNELS, MIX_SAMPLE_RATE, MediaDecoder, VideoSourceInfo, VideoStream,
    probe_video,
};
pub use crate::audio::pcm::AudioPcm;
pub use crate::compose::background::{
    BackgroundVideo, LayerOutcome, apply_background_music, load_background_video, mix_music,
};
pub use crate::compose::clip::{
    Clip, ClipVisual, SceneClipBuilder, SceneOutcome, SkippedScene, SubtitleOverlay,
};
pub use crate::compose::looping::LoopPlan;
pub use crate::compose::pipeline::{RenderReport, compose_video, compose_with};
pub use crate::compose::progress::{NoProgress, Progress, ProgressSink, RenderStage};
pub use crate::compose::timeline::Timeline;
pub use crate::config::{
    AnimationAssignment, OutputDirs, RenderConfig, SubtitleSource, SubtitleStyle,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::script::assets::SceneAssetMap;
pub use crate::script::model::{Scene, Script};
pub use crate::script::naming::{default_video_path, generate_filename, timestamped_filename};
pub use crate::text::subtitle::{
    SubtitleImage, SubtitleRaster, SubtitleRenderer, render_subtitle, wrap_lines,
};
