//! Render configuration: defaults, JSON loading, environment overrides, validation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::animation::AnimationKind;
use crate::assets::color::Color;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Default output width (vertical short-form video).
pub const DEFAULT_WIDTH: u32 = 1080;
/// Default output height.
pub const DEFAULT_HEIGHT: u32 = 1920;
/// Default frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Default target video bitrate in bits per second.
pub const DEFAULT_BITRATE: u64 = 8_000_000;
/// Horizontal room left around subtitles when no explicit max width is set.
pub const SUBTITLE_SIDE_MARGIN: u32 = 100;

/// Which scene field feeds the subtitle overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleSource {
    /// The short `subtitle` headline.
    #[default]
    Headline,
    /// The full `dialogue` line.
    Dialogue,
}

/// How subtitles look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtitleStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Fill color.
    pub text_color: Color,
    /// Outline color.
    pub stroke_color: Color,
    /// Outline radius in whole pixels; `0` disables the outline.
    pub stroke_width: u32,
    /// Wrap width in pixels. `None` means the canvas width minus [`SUBTITLE_SIDE_MARGIN`].
    pub max_text_width: Option<u32>,
    /// Font files tried in order before falling back to the built-in bitmap face.
    pub font_candidates: Vec<PathBuf>,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 60.0,
            text_color: Color::white(),
            stroke_color: Color::black(),
            stroke_width: 2,
            max_text_width: None,
            font_candidates: default_font_candidates(),
        }
    }
}

impl SubtitleStyle {
    /// Wrap width to use on a canvas `canvas_width` pixels wide.
    pub fn effective_max_text_width(&self, canvas_width: u32) -> u32 {
        self.max_text_width
            .unwrap_or_else(|| canvas_width.saturating_sub(SUBTITLE_SIDE_MARGIN))
    }
}

/// Common system locations of fonts with CJK and Latin coverage, most preferred first.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/System/Library/Fonts/ヒラギノ角ゴシック W6.ttc",
        "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
        "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Bold.ttc",
        "/System/Library/Fonts/Helvetica.ttc",
        "/System/Library/Fonts/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Per-scene animation policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationAssignment {
    /// Uniform random kind per scene, never repeating the previous scene's kind.
    #[default]
    Random,
    /// Kinds keyed by scene number; absent or `null` entries stay static.
    Explicit(#[serde(deserialize_with = "lenient_kind_map")] BTreeMap<u32, Option<AnimationKind>>),
}

fn lenient_kind_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<u32, Option<AnimationKind>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<u32, Option<String>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(scene, name)| {
            let kind = name.as_deref().and_then(|n| {
                let parsed = AnimationKind::from_name(n);
                if parsed.is_none() {
                    tracing::warn!(
                        scene,
                        kind = n,
                        "unrecognized animation kind, scene stays static"
                    );
                }
                parsed
            });
            (scene, kind)
        })
        .collect())
}

/// Everything that controls one render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Target video bitrate in bits per second.
    pub bitrate: u64,
    /// Draw subtitle overlays.
    pub add_subtitles: bool,
    /// Subtitle look.
    pub subtitle_style: SubtitleStyle,
    /// Scene field used as subtitle text.
    pub subtitle_source: SubtitleSource,
    /// Distance from the frame bottom to the overlay bottom, in pixels.
    pub subtitle_bottom_offset: u32,
    /// Optional looping background video drawn under every scene.
    pub background_video_path: Option<PathBuf>,
    /// Apply pan/zoom motion to scene images.
    pub enable_animation: bool,
    /// Oversize factor giving animations room to move; must be > 1.
    pub animation_scale: f64,
    /// Which scenes get which motion.
    pub animation_assignment: AnimationAssignment,
    /// Seed for random assignment; `None` draws from the thread RNG.
    pub animation_seed: Option<u64>,
    /// Optional looping background music mixed under narration.
    pub background_music_path: Option<PathBuf>,
    /// Background music gain in `[0, 1]`.
    pub background_music_volume: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            bitrate: DEFAULT_BITRATE,
            add_subtitles: true,
            subtitle_style: SubtitleStyle::default(),
            subtitle_source: SubtitleSource::Headline,
            subtitle_bottom_offset: 50,
            background_video_path: None,
            enable_animation: false,
            animation_scale: 1.2,
            animation_assignment: AnimationAssignment::Random,
            animation_seed: None,
            background_music_path: None,
            background_music_volume: 0.3,
        }
    }
}

impl RenderConfig {
    /// Defaults with `VIDEO_WIDTH`, `VIDEO_HEIGHT`, `VIDEO_FPS` and `VIDEO_BITRATE` applied.
    pub fn from_env() -> ReelResult<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ReelResult<()> {
        if let Some(v) = parse_var(&lookup, "VIDEO_WIDTH")? {
            self.width = v;
        }
        if let Some(v) = parse_var(&lookup, "VIDEO_HEIGHT")? {
            self.height = v;
        }
        if let Some(v) = parse_var(&lookup, "VIDEO_FPS")? {
            self.fps = v;
        }
        if let Some(v) = parse_var(&lookup, "VIDEO_BITRATE")? {
            self.bitrate = v;
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReelError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Reject configurations no render could satisfy.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("output width and height must be > 0"));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(ReelError::validation(format!(
                "output size {}x{} must be even for yuv420p encoding",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be > 0"));
        }
        if self.bitrate == 0 {
            return Err(ReelError::validation("bitrate must be > 0"));
        }
        if !self.animation_scale.is_finite() || self.animation_scale <= 1.0 {
            return Err(ReelError::validation(format!(
                "animation_scale must be finite and > 1.0, got {}",
                self.animation_scale
            )));
        }
        if !self.background_music_volume.is_finite()
            || !(0.0..=1.0).contains(&self.background_music_volume)
        {
            return Err(ReelError::validation(format!(
                "background_music_volume must be within [0, 1], got {}",
                self.background_music_volume
            )));
        }
        let font_size = self.subtitle_style.font_size;
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(ReelError::validation(format!(
                "subtitle font_size must be finite and > 0, got {font_size}"
            )));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Output frame rate as a rational.
    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> ReelResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ReelError::validation(format!("{key}='{raw}' is not valid: {e}")))
}

/// Output directory layout rooted at `OUTPUT_BASE_DIR`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputDirs {
    /// Base directory.
    pub base: PathBuf,
    /// Generated scripts.
    pub scripts: PathBuf,
    /// Narration audio.
    pub audio: PathBuf,
    /// Scene images.
    pub images: PathBuf,
    /// Rendered videos.
    pub videos: PathBuf,
}

impl OutputDirs {
    /// Layout under `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            scripts: base.join("scripts"),
            audio: base.join("audio"),
            images: base.join("images"),
            videos: base.join("videos"),
            base,
        }
    }

    /// Layout under `OUTPUT_BASE_DIR`, or `output` when unset.
    pub fn from_env() -> Self {
        let base = std::env::var("OUTPUT_BASE_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "output".to_owned());
        Self::new(base)
    }

    /// Create every directory of the layout.
    pub fn create_all(&self) -> ReelResult<()> {
        for dir in [&self.base, &self.scripts, &self.audio, &self.images, &self.videos] {
            std::fs::create_dir_all(dir).map_err(|e| {
                ReelError::validation(format!("create output dir '{}': {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
