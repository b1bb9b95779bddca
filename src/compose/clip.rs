use std::path::Path;

use crate::animation::{AnimationKind, AnimationPicker, SceneAnimator, static_frame};
use crate::assets::decode::{asset_present, load_image};
use crate::assets::media::MediaDecoder;
use crate::audio::pcm::AudioPcm;
use crate::config::RenderConfig;
use crate::foundation::core::{Canvas, Frame};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::Scene;
use crate::text::subtitle::{SubtitleRaster, SubtitleRenderer};

/// A scene left out of the render, with the reason.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedScene {
    pub scene_number: u32,
    pub reason: String,
}

/// What a scene contributes to the picture.
#[derive(Clone, Debug)]
pub enum ClipVisual {
    /// Static resize, subtitle already composited.
    Still(Frame),
    /// Pan/zoom animation; the subtitle is composited per frame.
    Animated(SceneAnimator),
}

/// Subtitle overlay and its top-left position on the canvas.
#[derive(Clone, Debug)]
pub struct SubtitleOverlay {
    pub frame: Frame,
    pub x: i64,
    pub y: i64,
}

/// Time-bounded audio-visual unit built from one scene.
#[derive(Clone, Debug)]
pub struct Clip {
    scene_number: u32,
    visual: ClipVisual,
    overlay: Option<SubtitleOverlay>,
    audio: AudioPcm,
}

impl Clip {
    /// Clip from parts; the duration is the narration length.
    pub fn new(
        scene_number: u32,
        visual: ClipVisual,
        overlay: Option<SubtitleOverlay>,
        audio: AudioPcm,
    ) -> Self {
        let (visual, overlay) = match (visual, overlay) {
            (ClipVisual::Still(mut frame), Some(o)) => {
                frame.draw_over(&o.frame, o.x, o.y);
                (ClipVisual::Still(frame), None)
            }
            (visual, overlay) => (visual, overlay),
        };
        Self {
            scene_number,
            visual,
            overlay,
            audio,
        }
    }

    pub fn scene_number(&self) -> u32 {
        self.scene_number
    }

    /// Duration in seconds, taken from the narration samples.
    pub fn duration(&self) -> f64 {
        self.audio.duration_sec()
    }

    /// Narration track, untouched.
    pub fn audio(&self) -> &AudioPcm {
        &self.audio
    }

    /// Motion applied to this clip, if any.
    pub fn animation(&self) -> Option<AnimationKind> {
        match &self.visual {
            ClipVisual::Still(_) => None,
            ClipVisual::Animated(anim) => anim.kind(),
        }
    }

    /// Picture at `t` seconds into the clip.
    pub fn frame_at(&self, t: f64) -> Frame {
        match &self.visual {
            ClipVisual::Still(frame) => frame.clone(),
            ClipVisual::Animated(anim) => {
                let mut frame = anim.frame_at(t);
                if let Some(o) = &self.overlay {
                    frame.draw_over(&o.frame, o.x, o.y);
                }
                frame
            }
        }
    }
}

/// Result of building one scene.
#[derive(Debug)]
pub enum SceneOutcome {
    /// The scene produced a clip. `subtitle_failed` is set when its overlay could not be drawn.
    Built { clip: Clip, subtitle_failed: bool },
    /// A required asset was missing; the scene contributes nothing.
    Skipped(SkippedScene),
}

/// Builds scene clips in script order, carrying the state shared across scenes.
pub struct SceneClipBuilder<'a> {
    config: &'a RenderConfig,
    canvas: Canvas,
    subtitles: Option<Box<dyn SubtitleRaster>>,
    picker: AnimationPicker,
}

impl<'a> SceneClipBuilder<'a> {
    /// Builder drawing subtitles with the configured style, when subtitles are enabled.
    pub fn new(config: &'a RenderConfig) -> Self {
        let subtitles = config.add_subtitles.then(|| {
            let renderer = SubtitleRenderer::new(&config.subtitle_style);
            tracing::debug!(
                fallback_font = renderer.uses_fallback_font(),
                "subtitle renderer ready"
            );
            Box::new(renderer) as Box<dyn SubtitleRaster>
        });
        Self::with_subtitles(config, subtitles)
    }

    /// Builder using `subtitles` for overlays; `None` builds every clip without one.
    pub fn with_subtitles(
        config: &'a RenderConfig,
        subtitles: Option<Box<dyn SubtitleRaster>>,
    ) -> Self {
        Self {
            config,
            canvas: config.canvas(),
            subtitles,
            picker: AnimationPicker::new(&config.animation_assignment, config.animation_seed),
        }
    }

    /// Configuration the clips are built for.
    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Build the clip for `scene`.
    ///
    /// Missing asset paths skip the scene. Decode failures of present assets are fatal.
    #[tracing::instrument(level = "debug", skip_all, fields(scene = scene.scene_number))]
    pub fn build(
        &mut self,
        scene: &Scene,
        image_path: Option<&Path>,
        audio_path: Option<&Path>,
        decoder: &mut dyn MediaDecoder,
    ) -> ReelResult<SceneOutcome> {
        let n = scene.scene_number;
        let (Some(image_path), Some(audio_path)) = (
            image_path.filter(|p| asset_present(Some(*p))),
            audio_path.filter(|p| asset_present(Some(*p))),
        ) else {
            let reason = if !asset_present(image_path) {
                describe_missing("image", image_path)
            } else {
                describe_missing("audio", audio_path)
            };
            tracing::warn!(scene = n, %reason, "skipping scene");
            return Ok(SceneOutcome::Skipped(SkippedScene {
                scene_number: n,
                reason,
            }));
        };

        let audio = decoder.decode_audio(audio_path)?;
        let duration = audio.duration_sec();
        if audio.is_empty() || duration <= 0.0 {
            return Err(ReelError::asset(format!(
                "scene {n}: narration '{}' has no samples",
                audio_path.display()
            )));
        }
        if (duration - scene.duration).abs() > 1e-3 {
            tracing::debug!(
                scene = n,
                declared = scene.duration,
                actual = duration,
                "narration length overrides declared duration"
            );
        }

        let image = load_image(image_path)?;
        let kind = if self.config.enable_animation {
            self.picker.kind_for(n)
        } else {
            None
        };
        let visual = match kind {
            Some(kind) => ClipVisual::Animated(SceneAnimator::new(
                &image,
                Some(kind),
                duration,
                self.config.animation_scale,
                self.canvas,
            )?),
            None => ClipVisual::Still(static_frame(&image, self.canvas)),
        };

        let (overlay, subtitle_failed) = self.subtitle_for(scene);
        tracing::info!(
            scene = n,
            duration_sec = duration,
            animation = kind.map(AnimationKind::name).unwrap_or("none"),
            subtitle = overlay.is_some(),
            "built scene clip"
        );
        Ok(SceneOutcome::Built {
            clip: Clip::new(n, visual, overlay, audio),
            subtitle_failed,
        })
    }

    fn subtitle_for(&mut self, scene: &Scene) -> (Option<SubtitleOverlay>, bool) {
        let Some(renderer) = self.subtitles.as_mut() else {
            return (None, false);
        };
        let text = scene.subtitle_text(self.config.subtitle_source);
        if text.is_empty() {
            return (None, false);
        }
        match renderer.render(text, self.canvas.width) {
            Ok(img) => {
                let x = (i64::from(self.canvas.width) - i64::from(img.frame.width)) / 2;
                let y = i64::from(self.canvas.height)
                    - i64::from(img.height())
                    - i64::from(self.config.subtitle_bottom_offset);
                (
                    Some(SubtitleOverlay {
                        frame: img.frame,
                        x,
                        y,
                    }),
                    false,
                )
            }
            Err(e) => {
                tracing::warn!(
                    scene = scene.scene_number,
                    error = %e,
                    "subtitle rendering failed, scene continues without subtitle"
                );
                (None, true)
            }
        }
    }
}

fn describe_missing(kind: &str, path: Option<&Path>) -> String {
    match path {
        None => format!("no {kind} asset assigned"),
        Some(p) if p.as_os_str().is_empty() => format!("no {kind} asset assigned"),
        Some(p) => format!("{kind} asset '{}' not found", p.display()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/clip.rs"]
mod tests;
