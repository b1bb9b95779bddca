use std::path::Path;

use crate::assets::media::{MediaDecoder, VideoStream};
use crate::audio::mix::{apply_volume, loop_to_frames, mix_into};
use crate::audio::pcm::{AudioPcm, secs_to_sample};
use crate::compose::looping::LoopPlan;
use crate::foundation::core::{Canvas, Fps, Frame};
use crate::foundation::error::{ReelError, ReelResult};

/// How an optional layer ended up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayerOutcome {
    /// No path was configured.
    NotRequested,
    /// The layer is part of the output.
    Applied,
    /// The layer failed to load and was left out.
    Skipped { reason: String },
}

impl LayerOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Looping, muted background video stretched to the timeline length.
pub struct BackgroundVideo {
    stream: Box<dyn VideoStream>,
    plan: LoopPlan,
    canvas: Canvas,
}

impl std::fmt::Debug for BackgroundVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundVideo")
            .field("plan", &self.plan)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl BackgroundVideo {
    /// Open `path` and plan it to cover `target_duration` seconds.
    pub fn open(
        path: &Path,
        decoder: &mut dyn MediaDecoder,
        canvas: Canvas,
        fps: Fps,
        target_duration: f64,
    ) -> ReelResult<Self> {
        if !path.is_file() {
            return Err(ReelError::asset(format!(
                "background video '{}' not found",
                path.display()
            )));
        }
        let stream = decoder.open_video(path, canvas, fps)?;
        let plan = LoopPlan::new(stream.duration_sec(), target_duration)?;
        let mut bg = Self {
            stream,
            plan,
            canvas,
        };
        // Decode one frame up front so unreadable streams fail here rather than mid-encode.
        bg.frame_at(0.0)?;
        Ok(bg)
    }

    /// Loop/truncate plan.
    pub fn plan(&self) -> &LoopPlan {
        &self.plan
    }

    /// Background picture at timeline time `t`.
    pub fn frame_at(&mut self, t: f64) -> ReelResult<Frame> {
        let frame = self.stream.frame_at(self.plan.source_time(t))?;
        if (frame.width, frame.height) != (self.canvas.width, self.canvas.height) {
            return Err(ReelError::render(format!(
                "background frame is {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        Ok(frame)
    }
}

/// Resolve the optional background video layer. Failures are logged and reported, never raised.
pub fn load_background_video(
    path: Option<&Path>,
    decoder: &mut dyn MediaDecoder,
    canvas: Canvas,
    fps: Fps,
    target_duration: f64,
) -> (Option<BackgroundVideo>, LayerOutcome) {
    let Some(path) = path else {
        return (None, LayerOutcome::NotRequested);
    };
    match BackgroundVideo::open(path, decoder, canvas, fps, target_duration) {
        Ok(bg) => {
            tracing::info!(
                path = %path.display(),
                source_sec = bg.plan().source_duration(),
                loops = bg.plan().loops_needed(),
                "background video applied"
            );
            (Some(bg), LayerOutcome::Applied)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "background video failed, continuing without it"
            );
            (
                None,
                LayerOutcome::Skipped {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Loop `music` to the soundtrack length, scale it by `volume` and add it to `soundtrack`.
///
/// Samples are summed without limiting; the encoder sees any overshoot as-is.
/// An empty soundtrack is replaced by the music sized to `target_duration`.
pub fn mix_music(
    soundtrack: &AudioPcm,
    music: &AudioPcm,
    volume: f32,
    target_duration: f64,
) -> ReelResult<AudioPcm> {
    let plan = LoopPlan::new(music.duration_sec(), target_duration)?;
    tracing::debug!(
        loops = plan.loops_needed(),
        concatenated_sec = plan.concatenated_duration(),
        "looping background music"
    );

    if soundtrack.is_empty() {
        let frames = secs_to_sample(plan.duration(), music.sample_rate);
        let mut looped = loop_to_frames(music, frames)?;
        apply_volume(&mut looped, volume);
        return Ok(looped);
    }

    if music.sample_rate != soundtrack.sample_rate || music.channels != soundtrack.channels {
        return Err(ReelError::asset(format!(
            "background music is {}Hz/{}ch, narration is {}Hz/{}ch",
            music.sample_rate, music.channels, soundtrack.sample_rate, soundtrack.channels
        )));
    }
    let mut looped = loop_to_frames(music, soundtrack.frames())?;
    apply_volume(&mut looped, volume);
    let mut mixed = soundtrack.clone();
    mix_into(&mut mixed, &looped)?;
    Ok(mixed)
}

/// Resolve the optional background music layer. Failures leave `soundtrack` unchanged.
pub fn apply_background_music(
    path: Option<&Path>,
    decoder: &mut dyn MediaDecoder,
    soundtrack: AudioPcm,
    volume: f32,
    target_duration: f64,
) -> (AudioPcm, LayerOutcome) {
    let Some(path) = path else {
        return (soundtrack, LayerOutcome::NotRequested);
    };
    let result = if path.is_file() {
        decoder
            .decode_audio(path)
            .and_then(|music| mix_music(&soundtrack, &music, volume, target_duration))
    } else {
        Err(ReelError::asset(format!(
            "background music '{}' not found",
            path.display()
        )))
    };
    match result {
        Ok(mixed) => {
            tracing::info!(path = %path.display(), volume, "background music applied");
            (mixed, LayerOutcome::Applied)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "background music failed, continuing without it"
            );
            (
                soundtrack,
                LayerOutcome::Skipped {
                    reason: e.to_string(),
                },
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/background.rs"]
mod tests;
