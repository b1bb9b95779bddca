use crate::audio::mix::place_segment;
use crate::audio::pcm::AudioPcm;
use crate::compose::clip::Clip;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};

/// Scene clips played back to back, in the order given.
#[derive(Debug)]
pub struct Timeline {
    clips: Vec<Clip>,
    starts: Vec<f64>,
    duration: f64,
}

impl Timeline {
    /// Concatenate `clips` without trimming or cross-fades.
    ///
    /// The duration is the exact sum of the clip durations. An empty list is an error.
    pub fn concatenate(clips: Vec<Clip>) -> ReelResult<Self> {
        if clips.is_empty() {
            return Err(ReelError::no_clips(
                "no scene had both an image and an audio asset",
            ));
        }
        let mut starts = Vec::with_capacity(clips.len());
        let mut duration = 0.0;
        for clip in &clips {
            starts.push(duration);
            duration += clip.duration();
        }
        Ok(Self {
            clips,
            starts,
            duration,
        })
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clips in playback order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Start time of every clip.
    pub fn starts(&self) -> &[f64] {
        &self.starts
    }

    /// Clip playing at `t` and the time within it. Times past the end hold the last clip.
    pub fn clip_at(&self, t: f64) -> (&Clip, f64) {
        let i = self
            .starts
            .partition_point(|&s| s <= t)
            .saturating_sub(1)
            .min(self.clips.len() - 1);
        let local = (t - self.starts[i]).clamp(0.0, self.clips[i].duration());
        (&self.clips[i], local)
    }

    /// Scene picture at timeline time `t`.
    pub fn frame_at(&self, t: f64) -> Frame {
        let (clip, local) = self.clip_at(t);
        clip.frame_at(local)
    }

    /// Every clip's narration laid end to end, sample-exact.
    pub fn soundtrack(&self) -> ReelResult<AudioPcm> {
        let first = self.clips[0].audio();
        let (rate, channels) = (first.sample_rate, first.channels);
        let mut total_frames = 0usize;
        for clip in &self.clips {
            let a = clip.audio();
            if a.sample_rate != rate || a.channels != channels {
                return Err(ReelError::render(format!(
                    "scene {} narration is {}Hz/{}ch, expected {rate}Hz/{channels}ch",
                    clip.scene_number(),
                    a.sample_rate,
                    a.channels
                )));
            }
            total_frames += a.frames();
        }

        let mut out = AudioPcm::silent(rate, channels, total_frames);
        let mut cursor = 0usize;
        for clip in &self.clips {
            place_segment(&mut out, clip.audio(), cursor);
            cursor += clip.audio().frames();
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/timeline.rs"]
mod tests;
