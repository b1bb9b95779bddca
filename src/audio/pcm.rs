/// Decoded audio as interleaved `f32` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved samples, `frames * channels` long.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Empty buffer with the given layout.
    pub fn silent(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    /// Exact playback duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.frames() as f64) / f64::from(self.sample_rate)
    }

    /// `true` when the buffer holds no sample frames.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }
}

/// Convert seconds to the nearest sample frame at `sample_rate`.
pub(crate) fn secs_to_sample(secs: f64, sample_rate: u32) -> usize {
    (secs * f64::from(sample_rate)).round().max(0.0) as usize
}
