use std::path::Path;

use crate::audio::pcm::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};

/// Copy `src` into `out` starting at sample frame `start_frame`.
///
/// Both buffers must share the same channel layout; samples past the end of `out` are dropped.
pub(crate) fn place_segment(out: &mut AudioPcm, src: &AudioPcm, start_frame: usize) {
    let ch = usize::from(out.channels);
    let start = start_frame * ch;
    if start >= out.interleaved_f32.len() {
        return;
    }
    let n = src
        .interleaved_f32
        .len()
        .min(out.interleaved_f32.len() - start);
    out.interleaved_f32[start..start + n].copy_from_slice(&src.interleaved_f32[..n]);
}

/// Repeat `src` end to end, then cut it to exactly `total_frames` sample frames.
pub(crate) fn loop_to_frames(src: &AudioPcm, total_frames: usize) -> ReelResult<AudioPcm> {
    if src.is_empty() {
        return Err(ReelError::asset("cannot loop an audio track with no samples"));
    }
    let ch = usize::from(src.channels);
    let src_frames = src.frames();
    let mut out = Vec::with_capacity(total_frames * ch);
    for frame in 0..total_frames {
        let i = (frame % src_frames) * ch;
        out.extend_from_slice(&src.interleaved_f32[i..i + ch]);
    }
    Ok(AudioPcm {
        sample_rate: src.sample_rate,
        channels: src.channels,
        interleaved_f32: out,
    })
}

/// Scale every sample by `volume`.
pub(crate) fn apply_volume(pcm: &mut AudioPcm, volume: f32) {
    for s in &mut pcm.interleaved_f32 {
        *s *= volume;
    }
}

/// Sum `layer` into `base` sample by sample.
///
/// Narration is never replaced; a zero-volume layer leaves `base` bit-identical.
pub(crate) fn mix_into(base: &mut AudioPcm, layer: &AudioPcm) -> ReelResult<()> {
    if base.sample_rate != layer.sample_rate || base.channels != layer.channels {
        return Err(ReelError::render(format!(
            "audio layout mismatch: {}Hz/{}ch vs {}Hz/{}ch",
            base.sample_rate, base.channels, layer.sample_rate, layer.channels
        )));
    }
    for (b, l) in base
        .interleaved_f32
        .iter_mut()
        .zip(layer.interleaved_f32.iter())
    {
        *b += *l;
    }
    Ok(())
}

/// Write interleaved `f32` PCM samples to raw little-endian `.f32le` file.
pub(crate) fn write_pcm_to_f32le_file(
    samples_interleaved: &[f32],
    out_path: &Path,
) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::encode(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
