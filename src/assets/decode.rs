use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

const KNOWN_AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "m4a"];

/// Decode an encoded raster image from memory into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> ReelResult<image::RgbaImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReelError::asset(format!("failed to read image '{}': {e}", path.display())))?;
    decode_image(&bytes).map_err(|e| {
        ReelError::asset(format!("failed to decode image '{}': {e}", path.display()))
    })
}

/// `true` when `path` is set, non-empty and points at an existing file.
pub fn asset_present(path: Option<&Path>) -> bool {
    match path {
        Some(p) => !p.as_os_str().is_empty() && p.is_file(),
        None => false,
    }
}

/// Check that an image file exists, is non-empty and decodes.
pub fn validate_image_file(path: &Path) -> ReelResult<()> {
    ensure_non_empty_file(path, "image")?;
    load_image(path).map(|_| ())
}

/// Check that an audio file exists and is non-empty.
///
/// Unknown extensions are accepted with a warning; decoding is left to the media decoder.
pub fn validate_audio_file(path: &Path) -> ReelResult<()> {
    ensure_non_empty_file(path, "audio")?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !KNOWN_AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        tracing::warn!(path = %path.display(), ext = %ext, "unrecognized audio file extension");
    }
    Ok(())
}

fn ensure_non_empty_file(path: &Path, kind: &str) -> ReelResult<()> {
    let meta = std::fs::metadata(path).map_err(|e| {
        ReelError::asset(format!("{kind} file '{}' is not readable: {e}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(ReelError::asset(format!(
            "{kind} path '{}' is not a file",
            path.display()
        )));
    }
    if meta.len() == 0 {
        return Err(ReelError::asset(format!(
            "{kind} file '{}' is empty",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
