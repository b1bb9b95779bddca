use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::config::OutputDirs;

/// Timestamp layout embedded in generated file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{prefix}_scene{NNN}_{timestamp}.{ext}` or `{prefix}_{timestamp}.{ext}`.
pub fn generate_filename(
    prefix: &str,
    extension: &str,
    scene_number: Option<u32>,
    at: NaiveDateTime,
) -> String {
    let ts = at.format(TIMESTAMP_FORMAT);
    match scene_number {
        Some(n) => format!("{prefix}_scene{n:03}_{ts}.{extension}"),
        None => format!("{prefix}_{ts}.{extension}"),
    }
}

/// [`generate_filename`] stamped with the local time.
pub fn timestamped_filename(prefix: &str, extension: &str, scene_number: Option<u32>) -> String {
    generate_filename(
        prefix,
        extension,
        scene_number,
        chrono::Local::now().naive_local(),
    )
}

/// Auto-generated output path: `videos/video_{timestamp}.mp4` under `dirs`.
pub fn default_video_path(dirs: &OutputDirs) -> PathBuf {
    dirs.videos.join(timestamped_filename("video", "mp4", None))
}

#[cfg(test)]
#[path = "../../tests/unit/script/naming.rs"]
mod tests;
