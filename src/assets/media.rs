use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::audio::pcm::AudioPcm;
use crate::foundation::core::{Canvas, Fps, Frame};
use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate every decoded audio track is resampled to before mixing.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count every decoded audio track is remixed to before mixing.
pub const MIX_CHANNELS: u16 = 2;

/// Decoder seam for time-based media (narration, background music, background video).
///
/// Raster images are decoded in-process with `image`; everything with a duration goes through
/// this trait so the composition pipeline can run against a fake in tests.
pub trait MediaDecoder {
    /// Decode a whole audio file to interleaved stereo PCM at [`MIX_SAMPLE_RATE`].
    fn decode_audio(&mut self, path: &Path) -> ReelResult<AudioPcm>;

    /// Open a video file for frame access, scaled to `canvas` and resampled to `fps`.
    fn open_video(
        &mut self,
        path: &Path,
        canvas: Canvas,
        fps: Fps,
    ) -> ReelResult<Box<dyn VideoStream>>;
}

/// Random-access view over a decoded video.
pub trait VideoStream {
    /// Source duration in seconds.
    fn duration_sec(&self) -> f64;

    /// Frame shown at `source_time_sec`, already scaled to the requested canvas.
    ///
    /// Implementations are optimized for monotonically increasing times and may rewind.
    fn frame_at(&mut self, source_time_sec: f64) -> ReelResult<Frame>;
}

/// Container facts reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Probed file.
    pub source_path: PathBuf,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
    /// Native frame rate numerator.
    pub fps_num: u32,
    /// Native frame rate denominator.
    pub fps_den: u32,
    /// Container duration in seconds.
    pub duration_sec: f64,
    /// Whether the container carries an audio stream.
    pub has_audio: bool,
}

/// [`MediaDecoder`] backed by the system `ffmpeg` and `ffprobe` binaries.
#[derive(Clone, Debug, Default)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    /// Create a decoder. Binaries are resolved from `PATH` on first use.
    pub fn new() -> Self {
        Self
    }
}

impl MediaDecoder for FfmpegDecoder {
    fn decode_audio(&mut self, path: &Path) -> ReelResult<AudioPcm> {
        decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)
    }

    fn open_video(
        &mut self,
        path: &Path,
        canvas: Canvas,
        fps: Fps,
    ) -> ReelResult<Box<dyn VideoStream>> {
        let info = probe_video(path)?;
        if !info.duration_sec.is_finite() || info.duration_sec <= 0.0 {
            return Err(ReelError::asset(format!(
                "video '{}' reports no usable duration",
                path.display()
            )));
        }
        if info.has_audio {
            tracing::debug!(path = %path.display(), "video audio track is not decoded");
        }
        Ok(Box::new(FfmpegVideoStream::new(info, canvas, fps)))
    }
}

/// Sequential RGBA8 frame reader over an `ffmpeg` child process.
///
/// Requests for an earlier frame restart the decoder from the beginning of the file, which is
/// what looping playback needs.
pub struct FfmpegVideoStream {
    info: VideoSourceInfo,
    canvas: Canvas,
    fps: Fps,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    next_index: u64,
    last: Option<Frame>,
    eof: bool,
}

impl FfmpegVideoStream {
    fn new(info: VideoSourceInfo, canvas: Canvas, fps: Fps) -> Self {
        Self {
            info,
            canvas,
            fps,
            child: None,
            stdout: None,
            next_index: 0,
            last: None,
            eof: false,
        }
    }

    fn spawn(&mut self) -> ReelResult<()> {
        self.stop();
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.info.source_path)
            .args([
                "-an",
                "-vf",
                &format!("scale={}:{}", self.canvas.width, self.canvas.height),
                "-r",
                &format!("{}/{}", self.fps.num, self.fps.den),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ReelError::asset(format!("failed to run ffmpeg for video decode: {e}"))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::asset("failed to open ffmpeg stdout (unexpected)"))?;
        tracing::debug!(
            path = %self.info.source_path.display(),
            "started background video decoder"
        );
        self.child = Some(child);
        self.stdout = Some(stdout);
        self.next_index = 0;
        self.eof = false;
        Ok(())
    }

    fn stop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn read_next(&mut self) -> ReelResult<bool> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };
        let mut buf = vec![0u8; self.canvas.rgba8_len()];
        match stdout.read_exact(&mut buf) {
            Ok(()) => {
                self.last = Some(Frame::from_premul_bytes(
                    self.canvas.width,
                    self.canvas.height,
                    buf,
                )?);
                self.next_index += 1;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                Ok(false)
            }
            Err(e) => Err(ReelError::asset(format!(
                "failed to read decoded video frame from '{}': {e}",
                self.info.source_path.display()
            ))),
        }
    }
}

impl VideoStream for FfmpegVideoStream {
    fn duration_sec(&self) -> f64 {
        self.info.duration_sec
    }

    fn frame_at(&mut self, source_time_sec: f64) -> ReelResult<Frame> {
        let want = (source_time_sec.max(0.0) * self.fps.as_f64() + 1e-9).floor() as u64;

        let rewind = self.child.is_none() || want + 1 < self.next_index;
        if rewind {
            self.spawn()?;
            self.last = None;
        }

        while self.next_index <= want && !self.eof {
            if !self.read_next()? {
                break;
            }
        }

        self.last.clone().ok_or_else(|| {
            ReelError::asset(format!(
                "ffmpeg returned no video frames for '{}'",
                self.info.source_path.display()
            ))
        })
    }
}

impl Drop for FfmpegVideoStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Probe a video container with `ffprobe`.
pub fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::asset(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::asset(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::asset(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::asset("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| ReelError::asset("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ReelError::asset("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| ReelError::asset("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        has_audio,
    })
}

/// Decode any ffmpeg-readable audio (or the audio of a video) to interleaved stereo `f32`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::asset(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports a missing audio stream as an error; surface it as empty PCM.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioPcm::silent(sample_rate, MIX_CHANNELS, 0));
        }
        return Err(ReelError::asset(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: pcm,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
