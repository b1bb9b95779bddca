use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{over_px, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timeline time in seconds at which frame `idx` is sampled.
    pub fn frame_time_secs(self, idx: FrameIndex) -> f64 {
        (idx.0 as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `secs`, rounding partial frames up.
    pub fn frames_covering(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        // Absorb float noise so exact multiples (e.g. 5.5s @ 30fps) do not gain a frame.
        (secs * self.as_f64() - 1e-6).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of bytes in one RGBA8 frame of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Bytes in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// How the alpha channel of a [`Frame`] must be treated when compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    /// Every pixel has alpha 255; compositing on top replaces what is below.
    Opaque,
    /// Pixels carry premultiplied alpha and must be blended.
    Premultiplied,
}

/// One RGBA8 raster in row-major order.
///
/// Pixel data is always premultiplied; `alpha` records whether any pixel is translucent.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
    /// Alpha handling flag.
    pub alpha: AlphaMode,
}

impl Frame {
    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            alpha: AlphaMode::Premultiplied,
        }
    }

    /// Frame filled with a single premultiplied color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            alpha: if color.a == 255 {
                AlphaMode::Opaque
            } else {
                AlphaMode::Premultiplied
            },
        }
    }

    /// Wrap premultiplied bytes, detecting whether the frame is fully opaque.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(ReelError::render(format!(
                "frame byte len mismatch: got {}, expected {expected}",
                data.len()
            )));
        }
        let alpha = detect_alpha(&data);
        Ok(Self {
            width,
            height,
            data,
            alpha,
        })
    }

    /// Convert a straight-alpha `image` buffer into a premultiplied frame.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        let alpha = detect_alpha(&data);
        Self {
            width,
            height,
            data,
            alpha,
        }
    }

    /// Straight-alpha copy for image export.
    pub fn to_rgba_image(&self) -> ReelResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.alpha == AlphaMode::Premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| ReelError::render("frame buffer does not match its dimensions"))
    }

    /// Pixel at `(x, y)` as premultiplied `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// `true` when compositing this frame on top fully hides what is below.
    pub fn is_opaque(&self) -> bool {
        self.alpha == AlphaMode::Opaque
    }

    /// Composite `top` over `self` with its top-left corner at `(x, y)`.
    ///
    /// Parts of `top` outside `self` are clipped.
    pub fn draw_over(&mut self, top: &Frame, x: i64, y: i64) {
        let dst_w = i64::from(self.width);
        let dst_h = i64::from(self.height);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(top.width)).min(dst_w);
        let y1 = (y + i64::from(top.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let top_opaque = top.is_opaque();
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx0 = (x0 - x) as usize;
            let src_row = (sy * top.width as usize + sx0) * 4;
            let dst_row = ((dy as usize) * self.width as usize + x0 as usize) * 4;
            let n = ((x1 - x0) as usize) * 4;
            let src = &top.data[src_row..src_row + n];
            let dst = &mut self.data[dst_row..dst_row + n];
            if top_opaque {
                dst.copy_from_slice(src);
                continue;
            }
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = over_px([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }

        if self.alpha == AlphaMode::Premultiplied {
            self.alpha = detect_alpha(&self.data);
        }
    }
}

fn detect_alpha(data: &[u8]) -> AlphaMode {
    if data.chunks_exact(4).all(|px| px[3] == 255) {
        AlphaMode::Opaque
    } else {
        AlphaMode::Premultiplied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
