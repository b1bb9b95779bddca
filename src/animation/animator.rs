use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::animation::AnimationKind;
use crate::foundation::core::{Canvas, Frame};
use crate::foundation::error::{ReelError, ReelResult};

/// Resize `image` to exactly fill `target`.
pub fn static_frame(image: &RgbaImage, target: Canvas) -> Frame {
    if image.dimensions() == (target.width, target.height) {
        return Frame::from_rgba_image(image.clone());
    }
    Frame::from_rgba_image(imageops::resize(
        image,
        target.width,
        target.height,
        FilterType::Lanczos3,
    ))
}

/// Time-parameterized view of one scene image.
///
/// The image is oversized once by `scale`; every frame is then a crop of that oversized canvas
/// computed from `t` alone, so frames can be sampled in any order at any rate.
#[derive(Clone, Debug)]
pub struct SceneAnimator {
    kind: Option<AnimationKind>,
    duration: f64,
    target: Canvas,
    scaled: RgbaImage,
    margin_x: f64,
    margin_y: f64,
    still: Option<Frame>,
}

impl SceneAnimator {
    /// Prepare `image` for `kind` over `duration` seconds. `None` produces a static resize.
    pub fn new(
        image: &RgbaImage,
        kind: Option<AnimationKind>,
        duration: f64,
        scale: f64,
        target: Canvas,
    ) -> ReelResult<Self> {
        if target.width == 0 || target.height == 0 {
            return Err(ReelError::validation("animation target size must be > 0"));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ReelError::asset("scene image has zero size"));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(ReelError::validation(format!(
                "animation duration must be finite and >= 0, got {duration}"
            )));
        }

        let Some(kind) = kind else {
            return Ok(Self {
                kind: None,
                duration,
                target,
                scaled: RgbaImage::new(0, 0),
                margin_x: 0.0,
                margin_y: 0.0,
                still: Some(static_frame(image, target)),
            });
        };

        if !scale.is_finite() || scale <= 1.0 {
            return Err(ReelError::validation(format!(
                "animation scale must be > 1.0, got {scale}"
            )));
        }
        let scaled_w = ((f64::from(target.width) * scale).round() as u32).max(target.width);
        let scaled_h = ((f64::from(target.height) * scale).round() as u32).max(target.height);
        let scaled = imageops::resize(image, scaled_w, scaled_h, FilterType::Lanczos3);

        Ok(Self {
            kind: Some(kind),
            duration,
            target,
            margin_x: f64::from(scaled_w - target.width) / 2.0,
            margin_y: f64::from(scaled_h - target.height) / 2.0,
            scaled,
            still: None,
        })
    }

    /// Motion applied, if any.
    pub fn kind(&self) -> Option<AnimationKind> {
        self.kind
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (t / self.duration).clamp(0.0, 1.0)
    }

    /// Crop window `(x, y, w, h)` in oversized-canvas pixels at time `t`.
    ///
    /// Returns `None` for static scenes.
    pub fn crop_window(&self, t: f64) -> Option<(u32, u32, u32, u32)> {
        let kind = self.kind?;
        let p = self.progress(t);
        let (sw, sh) = self.scaled.dimensions();
        let (tw, th) = (self.target.width, self.target.height);
        let (mx, my) = (self.margin_x, self.margin_y);

        let window = match kind {
            AnimationKind::ZoomIn => {
                let cw = f64::from(sw) + (f64::from(tw) - f64::from(sw)) * p;
                let ch = f64::from(sh) + (f64::from(th) - f64::from(sh)) * p;
                let cw = (cw.round() as u32).clamp(tw, sw);
                let ch = (ch.round() as u32).clamp(th, sh);
                ((sw - cw) / 2, (sh - ch) / 2, cw, ch)
            }
            AnimationKind::SlideLeft => (
                place(mx + mx * (1.0 - 2.0 * p), sw - tw),
                place(my, sh - th),
                tw,
                th,
            ),
            AnimationKind::SlideRight => (
                place(mx - mx * (1.0 - 2.0 * p), sw - tw),
                place(my, sh - th),
                tw,
                th,
            ),
            AnimationKind::SlideUp => (
                place(mx, sw - tw),
                place(my + my * (1.0 - 2.0 * p), sh - th),
                tw,
                th,
            ),
            AnimationKind::SlideDown => (
                place(mx, sw - tw),
                place(my - my * (1.0 - 2.0 * p), sh - th),
                tw,
                th,
            ),
        };
        Some(window)
    }

    /// Frame shown at `t` seconds into the scene, sized to the target canvas.
    pub fn frame_at(&self, t: f64) -> Frame {
        if let Some(still) = &self.still {
            return still.clone();
        }
        let Some((x, y, w, h)) = self.crop_window(t) else {
            return Frame::transparent(self.target.width, self.target.height);
        };
        let crop = imageops::crop_imm(&self.scaled, x, y, w, h).to_image();
        if (w, h) == (self.target.width, self.target.height) {
            Frame::from_rgba_image(crop)
        } else {
            Frame::from_rgba_image(imageops::resize(
                &crop,
                self.target.width,
                self.target.height,
                FilterType::Lanczos3,
            ))
        }
    }
}

fn place(pos: f64, max: u32) -> u32 {
    (pos.round().max(0.0) as u32).min(max)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
