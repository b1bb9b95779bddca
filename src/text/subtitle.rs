use crate::config::SubtitleStyle;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::font::{PlacedLine, SubtitleFont};

/// Transparent space kept above the first and below the last line.
pub const SUBTITLE_PADDING_PX: u32 = 20;
/// Line pitch as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Rasterized subtitle overlay.
#[derive(Clone, Debug)]
pub struct SubtitleImage {
    /// Premultiplied RGBA overlay, as wide as the target canvas.
    pub frame: Frame,
    /// Wrapped lines in drawing order.
    pub lines: Vec<String>,
}

impl SubtitleImage {
    /// Overlay height in pixels.
    pub fn height(&self) -> u32 {
        self.frame.height
    }
}

/// Pixel pitch between consecutive subtitle lines.
pub fn line_height_px(font_size: f32) -> u32 {
    (f64::from(font_size) * LINE_HEIGHT_FACTOR).ceil().max(1.0) as u32
}

/// Greedy per-character wrap.
///
/// A character is appended to the running line while the measured width stays within
/// `max_width`; otherwise the running line is committed and the character starts the next one.
/// A character wider than `max_width` still gets a line of its own. Explicit `\n` forces a break.
/// Empty input yields a single empty line.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    measure: &mut impl FnMut(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            continue;
        }
        let mut candidate = current.clone();
        candidate.push(ch);
        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Stroke offsets: every integer `(dx, dy)` within `radius` except the origin.
pub fn stroke_offsets(radius: u32) -> Vec<(i64, i64)> {
    let r = i64::from(radius);
    let mut out = Vec::new();
    for dx in -r..=r {
        for dy in -r..=r {
            if dx != 0 || dy != 0 {
                out.push((dx, dy));
            }
        }
    }
    out
}

/// Turns subtitle text into an overlay for a canvas of a given width.
pub trait SubtitleRaster {
    fn render(&mut self, text: &str, canvas_width: u32) -> ReelResult<SubtitleImage>;
}

/// Subtitle rasterizer holding one resolved font for a whole render.
#[derive(Debug)]
pub struct SubtitleRenderer {
    font: SubtitleFont,
    style: SubtitleStyle,
}

impl SubtitleRenderer {
    /// Resolve the style's font candidates once.
    pub fn new(style: &SubtitleStyle) -> Self {
        Self {
            font: SubtitleFont::resolve(&style.font_candidates, style.font_size),
            style: style.clone(),
        }
    }

    /// `true` when rendering with the built-in bitmap face.
    pub fn uses_fallback_font(&self) -> bool {
        matches!(self.font, SubtitleFont::Bitmap(_))
    }

    /// Measured width of `text` on one line with the active font.
    pub fn measure(&mut self, text: &str) -> f32 {
        self.font.measure(text)
    }

    /// Render `text` into an overlay `canvas_width` pixels wide.
    pub fn render(&mut self, text: &str, canvas_width: u32) -> ReelResult<SubtitleImage> {
        if canvas_width == 0 {
            return Err(ReelError::render("subtitle canvas width must be > 0"));
        }
        let max_width = self.style.effective_max_text_width(canvas_width) as f32;
        let font = &mut self.font;
        let lines = wrap_lines(text, max_width, &mut |s| font.measure(s));

        let line_height = line_height_px(self.style.font_size);
        let height = lines.len() as u32 * line_height + 2 * SUBTITLE_PADDING_PX;

        let placed: Vec<PlacedLine<'_>> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let w = self.font.measure(line).ceil() as i64;
                PlacedLine {
                    text: line.as_str(),
                    x: (i64::from(canvas_width) - w).div_euclid(2),
                    y: i64::from(SUBTITLE_PADDING_PX) + i as i64 * i64::from(line_height),
                }
            })
            .collect();

        let mut passes = Vec::with_capacity(2);
        if self.style.stroke_width > 0 {
            passes.push((
                self.style.stroke_color,
                stroke_offsets(self.style.stroke_width),
            ));
        }
        passes.push((self.style.text_color, vec![(0, 0)]));

        let frame = self
            .font
            .draw_passes(canvas_width, height, &placed, &passes)?;
        Ok(SubtitleImage { frame, lines })
    }
}

impl SubtitleRaster for SubtitleRenderer {
    fn render(&mut self, text: &str, canvas_width: u32) -> ReelResult<SubtitleImage> {
        SubtitleRenderer::render(self, text, canvas_width)
    }
}

/// One-shot subtitle rendering: resolve the style's font and rasterize `text`.
pub fn render_subtitle(
    text: &str,
    style: &SubtitleStyle,
    canvas_width: u32,
) -> ReelResult<SubtitleImage> {
    SubtitleRenderer::new(style).render(text, canvas_width)
}

#[cfg(test)]
#[path = "../../tests/unit/text/subtitle.rs"]
mod tests;
