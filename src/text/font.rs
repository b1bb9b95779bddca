use std::path::{Path, PathBuf};

use crate::assets::color::Color;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::bitmap::BitmapFont;

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// One loaded outline font, shaped with Parley and rasterized with `vello_cpu`.
pub struct OutlineFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
    size_px: f32,
    source: PathBuf,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl OutlineFont {
    /// Load a TrueType/OpenType file (or the first face of a collection).
    pub fn load(path: &Path, size_px: f32) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("font size must be finite and > 0"));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| ReelError::asset(format!("read font '{}': {e}", path.display())))?;

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::asset(format!(
                "no font families registered from '{}'",
                path.display()
            ))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::asset("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
            size_px,
            source: path.to_path_buf(),
        })
    }

    /// File the font was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn layout(&mut self, text: &str, brush: TextBrushRgba8) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Advance width of `text` on a single unbroken line.
    pub fn measure(&mut self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout(text, TextBrushRgba8::default()).width()
    }

    fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        x: f64,
        y: f64,
        brush: TextBrushRgba8,
    ) {
        let layout = self.layout(text, brush);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            brush.r, brush.g, brush.b, brush.a,
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

/// Face used to draw subtitles: a real font file when one loads, otherwise the built-in bitmap.
#[derive(Debug)]
pub enum SubtitleFont {
    /// Outline font shaped with Parley.
    Outline(Box<OutlineFont>),
    /// Built-in fixed-advance face.
    Bitmap(BitmapFont),
}

/// One line to draw at a pixel position.
#[derive(Clone, Debug)]
pub(crate) struct PlacedLine<'a> {
    pub text: &'a str,
    pub x: i64,
    pub y: i64,
}

impl SubtitleFont {
    /// Try each candidate path in order and fall back to the built-in face.
    pub fn resolve(candidates: &[PathBuf], size_px: f32) -> Self {
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match OutlineFont::load(path, size_px) {
                Ok(font) => {
                    tracing::debug!(font = %path.display(), "loaded subtitle font");
                    return Self::Outline(Box::new(font));
                }
                Err(e) => {
                    tracing::debug!(font = %path.display(), error = %e, "font candidate rejected");
                }
            }
        }
        tracing::warn!(
            candidates = candidates.len(),
            "no subtitle font could be loaded, using the built-in bitmap face"
        );
        Self::Bitmap(BitmapFont::new(size_px))
    }

    /// Width in pixels of `text` on a single line.
    pub fn measure(&mut self, text: &str) -> f32 {
        match self {
            Self::Outline(font) => font.measure(text),
            Self::Bitmap(font) => font.measure(text),
        }
    }

    /// Draw `lines` into a `width` x `height` frame, finishing each line before the next.
    ///
    /// For every line the passes run in order; a pass paints its color once per
    /// offset. A later line's outline therefore lands on top of an earlier line's fill.
    pub(crate) fn draw_passes(
        &mut self,
        width: u32,
        height: u32,
        lines: &[PlacedLine<'_>],
        passes: &[(Color, Vec<(i64, i64)>)],
    ) -> ReelResult<Frame> {
        match self {
            Self::Bitmap(font) => {
                let mut frame = Frame::transparent(width, height);
                for line in lines {
                    for (color, offsets) in passes {
                        let premul = color.to_rgba8_premul().to_array();
                        for &(dx, dy) in offsets {
                            font.draw(&mut frame, line.text, line.x + dx, line.y + dy, premul);
                        }
                    }
                }
                Ok(frame)
            }
            Self::Outline(font) => {
                let w16 = u16::try_from(width).map_err(|_| {
                    ReelError::render(format!("subtitle width {width} exceeds raster limits"))
                })?;
                let h16 = u16::try_from(height).map_err(|_| {
                    ReelError::render(format!("subtitle height {height} exceeds raster limits"))
                })?;
                let mut ctx = vello_cpu::RenderContext::new(w16, h16);
                for line in lines.iter().filter(|l| !l.text.is_empty()) {
                    for (color, offsets) in passes {
                        let [r, g, b, a] = color.to_rgba8_straight();
                        let brush = TextBrushRgba8 { r, g, b, a };
                        for &(dx, dy) in offsets {
                            font.fill_line(
                                &mut ctx,
                                line.text,
                                (line.x + dx) as f64,
                                (line.y + dy) as f64,
                                brush,
                            );
                        }
                    }
                }
                ctx.flush();
                let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
                ctx.render_to_pixmap(&mut pixmap);
                Frame::from_premul_bytes(width, height, pixmap.data_as_u8_slice().to_vec())
            }
        }
    }
}
