//! Built-in 5x7 bitmap face used when no outline font can be loaded.

use crate::foundation::core::Frame;
use crate::foundation::math::over_px;

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
const CELL_ADVANCE: u32 = GLYPH_COLS + 1;
const NOMINAL_CELL_PX: f32 = 8.0;

/// Column-major glyphs for ASCII `0x20..=0x7E`; bit 0 is the top row.
#[rustfmt::skip]
const ASCII_GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14], [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00], [0x08, 0x2A, 0x1C, 0x2A, 0x08], [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x60, 0x60, 0x00, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4B, 0x31], [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x36, 0x36, 0x00, 0x00],
    [0x00, 0x56, 0x36, 0x00, 0x00], [0x00, 0x08, 0x14, 0x22, 0x41], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x41, 0x22, 0x14, 0x08, 0x00], [0x02, 0x01, 0x51, 0x09, 0x06], [0x32, 0x49, 0x79, 0x41, 0x3E],
    [0x7E, 0x11, 0x11, 0x11, 0x7E], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x22, 0x1C], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x01, 0x01],
    [0x3E, 0x41, 0x41, 0x51, 0x32], [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x04, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31], [0x01, 0x01, 0x7F, 0x01, 0x01], [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x7F, 0x20, 0x18, 0x20, 0x7F], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03], [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x00, 0x7F, 0x41, 0x41],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x41, 0x41, 0x7F, 0x00, 0x00], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78],
    [0x7F, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], [0x38, 0x44, 0x44, 0x48, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x08, 0x7E, 0x09, 0x01, 0x02], [0x08, 0x14, 0x54, 0x54, 0x3C],
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x44, 0x3D, 0x00],
    [0x00, 0x7F, 0x10, 0x28, 0x44], [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x18, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0x7C, 0x14, 0x14, 0x14, 0x08],
    [0x08, 0x14, 0x14, 0x18, 0x7C], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20],
    [0x04, 0x3F, 0x44, 0x40, 0x20], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C], [0x44, 0x28, 0x10, 0x28, 0x44], [0x0C, 0x50, 0x50, 0x50, 0x3C],
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x7F, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x08, 0x04, 0x08, 0x10, 0x08],
];

/// Hollow box drawn for characters outside printable ASCII.
const MISSING_GLYPH: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

/// Fixed-advance bitmap face scaled by an integer factor to approximate a font size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    /// Face whose cell height approximates `size_px`.
    pub fn new(size_px: f32) -> Self {
        let scale = if size_px.is_finite() {
            (size_px / NOMINAL_CELL_PX).round().max(1.0) as u32
        } else {
            1
        };
        Self { scale }
    }

    /// Integer pixel scale applied to every glyph dot.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Horizontal advance of one character in pixels.
    pub fn advance(&self) -> u32 {
        CELL_ADVANCE * self.scale
    }

    /// Width in pixels of `text` laid out on one line.
    pub fn measure(&self, text: &str) -> f32 {
        (text.chars().count() as u32 * self.advance()) as f32
    }

    /// Draw `text` with its top-left corner at `(x, y)` in premultiplied `color`.
    pub fn draw(&self, dst: &mut Frame, text: &str, x: i64, y: i64, color: [u8; 4]) {
        let s = i64::from(self.scale);
        let mut pen_x = x;
        for ch in text.chars() {
            let glyph = glyph_for(ch);
            for (col, bits) in glyph.iter().enumerate() {
                for row in 0..GLYPH_ROWS {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let px = pen_x + col as i64 * s;
                    let py = y + i64::from(row) * s;
                    fill_block(dst, px, py, s, color);
                }
            }
            pen_x += i64::from(self.advance());
        }
    }
}

fn glyph_for(ch: char) -> &'static [u8; 5] {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        &ASCII_GLYPHS[(code - 0x20) as usize]
    } else if ch.is_whitespace() {
        &ASCII_GLYPHS[0]
    } else {
        &MISSING_GLYPH
    }
}

fn fill_block(dst: &mut Frame, x: i64, y: i64, size: i64, color: [u8; 4]) {
    let w = i64::from(dst.width);
    let h = i64::from(dst.height);
    for py in y.max(0)..(y + size).min(h) {
        for px in x.max(0)..(x + size).min(w) {
            let i = ((py as usize) * (dst.width as usize) + px as usize) * 4;
            let d = [dst.data[i], dst.data[i + 1], dst.data[i + 2], dst.data[i + 3]];
            dst.data[i..i + 4].copy_from_slice(&over_px(d, color));
        }
    }
}
