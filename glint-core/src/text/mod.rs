//! Text rasterizer
//!
//! Draws 5x7 glyphs into a [`FrameBuffer`] one lit bit at a time, so text
//! picks up the same rotation and clipping as any other pixel.

pub mod font;

pub use font::{glyph, GLYPH_HEIGHT, GLYPH_WIDTH};

use crate::framebuffer::FrameBuffer;

/// Horizontal advance per character (5 glyph columns + 1 blank)
pub const CHAR_ADVANCE: i32 = GLYPH_WIDTH as i32 + 1;

/// Width in pixels that `text` occupies when drawn with [`FrameBuffer::draw_string`]
pub fn text_width(text: &str) -> usize {
    text.chars().count() * CHAR_ADVANCE as usize
}

impl FrameBuffer {
    /// Draw one character with its top-left corner at (x, y)
    ///
    /// Characters without a glyph leave the cell untouched. Unlit glyph
    /// bits are not drawn, so existing content shows through.
    pub fn draw_char(&mut self, x: i32, y: i32, c: char, intensity: u8) {
        let Some(columns) = glyph(c) else {
            return;
        };

        for (col, &bits) in columns.iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) != 0 {
                    self.set_pixel(
                        x.saturating_add(col as i32),
                        y.saturating_add(row as i32),
                        u16::from(intensity),
                    );
                }
            }
        }
    }

    /// Draw a single line of text starting at (x, y)
    ///
    /// No wrapping: characters past the edge are clipped.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, intensity: u8) {
        let mut cursor = x;
        for c in text.chars() {
            self.draw_char(cursor, y, c, intensity);
            cursor = cursor.saturating_add(CHAR_ADVANCE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Panel;

    fn buffer() -> FrameBuffer {
        FrameBuffer::new(Panel::CHARLIEPLEX_16X9)
    }

    fn lit(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..9 {
            for x in 0..16 {
                if fb.pixel(x, y).unwrap() != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_draw_char_matches_glyph_bits() {
        let mut fb = buffer();
        fb.draw_char(0, 0, 'A', 255);

        // 'A' column 0 is 0x7E: rows 1-6 lit
        for row in 0..7 {
            let expected = if row == 0 { 0 } else { 255 };
            assert_eq!(fb.pixel(0, row), Some(expected));
        }
        // Spacing column is never drawn
        assert!(lit(&fb).iter().all(|&(x, _)| x < 5));
    }

    #[test]
    fn test_draw_char_clips_at_edge() {
        let mut fb = buffer();
        fb.draw_char(14, 0, 'H', 100);
        // Only columns 0 and 1 of the glyph land on the panel
        assert!(lit(&fb).iter().all(|&(x, _)| x >= 14));
        assert_eq!(fb.pixel(14, 0), Some(100));
    }

    #[test]
    fn test_draw_char_without_glyph_is_noop() {
        let mut fb = buffer();
        fb.draw_char(0, 0, '\t', 255);
        fb.draw_char(0, 0, 'ß', 255);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_string_prefix_is_position_deterministic() {
        let mut single = buffer();
        single.draw_string(0, 0, "A", 255);

        let mut pair = buffer();
        pair.draw_string(0, 0, "AB", 255);

        for y in 0..9 {
            for x in 0..6 {
                assert_eq!(single.pixel(x, y), pair.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_string_advances_six_columns() {
        let mut fb = buffer();
        fb.draw_string(0, 0, " |", 255);
        // '|' is a single full column at glyph column 2
        let expected: Vec<(usize, usize)> = (0..7).map(|y| (8, y)).collect();
        let mut got = lit(&fb);
        got.sort_by_key(|&(x, y)| (x, y));
        assert_eq!(got, expected);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("Hi!"), 18);
    }
}
