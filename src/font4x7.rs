//! A 4x7 bitmap font for clock faces: digits, colon, dash and space.
//!
//! Only the characters a clock face needs are included; letters and other ASCII render blank.

use crate::Glyph;

/// Source of 8x8 glyphs for text and clock rendering.
pub trait GlyphProvider {
    /// Glyph for `ch`. Characters the font does not cover render blank.
    fn glyph(&self, ch: char) -> Glyph;
}

/// Each glyph is 7 rows in the upper nibble; row 7 and the low nibble stay dark.
const DIGITS: [[u8; 8]; 10] = [
    // 0
    [0x60, 0x90, 0x90, 0x90, 0x90, 0x90, 0x60, 0x00],
    // 1
    [0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70, 0x00],
    // 2
    [0x60, 0x90, 0x10, 0x20, 0x40, 0x80, 0xF0, 0x00],
    // 3
    [0x60, 0x90, 0x10, 0x60, 0x10, 0x90, 0x60, 0x00],
    // 4
    [0x20, 0x60, 0xA0, 0xA0, 0xF0, 0x20, 0x20, 0x00],
    // 5
    [0xF0, 0x80, 0xE0, 0x10, 0x10, 0x90, 0x60, 0x00],
    // 6
    [0x60, 0x80, 0xE0, 0x90, 0x90, 0x90, 0x60, 0x00],
    // 7
    [0xF0, 0x10, 0x20, 0x20, 0x40, 0x40, 0x40, 0x00],
    // 8
    [0x60, 0x90, 0x90, 0x60, 0x90, 0x90, 0x60, 0x00],
    // 9
    [0x60, 0x90, 0x90, 0x70, 0x10, 0x10, 0x60, 0x00],
];
const COLON: [u8; 8] = [0x00, 0x00, 0x20, 0x00, 0x20, 0x00, 0x00, 0x00];
const DASH: [u8; 8] = [0x00, 0x00, 0x00, 0xF0, 0x00, 0x00, 0x00, 0x00];
const BLANK: [u8; 8] = [0x00; 8];

/// The built-in 4x7 font.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Font4x7;

impl Font4x7 {
    /// Width of the visible part of a digit.
    pub const GLYPH_WIDTH: usize = 4;
    pub const GLYPH_HEIGHT: usize = 7;
}

impl GlyphProvider for Font4x7 {
    fn glyph(&self, ch: char) -> Glyph {
        let rows = match ch {
            '0'..='9' => ch
                .to_digit(10)
                .and_then(|digit| DIGITS.get(digit as usize))
                .copied()
                .unwrap_or(BLANK),
            ':' => COLON,
            '-' => DASH,
            _ => BLANK,
        };
        Glyph::from_glyph_rows(rows)
    }
}
