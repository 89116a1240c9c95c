//! Host-level tests for the packed framebuffer and its drawing primitives.
#![cfg(feature = "host")]

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use hc595_matrix::{Error, Font4x7, Frame, GlyphProvider, col_bytes};

type Frame8x24 = Frame<8, { col_bytes(24) }>;

fn frame_8x24() -> Frame8x24 {
    Frame::new(24).expect("24 columns fit 3 bytes")
}

fn lit(frame: &Frame8x24) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    for y in 0..8 {
        for x in 0..24 {
            if frame.get_pixel(x, y) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[test]
fn width_must_match_column_bytes() {
    assert!(Frame::<8, 3>::new(20).is_ok());
    assert!(matches!(
        Frame::<8, 3>::new(25),
        Err(Error::FrameWidth { cols: 25, col_bytes: 3 })
    ));
    assert!(matches!(Frame::<8, 3>::new(16), Err(Error::FrameWidth { .. })));
    assert!(matches!(Frame::<8, 1>::new(0), Err(Error::FrameWidth { .. })));
}

#[test]
fn pixels_pack_most_significant_bit_first() {
    let mut frame = frame_8x24();
    frame.pixel(9, 0, true);
    assert_eq!(frame.row_bytes(0), &[0x00, 0x40, 0x00]);
    assert!(frame.get_pixel(9, 0));

    frame.pixel(9, 0, false);
    assert_eq!(frame.row_bytes(0), &[0x00, 0x00, 0x00]);
    assert!(frame.row_bytes(8).is_empty());
}

#[test]
fn out_of_range_pixels_are_clipped() {
    let mut frame = frame_8x24();
    frame.pixel(-1, 0, true);
    frame.pixel(24, 0, true);
    frame.pixel(0, 8, true);
    assert!(lit(&frame).is_empty());
    assert!(!frame.get_pixel(-1, -1));
}

#[test]
fn lines_cover_their_end_points() {
    let mut frame = frame_8x24();
    frame.hline(2, 1, 4, true);
    assert_eq!(frame.row_bytes(1), &[0x3C, 0x00, 0x00]);

    frame.clear();
    frame.vline(0, 0, 8, true);
    for row in 0..8 {
        assert_eq!(frame.row_bytes(row)[0], 0x80);
    }

    frame.clear();
    frame.line(0, 0, 7, 7, true);
    assert_eq!(lit(&frame), (0..8).map(|i| (i, i)).collect::<Vec<_>>());
}

#[test]
fn rect_draws_outline_only() {
    let mut frame = frame_8x24();
    frame.rect(0, 0, 24, 8, true);
    for corner in [(0, 0), (23, 0), (0, 7), (23, 7)] {
        assert!(frame.get_pixel(corner.0, corner.1));
    }
    assert!(!frame.get_pixel(1, 1));
    assert_eq!(lit(&frame).len(), 2 * 24 + 2 * 6);
}

#[test]
fn fill_rect_clips_to_frame() {
    let mut frame = frame_8x24();
    frame.fill_rect(-2, -2, 4, 4, true);
    assert_eq!(lit(&frame), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn fill_sets_every_visible_pixel() {
    let mut frame = frame_8x24();
    frame.fill(true);
    assert_eq!(lit(&frame).len(), 8 * 24);
    frame.clear();
    assert!(lit(&frame).is_empty());
}

#[test]
fn fill_leaves_bits_past_the_last_column_clear() {
    let mut frame = Frame::<8, { col_bytes(20) }>::new(20).expect("20 columns fit 3 bytes");
    frame.fill(true);
    for row in 0..8 {
        assert_eq!(frame.row_bytes(row), &[0xFF, 0xFF, 0xF0]);
    }
    frame.clear();
    assert_eq!(frame.row_bytes(0), &[0x00, 0x00, 0x00]);
}

#[test]
fn blit_key_keeps_destination_pixels() {
    let one = Font4x7.glyph('1');

    let mut keyed = frame_8x24();
    keyed.fill(true);
    keyed.blit(&one, 0, 0, Some(false));
    assert_eq!(lit(&keyed).len(), 8 * 24);

    let mut opaque = frame_8x24();
    opaque.fill(true);
    opaque.blit(&one, 0, 0, None);
    assert!(!opaque.get_pixel(0, 0));
    assert!(opaque.get_pixel(2, 0));
    assert!(opaque.get_pixel(8, 0));
}

#[test]
fn blit_clips_at_right_edge() {
    let mut frame = frame_8x24();
    frame.blit(&Font4x7.glyph('-'), 22, 0, Some(false));
    assert_eq!(lit(&frame), vec![(22, 3), (23, 3)]);
}

#[test]
fn scroll_leaves_vacated_strip_unchanged() {
    let mut frame = frame_8x24();
    frame.pixel(0, 0, true);
    frame.scroll(1, 0);
    assert_eq!(lit(&frame), vec![(0, 0), (1, 0)]);

    let mut frame = frame_8x24();
    frame.pixel(3, 3, true);
    frame.scroll(-2, -1);
    assert_eq!(lit(&frame), vec![(1, 2)]);
}

#[test]
fn text_uses_embedded_graphics_fonts() {
    let mut frame = frame_8x24();
    frame.text("1", 0, 0, &FONT_4X6, true);
    let pixels = lit(&frame);
    assert!(!pixels.is_empty());
    assert!(pixels.iter().all(|&(x, y)| x < 4 && y < 6));
}

#[test]
fn frame_is_a_draw_target() {
    let mut frame = frame_8x24();
    let Ok(()) = Circle::new(Point::new(8, 0), 7)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut frame);
    assert!(!lit(&frame).is_empty());
    assert_eq!(frame.size(), Size::new(24, 8));
}
