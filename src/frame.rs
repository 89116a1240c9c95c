//! A packed 1-bit framebuffer with raster drawing primitives.
//!
//! Pixels are stored row-major, eight to a byte, most significant bit first (the MONO_HLSB
//! packing), which is also the order the column registers expect before any
//! [`PinOrder`](crate::PinOrder) adjustment.
//!
//! [`Frame`] implements [`DrawTarget`], so anything from
//! [`embedded-graphics`](https://docs.rs/embedded-graphics) can draw into it:
//!
//! ```no_run
//! # use hc595_matrix::{Frame, col_bytes};
//! use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::{Circle, PrimitiveStyle}};
//! # fn example() -> hc595_matrix::Result<()> {
//! let mut frame = Frame::<8, { col_bytes(24) }>::new(24)?;
//! let Ok(()) = Circle::new(Point::new(8, 0), 7)
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut frame);
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::{Error, Result, col_bytes};

/// An 8x8 bitmap as returned by a [`GlyphProvider`](crate::GlyphProvider).
pub type Glyph = Frame<8, 1>;

/// A `ROWS`-row monochrome bitmap holding `COL_BYTES` bytes per row.
///
/// The visible width `cols` is fixed at construction and must need exactly `COL_BYTES` bytes.
/// Coordinates are signed so shapes may hang off any edge; out-of-range pixels are clipped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame<const ROWS: usize, const COL_BYTES: usize> {
    cols: usize,
    buf: [[u8; COL_BYTES]; ROWS],
}

impl<const ROWS: usize, const COL_BYTES: usize> Frame<ROWS, COL_BYTES> {
    /// Create a blank frame `cols` pixels wide.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameWidth`] if `cols` does not need exactly `COL_BYTES` bytes.
    pub const fn new(cols: usize) -> Result<Self> {
        if cols == 0 || col_bytes(cols) != COL_BYTES {
            return Err(Error::FrameWidth {
                cols,
                col_bytes: COL_BYTES,
            });
        }
        Ok(Self {
            cols,
            buf: [[0; COL_BYTES]; ROWS],
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        ROWS
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Packed bytes of one row, or an empty slice past the last row.
    #[must_use]
    pub fn row_bytes(&self, row: usize) -> &[u8] {
        self.buf.get(row).map(|bytes| bytes.as_slice()).unwrap_or_default()
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize, u8)> {
        let column = usize::try_from(x).ok().filter(|&column| column < self.cols)?;
        let row = usize::try_from(y).ok().filter(|&row| row < ROWS)?;
        Some((row, column / 8, 0x80 >> (column % 8)))
    }

    /// Set or clear one pixel.
    pub fn pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((row, byte, mask)) = self.index(x, y) {
            let cell = &mut self.buf[row][byte];
            if on {
                *cell |= mask;
            } else {
                *cell &= !mask;
            }
        }
    }

    /// Read one pixel; anything outside the frame reads as off.
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_some_and(|(row, byte, mask)| self.buf[row][byte] & mask != 0)
    }

    pub fn hline(&mut self, x: i32, y: i32, width: i32, on: bool) {
        self.fill_rect(x, y, width, 1, on);
    }

    pub fn vline(&mut self, x: i32, y: i32, height: i32, on: bool) {
        self.fill_rect(x, y, 1, height, on);
    }

    /// Bresenham line including both end points.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) {
        let Ok(()) = Line::new(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::from(on), 1))
            .draw(self);
    }

    /// One-pixel outline of a `width` x `height` rectangle.
    pub fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, on: bool) {
        let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
            return;
        };
        let Ok(()) = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::from(on), 1))
            .draw(self);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, on: bool) {
        let columns = x.max(0)..x.saturating_add(width).min(self.cols_i32());
        for row in y.max(0)..y.saturating_add(height).min(rows_i32::<ROWS>()) {
            for column in columns.clone() {
                self.pixel(column, row, on);
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Only glyph pixels are written.
    pub fn text(&mut self, text: &str, x: i32, y: i32, font: &MonoFont<'_>, on: bool) {
        let style = MonoTextStyle::new(font, BinaryColor::from(on));
        let Ok(_) = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Move the contents by (`dx`, `dy`). The strip the image moved away from keeps its old
    /// pixels, so clear or redraw it if a blank edge is wanted.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let (width, height) = (self.cols_i32(), rows_i32::<ROWS>());
        // Walk against the direction of travel so every source is read before it is overwritten.
        for row_offset in 0..height {
            let row = if dy > 0 { height - 1 - row_offset } else { row_offset };
            for column_offset in 0..width {
                let column = if dx > 0 { width - 1 - column_offset } else { column_offset };
                let (source_column, source_row) = (column.saturating_sub(dx), row.saturating_sub(dy));
                if (0..width).contains(&source_column) && (0..height).contains(&source_row) {
                    let on = self.get_pixel(source_column, source_row);
                    self.pixel(column, row, on);
                }
            }
        }
    }

    /// Copy `source` onto this frame with its top-left corner at (`x`, `y`).
    ///
    /// Source pixels equal to `key` are treated as transparent and leave the destination as is.
    pub fn blit<const SOURCE_ROWS: usize, const SOURCE_COL_BYTES: usize>(
        &mut self,
        source: &Frame<SOURCE_ROWS, SOURCE_COL_BYTES>,
        x: i32,
        y: i32,
        key: Option<bool>,
    ) {
        for source_row in 0..rows_i32::<SOURCE_ROWS>() {
            for source_column in 0..source.cols_i32() {
                let on = source.get_pixel(source_column, source_row);
                if key != Some(on) {
                    self.pixel(x.saturating_add(source_column), y.saturating_add(source_row), on);
                }
            }
        }
    }

    /// Set every visible pixel to `on`. Bits past `cols` in the last byte stay clear.
    pub fn fill(&mut self, on: bool) {
        self.fill_rect(0, 0, self.cols_i32(), rows_i32::<ROWS>(), on);
    }

    pub fn clear(&mut self) {
        self.fill(false);
    }

    fn cols_i32(&self) -> i32 {
        i32::try_from(self.cols).unwrap_or(i32::MAX)
    }
}

impl Frame<8, 1> {
    /// Build a glyph from eight row bytes, most significant bit leftmost.
    #[must_use]
    pub const fn from_glyph_rows(rows: [u8; 8]) -> Self {
        let mut buf = [[0; 1]; 8];
        let mut row = 0;
        while row < 8 {
            buf[row][0] = rows[row];
            row += 1;
        }
        Self { cols: 8, buf }
    }
}

const fn rows_i32<const ROWS: usize>() -> i32 {
    // ROWS is bounded by the array it sizes; anything beyond i32 cannot be addressed anyway.
    if ROWS > i32::MAX as usize {
        i32::MAX
    } else {
        ROWS as i32
    }
}

impl<const ROWS: usize, const COL_BYTES: usize> OriginDimensions for Frame<ROWS, COL_BYTES> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.cols).unwrap_or(u32::MAX),
            u32::try_from(ROWS).unwrap_or(u32::MAX),
        )
    }
}

impl<const ROWS: usize, const COL_BYTES: usize> DrawTarget for Frame<ROWS, COL_BYTES> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.pixel(coord.x, coord.y, color.is_on());
        }
        Ok(())
    }
}
