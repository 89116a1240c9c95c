//! Fixed dimensions of the shift-register chain behind a matrix.

use crate::{Error, MAX_ROWS, MAX_SLICE_BYTES, Result, WORD_BYTES};

/// Number of whole bytes needed to hold `bits` bits.
///
/// Use it to name the column byte width of a [`Frame`](crate::Frame) type:
/// `Frame<8, { col_bytes(24) }>`.
#[must_use]
pub const fn col_bytes(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Rows, columns and the derived byte widths of one scan slice.
///
/// One 74HC595 drives eight lines, so the chain holds `row_bytes + col_bytes` registers and
/// every latch moves `chain_bits` bits to the outputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct Geometry {
    rows: usize,
    cols: usize,
    row_bytes: usize,
    col_bytes: usize,
}

impl Geometry {
    /// # Errors
    ///
    /// Returns [`Error::RowCount`] unless `1 <= rows <= 32`, [`Error::ColumnCount`] for zero
    /// columns and [`Error::SliceTooLong`] when a padded slice would exceed
    /// [`MAX_SLICE_BYTES`].
    pub const fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(Error::RowCount(rows));
        }
        if cols == 0 {
            return Err(Error::ColumnCount);
        }
        let geometry = Self {
            rows,
            cols,
            row_bytes: col_bytes(rows),
            col_bytes: col_bytes(cols),
        };
        if geometry.padded_slice_bytes() > MAX_SLICE_BYTES {
            return Err(Error::SliceTooLong(geometry.padded_slice_bytes()));
        }
        Ok(geometry)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Bytes in the row-select field.
    #[must_use]
    pub const fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Bytes in the column-data field, and in one framebuffer row.
    #[must_use]
    pub const fn col_bytes(&self) -> usize {
        self.col_bytes
    }

    /// Chained registers, which is also the unpadded slice length in bytes.
    #[must_use]
    pub const fn slice_bytes(&self) -> usize {
        self.row_bytes + self.col_bytes
    }

    /// Slice length rounded up to whole FIFO words.
    #[must_use]
    pub const fn padded_slice_bytes(&self) -> usize {
        self.slice_bytes().div_ceil(WORD_BYTES) * WORD_BYTES
    }

    /// Leading zero bytes that fill a slice out to whole words.
    #[must_use]
    pub const fn pad_bytes(&self) -> usize {
        self.padded_slice_bytes() - self.slice_bytes()
    }

    /// Bits shifted between two latch pulses.
    #[must_use]
    pub const fn chain_bits(&self) -> usize {
        self.slice_bytes() * 8
    }

    #[must_use]
    pub const fn pad_bits(&self) -> usize {
        self.pad_bytes() * 8
    }

    #[must_use]
    pub const fn words_per_slice(&self) -> usize {
        self.padded_slice_bytes() / WORD_BYTES
    }

    /// Words submitted by one full draw.
    #[must_use]
    pub const fn words_per_frame(&self) -> usize {
        self.rows * self.words_per_slice()
    }

    /// `false` when the row registers have unused outputs. The unused bits are the high bits of
    /// the first row-select byte, which drive `Q_A` upward of the first row register, so the
    /// wiring has to leave those outputs unconnected.
    #[must_use]
    pub const fn is_row_aligned(&self) -> bool {
        self.rows % 8 == 0
    }
}
