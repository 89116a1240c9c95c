//! Turn one framebuffer row into the bytes of one scan slice.
//!
//! A slice is `pad ++ first half ++ second half`, where the halves follow the [`Layout`] and the
//! pad is the zero bytes that round the slice up to whole FIFO words. Byte `k` after the pad
//! lands in register `k` counted from the data pin, most significant bit on `Q_A`. The pad
//! bits are shifted last and discarded after the latch, so they never reach the chain.
//!
//! The row-select field is a `rows`-bit one-hot value, right-aligned in `row_bytes` bytes.
//! Position 0 is the value's most significant bit. With 8-row registers, row 0 in A2H order
//! is `Q_A` of the first row register. For other row counts the unused bits are the high bits
//! of the first byte, so `Q_A` upward of the first row register stays unused; those bits are 0
//! before polarity is applied.

use crate::{Frame, Geometry, Half, Layout, MAX_SLICE_BYTES, PinOrder, Polarity, WORD_BYTES};

/// Encoded bytes of one slice, padding included.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanSlice {
    bytes: [u8; MAX_SLICE_BYTES],
    len: usize,
}

impl ScanSlice {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The slice as big-endian FIFO words in submission order: the last four bytes first.
    ///
    /// Shifting each word least significant bit first then sends the slice's last bit first,
    /// which leaves the first data byte in the register nearest the data pin.
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        self.bytes()
            .rchunks_exact(WORD_BYTES)
            .map(|chunk| chunk.iter().fold(0u32, |word, &byte| (word << 8) | u32::from(byte)))
    }
}

/// Builds [`ScanSlice`]s for a fixed [`Geometry`] and [`Layout`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanEncoder {
    geometry: Geometry,
    layout: Layout,
}

impl ScanEncoder {
    #[must_use]
    pub const fn new(geometry: Geometry, layout: Layout) -> Self {
        Self { geometry, layout }
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Encode row `row` of `frame`. Missing frame bytes (row past the end, narrower frame)
    /// encode as dark columns.
    #[must_use]
    pub fn encode<const ROWS: usize, const COL_BYTES: usize>(
        &self,
        frame: &Frame<ROWS, COL_BYTES>,
        row: usize,
    ) -> ScanSlice {
        let mut slice = ScanSlice {
            bytes: [0; MAX_SLICE_BYTES],
            len: self.geometry.padded_slice_bytes(),
        };
        let mut offset = self.geometry.pad_bytes();
        for descriptor in self.layout.halves() {
            let width = match descriptor.half {
                Half::Row => self.geometry.row_bytes(),
                Half::Column => self.geometry.col_bytes(),
            };
            let field = &mut slice.bytes[offset..offset + width];
            match descriptor.half {
                Half::Row => self.encode_row_select(field, row, descriptor.order),
                Half::Column => encode_columns(field, frame.row_bytes(row), descriptor.order),
            }
            if descriptor.polarity == Polarity::ActiveLow {
                for byte in field.iter_mut() {
                    *byte = !*byte;
                }
            }
            offset += width;
        }
        slice
    }

    fn encode_row_select(&self, field: &mut [u8], row: usize, order: PinOrder) {
        let rows = self.geometry.rows();
        let position = match order {
            PinOrder::A2h => row,
            PinOrder::H2a => rows.saturating_sub(1).saturating_sub(row),
        };
        let value = if row < rows {
            1u32 << (rows - 1 - position)
        } else {
            0
        };
        let be = value.to_be_bytes();
        field.copy_from_slice(&be[be.len() - field.len()..]);
    }
}

fn encode_columns(field: &mut [u8], source: &[u8], order: PinOrder) {
    let width = field.len();
    for (k, byte) in field.iter_mut().enumerate() {
        *byte = match order {
            PinOrder::A2h => source.get(k).copied().unwrap_or(0),
            PinOrder::H2a => source
                .get(width - 1 - k)
                .map_or(0, |source_byte| source_byte.reverse_bits()),
        };
    }
}
