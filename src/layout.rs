//! How the row and column registers are wired into the chain.
//!
//! Polarity and pin order are properties of the board, not of the picture, so they live in a
//! [`Layout`] handed to the encoder once instead of being scattered through drawing code.

use crate::{Error, Result};

/// Which half of a scan slice a [`Descriptor`] describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum Half {
    /// Row-select registers.
    Row,
    /// Column-data registers.
    Column,
}

/// Logic level that switches an LED line on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum Polarity {
    /// A 0 bit drives the line. Every byte of the field is complemented.
    ActiveLow,
    /// A 1 bit drives the line.
    ActiveHigh,
}

/// Mapping from register outputs (Q_A..Q_H) to physical rows or columns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum PinOrder {
    /// `Q_A` of the half's first register (the one nearest the data pin) is index 0.
    A2h,
    /// First output is the highest index. Reverses bytes and the bits inside each byte.
    H2a,
}

/// Wiring of one half of the chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct Descriptor {
    pub half: Half,
    pub polarity: Polarity,
    pub order: PinOrder,
}

impl Descriptor {
    // Flag bits, for boards documented with a `ROW | ACTIVE_LOW | A2H` style layout.
    pub const ROW: u8 = 0b000;
    pub const COLUMN: u8 = 0b001;
    pub const ACTIVE_LOW: u8 = 0b000;
    pub const ACTIVE_HIGH: u8 = 0b010;
    pub const A2H: u8 = 0b000;
    pub const H2A: u8 = 0b100;

    #[must_use]
    pub const fn row(polarity: Polarity, order: PinOrder) -> Self {
        Self {
            half: Half::Row,
            polarity,
            order,
        }
    }

    #[must_use]
    pub const fn column(polarity: Polarity, order: PinOrder) -> Self {
        Self {
            half: Half::Column,
            polarity,
            order,
        }
    }

    /// Decode a 3-bit flag set; a missing flag selects row, active-low and A2H respectively.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            half: if bits & Self::COLUMN == 0 {
                Half::Row
            } else {
                Half::Column
            },
            polarity: if bits & Self::ACTIVE_HIGH == 0 {
                Polarity::ActiveLow
            } else {
                Polarity::ActiveHigh
            },
            order: if bits & Self::H2A == 0 {
                PinOrder::A2h
            } else {
                PinOrder::H2a
            },
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        let mut bits = 0;
        if matches!(self.half, Half::Column) {
            bits |= Self::COLUMN;
        }
        if matches!(self.polarity, Polarity::ActiveHigh) {
            bits |= Self::ACTIVE_HIGH;
        }
        if matches!(self.order, PinOrder::H2a) {
            bits |= Self::H2A;
        }
        bits
    }
}

/// Ordered pair of descriptors: the first half is shifted out first.
///
/// The default is active-low rows in A2H order followed by active-high columns in H2A order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct Layout {
    halves: [Descriptor; 2],
}

impl Layout {
    pub const DEFAULT: Self = Self {
        halves: [
            Descriptor::row(Polarity::ActiveLow, PinOrder::A2h),
            Descriptor::column(Polarity::ActiveHigh, PinOrder::H2a),
        ],
    };

    /// # Errors
    ///
    /// Returns [`Error::LayoutHalves`] unless one descriptor is a row half and the other a
    /// column half.
    pub const fn new(first: Descriptor, second: Descriptor) -> Result<Self> {
        match (first.half, second.half) {
            (Half::Row, Half::Column) | (Half::Column, Half::Row) => Ok(Self {
                halves: [first, second],
            }),
            (Half::Row, Half::Row) | (Half::Column, Half::Column) => Err(Error::LayoutHalves),
        }
    }

    /// # Errors
    ///
    /// See [`Layout::new`].
    pub const fn from_bits(first: u8, second: u8) -> Result<Self> {
        Self::new(Descriptor::from_bits(first), Descriptor::from_bits(second))
    }

    /// Descriptors in shift order.
    #[must_use]
    pub const fn halves(&self) -> &[Descriptor; 2] {
        &self.halves
    }

    #[must_use]
    pub const fn row(&self) -> Descriptor {
        match self.halves[0].half {
            Half::Row => self.halves[0],
            Half::Column => self.halves[1],
        }
    }

    #[must_use]
    pub const fn column(&self) -> Descriptor {
        match self.halves[0].half {
            Half::Column => self.halves[0],
            Half::Row => self.halves[1],
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}
