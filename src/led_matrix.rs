//! A device abstraction for a multiplexed LED matrix behind a 74HC595 chain.
//!
//! The matrix shows one row at a time: each [`LedMatrix::draw`] streams one scan slice per row,
//! and the eye integrates the rows as long as the caller redraws often enough.
//!
//! ```ignore
//! # #![no_std]
//! # #![no_main]
//! # use panic_probe as _;
//! # use embassy_executor::Spawner;
//! # use embassy_rp::peripherals::PIO0;
//! use embassy_time::Timer;
//! use hc595_matrix::{Hc595Pio, Layout, LedMatrix, REDRAW_INTERVAL, Result, col_bytes};
//!
//! async fn example(p: embassy_rp::Peripherals) -> Result<()> {
//!     let mut matrix: LedMatrix<Hc595Pio<'static, PIO0, 0>, 8, { col_bytes(24) }> =
//!         LedMatrix::new_pio0(p.PIO0, p.PIN_4, p.PIN_2, p.PIN_3, 24, Layout::DEFAULT)?;
//!     matrix.frame_mut().rect(0, 0, 24, 8, true);
//!     matrix.start();
//!     loop {
//!         matrix.draw().await;
//!         Timer::after(REDRAW_INTERVAL).await;
//!     }
//! }
//! ```

#[cfg(not(feature = "host"))]
use embassy_rp::{Peri, peripherals::PIO0, peripherals::PIO1, pio::PioPin};

use crate::{Error, Frame, Geometry, Layout, Result, ScanEncoder, ShiftOut};
#[cfg(not(feature = "host"))]
use crate::{Hc595Pio, SHIFT_CLOCK_HZ};

/// Framebuffer, encoder and shift sink for a `ROWS`-row matrix.
pub struct LedMatrix<S: ShiftOut, const ROWS: usize, const COL_BYTES: usize> {
    out: S,
    encoder: ScanEncoder,
    frame: Frame<ROWS, COL_BYTES>,
}

impl<S: ShiftOut, const ROWS: usize, const COL_BYTES: usize> LedMatrix<S, ROWS, COL_BYTES> {
    /// Wrap an existing shift sink. The sink is left stopped; call [`LedMatrix::start`] before
    /// the first [`LedMatrix::draw`], since a stopped engine holds only seven words.
    ///
    /// # Errors
    ///
    /// Returns the [`Geometry`] and [`Frame`] construction errors, or
    /// [`Error::ChainMismatch`] if `out` is configured for a different chain length.
    pub fn new(out: S, cols: usize, layout: Layout) -> Result<Self> {
        let geometry = Geometry::new(ROWS, cols)?;
        let frame = Frame::new(cols)?;
        if out.chain_bits() != geometry.chain_bits() {
            return Err(Error::ChainMismatch {
                engine: out.chain_bits(),
                display: geometry.chain_bits(),
            });
        }
        #[cfg(not(feature = "host"))]
        if !geometry.is_row_aligned() {
            defmt::warn!(
                "{} rows leave {} row-register outputs unused",
                ROWS,
                geometry.row_bytes() * 8 - ROWS
            );
        }
        Ok(Self {
            out,
            encoder: ScanEncoder::new(geometry, layout),
            frame,
        })
    }

    #[must_use]
    pub const fn frame(&self) -> &Frame<ROWS, COL_BYTES> {
        &self.frame
    }

    /// Drawing target. Changes show up on the next [`LedMatrix::draw`].
    pub const fn frame_mut(&mut self) -> &mut Frame<ROWS, COL_BYTES> {
        &mut self.frame
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        self.encoder.geometry()
    }

    #[must_use]
    pub const fn shift_out(&self) -> &S {
        &self.out
    }

    pub fn start(&mut self) {
        self.out.start();
    }

    pub fn stop(&mut self) {
        self.out.stop();
    }

    /// Stream one full refresh: a slice per row, rows in ascending order.
    ///
    /// Waits whenever the sink's queue is full; it never fails. On a stopped sink it waits
    /// forever once the queue fills.
    pub async fn draw(&mut self) {
        for row in 0..ROWS {
            let slice = self.encoder.encode(&self.frame, row);
            for word in slice.words() {
                self.out.enqueue_word(word).await;
            }
        }
    }
}

#[cfg(not(feature = "host"))]
impl<const ROWS: usize, const COL_BYTES: usize> LedMatrix<Hc595Pio<'static, PIO0, 0>, ROWS, COL_BYTES> {
    /// Build a matrix driven by PIO0 at [`SHIFT_CLOCK_HZ`].
    ///
    /// `shift` and `latch` must be consecutive GPIOs.
    ///
    /// # Errors
    ///
    /// See [`LedMatrix::new`] and [`Hc595Pio::new`].
    pub fn new_pio0(
        pio: Peri<'static, PIO0>,
        data: Peri<'static, impl PioPin>,
        shift: Peri<'static, impl PioPin>,
        latch: Peri<'static, impl PioPin>,
        cols: usize,
        layout: Layout,
    ) -> Result<Self> {
        let geometry = Geometry::new(ROWS, cols)?;
        let out = Hc595Pio::new_pio0(pio, data, shift, latch, geometry.chain_bits(), SHIFT_CLOCK_HZ)?;
        Self::new(out, cols, layout)
    }
}

#[cfg(not(feature = "host"))]
impl<const ROWS: usize, const COL_BYTES: usize> LedMatrix<Hc595Pio<'static, PIO1, 0>, ROWS, COL_BYTES> {
    /// Build a matrix driven by PIO1 at [`SHIFT_CLOCK_HZ`].
    ///
    /// # Errors
    ///
    /// See [`LedMatrix::new`] and [`Hc595Pio::new`].
    pub fn new_pio1(
        pio: Peri<'static, PIO1>,
        data: Peri<'static, impl PioPin>,
        shift: Peri<'static, impl PioPin>,
        latch: Peri<'static, impl PioPin>,
        cols: usize,
        layout: Layout,
    ) -> Result<Self> {
        let geometry = Geometry::new(ROWS, cols)?;
        let out = Hc595Pio::new_pio1(pio, data, shift, latch, geometry.chain_bits(), SHIFT_CLOCK_HZ)?;
        Self::new(out, cols, layout)
    }
}
