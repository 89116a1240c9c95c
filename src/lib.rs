//! Drive an LED dot-matrix built from daisy-chained 74HC595 shift registers.
//!
//! A [`LedMatrix`] owns a monochrome [`Frame`] and, on every [`LedMatrix::draw`], encodes one
//! scan slice per row (row select + column data) and streams it into a [`ShiftOut`] sink. On the
//! Pico that sink is [`Hc595Pio`], a PIO state machine that shifts, clocks and latches the chain
//! at a fixed rate. [`ButtonEvents`] turns rising edges on push buttons into a stream of
//! debounced [`ButtonEvent`]s.
//!
//! Everything except the PIO engine, the button tasks and the RTC compiles on the host with the
//! `host` feature, so the encoding and timing logic is tested without hardware.
#![no_std]

mod error;
mod shared_constants;

pub mod button;
pub mod clock;
pub mod font4x7;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod led_matrix;
#[cfg(not(feature = "host"))]
pub mod pio_hc595;
#[cfg(not(feature = "host"))]
pub mod rtc_time;
pub mod scan;
pub mod shift_out;

// Re-export commonly used items
#[cfg(not(feature = "host"))]
pub use button::{ButtonEvents, ButtonStatic};
pub use button::{ButtonEvent, ButtonId, Debouncer};
pub use clock::{AdjustableClock, ClockMode, TimeOfDay, TimeSource, render_clock_face};
pub use error::{Error, Result};
pub use font4x7::{Font4x7, GlyphProvider};
pub use frame::{Frame, Glyph};
pub use geometry::{Geometry, col_bytes};
pub use layout::{Descriptor, Half, Layout, PinOrder, Polarity};
pub use led_matrix::LedMatrix;
#[cfg(not(feature = "host"))]
pub use pio_hc595::Hc595Pio;
#[cfg(not(feature = "host"))]
pub use rtc_time::RtcTime;
pub use scan::{ScanEncoder, ScanSlice};
pub use shared_constants::*;
pub use shift_out::{ChainModel, EngineConfig, ShiftOut};
