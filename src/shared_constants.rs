use embassy_time::Duration;

/// State machine instruction clock for the shift engine. Two instructions shift one bit.
pub const SHIFT_CLOCK_HZ: u32 = 30_000;
/// Above this rate the 74HC595 outputs settle poorly and the matrix visibly flickers.
pub const MAX_SHIFT_CLOCK_HZ: u32 = 80_000;

/// The row-select field is built in a `u32`, so at most 32 rows can be scanned.
pub const MAX_ROWS: usize = 32;
/// The engine consumes the chain one 32-bit FIFO word at a time.
pub const WORD_BYTES: usize = 4;
/// Largest padded scan slice (row select + columns) the encoder builds.
pub const MAX_SLICE_BYTES: usize = 128;

/// First-edge rate-limit window per button.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Buffered button events before the edge tasks start dropping them.
pub const BUTTON_EVENT_CAPACITY: usize = 8;
/// Delay between clock face redraws in the firmware loop.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(2);
