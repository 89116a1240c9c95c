use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Every variant except `TaskSpawn` and `Rtc` is a configuration error: it is returned while
/// constructing a device and never from the refresh path.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(not(feature = "host"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("Matrix must have 1..=32 rows, got {_0}")]
    RowCount(#[error(not(source))] usize),

    #[display("Matrix must have at least one column")]
    ColumnCount,

    #[display("Scan slice of {_0} bytes exceeds the supported chain length")]
    SliceTooLong(#[error(not(source))] usize),

    #[display("Frame of {cols} columns does not fit {col_bytes} bytes per row")]
    FrameWidth { cols: usize, col_bytes: usize },

    #[display("Layout must name exactly one row half and one column half")]
    LayoutHalves,

    #[display("Latch pin {latch} must directly follow shift pin {shift}")]
    LatchPinNotAdjacent { shift: u8, latch: u8 },

    #[display("Chain length {_0} bits is not a positive multiple of 8")]
    ChainBits(#[error(not(source))] usize),

    #[display("Shift engine is configured for {engine} chain bits, display needs {display}")]
    ChainMismatch { engine: usize, display: usize },

    #[display("Shift clock {_0} Hz is outside 1..=80000 Hz")]
    ClockFrequency(#[error(not(source))] u32),

    #[cfg(not(feature = "host"))]
    #[display("RTC access failed: {_0:?}")]
    Rtc(#[error(not(source))] embassy_rp::rtc::RtcError),
}

#[cfg(not(feature = "host"))]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
