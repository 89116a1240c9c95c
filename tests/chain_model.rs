//! Host-level tests for the refresh path, from framebuffer to latched register contents.
#![cfg(feature = "host")]

use core::task::Poll;

use embassy_futures::{block_on, poll_once};
use hc595_matrix::{
    ChainModel, Descriptor, EngineConfig, Error, Frame, Geometry, Layout, LedMatrix, PinOrder,
    Polarity, ScanEncoder, ShiftOut, col_bytes,
};

type Matrix8x24 = LedMatrix<ChainModel, 8, { col_bytes(24) }>;
type Matrix16x24 = LedMatrix<ChainModel, 16, { col_bytes(24) }>;

const CLK_SYS_HZ: u32 = 125_000_000;

fn matrix_8x24() -> Matrix8x24 {
    let geometry = Geometry::new(8, 24).expect("valid geometry");
    LedMatrix::new(ChainModel::for_geometry(&geometry), 24, Layout::DEFAULT)
        .expect("matching chain")
}

fn latch_row(layout: Layout, row: usize) -> ChainModel {
    let geometry = Geometry::new(8, 24).expect("valid geometry");
    let mut frame = Frame::<8, { col_bytes(24) }>::new(24).expect("valid frame");
    frame.pixel(0, 0, true);
    let slice = ScanEncoder::new(geometry, layout).encode(&frame, row);

    let mut model = ChainModel::for_geometry(&geometry);
    model.start();
    for word in slice.words() {
        block_on(model.enqueue_word(word));
    }
    model
}

#[test]
fn chain_bits_must_be_whole_registers() {
    assert!(matches!(ChainModel::new(0), Err(Error::ChainBits(0))));
    assert!(matches!(ChainModel::new(12), Err(Error::ChainBits(12))));
    assert!(matches!(ChainModel::new(2048), Err(Error::ChainBits(2048))));
    assert_eq!(ChainModel::new(32).expect("valid").pad_bits(), 0);
    assert_eq!(ChainModel::new(40).expect("valid").pad_bits(), 24);
}

#[test]
fn word_bytes_land_nearest_register_first() {
    let mut model = ChainModel::new(32).expect("valid");
    model.start();
    block_on(model.enqueue_word(0x1234_5678));
    assert_eq!(model.latches(), 1);
    assert_eq!(model.latched(), &[0x12, 0x34, 0x56, 0x78]);
}

#[test]
fn trailing_pad_bits_never_reach_the_chain() {
    let mut model = ChainModel::new(40).expect("valid");
    model.start();
    block_on(model.enqueue_word(0xCDEF_0123));
    assert_eq!(model.latches(), 0);
    block_on(model.enqueue_word(0xFFFF_FFAB));
    assert_eq!(model.latches(), 1);
    assert_eq!(model.latched(), &[0xAB, 0xCD, 0xEF, 0x01, 0x23]);

    block_on(model.enqueue_word(0x1122_3344));
    block_on(model.enqueue_word(0x0000_0055));
    assert_eq!(model.latches(), 2);
    assert_eq!(model.latched(), &[0x55, 0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn row_zero_selects_q_a_of_the_row_register() {
    let model = latch_row(Layout::DEFAULT, 0);
    let registers = model.latched();
    // Active low: only Q_A of the register nearest the data pin is driven.
    assert_eq!(registers[0], 0x7F);
    // Column 0 in H2A order is the last output of the last column register.
    assert_eq!(&registers[1..], &[0x00, 0x00, 0x01]);

    let ascending = Layout::new(
        Descriptor::row(Polarity::ActiveLow, PinOrder::A2h),
        Descriptor::column(Polarity::ActiveHigh, PinOrder::A2h),
    )
    .expect("one row half and one column half");
    let model = latch_row(ascending, 0);
    assert_eq!(model.latched(), &[0x7F, 0x80, 0x00, 0x00]);
}

#[test]
fn last_row_selects_q_h_of_the_row_register() {
    let model = latch_row(Layout::DEFAULT, 7);
    assert_eq!(model.latched(), &[0xFE, 0x00, 0x00, 0x00]);
}

#[test]
fn draw_latches_once_per_row() {
    let mut matrix = matrix_8x24();
    matrix.frame_mut().pixel(0, 7, true);
    matrix.start();
    block_on(matrix.draw());

    let model = matrix.shift_out();
    assert_eq!(model.latches(), 8);
    assert_eq!(model.words(), matrix.geometry().words_per_frame());
    // Row 7 selected (active low, A2H) and column 0 on (active high, H2A).
    assert_eq!(model.latched(), &[0xFE, 0x00, 0x00, 0x01]);
}

#[test]
fn padded_geometry_latches_unpadded_slice() {
    let geometry = Geometry::new(16, 24).expect("valid geometry");
    let mut matrix: Matrix16x24 =
        LedMatrix::new(ChainModel::for_geometry(&geometry), 24, Layout::DEFAULT)
            .expect("matching chain");
    matrix.start();
    block_on(matrix.draw());

    let model = matrix.shift_out();
    assert_eq!(model.words(), 32);
    assert_eq!(model.latches(), 16);
    assert_eq!(model.latched(), &[0xFF, 0xFE, 0x00, 0x00, 0x00]);
}

#[test]
fn stopped_engine_holds_seven_words_before_first_start() {
    let mut model = ChainModel::new(32).expect("valid");
    assert_eq!(model.capacity(), 7);
    for word in 0..7 {
        block_on(model.enqueue_word(word));
    }
    assert_eq!(model.queued(), 7);
    assert_eq!(model.words(), 0);
    assert!(poll_once(model.enqueue_word(7)).is_pending());
    assert_eq!(model.queued(), 7);

    model.start();
    assert!(model.is_running());
    assert_eq!(model.queued(), 0);
    assert_eq!(model.latches(), 7);

    model.stop();
    assert!(!model.is_running());
    assert_eq!(model.capacity(), 8);
    for word in 0..8 {
        assert_eq!(poll_once(model.enqueue_word(word)), Poll::Ready(()));
    }
    assert!(poll_once(model.enqueue_word(8)).is_pending());
}

#[test]
fn started_matrix_draws_frames_larger_than_the_fifo() {
    let mut matrix = matrix_8x24();
    matrix.start();
    block_on(matrix.draw());
    block_on(matrix.draw());
    assert_eq!(matrix.shift_out().latches(), 16);
    assert_eq!(matrix.shift_out().queued(), 0);
}

#[test]
fn chain_length_must_match_display() {
    let result: Result<Matrix8x24, Error> =
        LedMatrix::new(ChainModel::new(40).expect("valid"), 24, Layout::DEFAULT);
    assert!(matches!(
        result,
        Err(Error::ChainMismatch {
            engine: 40,
            display: 32
        })
    ));
}

#[test]
fn frame_width_must_match_matrix_type() {
    let result: Result<Matrix8x24, Error> =
        LedMatrix::new(ChainModel::new(40).expect("valid"), 25, Layout::DEFAULT);
    assert!(matches!(result, Err(Error::FrameWidth { cols: 25, .. })));
}

#[test]
fn engine_config_derives_loop_counter_pad_and_divider() {
    let config = EngineConfig::new(32, 2, 3, 30_000, CLK_SYS_HZ).expect("valid config");
    assert_eq!(config.config_word, 31);
    assert_eq!(config.pad_bits, 0);
    assert_eq!(config.divider_bits, 1_066_666);

    let config = EngineConfig::new(40, 2, 3, 30_000, CLK_SYS_HZ).expect("valid config");
    assert_eq!(config.config_word, 39);
    assert_eq!(config.pad_bits, 24);
}

#[test]
fn latch_pin_must_follow_shift_pin() {
    assert!(matches!(
        EngineConfig::new(32, 2, 4, 30_000, CLK_SYS_HZ),
        Err(Error::LatchPinNotAdjacent { shift: 2, latch: 4 })
    ));
    assert!(matches!(
        EngineConfig::new(32, 3, 2, 30_000, CLK_SYS_HZ),
        Err(Error::LatchPinNotAdjacent { shift: 3, latch: 2 })
    ));
    assert!(matches!(
        EngineConfig::new(32, u8::MAX, 0, 30_000, CLK_SYS_HZ),
        Err(Error::LatchPinNotAdjacent { .. })
    ));
    assert!(EngineConfig::new(32, 2, 3, 30_000, CLK_SYS_HZ).is_ok());
}

#[test]
fn clock_must_fit_rate_limit_and_divider() {
    assert!(matches!(
        EngineConfig::new(32, 2, 3, 0, CLK_SYS_HZ),
        Err(Error::ClockFrequency(0))
    ));
    assert!(matches!(
        EngineConfig::new(32, 2, 3, 80_001, CLK_SYS_HZ),
        Err(Error::ClockFrequency(80_001))
    ));
    assert!(EngineConfig::new(32, 2, 3, 80_000, CLK_SYS_HZ).is_ok());
    // 125 MHz / 1 kHz needs a divider above 0xFFFF.FF.
    assert!(matches!(
        EngineConfig::new(32, 2, 3, 1_000, CLK_SYS_HZ),
        Err(Error::ClockFrequency(1_000))
    ));
    // A divider below 1 cannot be set either.
    assert!(matches!(
        EngineConfig::new(32, 2, 3, 80_000, 40_000),
        Err(Error::ClockFrequency(80_000))
    ));
}

#[test]
fn engine_config_rejects_partial_registers() {
    assert!(matches!(
        EngineConfig::new(12, 2, 3, 30_000, CLK_SYS_HZ),
        Err(Error::ChainBits(12))
    ));
}
