//! A PIO state machine that shifts words into a 74HC595 chain and latches every slice.
//!
//! The program keeps `chain_bits - 1` in Y (pushed once as a configuration word), then loops:
//! shift `chain_bits` bits least significant bit first with one clock pulse each, raise the
//! latch while dropping the slice's trailing pad bits, repeat. Autopull at 32 bits feeds it
//! from the TX FIFO, so a stalled FIFO simply freezes the outputs on the last latched slice.

use defmt::info;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::Pin as _;
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::program::{
    Assembler, JmpCondition, MovDestination, MovOperation, MovSource, OutDestination, SideSet,
};
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, InterruptHandler, LoadedProgram, Pin, Pio,
    PioPin, ShiftConfig, ShiftDirection, StateMachine,
};
use embassy_rp::{Peri, bind_interrupts};
use fixed::types::U24F8;
use static_cell::StaticCell;

use crate::{EngineConfig, Result, ShiftOut};

// Side-set bit 0 drives the shift clock (SRCLK), bit 1 the latch (RCLK).
const IDLE: u8 = 0b00;
const SHIFT_LOW: u8 = 0b00;
const SHIFT_HIGH: u8 = 0b01;
const LATCH_HIGH: u8 = 0b10;

bind_interrupts!(struct Pio0Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

bind_interrupts!(struct Pio1Irqs {
    PIO1_IRQ_0 => InterruptHandler<PIO1>;
});

static PIO0_COMMON: StaticCell<Common<'static, PIO0>> = StaticCell::new();
static PIO1_COMMON: StaticCell<Common<'static, PIO1>> = StaticCell::new();

fn load_hc595_program<'d, PIO: Instance>(
    common: &mut Common<'d, PIO>,
    pad_bits: u8,
) -> LoadedProgram<'d, PIO> {
    let side_set = SideSet::new(false, 2, false);
    let mut assembler: Assembler<32> = Assembler::new_with_side_set(side_set);

    let mut wrap_target = assembler.label();
    let mut wrap_source = assembler.label();
    let mut shift_bit = assembler.label();

    assembler.pull_with_delay_and_side_set(false, true, 0, IDLE);
    assembler.mov_with_delay_and_side_set(
        MovDestination::Y,
        MovOperation::None,
        MovSource::OSR,
        0,
        IDLE,
    );
    // Empty the OSR so the first data word is autopulled.
    assembler.out_with_delay_and_side_set(OutDestination::NULL, 32, 0, IDLE);
    assembler.bind(&mut wrap_target);
    assembler.mov_with_delay_and_side_set(
        MovDestination::X,
        MovOperation::None,
        MovSource::Y,
        0,
        IDLE,
    );
    assembler.bind(&mut shift_bit);
    assembler.out_with_delay_and_side_set(OutDestination::PINS, 1, 0, SHIFT_LOW);
    assembler.jmp_with_delay_and_side_set(JmpCondition::XDecNonZero, &mut shift_bit, 0, SHIFT_HIGH);
    if pad_bits > 0 {
        assembler.out_with_delay_and_side_set(OutDestination::NULL, pad_bits, 0, LATCH_HIGH);
    } else {
        // mov y, y: a nop that only raises the latch.
        assembler.mov_with_delay_and_side_set(
            MovDestination::Y,
            MovOperation::None,
            MovSource::Y,
            0,
            LATCH_HIGH,
        );
    }
    assembler.bind(&mut wrap_source);

    let program = assembler.assemble_with_wrap(wrap_source, wrap_target);
    common.load_program(&program)
}

/// PIO-driven [`ShiftOut`] for a 74HC595 chain.
///
/// Needs three pins: serial data, shift clock and a latch pin directly after the shift clock
/// (both are driven by side-set, which uses consecutive pins).
pub struct Hc595Pio<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
    chain_bits: usize,
    _pins: [Pin<'d, PIO>; 3],
}

impl<'d, PIO: Instance, const SM: usize> Hc595Pio<'d, PIO, SM> {
    /// Load the shift program and configure `sm`. The engine starts stopped, with the loop
    /// counter word already in the FIFO, so only seven data words fit before
    /// [`ShiftOut::start`].
    ///
    /// `freq_hz` is the state machine instruction clock; each bit takes two instructions.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::new`].
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        data: Peri<'d, impl PioPin>,
        shift: Peri<'d, impl PioPin>,
        latch: Peri<'d, impl PioPin>,
        chain_bits: usize,
        freq_hz: u32,
    ) -> Result<Self> {
        let engine =
            EngineConfig::new(chain_bits, shift.pin(), latch.pin(), freq_hz, clk_sys_freq())?;

        let program = load_hc595_program(common, engine.pad_bits);
        let data = common.make_pio_pin(data);
        let shift = common.make_pio_pin(shift);
        let latch = common.make_pio_pin(latch);

        let mut cfg = Config::default();
        cfg.use_program(&program, &[&shift, &latch]);
        cfg.set_out_pins(&[&data]);
        cfg.clock_divider = U24F8::from_bits(engine.divider_bits);
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 32,
            direction: ShiftDirection::Right,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(Direction::Out, &[&data, &shift, &latch]);
        sm.tx().push(engine.config_word);

        info!(
            "74HC595 shift engine: {} chain bits, {} pad bits, {} Hz",
            chain_bits, engine.pad_bits, freq_hz
        );

        Ok(Self {
            sm,
            chain_bits,
            _pins: [data, shift, latch],
        })
    }
}

impl Hc595Pio<'static, PIO0, 0> {
    /// Claim PIO0 and run the engine on its state machine 0.
    ///
    /// # Errors
    ///
    /// See [`Hc595Pio::new`].
    ///
    /// # Panics
    ///
    /// Panics if PIO0 was already claimed through this function.
    pub fn new_pio0(
        pio: Peri<'static, PIO0>,
        data: Peri<'static, impl PioPin>,
        shift: Peri<'static, impl PioPin>,
        latch: Peri<'static, impl PioPin>,
        chain_bits: usize,
        freq_hz: u32,
    ) -> Result<Self> {
        let Pio { common, sm0, .. } = Pio::new(pio, Pio0Irqs);
        let common = PIO0_COMMON.init(common);
        Self::new(common, sm0, data, shift, latch, chain_bits, freq_hz)
    }
}

impl Hc595Pio<'static, PIO1, 0> {
    /// Claim PIO1 and run the engine on its state machine 0.
    ///
    /// # Errors
    ///
    /// See [`Hc595Pio::new`].
    ///
    /// # Panics
    ///
    /// Panics if PIO1 was already claimed through this function.
    pub fn new_pio1(
        pio: Peri<'static, PIO1>,
        data: Peri<'static, impl PioPin>,
        shift: Peri<'static, impl PioPin>,
        latch: Peri<'static, impl PioPin>,
        chain_bits: usize,
        freq_hz: u32,
    ) -> Result<Self> {
        let Pio { common, sm0, .. } = Pio::new(pio, Pio1Irqs);
        let common = PIO1_COMMON.init(common);
        Self::new(common, sm0, data, shift, latch, chain_bits, freq_hz)
    }
}

impl<PIO: Instance, const SM: usize> ShiftOut for Hc595Pio<'_, PIO, SM> {
    fn start(&mut self) {
        self.sm.set_enable(true);
    }

    fn stop(&mut self) {
        self.sm.set_enable(false);
    }

    fn chain_bits(&self) -> usize {
        self.chain_bits
    }

    async fn enqueue_word(&mut self, word: u32) {
        self.sm.tx().wait_push(word).await;
    }
}
