//! The sink side of the refresh path: something that shifts 32-bit words into a 74HC595 chain.
//!
//! [`Hc595Pio`](crate::Hc595Pio) is the hardware sink. [`ChainModel`] replays the same protocol
//! in software so the whole encode/refresh path can be checked on the host.
//!
//! A scan slice is shifted last bit first, so its first data byte ends up in the register
//! nearest the data pin with its most significant bit on `Q_A`. [`ScanSlice::words`]
//! already yields the words in that order; the engine shifts each word least significant bit
//! first and drops the slice's pad bits after the latch.
//!
//! [`ScanSlice::words`]: crate::ScanSlice::words

use heapless::Deque;

use crate::{Error, Geometry, MAX_SHIFT_CLOCK_HZ, MAX_SLICE_BYTES, Result, WORD_BYTES};

const WORD_BITS: usize = WORD_BYTES * 8;
/// Depth of the state machine TX FIFO with the RX FIFO joined onto it.
pub(crate) const FIFO_DEPTH: usize = 8;

// The state machine clock divider is 16.8 fixed point with a 16-bit integer part.
const MIN_DIVIDER_BITS: u64 = 1 << 8;
const MAX_DIVIDER_BITS: u64 = (u16::MAX as u64) << 8;

/// A 74HC595 word sink.
///
/// Words are shifted least significant bit first, in the order they are enqueued. The outputs
/// latch once `chain_bits` bits of a slice have been shifted, and the remaining `pad_bits` of
/// the slice's last word are discarded.
#[allow(
    async_fn_in_trait,
    reason = "sinks are driven from one executor and never need a Send future"
)]
pub trait ShiftOut {
    /// Start consuming words. Words enqueued while stopped stay queued.
    fn start(&mut self);

    /// Stop consuming words after the current word.
    fn stop(&mut self);

    /// Bits between two latch pulses.
    fn chain_bits(&self) -> usize;

    /// Queue one word, waiting while the queue is full.
    ///
    /// A stopped sink never drains, so this waits forever once the queue is full.
    async fn enqueue_word(&mut self, word: u32);
}

/// Trailing bits the engine discards so a slice of `chain_bits` bits fills whole words.
///
/// # Errors
///
/// Returns [`Error::ChainBits`] unless `chain_bits` is a positive multiple of 8 that fits in
/// [`MAX_SLICE_BYTES`].
pub(crate) const fn pad_bits_for(chain_bits: usize) -> Result<usize> {
    if chain_bits == 0 || chain_bits % 8 != 0 || chain_bits > MAX_SLICE_BYTES * 8 {
        return Err(Error::ChainBits(chain_bits));
    }
    Ok((WORD_BITS - chain_bits % WORD_BITS) % WORD_BITS)
}

/// Validated settings for the shift engine's state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Loop counter pushed ahead of the first slice: `chain_bits - 1`.
    pub config_word: u32,
    /// Bits dropped after every latch.
    pub pad_bits: u8,
    /// State machine clock divider, 16.8 fixed point.
    pub divider_bits: u32,
}

impl EngineConfig {
    /// Check a chain, its shift/latch pin pair and the instruction clock against `clk_sys_hz`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainBits`] for a chain that is not whole registers,
    /// [`Error::LatchPinNotAdjacent`] unless `latch_pin` directly follows `shift_pin`, and
    /// [`Error::ClockFrequency`] for a rate outside `1..=MAX_SHIFT_CLOCK_HZ` or one the
    /// divider cannot reach from `clk_sys_hz`.
    pub fn new(
        chain_bits: usize,
        shift_pin: u8,
        latch_pin: u8,
        freq_hz: u32,
        clk_sys_hz: u32,
    ) -> Result<Self> {
        let pad_bits = pad_bits_for(chain_bits)?;
        let config_word =
            u32::try_from(chain_bits - 1).map_err(|_| Error::ChainBits(chain_bits))?;
        let pad_bits = u8::try_from(pad_bits).map_err(|_| Error::ChainBits(chain_bits))?;
        if shift_pin.checked_add(1) != Some(latch_pin) {
            return Err(Error::LatchPinNotAdjacent {
                shift: shift_pin,
                latch: latch_pin,
            });
        }
        if !(1..=MAX_SHIFT_CLOCK_HZ).contains(&freq_hz) {
            return Err(Error::ClockFrequency(freq_hz));
        }
        let divider_bits = (u64::from(clk_sys_hz) << 8) / u64::from(freq_hz);
        if !(MIN_DIVIDER_BITS..=MAX_DIVIDER_BITS).contains(&divider_bits) {
            return Err(Error::ClockFrequency(freq_hz));
        }
        let divider_bits =
            u32::try_from(divider_bits).map_err(|_| Error::ClockFrequency(freq_hz))?;
        Ok(Self {
            config_word,
            pad_bits,
            divider_bits,
        })
    }
}

/// Software model of the shift engine and the register chain behind it.
///
/// Like the FIFO it buffers words while stopped: seven before the first start, because the
/// loop counter word still occupies one slot, and eight after. Every latch is recorded so tests
/// can compare what reached the outputs with what was encoded.
#[derive(Clone, Debug)]
pub struct ChainModel {
    chain_bits: usize,
    pad_bits: usize,
    running: bool,
    config_pending: bool,
    queued: Deque<u32, FIFO_DEPTH>,
    bit: usize,
    registers: [u8; MAX_SLICE_BYTES],
    latched: [u8; MAX_SLICE_BYTES],
    words: usize,
    latches: usize,
}

impl ChainModel {
    /// # Errors
    ///
    /// Returns [`Error::ChainBits`] unless `chain_bits` is a positive multiple of 8 that fits
    /// in [`MAX_SLICE_BYTES`].
    pub const fn new(chain_bits: usize) -> Result<Self> {
        match pad_bits_for(chain_bits) {
            Ok(pad_bits) => Ok(Self::with_pad(chain_bits, pad_bits)),
            Err(err) => Err(err),
        }
    }

    /// A model sized for the chain behind `geometry`.
    #[must_use]
    pub const fn for_geometry(geometry: &Geometry) -> Self {
        Self::with_pad(geometry.chain_bits(), geometry.pad_bits())
    }

    const fn with_pad(chain_bits: usize, pad_bits: usize) -> Self {
        Self {
            chain_bits,
            pad_bits,
            running: false,
            config_pending: true,
            queued: Deque::new(),
            bit: 0,
            registers: [0; MAX_SLICE_BYTES],
            latched: [0; MAX_SLICE_BYTES],
            words: 0,
            latches: 0,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn pad_bits(&self) -> usize {
        self.pad_bits
    }

    /// Words shifted so far. Queued words are not counted until they are shifted.
    #[must_use]
    pub const fn words(&self) -> usize {
        self.words
    }

    /// Latch pulses so far.
    #[must_use]
    pub const fn latches(&self) -> usize {
        self.latches
    }

    /// Words waiting for [`ShiftOut::start`].
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Words a stopped engine accepts before `enqueue_word` starts waiting.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        if self.config_pending {
            FIFO_DEPTH - 1
        } else {
            FIFO_DEPTH
        }
    }

    /// Output latches at the last latch pulse, one byte per register starting with the
    /// register nearest the data pin. Bit 7 is `Q_A`, bit 0 is `Q_H`.
    #[must_use]
    pub fn latched(&self) -> &[u8] {
        &self.latched[..self.chain_bits / 8]
    }

    fn shift_word(&mut self, word: u32) {
        self.words += 1;
        for index in 0..WORD_BITS {
            if self.bit < self.chain_bits {
                self.shift_in((word >> index) & 1 == 1);
            }
            self.bit += 1;
            if self.bit == self.chain_bits {
                self.latched = self.registers;
                self.latches += 1;
            }
            if self.bit == self.chain_bits + self.pad_bits {
                self.bit = 0;
            }
        }
    }

    // One shift clock: every bit moves one output further from the data pin.
    fn shift_in(&mut self, high: bool) {
        let mut carry = u8::from(high);
        for register in &mut self.registers[..self.chain_bits / 8] {
            let next = *register & 1;
            *register = (*register >> 1) | (carry << 7);
            carry = next;
        }
    }
}

impl ShiftOut for ChainModel {
    fn start(&mut self) {
        self.running = true;
        self.config_pending = false;
        while let Some(word) = self.queued.pop_front() {
            self.shift_word(word);
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn chain_bits(&self) -> usize {
        self.chain_bits
    }

    async fn enqueue_word(&mut self, word: u32) {
        if self.running {
            self.shift_word(word);
        } else if self.queued.len() >= self.capacity() || self.queued.push_back(word).is_err() {
            core::future::pending::<()>().await;
        }
    }
}
