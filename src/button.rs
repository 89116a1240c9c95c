//! Rising-edge push buttons reported as a stream of [`ButtonEvent`]s.
//!
//! Each button gets its own edge task. The task reports the first rising edge and then ignores
//! further edges for the debounce interval, measured from the last *reported* edge. This is
//! first-edge rate limiting rather than waiting for the contact to settle: a press is reported
//! the moment the contact first closes.
//!
//! See [`ButtonEvents`] for usage examples.

#[cfg(not(feature = "host"))]
use defmt::{info, warn};
#[cfg(not(feature = "host"))]
use embassy_executor::Spawner;
#[cfg(not(feature = "host"))]
use embassy_rp::Peri;
#[cfg(not(feature = "host"))]
use embassy_rp::gpio::{AnyPin, Input, Pin, Pull};
#[cfg(not(feature = "host"))]
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
#[cfg(not(feature = "host"))]
use embassy_sync::channel::Channel as EmbassyChannel;
#[cfg(not(feature = "host"))]
use embassy_time::{Duration, Instant};

use crate::DEFAULT_DEBOUNCE;
#[cfg(not(feature = "host"))]
use crate::{BUTTON_EVENT_CAPACITY, Error, Result};

/// Caller-chosen button identity, reported back in every [`ButtonEvent`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, defmt::Format)]
pub struct ButtonId(pub u8);

/// One accepted press.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct ButtonEvent {
    pub id: ButtonId,
    /// Milliseconds since boot at the accepted edge.
    pub at_ms: u64,
}

/// Rate limiter for edges, deciding which edges become events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Debouncer {
    interval_ms: u64,
    last_trigger_ms: Option<u64>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_trigger_ms: None,
        }
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Feed an edge seen at `now_ms` and return whether it is reported.
    ///
    /// The first edge is always reported. Later edges are reported once at least
    /// `interval_ms` has passed since the last reported one.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        let accepted = self
            .last_trigger_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms);
        if accepted {
            self.last_trigger_ms = Some(now_ms);
        }
        accepted
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE.as_millis())
    }
}

/// Static type for the [`ButtonEvents`] device abstraction.
///
/// See [`ButtonEvents`] for usage examples.
#[cfg(not(feature = "host"))]
pub type ButtonStatic = EmbassyChannel<CriticalSectionRawMutex, ButtonEvent, BUTTON_EVENT_CAPACITY>;

/// Buttons sharing one event queue.
///
/// # Examples
/// ```ignore
/// # #![no_std]
/// # #![no_main]
/// # use panic_probe as _;
/// # use defmt::info;
/// # use embassy_executor::Spawner;
/// use hc595_matrix::{ButtonEvents, ButtonId, ButtonStatic, DEFAULT_DEBOUNCE};
/// # async fn example(p: embassy_rp::Peripherals, spawner: Spawner) -> hc595_matrix::Result<()> {
/// static BUTTON_STATIC: ButtonStatic = ButtonEvents::new_static();
/// let buttons = ButtonEvents::new(&BUTTON_STATIC);
/// buttons.add_button(p.PIN_17, ButtonId(0), DEFAULT_DEBOUNCE, spawner)?;
/// buttons.add_button(p.PIN_16, ButtonId(1), DEFAULT_DEBOUNCE, spawner)?;
///
/// loop {
///     let event = buttons.wait().await;
///     info!("button {} at {} ms", event.id.0, event.at_ms);
/// }
/// # }
/// ```
#[cfg(not(feature = "host"))]
#[derive(Clone, Copy)]
pub struct ButtonEvents {
    button_static: &'static ButtonStatic,
}

#[cfg(not(feature = "host"))]
impl ButtonEvents {
    /// Create static channel resources for button events.
    ///
    /// See [`ButtonEvents`] for usage examples.
    #[must_use]
    pub const fn new_static() -> ButtonStatic {
        EmbassyChannel::new()
    }

    #[must_use]
    pub const fn new(button_static: &'static ButtonStatic) -> Self {
        Self { button_static }
    }

    /// Watch `pin` (pulled down, pressed = high) and report its rising edges as `id`.
    ///
    /// # Errors
    /// Returns an error if the edge task cannot be spawned; at most four buttons are supported.
    pub fn add_button<P: Pin>(
        &self,
        pin: Peri<'static, P>,
        id: ButtonId,
        debounce: Duration,
        spawner: Spawner,
    ) -> Result<()> {
        let any: Peri<'static, AnyPin> = pin.into();
        let token = debounced_button_task(
            Input::new(any, Pull::Down),
            id,
            Debouncer::new(debounce.as_millis()),
            self.button_static,
        )
        .map_err(Error::TaskSpawn)?;
        spawner.spawn(token);
        Ok(())
    }

    /// Wait for the next button event.
    pub async fn wait(&self) -> ButtonEvent {
        self.button_static.receive().await
    }

    /// The next queued event, if any.
    #[must_use]
    pub fn try_next(&self) -> Option<ButtonEvent> {
        self.button_static.try_receive().ok()
    }
}

#[cfg(not(feature = "host"))]
#[embassy_executor::task(pool_size = 4)]
async fn debounced_button_task(
    mut pin: Input<'static>,
    id: ButtonId,
    mut debouncer: Debouncer,
    button_static: &'static ButtonStatic,
) -> ! {
    info!("Button {} task started", id.0);
    loop {
        pin.wait_for_rising_edge().await;
        let now_ms = Instant::now().as_millis();
        if !debouncer.accept(now_ms) {
            continue;
        }
        if button_static.try_send(ButtonEvent { id, at_ms: now_ms }).is_err() {
            warn!("Button {} event dropped, queue full", id.0);
        }
    }
}
