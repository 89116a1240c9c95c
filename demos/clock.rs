//! `HH:MM` clock on an 8x24 74HC595 matrix, set with two buttons.
//!
//! Wiring: data on GPIO4, shift clock on GPIO2, latch on GPIO3. The mode button (GPIO17)
//! cycles normal -> set hour -> set minute; the increment button (GPIO16) bumps the blinking
//! field. Both buttons pull their pin high when pressed.

#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::peripherals::PIO0;
use embassy_time::Timer;
use hc595_matrix::{
    AdjustableClock, ButtonEvents, ButtonId, ButtonStatic, DEFAULT_DEBOUNCE, Font4x7, Hc595Pio,
    Layout, LedMatrix, REDRAW_INTERVAL, Result, RtcTime, TimeSource, col_bytes,
    render_clock_face,
};
use panic_probe as _;

const ROWS: usize = 8;
const COLS: usize = 24;
const MODE_BUTTON: ButtonId = ButtonId(0);
const INCREMENT_BUTTON: ButtonId = ButtonId(1);

type ClockMatrix = LedMatrix<Hc595Pio<'static, PIO0, 0>, ROWS, { col_bytes(COLS) }>;

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    let Err(err) = inner_main(spawner).await;
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    info!("Starting 74HC595 matrix clock");
    let p = embassy_rp::init(Default::default());

    let mut matrix: ClockMatrix =
        LedMatrix::new_pio0(p.PIO0, p.PIN_4, p.PIN_2, p.PIN_3, COLS, Layout::DEFAULT)?;
    matrix.start();

    let mut clock = AdjustableClock::new(RtcTime::new(p.RTC)?);
    clock.time_source_mut().calibrate_subsecond_origin().await?;

    static BUTTON_STATIC: ButtonStatic = ButtonEvents::new_static();
    let buttons = ButtonEvents::new(&BUTTON_STATIC);
    buttons.add_button(p.PIN_17, MODE_BUTTON, DEFAULT_DEBOUNCE, spawner)?;
    buttons.add_button(p.PIN_16, INCREMENT_BUTTON, DEFAULT_DEBOUNCE, spawner)?;

    let font = Font4x7;
    loop {
        while let Some(event) = buttons.try_next() {
            if event.id == MODE_BUTTON {
                let mode = clock.switch_mode()?;
                info!("Clock mode: {}", mode);
            } else if event.id == INCREMENT_BUTTON {
                clock.increment();
            }
        }

        let reading = clock.reading()?;
        render_clock_face(
            matrix.frame_mut(),
            &reading,
            reading.blink_on(),
            clock.mode(),
            &font,
        );
        matrix.draw().await;
        Timer::after(REDRAW_INTERVAL).await;
    }
}
