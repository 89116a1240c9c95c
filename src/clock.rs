//! Clock state for a two-button clock: a mode button cycles through setting hours and minutes,
//! an increment button bumps the field being set.
//!
//! The time itself comes from a [`TimeSource`]; [`AdjustableClock`] only holds the values being
//! edited, and [`render_clock_face`] draws the `HH:MM` face into a [`Frame`].

use crate::{Frame, GlyphProvider, Result};

/// Wall-clock time of day with millisecond resolution below the second.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub subsecond_ms: u16,
}

impl TimeOfDay {
    /// On for the first half of every second.
    #[must_use]
    pub const fn blink_on(&self) -> bool {
        self.subsecond_ms < 500
    }
}

/// A settable wall clock.
#[allow(
    async_fn_in_trait,
    reason = "time sources are polled from one executor and never need a Send future"
)]
pub trait TimeSource {
    /// # Errors
    ///
    /// Returns an error if the underlying clock cannot be read.
    fn now(&self) -> Result<TimeOfDay>;

    /// Set hour and minute, zeroing seconds and restarting the sub-second count.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying clock rejects the time.
    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()>;

    /// Align the sub-second count to the start of the next whole second.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying clock cannot be read.
    async fn calibrate_subsecond_origin(&mut self) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub enum ClockMode {
    #[default]
    Normal,
    SetHour,
    SetMinute,
}

/// [`TimeSource`] plus the hour and minute being edited.
pub struct AdjustableClock<T: TimeSource> {
    time_source: T,
    mode: ClockMode,
    set_hour: u8,
    set_minute: u8,
}

impl<T: TimeSource> AdjustableClock<T> {
    #[must_use]
    pub const fn new(time_source: T) -> Self {
        Self {
            time_source,
            mode: ClockMode::Normal,
            set_hour: 0,
            set_minute: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    #[must_use]
    pub const fn time_source(&self) -> &T {
        &self.time_source
    }

    pub const fn time_source_mut(&mut self) -> &mut T {
        &mut self.time_source
    }

    /// Advance Normal -> SetHour -> SetMinute -> Normal and return the new mode.
    ///
    /// Entering SetHour copies the current hour and minute for editing; leaving SetMinute
    /// writes them back with seconds set to zero.
    ///
    /// # Errors
    ///
    /// Returns the time source's error. The mode is unchanged on error.
    pub fn switch_mode(&mut self) -> Result<ClockMode> {
        self.mode = match self.mode {
            ClockMode::Normal => {
                let now = self.time_source.now()?;
                self.set_hour = now.hour;
                self.set_minute = now.minute;
                ClockMode::SetHour
            }
            ClockMode::SetHour => ClockMode::SetMinute,
            ClockMode::SetMinute => {
                self.time_source.set_time(self.set_hour, self.set_minute)?;
                ClockMode::Normal
            }
        };
        Ok(self.mode)
    }

    /// Bump the field being set; does nothing in normal mode.
    pub const fn increment(&mut self) {
        match self.mode {
            ClockMode::Normal => {}
            ClockMode::SetHour => self.set_hour = (self.set_hour + 1) % 24,
            ClockMode::SetMinute => self.set_minute = (self.set_minute + 1) % 60,
        }
    }

    /// The time to show. While setting, hour and minute are the edited values and seconds
    /// read 0; the sub-second count keeps running so the face can blink.
    ///
    /// # Errors
    ///
    /// Returns the time source's error.
    pub fn reading(&self) -> Result<TimeOfDay> {
        let now = self.time_source.now()?;
        Ok(match self.mode {
            ClockMode::Normal => now,
            ClockMode::SetHour | ClockMode::SetMinute => TimeOfDay {
                hour: self.set_hour,
                minute: self.set_minute,
                second: 0,
                subsecond_ms: now.subsecond_ms,
            },
        })
    }
}

// Left edges of the four digits and the colon on a 24-column face.
const DIGIT_X: [i32; 4] = [0, 5, 12, 17];
const COLON_X: i32 = 8;

/// Draw `HH:MM` for `reading` into `frame`, replacing its contents.
///
/// The field being set is only drawn while `blink_on`. The colon blinks in normal mode and
/// stays on while setting.
pub fn render_clock_face<const ROWS: usize, const COL_BYTES: usize>(
    frame: &mut Frame<ROWS, COL_BYTES>,
    reading: &TimeOfDay,
    blink_on: bool,
    mode: ClockMode,
    glyphs: &impl GlyphProvider,
) {
    frame.clear();

    let digits = [
        reading.hour / 10 % 10,
        reading.hour % 10,
        reading.minute / 10 % 10,
        reading.minute % 10,
    ];
    let show_hours = blink_on || mode != ClockMode::SetHour;
    let show_minutes = blink_on || mode != ClockMode::SetMinute;
    for (index, (digit, x)) in digits.into_iter().zip(DIGIT_X).enumerate() {
        let visible = if index < 2 { show_hours } else { show_minutes };
        if visible {
            let ch = char::from(b'0' + digit);
            frame.blit(&glyphs.glyph(ch), x, 0, Some(false));
        }
    }

    if blink_on || mode != ClockMode::Normal {
        frame.blit(&glyphs.glyph(':'), COLON_X, 0, Some(false));
    }
}
