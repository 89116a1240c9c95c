//! RP2040 real-time clock as a [`TimeSource`].
//!
//! The RTC only counts whole seconds, so milliseconds come from an [`Instant`] origin that is
//! moved to a second boundary by [`TimeSource::calibrate_subsecond_origin`] and by
//! [`TimeSource::set_time`].

use defmt::info;
use embassy_rp::Peri;
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_time::{Instant, Timer};

use crate::{Error, Result, TimeOfDay, TimeSource};

/// Date the RTC starts from after power-up; only the time of day is ever shown.
const START_DATE: DateTime = DateTime {
    year: 2024,
    month: 1,
    day: 1,
    day_of_week: DayOfWeek::Monday,
    hour: 0,
    minute: 0,
    second: 0,
};

pub struct RtcTime<'d> {
    rtc: Rtc<'d, RTC>,
    origin: Instant,
}

impl<'d> RtcTime<'d> {
    /// Start the RTC at midnight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rtc`] if the RTC rejects the start time.
    pub fn new(rtc: Peri<'d, RTC>) -> Result<Self> {
        let mut rtc = Rtc::new(rtc);
        rtc.set_datetime(START_DATE).map_err(Error::Rtc)?;
        Ok(Self {
            rtc,
            origin: Instant::now(),
        })
    }

    fn second(&self) -> Result<u8> {
        Ok(self.rtc.now().map_err(Error::Rtc)?.second)
    }
}

impl TimeSource for RtcTime<'_> {
    fn now(&self) -> Result<TimeOfDay> {
        let now = self.rtc.now().map_err(Error::Rtc)?;
        // Always below 1000.
        let subsecond_ms = u16::try_from(self.origin.elapsed().as_millis() % 1000).unwrap_or(0);
        Ok(TimeOfDay {
            hour: now.hour,
            minute: now.minute,
            second: now.second,
            subsecond_ms,
        })
    }

    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
        let now = self.rtc.now().map_err(Error::Rtc)?;
        self.rtc
            .set_datetime(DateTime {
                year: now.year,
                month: now.month,
                day: now.day,
                day_of_week: now.day_of_week,
                hour,
                minute,
                second: 0,
            })
            .map_err(Error::Rtc)?;
        self.origin = Instant::now();
        info!("Clock set to {:02}:{:02}", hour, minute);
        Ok(())
    }

    async fn calibrate_subsecond_origin(&mut self) -> Result<()> {
        let second = self.second()?;
        while self.second()? == second {
            Timer::after_millis(1).await;
        }
        self.origin = Instant::now();
        Ok(())
    }
}
