//! Host-level tests for clock state and clock face rendering.
#![cfg(feature = "host")]

use embassy_futures::block_on;
use hc595_matrix::{
    AdjustableClock, ClockMode, Font4x7, Frame, GlyphProvider, Result, TimeOfDay, TimeSource,
    col_bytes, render_clock_face,
};

#[derive(Default)]
struct FakeTime {
    now: TimeOfDay,
    set_calls: Vec<(u8, u8)>,
    calibrations: usize,
}

impl FakeTime {
    fn at(hour: u8, minute: u8, second: u8, subsecond_ms: u16) -> Self {
        Self {
            now: TimeOfDay {
                hour,
                minute,
                second,
                subsecond_ms,
            },
            ..Self::default()
        }
    }
}

impl TimeSource for FakeTime {
    fn now(&self) -> Result<TimeOfDay> {
        Ok(self.now)
    }

    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
        self.set_calls.push((hour, minute));
        self.now = TimeOfDay {
            hour,
            minute,
            second: 0,
            subsecond_ms: 0,
        };
        Ok(())
    }

    async fn calibrate_subsecond_origin(&mut self) -> Result<()> {
        self.calibrations += 1;
        Ok(())
    }
}

type Face = Frame<8, { col_bytes(24) }>;

fn render(reading: &TimeOfDay, blink_on: bool, mode: ClockMode) -> Face {
    let mut frame = Face::new(24).expect("24 columns fit 3 bytes");
    frame.fill(true);
    render_clock_face(&mut frame, reading, blink_on, mode, &Font4x7);
    frame
}

const TWELVE_THIRTY_FOUR: TimeOfDay = TimeOfDay {
    hour: 12,
    minute: 34,
    second: 56,
    subsecond_ms: 100,
};

// Top-row pixels of '1' (x = 0), '2' (x = 5), '3' (x = 12) and '4' (x = 17).
const HOUR_PIXELS: [(i32, i32); 3] = [(2, 0), (6, 0), (7, 0)];
const MINUTE_PIXELS: [(i32, i32); 3] = [(13, 0), (14, 0), (19, 0)];
const COLON_PIXELS: [(i32, i32); 2] = [(10, 2), (10, 4)];

fn all_on(frame: &Face, pixels: &[(i32, i32)]) -> bool {
    pixels.iter().all(|&(x, y)| frame.get_pixel(x, y))
}

fn all_off(frame: &Face, pixels: &[(i32, i32)]) -> bool {
    pixels.iter().all(|&(x, y)| !frame.get_pixel(x, y))
}

#[test]
fn mode_cycles_and_commits_edited_time() {
    let mut clock = AdjustableClock::new(FakeTime::at(9, 15, 42, 0));
    assert_eq!(clock.mode(), ClockMode::Normal);
    assert_eq!(clock.switch_mode().expect("fake clock"), ClockMode::SetHour);
    clock.increment();
    assert_eq!(clock.switch_mode().expect("fake clock"), ClockMode::SetMinute);
    clock.increment();
    clock.increment();
    assert!(clock.time_source().set_calls.is_empty());

    assert_eq!(clock.switch_mode().expect("fake clock"), ClockMode::Normal);
    assert_eq!(clock.time_source().set_calls, vec![(10, 17)]);
    let reading = clock.reading().expect("fake clock");
    assert_eq!((reading.hour, reading.minute, reading.second), (10, 17, 0));
}

#[test]
fn increment_wraps_hours_and_minutes() {
    let mut clock = AdjustableClock::new(FakeTime::at(23, 59, 0, 0));
    clock.switch_mode().expect("fake clock");
    clock.increment();
    assert_eq!(clock.reading().expect("fake clock").hour, 0);
    clock.switch_mode().expect("fake clock");
    clock.increment();
    assert_eq!(clock.reading().expect("fake clock").minute, 0);
}

#[test]
fn increment_is_ignored_in_normal_mode() {
    let mut clock = AdjustableClock::new(FakeTime::at(7, 30, 0, 0));
    clock.increment();
    let reading = clock.reading().expect("fake clock");
    assert_eq!((reading.hour, reading.minute), (7, 30));
}

#[test]
fn reading_freezes_edited_fields_while_setting() {
    let mut clock = AdjustableClock::new(FakeTime::at(8, 5, 33, 700));
    clock.switch_mode().expect("fake clock");
    clock.time_source_mut().now.minute = 6;
    let reading = clock.reading().expect("fake clock");
    assert_eq!(
        reading,
        TimeOfDay {
            hour: 8,
            minute: 5,
            second: 0,
            subsecond_ms: 700,
        }
    );
    assert!(!reading.blink_on());
}

#[test]
fn calibration_reaches_time_source() {
    let mut clock = AdjustableClock::new(FakeTime::default());
    block_on(clock.time_source_mut().calibrate_subsecond_origin()).expect("fake clock");
    assert_eq!(clock.time_source().calibrations, 1);
}

#[test]
fn normal_face_blinks_colon_only() {
    let on = render(&TWELVE_THIRTY_FOUR, true, ClockMode::Normal);
    assert!(all_on(&on, &HOUR_PIXELS));
    assert!(all_on(&on, &MINUTE_PIXELS));
    assert!(all_on(&on, &COLON_PIXELS));
    // The face replaces the previous contents.
    assert!(!on.get_pixel(23, 7));

    let off = render(&TWELVE_THIRTY_FOUR, false, ClockMode::Normal);
    assert!(all_on(&off, &HOUR_PIXELS));
    assert!(all_on(&off, &MINUTE_PIXELS));
    assert!(all_off(&off, &COLON_PIXELS));
}

#[test]
fn field_being_set_blinks_and_colon_stays_on() {
    let hour_off = render(&TWELVE_THIRTY_FOUR, false, ClockMode::SetHour);
    assert!(all_off(&hour_off, &HOUR_PIXELS));
    assert!(all_on(&hour_off, &MINUTE_PIXELS));
    assert!(all_on(&hour_off, &COLON_PIXELS));

    let minute_off = render(&TWELVE_THIRTY_FOUR, false, ClockMode::SetMinute);
    assert!(all_on(&minute_off, &HOUR_PIXELS));
    assert!(all_off(&minute_off, &MINUTE_PIXELS));
    assert!(all_on(&minute_off, &COLON_PIXELS));

    let minute_on = render(&TWELVE_THIRTY_FOUR, true, ClockMode::SetMinute);
    assert!(all_on(&minute_on, &MINUTE_PIXELS));
}

#[test]
fn font_covers_clock_characters() {
    let font = Font4x7;
    assert_eq!(font.glyph('-').row_bytes(3), &[0xF0]);
    assert_eq!(font.glyph(':').row_bytes(2), &[0x20]);
    assert_eq!(font.glyph('8').row_bytes(3), &[0x60]);
    for ch in [' ', 'A', '?'] {
        let glyph = font.glyph(ch);
        assert!((0..8).all(|row| glyph.row_bytes(row) == [0x00]));
    }
    for digit in '0'..='9' {
        assert_eq!(font.glyph(digit).row_bytes(7), &[0x00]);
    }
}
