//! Date and date-time types.
//!
//! `Date` is the calendar date used in `SEARCH` keys and envelope fields; `InternalDate` is the
//! server-assigned arrival timestamp returned by `FETCH INTERNALDATE` and set via `APPEND`.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_YEAR: u16 = 1900;
const MAX_YEAR: u16 = 2500;

/// `date = date-text`, a plain calendar day with no time-of-day component.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

impl Date {
    pub fn validate(year: u16, month: u8, day: u8) -> Result<(), DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::YearOutOfRange { got: year });
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::MonthOutOfRange { got: month });
        }
        if !(1..=31).contains(&day) {
            return Err(DateError::DayOutOfRange { got: day });
        }
        Ok(())
    }

    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        Self::validate(year, month, day)?;
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl TryFrom<(u16, u8, u8)> for Date {
    type Error = DateError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{:04}",
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum DateError {
    #[error("year {got} out of range ({MIN_YEAR}..={MAX_YEAR})")]
    YearOutOfRange { got: u16 },
    #[error("month {got} out of range (1..=12)")]
    MonthOutOfRange { got: u8 },
    #[error("day {got} out of range (1..=31)")]
    DayOutOfRange { got: u8 },
}

/// The server-assigned internal date/time of a message.
///
/// Renders as `"D-mon-YYYY HH:MM:SS ±ZZZZ"`. All fields are packed into a single `u64` so that
/// `InternalDate` stays `Copy` and as small as the calendar date it wraps, rather than pulling in
/// a full `chrono::DateTime` per message in a large FETCH response.
///
/// Bit layout (from the least significant bit): day(5) month(4) year(12) hour(5) minute(6)
/// second(6) zone_sign(1) zone_offset_minutes(11).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternalDate(u64);

impl InternalDate {
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        zone_offset_minutes: i16,
    ) -> Result<(), InternalDateError> {
        Date::validate(year, month, day)?;

        if hour > 23 {
            return Err(InternalDateError::HourOutOfRange { got: hour });
        }
        if minute > 59 {
            return Err(InternalDateError::MinuteOutOfRange { got: minute });
        }
        if second > 59 {
            return Err(InternalDateError::SecondOutOfRange { got: second });
        }
        if zone_offset_minutes.unsigned_abs() > 23 * 60 + 59 {
            return Err(InternalDateError::ZoneOutOfRange {
                got: zone_offset_minutes,
            });
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        zone_offset_minutes: i16,
    ) -> Result<Self, InternalDateError> {
        Self::validate(year, month, day, hour, minute, second, zone_offset_minutes)?;

        let zone_sign = u64::from(zone_offset_minutes < 0);
        let zone_abs = zone_offset_minutes.unsigned_abs() as u64;

        let packed = (day as u64)
            | ((month as u64) << 5)
            | ((year as u64) << 9)
            | ((hour as u64) << 21)
            | ((minute as u64) << 26)
            | ((second as u64) << 32)
            | (zone_sign << 38)
            | (zone_abs << 39);

        Ok(Self(packed))
    }

    pub fn date(&self) -> Date {
        Date {
            day: (self.0 & 0x1f) as u8,
            month: ((self.0 >> 5) & 0xf) as u8,
            year: ((self.0 >> 9) & 0xfff) as u16,
        }
    }

    pub fn hour(&self) -> u8 {
        ((self.0 >> 21) & 0x1f) as u8
    }

    pub fn minute(&self) -> u8 {
        ((self.0 >> 26) & 0x3f) as u8
    }

    pub fn second(&self) -> u8 {
        ((self.0 >> 32) & 0x3f) as u8
    }

    /// Offset from UTC in minutes, negative for zones west of UTC.
    pub fn zone_offset_minutes(&self) -> i16 {
        let sign = (self.0 >> 38) & 0x1;
        let magnitude = ((self.0 >> 39) & 0x7ff) as i16;
        if sign == 1 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl Display for InternalDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let offset = self.zone_offset_minutes();
        let (sign, offset) = if offset < 0 { ('-', -offset) } else { ('+', offset) };

        write!(
            f,
            "{} {:02}:{:02}:{:02} {}{:02}{:02}",
            self.date(),
            self.hour(),
            self.minute(),
            self.second(),
            sign,
            offset / 60,
            offset % 60,
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum InternalDateError {
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("hour {got} out of range (0..=23)")]
    HourOutOfRange { got: u8 },
    #[error("minute {got} out of range (0..=59)")]
    MinuteOutOfRange { got: u8 },
    #[error("second {got} out of range (0..=59)")]
    SecondOutOfRange { got: u8 },
    #[error("zone offset {got} minutes out of range (-1439..=1439)")]
    ZoneOutOfRange { got: i16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds() {
        assert!(Date::new(2024, 2, 29).is_ok());
        assert!(Date::new(1899, 1, 1).is_err());
        assert!(Date::new(2501, 1, 1).is_err());
        assert!(Date::new(2024, 0, 1).is_err());
        assert!(Date::new(2024, 13, 1).is_err());
        assert!(Date::new(2024, 1, 0).is_err());
        assert!(Date::new(2024, 1, 32).is_err());
    }

    #[test]
    fn test_date_display() {
        let date = Date::new(2024, 1, 5).unwrap();
        assert_eq!(date.to_string(), "5-Jan-2024");
    }

    #[test]
    fn test_internal_date_round_trip() {
        let dt = InternalDate::new(2024, 12, 31, 23, 59, 58, -8 * 60).unwrap();
        assert_eq!(dt.date().year(), 2024);
        assert_eq!(dt.date().month(), 12);
        assert_eq!(dt.date().day(), 31);
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.minute(), 59);
        assert_eq!(dt.second(), 58);
        assert_eq!(dt.zone_offset_minutes(), -480);
    }

    #[test]
    fn test_internal_date_display() {
        let dt = InternalDate::new(1996, 7, 17, 2, 44, 25, -8 * 60).unwrap();
        assert_eq!(dt.to_string(), "17-Jul-1996 02:44:25 -0800");

        let dt = InternalDate::new(1996, 7, 17, 9, 44, 25, 0).unwrap();
        assert_eq!(dt.to_string(), "17-Jul-1996 09:44:25 +0000");
    }

    #[test]
    fn test_internal_date_rejects_bad_fields() {
        assert!(InternalDate::new(2024, 1, 1, 24, 0, 0, 0).is_err());
        assert!(InternalDate::new(2024, 1, 1, 0, 60, 0, 0).is_err());
        assert!(InternalDate::new(2024, 1, 1, 0, 0, 60, 0).is_err());
        assert!(InternalDate::new(2024, 1, 1, 0, 0, 0, 1440).is_err());
    }
}
