//! This module implements the ISO date and time records.
//!
//! The three main types of records are:
//!   - `IsoDateTime`
//!   - `IsoDate`
//!   - `IsoTime`
//!
//! The records are proleptic ISO-8601 values with no zone attached. Their
//! `Writeable` output is the extended ISO-8601 form, with the time printing
//! only as many components as are needed.

use core::fmt::Write;

use num_traits::ToPrimitive;
use writeable::{impl_display_with_writeable, LengthHint, Writeable};
use zoneinfo_compiler::utils::{self, MAX_YEAR, MIN_YEAR, SECONDS_PER_DAY};

use crate::{
    fields::{ChronoField, Field},
    TemporalError, TemporalResult,
};

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_DAY: i64 = SECONDS_PER_DAY * NANOS_PER_SECOND;

/// `IsoDateTime` is the record of an `IsoDate` and an `IsoTime`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    pub const fn new(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates the local date-time at an instant for an offset in seconds.
    pub fn from_epoch_seconds(
        epoch_seconds: i64,
        nanosecond: u32,
        offset_seconds: i32,
    ) -> TemporalResult<Self> {
        let local = epoch_seconds
            .checked_add(i64::from(offset_seconds))
            .ok_or_else(|| TemporalError::range().with_message("Instant exceeds the date range."))?;
        let date = IsoDate::try_from_epoch_days(local.div_euclid(SECONDS_PER_DAY))?;
        let second_of_day = local.rem_euclid(SECONDS_PER_DAY);
        let time = IsoTime::from_nano_of_day(
            second_of_day * NANOS_PER_SECOND + i64::from(nanosecond % 1_000_000_000),
        );
        Ok(Self { date, time })
    }

    /// Returns the epoch seconds of this date-time at an offset.
    pub fn to_epoch_seconds(&self, offset_seconds: i32) -> i64 {
        self.date.to_epoch_days() * SECONDS_PER_DAY + i64::from(self.time.to_second_of_day())
            - i64::from(offset_seconds)
    }
}

impl Writeable for IsoDateTime {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        self.date.write_to(sink)?;
        sink.write_char('T')?;
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.date.writeable_length_hint() + 1 + self.time.writeable_length_hint()
    }
}

impl_display_with_writeable!(IsoDateTime);

// ==== `IsoDate` section ====

/// `IsoDate` serves as a record for a proleptic ISO year, month, and day.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Default for IsoDate {
    fn default() -> Self {
        Self::new_unchecked(1970, 1, 1)
    }
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new validated `IsoDate`.
    pub fn new(year: i32, month: u8, day: u8) -> TemporalResult<Self> {
        ChronoField::Year.check_valid_value(i64::from(year))?;
        ChronoField::MonthOfYear.check_valid_value(i64::from(month))?;
        ChronoField::DayOfMonth.check_valid_value(i64::from(day))?;
        if day > utils::days_in_month(month, utils::in_leap_year(i64::from(year))) {
            let msg = if day == 29 {
                alloc::format!("Invalid date 'February 29' as '{year}' is not a leap year")
            } else {
                alloc::format!("Invalid date '{month}-{day}'")
            };
            return Err(TemporalError::range().with_message(msg));
        }
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Creates a date from a year and a day of that year.
    pub fn from_year_day(year: i32, day_of_year: u16) -> TemporalResult<Self> {
        ChronoField::Year.check_valid_value(i64::from(year))?;
        ChronoField::DayOfYear.check_valid_value(i64::from(day_of_year))?;
        let leap = utils::in_leap_year(i64::from(year));
        if day_of_year == 366 && !leap {
            return Err(TemporalError::range().with_message(alloc::format!(
                "Invalid date 'DayOfYear 366' as '{year}' is not a leap year"
            )));
        }
        let start = utils::epoch_days_for_year(i64::from(year));
        Ok(Self::from_epoch_days(start + i64::from(day_of_year) - 1))
    }

    /// Creates a date from epoch days without a range check.
    pub(crate) const fn from_epoch_days(epoch_days: i64) -> Self {
        let (year, month, day) = utils::date_from_epoch_days(epoch_days);
        Self::new_unchecked(year as i32, month, day)
    }

    /// Creates a date from epoch days, which must be within the year range.
    pub fn try_from_epoch_days(epoch_days: i64) -> TemporalResult<Self> {
        ChronoField::EpochDay.check_valid_value(epoch_days)?;
        Ok(Self::from_epoch_days(epoch_days))
    }

    /// Days since 1970-01-01.
    #[inline]
    pub const fn to_epoch_days(&self) -> i64 {
        utils::epoch_days_from_date(self.year as i64, self.month, self.day as i64)
    }

    /// The ISO day of week, 1 is Monday and 7 is Sunday.
    #[inline]
    pub const fn day_of_week(&self) -> u8 {
        utils::epoch_days_to_week_day(self.to_epoch_days())
    }

    #[inline]
    pub const fn day_of_year(&self) -> u16 {
        utils::month_to_day(self.month, self.is_leap_year()) + self.day as u16
    }

    #[inline]
    pub const fn is_leap_year(&self) -> bool {
        utils::in_leap_year(self.year as i64)
    }

    pub const fn length_of_month(&self) -> u8 {
        utils::days_in_month(self.month, self.is_leap_year())
    }

    pub const fn length_of_year(&self) -> u16 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    pub fn plus_days(&self, days: i64) -> TemporalResult<Self> {
        let epoch_days = self
            .to_epoch_days()
            .checked_add(days)
            .ok_or_else(|| TemporalError::range().with_message("Date exceeds the year range."))?;
        Self::try_from_epoch_days(epoch_days)
    }

    /// Adds months, clamping the day to the length of the resulting month.
    pub fn plus_months(&self, months: i64) -> TemporalResult<Self> {
        let total = i64::from(self.year) * 12 + i64::from(self.month - 1);
        let total = total
            .checked_add(months)
            .ok_or_else(|| TemporalError::range().with_message("Date exceeds the year range."))?;
        let year = ChronoField::Year.check_valid_int_value(total.div_euclid(12))?;
        let month = total.rem_euclid(12) as u8 + 1;
        let day = self
            .day
            .min(utils::days_in_month(month, utils::in_leap_year(i64::from(year))));
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Returns the value of a date-based field.
    pub fn get_long(&self, field: Field) -> TemporalResult<i64> {
        let chrono = match field {
            Field::Chrono(chrono) if chrono.is_date_based() => chrono,
            Field::Iso(iso) => return Ok(iso.get_from(self)),
            Field::Week(week) => return Ok(week.get_from(self)),
            _ => {
                return Err(TemporalError::unsupported()
                    .with_message(alloc::format!("Unsupported field: {field}")))
            }
        };
        let day = i64::from(self.day);
        let day_of_year = i64::from(self.day_of_year());
        let year = i64::from(self.year);
        let value = match chrono {
            ChronoField::DayOfWeek => i64::from(self.day_of_week()),
            ChronoField::AlignedDayOfWeekInMonth => (day - 1) % 7 + 1,
            ChronoField::AlignedDayOfWeekInYear => (day_of_year - 1) % 7 + 1,
            ChronoField::DayOfMonth => day,
            ChronoField::DayOfYear => day_of_year,
            ChronoField::EpochDay => self.to_epoch_days(),
            ChronoField::AlignedWeekOfMonth => (day - 1) / 7 + 1,
            ChronoField::AlignedWeekOfYear => (day_of_year - 1) / 7 + 1,
            ChronoField::MonthOfYear => i64::from(self.month),
            ChronoField::ProlepticMonth => year * 12 + i64::from(self.month) - 1,
            ChronoField::YearOfEra if year >= 1 => year,
            ChronoField::YearOfEra => 1 - year,
            ChronoField::Year => year,
            ChronoField::Era => i64::from(year >= 1),
            _ => return Err(TemporalError::assert()),
        };
        Ok(value)
    }
}

impl Writeable for IsoDate {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        let year = self.year;
        if year.unsigned_abs() < 1000 {
            if year < 0 {
                sink.write_char('-')?;
            }
            write_padded(sink, year.unsigned_abs(), 4)?;
        } else {
            if year > 9999 {
                sink.write_char('+')?;
            }
            year.write_to(sink)?;
        }
        sink.write_char('-')?;
        write_padded(sink, u32::from(self.month), 2)?;
        sink.write_char('-')?;
        write_padded(sink, u32::from(self.day), 2)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(10, 17)
    }
}

impl_display_with_writeable!(IsoDate);

// ==== `IsoTime` section ====

/// An `IsoTime` record of a wall clock time with nanosecond precision.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,        // 0..=23
    pub minute: u8,      // 0..=59
    pub second: u8,      // 0..=59
    pub nanosecond: u32, // 0..=999_999_999
}

impl IsoTime {
    pub const MIDNIGHT: Self = Self::new_unchecked(0, 0, 0, 0);

    /// Creates a new `IsoTime` without any validation.
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond,
        }
    }

    /// Creates a new validated `IsoTime`.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> TemporalResult<Self> {
        ChronoField::HourOfDay.check_valid_value(i64::from(hour))?;
        ChronoField::MinuteOfHour.check_valid_value(i64::from(minute))?;
        ChronoField::SecondOfMinute.check_valid_value(i64::from(second))?;
        ChronoField::NanoOfSecond.check_valid_value(i64::from(nanosecond))?;
        Ok(Self::new_unchecked(hour, minute, second, nanosecond))
    }

    /// Creates a time from nanoseconds since midnight, wrapping into a single day.
    pub fn from_nano_of_day(nano_of_day: i64) -> Self {
        let nano_of_day = nano_of_day.rem_euclid(NANOS_PER_DAY);
        let second_of_day = nano_of_day / NANOS_PER_SECOND;
        // All components are bounded by the wrapped day.
        Self::new_unchecked(
            (second_of_day / 3600) as u8,
            (second_of_day / 60 % 60) as u8,
            (second_of_day % 60) as u8,
            (nano_of_day % NANOS_PER_SECOND) as u32,
        )
    }

    pub const fn to_second_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    pub const fn to_nano_of_day(&self) -> i64 {
        self.to_second_of_day() as i64 * NANOS_PER_SECOND + self.nanosecond as i64
    }

    /// Returns the value of a time-based field.
    pub fn get_long(&self, field: Field) -> TemporalResult<i64> {
        let Some(chrono) = field.as_chrono().filter(|f| f.is_time_based()) else {
            return Err(TemporalError::unsupported()
                .with_message(alloc::format!("Unsupported field: {field}")));
        };
        let nano = i64::from(self.nanosecond);
        let hour = i64::from(self.hour);
        let value = match chrono {
            ChronoField::NanoOfSecond => nano,
            ChronoField::NanoOfDay => self.to_nano_of_day(),
            ChronoField::MicroOfSecond => nano / 1_000,
            ChronoField::MicroOfDay => self.to_nano_of_day() / 1_000,
            ChronoField::MilliOfSecond => nano / 1_000_000,
            ChronoField::MilliOfDay => self.to_nano_of_day() / 1_000_000,
            ChronoField::SecondOfMinute => i64::from(self.second),
            ChronoField::SecondOfDay => i64::from(self.to_second_of_day()),
            ChronoField::MinuteOfHour => i64::from(self.minute),
            ChronoField::MinuteOfDay => hour * 60 + i64::from(self.minute),
            ChronoField::HourOfAmPm => hour % 12,
            ChronoField::ClockHourOfAmPm if hour % 12 == 0 => 12,
            ChronoField::ClockHourOfAmPm => hour % 12,
            ChronoField::HourOfDay => hour,
            ChronoField::ClockHourOfDay if hour == 0 => 24,
            ChronoField::ClockHourOfDay => hour,
            ChronoField::AmPmOfDay => hour / 12,
            _ => return Err(TemporalError::assert()),
        };
        Ok(value)
    }
}

impl Writeable for IsoTime {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded(sink, u32::from(self.hour), 2)?;
        sink.write_char(':')?;
        write_padded(sink, u32::from(self.minute), 2)?;
        if self.second == 0 && self.nanosecond == 0 {
            return Ok(());
        }
        sink.write_char(':')?;
        write_padded(sink, u32::from(self.second), 2)?;
        if self.nanosecond == 0 {
            return Ok(());
        }
        sink.write_char('.')?;
        let nanos = self.nanosecond;
        if nanos % 1_000_000 == 0 {
            write_padded(sink, nanos / 1_000_000, 3)
        } else if nanos % 1_000 == 0 {
            write_padded(sink, nanos / 1_000, 6)
        } else {
            write_padded(sink, nanos, 9)
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(5, 18)
    }
}

impl_display_with_writeable!(IsoTime);

// ==== Utility functions ====

/// Writes `value` left padded with zeros to at least `width` digits.
pub(crate) fn write_padded<W: Write + ?Sized>(
    sink: &mut W,
    value: u32,
    width: usize,
) -> core::fmt::Result {
    let digits = value.checked_ilog10().map_or(1, |d| d as usize + 1);
    for _ in digits..width {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

/// Converts a field value that has been range checked into a `u8`.
pub(crate) fn checked_u8(field: ChronoField, value: i64) -> TemporalResult<u8> {
    field
        .check_valid_value(value)?
        .to_u8()
        .ok_or_else(|| TemporalError::range().with_message(alloc::format!("{field} exceeds u8")))
}

/// Whether a year is within the supported year range.
pub(crate) const fn is_valid_year(year: i64) -> bool {
    year >= MIN_YEAR as i64 && year <= MAX_YEAR as i64
}
