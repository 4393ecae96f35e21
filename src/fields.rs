//! Field identities used to read values from temporals and to key
//! parsed field values.
//!
//! A [`Field`] is either one of the ISO [`ChronoField`]s, one of the
//! quarter and week-based [`IsoField`]s, or a [`WeekField`] bound to a
//! locale's [`WeekDefinition`].

use alloc::string::ToString;
use core::fmt;

use zoneinfo_compiler::utils::{self, MAX_YEAR, MIN_YEAR};

use crate::{iso::IsoDate, range::ValueRange, TemporalError, TemporalResult};

const EPOCH_DAY_MIN: i64 = utils::epoch_days_from_date(MIN_YEAR as i64, 1, 1);
const EPOCH_DAY_MAX: i64 = utils::epoch_days_from_date(MAX_YEAR as i64, 12, 31);
const YEAR_RANGE: ValueRange = ValueRange::of(MIN_YEAR as i64, MAX_YEAR as i64);

/// The standard set of ISO date and time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChronoField {
    NanoOfSecond,
    NanoOfDay,
    MicroOfSecond,
    MicroOfDay,
    MilliOfSecond,
    MilliOfDay,
    SecondOfMinute,
    SecondOfDay,
    MinuteOfHour,
    MinuteOfDay,
    HourOfAmPm,
    ClockHourOfAmPm,
    HourOfDay,
    ClockHourOfDay,
    AmPmOfDay,
    DayOfWeek,
    AlignedDayOfWeekInMonth,
    AlignedDayOfWeekInYear,
    DayOfMonth,
    DayOfYear,
    EpochDay,
    AlignedWeekOfMonth,
    AlignedWeekOfYear,
    MonthOfYear,
    ProlepticMonth,
    YearOfEra,
    Year,
    Era,
    InstantSeconds,
    OffsetSeconds,
}

impl ChronoField {
    /// Returns the outer range of valid values.
    pub const fn range(self) -> ValueRange {
        match self {
            Self::NanoOfSecond => ValueRange::of(0, 999_999_999),
            Self::NanoOfDay => ValueRange::of(0, 86_400 * 1_000_000_000 - 1),
            Self::MicroOfSecond => ValueRange::of(0, 999_999),
            Self::MicroOfDay => ValueRange::of(0, 86_400 * 1_000_000 - 1),
            Self::MilliOfSecond => ValueRange::of(0, 999),
            Self::MilliOfDay => ValueRange::of(0, 86_400 * 1_000 - 1),
            Self::SecondOfMinute | Self::MinuteOfHour => ValueRange::of(0, 59),
            Self::SecondOfDay => ValueRange::of(0, 86_400 - 1),
            Self::MinuteOfDay => ValueRange::of(0, 24 * 60 - 1),
            Self::HourOfAmPm => ValueRange::of(0, 11),
            Self::ClockHourOfAmPm => ValueRange::of(1, 12),
            Self::HourOfDay => ValueRange::of(0, 23),
            Self::ClockHourOfDay => ValueRange::of(1, 24),
            Self::AmPmOfDay | Self::Era => ValueRange::of(0, 1),
            Self::DayOfWeek | Self::AlignedDayOfWeekInMonth | Self::AlignedDayOfWeekInYear => {
                ValueRange::of(1, 7)
            }
            Self::DayOfMonth => ValueRange::of_variable_max(1, 28, 31),
            Self::DayOfYear => ValueRange::of_variable_max(1, 365, 366),
            Self::EpochDay => ValueRange::of(EPOCH_DAY_MIN, EPOCH_DAY_MAX),
            Self::AlignedWeekOfMonth => ValueRange::of_variable_max(1, 4, 5),
            Self::AlignedWeekOfYear => ValueRange::of(1, 53),
            Self::MonthOfYear => ValueRange::of(1, 12),
            Self::ProlepticMonth => {
                ValueRange::of(MIN_YEAR as i64 * 12, MAX_YEAR as i64 * 12 + 11)
            }
            Self::YearOfEra => ValueRange::of_variable_max(1, MAX_YEAR as i64, MAX_YEAR as i64 + 1),
            Self::Year => YEAR_RANGE,
            Self::InstantSeconds => ValueRange::of(i64::MIN, i64::MAX),
            Self::OffsetSeconds => ValueRange::of(-18 * 3600, 18 * 3600),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NanoOfSecond => "NanoOfSecond",
            Self::NanoOfDay => "NanoOfDay",
            Self::MicroOfSecond => "MicroOfSecond",
            Self::MicroOfDay => "MicroOfDay",
            Self::MilliOfSecond => "MilliOfSecond",
            Self::MilliOfDay => "MilliOfDay",
            Self::SecondOfMinute => "SecondOfMinute",
            Self::SecondOfDay => "SecondOfDay",
            Self::MinuteOfHour => "MinuteOfHour",
            Self::MinuteOfDay => "MinuteOfDay",
            Self::HourOfAmPm => "HourOfAmPm",
            Self::ClockHourOfAmPm => "ClockHourOfAmPm",
            Self::HourOfDay => "HourOfDay",
            Self::ClockHourOfDay => "ClockHourOfDay",
            Self::AmPmOfDay => "AmPmOfDay",
            Self::DayOfWeek => "DayOfWeek",
            Self::AlignedDayOfWeekInMonth => "AlignedDayOfWeekInMonth",
            Self::AlignedDayOfWeekInYear => "AlignedDayOfWeekInYear",
            Self::DayOfMonth => "DayOfMonth",
            Self::DayOfYear => "DayOfYear",
            Self::EpochDay => "EpochDay",
            Self::AlignedWeekOfMonth => "AlignedWeekOfMonth",
            Self::AlignedWeekOfYear => "AlignedWeekOfYear",
            Self::MonthOfYear => "MonthOfYear",
            Self::ProlepticMonth => "ProlepticMonth",
            Self::YearOfEra => "YearOfEra",
            Self::Year => "Year",
            Self::Era => "Era",
            Self::InstantSeconds => "InstantSeconds",
            Self::OffsetSeconds => "OffsetSeconds",
        }
    }

    /// Fields that are part of a local date.
    pub const fn is_date_based(self) -> bool {
        matches!(
            self,
            Self::DayOfWeek
                | Self::AlignedDayOfWeekInMonth
                | Self::AlignedDayOfWeekInYear
                | Self::DayOfMonth
                | Self::DayOfYear
                | Self::EpochDay
                | Self::AlignedWeekOfMonth
                | Self::AlignedWeekOfYear
                | Self::MonthOfYear
                | Self::ProlepticMonth
                | Self::YearOfEra
                | Self::Year
                | Self::Era
        )
    }

    /// Fields that are part of a local time.
    pub const fn is_time_based(self) -> bool {
        (self as u8) <= (Self::AmPmOfDay as u8)
    }

    pub fn check_valid_value(self, value: i64) -> TemporalResult<i64> {
        self.range().check_valid_value(value, self.name())
    }

    pub fn check_valid_int_value(self, value: i64) -> TemporalResult<i32> {
        self.range().check_valid_int_value(value, self.name())
    }
}

impl fmt::Display for ChronoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ISO quarter and week-based-year fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IsoField {
    DayOfQuarter,
    QuarterOfYear,
    WeekOfWeekBasedYear,
    WeekBasedYear,
}

impl IsoField {
    pub const fn range(self) -> ValueRange {
        match self {
            Self::DayOfQuarter => ValueRange::of_variable_max(1, 90, 92),
            Self::QuarterOfYear => ValueRange::of(1, 4),
            Self::WeekOfWeekBasedYear => ValueRange::of_variable_max(1, 52, 53),
            Self::WeekBasedYear => YEAR_RANGE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DayOfQuarter => "DayOfQuarter",
            Self::QuarterOfYear => "QuarterOfYear",
            Self::WeekOfWeekBasedYear => "WeekOfWeekBasedYear",
            Self::WeekBasedYear => "WeekBasedYear",
        }
    }

    /// Reads the field from an ISO date.
    pub fn get_from(self, date: &IsoDate) -> i64 {
        match self {
            Self::QuarterOfYear => i64::from((date.month - 1) / 3 + 1),
            Self::DayOfQuarter => {
                let quarter_start = ((date.month - 1) / 3) * 3 + 1;
                let start = IsoDate::new_unchecked(date.year, quarter_start, 1);
                date.to_epoch_days() - start.to_epoch_days() + 1
            }
            Self::WeekOfWeekBasedYear => WeekDefinition::ISO.week_of_week_based_year_for(date),
            Self::WeekBasedYear => WeekDefinition::ISO.week_based_year_for(date),
        }
    }
}

impl fmt::Display for IsoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==== Week definitions ====

const DAY_NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// The first day of a week and the minimal number of days in the
/// first week of a month or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDefinition {
    first_day_of_week: u8,
    minimal_days: u8,
}

impl WeekDefinition {
    /// Weeks start on Monday and the first week has at least four days.
    pub const ISO: Self = Self {
        first_day_of_week: 1,
        minimal_days: 4,
    };

    /// Weeks start on Sunday and the first week may have a single day.
    pub const SUNDAY_START: Self = Self {
        first_day_of_week: 7,
        minimal_days: 1,
    };

    /// Creates a definition from an ISO day of week (1 is Monday) and
    /// the minimal number of days in the first week.
    pub fn new(first_day_of_week: u8, minimal_days: u8) -> TemporalResult<Self> {
        if !(1..=7).contains(&first_day_of_week) {
            return Err(TemporalError::range().with_message("Invalid first day of week."));
        }
        if !(1..=7).contains(&minimal_days) {
            return Err(TemporalError::range().with_message("Minimal number of days is invalid"));
        }
        Ok(Self {
            first_day_of_week,
            minimal_days,
        })
    }

    pub const fn first_day_of_week(&self) -> u8 {
        self.first_day_of_week
    }

    pub const fn minimal_days(&self) -> u8 {
        self.minimal_days
    }

    pub const fn day_of_week(self) -> Field {
        Field::Week(WeekField::new(WeekFieldKind::DayOfWeek, self))
    }

    pub const fn week_of_month(self) -> Field {
        Field::Week(WeekField::new(WeekFieldKind::WeekOfMonth, self))
    }

    pub const fn week_of_year(self) -> Field {
        Field::Week(WeekField::new(WeekFieldKind::WeekOfYear, self))
    }

    pub const fn week_of_week_based_year(self) -> Field {
        Field::Week(WeekField::new(WeekFieldKind::WeekOfWeekBasedYear, self))
    }

    pub const fn week_based_year(self) -> Field {
        Field::Week(WeekField::new(WeekFieldKind::WeekBasedYear, self))
    }

    /// The day of week counted from the first day of week, 1 to 7.
    pub(crate) fn localized_day_of_week(&self, date: &IsoDate) -> i64 {
        let iso = i64::from(date.day_of_week());
        (iso - i64::from(self.first_day_of_week)).rem_euclid(7) + 1
    }

    /// The offset of the start of the first week from the first day of
    /// the period, given a day of the period and its localized day of week.
    fn start_of_week_offset(&self, day: i64, dow: i64) -> i64 {
        let week_start = (day - dow).rem_euclid(7);
        if week_start + 1 > i64::from(self.minimal_days) {
            7 - week_start
        } else {
            -week_start
        }
    }

    const fn compute_week(offset: i64, day: i64) -> i64 {
        (7 + offset + (day - 1)) / 7
    }

    pub(crate) fn week_of_month_for(&self, date: &IsoDate) -> i64 {
        let dow = self.localized_day_of_week(date);
        let dom = i64::from(date.day);
        Self::compute_week(self.start_of_week_offset(dom, dow), dom)
    }

    pub(crate) fn week_of_year_for(&self, date: &IsoDate) -> i64 {
        let dow = self.localized_day_of_week(date);
        let doy = i64::from(date.day_of_year());
        Self::compute_week(self.start_of_week_offset(doy, dow), doy)
    }

    pub(crate) fn week_based_year_for(&self, date: &IsoDate) -> i64 {
        let dow = self.localized_day_of_week(date);
        let year = i64::from(date.year);
        let doy = i64::from(date.day_of_year());
        let offset = self.start_of_week_offset(doy, dow);
        let week = Self::compute_week(offset, doy);
        if week == 0 {
            return year - 1;
        }
        let year_length = i64::from(date.length_of_year());
        let new_year_week = Self::compute_week(offset, year_length + i64::from(self.minimal_days));
        if week >= new_year_week {
            return year + 1;
        }
        year
    }

    pub(crate) fn week_of_week_based_year_for(&self, date: &IsoDate) -> i64 {
        let dow = self.localized_day_of_week(date);
        let doy = i64::from(date.day_of_year());
        let offset = self.start_of_week_offset(doy, dow);
        let week = Self::compute_week(offset, doy);
        if week == 0 {
            // The last week of the previous year.
            let last_of_previous = IsoDate::from_epoch_days(date.to_epoch_days() - doy);
            return self.week_of_week_based_year_for(&last_of_previous);
        }
        if week > 50 {
            let year_length = i64::from(date.length_of_year());
            let new_year_week =
                Self::compute_week(offset, year_length + i64::from(self.minimal_days));
            if week >= new_year_week {
                return week - new_year_week + 1;
            }
        }
        week
    }

    /// The date of a localized day of week in a week of a week-based year.
    ///
    /// Weeks past the end of the year are clamped to the last week.
    pub(crate) fn date_of_week_based_year(
        &self,
        week_based_year: i32,
        week: i64,
        localized_day_of_week: i64,
    ) -> TemporalResult<IsoDate> {
        let start = IsoDate::new(week_based_year, 1, 1)?;
        let ldow = self.localized_day_of_week(&start);
        let offset = self.start_of_week_offset(1, ldow);
        let year_length = i64::from(start.length_of_year());
        let new_year_week = Self::compute_week(offset, year_length + i64::from(self.minimal_days));
        let week = week.min(new_year_week - 1);
        let days = -offset + (localized_day_of_week - 1) + (week - 1) * 7;
        start.plus_days(days)
    }
}

impl Default for WeekDefinition {
    fn default() -> Self {
        Self::ISO
    }
}

impl fmt::Display for WeekDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = DAY_NAMES[usize::from(self.first_day_of_week - 1)];
        write!(f, "WeekFields[{day},{}]", self.minimal_days)
    }
}

/// The kind of a localized week field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekFieldKind {
    DayOfWeek,
    WeekOfMonth,
    WeekOfYear,
    WeekOfWeekBasedYear,
    WeekBasedYear,
}

/// A week field computed with a [`WeekDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekField {
    kind: WeekFieldKind,
    definition: WeekDefinition,
}

impl WeekField {
    pub const fn new(kind: WeekFieldKind, definition: WeekDefinition) -> Self {
        Self { kind, definition }
    }

    pub const fn kind(&self) -> WeekFieldKind {
        self.kind
    }

    pub const fn definition(&self) -> WeekDefinition {
        self.definition
    }

    pub const fn range(&self) -> ValueRange {
        match self.kind {
            WeekFieldKind::DayOfWeek => ValueRange::of(1, 7),
            WeekFieldKind::WeekOfMonth => ValueRange::new_unchecked(0, 1, 4, 6),
            WeekFieldKind::WeekOfYear => ValueRange::new_unchecked(0, 1, 52, 54),
            WeekFieldKind::WeekOfWeekBasedYear => ValueRange::of_variable_max(1, 52, 53),
            WeekFieldKind::WeekBasedYear => YEAR_RANGE,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self.kind {
            WeekFieldKind::DayOfWeek => "DayOfWeek",
            WeekFieldKind::WeekOfMonth => "WeekOfMonth",
            WeekFieldKind::WeekOfYear => "WeekOfYear",
            WeekFieldKind::WeekOfWeekBasedYear => "WeekOfWeekBasedYear",
            WeekFieldKind::WeekBasedYear => "WeekBasedYear",
        }
    }

    /// Reads the field from an ISO date.
    pub fn get_from(&self, date: &IsoDate) -> i64 {
        let def = &self.definition;
        match self.kind {
            WeekFieldKind::DayOfWeek => def.localized_day_of_week(date),
            WeekFieldKind::WeekOfMonth => def.week_of_month_for(date),
            WeekFieldKind::WeekOfYear => def.week_of_year_for(date),
            WeekFieldKind::WeekOfWeekBasedYear => def.week_of_week_based_year_for(date),
            WeekFieldKind::WeekBasedYear => def.week_based_year_for(date),
        }
    }
}

impl fmt::Display for WeekField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name(), self.definition)
    }
}

// ==== Field ====

/// A field of a temporal, used as the key of parsed field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Chrono(ChronoField),
    Iso(IsoField),
    Week(WeekField),
}

impl Field {
    pub const fn range(&self) -> ValueRange {
        match self {
            Self::Chrono(field) => field.range(),
            Self::Iso(field) => field.range(),
            Self::Week(field) => field.range(),
        }
    }

    /// The base name, without any week definition.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chrono(field) => field.name(),
            Self::Iso(field) => field.name(),
            Self::Week(field) => field.name(),
        }
    }

    pub const fn is_date_based(&self) -> bool {
        match self {
            Self::Chrono(field) => field.is_date_based(),
            Self::Iso(_) | Self::Week(_) => true,
        }
    }

    pub const fn is_time_based(&self) -> bool {
        match self {
            Self::Chrono(field) => field.is_time_based(),
            Self::Iso(_) | Self::Week(_) => false,
        }
    }

    pub const fn as_chrono(&self) -> Option<ChronoField> {
        match self {
            Self::Chrono(field) => Some(*field),
            _ => None,
        }
    }

    /// Returns the value if it is valid, otherwise an error naming the field.
    pub fn check_valid_value(&self, value: i64) -> TemporalResult<i64> {
        let range = self.range();
        if range.is_valid_value(value) {
            return Ok(value);
        }
        range.check_valid_value(value, &self.to_string())
    }

    /// Returns the value as an `i32` if it is valid and the range fits in an `i32`.
    pub fn check_valid_int_value(&self, value: i64) -> TemporalResult<i32> {
        self.range().check_valid_int_value(value, &self.to_string())
    }
}

impl From<ChronoField> for Field {
    fn from(value: ChronoField) -> Self {
        Self::Chrono(value)
    }
}

impl From<IsoField> for Field {
    fn from(value: IsoField) -> Self {
        Self::Iso(value)
    }
}

impl From<WeekField> for Field {
    fn from(value: WeekField) -> Self {
        Self::Week(value)
    }
}

impl PartialEq<ChronoField> for Field {
    fn eq(&self, other: &ChronoField) -> bool {
        *self == Self::Chrono(*other)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrono(field) => field.fmt(f),
            Self::Iso(field) => field.fmt(f),
            Self::Week(field) => field.fmt(f),
        }
    }
}
