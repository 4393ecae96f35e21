//! Zoneinfo types

use core::fmt::{self, Write};

use alloc::{borrow::ToOwned, string::String};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    parser::{
        matches_name_prefix, next_split, ContextParse, LineParseContext, TryFromStr,
        ZoneInfoParseError,
    },
    utils::{self, MAX_YEAR, MIN_YEAR, SECONDS_PER_DAY},
};

// ==== LocalDateTime ====

/// A local date-time without an offset, stored as seconds from
/// `1970-01-01T00:00` on the local time line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalDateTime {
    seconds: i64,
}

impl LocalDateTime {
    /// `-999999999-01-01T00:00`
    pub const MIN: Self = Self::from_date(MIN_YEAR, 1, 1);
    /// `999999999-12-31T23:59:59`
    pub const MAX: Self = Self {
        seconds: Self::from_date(MAX_YEAR, 12, 31).seconds + SECONDS_PER_DAY - 1,
    };

    /// Creates a local date-time at the start of the provided day.
    pub const fn from_date(year: i32, month: u8, day: u8) -> Self {
        let days = utils::epoch_days_from_date(year as i64, month, day as i64);
        Self {
            seconds: utils::epoch_seconds_for_epoch_days(days),
        }
    }

    /// Creates a local date-time from the date and a second of the day.
    pub const fn new(year: i32, month: u8, day: u8, second_of_day: u32) -> Self {
        Self::from_date(year, month, day).plus_seconds(second_of_day as i64)
    }

    /// Creates a local date-time from epoch days and a second of the day.
    pub const fn from_epoch_days(epoch_days: i64, second_of_day: u32) -> Self {
        Self {
            seconds: utils::epoch_seconds_for_epoch_days(epoch_days) + second_of_day as i64,
        }
    }

    /// Creates the local date-time observed at `epoch_seconds` with `offset` seconds.
    pub const fn from_epoch_seconds(epoch_seconds: i64, offset: i64) -> Self {
        Self {
            seconds: epoch_seconds + offset,
        }
    }

    /// Returns the epoch seconds of this local date-time at `offset` seconds.
    pub const fn to_epoch_seconds(self, offset: i64) -> i64 {
        self.seconds - offset
    }

    pub const fn plus_seconds(self, seconds: i64) -> Self {
        Self {
            seconds: self.seconds + seconds,
        }
    }

    pub const fn plus_days(self, days: i64) -> Self {
        self.plus_seconds(days * SECONDS_PER_DAY)
    }

    pub const fn epoch_days(self) -> i64 {
        self.seconds.div_euclid(SECONDS_PER_DAY)
    }

    pub const fn second_of_day(self) -> u32 {
        self.seconds.rem_euclid(SECONDS_PER_DAY) as u32
    }

    /// Returns the `(year, month, day)` of this date-time.
    pub const fn date(self) -> (i64, u8, u8) {
        utils::date_from_epoch_days(self.epoch_days())
    }

    pub const fn year(self) -> i32 {
        self.date().0 as i32
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.date();
        let secs = self.second_of_day();
        if (0..=9999).contains(&year) {
            write!(f, "{year:04}")?;
        } else {
            write!(f, "{year:+}")?;
        }
        write!(
            f,
            "-{month:02}-{day:02}T{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60
        )?;
        if secs % 60 != 0 {
            write!(f, ":{:02}", secs % 60)?;
        }
        Ok(())
    }
}

// ==== TimeDefinition ====

/// How a rule or window time-of-day is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeDefinition {
    /// Local wall clock time, including any active savings.
    Wall,
    /// Local standard time, excluding savings.
    Standard,
    /// Universal time.
    Utc,
}

impl TimeDefinition {
    /// Converts a date-time in this definition to a wall clock date-time,
    /// given the standard offset and the wall offset in effect.
    pub const fn create_date_time(
        self,
        date_time: LocalDateTime,
        standard_offset: i64,
        wall_offset: i64,
    ) -> LocalDateTime {
        match self {
            Self::Utc => date_time.plus_seconds(wall_offset),
            Self::Standard => date_time.plus_seconds(wall_offset - standard_offset),
            Self::Wall => date_time,
        }
    }
}

// ==== Time ====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    pub sign: Sign,
    pub hour: i8,
    pub minute: i8,
    pub second: i8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(i8)]
pub enum Sign {
    #[default]
    Positive = 1,
    Negative = -1,
}

impl Time {
    pub const fn as_secs(&self) -> i64 {
        (self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64) * self.sign as i64
    }
}

impl TryFromStr<LineParseContext> for Time {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("Time");
        let (unsigned, sign) = if let Some(stripped) = s.strip_prefix('-') {
            (stripped, Sign::Negative)
        } else {
            (s, Sign::Positive)
        };
        if unsigned.is_empty() {
            // A bare "-" is a zero amount.
            ctx.exit();
            return Ok(Time::default());
        }
        let mut components = unsigned.splitn(3, ':');
        let hour = next_component(components.next(), ctx)?;
        let minute = components
            .next()
            .map(|m| next_component(Some(m), ctx))
            .transpose()?
            .unwrap_or(0);
        let second = components
            .next()
            .map(|s| next_component(Some(s), ctx))
            .transpose()?
            .unwrap_or(0);
        if !(0..60).contains(&minute) || !(0..60).contains(&second) {
            return Err(ZoneInfoParseError::unknown(ctx, s));
        }
        ctx.exit();
        Ok(Self {
            sign,
            hour,
            minute,
            second,
        })
    }
}

fn next_component(value: Option<&str>, ctx: &mut LineParseContext) -> Result<i8, ZoneInfoParseError> {
    let value = value.ok_or_else(|| ZoneInfoParseError::unexpected_eol(ctx))?;
    // Fractional seconds are truncated, as in `zic`.
    let whole = value.split_once('.').map_or(value, |(whole, _)| whole);
    whole.context_parse::<i8>(ctx)
}

// ==== Rule years ====

/// A year column of a `Rule` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleYear {
    Min,
    Max,
    Year(i32),
}

impl RuleYear {
    /// Parses the TO column, where `only` repeats the FROM year.
    pub(crate) fn parse_to_year(
        s: &str,
        from: RuleYear,
        ctx: &mut LineParseContext,
    ) -> Result<RuleYear, ZoneInfoParseError> {
        if s == "only" || s == "o" {
            Ok(from)
        } else {
            s.context_parse::<RuleYear>(ctx)
        }
    }

    pub const fn to_i32(self) -> i32 {
        match self {
            Self::Min => MIN_YEAR,
            Self::Max => MAX_YEAR,
            Self::Year(y) => y,
        }
    }
}

impl TryFromStr<LineParseContext> for RuleYear {
    type Error = ZoneInfoParseError;

    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        if matches_name_prefix(s, "minimum", 2) {
            return Ok(RuleYear::Min);
        }
        if matches_name_prefix(s, "maximum", 2) {
            return Ok(RuleYear::Max);
        }
        s.context_parse::<i32>(ctx).map(RuleYear::Year)
    }
}

// ==== Month ====

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

const MONTH_NAMES: [(&str, Month); 12] = [
    ("january", Month::Jan),
    ("february", Month::Feb),
    ("march", Month::Mar),
    ("april", Month::Apr),
    ("may", Month::May),
    ("june", Month::Jun),
    ("july", Month::Jul),
    ("august", Month::Aug),
    ("september", Month::Sep),
    ("october", Month::Oct),
    ("november", Month::Nov),
    ("december", Month::Dec),
];

impl Month {
    /// Returns the month for a 1 based month number.
    pub const fn from_number(number: u8) -> Option<Self> {
        if number == 0 || number > 12 {
            return None;
        }
        Some(MONTH_NAMES[number as usize - 1].1)
    }

    pub const fn length(self, leap: bool) -> u8 {
        utils::days_in_month(self as u8, leap)
    }
}

impl TryFromStr<LineParseContext> for Month {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("Month");
        let result = MONTH_NAMES
            .iter()
            .find(|(name, _)| matches_name_prefix(s, name, 3))
            .map(|(_, month)| *month)
            .ok_or_else(|| ZoneInfoParseError::unknown(ctx, s));
        ctx.exit();
        result
    }
}

// ==== WeekDay ====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum WeekDay {
    Mon = 1,
    Tues,
    Wed,
    Thurs,
    Fri,
    Sat,
    Sun,
}

const WEEK_DAY_NAMES: [(&str, WeekDay); 7] = [
    ("monday", WeekDay::Mon),
    ("tuesday", WeekDay::Tues),
    ("wednesday", WeekDay::Wed),
    ("thursday", WeekDay::Thurs),
    ("friday", WeekDay::Fri),
    ("saturday", WeekDay::Sat),
    ("sunday", WeekDay::Sun),
];

impl WeekDay {
    /// Returns the week day for an ISO week day number (1 = Monday).
    pub const fn from_number(number: u8) -> Option<Self> {
        if number == 0 || number > 7 {
            return None;
        }
        Some(WEEK_DAY_NAMES[number as usize - 1].1)
    }

    /// Returns the week day `days` after this one.
    pub const fn plus(self, days: i64) -> Self {
        let index = (self as i64 - 1 + days).rem_euclid(7) as usize;
        WEEK_DAY_NAMES[index].1
    }
}

impl TryFromStr<LineParseContext> for WeekDay {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        WEEK_DAY_NAMES
            .iter()
            .find(|(name, _)| matches_name_prefix(s, name, 2))
            .map(|(_, day)| *day)
            .ok_or_else(|| ZoneInfoParseError::unknown(ctx, s))
    }
}

// ==== DayOfMonth ====

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayOfMonth {
    /// The last given week day of the month, i.e. `lastSun`
    Last(WeekDay),
    /// The first given week day on or after the day, i.e. `Sun>=8`
    WeekDayGEThanMonthDay(WeekDay, u8),
    /// The last given week day on or before the day, i.e. `Sun<=25`
    WeekDayLEThanMonthDay(WeekDay, u8),
    Day(u8),
}

impl DayOfMonth {
    /// Returns the epoch days of this day in the provided year and month.
    pub fn epoch_days(self, year: i64, month: Month) -> i64 {
        match self {
            Self::Last(week_day) => epoch_days_for_rule_date(year, month, -1, Some(week_day)),
            Self::WeekDayGEThanMonthDay(week_day, day) => {
                epoch_days_for_rule_date(year, month, day as i8, Some(week_day))
            }
            Self::WeekDayLEThanMonthDay(week_day, day) => {
                let day_of_month = utils::epoch_days_from_date(year, month as u8, day as i64);
                previous_or_same(day_of_month, week_day)
            }
            Self::Day(day) => epoch_days_for_rule_date(year, month, day as i8, None),
        }
    }
}

impl TryFromStr<LineParseContext> for DayOfMonth {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("DayOfMonth");
        let result = if let Some(weekday) = s.strip_prefix("last") {
            Ok(DayOfMonth::Last(weekday.context_parse(ctx)?))
        } else if s.contains(">=") {
            let (week_day, day) = parse_date_split(s, ">=", ctx)?;
            Ok(DayOfMonth::WeekDayGEThanMonthDay(week_day, day))
        } else if s.contains("<=") {
            let (week_day, day) = parse_date_split(s, "<=", ctx)?;
            Ok(DayOfMonth::WeekDayLEThanMonthDay(week_day, day))
        } else {
            s.context_parse(ctx).map(DayOfMonth::Day)
        };
        if let Ok(DayOfMonth::Day(day)
        | DayOfMonth::WeekDayGEThanMonthDay(_, day)
        | DayOfMonth::WeekDayLEThanMonthDay(_, day)) = result
        {
            if !(1..=31).contains(&day) {
                return Err(ZoneInfoParseError::unknown(ctx, s));
            }
        }
        ctx.exit();
        result
    }
}

fn parse_date_split(
    s: &str,
    pat: &str,
    ctx: &mut LineParseContext,
) -> Result<(WeekDay, u8), ZoneInfoParseError> {
    let (week_day, num) = s
        .split_once(pat)
        .ok_or_else(|| ZoneInfoParseError::unknown(ctx, s))?;
    let w = week_day.context_parse::<WeekDay>(ctx)?;
    let d = num.context_parse(ctx)?;
    Ok((w, d))
}

/// Returns the epoch days for a rule date.
///
/// A positive `day_of_month_indicator` selects that day, moved forward to
/// `day_of_week` when provided. A negative indicator counts back from the
/// end of the month (`-1` is the last day), moved backward to
/// `day_of_week` when provided.
pub fn epoch_days_for_rule_date(
    year: i64,
    month: Month,
    day_of_month_indicator: i8,
    day_of_week: Option<WeekDay>,
) -> i64 {
    if day_of_month_indicator < 0 {
        let month_length = month.length(utils::in_leap_year(year)) as i64;
        let day = month_length + 1 + day_of_month_indicator as i64;
        let epoch_days = utils::epoch_days_from_date(year, month as u8, day);
        match day_of_week {
            Some(week_day) => previous_or_same(epoch_days, week_day),
            None => epoch_days,
        }
    } else {
        let epoch_days =
            utils::epoch_days_from_date(year, month as u8, day_of_month_indicator as i64);
        match day_of_week {
            Some(week_day) => next_or_same(epoch_days, week_day),
            None => epoch_days,
        }
    }
}

fn next_or_same(epoch_days: i64, week_day: WeekDay) -> i64 {
    let current = utils::epoch_days_to_week_day(epoch_days) as i64;
    epoch_days + (week_day as i64 - current).rem_euclid(7)
}

fn previous_or_same(epoch_days: i64, week_day: WeekDay) -> i64 {
    let current = utils::epoch_days_to_week_day(epoch_days) as i64;
    epoch_days - (current - week_day as i64).rem_euclid(7)
}

// ==== QualifiedTime ====

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualifiedTime {
    /// Local time including dst shifts
    Local(Time),
    /// Local standard time
    Standard(Time),
    Universal(Time),
}

impl QualifiedTime {
    pub const fn time(&self) -> Time {
        match self {
            Self::Local(t) | Self::Standard(t) | Self::Universal(t) => *t,
        }
    }

    pub const fn time_definition(&self) -> TimeDefinition {
        match self {
            Self::Local(_) => TimeDefinition::Wall,
            Self::Standard(_) => TimeDefinition::Standard,
            Self::Universal(_) => TimeDefinition::Utc,
        }
    }
}

impl TryFromStr<LineParseContext> for QualifiedTime {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        let (time, variant): (&str, fn(Time) -> QualifiedTime) =
            match s.as_bytes().last().copied() {
                Some(b's') => (&s[..s.len() - 1], Self::Standard),
                Some(b'u' | b'g' | b'z') => (&s[..s.len() - 1], Self::Universal),
                Some(b'w') => (&s[..s.len() - 1], Self::Local),
                _ => (s, Self::Local),
            };
        time.context_parse::<Time>(ctx).map(variant)
    }
}

// ==== Zone line types ====

#[derive(Debug, Clone, PartialEq)]
pub enum RuleIdentifier {
    None,
    Numeric(Time),
    Named(String),
}

impl TryFromStr<LineParseContext> for RuleIdentifier {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("RuleIdentifier");
        let result = if s == "-" {
            Ok(Self::None)
        } else if s.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            Time::try_from_str(s, ctx).map(Self::Numeric)
        } else {
            Ok(Self::Named(s.to_owned()))
        };
        ctx.exit();
        result
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbbreviationFormat {
    String(String),
    Numeric,
    Pair(String, String),
    Formattable(FormattableAbbr),
}

impl AbbreviationFormat {
    pub fn format(&self, offset: i64, letter: Option<&str>, is_dst: bool) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Formattable(s) => s.to_formatted_string(letter.unwrap_or("")),
            Self::Pair(std, dst) => {
                if is_dst {
                    dst.clone()
                } else {
                    std.clone()
                }
            }
            Self::Numeric => offset_to_str(offset),
        }
    }
}

fn offset_to_str(n: i64) -> String {
    let mut output = String::new();
    let sign = if n < 0 { '-' } else { '+' };
    let hour = n.abs().div_euclid(3600);
    let minute = n.abs().rem_euclid(3600).div_euclid(60);
    let second = n.abs().rem_euclid(60);
    // Writing to a `String` cannot fail.
    let _ = write!(&mut output, "{sign}{hour:02}");
    if minute > 0 || second > 0 {
        let _ = write!(&mut output, "{minute:02}");
    }
    if second > 0 {
        let _ = write!(&mut output, "{second:02}");
    }
    output
}

impl TryFromStr<LineParseContext> for AbbreviationFormat {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("Abbr. Format");
        let value = if s.contains("%s") {
            Ok(Self::Formattable(FormattableAbbr(s.to_owned())))
        } else if s.contains("%z") {
            Ok(Self::Numeric)
        } else if let Some((std, dst)) = s.split_once('/') {
            Ok(Self::Pair(std.to_owned(), dst.to_owned()))
        } else {
            Ok(AbbreviationFormat::String(s.to_owned()))
        };
        ctx.exit();
        value
    }
}

impl Default for AbbreviationFormat {
    fn default() -> Self {
        Self::String("LMT".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattableAbbr(pub String);

impl FormattableAbbr {
    pub fn to_formatted_string(&self, letter: &str) -> String {
        self.0.replace("%s", letter)
    }
}

/// The UNTIL column of a zone line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UntilDateTime {
    pub date: Date,
    pub time: QualifiedTime,
}

impl UntilDateTime {
    /// Returns the local date-time the until column names, in the
    /// column's own time definition.
    pub fn to_local_date_time(&self) -> LocalDateTime {
        let epoch_days = self.date.day.epoch_days(self.date.year as i64, self.date.month);
        LocalDateTime::from_epoch_days(epoch_days, 0).plus_seconds(self.time.time().as_secs())
    }
}

impl TryFromStr<LineParseContext> for UntilDateTime {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("UntilDateTime");
        let mut splits = s.split_whitespace();
        let year = next_split(&mut splits, ctx)?.context_parse::<i32>(ctx)?;
        let month = splits
            .next()
            .map(|m| m.context_parse::<Month>(ctx))
            .transpose()?
            .unwrap_or(Month::Jan);
        let day = splits
            .next()
            .map(|d| d.context_parse::<DayOfMonth>(ctx))
            .transpose()?
            .unwrap_or(DayOfMonth::Day(1));
        let time = splits
            .next()
            .map(|t| t.context_parse::<QualifiedTime>(ctx))
            .transpose()?
            .unwrap_or(QualifiedTime::Local(Time::default()));
        if let Some(extra) = splits.next() {
            return Err(ZoneInfoParseError::unknown(ctx, extra));
        }
        ctx.exit();
        Ok(Self {
            date: Date { year, month, day },
            time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Date {
    pub year: i32,
    pub month: Month,
    pub day: DayOfMonth,
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;

    use super::*;

    #[test]
    fn abbr_formatting() {
        let abbr = AbbreviationFormat::Numeric.format(3600, Some("D"), true);
        assert_eq!(abbr, "+01");

        let abbr = AbbreviationFormat::Numeric.format(-(3600 * 9 + 1800), None, false);
        assert_eq!(abbr, "-0930");

        let abbr = AbbreviationFormat::Formattable(FormattableAbbr("C%sT".to_owned())).format(
            3600,
            Some("D"),
            false,
        );
        assert_eq!(abbr, "CDT");

        let abbr = AbbreviationFormat::Pair("CST".to_owned(), "CDT".to_owned()).format(
            3600,
            Some("D"),
            true,
        );
        assert_eq!(abbr, "CDT");

        let abbr = AbbreviationFormat::Pair("CST".to_owned(), "CDT".to_owned()).format(
            3600,
            Some("S"),
            false,
        );
        assert_eq!(abbr, "CST");
    }

    #[test]
    fn time_parse() {
        let mut ctx = LineParseContext::default();
        let time = Time::try_from_str("-5:50:36", &mut ctx).unwrap();
        assert_eq!(time.as_secs(), -(5 * 3600 + 50 * 60 + 36));
        assert_eq!(Time::try_from_str("2", &mut ctx).unwrap().as_secs(), 7200);
        assert_eq!(Time::try_from_str("24:00", &mut ctx).unwrap().as_secs(), 86400);
        assert_eq!(Time::try_from_str("-", &mut ctx).unwrap().as_secs(), 0);
        assert!(Time::try_from_str("1:75", &mut ctx).is_err());
    }

    #[test]
    fn name_prefixes() {
        let mut ctx = LineParseContext::default();
        assert_eq!(Month::try_from_str("Mar", &mut ctx).unwrap(), Month::Mar);
        assert_eq!(Month::try_from_str("March", &mut ctx).unwrap(), Month::Mar);
        assert!(Month::try_from_str("Ma", &mut ctx).is_err());
        assert_eq!(WeekDay::try_from_str("Sun", &mut ctx).unwrap(), WeekDay::Sun);
        assert_eq!(WeekDay::try_from_str("Thu", &mut ctx).unwrap(), WeekDay::Thurs);
        assert_eq!(WeekDay::try_from_str("Tues", &mut ctx).unwrap(), WeekDay::Tues);
        assert!(WeekDay::try_from_str("Sx", &mut ctx).is_err());
    }

    #[test]
    fn qualified_time_suffixes() {
        let mut ctx = LineParseContext::default();
        let time = QualifiedTime::try_from_str("1:00u", &mut ctx).unwrap();
        assert_eq!(time.time_definition(), TimeDefinition::Utc);
        let time = QualifiedTime::try_from_str("2:00s", &mut ctx).unwrap();
        assert_eq!(time.time_definition(), TimeDefinition::Standard);
        let time = QualifiedTime::try_from_str("2:00", &mut ctx).unwrap();
        assert_eq!(time, QualifiedTime::Local(Time { hour: 2, ..Time::default() }));
    }

    #[test]
    fn date_calcs() {
        // Test epoch
        assert_eq!(epoch_days_for_rule_date(1970, Month::Jan, 1, None), 0);

        // Test modern day
        assert_eq!(epoch_days_for_rule_date(2025, Month::Mar, 29, None), 20176);
        assert_eq!(
            epoch_days_for_rule_date(2025, Month::Mar, 29, Some(WeekDay::Sat)),
            20176
        );
        assert_eq!(
            epoch_days_for_rule_date(2025, Month::Mar, 25, Some(WeekDay::Sat)),
            20176
        );
        assert_eq!(
            DayOfMonth::WeekDayLEThanMonthDay(WeekDay::Sat, 30).epoch_days(2025, Month::Mar),
            20176
        );
        assert_eq!(
            DayOfMonth::Last(WeekDay::Sun).epoch_days(2025, Month::Mar),
            20177
        );

        // Test pre epoch
        assert_eq!(epoch_days_for_rule_date(1969, Month::Dec, 31, None), -1);
        assert_eq!(
            DayOfMonth::Last(WeekDay::Sun).epoch_days(1969, Month::Dec),
            -4
        );
        assert_eq!(
            DayOfMonth::WeekDayGEThanMonthDay(WeekDay::Sun, 25).epoch_days(1969, Month::Dec),
            -4
        );
    }

    #[test]
    fn until_date_time() {
        let mut ctx = LineParseContext::default();
        let until = UntilDateTime::try_from_str("1883 Nov 18 18:00u", &mut ctx).unwrap();
        assert_eq!(until.time.time_definition(), TimeDefinition::Utc);
        assert_eq!(
            until.to_local_date_time(),
            LocalDateTime::new(1883, 11, 18, 18 * 3600)
        );
        let until = UntilDateTime::try_from_str("1920", &mut ctx).unwrap();
        assert_eq!(until.to_local_date_time(), LocalDateTime::from_date(1920, 1, 1));
        let until = UntilDateTime::try_from_str("1996 Oct lastSun 24:00", &mut ctx).unwrap();
        assert_eq!(until.to_local_date_time(), LocalDateTime::from_date(1996, 10, 28));
    }

    #[test]
    fn local_date_time_display() {
        let dt = LocalDateTime::new(2012, 6, 30, 23 * 3600 + 59 * 60 + 59);
        assert_eq!(alloc::format!("{dt}"), "2012-06-30T23:59:59");
        assert_eq!(dt.year(), 2012);
        assert_eq!(LocalDateTime::MAX.year(), MAX_YEAR);
        assert_eq!(LocalDateTime::MIN.year(), MIN_YEAR);
    }
}
