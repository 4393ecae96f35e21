//! The calendar system hooks used when parsed fields are resolved to a
//! date, and the ISO calendar system.

use core::fmt;

use alloc::format;
use tinystr::{tinystr, TinyAsciiStr};

use crate::{
    field_values::FieldValues,
    fields::{ChronoField, Field, IsoField, WeekDefinition, WeekFieldKind},
    iso::IsoDate,
    TemporalError, TemporalResult,
};

/// How strictly parsed fields are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolverStyle {
    /// Every field must be within its range and the fields must agree.
    Strict,
    /// Fields must be within their outer ranges, the day of month is
    /// clamped to the end of the month.
    #[default]
    Smart,
    /// Out of range values overflow into the next larger unit.
    Lenient,
}

impl fmt::Display for ResolverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "STRICT",
            Self::Smart => "SMART",
            Self::Lenient => "LENIENT",
        })
    }
}

/// A calendar system.
///
/// The formatter asks the chronology for field values of a base date and
/// hands it the parsed field values to resolve into a date.
pub trait Chronology: fmt::Debug + Send + Sync {
    /// The identifier of the calendar system, i.e. `ISO`.
    fn id(&self) -> TinyAsciiStr<16>;

    /// The value of a field of an ISO date in this calendar system.
    fn date_field(&self, date: &IsoDate, field: Field) -> TemporalResult<i64>;

    /// Resolves the date fields, removing those that were used.
    ///
    /// Returns `None` when the fields do not describe a date.
    fn resolve_date(
        &self,
        fields: &mut FieldValues,
        style: ResolverStyle,
    ) -> TemporalResult<Option<IsoDate>>;
}

/// Whether two chronologies are the same calendar system.
pub(crate) fn same_chronology(one: &dyn Chronology, other: &dyn Chronology) -> bool {
    one.id() == other.id()
}

/// The proleptic ISO-8601 calendar system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IsoChronology;

/// The shared ISO chronology.
pub static ISO_CHRONOLOGY: IsoChronology = IsoChronology;

impl Chronology for IsoChronology {
    fn id(&self) -> TinyAsciiStr<16> {
        tinystr!(16, "ISO")
    }

    fn date_field(&self, date: &IsoDate, field: Field) -> TemporalResult<i64> {
        date.get_long(field)
    }

    fn resolve_date(
        &self,
        fields: &mut FieldValues,
        style: ResolverStyle,
    ) -> TemporalResult<Option<IsoDate>> {
        if let Some(epoch_day) = fields.remove(ChronoField::EpochDay) {
            return IsoDate::try_from_epoch_days(epoch_day).map(Some);
        }
        resolve_proleptic_month(fields, style)?;
        resolve_year_of_era(fields, style)?;
        if let Some(date) = resolve_quarter(fields, style)? {
            return Ok(Some(date));
        }
        if let Some(date) = resolve_iso_week(fields, style)? {
            return Ok(Some(date));
        }
        if let Some(date) = resolve_localized_weeks(fields, style)? {
            return Ok(Some(date));
        }
        if !fields.contains(ChronoField::Year) {
            return Ok(None);
        }
        if fields.contains(ChronoField::MonthOfYear) {
            if fields.contains(ChronoField::DayOfMonth) {
                return resolve_ymd(fields, style).map(Some);
            }
            if fields.contains(ChronoField::AlignedWeekOfMonth) {
                if fields.contains(ChronoField::AlignedDayOfWeekInMonth) {
                    return resolve_aligned_in_month(fields, style, ChronoField::AlignedDayOfWeekInMonth)
                        .map(Some);
                }
                if fields.contains(ChronoField::DayOfWeek) {
                    return resolve_aligned_in_month(fields, style, ChronoField::DayOfWeek).map(Some);
                }
            }
        }
        if fields.contains(ChronoField::DayOfYear) {
            return resolve_year_day(fields, style).map(Some);
        }
        if fields.contains(ChronoField::AlignedWeekOfYear) {
            if fields.contains(ChronoField::AlignedDayOfWeekInYear) {
                return resolve_aligned_in_year(fields, style, ChronoField::AlignedDayOfWeekInYear)
                    .map(Some);
            }
            if fields.contains(ChronoField::DayOfWeek) {
                return resolve_aligned_in_year(fields, style, ChronoField::DayOfWeek).map(Some);
            }
        }
        Ok(None)
    }
}

// ==== Resolution steps ====

fn take(fields: &mut FieldValues, field: impl Into<Field>) -> TemporalResult<i64> {
    fields.remove(field).ok_or_else(TemporalError::assert)
}

fn overflow() -> TemporalError {
    TemporalError::range().with_message("Field value overflows the date range.")
}

fn resolve_proleptic_month(fields: &mut FieldValues, style: ResolverStyle) -> TemporalResult<()> {
    let Some(month) = fields.remove(ChronoField::ProlepticMonth) else {
        return Ok(());
    };
    if style != ResolverStyle::Lenient {
        ChronoField::ProlepticMonth.check_valid_value(month)?;
    }
    fields.insert_checked(ChronoField::MonthOfYear, month.rem_euclid(12) + 1)?;
    fields.insert_checked(ChronoField::Year, month.div_euclid(12))
}

fn resolve_year_of_era(fields: &mut FieldValues, style: ResolverStyle) -> TemporalResult<()> {
    let Some(year_of_era) = fields.remove(ChronoField::YearOfEra) else {
        if let Some(era) = fields.get(ChronoField::Era) {
            ChronoField::Era.check_valid_value(era)?;
        }
        return Ok(());
    };
    if style != ResolverStyle::Lenient {
        ChronoField::YearOfEra.check_valid_value(year_of_era)?;
    }
    let before_era = 1i64.checked_sub(year_of_era).ok_or_else(overflow)?;
    match fields.remove(ChronoField::Era) {
        None => {
            let year = fields.get(ChronoField::Year);
            match (style, year) {
                (ResolverStyle::Strict, None) => {
                    // No era is invented in strict mode.
                    fields.insert(ChronoField::YearOfEra, year_of_era);
                }
                (_, Some(year)) if year <= 0 => {
                    fields.insert_checked(ChronoField::Year, before_era)?;
                }
                _ => fields.insert_checked(ChronoField::Year, year_of_era)?,
            }
        }
        Some(1) => fields.insert_checked(ChronoField::Year, year_of_era)?,
        Some(0) => fields.insert_checked(ChronoField::Year, before_era)?,
        Some(era) => {
            return Err(TemporalError::range().with_message(format!("Invalid value for era: {era}")))
        }
    }
    Ok(())
}

fn resolve_ymd(fields: &mut FieldValues, style: ResolverStyle) -> TemporalResult<IsoDate> {
    let year = ChronoField::Year.check_valid_int_value(take(fields, ChronoField::Year)?)?;
    let month = take(fields, ChronoField::MonthOfYear)?;
    let day = take(fields, ChronoField::DayOfMonth)?;
    if style == ResolverStyle::Lenient {
        return IsoDate::new(year, 1, 1)?
            .plus_months(month.checked_sub(1).ok_or_else(overflow)?)?
            .plus_days(day.checked_sub(1).ok_or_else(overflow)?);
    }
    let month = ChronoField::MonthOfYear.check_valid_int_value(month)? as u8;
    let mut day = ChronoField::DayOfMonth.check_valid_int_value(day)? as u8;
    if style == ResolverStyle::Smart {
        let length = IsoDate::new_unchecked(year, month, 1).length_of_month();
        day = day.min(length);
    }
    IsoDate::new(year, month, day)
}

fn resolve_year_day(fields: &mut FieldValues, style: ResolverStyle) -> TemporalResult<IsoDate> {
    let year = ChronoField::Year.check_valid_int_value(take(fields, ChronoField::Year)?)?;
    let day = take(fields, ChronoField::DayOfYear)?;
    if style == ResolverStyle::Lenient {
        return IsoDate::new(year, 1, 1)?.plus_days(day.checked_sub(1).ok_or_else(overflow)?);
    }
    let day = ChronoField::DayOfYear.check_valid_int_value(day)? as u16;
    IsoDate::from_year_day(year, day)
}

/// Moves forward to the next ISO day of week, or stays if it matches.
fn next_or_same(date: IsoDate, day_of_week: i64) -> TemporalResult<IsoDate> {
    let current = i64::from(date.day_of_week());
    date.plus_days((day_of_week - current).rem_euclid(7))
}

/// Resolves a day after adding whole weeks, where the day is either an
/// aligned day of week or a day of week.
fn resolve_aligned(
    start: IsoDate,
    weeks: i64,
    day_field: ChronoField,
    day: i64,
) -> TemporalResult<IsoDate> {
    let days = weeks.checked_mul(7).ok_or_else(overflow)?;
    let date = start.plus_days(days)?;
    if day_field == ChronoField::DayOfWeek {
        let extra_weeks = (day - 1).div_euclid(7);
        let date = date.plus_days(extra_weeks.checked_mul(7).ok_or_else(overflow)?)?;
        return next_or_same(date, (day - 1).rem_euclid(7) + 1);
    }
    date.plus_days(day.checked_sub(1).ok_or_else(overflow)?)
}

fn resolve_aligned_in_month(
    fields: &mut FieldValues,
    style: ResolverStyle,
    day_field: ChronoField,
) -> TemporalResult<IsoDate> {
    let year = ChronoField::Year.check_valid_int_value(take(fields, ChronoField::Year)?)?;
    let month = take(fields, ChronoField::MonthOfYear)?;
    let week = take(fields, ChronoField::AlignedWeekOfMonth)?;
    let day = take(fields, day_field)?;
    if style == ResolverStyle::Lenient {
        let start = IsoDate::new(year, 1, 1)?.plus_months(month.checked_sub(1).ok_or_else(overflow)?)?;
        return resolve_aligned(start, week.checked_sub(1).ok_or_else(overflow)?, day_field, day);
    }
    let month = ChronoField::MonthOfYear.check_valid_int_value(month)? as u8;
    let week = ChronoField::AlignedWeekOfMonth.check_valid_int_value(week)?;
    let day = day_field.check_valid_int_value(day)?;
    let date = resolve_aligned(
        IsoDate::new(year, month, 1)?,
        i64::from(week - 1),
        day_field,
        i64::from(day),
    )?;
    if style == ResolverStyle::Strict && date.month != month {
        return Err(TemporalError::range().with_message(
            "Strict mode rejected resolved date as it is in a different month",
        ));
    }
    Ok(date)
}

fn resolve_aligned_in_year(
    fields: &mut FieldValues,
    style: ResolverStyle,
    day_field: ChronoField,
) -> TemporalResult<IsoDate> {
    let year = ChronoField::Year.check_valid_int_value(take(fields, ChronoField::Year)?)?;
    let week = take(fields, ChronoField::AlignedWeekOfYear)?;
    let day = take(fields, day_field)?;
    let start = IsoDate::new(year, 1, 1)?;
    if style == ResolverStyle::Lenient {
        return resolve_aligned(start, week.checked_sub(1).ok_or_else(overflow)?, day_field, day);
    }
    let week = ChronoField::AlignedWeekOfYear.check_valid_int_value(week)?;
    let day = day_field.check_valid_int_value(day)?;
    let date = resolve_aligned(start, i64::from(week - 1), day_field, i64::from(day))?;
    if style == ResolverStyle::Strict && date.year != year {
        return Err(TemporalError::range().with_message(
            "Strict mode rejected resolved date as it is in a different year",
        ));
    }
    Ok(date)
}

fn resolve_quarter(
    fields: &mut FieldValues,
    style: ResolverStyle,
) -> TemporalResult<Option<IsoDate>> {
    let (Some(year), Some(quarter), Some(day)) = (
        fields.get(ChronoField::Year),
        fields.get(IsoField::QuarterOfYear),
        fields.get(IsoField::DayOfQuarter),
    ) else {
        return Ok(None);
    };
    let year = ChronoField::Year.check_valid_int_value(year)?;
    let date = if style == ResolverStyle::Lenient {
        let months = quarter
            .checked_sub(1)
            .and_then(|q| q.checked_mul(3))
            .ok_or_else(overflow)?;
        IsoDate::new(year, 1, 1)?
            .plus_months(months)?
            .plus_days(day.checked_sub(1).ok_or_else(overflow)?)?
    } else {
        let quarter = Field::Iso(IsoField::QuarterOfYear).check_valid_int_value(quarter)?;
        let start = IsoDate::new(year, (quarter as u8 - 1) * 3 + 1, 1)?;
        if style == ResolverStyle::Strict {
            let end = start.plus_months(3)?;
            let length = end.to_epoch_days() - start.to_epoch_days();
            crate::range::ValueRange::of(1, length).check_valid_value(day, "DayOfQuarter")?;
        } else {
            Field::Iso(IsoField::DayOfQuarter).check_valid_value(day)?;
        }
        start.plus_days(day - 1)?
    };
    fields.remove(ChronoField::Year);
    fields.remove(IsoField::QuarterOfYear);
    fields.remove(IsoField::DayOfQuarter);
    Ok(Some(date))
}

fn resolve_iso_week(
    fields: &mut FieldValues,
    style: ResolverStyle,
) -> TemporalResult<Option<IsoDate>> {
    let (Some(year), Some(week), Some(day)) = (
        fields.get(IsoField::WeekBasedYear),
        fields.get(IsoField::WeekOfWeekBasedYear),
        fields.get(ChronoField::DayOfWeek),
    ) else {
        return Ok(None);
    };
    let year = Field::Iso(IsoField::WeekBasedYear).check_valid_int_value(year)?;
    let date = resolve_week_based(WeekDefinition::ISO, year, week, day, style)?;
    fields.remove(IsoField::WeekBasedYear);
    fields.remove(IsoField::WeekOfWeekBasedYear);
    fields.remove(ChronoField::DayOfWeek);
    Ok(Some(date))
}

/// Resolves an ISO day of week in a week of a week-based year.
fn resolve_week_based(
    definition: WeekDefinition,
    year: i32,
    week: i64,
    iso_day: i64,
    style: ResolverStyle,
) -> TemporalResult<IsoDate> {
    let localized = |iso: i64| (iso - i64::from(definition.first_day_of_week())).rem_euclid(7) + 1;
    if style == ResolverStyle::Lenient {
        let first = definition.date_of_week_based_year(year, 1, 1)?;
        let extra_weeks = (iso_day - 1).div_euclid(7);
        let day = (iso_day - 1).rem_euclid(7) + 1;
        let days = week
            .checked_sub(1)
            .and_then(|w| w.checked_add(extra_weeks))
            .and_then(|w| w.checked_mul(7))
            .ok_or_else(overflow)?;
        return first.plus_days(days.saturating_add(localized(day) - 1));
    }
    let day = ChronoField::DayOfWeek.check_valid_int_value(iso_day)?;
    let week_range = definition.week_of_week_based_year().range();
    if style == ResolverStyle::Strict {
        let last_week = definition.date_of_week_based_year(year, 53, 1)?;
        let weeks = definition.week_of_week_based_year_for(&last_week);
        crate::range::ValueRange::of(1, weeks).check_valid_value(week, "WeekOfWeekBasedYear")?;
    } else {
        week_range.check_valid_value(week, "WeekOfWeekBasedYear")?;
    }
    definition.date_of_week_based_year(year, week, localized(i64::from(day)))
}

/// Resolves the localized week fields of a single week definition.
fn resolve_localized_weeks(
    fields: &mut FieldValues,
    style: ResolverStyle,
) -> TemporalResult<Option<IsoDate>> {
    let week_fields = fields.fields().filter_map(|field| match field {
        Field::Week(week) => Some(week),
        _ => None,
    });
    let mut definition = None;
    let mut local_day = None;
    for week in week_fields {
        definition.get_or_insert(week.definition());
        if week.kind() == WeekFieldKind::DayOfWeek {
            local_day = Some(week);
        }
    }
    let Some(definition) = definition else {
        return Ok(None);
    };
    if let Some(day_field) = local_day {
        let value = take(fields, day_field)?;
        let value = if style == ResolverStyle::Lenient {
            value
        } else {
            Field::Week(day_field).check_valid_value(value)?
        };
        let first = i64::from(day_field.definition().first_day_of_week());
        fields.insert_checked(ChronoField::DayOfWeek, (first - 1 + value - 1).rem_euclid(7) + 1)?;
    }
    let Some(iso_day) = fields.get(ChronoField::DayOfWeek) else {
        return Ok(None);
    };
    let week_based_year = fields.get(definition.week_based_year());
    let week_of_week_based_year = fields.get(definition.week_of_week_based_year());
    if let (Some(year), Some(week)) = (week_based_year, week_of_week_based_year) {
        let year = definition.week_based_year().check_valid_int_value(year)?;
        let date = resolve_week_based(definition, year, week, iso_day, style)?;
        fields.remove(definition.week_based_year());
        fields.remove(definition.week_of_week_based_year());
        fields.remove(ChronoField::DayOfWeek);
        return Ok(Some(date));
    }
    let Some(year) = fields.get(ChronoField::Year) else {
        return Ok(None);
    };
    let year = ChronoField::Year.check_valid_int_value(year)?;
    let week_of_month = fields.get(definition.week_of_month());
    let month = fields.get(ChronoField::MonthOfYear);
    if let (Some(month), Some(week)) = (month, week_of_month) {
        let start = if style == ResolverStyle::Lenient {
            IsoDate::new(year, 1, 1)?.plus_months(month.checked_sub(1).ok_or_else(overflow)?)?
        } else {
            let month = ChronoField::MonthOfYear.check_valid_int_value(month)? as u8;
            definition.week_of_month().check_valid_value(week)?;
            IsoDate::new(year, month, 1)?
        };
        let start_week = definition.week_of_month_for(&start);
        let date = week_day_from(definition, start, start_week, week, iso_day)?;
        if style == ResolverStyle::Strict && date.month != start.month {
            return Err(TemporalError::range().with_message(
                "Strict mode rejected resolved date as it is in a different month",
            ));
        }
        fields.remove(ChronoField::Year);
        fields.remove(ChronoField::MonthOfYear);
        fields.remove(definition.week_of_month());
        fields.remove(ChronoField::DayOfWeek);
        return Ok(Some(date));
    }
    if let Some(week) = fields.get(definition.week_of_year()) {
        if style != ResolverStyle::Lenient {
            definition.week_of_year().check_valid_value(week)?;
        }
        let start = IsoDate::new(year, 1, 1)?;
        let start_week = definition.week_of_year_for(&start);
        let date = week_day_from(definition, start, start_week, week, iso_day)?;
        if style == ResolverStyle::Strict && date.year != year {
            return Err(TemporalError::range().with_message(
                "Strict mode rejected resolved date as it is in a different year",
            ));
        }
        fields.remove(ChronoField::Year);
        fields.remove(definition.week_of_year());
        fields.remove(ChronoField::DayOfWeek);
        return Ok(Some(date));
    }
    Ok(None)
}

/// The date in `week` on an ISO day of week, counted from a start date
/// that lies in `start_week`.
fn week_day_from(
    definition: WeekDefinition,
    start: IsoDate,
    start_week: i64,
    week: i64,
    iso_day: i64,
) -> TemporalResult<IsoDate> {
    let first = i64::from(definition.first_day_of_week());
    let target = (iso_day - first).rem_euclid(7) + 1;
    let current = definition.localized_day_of_week(&start);
    let days = week
        .checked_sub(start_week)
        .and_then(|w| w.checked_mul(7))
        .and_then(|d| d.checked_add(target - current))
        .ok_or_else(overflow)?;
    start.plus_days(days)
}
