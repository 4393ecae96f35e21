//! Parsed values and their resolution into a date, a time and an instant.

use alloc::{format, string::ToString};
use core::fmt::Display;

use crate::{
    chronology::{Chronology, ResolverStyle, ISO_CHRONOLOGY},
    field_values::FieldValues,
    fields::{ChronoField, Field},
    iso::{IsoDate, IsoDateTime, IsoTime, NANOS_PER_DAY, NANOS_PER_SECOND},
    offset::{ZoneId, ZoneOffset},
    provider::ZoneRulesProvider,
    temporal::{unsupported, Instant, OffsetDateTime, TemporalAccessor, ZonedDateTime},
    TemporalError, TemporalResult, TemporalUnwrap,
};

/// The values collected by a parse, before resolution.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub(crate) fields: FieldValues,
    pub(crate) zone: Option<ZoneId>,
    pub(crate) chronology: Option<&'static dyn Chronology>,
    pub(crate) leap_second: bool,
}

impl Parsed {
    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn zone(&self) -> Option<&ZoneId> {
        self.zone.as_ref()
    }

    pub fn chronology(&self) -> Option<&'static dyn Chronology> {
        self.chronology
    }

    /// Whether a leap second, `23:59:60`, was parsed.
    pub fn is_leap_second(&self) -> bool {
        self.leap_second
    }

    /// Resolves the parsed values.
    ///
    /// `zone` and `chronology` are used when the text had none.
    pub(crate) fn resolve(
        self,
        style: ResolverStyle,
        zone: Option<&ZoneId>,
        chronology: Option<&'static dyn Chronology>,
        zones: &dyn ZoneRulesProvider,
    ) -> TemporalResult<ResolvedTemporal> {
        let mut resolver = Resolver {
            fields: self.fields,
            zone: self.zone.or_else(|| zone.cloned()),
            chronology: self
                .chronology
                .or(chronology)
                .unwrap_or(&ISO_CHRONOLOGY),
            style,
            zones,
            date: None,
            time: None,
            excess_days: 0,
        };
        resolver.resolve_instant_fields()?;
        resolver.resolve_date_fields()?;
        resolver.resolve_time_fields()?;
        resolver.resolve_time_lenient()?;
        resolver.cross_check()?;
        resolver.resolve_period()?;
        resolver.resolve_fractional();
        resolver.resolve_instant()?;
        #[cfg(feature = "log")]
        log::trace!(
            "Resolved {:?} {:?} with {} fields left",
            resolver.date,
            resolver.time,
            resolver.fields.len()
        );
        Ok(ResolvedTemporal {
            fields: resolver.fields,
            date: resolver.date,
            time: resolver.time,
            excess_days: resolver.excess_days,
            zone: resolver.zone,
            chronology: resolver.chronology,
            leap_second: self.leap_second,
        })
    }
}

struct Resolver<'a> {
    fields: FieldValues,
    zone: Option<ZoneId>,
    chronology: &'static dyn Chronology,
    style: ResolverStyle,
    zones: &'a dyn ZoneRulesProvider,
    date: Option<IsoDate>,
    time: Option<IsoTime>,
    excess_days: i64,
}

fn conflict(message: impl Display) -> TemporalError {
    TemporalError::general(format!("Conflict found: {message}"))
}

impl Resolver<'_> {
    fn resolve_instant_fields(&mut self) -> TemporalResult<()> {
        let Some(seconds) = self.fields.get(ChronoField::InstantSeconds) else {
            return Ok(());
        };
        let instant = Instant::from_epoch_seconds(seconds);
        let (date_time, offset) = if let Some(zone) = self.zone.clone() {
            let zoned = ZonedDateTime::from_instant(instant, zone, self.zones)?;
            (zoned.date_time(), zoned.offset())
        } else if let Some(offset) = self.fields.get(ChronoField::OffsetSeconds) {
            let offset = ZoneOffset::from_total_seconds(
                ChronoField::OffsetSeconds.check_valid_int_value(offset)?,
            )?;
            let fixed = OffsetDateTime::from_instant(instant, offset)?;
            (fixed.date_time(), fixed.offset())
        } else {
            return Ok(());
        };
        self.update_date(date_time.date)?;
        self.update_check_conflict(
            ChronoField::InstantSeconds,
            ChronoField::SecondOfDay,
            i64::from(date_time.time.to_second_of_day()),
        )?;
        self.update_check_conflict(
            ChronoField::InstantSeconds,
            ChronoField::OffsetSeconds,
            i64::from(offset.total_seconds()),
        )
    }

    fn resolve_date_fields(&mut self) -> TemporalResult<()> {
        if let Some(date) = self
            .chronology
            .resolve_date(&mut self.fields, self.style)?
        {
            self.update_date(date)?;
        }
        Ok(())
    }

    fn update_date(&mut self, date: IsoDate) -> TemporalResult<()> {
        match self.date {
            Some(existing) if existing != date => Err(conflict(format!(
                "Fields resolved to two different dates: {existing} {date}"
            ))),
            _ => {
                self.date = Some(date);
                Ok(())
            }
        }
    }

    fn update_time(&mut self, time: IsoTime, excess_days: i64) -> TemporalResult<()> {
        match self.time {
            Some(existing) if existing != time => Err(conflict(format!(
                "Fields resolved to different times: {existing} {time}"
            ))),
            Some(_) if self.excess_days != 0 && excess_days != 0 && self.excess_days != excess_days => {
                Err(conflict(format!(
                    "Fields resolved to different excess periods: {} {excess_days}",
                    self.excess_days
                )))
            }
            _ => {
                self.time = Some(time);
                self.excess_days = excess_days;
                Ok(())
            }
        }
    }

    /// Sets a value derived from `source`, which must agree with a value
    /// already present.
    fn update_check_conflict(
        &mut self,
        source: ChronoField,
        field: ChronoField,
        value: i64,
    ) -> TemporalResult<()> {
        match self.fields.insert(field, value) {
            Some(old) if old != value => Err(conflict(format!(
                "{field} {old} differs from {field} {value} while resolving {source}"
            ))),
            _ => Ok(()),
        }
    }

    fn take_checked(&mut self, field: ChronoField) -> TemporalResult<Option<i64>> {
        let Some(value) = self.fields.remove(field) else {
            return Ok(None);
        };
        if self.style != ResolverStyle::Lenient {
            field.check_valid_value(value)?;
        }
        Ok(Some(value))
    }

    fn resolve_time_fields(&mut self) -> TemporalResult<()> {
        use ChronoField::*;
        if let Some(hour) = self.fields.remove(ClockHourOfDay) {
            if self.style == ResolverStyle::Strict || (self.style == ResolverStyle::Smart && hour != 0) {
                ClockHourOfDay.check_valid_value(hour)?;
            }
            let hour = if hour == 24 { 0 } else { hour };
            self.update_check_conflict(ClockHourOfDay, HourOfDay, hour)?;
        }
        if let Some(hour) = self.fields.remove(ClockHourOfAmPm) {
            if self.style == ResolverStyle::Strict || (self.style == ResolverStyle::Smart && hour != 0) {
                ClockHourOfAmPm.check_valid_value(hour)?;
            }
            let hour = if hour == 12 { 0 } else { hour };
            self.update_check_conflict(ClockHourOfAmPm, HourOfAmPm, hour)?;
        }
        if self.fields.contains(AmPmOfDay) && self.fields.contains(HourOfAmPm) {
            let am_pm = self.fields.remove(AmPmOfDay).temporal_unwrap()?;
            let hour = self.fields.remove(HourOfAmPm).temporal_unwrap()?;
            if self.style != ResolverStyle::Lenient {
                AmPmOfDay.check_valid_value(am_pm)?;
                HourOfAmPm.check_valid_value(hour)?;
            }
            let hour_of_day = am_pm
                .checked_mul(12)
                .and_then(|h| h.checked_add(hour))
                .ok_or_else(|| TemporalError::range().with_message("Hour overflow."))?;
            self.update_check_conflict(AmPmOfDay, HourOfDay, hour_of_day)?;
        }
        if let Some(nano_of_day) = self.take_checked(NanoOfDay)? {
            self.update_check_conflict(NanoOfDay, HourOfDay, nano_of_day / 3_600_000_000_000)?;
            self.update_check_conflict(NanoOfDay, MinuteOfHour, (nano_of_day / 60_000_000_000) % 60)?;
            self.update_check_conflict(NanoOfDay, SecondOfMinute, (nano_of_day / NANOS_PER_SECOND) % 60)?;
            self.update_check_conflict(NanoOfDay, NanoOfSecond, nano_of_day % NANOS_PER_SECOND)?;
        }
        if let Some(micro_of_day) = self.take_checked(MicroOfDay)? {
            self.update_check_conflict(MicroOfDay, SecondOfDay, micro_of_day / 1_000_000)?;
            self.update_check_conflict(MicroOfDay, MicroOfSecond, micro_of_day % 1_000_000)?;
        }
        if let Some(milli_of_day) = self.take_checked(MilliOfDay)? {
            self.update_check_conflict(MilliOfDay, SecondOfDay, milli_of_day / 1_000)?;
            self.update_check_conflict(MilliOfDay, MilliOfSecond, milli_of_day % 1_000)?;
        }
        if let Some(second_of_day) = self.take_checked(SecondOfDay)? {
            self.update_check_conflict(SecondOfDay, HourOfDay, second_of_day / 3_600)?;
            self.update_check_conflict(SecondOfDay, MinuteOfHour, (second_of_day / 60) % 60)?;
            self.update_check_conflict(SecondOfDay, SecondOfMinute, second_of_day % 60)?;
        }
        if let Some(minute_of_day) = self.take_checked(MinuteOfDay)? {
            self.update_check_conflict(MinuteOfDay, HourOfDay, minute_of_day / 60)?;
            self.update_check_conflict(MinuteOfDay, MinuteOfHour, minute_of_day % 60)?;
        }

        // Merge the partial seconds into the nano of second.
        if let Some(nanos) = self.fields.get(NanoOfSecond) {
            if self.style != ResolverStyle::Lenient {
                NanoOfSecond.check_valid_value(nanos)?;
            }
            let mut nanos = nanos;
            if let Some(micros) = self.take_checked(MicroOfSecond)? {
                nanos = micros * 1_000 + nanos % 1_000;
                self.update_check_conflict(MicroOfSecond, NanoOfSecond, nanos)?;
            }
            if let Some(millis) = self.take_checked(MilliOfSecond)? {
                self.update_check_conflict(MilliOfSecond, NanoOfSecond, millis * 1_000_000 + nanos % 1_000_000)?;
            }
        }

        if [HourOfDay, MinuteOfHour, SecondOfMinute, NanoOfSecond]
            .iter()
            .all(|field| self.fields.contains(*field))
        {
            let hour = self.fields.remove(HourOfDay).temporal_unwrap()?;
            let minute = self.fields.remove(MinuteOfHour).temporal_unwrap()?;
            let second = self.fields.remove(SecondOfMinute).temporal_unwrap()?;
            let nanos = self.fields.remove(NanoOfSecond).temporal_unwrap()?;
            self.resolve_time(hour, minute, second, nanos)?;
        }
        Ok(())
    }

    fn resolve_time_lenient(&mut self) -> TemporalResult<()> {
        use ChronoField::*;
        if self.time.is_none() {
            if let Some(millis) = self.fields.remove(MilliOfSecond) {
                if let Some(micros) = self.fields.get(MicroOfSecond) {
                    let micros = millis * 1_000 + micros % 1_000;
                    self.update_check_conflict(MilliOfSecond, MicroOfSecond, micros)?;
                    self.fields.remove(MicroOfSecond);
                    self.fields.insert(NanoOfSecond, micros * 1_000);
                } else {
                    self.fields.insert(NanoOfSecond, millis * 1_000_000);
                }
            } else if let Some(micros) = self.fields.remove(MicroOfSecond) {
                self.fields.insert(NanoOfSecond, micros * 1_000);
            }

            if let Some(hour) = self.fields.get(HourOfDay) {
                let minute = self.fields.get(MinuteOfHour);
                let second = self.fields.get(SecondOfMinute);
                let nanos = self.fields.get(NanoOfSecond);
                // A gap in the smaller fields cannot be defaulted.
                let gap = (minute.is_none() && (second.is_some() || nanos.is_some()))
                    || (minute.is_some() && second.is_none() && nanos.is_some());
                if !gap {
                    self.resolve_time(
                        hour,
                        minute.unwrap_or(0),
                        second.unwrap_or(0),
                        nanos.unwrap_or(0),
                    )?;
                    for field in [HourOfDay, MinuteOfHour, SecondOfMinute, NanoOfSecond] {
                        self.fields.remove(field);
                    }
                }
            }
        }

        if self.style != ResolverStyle::Lenient {
            for (field, value) in self.fields.iter() {
                if let Field::Chrono(chrono) = field {
                    if chrono.is_time_based() {
                        chrono.check_valid_value(value)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_time(&mut self, hour: i64, minute: i64, second: i64, nanos: i64) -> TemporalResult<()> {
        use ChronoField::*;
        if self.style == ResolverStyle::Lenient {
            let overflow = || TemporalError::range().with_message("Time overflow.");
            let total = hour
                .checked_mul(3_600 * NANOS_PER_SECOND)
                .and_then(|t| t.checked_add(minute.checked_mul(60 * NANOS_PER_SECOND)?))
                .and_then(|t| t.checked_add(second.checked_mul(NANOS_PER_SECOND)?))
                .and_then(|t| t.checked_add(nanos))
                .ok_or_else(overflow)?;
            let excess_days = total.div_euclid(NANOS_PER_DAY);
            let time = IsoTime::from_nano_of_day(total.rem_euclid(NANOS_PER_DAY));
            return self.update_time(time, excess_days);
        }
        let minute = MinuteOfHour.check_valid_int_value(minute)?;
        let nanos = NanoOfSecond.check_valid_int_value(nanos)?;
        if self.style == ResolverStyle::Smart && hour == 24 && minute == 0 && second == 0 && nanos == 0 {
            return self.update_time(IsoTime::MIDNIGHT, 1);
        }
        let hour = HourOfDay.check_valid_int_value(hour)?;
        let second = SecondOfMinute.check_valid_int_value(second)?;
        let time = IsoTime::new(hour as u8, minute as u8, second as u8, nanos as u32)?;
        self.update_time(time, 0)
    }

    fn cross_check(&mut self) -> TemporalResult<()> {
        if let Some(date) = self.date {
            self.cross_check_against(&date, &date)?;
        }
        if let Some(time) = self.time {
            self.cross_check_against(&time, &time)?;
            if let Some(date) = self.date.filter(|_| !self.fields.is_empty()) {
                let date_time = IsoDateTime::new(date, time);
                self.cross_check_against(&date_time, &date_time)?;
            }
        }
        Ok(())
    }

    /// Removes the fields the target agrees with, failing on the first
    /// field it disagrees with.
    fn cross_check_against(
        &mut self,
        target: &dyn TemporalAccessor,
        description: &dyn Display,
    ) -> TemporalResult<()> {
        let mut mismatch = None;
        self.fields.retain(|field, value| {
            if mismatch.is_some() || !target.is_supported(field) {
                return true;
            }
            match target.get_long(field) {
                Ok(derived) if derived == value => false,
                Ok(derived) => {
                    mismatch = Some((field, derived, value));
                    true
                }
                Err(_) => true,
            }
        });
        match mismatch {
            Some((field, derived, value)) => Err(conflict(format!(
                "Field {field} {derived} differs from {field} {value} derived from {}",
                description.to_string()
            ))),
            None => Ok(()),
        }
    }

    fn resolve_period(&mut self) -> TemporalResult<()> {
        if let (Some(date), Some(_)) = (self.date, self.time) {
            if self.excess_days != 0 {
                self.date = Some(date.plus_days(self.excess_days)?);
                self.excess_days = 0;
            }
        }
        Ok(())
    }

    fn resolve_fractional(&mut self) {
        use ChronoField::*;
        if self.time.is_some()
            || ![InstantSeconds, SecondOfDay, SecondOfMinute]
                .iter()
                .any(|field| self.fields.contains(*field))
        {
            return;
        }
        if let Some(nanos) = self.fields.get(NanoOfSecond) {
            self.fields.insert(MicroOfSecond, nanos / 1_000);
            self.fields.insert(MilliOfSecond, nanos / 1_000_000);
        } else {
            self.fields.insert(NanoOfSecond, 0);
            self.fields.insert(MicroOfSecond, 0);
            self.fields.insert(MilliOfSecond, 0);
        }
    }

    fn resolve_instant(&mut self) -> TemporalResult<()> {
        let (Some(date), Some(time)) = (self.date, self.time) else {
            return Ok(());
        };
        if self.fields.contains(ChronoField::InstantSeconds) {
            return Ok(());
        }
        let date_time = IsoDateTime::new(date, time);
        let seconds = if let Some(offset) = self.fields.get(ChronoField::OffsetSeconds) {
            date_time.to_epoch_seconds(ChronoField::OffsetSeconds.check_valid_int_value(offset)?)
        } else if let Some(zone) = self.zone.clone() {
            ZonedDateTime::from_local(date_time, zone, self.zones)?
                .to_instant()
                .epoch_seconds()
        } else {
            return Ok(());
        };
        self.fields.insert(ChronoField::InstantSeconds, seconds);
        Ok(())
    }
}

/// The result of a resolved parse.
///
/// Values are looked up in the remaining parsed fields first, then in the
/// resolved date and time.
#[derive(Debug, Clone)]
pub struct ResolvedTemporal {
    fields: FieldValues,
    date: Option<IsoDate>,
    time: Option<IsoTime>,
    excess_days: i64,
    zone: Option<ZoneId>,
    chronology: &'static dyn Chronology,
    leap_second: bool,
}

impl ResolvedTemporal {
    pub fn date(&self) -> Option<IsoDate> {
        self.date
    }

    pub fn time(&self) -> Option<IsoTime> {
        self.time
    }

    pub fn date_time(&self) -> Option<IsoDateTime> {
        Some(IsoDateTime::new(self.date?, self.time?))
    }

    /// The days a time of `24:00` or a lenient time carried over, when no
    /// date absorbed them.
    pub fn excess_days(&self) -> i64 {
        self.excess_days
    }

    pub fn is_leap_second(&self) -> bool {
        self.leap_second
    }

    /// The fields that were not resolved into a date or time.
    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    /// The instant, when the text had one or it could be derived.
    pub fn to_instant(&self) -> Option<Instant> {
        let seconds = self.fields.get(ChronoField::InstantSeconds)?;
        let nanos = match self.time {
            Some(time) => time.nanosecond,
            None => u32::try_from(self.fields.get(ChronoField::NanoOfSecond).unwrap_or(0)).ok()?,
        };
        Instant::new(seconds, nanos).ok()
    }
}

impl TemporalAccessor for ResolvedTemporal {
    fn is_supported(&self, field: Field) -> bool {
        self.fields.contains(field)
            || self.date.is_some_and(|date| date.is_supported(field))
            || self.time.is_some_and(|time| time.is_supported(field))
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        if let Some(value) = self.fields.get(field) {
            return Ok(value);
        }
        if let Some(date) = self.date.filter(|date| date.is_supported(field)) {
            return date.get_long(field);
        }
        if let Some(time) = self.time.filter(|time| time.is_supported(field)) {
            return time.get_long(field);
        }
        Err(unsupported(field))
    }

    fn zone(&self) -> Option<ZoneId> {
        self.zone.clone()
    }

    fn offset(&self) -> Option<ZoneOffset> {
        let seconds = self.fields.get(ChronoField::OffsetSeconds)?;
        ZoneOffset::from_total_seconds(i32::try_from(seconds).ok()?).ok()
    }

    fn chronology(&self) -> Option<&'static dyn Chronology> {
        Some(self.chronology)
    }

    fn local_date(&self) -> Option<IsoDate> {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CompiledZoneRulesProvider;

    fn resolve(pairs: &[(ChronoField, i64)], style: ResolverStyle) -> TemporalResult<ResolvedTemporal> {
        let parsed = Parsed {
            fields: pairs.iter().map(|(f, v)| (Field::from(*f), *v)).collect(),
            ..Parsed::default()
        };
        parsed.resolve(style, None, None, &CompiledZoneRulesProvider::default())
    }

    #[test]
    fn clock_hours() {
        use ChronoField::*;
        let resolved = resolve(
            &[(ClockHourOfAmPm, 12), (AmPmOfDay, 1), (MinuteOfHour, 5)],
            ResolverStyle::Smart,
        )
        .unwrap();
        assert_eq!(resolved.time(), Some(IsoTime::new(12, 5, 0, 0).unwrap()));
        let resolved = resolve(&[(ClockHourOfDay, 24)], ResolverStyle::Smart).unwrap();
        assert_eq!(resolved.time(), Some(IsoTime::MIDNIGHT));
    }

    #[test]
    fn end_of_day() {
        use ChronoField::*;
        let fields = [
            (Year, 2012),
            (MonthOfYear, 12),
            (DayOfMonth, 31),
            (HourOfDay, 24),
            (MinuteOfHour, 0),
        ];
        let resolved = resolve(&fields, ResolverStyle::Smart).unwrap();
        assert_eq!(resolved.date(), Some(IsoDate::new(2013, 1, 1).unwrap()));
        assert_eq!(resolved.time(), Some(IsoTime::MIDNIGHT));
        assert!(resolve(&fields, ResolverStyle::Strict).is_err());
    }

    #[test]
    fn lenient_time_overflows_into_days() {
        use ChronoField::*;
        let resolved = resolve(&[(HourOfDay, 25), (MinuteOfHour, 90)], ResolverStyle::Lenient).unwrap();
        assert_eq!(resolved.time(), Some(IsoTime::new(2, 30, 0, 0).unwrap()));
        assert_eq!(resolved.excess_days(), 1);
    }

    #[test]
    fn partial_seconds() {
        use ChronoField::*;
        let resolved = resolve(
            &[(HourOfDay, 1), (MinuteOfHour, 2), (SecondOfMinute, 3), (MilliOfSecond, 456)],
            ResolverStyle::Smart,
        )
        .unwrap();
        assert_eq!(resolved.time(), Some(IsoTime::new(1, 2, 3, 456_000_000).unwrap()));
        let resolved = resolve(&[(SecondOfDay, 3_661)], ResolverStyle::Smart).unwrap();
        assert_eq!(resolved.time(), Some(IsoTime::new(1, 1, 1, 0).unwrap()));
    }

    #[test]
    fn cross_check_conflict() {
        use ChronoField::*;
        let err = resolve(
            &[(Year, 2012), (MonthOfYear, 6), (DayOfMonth, 30), (DayOfWeek, 1)],
            ResolverStyle::Smart,
        )
        .unwrap_err();
        assert_eq!(
            err.message(),
            "Conflict found: Field DayOfWeek 6 differs from DayOfWeek 1 derived from 2012-06-30"
        );
        let resolved = resolve(
            &[(Year, 2012), (MonthOfYear, 6), (DayOfMonth, 30), (DayOfWeek, 6)],
            ResolverStyle::Smart,
        )
        .unwrap();
        assert!(resolved.fields().is_empty());
    }

    #[test]
    fn instant_from_offset() {
        use ChronoField::*;
        let resolved = resolve(
            &[
                (Year, 2012),
                (MonthOfYear, 6),
                (DayOfMonth, 30),
                (HourOfDay, 12),
                (MinuteOfHour, 0),
                (OffsetSeconds, 3_600),
            ],
            ResolverStyle::Smart,
        )
        .unwrap();
        assert_eq!(resolved.get_long(InstantSeconds.into()).unwrap(), 1_341_054_000);
        assert_eq!(resolved.offset(), Some(ZoneOffset::from_total_seconds(3_600).unwrap()));

        let resolved = resolve(
            &[(InstantSeconds, 1_341_054_000), (OffsetSeconds, 0)],
            ResolverStyle::Smart,
        )
        .unwrap();
        assert_eq!(
            resolved.date_time(),
            Some(IsoDateTime::new(
                IsoDate::new(2012, 6, 30).unwrap(),
                IsoTime::new(11, 0, 0, 0).unwrap()
            ))
        );
    }
}
