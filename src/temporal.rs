//! Read access to the fields of a temporal, and the temporals that
//! the formatter prints and the parser produces.

use alloc::format;

use crate::{
    chronology::{Chronology, ISO_CHRONOLOGY},
    fields::{ChronoField, Field},
    iso::{IsoDate, IsoDateTime, IsoTime, NANOS_PER_SECOND},
    offset::{ZoneId, ZoneOffset},
    provider::ZoneRulesProvider,
    range::ValueRange,
    TemporalError, TemporalResult,
};

/// Read-only access to the fields of a date, time, instant or any
/// combination of them.
pub trait TemporalAccessor {
    /// Whether the field can be read with [`TemporalAccessor::get_long`].
    fn is_supported(&self, field: Field) -> bool;

    /// Returns the value of a field, or an error if it is unsupported.
    fn get_long(&self, field: Field) -> TemporalResult<i64>;

    /// The range of valid values for the field.
    fn range(&self, field: Field) -> ValueRange {
        field.range()
    }

    /// The zone, when this is a zoned temporal.
    fn zone(&self) -> Option<ZoneId> {
        None
    }

    /// The offset from UTC, when it is known.
    fn offset(&self) -> Option<ZoneOffset> {
        None
    }

    /// The chronology of the date part.
    fn chronology(&self) -> Option<&'static dyn Chronology> {
        None
    }

    /// The local ISO date, when there is one.
    fn local_date(&self) -> Option<IsoDate> {
        None
    }
}

pub(crate) fn unsupported(field: Field) -> TemporalError {
    TemporalError::unsupported().with_message(format!("Unsupported field: {field}"))
}

// ==== ISO records ====

impl TemporalAccessor for IsoDate {
    fn is_supported(&self, field: Field) -> bool {
        field.is_date_based()
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        IsoDate::get_long(self, field)
    }

    fn range(&self, field: Field) -> ValueRange {
        match field {
            Field::Chrono(ChronoField::DayOfMonth) => {
                ValueRange::of(1, i64::from(self.length_of_month()))
            }
            Field::Chrono(ChronoField::DayOfYear) => {
                ValueRange::of(1, i64::from(self.length_of_year()))
            }
            _ => field.range(),
        }
    }

    fn chronology(&self) -> Option<&'static dyn Chronology> {
        Some(&ISO_CHRONOLOGY)
    }

    fn local_date(&self) -> Option<IsoDate> {
        Some(*self)
    }
}

impl TemporalAccessor for IsoTime {
    fn is_supported(&self, field: Field) -> bool {
        field.is_time_based()
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        IsoTime::get_long(self, field)
    }
}

impl TemporalAccessor for IsoDateTime {
    fn is_supported(&self, field: Field) -> bool {
        field.is_date_based() || field.is_time_based()
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        if field.is_time_based() {
            return self.time.get_long(field);
        }
        self.date.get_long(field)
    }

    fn range(&self, field: Field) -> ValueRange {
        self.date.range(field)
    }

    fn chronology(&self) -> Option<&'static dyn Chronology> {
        Some(&ISO_CHRONOLOGY)
    }

    fn local_date(&self) -> Option<IsoDate> {
        Some(self.date)
    }
}

// ==== Instant ====

/// An instant on the UTC time-line: seconds from the epoch plus a
/// nanosecond adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
}

impl Instant {
    pub const EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    pub fn new(epoch_seconds: i64, nanos: u32) -> TemporalResult<Self> {
        if i64::from(nanos) >= NANOS_PER_SECOND {
            return Err(TemporalError::range().with_message("Nanoseconds must be below 10^9."));
        }
        Ok(Self {
            seconds: epoch_seconds,
            nanos,
        })
    }

    pub const fn from_epoch_seconds(epoch_seconds: i64) -> Self {
        Self {
            seconds: epoch_seconds,
            nanos: 0,
        }
    }

    pub const fn epoch_seconds(&self) -> i64 {
        self.seconds
    }

    pub const fn nanos(&self) -> u32 {
        self.nanos
    }
}

impl TemporalAccessor for Instant {
    fn is_supported(&self, field: Field) -> bool {
        matches!(
            field,
            Field::Chrono(
                ChronoField::InstantSeconds
                    | ChronoField::NanoOfSecond
                    | ChronoField::MicroOfSecond
                    | ChronoField::MilliOfSecond
            )
        )
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        let nanos = i64::from(self.nanos);
        match field {
            Field::Chrono(ChronoField::InstantSeconds) => Ok(self.seconds),
            Field::Chrono(ChronoField::NanoOfSecond) => Ok(nanos),
            Field::Chrono(ChronoField::MicroOfSecond) => Ok(nanos / 1_000),
            Field::Chrono(ChronoField::MilliOfSecond) => Ok(nanos / 1_000_000),
            _ => Err(unsupported(field)),
        }
    }
}

// ==== OffsetDateTime ====

/// A local date-time with a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    date_time: IsoDateTime,
    offset: ZoneOffset,
}

impl OffsetDateTime {
    pub const fn new(date_time: IsoDateTime, offset: ZoneOffset) -> Self {
        Self { date_time, offset }
    }

    pub fn from_instant(instant: Instant, offset: ZoneOffset) -> TemporalResult<Self> {
        let date_time = IsoDateTime::from_epoch_seconds(
            instant.seconds,
            instant.nanos,
            offset.total_seconds(),
        )?;
        Ok(Self { date_time, offset })
    }

    pub const fn date_time(&self) -> IsoDateTime {
        self.date_time
    }

    pub const fn offset(&self) -> ZoneOffset {
        self.offset
    }

    pub fn to_instant(&self) -> Instant {
        Instant {
            seconds: self.date_time.to_epoch_seconds(self.offset.total_seconds()),
            nanos: self.date_time.time.nanosecond,
        }
    }
}

fn zoned_get_long(
    date_time: &IsoDateTime,
    offset: ZoneOffset,
    field: Field,
) -> TemporalResult<i64> {
    match field {
        Field::Chrono(ChronoField::InstantSeconds) => {
            Ok(date_time.to_epoch_seconds(offset.total_seconds()))
        }
        Field::Chrono(ChronoField::OffsetSeconds) => Ok(i64::from(offset.total_seconds())),
        _ => date_time.get_long(field),
    }
}

fn zoned_supports(field: Field) -> bool {
    field.is_date_based()
        || field.is_time_based()
        || field == ChronoField::InstantSeconds
        || field == ChronoField::OffsetSeconds
}

impl TemporalAccessor for OffsetDateTime {
    fn is_supported(&self, field: Field) -> bool {
        zoned_supports(field)
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        zoned_get_long(&self.date_time, self.offset, field)
    }

    fn offset(&self) -> Option<ZoneOffset> {
        Some(self.offset)
    }

    fn chronology(&self) -> Option<&'static dyn Chronology> {
        Some(&ISO_CHRONOLOGY)
    }

    fn local_date(&self) -> Option<IsoDate> {
        Some(self.date_time.date)
    }
}

// ==== ZonedDateTime ====

/// A local date-time in a zone, with the offset the zone had at that
/// local date-time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    date_time: IsoDateTime,
    offset: ZoneOffset,
    zone: ZoneId,
}

impl ZonedDateTime {
    /// Creates a zoned date-time from an instant.
    pub fn from_instant(
        instant: Instant,
        zone: ZoneId,
        provider: &dyn ZoneRulesProvider,
    ) -> TemporalResult<Self> {
        let offset = zone.offset_at(instant.seconds, provider)?;
        let date_time = IsoDateTime::from_epoch_seconds(
            instant.seconds,
            instant.nanos,
            offset.total_seconds(),
        )?;
        Ok(Self {
            date_time,
            offset,
            zone,
        })
    }

    /// Creates a zoned date-time from a local date-time.
    ///
    /// In an overlap the earlier offset is used. In a gap the local
    /// date-time is moved later by the length of the gap.
    pub fn from_local(
        date_time: IsoDateTime,
        zone: ZoneId,
        provider: &dyn ZoneRulesProvider,
    ) -> TemporalResult<Self> {
        if let Some(offset) = zone.fixed_offset() {
            return Ok(Self {
                date_time,
                offset,
                zone,
            });
        }
        let rules = zone.rules(provider)?;
        let local = date_time.to_epoch_seconds(0);
        let early = rules.offset_at(local.saturating_sub(86_400));
        let late = rules.offset_at(local.saturating_add(86_400));
        let is_valid = |offset: i64| rules.offset_at(local - offset) == offset;
        let epoch_seconds = match (is_valid(early), is_valid(late)) {
            (true, true) => local - early.max(late),
            (true, false) => local - early,
            (false, true) => local - late,
            (false, false) => local - early.min(late),
        };
        Self::from_instant(
            Instant::new(epoch_seconds, date_time.time.nanosecond)?,
            zone,
            provider,
        )
    }

    pub const fn date_time(&self) -> IsoDateTime {
        self.date_time
    }

    pub const fn offset(&self) -> ZoneOffset {
        self.offset
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn to_instant(&self) -> Instant {
        OffsetDateTime::new(self.date_time, self.offset).to_instant()
    }
}

impl TemporalAccessor for ZonedDateTime {
    fn is_supported(&self, field: Field) -> bool {
        zoned_supports(field)
    }

    fn get_long(&self, field: Field) -> TemporalResult<i64> {
        zoned_get_long(&self.date_time, self.offset, field)
    }

    fn zone(&self) -> Option<ZoneId> {
        Some(self.zone.clone())
    }

    fn offset(&self) -> Option<ZoneOffset> {
        Some(self.offset)
    }

    fn chronology(&self) -> Option<&'static dyn Chronology> {
        Some(&ISO_CHRONOLOGY)
    }

    fn local_date(&self) -> Option<IsoDate> {
        Some(self.date_time.date)
    }
}
