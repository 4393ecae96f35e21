//! The formatter and the resources it formats with.

use alloc::{format, string::String, sync::Arc, vec, vec::Vec};
use core::fmt;

use icu_locale::{locale, Locale};

use super::{
    context::{abbreviate, ParseContext, ParseFailure, PrintContext},
    CompositePrinterParser, DateTimeFormatterBuilder, DecimalStyle, Parsed, ResolvedTemporal,
    SignStyle,
};
use crate::{
    cache::FormatCaches,
    chronology::{Chronology, ResolverStyle, ISO_CHRONOLOGY},
    fields::{ChronoField, IsoField},
    offset::ZoneId,
    provider::{CompiledZoneRulesProvider, DefaultTextProvider, TextProvider, ZoneRulesProvider},
    temporal::{Instant, TemporalAccessor, ZonedDateTime},
    TemporalError, TemporalResult,
};

/// The data a formatter looks up while formatting and parsing.
///
/// Cloning shares the providers and the caches.
#[derive(Debug, Clone)]
pub struct FormatResources {
    /// Localized texts and patterns.
    pub text: Arc<dyn TextProvider>,
    /// The zone rules that zone ids resolve to.
    pub zones: Arc<dyn ZoneRulesProvider>,
    /// Values derived from the providers, kept between calls.
    pub caches: Arc<FormatCaches>,
    /// The chronologies a chronology id can parse to.
    pub chronologies: Vec<&'static dyn Chronology>,
}

impl Default for FormatResources {
    fn default() -> Self {
        Self {
            text: Arc::new(DefaultTextProvider),
            zones: Arc::new(CompiledZoneRulesProvider::default()),
            caches: Arc::new(FormatCaches::new()),
            chronologies: vec![&ISO_CHRONOLOGY],
        }
    }
}

impl FormatResources {
    /// Uses another text provider, with fresh caches.
    #[must_use]
    pub fn with_text(mut self, text: Arc<dyn TextProvider>) -> Self {
        self.text = text;
        self.caches = Arc::new(FormatCaches::new());
        self
    }

    /// Uses other zone rules, with fresh caches.
    #[must_use]
    pub fn with_zones(mut self, zones: Arc<dyn ZoneRulesProvider>) -> Self {
        self.zones = zones;
        self.caches = Arc::new(FormatCaches::new());
        self
    }

    #[must_use]
    pub fn with_chronologies(mut self, chronologies: Vec<&'static dyn Chronology>) -> Self {
        self.chronologies = chronologies;
        self
    }

    /// Shares caches with other resources using the same providers.
    #[must_use]
    pub fn with_caches(mut self, caches: Arc<FormatCaches>) -> Self {
        self.caches = caches;
        self
    }
}

/// The position of a parse in its text.
///
/// The index is where parsing starts and, after a successful parse, where
/// it stopped. After a failed parse the error index is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsePosition {
    index: usize,
    error_index: Option<usize>,
}

impl ParsePosition {
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            error_index: None,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub const fn error_index(&self) -> Option<usize> {
        self.error_index
    }

    pub fn set_error_index(&mut self, error_index: Option<usize>) {
        self.error_index = error_index;
    }
}

/// Formats temporals to text and parses text to temporals.
///
/// A formatter is immutable, the `with_*` methods return a changed copy.
/// It can be shared between threads, each call keeps its state in a
/// context of its own.
///
/// ```rust
/// use temporal_format::{format::DateTimeFormatter, iso::{IsoDate, IsoDateTime, IsoTime}};
///
/// let formatter = DateTimeFormatter::iso_local_date_time();
/// let date_time = IsoDateTime::new(
///     IsoDate::new(2012, 6, 30).unwrap(),
///     IsoTime::new(12, 30, 40, 0).unwrap(),
/// );
/// assert_eq!(formatter.format(&date_time).unwrap(), "2012-06-30T12:30:40");
/// ```
#[derive(Clone)]
pub struct DateTimeFormatter {
    printer_parser: CompositePrinterParser,
    locale: Locale,
    decimal_style: DecimalStyle,
    resolver_style: ResolverStyle,
    chronology: Option<&'static dyn Chronology>,
    zone: Option<ZoneId>,
    resources: FormatResources,
}

impl fmt::Debug for DateTimeFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeFormatter")
            .field("printer_parser", &format_args!("{}", self.printer_parser))
            .field("locale", &self.locale)
            .field("resolver_style", &self.resolver_style)
            .field("chronology", &self.chronology.map(|c| c.id()))
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DateTimeFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = format!("{}", self.printer_parser);
        // Drop the outer parentheses of the root sequence.
        let inner = description
            .strip_prefix('(')
            .and_then(|d| d.strip_suffix(')'))
            .unwrap_or(&description);
        f.write_str(inner)
    }
}

impl DateTimeFormatter {
    pub(crate) fn new(printer_parser: CompositePrinterParser) -> Self {
        Self {
            printer_parser,
            locale: locale!("und"),
            decimal_style: DecimalStyle::STANDARD,
            resolver_style: ResolverStyle::Smart,
            chronology: None,
            zone: None,
            resources: FormatResources::default(),
        }
    }

    /// A formatter for a pattern, see
    /// [`DateTimeFormatterBuilder::append_pattern`].
    pub fn of_pattern(pattern: &str) -> TemporalResult<Self> {
        Ok(DateTimeFormatterBuilder::new()
            .append_pattern(pattern)?
            .to_formatter())
    }

    /// A formatter for a pattern, using a locale.
    pub fn of_pattern_with_locale(pattern: &str, locale: Locale) -> TemporalResult<Self> {
        Ok(Self::of_pattern(pattern)?.with_locale(locale))
    }

    // ==== Settings ====

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn decimal_style(&self) -> DecimalStyle {
        self.decimal_style
    }

    pub fn resolver_style(&self) -> ResolverStyle {
        self.resolver_style
    }

    /// The chronology that overrides the chronology of the text.
    pub fn chronology(&self) -> Option<&'static dyn Chronology> {
        self.chronology
    }

    /// The zone that overrides the zone of the temporal or the text.
    pub fn zone(&self) -> Option<&ZoneId> {
        self.zone.as_ref()
    }

    pub fn resources(&self) -> &FormatResources {
        &self.resources
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_decimal_style(mut self, decimal_style: DecimalStyle) -> Self {
        self.decimal_style = decimal_style;
        self
    }

    #[must_use]
    pub fn with_resolver_style(mut self, resolver_style: ResolverStyle) -> Self {
        self.resolver_style = resolver_style;
        self
    }

    #[must_use]
    pub fn with_chronology(mut self, chronology: &'static dyn Chronology) -> Self {
        self.chronology = Some(chronology);
        self
    }

    /// Formats in `zone`, and resolves parsed text without a zone in it.
    #[must_use]
    pub fn with_zone(mut self, zone: ZoneId) -> Self {
        self.zone = Some(zone);
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: FormatResources) -> Self {
        self.resources = resources;
        self
    }

    /// The printer-parsers of this formatter as one sequence.
    pub fn to_printer_parser(&self, optional: bool) -> CompositePrinterParser {
        self.printer_parser.with_optional(optional)
    }

    // ==== Formatting ====

    /// Formats a temporal.
    pub fn format(&self, temporal: &dyn TemporalAccessor) -> TemporalResult<String> {
        let mut buf = String::with_capacity(32);
        self.format_to(temporal, &mut buf)?;
        Ok(buf)
    }

    /// Formats a temporal, appending to `buf`.
    ///
    /// Nothing is appended when formatting fails.
    pub fn format_to(&self, temporal: &dyn TemporalAccessor, buf: &mut String) -> TemporalResult<()> {
        let length = buf.len();
        let result = match self.zoned(temporal)? {
            Some(zoned) => self.format_unzoned(&zoned, buf),
            None => self.format_unzoned(temporal, buf),
        };
        if result.is_err() {
            buf.truncate(length);
        }
        result
    }

    fn format_unzoned(&self, temporal: &dyn TemporalAccessor, buf: &mut String) -> TemporalResult<()> {
        let mut context = PrintContext::new(temporal, self);
        self.printer_parser.format(&mut context, buf).map(|_| ())
    }

    /// The temporal moved to the override zone, if there is one and the
    /// temporal is an instant.
    fn zoned(&self, temporal: &dyn TemporalAccessor) -> TemporalResult<Option<ZonedDateTime>> {
        let Some(zone) = &self.zone else {
            return Ok(None);
        };
        if temporal.zone().as_ref() == Some(zone)
            || !temporal.is_supported(ChronoField::InstantSeconds.into())
        {
            return Ok(None);
        }
        let seconds = temporal.get_long(ChronoField::InstantSeconds.into())?;
        let nanos = if temporal.is_supported(ChronoField::NanoOfSecond.into()) {
            temporal.get_long(ChronoField::NanoOfSecond.into())?
        } else {
            0
        };
        let nanos = u32::try_from(nanos)
            .map_err(|_| TemporalError::range().with_message("Invalid nanosecond value."))?;
        let instant = Instant::new(seconds, nanos)?;
        ZonedDateTime::from_instant(instant, zone.clone(), self.resources.zones.as_ref()).map(Some)
    }

    // ==== Parsing ====

    /// Parses and resolves the whole of `text`.
    ///
    /// Fails with a syntax error carrying the index at which the text
    /// could not be parsed, or at which unparsed text starts.
    pub fn parse(&self, text: &str) -> TemporalResult<ResolvedTemporal> {
        let mut position = ParsePosition::new(0);
        let parsed = self.parse_to_parsed(text, &mut position)?;
        if let Some(error_index) = position.error_index {
            return Err(TemporalError::syntax()
                .with_message(format!(
                    "Text '{}' could not be parsed at index {error_index}",
                    abbreviate(text)
                ))
                .with_error_index(error_index));
        }
        let parsed = match parsed {
            Some(parsed) if position.index >= text.len() => parsed,
            _ => {
                return Err(TemporalError::syntax()
                    .with_message(format!(
                        "Text '{}' could not be parsed, unparsed text found at index {}",
                        abbreviate(text),
                        position.index
                    ))
                    .with_error_index(position.index))
            }
        };
        self.resolve(text, parsed)
    }

    /// Parses and resolves `text` from the index of `position`, which need
    /// not reach the end of the text.
    ///
    /// On success the index of `position` is moved past the parsed text.
    pub fn parse_with_position(
        &self,
        text: &str,
        position: &mut ParsePosition,
    ) -> TemporalResult<ResolvedTemporal> {
        match self.parse_to_parsed(text, position)? {
            Some(parsed) => self.resolve(text, parsed),
            None => {
                let error_index = position.error_index.unwrap_or(position.index);
                Err(TemporalError::syntax()
                    .with_message(format!(
                        "Text '{}' could not be parsed at index {error_index}",
                        abbreviate(text)
                    ))
                    .with_error_index(error_index))
            }
        }
    }

    /// Parses `text` from the index of `position` into field values,
    /// without resolving them.
    ///
    /// Returns `None` and sets the error index of `position` if the text
    /// does not match.
    pub fn parse_unresolved(&self, text: &str, position: &mut ParsePosition) -> Option<Parsed> {
        let start = position.index;
        match self.parse_to_parsed(text, position) {
            Ok(parsed) => parsed,
            Err(err) => {
                position.error_index = Some(err.error_index().unwrap_or(start));
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn parse_unresolved_at(&self, text: &str, index: usize) -> Option<Parsed> {
        self.parse_unresolved(text, &mut ParsePosition::new(index))
    }

    fn parse_to_parsed(&self, text: &str, position: &mut ParsePosition) -> TemporalResult<Option<Parsed>> {
        if !text.is_char_boundary(position.index) {
            return Err(TemporalError::range().with_message(format!(
                "Parse index {} is not a character position in the text",
                position.index
            )));
        }
        let mut context = ParseContext::new(self);
        match self.printer_parser.parse(&mut context, text, position.index) {
            Ok(end) => {
                position.index = end;
                position.error_index = None;
                Ok(Some(context.into_parsed()))
            }
            Err(ParseFailure::Mismatch(error_index)) => {
                position.error_index = Some(error_index);
                Ok(None)
            }
            Err(ParseFailure::Error(err)) => Err(err),
        }
    }

    fn resolve(&self, text: &str, parsed: Parsed) -> TemporalResult<ResolvedTemporal> {
        parsed
            .resolve(
                self.resolver_style,
                self.zone.as_ref(),
                self.chronology,
                self.resources.zones.as_ref(),
            )
            .map_err(|err| {
                let message = format!(
                    "Text '{}' could not be parsed: {}",
                    abbreviate(text),
                    err.message()
                );
                err.with_message(message)
            })
    }

    // ==== Predefined formatters ====

    fn iso(builder: DateTimeFormatterBuilder) -> Self {
        builder
            .to_formatter()
            .with_resolver_style(ResolverStyle::Strict)
            .with_chronology(&ISO_CHRONOLOGY)
    }

    fn iso_local_date_builder() -> TemporalResult<DateTimeFormatterBuilder> {
        Ok(DateTimeFormatterBuilder::new()
            .parse_strict()
            .append_value_with(ChronoField::Year, 4, 10, SignStyle::ExceedsPad)?
            .append_literal('-')
            .append_value_width(ChronoField::MonthOfYear, 2)?
            .append_literal('-')
            .append_value_width(ChronoField::DayOfMonth, 2)?)
    }

    fn iso_local_time_builder() -> TemporalResult<DateTimeFormatterBuilder> {
        DateTimeFormatterBuilder::new()
            .parse_strict()
            .append_value_width(ChronoField::HourOfDay, 2)?
            .append_literal(':')
            .append_value_width(ChronoField::MinuteOfHour, 2)?
            .optional_start()
            .append_literal(':')
            .append_value_width(ChronoField::SecondOfMinute, 2)?
            .optional_start()
            .append_fraction(ChronoField::NanoOfSecond, 0, 9, true)
    }

    fn iso_local_date_time_builder() -> TemporalResult<DateTimeFormatterBuilder> {
        let date = Self::iso_local_date_builder()?.to_formatter();
        let time = Self::iso_local_time_builder()?.to_formatter();
        Ok(DateTimeFormatterBuilder::new()
            .parse_case_insensitive()
            .append_formatter(&date)
            .append_literal('T')
            .append_formatter(&time))
    }

    fn iso_offset_date_time_builder() -> TemporalResult<DateTimeFormatterBuilder> {
        let local = Self::iso_local_date_time_builder()?.to_formatter();
        Ok(DateTimeFormatterBuilder::new()
            .parse_case_insensitive()
            .append_formatter(&local)
            .parse_lenient()
            .append_offset_id()
            .parse_strict())
    }

    fn build_iso(
        build: impl FnOnce() -> TemporalResult<DateTimeFormatterBuilder>,
    ) -> Self {
        match build() {
            Ok(builder) => Self::iso(builder),
            Err(_) => Self::new(CompositePrinterParser::new(Vec::new(), false)),
        }
    }

    /// `2011-12-03`
    pub fn iso_local_date() -> Self {
        Self::build_iso(Self::iso_local_date_builder)
    }

    /// `10:15` or `10:15:30.5`
    pub fn iso_local_time() -> Self {
        Self::build_iso(Self::iso_local_time_builder)
    }

    /// `2011-12-03T10:15:30`
    pub fn iso_local_date_time() -> Self {
        Self::build_iso(Self::iso_local_date_time_builder)
    }

    /// `2011-12-03T10:15:30+01:00`
    pub fn iso_offset_date_time() -> Self {
        Self::build_iso(Self::iso_offset_date_time_builder)
    }

    /// `2011-12-03T10:15:30+01:00[Europe/Paris]`
    pub fn iso_zoned_date_time() -> Self {
        Self::build_iso(|| {
            let offset = Self::iso_offset_date_time_builder()?.to_formatter();
            Ok(DateTimeFormatterBuilder::new()
                .append_formatter(&offset)
                .optional_start()
                .append_literal('[')
                .parse_case_sensitive()
                .append_zone_region_id()
                .append_literal(']'))
        })
    }

    /// `2011-12-03T10:15:30Z`
    pub fn iso_instant() -> Self {
        Self::iso(
            DateTimeFormatterBuilder::new()
                .parse_case_insensitive()
                .parse_strict()
                .append_instant(),
        )
    }

    /// `2012-337`, with an optional offset.
    pub fn iso_ordinal_date() -> Self {
        Self::build_iso(|| {
            Ok(DateTimeFormatterBuilder::new()
                .parse_case_insensitive()
                .parse_strict()
                .append_value_with(ChronoField::Year, 4, 10, SignStyle::ExceedsPad)?
                .append_literal('-')
                .append_value_width(ChronoField::DayOfYear, 3)?
                .optional_start()
                .append_offset_id())
        })
    }

    /// `2012-W48-6`, with an optional offset.
    pub fn iso_week_date() -> Self {
        Self::build_iso(|| {
            Ok(DateTimeFormatterBuilder::new()
                .parse_case_insensitive()
                .parse_strict()
                .append_value_with(IsoField::WeekBasedYear, 4, 10, SignStyle::ExceedsPad)?
                .append_literal_str("-W")
                .append_value_width(IsoField::WeekOfWeekBasedYear, 2)?
                .append_literal('-')
                .append_value_width(ChronoField::DayOfWeek, 1)?
                .optional_start()
                .append_offset_id())
        })
    }

    /// `20111203`, with an optional offset.
    pub fn basic_iso_date() -> Self {
        Self::build_iso(|| {
            DateTimeFormatterBuilder::new()
                .parse_case_insensitive()
                .parse_strict()
                .append_value_width(ChronoField::Year, 4)?
                .append_value_width(ChronoField::MonthOfYear, 2)?
                .append_value_width(ChronoField::DayOfMonth, 2)?
                .optional_start()
                .parse_lenient()
                .append_offset("+HHMMss", "Z")
                .map(DateTimeFormatterBuilder::parse_strict)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        iso::{IsoDate, IsoDateTime, IsoTime},
        offset::ZoneOffset,
        temporal::OffsetDateTime,
        ErrorKind,
    };

    fn date_time() -> IsoDateTime {
        IsoDateTime::new(
            IsoDate::new(2012, 6, 30).unwrap(),
            IsoTime::new(12, 30, 40, 500_000_000).unwrap(),
        )
    }

    #[test]
    fn iso_local() {
        let date = IsoDate::new(2012, 6, 30).unwrap();
        assert_eq!(DateTimeFormatter::iso_local_date().format(&date).unwrap(), "2012-06-30");
        assert_eq!(
            DateTimeFormatter::iso_local_time()
                .format(&IsoTime::new(13, 5, 0, 0).unwrap())
                .unwrap(),
            "13:05:00"
        );
        assert_eq!(
            DateTimeFormatter::iso_local_date_time().format(&date_time()).unwrap(),
            "2012-06-30T12:30:40.5"
        );

        let resolved = DateTimeFormatter::iso_local_date_time()
            .parse("2012-06-30t12:30")
            .unwrap();
        assert_eq!(resolved.date(), Some(date));
        assert_eq!(resolved.time(), Some(IsoTime::new(12, 30, 0, 0).unwrap()));
    }

    #[test]
    fn iso_offset() {
        let offset = ZoneOffset::from_total_seconds(7200).unwrap();
        let odt = OffsetDateTime::new(date_time(), offset);
        let formatter = DateTimeFormatter::iso_offset_date_time();
        assert_eq!(formatter.format(&odt).unwrap(), "2012-06-30T12:30:40.5+02:00");

        let resolved = formatter.parse("2012-06-30T12:30:40.5+02:00").unwrap();
        assert_eq!(resolved.date_time(), Some(date_time()));
        assert_eq!(resolved.offset(), Some(offset));

        let utc = OffsetDateTime::new(date_time(), ZoneOffset::UTC);
        assert_eq!(
            DateTimeFormatter::iso_zoned_date_time().format(&utc).unwrap(),
            "2012-06-30T12:30:40.5Z"
        );
    }

    #[test]
    fn other_iso_dates() {
        let date = IsoDate::new(2012, 12, 3).unwrap();
        assert_eq!(DateTimeFormatter::basic_iso_date().format(&date).unwrap(), "20121203");
        assert_eq!(DateTimeFormatter::iso_ordinal_date().format(&date).unwrap(), "2012-338");
        assert_eq!(DateTimeFormatter::iso_week_date().format(&date).unwrap(), "2012-W49-1");

        let resolved = DateTimeFormatter::basic_iso_date().parse("20121203").unwrap();
        assert_eq!(resolved.date(), Some(date));
        let resolved = DateTimeFormatter::iso_ordinal_date().parse("2012-338").unwrap();
        assert_eq!(resolved.date(), Some(date));
    }

    #[test]
    fn parse_errors() {
        let formatter = DateTimeFormatter::iso_local_date();
        let err = formatter.parse("2012-6-30").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.error_index(), Some(5));
        assert_eq!(err.message(), "Text '2012-6-30' could not be parsed at index 5");

        let err = formatter.parse("2012-06-30X").unwrap_err();
        assert_eq!(err.error_index(), Some(10));
        assert_eq!(
            err.message(),
            "Text '2012-06-30X' could not be parsed, unparsed text found at index 10"
        );

        let err = formatter.parse("2012-02-30").unwrap_err();
        assert!(err.message().starts_with("Text '2012-02-30' could not be parsed: "));
    }

    #[test]
    fn parse_with_position_stops_early() {
        let formatter = DateTimeFormatter::iso_local_date();
        let mut position = ParsePosition::new(3);
        let resolved = formatter
            .parse_with_position("at 2012-06-30 noon", &mut position)
            .unwrap();
        assert_eq!(resolved.date(), IsoDate::new(2012, 6, 30).ok());
        assert_eq!(position.index(), 13);

        let mut outside = ParsePosition::new(40);
        let err = formatter
            .parse_with_position("2012-06-30", &mut outside)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Range);
    }

    #[test]
    fn format_failure_appends_nothing() {
        let formatter = DateTimeFormatter::iso_local_date_time();
        let mut buf = String::from("x");
        assert!(formatter
            .format_to(&IsoDate::new(2012, 6, 30).unwrap(), &mut buf)
            .is_err());
        assert_eq!(buf, "x");
    }

    #[test]
    fn format_with_zone_override() {
        let formatter = DateTimeFormatter::of_pattern("yyyy-MM-dd HH:mm xxx")
            .unwrap()
            .with_zone(ZoneOffset::from_total_seconds(-3600).unwrap().into());
        let instant = Instant::from_epoch_seconds(1_341_059_440);
        assert_eq!(formatter.format(&instant).unwrap(), "2012-06-30 11:30 -01:00");
    }

    #[test]
    fn shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DateTimeFormatter>();
        assert_send_sync::<FormatResources>();

        let formatter = Arc::new(DateTimeFormatter::iso_local_date_time());
        let handles: Vec<_> = (1..=4_u8)
            .map(|day| {
                let formatter = formatter.clone();
                std::thread::spawn(move || {
                    let text = format!("2012-06-0{day}T12:30:40");
                    formatter.parse(&text).map(|resolved| resolved.date_time())
                })
            })
            .collect();
        for (day, handle) in (1..=4_u8).zip(handles) {
            let expected = IsoDateTime::new(
                IsoDate::new(2012, 6, day).unwrap(),
                IsoTime::new(12, 30, 40, 0).unwrap(),
            );
            assert_eq!(handle.join().unwrap().unwrap(), Some(expected));
        }
    }

    #[test]
    fn display() {
        let formatter = DateTimeFormatter::of_pattern("HH:mm").unwrap();
        assert_eq!(
            alloc::string::ToString::to_string(&formatter),
            "Value(HourOfDay,2)':'Value(MinuteOfHour,2)"
        );
    }
}
