//! Printer-parsers that depend on the chronology or the locale: the
//! chronology id, localized formats and locale week fields.

use alloc::string::String;
use core::fmt::Write;

use writeable::Writeable;

use super::{
    composite::CompositePrinterParser,
    context::{ParseContext, ParseFailure, ParseResult, PrintContext},
    number::{NumberPrinterParser, ReducedBase, ReducedPrinterParser},
    DateTimeFormatterBuilder, PrinterParser, SignStyle,
};
use crate::{
    chronology::Chronology,
    fields::WeekDefinition,
    iso::IsoDate,
    provider::FormatStyle,
    TemporalError, TemporalResult,
};

// ==== Chronology id ====

/// Prints the chronology id, and parses the longest known id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChronologyIdPrinterParser;

impl ChronologyIdPrinterParser {
    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let chronology = context.temporal().chronology();
        let Some(chronology) = context.require(chronology, "Chronology")? else {
            return Ok(false);
        };
        buf.push_str(&chronology.id());
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        if position > text.len() {
            return Err(ParseFailure::Mismatch(position));
        }
        let mut best: Option<(&'static dyn Chronology, usize)> = None;
        for chronology in context.resources().chronologies.iter().copied() {
            let id = chronology.id();
            let longer = best.map_or(true, |(known, _)| id.len() > known.id().len());
            if !longer {
                continue;
            }
            if let Some(end) = context.sub_sequence_equals(text, position, &id) {
                best = Some((chronology, end));
            }
        }
        let Some((chronology, end)) = best else {
            return Err(ParseFailure::Mismatch(position));
        };
        context.set_parsed_chronology(chronology)?;
        Ok(end)
    }
}

impl Writeable for ChronologyIdPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str("ChronologyId()")
    }
}

// ==== Localized formats ====

/// Prints and parses with the locale's format for a date style, a time
/// style or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedPrinterParser {
    date_style: Option<FormatStyle>,
    time_style: Option<FormatStyle>,
}

impl LocalizedPrinterParser {
    pub(crate) fn new(
        date_style: Option<FormatStyle>,
        time_style: Option<FormatStyle>,
    ) -> TemporalResult<Self> {
        if date_style.is_none() && time_style.is_none() {
            return Err(TemporalError::r#type()
                .with_message("Either the date or time style must be non-null"));
        }
        Ok(Self {
            date_style,
            time_style,
        })
    }

    /// The printer-parser of the locale's pattern, built once per key.
    fn printer_parser(
        &self,
        resources: &super::FormatResources,
        chronology: &dyn Chronology,
        locale: &icu_locale::Locale,
    ) -> TemporalResult<alloc::sync::Arc<CompositePrinterParser>> {
        let key = (self.date_style, self.time_style, chronology.id(), locale.clone());
        resources.caches.localized.get_or_insert_with(&key, || {
            let pattern = resources.text.localized_pattern(
                self.date_style,
                self.time_style,
                &chronology.id(),
                locale,
            )?;
            let formatter = DateTimeFormatterBuilder::new()
                .append_pattern(&pattern)?
                .to_formatter();
            Ok(formatter.to_printer_parser(false))
        })
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let pp = self.printer_parser(context.resources(), context.chronology(), context.locale())?;
        pp.format(context, buf)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let pp = self.printer_parser(
            context.resources(),
            context.effective_chronology(),
            context.locale(),
        )?;
        pp.parse(context, text, position)
    }
}

impl Writeable for LocalizedPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str("Localized(")?;
        if let Some(style) = self.date_style {
            write!(sink, "{style}")?;
        }
        sink.write_char(',')?;
        if let Some(style) = self.time_style {
            write!(sink, "{style}")?;
        }
        sink.write_char(')')
    }
}

// ==== Week based fields ====

/// The base date of a two digit week based year.
const WEEK_BASED_YEAR_BASE: IsoDate = IsoDate {
    year: 2000,
    month: 1,
    day: 1,
};

/// Prints and parses one of the week fields of the locale, for the
/// pattern letters `Y`, `w`, `W`, `e` and `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBasedPrinterParser {
    letter: char,
    count: usize,
    max_width: usize,
    subsequent_width: i32,
}

impl WeekBasedPrinterParser {
    pub(crate) fn new(letter: char, count: usize, max_width: usize) -> Self {
        Self {
            letter,
            count,
            max_width,
            subsequent_width: 0,
        }
    }

    pub(crate) fn min_width(&self) -> usize {
        self.count
    }

    pub(crate) fn max_width(&self) -> usize {
        self.max_width
    }

    pub(crate) fn with_fixed_width(mut self) -> Self {
        self.subsequent_width = -1;
        self
    }

    pub(crate) fn with_subsequent_width(mut self, width: usize) -> Self {
        self.subsequent_width += width as i32;
        self
    }

    /// The numeric printer-parser for a week definition.
    fn printer_parser(&self, definition: WeekDefinition) -> TemporalResult<PrinterParser> {
        let field = match self.letter {
            'Y' => definition.week_based_year(),
            'w' => definition.week_of_week_based_year(),
            'W' => definition.week_of_month(),
            _ => definition.day_of_week(),
        };
        if self.letter == 'Y' && self.count == 2 {
            let mut reduced =
                ReducedPrinterParser::new(field, 2, 2, ReducedBase::Date(WEEK_BASED_YEAR_BASE))?;
            reduced.number.subsequent_width = self.subsequent_width;
            return Ok(PrinterParser::Reduced(reduced));
        }
        let mut number = if self.letter == 'Y' {
            let sign_style = if self.count < 4 {
                SignStyle::Normal
            } else {
                SignStyle::ExceedsPad
            };
            NumberPrinterParser::new(field, self.count, 19, sign_style)
        } else {
            NumberPrinterParser::new(field, self.count, self.max_width, SignStyle::NotNegative)
        };
        number.subsequent_width = self.subsequent_width;
        Ok(PrinterParser::Number(number))
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let definition = context.resources().text.week_definition(context.locale());
        self.printer_parser(definition)?.format(context, buf)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let definition = context.resources().text.week_definition(context.locale());
        self.printer_parser(definition)?.parse(context, text, position)
    }
}

impl Writeable for WeekBasedPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str("Localized(")?;
        match (self.letter, self.count) {
            ('Y', 1) => sink.write_str("WeekBasedYear")?,
            ('Y', 2) => sink.write_str("ReducedValue(WeekBasedYear,2,2,2000-01-01)")?,
            ('Y', count) => {
                let sign_style = if count < 4 {
                    SignStyle::Normal
                } else {
                    SignStyle::ExceedsPad
                };
                write!(sink, "WeekBasedYear,{count},19,{sign_style}")?;
            }
            (letter, count) => {
                let name = match letter {
                    'w' => "WeekOfWeekBasedYear",
                    'W' => "WeekOfMonth",
                    _ => "DayOfWeek",
                };
                write!(sink, "{name},{count}")?;
            }
        }
        sink.write_char(')')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chronology::{testing::SHIFTED_CHRONOLOGY, ISO_CHRONOLOGY},
        fields::ChronoField,
        format::{DateTimeFormatter, FormatResources, ParsePosition},
        iso::{IsoDateTime, IsoTime},
        temporal::OffsetDateTime,
        offset::ZoneOffset,
    };
    use alloc::vec;
    use icu_locale::locale;

    fn with_shifted(builder: DateTimeFormatterBuilder) -> DateTimeFormatter {
        builder.to_formatter().with_resources(
            FormatResources::default().with_chronologies(vec![&ISO_CHRONOLOGY, &SHIFTED_CHRONOLOGY]),
        )
    }

    fn reduced_year_then_ids(ids: usize) -> DateTimeFormatter {
        let mut builder = DateTimeFormatterBuilder::new()
            .append_value_reduced_with_base_date(
                ChronoField::Year,
                2,
                2,
                IsoDate::new(2000, 1, 1).unwrap(),
            )
            .unwrap();
        for _ in 0..ids {
            builder = builder.append_chronology_id();
        }
        with_shifted(builder)
    }

    #[test]
    fn chronology_id_longest_match() {
        let formatter = with_shifted(DateTimeFormatterBuilder::new().append_chronology_id());
        let mut position = ParsePosition::new(0);
        let parsed = formatter.parse_unresolved("Shifted!", &mut position).unwrap();
        assert_eq!(parsed.chronology().map(|c| c.id()), Some(SHIFTED_CHRONOLOGY.id()));
        assert_eq!(position.index(), 7);
        assert!(formatter.parse_unresolved_at("Julian", 0).is_none());
    }

    #[test]
    fn late_chronology_rebases_reduced_year() {
        let formatter = reduced_year_then_ids(0);
        let parsed = formatter.parse_unresolved_at("12", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::Year), Some(2012));

        let formatter = reduced_year_then_ids(1);
        let parsed = formatter.parse_unresolved_at("12Shifted", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::Year), Some(2612));
    }

    #[test]
    fn last_chronology_wins() {
        let formatter = reduced_year_then_ids(2);
        let parsed = formatter.parse_unresolved_at("12ShiftedISO", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::Year), Some(2012));
        let parsed = formatter.parse_unresolved_at("12ISOShifted", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::Year), Some(2612));
    }

    #[test]
    fn format_chronology_id() {
        let formatter = DateTimeFormatterBuilder::new()
            .append_chronology_id()
            .to_formatter();
        let date = IsoDate::new(2012, 6, 30).unwrap();
        assert_eq!(formatter.format(&date).unwrap(), "ISO");
        assert!(formatter.format(&IsoTime::new(1, 0, 0, 0).unwrap()).is_err());
    }

    #[test]
    fn localized_formats() {
        let date_time = IsoDateTime::new(
            IsoDate::new(2012, 6, 30).unwrap(),
            IsoTime::new(13, 5, 9, 0).unwrap(),
        );
        let short = DateTimeFormatterBuilder::new()
            .append_localized(Some(FormatStyle::Short), Some(FormatStyle::Short))
            .unwrap()
            .to_formatter();
        assert_eq!(short.format(&date_time).unwrap(), "6/30/12, 1:05 PM");
        let full = DateTimeFormatterBuilder::new()
            .append_localized(Some(FormatStyle::Full), None)
            .unwrap()
            .to_formatter();
        assert_eq!(full.format(&date_time).unwrap(), "Saturday, June 30, 2012");

        let parsed = short.parse_unresolved_at("6/30/12, 1:05 PM", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::MonthOfYear), Some(6));
        assert_eq!(parsed.fields().get(ChronoField::ClockHourOfAmPm), Some(1));
        assert_eq!(parsed.fields().get(ChronoField::AmPmOfDay), Some(1));

        // The pattern is built once.
        assert_eq!(short.resources().caches.localized.len(), 1);
        short.format(&date_time).unwrap();
        assert_eq!(short.resources().caches.localized.len(), 1);

        assert!(DateTimeFormatterBuilder::new().append_localized(None, None).is_err());
    }

    #[test]
    fn localized_time_with_zone_name() {
        let long = DateTimeFormatterBuilder::new()
            .append_localized(None, Some(FormatStyle::Long))
            .unwrap()
            .to_formatter();
        let date_time = OffsetDateTime::new(
            IsoDateTime::new(
                IsoDate::new(2012, 6, 30).unwrap(),
                IsoTime::new(9, 0, 0, 0).unwrap(),
            ),
            ZoneOffset::UTC,
        );
        // An offset is not a zone.
        assert!(long.format(&date_time).is_err());
    }

    #[test]
    fn week_fields() {
        let date = IsoDate::new(2012, 1, 1).unwrap();
        let iso = DateTimeFormatterBuilder::new()
            .append_pattern("YYYY-'W'ww-e")
            .unwrap()
            .to_formatter();
        // 2012-01-01 is the Sunday of the last ISO week of 2011.
        assert_eq!(iso.format(&date).unwrap(), "2011-W52-7");
        let us = iso.clone().with_locale(locale!("en-US"));
        assert_eq!(us.format(&date).unwrap(), "2012-W01-1");
        assert_eq!(
            DateTimeFormatterBuilder::new()
                .append_pattern("YY")
                .unwrap()
                .to_formatter()
                .format(&date)
                .unwrap(),
            "11"
        );
    }

    #[test]
    fn descriptions() {
        assert_eq!(
            WeekBasedPrinterParser::new('Y', 4, 19).write_to_string(),
            "Localized(WeekBasedYear,4,19,EXCEEDS_PAD)"
        );
        assert_eq!(
            WeekBasedPrinterParser::new('Y', 2, 2).write_to_string(),
            "Localized(ReducedValue(WeekBasedYear,2,2,2000-01-01))"
        );
        assert_eq!(
            WeekBasedPrinterParser::new('w', 2, 2).write_to_string(),
            "Localized(WeekOfWeekBasedYear,2)"
        );
        assert_eq!(
            LocalizedPrinterParser::new(Some(FormatStyle::Short), None)
                .unwrap()
                .write_to_string(),
            "Localized(SHORT,)"
        );
        assert_eq!(ChronologyIdPrinterParser.write_to_string(), "ChronologyId()");
    }
}
