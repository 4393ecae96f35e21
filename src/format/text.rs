//! Prints and parses a field as localized text.

use alloc::{collections::BTreeMap, string::String, sync::Arc, vec::Vec};
use core::fmt::Write;

use writeable::Writeable;

use super::{
    context::{ParseContext, ParseFailure, ParseResult, PrintContext},
    number::NumberPrinterParser,
    SignStyle,
};
use crate::{
    fields::Field,
    provider::{TextCandidates, TextStyle},
    TemporalResult,
};

/// Texts supplied when building a formatter, used for every locale.
#[derive(Debug, PartialEq, Eq)]
pub struct CustomTexts {
    texts: BTreeMap<i64, String>,
    candidates: TextCandidates,
}

impl CustomTexts {
    pub(crate) fn new(texts: BTreeMap<i64, String>) -> Self {
        let mut candidates: TextCandidates = Vec::new();
        let mut ambiguous: Vec<String> = Vec::new();
        for (value, text) in &texts {
            match candidates.iter().find(|(known, _)| known == text) {
                Some(_) => ambiguous.push(text.clone()),
                None => candidates.push((text.clone(), *value)),
            }
        }
        candidates.retain(|(text, _)| !ambiguous.contains(text));
        candidates.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        Self { texts, candidates }
    }
}

/// Where the texts of a [`TextPrinterParser`] come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// The text provider of the formatter.
    Provider,
    /// A fixed map of values to texts.
    Custom(Arc<CustomTexts>),
}

/// Prints a field as text, falling back to the number when there is no
/// text for the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrinterParser {
    field: Field,
    style: TextStyle,
    source: TextSource,
}

impl TextPrinterParser {
    pub(crate) fn new(field: Field, style: TextStyle, source: TextSource) -> Self {
        Self {
            field,
            style,
            source,
        }
    }

    fn number(&self) -> NumberPrinterParser {
        NumberPrinterParser::new(self.field, 1, 19, SignStyle::Normal)
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(value) = context.value(self.field)? else {
            return Ok(false);
        };
        let text = match &self.source {
            TextSource::Provider => {
                context
                    .resources()
                    .text
                    .text(self.field, value, self.style, context.locale())
            }
            TextSource::Custom(custom) => custom.texts.get(&value).cloned(),
        };
        match text {
            Some(text) => {
                buf.push_str(&text);
                Ok(true)
            }
            None => self.number().format(context, buf),
        }
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
        let style = context.is_strict().then_some(self.style);
        let provided;
        let candidates = match &self.source {
            TextSource::Provider => {
                provided = context.resources().text.text_candidates(
                    self.field,
                    style,
                    context.locale(),
                );
                provided.as_ref()
            }
            TextSource::Custom(custom) => Some(&custom.candidates),
        };
        if let Some(candidates) = candidates {
            // The longest matching text wins, whatever the candidate order.
            let found = candidates
                .iter()
                .filter_map(|(candidate, value)| {
                    context
                        .sub_sequence_equals(text, position, candidate)
                        .map(|end| (*value, end))
                })
                .reduce(|best, next| if next.1 > best.1 { next } else { best });
            if let Some((value, end)) = found {
                return context.set_parsed_field(self.field, value, position, end);
            }
            if context.is_strict() {
                return Err(ParseFailure::Mismatch(position));
            }
        }
        self.number().parse(context, text, position)
    }
}

impl Writeable for TextPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.style == TextStyle::Full {
            write!(sink, "Text({})", self.field)
        } else {
            write!(sink, "Text({},{})", self.field, self.style)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fields::ChronoField,
        format::{DateTimeFormatter, DateTimeFormatterBuilder, FormatResources, ParsePosition},
        iso::IsoDate,
        provider::{DefaultTextProvider, FormatStyle, TextProvider, ZoneNameKind},
    };
    use icu_locale::Locale;

    fn formatter(field: ChronoField, style: TextStyle) -> DateTimeFormatter {
        DateTimeFormatterBuilder::new()
            .append_text_styled(field, style)
            .to_formatter()
    }

    #[test]
    fn format_text() {
        let date = IsoDate::new(2012, 6, 26).unwrap();
        let formatter = formatter(ChronoField::DayOfWeek, TextStyle::Full);
        assert_eq!(formatter.format(&date).unwrap(), "Tuesday");
        let month = self::formatter(ChronoField::MonthOfYear, TextStyle::Short);
        assert_eq!(month.format(&date).unwrap(), "Jun");
        // No text for the day of month.
        let day = self::formatter(ChronoField::DayOfMonth, TextStyle::Full);
        assert_eq!(day.format(&date).unwrap(), "26");
    }

    #[test]
    fn longest_match_wins() {
        let formatter = formatter(ChronoField::DayOfWeek, TextStyle::Full);
        let mut position = ParsePosition::new(0);
        let parsed = formatter.parse_unresolved("Tuesday", &mut position).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::DayOfWeek), Some(2));
        assert_eq!(position.index(), 7);

        let mut position = ParsePosition::new(0);
        let parsed = formatter.parse_unresolved("Tue", &mut position).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::DayOfWeek), Some(2));
        assert_eq!(position.index(), 3);
    }

    #[test]
    fn month_and_weekday_round_trip() {
        let styles = [
            TextStyle::Full,
            TextStyle::FullStandalone,
            TextStyle::Short,
            TextStyle::ShortStandalone,
            TextStyle::Narrow,
            TextStyle::NarrowStandalone,
        ];
        let months: Vec<(i64, IsoDate)> = (1..=12)
            .map(|month| (i64::from(month), IsoDate::new(2012, month, 1).unwrap()))
            .collect();
        // 2012-06-25 is a Monday.
        let weekdays: Vec<(i64, IsoDate)> = (1..=7)
            .map(|day| (i64::from(day), IsoDate::new(2012, 6, 24 + day).unwrap()))
            .collect();
        for (field, dates) in [(ChronoField::MonthOfYear, months), (ChronoField::DayOfWeek, weekdays)] {
            for style in styles {
                let lenient = formatter(field, style);
                let strict = DateTimeFormatterBuilder::new()
                    .parse_strict()
                    .append_text_styled(field, style)
                    .to_formatter();
                let texts: Vec<String> = dates
                    .iter()
                    .map(|(_, date)| lenient.format(date).unwrap())
                    .collect();
                for ((value, _), text) in dates.iter().zip(&texts) {
                    if texts.iter().filter(|other| *other == text).count() > 1 {
                        // Narrow texts shared by several values do not parse.
                        assert!(lenient.parse_unresolved_at(text, 0).is_none(), "{text}");
                        continue;
                    }
                    for parser in [&lenient, &strict] {
                        let mut position = ParsePosition::new(0);
                        let parsed = parser
                            .parse_unresolved(text, &mut position)
                            .and_then(|parsed| parsed.fields().get(field));
                        assert_eq!(parsed, Some(*value), "{field} {style} {text}");
                        assert_eq!(position.index(), text.len(), "{field} {style} {text}");
                    }
                }
            }
        }
    }

    /// Serves the default texts, shortest candidate first.
    #[derive(Debug)]
    struct ShortestFirst;

    impl TextProvider for ShortestFirst {
        fn text(&self, field: Field, value: i64, style: TextStyle, locale: &Locale) -> Option<String> {
            DefaultTextProvider.text(field, value, style, locale)
        }

        fn text_candidates(
            &self,
            field: Field,
            style: Option<TextStyle>,
            locale: &Locale,
        ) -> Option<TextCandidates> {
            let mut candidates = DefaultTextProvider.text_candidates(field, style, locale)?;
            candidates.sort_by_key(|(text, _)| text.chars().count());
            Some(candidates)
        }

        fn zone_name(
            &self,
            zone_id: &str,
            kind: ZoneNameKind,
            style: TextStyle,
            locale: &Locale,
        ) -> Option<String> {
            DefaultTextProvider.zone_name(zone_id, kind, style, locale)
        }

        fn localized_pattern(
            &self,
            date_style: Option<FormatStyle>,
            time_style: Option<FormatStyle>,
            chronology_id: &str,
            locale: &Locale,
        ) -> TemporalResult<String> {
            DefaultTextProvider.localized_pattern(date_style, time_style, chronology_id, locale)
        }
    }

    #[test]
    fn longest_match_with_unsorted_candidates() {
        let resources = FormatResources::default().with_text(Arc::new(ShortestFirst));
        let formatter = formatter(ChronoField::MonthOfYear, TextStyle::Full).with_resources(resources);
        for (text, month) in [("September", 9), ("June", 6), ("Jun", 6), ("May", 5)] {
            let mut position = ParsePosition::new(0);
            let parsed = formatter
                .parse_unresolved(text, &mut position)
                .and_then(|parsed| parsed.fields().get(ChronoField::MonthOfYear));
            assert_eq!(parsed, Some(month), "{text}");
            assert_eq!(position.index(), text.len(), "{text}");
        }
    }

    #[test]
    fn strict_uses_only_its_style() {
        let strict = DateTimeFormatterBuilder::new()
            .parse_strict()
            .append_text_styled(ChronoField::MonthOfYear, TextStyle::Short)
            .to_formatter();
        assert!(strict.parse_unresolved_at("June", 0).is_some());
        let mut position = ParsePosition::new(0);
        strict.parse_unresolved("June", &mut position).unwrap();
        // Only "Jun" is a short month.
        assert_eq!(position.index(), 3);
        assert!(strict.parse_unresolved_at("6", 0).is_none());

        let lenient = formatter(ChronoField::MonthOfYear, TextStyle::Short);
        let parsed = lenient.parse_unresolved_at("6", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::MonthOfYear), Some(6));
    }

    #[test]
    fn custom_texts() {
        let texts = BTreeMap::from([(1, "JNY".into()), (2, "FBY".into())]);
        let formatter = DateTimeFormatterBuilder::new()
            .append_text_with_map(ChronoField::MonthOfYear, texts)
            .to_formatter();
        let date = IsoDate::new(2012, 2, 1).unwrap();
        assert_eq!(formatter.format(&date).unwrap(), "FBY");
        let march = IsoDate::new(2012, 3, 1).unwrap();
        assert_eq!(formatter.format(&march).unwrap(), "3");
        let parsed = formatter.parse_unresolved_at("JNY", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::MonthOfYear), Some(1));
    }

    #[test]
    fn description() {
        let pp = TextPrinterParser::new(
            ChronoField::DayOfWeek.into(),
            TextStyle::Short,
            TextSource::Provider,
        );
        assert_eq!(pp.write_to_string(), "Text(DayOfWeek,SHORT)");
    }
}
