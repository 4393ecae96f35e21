//! The builder of formatters.

use alloc::{collections::BTreeMap, format, string::String, sync::Arc, vec::Vec};

use super::{
    ChronologyIdPrinterParser, CompositePrinterParser, CharLiteralPrinterParser, CustomTexts,
    DateTimeFormatter, DefaultValueParser, FractionPrinterParser, InstantPrinterParser,
    LocalizedOffsetPrinterParser, LocalizedPrinterParser, NumberPrinterParser,
    OffsetIdPrinterParser, PadPrinterParser, PrinterParser, ReducedBase, ReducedPrinterParser,
    SettingsParser, SignStyle, StringLiteralPrinterParser, TextPrinterParser, TextSource,
    WeekBasedPrinterParser, ZoneIdPrinterParser, ZoneQuery, ZoneTextPrinterParser,
};
use crate::{
    fields::{ChronoField, Field, IsoField},
    iso::IsoDate,
    provider::{FormatStyle, TextStyle},
    TemporalError, TemporalResult,
};

/// The base date of two digit years in patterns.
const BASE_DATE: IsoDate = IsoDate {
    year: 2000,
    month: 1,
    day: 1,
};

/// The printer-parsers of one nesting level, the root or an optional
/// section.
#[derive(Debug)]
struct Frame {
    printer_parsers: Vec<PrinterParser>,
    optional: bool,
    pad_next_width: usize,
    pad_next_char: char,
    /// The index of the numeric value that adjacent fixed width values
    /// reserve their width in.
    value_parser_index: Option<usize>,
}

impl Frame {
    fn new(optional: bool) -> Self {
        Self {
            printer_parsers: Vec::new(),
            optional,
            pad_next_width: 0,
            pad_next_char: ' ',
            value_parser_index: None,
        }
    }
}

/// Builds a [`DateTimeFormatter`] from printer-parsers.
///
/// Methods append in order. Optional sections nest: every
/// [`optional_start`][Self::optional_start] opens a section that the
/// matching [`optional_end`][Self::optional_end] closes, and
/// [`to_formatter`][Self::to_formatter] closes any still open.
///
/// The builder is consumed by [`to_formatter`][Self::to_formatter], so it
/// builds exactly one formatter.
///
/// ```rust
/// use temporal_format::{fields::ChronoField, format::DateTimeFormatterBuilder, iso::IsoTime};
///
/// let formatter = DateTimeFormatterBuilder::new()
///     .append_value_width(ChronoField::HourOfDay, 2)
///     .unwrap()
///     .optional_start()
///     .append_literal(':')
///     .append_value_width(ChronoField::MinuteOfHour, 2)
///     .unwrap()
///     .to_formatter();
///
/// let time = IsoTime::new(9, 5, 0, 0).unwrap();
/// assert_eq!(formatter.format(&time).unwrap(), "09:05");
/// ```
#[derive(Debug)]
pub struct DateTimeFormatterBuilder {
    root: Frame,
    nested: Vec<Frame>,
}

impl Default for DateTimeFormatterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeFormatterBuilder {
    pub fn new() -> Self {
        Self {
            root: Frame::new(false),
            nested: Vec::new(),
        }
    }

    fn active(&mut self) -> &mut Frame {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    // ==== Parse settings ====

    /// Parses the rest of the format case sensitively.
    pub fn parse_case_sensitive(self) -> Self {
        self.append_settings(SettingsParser::Sensitive)
    }

    /// Parses the rest of the format ignoring case.
    pub fn parse_case_insensitive(self) -> Self {
        self.append_settings(SettingsParser::Insensitive)
    }

    /// Parses the rest of the format strictly.
    pub fn parse_strict(self) -> Self {
        self.append_settings(SettingsParser::Strict)
    }

    /// Parses the rest of the format leniently.
    pub fn parse_lenient(self) -> Self {
        self.append_settings(SettingsParser::Lenient)
    }

    fn append_settings(mut self, settings: SettingsParser) -> Self {
        self.append_internal(PrinterParser::Settings(settings));
        self
    }

    /// Supplies `value` for `field` when parsing did not produce one.
    pub fn parse_defaulting(mut self, field: impl Into<Field>, value: i64) -> Self {
        self.append_internal(PrinterParser::DefaultValue(DefaultValueParser::new(
            field.into(),
            value,
        )));
        self
    }

    // ==== Values ====

    /// Appends a value printed with as many digits as it needs.
    pub fn append_value(mut self, field: impl Into<Field>) -> Self {
        self.append_value_pp(PrinterParser::Number(NumberPrinterParser::new(
            field.into(),
            1,
            19,
            SignStyle::Normal,
        )));
        self
    }

    /// Appends a value of a fixed width, zero padded.
    pub fn append_value_width(mut self, field: impl Into<Field>, width: usize) -> TemporalResult<Self> {
        if !(1..=19).contains(&width) {
            return Err(TemporalError::range().with_message(format!(
                "The width must be from 1 to 19 inclusive but was {width}"
            )));
        }
        self.append_value_pp(PrinterParser::Number(NumberPrinterParser::new(
            field.into(),
            width,
            width,
            SignStyle::NotNegative,
        )));
        Ok(self)
    }

    /// Appends a value with a width from `min_width` to `max_width`.
    pub fn append_value_with(
        mut self,
        field: impl Into<Field>,
        min_width: usize,
        max_width: usize,
        sign_style: SignStyle,
    ) -> TemporalResult<Self> {
        if min_width == max_width && sign_style == SignStyle::NotNegative {
            return self.append_value_width(field, max_width);
        }
        if !(1..=19).contains(&min_width) {
            return Err(TemporalError::range().with_message(format!(
                "The minimum width must be from 1 to 19 inclusive but was {min_width}"
            )));
        }
        if !(1..=19).contains(&max_width) {
            return Err(TemporalError::range().with_message(format!(
                "The maximum width must be from 1 to 19 inclusive but was {max_width}"
            )));
        }
        if max_width < min_width {
            return Err(TemporalError::range().with_message(format!(
                "The maximum width must exceed or equal the minimum width but {max_width} < {min_width}"
            )));
        }
        self.append_value_pp(PrinterParser::Number(NumberPrinterParser::new(
            field.into(),
            min_width,
            max_width,
            sign_style,
        )));
        Ok(self)
    }

    /// Appends the value reduced to `width` digits, relative to a base
    /// value.
    ///
    /// Parsing a value of exactly `width` digits picks the value in the
    /// range `base_value` to `base_value + 10^width - 1`.
    pub fn append_value_reduced(
        mut self,
        field: impl Into<Field>,
        width: usize,
        max_width: usize,
        base_value: i32,
    ) -> TemporalResult<Self> {
        let pp = ReducedPrinterParser::new(field.into(), width, max_width, ReducedBase::Value(base_value))?;
        self.append_value_pp(PrinterParser::Reduced(pp));
        Ok(self)
    }

    /// Appends the value reduced to `width` digits, relative to the value
    /// of the field at `base_date` in the chronology of the parse.
    pub fn append_value_reduced_with_base_date(
        mut self,
        field: impl Into<Field>,
        width: usize,
        max_width: usize,
        base_date: IsoDate,
    ) -> TemporalResult<Self> {
        let pp = ReducedPrinterParser::new(field.into(), width, max_width, ReducedBase::Date(base_date))?;
        self.append_value_pp(PrinterParser::Reduced(pp));
        Ok(self)
    }

    /// Appends a value that takes part in adjacent value parsing.
    ///
    /// A fixed width value that directly follows another value reserves
    /// its width in that value, so "yyyyMMdd" parses "20120630".
    fn append_value_pp(&mut self, pp: PrinterParser) {
        let active = self.active();
        let Some(index) = active.value_parser_index else {
            let index = self.append_internal(pp);
            self.active().value_parser_index = Some(index);
            return;
        };
        let base = active.printer_parsers[index].clone();
        let fixed = pp
            .value_widths()
            .filter(|(min, max, sign)| min == max && *sign == SignStyle::NotNegative)
            .map(|(_, max, _)| max);
        let base = if let Some(width) = fixed {
            self.append_internal(pp.with_fixed_width());
            self.active().value_parser_index = Some(index);
            base.with_subsequent_width(width)
        } else {
            let new_index = self.append_internal(pp);
            self.active().value_parser_index = Some(new_index);
            base.with_fixed_width()
        };
        self.active().printer_parsers[index] = base;
    }

    /// Appends the fraction of a value, from `min_width` to `max_width`
    /// digits, optionally after the decimal point.
    pub fn append_fraction(
        mut self,
        field: impl Into<Field>,
        min_width: usize,
        max_width: usize,
        decimal_point: bool,
    ) -> TemporalResult<Self> {
        let pp = FractionPrinterParser::new(field.into(), min_width, max_width, decimal_point)?;
        self.append_internal(PrinterParser::Fraction(pp));
        Ok(self)
    }

    // ==== Text ====

    /// Appends the full text of a field.
    pub fn append_text(self, field: impl Into<Field>) -> Self {
        self.append_text_styled(field, TextStyle::Full)
    }

    /// Appends the text of a field in the given style.
    pub fn append_text_styled(mut self, field: impl Into<Field>, style: TextStyle) -> Self {
        self.append_internal(PrinterParser::Text(TextPrinterParser::new(
            field.into(),
            style,
            TextSource::Provider,
        )));
        self
    }

    /// Appends the text of a field looked up in a fixed map.
    pub fn append_text_with_map(mut self, field: impl Into<Field>, texts: BTreeMap<i64, String>) -> Self {
        let source = TextSource::Custom(Arc::new(CustomTexts::new(texts)));
        self.append_internal(PrinterParser::Text(TextPrinterParser::new(
            field.into(),
            TextStyle::Full,
            source,
        )));
        self
    }

    // ==== Instants and zones ====

    /// Appends an instant in ISO format with as many fraction digits as
    /// needed, in groups of three.
    pub fn append_instant(mut self) -> Self {
        self.append_internal(PrinterParser::Instant(InstantPrinterParser::DEFAULT));
        self
    }

    /// Appends an instant in ISO format with a fixed number of fraction
    /// digits, or `-1` for as many as needed.
    pub fn append_instant_digits(mut self, fractional_digits: i32) -> TemporalResult<Self> {
        let pp = InstantPrinterParser::new(fractional_digits)?;
        self.append_internal(PrinterParser::Instant(pp));
        Ok(self)
    }

    /// Appends the offset as `+HH:MM:ss`, printing "Z" for zero.
    pub fn append_offset_id(mut self) -> Self {
        self.append_internal(PrinterParser::OffsetId(OffsetIdPrinterParser::id_z()));
        self
    }

    /// Appends the offset in the given pattern, printing `no_offset_text`
    /// for zero.
    pub fn append_offset(mut self, pattern: &str, no_offset_text: &str) -> TemporalResult<Self> {
        let pp = OffsetIdPrinterParser::new(pattern, no_offset_text)?;
        self.append_internal(PrinterParser::OffsetId(pp));
        Ok(self)
    }

    /// Appends the localized offset, such as "GMT+08:00".
    pub fn append_localized_offset(mut self, style: TextStyle) -> TemporalResult<Self> {
        let pp = LocalizedOffsetPrinterParser::new(style)?;
        self.append_internal(PrinterParser::LocalizedOffset(pp));
        Ok(self)
    }

    /// Appends the zone id, such as "Europe/Paris" or "+02:00".
    pub fn append_zone_id(self) -> Self {
        self.append_zone_query(ZoneQuery::ZoneId)
    }

    /// Appends the zone id, printing nothing for a bare offset.
    pub fn append_zone_region_id(self) -> Self {
        self.append_zone_query(ZoneQuery::RegionOnly)
    }

    /// Appends the zone id, or the offset when there is no zone.
    pub fn append_zone_or_offset_id(self) -> Self {
        self.append_zone_query(ZoneQuery::ZoneOrOffset)
    }

    fn append_zone_query(mut self, query: ZoneQuery) -> Self {
        self.append_internal(PrinterParser::ZoneId(ZoneIdPrinterParser::new(query)));
        self
    }

    /// Appends the zone name, such as "Pacific Standard Time".
    pub fn append_zone_text(self, style: TextStyle) -> Self {
        self.append_zone_text_pp(ZoneTextPrinterParser::new(style, false, Vec::new()))
    }

    /// Appends the zone name, resolving a name shared by several zones to
    /// the first preferred zone with that name.
    pub fn append_zone_text_with_preferred(
        self,
        style: TextStyle,
        preferred: impl IntoIterator<Item = String>,
    ) -> Self {
        self.append_zone_text_pp(ZoneTextPrinterParser::new(
            style,
            false,
            preferred.into_iter().collect(),
        ))
    }

    /// Appends the generic zone name, such as "Pacific Time".
    pub fn append_generic_zone_text(self, style: TextStyle) -> Self {
        self.append_zone_text_pp(ZoneTextPrinterParser::new(style, true, Vec::new()))
    }

    fn append_zone_text_pp(mut self, pp: ZoneTextPrinterParser) -> Self {
        self.append_internal(PrinterParser::ZoneText(pp));
        self
    }

    /// Appends the chronology id, such as "ISO".
    pub fn append_chronology_id(mut self) -> Self {
        self.append_internal(PrinterParser::ChronologyId(ChronologyIdPrinterParser));
        self
    }

    /// Appends the localized pattern of the given styles, looked up when
    /// the formatter is used.
    pub fn append_localized(
        mut self,
        date_style: Option<FormatStyle>,
        time_style: Option<FormatStyle>,
    ) -> TemporalResult<Self> {
        let pp = LocalizedPrinterParser::new(date_style, time_style)?;
        self.append_internal(PrinterParser::Localized(pp));
        Ok(self)
    }

    // ==== Literals and nesting ====

    pub fn append_literal(mut self, literal: char) -> Self {
        self.append_internal(PrinterParser::CharLiteral(CharLiteralPrinterParser(literal)));
        self
    }

    pub fn append_literal_str(mut self, literal: &str) -> Self {
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {}
            (Some(c), None) => {
                self.append_internal(PrinterParser::CharLiteral(CharLiteralPrinterParser(c)));
            }
            _ => {
                self.append_internal(PrinterParser::StringLiteral(StringLiteralPrinterParser(
                    literal.into(),
                )));
            }
        }
        self
    }

    /// Appends all of another formatter.
    pub fn append_formatter(mut self, formatter: &DateTimeFormatter) -> Self {
        self.append_internal(PrinterParser::Composite(formatter.to_printer_parser(false)));
        self
    }

    /// Appends another formatter as an optional section.
    pub fn append_optional(mut self, formatter: &DateTimeFormatter) -> Self {
        self.append_internal(PrinterParser::Composite(formatter.to_printer_parser(true)));
        self
    }

    /// Appends any printer-parser.
    pub fn append_printer_parser(mut self, pp: PrinterParser) -> Self {
        self.append_internal(pp);
        self
    }

    /// Pads the next printer-parser to `pad_width` with spaces.
    pub fn pad_next(self, pad_width: usize) -> TemporalResult<Self> {
        self.pad_next_with(pad_width, ' ')
    }

    /// Pads the next printer-parser to `pad_width` with `pad_char`.
    ///
    /// The padding goes before the output of the printer-parser. A value
    /// wider than `pad_width` is an error.
    pub fn pad_next_with(mut self, pad_width: usize, pad_char: char) -> TemporalResult<Self> {
        if pad_width < 1 {
            return Err(TemporalError::range().with_message(format!(
                "The pad width must be at least one but was {pad_width}"
            )));
        }
        let active = self.active();
        active.pad_next_width = pad_width;
        active.pad_next_char = pad_char;
        active.value_parser_index = None;
        Ok(self)
    }

    /// Starts an optional section.
    ///
    /// When formatting, the section prints nothing if a value in it is
    /// missing. When parsing, the section matches or is skipped as a
    /// whole.
    pub fn optional_start(mut self) -> Self {
        self.active().value_parser_index = None;
        self.nested.push(Frame::new(true));
        self
    }

    /// Ends the innermost optional section.
    pub fn optional_end(mut self) -> TemporalResult<Self> {
        if !self.end_section() {
            return Err(TemporalError::general(
                "Cannot call optional_end() as there was no previous call to optional_start()",
            ));
        }
        Ok(self)
    }

    /// Closes the innermost section, returning `false` if none is open.
    fn end_section(&mut self) -> bool {
        let Some(frame) = self.nested.pop() else {
            return false;
        };
        if !frame.printer_parsers.is_empty() {
            let composite = CompositePrinterParser::new(frame.printer_parsers, frame.optional);
            self.append_internal(PrinterParser::Composite(composite));
        }
        true
    }

    /// Appends to the active level, wrapping in a pending pad.
    ///
    /// Returns the index of the appended printer-parser.
    fn append_internal(&mut self, mut pp: PrinterParser) -> usize {
        let active = self.active();
        if active.pad_next_width > 0 {
            pp = PrinterParser::Pad(PadPrinterParser::new(
                pp,
                active.pad_next_width,
                active.pad_next_char,
            ));
            active.pad_next_width = 0;
            active.pad_next_char = ' ';
        }
        active.printer_parsers.push(pp);
        active.value_parser_index = None;
        active.printer_parsers.len() - 1
    }

    // ==== Patterns ====

    /// Appends the elements of a pattern.
    ///
    /// | Letter | Meaning | Examples |
    /// |--------|---------|----------|
    /// | G | era | AD; Anno Domini; A |
    /// | u | year | 2004; 04 |
    /// | y | year of era | 2004; 04 |
    /// | D | day of year | 189 |
    /// | M/L | month of year | 7; 07; Jul; July; J |
    /// | d | day of month | 10 |
    /// | Q/q | quarter of year | 3; 03; Q3; 3rd quarter |
    /// | Y | week based year | 1996; 96 |
    /// | w | week of week based year | 27 |
    /// | W | week of month | 4 |
    /// | E | day of week | Tue; Tuesday; T |
    /// | e/c | localized day of week | 2; 02; Tue; Tuesday; T |
    /// | F | aligned day of week in month | 3 |
    /// | a | am-pm of day | PM |
    /// | h | clock hour of am-pm (1-12) | 12 |
    /// | K | hour of am-pm (0-11) | 0 |
    /// | k | clock hour of day (1-24) | 24 |
    /// | H | hour of day (0-23) | 0 |
    /// | m | minute of hour | 30 |
    /// | s | second of minute | 55 |
    /// | S | fraction of second | 978 |
    /// | A | milli of day | 1234 |
    /// | n | nano of second | 987654321 |
    /// | N | nano of day | 1234000000 |
    /// | V | zone id | America/Los_Angeles; Z; -08:30 |
    /// | z | zone name | Pacific Standard Time; PST |
    /// | O | localized offset | GMT+8; GMT+08:00 |
    /// | X | offset, "Z" for zero | Z; -08; -0830; -08:30 |
    /// | x | offset | +0000; -08; -0830; -08:30 |
    /// | Z | offset | +0000; -0800; -08:00 |
    /// | p | pad next | |
    ///
    /// Text in single quotes is literal, `''` is a single quote. `[` and
    /// `]` start and end an optional section. `{`, `}` and `#` are
    /// reserved. Any other character is a literal.
    pub fn append_pattern(mut self, pattern: &str) -> TemporalResult<Self> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut pos = 0;
        while pos < chars.len() {
            let cur = chars[pos];
            if cur.is_ascii_alphabetic() {
                let mut letter = cur;
                let mut count = run_length(&chars, pos);
                pos += count;
                if letter == 'p' {
                    let pad = count;
                    match chars.get(pos) {
                        Some(next) if next.is_ascii_alphabetic() => {
                            letter = *next;
                            count = run_length(&chars, pos);
                            pos += count;
                        }
                        _ => {
                            return Err(pattern_error(format!(
                                "Pad letter 'p' must be followed by valid pad pattern: {pattern}"
                            )))
                        }
                    }
                    self = self.pad_next(pad)?;
                }
                self = self.append_pattern_letter(letter, count)?;
            } else if cur == '\'' {
                let start = pos + 1;
                pos += 1;
                loop {
                    match chars.get(pos) {
                        None => {
                            return Err(pattern_error(format!(
                                "Pattern ends with an incomplete string literal: {pattern}"
                            )))
                        }
                        Some('\'') if chars.get(pos + 1) == Some(&'\'') => pos += 2,
                        Some('\'') => break,
                        Some(_) => pos += 1,
                    }
                }
                let literal: String = chars[start..pos].iter().collect();
                pos += 1;
                if literal.is_empty() {
                    self = self.append_literal('\'');
                } else {
                    self = self.append_literal_str(&literal.replace("''", "'"));
                }
            } else {
                match cur {
                    '[' => self = self.optional_start(),
                    ']' => {
                        if self.nested.is_empty() {
                            return Err(pattern_error(
                                "Pattern invalid as it contains ] without previous [",
                            ));
                        }
                        self = self.optional_end()?;
                    }
                    '{' | '}' | '#' => {
                        return Err(pattern_error(format!(
                            "Pattern includes reserved character: '{cur}'"
                        )))
                    }
                    _ => self = self.append_literal(cur),
                }
                pos += 1;
            }
        }
        Ok(self)
    }

    fn append_pattern_letter(self, letter: char, count: usize) -> TemporalResult<Self> {
        if let Some(field) = pattern_field(letter) {
            return self.append_pattern_field(letter, count, field);
        }
        match letter {
            'z' => match count {
                1..=3 => Ok(self.append_zone_text(TextStyle::Short)),
                4 => Ok(self.append_zone_text(TextStyle::Full)),
                _ => Err(too_many(letter)),
            },
            'V' if count == 2 => Ok(self.append_zone_id()),
            'V' => Err(pattern_error(format!("Pattern letter count must be 2: {letter}"))),
            'Z' => match count {
                1..=3 => self.append_offset("+HHMM", "+0000"),
                4 => self.append_localized_offset(TextStyle::Full),
                5 => self.append_offset("+HH:MM:ss", "Z"),
                _ => Err(too_many(letter)),
            },
            'O' => match count {
                1 => self.append_localized_offset(TextStyle::Short),
                4 => self.append_localized_offset(TextStyle::Full),
                _ => Err(pattern_error(format!(
                    "Pattern letter count must be 1 or 4: {letter}"
                ))),
            },
            'X' | 'x' => {
                if count > 5 {
                    return Err(too_many(letter));
                }
                let pattern = super::offset::OFFSET_PATTERNS[count + usize::from(count != 1)];
                let zero = match (letter, count) {
                    ('X', _) => "Z",
                    (_, 1) => "+00",
                    (_, c) if c % 2 == 0 => "+0000",
                    _ => "+00:00",
                };
                self.append_offset(pattern, zero)
            }
            'W' if count > 1 => Err(too_many(letter)),
            'W' => Ok(self.append_week_based(letter, count, count)),
            'w' if count > 2 => Err(too_many(letter)),
            'w' => Ok(self.append_week_based(letter, count, 2)),
            'Y' if count == 2 => Ok(self.append_week_based(letter, count, 2)),
            'Y' => Ok(self.append_week_based(letter, count, 19)),
            _ => Err(pattern_error(format!("Unknown pattern letter: {letter}"))),
        }
    }

    fn append_week_based(mut self, letter: char, count: usize, max_width: usize) -> Self {
        self.append_value_pp(PrinterParser::WeekBased(WeekBasedPrinterParser::new(
            letter, count, max_width,
        )));
        self
    }

    fn append_pattern_field(self, letter: char, count: usize, field: Field) -> TemporalResult<Self> {
        let standalone = matches!(letter, 'L' | 'q' | 'c');
        match letter {
            'u' | 'y' => match count {
                2 => self.append_value_reduced_with_base_date(field, 2, 2, BASE_DATE),
                1..=3 => self.append_value_with(field, count, 19, SignStyle::Normal),
                _ => self.append_value_with(field, count, 19, SignStyle::ExceedsPad),
            },
            'c' if count == 1 => Ok(self.append_week_based(letter, count, count)),
            'c' if count == 2 => Err(pattern_error("Invalid pattern \"cc\"")),
            'M' | 'L' | 'Q' | 'q' | 'E' | 'e' | 'c' => match count {
                1 | 2 if letter == 'e' => Ok(self.append_week_based(letter, count, count)),
                1 | 2 if letter == 'E' => Ok(self.append_text_styled(field, TextStyle::Short)),
                1 => Ok(self.append_value(field)),
                2 => self.append_value_width(field, 2),
                3 if standalone => Ok(self.append_text_styled(field, TextStyle::ShortStandalone)),
                3 => Ok(self.append_text_styled(field, TextStyle::Short)),
                4 if standalone => Ok(self.append_text_styled(field, TextStyle::FullStandalone)),
                4 => Ok(self.append_text_styled(field, TextStyle::Full)),
                5 if standalone => Ok(self.append_text_styled(field, TextStyle::NarrowStandalone)),
                5 => Ok(self.append_text_styled(field, TextStyle::Narrow)),
                _ => Err(too_many(letter)),
            },
            'a' if count == 1 => Ok(self.append_text_styled(field, TextStyle::Short)),
            'a' => Err(too_many(letter)),
            'G' => match count {
                1..=3 => Ok(self.append_text_styled(field, TextStyle::Short)),
                4 => Ok(self.append_text_styled(field, TextStyle::Full)),
                5 => Ok(self.append_text_styled(field, TextStyle::Narrow)),
                _ => Err(too_many(letter)),
            },
            'S' => self.append_fraction(ChronoField::NanoOfSecond, count, count, false),
            'F' if count == 1 => Ok(self.append_value(field)),
            'F' => Err(too_many(letter)),
            'd' | 'h' | 'H' | 'k' | 'K' | 'm' | 's' => match count {
                1 => Ok(self.append_value(field)),
                2 => self.append_value_width(field, count),
                _ => Err(too_many(letter)),
            },
            'D' => match count {
                1 => Ok(self.append_value(field)),
                2 | 3 => self.append_value_with(field, count, 3, SignStyle::NotNegative),
                _ => Err(too_many(letter)),
            },
            'A' | 'n' | 'N' => self.append_value_with(field, count, 19, SignStyle::NotNegative),
            _ if count == 1 => Ok(self.append_value(field)),
            _ => self.append_value_width(field, count),
        }
    }

    // ==== Build ====

    /// Completes the builder, closing any optional sections still open.
    pub fn to_formatter(mut self) -> DateTimeFormatter {
        while self.end_section() {}
        DateTimeFormatter::new(CompositePrinterParser::new(
            self.root.printer_parsers,
            false,
        ))
    }
}

fn run_length(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .take_while(|c| **c == chars[start])
        .count()
}

/// The field of a pattern letter with a field of its own.
fn pattern_field(letter: char) -> Option<Field> {
    let field: Field = match letter {
        'G' => ChronoField::Era.into(),
        'y' => ChronoField::YearOfEra.into(),
        'u' => ChronoField::Year.into(),
        'Q' | 'q' => IsoField::QuarterOfYear.into(),
        'M' | 'L' => ChronoField::MonthOfYear.into(),
        'D' => ChronoField::DayOfYear.into(),
        'd' => ChronoField::DayOfMonth.into(),
        'F' => ChronoField::AlignedDayOfWeekInMonth.into(),
        'E' | 'c' | 'e' => ChronoField::DayOfWeek.into(),
        'a' => ChronoField::AmPmOfDay.into(),
        'H' => ChronoField::HourOfDay.into(),
        'k' => ChronoField::ClockHourOfDay.into(),
        'K' => ChronoField::HourOfAmPm.into(),
        'h' => ChronoField::ClockHourOfAmPm.into(),
        'm' => ChronoField::MinuteOfHour.into(),
        's' => ChronoField::SecondOfMinute.into(),
        'S' | 'n' => ChronoField::NanoOfSecond.into(),
        'A' => ChronoField::MilliOfDay.into(),
        'N' => ChronoField::NanoOfDay.into(),
        _ => return None,
    };
    Some(field)
}

fn pattern_error(msg: impl Into<alloc::borrow::Cow<'static, str>>) -> TemporalError {
    TemporalError::syntax().with_message(msg)
}

fn too_many(letter: char) -> TemporalError {
    pattern_error(format!("Too many pattern letters: {letter}"))
}
