//! Numeric printer-parsers.

use alloc::{format, string::String};
use core::fmt::Write;

use num_traits::ToPrimitive;
use writeable::Writeable;

use super::{
    context::{ParseContext, ParseFailure, ParseResult, PendingResolution, PrintContext},
    SignStyle,
};
use crate::{fields::Field, iso::IsoDate, TemporalError, TemporalResult};

/// Powers of ten, indexed by exponent.
pub(crate) const EXCEED_POINTS: [i64; 11] = [
    0,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
];

/// Prints and parses a field as a decimal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPrinterParser {
    pub(crate) field: Field,
    pub(crate) min_width: usize,
    pub(crate) max_width: usize,
    pub(crate) sign_style: SignStyle,
    /// The width reserved for adjacent fixed width fields that follow, or
    /// `-1` when this parser is itself fixed width.
    pub(crate) subsequent_width: i32,
}

impl NumberPrinterParser {
    pub(crate) const fn new(
        field: Field,
        min_width: usize,
        max_width: usize,
        sign_style: SignStyle,
    ) -> Self {
        Self {
            field,
            min_width,
            max_width,
            sign_style,
            subsequent_width: 0,
        }
    }

    pub(crate) fn with_fixed_width(mut self) -> Self {
        self.subsequent_width = -1;
        self
    }

    pub(crate) fn with_subsequent_width(mut self, width: usize) -> Self {
        self.subsequent_width += width as i32;
        self
    }

    pub(crate) fn is_fixed_width(&self) -> bool {
        self.subsequent_width == -1
            || (self.subsequent_width > 0
                && self.min_width == self.max_width
                && self.sign_style == SignStyle::NotNegative)
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(value) = context.value(self.field)? else {
            return Ok(false);
        };
        self.format_value(context, value, buf)?;
        Ok(true)
    }

    fn format_value(&self, context: &PrintContext<'_>, value: i64, buf: &mut String) -> TemporalResult<()> {
        let style = context.decimal_style();
        let digits = format!("{}", value.unsigned_abs());
        if digits.len() > self.max_width {
            return Err(TemporalError::range().with_message(format!(
                "Field {} cannot be printed as the value {value} exceeds the maximum print width of {}",
                self.field, self.max_width
            )));
        }
        if value >= 0 {
            match self.sign_style {
                SignStyle::ExceedsPad
                    if self.min_width < 19 && value >= 10_i64.pow(self.min_width as u32) =>
                {
                    buf.push(style.positive_sign());
                }
                SignStyle::Always => buf.push(style.positive_sign()),
                _ => {}
            }
        } else {
            match self.sign_style {
                SignStyle::Normal | SignStyle::ExceedsPad | SignStyle::Always => {
                    buf.push(style.negative_sign());
                }
                SignStyle::NotNegative => {
                    return Err(TemporalError::range().with_message(format!(
                        "Field {} cannot be printed as the value {value} cannot be negative according to the SignStyle",
                        self.field
                    )));
                }
                SignStyle::Never => {}
            }
        }
        for _ in digits.len()..self.min_width {
            buf.push(style.zero_digit());
        }
        style.push_digits(&digits, buf);
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let fixed_width = context.is_strict() || self.is_fixed_width();
        self.parse_number(context, text, position, fixed_width)
            .and_then(|parsed| self.set_value(context, parsed.value, parsed.start, parsed.end))
    }

    /// Reads the digits and sign, without storing the value.
    pub(crate) fn parse_number(
        &self,
        context: &ParseContext<'_>,
        text: &str,
        position: usize,
        fixed_width: bool,
    ) -> Result<ParsedNumber, ParseFailure> {
        let style = context.decimal_style();
        let strict = context.is_strict();
        let Some(first) = text.get(position..).and_then(|rest| rest.chars().next()) else {
            return Err(ParseFailure::Mismatch(position));
        };
        let same_widths = self.min_width == self.max_width;
        let sign_position = position;
        let mut position = position;
        let mut negative = false;
        let mut positive = false;
        if first == style.positive_sign() {
            if !self.sign_style.parse(true, strict, same_widths) {
                return Err(ParseFailure::Mismatch(position));
            }
            positive = true;
            position += first.len_utf8();
        } else if first == style.negative_sign() {
            if !self.sign_style.parse(false, strict, same_widths) {
                return Err(ParseFailure::Mismatch(position));
            }
            negative = true;
            position += first.len_utf8();
        } else if self.sign_style == SignStyle::Always && strict {
            return Err(ParseFailure::Mismatch(position));
        }

        let min_width = if fixed_width { self.min_width } else { 1 };
        let subsequent = self.subsequent_width.max(0) as usize;
        let mut max_width = if fixed_width { self.max_width } else { 9 } + subsequent;
        if text[position..].chars().take(min_width).count() < min_width {
            return Err(ParseFailure::Mismatch(position));
        }

        let mut total = 0_i128;
        let mut end = position;
        let mut last_digit = position;
        for pass in 0..2 {
            total = 0;
            end = position;
            let mut count = 0;
            for ch in text[position..].chars().take(max_width) {
                let Some(digit) = style.convert_to_digit(ch) else {
                    break;
                };
                last_digit = end;
                end += ch.len_utf8();
                count += 1;
                total = total.saturating_mul(10).saturating_add(i128::from(digit));
            }
            if count < min_width {
                return Err(ParseFailure::Mismatch(position));
            }
            if subsequent > 0 && pass == 0 {
                // Leave the digits of the adjacent fields that follow.
                max_width = min_width.max(count.saturating_sub(subsequent));
            } else {
                break;
            }
        }

        if negative {
            if total == 0 && strict {
                // Minus zero is not allowed.
                return Err(ParseFailure::Mismatch(sign_position));
            }
            total = -total;
        } else if self.sign_style == SignStyle::ExceedsPad && strict {
            let digits = text[position..end].chars().count();
            if positive && digits <= self.min_width {
                return Err(ParseFailure::Mismatch(sign_position));
            }
            if !positive && digits > self.min_width {
                return Err(ParseFailure::Mismatch(position));
            }
        }

        let value = match total.to_i64() {
            Some(value) => value,
            None => {
                // Too many digits for an i64, drop the last one.
                end = last_digit;
                (total / 10).to_i64().ok_or(ParseFailure::Mismatch(position))?
            }
        };
        Ok(ParsedNumber {
            value,
            start: position,
            end,
        })
    }

    fn set_value(&self, context: &mut ParseContext<'_>, value: i64, start: usize, end: usize) -> ParseResult {
        context.set_parsed_field(self.field, value, start, end)
    }
}

/// Digits read by [`NumberPrinterParser::parse_number`].
pub(crate) struct ParsedNumber {
    pub(crate) value: i64,
    /// The position of the first digit.
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Writeable for NumberPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.min_width == 1 && self.max_width == 19 && self.sign_style == SignStyle::Normal {
            return write!(sink, "Value({})", self.field);
        }
        if self.min_width == self.max_width && self.sign_style == SignStyle::NotNegative {
            return write!(sink, "Value({},{})", self.field, self.min_width);
        }
        write!(
            sink,
            "Value({},{},{},{})",
            self.field, self.min_width, self.max_width, self.sign_style
        )
    }
}

// ==== Reduced values ====

/// The base of a reduced value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducedBase {
    /// A fixed base value.
    Value(i32),
    /// A date whose field value, in the chronology in use, is the base.
    Date(IsoDate),
}

/// Prints and parses the low order digits of a value, such as a two digit
/// year.
///
/// Values from the base up to `10^min_width` past the base print with
/// `min_width` digits, parsing `min_width` digits gives the value in that
/// span. Other values use up to `max_width` digits as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedPrinterParser {
    pub(crate) number: NumberPrinterParser,
    pub(crate) base: ReducedBase,
}

impl ReducedPrinterParser {
    pub(crate) fn new(
        field: Field,
        min_width: usize,
        max_width: usize,
        base: ReducedBase,
    ) -> TemporalResult<Self> {
        if !(1..=10).contains(&min_width) {
            return Err(TemporalError::range().with_message(format!(
                "The minWidth must be from 1 to 10 inclusive but was {min_width}"
            )));
        }
        if !(1..=10).contains(&max_width) {
            return Err(TemporalError::range().with_message(format!(
                "The maxWidth must be from 1 to 10 inclusive but was {max_width}"
            )));
        }
        if max_width < min_width {
            return Err(TemporalError::range().with_message(format!(
                "Maximum width must exceed or equal the minimum width but {max_width} < {min_width}"
            )));
        }
        if let ReducedBase::Value(base) = base {
            if !field.range().is_valid_value(i64::from(base)) {
                return Err(TemporalError::range()
                    .with_message("The base value must be within the range of the field"));
            }
            if i64::from(base) + EXCEED_POINTS[max_width] > i64::from(i32::MAX) {
                return Err(TemporalError::range().with_message(
                    "Unable to add printer-parser as the range exceeds the capacity of an int",
                ));
            }
        }
        Ok(Self {
            number: NumberPrinterParser::new(field, min_width, max_width, SignStyle::NotNegative),
            base,
        })
    }

    pub(crate) fn with_fixed_width(mut self) -> Self {
        self.number = self.number.with_fixed_width();
        self
    }

    pub(crate) fn with_subsequent_width(mut self, width: usize) -> Self {
        self.number = self.number.with_subsequent_width(width);
        self
    }

    fn base_value(&self, chronology: &dyn crate::chronology::Chronology) -> TemporalResult<i64> {
        match self.base {
            ReducedBase::Value(value) => Ok(i64::from(value)),
            ReducedBase::Date(date) => chronology.date_field(&date, self.number.field),
        }
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(value) = context.value(self.number.field)? else {
            return Ok(false);
        };
        let base = self.base_value(context.chronology())?;
        let min_range = EXCEED_POINTS[self.number.min_width];
        let abs = i64::try_from(value.unsigned_abs()).unwrap_or(i64::MAX);
        let reduced = if value >= base && value < base + min_range {
            abs % min_range
        } else {
            abs % EXCEED_POINTS[self.number.max_width]
        };
        self.number.format_value(context, reduced, buf)?;
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        // Lenient parsing reads any number of digits.
        let parsed = self
            .number
            .parse_number(context, text, position, context.is_strict())?;
        let parse_len = text[parsed.start..parsed.end].chars().count();
        self.set_value(context, parsed.value, parse_len, parsed.start, parsed.end)
    }

    /// Expands and stores a parsed value.
    pub(crate) fn set_value(
        &self,
        context: &mut ParseContext<'_>,
        value: i64,
        parse_len: usize,
        error_pos: usize,
        success_pos: usize,
    ) -> ParseResult {
        let base = self.base_value(context.effective_chronology())?;
        if let ReducedBase::Date(_) = self.base {
            context.register_pending(PendingResolution::ReducedBase {
                parser: self.clone(),
                value,
                parse_len,
                error_pos,
                success_pos,
            });
        }
        let mut value = value;
        if parse_len == self.number.min_width && value >= 0 {
            let range = EXCEED_POINTS[self.number.min_width];
            let base_part = base - base % range;
            value = if base > 0 {
                base_part + value
            } else {
                base_part - value
            };
            if value < base {
                value += range;
            }
        }
        context.set_parsed_field(self.number.field, value, error_pos, success_pos)
    }
}

impl Writeable for ReducedPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(
            sink,
            "ReducedValue({},{},{},",
            self.number.field, self.number.min_width, self.number.max_width
        )?;
        match self.base {
            ReducedBase::Value(value) => write!(sink, "{value}")?,
            ReducedBase::Date(date) => date.write_to(sink)?,
        }
        sink.write_char(')')
    }
}
