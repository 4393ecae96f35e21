//! Prints and parses a field as a decimal fraction of its range.

use alloc::{format, string::String};
use core::fmt::Write;

use writeable::Writeable;

use super::context::{ParseContext, ParseFailure, ParseResult, PrintContext};
use crate::{fields::Field, temporal_assert, TemporalError, TemporalResult};

const SCALE: i128 = 1_000_000_000;

/// Prints a field as a fraction, so a nano-of-second of 500_000_000 is
/// `5` and a minute-of-hour of 15 is `25`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionPrinterParser {
    field: Field,
    min_width: usize,
    max_width: usize,
    decimal_point: bool,
}

impl FractionPrinterParser {
    pub(crate) fn new(
        field: Field,
        min_width: usize,
        max_width: usize,
        decimal_point: bool,
    ) -> TemporalResult<Self> {
        if !field.range().is_fixed() {
            return Err(TemporalError::range().with_message(format!(
                "Field must have a fixed set of values: {field}"
            )));
        }
        if min_width > 9 {
            return Err(TemporalError::range().with_message(format!(
                "Minimum width must be from 0 to 9 inclusive but was {min_width}"
            )));
        }
        if !(1..=9).contains(&max_width) {
            return Err(TemporalError::range().with_message(format!(
                "Maximum width must be from 1 to 9 inclusive but was {max_width}"
            )));
        }
        if max_width < min_width {
            return Err(TemporalError::range().with_message(format!(
                "Maximum width must exceed or equal the minimum width but {max_width} < {min_width}"
            )));
        }
        Ok(Self {
            field,
            min_width,
            max_width,
            decimal_point,
        })
    }

    /// The nine digit fraction of a value, and the number of them that are
    /// significant.
    fn to_fraction(&self, value: i64) -> TemporalResult<(String, usize)> {
        let range = self.field.range();
        range.check_valid_value(value, self.field.name())?;
        let span = i128::from(range.maximum()) - i128::from(range.minimum()) + 1;
        let offset = i128::from(value) - i128::from(range.minimum());
        let nines = (offset * SCALE).div_euclid(span);
        let digits = format!("{nines:09}");
        temporal_assert!(digits.len() == 9, "Fraction of {value} exceeds nine digits");
        let significant = digits.trim_end_matches('0').len();
        Ok((digits, significant))
    }

    fn from_fraction(&self, total: i128, digits: usize) -> i64 {
        let range = self.field.range();
        let span = i128::from(range.maximum()) - i128::from(range.minimum()) + 1;
        let scaled = (span * total).div_euclid(10_i128.pow(digits as u32));
        (scaled + i128::from(range.minimum())) as i64
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(value) = context.value(self.field)? else {
            return Ok(false);
        };
        let style = context.decimal_style();
        let (digits, significant) = self.to_fraction(value)?;
        if significant == 0 {
            if self.min_width > 0 {
                if self.decimal_point {
                    buf.push(style.decimal_separator());
                }
                for _ in 0..self.min_width {
                    buf.push(style.zero_digit());
                }
            }
            return Ok(true);
        }
        let width = significant.clamp(self.min_width, self.max_width);
        if self.decimal_point {
            buf.push(style.decimal_separator());
        }
        style.push_digits(&digits[..width], buf);
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let (min_width, max_width) = if context.is_strict() {
            (self.min_width, self.max_width)
        } else {
            (0, 9)
        };
        let style = context.decimal_style();
        let mut position = position;
        let mut rest = text[position..].chars().peekable();
        let Some(&first) = rest.peek() else {
            // An absent fraction is fine unless digits are required.
            return if min_width > 0 {
                Err(ParseFailure::Mismatch(position))
            } else {
                Ok(position)
            };
        };
        if self.decimal_point {
            if first != style.decimal_separator() {
                return if min_width > 0 {
                    Err(ParseFailure::Mismatch(position))
                } else {
                    Ok(position)
                };
            }
            rest.next();
            position += first.len_utf8();
        }

        let mut total = 0_i128;
        let mut count = 0;
        let mut end = position;
        for ch in rest.take(max_width) {
            let Some(digit) = style.convert_to_digit(ch) else {
                break;
            };
            total = total * 10 + i128::from(digit);
            count += 1;
            end += ch.len_utf8();
        }
        if count < min_width {
            return Err(ParseFailure::Mismatch(position));
        }
        let value = self.from_fraction(total, count);
        context.set_parsed_field(self.field, value, position, end)
    }
}

impl Writeable for FractionPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(
            sink,
            "Fraction({},{},{}",
            self.field, self.min_width, self.max_width
        )?;
        if self.decimal_point {
            sink.write_str(",DecimalPoint")?;
        }
        sink.write_char(')')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fields::ChronoField,
        format::{DateTimeFormatter, DateTimeFormatterBuilder},
        iso::IsoTime,
    };

    fn formatter(min: usize, max: usize, decimal_point: bool) -> DateTimeFormatter {
        DateTimeFormatterBuilder::new()
            .append_fraction(ChronoField::NanoOfSecond, min, max, decimal_point)
            .unwrap()
            .to_formatter()
    }

    fn nanos(nanos: u32) -> IsoTime {
        IsoTime::new(12, 0, 0, nanos).unwrap()
    }

    #[test]
    fn format_widths() {
        assert_eq!(formatter(0, 9, true).format(&nanos(0)).unwrap(), "");
        assert_eq!(formatter(2, 9, true).format(&nanos(0)).unwrap(), ".00");
        assert_eq!(formatter(0, 9, true).format(&nanos(500_000_000)).unwrap(), ".5");
        assert_eq!(formatter(3, 9, false).format(&nanos(500_000_000)).unwrap(), "500");
        assert_eq!(formatter(0, 3, true).format(&nanos(123_456_789)).unwrap(), ".123");
        assert_eq!(formatter(0, 9, true).format(&nanos(1)).unwrap(), ".000000001");
    }

    #[test]
    fn minute_fraction() {
        let formatter = DateTimeFormatterBuilder::new()
            .append_fraction(ChronoField::MinuteOfHour, 0, 9, true)
            .unwrap()
            .to_formatter();
        let time = IsoTime::new(12, 15, 0, 0).unwrap();
        assert_eq!(formatter.format(&time).unwrap(), ".25");
        let parsed = formatter.parse_unresolved_at(".25", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::MinuteOfHour), Some(15));
    }

    #[test]
    fn parse_digits() {
        let parsed = formatter(0, 9, true).parse_unresolved_at(".123", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::NanoOfSecond), Some(123_000_000));
        let parsed = formatter(0, 9, true).parse_unresolved_at("", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::NanoOfSecond), None);

        let strict = DateTimeFormatterBuilder::new()
            .parse_strict()
            .append_fraction(ChronoField::NanoOfSecond, 3, 3, true)
            .unwrap()
            .to_formatter();
        assert!(strict.parse_unresolved_at(".12", 0).is_none());
        assert!(strict.parse_unresolved_at("123", 0).is_none());
        let parsed = strict.parse_unresolved_at(".120", 0).unwrap();
        assert_eq!(parsed.fields().get(ChronoField::NanoOfSecond), Some(120_000_000));
    }

    #[test]
    fn validation() {
        let builder = || DateTimeFormatterBuilder::new();
        let err = builder()
            .append_fraction(ChronoField::DayOfMonth, 0, 9, true)
            .unwrap_err();
        assert_eq!(err.message(), "Field must have a fixed set of values: DayOfMonth");
        assert!(builder().append_fraction(ChronoField::NanoOfSecond, 10, 9, true).is_err());
        assert!(builder().append_fraction(ChronoField::NanoOfSecond, 0, 0, true).is_err());
        assert!(builder().append_fraction(ChronoField::NanoOfSecond, 5, 4, true).is_err());
    }

    #[test]
    fn description() {
        let pp = FractionPrinterParser::new(ChronoField::NanoOfSecond.into(), 0, 9, true).unwrap();
        assert_eq!(pp.write_to_string(), "Fraction(NanoOfSecond,0,9,DecimalPoint)");
    }
}
