//! Printer-parsers for offsets from UTC.

use alloc::{format, string::String};
use core::fmt::Write;

use writeable::Writeable;

use super::context::{ParseContext, ParseFailure, ParseResult, PrintContext};
use crate::{
    fields::{ChronoField, Field},
    provider::TextStyle,
    TemporalError, TemporalResult,
};

/// The patterns of [`OffsetIdPrinterParser`], by type.
///
/// Upper case minutes and seconds are always printed, lower case ones
/// only when they are not zero.
pub(crate) const OFFSET_PATTERNS: [&str; 9] = [
    "+HH",
    "+HHmm",
    "+HH:mm",
    "+HHMM",
    "+HH:MM",
    "+HHMMss",
    "+HH:MM:ss",
    "+HHMMSS",
    "+HH:MM:SS",
];

const OFFSET_SECONDS: Field = Field::Chrono(ChronoField::OffsetSeconds);

fn push_two_digits(buf: &mut String, value: u32) {
    buf.push(char::from(b'0' + (value / 10) as u8));
    buf.push(char::from(b'0' + (value % 10) as u8));
}

/// Splits an offset into the absolute hours, minutes and seconds.
fn split_offset(total: i64) -> (u32, u32, u32) {
    let hours = ((total / 3600) % 100).unsigned_abs() as u32;
    let minutes = ((total / 60) % 60).unsigned_abs() as u32;
    let seconds = (total % 60).unsigned_abs() as u32;
    (hours, minutes, seconds)
}

/// Prints and parses an offset such as `+01:00`, using a text like `Z`
/// for a zero offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetIdPrinterParser {
    pattern_type: usize,
    no_offset_text: String,
}

impl OffsetIdPrinterParser {
    pub(crate) fn new(pattern: &str, no_offset_text: &str) -> TemporalResult<Self> {
        let pattern_type = OFFSET_PATTERNS
            .iter()
            .position(|known| *known == pattern)
            .ok_or_else(|| {
                TemporalError::range().with_message(format!("Invalid zone offset pattern: {pattern}"))
            })?;
        Ok(Self {
            pattern_type,
            no_offset_text: no_offset_text.into(),
        })
    }

    /// `+HH:MM:ss` with `Z` for zero.
    pub(crate) fn id_z() -> Self {
        Self {
            pattern_type: 6,
            no_offset_text: "Z".into(),
        }
    }

    /// `+HH:MM:ss` with `0` for zero.
    pub(crate) fn id_zero() -> Self {
        Self {
            pattern_type: 6,
            no_offset_text: "0".into(),
        }
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(total) = context.value(OFFSET_SECONDS)? else {
            return Ok(false);
        };
        if total == 0 {
            buf.push_str(&self.no_offset_text);
            return Ok(true);
        }
        let (hours, minutes, seconds) = split_offset(total);
        let start = buf.len();
        let separator = self.pattern_type % 2 == 0;
        buf.push(if total < 0 { '-' } else { '+' });
        push_two_digits(buf, hours);
        let mut output = hours;
        if self.pattern_type >= 3 || (self.pattern_type >= 1 && minutes > 0) {
            if separator {
                buf.push(':');
            }
            push_two_digits(buf, minutes);
            output += minutes;
            if self.pattern_type >= 7 || (self.pattern_type >= 5 && seconds > 0) {
                if separator {
                    buf.push(':');
                }
                push_two_digits(buf, seconds);
                output += seconds;
            }
        }
        if output == 0 {
            // Only seconds that the pattern does not print.
            buf.truncate(start);
            buf.push_str(&self.no_offset_text);
        }
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let at_end = position >= text.len();
        if self.no_offset_text.is_empty() {
            if at_end {
                return context.set_parsed_field(OFFSET_SECONDS, 0, position, position);
            }
        } else {
            if at_end {
                return Err(ParseFailure::Mismatch(position));
            }
            if let Some(end) = context.sub_sequence_equals(text, position, &self.no_offset_text) {
                return context.set_parsed_field(OFFSET_SECONDS, 0, position, end);
            }
        }

        let bytes = text.as_bytes();
        if let Some(sign @ (b'+' | b'-')) = bytes.get(position) {
            let negative = *sign == b'-';
            let mut values = [0_i64; 3];
            let mut pos = position + 1;
            let failed = self.parse_number(&mut values, &mut pos, 0, bytes, true)
                || self.parse_number(&mut values, &mut pos, 1, bytes, self.pattern_type >= 3)
                || self.parse_number(&mut values, &mut pos, 2, bytes, false);
            if !failed {
                let total = values[0] * 3600 + values[1] * 60 + values[2];
                let total = if negative { -total } else { total };
                return context.set_parsed_field(OFFSET_SECONDS, total, position, pos);
            }
        }
        if self.no_offset_text.is_empty() {
            return context.set_parsed_field(OFFSET_SECONDS, 0, position, position);
        }
        Err(ParseFailure::Mismatch(position))
    }

    /// Reads the two digits of hours, minutes or seconds, returning whether
    /// parsing failed. Parts the pattern does not have, and parts that are
    /// absent and not required, succeed without reading.
    fn parse_number(
        &self,
        values: &mut [i64; 3],
        pos: &mut usize,
        index: usize,
        bytes: &[u8],
        required: bool,
    ) -> bool {
        if (self.pattern_type + 3) / 2 < index + 1 {
            return false;
        }
        let mut at = *pos;
        if self.pattern_type % 2 == 0 && index > 0 {
            if bytes.get(at) != Some(&b':') {
                return required;
            }
            at += 1;
        }
        let value = match (bytes.get(at), bytes.get(at + 1)) {
            (Some(tens @ b'0'..=b'9'), Some(ones @ b'0'..=b'9')) => {
                i64::from(tens - b'0') * 10 + i64::from(ones - b'0')
            }
            _ => return required,
        };
        if value > 59 {
            return required;
        }
        values[index] = value;
        *pos = at + 2;
        false
    }
}

impl Writeable for OffsetIdPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(
            sink,
            "Offset({},'{}')",
            OFFSET_PATTERNS[self.pattern_type],
            self.no_offset_text.replace('\'', "''")
        )
    }
}

/// Prints and parses a localized offset such as `GMT+1` or `GMT+01:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedOffsetPrinterParser {
    style: TextStyle,
}

impl LocalizedOffsetPrinterParser {
    pub(crate) fn new(style: TextStyle) -> TemporalResult<Self> {
        if !matches!(style, TextStyle::Full | TextStyle::Short) {
            return Err(TemporalError::r#type().with_message("Style must be either full or short"));
        }
        Ok(Self { style })
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let Some(total) = context.value(OFFSET_SECONDS)? else {
            return Ok(false);
        };
        buf.push_str("GMT");
        if total == 0 {
            return Ok(true);
        }
        let (hours, minutes, seconds) = split_offset(total);
        buf.push(if total < 0 { '-' } else { '+' });
        if self.style == TextStyle::Full {
            push_two_digits(buf, hours);
            buf.push(':');
            push_two_digits(buf, minutes);
            if seconds != 0 {
                buf.push(':');
                push_two_digits(buf, seconds);
            }
        } else {
            if hours >= 10 {
                buf.push(char::from(b'0' + (hours / 10) as u8));
            }
            buf.push(char::from(b'0' + (hours % 10) as u8));
            if minutes != 0 || seconds != 0 {
                buf.push(':');
                push_two_digits(buf, minutes);
                if seconds != 0 {
                    buf.push(':');
                    push_two_digits(buf, seconds);
                }
            }
        }
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let Some(mut pos) = context.sub_sequence_equals(text, position, "GMT") else {
            return Err(ParseFailure::Mismatch(position));
        };
        let bytes = text.as_bytes();
        let digit = |at: usize| -> Option<i64> {
            bytes
                .get(at)
                .filter(|byte| byte.is_ascii_digit())
                .map(|byte| i64::from(byte - b'0'))
        };
        // A colon and two digits at `at`.
        let colon_pair = |at: usize| -> Option<i64> {
            if bytes.get(at) != Some(&b':') {
                return None;
            }
            Some(digit(at + 1)? * 10 + digit(at + 2)?)
        };

        let negative = match bytes.get(pos) {
            Some(b'+') => false,
            Some(b'-') => true,
            _ => return context.set_parsed_field(OFFSET_SECONDS, 0, position, pos),
        };
        pos += 1;
        let (mut hours, mut minutes, mut seconds) = (0, 0, 0);
        if self.style == TextStyle::Full {
            let (Some(tens), Some(ones)) = (digit(pos), digit(pos + 1)) else {
                return Err(ParseFailure::Mismatch(position));
            };
            hours = tens * 10 + ones;
            pos += 2;
            let Some(value) = colon_pair(pos) else {
                return Err(ParseFailure::Mismatch(position));
            };
            minutes = value;
            pos += 3;
            if let Some(value) = colon_pair(pos) {
                seconds = value;
                pos += 3;
            }
        } else {
            let Some(first) = digit(pos) else {
                return Err(ParseFailure::Mismatch(position));
            };
            hours = first;
            pos += 1;
            if let Some(second) = digit(pos) {
                hours = hours * 10 + second;
                pos += 1;
            }
            if let Some(value) = colon_pair(pos) {
                minutes = value;
                pos += 3;
                if let Some(value) = colon_pair(pos) {
                    seconds = value;
                    pos += 3;
                }
            }
        }
        let total = hours * 3600 + minutes * 60 + seconds;
        let total = if negative { -total } else { total };
        context.set_parsed_field(OFFSET_SECONDS, total, position, pos)
    }
}

impl Writeable for LocalizedOffsetPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(sink, "LocalizedOffset({})", self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::{DateTimeFormatter, DateTimeFormatterBuilder, ParsePosition},
        iso::{IsoDate, IsoDateTime, IsoTime},
        offset::ZoneOffset,
        temporal::OffsetDateTime,
    };

    fn at_offset(seconds: i32) -> OffsetDateTime {
        let date_time = IsoDateTime::new(
            IsoDate::new(2012, 6, 30).unwrap(),
            IsoTime::new(12, 0, 0, 0).unwrap(),
        );
        OffsetDateTime::new(date_time, ZoneOffset::from_total_seconds(seconds).unwrap())
    }

    fn offset_id(pattern: &str, zero: &str) -> DateTimeFormatter {
        DateTimeFormatterBuilder::new()
            .append_offset(pattern, zero)
            .unwrap()
            .to_formatter()
    }

    #[test]
    fn format_patterns() {
        let cases = [
            ("+HH", 3600, "+01"),
            ("+HH", 5400, "+01"),
            ("+HH", 1800, "Z"),
            ("+HHmm", 3600, "+01"),
            ("+HHmm", 5400, "+0130"),
            ("+HH:mm", 5400, "+01:30"),
            ("+HHMM", 3600, "+0100"),
            ("+HH:MM", -3600, "-01:00"),
            ("+HH:MM:ss", 3600, "+01:00"),
            ("+HH:MM:ss", 3661, "+01:01:01"),
            ("+HH:MM:SS", 3600, "+01:00:00"),
            ("+HH:MM", 0, "Z"),
        ];
        for (pattern, seconds, expected) in cases {
            assert_eq!(
                offset_id(pattern, "Z").format(&at_offset(seconds)).unwrap(),
                expected,
                "{pattern} {seconds}"
            );
        }
    }

    #[test]
    fn parse_patterns() {
        let parse = |pattern: &str, zero: &str, text: &str| {
            offset_id(pattern, zero)
                .parse_unresolved_at(text, 0)
                .and_then(|parsed| parsed.fields().get(ChronoField::OffsetSeconds))
        };
        assert_eq!(parse("+HH:MM", "Z", "+01:30"), Some(5400));
        assert_eq!(parse("+HH:MM", "Z", "Z"), Some(0));
        assert_eq!(parse("+HH:MM", "Z", "+0130"), None);
        assert_eq!(parse("+HHmm", "Z", "+01"), Some(3600));
        assert_eq!(parse("+HHmm", "Z", "-0130"), Some(-5400));
        assert_eq!(parse("+HH:MM:ss", "Z", "+01:00:30"), Some(3630));
        assert_eq!(parse("+HH", "", "+99"), Some(0));
        assert_eq!(parse("+HH:MM", "", ""), Some(0));
        assert_eq!(parse("+HH:MM", "", "x"), Some(0));
    }

    #[test]
    fn offset_id_round_trip() {
        let quarter_hours = (-72..=72).map(|quarters| quarters * 900);
        let with_seconds = [59, -59, 3661, -3661, 45_296, -45_296, 64_799, -64_799];
        for (pattern_type, pattern) in OFFSET_PATTERNS.iter().enumerate() {
            for zero in ["Z", ""] {
                let formatter = offset_id(pattern, zero);
                for total in quarter_hours.clone().chain(with_seconds) {
                    let text = formatter.format(&at_offset(total)).unwrap();
                    let total = i64::from(total);
                    let mut expected = total / 3600 * 3600;
                    if pattern_type >= 1 {
                        expected += total / 60 % 60 * 60;
                    }
                    if pattern_type >= 5 {
                        expected += total % 60;
                    }
                    let mut position = ParsePosition::new(0);
                    let parsed = formatter
                        .parse_unresolved(&text, &mut position)
                        .and_then(|parsed| parsed.fields().get(ChronoField::OffsetSeconds));
                    assert_eq!(parsed, Some(expected), "{pattern} {total} {text}");
                    assert_eq!(position.index(), text.len(), "{pattern} {total} {text}");
                }
            }
        }
    }

    #[test]
    fn invalid_pattern() {
        let err = DateTimeFormatterBuilder::new()
            .append_offset("+HHMMs", "Z")
            .unwrap_err();
        assert_eq!(err.message(), "Invalid zone offset pattern: +HHMMs");
    }

    #[test]
    fn localized_offset() {
        let full = DateTimeFormatterBuilder::new()
            .append_localized_offset(TextStyle::Full)
            .unwrap()
            .to_formatter();
        let short = DateTimeFormatterBuilder::new()
            .append_localized_offset(TextStyle::Short)
            .unwrap()
            .to_formatter();
        assert_eq!(full.format(&at_offset(3600)).unwrap(), "GMT+01:00");
        assert_eq!(short.format(&at_offset(3600)).unwrap(), "GMT+1");
        assert_eq!(short.format(&at_offset(-37800)).unwrap(), "GMT-10:30");
        assert_eq!(short.format(&at_offset(0)).unwrap(), "GMT");

        let parse = |formatter: &DateTimeFormatter, text: &str| {
            formatter
                .parse_unresolved_at(text, 0)
                .and_then(|parsed| parsed.fields().get(ChronoField::OffsetSeconds))
        };
        assert_eq!(parse(&full, "GMT+01:00"), Some(3600));
        assert_eq!(parse(&full, "GMT+1"), None);
        assert_eq!(parse(&short, "GMT+1"), Some(3600));
        assert_eq!(parse(&short, "GMT-10:30"), Some(-37800));
        assert_eq!(parse(&short, "GMT"), Some(0));

        assert!(DateTimeFormatterBuilder::new()
            .append_localized_offset(TextStyle::Narrow)
            .is_err());
    }
}
