//! Prints and parses an instant in ISO-8601 form, such as
//! `2012-06-30T12:30:40Z`.

use alloc::{format, string::String, vec};
use core::fmt::Write;

use writeable::Writeable;

use super::{
    composite::CompositePrinterParser,
    context::{ParseContext, ParseFailure, ParseResult, PrintContext},
    fraction::FractionPrinterParser,
    literal::CharLiteralPrinterParser,
    number::NumberPrinterParser,
    PrinterParser, SignStyle,
};
use crate::{
    fields::ChronoField,
    iso::{checked_u8, IsoDate, IsoDateTime, IsoTime},
    TemporalError, TemporalResult,
};

const SECONDS_PER_10000_YEARS: i64 = 146_097 * 25 * 86_400;
const SECONDS_0000_TO_1970: i64 = (146_097 * 5 - (30 * 365 + 7)) * 86_400;

/// Prints an instant in UTC, and parses one with the trailing `Z`.
///
/// Years beyond 9999 print with a leading `+`. The fractional digits are
/// fixed when positive, as many as needed for `-1`, and groups of three as
/// needed for `-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantPrinterParser {
    fractional_digits: i32,
}

impl InstantPrinterParser {
    /// The default, printing fractional digits in groups of three.
    pub(crate) const DEFAULT: Self = Self {
        fractional_digits: -2,
    };

    pub(crate) fn new(fractional_digits: i32) -> TemporalResult<Self> {
        if !(-1..=9).contains(&fractional_digits) {
            return Err(TemporalError::range().with_message(format!(
                "The fractional digits must be from -1 to 9 inclusive but was {fractional_digits}"
            )));
        }
        Ok(Self { fractional_digits })
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let seconds = context.value(ChronoField::InstantSeconds.into())?;
        let temporal = context.temporal();
        let nanos = if temporal.is_supported(ChronoField::NanoOfSecond.into()) {
            temporal.get_long(ChronoField::NanoOfSecond.into())?
        } else {
            0
        };
        let Some(seconds) = seconds else {
            return Ok(false);
        };
        let mut nanos = ChronoField::NanoOfSecond.check_valid_int_value(nanos)?;

        if seconds >= -SECONDS_0000_TO_1970 {
            let zero_seconds = seconds - SECONDS_PER_10000_YEARS + SECONDS_0000_TO_1970;
            let high = zero_seconds.div_euclid(SECONDS_PER_10000_YEARS) + 1;
            let low = zero_seconds.rem_euclid(SECONDS_PER_10000_YEARS);
            let local = IsoDateTime::from_epoch_seconds(low - SECONDS_0000_TO_1970, 0, 0)?;
            if high > 0 {
                buf.push('+');
                let _ = write!(buf, "{high}");
            }
            let _ = local.write_to(buf);
            if local.time.second == 0 {
                buf.push_str(":00");
            }
        } else {
            let zero_seconds = seconds + SECONDS_0000_TO_1970;
            let high = zero_seconds / SECONDS_PER_10000_YEARS;
            let low = zero_seconds % SECONDS_PER_10000_YEARS;
            let local = IsoDateTime::from_epoch_seconds(low - SECONDS_0000_TO_1970, 0, 0)?;
            let start = buf.len();
            let _ = local.write_to(buf);
            if local.time.second == 0 {
                buf.push_str(":00");
            }
            if high < 0 {
                if local.date.year == -10_000 {
                    buf.replace_range(start..start + 2, &format!("{}", high - 1));
                } else if low == 0 {
                    buf.insert_str(start, &format!("{high}"));
                } else {
                    buf.insert_str(start + 1, &format!("{}", high.abs()));
                }
            }
        }

        let digits = self.fractional_digits;
        if (digits < 0 && nanos > 0) || digits > 0 {
            buf.push('.');
            let mut div = 100_000_000;
            let mut i = 0;
            while (digits == -1 && nanos > 0)
                || (digits == -2 && (nanos > 0 || i % 3 != 0))
                || i < digits
            {
                let digit = nanos / div;
                buf.push(char::from(b'0' + digit as u8));
                nanos -= digit * div;
                div /= 10;
                i += 1;
            }
        }
        buf.push('Z');
        Ok(true)
    }

    fn local_parser(&self) -> CompositePrinterParser {
        let (min_digits, max_digits) = if self.fractional_digits < 0 {
            (0, 9)
        } else {
            (self.fractional_digits as usize, self.fractional_digits as usize)
        };
        let value = |field: ChronoField| {
            PrinterParser::Number(NumberPrinterParser::new(
                field.into(),
                2,
                2,
                SignStyle::NotNegative,
            ))
        };
        let literal = |ch| PrinterParser::CharLiteral(CharLiteralPrinterParser(ch));
        let mut printer_parsers = vec![
            PrinterParser::Number(NumberPrinterParser::new(
                ChronoField::Year.into(),
                4,
                10,
                SignStyle::ExceedsPad,
            )),
            literal('-'),
            value(ChronoField::MonthOfYear),
            literal('-'),
            value(ChronoField::DayOfMonth),
            literal('T'),
            value(ChronoField::HourOfDay),
            literal(':'),
            value(ChronoField::MinuteOfHour),
            literal(':'),
            value(ChronoField::SecondOfMinute),
        ];
        // The nano-of-second range is fixed and the widths are in range.
        if let Ok(fraction) = FractionPrinterParser::new(
            ChronoField::NanoOfSecond.into(),
            min_digits,
            max_digits,
            true,
        ) {
            printer_parsers.push(PrinterParser::Fraction(fraction));
        }
        printer_parsers.push(literal('Z'));
        CompositePrinterParser::new(printer_parsers, false)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        // A separate context keeps the local fields out of the result.
        let mut local = context.copy();
        let end = self.local_parser().parse(&mut local, text, position)?;
        let parsed = |field: ChronoField| local.parsed_field(field).unwrap_or(0);
        let year_parsed = parsed(ChronoField::Year);
        let mut hour = parsed(ChronoField::HourOfDay);
        let minute = parsed(ChronoField::MinuteOfHour);
        let mut second = parsed(ChronoField::SecondOfMinute);
        let nano = parsed(ChronoField::NanoOfSecond);
        let mut days = 0;
        if hour == 24 && minute == 0 && second == 0 && nano == 0 {
            hour = 0;
            days = 1;
        } else if hour == 23 && minute == 59 && second == 60 {
            context.set_parsed_leap_second();
            second = 59;
        }

        let instant_seconds = epoch_seconds(
            year_parsed,
            parsed(ChronoField::MonthOfYear),
            parsed(ChronoField::DayOfMonth),
            days,
            (hour, minute, second),
        );
        let Ok(instant_seconds) = instant_seconds else {
            return Err(ParseFailure::Mismatch(position));
        };
        let end = context.set_parsed_field(ChronoField::InstantSeconds, instant_seconds, position, end)?;
        context.set_parsed_field(ChronoField::NanoOfSecond, nano, position, end)
    }
}

/// The epoch seconds of a parsed UTC date-time, whose year may be beyond
/// the four digits of the local date.
fn epoch_seconds(
    year_parsed: i64,
    month: i64,
    day: i64,
    plus_days: i64,
    (hour, minute, second): (i64, i64, i64),
) -> TemporalResult<i64> {
    let date = IsoDate::new(
        (year_parsed % 10_000) as i32,
        checked_u8(ChronoField::MonthOfYear, month)?,
        checked_u8(ChronoField::DayOfMonth, day)?,
    )?
    .plus_days(plus_days)?;
    let time = IsoTime::new(
        checked_u8(ChronoField::HourOfDay, hour)?,
        checked_u8(ChronoField::MinuteOfHour, minute)?,
        checked_u8(ChronoField::SecondOfMinute, second)?,
        0,
    )?;
    let epoch_seconds = IsoDateTime::new(date, time).to_epoch_seconds(0);
    (year_parsed / 10_000)
        .checked_mul(SECONDS_PER_10000_YEARS)
        .and_then(|shift| epoch_seconds.checked_add(shift))
        .ok_or_else(|| TemporalError::range().with_message("Instant exceeds the supported range."))
}

impl Writeable for InstantPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str("Instant()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::{DateTimeFormatter, DateTimeFormatterBuilder},
        offset::ZoneOffset,
        temporal::{Instant, TemporalAccessor},
    };

    fn formatter(digits: i32) -> DateTimeFormatter {
        DateTimeFormatterBuilder::new()
            .append_instant_digits(digits)
            .unwrap()
            .to_formatter()
    }

    fn instant(seconds: i64, nanos: u32) -> Instant {
        Instant::new(seconds, nanos).unwrap()
    }

    #[test]
    fn format_instants() {
        let iso = DateTimeFormatter::iso_instant();
        assert_eq!(iso.format(&instant(0, 0)).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(
            iso.format(&instant(1_341_100_799, 0)).unwrap(),
            "2012-06-30T23:59:59Z"
        );
        assert_eq!(
            iso.format(&instant(1_341_100_799, 120_000_000)).unwrap(),
            "2012-06-30T23:59:59.120Z"
        );
        assert_eq!(iso.format(&instant(-1, 0)).unwrap(), "1969-12-31T23:59:59Z");
        // Year 10000 and beyond carries a sign.
        assert_eq!(
            iso.format(&instant(253_402_300_800, 0)).unwrap(),
            "+10000-01-01T00:00:00Z"
        );
        // Year -10000 and before.
        assert_eq!(
            iso.format(&instant(-377_736_739_200, 0)).unwrap(),
            "-10000-01-01T00:00:00Z"
        );
    }

    #[test]
    fn fractional_digits() {
        let value = instant(0, 120_000_000);
        assert_eq!(formatter(-1).format(&value).unwrap(), "1970-01-01T00:00:00.12Z");
        assert_eq!(formatter(0).format(&value).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(formatter(4).format(&value).unwrap(), "1970-01-01T00:00:00.1200Z");
        assert!(DateTimeFormatterBuilder::new().append_instant_digits(10).is_err());
        assert!(DateTimeFormatterBuilder::new().append_instant_digits(-2).is_err());
    }

    #[test]
    fn parse_leap_second() {
        let formatter = DateTimeFormatter::iso_instant();
        let resolved = formatter.parse("2012-06-30T23:59:60Z").unwrap();
        assert!(resolved.is_leap_second());
        let seconds = resolved.get_long(ChronoField::InstantSeconds.into()).unwrap();
        let local = IsoDateTime::from_epoch_seconds(seconds, 0, 0).unwrap();
        assert_eq!(local.time.second, 59);
        assert_eq!(seconds, 1_341_100_799);
    }

    #[test]
    fn parse_end_of_day() {
        let formatter = DateTimeFormatter::iso_instant();
        let resolved = formatter.parse("2012-06-30T24:00:00Z").unwrap();
        assert!(!resolved.is_leap_second());
        let seconds = resolved.get_long(ChronoField::InstantSeconds.into()).unwrap();
        let local = IsoDateTime::from_epoch_seconds(seconds, 0, 0).unwrap();
        assert_eq!(local.date, IsoDate::new(2012, 7, 1).unwrap());
        assert_eq!(local.time.hour, 0);
    }

    #[test]
    fn parse_with_zone_override() {
        let formatter = DateTimeFormatter::iso_instant().with_zone(ZoneOffset::UTC.into());
        let resolved = formatter.parse("2012-06-30T12:00:00.5Z").unwrap();
        assert_eq!(
            resolved.date_time().map(|dt| dt.to_string()),
            Some("2012-06-30T12:00:00.500".into())
        );
        assert_eq!(resolved.get_long(ChronoField::NanoOfSecond.into()).unwrap(), 500_000_000);
    }

    #[test]
    fn parse_failures() {
        let formatter = DateTimeFormatter::iso_instant();
        assert!(formatter.parse("2012-06-30T12:00:00").is_err());
        // Invalid dates do not match.
        let err = formatter.parse("2012-02-30T12:00:00Z").unwrap_err();
        assert_eq!(err.error_index(), Some(0));
        let parsed = formatter.parse("+12012-06-30T12:00:00Z").unwrap();
        assert_eq!(
            parsed.get_long(ChronoField::InstantSeconds.into()).unwrap(),
            315_569_520_000 + 1_341_057_600
        );
    }
}
