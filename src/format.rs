//! Formatting and parsing of dates, times and instants.
//!
//! A [`DateTimeFormatter`] is built once, with a [`DateTimeFormatterBuilder`]
//! or a pattern, and then used for any number of calls from any number of
//! threads. It is a sequence of [`PrinterParser`]s that each print part of
//! a temporal and parse the same part back into field values.
//!
//! ```rust
//! use temporal_format::{format::DateTimeFormatter, iso::IsoDate};
//!
//! let formatter = DateTimeFormatter::of_pattern("yyyy-MM-dd").unwrap();
//! let date = IsoDate::new(2012, 6, 30).unwrap();
//! assert_eq!(formatter.format(&date).unwrap(), "2012-06-30");
//!
//! let resolved = formatter.parse("2012-06-30").unwrap();
//! assert_eq!(resolved.date(), Some(date));
//! ```

use alloc::string::String;
use core::fmt::Write;

use writeable::Writeable;

mod builder;
mod chrono;
mod composite;
mod context;
mod formatter;
mod fraction;
mod instant;
mod literal;
mod number;
mod offset;
mod parsed;
mod style;
mod text;
mod zone;

#[doc(inline)]
pub use builder::DateTimeFormatterBuilder;
#[doc(inline)]
pub use formatter::{DateTimeFormatter, FormatResources, ParsePosition};
#[doc(inline)]
pub use parsed::{Parsed, ResolvedTemporal};
#[doc(inline)]
pub use style::{DecimalStyle, SignStyle};

pub use chrono::{ChronologyIdPrinterParser, LocalizedPrinterParser, WeekBasedPrinterParser};
pub use composite::{CompositePrinterParser, DefaultValueParser, PadPrinterParser, SettingsParser};
pub use fraction::FractionPrinterParser;
pub use instant::InstantPrinterParser;
pub use literal::{CharLiteralPrinterParser, StringLiteralPrinterParser};
pub use number::{NumberPrinterParser, ReducedBase, ReducedPrinterParser};
pub use offset::{LocalizedOffsetPrinterParser, OffsetIdPrinterParser};
pub use text::{CustomTexts, TextPrinterParser, TextSource};
pub use zone::{PrefixTree, ZoneIdPrinterParser, ZoneQuery, ZoneTextPrinterParser};

use crate::TemporalResult;
use context::{ParseContext, ParseResult, PrintContext};

/// One part of a format: prints part of a temporal and parses the same
/// part back into field values.
///
/// Printer-parsers are immutable, so a formatter can be shared between
/// threads. Each call uses its own context.
#[derive(Debug, Clone, PartialEq)]
pub enum PrinterParser {
    CharLiteral(CharLiteralPrinterParser),
    StringLiteral(StringLiteralPrinterParser),
    Number(NumberPrinterParser),
    Reduced(ReducedPrinterParser),
    Fraction(FractionPrinterParser),
    Text(TextPrinterParser),
    Pad(PadPrinterParser),
    Composite(CompositePrinterParser),
    Settings(SettingsParser),
    DefaultValue(DefaultValueParser),
    Instant(InstantPrinterParser),
    OffsetId(OffsetIdPrinterParser),
    LocalizedOffset(LocalizedOffsetPrinterParser),
    ZoneId(ZoneIdPrinterParser),
    ZoneText(ZoneTextPrinterParser),
    ChronologyId(ChronologyIdPrinterParser),
    Localized(LocalizedPrinterParser),
    WeekBased(WeekBasedPrinterParser),
}

impl PrinterParser {
    /// Prints into `buf`.
    ///
    /// Returns `false` when a value is missing inside an optional section,
    /// the caller then discards the partial output of the section.
    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        match self {
            Self::CharLiteral(pp) => Ok(pp.format(buf)),
            Self::StringLiteral(pp) => Ok(pp.format(buf)),
            Self::Number(pp) => pp.format(context, buf),
            Self::Reduced(pp) => pp.format(context, buf),
            Self::Fraction(pp) => pp.format(context, buf),
            Self::Text(pp) => pp.format(context, buf),
            Self::Pad(pp) => pp.format(context, buf),
            Self::Composite(pp) => pp.format(context, buf),
            Self::Settings(_) | Self::DefaultValue(_) => Ok(true),
            Self::Instant(pp) => pp.format(context, buf),
            Self::OffsetId(pp) => pp.format(context, buf),
            Self::LocalizedOffset(pp) => pp.format(context, buf),
            Self::ZoneId(pp) => pp.format(context, buf),
            Self::ZoneText(pp) => pp.format(context, buf),
            Self::ChronologyId(pp) => pp.format(context, buf),
            Self::Localized(pp) => pp.format(context, buf),
            Self::WeekBased(pp) => pp.format(context, buf),
        }
    }

    /// Parses `text` from `position`, returning the position after the
    /// match.
    pub(crate) fn parse(&self, context: &mut ParseContext<'_>, text: &str, position: usize) -> ParseResult {
        match self {
            Self::CharLiteral(pp) => pp.parse(context, text, position),
            Self::StringLiteral(pp) => pp.parse(context, text, position),
            Self::Number(pp) => pp.parse(context, text, position),
            Self::Reduced(pp) => pp.parse(context, text, position),
            Self::Fraction(pp) => pp.parse(context, text, position),
            Self::Text(pp) => pp.parse(context, text, position),
            Self::Pad(pp) => pp.parse(context, text, position),
            Self::Composite(pp) => pp.parse(context, text, position),
            Self::Settings(pp) => pp.parse(context, position),
            Self::DefaultValue(pp) => pp.parse(context, position),
            Self::Instant(pp) => pp.parse(context, text, position),
            Self::OffsetId(pp) => pp.parse(context, text, position),
            Self::LocalizedOffset(pp) => pp.parse(context, text, position),
            Self::ZoneId(pp) => pp.parse(context, text, position),
            Self::ZoneText(pp) => pp.parse(context, text, position),
            Self::ChronologyId(pp) => pp.parse(context, text, position),
            Self::Localized(pp) => pp.parse(context, text, position),
            Self::WeekBased(pp) => pp.parse(context, text, position),
        }
    }

    /// The minimum and maximum width and sign style of a numeric value,
    /// used to reserve widths between adjacent values.
    pub(crate) fn value_widths(&self) -> Option<(usize, usize, SignStyle)> {
        match self {
            Self::Number(pp) => Some((pp.min_width, pp.max_width, pp.sign_style)),
            Self::Reduced(pp) => Some((pp.number.min_width, pp.number.max_width, pp.number.sign_style)),
            Self::WeekBased(pp) => Some((pp.min_width(), pp.max_width(), SignStyle::NotNegative)),
            _ => None,
        }
    }

    /// The numeric value with a fixed width, for adjacent value parsing.
    pub(crate) fn with_fixed_width(self) -> Self {
        match self {
            Self::Number(pp) => Self::Number(pp.with_fixed_width()),
            Self::Reduced(pp) => Self::Reduced(pp.with_fixed_width()),
            Self::WeekBased(pp) => Self::WeekBased(pp.with_fixed_width()),
            other => other,
        }
    }

    /// The numeric value reserving `width` more characters for the fixed
    /// width values that follow it.
    pub(crate) fn with_subsequent_width(self, width: usize) -> Self {
        match self {
            Self::Number(pp) => Self::Number(pp.with_subsequent_width(width)),
            Self::Reduced(pp) => Self::Reduced(pp.with_subsequent_width(width)),
            Self::WeekBased(pp) => Self::WeekBased(pp.with_subsequent_width(width)),
            other => other,
        }
    }
}

impl Writeable for PrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self {
            Self::CharLiteral(pp) => pp.write_to(sink),
            Self::StringLiteral(pp) => pp.write_to(sink),
            Self::Number(pp) => pp.write_to(sink),
            Self::Reduced(pp) => pp.write_to(sink),
            Self::Fraction(pp) => pp.write_to(sink),
            Self::Text(pp) => pp.write_to(sink),
            Self::Pad(pp) => pp.write_to(sink),
            Self::Composite(pp) => pp.write_to(sink),
            Self::Settings(pp) => pp.write_to(sink),
            Self::DefaultValue(pp) => pp.write_to(sink),
            Self::Instant(pp) => pp.write_to(sink),
            Self::OffsetId(pp) => pp.write_to(sink),
            Self::LocalizedOffset(pp) => pp.write_to(sink),
            Self::ZoneId(pp) => pp.write_to(sink),
            Self::ZoneText(pp) => pp.write_to(sink),
            Self::ChronologyId(pp) => pp.write_to(sink),
            Self::Localized(pp) => pp.write_to(sink),
            Self::WeekBased(pp) => pp.write_to(sink),
        }
    }
}

writeable::impl_display_with_writeable!(PrinterParser);
