//! Printer-parsers that combine others, and the parse settings.

use alloc::{boxed::Box, format, string::String, vec::Vec};
use core::fmt::Write;

use writeable::{impl_display_with_writeable, Writeable};

use super::{
    context::{ParseContext, ParseFailure, ParseResult, PrintContext},
    PrinterParser,
};
use crate::{fields::Field, TemporalError, TemporalResult};

/// A sequence of printer-parsers, optionally forming an optional section.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePrinterParser {
    pub(crate) printer_parsers: Vec<PrinterParser>,
    pub(crate) optional: bool,
}

impl CompositePrinterParser {
    pub(crate) fn new(printer_parsers: Vec<PrinterParser>, optional: bool) -> Self {
        Self {
            printer_parsers,
            optional,
        }
    }

    /// The same sequence with a different optional flag.
    pub fn with_optional(&self, optional: bool) -> Self {
        if optional == self.optional {
            return self.clone();
        }
        Self::new(self.printer_parsers.clone(), optional)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn printer_parsers(&self) -> &[PrinterParser] {
        &self.printer_parsers
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let length = buf.len();
        if self.optional {
            context.start_optional();
        }
        let result = self.format_all(context, buf);
        if self.optional {
            context.end_optional();
        }
        if !result? {
            // A missing value inside an optional section prints nothing.
            buf.truncate(length);
        }
        Ok(true)
    }

    fn format_all(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        for pp in &self.printer_parsers {
            if !pp.format(context, buf)? {
                return Ok(false);
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
        if !self.optional {
            return self
                .printer_parsers
                .iter()
                .try_fold(position, |pos, pp| pp.parse(context, text, pos));
        }
        context.start_optional();
        let result = self
            .printer_parsers
            .iter()
            .try_fold(position, |pos, pp| pp.parse(context, text, pos));
        match result {
            Ok(end) => {
                context.end_optional(true);
                Ok(end)
            }
            Err(ParseFailure::Mismatch(_)) => {
                context.end_optional(false);
                Ok(position)
            }
            Err(err) => {
                context.end_optional(false);
                Err(err)
            }
        }
    }
}

impl Writeable for CompositePrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char(if self.optional { '[' } else { '(' })?;
        for pp in &self.printer_parsers {
            pp.write_to(sink)?;
        }
        sink.write_char(if self.optional { ']' } else { ')' })
    }
}

impl_display_with_writeable!(CompositePrinterParser);

/// Pads the output of another printer-parser to a fixed width.
#[derive(Debug, Clone, PartialEq)]
pub struct PadPrinterParser {
    inner: Box<PrinterParser>,
    width: usize,
    pad_char: char,
}

impl PadPrinterParser {
    pub(crate) fn new(inner: PrinterParser, width: usize, pad_char: char) -> Self {
        Self {
            inner: Box::new(inner),
            width,
            pad_char,
        }
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let pre_len = buf.len();
        if !self.inner.format(context, buf)? {
            return Ok(false);
        }
        let len = buf[pre_len..].chars().count();
        if len > self.width {
            return Err(TemporalError::general(format!(
                "Cannot print as output of {len} characters exceeds pad width of {}",
                self.width
            )));
        }
        let padding: String = core::iter::repeat(self.pad_char)
            .take(self.width - len)
            .collect();
        buf.insert_str(pre_len, &padding);
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let strict = context.is_strict();
        let rest = &text[position..];
        if rest.is_empty() {
            return Err(ParseFailure::Mismatch(position));
        }
        let end = match rest.char_indices().nth(self.width) {
            Some((offset, _)) => position + offset,
            None if strict && rest.chars().count() < self.width => {
                return Err(ParseFailure::Mismatch(position));
            }
            None => text.len(),
        };
        let mut pos = position;
        for ch in text[position..end].chars() {
            if !context.char_equals(ch, self.pad_char) {
                break;
            }
            pos += ch.len_utf8();
        }
        let result = self.inner.parse(context, &text[..end], pos)?;
        if result != end && strict {
            return Err(ParseFailure::Mismatch(position));
        }
        Ok(result)
    }
}

impl Writeable for PadPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str("Pad(")?;
        self.inner.write_to(sink)?;
        if self.pad_char == ' ' {
            write!(sink, ",{})", self.width)
        } else {
            write!(sink, ",{},'{}')", self.width, self.pad_char)
        }
    }
}

/// Changes a parse setting for the rest of the parse, or until the end of
/// a failed optional section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsParser {
    Sensitive,
    Insensitive,
    Strict,
    Lenient,
}

impl SettingsParser {
    pub(crate) fn parse(&self, context: &mut ParseContext<'_>, position: usize) -> ParseResult {
        match self {
            Self::Sensitive => context.set_case_sensitive(true),
            Self::Insensitive => context.set_case_sensitive(false),
            Self::Strict => context.set_strict(true),
            Self::Lenient => context.set_strict(false),
        }
        Ok(position)
    }
}

impl Writeable for SettingsParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str(match self {
            Self::Sensitive => "ParseCaseSensitive(true)",
            Self::Insensitive => "ParseCaseSensitive(false)",
            Self::Strict => "ParseStrict(true)",
            Self::Lenient => "ParseStrict(false)",
        })
    }
}

/// Supplies a field value when parsing did not produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultValueParser {
    field: Field,
    value: i64,
}

impl DefaultValueParser {
    pub(crate) fn new(field: Field, value: i64) -> Self {
        Self { field, value }
    }

    pub(crate) fn parse(&self, context: &mut ParseContext<'_>, position: usize) -> ParseResult {
        if context.parsed_field(self.field).is_none() {
            context.set_parsed_field(self.field, self.value, position, position)?;
        }
        Ok(position)
    }
}

impl Writeable for DefaultValueParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(sink, "Default({},{})", self.field, self.value)
    }
}
