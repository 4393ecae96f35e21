//! Literal printer-parsers.

use alloc::string::String;
use core::fmt::Write;

use writeable::Writeable;

use super::context::{ParseContext, ParseFailure, ParseResult};

/// Prints and parses a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharLiteralPrinterParser(pub(crate) char);

impl CharLiteralPrinterParser {
    pub(crate) fn format(&self, buf: &mut String) -> bool {
        buf.push(self.0);
        true
    }

    pub(crate) fn parse(&self, context: &ParseContext<'_>, text: &str, position: usize) -> ParseResult {
        let Some(ch) = text.get(position..).and_then(|rest| rest.chars().next()) else {
            return Err(ParseFailure::Mismatch(position));
        };
        if !context.char_equals(self.0, ch) {
            return Err(ParseFailure::Mismatch(position));
        }
        Ok(position + ch.len_utf8())
    }
}

impl Writeable for CharLiteralPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.0 == '\'' {
            sink.write_str("''")
        } else {
            sink.write_char('\'')?;
            sink.write_char(self.0)?;
            sink.write_char('\'')
        }
    }
}

/// Prints and parses a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteralPrinterParser(pub(crate) String);

impl StringLiteralPrinterParser {
    pub(crate) fn format(&self, buf: &mut String) -> bool {
        buf.push_str(&self.0);
        true
    }

    pub(crate) fn parse(&self, context: &ParseContext<'_>, text: &str, position: usize) -> ParseResult {
        if position > text.len() {
            return Err(ParseFailure::Mismatch(position));
        }
        context
            .sub_sequence_equals(text, position, &self.0)
            .ok_or(ParseFailure::Mismatch(position))
    }
}

impl Writeable for StringLiteralPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char('\'')?;
        for part in self.0.split('\'').enumerate() {
            if part.0 > 0 {
                sink.write_str("''")?;
            }
            sink.write_str(part.1)?;
        }
        sink.write_char('\'')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DateTimeFormatterBuilder;

    #[test]
    fn char_literal() {
        let formatter = DateTimeFormatterBuilder::new().to_formatter();
        let mut context = ParseContext::new(&formatter);
        let literal = CharLiteralPrinterParser('a');
        assert_eq!(literal.parse(&context, "xa", 1), Ok(2));
        assert_eq!(literal.parse(&context, "xa", 2), Err(ParseFailure::Mismatch(2)));
        assert_eq!(literal.parse(&context, "A", 0), Err(ParseFailure::Mismatch(0)));
        context.set_case_sensitive(false);
        assert_eq!(literal.parse(&context, "A", 0), Ok(1));
    }

    #[test]
    fn string_literal() {
        let formatter = DateTimeFormatterBuilder::new().to_formatter();
        let mut context = ParseContext::new(&formatter);
        let literal = StringLiteralPrinterParser("hello".into());
        assert_eq!(literal.parse(&context, "say hello", 4), Ok(9));
        assert_eq!(literal.parse(&context, "say hell", 4), Err(ParseFailure::Mismatch(4)));
        context.set_case_sensitive(false);
        assert_eq!(literal.parse(&context, "HeLLo", 0), Ok(5));
    }

    #[test]
    fn descriptions() {
        assert_eq!(CharLiteralPrinterParser('-').write_to_string(), "'-'");
        assert_eq!(CharLiteralPrinterParser('\'').write_to_string(), "''");
        assert_eq!(
            StringLiteralPrinterParser("o'clock".into()).write_to_string(),
            "'o''clock'"
        );
    }
}
