//! The per call state of formatting and parsing.

use alloc::{format, string::String, vec::Vec};

use icu_locale::Locale;

use super::{
    number::ReducedPrinterParser, parsed::Parsed, DateTimeFormatter, DecimalStyle, FormatResources,
};
use crate::{
    chronology::{Chronology, ISO_CHRONOLOGY},
    fields::Field,
    offset::ZoneId,
    temporal::TemporalAccessor,
    TemporalError, TemporalResult,
};

/// Why a printer-parser did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    /// The text does not match at this position. An enclosing optional
    /// section absorbs this.
    Mismatch(usize),
    /// An error that aborts the whole parse.
    Error(TemporalError),
}

impl From<TemporalError> for ParseFailure {
    fn from(value: TemporalError) -> Self {
        Self::Error(value)
    }
}

/// The position after a match, or why there was none.
pub(crate) type ParseResult = Result<usize, ParseFailure>;

/// Whether two characters are equal ignoring case.
pub(crate) fn chars_equal_ignore_case(one: char, other: char) -> bool {
    one == other
        || one.to_uppercase().eq(other.to_uppercase())
        || one.to_lowercase().eq(other.to_lowercase())
}

// ==== Printing ====

/// The state of one format call.
pub(crate) struct PrintContext<'a> {
    temporal: &'a dyn TemporalAccessor,
    formatter: &'a DateTimeFormatter,
    optional: u32,
}

impl<'a> PrintContext<'a> {
    pub(crate) fn new(temporal: &'a dyn TemporalAccessor, formatter: &'a DateTimeFormatter) -> Self {
        Self {
            temporal,
            formatter,
            optional: 0,
        }
    }

    pub(crate) fn temporal(&self) -> &'a dyn TemporalAccessor {
        self.temporal
    }

    pub(crate) fn formatter(&self) -> &'a DateTimeFormatter {
        self.formatter
    }

    pub(crate) fn locale(&self) -> &'a Locale {
        self.formatter.locale()
    }

    pub(crate) fn decimal_style(&self) -> DecimalStyle {
        self.formatter.decimal_style()
    }

    pub(crate) fn resources(&self) -> &'a FormatResources {
        self.formatter.resources()
    }

    pub(crate) fn start_optional(&mut self) {
        self.optional += 1;
    }

    pub(crate) fn end_optional(&mut self) {
        self.optional = self.optional.saturating_sub(1);
    }

    /// The value of a field.
    ///
    /// Inside an optional section an unsupported field is `None`, outside
    /// of one it is an error.
    pub(crate) fn value(&self, field: Field) -> TemporalResult<Option<i64>> {
        if self.optional > 0 && !self.temporal.is_supported(field) {
            return Ok(None);
        }
        self.temporal.get_long(field).map(Some)
    }

    /// Checks a queried value, which may only be absent inside an optional
    /// section.
    pub(crate) fn require<T>(&self, value: Option<T>, name: &str) -> TemporalResult<Option<T>> {
        if value.is_none() && self.optional == 0 {
            return Err(TemporalError::general(format!(
                "Unable to extract {name} from temporal"
            )));
        }
        Ok(value)
    }

    /// The chronology of the temporal, ISO if it has none.
    pub(crate) fn chronology(&self) -> &'static dyn Chronology {
        self.temporal.chronology().unwrap_or(&ISO_CHRONOLOGY)
    }
}

// ==== Parsing ====

/// Work deferred until the chronology of a parse is known.
#[derive(Debug, Clone)]
pub(crate) enum PendingResolution {
    /// A reduced value whose base comes from a base date in the parsed
    /// chronology.
    ReducedBase {
        parser: ReducedPrinterParser,
        value: i64,
        parse_len: usize,
        error_pos: usize,
        success_pos: usize,
    },
}

impl PendingResolution {
    fn run(self, context: &mut ParseContext<'_>) -> TemporalResult<()> {
        match self {
            Self::ReducedBase {
                parser,
                value,
                parse_len,
                error_pos,
                success_pos,
            } => {
                // The value is overwritten on purpose, so a conflict is not a mismatch.
                match parser.set_value(context, value, parse_len, error_pos, success_pos) {
                    Ok(_) | Err(ParseFailure::Mismatch(_)) => Ok(()),
                    Err(ParseFailure::Error(err)) => Err(err),
                }
            }
        }
    }
}

/// The state of one parse call.
#[derive(Debug)]
pub(crate) struct ParseContext<'a> {
    formatter: &'a DateTimeFormatter,
    case_sensitive: bool,
    strict: bool,
    saved_settings: Vec<(bool, bool)>,
    parsed: Parsed,
    pending: Vec<PendingResolution>,
}

impl<'a> ParseContext<'a> {
    /// A context that starts case sensitive and lenient.
    pub(crate) fn new(formatter: &'a DateTimeFormatter) -> Self {
        Self {
            formatter,
            case_sensitive: true,
            strict: false,
            saved_settings: Vec::new(),
            parsed: Parsed::default(),
            pending: Vec::new(),
        }
    }

    /// A context with the same settings and nothing parsed.
    pub(crate) fn copy(&self) -> Self {
        Self {
            case_sensitive: self.case_sensitive,
            strict: self.strict,
            ..Self::new(self.formatter)
        }
    }

    pub(crate) fn formatter(&self) -> &'a DateTimeFormatter {
        self.formatter
    }

    pub(crate) fn locale(&self) -> &'a Locale {
        self.formatter.locale()
    }

    pub(crate) fn decimal_style(&self) -> DecimalStyle {
        self.formatter.decimal_style()
    }

    pub(crate) fn resources(&self) -> &'a FormatResources {
        self.formatter.resources()
    }

    pub(crate) fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub(crate) fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Enters an optional section.
    pub(crate) fn start_optional(&mut self) {
        self.saved_settings.push((self.case_sensitive, self.strict));
    }

    /// Leaves an optional section. A failed section restores the settings
    /// in effect when it started, parsed values are kept either way.
    pub(crate) fn end_optional(&mut self, success: bool) {
        if let Some((case_sensitive, strict)) = self.saved_settings.pop() {
            if !success {
                self.case_sensitive = case_sensitive;
                self.strict = strict;
            }
        }
    }

    /// Compares characters using the case sensitivity setting.
    pub(crate) fn char_equals(&self, one: char, other: char) -> bool {
        if self.case_sensitive {
            one == other
        } else {
            chars_equal_ignore_case(one, other)
        }
    }

    /// Matches `candidate` in `text` at `position`, returning the position
    /// after the match.
    pub(crate) fn sub_sequence_equals(
        &self,
        text: &str,
        position: usize,
        candidate: &str,
    ) -> Option<usize> {
        let rest = text.get(position..)?;
        if self.case_sensitive {
            return rest
                .starts_with(candidate)
                .then_some(position + candidate.len());
        }
        let mut end = position;
        let mut chars = rest.chars();
        for expected in candidate.chars() {
            let actual = chars.next()?;
            if !chars_equal_ignore_case(actual, expected) {
                return None;
            }
            end += actual.len_utf8();
        }
        Some(end)
    }

    pub(crate) fn parsed_field(&self, field: impl Into<Field>) -> Option<i64> {
        self.parsed.fields.get(field)
    }

    /// Stores a parsed value, a different earlier value of the same field
    /// is a mismatch at `error_pos`.
    pub(crate) fn set_parsed_field(
        &mut self,
        field: impl Into<Field>,
        value: i64,
        error_pos: usize,
        success_pos: usize,
    ) -> ParseResult {
        match self.parsed.fields.insert(field, value) {
            Some(old) if old != value => Err(ParseFailure::Mismatch(error_pos)),
            _ => Ok(success_pos),
        }
    }

    pub(crate) fn set_parsed_zone(&mut self, zone: ZoneId) {
        self.parsed.zone = Some(zone);
    }

    pub(crate) fn set_parsed_leap_second(&mut self) {
        self.parsed.leap_second = true;
    }

    /// Stores the parsed chronology and runs the pending resolutions, in
    /// the order they were registered.
    pub(crate) fn set_parsed_chronology(
        &mut self,
        chronology: &'static dyn Chronology,
    ) -> TemporalResult<()> {
        self.parsed.chronology = Some(chronology);
        for pending in core::mem::take(&mut self.pending) {
            pending.run(self)?;
        }
        Ok(())
    }

    pub(crate) fn register_pending(&mut self, pending: PendingResolution) {
        self.pending.push(pending);
    }

    /// The parsed chronology, or the formatter's, or ISO.
    pub(crate) fn effective_chronology(&self) -> &'static dyn Chronology {
        self.parsed
            .chronology
            .or(self.formatter.chronology())
            .unwrap_or(&ISO_CHRONOLOGY)
    }

    pub(crate) fn parsed(&self) -> &Parsed {
        &self.parsed
    }

    pub(crate) fn into_parsed(self) -> Parsed {
        self.parsed
    }
}

/// Converts a slice of text for error messages, shortening long text.
pub(crate) fn abbreviate(text: &str) -> String {
    match text.char_indices().nth(64) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.into(),
    }
}
