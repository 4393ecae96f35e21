//! Line oriented parsing of zoneinfo source text.

use core::{
    fmt,
    iter::Peekable,
    num::ParseIntError,
    str::{Lines, SplitWhitespace},
};

use alloc::{borrow::ToOwned, string::String, vec, vec::Vec};

use crate::{rule::RuleRecord, zone::ZoneRecord, ZoneInfoData};

/// An error encountered while parsing a zoneinfo source line.
///
/// Every variant carries the 1 based line number the error occurred on.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneInfoParseError {
    InvalidZoneHeader(u32),
    MissingIdentifier(u32),
    UnexpectedEndOfLine(u32, &'static str),
    UnknownValue(u32, String),
    ParseIntError(u32, ParseIntError, &'static str),
    /// A continuation line was found outside of a `Zone` record.
    OrphanContinuation(u32),
}

impl ZoneInfoParseError {
    pub(crate) fn unexpected_eol(ctx: &LineParseContext) -> Self {
        Self::UnexpectedEndOfLine(ctx.line_number, ctx.span())
    }

    pub(crate) fn unknown(ctx: &LineParseContext, value: &str) -> Self {
        Self::UnknownValue(ctx.line_number, value.to_owned())
    }

    /// Returns the line number the error occurred on.
    pub fn line_number(&self) -> u32 {
        match self {
            Self::InvalidZoneHeader(line)
            | Self::MissingIdentifier(line)
            | Self::UnexpectedEndOfLine(line, _)
            | Self::UnknownValue(line, _)
            | Self::ParseIntError(line, _, _)
            | Self::OrphanContinuation(line) => *line,
        }
    }
}

impl fmt::Display for ZoneInfoParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZoneHeader(line) => write!(f, "line {line}: invalid Zone header"),
            Self::MissingIdentifier(line) => write!(f, "line {line}: Zone is missing a name"),
            Self::UnexpectedEndOfLine(line, span) => {
                write!(f, "line {line}: unexpected end of line while parsing {span}")
            }
            Self::UnknownValue(line, value) => write!(f, "line {line}: unknown value '{value}'"),
            Self::ParseIntError(line, err, span) => {
                write!(f, "line {line}: invalid integer in {span}: {err}")
            }
            Self::OrphanContinuation(line) => {
                write!(f, "line {line}: continuation line without a Zone record")
            }
        }
    }
}

pub trait TryFromStr<C>: Sized {
    type Error;
    fn try_from_str(s: &str, context: &mut C) -> Result<Self, Self::Error>;
}

/// Tracks the current line and a stack of named spans for error reporting.
#[derive(Debug, Clone)]
pub struct LineParseContext {
    pub line_number: u32,
    pub spans: Vec<&'static str>,
}

impl LineParseContext {
    pub fn enter(&mut self, name: &'static str) {
        self.spans.push(name);
    }

    pub fn span(&self) -> &'static str {
        self.spans.last().copied().unwrap_or("undefined")
    }

    pub fn exit(&mut self) {
        self.spans.pop();
    }
}

impl Default for LineParseContext {
    fn default() -> Self {
        Self {
            line_number: 1,
            spans: vec!["undefined"],
        }
    }
}

pub trait ContextParse {
    fn context_parse<T: TryFromStr<LineParseContext>>(
        &self,
        ctx: &mut LineParseContext,
    ) -> Result<T, <T as TryFromStr<LineParseContext>>::Error>;
}

impl ContextParse for &str {
    fn context_parse<T: TryFromStr<LineParseContext>>(
        &self,
        ctx: &mut LineParseContext,
    ) -> Result<T, <T as TryFromStr<LineParseContext>>::Error> {
        T::try_from_str(self, ctx)
    }
}

impl ContextParse for String {
    fn context_parse<T: TryFromStr<LineParseContext>>(
        &self,
        ctx: &mut LineParseContext,
    ) -> Result<T, <T as TryFromStr<LineParseContext>>::Error> {
        T::try_from_str(self, ctx)
    }
}

macro_rules! int_from_str {
    ($($int:ty),+) => {
        $(
            impl TryFromStr<LineParseContext> for $int {
                type Error = ZoneInfoParseError;
                fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
                    s.parse::<$int>()
                        .map_err(|e| ZoneInfoParseError::ParseIntError(ctx.line_number, e, ctx.span()))
                }
            }
        )+
    };
}

int_from_str!(i8, u8, i32);

pub(crate) fn next_split<'a>(
    splits: &mut SplitWhitespace<'a>,
    context: &LineParseContext,
) -> Result<&'a str, ZoneInfoParseError> {
    splits
        .next()
        .ok_or_else(|| ZoneInfoParseError::unexpected_eol(context))
}

pub(crate) fn remove_comments(line: &str) -> &str {
    if let Some((cleaned, _comment)) = line.split_once('#') {
        cleaned
    } else {
        line
    }
}

/// Case insensitive match of `value` against `name`, accepting any prefix
/// of `name` that is at least `min_len` characters long.
pub(crate) fn matches_name_prefix(value: &str, name: &str, min_len: usize) -> bool {
    value.len() >= min_len
        && value.len() <= name.len()
        && name.as_bytes()[..value.len()].eq_ignore_ascii_case(value.as_bytes())
}

#[non_exhaustive]
pub struct ZoneInfoParser<'data> {
    lines: Peekable<Lines<'data>>,
}

impl<'data> ZoneInfoParser<'data> {
    /// Creates a parser from a `&str`
    pub fn from_zoneinfo_str(source: &'data str) -> Self {
        Self {
            lines: source.lines().peekable(),
        }
    }

    pub fn parse(&mut self) -> Result<ZoneInfoData, ZoneInfoParseError> {
        let mut zoneinfo = ZoneInfoData::default();
        let mut context = LineParseContext::default();
        while let Some(line) = self.lines.peek().copied() {
            // A ratpacked line is `#PACKRATLIST`, so check it before comments are removed.
            if let Some(packrat) = line.strip_prefix("#PACKRATLIST") {
                let mut splits = packrat.split_whitespace();
                context.enter("PACKRATLIST");
                next_split(&mut splits, &context)?; // Consume the zone.tab
                let keyword = next_split(&mut splits, &context)?;
                if keyword == "Link" {
                    let target = next_split(&mut splits, &context)?;
                    let alias = next_split(&mut splits, &context)?;
                    zoneinfo.pack_rat.insert(alias.to_owned(), target.to_owned());
                }
                context.exit();
                self.lines.next();
                context.line_number += 1;
                continue;
            }

            let cleaned = remove_comments(line);
            if cleaned.trim().is_empty() {
                self.lines.next();
                context.line_number += 1;
                continue;
            }

            if cleaned.starts_with(char::is_whitespace) {
                return Err(ZoneInfoParseError::OrphanContinuation(context.line_number));
            }

            let keyword = cleaned.split_whitespace().next().unwrap_or_default();
            match keyword {
                "Rule" | "R" => {
                    let (identifier, data) = RuleRecord::parse(cleaned, &mut context)?;
                    zoneinfo.rules.entry(identifier).or_default().push(data);
                    self.lines.next();
                    context.line_number += 1;
                }
                "Zone" | "Z" => {
                    // The zone table consumes its own lines.
                    let (identifier, table) =
                        ZoneRecord::parse_full_table(&mut self.lines, &mut context)?;
                    zoneinfo.zones.insert(identifier, table);
                }
                "Link" | "L" => {
                    context.enter("Link");
                    let mut splits = cleaned.split_whitespace();
                    next_split(&mut splits, &context)?; // Consume the Link
                    let target = next_split(&mut splits, &context)?;
                    let alias = next_split(&mut splits, &context)?;
                    zoneinfo.links.insert(alias.to_owned(), target.to_owned());
                    context.exit();
                    self.lines.next();
                    context.line_number += 1;
                }
                _ => {
                    return Err(ZoneInfoParseError::unknown(&context, keyword));
                }
            }
        }
        Ok(zoneinfo)
    }
}
