//! Implementation of zone info's [`ZoneRecord`]

use core::{iter::Peekable, str::Lines};

use alloc::{borrow::ToOwned, string::String, vec::Vec};

use crate::{
    parser::{
        next_split, remove_comments, ContextParse, LineParseContext, TryFromStr, ZoneInfoParseError,
    },
    types::{AbbreviationFormat, RuleIdentifier, Time, UntilDateTime},
};

/// `ZoneEntry` represents a single row in a `ZoneRecord`
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEntry {
    /// Standard offset
    pub std_offset: Time,
    /// Rule or fixed savings in use
    pub rule: RuleIdentifier,
    /// Abbreviation format
    pub format: AbbreviationFormat,
    /// Date until
    pub date: Option<UntilDateTime>,
}

impl TryFromStr<LineParseContext> for ZoneEntry {
    type Error = ZoneInfoParseError;
    fn try_from_str(s: &str, ctx: &mut LineParseContext) -> Result<Self, Self::Error> {
        ctx.enter("ZoneEntry");
        let mut columns = s.split_whitespace();
        let std_offset = next_split(&mut columns, ctx)?.context_parse::<Time>(ctx)?;
        let rule = next_split(&mut columns, ctx)?.context_parse::<RuleIdentifier>(ctx)?;
        let format = next_split(&mut columns, ctx)?.context_parse::<AbbreviationFormat>(ctx)?;
        // The UNTIL column spans the rest of the line.
        let until = columns.collect::<Vec<&str>>();
        let date = if until.is_empty() {
            None
        } else {
            Some(until.join(" ").context_parse::<UntilDateTime>(ctx)?)
        };
        ctx.exit();
        Ok(Self {
            std_offset,
            rule,
            format,
            date,
        })
    }
}

/// The `ZoneRecord` represents the zoneinfo files' Zone record.
///
/// A ZoneRecord is made up of a single record, with zero or
/// more continuation lines. Every line but the last carries an
/// UNTIL column.
///
/// # Example
///
/// The `America/Chicago` zone record
///
/// ```txt
/// # Zone    NAME        STDOFF    RULES    FORMAT    [UNTIL]
/// Zone America/Chicago    -5:50:36 -    LMT    1883 Nov 18 18:00u
///             -6:00    US    C%sT    1920
///             -6:00    Chicago    C%sT    1936 Mar  1  2:00
///             -5:00    -    EST    1936 Nov 15  2:00
///             -6:00    Chicago    C%sT    1942
///             -6:00    US    C%sT    1946
///             -6:00    Chicago    C%sT    1967
///             -6:00    US    C%sT
/// ```
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneRecord {
    /// The zone entries of the `ZoneRecord`
    pub entries: Vec<ZoneEntry>,
}

impl IntoIterator for ZoneRecord {
    type Item = ZoneEntry;
    type IntoIter = alloc::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl ZoneRecord {
    /// Parses a `ZoneRecord` starting from the provided Zone line and
    /// ending on the final continuation line.
    ///
    /// The lines consumed are counted on the context's line number.
    pub fn parse_full_table(
        lines: &mut Peekable<Lines<'_>>,
        ctx: &mut LineParseContext,
    ) -> Result<(String, Self), ZoneInfoParseError> {
        ctx.enter("zone table");
        let header = lines
            .next()
            .ok_or_else(|| ZoneInfoParseError::unexpected_eol(ctx))?;
        let (identifier, first) = Self::parse_header_line(header, ctx)?;
        ctx.line_number += 1;

        let mut record = Self {
            entries: Vec::from([first]),
        };
        while record.is_continued() {
            let line = lines
                .next()
                .ok_or_else(|| ZoneInfoParseError::unexpected_eol(ctx))?;
            let content = remove_comments(line);
            if !content.trim().is_empty() {
                record.entries.push(ZoneEntry::try_from_str(content, ctx)?);
            }
            ctx.line_number += 1;
        }

        ctx.exit();
        Ok((identifier, record))
    }

    /// Whether the last parsed entry ends at an UNTIL date, so that a
    /// continuation line follows.
    fn is_continued(&self) -> bool {
        self.entries.last().is_some_and(|entry| entry.date.is_some())
    }

    /// Parse a header line, i.e. the first zone record line.
    pub fn parse_header_line(
        header_line: &str,
        ctx: &mut LineParseContext,
    ) -> Result<(String, ZoneEntry), ZoneInfoParseError> {
        ctx.enter("zone header");
        let content = remove_comments(header_line);
        let mut columns = content.split_ascii_whitespace();
        let Some("Zone" | "Z") = columns.next() else {
            return Err(ZoneInfoParseError::InvalidZoneHeader(ctx.line_number));
        };
        let identifier = columns
            .next()
            .ok_or(ZoneInfoParseError::MissingIdentifier(ctx.line_number))?
            .to_owned();
        let entry = ZoneEntry::try_from_str(&columns.collect::<Vec<&str>>().join(" "), ctx)?;
        ctx.exit();
        Ok((identifier, entry))
    }

    /// Returns the entry in effect at the end of time.
    pub fn last_entry(&self) -> Option<&ZoneEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;
    use alloc::string::String;

    use crate::{
        parser::{LineParseContext, ZoneInfoParseError},
        types::{
            AbbreviationFormat, Date, DayOfMonth, FormattableAbbr, Month, QualifiedTime,
            RuleIdentifier, Sign, Time, UntilDateTime,
        },
    };

    use super::{ZoneEntry, ZoneRecord};

    const CHICAGO: &str = r#"Zone America/Chicago	-5:50:36 -	LMT	1883 Nov 18 18:00u
                    -6:00	US	C%sT	1920
                    -6:00	Chicago	C%sT	1936 Mar  1  2:00
                    -5:00	-	EST	1936 Nov 15  2:00
                    -6:00	Chicago	C%sT	1942
                    -6:00	US	C%sT	1946
                    -6:00	Chicago	C%sT	1967
                    -6:00	US	C%sT"#;

    fn parse_chicago() -> (String, ZoneRecord) {
        let mut lines = CHICAGO.lines().peekable();
        let mut ctx = LineParseContext::default();
        ZoneRecord::parse_full_table(&mut lines, &mut ctx).unwrap()
    }

    #[test]
    fn chicago_table() {
        let (ident, table) = parse_chicago();
        assert_eq!(ident, "America/Chicago");
        assert_eq!(table.entries.len(), 8);
        assert_eq!(
            table.last_entry().map(|e| &e.format),
            Some(&AbbreviationFormat::Formattable(FormattableAbbr(
                "C%sT".to_owned()
            )))
        );
        let mut table_iter = table.into_iter();
        assert_eq!(
            table_iter.next(),
            Some(ZoneEntry {
                std_offset: Time {
                    sign: Sign::Negative,
                    hour: 5,
                    minute: 50,
                    second: 36,
                },
                rule: RuleIdentifier::None,
                format: AbbreviationFormat::String("LMT".to_owned()),
                date: Some(UntilDateTime {
                    date: Date {
                        year: 1883,
                        month: Month::Nov,
                        day: DayOfMonth::Day(18),
                    },
                    time: QualifiedTime::Universal(Time {
                        sign: Sign::Positive,
                        hour: 18,
                        minute: 0,
                        second: 0
                    })
                })
            })
        );
        assert_eq!(
            table_iter.next().map(|e| e.rule),
            Some(RuleIdentifier::Named("US".to_owned()))
        );
    }

    #[test]
    fn counts_consumed_lines() {
        let mut lines = CHICAGO.lines().peekable();
        let mut ctx = LineParseContext::default();
        ZoneRecord::parse_full_table(&mut lines, &mut ctx).unwrap();
        assert_eq!(ctx.line_number, 9);
        assert!(lines.next().is_none());
    }

    #[test]
    fn truncated_table() {
        let source = "Zone Europe/Paris 0:09:21 - LMT 1891 Mar 16\n";
        let mut lines = source.lines().peekable();
        let mut ctx = LineParseContext::default();
        let err = ZoneRecord::parse_full_table(&mut lines, &mut ctx).unwrap_err();
        assert!(matches!(err, ZoneInfoParseError::UnexpectedEndOfLine(2, _)));
    }

    #[test]
    fn invalid_header() {
        let mut ctx = LineParseContext::default();
        let err = ZoneRecord::parse_header_line("Zon Europe/Paris 1:00 - CET", &mut ctx)
            .unwrap_err();
        assert_eq!(err, ZoneInfoParseError::InvalidZoneHeader(1));
    }
}
