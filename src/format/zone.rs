//! Printer-parsers for zone ids and zone names.

use alloc::{borrow::ToOwned, string::String, sync::Arc, vec::Vec};
use core::{fmt::Write, hash::BuildHasherDefault};
use std::collections::HashMap;

use rustc_hash::FxHasher;
use writeable::Writeable;
use zoneinfo_compiler::ZoneRules;

use super::{
    context::{chars_equal_ignore_case, ParseContext, ParseFailure, ParseResult, PrintContext},
    offset::OffsetIdPrinterParser,
};
use crate::{
    fields::{ChronoField, Field},
    iso::{IsoDate, IsoDateTime, IsoTime},
    offset::{OffsetPrefix, ZoneId, ZoneOffset},
    provider::{TextStyle, ZoneNameKind},
    temporal::{TemporalAccessor, ZonedDateTime},
    TemporalResult,
};

type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// The id that zone name trees hold besides the region ids.
const UTC_ID: &str = "UTC";

// ==== PrefixTree ====

#[derive(Debug, Default)]
struct PrefixNode {
    value: Option<String>,
    children: FxHashMap<char, PrefixNode>,
}

impl PrefixNode {
    fn child(&self, key: char, case_sensitive: bool) -> Option<&PrefixNode> {
        if let Some(child) = self.children.get(&key) {
            return Some(child);
        }
        if case_sensitive {
            return None;
        }
        // Characters whose lower case differs but whose upper case agrees.
        self.children
            .iter()
            .find(|(known, _)| chars_equal_ignore_case(**known, key))
            .map(|(_, child)| child)
    }
}

/// A tree of texts, such as zone ids and zone names, for finding the
/// longest text at a position.
#[derive(Debug)]
pub struct PrefixTree {
    case_sensitive: bool,
    root: PrefixNode,
}

impl PrefixTree {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            root: PrefixNode::default(),
        }
    }

    fn key(&self, ch: char) -> char {
        tree_key(ch, self.case_sensitive)
    }

    /// Adds a text with its value, replacing the value of an equal text.
    pub fn add(&mut self, text: &str, value: &str) {
        if text.is_empty() {
            return;
        }
        let case_sensitive = self.case_sensitive;
        let mut node = &mut self.root;
        for ch in text.chars() {
            node = node.children.entry(tree_key(ch, case_sensitive)).or_default();
        }
        node.value = Some(value.to_owned());
    }

    /// The value of the longest text at `position` and the position after
    /// the text.
    pub fn match_at(&self, text: &str, position: usize) -> Option<(&str, usize)> {
        let mut node = &self.root;
        let mut found = None;
        let mut end = position;
        for ch in text.get(position..)?.chars() {
            let Some(child) = node.child(self.key(ch), self.case_sensitive) else {
                break;
            };
            end += ch.len_utf8();
            node = child;
            if let Some(value) = &node.value {
                found = Some((value.as_str(), end));
            }
        }
        found
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

fn tree_key(ch: char, case_sensitive: bool) -> char {
    if case_sensitive {
        return ch;
    }
    ch.to_lowercase().next().unwrap_or(ch)
}

// ==== Zone ids ====

/// Which zone a zone printer-parser prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneQuery {
    /// The zone of a zoned temporal.
    ZoneId,
    /// The zone of a zoned temporal when it is not an offset.
    RegionOnly,
    /// The zone, or else the offset.
    ZoneOrOffset,
}

impl ZoneQuery {
    fn query(self, temporal: &dyn TemporalAccessor) -> Option<ZoneId> {
        match self {
            Self::ZoneId => temporal.zone(),
            Self::RegionOnly => temporal.zone().filter(|zone| !zone.is_offset()),
            Self::ZoneOrOffset => temporal
                .zone()
                .or_else(|| temporal.offset().map(ZoneId::Offset)),
        }
    }
}

/// Prints a zone id, and parses zone ids and offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneIdPrinterParser {
    query: ZoneQuery,
}

impl ZoneIdPrinterParser {
    pub(crate) fn new(query: ZoneQuery) -> Self {
        Self { query }
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let zone = self.query.query(context.temporal());
        let Some(zone) = context.require(zone, "ZoneId")? else {
            return Ok(false);
        };
        let _ = zone.write_to(buf);
        Ok(true)
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        parse_zone(context, text, position, false, zone_id_tree)
    }
}

impl Writeable for ZoneIdPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str(match self.query {
            ZoneQuery::ZoneId => "ZoneId()",
            ZoneQuery::RegionOnly => "ZoneRegionId()",
            ZoneQuery::ZoneOrOffset => "ZoneOrOffsetId()",
        })
    }
}

fn zone_id_tree(context: &ParseContext<'_>) -> TemporalResult<Arc<PrefixTree>> {
    let resources = context.resources();
    let zones = &resources.zones;
    let case_sensitive = context.is_case_sensitive();
    resources
        .caches
        .zone_ids
        .get_or_insert_with(&(case_sensitive, zones.zone_id_count()), || {
            let mut tree = PrefixTree::new(case_sensitive);
            for id in zones.available_zone_ids() {
                tree.add(id, id);
            }
            Ok(tree)
        })
}

/// Parses a zone: an offset, an offset behind a prefix, or an id or name
/// found in the tree.
fn parse_zone(
    context: &mut ParseContext<'_>,
    text: &str,
    position: usize,
    zone_text: bool,
    tree: impl FnOnce(&ParseContext<'_>) -> TemporalResult<Arc<PrefixTree>>,
) -> ParseResult {
    let Some(rest) = text.get(position..) else {
        return Err(ParseFailure::Mismatch(position));
    };
    let mut chars = rest.char_indices();
    let Some((_, first)) = chars.next() else {
        return Err(ParseFailure::Mismatch(position));
    };
    let second = chars.next();
    let third = chars.next();
    let fourth = chars.next();
    let end_of = |entry: Option<(usize, char)>| {
        entry.map_or(text.len(), |(offset, ch)| position + offset + ch.len_utf8())
    };

    if first == '+' || first == '-' {
        return parse_offset_based(context, text, position, position, OffsetIdPrinterParser::id_z(), true);
    }
    if let Some((_, second_ch)) = second {
        if context.char_equals(first, 'U') && context.char_equals(second_ch, 'T') {
            match third {
                Some((_, third_ch)) if context.char_equals(third_ch, 'C') => {
                    // Zone names may start with UTC, which the name tree handles.
                    if !zone_text {
                        return parse_offset_based(
                            context,
                            text,
                            position,
                            end_of(third),
                            OffsetIdPrinterParser::id_zero(),
                            false,
                        );
                    }
                }
                _ => {
                    return parse_offset_based(
                        context,
                        text,
                        position,
                        end_of(second),
                        OffsetIdPrinterParser::id_zero(),
                        false,
                    );
                }
            }
        } else if let Some((_, third_ch)) = third.filter(|_| {
            context.char_equals(first, 'G') && context.char_equals(second_ch, 'M')
        }) {
            if context.char_equals(third_ch, 'T') {
                if let Some((_, '0')) = fourth {
                    context.set_parsed_zone(ZoneId::Region("GMT0".into()));
                    return Ok(end_of(fourth));
                }
                return parse_offset_based(
                    context,
                    text,
                    position,
                    end_of(third),
                    OffsetIdPrinterParser::id_zero(),
                    false,
                );
            }
        }
    }

    let tree = tree(context)?;
    match tree.match_at(text, position) {
        Some((id, end)) => {
            let zone = ZoneId::of(id).map_err(|_| ParseFailure::Mismatch(position))?;
            context.set_parsed_zone(zone);
            Ok(end)
        }
        None if context.char_equals(first, 'Z') => {
            context.set_parsed_zone(ZoneId::Offset(ZoneOffset::UTC));
            Ok(position + first.len_utf8())
        }
        None => Err(ParseFailure::Mismatch(position)),
    }
}

/// Parses an offset after a `UTC`, `GMT` or `UT` prefix, or a bare offset
/// when the prefix is empty.
fn parse_offset_based(
    context: &mut ParseContext<'_>,
    text: &str,
    prefix_position: usize,
    position: usize,
    parser: OffsetIdPrinterParser,
    offset_required: bool,
) -> ParseResult {
    let prefix = text[prefix_position..position].to_ascii_uppercase();
    let bare_prefix = |prefix: &str| {
        OffsetPrefix::from_str_upper(prefix).map(|prefix| ZoneId::Prefixed {
            prefix,
            offset: ZoneOffset::UTC,
        })
    };
    let next = text[position..].chars().next();
    // `0` or `Z` after the prefix is not part of the id.
    if next.map_or(true, |ch| ch == '0' || context.char_equals(ch, 'Z')) {
        let zone = bare_prefix(&prefix).ok_or(ParseFailure::Mismatch(prefix_position))?;
        context.set_parsed_zone(zone);
        return Ok(position);
    }
    let mut offset_context = context.copy();
    let end = match parser.parse(&mut offset_context, text, position) {
        Ok(end) => end,
        Err(ParseFailure::Mismatch(_)) if offset_required => {
            return Err(ParseFailure::Mismatch(prefix_position));
        }
        Err(ParseFailure::Mismatch(_)) => {
            let zone = bare_prefix(&prefix).ok_or(ParseFailure::Mismatch(prefix_position))?;
            context.set_parsed_zone(zone);
            return Ok(position);
        }
        Err(err) => return Err(err),
    };
    let offset = offset_context
        .parsed_field(ChronoField::OffsetSeconds)
        .and_then(|seconds| i32::try_from(seconds).ok())
        .and_then(|seconds| ZoneOffset::from_total_seconds(seconds).ok())
        .ok_or(ParseFailure::Mismatch(prefix_position))?;
    let zone = match OffsetPrefix::from_str_upper(&prefix) {
        Some(prefix) => ZoneId::Prefixed { prefix, offset },
        None => ZoneId::Offset(offset),
    };
    context.set_parsed_zone(zone);
    Ok(end)
}

// ==== Zone names ====

/// Prints the display name of a zone, and parses zone names and ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTextPrinterParser {
    style: TextStyle,
    generic: bool,
    /// Zones that win when several zones share a name.
    preferred: Vec<String>,
}

impl ZoneTextPrinterParser {
    pub(crate) fn new(style: TextStyle, generic: bool, preferred: Vec<String>) -> Self {
        Self {
            style,
            generic,
            preferred,
        }
    }

    /// The name styles that are parsed: full names are parsed with the
    /// short ones.
    fn name_styles(&self) -> &'static [TextStyle] {
        match self.style.as_normal() {
            TextStyle::Full => &[TextStyle::Full, TextStyle::Short],
            _ => &[TextStyle::Short],
        }
    }

    pub(crate) fn format(&self, context: &mut PrintContext<'_>, buf: &mut String) -> TemporalResult<bool> {
        let zone = context.temporal().zone();
        let Some(zone) = context.require(zone, "ZoneId")? else {
            return Ok(false);
        };
        let id = zone.write_to_string();
        if zone.is_offset() {
            buf.push_str(&id);
            return Ok(true);
        }
        let kind = if self.generic {
            ZoneNameKind::Generic
        } else {
            self.name_kind(context, &zone)?
        };
        let name = context
            .resources()
            .text
            .zone_name(&id, kind, self.style, context.locale());
        buf.push_str(name.as_deref().unwrap_or(&id));
        Ok(true)
    }

    /// Whether the temporal is in standard or daylight time, generic when
    /// that is unknown.
    fn name_kind(&self, context: &PrintContext<'_>, zone: &ZoneId) -> TemporalResult<ZoneNameKind> {
        let temporal = context.temporal();
        let zones = context.resources().zones.as_ref();
        let daylight = |rules: &ZoneRules, seconds: i64| {
            if rules.is_daylight_savings(seconds) {
                ZoneNameKind::Daylight
            } else {
                ZoneNameKind::Standard
            }
        };
        let Ok(rules) = zone.rules(zones) else {
            return Ok(ZoneNameKind::Generic);
        };
        if temporal.is_supported(ChronoField::InstantSeconds.into()) {
            let seconds = temporal.get_long(ChronoField::InstantSeconds.into())?;
            return Ok(daylight(&rules, seconds));
        }
        let epoch_day = Field::from(ChronoField::EpochDay);
        let nano_of_day = Field::from(ChronoField::NanoOfDay);
        if temporal.is_supported(epoch_day) && temporal.is_supported(nano_of_day) {
            let date = IsoDate::try_from_epoch_days(temporal.get_long(epoch_day)?)?;
            let time = IsoTime::from_nano_of_day(temporal.get_long(nano_of_day)?);
            let date_time = IsoDateTime::new(date, time);
            if is_in_transition(&rules, date_time.to_epoch_seconds(0)) {
                return Ok(ZoneNameKind::Generic);
            }
            let zoned = ZonedDateTime::from_local(date_time, zone.clone(), zones)?;
            return Ok(daylight(&rules, zoned.to_instant().epoch_seconds()));
        }
        Ok(ZoneNameKind::Generic)
    }

    fn tree(&self, context: &ParseContext<'_>) -> TemporalResult<Arc<PrefixTree>> {
        if self.style.as_normal() == TextStyle::Narrow {
            return zone_id_tree(context);
        }
        let resources = context.resources();
        let zones = &resources.zones;
        let locale = context.locale();
        let case_sensitive = context.is_case_sensitive();
        let key = (
            locale.clone(),
            self.style.as_normal(),
            case_sensitive,
            zones.zone_id_count(),
        );
        resources.caches.zone_names.get_or_insert_with(&key, || {
            let mut tree = PrefixTree::new(case_sensitive);
            let ids = zones.available_zone_ids();
            for id in ids.iter().copied().chain([UTC_ID]) {
                tree.add(id, id);
                for name in self.names(context, id) {
                    tree.add(&name, id);
                }
            }
            Ok(tree)
        })
    }

    /// Every name of a zone in the parsed styles.
    fn names(&self, context: &ParseContext<'_>, id: &str) -> Vec<String> {
        let text = &context.resources().text;
        let kinds = [ZoneNameKind::Standard, ZoneNameKind::Daylight, ZoneNameKind::Generic];
        self.name_styles()
            .iter()
            .flat_map(|style| kinds.iter().map(move |kind| (*style, *kind)))
            .filter_map(|(style, kind)| text.zone_name(id, kind, style, context.locale()))
            .collect()
    }

    pub(crate) fn parse(
        &self,
        context: &mut ParseContext<'_>,
        text: &str,
        position: usize,
    ) -> ParseResult {
        let end = parse_zone(context, text, position, true, |context| self.tree(context))?;
        if self.preferred.is_empty() {
            return Ok(end);
        }
        // A preferred zone with the same name wins over the matched zone.
        let matched = &text[position..end];
        let preferred = self.preferred.iter().find(|id| {
            self.names(context, id).iter().any(|name| {
                context.sub_sequence_equals(matched, 0, name) == Some(matched.len())
            })
        });
        if let Some(zone) = preferred.and_then(|id| ZoneId::of(id).ok()) {
            context.set_parsed_zone(zone);
        }
        Ok(end)
    }
}

/// Whether a local date-time in epoch seconds is in a gap or an overlap.
fn is_in_transition(rules: &ZoneRules, local: i64) -> bool {
    let early = rules.offset_at(local.saturating_sub(86_400));
    let late = rules.offset_at(local.saturating_add(86_400));
    if early == late {
        return false;
    }
    let is_valid = |offset: i64| rules.offset_at(local - offset) == offset;
    is_valid(early) == is_valid(late)
}

impl Writeable for ZoneTextPrinterParser {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write!(sink, "ZoneText({})", self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::{DateTimeFormatter, DateTimeFormatterBuilder, FormatResources},
        provider::CompiledZoneRulesProvider,
        temporal::{Instant, ZonedDateTime},
    };
    use alloc::string::ToString;
    use zoneinfo_compiler::{ZoneInfoCompiler, ZoneInfoData};

    const ZONEINFO: &str = "\
# Rule  NAME  FROM  TO   -  IN   ON       AT    SAVE  LETTER/S
Rule    US    2007  max  -  Mar  Sun>=8   2:00  1:00  D
Rule    US    2007  max  -  Nov  Sun>=1   2:00  0     S
Rule    EU    1981  max  -  Mar  lastSun  1:00u 1:00  S
Rule    EU    1996  max  -  Oct  lastSun  1:00u 0     -
# Zone  NAME              STDOFF  RULES  FORMAT
Zone    America/New_York  -5:00   US     E%sT
Zone    Europe/Paris      1:00    EU     CE%sT
Zone    Europe/Berlin     1:00    EU     CE%sT
Zone    Asia/Tokyo        9:00    -      JST
Link    Europe/Paris      Europe/Monaco
";

    fn resources() -> FormatResources {
        let data = ZoneInfoData::from_zoneinfo_file(ZONEINFO).unwrap();
        let rules = ZoneInfoCompiler::new(data).build("test").unwrap();
        FormatResources::default().with_zones(Arc::new(CompiledZoneRulesProvider::new(rules)))
    }

    fn formatter(builder: DateTimeFormatterBuilder) -> DateTimeFormatter {
        builder.to_formatter().with_resources(resources())
    }

    fn parse_zone(formatter: &DateTimeFormatter, text: &str) -> Option<(String, usize)> {
        let mut position = crate::format::ParsePosition::new(0);
        let parsed = formatter.parse_unresolved(text, &mut position)?;
        Some((parsed.zone()?.to_string(), position.index()))
    }

    #[test]
    fn prefix_tree_longest_match() {
        let mut tree = PrefixTree::new(true);
        tree.add("Europe/Paris", "Europe/Paris");
        tree.add("Europe/Par", "short");
        tree.add("Asia/Tokyo", "Asia/Tokyo");
        assert_eq!(tree.match_at("Europe/Paris!", 0), Some(("Europe/Paris", 12)));
        assert_eq!(tree.match_at("Europe/Parx", 0), Some(("short", 10)));
        assert_eq!(tree.match_at("Europe/Pa", 0), None);
        assert_eq!(tree.match_at("europe/paris", 0), None);
        assert_eq!(tree.match_at("x Asia/Tokyo", 2), Some(("Asia/Tokyo", 12)));

        let mut tree = PrefixTree::new(false);
        tree.add("Europe/Paris", "Europe/Paris");
        assert_eq!(tree.match_at("EUROPE/PARIS", 0), Some(("Europe/Paris", 12)));
    }

    #[test]
    fn parse_zone_ids() {
        let formatter = formatter(DateTimeFormatterBuilder::new().append_zone_id());
        let cases = [
            ("Europe/Paris", "Europe/Paris", 12),
            ("Europe/Monaco", "Europe/Monaco", 13),
            ("+01:00", "+01:00", 6),
            ("-05:30x", "-05:30", 6),
            ("UTC", "UTC", 3),
            ("UTC+01:00", "UTC+01:00", 9),
            ("UT-02:00", "UT-02:00", 8),
            ("UT-02", "UT", 2),
            ("GMT", "GMT", 3),
            ("GMT0", "GMT0", 4),
            ("GMT+5", "GMT", 3),
            ("Z", "Z", 1),
            ("UTCZ", "UTC", 3),
        ];
        for (text, zone, end) in cases {
            assert_eq!(
                parse_zone(&formatter, text),
                Some((zone.to_string(), end)),
                "{text}"
            );
        }
        assert_eq!(parse_zone(&formatter, "Mars/Olympus"), None);
        assert_eq!(parse_zone(&formatter, "+1"), None);
    }

    #[test]
    fn parse_zone_ids_case_insensitive() {
        let formatter = formatter(
            DateTimeFormatterBuilder::new()
                .parse_case_insensitive()
                .append_zone_id(),
        );
        assert_eq!(
            parse_zone(&formatter, "europe/paris"),
            Some(("Europe/Paris".to_string(), 12))
        );
        assert_eq!(parse_zone(&formatter, "utc"), Some(("UTC".to_string(), 3)));
    }

    #[test]
    fn format_zone_ids() {
        let resources = resources();
        let zone = ZoneId::of("Europe/Paris").unwrap();
        let zoned = ZonedDateTime::from_instant(
            Instant::from_epoch_seconds(1_341_057_600),
            zone,
            resources.zones.as_ref(),
        )
        .unwrap();
        let zone_id = formatter(DateTimeFormatterBuilder::new().append_zone_id());
        assert_eq!(zone_id.format(&zoned).unwrap(), "Europe/Paris");

        let region_only = formatter(DateTimeFormatterBuilder::new().append_zone_region_id());
        let fixed = ZonedDateTime::from_instant(
            Instant::from_epoch_seconds(0),
            ZoneOffset::from_total_seconds(3600).unwrap().into(),
            resources.zones.as_ref(),
        )
        .unwrap();
        assert!(region_only.format(&fixed).is_err());

        let or_offset = formatter(DateTimeFormatterBuilder::new().append_zone_or_offset_id());
        let offset_date_time = crate::temporal::OffsetDateTime::from_instant(
            Instant::from_epoch_seconds(0),
            ZoneOffset::from_total_seconds(-3600).unwrap(),
        )
        .unwrap();
        assert_eq!(or_offset.format(&offset_date_time).unwrap(), "-01:00");
    }

    #[test]
    fn format_zone_names() {
        let resources = resources();
        let zoned = |seconds: i64, id: &str| {
            ZonedDateTime::from_instant(
                Instant::from_epoch_seconds(seconds),
                ZoneId::of(id).unwrap(),
                resources.zones.as_ref(),
            )
            .unwrap()
        };
        let full = formatter(DateTimeFormatterBuilder::new().append_zone_text(TextStyle::Full));
        let short = formatter(DateTimeFormatterBuilder::new().append_zone_text(TextStyle::Short));
        // 2012-06-30T12:00Z and 2012-01-15T12:00Z
        let summer = 1_341_057_600;
        let winter = 1_326_628_800;
        assert_eq!(
            full.format(&zoned(summer, "America/New_York")).unwrap(),
            "Eastern Daylight Time"
        );
        assert_eq!(short.format(&zoned(winter, "America/New_York")).unwrap(), "EST");
        assert_eq!(short.format(&zoned(summer, "Europe/Paris")).unwrap(), "CEST");
        // No names for Monaco.
        assert_eq!(short.format(&zoned(summer, "Europe/Monaco")).unwrap(), "Europe/Monaco");
        assert_eq!(full.format(&zoned(summer, "UTC")).unwrap(), "Coordinated Universal Time");
        assert_eq!(short.format(&zoned(summer, "+02:00")).unwrap(), "+02:00");

        let generic = formatter(DateTimeFormatterBuilder::new().append_generic_zone_text(TextStyle::Full));
        assert_eq!(
            generic.format(&zoned(summer, "America/New_York")).unwrap(),
            "Eastern Time"
        );
    }

    #[test]
    fn parse_zone_names() {
        let full = formatter(DateTimeFormatterBuilder::new().append_zone_text(TextStyle::Full));
        assert_eq!(
            parse_zone(&full, "Eastern Standard Time"),
            Some(("America/New_York".to_string(), 21))
        );
        assert_eq!(parse_zone(&full, "EDT"), Some(("America/New_York".to_string(), 3)));
        assert_eq!(parse_zone(&full, "Asia/Tokyo"), Some(("Asia/Tokyo".to_string(), 10)));
        assert_eq!(parse_zone(&full, "UTC"), Some(("UTC".to_string(), 3)));
        assert_eq!(
            parse_zone(&full, "Coordinated Universal Time"),
            Some(("UTC".to_string(), 26))
        );
        assert_eq!(parse_zone(&full, "GMT+02:00"), Some(("GMT+02:00".to_string(), 9)));

        let short = formatter(DateTimeFormatterBuilder::new().append_zone_text(TextStyle::Short));
        assert_eq!(parse_zone(&short, "Eastern Standard Time"), None);
        assert_eq!(parse_zone(&short, "EST"), Some(("America/New_York".to_string(), 3)));
    }

    #[test]
    fn preferred_zones() {
        let plain = formatter(DateTimeFormatterBuilder::new().append_zone_text(TextStyle::Short));
        let paris = formatter(DateTimeFormatterBuilder::new().append_zone_text_with_preferred(
            TextStyle::Short,
            ["Europe/Paris".to_string()],
        ));
        let berlin = formatter(DateTimeFormatterBuilder::new().append_zone_text_with_preferred(
            TextStyle::Short,
            ["Europe/Berlin".to_string()],
        ));
        assert!(parse_zone(&plain, "CEST").is_some());
        assert_eq!(parse_zone(&paris, "CEST"), Some(("Europe/Paris".to_string(), 4)));
        assert_eq!(parse_zone(&berlin, "CEST"), Some(("Europe/Berlin".to_string(), 4)));
    }

    #[test]
    fn descriptions() {
        assert_eq!(
            ZoneIdPrinterParser::new(ZoneQuery::RegionOnly).write_to_string(),
            "ZoneRegionId()"
        );
        assert_eq!(
            ZoneTextPrinterParser::new(TextStyle::Short, false, Vec::new()).write_to_string(),
            "ZoneText(SHORT)"
        );
    }
}
