//! The providers of locale text and zone rules used by the formatter.
//!
//! Both boundaries are traits so that locale data and zone rules can come
//! from anywhere. The crate ships an English [`DefaultTextProvider`] and a
//! [`CompiledZoneRulesProvider`] backed by the output of the zoneinfo
//! compiler.

use alloc::{
    borrow::ToOwned,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use icu_locale::Locale;
use zoneinfo_compiler::{ZoneRules, ZoneRulesCollection};

use crate::{
    fields::{ChronoField, Field, IsoField, WeekDefinition},
    TemporalError, TemporalResult,
};

/// The width and context of localized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextStyle {
    Full,
    FullStandalone,
    Short,
    ShortStandalone,
    Narrow,
    NarrowStandalone,
}

impl TextStyle {
    pub const fn is_standalone(self) -> bool {
        matches!(
            self,
            Self::FullStandalone | Self::ShortStandalone | Self::NarrowStandalone
        )
    }

    pub const fn as_standalone(self) -> Self {
        match self {
            Self::Full | Self::FullStandalone => Self::FullStandalone,
            Self::Short | Self::ShortStandalone => Self::ShortStandalone,
            Self::Narrow | Self::NarrowStandalone => Self::NarrowStandalone,
        }
    }

    pub const fn as_normal(self) -> Self {
        match self {
            Self::Full | Self::FullStandalone => Self::Full,
            Self::Short | Self::ShortStandalone => Self::Short,
            Self::Narrow | Self::NarrowStandalone => Self::Narrow,
        }
    }
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "FULL",
            Self::FullStandalone => "FULL_STANDALONE",
            Self::Short => "SHORT",
            Self::ShortStandalone => "SHORT_STANDALONE",
            Self::Narrow => "NARROW",
            Self::NarrowStandalone => "NARROW_STANDALONE",
        })
    }
}

/// The length of a localized date or time format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatStyle {
    Full,
    Long,
    Medium,
    Short,
}

impl fmt::Display for FormatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "FULL",
            Self::Long => "LONG",
            Self::Medium => "MEDIUM",
            Self::Short => "SHORT",
        })
    }
}

/// Which of the display names of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneNameKind {
    Standard,
    Daylight,
    Generic,
}

/// Candidate texts and their values, longest text first.
pub type TextCandidates = Vec<(String, i64)>;

/// The source of localized text.
pub trait TextProvider: fmt::Debug + Send + Sync {
    /// The text of a field value, if the locale has one.
    fn text(&self, field: Field, value: i64, style: TextStyle, locale: &Locale) -> Option<String>;

    /// Every text of a field in a style, or in all styles when `style` is
    /// `None`, in any order. Parsing picks the longest text that matches.
    ///
    /// Texts that stand for more than one value are left out.
    fn text_candidates(
        &self,
        field: Field,
        style: Option<TextStyle>,
        locale: &Locale,
    ) -> Option<TextCandidates>;

    /// The display name of a zone.
    fn zone_name(
        &self,
        zone_id: &str,
        kind: ZoneNameKind,
        style: TextStyle,
        locale: &Locale,
    ) -> Option<String>;

    /// The pattern of a localized format.
    fn localized_pattern(
        &self,
        date_style: Option<FormatStyle>,
        time_style: Option<FormatStyle>,
        chronology_id: &str,
        locale: &Locale,
    ) -> TemporalResult<String>;

    /// The week definition of a locale.
    fn week_definition(&self, locale: &Locale) -> WeekDefinition {
        WeekDefinition::of_locale(locale)
    }
}

// ==== Default locale data ====

const MONTHS: [[&str; 12]; 3] = [
    [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
];

const DAYS: [[&str; 7]; 3] = [
    [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    ["M", "T", "W", "T", "F", "S", "S"],
];

const AM_PM: [[&str; 2]; 3] = [["AM", "PM"], ["AM", "PM"], ["a", "p"]];

const ERAS: [[&str; 2]; 3] = [
    ["Before Christ", "Anno Domini"],
    ["BC", "AD"],
    ["B", "A"],
];

const QUARTERS: [[&str; 4]; 3] = [
    ["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"],
    ["Q1", "Q2", "Q3", "Q4"],
    ["1", "2", "3", "4"],
];

/// Zone id, then the full and short standard, daylight and generic names.
const ZONE_NAMES: [(&str, [[&str; 3]; 2]); 9] = [
    (
        "America/New_York",
        [
            ["Eastern Standard Time", "Eastern Daylight Time", "Eastern Time"],
            ["EST", "EDT", "ET"],
        ],
    ),
    (
        "America/Chicago",
        [
            ["Central Standard Time", "Central Daylight Time", "Central Time"],
            ["CST", "CDT", "CT"],
        ],
    ),
    (
        "America/Denver",
        [
            ["Mountain Standard Time", "Mountain Daylight Time", "Mountain Time"],
            ["MST", "MDT", "MT"],
        ],
    ),
    (
        "America/Los_Angeles",
        [
            ["Pacific Standard Time", "Pacific Daylight Time", "Pacific Time"],
            ["PST", "PDT", "PT"],
        ],
    ),
    (
        "Europe/London",
        [
            ["Greenwich Mean Time", "British Summer Time", "British Time"],
            ["GMT", "BST", "BT"],
        ],
    ),
    (
        "Europe/Paris",
        [
            [
                "Central European Standard Time",
                "Central European Summer Time",
                "Central European Time",
            ],
            ["CET", "CEST", "CET"],
        ],
    ),
    (
        "Europe/Berlin",
        [
            [
                "Central European Standard Time",
                "Central European Summer Time",
                "Central European Time",
            ],
            ["CET", "CEST", "CET"],
        ],
    ),
    (
        "Asia/Tokyo",
        [
            ["Japan Standard Time", "Japan Daylight Time", "Japan Time"],
            ["JST", "JDT", "JT"],
        ],
    ),
    (
        "UTC",
        [
            [
                "Coordinated Universal Time",
                "Coordinated Universal Time",
                "Coordinated Universal Time",
            ],
            ["UTC", "UTC", "UTC"],
        ],
    ),
];

/// Regions where weeks start on Sunday and the first week may have one day.
const SUNDAY_START_REGIONS: [&str; 22] = [
    "AS", "BR", "BZ", "CA", "CO", "DO", "GT", "HK", "HN", "IL", "IN", "JM", "JP", "KR", "MX",
    "PA", "PE", "PH", "PR", "TW", "US", "ZA",
];

impl WeekDefinition {
    /// The week definition of a locale's region.
    ///
    /// Regions with Sunday-started weeks use [`WeekDefinition::SUNDAY_START`],
    /// everything else, including locales without a region, uses
    /// [`WeekDefinition::ISO`].
    pub fn of_locale(locale: &Locale) -> Self {
        match locale.id.region {
            Some(region) if SUNDAY_START_REGIONS.contains(&region.as_str()) => Self::SUNDAY_START,
            _ => Self::ISO,
        }
    }
}

/// English text for the ISO fields, used for every locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextProvider;

impl DefaultTextProvider {
    /// The table row of a style: full, short or narrow.
    const fn row(style: TextStyle) -> usize {
        match style.as_normal() {
            TextStyle::Full => 0,
            TextStyle::Short => 1,
            _ => 2,
        }
    }

    /// The texts of a field in one style, with the value of the first text.
    fn table(field: Field, style: TextStyle) -> Option<(&'static [&'static str], i64)> {
        let row = Self::row(style);
        let table: (&[&str], i64) = match field {
            Field::Chrono(ChronoField::MonthOfYear) => (&MONTHS[row], 1),
            Field::Chrono(ChronoField::DayOfWeek) => (&DAYS[row], 1),
            Field::Chrono(ChronoField::AmPmOfDay) => (&AM_PM[row], 0),
            Field::Chrono(ChronoField::Era) => (&ERAS[row], 0),
            Field::Iso(IsoField::QuarterOfYear) => (&QUARTERS[row], 1),
            _ => return None,
        };
        Some(table)
    }
}

impl TextProvider for DefaultTextProvider {
    fn text(&self, field: Field, value: i64, style: TextStyle, _: &Locale) -> Option<String> {
        let (texts, first) = Self::table(field, style)?;
        let index = usize::try_from(value.checked_sub(first)?).ok()?;
        texts.get(index).map(|text| (*text).to_owned())
    }

    fn text_candidates(
        &self,
        field: Field,
        style: Option<TextStyle>,
        _: &Locale,
    ) -> Option<TextCandidates> {
        let styles: &[TextStyle] = match style {
            Some(ref style) => core::slice::from_ref(style),
            None => &[TextStyle::Full, TextStyle::Short, TextStyle::Narrow],
        };
        let mut candidates: TextCandidates = Vec::new();
        let mut ambiguous: Vec<&str> = Vec::new();
        for style in styles {
            let (texts, first) = Self::table(field, *style)?;
            for (value, text) in (first..).zip(texts.iter()) {
                match candidates.iter().find(|(known, _)| known.as_str() == *text) {
                    Some((_, known_value)) if *known_value != value => ambiguous.push(*text),
                    Some(_) => {}
                    None => candidates.push(((*text).to_owned(), value)),
                }
            }
        }
        candidates.retain(|(text, _)| !ambiguous.contains(&text.as_str()));
        candidates.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        Some(candidates)
    }

    fn zone_name(
        &self,
        zone_id: &str,
        kind: ZoneNameKind,
        style: TextStyle,
        _: &Locale,
    ) -> Option<String> {
        let (_, names) = ZONE_NAMES.iter().find(|(id, _)| *id == zone_id)?;
        let names = if style.as_normal() == TextStyle::Full {
            names[0]
        } else {
            names[1]
        };
        let name = match kind {
            ZoneNameKind::Standard => names[0],
            ZoneNameKind::Daylight => names[1],
            ZoneNameKind::Generic => names[2],
        };
        Some(name.to_owned())
    }

    fn localized_pattern(
        &self,
        date_style: Option<FormatStyle>,
        time_style: Option<FormatStyle>,
        _: &str,
        _: &Locale,
    ) -> TemporalResult<String> {
        let date = date_style.map(|style| match style {
            FormatStyle::Full => "EEEE, MMMM d, y",
            FormatStyle::Long => "MMMM d, y",
            FormatStyle::Medium => "MMM d, y",
            FormatStyle::Short => "M/d/yy",
        });
        let time = time_style.map(|style| match style {
            FormatStyle::Full => "h:mm:ss a zzzz",
            FormatStyle::Long => "h:mm:ss a z",
            FormatStyle::Medium => "h:mm:ss a",
            FormatStyle::Short => "h:mm a",
        });
        match (date, time) {
            (Some(date), Some(time)) => Ok(format!("{date}, {time}")),
            (Some(pattern), None) | (None, Some(pattern)) => Ok(pattern.to_string()),
            (None, None) => Err(TemporalError::r#type()
                .with_message("Either dateStyle or timeStyle must be non-null")),
        }
    }
}

// ==== Zone rules ====

/// The source of zone ids and their rules.
pub trait ZoneRulesProvider: fmt::Debug + Send + Sync {
    /// Every region id the provider has rules for.
    fn available_zone_ids(&self) -> Vec<&str>;

    /// The number of available region ids.
    fn zone_id_count(&self) -> usize {
        self.available_zone_ids().len()
    }

    /// The rules of a region id.
    fn rules(&self, zone_id: &str) -> Option<&ZoneRules>;

    /// The version of the data.
    fn version(&self) -> &str {
        ""
    }
}

/// Zone rules compiled from zoneinfo source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledZoneRulesProvider {
    collection: ZoneRulesCollection,
}

impl CompiledZoneRulesProvider {
    pub fn new(collection: ZoneRulesCollection) -> Self {
        #[cfg(feature = "log")]
        log::debug!(
            "Zone rules {} provide {} zones and {} links",
            collection.version,
            collection.rules.len(),
            collection.links.len()
        );
        Self { collection }
    }

    pub fn collection(&self) -> &ZoneRulesCollection {
        &self.collection
    }
}

impl From<ZoneRulesCollection> for CompiledZoneRulesProvider {
    fn from(value: ZoneRulesCollection) -> Self {
        Self::new(value)
    }
}

impl ZoneRulesProvider for CompiledZoneRulesProvider {
    fn available_zone_ids(&self) -> Vec<&str> {
        self.collection.provided_zone_ids()
    }

    fn zone_id_count(&self) -> usize {
        self.collection.rules.len() + self.collection.links.len()
    }

    fn rules(&self, zone_id: &str) -> Option<&ZoneRules> {
        self.collection.get(zone_id)
    }

    fn version(&self) -> &str {
        &self.collection.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icu_locale::locale;

    #[test]
    fn default_text() {
        let provider = DefaultTextProvider;
        let en = locale!("en");
        assert_eq!(
            provider
                .text(ChronoField::MonthOfYear.into(), 6, TextStyle::Full, &en)
                .as_deref(),
            Some("June")
        );
        assert_eq!(
            provider
                .text(ChronoField::DayOfWeek.into(), 2, TextStyle::ShortStandalone, &en)
                .as_deref(),
            Some("Tue")
        );
        assert_eq!(
            provider.text(ChronoField::DayOfWeek.into(), 8, TextStyle::Short, &en),
            None
        );
        assert_eq!(
            provider.text(ChronoField::Year.into(), 2012, TextStyle::Short, &en),
            None
        );
    }

    #[test]
    fn candidates_longest_first() {
        let provider = DefaultTextProvider;
        let en = locale!("en");
        let days = provider
            .text_candidates(ChronoField::DayOfWeek.into(), None, &en)
            .unwrap();
        assert_eq!(days[0], ("Wednesday".into(), 3));
        let tuesday = days.iter().position(|(text, _)| text == "Tuesday").unwrap();
        let tue = days.iter().position(|(text, _)| text == "Tue").unwrap();
        assert!(tuesday < tue);
        // Narrow day names repeat and cannot be parsed.
        assert!(!days.iter().any(|(text, _)| text == "T" || text == "S"));
        assert!(days.iter().any(|(text, value)| text == "W" && *value == 3));
    }

    #[test]
    fn localized_patterns() {
        let provider = DefaultTextProvider;
        let en = locale!("en");
        assert_eq!(
            provider
                .localized_pattern(Some(FormatStyle::Medium), Some(FormatStyle::Short), "ISO", &en)
                .unwrap(),
            "MMM d, y, h:mm a"
        );
        assert!(provider.localized_pattern(None, None, "ISO", &en).is_err());
    }

    #[test]
    fn week_definitions() {
        assert_eq!(
            WeekDefinition::of_locale(&locale!("en-US")),
            WeekDefinition::SUNDAY_START
        );
        assert_eq!(WeekDefinition::of_locale(&locale!("fr-FR")), WeekDefinition::ISO);
        assert_eq!(WeekDefinition::of_locale(&locale!("en")), WeekDefinition::ISO);
    }
}
