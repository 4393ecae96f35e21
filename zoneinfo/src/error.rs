//! Error types for zoneinfo parsing and zone rule building.

use core::fmt;

use alloc::string::String;

#[cfg(feature = "std")]
use std::io;

use crate::parser::ZoneInfoParseError;

/// An error raised while building the rules of a single zone.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ZoneRulesError {
    /// No windows were added before building.
    NoWindows,
    /// A window ends before the window that precedes it.
    WindowsOutOfOrder,
    /// A window was added after a window that lasts forever.
    WindowAfterForever,
    /// A window with fixed savings was given rules, or the reverse.
    MixedSavings,
    /// A window holds more rules than the builder allows.
    TooManyRules,
    /// A window holds exactly one rule that recurs forever.
    SingleLastRule,
    InvalidDayOfMonthIndicator(i8),
    InvalidTimeOfDay(i64),
    /// An end of day rule time must be midnight.
    EndOfDayNotMidnight,
    YearOutOfRange(i32),
    /// A zone line names a rule set that was never defined.
    UndefinedRuleSet(String),
    UnknownZone(String),
    /// A link that could not be resolved to a zone within one extra hop.
    UnresolvedLink { alias: String, target: String },
}

impl fmt::Display for ZoneRulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindows => f.write_str("no windows have been added to the builder"),
            Self::WindowsOutOfOrder => f.write_str("windows must be added in date-time order"),
            Self::WindowAfterForever => {
                f.write_str("a window cannot be added after a window that lasts forever")
            }
            Self::MixedSavings => {
                f.write_str("a window cannot have both fixed savings and savings rules")
            }
            Self::TooManyRules => {
                f.write_str("window has reached the maximum number of allowed rules")
            }
            Self::SingleLastRule => {
                f.write_str("cannot have only one rule defined as being forever")
            }
            Self::InvalidDayOfMonthIndicator(day) => {
                write!(f, "invalid day of month indicator: {day}")
            }
            Self::InvalidTimeOfDay(secs) => write!(f, "invalid rule time of day: {secs}s"),
            Self::EndOfDayNotMidnight => f.write_str("an end of day time must be midnight"),
            Self::YearOutOfRange(year) => write!(f, "year out of range: {year}"),
            Self::UndefinedRuleSet(name) => write!(f, "undefined rule set: {name}"),
            Self::UnknownZone(id) => write!(f, "unknown zone: {id}"),
            Self::UnresolvedLink { alias, target } => {
                write!(f, "unable to resolve link {alias} -> {target}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZoneRulesError {}

/// The general error type for `ZoneInfoData` operations
#[derive(Debug)]
#[non_exhaustive]
pub enum ZoneInfoError {
    /// A malformed source line, tagged with the file it came from when known.
    Parse {
        file: Option<String>,
        error: ZoneInfoParseError,
    },
    /// Building the rules of a zone failed.
    Rules { zone: String, error: ZoneRulesError },
    #[cfg(feature = "std")]
    Io(io::Error),
}

impl fmt::Display for ZoneInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse {
                file: Some(file),
                error,
            } => write!(f, "{file}: {error}"),
            Self::Parse { file: None, error } => error.fmt(f),
            Self::Rules { zone, error } => write!(f, "{zone}: {error}"),
            #[cfg(feature = "std")]
            Self::Io(error) => error.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZoneInfoError {}

impl From<ZoneInfoParseError> for ZoneInfoError {
    fn from(error: ZoneInfoParseError) -> Self {
        Self::Parse { file: None, error }
    }
}

#[cfg(feature = "std")]
impl From<io::Error> for ZoneInfoError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
