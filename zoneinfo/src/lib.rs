//! A library for parsing zoneinfo files and compiling them into
//! zone rules: an offset history of transitions plus the rules
//! that recur every year after the last transition.
//!
//! The `zoneinfo_compiler` offers parsing of the zoneinfo source
//! format into [`ZoneInfoData`], a [`ZoneRulesBuilder`] that turns
//! windows of standard offsets and savings rules into [`ZoneRules`],
//! and a [`ZoneInfoCompiler`] that drives the builder for every zone
//! and resolves links.
//!
//! ```
//! use zoneinfo_compiler::{ZoneInfoCompiler, ZoneInfoData};
//!
//! let source = "Rule\tEU\t1981\tmax\t-\tMar\tlastSun\t1:00u\t1:00\tS
//! Rule\tEU\t1996\tmax\t-\tOct\tlastSun\t1:00u\t0\t-
//! Zone\tEurope/Paris\t1:00\tEU\tCE%sT
//! ";
//! let data = ZoneInfoData::from_zoneinfo_file(source).unwrap();
//! let rules = ZoneInfoCompiler::new(data).build_zone("Europe/Paris").unwrap();
//! // 2025-07-01T00:00Z
//! assert_eq!(rules.offset_at(1_751_328_000), 7200);
//! ```

// Implementation note: this library is NOT designed to be the most
// optimal speed. Instead invariance and clarity is preferred where
// need be.
//
// We can get away with any performance penalty primarily because
// this library is designed to aid with build time libraries, on
// a limited dataset, NOT at runtime on extremely large datasets.

#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::{string::String, vec::Vec};

use hashbrown::HashMap;

#[cfg(feature = "std")]
use alloc::string::ToString;
#[cfg(feature = "std")]
use std::path::Path;

pub mod builder;
pub mod compiler;
pub mod error;
pub mod parser;
pub mod rule;
pub mod rules;
pub mod types;
pub mod utils;
pub mod zone;

pub use builder::{WindowRule, ZoneRulesBuilder};
pub use compiler::{ZoneInfoCompiler, ZoneRulesCollection};
pub use error::{ZoneInfoError, ZoneRulesError};
pub use rules::{ZoneOffsetTransition, ZoneOffsetTransitionRule, ZoneRules};

use parser::ZoneInfoParser;
use rule::RuleRecord;
use zone::ZoneRecord;

/// Well-known zone info file
pub const ZONEINFO_FILES: [&str; 9] = [
    "africa",
    "antarctica",
    "asia",
    "australasia",
    "backward",
    "etcetera",
    "europe",
    "northamerica",
    "southamerica",
];

/// The records parsed from one or more zoneinfo files.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct ZoneInfoData {
    /// Rule set name to the rules of the set, in source order.
    pub rules: HashMap<String, Vec<RuleRecord>>,
    pub zones: HashMap<String, ZoneRecord>,
    /// Alias to target.
    pub links: HashMap<String, String>,
    /// `#PACKRATLIST` links, alias to target.
    pub pack_rat: HashMap<String, String>,
}

// ==== ZoneInfoData parsing methods ====

impl ZoneInfoData {
    /// Parse data from a path to a directory of zoneinfo files, using well known
    /// zoneinfo file names.
    ///
    /// This is usually pointed to a "tzdata" directory.
    #[cfg(feature = "std")]
    pub fn from_zoneinfo_directory<P: AsRef<Path>>(dir: P) -> Result<Self, ZoneInfoError> {
        let mut zoneinfo = Self::default();
        for filename in ZONEINFO_FILES {
            let file_path = dir.as_ref().join(filename);
            let parsed = Self::from_filepath(file_path)?;
            zoneinfo.extend(parsed);
        }
        Ok(zoneinfo)
    }

    /// Parse data from a filepath to a zoneinfo file.
    ///
    /// Parse errors are tagged with the file name.
    #[cfg(feature = "std")]
    pub fn from_filepath<P: AsRef<Path>>(path: P) -> Result<Self, ZoneInfoError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        #[cfg(feature = "log")]
        log::debug!("Parsing zoneinfo file {}", path.display());
        ZoneInfoParser::from_zoneinfo_str(&source)
            .parse()
            .map_err(|error| ZoneInfoError::Parse {
                file: Some(
                    path.file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string()),
                ),
                error,
            })
    }

    /// Parses data from a zoneinfo file as a string slice.
    pub fn from_zoneinfo_file(src: &str) -> Result<Self, ZoneInfoError> {
        Ok(ZoneInfoParser::from_zoneinfo_str(src).parse()?)
    }

    /// Extend the current `ZoneInfoData` with the records of another.
    pub fn extend(&mut self, other: Self) {
        for (name, rules) in other.rules {
            self.rules.entry(name).or_default().extend(rules);
        }
        self.zones.extend(other.zones);
        self.links.extend(other.links);
        self.pack_rat.extend(other.pack_rat);
    }
}
