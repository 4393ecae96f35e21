//! Zone info compiler functionality
//!
//! This module turns parsed [`ZoneInfoData`] into [`ZoneRules`] for every
//! zone, with links resolved to the zone they alias.

use alloc::{
    borrow::ToOwned,
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    builder::ZoneRulesBuilder,
    error::{ZoneInfoError, ZoneRulesError},
    rules::ZoneRules,
    types::RuleIdentifier,
    ZoneInfoData,
};

/// Zone ids that are served by offset prefixes rather than region rules.
pub const EXCLUDED_ZONE_IDS: [&str; 5] = ["UTC", "GMT", "GMT0", "GMT+0", "GMT-0"];

/// The compiled rules of a zoneinfo data set.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneRulesCollection {
    /// The data version, i.e. `2025b`
    pub version: String,
    pub rules: BTreeMap<String, ZoneRules>,
    /// Alias to zone id.
    pub links: BTreeMap<String, String>,
}

impl ZoneRulesCollection {
    /// Returns every zone and link id, sorted.
    pub fn provided_zone_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .rules
            .keys()
            .chain(self.links.keys())
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the rules for a zone or link id.
    pub fn get(&self, id: &str) -> Option<&ZoneRules> {
        self.rules.get(id).or_else(|| {
            self.links
                .get(id)
                .and_then(|target| self.rules.get(target))
        })
    }
}

/// Compiles parsed zoneinfo data.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct ZoneInfoCompiler {
    data: ZoneInfoData,
    include_pack_rat: bool,
}

impl ZoneInfoCompiler {
    pub fn new(data: ZoneInfoData) -> Self {
        Self {
            data,
            include_pack_rat: false,
        }
    }

    /// Treat `#PACKRATLIST` links as links when the alias is not a zone.
    pub fn with_pack_rat(mut self, include: bool) -> Self {
        self.include_pack_rat = include;
        self
    }

    pub fn data(&self) -> &ZoneInfoData {
        &self.data
    }

    /// Resolves a zone or link id to the zone id holding its rules.
    ///
    /// A link to a link is followed once. Longer chains are not resolved.
    pub fn resolve_zone_id<'a>(&'a self, id: &'a str) -> Result<&'a str, ZoneRulesError> {
        if self.data.zones.contains_key(id) {
            return Ok(id);
        }
        let target = self
            .link_target(id)
            .ok_or_else(|| ZoneRulesError::UnknownZone(id.to_owned()))?;
        if self.data.zones.contains_key(target) {
            return Ok(target);
        }
        match self.link_target(target) {
            Some(second) if self.data.zones.contains_key(second) => {
                #[cfg(feature = "log")]
                log::warn!("Link {id} resolved through the link {target} to {second}");
                Ok(second)
            }
            _ => Err(ZoneRulesError::UnresolvedLink {
                alias: id.to_owned(),
                target: target.to_owned(),
            }),
        }
    }

    fn link_target(&self, id: &str) -> Option<&str> {
        self.data
            .links
            .get(id)
            .or_else(|| {
                self.include_pack_rat
                    .then(|| self.data.pack_rat.get(id))
                    .flatten()
            })
            .map(String::as_str)
    }

    /// Builds the rules of a single zone or link.
    pub fn build_zone(&self, id: &str) -> Result<ZoneRules, ZoneRulesError> {
        let zone_id = self.resolve_zone_id(id)?;
        let record = self
            .data
            .zones
            .get(zone_id)
            .ok_or_else(|| ZoneRulesError::UnknownZone(zone_id.to_owned()))?;

        let mut builder = ZoneRulesBuilder::default();
        for entry in &record.entries {
            let standard_offset = entry.std_offset.as_secs();
            match &entry.date {
                Some(until) => builder.add_window(
                    standard_offset,
                    until.to_local_date_time(),
                    until.time.time_definition(),
                )?,
                None => builder.add_window_forever(standard_offset)?,
            };
            match &entry.rule {
                RuleIdentifier::None => {
                    builder.set_fixed_savings_to_window(0)?;
                }
                RuleIdentifier::Numeric(savings) => {
                    builder.set_fixed_savings_to_window(savings.as_secs())?;
                }
                RuleIdentifier::Named(name) => {
                    let rules = self
                        .data
                        .rules
                        .get(name)
                        .ok_or_else(|| ZoneRulesError::UndefinedRuleSet(name.clone()))?;
                    for rule in rules {
                        builder.add_rule_to_window(rule.to_window_rule()?)?;
                    }
                }
            }
        }
        builder.to_rules()
    }

    /// Builds the rules of every zone and resolves every link.
    pub fn build(&self, version: &str) -> Result<ZoneRulesCollection, ZoneInfoError> {
        let mut collection = ZoneRulesCollection {
            version: version.to_owned(),
            ..Default::default()
        };
        for id in self.data.zones.keys() {
            if EXCLUDED_ZONE_IDS.contains(&id.as_str()) {
                continue;
            }
            let rules = self.build_zone(id).map_err(|error| ZoneInfoError::Rules {
                zone: id.clone(),
                error,
            })?;
            #[cfg(feature = "log")]
            log::debug!(
                "Compiled {id} with {} wall transitions",
                rules.wall_transitions.len()
            );
            collection.rules.insert(id.clone(), rules);
        }

        let mut aliases: Vec<&String> = self.data.links.keys().collect();
        if self.include_pack_rat {
            aliases.extend(
                self.data
                    .pack_rat
                    .keys()
                    .filter(|alias| !self.data.zones.contains_key(*alias)),
            );
        }
        for alias in aliases {
            if EXCLUDED_ZONE_IDS.contains(&alias.as_str()) {
                continue;
            }
            let target = self
                .resolve_zone_id(alias)
                .map_err(|error| ZoneInfoError::Rules {
                    zone: alias.clone(),
                    error,
                })?;
            if collection.rules.contains_key(target) {
                collection.links.insert(alias.clone(), target.to_string());
            }
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Compiled {} zones and {} links for version {}",
            collection.rules.len(),
            collection.links.len(),
            collection.version
        );
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "# test data
Rule\tEU\t1977\t1980\t-\tApr\tSun>=1\t 1:00u\t1:00\tS
Rule\tEU\t1977\tonly\t-\tSep\tlastSun\t 1:00u\t0\t-
Rule\tEU\t1978\tonly\t-\tOct\t 1\t 1:00u\t0\t-
Rule\tEU\t1979\t1995\t-\tSep\tlastSun\t 1:00u\t0\t-
Rule\tEU\t1981\tmax\t-\tMar\tlastSun\t 1:00u\t1:00\tS
Rule\tEU\t1996\tmax\t-\tOct\tlastSun\t 1:00u\t0\t-

Zone\tEurope/Brussels\t0:17:30 -\tLMT\t1880
\t\t\t0:17:30\t-\tBMT\t1892 May  1 00:17:30
\t\t\t0:00\t-\tWET\t1914 Nov  8
\t\t\t1:00\t-\tCET\t1977
\t\t\t1:00\tEU\tCE%sT
Zone\tEtc/UTC\t0\t-\tUTC
Zone\tBroken\t1:00\tNope\tX%sT
Link\tEtc/UTC\tUTC
Link\tEurope/Brussels\tEurope/Amsterdam
Link\tEurope/Amsterdam\tEurope/Netherlands
Link\tEurope/Netherlands\tEurope/Holland
";

    fn compiler() -> ZoneInfoCompiler {
        ZoneInfoCompiler::new(ZoneInfoData::from_zoneinfo_file(SOURCE).unwrap())
    }

    #[test]
    fn brussels_summer_time() {
        let rules = compiler().build_zone("Europe/Brussels").unwrap();
        assert_eq!(rules.initial_standard_offset, 1050);
        assert_eq!(rules.recurring_rules.len(), 2);
        // 2025-07-01T00:00Z
        assert_eq!(rules.offset_at(1_751_328_000), 7200);
        // 2025-01-15T00:00Z
        assert_eq!(rules.offset_at(1_736_899_200), 3600);
        // 1890-01-01T00:00Z used BMT
        assert_eq!(rules.offset_at(-2_524_521_600), 1050);
        // 1900-01-01T00:00Z used WET
        assert_eq!(rules.offset_at(-2_208_988_800), 0);
        // 1977-04-03T01:00Z started summer time
        let start = rules.next_transition(228_700_000).unwrap();
        assert_eq!(start.epoch_seconds, 228_877_200);
        assert_eq!(start.offset_after, 7200);
        for pair in rules.wall_transitions.windows(2) {
            assert!(pair[0].epoch_seconds < pair[1].epoch_seconds);
        }
    }

    #[test]
    fn link_resolution() {
        let compiler = compiler();
        assert_eq!(
            compiler.resolve_zone_id("Europe/Amsterdam"),
            Ok("Europe/Brussels")
        );
        assert_eq!(
            compiler.resolve_zone_id("Europe/Netherlands"),
            Ok("Europe/Brussels")
        );
        assert_eq!(
            compiler.resolve_zone_id("Europe/Holland"),
            Err(ZoneRulesError::UnresolvedLink {
                alias: "Europe/Holland".to_owned(),
                target: "Europe/Netherlands".to_owned(),
            })
        );
        assert_eq!(
            compiler.resolve_zone_id("Mars/Olympus"),
            Err(ZoneRulesError::UnknownZone("Mars/Olympus".to_owned()))
        );
    }

    #[test]
    fn undefined_rule_set() {
        assert_eq!(
            compiler().build_zone("Broken"),
            Err(ZoneRulesError::UndefinedRuleSet("Nope".to_owned()))
        );
        let err = compiler().build("test").unwrap_err();
        assert!(matches!(err, ZoneInfoError::Rules { .. }));
    }

    #[test]
    fn collection_excludes_utc() {
        let mut data = ZoneInfoData::from_zoneinfo_file(SOURCE).unwrap();
        data.zones.remove("Broken");
        data.links.remove("Europe/Holland");
        let collection = ZoneInfoCompiler::new(data).build("2025b").unwrap();
        assert_eq!(collection.version, "2025b");
        assert_eq!(
            collection.provided_zone_ids(),
            ["Etc/UTC", "Europe/Amsterdam", "Europe/Brussels", "Europe/Netherlands"]
        );
        assert_eq!(
            collection.get("Europe/Netherlands"),
            collection.rules.get("Europe/Brussels")
        );
        assert!(collection.get("UTC").is_none());
    }
}
