//! Lazily populated caches shared by formatters.
//!
//! A cache value is computed outside of any lock and then published.
//! Two threads missing the same key both compute the value and the last
//! one to publish wins, every published value is complete.

use core::hash::{BuildHasherDefault, Hash};
use std::sync::{Arc, PoisonError, RwLock};

use icu_locale::Locale;
use rustc_hash::FxHasher;
use tinystr::TinyAsciiStr;

use crate::{
    format::{CompositePrinterParser, PrefixTree},
    provider::{FormatStyle, TextStyle},
    TemporalResult,
};

type FxHashMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A map of lazily computed values.
#[derive(Debug)]
pub struct LazyCache<K, V> {
    name: &'static str,
    values: RwLock<FxHashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash + Clone, V> LazyCache<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: RwLock::new(FxHashMap::default()),
        }
    }

    /// Returns the cached value, if any.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns the cached value or computes and publishes it.
    pub fn get_or_insert_with(
        &self,
        key: &K,
        compute: impl FnOnce() -> TemporalResult<V>,
    ) -> TemporalResult<Arc<V>> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = Arc::new(compute()?);
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.clone(), value.clone());
        #[cfg(feature = "log")]
        log::debug!("Cached {} entry, {} entries in total", self.name, values.len());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.values
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The key of a localized format: date style, time style, chronology id
/// and locale.
pub type LocalizedKey = (
    Option<FormatStyle>,
    Option<FormatStyle>,
    TinyAsciiStr<16>,
    Locale,
);

/// The key of a zone id tree: case sensitivity and the number of zone ids.
pub type ZoneIdKey = (bool, usize);

/// The key of a zone name tree: locale, style, case sensitivity and the
/// number of zone ids.
pub type ZoneNameKey = (Locale, TextStyle, bool, usize);

/// The caches of a [`FormatResources`][crate::format::FormatResources].
///
/// The zone trees are keyed by the number of zone ids, so a provider
/// that changes its ids without changing their number is not noticed.
#[derive(Debug)]
pub struct FormatCaches {
    pub localized: LazyCache<LocalizedKey, CompositePrinterParser>,
    pub zone_ids: LazyCache<ZoneIdKey, PrefixTree>,
    pub zone_names: LazyCache<ZoneNameKey, PrefixTree>,
}

impl FormatCaches {
    pub fn new() -> Self {
        Self {
            localized: LazyCache::new("localized format"),
            zone_ids: LazyCache::new("zone id tree"),
            zone_names: LazyCache::new("zone name tree"),
        }
    }

    pub fn clear(&mut self) {
        self.localized.clear();
        self.zone_ids.clear();
        self.zone_names.clear();
    }
}

impl Default for FormatCaches {
    fn default() -> Self {
        Self::new()
    }
}
