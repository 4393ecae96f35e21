//! The insertion ordered store of parsed field values.

use core::hash::BuildHasherDefault;

use alloc::format;
use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::{fields::Field, TemporalError, TemporalResult};

/// Parsed field values in the order they were first set.
///
/// A field is present at most once. Replacing a value keeps the position
/// of the field, removing a field shifts the later fields down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: IndexMap<Field, i64, BuildHasherDefault<FxHasher>>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: impl Into<Field>) -> Option<i64> {
        self.values.get(&field.into()).copied()
    }

    pub fn contains(&self, field: impl Into<Field>) -> bool {
        self.values.contains_key(&field.into())
    }

    /// Sets a value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<Field>, value: i64) -> Option<i64> {
        self.values.insert(field.into(), value)
    }

    /// Sets a value, failing if a different value is already present.
    pub fn insert_checked(&mut self, field: impl Into<Field>, value: i64) -> TemporalResult<()> {
        let field = field.into();
        match self.values.insert(field, value) {
            Some(old) if old != value => Err(TemporalError::general(format!(
                "Conflict found: {field} {old} differs from {field} {value}"
            ))),
            _ => Ok(()),
        }
    }

    pub fn remove(&mut self, field: impl Into<Field>) -> Option<i64> {
        self.values.shift_remove(&field.into())
    }

    pub fn retain(&mut self, mut keep: impl FnMut(Field, i64) -> bool) {
        self.values.retain(|field, value| keep(*field, *value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, i64)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl FromIterator<(Field, i64)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (Field, i64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
