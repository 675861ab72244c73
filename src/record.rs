//! The in-memory record unit the lifecycle hooks operate on.
//!
//! Records are owned by the persistence layer; this type is the narrow view
//! the core needs: get/set fields by name, a persisted-vs-new flag, and one
//! reserved structural slot holding the working [`TranslationMap`]. The
//! translation map is request-scoped — rebuilt on every read and collapsed
//! back to physical shape before every write by [`crate::sync`].

use serde_json::{
    Map,
    Value,
};

use crate::types::{
    Locale,
    TranslationMap,
};

/// A single data record with its working translation map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Physical field values, keyed by field name.
    values: Map<String, Value>,
    /// Working translation map (never persisted in this exact shape for the
    /// inline and sub-record strategies).
    i18n: TranslationMap,
    /// Whether the record is already persisted.
    exists: bool,
    /// Locale whose sub-record currently backs the canonical fields
    /// (sub-record-list strategy only).
    validation_locale: Option<Locale>,
}

impl Record {
    /// Creates an empty, not-yet-persisted record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from raw physical values.
    #[must_use]
    pub fn from_values(values: Map<String, Value>) -> Self {
        Self { values, ..Self::default() }
    }

    /// Reads a field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Sets a field by name.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Removes a field, returning its value.
    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// True if the field is present (possibly null).
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// The raw physical values.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Merges pending field assignments into the record, last writer wins.
    pub fn merge(&mut self, data: Map<String, Value>) {
        for (field, value) in data {
            self.values.insert(field, value);
        }
    }

    /// Whether the record is already persisted.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Marks the record as persisted (or not).
    pub const fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
    }

    /// The working translation map.
    #[must_use]
    pub const fn i18n(&self) -> &TranslationMap {
        &self.i18n
    }

    /// Mutable access to the working translation map.
    pub const fn i18n_mut(&mut self) -> &mut TranslationMap {
        &mut self.i18n
    }

    /// Replaces the working translation map.
    pub fn set_i18n(&mut self, map: TranslationMap) {
        self.i18n = map;
    }

    /// Takes the working translation map, leaving an empty one.
    pub fn take_i18n(&mut self) -> TranslationMap {
        std::mem::take(&mut self.i18n)
    }

    /// The validation-locale marker, if any.
    #[must_use]
    pub const fn validation_locale(&self) -> Option<&Locale> {
        self.validation_locale.as_ref()
    }

    /// Sets or clears the validation-locale marker.
    pub fn set_validation_locale(&mut self, locale: Option<Locale>) {
        self.validation_locale = locale;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn merge_overwrites_existing_fields() {
        let mut record = Record::new();
        record.set("name", json!("Richard"));
        record.set("profile", json!("Dreaded Rasta"));

        let mut data = Map::new();
        data.insert("name".to_string(), json!("Ricardo"));
        record.merge(data);

        assert_that!(record.get("name"), some(eq(&json!("Ricardo"))));
        assert_that!(record.get("profile"), some(eq(&json!("Dreaded Rasta"))));
    }

    #[rstest]
    fn take_i18n_leaves_empty_map() {
        let mut record = Record::new();
        record.i18n_mut().set("name", Locale::new("en"), json!("Richard"));

        let taken = record.take_i18n();

        assert_that!(taken.is_empty(), eq(false));
        assert_that!(record.i18n().is_empty(), eq(true));
    }
}
