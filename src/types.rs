//! Core types used throughout the crate.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// A locale identifier (short code, e.g. `"en"`, `"ja"`, `"pt-BR"`).
///
/// One locale of a configuration is the *canonical* locale: the one whose
/// values live in a record's bare, unqualified fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale from a code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The locale code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Whether a value counts as "not there" for translation purposes.
///
/// Null and the empty string are treated alike: an augmenting merge may
/// overwrite them, and they never count as an existing translation.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Sparse per-field, per-locale value table logically attached to a record.
///
/// Only the canonical locale's value is ever required; other locales may be
/// absent entirely. [`crate::sync`] keeps the map and the record's canonical
/// fields consistent at well-defined lifecycle points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    entries: BTreeMap<String, BTreeMap<Locale, Value>>,
}

impl TranslationMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no field has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fields currently present in the map.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The per-locale entries for one field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&BTreeMap<Locale, Value>> {
        self.entries.get(field)
    }

    /// Looks up a single entry.
    #[must_use]
    pub fn get(&self, field: &str, locale: &Locale) -> Option<&Value> {
        self.entries.get(field).and_then(|locales| locales.get(locale))
    }

    /// Inserts or replaces an entry.
    pub fn set(&mut self, field: impl Into<String>, locale: Locale, value: Value) {
        self.entries.entry(field.into()).or_default().insert(locale, value);
    }

    /// Removes a single entry, returning its value.
    pub fn remove(&mut self, field: &str, locale: &Locale) -> Option<Value> {
        self.entries.get_mut(field).and_then(|locales| locales.remove(locale))
    }

    /// Removes a field and all of its entries.
    pub fn remove_field(&mut self, field: &str) -> Option<BTreeMap<Locale, Value>> {
        self.entries.remove(field)
    }

    /// True if the field exists but has no entries left.
    #[must_use]
    pub fn field_is_empty(&self, field: &str) -> bool {
        self.entries.get(field).is_some_and(BTreeMap::is_empty)
    }

    /// Iterates over all `(field, locale, value)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Locale, &Value)> {
        self.entries.iter().flat_map(|(field, locales)| {
            locales.iter().map(move |(locale, value)| (field.as_str(), locale, value))
        })
    }

    /// Serializes the map into a JSON object of objects, the shape the
    /// nested storage strategy persists in the structural slot.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut fields = serde_json::Map::new();
        for (field, locales) in &self.entries {
            let mut inner = serde_json::Map::new();
            for (locale, value) in locales {
                inner.insert(locale.as_str().to_string(), value.clone());
            }
            fields.insert(field.clone(), Value::Object(inner));
        }
        Value::Object(fields)
    }

    /// Parses the JSON-object shape back into a map.
    ///
    /// Non-object input (or non-object field entries) is ignored rather than
    /// failing: a malformed structural slot degrades to an empty map.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut map = Self::new();
        let Value::Object(fields) = value else {
            return map;
        };
        for (field, locales) in fields {
            let Value::Object(locales) = locales else {
                continue;
            };
            for (locale, entry) in locales {
                map.set(field.clone(), Locale::new(locale.clone()), entry.clone());
            }
        }
        map
    }
}
