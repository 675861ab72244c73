//! The two-directional synchronizer between a record's canonical fields and
//! its translation map.
//!
//! The map and the canonical fields are never aliased: these are explicit,
//! idempotent, directional copy functions invoked at well-defined lifecycle
//! points. Write path: [`absorb_prefixed_input`] → [`sync_from_map`] →
//! validation → [`augment_missing`] against the persisted original →
//! [`thin`] → [`layout_physical`]. Read path: [`sync_to_map`] →
//! [`augment_self`] → optional [`collapse`].

use serde_json::Value;

use crate::config::{
    Strategy,
    StrategyConfig,
};
use crate::error::Error;
use crate::mapper;
use crate::record::Record;
use crate::types::{
    Locale,
    TranslationMap,
    is_empty_value,
};

/// Moves locale-prefixed pseudo-fields (`"ja.name"` style input) into the
/// translation map, and honors a `locale` pseudo-field marking which locale
/// the bare fields carry.
///
/// When the marker names a non-canonical locale, the bare values are moved
/// under that locale rather than mirrored into the canonical fields. The
/// marker also becomes the record's validation locale.
pub fn absorb_prefixed_input(record: &mut Record, config: &StrategyConfig) -> Result<(), Error> {
    let marker_code = record
        .get(mapper::LOCALE_TAG)
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let marker = if let Some(code) = marker_code {
        if !config.has_locale(&code) {
            return Err(Error::UnavailableLocale {
                model: config.model.clone(),
                locale: Locale::new(code),
            });
        }
        record.unset(mapper::LOCALE_TAG);
        Some(Locale::new(code))
    } else {
        None
    };

    let prefixed: Vec<(String, String, Locale)> = record
        .values()
        .keys()
        .filter_map(|key| {
            let (head, rest) = key.split_once('.')?;
            (config.has_locale(head) && config.has_field(rest))
                .then(|| (key.clone(), rest.to_string(), Locale::new(head)))
        })
        .collect();
    for (key, field, locale) in prefixed {
        if let Some(value) = record.unset(&key) {
            record.i18n_mut().set(field, locale, value);
        }
    }

    if let Some(marker) = marker {
        for field in &config.fields {
            let Some(value) = record.get(field).filter(|v| !is_empty_value(v)).cloned() else {
                continue;
            };
            record.i18n_mut().set(field.clone(), marker.clone(), value);
            if !config.is_canonical(&marker) {
                record.unset(field);
            }
        }
        record.set_validation_locale(Some(marker));
    }
    Ok(())
}

/// Builds the translation map from the record's physical shape.
///
/// Canonical-locale entries come from the bare canonical fields; the other
/// locales come from composed sibling fields (inline, which are removed from
/// the record view), the structural slot (nested), or the locale-tagged
/// sub-record list. Entries already present in the working map are kept —
/// in-memory edits win over the physical shape.
pub fn sync_to_map(record: &mut Record, config: &StrategyConfig) {
    match config.strategy {
        Strategy::Nested => {
            if let Some(slot) = record.unset(mapper::NAMESPACE) {
                let parsed = TranslationMap::from_value(&slot);
                for (field, locale, value) in parsed.iter() {
                    if record.i18n().get(field, locale).is_none() {
                        record.i18n_mut().set(field.to_string(), locale.clone(), value.clone());
                    }
                }
            }
        }
        Strategy::SubRecords => absorb_sub_records(record, config),
        Strategy::Inline => {}
    }

    for field in &config.fields {
        for locale in &config.locales {
            if config.is_canonical(locale) {
                if let Some(value) = record.get(field).cloned() {
                    record.i18n_mut().set(field.clone(), locale.clone(), value);
                }
            } else if config.strategy == Strategy::Inline
                && let Some(value) = record.unset(&config.composed(field, locale))
            {
                record.i18n_mut().set(field.clone(), locale.clone(), value);
            }
        }
    }
}

/// Pulls the sub-record list and validation-locale marker out of the
/// record's physical values and into the working map.
fn absorb_sub_records(record: &mut Record, config: &StrategyConfig) {
    if let Some(marker) = record.get(mapper::VALIDATION_LOCALE).and_then(Value::as_str) {
        let marker = Locale::new(marker);
        record.set_validation_locale(Some(marker));
        record.unset(mapper::VALIDATION_LOCALE);
    }
    let Some(Value::Array(subs)) = record.unset(mapper::SUB_RECORD_SLOT) else {
        return;
    };
    for sub in subs {
        let Value::Object(sub) = sub else {
            tracing::warn!(model = %config.model, "skipping malformed localization sub-record");
            continue;
        };
        let Some(locale) = sub.get(mapper::LOCALE_TAG).and_then(Value::as_str) else {
            tracing::warn!(model = %config.model, "skipping untagged localization sub-record");
            continue;
        };
        if !config.has_locale(locale) {
            continue;
        }
        let locale = Locale::new(locale);
        for field in &config.fields {
            if let Some(value) = sub.get(field)
                && record.i18n().get(field, &locale).is_none()
            {
                record.i18n_mut().set(field.clone(), locale.clone(), value.clone());
            }
        }
    }
}

/// Reflects the translation map back onto the record's fields.
///
/// The canonical field takes the map's canonical-locale entry; a non-empty
/// canonical field value is mirrored into the map in turn. Under the inline
/// strategy, non-canonical entries are also written to their composed
/// sibling fields so the record is consistent before validation.
pub fn sync_from_map(record: &mut Record, config: &StrategyConfig) {
    for field in &config.fields {
        let canonical = record
            .i18n()
            .get(field, &config.locale)
            .filter(|v| !v.is_null())
            .cloned();
        if let Some(value) = canonical {
            record.set(field.clone(), value);
        }
    }
    for field in &config.fields {
        let Some(value) = record.get(field).filter(|v| !is_empty_value(v)).cloned() else {
            continue;
        };
        record.i18n_mut().set(field.clone(), config.locale.clone(), value);
    }

    if config.strategy == Strategy::Inline {
        let mut siblings = Vec::new();
        for field in &config.fields {
            for locale in config.other_locales() {
                if let Some(value) = record.i18n().get(field, locale).filter(|v| !v.is_null()) {
                    siblings.push((config.composed(field, locale), value.clone()));
                }
            }
        }
        for (key, value) in siblings {
            record.set(key, value);
        }
    }
}

/// Fills every `(field, locale)` entry missing (or empty) in the record's
/// map from the authoritative map, or with null when the authoritative map
/// has nothing either.
///
/// This is the data-loss guard: a partial update that touches one locale
/// must not erase siblings already persisted. Call with the previously
/// persisted record's map as `authoritative`.
pub fn augment_missing(
    authoritative: &TranslationMap,
    record: &mut Record,
    config: &StrategyConfig,
) {
    for field in &config.fields {
        for locale in &config.locales {
            let present =
                record.i18n().get(field, locale).is_some_and(|v| !is_empty_value(v));
            if present {
                continue;
            }
            let value = authoritative
                .get(field, locale)
                .filter(|v| !is_empty_value(v))
                .cloned()
                .unwrap_or(Value::Null);
            record.i18n_mut().set(field.clone(), locale.clone(), value);
        }
    }
}

/// Augments a record against its own map, ensuring an entry (possibly null)
/// exists for every configured field and locale.
pub fn augment_self(record: &mut Record, config: &StrategyConfig) {
    let snapshot = record.i18n().clone();
    augment_missing(&snapshot, record, config);
}

/// Removes redundant canonical-locale entries from the map, promoting their
/// values into the canonical fields, and drops field keys whose locale map
/// became empty. Idempotent; the last step before physical layout on write.
pub fn thin(record: &mut Record, config: &StrategyConfig) {
    for field in &config.fields {
        if let Some(value) = record.i18n_mut().remove(field, &config.locale)
            && !value.is_null()
        {
            record.set(field.clone(), value);
        }
        if record.i18n().field_is_empty(field) {
            record.i18n_mut().remove_field(field);
        }
    }
}

/// Collapses a record to a single locale: canonical fields take that
/// locale's values (null when absent) and the map is discarded.
///
/// Callers must pass a record they own — typically a fresh read result —
/// never a shared or cached copy.
pub fn collapse(record: &mut Record, locale: &Locale, config: &StrategyConfig) {
    for field in &config.fields {
        let value = record.i18n().get(field, locale).cloned().unwrap_or(Value::Null);
        record.set(field.clone(), value);
    }
    record.set_i18n(TranslationMap::new());
}

/// Maps the (already thinned) translation map down to the strategy's
/// physical layout, emptying the working map.
pub fn layout_physical(record: &mut Record, config: &StrategyConfig) {
    match config.strategy {
        Strategy::Inline => {
            let map = record.take_i18n();
            for (field, locale, value) in map.iter() {
                if config.is_canonical(locale) || value.is_null() {
                    continue;
                }
                record.set(config.composed(field, locale), value.clone());
            }
        }
        Strategy::Nested => {
            let map = record.take_i18n();
            record.set(mapper::NAMESPACE, map.to_value());
        }
        Strategy::SubRecords => {
            let map = record.take_i18n();
            let mut subs = Vec::new();
            for locale in &config.locales {
                let mut sub = serde_json::Map::new();
                for field in &config.fields {
                    let value = if config.is_canonical(locale) {
                        record.get(field).cloned()
                    } else {
                        map.get(field, locale).cloned()
                    };
                    if let Some(value) = value.filter(|v| !is_empty_value(v)) {
                        sub.insert(field.clone(), value);
                    }
                }
                if sub.is_empty() {
                    continue;
                }
                sub.insert(
                    mapper::LOCALE_TAG.to_string(),
                    Value::String(locale.to_string()),
                );
                subs.push(Value::Object(sub));
            }
            record.set(mapper::SUB_RECORD_SLOT, Value::Array(subs));
            let marker =
                record.validation_locale().cloned().unwrap_or_else(|| config.locale.clone());
            record.set(mapper::VALIDATION_LOCALE, Value::String(marker.to_string()));
        }
    }
}
