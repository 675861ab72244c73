//! Lifecycle orchestration around a wrapped store.
//!
//! [`Translatable`] wraps the four persistence operations — create, save,
//! find, validate — with the synchronization, rewriting and relaxation steps,
//! delegating to the underlying [`Store`] exactly once per call (including
//! the pass-through fast paths). Everything here is synchronous and purely
//! transformational; see [`crate::store`] for the one documented consistency
//! gap on the save path.

use std::collections::BTreeMap;

use serde_json::{
    Map,
    Value,
};

use crate::config::{
    LocaleProvider,
    StrategyConfig,
    TranslatableConfig,
};
use crate::error::Error;
use crate::query;
use crate::record::Record;
use crate::store::{
    Conditions,
    Store,
};
use crate::sync;
use crate::types::{
    Locale,
    is_empty_value,
};
use crate::validation::{
    self,
    RuleSet,
    ValidationFailure,
};

/// How a find call treats translations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Translate {
    /// Build the full translation map on every result (default).
    #[default]
    All,
    /// Skip translation processing entirely; results are raw physical
    /// records with no map attached.
    Off,
    /// Collapse each result to a single locale: canonical fields take that
    /// locale's values and the map is dropped.
    To(Locale),
}

/// Options for [`Translatable::find`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Filter conditions, rewritten before reaching the store.
    pub conditions: Conditions,
    /// Translation handling for the results.
    pub translate: Translate,
    /// Locale context for bare-field conditions.
    pub locale: Option<Locale>,
}

impl FindOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one equality condition.
    #[must_use]
    pub fn condition(mut self, key: impl Into<String>, value: Value) -> Self {
        self.conditions.insert(key.into(), value);
        self
    }

    /// Sets the translation handling.
    #[must_use]
    pub fn translate(mut self, translate: Translate) -> Self {
        self.translate = translate;
        self
    }

    /// Sets the locale context for bare-field conditions.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// A store wrapped with locale-aware field synchronization.
#[derive(Debug)]
pub struct Translatable<S> {
    /// Resolved configuration, fixed at setup.
    config: StrategyConfig,
    /// The wrapped persistence layer.
    store: S,
}

impl<S: Store> Translatable<S> {
    /// Wraps a store, resolving the partial configuration against the
    /// ambient locale provider and the store's schema.
    ///
    /// Configuration errors — including a missing composed backing field
    /// under the inline strategy — are raised here, before any record is
    /// processed.
    pub fn new(
        store: S,
        config: TranslatableConfig,
        provider: &dyn LocaleProvider,
    ) -> Result<Self, Error> {
        let config = StrategyConfig::resolve(config, provider, &store)?;
        Ok(Self { config, store })
    }

    /// Wraps a store with an already-resolved configuration.
    #[must_use]
    pub const fn with_config(store: S, config: StrategyConfig) -> Self {
        Self { config, store }
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// The wrapped store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Builds a new, unpersisted record from raw input.
    ///
    /// Input may carry locale-prefixed pseudo-fields (`"ja.name"`) and a
    /// `locale` marker. The returned record has a full translation map: an
    /// entry (possibly null) for every configured field and locale.
    pub fn create(&self, data: Map<String, Value>) -> Result<Record, Error> {
        tracing::debug!(model = %self.config.model, "create");
        let mut record = Record::from_values(data);
        sync::absorb_prefixed_input(&mut record, &self.config)?;
        sync::sync_from_map(&mut record, &self.config);
        sync::sync_to_map(&mut record, &self.config);
        sync::augment_self(&mut record, &self.config);
        Ok(record)
    }

    /// Saves a record, merging any pending field assignments first.
    ///
    /// Records without translations pass straight through. Otherwise the
    /// translation map is synced, checked against the configured field set,
    /// merged against the persisted original where the strategy requires it,
    /// thinned, and laid out physically before the store's save runs.
    pub fn save(
        &mut self,
        record: &mut Record,
        data: Option<Map<String, Value>>,
    ) -> Result<(), Error> {
        tracing::debug!(model = %self.config.model, exists = record.exists(), "save");
        if let Some(data) = data {
            record.merge(data);
        }
        sync::absorb_prefixed_input(record, &self.config)?;

        if record.i18n().is_empty() {
            return self.store.save(record);
        }
        sync::sync_from_map(record, &self.config);
        self.check_known_fields(record)?;

        if record.exists() && self.config.strategy.merges_on_write() {
            self.merge_persisted(record)?;
        }
        sync::thin(record, &self.config);
        sync::layout_physical(record, &self.config);
        self.store.save(record)
    }

    /// Fetches the currently persisted record and augments the one being
    /// saved with translations it would otherwise drop.
    ///
    /// The raw store lookup bypasses all locale-aware formatting by
    /// construction, so nothing here can recurse. The fetch and the later
    /// save are not atomic; see [`crate::store::Store`].
    fn merge_persisted(&self, record: &mut Record) -> Result<(), Error> {
        let key = self.store.key_field();
        let Some(id) = record.get(key).cloned() else {
            tracing::warn!(
                model = %self.config.model,
                "existing record has no primary key; skipping merge-on-write"
            );
            return Ok(());
        };
        let conditions = Conditions::from([(key.to_string(), id)]);
        let Some(mut original) = self.store.find(&conditions)?.into_iter().next() else {
            return Ok(());
        };
        sync::sync_to_map(&mut original, &self.config);
        let authoritative = original.take_i18n();
        sync::augment_missing(&authoritative, record, &self.config);
        Ok(())
    }

    /// Finds records, rewriting translated-field conditions and formatting
    /// each result.
    ///
    /// Results are processed sequentially so error propagation stays
    /// deterministic.
    pub fn find(&self, options: &FindOptions) -> Result<Vec<Record>, Error> {
        if options.translate == Translate::Off {
            tracing::debug!(model = %self.config.model, "find (translation disabled)");
            return self.store.find(&options.conditions);
        }
        let conditions =
            query::rewrite(&options.conditions, options.locale.as_ref(), &self.config)?;
        let mut records = self.store.find(&conditions)?;

        for record in &mut records {
            sync::sync_to_map(record, &self.config);
            sync::augment_self(record, &self.config);
        }
        if let Translate::To(locale) = &options.translate {
            if !self.config.has_locale(locale.as_str()) {
                return Err(Error::UnavailableLocale {
                    model: self.config.model.clone(),
                    locale: locale.clone(),
                });
            }
            for record in &mut records {
                sync::collapse(record, locale, &self.config);
            }
        }
        Ok(records)
    }

    /// Finds the first matching record.
    pub fn find_first(&self, options: &FindOptions) -> Result<Option<Record>, Error> {
        Ok(self.find(options)?.into_iter().next())
    }

    /// Validates a record against its rule set, relaxing locale variants.
    ///
    /// A working copy is synced and validated; the caller's record is left
    /// untouched, and the failures are returned as the single source of
    /// error state.
    pub fn validates(
        &self,
        record: &Record,
        rules: &RuleSet,
    ) -> Result<Vec<ValidationFailure>, Error> {
        if record.i18n().is_empty() {
            return Ok(self.store.validate(record, rules));
        }
        let mut working = record.clone();
        sync::sync_from_map(&mut working, &self.config);
        self.check_known_fields(&working)?;
        let relaxed = validation::relax(rules, &self.config);
        Ok(self.store.validate(&working, &relaxed))
    }

    /// The full per-locale view of one field, including the canonical value.
    pub fn translations(
        &self,
        record: &Record,
        field: &str,
    ) -> Result<BTreeMap<Locale, Value>, Error> {
        self.check_field(field)?;
        let mut view = record.i18n().field(field).cloned().unwrap_or_default();
        view.insert(
            self.config.locale.clone(),
            record.get(field).cloned().unwrap_or(Value::Null),
        );
        Ok(view)
    }

    /// One locale's value for a field.
    ///
    /// Map entries win over the bare field; when the canonical locale's
    /// entry is absent, the bare canonical field is the fallback. Other
    /// locales without an entry read as `None`.
    pub fn translation(
        &self,
        record: &Record,
        field: &str,
        locale: &Locale,
    ) -> Result<Option<Value>, Error> {
        self.check_field(field)?;
        self.check_locale(locale)?;
        if let Some(value) = record.i18n().get(field, locale).filter(|v| !v.is_null()) {
            return Ok(Some(value.clone()));
        }
        if self.config.is_canonical(locale) {
            return Ok(record.get(field).filter(|v| !v.is_null()).cloned());
        }
        Ok(None)
    }

    /// Sets one locale's value for a field and re-syncs the record.
    pub fn set_translation(
        &self,
        record: &mut Record,
        field: &str,
        locale: &Locale,
        value: Value,
    ) -> Result<(), Error> {
        self.check_field(field)?;
        self.check_locale(locale)?;
        record.i18n_mut().set(field.to_string(), locale.clone(), value);
        sync::sync_from_map(record, &self.config);
        Ok(())
    }

    /// True if any non-empty translation exists for the field.
    pub fn is_translated(&self, record: &Record, field: &str) -> Result<bool, Error> {
        self.check_field(field)?;
        Ok(record
            .i18n()
            .field(field)
            .is_some_and(|locales| locales.values().any(|v| !is_empty_value(v))))
    }

    /// Rejects map fields outside the configured set.
    fn check_known_fields(&self, record: &Record) -> Result<(), Error> {
        for field in record.i18n().fields() {
            if !self.config.has_field(field) {
                return Err(Error::UnknownTranslatedField { field: field.to_string() });
            }
        }
        Ok(())
    }

    /// Rejects fields not configured for translation.
    fn check_field(&self, field: &str) -> Result<(), Error> {
        if self.config.has_field(field) {
            return Ok(());
        }
        Err(Error::UnavailableField {
            model: self.config.model.clone(),
            field: field.to_string(),
        })
    }

    /// Rejects locales outside the configured set.
    fn check_locale(&self, locale: &Locale) -> Result<(), Error> {
        if self.config.has_locale(locale.as_str()) {
            return Ok(());
        }
        Err(Error::UnavailableLocale {
            model: self.config.model.clone(),
            locale: locale.clone(),
        })
    }
}
