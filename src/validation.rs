//! Validation-rule relaxation.
//!
//! Translations are sparse by design: only the canonical locale's data must
//! satisfy mandatory constraints. Before a validation pass, the record's own
//! rule set is expanded so each locale variant field is covered too, with the
//! `required` constraint stripped for non-canonical locales. The relaxed set
//! is a derived copy, used once and discarded — the input is never mutated.

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};
use std::collections::BTreeMap;

use crate::config::StrategyConfig;
use crate::mapper;

/// One validation rule descriptor, as understood by the store's rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule name (e.g. `"notEmpty"`, `"lengthBetween"`).
    pub name: String,
    /// Message reported when the rule fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the field must be present for this rule to apply. Defaults
    /// to true, matching the rule engine's behavior.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Any further rule parameters (e.g. `min`/`max`).
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Serde default for [`Rule::required`].
const fn default_required() -> bool {
    true
}

impl Rule {
    /// Creates a required rule with no extra options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), message: None, required: true, options: Map::new() }
    }

    /// Sets the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a rule parameter.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Ordered rule descriptors keyed by field (or locale-variant field) name.
pub type RuleSet = BTreeMap<String, Vec<Rule>>;

/// A single rule failure reported by the store's rule engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The field (or locale-variant field) that failed.
    pub field: String,
    /// The rule that failed.
    pub rule: String,
    /// The failure message, when the rule carries one.
    pub message: Option<String>,
}

/// Expands a rule set to cover each locale variant field and strips the
/// mandatory constraint from every locale-qualified entry.
///
/// For each configured field with rules and each non-canonical locale, a
/// dotted locale-qualified entry (`i18n.<field>.<locale>`) is synthesized
/// from the canonical rules unless one already exists — explicit per-locale
/// rules win. The canonical field's own rules are left untouched.
#[must_use]
pub fn relax(rules: &RuleSet, config: &StrategyConfig) -> RuleSet {
    let mut relaxed = rules.clone();

    for field in &config.fields {
        let Some(base) = rules.get(field) else {
            continue;
        };
        for locale in config.other_locales() {
            let qualified = mapper::compose_key(field, locale, mapper::DOTTED_SEPARATOR);
            relaxed.entry(qualified).or_insert_with(|| base.clone());
        }
    }

    for (field, entries) in &mut relaxed {
        if mapper::decompose_key(field, mapper::DOTTED_SEPARATOR).is_none() {
            continue;
        }
        for rule in entries {
            rule.required = false;
        }
    }

    relaxed
}
