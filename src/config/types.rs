//! Configuration types and resolution.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::mapper;
use crate::store::Schema;
use crate::types::Locale;

use super::provider::LocaleProvider;

/// A single problem found while validating a partial configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("configuration error in '{field_path}': {message}")]
pub struct ConfigIssue {
    /// Path to the offending setting (e.g. `"fields[0]"`).
    pub field_path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ConfigIssue {
    /// Creates an issue for a setting path.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Setup-time configuration failure. Not recoverable within this crate:
/// setup must abort.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings failed validation.
    #[error("configuration validation failed:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    /// The inline strategy requires a composed sibling field that the
    /// backing schema does not declare. Detected eagerly, once, at setup.
    #[error("model `{model}` is missing translation field `{key}` backing `{field}` in locale `{locale}`")]
    MissingBackingField {
        /// Model whose schema was checked.
        model: String,
        /// The logical translatable field.
        field: String,
        /// The locale lacking a backing field.
        locale: Locale,
        /// The composed physical key that was expected.
        key: String,
    },
}

/// Formats validation issues as a numbered list.
fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(i, issue)| format!("  {}. {} - {}", i + 1, issue.field_path, issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// How translated values are physically laid out by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Each `(field, locale)` pair is a distinct sibling field named by the
    /// composed-key rule; the canonical locale uses the bare field name.
    Inline,
    /// The translation map is stored as one structured value, with the
    /// canonical field holding a denormalized copy of the canonical value.
    Nested,
    /// One full locale-tagged sub-record per locale in a list, plus a
    /// `validationLocale` marker on the host record.
    SubRecords,
}

impl Strategy {
    /// Whether a save of an existing record must merge against the persisted
    /// original first. The nested and sub-record layouts replace the whole
    /// structured value on write, so a partial update would otherwise erase
    /// sibling locales.
    #[must_use]
    pub const fn merges_on_write(self) -> bool {
        matches!(self, Self::Nested | Self::SubRecords)
    }
}

/// Partial, caller-supplied configuration. Every setting is optional;
/// [`StrategyConfig::resolve`] fills the gaps from the ambient locale
/// provider and the backing schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatableConfig {
    /// Canonical locale. Defaults to the provider's current locale.
    pub locale: Option<Locale>,
    /// Full locale set. Defaults to the provider's locale catalog.
    pub locales: Vec<Locale>,
    /// Field names eligible for per-locale variants.
    pub fields: Vec<String>,
    /// Storage strategy. Defaults to nested when the store supports
    /// structured values, inline otherwise.
    pub strategy: Option<Strategy>,
    /// Separator for composed physical keys. Defaults to `"_"`.
    pub separator: Option<String>,
}

/// Resolved, validated configuration. Pure data, fixed for the lifetime of
/// the wrapping model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Model name, carried for error messages.
    pub model: String,
    /// The canonical locale: where plain field reads and writes land.
    pub locale: Locale,
    /// All configured locales, canonical included.
    pub locales: Vec<Locale>,
    /// The translatable fields.
    pub fields: Vec<String>,
    /// The storage strategy in effect.
    pub strategy: Strategy,
    /// Separator for composed physical keys.
    pub separator: String,
}

impl StrategyConfig {
    /// Resolves a partial configuration against the ambient locale provider
    /// and the backing schema.
    ///
    /// For the inline strategy this eagerly verifies that every composed
    /// `(field, locale)` key exists on the schema for every non-canonical
    /// locale, so a missing backing field fails once at setup rather than
    /// per record.
    pub fn resolve(
        raw: TranslatableConfig,
        provider: &dyn LocaleProvider,
        schema: &dyn Schema,
    ) -> Result<Self, ConfigError> {
        let locale = raw.locale.unwrap_or_else(|| provider.current_locale());
        let locales =
            if raw.locales.is_empty() { provider.locale_catalog() } else { raw.locales };
        let strategy = raw.strategy.unwrap_or_else(|| {
            if schema.supports_structured() { Strategy::Nested } else { Strategy::Inline }
        });
        let separator = raw.separator.unwrap_or_else(|| mapper::DEFAULT_SEPARATOR.to_string());

        let mut issues = Vec::new();

        if separator.is_empty() {
            issues.push(ConfigIssue::new(
                "separator",
                "The separator cannot be empty. Please specify a separator, for example: \"_\"",
            ));
        }
        if locales.is_empty() {
            issues.push(ConfigIssue::new(
                "locales",
                "At least one locale is required. Example: [\"en\", \"ja\"]",
            ));
        } else if !locales.contains(&locale) {
            issues.push(ConfigIssue::new(
                "locale",
                format!("Canonical locale '{locale}' is not part of the configured locale set"),
            ));
        }
        if raw.fields.is_empty() {
            issues.push(ConfigIssue::new(
                "fields",
                "At least one translatable field is required. Example: [\"name\"]",
            ));
        }
        for (index, field) in raw.fields.iter().enumerate() {
            // Collision freedom: a field named like a composed key would make
            // decomposition ambiguous.
            if !separator.is_empty() && mapper::decompose_key(field, &separator).is_some() {
                issues.push(ConfigIssue::new(
                    format!("fields[{index}]"),
                    format!("Field name '{field}' matches the composed translation key pattern"),
                ));
            }
        }

        if !issues.is_empty() {
            return Err(ConfigError::Invalid(issues));
        }

        if strategy == Strategy::Inline {
            for field in &raw.fields {
                for backing in locales.iter().filter(|l| **l != locale) {
                    let key = mapper::compose_key(field, backing, &separator);
                    if !schema.has_field(&key) {
                        return Err(ConfigError::MissingBackingField {
                            model: schema.model_name().to_string(),
                            field: field.clone(),
                            locale: backing.clone(),
                            key,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            model = schema.model_name(),
            canonical = %locale,
            ?strategy,
            "resolved translatable configuration"
        );

        Ok(Self {
            model: schema.model_name().to_string(),
            locale,
            locales,
            fields: raw.fields,
            strategy,
            separator,
        })
    }

    /// True if the locale is the canonical one.
    #[must_use]
    pub fn is_canonical(&self, locale: &Locale) -> bool {
        self.locale == *locale
    }

    /// True if the locale belongs to the configured set.
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l.as_str() == locale)
    }

    /// True if the field is configured for translation.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// The configured locales other than the canonical one.
    pub fn other_locales(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter().filter(|l| **l != self.locale)
    }

    /// The composed physical sibling key for a `(field, locale)` pair.
    #[must_use]
    pub fn composed(&self, field: &str, locale: &Locale) -> String {
        mapper::compose_key(field, locale, &self.separator)
    }
}
