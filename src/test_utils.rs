//! Shared helpers for unit tests.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use crate::config::{
    Strategy,
    StrategyConfig,
};
use crate::store::Schema;
use crate::types::Locale;

/// A fixed schema for configuration and sync tests.
pub(crate) struct TestSchema {
    /// Model name reported to callers.
    name: String,
    /// Declared physical fields; `None` accepts any field.
    fields: Option<HashSet<String>>,
    /// Whether structured values are supported.
    structured: bool,
}

impl TestSchema {
    /// A schema backed by a structured store (any field, arrays supported).
    pub(crate) fn structured(name: &str) -> Self {
        Self { name: name.to_string(), fields: None, structured: true }
    }

    /// A flat schema declaring exactly the given fields.
    pub(crate) fn flat(name: &str, fields: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields: Some(fields.iter().map(ToString::to_string).collect()),
            structured: false,
        }
    }
}

impl Schema for TestSchema {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn key_field(&self) -> &str {
        "id"
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.as_ref().is_none_or(|fields| fields.contains(field))
    }

    fn supports_structured(&self) -> bool {
        self.structured
    }
}

/// The configuration most unit tests run against: fields `name`/`profile`,
/// locales `en`/`it`/`ja`, canonical `ja`.
pub(crate) fn artist_config(strategy: Strategy) -> StrategyConfig {
    StrategyConfig {
        model: "artists".to_string(),
        locale: Locale::new("ja"),
        locales: vec![Locale::new("en"), Locale::new("it"), Locale::new("ja")],
        fields: vec!["name".to_string(), "profile".to_string()],
        strategy,
        separator: "_".to_string(),
    }
}
