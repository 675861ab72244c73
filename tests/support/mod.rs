//! An in-memory store for lifecycle tests.
#![allow(dead_code)]

use std::collections::HashSet;

use serde_json::Value;

use translatable::error::Error;
use translatable::mapper;
use translatable::record::Record;
use translatable::store::{
    Conditions,
    Schema,
    Store,
};
use translatable::types::{
    Locale,
    is_empty_value,
};
use translatable::validation::{
    RuleSet,
    ValidationFailure,
};

/// A store keeping raw physical records in a vector, with equality matching
/// on find conditions (including one level of dotted paths into structured
/// values and sub-record lists).
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    /// Declared physical fields; `None` means schemaless.
    fields: Option<HashSet<String>>,
    structured: bool,
    records: Vec<Record>,
    next_id: u64,
}

impl MemoryStore {
    /// A schemaless store with native structured-value support.
    pub fn structured(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: None,
            structured: true,
            records: Vec::new(),
            next_id: 0,
        }
    }

    /// A flat store declaring exactly the given physical fields.
    pub fn flat(name: &str, fields: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields: Some(fields.iter().map(ToString::to_string).collect()),
            structured: false,
            records: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of persisted records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Resolves a dotted path against a value. Arrays match when any element
/// matches the remaining path.
fn resolve_path<'a>(value: &'a Value, path: &str) -> Vec<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    match value {
        Value::Object(map) => map
            .get(head)
            .map(|inner| match rest {
                Some(rest) => resolve_path(inner, rest),
                None => vec![inner],
            })
            .unwrap_or_default(),
        Value::Array(items) => {
            items.iter().flat_map(|item| resolve_path(item, path)).collect()
        }
        _ => Vec::new(),
    }
}

/// Equality match for one condition against a raw record.
fn matches(record: &Record, key: &str, expected: &Value) -> bool {
    if let Some((head, rest)) = key.split_once('.') {
        let Some(root) = record.get(head) else {
            return false;
        };
        return resolve_path(root, rest).into_iter().any(|v| v == expected);
    }
    record.get(key) == Some(expected)
}

/// Looks up the value a (possibly locale-qualified) rule key refers to.
fn rule_target<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(field) {
        return Some(value);
    }
    let (name, code) = mapper::decompose_key(field, mapper::DOTTED_SEPARATOR)?;
    record.i18n().get(name, &Locale::new(code))
}

impl Schema for MemoryStore {
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

impl Store for MemoryStore {
    fn find(&self, conditions: &Conditions) -> Result<Vec<Record>, Error> {
        Ok(self
            .records
            .iter()
            .filter(|record| conditions.iter().all(|(key, value)| matches(record, key, value)))
            .cloned()
            .collect())
    }

    fn save(&mut self, record: &mut Record) -> Result<(), Error> {
        if record.exists() {
            let id = record.get("id").cloned();
            let Some(slot) = self.records.iter_mut().find(|r| r.get("id") == id.as_ref()) else {
                return Err(Error::Store("no persisted record with that key".to_string()));
            };
            *slot = record.clone();
            return Ok(());
        }
        self.next_id += 1;
        record.set("id", Value::from(self.next_id));
        record.set_exists(true);
        self.records.push(record.clone());
        Ok(())
    }

    fn validate(&self, record: &Record, rules: &RuleSet) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        for (field, entries) in rules {
            let target = rule_target(record, field);
            for rule in entries {
                let failed = match target {
                    None | Some(Value::Null) => rule.required,
                    Some(value) => match rule.name.as_str() {
                        "notEmpty" => is_empty_value(value),
                        "lengthBetween" => {
                            let len = value.as_str().map_or(0, |s| s.chars().count());
                            let len = u64::try_from(len).unwrap_or(u64::MAX);
                            let min = rule.options.get("min").and_then(Value::as_u64);
                            let max = rule.options.get("max").and_then(Value::as_u64);
                            min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max)
                        }
                        _ => false,
                    },
                };
                if failed {
                    failures.push(ValidationFailure {
                        field: field.clone(),
                        rule: rule.name.clone(),
                        message: rule.message.clone(),
                    });
                }
            }
        }
        failures
    }
}
