//! Query-condition rewriting.
//!
//! Callers filter by translated field without knowing the physical storage
//! layout; the rewriter maps their condition keys onto the keys the strategy
//! actually stores. Rewriting is limited to single-level condition keys by
//! design — anything deeper raises [`Error::UnsupportedConditionShape`]
//! rather than silently producing a wrong filter.

use serde_json::Value;

use crate::config::{
    Strategy,
    StrategyConfig,
};
use crate::error::Error;
use crate::mapper;
use crate::store::Conditions;
use crate::types::Locale;

/// Rewrites filter conditions onto physical storage keys.
///
/// Accepted key syntax: bare translatable field names, the dotted
/// `i18n.<field>.<locale>` form, the `<locale>.<field>` prefixed form, and
/// the reserved `locale` key (sub-record strategy). A `locale` find option
/// rewrites bare translatable-field keys to that locale's physical key.
///
/// The nested strategy is assumed to be natively queryable by the backing
/// store (structured values support path queries), so conditions pass
/// through untouched there — a documented assumption, not a guarantee.
pub fn rewrite(
    conditions: &Conditions,
    locale: Option<&Locale>,
    config: &StrategyConfig,
) -> Result<Conditions, Error> {
    if let Some(locale) = locale
        && !config.has_locale(locale.as_str())
    {
        return Err(Error::UnavailableLocale {
            model: config.model.clone(),
            locale: locale.clone(),
        });
    }
    if config.strategy == Strategy::Nested {
        return Ok(conditions.clone());
    }

    let mut rewritten = Conditions::new();
    for (key, value) in conditions {
        if let Some(rest) = key.strip_prefix(mapper::NAMESPACE).and_then(|r| r.strip_prefix('.'))
        {
            let mut parts = rest.split('.');
            let (Some(field), Some(code), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(Error::UnsupportedConditionShape { key: key.clone() });
            };
            insert_qualified(&mut rewritten, field, code, value, config)?;
        } else if let Some((head, rest)) = key.split_once('.') {
            if !config.has_locale(head) {
                // No translation relevance; the store may still understand it.
                rewritten.insert(key.clone(), value.clone());
                continue;
            }
            if rest.contains('.') {
                return Err(Error::UnsupportedConditionShape { key: key.clone() });
            }
            insert_qualified(&mut rewritten, rest, head, value, config)?;
        } else if key == mapper::LOCALE_TAG && config.strategy == Strategy::SubRecords {
            rewritten.insert(mapper::sub_record_key(mapper::LOCALE_TAG), value.clone());
        } else if config.has_field(key) {
            insert_bare(&mut rewritten, key, locale, value, config);
        } else {
            rewritten.insert(key.clone(), value.clone());
        }
    }

    tracing::debug!(model = %config.model, ?rewritten, "rewrote filter conditions");
    Ok(rewritten)
}

/// Rewrites one locale-qualified `(field, locale)` condition.
fn insert_qualified(
    out: &mut Conditions,
    field: &str,
    code: &str,
    value: &Value,
    config: &StrategyConfig,
) -> Result<(), Error> {
    if !config.has_field(field) {
        return Err(Error::UnavailableField {
            model: config.model.clone(),
            field: field.to_string(),
        });
    }
    if !config.has_locale(code) {
        return Err(Error::UnavailableLocale {
            model: config.model.clone(),
            locale: Locale::new(code),
        });
    }
    let locale = Locale::new(code);
    if config.is_canonical(&locale) {
        out.insert(field.to_string(), value.clone());
        return Ok(());
    }
    match config.strategy {
        Strategy::Inline => {
            out.insert(config.composed(field, &locale), value.clone());
        }
        Strategy::SubRecords => {
            out.insert(mapper::sub_record_key(field), value.clone());
            out.insert(
                mapper::sub_record_key(mapper::LOCALE_TAG),
                Value::String(locale.to_string()),
            );
        }
        // Nested conditions pass through before we get here.
        Strategy::Nested => {
            out.insert(field.to_string(), value.clone());
        }
    }
    Ok(())
}

/// Rewrites a bare translatable-field condition, honoring the `locale` find
/// option when one is present.
fn insert_bare(
    out: &mut Conditions,
    field: &str,
    locale: Option<&Locale>,
    value: &Value,
    config: &StrategyConfig,
) {
    match (config.strategy, locale) {
        (_, Some(locale)) if config.is_canonical(locale) => {
            out.insert(field.to_string(), value.clone());
        }
        (Strategy::Inline, Some(locale)) => {
            out.insert(config.composed(field, locale), value.clone());
        }
        (Strategy::SubRecords, Some(locale)) => {
            out.insert(mapper::sub_record_key(field), value.clone());
            out.insert(
                mapper::sub_record_key(mapper::LOCALE_TAG),
                Value::String(locale.to_string()),
            );
        }
        (Strategy::SubRecords, None) => {
            out.insert(mapper::sub_record_key(field), value.clone());
        }
        (Strategy::Inline, None) | (Strategy::Nested, _) => {
            out.insert(field.to_string(), value.clone());
        }
    }
}
