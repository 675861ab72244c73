//! Field mapping between logical `(field, locale)` pairs and physical
//! storage keys.
//!
//! All composed keys live under a fixed namespace so they can be recognized
//! and decomposed again by the query rewriter. The composition must be
//! collision-free: configuration resolution rejects declared field names
//! that themselves match the composed pattern.

use crate::types::Locale;

/// Namespace prefix for all composed keys and the structural map slot.
pub const NAMESPACE: &str = "i18n";

/// Separator used for physical sibling fields (`i18n_name_ja`).
pub const DEFAULT_SEPARATOR: &str = "_";

/// Separator used for dotted, rule- and query-facing keys (`i18n.name.ja`).
pub const DOTTED_SEPARATOR: &str = ".";

/// Physical slot holding the locale-tagged sub-record list.
pub const SUB_RECORD_SLOT: &str = "localizations";

/// Locale tag carried by each sub-record in the list.
pub const LOCALE_TAG: &str = "locale";

/// Marker naming the locale whose sub-record backs the canonical fields.
pub const VALIDATION_LOCALE: &str = "validationLocale";

/// Composes the physical key for a `(field, locale)` pair:
/// `i18n{sep}{field}{sep}{locale}`.
#[must_use]
pub fn compose_key(field: &str, locale: &Locale, separator: &str) -> String {
    format!("{NAMESPACE}{separator}{field}{separator}{locale}")
}

/// Decomposes a physical key back into `(field, locale)`.
///
/// The locale is taken from the last separator segment, so field names may
/// themselves contain the separator (`i18n_display_name_ja` decomposes to
/// `("display_name", "ja")`). Returns `None` for keys outside the namespace.
#[must_use]
pub fn decompose_key<'a>(key: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let rest = key.strip_prefix(NAMESPACE)?.strip_prefix(separator)?;
    let (field, locale) = rest.rsplit_once(separator)?;
    (!field.is_empty() && !locale.is_empty()).then_some((field, locale))
}

/// The sub-document path a field lives under for the sub-record strategy.
#[must_use]
pub fn sub_record_key(field: &str) -> String {
    format!("{SUB_RECORD_SLOT}.{field}")
}
