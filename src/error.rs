//! Crate-wide error taxonomy.

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::Locale;

/// Errors surfaced by the translation layer.
///
/// Configuration errors abort setup; everything else is fatal for the single
/// lifecycle call that raised it. The core never retries: all operations are
/// deterministic local transformations, so recovery means supplying corrected
/// input and calling again.
#[derive(Error, Debug)]
pub enum Error {
    /// Setup-time configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An accessor was called with a field not configured for translation.
    #[error("field `{field}` in model `{model}` is not available for translation")]
    UnavailableField {
        /// Model the accessor was called on.
        model: String,
        /// The offending field name.
        field: String,
    },

    /// An accessor or find option referenced a locale outside the configured
    /// set.
    #[error("locale `{locale}` is not configured for translation in model `{model}`")]
    UnavailableLocale {
        /// Model the locale was used with.
        model: String,
        /// The offending locale.
        locale: Locale,
    },

    /// The in-memory translation map references a field outside the
    /// configured set. Indicates a caller bug or a stale map; the save or
    /// validate call is aborted.
    #[error("translation map references unconfigured field `{field}`")]
    UnknownTranslatedField {
        /// The offending field name.
        field: String,
    },

    /// A filter condition has a shape the rewriter cannot safely translate.
    /// Raised instead of silently producing a wrong filter.
    #[error("condition key `{key}` has an unsupported shape for locale rewriting")]
    UnsupportedConditionShape {
        /// The condition key as supplied by the caller.
        key: String,
    },

    /// Failure reported by the underlying persistence layer.
    #[error("store error: {0}")]
    Store(String),
}
