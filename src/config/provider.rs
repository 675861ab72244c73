//! Ambient locale configuration, injected rather than looked up globally.

use std::collections::BTreeMap;

use crate::types::Locale;

/// Supplies the ambient locale settings consulted during configuration
/// resolution: the current locale and the configured locale catalog.
///
/// This is read once, at resolution time — never from inside the sync logic —
/// so the core stays testable with arbitrary locale sets and no process-wide
/// state.
pub trait LocaleProvider {
    /// The process-wide current locale.
    fn current_locale(&self) -> Locale;

    /// All configured locales, in catalog order.
    fn locale_catalog(&self) -> Vec<Locale>;
}

/// A fixed locale environment, for embedders and tests.
#[derive(Debug, Clone)]
pub struct StaticLocales {
    /// Current locale returned by the provider.
    current: Locale,
    /// Catalog returned by the provider.
    catalog: Vec<Locale>,
}

impl StaticLocales {
    /// Creates a provider with a fixed current locale and catalog.
    #[must_use]
    pub fn new(current: impl Into<Locale>, catalog: impl IntoIterator<Item = Locale>) -> Self {
        Self { current: current.into(), catalog: catalog.into_iter().collect() }
    }

    /// Creates a provider from a locale-to-label catalog, keeping its keys.
    #[must_use]
    pub fn from_catalog(current: impl Into<Locale>, catalog: &BTreeMap<Locale, String>) -> Self {
        Self { current: current.into(), catalog: catalog.keys().cloned().collect() }
    }
}

impl LocaleProvider for StaticLocales {
    fn current_locale(&self) -> Locale {
        self.current.clone()
    }

    fn locale_catalog(&self) -> Vec<Locale> {
        self.catalog.clone()
    }
}
