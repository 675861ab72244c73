//! Configuration resolution and validation.

mod provider;
mod types;

pub use provider::{
    LocaleProvider,
    StaticLocales,
};
pub use types::{
    ConfigError,
    ConfigIssue,
    Strategy,
    StrategyConfig,
    TranslatableConfig,
};
