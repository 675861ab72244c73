//! translatable
//!
//! A locale-aware field synchronization layer for record stores: selected
//! fields of a record exist in multiple language variants while the rest of
//! the application sees a single canonical view. The crate keeps the
//! canonical fields, the per-field per-locale translation map, and the
//! physical storage representation consistent across three storage
//! strategies (inline sibling fields, one nested structured value, or a list
//! of locale-tagged sub-records), rewrites query filters onto the physical
//! keys, and relaxes validation rules so only the canonical locale's data is
//! mandatory.
//!
//! "Translation" here means a locale-keyed data variant — this crate does
//! not translate anything itself and owns no storage schema.

pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod query;
pub mod record;
pub mod store;
pub mod sync;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use error::Error;
pub use model::{
    FindOptions,
    Translatable,
    Translate,
};
pub use record::Record;
pub use types::{
    Locale,
    TranslationMap,
};
