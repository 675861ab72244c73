//! Collaborator contracts for the persistence layer.
//!
//! The core never talks to a database itself. It consumes two narrow traits:
//! [`Schema`] for setup-time introspection (used during configuration
//! resolution) and [`Store`] for the wrapped operations. Store
//! implementations see raw physical records only — locale awareness stays
//! entirely on this side of the seam.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Error;
use crate::record::Record;
use crate::validation::{
    RuleSet,
    ValidationFailure,
};

/// Filter conditions: condition key to predicate value, matched by equality.
pub type Conditions = BTreeMap<String, Value>;

/// Setup-time introspection of the backing model.
pub trait Schema {
    /// Name of the model, used in error messages.
    fn model_name(&self) -> &str;

    /// Name of the primary-key field.
    fn key_field(&self) -> &str;

    /// True if the schema declares the given physical field.
    fn has_field(&self, field: &str) -> bool;

    /// True if the store natively supports structured (map/array) values,
    /// e.g. a document database. Decides the default storage strategy.
    fn supports_structured(&self) -> bool;
}

/// The wrapped persistence operations.
///
/// The save path's fetch-then-merge step calls [`Store::find`] and then
/// [`Store::save`] as two separate operations; that read-then-write is not
/// atomic, and two concurrent saves of the same record can each see a stale
/// snapshot and overwrite the other's translations. Guarding against that
/// race (atomic single-document updates, optimistic concurrency tokens) is
/// the store's responsibility, not this crate's.
pub trait Store: Schema {
    /// Looks up raw physical records matching all conditions.
    fn find(&self, conditions: &Conditions) -> Result<Vec<Record>, Error>;

    /// Persists one record, assigning its primary key on first save and
    /// marking it as existing.
    fn save(&mut self, record: &mut Record) -> Result<(), Error>;

    /// Runs the rule engine over a record, returning any failures.
    /// Rule semantics are the store's; this crate only relaxes rule sets
    /// before delegating.
    fn validate(&self, record: &Record, rules: &RuleSet) -> Vec<ValidationFailure>;
}
