//! DocumentStore - the store capabilities the state core depends on.

use serde_json::Value;

use super::{Selector, StoreError, Update};

/// Abstract document storage shared by every controller.
///
/// Each method is a single round trip and atomic with respect to the one
/// document it touches. Nothing here spans documents. Retrying on
/// transient failures is left to implementations and their callers.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with `DuplicateKey` if its `_id` exists.
    fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError>;

    /// Find the first document matching `selector`. Fails with `NotFound`.
    fn find_one(&self, collection: &str, selector: &Selector) -> Result<Value, StoreError>;

    /// Find every document matching `selector`, in no particular order.
    fn find_all(&self, collection: &str, selector: &Selector) -> Result<Vec<Value>, StoreError>;

    /// Apply `update` to the first document matching `selector`.
    /// Fails with `NoMatch` when nothing matches.
    fn update(&self, collection: &str, selector: &Selector, update: &Update)
        -> Result<(), StoreError>;

    /// Remove the first document matching `selector`.
    /// Fails with `NoMatch` when nothing matches.
    fn remove(&self, collection: &str, selector: &Selector) -> Result<(), StoreError>;

    /// Atomically read and increment the integer `field` of document `id`,
    /// returning the value before the increment. A missing document is
    /// created with the field at zero.
    fn increment(&self, collection: &str, id: &str, field: &str) -> Result<i64, StoreError>;
}
