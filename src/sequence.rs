//! Sequence allocator: per-key monotonic counters kept in the shared store.
//!
//! Each allocation is one atomic read-and-increment, so two controllers
//! adding units to the same service can never be handed the same number,
//! and numbers are never reused after the unit holding one is removed.

use crate::store::{DocumentStore, StoreError};

/// Field holding the next value in a sequence document.
pub(crate) const COUNTER_FIELD: &str = "counter";

/// Allocate the next value for `key`. The first allocation returns 0.
pub(crate) fn next(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
) -> Result<u64, StoreError> {
    let previous = store.increment(collection, key, COUNTER_FIELD)?;
    u64::try_from(previous)
        .map_err(|_| StoreError::InvalidDocument(format!("sequence {:?} is negative", key)))
}
