//! Store - the document-database boundary shared by every controller.
//!
//! The state core only relies on single-document atomic operations:
//! insert with a unique `_id`, find, update and remove by selector, and
//! an atomic read-and-increment. Every controller process talks to the
//! same store, so these operations are the only synchronisation point.
//!
//! ## Example
//!
//! ```ignore
//! use mstate_rust::{CollectionExt, Document, InMemoryDocumentStore, Selector};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "units")]
//! struct UnitDoc {
//!     #[document(id)]
//!     #[serde(rename = "_id")]
//!     name: String,
//!     servicename: String,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! store.collection::<UnitDoc>().insert(&doc)?;
//! let units = store
//!     .collection::<UnitDoc>()
//!     .find_all(&Selector::field("servicename", "wordpress"))?;
//! ```

mod collection;
mod in_memory;
mod selector;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Field every persisted document is keyed by.
pub const ID_FIELD: &str = "_id";

/// Trait for types that are persisted as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Default collection for this document type (e.g. "services", "units").
    const COLLECTION: &'static str;

    /// The unique key, persisted under `_id`.
    fn id(&self) -> &str;
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `find_one` matched nothing.
    #[error("not found")]
    NotFound { collection: String, selector: String },
    /// An update or remove selector matched nothing.
    #[error("no document in {collection} matches {selector}")]
    NoMatch { collection: String, selector: String },
    /// Insert of an `_id` that already exists.
    #[error("duplicate key {id:?} in {collection}")]
    DuplicateKey { collection: String, id: String },
    /// The document does not have the shape the operation needs.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// Serialization/deserialization error.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// The backend cannot be reached or is in an unusable state.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

pub use collection::{Collection, CollectionExt};
pub use in_memory::InMemoryDocumentStore;
pub use selector::{Selector, Update};
pub use store::DocumentStore;
