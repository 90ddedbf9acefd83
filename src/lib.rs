//! State core for cluster orchestration.
//!
//! Tracks deployed services, the units each one runs and the charm each
//! service is bound to, in a document store shared by every controller.
//! Invariants hold across controllers using single-document atomic store
//! operations only.
//!
//! ```ignore
//! use mstate_rust::{CharmMeta, InMemoryDocumentStore, State};
//!
//! let st = State::new(InMemoryDocumentStore::new());
//! let url = "cs:precise/wordpress-3".parse()?;
//! let charm = st.add_charm(CharmMeta::new("wordpress"), &url, "http://bundles/wp-3", "sha")?;
//! let wordpress = st.add_service("wordpress", &charm)?;
//! let unit = wordpress.add_unit()?;
//! assert_eq!(unit.name(), "wordpress/0");
//! ```

extern crate self as mstate_rust;

mod charm;
mod error;
pub mod logging;
pub mod names;
mod sequence;
mod service;
mod state;
mod store;
mod unit;

pub use charm::{Charm, CharmMeta, CharmUrl, CharmUrlError, Schema};
pub use error::{ErrorKind, Operation, Result, StateError};
pub use service::Service;
pub use state::{Collections, ConfigError, State, StateConfig};
pub use store::{
    Collection, CollectionExt, Document, DocumentStore, InMemoryDocumentStore, Selector,
    StoreError, Update, ID_FIELD,
};
pub use unit::Unit;

pub use mstate_rust_macros::Document;
