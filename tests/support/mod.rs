//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mstate_rust::{
    logging, Charm, CharmMeta, CharmUrl, DocumentStore, InMemoryDocumentStore, Selector, Service,
    State, StoreError, Update,
};
use serde_json::Value;

/// A fresh state over an empty in-memory store, plus the store itself for
/// poking at raw records.
pub fn new_state() -> (State, InMemoryDocumentStore) {
    logging::init_for_tests();
    let store = InMemoryDocumentStore::new();
    (State::new(store.clone()), store)
}

pub fn charm_url(name: &str, revision: u32) -> CharmUrl {
    format!("cs:precise/{}-{}", name, revision).parse().unwrap()
}

/// Record revision 1 of a charm called `name`.
pub fn add_charm(st: &State, name: &str, subordinate: bool) -> Charm {
    add_charm_revision(st, name, 1, subordinate)
}

pub fn add_charm_revision(st: &State, name: &str, revision: u32, subordinate: bool) -> Charm {
    let url = charm_url(name, revision);
    st.add_charm(
        CharmMeta::new(name)
            .with_summary(format!("{} test charm", name))
            .with_subordinate(subordinate),
        &url,
        &format!("http://bundles.example.com/{}-{}", name, revision),
        &format!("sha256-{}-{}", name, revision),
    )
    .unwrap()
}

/// Deploy `name` with a charm of the same name.
pub fn deploy(st: &State, name: &str, subordinate: bool) -> Service {
    let charm = add_charm(st, name, subordinate);
    st.add_service(name, &charm).unwrap()
}

pub fn unit_names(service: &Service) -> Vec<String> {
    let mut names: Vec<String> = service
        .all_units()
        .unwrap()
        .iter()
        .map(|u| u.name().to_string())
        .collect();
    names.sort_by_key(|name| sequence_of(name));
    names
}

/// The numeric suffix of a unit name.
pub fn sequence_of(unit: &str) -> u64 {
    unit.rsplit_once('/').unwrap().1.parse().unwrap()
}

/// A store that can be switched into an unreachable state, or made to
/// report every stored record as corrupt on read.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    down: Arc<AtomicBool>,
    corrupt: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.check()?;
        if self.corrupt.load(Ordering::SeqCst) {
            Err(StoreError::InvalidDocument("record checksum mismatch".into()))
        } else {
            Ok(())
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for FlakyStore {
    fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert(collection, doc)
    }

    fn find_one(&self, collection: &str, selector: &Selector) -> Result<Value, StoreError> {
        self.check_read()?;
        self.inner.find_one(collection, selector)
    }

    fn find_all(&self, collection: &str, selector: &Selector) -> Result<Vec<Value>, StoreError> {
        self.check_read()?;
        self.inner.find_all(collection, selector)
    }

    fn update(
        &self,
        collection: &str,
        selector: &Selector,
        update: &Update,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(collection, selector, update)
    }

    fn remove(&self, collection: &str, selector: &Selector) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(collection, selector)
    }

    fn increment(&self, collection: &str, id: &str, field: &str) -> Result<i64, StoreError> {
        self.check()?;
        self.inner.increment(collection, id, field)
    }
}
