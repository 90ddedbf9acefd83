//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use super::{DocumentStore, Selector, StoreError, Update, ID_FIELD};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store.
///
/// Documents are grouped by collection and keyed by `_id`. Clone-friendly
/// via Arc: every clone shares the same storage, which is how several
/// `State` handles stand in for several controllers in tests. Each
/// operation runs under one lock acquisition, so it is atomic for the
/// document it touches.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.read()?.get(collection).map_or(0, BTreeMap::len))
    }

    /// Whether `collection` holds no documents.
    pub fn is_empty(&self, collection: &str) -> Result<bool, StoreError> {
        Ok(self.len(collection)? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }
}

/// Key of the first document in `docs` matching `selector`.
fn first_match(docs: &BTreeMap<String, Value>, selector: &Selector) -> Option<String> {
    if let Some(id) = selector.id_clause() {
        return docs
            .get(id)
            .filter(|doc| selector.matches(doc))
            .map(|_| id.to_string());
    }
    docs.iter()
        .find(|(_, doc)| selector.matches(doc))
        .map(|(id, _)| id.clone())
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        let id = doc
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidDocument("document has no string _id".into()))?
            .to_string();

        let mut storage = self.write()?;
        let docs = storage.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id, doc);
        Ok(())
    }

    fn find_one(&self, collection: &str, selector: &Selector) -> Result<Value, StoreError> {
        let storage = self.read()?;
        storage
            .get(collection)
            .and_then(|docs| first_match(docs, selector).and_then(|id| docs.get(&id)))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                selector: selector.to_string(),
            })
    }

    fn find_all(&self, collection: &str, selector: &Selector) -> Result<Vec<Value>, StoreError> {
        let storage = self.read()?;
        Ok(storage
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| selector.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn update(
        &self,
        collection: &str,
        selector: &Selector,
        update: &Update,
    ) -> Result<(), StoreError> {
        let no_match = || StoreError::NoMatch {
            collection: collection.to_string(),
            selector: selector.to_string(),
        };

        let mut storage = self.write()?;
        let docs = storage.get_mut(collection).ok_or_else(no_match)?;
        let id = first_match(docs, selector).ok_or_else(no_match)?;
        let doc = docs
            .get_mut(&id)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| StoreError::InvalidDocument(format!("{} is not an object", id)))?;
        update.apply(doc).map_err(StoreError::InvalidDocument)
    }

    fn remove(&self, collection: &str, selector: &Selector) -> Result<(), StoreError> {
        let no_match = || StoreError::NoMatch {
            collection: collection.to_string(),
            selector: selector.to_string(),
        };

        let mut storage = self.write()?;
        let docs = storage.get_mut(collection).ok_or_else(no_match)?;
        let id = first_match(docs, selector).ok_or_else(no_match)?;
        docs.remove(&id);
        Ok(())
    }

    fn increment(&self, collection: &str, id: &str, field: &str) -> Result<i64, StoreError> {
        let mut storage = self.write()?;
        let doc = storage
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| {
                let mut doc = Map::new();
                doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                Value::Object(doc)
            });

        let fields = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidDocument(format!("{} is not an object", id)))?;
        let previous = match fields.get(field) {
            None => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                StoreError::InvalidDocument(format!("{}.{} is not an integer", id, field))
            })?,
        };
        let next = previous
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidDocument(format!("{}.{} overflows", id, field)))?;
        fields.insert(field.to_string(), Value::from(next));
        Ok(previous)
    }
}
