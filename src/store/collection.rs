//! Collection - Typed accessor for document CRUD operations.

use std::marker::PhantomData;

use super::{Document, DocumentStore, Selector, StoreError, Update};

/// Typed view of one collection in a `DocumentStore`.
pub struct Collection<'a, S: ?Sized, D> {
    store: &'a S,
    name: &'a str,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore + ?Sized, D: Document> Collection<'a, S, D> {
    pub fn new(store: &'a S, name: &'a str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    /// Name of the underlying collection.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Insert a new document. Fails if its id already exists.
    pub fn insert(&self, doc: &D) -> Result<(), StoreError> {
        self.store.insert(self.name, serde_json::to_value(doc)?)
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Result<D, StoreError> {
        self.find_one(&Selector::id(id))
    }

    /// Find the first document matching `selector`.
    pub fn find_one(&self, selector: &Selector) -> Result<D, StoreError> {
        let value = self.store.find_one(self.name, selector)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Find every document matching `selector`.
    pub fn find_all(&self, selector: &Selector) -> Result<Vec<D>, StoreError> {
        self.store
            .find_all(self.name, selector)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    /// Apply `update` to the first document matching `selector`.
    pub fn update(&self, selector: &Selector, update: &Update) -> Result<(), StoreError> {
        self.store.update(self.name, selector, update)
    }

    /// Remove the first document matching `selector`.
    pub fn remove(&self, selector: &Selector) -> Result<(), StoreError> {
        self.store.remove(self.name, selector)
    }
}

/// Extension trait for typed collection access on any DocumentStore.
pub trait CollectionExt: DocumentStore {
    /// Typed accessor for the document type's default collection.
    fn collection<D: Document>(&self) -> Collection<'_, Self, D> {
        Collection::new(self, D::COLLECTION)
    }

    /// Typed accessor for a collection with a configured name.
    fn collection_named<'a, D: Document>(&'a self, name: &'a str) -> Collection<'a, Self, D> {
        Collection::new(self, name)
    }
}

impl<S: DocumentStore + ?Sized> CollectionExt for S {}
