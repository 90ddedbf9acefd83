//! State - the root handle onto the shared store.
//!
//! A `State` owns no entity data. Every `Service` and `Unit` it hands out
//! carries a clone of it and re-reads the store on each call, so a write
//! made through one controller's `State` is seen by the next read through
//! any other.

mod config;
pub(crate) mod docs;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::charm::{Charm, CharmDoc, CharmMeta, CharmUrl};
use crate::error::{Operation, Result, StateError};
use crate::names;
use crate::sequence;
use crate::store::{Collection, CollectionExt, DocumentStore, Selector, StoreError};
use crate::{Service, Unit};

use docs::{ServiceDoc, UnitDoc, SERVICE_NAME_FIELD};

pub use config::{Collections, ConfigError, StateConfig};

/// Root handle onto the shared document store.
///
/// Cheap to clone. Several `State` values over clones of one store behave
/// like several controllers sharing one database.
#[derive(Clone)]
pub struct State {
    store: Arc<dyn DocumentStore>,
    config: Arc<StateConfig>,
}

impl State {
    /// Open a state over `store` with the default configuration.
    pub fn new<S: DocumentStore + 'static>(store: S) -> Self {
        Self::open(store, StateConfig::default())
    }

    /// Open a state over `store`.
    pub fn open<S: DocumentStore + 'static>(store: S, config: StateConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Open a state over an already shared store handle.
    pub fn from_shared(store: Arc<dyn DocumentStore>, config: StateConfig) -> Self {
        debug!(controller = %config.controller, "state opened");
        State {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Identity of the controller this handle belongs to.
    pub fn controller(&self) -> &str {
        &self.config.controller
    }

    pub(crate) fn services(&self) -> Collection<'_, dyn DocumentStore, ServiceDoc> {
        self.store
            .collection_named(&self.config.collections.services)
    }

    pub(crate) fn units(&self) -> Collection<'_, dyn DocumentStore, UnitDoc> {
        self.store.collection_named(&self.config.collections.units)
    }

    fn charms(&self) -> Collection<'_, dyn DocumentStore, CharmDoc> {
        self.store.collection_named(&self.config.collections.charms)
    }

    /// Atomically allocate the next number for `key`, starting at 0.
    pub fn sequence(&self, key: &str) -> Result<u64> {
        let value = sequence::next(&*self.store, &self.config.collections.sequence, key)
            .map_err(|err| {
                StateError::store(
                    Operation::Sequence,
                    &[key],
                    format!("can't allocate sequence {:?}", key),
                    err,
                )
            })?;
        debug!(controller = %self.controller(), key, sequence = value, "sequence allocated");
        Ok(value)
    }

    /// Record a charm so services can be deployed with it.
    pub fn add_charm(
        &self,
        meta: CharmMeta,
        url: &CharmUrl,
        bundle_url: &str,
        bundle_sha256: &str,
    ) -> Result<Charm> {
        let charm = Charm::new(url.clone(), meta, bundle_url, bundle_sha256);
        let key = url.to_string();
        self.charms().insert(&CharmDoc::new(&charm)).map_err(|err| {
            StateError::store(
                Operation::AddCharm,
                &[key.as_str()],
                format!("can't add charm {:?}", key),
                err,
            )
        })?;
        info!(controller = %self.controller(), charm = %key, "charm added");
        Ok(charm)
    }

    /// Look up a charm by URL.
    pub fn charm(&self, url: &CharmUrl) -> Result<Charm> {
        let key = url.to_string();
        let context = format!("can't get charm {:?}", key);
        let doc = self.charms().get(&key).map_err(|err| match err {
            StoreError::Serde(reason) | StoreError::InvalidDocument(reason) => {
                StateError::load(Operation::Charm, &[key.as_str()], &context, reason)
            }
            err => StateError::store(Operation::Charm, &[key.as_str()], &context, err),
        })?;
        Charm::try_from(doc)
            .map_err(|err| StateError::load(Operation::Charm, &[key.as_str()], &context, err))
    }

    /// Deploy a new service running `charm`.
    pub fn add_service(&self, name: &str, charm: &Charm) -> Result<Service> {
        if !names::is_valid_service(name) {
            return Err(StateError::invalid_name(
                Operation::AddService,
                name,
                format!("{:?} is not a valid service name", name),
            ));
        }
        let doc = ServiceDoc {
            name: name.to_string(),
            charm_url: charm.url().clone(),
        };
        self.services().insert(&doc).map_err(|err| {
            StateError::store(
                Operation::AddService,
                &[name],
                format!("can't add service {:?}", name),
                err,
            )
        })?;
        info!(
            controller = %self.controller(),
            service = name,
            charm = %charm.url(),
            "service added"
        );
        Ok(Service::new(self.clone(), doc.name))
    }

    /// Look up a service by name.
    pub fn service(&self, name: &str) -> Result<Service> {
        if !names::is_valid_service(name) {
            return Err(StateError::invalid_name(
                Operation::Service,
                name,
                format!("{:?} is not a valid service name", name),
            ));
        }
        let doc = self.services().get(name).map_err(|err| {
            StateError::store(
                Operation::Service,
                &[name],
                format!("can't get service {:?}", name),
                err,
            )
        })?;
        Ok(Service::new(self.clone(), doc.name))
    }

    /// Every deployed service.
    pub fn all_services(&self) -> Result<Vec<Service>> {
        let docs = self
            .services()
            .find_all(&Selector::all())
            .map_err(|err| {
                StateError::store(Operation::AllServices, &[], "can't get all services", err)
            })?;
        Ok(docs
            .into_iter()
            .map(|doc| Service::new(self.clone(), doc.name))
            .collect())
    }

    /// Look up a unit of any service by its full name.
    pub fn unit(&self, name: &str) -> Result<Unit> {
        let service = names::unit_service(name).ok_or_else(|| {
            StateError::invalid_name(
                Operation::Unit,
                name,
                format!("{:?} is not a valid unit name", name),
            )
        })?;
        let sel = Selector::id(name).and(SERVICE_NAME_FIELD, service);
        let doc = self.units().find_one(&sel).map_err(|err| {
            StateError::store(
                Operation::Unit,
                &[name, service],
                format!("can't get unit {:?}", name),
                err,
            )
        })?;
        Ok(Unit::from_doc(self.clone(), doc))
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("controller", &self.config.controller)
            .finish_non_exhaustive()
    }
}
