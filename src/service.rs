//! Service - a deployed application and the units it runs.

use std::fmt;

use tracing::{debug, info, warn};

use crate::charm::{Charm, CharmUrl};
use crate::error::{Operation, Result, StateError};
use crate::names;
use crate::state::docs::{UnitDoc, CHARM_URL_FIELD, SERVICE_NAME_FIELD};
use crate::store::{Selector, Update};
use crate::{State, Unit};

/// Handle on a service.
///
/// Holds only the name; every accessor reads the service's current record
/// from the store.
#[derive(Debug, Clone)]
pub struct Service {
    st: State,
    name: String,
}

impl Service {
    pub(crate) fn new(st: State, name: String) -> Self {
        Service { st, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state this handle reads through.
    pub fn state(&self) -> &State {
        &self.st
    }

    /// The charm URL this service is supposed to use.
    pub fn charm_url(&self) -> Result<CharmUrl> {
        let doc = self.st.services().get(&self.name).map_err(|err| {
            StateError::store(
                Operation::CharmUrl,
                &[self.name.as_str()],
                format!("can't get the charm URL of service {:?}", self.name),
                err,
            )
        })?;
        Ok(doc.charm_url)
    }

    /// Change the charm URL for the service.
    ///
    /// Last write wins: there is no version check, so two concurrent
    /// upgrades race and the later one is kept.
    pub fn set_charm_url(&self, url: &CharmUrl) -> Result<()> {
        self.st
            .services()
            .update(
                &Selector::id(self.name.as_str()),
                &Update::set(CHARM_URL_FIELD, url.to_string()),
            )
            .map_err(|err| {
                StateError::store(
                    Operation::SetCharmUrl,
                    &[self.name.as_str()],
                    format!("can't set the charm URL of service {:?}", self.name),
                    err,
                )
            })?;
        info!(
            controller = %self.st.controller(),
            service = %self.name,
            charm = %url,
            "charm URL changed"
        );
        Ok(())
    }

    /// The service's charm.
    pub fn charm(&self) -> Result<Charm> {
        let url = self.charm_url()?;
        self.st.charm(&url)
    }

    /// Add a new principal unit to the service.
    pub fn add_unit(&self) -> Result<Unit> {
        let op = Operation::AddUnit;
        let charm = self.charm_for(op)?;
        if charm.is_subordinate() {
            warn!(service = %self.name, "rejected principal unit for subordinate service");
            return Err(StateError::constraint(
                op,
                &[self.name.as_str()],
                format!("cannot directly add units to subordinate service {:?}", self.name),
            ));
        }
        self.insert_unit(op, None)
    }

    /// Add a new subordinate unit to the service, subordinate to `principal`.
    pub fn add_unit_subordinate_to(&self, principal: &Unit) -> Result<Unit> {
        let op = Operation::AddUnitSubordinateTo;
        let charm = self.charm_for(op)?;
        if !charm.is_subordinate() {
            warn!(
                service = %self.name,
                principal = %principal.name(),
                "rejected subordinate unit for principal service"
            );
            return Err(StateError::constraint(
                op,
                &[self.name.as_str(), principal.name()],
                format!(
                    "can't add unit of principal service {:?} as a subordinate of {:?}",
                    self.name,
                    principal.name()
                ),
            ));
        }
        if !principal.is_principal() {
            warn!(
                service = %self.name,
                principal = %principal.name(),
                "rejected subordinate of a subordinate unit"
            );
            return Err(StateError::constraint(
                op,
                &[self.name.as_str(), principal.name()],
                "a subordinate unit must be added to a principal unit",
            ));
        }
        self.insert_unit(op, Some(principal))
    }

    fn charm_for(&self, op: Operation) -> Result<Charm> {
        self.charm().map_err(|err| {
            err.within(
                op,
                &[self.name.as_str()],
                format!("can't add unit to service {:?}", self.name),
            )
        })
    }

    /// Allocate a name and insert the unit record. Without a principal the
    /// unit is itself a principal.
    fn insert_unit(&self, op: Operation, principal: Option<&Unit>) -> Result<Unit> {
        let context = format!("can't add unit to service {:?}", self.name);
        let id = self
            .st
            .sequence(&self.name)
            .map_err(|err| err.within(op, &[self.name.as_str()], &context))?;

        let doc = UnitDoc {
            name: names::unit_name(&self.name, id),
            service_name: self.name.clone(),
            is_principal: principal.is_none(),
        };
        self.st.units().insert(&doc).map_err(|err| {
            StateError::store(op, &[self.name.as_str(), doc.name.as_str()], &context, err)
        })?;

        info!(
            controller = %self.st.controller(),
            service = %self.name,
            unit = %doc.name,
            principal = principal.map(Unit::name),
            "unit added"
        );
        Ok(Unit::from_doc(self.st.clone(), doc))
    }

    /// Remove `unit` from the service.
    ///
    /// Only a record whose service field names this service is removed.
    pub fn remove_unit(&self, unit: &Unit) -> Result<()> {
        let sel = Selector::id(unit.name()).and(SERVICE_NAME_FIELD, self.name.as_str());
        self.st.units().remove(&sel).map_err(|err| {
            StateError::store(
                Operation::RemoveUnit,
                &[unit.name(), self.name.as_str()],
                format!("can't remove unit {:?}", unit.name()),
                err,
            )
        })?;
        // TODO: unassign the unit from its machine once machine assignment is tracked here.
        info!(
            controller = %self.st.controller(),
            service = %self.name,
            unit = %unit.name(),
            "unit removed"
        );
        Ok(())
    }

    /// The service's unit with `name`.
    pub fn unit(&self, name: &str) -> Result<Unit> {
        let sel = Selector::id(name).and(SERVICE_NAME_FIELD, self.name.as_str());
        let doc = self.st.units().find_one(&sel).map_err(|err| {
            StateError::store(
                Operation::Unit,
                &[name, self.name.as_str()],
                format!("can't get unit {:?} from service {:?}", name, self.name),
                err,
            )
        })?;
        Ok(Unit::from_doc(self.st.clone(), doc))
    }

    /// All units of the service, in no particular order.
    pub fn all_units(&self) -> Result<Vec<Unit>> {
        let docs = self
            .st
            .units()
            .find_all(&Selector::field(SERVICE_NAME_FIELD, self.name.as_str()))
            .map_err(|err| {
                StateError::store(
                    Operation::AllUnits,
                    &[self.name.as_str()],
                    format!("can't get all units from service {:?}", self.name),
                    err,
                )
            })?;
        debug!(service = %self.name, count = docs.len(), "units listed");
        Ok(docs
            .into_iter()
            .map(|doc| Unit::from_doc(self.st.clone(), doc))
            .collect())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
