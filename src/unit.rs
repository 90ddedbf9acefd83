//! Unit - one running instance of a service.

use std::fmt;

use crate::error::Result;
use crate::state::docs::UnitDoc;
use crate::{Service, State};

/// Read-only view of a unit record as it was when loaded.
///
/// The owning service is referenced by name only and resolved through
/// the state on demand.
#[derive(Debug, Clone)]
pub struct Unit {
    st: State,
    name: String,
    service_name: String,
    is_principal: bool,
}

impl Unit {
    pub(crate) fn from_doc(st: State, doc: UnitDoc) -> Self {
        Unit {
            st,
            name: doc.name,
            service_name: doc.service_name,
            is_principal: doc.is_principal,
        }
    }

    /// The unit name, `<service>/<n>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether the unit runs on its own rather than attached to another.
    pub fn is_principal(&self) -> bool {
        self.is_principal
    }

    pub fn is_subordinate(&self) -> bool {
        !self.is_principal
    }

    /// Look up the unit's service.
    pub fn service(&self) -> Result<Service> {
        self.st.service(&self.service_name)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
