//! Persisted record shapes for services and units.

use serde::{Deserialize, Serialize};

use crate::charm::CharmUrl;
use crate::Document;

/// Field holding a service's charm URL.
pub(crate) const CHARM_URL_FIELD: &str = "charmurl";
/// Field tying a unit back to its service.
pub(crate) const SERVICE_NAME_FIELD: &str = "servicename";

/// `{ _id: serviceName, charmurl: charmURL }`
#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[document(collection = "services")]
pub(crate) struct ServiceDoc {
    #[document(id)]
    #[serde(rename = "_id")]
    pub name: String,
    #[serde(rename = "charmurl")]
    pub charm_url: CharmUrl,
}

/// `{ _id: unitName, servicename: serviceName, isprincipal: bool }`
#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[document(collection = "units")]
pub(crate) struct UnitDoc {
    #[document(id)]
    #[serde(rename = "_id")]
    pub name: String,
    #[serde(rename = "servicename")]
    pub service_name: String,
    #[serde(rename = "isprincipal")]
    pub is_principal: bool,
}
