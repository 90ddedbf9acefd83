//! Charms - the software packages services run.
//!
//! Charm metadata is parsed elsewhere; the state core only records it and
//! hands it back, keyed by the charm's URL.

mod url;

use serde::{Deserialize, Serialize};

use crate::Document;

pub use url::{CharmUrl, CharmUrlError, Schema};

/// The metadata fields the state core reads from a charm.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharmMeta {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    /// Services running a subordinate charm only host subordinate units.
    #[serde(default)]
    pub subordinate: bool,
}

impl CharmMeta {
    pub fn new(name: impl Into<String>) -> Self {
        CharmMeta {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_subordinate(mut self, subordinate: bool) -> Self {
        self.subordinate = subordinate;
        self
    }
}

/// A charm known to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charm {
    url: CharmUrl,
    meta: CharmMeta,
    bundle_url: String,
    bundle_sha256: String,
}

impl Charm {
    pub(crate) fn new(
        url: CharmUrl,
        meta: CharmMeta,
        bundle_url: impl Into<String>,
        bundle_sha256: impl Into<String>,
    ) -> Self {
        Charm {
            url,
            meta,
            bundle_url: bundle_url.into(),
            bundle_sha256: bundle_sha256.into(),
        }
    }

    pub fn url(&self) -> &CharmUrl {
        &self.url
    }

    pub fn meta(&self) -> &CharmMeta {
        &self.meta
    }

    /// Where the charm bundle can be downloaded from.
    pub fn bundle_url(&self) -> &str {
        &self.bundle_url
    }

    pub fn bundle_sha256(&self) -> &str {
        &self.bundle_sha256
    }

    pub fn is_subordinate(&self) -> bool {
        self.meta.subordinate
    }
}

/// Persisted charm record.
#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[document(collection = "charms")]
pub(crate) struct CharmDoc {
    #[document(id)]
    #[serde(rename = "_id")]
    pub url: String,
    pub meta: CharmMeta,
    #[serde(rename = "bundleurl")]
    pub bundle_url: String,
    #[serde(rename = "bundlesha256")]
    pub bundle_sha256: String,
}

impl CharmDoc {
    pub(crate) fn new(charm: &Charm) -> Self {
        CharmDoc {
            url: charm.url.to_string(),
            meta: charm.meta.clone(),
            bundle_url: charm.bundle_url.clone(),
            bundle_sha256: charm.bundle_sha256.clone(),
        }
    }
}

impl TryFrom<CharmDoc> for Charm {
    type Error = CharmUrlError;

    fn try_from(doc: CharmDoc) -> Result<Self, Self::Error> {
        Ok(Charm {
            url: doc.url.parse()?,
            meta: doc.meta,
            bundle_url: doc.bundle_url,
            bundle_sha256: doc.bundle_sha256,
        })
    }
}
