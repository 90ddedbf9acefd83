//! CharmUrl - `schema:[~user/]series/name[-revision]`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

static USER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-zA-Z0-9+.\-]+$").expect("user pattern compiles"));
static SERIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(?:[a-z\-]+[a-z])?$").expect("series pattern compiles"));
static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(?:-[a-z0-9]*[a-z][a-z0-9]*)*$").expect("name pattern compiles")
});

/// Where a charm is published from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// The charm store (`cs:`).
    Store,
    /// A local repository (`local:`).
    Local,
}

impl Schema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Store => "cs",
            Schema::Local => "local",
        }
    }
}

/// Error returned when parsing a malformed charm URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("charm URL {url:?} {reason}")]
pub struct CharmUrlError {
    url: String,
    reason: &'static str,
}

impl CharmUrlError {
    fn new(url: &str, reason: &'static str) -> Self {
        CharmUrlError {
            url: url.to_string(),
            reason,
        }
    }
}

/// Identifies a charm, optionally pinned to a revision.
///
/// Persisted as its string form, e.g. `cs:~alice/precise/wordpress-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharmUrl {
    schema: Schema,
    user: Option<String>,
    series: String,
    name: String,
    revision: Option<u32>,
}

impl CharmUrl {
    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// The same URL pinned to `revision`.
    pub fn with_revision(&self, revision: u32) -> Self {
        CharmUrl {
            revision: Some(revision),
            ..self.clone()
        }
    }
}

impl FromStr for CharmUrl {
    type Err = CharmUrlError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let (schema, rest) = url
            .split_once(':')
            .ok_or_else(|| CharmUrlError::new(url, "has no schema"))?;
        let schema = match schema {
            "cs" => Schema::Store,
            "local" => Schema::Local,
            _ => return Err(CharmUrlError::new(url, "has invalid schema")),
        };

        let mut parts: Vec<&str> = rest.split('/').collect();
        let user = match parts.first().copied().and_then(|first| first.strip_prefix('~')) {
            Some(user) => {
                if schema == Schema::Local {
                    return Err(CharmUrlError::new(url, "cannot have a user with local schema"));
                }
                if !USER.is_match(user) {
                    return Err(CharmUrlError::new(url, "has invalid user"));
                }
                parts.remove(0);
                Some(user.to_string())
            }
            None => None,
        };

        let (series, last) = match parts.as_slice() {
            [series, last] => (*series, *last),
            [_] => return Err(CharmUrlError::new(url, "has no series")),
            _ => return Err(CharmUrlError::new(url, "has invalid form")),
        };
        if !SERIES.is_match(series) {
            return Err(CharmUrlError::new(url, "has invalid series"));
        }

        let (name, revision) = match last.rsplit_once('-') {
            Some((name, rev)) if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) => {
                let rev = rev
                    .parse()
                    .map_err(|_| CharmUrlError::new(url, "has invalid revision"))?;
                (name, Some(rev))
            }
            _ => (last, None),
        };
        if !NAME.is_match(name) {
            return Err(CharmUrlError::new(url, "has invalid name"));
        }

        Ok(CharmUrl {
            schema,
            user,
            series: series.to_string(),
            name: name.to_string(),
            revision,
        })
    }
}

impl fmt::Display for CharmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.schema.as_str())?;
        if let Some(user) = &self.user {
            write!(f, "~{}/", user)?;
        }
        write!(f, "{}/{}", self.series, self.name)?;
        if let Some(revision) = self.revision {
            write!(f, "-{}", revision)?;
        }
        Ok(())
    }
}

impl Serialize for CharmUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CharmUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
