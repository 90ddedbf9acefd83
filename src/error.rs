use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

/// Result alias used throughout the state core.
pub type Result<T> = std::result::Result<T, StateError>;

/// Failure classes callers can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A requested service, unit or charm does not exist.
    NotFound,
    /// The entity being created already exists.
    AlreadyExists,
    /// The operation would break a placement invariant.
    ConstraintViolation,
    /// An update or remove selector matched no document.
    NoMatchOnMutation,
    /// A stored charm record could not be decoded.
    LoadError,
    /// A service, unit or charm name is malformed.
    InvalidName,
    /// The store is unreachable or returned an unexpected error.
    StoreFailure,
}

impl ErrorKind {
    fn from_store(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::NoMatch { .. } => ErrorKind::NoMatchOnMutation,
            StoreError::DuplicateKey { .. } => ErrorKind::AlreadyExists,
            StoreError::InvalidDocument(_)
            | StoreError::Serde(_)
            | StoreError::Unavailable(_) => ErrorKind::StoreFailure,
        }
    }
}

/// The public operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CharmUrl,
    SetCharmUrl,
    AddUnit,
    AddUnitSubordinateTo,
    RemoveUnit,
    Unit,
    AllUnits,
    AddService,
    Service,
    AllServices,
    AddCharm,
    Charm,
    Sequence,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CharmUrl => "charm-url",
            Operation::SetCharmUrl => "set-charm-url",
            Operation::AddUnit => "add-unit",
            Operation::AddUnitSubordinateTo => "add-unit-subordinate-to",
            Operation::RemoveUnit => "remove-unit",
            Operation::Unit => "unit",
            Operation::AllUnits => "all-units",
            Operation::AddService => "add-service",
            Operation::Service => "service",
            Operation::AllServices => "all-services",
            Operation::AddCharm => "add-charm",
            Operation::Charm => "charm",
            Operation::Sequence => "sequence",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every state operation.
///
/// Carries the failure class, the operation, the names of the entities
/// involved and, when the failure came from the store, the store error.
/// `Display` is the context-prefixed message, e.g.
/// `can't get unit "wordpress/3" from service "wordpress": not found`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StateError {
    kind: ErrorKind,
    op: Operation,
    entities: Vec<String>,
    message: String,
    #[source]
    source: Option<StoreError>,
}

impl StateError {
    /// Wrap a store failure with operation context.
    pub(crate) fn store(
        op: Operation,
        entities: &[&str],
        context: impl fmt::Display,
        cause: StoreError,
    ) -> Self {
        StateError {
            kind: ErrorKind::from_store(&cause),
            op,
            entities: owned(entities),
            message: format!("{}: {}", context, cause),
            source: Some(cause),
        }
    }

    /// A store failure while decoding charm data.
    pub(crate) fn load(
        op: Operation,
        entities: &[&str],
        context: impl fmt::Display,
        cause: impl fmt::Display,
    ) -> Self {
        StateError {
            kind: ErrorKind::LoadError,
            op,
            entities: owned(entities),
            message: format!("{}: {}", context, cause),
            source: None,
        }
    }

    /// A rejected placement.
    pub(crate) fn constraint(op: Operation, entities: &[&str], message: impl Into<String>) -> Self {
        StateError {
            kind: ErrorKind::ConstraintViolation,
            op,
            entities: owned(entities),
            message: message.into(),
            source: None,
        }
    }

    /// A malformed name.
    pub(crate) fn invalid_name(op: Operation, name: &str, message: impl Into<String>) -> Self {
        StateError {
            kind: ErrorKind::InvalidName,
            op,
            entities: vec![name.to_string()],
            message: message.into(),
            source: None,
        }
    }

    /// Re-attribute an inner failure to `op`, prefixing `context`.
    /// Kind and cause are kept.
    pub(crate) fn within(mut self, op: Operation, entities: &[&str], context: impl fmt::Display) -> Self {
        self.op = op;
        for entity in entities {
            if !self.entities.iter().any(|e| e == entity) {
                self.entities.push(entity.to_string());
            }
        }
        self.message = format!("{}: {}", context, self.message);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.op
    }

    /// Names of the services, units or charms involved.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// The store error underneath, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        self.source.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.kind == ErrorKind::ConstraintViolation
    }

    pub fn is_no_match(&self) -> bool {
        self.kind == ErrorKind::NoMatchOnMutation
    }
}

fn owned(entities: &[&str]) -> Vec<String> {
    entities.iter().map(|e| e.to_string()).collect()
}
