//! Service and unit name rules.

use once_cell::sync::Lazy;
use regex::Regex;

const SERVICE_SNIPPET: &str = "[a-z][a-z0-9]*(?:-[a-z0-9]*[a-z][a-z0-9]*)*";

static SERVICE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}$", SERVICE_SNIPPET)).expect("service name pattern compiles")
});

static UNIT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^({})/(?:0|[1-9][0-9]*)$", SERVICE_SNIPPET))
        .expect("unit name pattern compiles")
});

/// Whether `name` is a valid service name, e.g. `wordpress` or `my-sql2`.
pub fn is_valid_service(name: &str) -> bool {
    SERVICE_NAME.is_match(name)
}

/// Whether `name` is a valid unit name, e.g. `wordpress/0`.
pub fn is_valid_unit(name: &str) -> bool {
    UNIT_NAME.is_match(name)
}

/// The service part of a unit name, or None if the name is malformed.
pub fn unit_service(name: &str) -> Option<&str> {
    UNIT_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Compose a unit name from its service and sequence number.
pub fn unit_name(service: &str, sequence: u64) -> String {
    format!("{}/{}", service, sequence)
}
