use serde::Deserialize;
use thiserror::Error;

/// Error raised when a state configuration cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid state configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid state configuration: {0}")]
    Invalid(String),
}

/// Collection names used by the state core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub services: String,
    pub units: String,
    pub charms: String,
    pub sequence: String,
}

impl Default for Collections {
    fn default() -> Self {
        Collections {
            services: "services".to_string(),
            units: "units".to_string(),
            charms: "charms".to_string(),
            sequence: "sequence".to_string(),
        }
    }
}

/// Settings for one `State` handle.
///
/// ```toml
/// controller = "controller-1"
///
/// [collections]
/// units = "units"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Identity of the controller process, recorded on log events.
    pub controller: String,
    pub collections: Collections,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig {
            controller: "controller-0".to_string(),
            collections: Collections::default(),
        }
    }
}

impl StateConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StateConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The same configuration under another controller identity.
    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = controller.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.collections;
        let names = [&c.services, &c.units, &c.charms, &c.sequence];
        if names.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::Invalid("collection names must not be empty".into()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(ConfigError::Invalid(format!(
                    "collection {:?} is used more than once",
                    name
                )));
            }
        }
        Ok(())
    }
}
