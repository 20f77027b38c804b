//! Topology configuration for the reference agents
//!
//! Every agent needs to know where it listens and the coordinator needs to
//! know where the specialists are. Defaults describe the reference topology
//! (`localhost`, ports 8000 to 8004); a TOML file can override any field:
//!
//! ```toml
//! host = "agents.internal"
//! bind_address = "0.0.0.0"
//! timeout_secs = 10
//!
//! [ports]
//! coordinator = 9000
//! calculator = 9001
//! ```
//!
//! `A2A_HOST` overrides `host` after the file is read.

use std::{collections::HashSet, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{routing::Router, skills::AgentRole};

/// Environment variable overriding the advertised host
pub const HOST_ENV: &str = "A2A_HOST";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid agent URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Where each agent listens and is reached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopologyConfig {
    /// Host name used in agent URLs
    #[serde(default = "default_host")]
    pub host: String,

    /// Address listeners bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Timeout for coordinator calls to specialists, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub ports: PortMap,
}

/// One port per agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortMap {
    pub coordinator: u16,
    pub calculator: u16,
    pub translator: u16,
    pub weather: u16,
    pub timer: u16,
}

impl Default for PortMap {
    fn default() -> Self {
        Self {
            coordinator: 8000,
            calculator: 8001,
            translator: 8002,
            weather: 8003,
            timer: 8004,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            bind_address: default_bind_address(),
            timeout_secs: default_timeout_secs(),
            ports: PortMap::default(),
        }
    }
}

impl TopologyConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults or file contents, then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidConfig("host cannot be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for role in AgentRole::ALL {
            let port = self.port(role);
            if port == 0 {
                return Err(ConfigError::InvalidConfig(format!("{} port cannot be 0", role)));
            }
            if !seen.insert(port) {
                return Err(ConfigError::InvalidConfig(format!(
                    "port {} is assigned to more than one agent",
                    port
                )));
            }
        }

        for role in AgentRole::ALL {
            self.url(role)?;
        }
        Ok(())
    }

    pub fn port(&self, role: AgentRole) -> u16 {
        match role {
            AgentRole::Coordinator => self.ports.coordinator,
            AgentRole::Calculator => self.ports.calculator,
            AgentRole::Translator => self.ports.translator,
            AgentRole::Weather => self.ports.weather,
            AgentRole::Timer => self.ports.timer,
        }
    }

    /// Base URL other agents use to reach `role`
    pub fn url(&self, role: AgentRole) -> Result<Url, ConfigError> {
        Ok(Url::parse(&format!("http://{}:{}", self.host, self.port(role)))?)
    }

    /// Socket address `role` listens on
    pub fn bind_addr(&self, role: AgentRole) -> String {
        format!("{}:{}", self.bind_address, self.port(role))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Router over every specialist in this topology
    pub fn router(&self) -> Result<Router, ConfigError> {
        let agents = AgentRole::ALL
            .into_iter()
            .filter_map(|role| role.specialist().map(|kind| (role, kind)))
            .map(|(role, kind)| Ok((kind, self.url(role)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Router::new(agents).with_timeout(self.timeout()))
    }
}
