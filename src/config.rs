//! Service configuration
//!
//! Loaded from a YAML file named by `METAPEDIA_CONFIG`; every field has a
//! default, so a missing variable yields a working in-memory setup.
//! `METAPEDIA_ADDRESS` and `METAPEDIA_PORT` override the bind address.

use crate::backend::Neo4jConfig;
use crate::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "METAPEDIA_CONFIG";
pub const ADDRESS_ENV: &str = "METAPEDIA_ADDRESS";
pub const PORT_ENV: &str = "METAPEDIA_PORT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// HTTP bind settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Which graph store answers queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-process graphs, one snapshot file per namespace
    Memory {
        #[serde(default)]
        snapshots: BTreeMap<String, PathBuf>,
    },
    Neo4j(Neo4jConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory {
            snapshots: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Accepted `lang` values
    pub namespaces: Vec<String>,
    pub resolver: ResolverConfig,
    /// Size of the recent lookups list
    pub recent_capacity: usize,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            namespaces: vec!["en".to_string(), "zh".to_string()],
            resolver: ResolverConfig::default(),
            recent_capacity: 20,
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Load from `METAPEDIA_CONFIG` (or defaults) and apply env overrides
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(address) = std::env::var(ADDRESS_ENV) {
            config.server.address = address;
        }
        if let Ok(port) = std::env::var(PORT_ENV) {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} is not a port: {}", PORT_ENV, port)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespaces.is_empty() {
            return Err(ConfigError::Invalid("no namespaces configured".to_string()));
        }
        if self.namespaces.iter().any(|ns| ns.trim().is_empty()) {
            return Err(ConfigError::Invalid("empty namespace name".to_string()));
        }

        let resolver = &self.resolver;
        if resolver.undirected_max_hops == 0 || resolver.directed_max_hops == 0 {
            return Err(ConfigError::Invalid("hop limits must be positive".to_string()));
        }
        if resolver.ancestor_max_level == 0 {
            return Err(ConfigError::Invalid("ancestor_max_level must be positive".to_string()));
        }
        if resolver.directed_max_hops < resolver.ancestor_max_level {
            // an ancestor found at level k needs line paths of up to k hops
            return Err(ConfigError::Invalid(format!(
                "directed_max_hops ({}) is below ancestor_max_level ({})",
                resolver.directed_max_hops, resolver.ancestor_max_level
            )));
        }
        if resolver.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be positive".to_string()));
        }

        match &self.store {
            StoreConfig::Memory { snapshots } => {
                if let Some(ns) = snapshots.keys().find(|ns| !self.namespaces.contains(ns)) {
                    return Err(ConfigError::Invalid(format!(
                        "snapshot for unknown namespace '{}'",
                        ns
                    )));
                }
            }
            StoreConfig::Neo4j(neo4j) => {
                if neo4j.url.is_empty() {
                    return Err(ConfigError::Invalid("neo4j url is empty".to_string()));
                }
                if !neo4j.database_pattern.contains("{lang}") {
                    return Err(ConfigError::Invalid(
                        "neo4j database_pattern must contain {lang}".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
