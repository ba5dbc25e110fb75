//! Engine configuration with documented defaults
//!
//! Values come from `Default`, then an optional TOML file, then environment
//! overrides. The resulting config is passed explicitly to the pieces that
//! need it; there is no process-wide instance.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{EngineError, Result};

/// Environment variable overriding [`EngineConfig::data_dir`]
pub const DATA_DIR_ENV: &str = "FOUNDER_BLUEPRINT_DATA_DIR";

/// Environment variable overriding [`EngineConfig::catalog_path`]
pub const CATALOG_ENV: &str = "FOUNDER_BLUEPRINT_CATALOG";

/// Configuration for the blueprint engine and its stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the persisted profile, blueprint, completion map
    /// and custom rule override (one JSON document each)
    pub data_dir: PathBuf,

    /// Catalog file (JSON or TOML, chosen by extension)
    ///
    /// If the file is missing or unreadable the engine runs against an empty
    /// catalog rather than failing.
    pub catalog_path: PathBuf,

    /// `tracing` filter directive used by the binary when `RUST_LOG` is unset
    pub log_filter: String,

    /// How many pending tasks the "up next" view shows
    pub upcoming_limit: usize,

    /// Rule count above which matching fans out across `rayon` workers
    ///
    /// Real rule sets are a few dozen entries; below this threshold the
    /// sequential path is faster.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".founder-blueprint"),
            catalog_path: PathBuf::from("data/sampleData.json"),
            log_filter: "founder_blueprint=info".to_string(),
            upcoming_limit: 3,
            parallel_threshold: 256,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides on top of the current values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(catalog) = std::env::var(CATALOG_ENV) {
            self.catalog_path = PathBuf::from(catalog);
        }
        self
    }

    /// Resolve the effective config: file (if given) then environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate().map_err(EngineError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".into());
        }

        if self.catalog_path.as_os_str().is_empty() {
            return Err("catalog_path must not be empty".into());
        }

        if self.upcoming_limit == 0 {
            return Err("upcoming_limit must be at least 1".into());
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }

        Ok(())
    }
}
