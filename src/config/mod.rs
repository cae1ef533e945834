// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cache::CacheConfig;
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

mod catalog;

pub use catalog::CatalogConfig;

/// Environment variable that overrides `catalog.base_url`
pub const BASE_URL_ENV: &str = "OPENFOODFACTS_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        Self::from_yaml_with_lookup(yaml, |name| std::env::var(name).ok())
    }

    /// Parse YAML after replacing `${VAR_NAME}` with values from `lookup`
    pub fn from_yaml_with_lookup<F>(yaml: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| Error::Config(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if lookup(var_name).is_none() {
                return Err(Error::Config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_default()
        });

        // An empty document means "all defaults"
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Load from an optional file, apply environment overrides, and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `OPENFOODFACTS_BASE_URL` when it is set and non-empty
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.catalog.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog.validate().map_err(Error::Config)?;
        self.cache.validate().map_err(Error::Config)?;
        self.logging.validate().map_err(Error::Config)?;
        Ok(())
    }
}
