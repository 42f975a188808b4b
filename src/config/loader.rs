//! Configuration loading and merging logic
//!
//! Precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Root config file
//! 3. Built-in defaults

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding the default namespace
pub const NAMESPACE_ENV: &str = "KNTOPO_NAMESPACE";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Load configuration using `path` as the root config file
    pub fn load_from(path: &Path) -> Result<Config> {
        let mut config = Self::load_defaults();

        if path.exists() {
            config = Self::load_file(path)?;
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
        }

        Ok(Self::apply_env_overrides(
            config,
            std::env::var(NAMESPACE_ENV).ok(),
        ))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the root config file, if any
    ///
    /// Fails on YAML syntax errors, invalid value types, and link roots
    /// that are not absolute paths.
    pub fn validate() -> Result<()> {
        let path = paths::root_config_path();
        let config = if path.exists() {
            Self::load_file(&path)?
        } else {
            Self::load_defaults()
        };
        Self::check(&config)
    }

    fn check(config: &Config) -> Result<()> {
        if config.default_namespace.is_empty() {
            return Err(anyhow::anyhow!("defaultNamespace must not be empty"));
        }
        for (key, root) in [
            ("links.nestedRoot", &config.links.nested_root),
            ("links.overviewRoot", &config.links.overview_root),
        ] {
            if !root.starts_with('/') {
                return Err(anyhow::anyhow!("{} must start with '/': {}", key, root));
            }
        }
        if config.links.nested_api_prefix.is_empty() {
            return Err(anyhow::anyhow!("links.nestedApiPrefix must not be empty"));
        }
        if config.duck.registry.is_empty() {
            return Err(anyhow::anyhow!("duck.registry must not be empty"));
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Namespace asked for explicitly, by flag or by `KNTOPO_NAMESPACE`
    ///
    /// Takes precedence over the kubeconfig context namespace.
    pub fn requested_namespace(flag: Option<String>) -> Option<String> {
        pick_namespace(flag, std::env::var(NAMESPACE_ENV).ok())
    }

    fn apply_env_overrides(mut config: Config, namespace: Option<String>) -> Config {
        if let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) {
            config.default_namespace = namespace;
        }
        config
    }
}

fn pick_namespace(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.filter(|ns| !ns.is_empty())
        .or_else(|| env.filter(|ns| !ns.is_empty()))
}
