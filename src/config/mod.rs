//! Configuration system for kntopo
//!
//! A single YAML file plus environment overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, DuckConfig, LinksConfig, OutputFormat};

/// Every key accepted by [`get_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "defaultNamespace",
    "links.nestedRoot",
    "links.nestedApiPrefix",
    "links.overviewRoot",
    "duck.registry",
    "output",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "links.nestedRoot" => Ok(config.links.nested_root.clone()),
        "links.nestedApiPrefix" => Ok(config.links.nested_api_prefix.clone()),
        "links.overviewRoot" => Ok(config.links.overview_root.clone()),
        "duck.registry" => Ok(config.duck.registry.clone()),
        "output" => Ok(config.output.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}
