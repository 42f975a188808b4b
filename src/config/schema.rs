//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace used when a command does not name one
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Link resolution
    #[serde(default)]
    pub links: LinksConfig,

    /// Duck type discovery
    #[serde(default)]
    pub duck: DuckConfig,

    /// Default output format for `graph` and `sources`
    #[serde(default)]
    pub output: OutputFormat,
}

/// Link resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinksConfig {
    /// Path root for objects in the nested API family
    #[serde(default = "default_nested_root")]
    pub nested_root: String,

    /// `apiVersion` prefix that selects the nested path format
    #[serde(default = "default_nested_api_prefix")]
    pub nested_api_prefix: String,

    /// Path root used by the generic resolver
    #[serde(default = "default_overview_root")]
    pub overview_root: String,
}

/// Duck type discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuckConfig {
    /// Name of the ClusterDuckType listing source kinds
    #[serde(default = "default_registry")]
    pub registry: String,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tree => "tree",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" | "text" => Ok(OutputFormat::Tree),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {} (tree, json, yaml)", s)),
        }
    }
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_nested_root() -> String {
    "/knative".to_string()
}

fn default_nested_api_prefix() -> String {
    crate::models::SERVING_GROUP.to_string()
}

fn default_overview_root() -> String {
    "/overview".to_string()
}

fn default_registry() -> String {
    "sources.duck.knative.dev".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            links: LinksConfig::default(),
            duck: DuckConfig::default(),
            output: OutputFormat::default(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            nested_root: default_nested_root(),
            nested_api_prefix: default_nested_api_prefix(),
            overview_root: default_overview_root(),
        }
    }
}

impl Default for DuckConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}
