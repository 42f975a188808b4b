//! Resource references
//!
//! A reference identifies a single cluster object, or a whole type family
//! when `name` and `namespace` are absent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group used when an `apiVersion` carries no group (core resources)
pub const NO_GROUP: &str = "nogroup";

/// Reference to a cluster object or type family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ResourceReference {
    /// Reference to a type family
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: None,
            namespace: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Reference to a CustomResourceDefinition by its object name
    pub fn crd(name: impl Into<String>) -> Self {
        Self::new("apiextensions.k8s.io/v1", "CustomResourceDefinition").with_name(name)
    }

    /// API group, the text before the first `/` of `apiVersion`
    pub fn group(&self) -> Option<&str> {
        self.api_version.split_once('/').map(|(group, _)| group)
    }

    /// Version part of `apiVersion`
    pub fn version(&self) -> &str {
        self.api_version
            .split_once('/')
            .map(|(_, version)| version)
            .unwrap_or(&self.api_version)
    }

    /// Naive plural: lowercased kind with an `s` appended
    pub fn plural(&self) -> String {
        naive_plural(&self.kind)
    }
}

/// Lowercase a kind and append `s`.
///
/// Wrong for irregular plurals (`Policy` -> `policys`); callers that use
/// it for lookups must tolerate a miss.
pub fn naive_plural(kind: &str) -> String {
    format!("{}s", kind.to_lowercase())
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version, self.kind)?;
        if let Some(namespace) = &self.namespace {
            write!(f, " {}", namespace)?;
            if self.name.is_some() {
                write!(f, "/")?;
            }
        } else if self.name.is_some() {
            write!(f, " ")?;
        }
        if let Some(name) = &self.name {
            write!(f, "{}", name)?;
        }
        Ok(())
    }
}
