//! Knative resource kind definitions
//!
//! Centralizes the resource kinds the topology engine recognizes, so that
//! traversal and link resolution match on an enum instead of strings.

use std::fmt;
use std::str::FromStr;

/// API group of Knative Serving resources
pub const SERVING_GROUP: &str = "serving.knative.dev";

/// Label naming the owning Service of a serving resource
pub const SERVICE_LABEL: &str = "serving.knative.dev/service";
/// Label naming the owning Configuration of a Revision
pub const CONFIGURATION_LABEL: &str = "serving.knative.dev/configuration";
/// Label naming the Revision a Deployment was created for
pub const REVISION_LABEL: &str = "serving.knative.dev/revision";

/// Resource kinds the topology engine knows how to traverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnativeKind {
    // Knative Serving resources
    Service,
    Configuration,
    Revision,
    Route,
    // Workloads created for a Revision
    Deployment,
}

impl KnativeKind {
    /// Get the kind name as it appears in `kind:`
    pub fn as_str(&self) -> &'static str {
        match self {
            KnativeKind::Service => "Service",
            KnativeKind::Configuration => "Configuration",
            KnativeKind::Revision => "Revision",
            KnativeKind::Route => "Route",
            KnativeKind::Deployment => "Deployment",
        }
    }

    /// The `apiVersion` objects of this kind are fetched with
    pub fn api_version(&self) -> &'static str {
        match self {
            KnativeKind::Deployment => "apps/v1",
            _ => "serving.knative.dev/v1",
        }
    }

    /// Whether this kind belongs to the Knative Serving family
    pub fn is_serving(&self) -> bool {
        !matches!(self, KnativeKind::Deployment)
    }

    /// Recognize a kind from its `kind` and `apiVersion`
    ///
    /// `Service` is ambiguous with the core v1 Service, so the group is
    /// checked for the serving kinds.
    pub fn from_type(api_version: &str, kind: &str) -> Option<Self> {
        let parsed: Self = kind.parse().ok()?;
        let group = api_version.split_once('/').map(|(group, _)| group);
        match parsed {
            KnativeKind::Deployment if group == Some("apps") => Some(parsed),
            KnativeKind::Deployment => None,
            _ if group == Some(SERVING_GROUP) => Some(parsed),
            _ => None,
        }
    }

    /// Try to parse a string (case-insensitive, with short aliases)
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "service" | "services" | "ksvc" | "kservice" => Some(KnativeKind::Service),
            "configuration" | "configurations" | "config" | "cfg" => {
                Some(KnativeKind::Configuration)
            }
            "revision" | "revisions" | "rev" => Some(KnativeKind::Revision),
            "route" | "routes" | "rt" => Some(KnativeKind::Route),
            "deployment" | "deployments" | "deploy" => Some(KnativeKind::Deployment),
            _ => None,
        }
    }
}

impl fmt::Display for KnativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KnativeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Service" => Ok(KnativeKind::Service),
            "Configuration" => Ok(KnativeKind::Configuration),
            "Revision" => Ok(KnativeKind::Revision),
            "Route" => Ok(KnativeKind::Route),
            "Deployment" => Ok(KnativeKind::Deployment),
            _ => Err(format!("Unknown Knative resource kind: {}", s)),
        }
    }
}
