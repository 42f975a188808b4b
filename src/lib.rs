//! Knative topology library
//!
//! Builds topology graphs and condition-based health summaries for Knative
//! resource hierarchies. Used by the `kntopo` binary and directly by tests.

pub mod cli;
pub mod config;
pub mod context;
pub mod duck;
pub mod kube;
pub mod links;
pub mod models;
pub mod status;
pub mod topology;

// Re-export commonly used types for convenience
pub use context::RenderContext;
pub use duck::{StoredVersion, list_source_types, resolve_stored_versions};
pub use links::{LinkResolver, MalformedReference, OverviewPathResolver, PathResolver};
pub use models::{ResourceReference, ResourceSummary};
pub use status::{Condition, ConditionStatus, Conditions, StatusCode};
pub use topology::{Graph, GraphBuilder, Relation, build_topology};
