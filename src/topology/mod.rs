//! Topology graphs for Knative resource families
//!
//! Builds a deduplicated node/edge model around a root resource, with node
//! status synthesized from conditions and node paths from the link
//! resolver.

mod builder;
mod graph;
mod render;
mod traversal;

pub use builder::{GraphBuilder, UNKNOWN_PARENT, node_key};
pub use graph::{Detail, Edge, Graph, Link, Node, Relation};
pub use render::render_text;
pub use traversal::{TopologyError, build_topology};
