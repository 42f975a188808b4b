//! Graph data structures handed to the rendering layer
//!
//! Nodes are keyed by the object's UID so one object reached along
//! several traversal paths is a single node. Edges are kept per source
//! node, in insertion order.

use crate::status::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A navigable link to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    #[serde(rename = "ref")]
    pub path: String,
}

/// A detail line shown on a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Detail {
    /// Synthesized condition status
    Status { code: StatusCode, text: String },
    /// Plain text
    Text { text: String },
    /// A labelled point in time (e.g. creation)
    Timestamp { label: String, time: DateTime<Utc> },
}

impl Detail {
    pub fn text(&self) -> String {
        match self {
            Detail::Status { text, .. } | Detail::Text { text } => text.clone(),
            Detail::Timestamp { label, time } => format!("{} {}", label, time.to_rfc3339()),
        }
    }
}

/// A node in the topology graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub api_version: String,
    pub kind: String,
    pub status: StatusCode,
    pub details: Vec<Detail>,
    pub path: Link,
}

/// How an edge's reference is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Declared directly by the source object (owner or spec reference)
    Explicit,
    /// Inferred by convention (e.g. a latest revision known only by name)
    Implicit,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Explicit => "explicit",
            Relation::Implicit => "implicit",
        }
    }
}

/// An edge from a source node to `node`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub node: String,
    pub edge: Relation,
}

/// A finished topology graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: BTreeMap<String, Node>,
    pub edges: BTreeMap<String, Vec<Edge>>,
    pub selected: String,
}

impl Graph {
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Outgoing edges of a node
    pub fn edges_from(&self, key: &str) -> &[Edge] {
        self.edges.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Keys of nodes with an edge pointing at `key`
    pub fn referrers<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (&'a str, Relation)> + 'a {
        self.edges.iter().flat_map(move |(from, edges)| {
            edges
                .iter()
                .filter(move |e| e.node == key)
                .map(move |e| (from.as_str(), e.edge))
        })
    }
}
