//! Incremental graph construction
//!
//! Traversal code feeds already-fetched objects into a [`GraphBuilder`]
//! while it walks ownership and reference relationships. Node insertion is
//! idempotent on UID and the first insertion wins, so callers add the
//! richest representation of an object first.

use crate::links::{LinkResolver, MalformedReference};
use crate::models::{CONFIGURATION_LABEL, KnativeKind, ResourceReference, ResourceSummary};
use crate::topology::graph::{Detail, Edge, Graph, Link, Node, Relation};
use std::collections::BTreeMap;

/// Name used for a parent context whose label is missing
///
/// Produces a syntactically valid path that does not resolve.
pub const UNKNOWN_PARENT: &str = "_";

/// Accumulates nodes and edges for one render
#[derive(Debug)]
pub struct GraphBuilder {
    links: LinkResolver,
    selected: String,
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<String, Vec<Edge>>,
}

impl GraphBuilder {
    /// Start a graph whose selected node is `root`
    ///
    /// The root is not inserted; traversal adds it like any other object.
    pub fn new(links: LinkResolver, root: &ResourceSummary) -> Self {
        Self {
            links,
            selected: node_key(root),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Insert a node for `obj` unless one exists; returns its key
    pub fn add_node(&mut self, obj: &ResourceSummary) -> Result<String, MalformedReference> {
        let key = node_key(obj);
        if self.nodes.contains_key(&key) {
            return Ok(key);
        }

        let context = parent_context(obj);
        let path = self.links.resolve(obj.reference(), context.as_ref())?;

        let ready = obj.conditions().ready();
        let mut details = vec![Detail::Status {
            code: ready.status_code(),
            text: ready.status_text(),
        }];
        if let Some(created) = obj.created() {
            details.push(Detail::Timestamp {
                label: "Created".to_string(),
                time: created,
            });
        }

        tracing::debug!("Adding node {} {} ({})", obj.kind(), obj.name(), key);
        self.nodes.insert(
            key.clone(),
            Node {
                name: obj.name().to_string(),
                api_version: obj.api_version().to_string(),
                kind: obj.kind().to_string(),
                status: ready.status_code(),
                details,
                path: Link {
                    text: obj.name().to_string(),
                    path,
                },
            },
        );
        Ok(key)
    }

    /// Add an edge, inserting both endpoints first
    pub fn add_edge(
        &mut self,
        from: &ResourceSummary,
        to: &ResourceSummary,
        relation: Relation,
    ) -> Result<(), MalformedReference> {
        let from_key = self.add_node(from)?;
        let to_key = self.add_node(to)?;
        self.edges.entry(from_key).or_default().push(Edge {
            node: to_key,
            edge: relation,
        });
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finish the graph
    pub fn to_graph(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            selected: self.selected,
        }
    }
}

/// Identity of an object in the graph
pub fn node_key(obj: &ResourceSummary) -> String {
    obj.uid().to_string()
}

/// Addressing context for kinds nested under a parent
///
/// Revisions are addressed under their Configuration, named by the
/// configuration label.
fn parent_context(obj: &ResourceSummary) -> Option<ResourceReference> {
    match obj.known_kind()? {
        KnativeKind::Revision => {
            let name = obj.label(CONFIGURATION_LABEL).unwrap_or(UNKNOWN_PARENT);
            Some(
                ResourceReference::new(obj.api_version(), KnativeKind::Configuration.as_str())
                    .with_name(name),
            )
        }
        _ => None,
    }
}
