//! Plain-text rendering of a topology graph

use crate::topology::graph::Graph;
use std::fmt::Write;

/// Render nodes (selected first, then by kind and name) and their edges
pub fn render_text(graph: &Graph) -> String {
    let mut keys: Vec<&String> = graph.nodes.keys().collect();
    keys.sort_by_key(|key| {
        let node = &graph.nodes[*key];
        (*key != &graph.selected, node.kind.clone(), node.name.clone())
    });

    let label = |key: &str| {
        graph
            .node(key)
            .map(|n| format!("{}/{}", n.kind, n.name))
            .unwrap_or_else(|| key.to_string())
    };

    let mut out = String::new();
    for key in keys {
        let node = &graph.nodes[key];
        let marker = if key == &graph.selected { "*" } else { " " };
        let summary = node
            .details
            .first()
            .map(|d| d.text())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} {}/{} [{}] {} {}",
            marker,
            node.kind,
            node.name,
            node.status.as_str(),
            summary,
            node.path.path
        );
        for edge in graph.edges_from(key) {
            let _ = writeln!(out, "    -> {} ({})", label(&edge.node), edge.edge.as_str());
        }
    }
    out
}
