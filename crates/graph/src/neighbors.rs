use crate::types::{GraphData, GraphEdge};
use std::collections::{HashMap, HashSet};

/// Ids adjacent to `node_id` through any edge, in first-seen edge order.
///
/// Duplicates and self-loops are dropped. Unknown ids yield an empty list.
#[must_use]
pub fn neighbors(graph: &GraphData, node_id: &str) -> Vec<String> {
    edge_neighbors(&graph.edges, node_id)
}

/// [`neighbors`] over a bare edge list
#[must_use]
pub fn edge_neighbors(edges: &[GraphEdge], node_id: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for edge in edges {
        let other = if edge.source == node_id {
            edge.target.as_str()
        } else if edge.target == node_id {
            edge.source.as_str()
        } else {
            continue;
        };
        if other != node_id && seen.insert(other) {
            out.push(other.to_string());
        }
    }

    out
}

/// One step of a neighbor cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborStep {
    pub neighbor_id: String,
    pub next_cursor: usize,
}

/// Neighbor at `cursor` (wrapping), plus the cursor for the following step.
///
/// Returns `None` when the node has no neighbors.
#[must_use]
pub fn neighbor_at(graph: &GraphData, node_id: &str, cursor: usize) -> Option<NeighborStep> {
    let list = neighbors(graph, node_id);
    if list.is_empty() {
        return None;
    }
    let idx = cursor % list.len();
    Some(NeighborStep {
        neighbor_id: list[idx].clone(),
        next_cursor: idx + 1,
    })
}

/// Precomputed adjacency for repeated lookups over a fixed graph
#[derive(Debug, Clone, Default)]
pub struct NeighborIndex {
    adjacency: HashMap<String, Vec<String>>,
}

impl NeighborIndex {
    #[must_use]
    pub fn build(graph: &GraphData) -> Self {
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for edge in &graph.edges {
            let (a, b) = (edge.source.as_str(), edge.target.as_str());
            if a == b {
                continue;
            }
            if seen.insert((a, b)) {
                adjacency.entry(a.to_string()).or_default().push(b.to_string());
            }
            if seen.insert((b, a)) {
                adjacency.entry(b.to_string()).or_default().push(a.to_string());
            }
        }

        Self { adjacency }
    }

    #[must_use]
    pub fn neighbors(&self, node_id: &str) -> &[String] {
        self.adjacency.get(node_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).iter().any(|n| n == b)
    }

    #[must_use]
    pub fn degree(&self, node_id: &str) -> usize {
        self.neighbors(node_id).len()
    }
}
