use crate::ring::pick_focal;
use crate::types::{polar, LayoutContext, LayoutItem, TOP};
use bonfire_graph::{max_weight, scale_by_weight, GraphEdge, WeightedNode};
use bonfire_protocol::TreeSettings;
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::TAU;

pub const DEFAULT_CANVAS: f64 = 550.0;
/// Upper bound on the distance between levels
pub const MAX_RING_GAP: f64 = 100.0;
/// Space kept free between the outermost ring and the canvas edge
pub const EDGE_MARGIN: f64 = 40.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    pub root: Option<String>,
    /// Items with `ring` set to their hop distance from the root
    pub items: Vec<LayoutItem>,
    /// Deepest level in use, at least 1
    pub total_levels: usize,
    pub ring_gap: f64,
}

impl TreeLayout {
    #[must_use]
    pub fn level_of(&self, node_id: &str) -> Option<usize> {
        self.items
            .iter()
            .find(|i| i.node_id == node_id)
            .map(|i| i.ring)
    }
}

/// Hop distance from `root` over the subgraph induced by `nodes`.
///
/// Nodes the root cannot reach land one level past the deepest reachable one.
#[must_use]
pub fn hop_levels(nodes: &[WeightedNode], edges: &[GraphEdge], root: usize) -> Vec<usize> {
    let mut graph: UnGraph<(), ()> = UnGraph::with_capacity(nodes.len(), edges.len());
    let handles: Vec<NodeIndex> = nodes.iter().map(|_| graph.add_node(())).collect();
    let lookup: HashMap<&str, NodeIndex> = nodes
        .iter()
        .zip(&handles)
        .map(|(n, &h)| (n.id(), h))
        .collect();

    for edge in edges {
        if let (Some(&a), Some(&b)) = (
            lookup.get(edge.source.as_str()),
            lookup.get(edge.target.as_str()),
        ) {
            if a != b {
                graph.add_edge(a, b, ());
            }
        }
    }

    let distances = dijkstra(&graph, handles[root], None, |_| 1usize);
    let deepest = distances.values().copied().max().unwrap_or(0);

    handles
        .iter()
        .map(|h| distances.get(h).copied().unwrap_or(deepest + 1))
        .collect()
}

#[must_use]
pub fn tree_layout(
    nodes: &[WeightedNode],
    edges: &[GraphEdge],
    ctx: &LayoutContext<'_>,
    settings: &TreeSettings,
) -> TreeLayout {
    if nodes.is_empty() {
        return TreeLayout::default();
    }

    let root = pick_focal(nodes, ctx.selected);
    let levels = hop_levels(nodes, edges, root);

    let center = ctx.canvas_or(DEFAULT_CANVAS) / 2.0;
    let total_levels = levels.iter().copied().max().unwrap_or(0).max(1);
    let ring_gap = MAX_RING_GAP.min((center - EDGE_MARGIN) / (total_levels + 1) as f64);
    let max_w = max_weight(nodes);

    let mut by_level: Vec<Vec<usize>> = vec![Vec::new(); total_levels + 1];
    for (idx, &level) in levels.iter().enumerate() {
        by_level[level].push(idx);
    }

    let mut items = Vec::with_capacity(nodes.len());
    for (level, members) in by_level.iter().enumerate() {
        let step = TAU / members.len().max(1) as f64;
        for (slot, &idx) in members.iter().enumerate() {
            let node = &nodes[idx];
            let size = scale_by_weight(node.weight, max_w, settings.min_radius, settings.max_radius);
            let (x, y) = if level == 0 {
                (center, center)
            } else {
                polar(center, center, ring_gap * level as f64, TOP + slot as f64 * step)
            };
            items.push(LayoutItem::new(node.id(), x, y, size, level));
        }
    }

    TreeLayout {
        root: Some(nodes[root].id().to_string()),
        items,
        total_levels,
        ring_gap,
    }
}
