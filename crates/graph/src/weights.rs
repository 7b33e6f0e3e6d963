use crate::types::{GraphData, NodeGroup, WeightedNode};
use std::collections::HashMap;

/// Degree-weight every node admitted by `filter`.
///
/// An empty filter admits every group. Edges are counted from both ends and
/// only toward admitted nodes; edges to excluded nodes still count for the
/// admitted endpoint. The result is sorted by weight descending and keeps the
/// input order among equal weights.
#[must_use]
pub fn compute_weights(graph: &GraphData, filter: &[NodeGroup]) -> Vec<WeightedNode> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut weighted: Vec<WeightedNode> = Vec::new();

    for node in &graph.nodes {
        if !filter.is_empty() && !filter.contains(&node.group) {
            continue;
        }
        if slots.contains_key(node.id.as_str()) {
            continue;
        }
        slots.insert(node.id.as_str(), weighted.len());
        weighted.push(WeightedNode {
            node: node.clone(),
            weight: 0,
        });
    }

    for edge in &graph.edges {
        if let Some(&slot) = slots.get(edge.source.as_str()) {
            weighted[slot].weight += 1;
        }
        if let Some(&slot) = slots.get(edge.target.as_str()) {
            weighted[slot].weight += 1;
        }
    }

    // `sort_by` is stable, which keeps upstream order on ties
    weighted.sort_by(|a, b| b.weight.cmp(&a.weight));
    weighted
}

/// Largest weight in a list, 0 when empty
#[must_use]
pub fn max_weight(nodes: &[WeightedNode]) -> u32 {
    nodes.iter().map(|n| n.weight).max().unwrap_or(0)
}

/// Linear interpolation of `weight / max_weight` into `min..=max`.
///
/// Falls back to `min` when no node carries weight.
#[must_use]
pub fn scale_by_weight(weight: u32, max_weight: u32, min: f64, max: f64) -> f64 {
    if max_weight == 0 {
        return min;
    }
    min + (f64::from(weight) / f64::from(max_weight)) * (max - min)
}
