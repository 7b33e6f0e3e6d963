//! Concentric ring placement around a focal node.
//!
//! ```text
//!        ring 2  ·  ·  ·
//!      ring 1  ·  ·  ·  ·
//!            [ focal ]
//! ```
//!
//! Rings are filled greedily by estimated label width, so short labels pack
//! tighter than long ones.

use crate::types::{polar, LayoutContext, LayoutItem, TOP};
use bonfire_graph::{edge_neighbors, max_weight, scale_by_weight, GraphEdge, WeightedNode};
use bonfire_protocol::CloudSettings;
use serde::Serialize;
use std::collections::HashSet;
use std::f64::consts::TAU;

pub const DEFAULT_CANVAS: f64 = 600.0;
/// Radius of the first ring
pub const BASE_RADIUS: f64 = 70.0;
/// Distance between consecutive rings
pub const RING_GAP: f64 = 65.0;
/// Spacing added to every label's arc
pub const MIN_ARC_GAP: f64 = 12.0;
/// Average glyph width as a fraction of font size
pub const CHAR_WIDTH: f64 = 0.55;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingLayout {
    /// Focal item first, then ring by ring
    pub items: Vec<LayoutItem>,
    /// Number of rings around the focal node
    pub ring_count: usize,
}

impl RingLayout {
    #[must_use]
    pub fn focal(&self) -> Option<&LayoutItem> {
        self.items.first()
    }
}

/// Arc length a label occupies at `font` size
#[must_use]
pub fn label_arc(label: &str, font: f64) -> f64 {
    label.chars().count() as f64 * font * CHAR_WIDTH + MIN_ARC_GAP
}

#[must_use]
pub fn ring_radius(ring: usize) -> f64 {
    BASE_RADIUS + ring.saturating_sub(1) as f64 * RING_GAP
}

#[must_use]
pub fn ring_layout(
    nodes: &[WeightedNode],
    edges: &[GraphEdge],
    ctx: &LayoutContext<'_>,
    settings: &CloudSettings,
) -> RingLayout {
    if nodes.is_empty() {
        return RingLayout::default();
    }

    let max_w = max_weight(nodes);
    let font = |n: &WeightedNode| {
        scale_by_weight(n.weight, max_w, settings.min_font, settings.max_font)
    };
    let center = ctx.canvas_or(DEFAULT_CANVAS) / 2.0;

    let focal_idx = pick_focal(nodes, ctx.selected);
    let focal = &nodes[focal_idx];

    let adjacent: HashSet<String> = edge_neighbors(edges, focal.id()).into_iter().collect();
    let (mut near, mut far): (Vec<&WeightedNode>, Vec<&WeightedNode>) = nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != focal_idx)
        .map(|(_, n)| n)
        .partition(|n| adjacent.contains(n.id()));
    near.sort_by(|a, b| b.weight.cmp(&a.weight));
    far.sort_by(|a, b| b.weight.cmp(&a.weight));
    let remaining: Vec<&WeightedNode> = near.into_iter().chain(far).collect();

    let mut items = Vec::with_capacity(nodes.len());
    items.push(LayoutItem::new(focal.id(), center, center, font(focal), 0));

    let mut ring_count = 0;
    let mut cursor = 0;
    while cursor < remaining.len() {
        let ring = ring_count + 1;
        let radius = ring_radius(ring);
        let circumference = TAU * radius;

        let mut used = 0.0;
        let mut members: Vec<(&WeightedNode, f64)> = Vec::new();
        while let Some(&node) = remaining.get(cursor) {
            let arc = label_arc(node.label(), font(node));
            if !members.is_empty() && used + arc > circumference {
                break;
            }
            members.push((node, arc));
            used += arc;
            cursor += 1;
        }

        members.sort_by_key(|(n, _)| n.group().order());
        let padding = (circumference - used).max(0.0) / members.len() as f64;

        let mut angle = TOP + ctx.rotation;
        for (node, arc) in members {
            let half = (arc + padding) / 2.0;
            let mid = angle + half / radius;
            let (x, y) = polar(center, center, radius, mid);
            items.push(LayoutItem::new(node.id(), x, y, font(node), ring));
            angle = mid + half / radius;
        }

        ring_count = ring;
    }

    RingLayout { items, ring_count }
}

/// Selected node if present, else the first node of highest weight
/// Index of the selected node when present, else of the heaviest one
pub(crate) fn pick_focal(nodes: &[WeightedNode], selected: Option<&str>) -> usize {
    if let Some(idx) = selected.and_then(|id| nodes.iter().position(|n| n.id() == id)) {
        return idx;
    }
    let mut best = 0;
    for (idx, node) in nodes.iter().enumerate() {
        if node.weight > nodes[best].weight {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::{compute_weights, sample_graph, GraphData, GraphNode, NodeGroup};
    use pretty_assertions::assert_eq;

    fn layout_default(nodes: &[WeightedNode], graph: &GraphData) -> RingLayout {
        ring_layout(nodes, &graph.edges, &LayoutContext::new(), &CloudSettings::default())
    }

    fn single() -> GraphData {
        GraphData::new(vec![GraphNode::new("solo", "solo", NodeGroup::Tag)], Vec::new())
    }

    #[test]
    fn test_one_node_has_no_rings() {
        let graph = single();
        let nodes = compute_weights(&graph, &[]);
        let layout = layout_default(&nodes, &graph);
        assert_eq!(layout.items.len(), 1);
        assert_eq!(layout.ring_count, 0);
        let focal = layout.focal().unwrap();
        assert_eq!((focal.x, focal.y, focal.ring), (300.0, 300.0, 0));
        assert!((focal.size - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_every_node_placed_once() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let layout = layout_default(&nodes, &graph);

        assert_eq!(layout.items.len(), nodes.len());
        assert_eq!(layout.items.iter().filter(|i| i.ring == 0).count(), 1);
        let ids: HashSet<&str> = layout.items.iter().map(|i| i.node_id.as_str()).collect();
        assert_eq!(ids.len(), nodes.len());
        assert!(layout.ring_count >= 1);
        for item in layout.items.iter().filter(|i| i.ring > 0) {
            let r = item.distance_to(300.0, 300.0);
            assert!((r - ring_radius(item.ring)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_selection_becomes_focal_and_neighbors_ring_first() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let ctx = LayoutContext::new().with_selection(Some("tag:ux"));
        let layout = ring_layout(&nodes, &graph.edges, &ctx, &CloudSettings::default());

        assert_eq!(layout.focal().unwrap().node_id, "tag:ux");
        let ring_one: Vec<&str> = layout
            .items
            .iter()
            .filter(|i| i.ring == 1)
            .map(|i| i.node_id.as_str())
            .collect();
        assert!(ring_one.contains(&"activity:103"));
        assert!(ring_one.contains(&"activity:107"));
    }

    #[test]
    fn test_unknown_selection_falls_back_to_heaviest() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let ctx = LayoutContext::new().with_selection(Some("nope"));
        let layout = ring_layout(&nodes, &graph.edges, &ctx, &CloudSettings::default());
        assert_eq!(layout.focal().unwrap().node_id, "activity:101");
    }

    #[test]
    fn test_rotation_shifts_start_angle() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let still = layout_default(&nodes, &graph);
        let turned = ring_layout(
            &nodes,
            &graph.edges,
            &LayoutContext::new().with_rotation(0.5),
            &CloudSettings::default(),
        );
        let a = &still.items[1];
        let b = &turned.items[1];
        assert_eq!(a.node_id, b.node_id);
        let angle_a = (a.y - 300.0).atan2(a.x - 300.0);
        let angle_b = (b.y - 300.0).atan2(b.x - 300.0);
        assert!(((angle_b - angle_a) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let layout = ring_layout(&[], &[], &LayoutContext::new(), &CloudSettings::default());
        assert!(layout.items.is_empty());
        assert_eq!(layout.ring_count, 0);
    }
}
