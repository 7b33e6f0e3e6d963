use crate::types::{polar, LayoutContext, LayoutItem, TOP};
use bonfire_graph::{NodeGroup, WeightedNode};
use serde::Serialize;
use std::f64::consts::TAU;

pub const DEFAULT_CANVAS: f64 = 500.0;
/// Angular gap between consecutive arcs, in radians
pub const GAP: f64 = 0.01;
pub const OUTER_RADIUS: f64 = 220.0;
pub const OUTER_INNER_RADIUS: f64 = 160.0;
pub const INNER_RADIUS: f64 = 150.0;
pub const INNER_INNER_RADIUS: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeArc {
    pub node_id: String,
    pub group: NodeGroup,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl NodeArc {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupArc {
    pub group: NodeGroup,
    pub start_angle: f64,
    pub end_angle: f64,
    pub total_weight: f64,
}

impl GroupArc {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Two concentric donuts: one arc per node outside, one per group inside.
///
/// Angles start at 12 o'clock and grow clockwise on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcLayout {
    pub node_arcs: Vec<NodeArc>,
    pub group_arcs: Vec<GroupArc>,
    /// Label anchors at each node arc's mid angle; `size` is the sweep
    pub items: Vec<LayoutItem>,
}

fn arc_value(node: &WeightedNode) -> f64 {
    f64::from(node.weight.max(1))
}

/// [`GAP`], shrunk so the gaps never take more than half the circle
fn gap_for(count: usize) -> f64 {
    GAP.min(TAU / (2.0 * count.max(1) as f64))
}

#[must_use]
pub fn arc_layout(nodes: &[WeightedNode], ctx: &LayoutContext<'_>) -> ArcLayout {
    let total: f64 = nodes.iter().map(arc_value).sum();
    if total <= 0.0 {
        return ArcLayout::default();
    }
    let center = ctx.canvas_or(DEFAULT_CANVAS) / 2.0;
    let label_radius = (OUTER_RADIUS + OUTER_INNER_RADIUS) / 2.0;

    let gap = gap_for(nodes.len());
    let available = TAU - gap * nodes.len() as f64;
    let mut angle = TOP;
    let mut node_arcs = Vec::with_capacity(nodes.len());
    let mut items = Vec::with_capacity(nodes.len());
    for node in nodes {
        let sweep = arc_value(node) / total * available;
        let arc = NodeArc {
            node_id: node.id().to_string(),
            group: node.group(),
            start_angle: angle,
            end_angle: angle + sweep,
        };
        let (x, y) = polar(center, center, label_radius, arc.mid_angle());
        items.push(LayoutItem::new(node.id(), x, y, sweep, 0));
        node_arcs.push(arc);
        angle += sweep + gap;
    }

    let totals: Vec<(NodeGroup, f64)> = NodeGroup::ORDERED
        .iter()
        .map(|&g| {
            let w = nodes
                .iter()
                .filter(|n| n.group() == g)
                .map(arc_value)
                .sum::<f64>();
            (g, w)
        })
        .filter(|(_, w)| *w > 0.0)
        .collect();
    let gap = gap_for(totals.len());
    let available = TAU - gap * totals.len() as f64;
    let mut angle = TOP;
    let group_arcs = totals
        .into_iter()
        .map(|(group, w)| {
            let sweep = w / total * available;
            let arc = GroupArc {
                group,
                start_angle: angle,
                end_angle: angle + sweep,
                total_weight: w,
            };
            angle += sweep + gap;
            arc
        })
        .collect();

    ArcLayout {
        node_arcs,
        group_arcs,
        items,
    }
}
