//! Single entry point mapping a view mode onto its layout algorithm.

use crate::arc::{arc_layout, ArcLayout};
use crate::force::{force_layout, ForceLayout};
use crate::list::{list_layout, ListLayout};
use crate::matrix::{matrix_layout, MatrixLayout};
use crate::pack::{pack_layout, PackLayout};
use crate::ring::{ring_layout, RingLayout};
use crate::spiral::{spiral_layout, SpiralLayout, SpiralParams};
use crate::tree::{tree_layout, TreeLayout};
use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{GraphEdge, WeightedNode};
use bonfire_protocol::{ViewConfig, ViewMode, ViewSettings};
use serde::Serialize;

/// Result of any layout, tagged by the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutOutput {
    List(ListLayout),
    Ring(RingLayout),
    /// Static spiral cloud
    WordCloud(SpiralLayout),
    /// Spiral cloud driven by the auto-play cycle
    Animated(SpiralLayout),
    Tree(TreeLayout),
    Force(ForceLayout),
    Pack(PackLayout),
    Matrix(MatrixLayout),
    Arc(ArcLayout),
}

impl LayoutOutput {
    #[must_use]
    pub fn items(&self) -> &[LayoutItem] {
        match self {
            Self::List(l) => &l.items,
            Self::Ring(l) => &l.items,
            Self::WordCloud(l) | Self::Animated(l) => &l.items,
            Self::Tree(l) => &l.items,
            Self::Force(l) => &l.items,
            Self::Pack(l) => &l.items,
            Self::Matrix(l) => &l.items,
            Self::Arc(l) => &l.items,
        }
    }

    #[must_use]
    pub fn item(&self, node_id: &str) -> Option<&LayoutItem> {
        self.items().iter().find(|i| i.node_id == node_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[must_use]
pub fn compute_layout(
    mode: ViewMode,
    nodes: &[WeightedNode],
    edges: &[GraphEdge],
    ctx: &LayoutContext<'_>,
    settings: &ViewSettings,
) -> LayoutOutput {
    log::debug!("Computing {mode} layout for {} nodes", nodes.len());
    match settings.for_mode(mode) {
        ViewConfig::List => LayoutOutput::List(list_layout(nodes, ctx)),
        ViewConfig::Cloud(s) => LayoutOutput::Ring(ring_layout(nodes, edges, ctx, s)),
        ViewConfig::WordCloud(s) => {
            LayoutOutput::WordCloud(spiral_layout(nodes, ctx, SpiralParams::from(s)))
        }
        ViewConfig::Animated(s) => {
            LayoutOutput::Animated(spiral_layout(nodes, ctx, SpiralParams::from(s)))
        }
        ViewConfig::Tree(s) => LayoutOutput::Tree(tree_layout(nodes, edges, ctx, s)),
        ViewConfig::Force(s) => LayoutOutput::Force(force_layout(nodes, edges, ctx, s)),
        ViewConfig::Bubble(s) => LayoutOutput::Pack(pack_layout(nodes, ctx, s)),
        ViewConfig::Heatmap(s) => LayoutOutput::Matrix(matrix_layout(nodes, edges, ctx, s)),
        ViewConfig::Pie => LayoutOutput::Arc(arc_layout(nodes, ctx)),
    }
}
