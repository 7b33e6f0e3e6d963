use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{GraphEdge, NodeGroup, WeightedNode};
use bonfire_protocol::HeatmapSettings;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_CANVAS: f64 = 600.0;

/// Square adjacency grid of the heaviest nodes, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixLayout {
    /// One item per row; `x`/`y` is the diagonal cell center, `ring` the row
    pub items: Vec<LayoutItem>,
    pub groups: Vec<NodeGroup>,
    /// `cells[i][j]` is set when rows `i` and `j` share an edge
    pub cells: Vec<Vec<bool>>,
    pub cell_size: f64,
    pub label_margin: f64,
    /// Offsets (both axes) where the group changes between rows
    pub boundaries: Vec<f64>,
}

impl MatrixLayout {
    #[must_use]
    pub fn is_connected(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[must_use]
pub fn matrix_layout(
    nodes: &[WeightedNode],
    edges: &[GraphEdge],
    ctx: &LayoutContext<'_>,
    settings: &HeatmapSettings,
) -> MatrixLayout {
    let margin = settings.label_margin;
    if nodes.is_empty() || settings.max_nodes == 0 {
        return MatrixLayout {
            label_margin: margin,
            ..MatrixLayout::default()
        };
    }

    let mut top: Vec<&WeightedNode> = nodes.iter().collect();
    top.sort_by(|a, b| b.weight.cmp(&a.weight));
    top.truncate(settings.max_nodes);
    top.sort_by(|a, b| {
        a.group()
            .order()
            .cmp(&b.group().order())
            .then_with(|| b.weight.cmp(&a.weight))
    });

    let n = top.len();
    let row_of: HashMap<&str, usize> = top
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect();

    let mut cells = vec![vec![false; n]; n];
    for edge in edges {
        let source = row_of.get(edge.source.as_str());
        let target = row_of.get(edge.target.as_str());
        if let (Some(&i), Some(&j)) = (source, target) {
            if i != j {
                cells[i][j] = true;
                cells[j][i] = true;
            }
        }
    }

    let cell_size = (ctx.canvas_or(DEFAULT_CANVAS) - margin) / n as f64;
    let items = top
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let center = margin + (i as f64 + 0.5) * cell_size;
            LayoutItem::new(node.id(), center, center, cell_size, i)
        })
        .collect();
    let groups: Vec<NodeGroup> = top.iter().map(|n| n.group()).collect();
    let boundaries = groups
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| margin + (i + 1) as f64 * cell_size)
        .collect();

    MatrixLayout {
        items,
        groups,
        cells,
        cell_size,
        label_margin: margin,
        boundaries,
    }
}
