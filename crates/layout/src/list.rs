use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{max_weight, NodeGroup, WeightedNode};
use serde::Serialize;

pub const ROW_HEIGHT: f64 = 32.0;
/// Narrowest bar, as a percentage of the full row
pub const MIN_BAR_PERCENT: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub node_id: String,
    pub label: String,
    pub group: NodeGroup,
    pub weight: u32,
    pub bar_percent: f64,
    pub selected: bool,
}

/// Ranked rows in weight order; `size` on each item is the bar percentage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLayout {
    pub rows: Vec<ListRow>,
    pub items: Vec<LayoutItem>,
}

#[must_use]
pub fn bar_percent(weight: u32, max_weight: u32) -> f64 {
    let max = f64::from(max_weight.max(1));
    (f64::from(weight) / max * 100.0).max(MIN_BAR_PERCENT)
}

#[must_use]
pub fn list_layout(nodes: &[WeightedNode], ctx: &LayoutContext<'_>) -> ListLayout {
    let max_w = max_weight(nodes);
    let mut layout = ListLayout::default();
    for (row, node) in nodes.iter().enumerate() {
        let percent = bar_percent(node.weight, max_w);
        layout.items.push(LayoutItem::new(
            node.id(),
            0.0,
            row as f64 * ROW_HEIGHT,
            percent,
            row,
        ));
        layout.rows.push(ListRow {
            node_id: node.id().to_string(),
            label: node.label().to_string(),
            group: node.group(),
            weight: node.weight,
            bar_percent: percent,
            selected: ctx.selected == Some(node.id()),
        });
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::{compute_weights, sample_graph};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bar_width_scales_with_floor() {
        assert!((bar_percent(4, 4) - 100.0).abs() < f64::EPSILON);
        assert!((bar_percent(2, 4) - 50.0).abs() < f64::EPSILON);
        assert!((bar_percent(0, 4) - MIN_BAR_PERCENT).abs() < f64::EPSILON);
        assert!((bar_percent(0, 0) - MIN_BAR_PERCENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rows_follow_weight_order() {
        let nodes = compute_weights(&sample_graph(), &[]);
        let ctx = LayoutContext::new().with_selection(Some("actor:1"));
        let layout = list_layout(&nodes, &ctx);

        assert_eq!(layout.rows.len(), nodes.len());
        assert_eq!(layout.rows[0].node_id, "activity:101");
        assert!(layout.rows.windows(2).all(|w| w[0].weight >= w[1].weight));
        let selected: Vec<&str> = layout
            .rows
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.node_id.as_str())
            .collect();
        assert_eq!(selected, vec!["actor:1"]);
        assert_eq!(layout.items[3].ring, 3);
        assert!((layout.items[3].y - 3.0 * ROW_HEIGHT).abs() < f64::EPSILON);
    }
}
