use bonfire_graph::{GraphData, NeighborIndex};
use bonfire_protocol::SessionPatch;

/// Turns pointer input on a node into session patches.
#[derive(Debug, Clone)]
pub struct Interaction {
    neighbors: NeighborIndex,
}

impl Interaction {
    #[must_use]
    pub fn new(graph: &GraphData) -> Self {
        Self {
            neighbors: NeighborIndex::build(graph),
        }
    }

    #[must_use]
    pub const fn neighbors(&self) -> &NeighborIndex {
        &self.neighbors
    }

    /// Select `node_id` and highlight its neighbors
    #[must_use]
    pub fn select(&self, node_id: &str) -> SessionPatch {
        SessionPatch::select(node_id).with_highlights(self.neighbors.neighbors(node_id).to_vec())
    }

    /// Clicking the current selection again clears it
    #[must_use]
    pub fn click(&self, current: Option<&str>, clicked: &str) -> SessionPatch {
        if current == Some(clicked) {
            SessionPatch::clear_selection()
        } else {
            self.select(clicked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::sample_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_click_selects_with_neighbor_highlights() {
        let interaction = Interaction::new(&sample_graph());
        let patch = interaction.click(None, "tag:governance");
        assert_eq!(patch.selected_node_id.as_deref(), Some("tag:governance"));
        assert_eq!(
            patch.highlighted_node_ids,
            Some(vec![
                "activity:101".to_string(),
                "activity:102".to_string(),
                "activity:105".to_string(),
            ])
        );
    }

    #[test]
    fn test_click_on_selected_toggles_off() {
        let interaction = Interaction::new(&sample_graph());
        let patch = interaction.click(Some("actor:1"), "actor:1");
        assert_eq!(patch, SessionPatch::clear_selection());

        let other = interaction.click(Some("actor:1"), "actor:2");
        assert_eq!(other.selected_node_id.as_deref(), Some("actor:2"));
    }
}
