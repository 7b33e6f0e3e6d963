use bonfire_graph::{compute_weights, sample_graph, GraphData, GraphEdge, GraphNode, NodeGroup};
use bonfire_layout::{
    arc_layout, compute_layout, force_layout, matrix_layout, ring_layout, tree_layout,
    ForceConfig, ForceSimulation, LayoutContext, LayoutOutput, RotationClock,
};
use bonfire_protocol::{
    CloudSettings, ForceSettings, HeatmapSettings, TreeSettings, ViewMode, ViewSettings,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::f64::consts::TAU;
use std::time::Duration;

fn make_chain(ids: &[&str]) -> GraphData {
    let nodes = ids
        .iter()
        .map(|id| GraphNode::new(*id, *id, NodeGroup::Unknown))
        .collect();
    let edges = ids.windows(2).map(|w| GraphEdge::new(w[0], w[1])).collect();
    GraphData::new(nodes, edges)
}

#[test]
fn test_ring_layout_single_center_and_full_coverage() {
    let graph = sample_graph();
    let nodes = compute_weights(&graph, &[]);

    for selected in [None, Some("tag:federation"), Some("actor:3")] {
        let ctx = LayoutContext::new().with_selection(selected);
        let layout = ring_layout(&nodes, &graph.edges, &ctx, &CloudSettings::default());
        assert_eq!(layout.items.len(), nodes.len());
        assert_eq!(layout.items.iter().filter(|i| i.ring == 0).count(), 1);

        let ids: HashSet<&str> = layout.items.iter().map(|i| i.node_id.as_str()).collect();
        assert_eq!(ids.len(), nodes.len());
        if let Some(id) = selected {
            assert_eq!(layout.focal().map(|f| f.node_id.as_str()), Some(id));
        }
    }
}

#[test]
fn test_ring_layout_with_group_filter() {
    let graph = sample_graph();
    let nodes = compute_weights(&graph, &[NodeGroup::Tag]);
    let layout = ring_layout(
        &nodes,
        &graph.edges,
        &LayoutContext::new(),
        &CloudSettings::default(),
    );
    assert_eq!(layout.items.len(), 6);
    assert_eq!(layout.focal().unwrap().node_id, "tag:governance");
}

#[test]
fn test_matrix_is_symmetric_adjacency() {
    let graph = sample_graph();
    let nodes = compute_weights(&graph, &[]);
    let layout = matrix_layout(
        &nodes,
        &graph.edges,
        &LayoutContext::new(),
        &HeatmapSettings::default(),
    );
    let n = layout.len();
    let filled = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| layout.is_connected(i, j))
        .count();
    // every sample edge joins two distinct nodes, filled once per direction
    assert_eq!(filled, 2 * graph.edges.len());
}

#[test]
fn test_arc_sweeps_close_the_circle() {
    let nodes = compute_weights(&sample_graph(), &[]);
    let layout = arc_layout(&nodes, &LayoutContext::new());
    let total: f64 = layout.node_arcs.iter().map(|a| a.sweep()).sum::<f64>()
        + 0.01 * layout.node_arcs.len() as f64;
    assert!((total - TAU).abs() < 1e-9);
}

#[test]
fn test_tree_levels_on_chain() {
    let graph = make_chain(&["a", "b", "c", "d"]);
    let nodes = compute_weights(&graph, &[]);
    let ctx = LayoutContext::new().with_selection(Some("a"));
    let layout = tree_layout(&nodes, &graph.edges, &ctx, &TreeSettings::default());
    let levels: Vec<usize> = ["a", "b", "c", "d"]
        .iter()
        .filter_map(|id| layout.level_of(id))
        .collect();
    assert_eq!(levels, vec![0, 1, 2, 3]);
}

#[test]
fn test_seeded_force_layout_is_deterministic() {
    let graph = sample_graph();
    let nodes = compute_weights(&graph, &[]);
    let ctx = LayoutContext::new().with_seed(11);
    let a = force_layout(&nodes, &graph.edges, &ctx, &ForceSettings::default());
    let b = force_layout(&nodes, &graph.edges, &ctx, &ForceSettings::default());
    assert_eq!(a, b);
    assert_eq!(a.links.len(), graph.edges.len());
}

#[test]
fn test_drag_pins_node_and_release_frees_it() {
    let graph = make_chain(&["a", "b", "c"]);
    let nodes = compute_weights(&graph, &[]);
    let ctx = LayoutContext::new().with_seed(2);
    let config = ForceConfig::from_settings(&ForceSettings::default(), &ctx);
    let mut sim = ForceSimulation::new(&nodes, &graph.edges, config);
    sim.settle();
    assert!(sim.alpha() < 0.01);

    assert!(sim.drag_to("a", 10.0, 20.0));
    assert!(sim.alpha() >= 0.3 - 1e-12);
    sim.relax(25);
    assert_eq!(sim.position("a"), Some((10.0, 20.0)));

    assert!(sim.release("a"));
    sim.settle();
    assert!(!sim.is_pinned("a"));
}

#[test]
fn test_rotation_offsets_ring_start() {
    let graph = make_chain(&["hub", "x", "y"]);
    let nodes = compute_weights(&graph, &[]);
    let mut clock = RotationClock::new(0.5);
    clock.advance(Duration::from_secs(1));

    let settings = ViewSettings::default();
    let still = compute_layout(
        ViewMode::Cloud,
        &nodes,
        &graph.edges,
        &LayoutContext::new(),
        &settings,
    );
    let spun = compute_layout(
        ViewMode::Cloud,
        &nodes,
        &graph.edges,
        &LayoutContext::new().with_rotation(clock.offset()),
        &settings,
    );
    assert!(matches!(still, LayoutOutput::Ring(_)));
    let focal = still.items().iter().find(|i| i.ring == 0).unwrap();
    assert_eq!(spun.item(&focal.node_id), Some(focal));
    assert_ne!(still.items()[1], spun.items()[1]);
}
