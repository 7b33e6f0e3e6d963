//! Tests for weighting and neighborhoods over the sample graph

use bonfire_graph::{
    compute_weights, neighbor_at, neighbors, sample_graph, GraphData, GraphEdge, GraphNode,
    NeighborIndex, NodeGroup,
};
use pretty_assertions::assert_eq;

fn make_node(id: &str, group: NodeGroup) -> GraphNode {
    GraphNode::new(id, id.to_uppercase(), group)
}

fn make_graph(ids: &[&str], edges: &[(&str, &str)]) -> GraphData {
    GraphData::new(
        ids.iter().map(|id| make_node(id, NodeGroup::Unknown)).collect(),
        edges.iter().map(|(s, t)| GraphEdge::new(*s, *t)).collect(),
    )
}

#[test]
fn test_sample_weights_cover_every_node() {
    let weighted = compute_weights(&sample_graph(), &[]);

    assert_eq!(weighted.len(), 18);
    assert_eq!(weighted[0].group(), NodeGroup::Activity);
    assert_eq!(weighted[0].id(), "activity:101");
    assert_eq!(weighted[0].weight, 4);
}

#[test]
fn test_sample_weights_sorted_descending() {
    let weighted = compute_weights(&sample_graph(), &[]);
    assert!(weighted.windows(2).all(|w| w[0].weight >= w[1].weight));
}

#[test]
fn test_sample_group_filter() {
    let graph = sample_graph();

    let tags = compute_weights(&graph, &[NodeGroup::Tag]);
    assert_eq!(tags.len(), 6);
    assert_eq!(tags[0].id(), "tag:governance");
    assert_eq!(tags[0].weight, 3);

    let actors = compute_weights(&graph, &[NodeGroup::Actor]);
    assert!(actors.iter().all(|n| n.weight == 2));
    let order: Vec<&str> = actors.iter().map(|n| n.id()).collect();
    assert_eq!(order, vec!["actor:1", "actor:2", "actor:3", "actor:4"]);
}

#[test]
fn test_neighbors_symmetric_on_sample() {
    let graph = sample_graph();
    for node in &graph.nodes {
        let around = neighbors(&graph, &node.id);
        assert!(!around.contains(&node.id));
        for other in &around {
            assert!(
                neighbors(&graph, other).contains(&node.id),
                "{other} should list {}",
                node.id
            );
        }
    }
}

#[test]
fn test_neighbors_first_seen_order() {
    let graph = sample_graph();
    assert_eq!(
        neighbors(&graph, "activity:101"),
        vec![
            "actor:1",
            "activity:102",
            "tag:governance",
            "tag:federation"
        ]
    );
}

#[test]
fn test_neighbor_cycle_visits_all() {
    let graph = make_graph(&["a", "b", "c"], &[("a", "b"), ("c", "a")]);

    let mut cursor = 0;
    let mut visited = Vec::new();
    for _ in 0..4 {
        let step = neighbor_at(&graph, "a", cursor).unwrap();
        visited.push(step.neighbor_id);
        cursor = step.next_cursor;
    }
    assert_eq!(visited, vec!["b", "c", "b", "c"]);
}

#[test]
fn test_index_on_sample() {
    let graph = sample_graph();
    let index = NeighborIndex::build(&graph);
    assert_eq!(index.degree("tag:governance"), 3);
    assert!(index.are_adjacent("tag:ux", "activity:107"));
    assert!(index.neighbors("missing").is_empty());
}

#[test]
fn test_group_names_parse() {
    assert_eq!("Actor".parse::<NodeGroup>(), Ok(NodeGroup::Actor));
    assert_eq!(" tag ".parse::<NodeGroup>(), Ok(NodeGroup::Tag));
    assert!("person".parse::<NodeGroup>().is_err());
}
