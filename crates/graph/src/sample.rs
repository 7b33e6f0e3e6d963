//! Built-in community graph used when no upstream is configured.

use crate::types::{EdgeKind, GraphData, GraphEdge, GraphNode, NodeGroup};

const ACTORS: [(&str, &str); 4] = [
    ("actor:1", "alice"),
    ("actor:2", "bob"),
    ("actor:3", "carol"),
    ("actor:4", "dave"),
];

const TAGS: [&str; 6] = [
    "governance",
    "design",
    "federation",
    "ux",
    "moderation",
    "accessibility",
];

const AUTHORED: [(&str, &str); 8] = [
    ("actor:1", "activity:101"),
    ("actor:2", "activity:102"),
    ("actor:1", "activity:103"),
    ("actor:3", "activity:104"),
    ("actor:2", "activity:105"),
    ("actor:4", "activity:106"),
    ("actor:3", "activity:107"),
    ("actor:4", "activity:108"),
];

const REPLIES: [(&str, &str); 4] = [
    ("activity:102", "activity:101"),
    ("activity:104", "activity:103"),
    ("activity:106", "activity:105"),
    ("activity:108", "activity:107"),
];

const TAGGED: [(&str, &str); 12] = [
    ("activity:101", "tag:governance"),
    ("activity:101", "tag:federation"),
    ("activity:102", "tag:governance"),
    ("activity:103", "tag:design"),
    ("activity:103", "tag:ux"),
    ("activity:104", "tag:design"),
    ("activity:105", "tag:moderation"),
    ("activity:105", "tag:governance"),
    ("activity:106", "tag:moderation"),
    ("activity:107", "tag:accessibility"),
    ("activity:107", "tag:ux"),
    ("activity:108", "tag:accessibility"),
];

/// A small discussion: 4 actors, 8 posts and replies, 6 tags.
#[must_use]
pub fn sample_graph() -> GraphData {
    let mut nodes = Vec::with_capacity(ACTORS.len() + 8 + TAGS.len());

    for (id, label) in ACTORS {
        nodes.push(GraphNode::new(id, label, NodeGroup::Actor));
    }
    for n in 101..=108 {
        let label = if n % 2 == 1 { "Post" } else { "Reply" };
        nodes.push(GraphNode::new(
            format!("activity:{n}"),
            label,
            NodeGroup::Activity,
        ));
    }
    for tag in TAGS {
        nodes.push(GraphNode::new(format!("tag:{tag}"), tag, NodeGroup::Tag));
    }

    let edges = AUTHORED
        .iter()
        .map(|(s, t)| GraphEdge::new(*s, *t).with_kind(EdgeKind::Authored))
        .chain(
            REPLIES
                .iter()
                .map(|(s, t)| GraphEdge::new(*s, *t).with_kind(EdgeKind::RepliesTo)),
        )
        .chain(
            TAGGED
                .iter()
                .map(|(s, t)| GraphEdge::new(*s, *t).with_kind(EdgeKind::Tagged)),
        )
        .collect();

    GraphData::new(nodes, edges)
}
