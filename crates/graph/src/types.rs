use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Actor,
    Activity,
    Tag,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeGroup {
    /// Canonical display order used by grouped layouts
    pub const ORDERED: [Self; 4] = [Self::Actor, Self::Activity, Self::Tag, Self::Unknown];

    /// Rank within [`NodeGroup::ORDERED`]
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::Actor => 0,
            Self::Activity => 1,
            Self::Tag => 2,
            Self::Unknown => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Activity => "activity",
            Self::Tag => "tag",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDERED
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown node group: {s}"))
    }
}

/// Relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Authored,
    RepliesTo,
    Tagged,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub group: NodeGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Opaque upstream payload, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphNode {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, group: NodeGroup) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group,
            weight: None,
            metadata: None,
        }
    }
}

/// Undirected for neighbor and weight purposes; `source`/`target` keep upstream orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl GraphEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: None,
            weight: None,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether this edge touches `id` on either end
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default, alias = "links")]
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    #[must_use]
    pub const fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }
}

/// A node paired with its degree after group filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    #[serde(rename = "degree")]
    pub weight: u32,
}

impl WeightedNode {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.node.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.node.label
    }

    #[must_use]
    pub const fn group(&self) -> NodeGroup {
        self.node.group
    }
}
