use crate::error::{GraphError, Result};
use crate::sample::sample_graph;
use crate::types::GraphData;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Where a graph comes from. Implementations may fail; callers treat a failure
/// as "graph unavailable".
pub trait GraphSource: Send + Sync {
    fn load(&self) -> Result<GraphData>;

    /// Short human-readable origin for logs
    fn describe(&self) -> String;
}

/// Graph payload stored as JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSource for JsonFileSource {
    fn load(&self) -> Result<GraphData> {
        let payload = std::fs::read_to_string(&self.path)?;
        parse_graph_json(&payload)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Graph held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    graph: GraphData,
    label: &'static str,
}

impl StaticSource {
    #[must_use]
    pub const fn new(graph: GraphData) -> Self {
        Self {
            graph,
            label: "memory",
        }
    }

    /// The built-in community sample
    #[must_use]
    pub fn sample() -> Self {
        Self {
            graph: sample_graph(),
            label: "sample",
        }
    }
}

impl GraphSource for StaticSource {
    fn load(&self) -> Result<GraphData> {
        validate(self.graph.clone())
    }

    fn describe(&self) -> String {
        self.label.to_string()
    }
}

/// Parse and validate a `{ "nodes": [...], "edges": [...] }` payload
pub fn parse_graph_json(payload: &str) -> Result<GraphData> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    if !value.is_object() || value.get("nodes").is_none() {
        return Err(GraphError::InvalidPayload(
            "expected an object with a `nodes` array".to_string(),
        ));
    }
    let graph: GraphData = serde_json::from_value(value)?;
    validate(graph)
}

/// Reject blank or duplicate ids and drop edges whose endpoints are missing
pub fn validate(mut graph: GraphData) -> Result<GraphData> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if node.id.trim().is_empty() {
            return Err(GraphError::InvalidPayload(format!(
                "node with label {:?} has an empty id",
                node.label
            )));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNode(node.id.clone()));
        }
    }

    let before = graph.edges.len();
    let known: HashSet<String> = ids.into_iter().map(str::to_string).collect();
    graph
        .edges
        .retain(|e| known.contains(&e.source) && known.contains(&e.target));
    let dropped = before - graph.edges.len();
    if dropped > 0 {
        warn!("Dropped {dropped} edges with unknown endpoints");
    }

    Ok(graph)
}

/// Fill missing node weights with the node's degree
#[must_use]
pub fn enrich(mut graph: GraphData) -> GraphData {
    let mut degree: HashMap<&str, u32> = HashMap::new();
    for edge in &graph.edges {
        *degree.entry(edge.source.as_str()).or_default() += 1;
        *degree.entry(edge.target.as_str()).or_default() += 1;
    }
    let degrees: Vec<f64> = graph
        .nodes
        .iter()
        .map(|n| f64::from(degree.get(n.id.as_str()).copied().unwrap_or(0)))
        .collect();
    for (node, d) in graph.nodes.iter_mut().zip(degrees) {
        if node.weight.is_none() {
            node.weight = Some(d);
        }
    }
    graph
}

/// Load from `source`, logging and returning `None` on failure
pub fn load_or_unavailable(source: &dyn GraphSource) -> Option<GraphData> {
    match source.load() {
        Ok(graph) => {
            debug!(
                "Loaded graph from {} ({} nodes, {} edges)",
                source.describe(),
                graph.nodes.len(),
                graph.edges.len()
            );
            Some(graph)
        }
        Err(err) => {
            warn!("Graph unavailable from {}: {err}", source.describe());
            None
        }
    }
}
