//! # Bonfire Graph
//!
//! Graph model for the actor / activity / tag knowledge graph.
//!
//! ## Features
//!
//! - **Typed graph payloads** - nodes, edges and groups with serde support
//! - **Degree weighting** - per-node weights with group filters
//! - **Neighborhoods** - undirected adjacency and neighbor cycling
//! - **Sources** - JSON files, in-memory graphs and a built-in sample
//!
//! ## Architecture
//!
//! ```text
//! GraphSource (file / memory / sample)
//!     │
//!     ├──> validate
//!     │      ├─ Reject blank and duplicate ids
//!     │      └─ Drop edges with unknown endpoints
//!     │
//!     └──> GraphData
//!            ├─ compute_weights ──> WeightedNode[] (degree, sorted desc)
//!            └─ neighbors / NeighborIndex ──> adjacency for selection
//! ```

mod error;
mod loader;
mod neighbors;
mod sample;
mod types;
mod weights;

pub use error::{GraphError, Result};
pub use loader::{
    enrich, load_or_unavailable, parse_graph_json, validate, GraphSource, JsonFileSource,
    StaticSource,
};
pub use neighbors::{edge_neighbors, neighbor_at, neighbors, NeighborIndex, NeighborStep};
pub use sample::sample_graph;
pub use types::{EdgeKind, GraphData, GraphEdge, GraphNode, NodeGroup, WeightedNode};
pub use weights::{compute_weights, max_weight, scale_by_weight};
