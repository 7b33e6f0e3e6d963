//! # Bonfire Layout
//!
//! Turns weighted graph nodes into positioned items for each view mode.
//!
//! ## Features
//!
//! - **Radial rings** - focal node in the center, neighbors on the inner rings
//! - **Force simulation** - d3-style forces with pinning and reheat
//! - **Circle packing** - group bubbles with front-chain sibling packing
//! - **Adjacency matrix**, **proportional arcs** and **radial BFS tree**
//! - **Spiral word cloud** and **ranked list**
//!
//! ## Architecture
//!
//! ```text
//! WeightedNode[] + GraphEdge[] + LayoutContext + ViewSettings
//!     │
//!     └──> compute_layout(mode)
//!            ├─ cloud    ──> ring_layout    (RingLayout)
//!            ├─ d3cloud  ──> spiral_layout  (SpiralLayout)
//!            ├─ animated ──> spiral_layout  (SpiralLayout)
//!            ├─ force    ──> ForceSimulation::settle (ForceLayout)
//!            ├─ bubble   ──> pack_layout    (PackLayout)
//!            ├─ heatmap  ──> matrix_layout  (MatrixLayout)
//!            ├─ pie      ──> arc_layout     (ArcLayout)
//!            ├─ tree     ──> tree_layout    (TreeLayout)
//!            └─ list     ──> list_layout    (ListLayout)
//!                   │
//!                   └──> LayoutOutput::items() ──> LayoutItem[]
//! ```
//!
//! Every layout is a pure function of its inputs, except the force simulation
//! which can also be stepped and dragged interactively.

mod arc;
mod engine;
mod force;
mod list;
mod matrix;
mod pack;
mod ring;
mod rotation;
mod spiral;
mod tree;
mod types;

pub use arc::{arc_layout, ArcLayout, GroupArc, NodeArc};
pub use engine::{compute_layout, LayoutOutput};
pub use force::{force_layout, ForceConfig, ForceLayout, ForceLink, ForceSimulation};
pub use list::{bar_percent, list_layout, ListLayout, ListRow};
pub use matrix::{matrix_layout, MatrixLayout};
pub use pack::{enclose, pack_layout, pack_siblings, Circle, GroupCircle, PackLayout};
pub use ring::{label_arc, ring_layout, ring_radius, RingLayout};
pub use rotation::RotationClock;
pub use spiral::{spiral_layout, PlacedWord, SpiralLayout, SpiralParams};
pub use tree::{hop_levels, tree_layout, TreeLayout};
pub use types::{polar, LayoutContext, LayoutItem, TOP};
