//! Force-directed placement with interactive pinning.
//!
//! Velocity-Verlet style integration with cooling. Four forces run every tick,
//! in this order:
//! - link springs pulling connected nodes toward `link_distance`
//! - many-body charge between every pair (negative strength repels)
//! - centering that keeps the mean position on the canvas center
//! - collision that keeps circles of `radius + collide_padding` apart
//!
//! # Usage
//! ```ignore
//! let mut sim = ForceSimulation::new(&nodes, &graph.edges, ForceConfig::from_settings(&settings, &ctx));
//! sim.settle();
//!
//! // While dragging:
//! sim.drag_to("tag:ux", 120.0, 80.0);
//! sim.tick();
//! // On release:
//! sim.release("tag:ux");
//! ```

use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{max_weight, GraphEdge, WeightedNode};
use bonfire_protocol::ForceSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

pub const DEFAULT_CANVAS: f64 = 600.0;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ForceConfig {
    /// Rest length of link springs
    pub link_distance: f64,
    /// Many-body strength; negative repels
    pub charge_strength: f64,
    /// Radius of the lightest node
    pub min_radius: f64,
    /// Radius of the heaviest node
    pub max_radius: f64,
    /// Extra spacing added to each radius for collisions
    pub collide_padding: f64,
    /// Ticks run by [`ForceSimulation::settle`]
    pub iterations: usize,
    /// Cooling stops once alpha drops below this
    pub alpha_min: f64,
    /// Fraction of the remaining velocity kept each tick
    pub velocity_retention: f64,
    /// Alpha restored when a node is dragged
    pub reheat_alpha: f64,
    /// Attraction point
    pub center: (f64, f64),
    /// Seed for initial jitter; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self::from_settings(&ForceSettings::default(), &LayoutContext::default())
    }
}

impl ForceConfig {
    #[must_use]
    pub fn from_settings(settings: &ForceSettings, ctx: &LayoutContext<'_>) -> Self {
        let half = ctx.canvas_or(DEFAULT_CANVAS) / 2.0;
        Self {
            link_distance: settings.link_distance,
            charge_strength: settings.charge_strength,
            min_radius: settings.min_radius,
            max_radius: settings.max_radius,
            collide_padding: 4.0,
            iterations: 300,
            alpha_min: 0.001,
            velocity_retention: 0.6,
            reheat_alpha: 0.3,
            center: (half, half),
            seed: ctx.seed,
        }
    }

    /// Per-tick decay that takes alpha from 1 to `alpha_min` in `iterations` ticks
    #[must_use]
    pub fn alpha_decay(&self) -> f64 {
        if self.iterations == 0 {
            return 1.0;
        }
        1.0 - self.alpha_min.powf(1.0 / self.iterations as f64)
    }
}

// =============================================================================
// SIMULATION STATE
// =============================================================================

#[derive(Debug, Clone)]
struct Body {
    id: String,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    pinned: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    source: usize,
    target: usize,
    strength: f64,
    /// Share of the correction applied to the target
    bias: f64,
}

/// Link between two simulated nodes, for renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForceLink {
    pub source: String,
    pub target: String,
}

pub struct ForceSimulation {
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    springs: Vec<Spring>,
    config: ForceConfig,
    alpha: f64,
    alpha_decay: f64,
    rng: StdRng,
}

impl ForceSimulation {
    /// Build a cold-start simulation. Nodes start on a phyllotaxis spiral
    /// around the center; only edges between known nodes become springs.
    #[must_use]
    pub fn new(nodes: &[WeightedNode], edges: &[GraphEdge], config: ForceConfig) -> Self {
        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let max_w = max_weight(nodes).max(1);
        let golden = PI * (3.0 - 5f64.sqrt());
        let (cx, cy) = config.center;

        let mut index = HashMap::with_capacity(nodes.len());
        let mut bodies = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.contains_key(node.id()) {
                continue;
            }
            let spread = 10.0 * (0.5 + i as f64).sqrt();
            let angle = i as f64 * golden;
            let radius = config.min_radius
                + (f64::from(node.weight) / f64::from(max_w))
                    * (config.max_radius - config.min_radius);
            index.insert(node.id().to_string(), bodies.len());
            bodies.push(Body {
                id: node.id().to_string(),
                x: cx + spread * angle.cos() + rng.gen_range(-0.5..0.5),
                y: cy + spread * angle.sin() + rng.gen_range(-0.5..0.5),
                vx: 0.0,
                vy: 0.0,
                radius,
                pinned: None,
            });
        }

        let springs = build_springs(&index, edges);
        let alpha_decay = config.alpha_decay();

        Self {
            bodies,
            index,
            springs,
            config,
            alpha: 1.0,
            alpha_decay,
            rng,
        }
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Run the configured number of ticks
    pub fn settle(&mut self) {
        self.relax(self.config.iterations);
    }

    /// Run up to `steps` ticks, stopping early once cooled
    pub fn relax(&mut self, steps: usize) {
        for _ in 0..steps {
            if self.is_settled() {
                break;
            }
            self.tick();
        }
    }

    /// Advance one step and return the new alpha
    pub fn tick(&mut self) -> f64 {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_center();
        self.apply_collisions();

        let retention = self.config.velocity_retention;
        for body in &mut self.bodies {
            if let Some((fx, fy)) = body.pinned {
                body.x = fx;
                body.y = fy;
                body.vx = 0.0;
                body.vy = 0.0;
            } else {
                body.vx *= retention;
                body.vy *= retention;
                body.x += body.vx;
                body.y += body.vy;
            }
        }

        self.alpha
    }

    // =========================================================================
    // PINNING
    // =========================================================================

    /// Hold a node at its current position. Returns false for unknown ids.
    pub fn pin(&mut self, id: &str) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        let body = &mut self.bodies[idx];
        body.pinned = Some((body.x, body.y));
        true
    }

    /// Move a pinned node and reheat so the rest of the graph follows
    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        let body = &mut self.bodies[idx];
        body.pinned = Some((x, y));
        body.x = x;
        body.y = y;
        self.reheat();
        true
    }

    /// Drop the constraint on a node; the simulation is left cooling
    pub fn release(&mut self, id: &str) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        self.bodies[idx].pinned = None;
        true
    }

    #[must_use]
    pub fn is_pinned(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| self.bodies[idx].pinned.is_some())
    }

    /// Raise alpha back to the reheat level without resetting positions
    pub fn reheat(&mut self) {
        self.alpha = self.alpha.max(self.config.reheat_alpha);
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    #[must_use]
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.index.get(id).map(|&idx| {
            let body = &self.bodies[idx];
            (body.x, body.y)
        })
    }

    #[must_use]
    pub fn items(&self) -> Vec<LayoutItem> {
        self.bodies
            .iter()
            .map(|b| LayoutItem::new(b.id.clone(), b.x, b.y, b.radius, 0))
            .collect()
    }

    #[must_use]
    pub fn links(&self) -> Vec<ForceLink> {
        self.springs
            .iter()
            .map(|s| ForceLink {
                source: self.bodies[s.source].id.clone(),
                target: self.bodies[s.target].id.clone(),
            })
            .collect()
    }

    // =========================================================================
    // FORCES
    // =========================================================================

    fn jiggle(&mut self) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * 1e-6
    }

    fn apply_links(&mut self) {
        for i in 0..self.springs.len() {
            let spring = self.springs[i];
            let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
            let mut dx = t.x + t.vx - s.x - s.vx;
            let mut dy = t.y + t.vy - s.y - s.vy;
            if dx == 0.0 {
                dx = self.jiggle();
            }
            if dy == 0.0 {
                dy = self.jiggle();
            }
            let len = dx.hypot(dy);
            let pull = (len - self.config.link_distance) / len * self.alpha * spring.strength;
            dx *= pull;
            dy *= pull;

            let target = &mut self.bodies[spring.target];
            target.vx -= dx * spring.bias;
            target.vy -= dy * spring.bias;
            let source = &mut self.bodies[spring.source];
            source.vx += dx * (1.0 - spring.bias);
            source.vy += dy * (1.0 - spring.bias);
        }
    }

    fn apply_charge(&mut self) {
        let strength = self.config.charge_strength * self.alpha;
        let n = self.bodies.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut dx = self.bodies[j].x - self.bodies[i].x;
                let dy = self.bodies[j].y - self.bodies[i].y;
                let mut dist2 = dx * dx + dy * dy;
                if dx == 0.0 {
                    dx = self.jiggle();
                    dist2 += dx * dx;
                }
                // Clamp to avoid blow-ups between coincident bodies
                if dist2 < 1.0 {
                    dist2 = dist2.sqrt();
                }
                let body = &mut self.bodies[i];
                body.vx += dx * strength / dist2;
                body.vy += dy * strength / dist2;
            }
        }
    }

    fn apply_center(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let n = self.bodies.len() as f64;
        let (sx, sy) = self
            .bodies
            .iter()
            .fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
        let (cx, cy) = self.config.center;
        let (shift_x, shift_y) = (sx / n - cx, sy / n - cy);
        for body in &mut self.bodies {
            body.x -= shift_x;
            body.y -= shift_y;
        }
    }

    fn apply_collisions(&mut self) {
        let pad = self.config.collide_padding;
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let ri = a.radius + pad;
                let rj = b.radius + pad;
                let reach = ri + rj;
                let mut dx = (a.x + a.vx) - (b.x + b.vx);
                let mut dy = (a.y + a.vy) - (b.y + b.vy);
                let mut dist2 = dx * dx + dy * dy;
                if dist2 >= reach * reach {
                    continue;
                }
                if dx == 0.0 {
                    dx = self.jiggle();
                    dist2 += dx * dx;
                }
                if dy == 0.0 {
                    dy = self.jiggle();
                    dist2 += dy * dy;
                }
                let dist = dist2.sqrt();
                let push = (reach - dist) / dist;
                dx *= push;
                dy *= push;
                let share = (rj * rj) / (ri * ri + rj * rj);

                let a = &mut self.bodies[i];
                a.vx += dx * share;
                a.vy += dy * share;
                let b = &mut self.bodies[j];
                b.vx -= dx * (1.0 - share);
                b.vy -= dy * (1.0 - share);
            }
        }
    }
}

/// Springs weighted so that hubs are not dragged around by their leaves
fn build_springs(index: &HashMap<String, usize>, edges: &[GraphEdge]) -> Vec<Spring> {
    let pairs: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|e| {
            let s = *index.get(&e.source)?;
            let t = *index.get(&e.target)?;
            (s != t).then_some((s, t))
        })
        .collect();

    let mut count = vec![0usize; index.len()];
    for &(s, t) in &pairs {
        count[s] += 1;
        count[t] += 1;
    }

    pairs
        .into_iter()
        .map(|(source, target)| {
            let (cs, ct) = (count[source] as f64, count[target] as f64);
            Spring {
                source,
                target,
                strength: 1.0 / cs.min(ct),
                bias: cs / (cs + ct),
            }
        })
        .collect()
}

/// Run a cold simulation to completion and return its positions
#[must_use]
pub fn force_layout(
    nodes: &[WeightedNode],
    edges: &[GraphEdge],
    ctx: &LayoutContext<'_>,
    settings: &ForceSettings,
) -> ForceLayout {
    let mut sim = ForceSimulation::new(nodes, edges, ForceConfig::from_settings(settings, ctx));
    sim.settle();
    log::debug!(
        "Force layout settled {} nodes at alpha {:.4}",
        sim.len(),
        sim.alpha()
    );
    ForceLayout {
        items: sim.items(),
        links: sim.links(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForceLayout {
    pub items: Vec<LayoutItem>,
    pub links: Vec<ForceLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::{compute_weights, sample_graph, GraphData, GraphNode, NodeGroup};
    use pretty_assertions::assert_eq;

    fn pair() -> GraphData {
        GraphData::new(
            vec![
                GraphNode::new("a", "a", NodeGroup::Actor),
                GraphNode::new("b", "b", NodeGroup::Activity),
            ],
            vec![GraphEdge::new("a", "b")],
        )
    }

    fn seeded(seed: u64) -> LayoutContext<'static> {
        LayoutContext::new().with_seed(seed)
    }

    #[test]
    fn test_alpha_decay_reaches_min_after_iterations() {
        let config = ForceConfig::default();
        let mut alpha: f64 = 1.0;
        for _ in 0..config.iterations {
            alpha -= alpha * config.alpha_decay();
        }
        assert!((alpha - config.alpha_min).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let settings = ForceSettings::default();
        let a = force_layout(&nodes, &graph.edges, &seeded(7), &settings);
        let b = force_layout(&nodes, &graph.edges, &seeded(7), &settings);
        assert_eq!(a, b);
        assert_eq!(a.items.len(), 18);
        assert_eq!(a.links.len(), graph.edges.len());
    }

    #[test]
    fn test_linked_pair_rests_near_link_distance() {
        let graph = pair();
        let nodes = compute_weights(&graph, &[]);
        let layout = force_layout(&nodes, &graph.edges, &seeded(1), &ForceSettings::default());
        let (a, b) = (&layout.items[0], &layout.items[1]);
        let dist = a.distance_to(b.x, b.y);
        assert!(dist > 60.0 && dist < 200.0, "distance {dist}");
    }

    #[test]
    fn test_centered_on_canvas() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let layout = force_layout(&nodes, &graph.edges, &seeded(3), &ForceSettings::default());
        let n = layout.items.len() as f64;
        let mx = layout.items.iter().map(|i| i.x).sum::<f64>() / n;
        let my = layout.items.iter().map(|i| i.y).sum::<f64>() / n;
        assert!((mx - 300.0).abs() < 1.0 && (my - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_radius_scales_with_weight() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let sim = ForceSimulation::new(&nodes, &graph.edges, ForceConfig::default());
        let items = sim.items();
        assert!((items[0].size - 20.0).abs() < 1e-9);
        assert!(items.iter().all(|i| i.size >= 5.0 && i.size <= 20.0));
    }

    #[test]
    fn test_drag_holds_node_and_reheats() {
        let graph = sample_graph();
        let nodes = compute_weights(&graph, &[]);
        let config = ForceConfig::from_settings(&ForceSettings::default(), &seeded(11));
        let mut sim = ForceSimulation::new(&nodes, &graph.edges, config);
        sim.settle();
        assert!(sim.alpha() < 0.01);

        let before = sim.position("actor:4").unwrap();
        assert!(sim.drag_to("tag:ux", 40.0, 40.0));
        assert!((sim.alpha() - 0.3).abs() < 1e-12);
        sim.relax(30);

        assert_eq!(sim.position("tag:ux"), Some((40.0, 40.0)));
        assert!(sim.is_pinned("tag:ux"));
        assert_ne!(sim.position("actor:4"), Some(before));

        assert!(sim.release("tag:ux"));
        assert!(!sim.is_pinned("tag:ux"));
        assert!(!sim.drag_to("missing", 0.0, 0.0));
    }

    #[test]
    fn test_empty_simulation() {
        let layout = force_layout(&[], &[], &seeded(0), &ForceSettings::default());
        assert!(layout.items.is_empty());
        assert!(layout.links.is_empty());
    }
}
