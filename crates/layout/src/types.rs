use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

/// Angle of 12 o'clock in screen coordinates (y grows downward)
pub const TOP: f64 = -FRAC_PI_2;

/// One positioned node.
///
/// `ring` is layout specific: ring index, BFS level, matrix row or pack depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub ring: usize,
}

impl LayoutItem {
    #[must_use]
    pub fn new(node_id: impl Into<String>, x: f64, y: f64, size: f64, ring: usize) -> Self {
        Self {
            node_id: node_id.into(),
            x,
            y,
            size,
            ring,
        }
    }

    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Inputs every layout reads besides nodes, edges and its own settings.
///
/// Passed explicitly; layouts never consult shared state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutContext<'a> {
    /// Currently selected node id, if any
    pub selected: Option<&'a str>,
    /// Side of the square canvas; each layout has its own default
    pub canvas: Option<f64>,
    /// Idle rotation offset in radians, applied by ring layouts
    pub rotation: f64,
    /// Seed for layouts with a random element; `None` draws from entropy
    pub seed: Option<u64>,
}

impl<'a> LayoutContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_selection(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub const fn with_canvas(mut self, side: f64) -> Self {
        self.canvas = Some(side);
        self
    }

    #[must_use]
    pub const fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn canvas_or(&self, default: f64) -> f64 {
        self.canvas.unwrap_or(default)
    }

    pub(crate) fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// Point at `radius` and `angle` around `(cx, cy)`
#[must_use]
pub fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}
