//! Free-form word cloud: largest words first, each walked outward along an
//! archimedean spiral until its box collides with nothing already placed.

use crate::ring::CHAR_WIDTH;
use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{max_weight, scale_by_weight, WeightedNode};
use bonfire_protocol::{AnimatedSettings, WordCloudSettings};
use rand::Rng;
use serde::Serialize;

pub const DEFAULT_CANVAS: f64 = 600.0;
/// Angle increment per spiral step, in radians
const SPIRAL_STEP: f64 = 0.1;

/// Font range and spacing shared by the static and animated clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    pub min_font: f64,
    pub max_font: f64,
    pub padding: f64,
}

impl From<&WordCloudSettings> for SpiralParams {
    fn from(s: &WordCloudSettings) -> Self {
        Self {
            min_font: s.min_font,
            max_font: s.max_font,
            padding: s.word_padding,
        }
    }
}

impl From<&AnimatedSettings> for SpiralParams {
    fn from(s: &AnimatedSettings) -> Self {
        Self {
            min_font: s.min_font,
            max_font: s.max_font,
            padding: s.word_padding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord {
    pub node_id: String,
    pub text: String,
    /// Word center on the canvas
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    /// 0 or 90 degrees
    pub rotate: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiralLayout {
    /// Placement order, largest first
    pub words: Vec<PlacedWord>,
    /// `ring` is the placement order, `size` the font size
    pub items: Vec<LayoutItem>,
    /// Words that found no free spot on the canvas
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Bounds {
    fn around(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            left: x - w / 2.0,
            top: y - h / 2.0,
            right: x + w / 2.0,
            bottom: y + h / 2.0,
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    fn inside(&self, side: f64) -> bool {
        self.left >= 0.0 && self.top >= 0.0 && self.right <= side && self.bottom <= side
    }
}

#[must_use]
pub fn spiral_layout(
    nodes: &[WeightedNode],
    ctx: &LayoutContext<'_>,
    params: SpiralParams,
) -> SpiralLayout {
    if nodes.is_empty() {
        return SpiralLayout::default();
    }

    let side = ctx.canvas_or(DEFAULT_CANVAS);
    let max_delta = side * std::f64::consts::SQRT_2;
    let max_w = max_weight(nodes);
    let mut rng = ctx.rng();

    let mut order: Vec<(&WeightedNode, f64)> = nodes
        .iter()
        .map(|n| {
            let font = scale_by_weight(n.weight, max_w, params.min_font, params.max_font);
            (n, font)
        })
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut layout = SpiralLayout::default();
    let mut occupied: Vec<Bounds> = Vec::with_capacity(nodes.len());

    for (node, font) in order {
        let rotate: u16 = if rng.gen_bool(0.5) { 90 } else { 0 };
        let text_w = node.label().chars().count() as f64 * font * CHAR_WIDTH + 2.0 * params.padding;
        let text_h = font + 2.0 * params.padding;
        let (w, h) = if rotate == 90 { (text_h, text_w) } else { (text_w, text_h) };

        let start_x = side * (rng.gen::<f64>() + 0.5) / 2.0;
        let start_y = side * (rng.gen::<f64>() + 0.5) / 2.0;
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        let mut spot = None;
        let mut t = 0.0_f64;
        loop {
            let theta = t * SPIRAL_STEP;
            let dx = theta * theta.cos();
            let dy = theta * theta.sin();
            if dx.abs().min(dy.abs()) >= max_delta {
                break;
            }
            let candidate = Bounds::around(start_x + dx, start_y + dy, w, h);
            if candidate.inside(side) && !occupied.iter().any(|b| b.overlaps(&candidate)) {
                spot = Some((start_x + dx, start_y + dy, candidate));
                break;
            }
            t += direction;
        }

        match spot {
            Some((x, y, bounds)) => {
                occupied.push(bounds);
                layout.items.push(LayoutItem::new(node.id(), x, y, font, layout.words.len()));
                layout.words.push(PlacedWord {
                    node_id: node.id().to_string(),
                    text: node.label().to_string(),
                    x,
                    y,
                    font_size: font,
                    rotate,
                });
            }
            None => {
                log::debug!("No room for word {:?} in cloud", node.label());
                layout.dropped.push(node.id().to_string());
            }
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonfire_graph::{compute_weights, sample_graph};
    use pretty_assertions::assert_eq;

    fn params() -> SpiralParams {
        SpiralParams::from(&WordCloudSettings::default())
    }

    #[test]
    fn test_seeded_cloud_is_reproducible_and_disjoint() {
        let nodes = compute_weights(&sample_graph(), &[]);
        let ctx = LayoutContext::new().with_seed(42);
        let a = spiral_layout(&nodes, &ctx, params());
        let b = spiral_layout(&nodes, &ctx, params());
        assert_eq!(a, b);
        assert_eq!(a.words.len() + a.dropped.len(), nodes.len());
        assert!(a.words.iter().all(|w| w.rotate == 0 || w.rotate == 90));
        assert!(a.words.iter().all(|w| (0.0..=600.0).contains(&w.x)));
    }

    #[test]
    fn test_largest_words_placed_first() {
        let nodes = compute_weights(&sample_graph(), &[]);
        let layout = spiral_layout(&nodes, &LayoutContext::new().with_seed(5), params());
        assert!(layout
            .words
            .windows(2)
            .all(|w| w[0].font_size >= w[1].font_size));
        assert!((layout.words[0].font_size - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_canvas_drops_words() {
        let nodes = compute_weights(&sample_graph(), &[]);
        let ctx = LayoutContext::new().with_seed(9).with_canvas(40.0);
        let layout = spiral_layout(&nodes, &ctx, params());
        assert!(!layout.dropped.is_empty());
    }
}
