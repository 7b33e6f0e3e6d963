//! Nested circle packing: root, one circle per group, one leaf per node.
//!
//! Siblings are packed with the front-chain algorithm and enclosed by their
//! smallest enclosing circle. Leaf area is proportional to `max(weight, 1)`.

use crate::types::{LayoutContext, LayoutItem};
use bonfire_graph::{NodeGroup, WeightedNode};
use bonfire_protocol::BubbleSettings;
use serde::Serialize;

pub const DEFAULT_CANVAS: f64 = 600.0;
/// Margin kept free on every side of the packing
pub const MARGIN: f64 = 10.0;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    #[must_use]
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// Whether `other` lies inside this circle, with tolerance
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        (self.x - other.x).hypot(self.y - other.y) + other.r <= self.r + 1e-6
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCircle {
    pub group: NodeGroup,
    pub circle: Circle,
    /// Sum of leaf values in the group
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackLayout {
    pub root: Circle,
    pub groups: Vec<GroupCircle>,
    /// Leaves; `size` is the radius, `ring` the depth (always 2)
    pub items: Vec<LayoutItem>,
}

struct GroupBranch<'a> {
    group: NodeGroup,
    value: f64,
    circle: Circle,
    leaves: Vec<(&'a WeightedNode, Circle)>,
}

#[must_use]
pub fn pack_layout(
    nodes: &[WeightedNode],
    ctx: &LayoutContext<'_>,
    settings: &BubbleSettings,
) -> PackLayout {
    if nodes.is_empty() {
        return PackLayout::default();
    }

    let size = ctx.canvas_or(DEFAULT_CANVAS) - 2.0 * MARGIN;
    let mut branches = build_branches(nodes);

    // Pass 1: unpadded packing, used to size the padding in layout units
    for branch in &mut branches {
        let mut leaves: Vec<Circle> = branch.leaves.iter().map(|(_, c)| *c).collect();
        branch.circle.r = pack_siblings(&mut leaves);
        store_leaves(branch, &leaves);
    }
    let mut tops: Vec<Circle> = branches.iter().map(|b| b.circle).collect();
    let mut root = Circle::new(0.0, 0.0, pack_siblings(&mut tops));

    // Pass 2: pack again with padding scaled into layout units
    let pad = settings.pack_padding * root.r / size;
    for branch in &mut branches {
        let mut leaves: Vec<Circle> = branch.leaves.iter().map(|(_, c)| *c).collect();
        branch.circle.r = pack_padded(&mut leaves, pad);
        store_leaves(branch, &leaves);
    }
    let mut tops: Vec<Circle> = branches.iter().map(|b| b.circle).collect();
    root.r = pack_padded(&mut tops, pad);
    for (branch, top) in branches.iter_mut().zip(&tops) {
        branch.circle.x = top.x;
        branch.circle.y = top.y;
    }

    // Scale into the canvas; children are relative to their parent until now
    let k = size / (2.0 * root.r);
    root = Circle::new(MARGIN + size / 2.0, MARGIN + size / 2.0, root.r * k);

    let mut groups = Vec::with_capacity(branches.len());
    let mut items = Vec::with_capacity(nodes.len());
    for branch in branches {
        let group = Circle::new(
            root.x + k * branch.circle.x,
            root.y + k * branch.circle.y,
            branch.circle.r * k,
        );
        for (node, leaf) in branch.leaves {
            items.push(LayoutItem::new(
                node.id(),
                group.x + k * leaf.x,
                group.y + k * leaf.y,
                leaf.r * k,
                2,
            ));
        }
        groups.push(GroupCircle {
            group: branch.group,
            circle: group,
            value: branch.value,
        });
    }

    PackLayout {
        root,
        groups,
        items,
    }
}

/// Root children in canonical group order, then sorted by value descending
fn build_branches(nodes: &[WeightedNode]) -> Vec<GroupBranch<'_>> {
    let mut branches: Vec<GroupBranch<'_>> = NodeGroup::ORDERED
        .iter()
        .filter_map(|&group| {
            let mut leaves: Vec<(&WeightedNode, Circle)> = nodes
                .iter()
                .filter(|n| n.group() == group)
                .map(|n| (n, Circle::new(0.0, 0.0, leaf_value(n).sqrt())))
                .collect();
            if leaves.is_empty() {
                return None;
            }
            leaves.sort_by(|a, b| leaf_value(b.0).total_cmp(&leaf_value(a.0)));
            let value = leaves.iter().map(|(n, _)| leaf_value(n)).sum();
            Some(GroupBranch {
                group,
                value,
                circle: Circle::default(),
                leaves,
            })
        })
        .collect();
    branches.sort_by(|a, b| b.value.total_cmp(&a.value));
    branches
}

fn leaf_value(node: &WeightedNode) -> f64 {
    f64::from(node.weight.max(1))
}

fn store_leaves(branch: &mut GroupBranch<'_>, packed: &[Circle]) {
    for ((_, slot), circle) in branch.leaves.iter_mut().zip(packed) {
        *slot = *circle;
    }
}

/// Pack with every radius temporarily grown by `pad`; returns the parent radius
fn pack_padded(circles: &mut [Circle], pad: f64) -> f64 {
    for c in circles.iter_mut() {
        c.r += pad;
    }
    let enclosing = pack_siblings(circles);
    for c in circles.iter_mut() {
        c.r -= pad;
    }
    enclosing + pad
}

// =============================================================================
// FRONT-CHAIN SIBLING PACKING
// =============================================================================

/// Place `circles` tangent to each other around the origin and return the
/// radius of their enclosing circle, which ends up centered on the origin.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (first, second) = (circles[0], circles[1]);
    place(second, first, &mut circles[2]);

    // Front chain as a circular doubly-linked list over indices
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[1] = 0;
    next[1] = 2;
    prev[2] = 1;
    next[2] = 0;
    prev[0] = 2;

    let mut i = 3;
    'pack: while i < n {
        let (ca, cb) = (circles[a], circles[b]);
        place(ca, cb, &mut circles[i]);
        let c = circles[i];

        // Find the closest intersecting circle on the front chain, if any
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        // Insert between a and b, then pick the new pair closest to the origin
        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;
        b = i;

        let mut best = score(circles, &next, a);
        let mut node = next[i];
        while node != b {
            let s = score(circles, &next, node);
            if s < best {
                a = node;
                best = s;
            }
            node = next[node];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut node = next[b];
    while node != b {
        chain.push(circles[node]);
        node = next[node];
    }
    let enclosing = enclose(&chain);
    for c in circles.iter_mut() {
        c.x -= enclosing.x;
        c.y -= enclosing.y;
    }
    enclosing.r
}

/// Put `c` tangent to both `a` and `b`
fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - EPSILON;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of a chain link
fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

// =============================================================================
// SMALLEST ENCLOSING CIRCLE
// =============================================================================

/// Smallest circle enclosing every circle in `circles`
#[must_use]
pub fn enclose(circles: &[Circle]) -> Circle {
    let mut basis: Vec<Circle> = Vec::new();
    let mut current: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        if current.is_some_and(|e| encloses_weak(&e, &p)) {
            i += 1;
            continue;
        }
        match extend_basis(&basis, p) {
            Some(extended) => {
                basis = extended;
                current = Some(enclose_basis(&basis));
                i = 0;
            }
            None => {
                log::warn!("Enclosing circle basis degenerated; using bounding circle");
                return bounding_circle(circles);
            }
        }
    }
    current.unwrap_or_default()
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose_two(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for (i, &bi) in basis.iter().enumerate() {
        for &bj in &basis[i + 1..] {
            if encloses_not(&enclose_two(&bi, &bj), &p)
                && encloses_not(&enclose_two(&bi, &p), &bj)
                && encloses_not(&enclose_two(&bj, &p), &bi)
                && encloses_weak_all(&enclose_three(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_two(a, b),
        [a, b, c] => enclose_three(a, b, c),
        _ => bounding_circle(basis),
    }
}

fn enclose_two(a: &Circle, b: &Circle) -> Circle {
    let (x21, y21, r21) = (b.x - a.x, b.y - a.y, b.r - a.r);
    let l = x21.hypot(y21);
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_three(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let a2 = x1 - b.x;
    let a3 = x1 - c.x;
    let b2 = y1 - b.y;
    let b3 = y1 - c.y;
    let c2 = b.r - r1;
    let c3 = c.r - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > EPSILON {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

/// Loose enclosure around the bounding box center
fn bounding_circle(circles: &[Circle]) -> Circle {
    if circles.is_empty() {
        return Circle::default();
    }
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in circles {
        min_x = min_x.min(c.x - c.r);
        min_y = min_y.min(c.y - c.r);
        max_x = max_x.max(c.x + c.r);
        max_y = max_y.max(c.y + c.r);
    }
    let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    let r = circles
        .iter()
        .map(|c| (c.x - cx).hypot(c.y - cy) + c.r)
        .fold(0.0, f64::max);
    Circle::new(cx, cy, r)
}
