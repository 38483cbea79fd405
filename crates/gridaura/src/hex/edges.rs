//! Scan-line point-in-polygon over a pre-sorted edge list.
//!
//! Built once per border; `contains` rejects on the bounding box, then counts crossings of a
//! horizontal ray towards -x. Edges are sorted by top y (then top x), so the scan stops at
//! the first edge starting below the query point. Horizontal edges never cross the ray and
//! are dropped at construction.

use std::cmp::Ordering;

use nalgebra::Vector2;

use crate::cfg::VERTEX_EPS;

#[derive(Clone, Copy, Debug)]
struct Edge {
    top_y: f64,
    bottom_y: f64,
    top_x: f64,
    /// dx/dy along the edge.
    slope: f64,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    min: Vector2<f64>,
    max: Vector2<f64>,
}

impl EdgeTable {
    /// Edge table of the closed ring `points` (no repeated closing vertex needed).
    pub fn from_ring(points: &[Vector2<f64>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }
        let mut edges = Vec::with_capacity(points.len());
        let mut min = points[0];
        let mut max = points[0];
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            min = min.inf(&a);
            max = max.sup(&a);
            if (b.y - a.y).abs() <= VERTEX_EPS {
                continue;
            }
            let (top, bottom) = if a.y < b.y { (a, b) } else { (b, a) };
            edges.push(Edge {
                top_y: top.y,
                bottom_y: bottom.y,
                top_x: top.x,
                slope: (bottom.x - top.x) / (bottom.y - top.y),
            });
        }
        edges.sort_by(|a, b| match a.top_y.partial_cmp(&b.top_y) {
            Some(Ordering::Equal) | None => {
                a.top_x.partial_cmp(&b.top_x).unwrap_or(Ordering::Equal)
            }
            Some(o) => o,
        });
        Self { edges, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Bounding box `(min, max)` of the ring.
    pub fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        (self.min, self.max)
    }

    /// Even-odd containment. Points on the boundary may go either way.
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        if self.edges.is_empty()
            || p.x < self.min.x
            || p.x > self.max.x
            || p.y < self.min.y
            || p.y > self.max.y
        {
            return false;
        }
        let mut crossings = 0u32;
        for e in &self.edges {
            if e.top_y > p.y {
                break;
            }
            // half-open span so a shared vertex is counted once
            if p.y >= e.bottom_y {
                continue;
            }
            let x = e.top_x + (p.y - e.top_y) * e.slope;
            if x < p.x {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }
}
