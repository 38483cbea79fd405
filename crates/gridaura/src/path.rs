//! Path commands describing a closed aura border.
//!
//! A path is a `Vec<PathCommand>` whose first element is `Move`; every command's
//! `(x, y)` is where the pen ends up. `Arc` follows canvas `arcTo` semantics with the
//! tangent corner stored separately, so the end point is always known without solving
//! for tangency.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg::VERTEX_EPS;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathCommand {
    Move {
        x: f64,
        y: f64,
    },
    Line {
        x: f64,
        y: f64,
    },
    /// Circular arc ending at `(x, y)`, tangent to the segment from the current point
    /// to `(tangent_x, tangent_y)` and to the segment from there to `(x, y)`.
    Arc {
        x: f64,
        y: f64,
        tangent_x: f64,
        tangent_y: f64,
        radius: f64,
    },
}

impl PathCommand {
    #[inline]
    pub fn move_to(p: Vector2<f64>) -> Self {
        PathCommand::Move { x: p.x, y: p.y }
    }

    #[inline]
    pub fn line_to(p: Vector2<f64>) -> Self {
        PathCommand::Line { x: p.x, y: p.y }
    }

    #[inline]
    pub fn arc_to(end: Vector2<f64>, corner: Vector2<f64>, radius: f64) -> Self {
        PathCommand::Arc {
            x: end.x,
            y: end.y,
            tangent_x: corner.x,
            tangent_y: corner.y,
            radius,
        }
    }

    /// Point the pen is at after this command.
    #[inline]
    pub fn end_point(&self) -> Vector2<f64> {
        match *self {
            PathCommand::Move { x, y }
            | PathCommand::Line { x, y }
            | PathCommand::Arc { x, y, .. } => Vector2::new(x, y),
        }
    }

    pub fn translated(&self, d: Vector2<f64>) -> Self {
        match *self {
            PathCommand::Move { x, y } => PathCommand::Move {
                x: x + d.x,
                y: y + d.y,
            },
            PathCommand::Line { x, y } => PathCommand::Line {
                x: x + d.x,
                y: y + d.y,
            },
            PathCommand::Arc {
                x,
                y,
                tangent_x,
                tangent_y,
                radius,
            } => PathCommand::Arc {
                x: x + d.x,
                y: y + d.y,
                tangent_x: tangent_x + d.x,
                tangent_y: tangent_y + d.y,
                radius,
            },
        }
    }
}

/// Closed polygon path: `Move` to the first point, `Line` through the rest, and a final
/// `Line` back to the first point. Empty input gives an empty path.
pub fn polygon(points: &[Vector2<f64>]) -> Vec<PathCommand> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(points.len() + 1);
    out.push(PathCommand::move_to(first));
    out.extend(rest.iter().map(|&p| PathCommand::line_to(p)));
    out.push(PathCommand::line_to(first));
    out
}

/// First command is `Move` and the last end point equals it.
pub fn is_closed(path: &[PathCommand]) -> bool {
    match (path.first(), path.last()) {
        (Some(first @ PathCommand::Move { .. }), Some(last)) if path.len() > 1 => {
            (first.end_point() - last.end_point()).norm() <= VERTEX_EPS
        }
        _ => false,
    }
}

pub fn translate(path: &[PathCommand], d: Vector2<f64>) -> Vec<PathCommand> {
    path.iter().map(|c| c.translated(d)).collect()
}

/// Axis-aligned bounds `(min, max)` of all end points and arc corners.
///
/// Arc corners bound their quarter arcs, so this is exact for the borders built here.
pub fn bounds(path: &[PathCommand]) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let mut it = path.iter().flat_map(|c| {
        let corner = match *c {
            PathCommand::Arc {
                tangent_x,
                tangent_y,
                ..
            } => Some(Vector2::new(tangent_x, tangent_y)),
            _ => None,
        };
        std::iter::once(c.end_point()).chain(corner)
    });
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p))))
}

/// Vertices of a path made only of `Move`/`Line`, without the closing repeat.
pub fn ring(path: &[PathCommand]) -> Vec<Vector2<f64>> {
    let mut pts: Vec<Vector2<f64>> = path.iter().map(PathCommand::end_point).collect();
    if pts.len() > 1 && is_closed(path) {
        pts.pop();
    }
    pts
}

/// Drop repeated and collinear vertices of a closed ring (wrap-around aware).
///
/// One stack pass: each vertex pops the collinear run behind it, then the seam between the
/// last and first vertex is repaired. Linear in the ring length.
pub(crate) fn simplify_ring(points: Vec<Vector2<f64>>) -> Vec<Vector2<f64>> {
    let mut ring: Vec<Vector2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().is_some_and(|q| (p - q).norm() <= VERTEX_EPS) {
            continue;
        }
        while ring.len() >= 2 && collinear(ring[ring.len() - 2], ring[ring.len() - 1], p) {
            ring.pop();
        }
        ring.push(p);
    }
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= VERTEX_EPS {
        ring.pop();
    }
    while ring.len() > 3 {
        let n = ring.len();
        if collinear(ring[n - 2], ring[n - 1], ring[0]) {
            ring.pop();
        } else if collinear(ring[n - 1], ring[0], ring[1]) {
            ring.remove(0);
        } else {
            break;
        }
    }
    ring
}

/// `b` lies on the line through `a` and `c` (including spikes that double back).
#[inline]
fn collinear(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> bool {
    let (u, v) = (b - a, c - b);
    (u.x * v.y - u.y * v.x).abs() <= VERTEX_EPS
}
