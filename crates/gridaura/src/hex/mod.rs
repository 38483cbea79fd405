//! Hexagonal grids: token layouts, dilated borders, and scan-line inside tests.
//!
//! Model
//! - A token's hexes form a `hexx` lattice layout (see `layout`). Ellipse and trapezoid
//!   layouts are convex on the hex lattice: they are exactly the hexes inside six cube bounds
//!   (`x`, `y`, `z` min/max). Growing each bound by the radius gives every hex within that
//!   many steps of the token, whose outline has six zig-zag sides.
//! - Layouts that are not hex-convex (rectangles spanning three or more lines) and sizes
//!   without a layout produce no border; their auras contain nothing.
//! - The outline is walked over the grid vertices of boundary hexes only, so its cost is
//!   linear in the radius. It is converted to local pixels once and turned into a sorted
//!   edge table for `EdgeTable::contains`.
//!
//! Radii are whole hex steps; callers round before getting here.

pub mod edges;
mod layout;

use std::collections::HashMap;
use std::sync::Arc;

use hexx::{EdgeDirection, GridVertex, Hex};
use nalgebra::Vector2;

use crate::cache::{GeometryCache, HexKey, Real};
use crate::cfg::MAX_GRID_RADIUS;
use crate::grid::{Footprint, HexShape};
use crate::path::{self, PathCommand};

pub use edges::EdgeTable;
use layout::Layout;

/// Border path and its edge table for one (footprint, shape, orientation, radius).
#[derive(Clone, Debug, Default)]
pub struct HexOutline {
    pub path: Vec<PathCommand>,
    pub edges: EdgeTable,
}

/// Cube bounds of a hex-convex region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CubeBounds {
    x: (i32, i32),
    y: (i32, i32),
    z: (i32, i32),
}

impl CubeBounds {
    fn of(hexes: &[Hex]) -> Option<Self> {
        let (&h, rest) = hexes.split_first()?;
        let init = CubeBounds {
            x: (h.x, h.x),
            y: (h.y, h.y),
            z: (h.z(), h.z()),
        };
        Some(rest.iter().fold(init, |b, h| CubeBounds {
            x: (b.x.0.min(h.x), b.x.1.max(h.x)),
            y: (b.y.0.min(h.y), b.y.1.max(h.y)),
            z: (b.z.0.min(h.z()), b.z.1.max(h.z())),
        }))
    }

    /// Every hex within `n` steps of the region.
    fn grown(self, n: i32) -> Self {
        CubeBounds {
            x: (self.x.0 - n, self.x.1 + n),
            y: (self.y.0 - n, self.y.1 + n),
            z: (self.z.0 - n, self.z.1 + n),
        }
    }

    fn contains(&self, h: Hex) -> bool {
        let z = h.z();
        (self.x.0..=self.x.1).contains(&h.x)
            && (self.y.0..=self.y.1).contains(&h.y)
            && (self.z.0..=self.z.1).contains(&z)
    }

    /// Inclusive `y` range of column `x`; empty when `lo > hi`.
    fn column(&self, x: i32) -> (i32, i32) {
        (self.y.0.max(-x - self.z.1), self.y.1.min(-x - self.z.0))
    }

    fn count(&self) -> i64 {
        (self.x.0..=self.x.1)
            .map(|x| {
                let (lo, hi) = self.column(x);
                i64::from((hi - lo + 1).max(0))
            })
            .sum()
    }

    /// Hexes that can touch the outside: both ends of every column, plus the first and
    /// last columns whole. Every other hex has all six neighbours inside.
    fn boundary(&self) -> Vec<Hex> {
        let mut out = Vec::new();
        for x in self.x.0..=self.x.1 {
            let (lo, hi) = self.column(x);
            if lo > hi {
                continue;
            }
            if x == self.x.0 || x == self.x.1 || hi - lo < 2 {
                out.extend((lo..=hi).map(|y| Hex::new(x, y)));
            } else {
                out.extend([Hex::new(x, lo), Hex::new(x, hi)]);
            }
        }
        out
    }
}

/// A grid vertex named by the three hexes meeting there, sorted.
type VertexKey = [(i32, i32); 3];

fn vertex_key(vertex: GridVertex) -> VertexKey {
    let mut k = vertex.coordinates().map(|h| (h.x, h.y));
    k.sort_unstable();
    k
}

type Links = HashMap<VertexKey, [Option<VertexKey>; 2]>;

/// Record `b` as a ring neighbour of `a`; false when `a` already has two.
fn link(links: &mut Links, a: VertexKey, b: VertexKey) -> bool {
    let slot = links.entry(a).or_default();
    if slot[0].is_none() {
        slot[0] = Some(b);
    } else if slot[1].is_none() {
        slot[1] = Some(b);
    } else {
        return false;
    }
    true
}

/// Outline of a cube-bounded region as a ring of grid vertices.
fn trace(region: &CubeBounds) -> Vec<VertexKey> {
    let mut links = Links::new();
    for hex in region.boundary() {
        for dir in EdgeDirection::ALL_DIRECTIONS {
            if region.contains(hex.neighbor(dir)) {
                continue;
            }
            let [a, b] = dir.vertex_directions().map(|direction| {
                vertex_key(GridVertex {
                    origin: hex,
                    direction,
                })
            });
            if !(link(&mut links, a, b) && link(&mut links, b, a)) {
                return Vec::new();
            }
        }
    }
    let Some(&start) = links.keys().min() else {
        return Vec::new();
    };
    let mut ring = Vec::with_capacity(links.len());
    let mut prev = None;
    let mut cur = start;
    loop {
        ring.push(cur);
        let Some(&[Some(a), Some(b)]) = links.get(&cur) else {
            return Vec::new();
        };
        let next = if prev == Some(a) { b } else { a };
        if next == start {
            break;
        }
        if ring.len() >= links.len() {
            return Vec::new();
        }
        prev = Some(cur);
        cur = next;
    }
    ring
}

/// Border of a hex token grown by `r` steps, in local pixels.
pub fn generate_outline(
    width: u32,
    height: u32,
    shape: HexShape,
    columnar: bool,
    r: i64,
    cell_size: f64,
) -> HexOutline {
    if r < 0 {
        return HexOutline::default();
    }
    let Ok(steps) = i32::try_from(r.min(MAX_GRID_RADIUS)) else {
        return HexOutline::default();
    };
    let Some(layout) = Layout::new(width, height, shape, columnar, cell_size) else {
        return HexOutline::default();
    };
    let Some(bounds) = CubeBounds::of(layout.hexes()) else {
        return HexOutline::default();
    };
    if bounds.count() != layout.hexes().len() as i64 {
        tracing::debug!(width, height, ?shape, "hex layout is not convex, no border");
        return HexOutline::default();
    }
    let basis = layout.basis();
    let ring: Vec<Vector2<f64>> = trace(&bounds.grown(steps))
        .into_iter()
        .map(|k| layout.to_local(basis.corner(&k.map(|(x, y)| Hex::new(x, y)))))
        .collect();
    let ring = path::simplify_ring(ring);
    HexOutline {
        path: path::polygon(&ring),
        edges: EdgeTable::from_ring(&ring),
    }
}

fn key(width: u32, height: u32, shape: HexShape, columnar: bool, cell_size: f64) -> HexKey {
    HexKey {
        width,
        height,
        shape,
        columnar,
        cell: Real::from(cell_size),
    }
}

/// Cached `generate_outline`.
pub fn outline(
    cache: &mut GeometryCache,
    width: u32,
    height: u32,
    shape: HexShape,
    columnar: bool,
    r: i64,
    cell_size: f64,
) -> Arc<HexOutline> {
    let k = (key(width, height, shape, columnar, cell_size), r);
    cache.hex_outlines.get_or_compute(k, || {
        tracing::trace!(width, height, ?shape, columnar, r, "hex outline miss");
        generate_outline(width, height, shape, columnar, r, cell_size)
    })
}

/// Hex centers of a token in local pixels; empty when the size has no layout.
pub fn generate_cells(
    width: u32,
    height: u32,
    shape: HexShape,
    columnar: bool,
    cell_size: f64,
) -> Vec<Vector2<f64>> {
    Layout::new(width, height, shape, columnar, cell_size)
        .map(|l| l.cell_centers())
        .unwrap_or_default()
}

/// Cached `generate_cells`.
pub fn cells(
    cache: &mut GeometryCache,
    width: u32,
    height: u32,
    shape: HexShape,
    columnar: bool,
    cell_size: f64,
) -> Arc<Vec<Vector2<f64>>> {
    cache
        .hex_cells
        .get_or_compute(key(width, height, shape, columnar, cell_size), || {
            generate_cells(width, height, shape, columnar, cell_size)
        })
}

/// Inside test for one owner aura on a hex grid.
#[derive(Clone, Debug)]
pub struct HexGeometry {
    radius: i64,
    outline: Arc<HexOutline>,
}

impl HexGeometry {
    pub fn new(
        cache: &mut GeometryCache,
        owner: &Footprint,
        radius: i64,
        columnar: bool,
        cell_size: f64,
    ) -> Self {
        let (w, h) = owner.span();
        let outline = outline(cache, w, h, owner.hex_shape, columnar, radius, cell_size);
        Self { radius, outline }
    }

    pub fn border(&self) -> &[PathCommand] {
        &self.outline.path
    }

    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Whether `p` (owner-local pixels) lies inside the border.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        self.outline.edges.contains(p)
    }

    /// Union test over the target's hex centers.
    pub fn is_inside(
        &self,
        target_position: Vector2<f64>,
        target_cells: &[Vector2<f64>],
        owner_offset: Vector2<f64>,
    ) -> bool {
        let shift = target_position - owner_offset;
        target_cells.iter().any(|c| self.contains_point(c + shift))
    }
}
