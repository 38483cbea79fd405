//! Gridless auras: rounded borders and an analytic distance test.
//!
//! Model
//! - A square footprint (`width == height`) is treated as a disc of diameter `width`; any
//!   other footprint is its axis-aligned rectangle.
//! - The aura is everything closer than `radius` cells to the owner shape. Discs enter the
//!   distance test as their center point with half their diameter added to the allowance,
//!   rectangles enter as themselves. The comparison is strict, so the boundary is outside.
//!
//! Radii stay real-valued here; nothing is rounded.

use std::sync::Arc;

use nalgebra::Vector2;

use crate::cache::{GeometryCache, GridlessBorderKey, Real};
use crate::cfg::SHAPE_EPS;
use crate::grid::{Footprint, TokenSnapshot};
use crate::path::PathCommand;

/// Disc tokens are square footprints.
#[inline]
pub fn is_circular(fp: &Footprint) -> bool {
    (fp.width - fp.height).abs() <= SHAPE_EPS
}

/// Border of an owner footprint grown by `radius` cells, in local pixels.
///
/// Discs get four quarter arcs around the center; rectangles get four edges joined by
/// quarter arcs of radius `radius`. Both start at the top and run clockwise on screen.
pub fn generate_border(fp: &Footprint, radius: f64, cell_size: f64) -> Vec<PathCommand> {
    if radius.is_nan() || radius < 0.0 || cell_size.is_nan() || cell_size <= 0.0 {
        return Vec::new();
    }
    let size = fp.size_px(cell_size);
    let r = radius * cell_size;
    if is_circular(fp) {
        let c = size / 2.0;
        let rr = size.x / 2.0 + r;
        let at = |dx: f64, dy: f64| Vector2::new(c.x + dx, c.y + dy);
        return vec![
            PathCommand::move_to(at(0.0, -rr)),
            PathCommand::arc_to(at(rr, 0.0), at(rr, -rr), rr),
            PathCommand::arc_to(at(0.0, rr), at(rr, rr), rr),
            PathCommand::arc_to(at(-rr, 0.0), at(-rr, rr), rr),
            PathCommand::arc_to(at(0.0, -rr), at(-rr, -rr), rr),
        ];
    }
    let (w, h) = (size.x, size.y);
    let p = Vector2::new;
    vec![
        PathCommand::move_to(p(0.0, -r)),
        PathCommand::line_to(p(w, -r)),
        PathCommand::arc_to(p(w + r, 0.0), p(w + r, -r), r),
        PathCommand::line_to(p(w + r, h)),
        PathCommand::arc_to(p(w, h + r), p(w + r, h + r), r),
        PathCommand::line_to(p(0.0, h + r)),
        PathCommand::arc_to(p(-r, h), p(-r, h + r), r),
        PathCommand::line_to(p(-r, 0.0)),
        PathCommand::arc_to(p(0.0, -r), p(-r, -r), r),
    ]
}

/// Cached `generate_border`.
pub fn border(
    cache: &mut GeometryCache,
    fp: &Footprint,
    radius: f64,
    cell_size: f64,
) -> Arc<Vec<PathCommand>> {
    let key = GridlessBorderKey {
        width: Real::from(fp.width),
        height: Real::from(fp.height),
        radius: Real::from(radius),
        cell: Real::from(cell_size),
    };
    cache.gridless_borders.get_or_compute(key, || {
        tracing::trace!(width = fp.width, height = fp.height, radius, "gridless border miss");
        generate_border(fp, radius, cell_size)
    })
}

/// A shape reduced to a box plus extra reach: discs are a point with reach, rectangles
/// are themselves with none.
#[derive(Clone, Copy, Debug)]
struct Probe {
    lo: Vector2<f64>,
    hi: Vector2<f64>,
    reach: f64,
}

impl Probe {
    fn of(position: Vector2<f64>, fp: &Footprint, cell_size: f64) -> Self {
        let size = fp.size_px(cell_size);
        if is_circular(fp) {
            let c = position + size / 2.0;
            Probe {
                lo: c,
                hi: c,
                reach: size.x / 2.0,
            }
        } else {
            Probe {
                lo: position,
                hi: position + size,
                reach: 0.0,
            }
        }
    }

    fn point(p: Vector2<f64>) -> Self {
        Probe {
            lo: p,
            hi: p,
            reach: 0.0,
        }
    }

    /// Per-axis gap between the two boxes (zero where they overlap).
    fn gap(&self, other: &Probe) -> Vector2<f64> {
        let axis = |alo: f64, ahi: f64, blo: f64, bhi: f64| (alo - bhi).max(blo - ahi).max(0.0);
        Vector2::new(
            axis(self.lo.x, self.hi.x, other.lo.x, other.hi.x),
            axis(self.lo.y, self.hi.y, other.lo.y, other.hi.y),
        )
    }
}

/// Inside test for one owner aura on a gridless scene.
#[derive(Clone, Debug)]
pub struct GridlessGeometry {
    owner: Footprint,
    radius: f64,
    cell_size: f64,
    border: Arc<Vec<PathCommand>>,
}

impl GridlessGeometry {
    pub fn new(cache: &mut GeometryCache, owner: &Footprint, radius: f64, cell_size: f64) -> Self {
        Self {
            owner: *owner,
            radius,
            cell_size,
            border: border(cache, owner, radius, cell_size),
        }
    }

    pub fn border(&self) -> &[PathCommand] {
        &self.border
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn reaches(&self, owner: &Probe, other: &Probe) -> bool {
        if self.radius.is_nan() || self.radius < 0.0 {
            return false;
        }
        let limit = self.radius * self.cell_size + owner.reach + other.reach;
        owner.gap(other).norm_squared() < limit * limit
    }

    /// Whether `p` (owner-local pixels) lies strictly inside the aura.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        let owner = Probe::of(Vector2::zeros(), &self.owner, self.cell_size);
        self.reaches(&owner, &Probe::point(p))
    }

    /// Whether the target's shape comes strictly closer than the radius to the owner's.
    pub fn is_inside(&self, target: &TokenSnapshot, owner_offset: Vector2<f64>) -> bool {
        let owner = Probe::of(owner_offset, &self.owner, self.cell_size);
        let other = Probe::of(target.position, &target.footprint, self.cell_size);
        self.reaches(&owner, &other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{bounds, is_closed};
    use nalgebra::vector;

    const CELL: f64 = 100.0;

    fn geom(w: f64, h: f64, radius: f64) -> GridlessGeometry {
        GridlessGeometry::new(&mut GeometryCache::new(), &Footprint::new(w, h), radius, CELL)
    }

    #[test]
    fn circular_boundary_is_excluded() {
        let g = geom(1.0, 1.0, 5.0);
        let fp = Footprint::new(1.0, 1.0);
        assert!(!g.is_inside(&TokenSnapshot::new(600.0, 0.0, fp), Vector2::zeros()));
        assert!(g.is_inside(&TokenSnapshot::new(599.0, 0.0, fp), Vector2::zeros()));
        // the diagonal uses true distance, not per-axis distance
        assert!(!g.is_inside(&TokenSnapshot::new(450.0, 450.0, fp), Vector2::zeros()));
        assert!(g.is_inside(&TokenSnapshot::new(400.0, 400.0, fp), Vector2::zeros()));
    }

    #[test]
    fn rectangles_measure_edge_to_edge() {
        let g = geom(2.0, 1.0, 1.0);
        let rect = Footprint::new(1.0, 2.0);
        // gap of exactly one cell to the right of the owner's 200px width
        assert!(!g.is_inside(&TokenSnapshot::new(300.0, 0.0, rect), Vector2::zeros()));
        assert!(g.is_inside(&TokenSnapshot::new(299.0, -150.0, rect), Vector2::zeros()));
        // a disc target only needs its rim within reach
        let disc = Footprint::new(1.0, 1.0);
        assert!(g.is_inside(&TokenSnapshot::new(299.0, 0.0, disc), Vector2::zeros()));
        assert!(!g.is_inside(&TokenSnapshot::new(300.0, 0.0, disc), Vector2::zeros()));
    }

    #[test]
    fn owner_offset_is_respected() {
        let g = geom(1.0, 1.0, 1.0);
        let fp = Footprint::new(1.0, 1.0);
        let owner_at = vector![1000.0, 1000.0];
        assert!(g.is_inside(&TokenSnapshot::new(1150.0, 1000.0, fp), owner_at));
        assert!(!g.is_inside(&TokenSnapshot::new(150.0, 0.0, fp), owner_at));
    }

    #[test]
    fn negative_radius_contains_nothing() {
        let g = geom(1.0, 1.0, -1.0);
        assert!(g.border().is_empty());
        assert!(!g.contains_point(vector![50.0, 50.0]));
    }

    #[test]
    fn circle_border_is_four_arcs() {
        let b = generate_border(&Footprint::new(2.0, 2.0), 1.0, CELL);
        assert_eq!(b.len(), 5);
        assert!(is_closed(&b));
        assert!(b[1..]
            .iter()
            .all(|c| matches!(c, PathCommand::Arc { radius, .. } if *radius == 200.0)));
        assert_eq!(bounds(&b), Some((vector![-100.0, -100.0], vector![300.0, 300.0])));
    }

    #[test]
    fn rounded_rect_border() {
        let b = generate_border(&Footprint::new(3.0, 1.0), 0.5, CELL);
        assert_eq!(b.len(), 9);
        assert!(is_closed(&b));
        let arcs = b
            .iter()
            .filter(|c| matches!(c, PathCommand::Arc { radius, .. } if *radius == 50.0))
            .count();
        assert_eq!(arcs, 4);
        assert_eq!(bounds(&b), Some((vector![-50.0, -50.0], vector![350.0, 150.0])));
    }

    #[test]
    fn contains_point_matches_border_extent() {
        let g = geom(3.0, 1.0, 0.5);
        assert!(g.contains_point(vector![349.0, 50.0]));
        assert!(!g.contains_point(vector![350.0, 50.0]));
        // rounded corner: the bounding-box corner itself is outside
        assert!(!g.contains_point(vector![345.0, -45.0]));
        assert!(g.contains_point(vector![320.0, -20.0]));
    }

    #[test]
    fn border_is_cached() {
        let mut cache = GeometryCache::new();
        let fp = Footprint::new(1.0, 2.0);
        let a = border(&mut cache, &fp, 1.5, CELL);
        let b = border(&mut cache, &fp, 1.5, CELL);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.border_stats().misses, 1);
    }
}
