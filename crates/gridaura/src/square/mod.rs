//! Square grids: cost functions, staircase borders, and cell-union inside tests.
//!
//! Model
//! - A cell is "within radius" when the cost of its offset from the nearest owner cell
//!   stays `<= r`. Offsets are counted in whole cells beyond the owner's rectangle.
//! - The border is the outline of the union of admitted cells: four straight strips of
//!   thickness `r` plus one staircase corner profile, mirrored into all four corners.
//! - Radii are whole cells; callers round before getting here.

use std::sync::Arc;

use nalgebra::Vector2;

use crate::cache::{GeometryCache, Real, SquareBorderKey, SquareCellsKey};
use crate::grid::{Footprint, SquareDistanceMode};
use crate::path::{self, PathCommand};

/// Does an offset of `(dx, dy)` whole cells (both `>= 0`) fall within radius `r`?
///
/// Evaluated in `i128` so no radius or offset can overflow.
#[inline]
pub fn admits(mode: SquareDistanceMode, dx: i64, dy: i64, r: i64) -> bool {
    let (dx, dy, r) = (i128::from(dx), i128::from(dy), i128::from(r));
    match mode {
        SquareDistanceMode::Equidistant => dx.max(dy) <= r,
        SquareDistanceMode::Alternating => dx.max(dy) + dx.min(dy) / 2 <= r,
        SquareDistanceMode::Manhattan => dx + dy <= r,
        SquareDistanceMode::Exact => dx * dx + dy * dy <= r * r,
    }
}

/// Corner profile: entry `y` is how many cells row `dy = y + 1` extends past the owner's
/// edge inside one diagonal quadrant. Non-increasing in `y`, so one pointer sweeps from `r`
/// down to 0 over all rows.
pub fn corner_profile(mode: SquareDistanceMode, r: i64) -> Vec<i64> {
    let mut x = r.max(0);
    (0..r.max(0))
        .map(|y| {
            while x > 0 && !admits(mode, x, y + 1, r) {
                x -= 1;
            }
            x
        })
        .collect()
}

/// Border of a `width × height` owner at radius `r` (cells), in local pixels.
///
/// Vertices run clockwise on screen (y down), starting at the top-left end of the top strip.
pub fn generate_border(
    width: i64,
    height: i64,
    r: i64,
    mode: SquareDistanceMode,
    cell_size: f64,
) -> Vec<PathCommand> {
    if r < 0 || width < 1 || height < 1 {
        return Vec::new();
    }
    let profile = corner_profile(mode, r);
    let (w, h, rr) = (width as f64, height as f64, r as f64);
    let ext = |y: usize| profile[y] as f64;
    let rows = profile.len();

    let mut pts: Vec<(f64, f64)> = Vec::with_capacity(8 + 8 * rows);
    pts.push((0.0, -rr));
    pts.push((w, -rr));
    for y in (0..rows).rev() {
        let (x, fy) = (w + ext(y), y as f64);
        pts.push((x, -(fy + 1.0)));
        pts.push((x, -fy));
    }
    pts.push((w + rr, 0.0));
    pts.push((w + rr, h));
    for y in 0..rows {
        let (x, fy) = (w + ext(y), y as f64);
        pts.push((x, h + fy));
        pts.push((x, h + fy + 1.0));
    }
    pts.push((w, h + rr));
    pts.push((0.0, h + rr));
    for y in (0..rows).rev() {
        let (x, fy) = (-ext(y), y as f64);
        pts.push((x, h + fy + 1.0));
        pts.push((x, h + fy));
    }
    pts.push((-rr, h));
    pts.push((-rr, 0.0));
    for y in 0..rows {
        let (x, fy) = (-ext(y), y as f64);
        pts.push((x, -fy));
        pts.push((x, -(fy + 1.0)));
    }

    let ring = path::simplify_ring(
        pts.into_iter()
            .map(|(x, y)| Vector2::new(x * cell_size, y * cell_size))
            .collect(),
    );
    path::polygon(&ring)
}

/// Cached `generate_border`.
pub fn border(
    cache: &mut GeometryCache,
    width: i64,
    height: i64,
    r: i64,
    mode: SquareDistanceMode,
    cell_size: f64,
) -> Arc<Vec<PathCommand>> {
    let key = SquareBorderKey {
        width,
        height,
        radius: r,
        mode,
        cell: Real::from(cell_size),
    };
    cache.square_borders.get_or_compute(key, || {
        tracing::trace!(width, height, r, %mode, "square border miss");
        generate_border(width, height, r, mode, cell_size)
    })
}

/// Cell centers of a `width × height` token in local pixels, row-major.
pub fn generate_cells(width: u32, height: u32, cell_size: f64) -> Vec<Vector2<f64>> {
    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Vector2::new(
                    (f64::from(x) + 0.5) * cell_size,
                    (f64::from(y) + 0.5) * cell_size,
                )
            })
        })
        .collect()
}

/// Cached `generate_cells`.
pub fn cells(
    cache: &mut GeometryCache,
    width: u32,
    height: u32,
    cell_size: f64,
) -> Arc<Vec<Vector2<f64>>> {
    let key = SquareCellsKey {
        width,
        height,
        cell: Real::from(cell_size),
    };
    cache
        .square_cells
        .get_or_compute(key, || generate_cells(width, height, cell_size))
}

/// Signed cell index of a coordinate measured in cells, rounding away from zero.
///
/// A cell center at `k + 0.5` maps to `k + 1` (or `k` when negative), so the owner's
/// cells occupy `1..=width` and clamping into `[0, width]` yields the nearest owner cell.
#[inline]
pub fn cell_index(v: f64) -> i64 {
    if v < 0.0 {
        v.floor() as i64
    } else {
        v.ceil() as i64
    }
}

/// Whole cells between index `t` and the owner's span `[0, len]`.
#[inline]
fn outside(t: i64, len: i64) -> i64 {
    i64::try_from(t.abs_diff(t.clamp(0, len))).unwrap_or(i64::MAX)
}

/// Inside test for one owner aura on a square grid.
#[derive(Clone, Debug)]
pub struct SquareGeometry {
    width: i64,
    height: i64,
    radius: i64,
    mode: SquareDistanceMode,
    cell_size: f64,
    border: Arc<Vec<PathCommand>>,
}

impl SquareGeometry {
    pub fn new(
        cache: &mut GeometryCache,
        owner: &Footprint,
        radius: i64,
        mode: SquareDistanceMode,
        cell_size: f64,
    ) -> Self {
        let (w, h) = owner.span();
        let (width, height) = (i64::from(w), i64::from(h));
        let border = border(cache, width, height, radius, mode, cell_size);
        Self {
            width,
            height,
            radius,
            mode,
            cell_size,
            border,
        }
    }

    pub fn border(&self) -> &[PathCommand] {
        &self.border
    }

    pub fn radius(&self) -> i64 {
        self.radius
    }

    pub fn mode(&self) -> SquareDistanceMode {
        self.mode
    }

    /// Whether the cell containing `p` (owner-local pixels) is within radius.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        if self.radius < 0 {
            return false;
        }
        let dx = outside(cell_index(p.x / self.cell_size), self.width);
        let dy = outside(cell_index(p.y / self.cell_size), self.height);
        admits(self.mode, dx, dy, self.radius)
    }

    /// Union test: inside if any occupied target cell is within radius.
    ///
    /// `target_cells` are cell centers local to the target; `owner_offset` is the owner's
    /// canvas position.
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
