//! Grid cells a token occupies, as cell centers local to the token's top-left corner.
//!
//! - Square and hex footprints with whole-cell sizes enumerate through the cache.
//! - Fractional sizes, hex sizes without a layout, and gridless scenes enumerate nothing.
//!   Callers that need at least one point use `occupied_points`, which falls back to the
//!   token's geometric center.

use std::sync::Arc;

use nalgebra::Vector2;

use crate::cache::GeometryCache;
use crate::grid::{Footprint, Grid, GridTopology};
use crate::{hex, square};

/// Occupied cell centers of `fp` on `grid`; may be empty.
pub fn enumerate(
    cache: &mut GeometryCache,
    grid: &Grid,
    fp: &Footprint,
) -> Arc<Vec<Vector2<f64>>> {
    let Some((w, h)) = fp.whole_cells() else {
        return Arc::new(Vec::new());
    };
    match grid.topology {
        GridTopology::Square => square::cells(cache, w, h, grid.cell_size),
        GridTopology::Hexagonal => {
            hex::cells(cache, w, h, fp.hex_shape, grid.columnar, grid.cell_size)
        }
        GridTopology::Gridless => Arc::new(Vec::new()),
    }
}

/// Geometric center of a footprint in local pixels.
#[inline]
pub fn center(fp: &Footprint, cell_size: f64) -> Vector2<f64> {
    fp.size_px(cell_size) / 2.0
}

/// `enumerate`, or the single center point when that comes back empty.
pub fn occupied_points(
    cache: &mut GeometryCache,
    grid: &Grid,
    fp: &Footprint,
) -> Arc<Vec<Vector2<f64>>> {
    let cells = enumerate(cache, grid, fp);
    if cells.is_empty() {
        Arc::new(vec![center(fp, grid.cell_size)])
    } else {
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexShape;
    use nalgebra::vector;

    #[test]
    fn square_cells_are_row_major_centers() {
        let mut cache = GeometryCache::new();
        let pts = enumerate(&mut cache, &Grid::square(100.0), &Footprint::new(2.0, 2.0));
        assert_eq!(
            *pts,
            vec![
                vector![50.0, 50.0],
                vector![150.0, 50.0],
                vector![50.0, 150.0],
                vector![150.0, 150.0]
            ]
        );
    }

    #[test]
    fn fractional_and_gridless_enumerate_nothing() {
        let mut cache = GeometryCache::new();
        assert!(enumerate(&mut cache, &Grid::square(100.0), &Footprint::new(0.5, 0.5)).is_empty());
        let gridless = Grid::gridless(100.0);
        assert!(enumerate(&mut cache, &gridless, &Footprint::new(1.0, 1.0)).is_empty());
        let fallback = occupied_points(&mut cache, &Grid::square(100.0), &Footprint::new(0.5, 0.5));
        assert_eq!(*fallback, vec![vector![25.0, 25.0]]);
    }

    #[test]
    fn hex_uses_shape_and_orientation() {
        let mut cache = GeometryCache::new();
        let grid = Grid::hexagonal(100.0, true);
        let fp = Footprint::new(3.0, 3.0).with_shape(HexShape::Trapezoid1);
        assert_eq!(enumerate(&mut cache, &grid, &fp).len(), 6);
        let fp = Footprint::new(3.0, 3.0).with_shape(HexShape::Ellipse1);
        assert_eq!(enumerate(&mut cache, &grid, &fp).len(), 7);
        // a columnar trapezoid needs height >= width
        let fp = Footprint::new(3.0, 2.0).with_shape(HexShape::Trapezoid1);
        assert!(enumerate(&mut cache, &grid, &fp).is_empty());
        assert_eq!(occupied_points(&mut cache, &grid, &fp).len(), 1);
    }

    #[test]
    fn enumeration_is_cached() {
        let mut cache = GeometryCache::new();
        let grid = Grid::square(50.0);
        let a = enumerate(&mut cache, &grid, &Footprint::new(3.0, 1.0));
        let b = enumerate(&mut cache, &grid, &Footprint::new(3.0, 1.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.footprint_stats().hits, 1);
    }
}
