//! Per-topology aura geometry behind one closed sum type.
//!
//! `AuraGeometry::build` picks the variant from the scene's grid and is the only place that
//! rounds radii: gridded topologies only support whole-cell radii, gridless keeps the real
//! value. A negative (or NaN) radius yields `Disabled`, which has no border and contains
//! nothing. Gridded radii are capped so a radius typed mid-edit cannot stall a frame.

use nalgebra::Vector2;

use crate::cache::GeometryCache;
use crate::cfg::MAX_GRID_RADIUS;
use crate::footprint;
use crate::grid::{Footprint, Grid, GridTopology, SquareDistanceMode, TokenSnapshot};
use crate::gridless::GridlessGeometry;
use crate::hex::HexGeometry;
use crate::path::PathCommand;
use crate::square::SquareGeometry;

#[derive(Clone, Debug)]
pub enum AuraGeometry {
    Gridless(GridlessGeometry),
    Square(SquareGeometry),
    Hexagonal(HexGeometry),
    Disabled,
}

/// Nearest whole radius capped at `MAX_GRID_RADIUS` cells, or `None` when the radius
/// disables the aura.
pub fn whole_radius(radius: f64) -> Option<i64> {
    if radius.is_nan() || radius < 0.0 {
        return None;
    }
    Some(radius.round().min(MAX_GRID_RADIUS as f64) as i64)
}

impl AuraGeometry {
    /// Geometry for an owner footprint on `grid`. `mode` is only read on square grids.
    pub fn build(
        cache: &mut GeometryCache,
        grid: &Grid,
        owner: &Footprint,
        radius: f64,
        mode: SquareDistanceMode,
    ) -> Self {
        if radius.is_nan() || radius < 0.0 {
            return AuraGeometry::Disabled;
        }
        match grid.topology {
            GridTopology::Gridless => {
                AuraGeometry::Gridless(GridlessGeometry::new(cache, owner, radius, grid.cell_size))
            }
            GridTopology::Square => match whole_radius(radius) {
                Some(r) => {
                    AuraGeometry::Square(SquareGeometry::new(cache, owner, r, mode, grid.cell_size))
                }
                None => AuraGeometry::Disabled,
            },
            GridTopology::Hexagonal => match whole_radius(radius) {
                Some(r) => AuraGeometry::Hexagonal(HexGeometry::new(
                    cache,
                    owner,
                    r,
                    grid.columnar,
                    grid.cell_size,
                )),
                None => AuraGeometry::Disabled,
            },
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, AuraGeometry::Disabled)
    }

    /// Closed border in owner-local pixels; empty when there is nothing to draw.
    pub fn border(&self) -> &[PathCommand] {
        match self {
            AuraGeometry::Gridless(g) => g.border(),
            AuraGeometry::Square(g) => g.border(),
            AuraGeometry::Hexagonal(g) => g.border(),
            AuraGeometry::Disabled => &[],
        }
    }

    /// Whether an owner-local point lies inside the aura.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        match self {
            AuraGeometry::Gridless(g) => g.contains_point(p),
            AuraGeometry::Square(g) => g.contains_point(p),
            AuraGeometry::Hexagonal(g) => g.contains_point(p),
            AuraGeometry::Disabled => false,
        }
    }

    /// Inside test for a target token.
    ///
    /// `target_cells` are the target's occupied points (see `footprint::occupied_points`);
    /// gridless ignores them and measures the target's shape directly. `owner_offset` is
    /// the owner's canvas position.
    pub fn is_inside(
        &self,
        target: &TokenSnapshot,
        target_cells: &[Vector2<f64>],
        owner_offset: Vector2<f64>,
    ) -> bool {
        match self {
            AuraGeometry::Gridless(g) => g.is_inside(target, owner_offset),
            AuraGeometry::Square(g) => g.is_inside(target.position, target_cells, owner_offset),
            AuraGeometry::Hexagonal(g) => g.is_inside(target.position, target_cells, owner_offset),
            AuraGeometry::Disabled => false,
        }
    }

    /// `is_inside` with the target's occupied points looked up through the cache.
    pub fn contains_token(
        &self,
        cache: &mut GeometryCache,
        grid: &Grid,
        target: &TokenSnapshot,
        owner_offset: Vector2<f64>,
    ) -> bool {
        if self.is_disabled() {
            return false;
        }
        let cells = footprint::occupied_points(cache, grid, &target.footprint);
        self.is_inside(target, &cells, owner_offset)
    }
}
