//! Hex token layouts on the `hexx` axial lattice.
//!
//! Frame
//! - Everything is built column-oriented: flat-topped hexes, lines of hexes run along y
//!   (the primary axis), lines are stacked along x (the secondary axis). Row-oriented grids
//!   transpose at the very end, `*2` shapes mirror x at the very end.
//! - Pixel positions come from a flat `HexLayout` whose hex side is `1/√3`, so grid size 1
//!   is the flat-to-flat distance. Its basis is promoted to `f64` once. Canvas y grows
//!   downward, so only the magnitudes of the basis vectors are kept.
//! - The local origin is the top-left corner of the token's bounding box (the union of
//!   its hexes).

use hexx::{Hex, HexLayout, HexOrientation};
use nalgebra::Vector2;

use crate::grid::{HexFamily, HexShape};

/// Hex side length for grid size 1.
pub(crate) const SIDE: f64 = 0.577_350_269_189_625_8;

/// A run of hexes along the primary axis. `start2` is twice the offset of its first hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line {
    pub start2: i64,
    pub len: i64,
}

/// (primary, secondary) axis sizes: primary is height on columnar grids, width otherwise.
pub(crate) fn axes(width: u32, height: u32, columnar: bool) -> (i64, i64) {
    if columnar {
        (i64::from(height), i64::from(width))
    } else {
        (i64::from(width), i64::from(height))
    }
}

/// Unmirrored lines of a shape family, or `None` when the size combination has no layout.
pub(crate) fn lines(family: HexFamily, primary: i64, secondary: i64) -> Option<Vec<Line>> {
    if primary < 1 || secondary < 1 {
        return None;
    }
    match family {
        HexFamily::Ellipse => {
            if primary < secondary / 2 + 1 {
                return None;
            }
            // center line first, then one line on each side per step, shrinking by one per step
            let c = (secondary - 1) / 2;
            Some(
                (0..secondary)
                    .map(|j| {
                        let d = (j - c).abs();
                        Line {
                            start2: d,
                            len: primary - d,
                        }
                    })
                    .collect(),
            )
        }
        HexFamily::Trapezoid => {
            if primary < secondary {
                return None;
            }
            Some(
                (0..secondary)
                    .map(|j| Line {
                        start2: j,
                        len: primary - j,
                    })
                    .collect(),
            )
        }
        HexFamily::Rectangle => {
            if primary == 1 && secondary > 1 {
                return None;
            }
            Some(
                (0..secondary)
                    .map(|j| {
                        if j % 2 == 0 {
                            Line {
                                start2: 0,
                                len: primary,
                            }
                        } else {
                            Line {
                                start2: 1,
                                len: primary - 1,
                            }
                        }
                    })
                    .collect(),
            )
        }
    }
}

/// Lattice-to-pixel basis of a flat-topped grid of size 1.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Basis {
    q: Vector2<f64>,
    r: Vector2<f64>,
    /// Half width and half height of one hex.
    half: Vector2<f64>,
}

impl Basis {
    pub fn flat() -> Self {
        let layout = HexLayout {
            orientation: HexOrientation::Flat,
            scale: hexx::Vec2::splat(SIDE as f32),
            ..Default::default()
        };
        let magnitude = |v: hexx::Vec2| Vector2::new(f64::from(v.x.abs()), f64::from(v.y.abs()));
        let origin = layout.hex_to_world_pos(Hex::ZERO);
        let half = layout
            .center_aligned_hex_corners()
            .iter()
            .fold(Vector2::zeros(), |m: Vector2<f64>, &c| m.sup(&magnitude(c)));
        Self {
            q: magnitude(layout.hex_to_world_pos(Hex::new(1, 0)) - origin),
            r: magnitude(layout.hex_to_world_pos(Hex::new(0, 1)) - origin),
            half,
        }
    }

    /// Center of `hex`, grid size 1, unnormalized frame.
    #[inline]
    pub fn center(&self, hex: Hex) -> Vector2<f64> {
        self.q * f64::from(hex.x) + self.r * f64::from(hex.y)
    }

    /// The corner shared by three mutually adjacent hexes.
    #[inline]
    pub fn corner(&self, hexes: &[Hex; 3]) -> Vector2<f64> {
        hexes
            .iter()
            .fold(Vector2::zeros(), |acc, &h| acc + self.center(h))
            / 3.0
    }
}

/// A token's hexes plus the transform from lattice pixels to local pixels.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    hexes: Vec<Hex>,
    basis: Basis,
    /// Bounding box of the hexes, grid size 1.
    origin: Vector2<f64>,
    extent: Vector2<f64>,
    mirrored: bool,
    columnar: bool,
    cell_size: f64,
}

impl Layout {
    pub fn new(
        width: u32,
        height: u32,
        shape: HexShape,
        columnar: bool,
        cell_size: f64,
    ) -> Option<Self> {
        let (primary, secondary) = axes(width, height, columnar);
        let lines = lines(shape.family(), primary, secondary)?;
        // line `j` starts on a half cell iff `j + parity` is odd
        let parity = lines[0].start2.rem_euclid(2);
        let mut hexes = Vec::new();
        for (j, line) in (0i64..).zip(&lines) {
            for k in 0..line.len {
                let r = (line.start2 + 2 * k - j - parity).div_euclid(2);
                hexes.push(Hex::new(i32::try_from(j).ok()?, i32::try_from(r).ok()?));
            }
        }
        let basis = Basis::flat();
        let (&first, rest) = hexes.split_first()?;
        let c = basis.center(first);
        let (lo, hi) = rest.iter().fold((c, c), |(lo, hi), &h| {
            let c = basis.center(h);
            (lo.inf(&c), hi.sup(&c))
        });
        let origin = lo - basis.half;
        Some(Self {
            hexes,
            basis,
            origin,
            extent: hi + basis.half - origin,
            mirrored: shape.is_mirrored(),
            columnar,
            cell_size,
        })
    }

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Lattice pixels to local pixels (normalize, mirror, scale, then transpose for
    /// row-oriented grids).
    pub fn to_local(&self, p: Vector2<f64>) -> Vector2<f64> {
        let mut v = p - self.origin;
        if self.mirrored {
            v.x = self.extent.x - v.x;
        }
        let v = v * self.cell_size;
        if self.columnar {
            v
        } else {
            Vector2::new(v.y, v.x)
        }
    }

    /// Hex centers in local pixels.
    pub fn cell_centers(&self) -> Vec<Vector2<f64>> {
        self.hexes
            .iter()
            .map(|&h| self.to_local(self.basis.center(h)))
            .collect()
    }
}
