//! Grid topology and token data model.
//!
//! - `Grid`: the active scene's topology, hex orientation, and cell size in pixels.
//! - `Footprint`: width/height in whole cells plus the hex shape variant.
//! - `TokenSnapshot`: plain-data position + footprint, passed by value into geometry.
//!
//! Host enum codes are decoded here and nowhere else; an unknown code is rejected with
//! `GridError`, so the geometry code downstream only ever sees valid variants.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cfg::FOOTPRINT_EPS;

/// Errors raised while decoding host grid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("unknown grid type code {0}")]
    UnknownGridType(u8),
    #[error("unknown hex token shape code {0}")]
    UnknownHexShape(u8),
    #[error("unknown square distance mode `{0}`")]
    UnknownDistanceMode(String),
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),
}

/// Grid topology of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridTopology {
    Gridless,
    Square,
    Hexagonal,
}

/// Grid/topology provider snapshot for the active scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub topology: GridTopology,
    /// Column-oriented hex grid (flat-topped hexes stacked in columns).
    /// Ignored for the other topologies.
    #[serde(default)]
    pub columnar: bool,
    /// Size of one grid cell in pixels (flat-to-flat distance for hexes).
    pub cell_size: f64,
}

impl Grid {
    pub fn gridless(cell_size: f64) -> Self {
        Self {
            topology: GridTopology::Gridless,
            columnar: false,
            cell_size,
        }
    }

    pub fn square(cell_size: f64) -> Self {
        Self {
            topology: GridTopology::Square,
            columnar: false,
            cell_size,
        }
    }

    pub fn hexagonal(cell_size: f64, columnar: bool) -> Self {
        Self {
            topology: GridTopology::Hexagonal,
            columnar,
            cell_size,
        }
    }

    /// Decode the host's numeric grid type.
    ///
    /// 0 gridless, 1 square, 2/3 row-oriented hex (odd/even), 4/5 columnar hex (odd/even).
    /// Odd/even only shifts the host's global lattice; footprints here are local, so both
    /// map to the same orientation.
    pub fn from_host_code(code: u8, cell_size: f64) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        match code {
            0 => Ok(Self::gridless(cell_size)),
            1 => Ok(Self::square(cell_size)),
            2 | 3 => Ok(Self::hexagonal(cell_size, false)),
            4 | 5 => Ok(Self::hexagonal(cell_size, true)),
            other => Err(GridError::UnknownGridType(other)),
        }
    }
}

/// Cost function used to decide which square cells are within radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareDistanceMode {
    /// Chebyshev: diagonals cost 1.
    #[default]
    Equidistant,
    /// Every second diagonal step costs 2.
    Alternating,
    /// Taxicab.
    Manhattan,
    /// Euclidean.
    Exact,
}

impl SquareDistanceMode {
    pub const ALL: [SquareDistanceMode; 4] = [
        SquareDistanceMode::Equidistant,
        SquareDistanceMode::Alternating,
        SquareDistanceMode::Manhattan,
        SquareDistanceMode::Exact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SquareDistanceMode::Equidistant => "equidistant",
            SquareDistanceMode::Alternating => "alternating",
            SquareDistanceMode::Manhattan => "manhattan",
            SquareDistanceMode::Exact => "exact",
        }
    }
}

impl fmt::Display for SquareDistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SquareDistanceMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SquareDistanceMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GridError::UnknownDistanceMode(s.to_string()))
    }
}

/// Token shape on hexagonal grids. `*2` variants mirror `*1` across the secondary axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexShape {
    #[default]
    Ellipse1,
    Ellipse2,
    Trapezoid1,
    Trapezoid2,
    Rectangle1,
    Rectangle2,
}

/// Shape family shared by a mirrored pair of `HexShape` variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HexFamily {
    Ellipse,
    Trapezoid,
    Rectangle,
}

impl HexShape {
    pub const ALL: [HexShape; 6] = [
        HexShape::Ellipse1,
        HexShape::Ellipse2,
        HexShape::Trapezoid1,
        HexShape::Trapezoid2,
        HexShape::Rectangle1,
        HexShape::Rectangle2,
    ];

    pub fn family(self) -> HexFamily {
        match self {
            HexShape::Ellipse1 | HexShape::Ellipse2 => HexFamily::Ellipse,
            HexShape::Trapezoid1 | HexShape::Trapezoid2 => HexFamily::Trapezoid,
            HexShape::Rectangle1 | HexShape::Rectangle2 => HexFamily::Rectangle,
        }
    }

    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            HexShape::Ellipse2 | HexShape::Trapezoid2 | HexShape::Rectangle2
        )
    }
}

impl TryFrom<u8> for HexShape {
    type Error = GridError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        HexShape::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(GridError::UnknownHexShape(code))
    }
}

/// Grid-cell-aligned size of a token.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub hex_shape: HexShape,
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            hex_shape: HexShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: HexShape) -> Self {
        self.hex_shape = shape;
        self
    }

    /// Whole-cell dimensions, or `None` for fractional / sub-1 sizes (unsupported on grids).
    pub fn whole_cells(&self) -> Option<(u32, u32)> {
        Some((whole(self.width)?, whole(self.height)?))
    }

    /// Whole-cell dimensions used when this token owns a gridded aura: exact for whole
    /// sizes, otherwise rounded to the nearest cell count (at least one).
    pub fn span(&self) -> (u32, u32) {
        self.whole_cells().unwrap_or_else(|| (rounded(self.width), rounded(self.height)))
    }

    /// Width and height in pixels.
    pub fn size_px(&self, cell_size: f64) -> Vector2<f64> {
        Vector2::new(self.width * cell_size, self.height * cell_size)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

fn rounded(x: f64) -> u32 {
    if x.is_finite() {
        x.round().clamp(1.0, f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

fn whole(x: f64) -> Option<u32> {
    let r = x.round();
    if !x.is_finite() || r < 1.0 || (x - r).abs() > FOOTPRINT_EPS || r > f64::from(u32::MAX) {
        return None;
    }
    Some(r as u32)
}

/// Plain-data view of a token: top-left canvas position (pixels) and footprint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub position: Vector2<f64>,
    pub footprint: Footprint,
}

impl TokenSnapshot {
    pub fn new(x: f64, y: f64, footprint: Footprint) -> Self {
        Self {
            position: Vector2::new(x, y),
            footprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_codes_decode() {
        assert_eq!(
            Grid::from_host_code(0, 100.0).unwrap().topology,
            GridTopology::Gridless
        );
        assert_eq!(
            Grid::from_host_code(1, 100.0).unwrap().topology,
            GridTopology::Square
        );
        let row = Grid::from_host_code(3, 100.0).unwrap();
        assert_eq!(row.topology, GridTopology::Hexagonal);
        assert!(!row.columnar);
        assert!(Grid::from_host_code(4, 100.0).unwrap().columnar);
        assert_eq!(
            Grid::from_host_code(9, 100.0),
            Err(GridError::UnknownGridType(9))
        );
        assert!(matches!(
            Grid::from_host_code(1, 0.0),
            Err(GridError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn hex_shape_codes_and_families() {
        assert_eq!(HexShape::try_from(0), Ok(HexShape::Ellipse1));
        assert_eq!(HexShape::try_from(5), Ok(HexShape::Rectangle2));
        assert_eq!(HexShape::try_from(6), Err(GridError::UnknownHexShape(6)));
        assert_eq!(HexShape::Trapezoid2.family(), HexFamily::Trapezoid);
        assert!(HexShape::Trapezoid2.is_mirrored());
        assert!(!HexShape::Rectangle1.is_mirrored());
    }

    #[test]
    fn distance_mode_parses_names() {
        assert_eq!(
            "Manhattan".parse::<SquareDistanceMode>(),
            Ok(SquareDistanceMode::Manhattan)
        );
        assert!(" exact ".parse::<SquareDistanceMode>().is_ok());
        assert!("hex".parse::<SquareDistanceMode>().is_err());
    }

    #[test]
    fn whole_cells_rejects_fractional_and_small() {
        assert_eq!(Footprint::new(2.0, 3.0).whole_cells(), Some((2, 3)));
        assert_eq!(Footprint::new(0.5, 1.0).whole_cells(), None);
        assert_eq!(Footprint::new(1.5, 1.0).whole_cells(), None);
        assert_eq!(Footprint::new(f64::NAN, 1.0).whole_cells(), None);
        assert_eq!(Footprint::new(0.5, 2.6).span(), (1, 3));
    }

    #[test]
    fn footprint_serde_defaults_shape() {
        let fp: Footprint = serde_json::from_str(r#"{"width":2,"height":1}"#).unwrap();
        assert_eq!(fp.hex_shape, HexShape::Ellipse1);
        let mode: SquareDistanceMode = serde_json::from_str(r#""alternating""#).unwrap();
        assert_eq!(mode, SquareDistanceMode::Alternating);
    }
}
