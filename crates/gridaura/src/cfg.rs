//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants; inputs are pixel-scale numbers and integer cell counts, so a
//!   single absolute tolerance per concern is enough.

/// Max distance from an integer for a footprint dimension to count as whole cells.
pub(crate) const FOOTPRINT_EPS: f64 = 1e-6;
/// Vertices closer than this are merged when simplifying rings.
pub(crate) const VERTEX_EPS: f64 = 1e-9;
/// Largest whole radius (cells) a gridded aura is built with; larger radii are capped.
/// Border size grows linearly with the radius.
pub(crate) const MAX_GRID_RADIUS: i64 = 1 << 14;
/// Width and height closer than this make a gridless token circular.
pub(crate) const SHAPE_EPS: f64 = 1e-9;
