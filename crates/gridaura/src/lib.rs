//! Aura geometry on gridless, square, and hexagonal maps.
//!
//! An aura is a radius-bound zone anchored to an owner token. This crate computes
//! the closed border of that zone for rendering and answers "is this token inside"
//! for every (owner aura, target token) pair, tracking enter/leave transitions.
//!
//! Layout
//! - `cache`: append-only memo tables for the pure generators below.
//! - `grid`, `path`: plain data model (topology, footprints, path commands).
//! - `footprint`: grid cells a token occupies, per topology.
//! - `square`, `hex`, `gridless`: per-topology border generation and inside tests.
//! - `geometry`: the closed sum type dispatching over the three topologies.
//! - `manager`: per-scene registry and the inside-state table.
//! - `render`: style contract handed to an external path renderer.

pub mod api;
pub mod cache;
mod cfg;
pub mod footprint;
pub mod geometry;
pub mod grid;
pub mod gridless;
pub mod hex;
pub mod manager;
pub mod path;
pub mod render;
pub mod square;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cache::{CacheStats, GeometryCache};
    pub use crate::geometry::AuraGeometry;
    pub use crate::grid::{
        Footprint, Grid, GridError, GridTopology, HexShape, SquareDistanceMode, TokenSnapshot,
    };
    pub use crate::manager::{
        Aura, AuraId, AuraManager, AuraSpec, ScenePhase, TestOptions, TokenId, TokenProvider,
        Transition,
    };
    pub use crate::path::PathCommand;
    pub use crate::render::{AuraStyle, FillType, LineType, RenderPass, RenderSink};
    pub use nalgebra::Vector2 as Vec2;
}
