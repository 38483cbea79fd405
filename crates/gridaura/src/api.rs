//! Curated surface for hosts embedding the engine.
//!
//! - Prefer these re-exports over reaching into topology modules; the per-topology
//!   generators stay reachable through their modules for tooling and benchmarks.

// Data model
pub use crate::grid::{
    Footprint, Grid, GridError, GridTopology, HexShape, SquareDistanceMode, TokenSnapshot,
};
pub use crate::path::{bounds, is_closed, translate, PathCommand};
// Geometry
pub use crate::cache::{CacheStats, GeometryCache};
pub use crate::footprint::{enumerate as enumerate_footprint, occupied_points};
pub use crate::geometry::{whole_radius, AuraGeometry};
// Scene bookkeeping
pub use crate::manager::{
    Aura, AuraId, AuraManager, AuraSpec, ScenePhase, TestOptions, TokenId, TokenProvider,
    Transition,
};
// Rendering contract
pub use crate::render::{
    AuraStyle, FillPass, FillType, LineType, RenderPass, RenderSink, StrokePass,
};
