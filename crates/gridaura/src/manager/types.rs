//! Data types shared by the manager, its callers, and scene files.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::GeometryCache;
use crate::geometry::AuraGeometry;
use crate::grid::{Footprint, Grid, SquareDistanceMode, TokenSnapshot};
use crate::render::AuraStyle;

/// Stable token identity supplied by the host.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub String);

/// Aura identity, unique per owner token.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuraId(pub String);

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        TokenId(s.to_string())
    }
}

impl From<&str> for AuraId {
    fn from(s: &str) -> Self {
        AuraId(s.to_string())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AuraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Declared aura configuration on an owner token.
///
/// `radius` is already resolved to a number (cells). Square and hex grids round it to
/// the nearest whole cell; a negative value disables the aura.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuraSpec {
    pub id: AuraId,
    #[serde(default)]
    pub name: String,
    pub radius: f64,
    #[serde(default)]
    pub square_mode: SquareDistanceMode,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub style: AuraStyle,
}

impl AuraSpec {
    pub fn new(id: impl Into<String>, radius: f64) -> Self {
        Self {
            id: AuraId(id.into()),
            name: String::new(),
            radius,
            square_mode: SquareDistanceMode::default(),
            enabled: true,
            style: AuraStyle::default(),
        }
    }

    pub fn with_mode(mut self, mode: SquareDistanceMode) -> Self {
        self.square_mode = mode;
        self
    }

    /// Does switching from `self` to `next` change the geometry?
    pub(crate) fn reshapes(&self, next: &AuraSpec) -> bool {
        self.radius.to_bits() != next.radius.to_bits() || self.square_mode != next.square_mode
    }
}

/// Runtime aura: a spec bound to its owner, plus the geometry built for the owner's
/// last-known footprint.
#[derive(Clone, Debug)]
pub struct Aura {
    pub owner: TokenId,
    pub spec: AuraSpec,
    geometry: AuraGeometry,
    footprint: Footprint,
}

impl Aura {
    pub(crate) fn build(
        cache: &mut GeometryCache,
        grid: &Grid,
        owner: TokenId,
        footprint: Footprint,
        spec: AuraSpec,
    ) -> Self {
        let geometry =
            AuraGeometry::build(cache, grid, &footprint, spec.radius, spec.square_mode);
        Self {
            owner,
            spec,
            geometry,
            footprint,
        }
    }

    pub(crate) fn rebuild(&mut self, cache: &mut GeometryCache, grid: &Grid, footprint: Footprint) {
        tracing::debug!(owner = %self.owner, aura = %self.spec.id, "rebuilding aura geometry");
        self.footprint = footprint;
        self.geometry = AuraGeometry::build(
            cache,
            grid,
            &footprint,
            self.spec.radius,
            self.spec.square_mode,
        );
    }

    pub fn geometry(&self) -> &AuraGeometry {
        &self.geometry
    }

    /// Footprint the current geometry was built for.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Enabled and with a usable radius.
    pub fn is_active(&self) -> bool {
        self.spec.enabled && !self.geometry.is_disabled()
    }
}

/// One flip of an inside-state entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: TokenId,
    pub owner: TokenId,
    pub aura: AuraSpec,
    pub has_entered: bool,
    pub is_init: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggering_actor: Option<String>,
}

/// Scope of a `test_all` pass. `None` means every owner / every token.
#[derive(Clone, Debug, Default)]
pub struct TestOptions {
    pub source: Option<TokenId>,
    pub target: Option<TokenId>,
    pub is_init: bool,
    pub triggering_actor: Option<String>,
}

impl TestOptions {
    pub fn init() -> Self {
        Self {
            is_init: true,
            ..Self::default()
        }
    }
}

/// Scene lifecycle as seen by the manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePhase {
    #[default]
    Empty,
    Populating,
    Active,
    TornDown,
}

/// Read access to the host's tokens.
pub trait TokenProvider {
    fn token(&self, id: &TokenId) -> Option<TokenSnapshot>;
    fn token_ids(&self) -> Vec<TokenId>;
}

impl TokenProvider for BTreeMap<TokenId, TokenSnapshot> {
    fn token(&self, id: &TokenId) -> Option<TokenSnapshot> {
        self.get(id).copied()
    }

    fn token_ids(&self) -> Vec<TokenId> {
        self.keys().cloned().collect()
    }
}
