//! Memo tables for the pure geometry generators.
//!
//! Purpose
//! - Border polygons and footprint point lists depend only on small integer footprints,
//!   small radii, a handful of enum modes, and the cell size. Recomputing them per frame is
//!   wasteful; `Memo` keeps one shared copy per distinct argument tuple.
//!
//! Policy
//! - Append-only, no eviction: entries never change once written, so handing out `Arc`s
//!   is safe for any number of concurrent readers.
//! - Only wrap pure functions. The key must capture every input of the generator.
//! - `GeometryCache` is an owned value (no globals) so tests can build isolated instances
//!   and assert hit/miss counts.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use nalgebra::Vector2;

use crate::grid::{HexShape, SquareDistanceMode};
use crate::hex::HexOutline;
use crate::path::PathCommand;

/// Hit/miss counters for one memo table (or the sum over several).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl std::ops::Add for CacheStats {
    type Output = CacheStats;
    fn add(self, rhs: CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
            entries: self.entries + rhs.entries,
        }
    }
}

/// Memoizes a pure generator keyed by its argument tuple.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: HashMap<K, Arc<V>>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: Eq + Hash, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, running `compute` only on the first request.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some(v) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(v);
        }
        self.misses += 1;
        let v = Arc::new(compute());
        self.entries.insert(key, Arc::clone(&v));
        v
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

/// Hashable stand-in for an `f64` argument (`-0.0` folded into `0.0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Real(u64);

impl From<f64> for Real {
    fn from(x: f64) -> Self {
        Real(if x == 0.0 { 0 } else { x.to_bits() })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SquareBorderKey {
    pub width: i64,
    pub height: i64,
    pub radius: i64,
    pub mode: SquareDistanceMode,
    pub cell: Real,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct GridlessBorderKey {
    pub width: Real,
    pub height: Real,
    pub radius: Real,
    pub cell: Real,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct HexKey {
    pub width: u32,
    pub height: u32,
    pub shape: HexShape,
    pub columnar: bool,
    pub cell: Real,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SquareCellsKey {
    pub width: u32,
    pub height: u32,
    pub cell: Real,
}

/// All memo tables used by border generation and footprint enumeration.
#[derive(Debug, Default)]
pub struct GeometryCache {
    pub(crate) square_borders: Memo<SquareBorderKey, Vec<PathCommand>>,
    pub(crate) gridless_borders: Memo<GridlessBorderKey, Vec<PathCommand>>,
    pub(crate) hex_outlines: Memo<(HexKey, i64), HexOutline>,
    pub(crate) square_cells: Memo<SquareCellsKey, Vec<Vector2<f64>>>,
    pub(crate) hex_cells: Memo<HexKey, Vec<Vector2<f64>>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for border tables (square, gridless, hex outlines).
    pub fn border_stats(&self) -> CacheStats {
        self.square_borders.stats() + self.gridless_borders.stats() + self.hex_outlines.stats()
    }

    /// Counters for footprint tables (square and hex cell centers).
    pub fn footprint_stats(&self) -> CacheStats {
        self.square_cells.stats() + self.hex_cells.stats()
    }

    pub fn stats(&self) -> CacheStats {
        self.border_stats() + self.footprint_stats()
    }
}
