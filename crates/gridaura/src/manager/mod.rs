//! Aura manager: per-scene registry and the inside-state table.
//!
//! Purpose
//! - Own every runtime `Aura` (keyed by owner token, then aura id) and the sparse
//!   relation `(owner, aura, target) -> inside`.
//! - Re-test (owner aura, target token) pairs on demand and report exactly the entries
//!   whose value flipped, as `Transition`s.
//!
//! Policy
//! - Iteration order is deterministic: owners and auras by id, targets by id.
//! - A pass updates the whole table before returning its transitions, so callers never
//!   observe a half-updated table while handling them.
//! - Owners are never inside their own auras. Disabled auras contain nothing, so entries
//!   that were `true` flip to `false` on the next pass.
//! - After `teardown` no transitions are produced; removals just drop state.
//! - Queries on unknown ids return "not inside" / empty lists.

mod types;

use std::collections::BTreeMap;

use crate::cache::{CacheStats, GeometryCache};
use crate::grid::{Footprint, Grid};
use crate::path::{self, PathCommand};
use crate::render::RenderSink;

pub use types::{
    Aura, AuraId, AuraSpec, ScenePhase, TestOptions, TokenId, TokenProvider, Transition,
};

/// Auras of one owner token, plus the footprint they were built for.
#[derive(Clone, Debug)]
struct Owner {
    footprint: Footprint,
    auras: BTreeMap<AuraId, Aura>,
}

impl Owner {
    /// Rebuild every aura when the owner's footprint changed.
    fn refresh(&mut self, cache: &mut GeometryCache, grid: &Grid, footprint: Footprint) {
        if self.footprint == footprint {
            return;
        }
        self.footprint = footprint;
        for aura in self.auras.values_mut() {
            aura.rebuild(cache, grid, footprint);
        }
    }
}

type InsideKey = (TokenId, AuraId, TokenId);

#[derive(Debug)]
pub struct AuraManager {
    grid: Grid,
    phase: ScenePhase,
    cache: GeometryCache,
    owners: BTreeMap<TokenId, Owner>,
    inside: BTreeMap<InsideKey, bool>,
}

impl AuraManager {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            phase: ScenePhase::Empty,
            cache: GeometryCache::new(),
            owners: BTreeMap::new(),
            inside: BTreeMap::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Start (or restart) a scene: drop all auras and inside state.
    pub fn begin_scene(&mut self) {
        self.owners.clear();
        self.inside.clear();
        self.phase = ScenePhase::Populating;
    }

    /// Enter the torn-down phase; later removals emit nothing.
    pub fn teardown(&mut self) {
        self.phase = ScenePhase::TornDown;
    }

    /// Switch topology or cell size; every aura geometry is rebuilt.
    pub fn set_grid(&mut self, grid: Grid) {
        if self.grid == grid {
            return;
        }
        self.grid = grid;
        let Self {
            grid, cache, owners, ..
        } = self;
        for owner in owners.values_mut() {
            let footprint = owner.footprint;
            for aura in owner.auras.values_mut() {
                aura.rebuild(cache, grid, footprint);
            }
        }
    }

    /// Register an owner token with its declared auras. Registering a known token upserts
    /// the given specs and keeps its other auras.
    pub fn register_token(&mut self, id: TokenId, footprint: Footprint, specs: Vec<AuraSpec>) {
        if self.phase == ScenePhase::Empty {
            self.phase = ScenePhase::Populating;
        }
        let Self {
            grid, cache, owners, ..
        } = self;
        let owner = owners.entry(id.clone()).or_insert_with(|| Owner {
            footprint,
            auras: BTreeMap::new(),
        });
        owner.refresh(cache, grid, footprint);
        for spec in specs {
            upsert(cache, grid, &id, owner, spec);
        }
    }

    /// Forget a token: its auras go away, and so does every inside entry naming it.
    ///
    /// Targets that were inside one of its auras get a leave transition (none once torn down).
    pub fn deregister_token(&mut self, id: &TokenId) -> Vec<Transition> {
        let removed = self.owners.remove(id);
        let mut out = Vec::new();
        let emit = self.phase != ScenePhase::TornDown;
        self.inside.retain(|(owner, aura, target), was_inside| {
            if owner != id {
                return target != id;
            }
            if emit && *was_inside {
                if let Some(a) = removed.as_ref().and_then(|o| o.auras.get(aura)) {
                    out.push(leave(target, owner, &a.spec));
                }
            }
            false
        });
        tracing::debug!(token = %id, leaves = out.len(), "token deregistered");
        out
    }

    /// Create or update one aura. Geometry is rebuilt only when radius or mode changed.
    /// Returns `false` when the owner is not registered. Does not re-test.
    pub fn upsert_aura(&mut self, owner_id: &TokenId, spec: AuraSpec) -> bool {
        let Self {
            grid, cache, owners, ..
        } = self;
        match owners.get_mut(owner_id) {
            Some(owner) => {
                upsert(cache, grid, owner_id, owner, spec);
                true
            }
            None => false,
        }
    }

    /// Drop one aura and its inside entries, emitting leaves for targets that were inside.
    pub fn remove_aura(&mut self, owner_id: &TokenId, aura_id: &AuraId) -> Vec<Transition> {
        let Some(aura) = self
            .owners
            .get_mut(owner_id)
            .and_then(|o| o.auras.remove(aura_id))
        else {
            return Vec::new();
        };
        let emit = self.phase != ScenePhase::TornDown;
        let mut out = Vec::new();
        self.inside.retain(|(owner, id, target), was_inside| {
            if owner != owner_id || id != aura_id {
                return true;
            }
            if emit && *was_inside {
                out.push(leave(target, owner, &aura.spec));
            }
            false
        });
        out
    }

    pub fn aura(&self, owner: &TokenId, aura: &AuraId) -> Option<&Aura> {
        self.owners.get(owner)?.auras.get(aura)
    }

    /// Auras of one owner in id order.
    pub fn auras(&self, owner: &TokenId) -> impl Iterator<Item = &Aura> {
        self.owners
            .get(owner)
            .into_iter()
            .flat_map(|o| o.auras.values())
    }

    /// Re-test the selected (owner aura, target) pairs and return the flips.
    ///
    /// A full pass (no source, no target) moves a populating scene to `Active`.
    pub fn test_all<P: TokenProvider + ?Sized>(
        &mut self,
        provider: &P,
        opts: &TestOptions,
    ) -> Vec<Transition> {
        if self.phase == ScenePhase::TornDown {
            return Vec::new();
        }
        let targets = match &opts.target {
            Some(id) => provider
                .token(id)
                .map(|t| vec![(id.clone(), t)])
                .unwrap_or_default(),
            None => {
                let mut ids = provider.token_ids();
                ids.sort();
                ids.dedup();
                ids.into_iter()
                    .filter_map(|id| provider.token(&id).map(|t| (id, t)))
                    .collect()
            }
        };

        let Self {
            grid,
            phase,
            cache,
            owners,
            inside,
        } = self;
        let mut out = Vec::new();
        let mut tested = 0usize;
        for (owner_id, owner) in owners.iter_mut() {
            if opts.source.as_ref().is_some_and(|s| s != owner_id) {
                continue;
            }
            let Some(snapshot) = provider.token(owner_id) else {
                continue;
            };
            owner.refresh(cache, grid, snapshot.footprint);
            for (aura_id, aura) in &owner.auras {
                let active = aura.is_active();
                for (target_id, target) in &targets {
                    if target_id == owner_id {
                        continue;
                    }
                    tested += 1;
                    let now = active
                        && aura
                            .geometry()
                            .contains_token(cache, grid, target, snapshot.position);
                    let key = (owner_id.clone(), aura_id.clone(), target_id.clone());
                    let before = inside.insert(key, now).unwrap_or(false);
                    if before != now {
                        tracing::trace!(
                            owner = %owner_id,
                            aura = %aura_id,
                            target = %target_id,
                            entered = now,
                            "inside state flipped"
                        );
                        out.push(Transition {
                            target: target_id.clone(),
                            owner: owner_id.clone(),
                            aura: aura.spec.clone(),
                            has_entered: now,
                            is_init: opts.is_init,
                            triggering_actor: opts.triggering_actor.clone(),
                        });
                    }
                }
            }
        }
        let full = opts.source.is_none() && opts.target.is_none();
        if full && matches!(*phase, ScenePhase::Empty | ScenePhase::Populating) {
            *phase = ScenePhase::Active;
        }
        tracing::debug!(tested, transitions = out.len(), "aura test pass");
        out
    }

    /// Both passes a move needs: the token's own auras against everyone, then everyone's
    /// auras against the token.
    pub fn token_moved<P: TokenProvider + ?Sized>(
        &mut self,
        provider: &P,
        token: &TokenId,
        triggering_actor: Option<String>,
    ) -> Vec<Transition> {
        let mut out = self.test_all(
            provider,
            &TestOptions {
                source: Some(token.clone()),
                triggering_actor: triggering_actor.clone(),
                ..TestOptions::default()
            },
        );
        out.extend(self.test_all(
            provider,
            &TestOptions {
                target: Some(token.clone()),
                triggering_actor,
                ..TestOptions::default()
            },
        ));
        out
    }

    /// Stored inside state; `false` for pairs never tested.
    pub fn is_inside(&self, owner: &TokenId, aura: &AuraId, target: &TokenId) -> bool {
        self.inside
            .get(&(owner.clone(), aura.clone(), target.clone()))
            .copied()
            .unwrap_or(false)
    }

    /// Targets currently inside one aura, in id order.
    pub fn tokens_inside_aura(&self, owner: &TokenId, aura: &AuraId) -> Vec<TokenId> {
        self.inside
            .iter()
            .filter(|((o, a, _), &v)| v && o == owner && a == aura)
            .map(|((_, _, t), _)| t.clone())
            .collect()
    }

    /// `(owner, aura)` pairs whose aura currently contains `token`.
    pub fn auras_containing_token(&self, token: &TokenId) -> Vec<(TokenId, AuraId)> {
        self.inside
            .iter()
            .filter(|((_, _, t), &v)| v && t == token)
            .map(|((o, a, _), _)| (o.clone(), a.clone()))
            .collect()
    }

    /// Border of one aura translated to the owner's canvas position.
    pub fn border_on_canvas<P: TokenProvider + ?Sized>(
        &self,
        owner: &TokenId,
        aura: &AuraId,
        provider: &P,
    ) -> Option<Vec<PathCommand>> {
        let a = self.aura(owner, aura)?;
        let at = provider.token(owner)?.position;
        Some(path::translate(a.geometry().border(), at))
    }

    /// Hand every enabled, non-empty aura border to `sink`, owner by owner.
    pub fn render<P: TokenProvider + ?Sized>(&self, provider: &P, sink: &mut dyn RenderSink) {
        for (owner_id, owner) in &self.owners {
            let Some(snapshot) = provider.token(owner_id) else {
                continue;
            };
            for aura in owner.auras.values() {
                let border = aura.geometry().border();
                if !aura.spec.enabled || border.is_empty() {
                    continue;
                }
                let on_canvas = path::translate(border, snapshot.position);
                for pass in aura.spec.style.passes() {
                    sink.draw(&on_canvas, &pass);
                }
            }
        }
    }
}

fn upsert(
    cache: &mut GeometryCache,
    grid: &Grid,
    owner_id: &TokenId,
    owner: &mut Owner,
    spec: AuraSpec,
) {
    match owner.auras.get_mut(&spec.id) {
        Some(aura) => {
            let reshaped = aura.spec.reshapes(&spec);
            aura.spec = spec;
            if reshaped {
                aura.rebuild(cache, grid, owner.footprint);
            }
        }
        None => {
            let id = spec.id.clone();
            let aura = Aura::build(cache, grid, owner_id.clone(), owner.footprint, spec);
            owner.auras.insert(id, aura);
        }
    }
}

fn leave(target: &TokenId, owner: &TokenId, spec: &AuraSpec) -> Transition {
    Transition {
        target: target.clone(),
        owner: owner.clone(),
        aura: spec.clone(),
        has_entered: false,
        is_init: false,
        triggering_actor: None,
    }
}

#[cfg(test)]
mod tests;
