//! Scene files: a grid, tokens with their auras, and scripted moves.
//!
//! ```json
//! { "grid": { "topology": "square", "cell_size": 100 },
//!   "tokens": [{ "id": "a", "position": [0, 0], "auras": [{ "id": "glow", "radius": 2 }] }],
//!   "steps": [{ "moves": [{ "token": "b", "position": [200, 0] }], "actor": "gm" }] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gridaura::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    pub grid: Grid,
    #[serde(default)]
    pub tokens: Vec<SceneToken>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneToken {
    pub id: TokenId,
    pub position: Vec2<f64>,
    #[serde(default)]
    pub footprint: Footprint,
    /// Actor controlling this token; reported as the trigger when it moves.
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub auras: Vec<AuraSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    pub moves: Vec<Move>,
    /// Overrides the moved tokens' actors as the trigger.
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Move {
    pub token: TokenId,
    pub position: Vec2<f64>,
}

/// A transition tagged with the step that produced it (0 is the initial pass).
#[derive(Clone, Debug, Serialize)]
pub struct Event {
    pub step: usize,
    #[serde(flatten)]
    pub transition: Transition,
}

pub fn load(path: &Path) -> Result<Scene> {
    let bytes = fs::read(path).with_context(|| format!("reading scene {}", path.display()))?;
    let scene: Scene = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    scene.validate()?;
    Ok(scene)
}

impl Scene {
    fn validate(&self) -> Result<()> {
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(self.grid.cell_size).into());
        }
        let mut seen = std::collections::BTreeSet::new();
        for t in &self.tokens {
            if !seen.insert(&t.id) {
                bail!("duplicate token id `{}`", t.id);
            }
        }
        for (i, step) in self.steps.iter().enumerate() {
            for m in &step.moves {
                if !seen.contains(&m.token) {
                    bail!("step {} moves unknown token `{}`", i + 1, m.token);
                }
            }
        }
        Ok(())
    }

    pub fn snapshots(&self) -> BTreeMap<TokenId, TokenSnapshot> {
        self.tokens
            .iter()
            .map(|t| {
                (
                    t.id.clone(),
                    TokenSnapshot {
                        position: t.position,
                        footprint: t.footprint,
                    },
                )
            })
            .collect()
    }

    /// Manager with every token registered, before any test pass.
    pub fn manager(&self) -> AuraManager {
        let mut m = AuraManager::new(self.grid);
        m.begin_scene();
        for t in &self.tokens {
            m.register_token(t.id.clone(), t.footprint, t.auras.clone());
        }
        m
    }

    fn actor_of(&self, id: &TokenId) -> Option<String> {
        self.tokens
            .iter()
            .find(|t| &t.id == id)
            .and_then(|t| t.actor.clone())
    }
}

/// Initial pass plus every scripted step, in order.
pub fn replay(scene: &Scene) -> Vec<Event> {
    let mut tokens = scene.snapshots();
    let mut m = scene.manager();
    let mut events: Vec<Event> = m
        .test_all(&tokens, &TestOptions::init())
        .into_iter()
        .map(|transition| Event {
            step: 0,
            transition,
        })
        .collect();
    for (i, step) in scene.steps.iter().enumerate() {
        for mv in &step.moves {
            if let Some(t) = tokens.get_mut(&mv.token) {
                t.position = mv.position;
            }
        }
        for mv in &step.moves {
            let actor = step.actor.clone().or_else(|| scene.actor_of(&mv.token));
            let out = m.token_moved(&tokens, &mv.token, actor);
            events.extend(out.into_iter().map(|transition| Event {
                step: i + 1,
                transition,
            }));
        }
        tracing::debug!(step = i + 1, moves = step.moves.len(), "step replayed");
    }
    events
}

/// `(owner, aura) -> targets inside` after the initial pass.
pub fn inside_report(scene: &Scene) -> BTreeMap<String, Vec<TokenId>> {
    let tokens = scene.snapshots();
    let mut m = scene.manager();
    m.test_all(&tokens, &TestOptions::init());
    let mut out = BTreeMap::new();
    for t in &scene.tokens {
        for aura in m.auras(&t.id) {
            let key = format!("{}/{}", t.id, aura.spec.id);
            out.insert(key, m.tokens_inside_aura(&t.id, &aura.spec.id));
        }
    }
    out
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
