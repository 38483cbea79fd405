use super::*;
use crate::grid::{SquareDistanceMode, TokenSnapshot};
use crate::render::{AuraStyle, LineType, RenderPass};

const CELL: f64 = 100.0;

type Tokens = BTreeMap<TokenId, TokenSnapshot>;

fn id(s: &str) -> TokenId {
    TokenId::from(s)
}

fn aid(s: &str) -> AuraId {
    AuraId::from(s)
}

/// Square grid with owner `a` (radius-2 Manhattan aura "glow") at the origin and `b` far away.
fn scene() -> (AuraManager, Tokens) {
    let mut tokens = Tokens::new();
    tokens.insert(id("a"), TokenSnapshot::new(0.0, 0.0, Footprint::default()));
    tokens.insert(id("b"), TokenSnapshot::new(1000.0, 0.0, Footprint::default()));
    let mut m = AuraManager::new(Grid::square(CELL));
    m.begin_scene();
    m.register_token(
        id("a"),
        Footprint::default(),
        vec![AuraSpec::new("glow", 2.0).with_mode(SquareDistanceMode::Manhattan)],
    );
    m.register_token(id("b"), Footprint::default(), Vec::new());
    (m, tokens)
}

fn move_to(tokens: &mut Tokens, who: &str, x: f64, y: f64) {
    if let Some(t) = tokens.get_mut(&id(who)) {
        t.position = nalgebra::Vector2::new(x, y);
    }
}

#[test]
fn init_pass_activates_scene_and_reports_nothing_outside() {
    let (mut m, tokens) = scene();
    assert_eq!(m.phase(), ScenePhase::Populating);
    let out = m.test_all(&tokens, &TestOptions::init());
    assert!(out.is_empty());
    assert_eq!(m.phase(), ScenePhase::Active);
    assert!(!m.is_inside(&id("a"), &aid("glow"), &id("b")));
}

#[test]
fn enter_and_leave_flip_once_each() {
    let (mut m, mut tokens) = scene();
    m.test_all(&tokens, &TestOptions::init());

    move_to(&mut tokens, "b", 200.0, 0.0);
    let out = m.token_moved(&tokens, &id("b"), Some("actor-1".into()));
    assert_eq!(out.len(), 1);
    let t = &out[0];
    assert_eq!((t.owner.clone(), t.target.clone()), (id("a"), id("b")));
    assert!(t.has_entered && !t.is_init);
    assert_eq!(t.triggering_actor.as_deref(), Some("actor-1"));
    assert_eq!(t.aura.id, aid("glow"));

    // moving within the aura is not a flip
    move_to(&mut tokens, "b", 100.0, 100.0);
    assert!(m.token_moved(&tokens, &id("b"), None).is_empty());

    move_to(&mut tokens, "b", 200.0, 100.0);
    let out = m.token_moved(&tokens, &id("b"), None);
    assert_eq!(out.len(), 1);
    assert!(!out[0].has_entered);
}

#[test]
fn owner_moving_is_tested_as_source() {
    let (mut m, mut tokens) = scene();
    m.test_all(&tokens, &TestOptions::init());
    move_to(&mut tokens, "a", 900.0, 0.0);
    let out = m.token_moved(&tokens, &id("a"), None);
    assert_eq!(out.len(), 1);
    assert!(out[0].has_entered);
    assert_eq!(m.tokens_inside_aura(&id("a"), &aid("glow")), vec![id("b")]);
    assert_eq!(
        m.auras_containing_token(&id("b")),
        vec![(id("a"), aid("glow"))]
    );
}

#[test]
fn owner_is_never_inside_its_own_aura() {
    let (mut m, tokens) = scene();
    m.test_all(&tokens, &TestOptions::init());
    assert!(!m.is_inside(&id("a"), &aid("glow"), &id("a")));
    assert!(m.auras_containing_token(&id("a")).is_empty());
}

#[test]
fn disabling_an_aura_emits_leaves() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 100.0, 0.0);
    let out = m.test_all(&tokens, &TestOptions::init());
    assert_eq!(out.len(), 1);
    assert!(out[0].is_init);

    let mut spec = m.aura(&id("a"), &aid("glow")).unwrap().spec.clone();
    spec.enabled = false;
    assert!(m.upsert_aura(&id("a"), spec));
    let out = m.test_all(&tokens, &TestOptions::default());
    assert_eq!(out.len(), 1);
    assert!(!out[0].has_entered);

    // a negative radius behaves the same once re-enabled
    let spec = AuraSpec::new("glow", -1.0);
    m.upsert_aura(&id("a"), spec);
    assert!(m.aura(&id("a"), &aid("glow")).unwrap().geometry().is_disabled());
    assert!(m.test_all(&tokens, &TestOptions::default()).is_empty());
}

#[test]
fn upsert_rebuilds_only_on_shape_changes() {
    let (mut m, _) = scene();
    let misses = m.cache_stats().misses;
    let mut spec = m.aura(&id("a"), &aid("glow")).unwrap().spec.clone();
    spec.name = "Glow".into();
    m.upsert_aura(&id("a"), spec.clone());
    assert_eq!(m.cache_stats().misses, misses);
    spec.radius = 3.0;
    m.upsert_aura(&id("a"), spec);
    assert!(m.cache_stats().misses > misses);
    assert!(!m.upsert_aura(&id("nobody"), AuraSpec::new("x", 1.0)));
}

#[test]
fn footprint_change_rebuilds_geometry() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 400.0, 0.0);
    assert!(m.test_all(&tokens, &TestOptions::init()).is_empty());
    // growing the owner to 3 cells wide brings b within two cells
    tokens.get_mut(&id("a")).unwrap().footprint = Footprint::new(3.0, 1.0);
    let out = m.token_moved(&tokens, &id("a"), None);
    assert_eq!(out.len(), 1);
    assert_eq!(
        m.aura(&id("a"), &aid("glow")).unwrap().footprint(),
        &Footprint::new(3.0, 1.0)
    );
}

#[test]
fn deregister_emits_leaves_for_insiders() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 100.0, 0.0);
    m.test_all(&tokens, &TestOptions::init());
    let out = m.deregister_token(&id("a"));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].target, id("b"));
    assert!(!out[0].has_entered);
    assert!(m.auras_containing_token(&id("b")).is_empty());
    assert!(m.aura(&id("a"), &aid("glow")).is_none());
}

#[test]
fn teardown_suppresses_transitions() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 100.0, 0.0);
    m.test_all(&tokens, &TestOptions::init());
    m.teardown();
    assert_eq!(m.phase(), ScenePhase::TornDown);
    move_to(&mut tokens, "b", 1000.0, 0.0);
    assert!(m.test_all(&tokens, &TestOptions::default()).is_empty());
    assert!(m.deregister_token(&id("a")).is_empty());
}

#[test]
fn remove_aura_emits_leaves() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 100.0, 0.0);
    m.test_all(&tokens, &TestOptions::init());
    let out = m.remove_aura(&id("a"), &aid("glow"));
    assert_eq!(out.len(), 1);
    assert!(m.tokens_inside_aura(&id("a"), &aid("glow")).is_empty());
    assert!(m.remove_aura(&id("a"), &aid("glow")).is_empty());
}

#[test]
fn set_grid_rebuilds_every_aura() {
    let (mut m, mut tokens) = scene();
    // three cells out on the square grid
    move_to(&mut tokens, "b", 280.0, 0.0);
    assert!(m.test_all(&tokens, &TestOptions::init()).is_empty());
    // gridless discs: centers 280px apart, reach is 200px plus two 50px half-widths
    m.set_grid(Grid::gridless(CELL));
    let out = m.test_all(&tokens, &TestOptions::default());
    assert_eq!(out.len(), 1);
    assert!(matches!(
        m.aura(&id("a"), &aid("glow")).unwrap().geometry(),
        crate::geometry::AuraGeometry::Gridless(_)
    ));
}

#[test]
fn unknown_pairs_are_not_inside() {
    let (m, _) = scene();
    assert!(!m.is_inside(&id("x"), &aid("y"), &id("z")));
    assert!(m.tokens_inside_aura(&id("x"), &aid("y")).is_empty());
    assert!(m.border_on_canvas(&id("x"), &aid("y"), &Tokens::new()).is_none());
}

#[test]
fn render_hands_canvas_borders_to_sink() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "a", 500.0, 300.0);
    let dashed = AuraSpec {
        style: AuraStyle {
            line_type: LineType::Dashed,
            ..AuraStyle::default()
        },
        ..AuraSpec::new("ring", 1.0)
    };
    m.upsert_aura(&id("a"), dashed);
    let mut hidden = AuraSpec::new("off", 1.0);
    hidden.enabled = false;
    m.upsert_aura(&id("a"), hidden);

    let mut sink: Vec<(Vec<PathCommand>, RenderPass)> = Vec::new();
    m.render(&tokens, &mut sink);
    // glow: one solid pass; ring: fill pass then dashed stroke pass; off: nothing
    assert_eq!(sink.len(), 3);
    let expected = m.border_on_canvas(&id("a"), &aid("glow"), &tokens).unwrap();
    assert_eq!(sink[0].0, expected);
    let (lo, _) = path::bounds(&expected).unwrap();
    assert_eq!(lo, nalgebra::Vector2::new(300.0, 100.0));
    assert!(sink[2].1.stroke.as_ref().unwrap().dash.is_some());
}

#[test]
fn transitions_serialize_for_event_sinks() {
    let (mut m, mut tokens) = scene();
    move_to(&mut tokens, "b", 100.0, 0.0);
    let out = m.test_all(&tokens, &TestOptions::init());
    let json = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(json["owner"], "a");
    assert_eq!(json["target"], "b");
    assert_eq!(json["has_entered"], true);
    assert_eq!(json["aura"]["square_mode"], "manhattan");
    assert!(json.get("triggering_actor").is_none());
}
