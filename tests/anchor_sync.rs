use scrollstage::{
    AnchorSpec, Engine, EngineConfig, Page, VAR_OVERLAY_LEFT, VAR_OVERLAY_RIGHT_GAP,
    VAR_OVERLAY_TOP, VAR_REFERENCE_RIGHT, Viewport,
};

fn fixture() -> Page {
    serde_json::from_str(include_str!("data/page.json")).unwrap()
}

fn anchored_config() -> EngineConfig {
    EngineConfig {
        anchors: vec![AnchorSpec::new(
            "hero-window/headline-right",
            "hero-window/price-tag",
            "hero-window/container",
        )],
        ..EngineConfig::default()
    }
}

#[test]
fn anchor_offsets_publish_at_startup() {
    let engine = Engine::init(fixture(), anchored_config());
    let page = engine.page();

    // Container 1280 wide, overlay 180, preserved right margin 16:
    // left clamps at 1280 - 180 - 16 = 1084 (desired was 1160 + 18).
    assert_eq!(page.var(VAR_OVERLAY_LEFT), Some(1084.0));
    assert_eq!(page.var(VAR_OVERLAY_RIGHT_GAP), Some(16.0));
    assert_eq!(page.var(VAR_REFERENCE_RIGHT), Some(1160.0));
    // Reference top 200 into the container + 62% of its 200px height.
    assert_eq!(page.var(VAR_OVERLAY_TOP), Some(324.0));
}

#[test]
fn resize_recomputes_on_the_next_frame_only() {
    let mut engine = Engine::init(fixture(), anchored_config());
    engine.on_loaded();
    assert_eq!(engine.page().var(VAR_OVERLAY_TOP), Some(324.0));

    // Crossing to the mobile breakpoint changes the vertical bias to 0.58.
    engine.on_resize(Viewport::new(390.0, 844.0).unwrap());
    assert_eq!(engine.page().var(VAR_OVERLAY_TOP), Some(324.0));

    engine.on_frame(0.0);
    assert_eq!(engine.page().var(VAR_OVERLAY_TOP), Some(316.0));
}

#[test]
fn repeated_frames_republish_identical_offsets() {
    let mut engine = Engine::init(fixture(), anchored_config());
    engine.on_loaded();

    let before = (
        engine.page().var(VAR_OVERLAY_LEFT),
        engine.page().var(VAR_OVERLAY_TOP),
    );
    for i in 0..5 {
        engine.on_layout_settle();
        engine.on_frame(i as f64 / 60.0);
    }
    let after = (
        engine.page().var(VAR_OVERLAY_LEFT),
        engine.page().var(VAR_OVERLAY_TOP),
    );
    assert_eq!(before, after);
}
