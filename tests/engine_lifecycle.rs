use scrollstage::{
    Engine, EngineConfig, Node, Page, Prop, Role, Viewport,
};

fn fixture() -> Page {
    serde_json::from_str(include_str!("data/page.json")).unwrap()
}

#[test]
fn overlay_is_dismissed_on_load() {
    let mut engine = Engine::init(fixture(), EngineConfig::default());
    assert!(!engine.overlay_dismissed());

    engine.on_loaded();
    assert!(engine.overlay_dismissed());
    assert_eq!(
        engine.page().prop(&"preloader".into(), Prop::YPercent),
        Some(-100.0)
    );
}

#[test]
fn failsafe_dismisses_a_stuck_overlay() {
    let mut engine = Engine::init(fixture(), EngineConfig::default());

    engine.on_frame(0.5);
    assert!(!engine.overlay_dismissed());
    engine.on_frame(4.0);
    assert!(!engine.overlay_dismissed());

    // 6 seconds after the first frame, loading never finished.
    engine.on_frame(6.6);
    assert!(engine.overlay_dismissed());
    assert_eq!(
        engine.page().prop(&"preloader".into(), Prop::YPercent),
        Some(-100.0)
    );
}

#[test]
fn invalid_page_degrades_instead_of_failing() {
    let mut page = Page::new(Viewport::new(1440.0, 900.0).unwrap());
    // A counter with no declared end value fails validation.
    page.insert(Node::new("broken").with_role(Role::Counter));
    page.insert(Node::new("preloader").with_role(Role::PreloaderOverlay));

    let mut engine = Engine::init(page, EngineConfig::default());
    assert!(engine.orchestrator().sections().is_empty());
    // Content is never trapped behind the overlay.
    assert!(engine.overlay_dismissed());
    assert_eq!(
        engine.page().prop(&"preloader".into(), Prop::YPercent),
        Some(-100.0)
    );

    // Driving the degraded engine is a harmless no-op.
    engine.on_scroll(500.0);
    engine.on_frame(0.0);
    engine.on_scroll_settled(0.1);
}

#[test]
fn init_segments_marked_text_blocks() {
    let engine = Engine::init(fixture(), EngineConfig::default());
    let page = engine.page();

    let source = page.node(&"hero-secondary/title".into()).unwrap();
    assert!(source.segmented);

    // "Fature Alto<br>Todos os Dias": line 0 has 2 words, line 1 has 3.
    assert!(page.contains(&"hero-secondary/title::l0w1c3".into()));
    assert!(page.contains(&"hero-secondary/title::l1w2c0".into()));
    assert_eq!(
        page.prop(&"hero-secondary/title::l0w0c0".into(), Prop::YPercent),
        Some(100.0)
    );
}

fn first_section_page() -> Page {
    let mut page = Page::new(Viewport::new(1440.0, 900.0).unwrap());
    page.content_height = 4000.0;
    page.insert(Node::new("hero-window").with_role(Role::PinnedSection));
    page.insert(
        Node::new("hero-window/title")
            .with_role(Role::SplitText)
            .with_text("Voar Alto"),
    );
    page
}

#[test]
fn first_section_characters_rise_after_load() {
    let mut engine = Engine::init(first_section_page(), EngineConfig::default());
    let first = "hero-window/title::l0w0c0";
    let last = "hero-window/title::l0w1c3";
    assert_eq!(engine.page().prop(&first.into(), Prop::YPercent), Some(100.0));

    engine.on_loaded();
    engine.on_frame(0.0);
    engine.on_frame(0.4);
    let mid = engine.page().prop(&first.into(), Prop::YPercent).unwrap();
    assert!(mid < 100.0, "leading glyph never started rising: {mid}");

    engine.on_frame(5.0);
    assert_eq!(engine.page().prop(&first.into(), Prop::YPercent), Some(0.0));
    assert_eq!(engine.page().prop(&last.into(), Prop::YPercent), Some(0.0));
}

#[test]
fn first_section_characters_snap_home_under_reduced_motion() {
    let config = EngineConfig {
        reduced_motion: true,
        ..EngineConfig::default()
    };
    let mut engine = Engine::init(first_section_page(), config);
    engine.on_loaded();
    engine.on_frame(0.0);
    assert_eq!(
        engine
            .page()
            .prop(&"hero-window/title::l0w0c0".into(), Prop::YPercent),
        Some(0.0)
    );
}

#[test]
fn page_show_restores_the_top_of_page_state() {
    let mut engine = Engine::init(fixture(), EngineConfig::default());
    engine.on_loaded();
    engine.on_scroll(3000.0);
    engine.on_frame(0.0);
    assert_eq!(engine.scroll_y(), 3000.0);

    engine.on_page_show();
    assert_eq!(engine.scroll_y(), 0.0);
}

#[test]
fn negative_scroll_samples_clamp_to_zero() {
    let mut engine = Engine::init(fixture(), EngineConfig::default());
    engine.on_scroll(-80.0);
    assert_eq!(engine.scroll_y(), 0.0);
}
