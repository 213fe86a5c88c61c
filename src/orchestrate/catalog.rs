//! The fixed catalog of section transitions: hero window zoom/cross/down,
//! hero-to-session recession with the crossing flyer, the immersive session
//! with its counters, the stepped story and the card choreography.
//!
//! Each builder resolves its responsive parameters once, authors a phase
//! timeline through [`TimelineBuilder`] and wires reveal targets, counters
//! and steppers. A missing section root disables that section; missing
//! sub-targets degrade to no-op property writes.

use crate::{
    animation::counter::CountUp,
    animation::ease::Ease,
    animation::tween::Tween,
    foundation::core::Breakpoint,
    foundation::error::StageResult,
    orchestrate::config::{Responsive, SectionConfig},
    orchestrate::orchestrator::{RevealTargets, SectionRuntime, StoryStepper},
    page::model::{CounterFormat, NodeId, Page, Prop, Role},
    timeline::machine::SideEffect,
    timeline::phase::{Placement, TimelineBuilder},
};

/// Conventional node ids consumed by the catalog.
pub mod ids {
    pub const SITE_LOGO: &str = "site-logo";

    pub const HERO_WINDOW: &str = "hero-window";
    pub const WINDOW_SCENE: &str = "hero-window/scene";
    pub const WINDOW_PORTAL: &str = "hero-window/portal";
    pub const WINDOW_CLOUDS: &str = "hero-window/clouds";
    pub const WINDOW_FRAME: &str = "hero-window/frame";
    pub const WINDOW_VIGNETTE: &str = "hero-window/vignette";
    pub const HERO1_BG: &str = "hero-window/bg";
    pub const HERO1_CONTAINER: &str = "hero-window/container";
    pub const HERO1_INTRO_TOP: &str = "hero-window/intro-top";
    pub const HERO1_INTRO_BOTTOM: &str = "hero-window/intro-bottom";
    pub const HERO1_HEADLINE_RIGHT: &str = "hero-window/headline-right";
    pub const HERO1_SUBTITLE: &str = "hero-window/subtitle";

    pub const HERO_SECONDARY: &str = "hero-secondary";
    pub const HERO2_CONTAINER: &str = "hero-secondary/container";
    pub const TRANSITION_FLYER: &str = "hero-secondary/flyer";

    pub const SESSION: &str = "session";
    pub const SESSION_INNER: &str = "session/inner";
    pub const SESSION_LIGHT: &str = "session/light";

    pub const STORY: &str = "story";
    pub const CARDS: &str = "cards";
}

fn tw(target: &str, prop: Prop, from: f64, to: f64) -> Tween {
    Tween::new(target, prop, from, to, Ease::Linear)
}

/// Build the full ordered catalog for the current page. Sections whose root
/// node is absent are skipped.
pub fn build(page: &Page) -> StageResult<Vec<SectionRuntime>> {
    let mut sections = Vec::new();
    if let Some(s) = hero_window(page)? {
        sections.push(s);
    }
    if let Some(s) = hero_to_session(page)? {
        sections.push(s);
    }
    if let Some(s) = session_immersive(page)? {
        sections.push(s);
    }
    if let Some(s) = story(page)? {
        sections.push(s);
    }
    if let Some(s) = cards(page)? {
        sections.push(s);
    }
    tracing::info!(sections = sections.len(), "catalog built");
    Ok(sections)
}

/// Hero window: hold, zoom through the frame, cross it, look down, reveal
/// the next hero underneath while still pinned.
fn hero_window(page: &Page) -> StageResult<Option<SectionRuntime>> {
    let root: NodeId = ids::HERO_WINDOW.into();
    if !page.contains(&root) {
        return Ok(None);
    }
    let mobile = page.viewport.breakpoint() == Breakpoint::Mobile;

    let zoom_scale = if mobile { 2.85 } else { 2.7 };
    let down_scale = if mobile { 3.25 } else { 3.6 };
    let (top_x, top_y) = if mobile { (-14.0, -18.0) } else { (-26.0, -34.0) };
    let (bottom_x, bottom_y) = if mobile { (16.0, 18.0) } else { (30.0, 32.0) };
    let right_x = if mobile { 16.0 } else { 30.0 };
    let subtitle_x = if mobile { -120.0 } else { -220.0 };
    let logo_dock_y = if mobile { 24.0 } else { 28.0 };
    let logo_dock_scale = if mobile { 0.46 } else { 0.40 };

    let timeline = TimelineBuilder::new()
        .hold(0.12)?
        .phase("zoom", Placement::Sequential, 0.70)?
        .tween(tw(ids::WINDOW_SCENE, Prop::Scale, 1.0, zoom_scale))?
        .tween(tw(ids::HERO1_CONTAINER, Prop::Scale, 1.0, zoom_scale))?
        .tween(tw(ids::WINDOW_CLOUDS, Prop::YPercent, 0.0, -6.0))?
        .tween(tw(ids::SITE_LOGO, Prop::TranslateY, 0.0, logo_dock_y))?
        .tween(tw(ids::SITE_LOGO, Prop::Scale, 1.0, logo_dock_scale))?
        .tween(tw(ids::HERO1_INTRO_TOP, Prop::XPercent, 0.0, top_x))?
        .tween(tw(ids::HERO1_INTRO_TOP, Prop::YPercent, 0.0, top_y))?
        .tween(tw(ids::HERO1_INTRO_BOTTOM, Prop::XPercent, 0.0, bottom_x))?
        .tween(tw(ids::HERO1_INTRO_BOTTOM, Prop::YPercent, 0.0, bottom_y))?
        .tween(tw(ids::HERO1_HEADLINE_RIGHT, Prop::XPercent, 0.0, right_x))?
        .tween(tw(ids::HERO1_SUBTITLE, Prop::TranslateX, 0.0, subtitle_x))?
        .phase("cross", Placement::Sequential, 0.18)?
        .tween_over(tw(ids::WINDOW_FRAME, Prop::Opacity, 1.0, 0.0), 0.0, 0.16)?
        .tween(tw(ids::HERO1_CONTAINER, Prop::Opacity, 1.0, 0.0))?
        .phase("down", Placement::Sequential, 0.65)?
        .tween(tw(ids::WINDOW_SCENE, Prop::RotateX, 0.0, 16.0))?
        .tween(tw(ids::WINDOW_SCENE, Prop::TranslateY, 0.0, 240.0))?
        .tween(tw(ids::WINDOW_SCENE, Prop::Scale, zoom_scale, down_scale))?
        .tween(tw(ids::WINDOW_PORTAL, Prop::YPercent, 0.0, -18.0))?
        .tween(tw(ids::WINDOW_CLOUDS, Prop::YPercent, -6.0, -18.0))?
        .tween_over(tw(ids::WINDOW_VIGNETTE, Prop::Opacity, 0.0, 1.0), 0.0, 0.40)?
        .phase(
            "pre-reveal",
            Placement::AfterLabel {
                label: "down".into(),
                offset: 0.38,
            },
            0.22,
        )?
        .tween(tw(ids::HERO_WINDOW, Prop::Opacity, 1.0, 0.65))?
        // Reveal Hero 2 while the portal is still visible (down+0.40).
        .effect(SideEffect::RevealNext, 0.02)?
        .phase("reveal-next", Placement::Sequential, 0.20)?
        .tween(tw(ids::WINDOW_SCENE, Prop::Opacity, 1.0, 0.0))?
        .tween(tw(ids::HERO1_BG, Prop::Opacity, 1.0, 0.0))?
        .tween(tw(ids::HERO_WINDOW, Prop::Opacity, 0.65, 0.0))?
        // Open-ended transitions (logo dock, scene descent) need explicit
        // rest values for the terminal reset.
        .rest(ids::WINDOW_FRAME, Prop::Opacity, 1.0)
        .rest(ids::WINDOW_PORTAL, Prop::YPercent, 0.0)
        .rest(ids::WINDOW_SCENE, Prop::Scale, 1.0)
        .rest(ids::WINDOW_SCENE, Prop::RotateX, 0.0)
        .rest(ids::WINDOW_SCENE, Prop::TranslateY, 0.0)
        .rest(ids::WINDOW_SCENE, Prop::Opacity, 1.0)
        .rest(ids::WINDOW_CLOUDS, Prop::YPercent, 0.0)
        .rest(ids::HERO1_CONTAINER, Prop::Scale, 1.0)
        .rest(ids::HERO1_CONTAINER, Prop::Opacity, 1.0)
        .rest(ids::HERO1_INTRO_TOP, Prop::XPercent, 0.0)
        .rest(ids::HERO1_INTRO_TOP, Prop::YPercent, 0.0)
        .rest(ids::HERO1_INTRO_BOTTOM, Prop::XPercent, 0.0)
        .rest(ids::HERO1_INTRO_BOTTOM, Prop::YPercent, 0.0)
        .rest(ids::HERO1_HEADLINE_RIGHT, Prop::XPercent, 0.0)
        .rest(ids::HERO1_SUBTITLE, Prop::TranslateX, 0.0)
        .rest(ids::SITE_LOGO, Prop::TranslateY, 0.0)
        .rest(ids::SITE_LOGO, Prop::Scale, 1.0)
        .rest(ids::WINDOW_VIGNETTE, Prop::Opacity, 0.0)
        .rest(ids::HERO1_BG, Prop::Opacity, 1.0)
        .rest(ids::HERO_WINDOW, Prop::Opacity, 1.0)
        .build()?;

    Ok(Some(SectionRuntime::new(
        root,
        SectionConfig::default(),
        timeline,
    )))
}

/// Hero 2 recedes into the background while the flyer crosses the viewport
/// and the session content pre-reveals in the distance.
fn hero_to_session(page: &Page) -> StageResult<Option<SectionRuntime>> {
    let root: NodeId = ids::HERO_SECONDARY.into();
    if !page.contains(&root) {
        return Ok(None);
    }
    let mobile = page.viewport.breakpoint() == Breakpoint::Mobile;

    let flyer_cross = if mobile { 0.85 } else { 0.55 };
    let flyer_fade = if mobile { 0.14 } else { 0.10 };
    let flyer_width = page
        .node(&ids::TRANSITION_FLYER.into())
        .map(|n| n.rect.width().max(1.0))
        .unwrap_or(1.0);
    let flyer_start_x = -(page.viewport.width / 2.0 + flyer_width / 2.0 + 80.0);
    let flyer_end_x = page.viewport.width / 2.0 + flyer_width / 2.0 + 80.0;

    let (inner_y, inner_scale) = if mobile { (72.0, 1.08) } else { (78.0, 1.07) };
    let (inner_rx, inner_ry) = if mobile { (11.0, -5.0) } else { (13.0, -7.0) };
    let inner_z = if mobile { -130.0 } else { -190.0 };

    let items = session_items(page);

    let mut b = TimelineBuilder::new()
        .hold(0.04)?
        .phase("blur-start", Placement::Sequential, 0.55)?
        .tween(tw(ids::HERO2_CONTAINER, Prop::Scale, 1.0, 0.72))?
        .tween(tw(ids::HERO2_CONTAINER, Prop::ZDepth, 0.0, -380.0))?
        .tween(tw(ids::HERO2_CONTAINER, Prop::RotateX, 0.0, 10.0))?
        .tween(tw(ids::HERO2_CONTAINER, Prop::Blur, 0.0, 14.0))?
        .tween(tw(ids::HERO2_CONTAINER, Prop::Opacity, 1.0, 0.15))?
        .tween(tw(ids::HERO2_CONTAINER, Prop::YPercent, 0.0, -8.0))?
        .phase("flyer", Placement::WithLabel("blur-start".into()), flyer_cross)?
        .tween_over(tw(ids::TRANSITION_FLYER, Prop::Opacity, 0.0, 1.0), 0.0, 0.02)?
        .tween(tw(
            ids::TRANSITION_FLYER,
            Prop::TranslateX,
            flyer_start_x,
            flyer_end_x,
        ))?
        .phase(
            "flyer-fade",
            Placement::AfterLabel {
                label: "blur-start".into(),
                offset: flyer_cross,
            },
            flyer_fade,
        )?
        .tween(tw(ids::TRANSITION_FLYER, Prop::Opacity, 1.0, 0.0))?
        // Subtle pre-reveal so the session never feels dead behind the blur.
        .phase(
            "session-pre",
            Placement::AfterLabel {
                label: "blur-start".into(),
                offset: (flyer_cross * 0.58).max(0.14),
            },
            0.30,
        )?
        .tween(tw(ids::SESSION_INNER, Prop::TranslateY, 120.0, inner_y))?
        .tween(tw(ids::SESSION_INNER, Prop::Scale, 1.12, inner_scale))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateX, 18.0, inner_rx))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateY, -10.0, inner_ry))?
        .tween(tw(ids::SESSION_INNER, Prop::ZDepth, -260.0, inner_z))?
        .tween(tw(ids::SESSION_INNER, Prop::Blur, 18.0, 8.0))?;

    if !items.is_empty() {
        let stagger = 0.03;
        let dur = 0.24;
        b = b.phase(
            "items-pre",
            Placement::AfterLabel {
                label: "blur-start".into(),
                offset: (flyer_cross * 0.62).max(0.16),
            },
            dur + stagger * (items.len() - 1) as f64,
        )?;
        for (i, item) in items.iter().enumerate() {
            let offset = stagger * i as f64;
            b = b
                .tween_over(
                    Tween::new(item.clone(), Prop::Opacity, 0.0, 0.72, Ease::Linear),
                    offset,
                    dur,
                )?
                .tween_over(
                    Tween::new(item.clone(), Prop::TranslateY, 34.0, 10.0, Ease::Linear),
                    offset,
                    dur,
                )?;
        }
    }

    b = b
        .rest(ids::HERO2_CONTAINER, Prop::Scale, 1.0)
        .rest(ids::HERO2_CONTAINER, Prop::ZDepth, 0.0)
        .rest(ids::HERO2_CONTAINER, Prop::RotateX, 0.0)
        .rest(ids::HERO2_CONTAINER, Prop::Blur, 0.0)
        .rest(ids::HERO2_CONTAINER, Prop::Opacity, 1.0)
        .rest(ids::HERO2_CONTAINER, Prop::YPercent, 0.0)
        .rest(ids::TRANSITION_FLYER, Prop::TranslateX, flyer_start_x)
        .rest(ids::TRANSITION_FLYER, Prop::Opacity, 0.0)
        .rest(ids::SESSION_INNER, Prop::TranslateY, 120.0)
        .rest(ids::SESSION_INNER, Prop::Scale, 1.12)
        .rest(ids::SESSION_INNER, Prop::RotateX, 18.0)
        .rest(ids::SESSION_INNER, Prop::RotateY, -10.0)
        .rest(ids::SESSION_INNER, Prop::ZDepth, -260.0)
        .rest(ids::SESSION_INNER, Prop::Blur, 18.0);
    for item in &items {
        b = b
            .rest(item.clone(), Prop::Opacity, 0.0)
            .rest(item.clone(), Prop::TranslateY, 34.0);
    }

    // Hero 2 itself has no entrance of its own: it is revealed by the hero
    // window handoff, and its reveal targets are its own split characters.
    let reveal = RevealTargets {
        chars: split_chars_under(page, ids::HERO_SECONDARY),
        fades: vec![
            NodeId::from(ids::HERO2_CONTAINER),
        ],
    };

    let config = SectionConfig {
        pin_distance: Responsive {
            mobile: 0.98,
            desktop: 0.66,
        },
        ..SectionConfig::default()
    };

    Ok(Some(
        SectionRuntime::new(root, config, b.build()?).with_reveal(reveal),
    ))
}

/// Immersive session: fly in from portal depth, staggered items, counters
/// as a one-shot side effect, hold, immersive outro.
fn session_immersive(page: &Page) -> StageResult<Option<SectionRuntime>> {
    let root: NodeId = ids::SESSION.into();
    if !page.contains(&root) {
        return Ok(None);
    }
    let mobile = page.viewport.breakpoint() == Breakpoint::Mobile;

    let (intro_rx, intro_ry) = if mobile { (14.0, -6.0) } else { (20.0, -12.0) };
    let intro_z = if mobile { -180.0 } else { -320.0 };
    let outro_rx = if mobile { -10.0 } else { -16.0 };
    let outro_z = if mobile { -260.0 } else { -420.0 };

    let items = session_items(page);
    let counters: Vec<CountUp> = page
        .nodes_with_role(Role::Counter)
        .filter_map(|n| {
            let end = n.counter_end?;
            let format = n.counter_format.unwrap_or(CounterFormat::Integer);
            Some(CountUp::new(n.id.clone(), end, format))
        })
        .enumerate()
        .map(|(i, c)| c.with_delay(0.08 + i as f64 * 0.07))
        .collect();

    let mut b = TimelineBuilder::new()
        .phase("intro", Placement::At(0.0), 0.55)?
        .tween(tw(ids::SESSION_INNER, Prop::TranslateY, 120.0, 0.0))?
        .tween(tw(ids::SESSION_INNER, Prop::Scale, 1.12, 1.0))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateX, intro_rx, 0.0))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateY, intro_ry, 0.0))?
        .tween(tw(ids::SESSION_INNER, Prop::ZDepth, intro_z, 0.0))?
        .tween(tw(ids::SESSION_INNER, Prop::Blur, 18.0, 0.0))?
        .phase("light", Placement::At(0.12), 0.38)?
        .tween(tw(ids::SESSION_LIGHT, Prop::Opacity, 0.0, 0.35))?
        .tween(tw(ids::SESSION_LIGHT, Prop::Scale, 0.92, 1.0))?;

    if !counters.is_empty() {
        // Counters must not be tied to the scrubbed progress, or they can
        // sit at zero when the scroll settles mid-run. Fire once at 0.22.
        b = b.effect(SideEffect::StartCounters, 0.10)?;
    }

    if !items.is_empty() {
        let stagger = 0.07;
        let dur = 0.28;
        b = b.phase(
            "items",
            Placement::At(0.12),
            dur + stagger * (items.len() - 1) as f64,
        )?;
        for (i, item) in items.iter().enumerate() {
            let offset = stagger * i as f64;
            b = b
                .tween_over(
                    Tween::new(item.clone(), Prop::Opacity, 0.0, 1.0, Ease::Linear),
                    offset,
                    dur,
                )?
                .tween_over(
                    Tween::new(item.clone(), Prop::TranslateY, 34.0, 0.0, Ease::Linear),
                    offset,
                    dur,
                )?;
        }
    }

    b = b.hold(0.18)?;

    let mut b = b
        .phase("out", Placement::Sequential, 0.55)?
        .tween(tw(ids::SESSION_INNER, Prop::TranslateY, 0.0, -70.0))?
        .tween(tw(ids::SESSION_INNER, Prop::Scale, 1.0, 0.90))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateX, 0.0, outro_rx))?
        .tween(tw(ids::SESSION_INNER, Prop::RotateY, 0.0, 6.0))?
        .tween(tw(ids::SESSION_INNER, Prop::ZDepth, 0.0, outro_z))?
        .tween(tw(ids::SESSION_INNER, Prop::Blur, 0.0, 14.0))?
        .tween_over(tw(ids::SESSION_LIGHT, Prop::Opacity, 0.35, 0.0), 0.0, 0.30)?
        .tween_over(tw(ids::SESSION_LIGHT, Prop::Scale, 1.0, 0.92), 0.0, 0.30)?;
    {
        let stagger = 0.03;
        let dur = 0.30;
        for (i, item) in items.iter().enumerate() {
            let offset = stagger * i as f64;
            b = b
                .tween_over(
                    Tween::new(item.clone(), Prop::Opacity, 1.0, 0.0, Ease::Linear),
                    offset,
                    dur,
                )?
                .tween_over(
                    Tween::new(item.clone(), Prop::TranslateY, 0.0, -10.0, Ease::Linear),
                    offset,
                    dur,
                )?;
        }
    }

    b = b
        .rest(ids::SESSION_INNER, Prop::TranslateY, 120.0)
        .rest(ids::SESSION_INNER, Prop::Scale, 1.12)
        .rest(ids::SESSION_INNER, Prop::RotateX, intro_rx)
        .rest(ids::SESSION_INNER, Prop::RotateY, intro_ry)
        .rest(ids::SESSION_INNER, Prop::ZDepth, intro_z)
        .rest(ids::SESSION_INNER, Prop::Blur, 18.0)
        .rest(ids::SESSION_LIGHT, Prop::Opacity, 0.0)
        .rest(ids::SESSION_LIGHT, Prop::Scale, 0.92);
    for item in &items {
        b = b
            .rest(item.clone(), Prop::Opacity, 0.0)
            .rest(item.clone(), Prop::TranslateY, 34.0);
    }

    let config = SectionConfig {
        pin_distance: Responsive {
            mobile: 1.28,
            desktop: 1.08,
        },
        lag: Responsive {
            mobile: 0.35,
            desktop: 0.55,
        },
        ..SectionConfig::default()
    };

    Ok(Some(
        SectionRuntime::new(root, config, b.build()?).with_counters(counters),
    ))
}

/// Stepped narrative: one active story step per progress bucket.
fn story(page: &Page) -> StageResult<Option<SectionRuntime>> {
    let root: NodeId = ids::STORY.into();
    if !page.contains(&root) {
        return Ok(None);
    }
    let steps: Vec<NodeId> = page
        .nodes_with_role(Role::StoryStep)
        .map(|n| n.id.clone())
        .collect();
    if steps.is_empty() {
        return Ok(None);
    }

    let timeline = TimelineBuilder::new().hold(1.0)?.build()?;
    let config = SectionConfig {
        pin_distance: Responsive::uniform(2.0),
        ..SectionConfig::default()
    };
    Ok(Some(
        SectionRuntime::new(root, config, timeline).with_stepper(StoryStepper::new(steps)),
    ))
}

/// Replacement choreography: card i-1 exits while card i enters, one at a
/// time, over the pinned range.
fn cards(page: &Page) -> StageResult<Option<SectionRuntime>> {
    let root: NodeId = ids::CARDS.into();
    if !page.contains(&root) {
        return Ok(None);
    }
    let cards: Vec<NodeId> = page.nodes_with_role(Role::Card).map(|n| n.id.clone()).collect();
    if cards.len() < 2 {
        return Ok(None);
    }

    let mut b = TimelineBuilder::new();
    for i in 1..cards.len() {
        let prev = cards[i - 1].clone();
        let cur = cards[i].clone();
        b = b
            .hold(0.35)?
            .phase(format!("exit-{i}"), Placement::Sequential, 0.55)?
            .tween(Tween::new(prev.clone(), Prop::Opacity, 1.0, 0.0, Ease::OutQuad))?
            .tween(Tween::new(prev.clone(), Prop::TranslateX, 0.0, -180.0, Ease::OutQuad))?
            .tween(Tween::new(prev.clone(), Prop::TranslateY, 0.0, -90.0, Ease::OutQuad))?
            .tween(Tween::new(prev.clone(), Prop::Blur, 0.0, 22.0, Ease::OutQuad))?
            .tween(Tween::new(prev.clone(), Prop::Scale, 1.0, 0.98, Ease::OutQuad))?
            .phase(
                format!("enter-{i}"),
                Placement::AfterLabel {
                    label: format!("exit-{i}"),
                    offset: 0.06,
                },
                0.65,
            )?
            .tween(Tween::new(cur.clone(), Prop::Opacity, 0.0, 1.0, Ease::OutQuad))?
            .tween(Tween::new(cur.clone(), Prop::TranslateX, 120.0, 0.0, Ease::OutQuad))?
            .tween(Tween::new(cur.clone(), Prop::TranslateY, 70.0, 0.0, Ease::OutQuad))?
            .tween(Tween::new(cur.clone(), Prop::Blur, 18.0, 0.0, Ease::OutQuad))?;
    }
    for (i, card) in cards.iter().enumerate() {
        let visible = i == 0;
        b = b
            .rest(card.clone(), Prop::Opacity, if visible { 1.0 } else { 0.0 })
            .rest(card.clone(), Prop::TranslateX, if visible { 0.0 } else { 120.0 })
            .rest(card.clone(), Prop::TranslateY, if visible { 0.0 } else { 70.0 })
            .rest(card.clone(), Prop::Blur, if visible { 0.0 } else { 18.0 });
    }

    let config = SectionConfig {
        pin_distance: Responsive::uniform(1.2 * cards.len() as f64),
        ..SectionConfig::default()
    };
    Ok(Some(SectionRuntime::new(root, config, b.build()?)))
}

/// Animated content items inside the session container.
fn session_items(page: &Page) -> Vec<NodeId> {
    page.nodes()
        .filter(|n| n.id.as_str().starts_with("session/item"))
        .map(|n| n.id.clone())
        .collect()
}

/// Character units produced by the segmenter under a section's subtree.
fn split_chars_under(page: &Page, prefix: &str) -> Vec<NodeId> {
    page.nodes()
        .filter(|n| {
            n.id.as_str().starts_with(prefix) && n.id.as_str().contains("::l")
        })
        .map(|n| n.id.clone())
        .collect()
}
