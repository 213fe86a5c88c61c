//! Scrollstage is a deterministic scroll-driven phase sequencing engine.
//!
//! As the user scrolls, sections pin in place while internal sub-phases
//! (zoom, cross-fade, descent, reveal) play in lockstep with scroll
//! position, then hand off to the next section. The engine is headless: it
//! reads an abstract [`Page`] (node geometry, roles, text) and writes
//! published values (animated properties, style variables, counter text).
//! Callers feed scroll samples, viewport changes and monotonic time.
//!
//! # Pipeline overview
//!
//! 1. **Segment**: split-text blocks become Line/Word/Character units, each
//!    an independently animatable node seeded in its pre-reveal state
//! 2. **Build**: one labeled [`Timeline`] plus one pin binding per section,
//!    all responsive parameters resolved up front
//! 3. **Drive**: every scroll/frame sample maps to per-section progress and
//!    a pure timeline evaluation; side effects (handoff, counters) fire on
//!    threshold crossings
//! 4. **Recalculate**: overlay anchor offsets are recomputed from live
//!    geometry, coalesced to one pass per display frame
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: timeline evaluation is a pure function
//!   of progress; forward and backward scroll retrace the same mapping.
//! - **Failures stay local**: a missing collaborator node disables its
//!   feature; the init boundary degrades instead of propagating.
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod layout;
mod orchestrate;
mod page;
mod scroll;
mod timeline;

pub use animation::counter::CountUp;
pub use animation::ease::Ease;
pub use animation::reveal::EntranceReveal;
pub use animation::tween::{Lerp, Tween, Window};
pub use foundation::core::{Breakpoint, MOBILE_MAX_WIDTH, Point, Progress, Rect, Vec2, Viewport};
pub use foundation::error::{StageError, StageResult};
pub use layout::anchor::{
    AnchorOffsets, AnchorSpec, VAR_OVERLAY_LEFT, VAR_OVERLAY_RIGHT_GAP, VAR_OVERLAY_TOP,
    VAR_REFERENCE_RIGHT, publish as publish_anchor, recalculate as recalculate_anchor,
};
pub use orchestrate::catalog::{self, ids as catalog_ids};
pub use orchestrate::config::{Responsive, ResolvedParams, SectionConfig};
pub use orchestrate::engine::{Engine, EngineConfig, FrameGate};
pub use orchestrate::orchestrator::{
    Orchestrator, RevealTargets, STEP_DIMMED_OPACITY, SectionRuntime, StoryStepper,
};
pub use page::model::{CounterFormat, Node, NodeId, Page, Prop, Role};
pub use page::segment::{
    CharUnit, LineUnit, SegmentedText, SegmenterConfig, WordUnit, normalize_breaks, segment,
};
pub use scroll::binder::PinBinding;
pub use timeline::machine::{
    EffectSpec, SideEffect, Timeline, TimelineState, TimelineTween,
};
pub use timeline::phase::{Placement, TimelineBuilder};
