use crate::{
    animation::reveal::EntranceReveal,
    foundation::core::Viewport,
    foundation::error::StageResult,
    layout::anchor::{self, AnchorSpec},
    orchestrate::catalog,
    orchestrate::orchestrator::Orchestrator,
    page::model::{NodeId, Page, Prop, Role},
    page::segment::{self, SegmenterConfig},
};

/// Coalesces repeated triggers within one display frame into a single
/// recomputation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Consume the pending flag; true at most once per frame.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// System reduced-motion preference, read once at startup.
    pub reduced_motion: bool,
    /// Seconds before the loading overlay is force-dismissed.
    pub failsafe_timeout: f64,
    /// Segmenter configuration applied to every split-text block.
    pub segmenter: SegmenterConfig,
    /// Special-case segmenter rule for the designated heading, by node id.
    pub forced_break_headings: Vec<NodeId>,
    /// Overlay anchors to keep in sync (usually one).
    pub anchors: Vec<AnchorSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            failsafe_timeout: 6.0,
            segmenter: SegmenterConfig::default(),
            forced_break_headings: Vec::new(),
            anchors: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OverlayState {
    Visible,
    Dismissed,
}

/// Top-level driver. Owns the page, the orchestrated catalog and all
/// cross-cutting policy (reduced motion, failsafe, frame coalescing).
///
/// Construction never panics and never propagates an error: any failure
/// degrades to "content visible, overlay dismissed".
pub struct Engine {
    page: Page,
    orchestrator: Orchestrator,
    config: EngineConfig,
    anchor_gate: FrameGate,
    scroll_y: f64,
    overlay: OverlayState,
    started_at: Option<f64>,
    entrance: EntranceReveal,
    entrance_pending: bool,
}

impl Engine {
    pub fn init(mut page: Page, config: EngineConfig) -> Engine {
        // Always start from the very top on load/refresh, so pinned state is
        // never restored mid-page.
        let scroll_y = 0.0;

        let (orchestrator, entrance) = match Self::build(&mut page, &config) {
            Ok(built) => built,
            Err(err) => {
                tracing::error!(error = %err, "initialization failed, degrading");
                let orchestrator = Orchestrator::new(&page, Vec::new(), config.reduced_motion);
                let mut engine = Engine {
                    page,
                    orchestrator,
                    config,
                    anchor_gate: FrameGate::default(),
                    scroll_y,
                    overlay: OverlayState::Visible,
                    started_at: None,
                    entrance: EntranceReveal::new(Vec::new()),
                    entrance_pending: false,
                };
                engine.dismiss_overlay();
                return engine;
            }
        };

        let mut engine = Engine {
            page,
            orchestrator,
            config,
            anchor_gate: FrameGate::default(),
            scroll_y,
            overlay: OverlayState::Visible,
            started_at: None,
            entrance,
            entrance_pending: false,
        };
        // Initial anchor publish, then once more per binder refresh.
        engine.publish_anchors();
        engine
    }

    fn build(page: &mut Page, config: &EngineConfig) -> StageResult<(Orchestrator, EntranceReveal)> {
        page.validate()?;

        // Segmentation runs exactly once, before any timeline is built.
        let breakpoint = page.viewport.breakpoint();
        let split_ids: Vec<NodeId> = page
            .nodes_with_role(Role::SplitText)
            .map(|n| n.id.clone())
            .collect();
        let mut segmented: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
        for id in &split_ids {
            let mut cfg = config.segmenter.clone();
            cfg.force_first_word_break = config.forced_break_headings.contains(id);
            if let Some(seg) = segment::segment(page, id, breakpoint, &cfg) {
                segmented.push((id.clone(), seg.char_ids()));
            }
        }

        let sections = catalog::build(page)?;

        // The first section has no predecessor to hand it a reveal, so its
        // characters rise on a time-based entrance once the overlay drops.
        let entrance_chars: Vec<NodeId> = sections
            .first()
            .map(|first| {
                let prefix = format!("{}/", first.node.0);
                segmented
                    .iter()
                    .filter(|(source, _)| source.0.starts_with(&prefix))
                    .flat_map(|(_, chars)| chars.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();

        let orchestrator = Orchestrator::new(page, sections, config.reduced_motion);
        Ok((orchestrator, EntranceReveal::new(entrance_chars)))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn overlay_dismissed(&self) -> bool {
        self.overlay == OverlayState::Dismissed
    }

    /// New scroll sample. Evaluation happens on the next frame.
    pub fn on_scroll(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    /// Viewport/orientation change: re-bind sections and republish anchors,
    /// coalesced to the next frame.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.page.viewport = viewport;
        if self.orchestrator.refresh(&self.page) {
            self.anchor_gate.request();
        }
    }

    /// A layout-settle signal: pinned-section layout height changed.
    pub fn on_layout_settle(&mut self) {
        self.orchestrator.refresh(&self.page);
        self.anchor_gate.request();
    }

    /// Cached-page restore: force scroll top and refresh every mapping.
    pub fn on_page_show(&mut self) {
        self.scroll_y = 0.0;
        self.on_layout_settle();
    }

    /// One display frame: drive timelines from the latest scroll sample,
    /// advance counters and the entrance reveal, run coalesced anchor work,
    /// check the failsafe.
    pub fn on_frame(&mut self, now: f64) {
        let started = *self.started_at.get_or_insert(now);

        self.orchestrator.drive(&mut self.page, self.scroll_y, now);
        self.orchestrator.tick(&mut self.page, now);

        if std::mem::take(&mut self.entrance_pending) {
            self.entrance
                .trigger(now, self.config.reduced_motion, &mut self.page);
        }
        self.entrance.tick(now, &mut self.page);

        if self.anchor_gate.take() {
            self.publish_anchors();
        }

        // Never trap the user on the loader.
        if self.overlay == OverlayState::Visible && now - started >= self.config.failsafe_timeout {
            tracing::warn!("failsafe: dismissing loading overlay");
            self.dismiss_overlay();
        }
    }

    /// Scrolling stopped: snap smoothed progress to its exact raw value.
    pub fn on_scroll_settled(&mut self, now: f64) {
        self.orchestrator.settle(&mut self.page, self.scroll_y, now);
    }

    /// Loading finished normally.
    pub fn on_loaded(&mut self) {
        self.dismiss_overlay();
        self.on_layout_settle();
    }

    fn dismiss_overlay(&mut self) {
        if self.overlay == OverlayState::Dismissed {
            return;
        }
        self.overlay = OverlayState::Dismissed;
        let overlay_ids: Vec<NodeId> = self
            .page
            .nodes_with_role(Role::PreloaderOverlay)
            .map(|n| n.id.clone())
            .collect();
        for id in overlay_ids {
            self.page.set_prop(&id, Prop::YPercent, -100.0);
        }
        // First content now visible: start the entrance on the next frame.
        self.entrance_pending = true;
    }

    fn publish_anchors(&mut self) {
        let specs = self.config.anchors.clone();
        for spec in &specs {
            anchor::publish(&mut self.page, spec);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_gate_coalesces() {
        let mut gate = FrameGate::default();
        gate.request();
        gate.request();
        gate.request();
        assert!(gate.take());
        assert!(!gate.take());
    }
}
