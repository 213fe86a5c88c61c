use crate::{
    foundation::core::Progress,
    orchestrate::config::ResolvedParams,
    page::model::{NodeId, Page},
};

/// Snap distance: below this the smoothed fraction jumps to the raw value,
/// guaranteeing exact terminal arrival once scrolling stops.
const SNAP_EPSILON: f64 = 1e-4;

/// Maps window scroll position into one pinned section's local progress.
///
/// The section reserves `pin_distance * viewport.height` of scroll; while
/// the user traverses it the visual position is locked and the traversed
/// fraction becomes timeline progress. The mapping is recomputed from live
/// layout on every `refresh` — stale mappings cause visible desync.
#[derive(Clone, Debug)]
pub struct PinBinding {
    section: NodeId,
    start_y: f64,
    reserved: f64,
    lag: f64,
    smoothed: f64,
}

impl PinBinding {
    /// Bind to live layout. Missing section node disables the feature.
    pub fn bind(page: &Page, section: &NodeId, params: &ResolvedParams) -> Option<Self> {
        let mut binding = Self {
            section: section.clone(),
            start_y: 0.0,
            reserved: 1.0,
            lag: params.lag,
            smoothed: 0.0,
        };
        if !binding.refresh(page, params) {
            tracing::debug!(section = %section, "pin binding skipped, node absent");
            return None;
        }
        Some(binding)
    }

    pub fn section(&self) -> &NodeId {
        &self.section
    }

    pub fn reserved(&self) -> f64 {
        self.reserved
    }

    /// Recompute start and reserved distance from current layout. Returns
    /// false (leaving the old mapping untouched) when the node is gone.
    pub fn refresh(&mut self, page: &Page, params: &ResolvedParams) -> bool {
        let Some(node) = page.node(&self.section) else {
            return false;
        };
        self.start_y = node.rect.y0.max(0.0);
        self.reserved = (page.viewport.height * params.pin_distance).max(1.0);
        self.lag = params.lag;
        true
    }

    /// Raw traversed fraction for a scroll position, without smoothing.
    pub fn raw_progress(&self, scroll_y: f64) -> Progress {
        Progress::new((scroll_y - self.start_y) / self.reserved)
    }

    /// Advance the smoothed fraction one frame toward the raw fraction.
    ///
    /// Exponential approach can neither overshoot nor change direction ahead
    /// of the raw signal; the epsilon snap guarantees the exact terminal
    /// value is reached when scrolling stops.
    pub fn advance(&mut self, scroll_y: f64) -> Progress {
        let raw = self.raw_progress(scroll_y).value();
        let delta = raw - self.smoothed;
        if delta.abs() <= SNAP_EPSILON {
            self.smoothed = raw;
        } else {
            self.smoothed += delta * self.lag;
        }
        Progress::new(self.smoothed)
    }

    /// Jump straight to the raw fraction (scroll has stopped).
    pub fn settle(&mut self, scroll_y: f64) -> Progress {
        self.smoothed = self.raw_progress(scroll_y).value();
        Progress::new(self.smoothed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Rect, Viewport};
    use crate::orchestrate::config::SectionConfig;
    use crate::page::model::Node;

    fn fixture(section_top: f64) -> (Page, ResolvedParams) {
        let viewport = Viewport::new(1440.0, 900.0).unwrap();
        let mut page = Page::new(viewport);
        page.content_height = 6000.0;
        page.insert(Node::new("hero").with_rect(Rect::new(0.0, section_top, 1440.0, section_top + 900.0)));
        (page, SectionConfig::default().resolve(viewport))
    }

    #[test]
    fn raw_progress_maps_reserved_distance() {
        let (page, params) = fixture(0.0);
        let b = PinBinding::bind(&page, &"hero".into(), &params).unwrap();
        // Desktop: 1.85 * 900 = 1665 reserved.
        assert_eq!(b.reserved(), 1665.0);
        assert_eq!(b.raw_progress(0.0).value(), 0.0);
        assert!((b.raw_progress(832.5).value() - 0.5).abs() < 1e-12);
        assert_eq!(b.raw_progress(1665.0).value(), 1.0);
        assert_eq!(b.raw_progress(9999.0).value(), 1.0);
    }

    #[test]
    fn missing_node_disables_binding() {
        let (page, params) = fixture(0.0);
        assert!(PinBinding::bind(&page, &"ghost".into(), &params).is_none());
    }

    #[test]
    fn refresh_remaps_after_layout_change() {
        let (mut page, params) = fixture(0.0);
        let mut b = PinBinding::bind(&page, &"hero".into(), &params).unwrap();
        let before = b.raw_progress(1000.0);

        // Content above the section grew by 500px.
        page.node_mut(&"hero".into()).unwrap().rect = Rect::new(0.0, 500.0, 1440.0, 1400.0);
        page.content_height += 500.0;
        assert!(b.refresh(&page, &params));

        let after = b.raw_progress(1000.0);
        assert!(after < before, "same raw offset must map differently");
        assert!((after.value() - (500.0 / 1665.0)).abs() < 1e-12);
    }

    #[test]
    fn smoothing_lags_without_overshoot() {
        let (page, params) = fixture(0.0);
        let mut b = PinBinding::bind(&page, &"hero".into(), &params).unwrap();
        let mut prev = 0.0;
        for _ in 0..50 {
            let p = b.advance(832.5).value();
            assert!(p <= 0.5 + 1e-12, "overshoot past raw target");
            assert!(p >= prev, "smoothing reversed direction");
            prev = p;
        }
        // Eventually snaps to the exact raw value.
        assert!((prev - 0.5).abs() < 1e-9);
    }

    #[test]
    fn terminal_values_are_reached_exactly() {
        let (page, params) = fixture(0.0);
        let mut b = PinBinding::bind(&page, &"hero".into(), &params).unwrap();
        for _ in 0..60 {
            b.advance(1665.0);
        }
        assert_eq!(b.advance(1665.0).value(), 1.0);
        for _ in 0..60 {
            b.advance(0.0);
        }
        assert_eq!(b.advance(0.0).value(), 0.0);
    }

    #[test]
    fn settle_snaps_to_raw() {
        let (page, params) = fixture(0.0);
        let mut b = PinBinding::bind(&page, &"hero".into(), &params).unwrap();
        b.advance(832.5);
        assert_eq!(b.settle(832.5).value(), 0.5);
    }
}
