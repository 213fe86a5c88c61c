use crate::{
    foundation::core::Rect,
    orchestrate::config::Responsive,
    page::model::{NodeId, Page},
};

/// Published style-variable names. Consumers read only the latest set;
/// offsets are republished wholesale on every recomputation.
pub const VAR_OVERLAY_LEFT: &str = "overlay-left";
pub const VAR_OVERLAY_TOP: &str = "overlay-top";
pub const VAR_OVERLAY_RIGHT_GAP: &str = "overlay-right-gap";
pub const VAR_REFERENCE_RIGHT: &str = "reference-right-edge";

/// Keeps an absolutely-positioned overlay visually attached to a reference
/// element inside a container, clamped fully inside the container.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnchorSpec {
    pub reference: NodeId,
    pub overlay: NodeId,
    pub container: NodeId,
    /// Horizontal gap between reference right edge and overlay left edge.
    pub gap: Responsive<f64>,
    /// Fraction of reference height below its top where the overlay sits.
    pub vertical_bias: Responsive<f64>,
    /// Container's resolved right padding (content margin to preserve).
    pub container_padding_right: f64,
    /// Floor for the preserved right margin.
    pub min_right_gap: f64,
    /// Bottom clearance when clamping vertically.
    pub bottom_clearance: f64,
}

impl AnchorSpec {
    pub fn new(
        reference: impl Into<NodeId>,
        overlay: impl Into<NodeId>,
        container: impl Into<NodeId>,
    ) -> Self {
        Self {
            reference: reference.into(),
            overlay: overlay.into(),
            container: container.into(),
            gap: Responsive {
                mobile: 10.0,
                desktop: 18.0,
            },
            vertical_bias: Responsive {
                mobile: 0.58,
                desktop: 0.62,
            },
            container_padding_right: 0.0,
            min_right_gap: 16.0,
            bottom_clearance: 4.0,
        }
    }
}

/// One recomputed geometry snapshot, reduced to consumable offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AnchorOffsets {
    pub left: f64,
    pub top: f64,
    pub right_gap: f64,
    pub reference_right: f64,
}

/// Pure offset computation from live geometry. Idempotent: unchanged rects
/// yield identical output. Returns `None` when any collaborator is missing
/// or any rect is non-finite.
pub fn recalculate(page: &Page, spec: &AnchorSpec) -> Option<AnchorOffsets> {
    let reference = page.node(&spec.reference)?.rect;
    let overlay = page.node(&spec.overlay)?.rect;
    let container = page.node(&spec.container)?.rect;
    if !rect_finite(reference) || !rect_finite(overlay) || !rect_finite(container) {
        return None;
    }

    let bp = page.viewport.breakpoint();
    let gap = spec.gap.resolve(bp);
    let bias = spec.vertical_bias.resolve(bp);

    let container_width = container.width().max(0.0);
    let container_height = container.height().max(0.0);
    let overlay_width = overlay.width().max(0.0);
    let overlay_height = overlay.height().max(0.0);

    // Reference right edge in container coordinate space.
    let reference_right = (reference.x1 - container.x0).max(0.0);

    let min_right_gap = spec.min_right_gap.max(spec.container_padding_right);

    // Horizontal: right of the reference, clamped inside the container.
    let desired_left = reference_right + gap;
    let max_left = (container_width - overlay_width - min_right_gap).max(0.0);
    let left = desired_left.max(0.0).min(max_left);

    let right_gap = (container_width - (left + overlay_width)).max(0.0);

    // Vertical: below the reference midline, clamped inside the container.
    let desired_top = (reference.y0 - container.y0) + reference.height().max(0.0) * bias;
    let max_top = (container_height - overlay_height - spec.bottom_clearance).max(0.0);
    let top = desired_top.max(0.0).min(max_top);

    Some(AnchorOffsets {
        left,
        top,
        right_gap,
        reference_right,
    })
}

/// Recompute and republish. Missing collaborators make this a silent no-op:
/// no variable is touched, so consumers never observe a partial frame.
pub fn publish(page: &mut Page, spec: &AnchorSpec) -> bool {
    let Some(offsets) = recalculate(page, spec) else {
        tracing::debug!("anchor: collaborator missing or degenerate, skipping publish");
        return false;
    };
    page.set_var(VAR_OVERLAY_LEFT, offsets.left);
    page.set_var(VAR_OVERLAY_TOP, offsets.top);
    page.set_var(VAR_OVERLAY_RIGHT_GAP, offsets.right_gap);
    page.set_var(VAR_REFERENCE_RIGHT, offsets.reference_right);
    true
}

fn rect_finite(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}
