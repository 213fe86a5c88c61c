use crate::{
    animation::ease::Ease,
    foundation::core::{Progress, Vec2},
    foundation::error::{StageError, StageResult},
    page::model::{NodeId, Prop},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// A single property transition: pure function of local progress.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    pub target: NodeId,
    pub prop: Prop,
    pub from: f64,
    pub to: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(target: impl Into<NodeId>, prop: Prop, from: f64, to: f64, ease: Ease) -> Self {
        Self {
            target: target.into(),
            prop,
            from,
            to,
            ease,
        }
    }

    /// Value at a local progress in `[0, 1]`. Inputs outside the range clamp
    /// to the boundary value.
    pub fn value_at(&self, local: f64) -> f64 {
        let t = self.ease.apply(local.clamp(0.0, 1.0));
        Lerp::lerp(&self.from, &self.to, t)
    }
}

/// A normalized sub-interval of a timeline's `[0, 1]` progress range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    pub start: f64,
    pub duration: f64,
}

impl Window {
    pub fn new(start: f64, duration: f64) -> StageResult<Self> {
        if !(start.is_finite() && duration.is_finite()) {
            return Err(StageError::validation("window start/duration must be finite"));
        }
        if !(0.0..=1.0).contains(&start) || duration < 0.0 || start + duration > 1.0 + 1e-9 {
            return Err(StageError::validation(format!(
                "window [{start}, {start}+{duration}] outside [0, 1]"
            )));
        }
        Ok(Self { start, duration })
    }

    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Local progress within the window, clamped to `[0, 1]`.
    ///
    /// A zero-duration window behaves as a step at `start`.
    pub fn local(self, p: Progress) -> f64 {
        if self.duration <= 0.0 {
            return if p.value() >= self.start { 1.0 } else { 0.0 };
        }
        ((p.value() - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn contains(self, p: Progress) -> bool {
        p.value() >= self.start && p.value() <= self.end()
    }
}
