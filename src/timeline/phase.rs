use std::collections::BTreeMap;

use crate::{
    animation::tween::{Tween, Window},
    foundation::error::{StageError, StageResult},
    page::model::{NodeId, Prop},
    timeline::machine::{EffectSpec, SideEffect, Timeline, TimelineTween},
};

/// Where a phase sits in the timeline, in authored (unnormalized) units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Placement {
    /// Immediately after everything scheduled so far.
    Sequential,
    /// Explicit absolute offset.
    At(f64),
    /// Co-scheduled with an existing label (explicit concurrency).
    WithLabel(String),
    /// Offset relative to an existing label (`down + 0.38`).
    AfterLabel { label: String, offset: f64 },
}

/// Builds a timeline from labeled phases, resolving every placement to an
/// absolute offset at build time and normalizing the result to `[0, 1]`.
///
/// Authored durations are arbitrary units; they only gain meaning relative
/// to the total span, which maps onto the section's reserved scroll range.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    cursor: f64,
    labels: BTreeMap<String, f64>,
    current: Option<(String, f64, f64)>, // (label, start, duration)
    tweens: Vec<(Tween, f64, f64)>,      // (tween, start, duration)
    effects: Vec<(SideEffect, f64)>,     // (effect, absolute offset)
    rest: Vec<(NodeId, Prop, f64)>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dead scroll at the current cursor (an authored pause).
    pub fn hold(mut self, duration: f64) -> StageResult<Self> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(StageError::timeline("hold duration must be >= 0"));
        }
        self.cursor += duration;
        Ok(self)
    }

    /// Open a new labeled phase. Subsequent `tween` calls attach to it.
    pub fn phase(
        mut self,
        label: impl Into<String>,
        placement: Placement,
        duration: f64,
    ) -> StageResult<Self> {
        let label = label.into();
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(StageError::timeline(format!(
                "phase '{label}' duration must be >= 0"
            )));
        }
        if self.labels.contains_key(&label) {
            return Err(StageError::timeline(format!("duplicate phase label '{label}'")));
        }
        let start = self.resolve_placement(&placement)?;
        self.labels.insert(label.clone(), start);
        self.cursor = self.cursor.max(start + duration);
        self.current = Some((label, start, duration));
        Ok(self)
    }

    fn resolve_placement(&self, placement: &Placement) -> StageResult<f64> {
        match placement {
            Placement::Sequential => Ok(self.cursor),
            Placement::At(offset) => {
                if !(offset.is_finite() && *offset >= 0.0) {
                    return Err(StageError::timeline("placement offset must be >= 0"));
                }
                Ok(*offset)
            }
            Placement::WithLabel(label) => self.label_offset(label),
            Placement::AfterLabel { label, offset } => Ok(self.label_offset(label)? + offset),
        }
    }

    fn label_offset(&self, label: &str) -> StageResult<f64> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| StageError::timeline(format!("unknown phase label '{label}'")))
    }

    /// Attach a transition spanning the whole current phase.
    pub fn tween(mut self, tween: Tween) -> StageResult<Self> {
        let (_, start, duration) = self.current_phase()?;
        self.tweens.push((tween, start, duration));
        Ok(self)
    }

    /// Attach a transition over a sub-span of the current phase.
    pub fn tween_over(mut self, tween: Tween, offset: f64, duration: f64) -> StageResult<Self> {
        let (label, start, phase_dur) = self.current_phase()?;
        if offset < 0.0 || duration < 0.0 || offset + duration > phase_dur + 1e-9 {
            return Err(StageError::timeline(format!(
                "tween span escapes phase '{label}'"
            )));
        }
        self.tweens.push((tween, start + offset, duration));
        Ok(self)
    }

    fn current_phase(&self) -> StageResult<(String, f64, f64)> {
        self.current
            .clone()
            .ok_or_else(|| StageError::timeline("no phase opened yet"))
    }

    /// Schedule a one-shot side effect at an offset into the current phase.
    pub fn effect(mut self, effect: SideEffect, offset: f64) -> StageResult<Self> {
        let (label, start, phase_dur) = self.current_phase()?;
        if offset < 0.0 || offset > phase_dur + 1e-9 {
            return Err(StageError::timeline(format!(
                "effect offset escapes phase '{label}'"
            )));
        }
        self.effects.push((effect, start + offset));
        Ok(self)
    }

    /// Canonical rest value restored by the terminal reset.
    pub fn rest(mut self, target: impl Into<NodeId>, prop: Prop, value: f64) -> Self {
        self.rest.push((target.into(), prop, value));
        self
    }

    /// Resolve to a runnable timeline: normalize all offsets to `[0, 1]`.
    pub fn build(self) -> StageResult<Timeline> {
        let total = self
            .tweens
            .iter()
            .map(|(_, start, dur)| start + dur)
            .chain(self.effects.iter().map(|(_, at)| *at))
            .fold(self.cursor, f64::max);
        if !(total > 0.0) {
            return Err(StageError::timeline("timeline has zero total span"));
        }

        let mut tweens = Vec::with_capacity(self.tweens.len());
        for (tween, start, dur) in self.tweens {
            let window = Window::new(start / total, dur / total)?;
            tweens.push(TimelineTween { tween, window });
        }
        tweens.sort_by(|a, b| {
            a.window
                .start
                .partial_cmp(&b.window.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut effects = Vec::with_capacity(self.effects.len());
        for (effect, at) in self.effects {
            effects.push(EffectSpec::new(effect, (at / total).clamp(0.0, 1.0)));
        }

        Ok(Timeline::new(tweens, effects, self.rest))
    }
}
