use crate::{
    animation::tween::{Tween, Window},
    foundation::core::Progress,
    page::model::{NodeId, Page, Prop},
};

/// One-shot actions fired when progress crosses a threshold going forward.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideEffect {
    /// Force the next section into its fully-revealed rest state.
    RevealNext,
    /// Start the section's time-based counters.
    StartCounters,
}

#[derive(Clone, Debug)]
pub struct EffectSpec {
    pub effect: SideEffect,
    pub at: f64,
    armed: bool,
}

impl EffectSpec {
    pub fn new(effect: SideEffect, at: f64) -> Self {
        Self {
            effect,
            at,
            armed: true,
        }
    }
}

/// A transition bound to its normalized window.
#[derive(Clone, Debug)]
pub struct TimelineTween {
    pub tween: Tween,
    pub window: Window,
}

/// Lifecycle of a scroll-bound timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineState {
    Idle,
    PlayingForward,
    PlayingBackward,
    SettledForward,
    SettledBackward,
}

/// An ordered set of property transitions over a `[0, 1]` progress range.
///
/// Evaluation is a pure function of progress (`sample`); `evaluate` adds the
/// state machine, the terminal reset at exact 0 and one-shot side effects.
/// Decreasing progress retraces the exact same mapping, so forward and
/// backward scroll are visually symmetric.
#[derive(Clone, Debug)]
pub struct Timeline {
    tweens: Vec<TimelineTween>,
    effects: Vec<EffectSpec>,
    rest: Vec<(NodeId, Prop, f64)>,
    state: TimelineState,
    last: Progress,
}

impl Timeline {
    pub fn new(
        tweens: Vec<TimelineTween>,
        effects: Vec<EffectSpec>,
        rest: Vec<(NodeId, Prop, f64)>,
    ) -> Self {
        Self {
            tweens,
            effects,
            rest,
            state: TimelineState::Idle,
            last: Progress::ZERO,
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn windows(&self) -> Vec<Window> {
        self.tweens.iter().map(|t| t.window).collect()
    }

    /// Pure evaluation: the published set for a progress value. No state is
    /// read or written; calling twice with the same input yields the same
    /// output.
    ///
    /// Several transitions may own the same (target, prop) across different
    /// phases (chained segments). The applicable one is the last whose
    /// window has started; windows that have not started yet only supply
    /// the initial boundary value when nothing else owns the property.
    pub fn sample(&self, p: Progress) -> Vec<(NodeId, Prop, f64)> {
        let mut out: std::collections::BTreeMap<(NodeId, Prop), f64> = std::collections::BTreeMap::new();
        // self.tweens is sorted by window start.
        for t in &self.tweens {
            let key = (t.tween.target.clone(), t.tween.prop);
            if p.value() >= t.window.start {
                out.insert(key, t.tween.value_at(t.window.local(p)));
            } else {
                out.entry(key).or_insert_with(|| t.tween.value_at(0.0));
            }
        }
        out.into_iter().map(|((id, prop), v)| (id, prop, v)).collect()
    }

    /// Drive the timeline to a new progress sample: publish values, step the
    /// state machine, fire crossed side effects, run the terminal reset.
    #[tracing::instrument(skip(self, page), fields(p = p.value()))]
    pub fn evaluate(&mut self, p: Progress, page: &mut Page) -> Vec<SideEffect> {
        let previous = self.last;

        // An idle or settled timeline republishing an unchanged sample every
        // frame would overwrite neighbors that share a target mid-handoff
        // (the next section's timeline starts from the values this one left
        // behind). Publish only when the sample moved.
        let moved = p != previous
            || matches!(
                self.state,
                TimelineState::PlayingForward | TimelineState::PlayingBackward
            );
        if moved {
            for (target, prop, value) in self.sample(p) {
                page.set_prop(&target, prop, value);
            }
        }

        let mut fired = Vec::new();
        for slot in &mut self.effects {
            if slot.armed && previous.value() < slot.at && p.value() >= slot.at {
                slot.armed = false;
                fired.push(slot.effect.clone());
            } else if !slot.armed && p.value() < slot.at {
                // Re-arm on reverse so the next forward pass fires again.
                slot.armed = true;
            }
        }

        let next_state = next_state(self.state, previous, p);
        // Terminal reset: returning to exactly 0 from a playing state must
        // restore canonical rest values. Interpolation alone cannot guarantee
        // this for open-ended transitions (absolute coordinates, docks).
        if next_state == TimelineState::SettledBackward && self.state != TimelineState::SettledBackward
        {
            self.reset(page);
        }
        self.state = next_state;
        self.last = p;
        fired
    }

    /// Restore every owned entity to its canonical rest state.
    pub fn reset(&self, page: &mut Page) {
        for (target, prop, value) in &self.rest {
            page.set_prop(target, *prop, *value);
        }
    }
}

/// The {state, progress-sample} -> state table, kept as one function so the
/// whole machine is visible (and testable) in one place.
fn next_state(state: TimelineState, previous: Progress, p: Progress) -> TimelineState {
    if p.is_start() {
        return match state {
            TimelineState::Idle => TimelineState::Idle,
            _ => TimelineState::SettledBackward,
        };
    }
    if p.is_end() {
        return TimelineState::SettledForward;
    }
    if p > previous {
        TimelineState::PlayingForward
    } else if p < previous {
        TimelineState::PlayingBackward
    } else {
        state
    }
}
