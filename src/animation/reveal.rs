use crate::{
    animation::ease::Ease,
    page::model::{NodeId, Page, Prop},
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum RevealState {
    Idle,
    Running { started_at: f64 },
    Finished,
}

/// Time-based entrance reveal for split characters: each glyph rises from
/// below its line mask on a fixed stagger. Used by the first section, which
/// has no predecessor timeline to hand it a reveal.
///
/// Not scroll-bound: once triggered it runs on injected monotonic time.
/// Retrigger is cancel-and-replace. With reduced motion active every glyph
/// snaps straight to its resting position.
#[derive(Clone, Debug)]
pub struct EntranceReveal {
    targets: Vec<NodeId>,
    duration: f64,
    stagger: f64,
    ease: Ease,
    state: RevealState,
}

impl EntranceReveal {
    pub const DEFAULT_DURATION: f64 = 0.9;
    pub const DEFAULT_STAGGER: f64 = 0.03;

    pub fn new(targets: Vec<NodeId>) -> Self {
        Self {
            targets,
            duration: Self::DEFAULT_DURATION,
            stagger: Self::DEFAULT_STAGGER,
            ease: Ease::OutCubic,
            state: RevealState::Idle,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == RevealState::Finished
    }

    /// Start (or restart) the rise. Reduced motion, or nothing to reveal,
    /// finishes immediately.
    pub fn trigger(&mut self, now: f64, reduced_motion: bool, page: &mut Page) {
        if reduced_motion || self.targets.is_empty() {
            self.finish(page);
            return;
        }
        self.state = RevealState::Running { started_at: now };
    }

    /// Advance on the frame cadence. No-op unless running.
    pub fn tick(&mut self, now: f64, page: &mut Page) {
        let RevealState::Running { started_at } = self.state else {
            return;
        };
        let elapsed = now - started_at;
        let mut all_done = true;
        for (i, target) in self.targets.iter().enumerate() {
            let local = (elapsed - i as f64 * self.stagger) / self.duration;
            if local < 0.0 {
                all_done = false;
                continue;
            }
            if local >= 1.0 {
                page.set_prop(target, Prop::YPercent, 0.0);
                continue;
            }
            all_done = false;
            let y = 100.0 * (1.0 - self.ease.apply(local));
            page.set_prop(target, Prop::YPercent, y);
        }
        if all_done {
            self.finish(page);
        }
    }

    fn finish(&mut self, page: &mut Page) {
        for target in &self.targets {
            page.set_prop(target, Prop::YPercent, 0.0);
        }
        self.state = RevealState::Finished;
    }
}
