use crate::{
    animation::ease::Ease,
    page::model::{CounterFormat, NodeId, Page},
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum CountState {
    Idle,
    Running { started_at: f64, delay: f64 },
    Finished,
}

/// Time-based number reveal, triggered as a timeline side effect.
///
/// Not scroll-bound: once triggered it runs on injected monotonic time.
/// Retrigger is cancel-and-replace. A deferred fallback re-asserts the exact
/// final value even if ticking is interrupted mid-run.
#[derive(Clone, Debug)]
pub struct CountUp {
    target: NodeId,
    end: f64,
    format: CounterFormat,
    duration: f64,
    delay: f64,
    ease: Ease,
    fallback_after: f64,
    state: CountState,
}

impl CountUp {
    pub const DEFAULT_DURATION: f64 = 0.95;
    pub const DEFAULT_FALLBACK: f64 = 1.3;

    pub fn new(target: impl Into<NodeId>, end: f64, format: CounterFormat) -> Self {
        Self {
            target: target.into(),
            end,
            format,
            duration: Self::DEFAULT_DURATION,
            delay: 0.0,
            ease: Ease::OutQuad,
            fallback_after: Self::DEFAULT_FALLBACK,
            state: CountState::Idle,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn is_finished(&self) -> bool {
        self.state == CountState::Finished
    }

    /// Start (or restart) the count-up. With reduced motion active the
    /// displayed value jumps straight to the formatted end value.
    pub fn trigger(&mut self, now: f64, reduced_motion: bool, page: &mut Page) {
        if reduced_motion {
            self.finish(page);
            return;
        }
        // Cancel-and-replace: a running instance is simply restarted.
        self.state = CountState::Running {
            started_at: now,
            delay: self.delay,
        };
        page.set_display(&self.target, self.format.format(0.0));
    }

    /// Advance on the frame cadence. No-op unless running.
    pub fn tick(&mut self, now: f64, page: &mut Page) {
        let CountState::Running { started_at, delay } = self.state else {
            return;
        };
        let elapsed = now - started_at;
        if elapsed >= self.fallback_after {
            // Absolute fallback: never leave a partial value on screen.
            self.finish(page);
            return;
        }
        let local = (elapsed - delay) / self.duration;
        if local < 0.0 {
            return;
        }
        if local >= 1.0 {
            self.finish(page);
            return;
        }
        let value = self.end * self.ease.apply(local);
        page.set_display(&self.target, self.format.format(value));
    }

    fn finish(&mut self, page: &mut Page) {
        page.set_display(&self.target, self.format.format(self.end));
        self.state = CountState::Finished;
    }
}
