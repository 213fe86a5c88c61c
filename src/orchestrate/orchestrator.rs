use crate::{
    animation::counter::CountUp,
    foundation::core::Progress,
    orchestrate::config::SectionConfig,
    page::model::{NodeId, Page, Prop},
    scroll::binder::PinBinding,
    timeline::machine::{SideEffect, Timeline},
};

/// Entities forced into their fully-revealed rest state when a section is
/// handed off to (no entrance animation).
#[derive(Clone, Debug, Default)]
pub struct RevealTargets {
    /// Character units: translate-Y percent snaps to 0.
    pub chars: Vec<NodeId>,
    /// Blocks that fade/slide in: opacity 1, translate-Y 0.
    pub fades: Vec<NodeId>,
}

/// A stepped narrative inside one pinned section: exactly one step is
/// active at any progress value.
#[derive(Clone, Debug)]
pub struct StoryStepper {
    steps: Vec<NodeId>,
    active: Option<usize>,
}

pub const STEP_DIMMED_OPACITY: f64 = 0.2;

impl StoryStepper {
    pub fn new(steps: Vec<NodeId>) -> Self {
        Self {
            steps,
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Activate the step for a progress bucket. The previous step is
    /// deactivated and the new one activated in the same update, so no
    /// observer ever sees zero or two active steps.
    pub fn update(&mut self, p: Progress, page: &mut Page) {
        if self.steps.is_empty() {
            return;
        }
        let index = ((p.value() * self.steps.len() as f64) as usize).min(self.steps.len() - 1);
        if Some(index) == self.active {
            return;
        }
        if let Some(prev) = self.active {
            page.set_prop(&self.steps[prev], Prop::Opacity, STEP_DIMMED_OPACITY);
        }
        page.set_prop(&self.steps[index], Prop::Opacity, 1.0);
        self.active = Some(index);
    }
}

/// One section wired to its timeline/binding pair.
pub struct SectionRuntime {
    pub node: NodeId,
    pub config: SectionConfig,
    pub timeline: Timeline,
    pub reveal: RevealTargets,
    pub counters: Vec<CountUp>,
    pub stepper: Option<StoryStepper>,
    binding: Option<PinBinding>,
    revealed: bool,
}

impl SectionRuntime {
    pub fn new(node: impl Into<NodeId>, config: SectionConfig, timeline: Timeline) -> Self {
        Self {
            node: node.into(),
            config,
            timeline,
            reveal: RevealTargets::default(),
            counters: Vec::new(),
            stepper: None,
            binding: None,
            revealed: false,
        }
    }

    pub fn with_reveal(mut self, reveal: RevealTargets) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn with_counters(mut self, counters: Vec<CountUp>) -> Self {
        self.counters = counters;
        self
    }

    pub fn with_stepper(mut self, stepper: StoryStepper) -> Self {
        self.stepper = Some(stepper);
        self
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn binding(&self) -> Option<&PinBinding> {
        self.binding.as_ref()
    }
}

/// Owns the ordered section catalog, drives each timeline from its binding
/// and coordinates cross-section handoff.
pub struct Orchestrator {
    sections: Vec<SectionRuntime>,
    reduced_motion: bool,
}

impl Orchestrator {
    pub fn new(page: &Page, mut sections: Vec<SectionRuntime>, reduced_motion: bool) -> Self {
        for section in &mut sections {
            let params = section.config.resolve(page.viewport);
            section.binding = PinBinding::bind(page, &section.node, &params);
        }
        Self {
            sections,
            reduced_motion,
        }
    }

    pub fn sections(&self) -> &[SectionRuntime] {
        &self.sections
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Re-bind every section to current layout (resize, orientation change,
    /// explicit refresh). Returns true when any section re-bound against a
    /// live node so the caller can signal layout-settle to the anchor
    /// recalculator.
    pub fn refresh(&mut self, page: &Page) -> bool {
        let mut any = false;
        for section in &mut self.sections {
            let params = section.config.resolve(page.viewport);
            match &mut section.binding {
                Some(binding) => {
                    any |= binding.refresh(page, &params);
                }
                None => {
                    section.binding = PinBinding::bind(page, &section.node, &params);
                    any |= section.binding.is_some();
                }
            }
        }
        any
    }

    /// Drive all timelines from the current scroll sample. Synchronous;
    /// never blocks. Fired side effects are dispatched before returning.
    #[tracing::instrument(skip(self, page))]
    pub fn drive(&mut self, page: &mut Page, scroll_y: f64, now: f64) {
        for index in 0..self.sections.len() {
            let progress = {
                let section = &mut self.sections[index];
                let Some(binding) = section.binding.as_mut() else {
                    continue;
                };
                binding.advance(scroll_y)
            };

            let fired = self.sections[index].timeline.evaluate(progress, page);
            if let Some(stepper) = self.sections[index].stepper.as_mut() {
                stepper.update(progress, page);
            }
            for effect in fired {
                self.dispatch(index, effect, page, now);
            }
        }
    }

    fn dispatch(&mut self, index: usize, effect: SideEffect, page: &mut Page, now: f64) {
        match effect {
            SideEffect::RevealNext => self.reveal_immediate(index + 1, page),
            SideEffect::StartCounters => self.start_counters(index, page, now),
        }
    }

    /// Force a section into its fully-revealed rest state, skipping its
    /// entrance. Idempotent: jitter near the handoff boundary may trigger
    /// this repeatedly, but entrance side effects run exactly once.
    pub fn reveal_immediate(&mut self, index: usize, page: &mut Page) {
        let Some(section) = self.sections.get_mut(index) else {
            return;
        };
        if section.revealed {
            return;
        }
        section.revealed = true;
        tracing::debug!(section = %section.node, "handoff: revealing section immediately");
        for id in &section.reveal.chars {
            page.set_prop(id, Prop::YPercent, 0.0);
        }
        for id in &section.reveal.fades {
            page.set_prop(id, Prop::Opacity, 1.0);
            page.set_prop(id, Prop::TranslateY, 0.0);
        }
    }

    fn start_counters(&mut self, index: usize, page: &mut Page, now: f64) {
        let reduced = self.reduced_motion;
        if let Some(section) = self.sections.get_mut(index) {
            for counter in &mut section.counters {
                counter.trigger(now, reduced, page);
            }
        }
    }

    /// Frame-cadence work: advance in-flight counters.
    pub fn tick(&mut self, page: &mut Page, now: f64) {
        for section in &mut self.sections {
            for counter in &mut section.counters {
                counter.tick(now, page);
            }
        }
    }

    /// Snap all smoothed progress to raw (scrolling stopped) and re-drive.
    pub fn settle(&mut self, page: &mut Page, scroll_y: f64, now: f64) {
        for index in 0..self.sections.len() {
            let progress = {
                let section = &mut self.sections[index];
                let Some(binding) = section.binding.as_mut() else {
                    continue;
                };
                binding.settle(scroll_y)
            };
            let fired = self.sections[index].timeline.evaluate(progress, page);
            if let Some(stepper) = self.sections[index].stepper.as_mut() {
                stepper.update(progress, page);
            }
            for effect in fired {
                self.dispatch(index, effect, page, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Viewport;
    use crate::page::model::Node;

    fn page_with_steps(n: usize) -> (Page, Vec<NodeId>) {
        let mut page = Page::new(Viewport::new(1440.0, 900.0).unwrap());
        let mut ids = Vec::new();
        for i in 0..n {
            let id: NodeId = format!("step{i}").into();
            page.insert(Node::new(id.clone()));
            ids.push(id);
        }
        (page, ids)
    }

    #[test]
    fn exactly_one_step_active_per_bucket() {
        let (mut page, ids) = page_with_steps(3);
        let mut stepper = StoryStepper::new(ids.clone());

        stepper.update(Progress::new(0.1), &mut page);
        assert_eq!(stepper.active(), Some(0));

        stepper.update(Progress::new(0.5), &mut page);
        assert_eq!(stepper.active(), Some(1));
        assert_eq!(page.prop(&ids[0], Prop::Opacity), Some(STEP_DIMMED_OPACITY));
        assert_eq!(page.prop(&ids[1], Prop::Opacity), Some(1.0));

        // Last bucket clamps to the final step.
        stepper.update(Progress::ONE, &mut page);
        assert_eq!(stepper.active(), Some(2));
        assert_eq!(page.prop(&ids[1], Prop::Opacity), Some(STEP_DIMMED_OPACITY));
    }

    #[test]
    fn same_bucket_is_a_noop() {
        let (mut page, ids) = page_with_steps(2);
        let mut stepper = StoryStepper::new(ids.clone());
        stepper.update(Progress::new(0.1), &mut page);
        page.set_prop(&ids[0], Prop::Opacity, 0.77); // outside writer, test only
        stepper.update(Progress::new(0.2), &mut page);
        assert_eq!(page.prop(&ids[0], Prop::Opacity), Some(0.77));
    }
}
