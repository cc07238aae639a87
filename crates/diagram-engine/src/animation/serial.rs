// animation/serial.rs
//
// Serial composite: children run one after another. Time left over by a
// finishing child is handed to the next one within the same frame, so a
// single large time jump walks every child it spans, in order.

use super::step::{CancelForce, StartTime, Step, StepKind};
use super::target::AnimationTarget;

#[derive(Default)]
pub(crate) struct Serial {
    pub(crate) steps: Vec<Step>,
    /// Child currently being advanced.
    pub(crate) index: usize,
}

impl Serial {
    pub(crate) fn total_duration(&self) -> f64 {
        self.steps.iter().map(Step::total_duration).sum()
    }

    /// Returns `(remainder, finished)`.
    pub(crate) fn frame(
        &mut self,
        now: f64,
        start: f64,
        target: &mut dyn AnimationTarget,
    ) -> (f64, bool) {
        let last = match self.steps.len() {
            0 => return (now - start, true),
            n => n - 1,
        };
        loop {
            let Some(step) = self.steps.get_mut(self.index) else {
                return (0.0, true);
            };
            let remaining = step.next_frame(now, target);
            if remaining < 0.0 {
                return (remaining, false);
            }
            if self.index >= last {
                return (remaining, true);
            }
            self.index += 1;
            self.steps[self.index].start(StartTime::At(now - remaining));
        }
    }

    pub(crate) fn finish_children(
        &mut self,
        cancelled: bool,
        force: Option<CancelForce>,
        target: &mut dyn AnimationTarget,
    ) {
        for step in &mut self.steps {
            step.finish(cancelled, force, target);
        }
    }

    /// Append a step to a possibly running sequence. Appended children of a
    /// started sequence wait for their turn like the original ones.
    pub(crate) fn push(&mut self, mut step: Step, parent_started: bool) {
        if parent_started {
            step.start_waiting();
        }
        self.steps.push(step);
    }
}

impl Step {
    /// Run `steps` one after another.
    pub fn in_serial(steps: Vec<Step>) -> Step {
        Step::new(StepKind::Serial(Serial { steps, index: 0 }))
    }

    /// Append a step to a serial or parallel composite. On a running
    /// composite the new step waits for its turn; in a parallel that is the
    /// next frame. Other kinds log a warning and drop the step.
    pub fn then(mut self, step: Step) -> Step {
        self.push_child(step);
        self
    }

    pub(crate) fn push_child(&mut self, step: Step) {
        let started = self.state.is_active();
        let name = self.kind_name();
        match &mut self.kind {
            StepKind::Serial(s) => s.push(step, started),
            StepKind::Parallel(p) => {
                let mut step = step;
                if started {
                    step.start_waiting();
                }
                p.steps.push(step);
            }
            _ => log::warn!("cannot append a step to a {} step", name),
        }
    }
}
