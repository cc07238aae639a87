// animation/parallel.rs
//
// Parallel composite: every child is advanced with the same absolute time
// each frame. Finishes once all children have finished.

use super::step::{CancelForce, Step, StepKind};
use super::target::AnimationTarget;

#[derive(Default)]
pub(crate) struct Parallel {
    pub(crate) steps: Vec<Step>,
}

impl Parallel {
    pub(crate) fn total_duration(&self) -> f64 {
        self.steps.iter().map(Step::total_duration).fold(0.0, f64::max)
    }

    /// Returns `(remainder, finished)`. The remainder is the smallest one
    /// reported by the children still running this frame.
    pub(crate) fn frame(
        &mut self,
        now: f64,
        start: f64,
        target: &mut dyn AnimationTarget,
    ) -> (f64, bool) {
        let mut remaining: Option<f64> = None;
        for step in &mut self.steps {
            if step.state.is_active() {
                let r = step.next_frame(now, target);
                remaining = Some(remaining.map_or(r, |m| m.min(r)));
            }
        }
        match remaining {
            Some(r) => (r, r >= 0.0),
            None => (now - start - self.total_duration(), true),
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
}

impl Step {
    /// Run `steps` together from the same start time.
    pub fn in_parallel(steps: Vec<Step>) -> Step {
        Step::new(StepKind::Parallel(Parallel { steps }))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use crate::animation::options::TweenOptions;
    use crate::animation::progression::Progression;
    use crate::animation::step::{StartTime, StepState};
    use crate::components::element::ElementProps;
    use super::*;

    fn linear<T>(options: TweenOptions<T>) -> TweenOptions<T> {
        options.progression(Progression::Linear)
    }

    #[test]
    fn remainder_is_least_overrun() {
        let mut target = ElementProps::default();
        let mut par = Step::in_parallel(vec![
            Step::position(linear(TweenOptions::to(Vec2::ONE).duration(1.0))),
            Step::rotation(linear(TweenOptions::to(1.0).duration(2.0))),
        ]);
        par.start(StartTime::At(0.0));
        let r = par.next_frame(1.0, &mut target);
        assert!((r + 1.0).abs() < 1e-9);
        assert!(!par.is_finished());

        let r = par.next_frame(2.0 + 0.01, &mut target);
        assert!(par.is_finished());
        assert!(par.children().unwrap().iter().all(Step::is_finished));
        assert!((r - 0.01).abs() < 1e-9);
        assert_eq!(target.position, Vec2::ONE);
        assert_eq!(target.rotation, 1.0);
    }

    #[test]
    fn total_duration_is_max() {
        let par = Step::in_parallel(vec![
            Step::delay(1.0),
            Step::delay(2.5),
            Step::delay(0.5),
        ]);
        assert_eq!(par.total_duration(), 2.5);
    }

    #[test]
    fn cancel_is_broadcast_with_own_policies() {
        let mut target = ElementProps::default();
        let mut par = Step::in_parallel(vec![
            Step::position(linear(TweenOptions::to(Vec2::splat(4.0)).duration(1.0)))
                .if_canceled_then_complete(),
            Step::rotation(linear(TweenOptions::to(4.0).duration(1.0))),
        ]);
        par.start(StartTime::At(0.0));
        par.next_frame(0.5, &mut target);
        par.cancel(None, &mut target);
        assert_eq!(target.position, Vec2::splat(4.0));
        assert!((target.rotation - 2.0).abs() < 1e-4);
    }

    #[test]
    fn explicit_force_overrides_children() {
        let mut target = ElementProps::default();
        let mut par = Step::in_parallel(vec![
            Step::rotation(linear(TweenOptions::to(4.0).duration(1.0))),
        ]);
        par.start(StartTime::At(0.0));
        par.next_frame(0.5, &mut target);
        par.cancel(Some(CancelForce::Complete), &mut target);
        assert_eq!(target.rotation, 4.0);
    }

    #[test]
    fn empty_parallel_finishes() {
        let mut target = ElementProps::default();
        let mut par = Step::in_parallel(Vec::new());
        let r = par.next_frame(3.0, &mut target);
        assert!(par.is_finished());
        assert_eq!(r, 0.0);
    }

    #[test]
    fn appended_child_starts_on_next_frame() {
        let mut target = ElementProps::default();
        let mut par = Step::in_parallel(vec![
            Step::position(linear(TweenOptions::to(Vec2::ONE).duration(1.0))),
        ]);
        par.start(StartTime::At(0.0));
        par.next_frame(0.5, &mut target);
        par.push_child(Step::rotation(linear(TweenOptions::to(1.0).duration(1.0))));
        assert_eq!(par.children().unwrap()[1].state(), StepState::Waiting);

        par.next_frame(1.0, &mut target);
        assert!(!par.is_finished());
        assert_eq!(target.rotation, 0.0);
        let r = par.next_frame(2.0, &mut target);
        assert!(par.is_finished());
        assert_eq!(target.rotation, 1.0);
        assert!(r.abs() < 1e-9);
    }
}
