// animation/leaf/mod.rs
//
// Leaf step families. Each leaf only knows how to write its own property;
// timing, delay, progression and cancel policy live in `Step`.

pub mod custom;
pub mod opacity;
pub mod pulse;
pub mod tween;

use super::step::Step;
use super::target::AnimationTarget;

/// One frame of a leaf.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    /// Eased percent complete.
    pub percent: f64,
    /// Absolute time of the frame.
    pub now: f64,
}

pub(crate) trait Leaf {
    fn name(&self) -> &'static str;

    /// Called once before the first frame or before completing a step that
    /// never ran. Captures missing start values from the target and may
    /// return a duration derived from them.
    fn begin(&mut self, _target: &mut dyn AnimationTarget) -> Option<f64> {
        None
    }

    fn apply(&mut self, frame: Frame, target: &mut dyn AnimationTarget);

    /// Write the final value.
    fn set_to_end(&mut self, _target: &mut dyn AnimationTarget) {}

    /// Tidy up after a cancel that keeps the current value.
    fn cancelled_without_complete(&mut self, _target: &mut dyn AnimationTarget) {}
}

/// Pure timing leaf.
struct Delay;

impl Leaf for Delay {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn apply(&mut self, _frame: Frame, _target: &mut dyn AnimationTarget) {}
}

impl Step {
    /// Wait `duration` seconds without touching the target.
    pub fn delay(duration: f64) -> Step {
        Step::leaf(Delay, duration)
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::step::StartTime;
    use crate::components::element::ElementProps;
    use super::*;

    #[test]
    fn delay_only_consumes_time() {
        let mut target = ElementProps::default();
        let before = target.clone();
        let mut step = Step::delay(2.0);
        step.start(StartTime::At(0.0));
        assert!((step.next_frame(1.0, &mut target) + 1.0).abs() < 1e-9);
        assert!((step.next_frame(2.5, &mut target) - 0.5).abs() < 1e-9);
        assert!(step.is_finished());
        assert_eq!(target, before);
    }
}
