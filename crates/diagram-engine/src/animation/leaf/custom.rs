// animation/leaf/custom.rs
//
// Callback leaves: custom (called every frame with the eased percent) and
// trigger (called once).

use crate::animation::progression::Progression;
use crate::animation::step::Step;
use crate::animation::target::AnimationTarget;
use super::{Frame, Leaf};

struct Custom {
    callback: Box<dyn FnMut(f64)>,
}

impl Leaf for Custom {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn apply(&mut self, frame: Frame, _target: &mut dyn AnimationTarget) {
        (self.callback)(frame.percent);
    }

    fn set_to_end(&mut self, _target: &mut dyn AnimationTarget) {
        (self.callback)(1.0);
    }
}

struct Trigger {
    callback: Option<Box<dyn FnMut()>>,
}

impl Trigger {
    fn fire(&mut self) {
        if let Some(mut callback) = self.callback.take() {
            callback();
        }
    }
}

impl Leaf for Trigger {
    fn name(&self) -> &'static str {
        "trigger"
    }

    fn apply(&mut self, _frame: Frame, _target: &mut dyn AnimationTarget) {
        self.fire();
    }

    fn set_to_end(&mut self, _target: &mut dyn AnimationTarget) {
        self.fire();
    }
}

impl Step {
    /// Call `callback(percent)` every frame for `duration` seconds. Linear
    /// unless another progression is set. Completing on cancel calls it
    /// with 1.0.
    pub fn custom(duration: f64, callback: impl FnMut(f64) + 'static) -> Step {
        Step::leaf(Custom { callback: Box::new(callback) }, duration)
            .with_progression(Progression::Linear)
    }

    /// Call `callback` once, on the step's first frame or when it is
    /// completed by a cancel.
    pub fn trigger(callback: impl FnMut() + 'static) -> Step {
        Step::trigger_for(0.0, callback)
    }

    /// Like [`Step::trigger`], but following steps wait `duration` seconds.
    pub fn trigger_for(duration: f64, callback: impl FnMut() + 'static) -> Step {
        Step::leaf(Trigger { callback: Some(Box::new(callback)) }, duration)
    }
}
