// animation/leaf/opacity.rs
//
// Opacity leaves, including dissolve in/out. Dissolves never drive opacity
// to exactly zero; they stop at a small epsilon so the target can be shown
// at the start of a dissolve-in without a visible pop.

use crate::api::types::Property;
use crate::animation::options::{End, Timing, TweenOptions};
use crate::animation::progression::Progression;
use crate::animation::step::Step;
use crate::animation::target::AnimationTarget;
use super::tween::DEFAULT_DURATION;
use super::{Frame, Leaf};

/// Default opacity floor for dissolves.
pub const DISSOLVE_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dissolve {
    In,
    Out,
}

/// Parameters for a dissolve.
#[derive(Debug, Clone, Copy)]
pub struct DissolveOptions {
    pub duration: f64,
    /// Start from the target's current opacity when it is already shown.
    pub from_current: bool,
    /// Opacity floor. Defaults to the configured dissolve epsilon.
    pub epsilon: Option<f32>,
    pub delay: f64,
    pub progression: Option<Progression>,
}

impl DissolveOptions {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            from_current: false,
            epsilon: None,
            delay: 0.0,
            progression: None,
        }
    }

    pub fn from_current(mut self) -> Self {
        self.from_current = true;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn progression(mut self, progression: Progression) -> Self {
        self.progression = Some(progression);
        self
    }
}

impl From<f64> for DissolveOptions {
    fn from(duration: f64) -> Self {
        Self::new(duration)
    }
}

struct OpacityLeaf {
    start: Option<f32>,
    end: Option<End<f32>>,
    dissolve: Option<Dissolve>,
    from_current: bool,
    epsilon: f32,
    /// Resolved on begin.
    delta: f32,
    when_complete: f32,
    timing: Timing,
}

impl OpacityLeaf {
    fn dissolve(kind: Dissolve, options: &DissolveOptions, default_epsilon: f32) -> Self {
        Self {
            start: None,
            end: None,
            dissolve: Some(kind),
            from_current: options.from_current,
            epsilon: options.epsilon.unwrap_or(default_epsilon),
            delta: 0.0,
            when_complete: 1.0,
            timing: Timing::Fixed(options.duration),
        }
    }

    fn set(&self, target: &mut dyn AnimationTarget, opacity: f32) {
        target.set_opacity(opacity);
        target.changed(Property::Opacity);
    }
}

impl Leaf for OpacityLeaf {
    fn name(&self) -> &'static str {
        match self.dissolve {
            Some(Dissolve::In) => "dissolve-in",
            Some(Dissolve::Out) => "dissolve-out",
            None => "opacity",
        }
    }

    fn begin(&mut self, target: &mut dyn AnimationTarget) -> Option<f64> {
        let current = || if target.is_shown() { Some(target.opacity()) } else { None };
        let (start, end) = match self.dissolve {
            Some(Dissolve::In) => {
                let start = if self.from_current { current() } else { None };
                (start.unwrap_or(self.epsilon), 1.0)
            }
            Some(Dissolve::Out) => {
                let start = if self.from_current { current() } else { None };
                (start.unwrap_or(1.0), self.epsilon)
            }
            None => {
                let start = self.start.unwrap_or_else(|| target.opacity());
                let end = match self.end {
                    Some(End::Target(t)) => t,
                    Some(End::Delta(d)) => start + d,
                    Some(End::FromTarget(f)) => f(&*target),
                    None => start,
                };
                (start, end)
            }
        };
        self.start = Some(start);
        self.delta = end - start;
        self.when_complete = if self.dissolve.is_some() { 1.0 } else { end.clamp(0.0, 1.0) };

        if self.dissolve.is_some() {
            if self.dissolve == Some(Dissolve::In) {
                target.show();
                target.changed(Property::Visibility);
            }
            self.set(target, start);
        }
        self.timing.resolve(self.delta.abs())
    }

    fn apply(&mut self, frame: Frame, target: &mut dyn AnimationTarget) {
        let Some(start) = self.start else { return };
        let next = (start + self.delta * frame.percent as f32).clamp(0.0, 1.0);
        self.set(target, next);
    }

    fn set_to_end(&mut self, target: &mut dyn AnimationTarget) {
        self.set(target, self.when_complete);
        if self.dissolve == Some(Dissolve::Out) {
            target.hide();
            target.changed(Property::Visibility);
        }
    }

    fn cancelled_without_complete(&mut self, target: &mut dyn AnimationTarget) {
        if target.opacity() == self.epsilon {
            target.hide();
            target.changed(Property::Visibility);
            self.set(target, 1.0);
        }
    }
}

fn opacity_step(leaf: OpacityLeaf, duration: f64, delay: f64, progression: Option<Progression>) -> Step {
    Step::leaf(leaf, duration)
        .with_delay(delay)
        .with_progression(progression.unwrap_or(Progression::EaseInOut))
}

impl Step {
    /// Interpolate opacity, clamped to [0, 1]. Visibility is untouched.
    pub fn opacity(options: TweenOptions<f32>) -> Step {
        opacity_with(options, DEFAULT_DURATION)
    }

    /// Show the target and fade it in from the dissolve floor to 1.
    /// Completes on cancel unless told otherwise.
    pub fn dissolve_in(options: impl Into<DissolveOptions>) -> Step {
        dissolve_in_with(options.into(), DISSOLVE_EPSILON)
    }

    /// Fade the target out to the dissolve floor, then hide it and restore
    /// its opacity to 1. Completes on cancel unless told otherwise.
    pub fn dissolve_out(options: impl Into<DissolveOptions>) -> Step {
        dissolve_out_with(options.into(), DISSOLVE_EPSILON)
    }
}

pub(crate) fn opacity_with(options: TweenOptions<f32>, default_duration: f64) -> Step {
    let tween = match options.normalize("opacity", default_duration) {
        Ok(tween) => tween,
        Err(err) => {
            log::warn!("{}; step skipped", err);
            return Step::delay(0.0);
        }
    };
    let leaf = OpacityLeaf {
        start: tween.start,
        end: Some(tween.end),
        dissolve: None,
        from_current: false,
        epsilon: DISSOLVE_EPSILON,
        delta: 0.0,
        when_complete: 1.0,
        timing: tween.timing,
    };
    let mut step = opacity_step(leaf, tween.timing.initial(), options.delay, options.progression);
    step.complete_on_cancel = options.complete_on_cancel;
    step
}

pub(crate) fn dissolve_in_with(options: DissolveOptions, default_epsilon: f32) -> Step {
    dissolve_step(Dissolve::In, options, default_epsilon)
}

pub(crate) fn dissolve_out_with(options: DissolveOptions, default_epsilon: f32) -> Step {
    dissolve_step(Dissolve::Out, options, default_epsilon)
}

fn dissolve_step(kind: Dissolve, options: DissolveOptions, default_epsilon: f32) -> Step {
    let leaf = OpacityLeaf::dissolve(kind, &options, default_epsilon);
    opacity_step(leaf, options.duration, options.delay, options.progression)
        .if_canceled_then_complete()
}
