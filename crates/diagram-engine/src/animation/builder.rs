// animation/builder.rs
//
// Fluent construction of an animation. Every call appends one step to the
// animation's root serial step; `start` hands the result to the manager.
//
// Usage:
//   manager.new_animation()
//       .position(TweenOptions::to(Vec2::new(1.0, 1.0)).duration(1.0))
//       .dissolve_out(0.5)
//       .when_finished(|cancelled| println!("done: {}", cancelled))
//       .start();

use glam::Vec2;
use crate::api::types::Color;
use super::leaf::opacity::{dissolve_in_with, dissolve_out_with, opacity_with, DissolveOptions};
use super::leaf::pulse::{pulse_with, PulseOptions};
use super::leaf::tween::{tween_step, COLOR, POSITION, ROTATION, SCALE, TRANSFORM};
use super::manager::{AnimationId, AnimationManager};
use super::options::TweenOptions;
use super::scenario::{scenario_with, ScenarioOptions};
use super::step::{StartTime, Step};
use super::transform::Transform;

/// Builds one animation against a manager. Nothing runs until `start`,
/// `start_at` or `register` is called; dropping the builder discards it.
pub struct AnimationBuilder<'m> {
    manager: &'m mut AnimationManager,
    name: Option<String>,
    steps: Vec<Step>,
    on_finish: Option<Box<dyn FnMut(bool)>>,
    complete_on_cancel: Option<Option<bool>>,
    remove_on_finish: Option<bool>,
}

impl<'m> AnimationBuilder<'m> {
    pub(crate) fn new(manager: &'m mut AnimationManager, name: Option<String>) -> Self {
        Self {
            manager,
            name,
            steps: Vec::new(),
            on_finish: None,
            complete_on_cancel: None,
            remove_on_finish: None,
        }
    }

    fn default_duration(&self) -> f64 {
        self.manager.config().default_duration
    }

    /// Append any step.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    // -- Interpolation --

    pub fn position(self, options: TweenOptions<Vec2>) -> Self {
        let step = tween_step(POSITION, options, self.default_duration());
        self.then(step)
    }

    pub fn rotation(self, options: TweenOptions<f32>) -> Self {
        let step = tween_step(ROTATION, options, self.default_duration());
        self.then(step)
    }

    pub fn scale(self, options: TweenOptions<Vec2>) -> Self {
        let step = tween_step(SCALE, options, self.default_duration());
        self.then(step)
    }

    pub fn transform(self, options: TweenOptions<Transform>) -> Self {
        let step = tween_step(TRANSFORM, options, self.default_duration());
        self.then(step)
    }

    pub fn color(self, options: TweenOptions<Color>) -> Self {
        let step = tween_step(COLOR, options, self.default_duration());
        self.then(step)
    }

    pub fn opacity(self, options: TweenOptions<f32>) -> Self {
        let step = opacity_with(options, self.default_duration());
        self.then(step)
    }

    // -- Visibility and color shortcuts --

    pub fn dissolve_in(self, options: impl Into<DissolveOptions>) -> Self {
        let step = dissolve_in_with(options.into(), self.manager.config().dissolve_epsilon);
        self.then(step)
    }

    pub fn dissolve_out(self, options: impl Into<DissolveOptions>) -> Self {
        let step = dissolve_out_with(options.into(), self.manager.config().dissolve_epsilon);
        self.then(step)
    }

    pub fn dim(self, duration: f64) -> Self {
        self.then(Step::dim(duration))
    }

    pub fn undim(self, duration: f64) -> Self {
        self.then(Step::undim(duration))
    }

    pub fn pulse(self, options: PulseOptions) -> Self {
        let step = pulse_with(options, &self.manager.config().pulse);
        self.then(step)
    }

    pub fn scenario(self, options: ScenarioOptions) -> Self {
        let step = scenario_with(options, &self.manager.config().scenario);
        self.then(step)
    }

    // -- Callbacks and timing --

    pub fn custom(self, duration: f64, callback: impl FnMut(f64) + 'static) -> Self {
        self.then(Step::custom(duration, callback))
    }

    pub fn trigger(self, callback: impl FnMut() + 'static) -> Self {
        self.then(Step::trigger(callback))
    }

    pub fn delay(self, duration: f64) -> Self {
        self.then(Step::delay(duration))
    }

    // -- Composites --

    pub fn in_parallel(self, steps: Vec<Step>) -> Self {
        self.then(Step::in_parallel(steps))
    }

    pub fn in_serial(self, steps: Vec<Step>) -> Self {
        self.then(Step::in_serial(steps))
    }

    // -- Animation-level policy --

    /// Call `callback(cancelled)` once the whole animation finishes.
    pub fn when_finished(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// On cancel, keep the values applied so far.
    pub fn if_canceled_then_stop(mut self) -> Self {
        self.complete_on_cancel = Some(Some(false));
        self
    }

    /// On cancel, jump every remaining step to its end value.
    pub fn if_canceled_then_complete(mut self) -> Self {
        self.complete_on_cancel = Some(Some(true));
        self
    }

    /// On cancel, let each step follow its own policy (the default).
    pub fn if_canceled_then_default(mut self) -> Self {
        self.complete_on_cancel = Some(None);
        self
    }

    /// Whether the manager drops the animation once it finishes (default
    /// true). A kept animation can be restarted by name.
    pub fn remove_on_finish(mut self, remove: bool) -> Self {
        self.remove_on_finish = Some(remove);
        self
    }

    // -- Terminal --

    /// Start on the next frame.
    pub fn start(self) -> AnimationId {
        self.finish(Some(StartTime::NextFrame))
    }

    /// Start at logical time `t`.
    pub fn start_at(self, t: f64) -> AnimationId {
        self.finish(Some(StartTime::At(t)))
    }

    /// Register without starting; see [`AnimationManager::start`].
    pub fn register(self) -> AnimationId {
        self.finish(None)
    }

    /// The root step, detached from the manager.
    pub fn build(self) -> Step {
        let Self { steps, on_finish, complete_on_cancel, .. } = self;
        Self::root(steps, on_finish, complete_on_cancel)
    }

    fn root(
        steps: Vec<Step>,
        on_finish: Option<Box<dyn FnMut(bool)>>,
        complete_on_cancel: Option<Option<bool>>,
    ) -> Step {
        let mut root = Step::in_serial(steps);
        root.on_finish = on_finish;
        if let Some(policy) = complete_on_cancel {
            root.complete_on_cancel = policy;
        }
        root
    }

    fn finish(self, when: Option<StartTime>) -> AnimationId {
        let Self { manager, name, steps, on_finish, complete_on_cancel, remove_on_finish } = self;

        if let Some(existing) = name.as_deref().and_then(|n| manager.find_mut(n)) {
            log::debug!(
                "extending animation `{}` with {} step(s)",
                existing.name().unwrap_or_default(),
                steps.len()
            );
            for step in steps {
                existing.root.push_child(step);
            }
            if on_finish.is_some() {
                existing.root.on_finish = on_finish;
            }
            if let Some(policy) = complete_on_cancel {
                existing.root.complete_on_cancel = policy;
            }
            if let Some(remove) = remove_on_finish {
                existing.remove_on_finish = remove;
            }
            if let Some(when) = when {
                if !existing.root.state().is_active() {
                    existing.root.start(when);
                }
            }
            let id = existing.id();
            manager.refresh_state();
            return id;
        }

        let root = Self::root(steps, on_finish, complete_on_cancel);
        manager.insert(name, root, when, remove_on_finish.unwrap_or(true))
    }
}
