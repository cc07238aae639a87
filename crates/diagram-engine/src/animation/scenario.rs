// animation/scenario.rs
//
// Scenario step: drives a target toward a whole state (position, rotation,
// scale, color, visibility) at once. It reads the target on its first frame
// and turns into a parallel of up to five child steps. Durations come from
// an explicit value or from per-quantity velocities.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::api::types::Color;
use crate::config::ScenarioDefaults;
use super::leaf::opacity::{DissolveOptions, DISSOLVE_EPSILON};
use super::options::TweenOptions;
use super::progression::Progression;
use super::step::{CancelForce, StartTime, Step, StepKind};
use super::target::AnimationTarget;
use super::transform::{delta_angle, ClipRotation, RotationDirection};
use super::value::Interpolate;

/// A target state. Unset fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioState {
    pub position: Option<Vec2>,
    pub rotation: Option<f32>,
    pub scale: Option<Vec2>,
    pub color: Option<Color>,
    pub is_shown: Option<bool>,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field read from `target`.
    pub fn capture(target: &dyn AnimationTarget) -> Self {
        Self {
            position: Some(target.position()),
            rotation: Some(target.rotation()),
            scale: Some(target.scale()),
            color: Some(target.color()),
            is_shown: Some(target.is_shown()),
        }
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn scale(mut self, scale: Vec2) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn shown(mut self, shown: bool) -> Self {
        self.is_shown = Some(shown);
        self
    }

    /// Fields of `self`, falling back to `other`.
    fn or(self, other: ScenarioState) -> Self {
        Self {
            position: self.position.or(other.position),
            rotation: self.rotation.or(other.rotation),
            scale: self.scale.or(other.scale),
            color: self.color.or(other.color),
            is_shown: self.is_shown.or(other.is_shown),
        }
    }
}

/// A state given directly or by name (looked up on the target).
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioSource {
    State(ScenarioState),
    Named(String),
}

impl From<ScenarioState> for ScenarioSource {
    fn from(state: ScenarioState) -> Self {
        ScenarioSource::State(state)
    }
}

impl From<&str> for ScenarioSource {
    fn from(name: &str) -> Self {
        ScenarioSource::Named(name.to_string())
    }
}

impl ScenarioSource {
    fn resolve(&self, target: &dyn AnimationTarget) -> Option<ScenarioState> {
        match self {
            ScenarioSource::State(state) => Some(*state),
            ScenarioSource::Named(name) => {
                let state = target.scenario(name);
                if state.is_none() {
                    log::warn!("target has no scenario named `{}`", name);
                }
                state
            }
        }
    }
}

/// Units per second for each quantity. Unset quantities use the fixed
/// duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioVelocity {
    pub position: Option<f32>,
    /// Radians per second.
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    /// Largest channel change per second.
    pub color: Option<f32>,
    /// Opacity change per second for visibility fades.
    pub opacity: Option<f32>,
}

impl ScenarioVelocity {
    /// The same velocity for position, rotation and scale.
    pub fn transform(velocity: f32) -> Self {
        Self {
            position: Some(velocity),
            rotation: Some(velocity),
            scale: Some(velocity),
            ..Self::default()
        }
    }

    pub fn position(mut self, v: f32) -> Self {
        self.position = Some(v);
        self
    }

    pub fn rotation(mut self, v: f32) -> Self {
        self.rotation = Some(v);
        self
    }

    pub fn scale(mut self, v: f32) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn color(mut self, v: f32) -> Self {
        self.color = Some(v);
        self
    }

    pub fn opacity(mut self, v: f32) -> Self {
        self.opacity = Some(v);
        self
    }
}

/// Parameters for a scenario step. Unset thresholds fall back to the
/// configured scenario defaults.
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub target: ScenarioSource,
    /// Start state; unset fields are read from the target.
    pub start: Option<ScenarioSource>,
    pub duration: Option<f64>,
    pub velocity: ScenarioVelocity,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub zero_duration_threshold: Option<f64>,
    pub all_durations_same: Option<bool>,
    pub direction: RotationDirection,
    pub clip: ClipRotation,
    pub progression: Option<Progression>,
    pub delay: f64,
}

impl ScenarioOptions {
    pub fn to(target: impl Into<ScenarioSource>) -> Self {
        Self {
            target: target.into(),
            start: None,
            duration: None,
            velocity: ScenarioVelocity::default(),
            min_duration: None,
            max_duration: None,
            zero_duration_threshold: None,
            all_durations_same: None,
            direction: RotationDirection::Shortest,
            clip: ClipRotation::None,
            progression: None,
            delay: 0.0,
        }
    }

    pub fn starting_at(mut self, start: impl Into<ScenarioSource>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn velocity(mut self, velocity: ScenarioVelocity) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn min_duration(mut self, d: f64) -> Self {
        self.min_duration = Some(d);
        self
    }

    pub fn max_duration(mut self, d: f64) -> Self {
        self.max_duration = Some(d);
        self
    }

    pub fn zero_duration_threshold(mut self, d: f64) -> Self {
        self.zero_duration_threshold = Some(d);
        self
    }

    pub fn all_durations_same(mut self, same: bool) -> Self {
        self.all_durations_same = Some(same);
        self
    }

    pub fn direction(mut self, direction: RotationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn clip(mut self, clip: ClipRotation) -> Self {
        self.clip = clip;
        self
    }

    pub fn progression(mut self, progression: Progression) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

pub(crate) struct Scenario {
    target: ScenarioSource,
    start: Option<ScenarioSource>,
    duration: f64,
    velocity: ScenarioVelocity,
    min_duration: f64,
    max_duration: Option<f64>,
    zero_threshold: f64,
    all_same: bool,
    direction: RotationDirection,
    clip: ClipRotation,
    /// The parallel this scenario becomes on its first frame.
    pub(crate) inner: Option<Box<Step>>,
}

impl Scenario {
    pub(crate) fn total_duration(&self) -> f64 {
        match &self.inner {
            Some(inner) => inner.total_duration(),
            None if self.uses_velocity() => 0.0,
            None => self.duration,
        }
    }

    fn uses_velocity(&self) -> bool {
        let v = &self.velocity;
        v.position.is_some()
            || v.rotation.is_some()
            || v.scale.is_some()
            || v.color.is_some()
            || v.opacity.is_some()
    }

    /// Duration for one quantity that changes by `distance`.
    fn duration_for(&self, distance: f32, velocity: Option<f32>) -> f64 {
        match velocity {
            Some(v) if v.is_finite() && v > 0.0 => {
                let d = f64::from(distance) / f64::from(v);
                if d <= self.zero_threshold {
                    return 0.0;
                }
                let d = d.max(self.min_duration);
                match self.max_duration {
                    Some(max) => d.min(max),
                    None => d,
                }
            }
            _ => self.duration,
        }
    }

    fn build(&self, progression: Progression, target: &dyn AnimationTarget) -> Step {
        let current = ScenarioState::capture(target);
        let start = self
            .start
            .as_ref()
            .and_then(|s| s.resolve(target))
            .unwrap_or_default()
            .or(current);
        let end = self.target.resolve(target).unwrap_or_default();

        let mut position = end.position.zip(start.position).map(|(to, from)| {
            (to, from, self.duration_for((to - from).length(), self.velocity.position))
        });
        let mut rotation = end.rotation.zip(start.rotation).map(|(to, from)| {
            let delta = delta_angle(from, to, self.direction);
            (from + delta, from, self.duration_for(delta.abs(), self.velocity.rotation))
        });
        let mut scale = end.scale.zip(start.scale).map(|(to, from)| {
            (to, from, self.duration_for((to - from).length(), self.velocity.scale))
        });
        let color = end.color.zip(start.color).map(|(to, from)| {
            (to, from, self.duration_for(to.difference(from).magnitude(), self.velocity.color))
        });

        if self.all_same {
            let longest = [
                position.map(|p| p.2),
                rotation.map(|r| r.2),
                scale.map(|s| s.2),
            ]
            .into_iter()
            .flatten()
            .fold(0.0, f64::max);
            for d in [
                position.as_mut().map(|p| &mut p.2),
                rotation.as_mut().map(|r| &mut r.2),
                scale.as_mut().map(|s| &mut s.2),
            ]
            .into_iter()
            .flatten()
            {
                *d = longest;
            }
        }

        let mut steps = Vec::new();
        if let Some((to, from, d)) = position {
            steps.push(Step::position(
                TweenOptions::to(to).starting_at(from).duration(d).progression(progression),
            ));
        }
        if let Some((to, from, d)) = rotation {
            steps.push(Step::rotation(
                TweenOptions::to(to)
                    .starting_at(from)
                    .duration(d)
                    .progression(progression)
                    .clip(self.clip),
            ));
        }
        if let Some((to, from, d)) = scale {
            steps.push(Step::scale(
                TweenOptions::to(to).starting_at(from).duration(d).progression(progression),
            ));
        }
        if let Some((to, from, d)) = color {
            steps.push(Step::color(
                TweenOptions::to(to).starting_at(from).duration(d).progression(progression),
            ));
        }
        if let (Some(shown), Some(was_shown)) = (end.is_shown, start.is_shown) {
            if shown != was_shown {
                let d = self.duration_for(1.0 - DISSOLVE_EPSILON, self.velocity.opacity);
                let options = DissolveOptions::new(d).progression(progression);
                steps.push(if shown {
                    Step::dissolve_in(options)
                } else {
                    Step::dissolve_out(options)
                });
            }
        }
        Step::in_parallel(steps)
    }

    /// Returns `(remainder, finished)`.
    pub(crate) fn frame(
        &mut self,
        now: f64,
        start: f64,
        progression: Progression,
        target: &mut dyn AnimationTarget,
    ) -> (f64, bool) {
        if now < start {
            return (now - start - self.total_duration(), false);
        }
        if self.inner.is_none() {
            let mut inner = Box::new(self.build(progression, &*target));
            inner.start(StartTime::At(start));
            self.inner = Some(inner);
        }
        let Some(inner) = self.inner.as_mut() else {
            return (now - start, true);
        };
        let remaining = inner.next_frame(now, target);
        (remaining, inner.is_finished())
    }

    pub(crate) fn finish_inner(
        &mut self,
        cancelled: bool,
        force: Option<CancelForce>,
        complete: bool,
        progression: Progression,
        target: &mut dyn AnimationTarget,
    ) {
        if self.inner.is_none() && complete && target.is_available() {
            let mut inner = Box::new(self.build(progression, &*target));
            inner.start(StartTime::NextFrame);
            self.inner = Some(inner);
        }
        if let Some(inner) = self.inner.as_mut() {
            let force = if complete { Some(CancelForce::Complete) } else { force };
            inner.finish(cancelled, force, target);
        }
    }
}

pub(crate) fn scenario_with(options: ScenarioOptions, defaults: &ScenarioDefaults) -> Step {
    let scenario = Scenario {
        target: options.target,
        start: options.start,
        duration: options.duration.unwrap_or(defaults.duration),
        velocity: options.velocity,
        min_duration: options.min_duration.unwrap_or(defaults.min_duration),
        max_duration: options.max_duration.or(defaults.max_duration),
        zero_threshold: options
            .zero_duration_threshold
            .unwrap_or(defaults.zero_duration_threshold),
        all_same: options.all_durations_same.unwrap_or(defaults.all_durations_same),
        direction: options.direction,
        clip: options.clip,
        inner: None,
    };
    Step::new(StepKind::Scenario(scenario))
        .with_delay(options.delay)
        .with_progression(options.progression.unwrap_or(Progression::EaseInOut))
}

impl Step {
    /// Move the target to a whole state at once.
    pub fn scenario(options: ScenarioOptions) -> Step {
        scenario_with(options, &ScenarioDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::components::element::ElementProps;
    use super::*;

    fn run(step: &mut Step, target: &mut ElementProps, times: &[f64]) {
        step.start(StartTime::At(times[0]));
        for &t in times {
            step.next_frame(t, target);
        }
    }

    #[test]
    fn fans_out_into_parallel() {
        let mut target = ElementProps::default();
        let end = ScenarioState::new()
            .position(Vec2::new(2.0, 0.0))
            .scale(Vec2::splat(2.0))
            .color([0.0, 0.0, 0.0, 1.0]);
        let mut step = Step::scenario(
            ScenarioOptions::to(end).duration(1.0).progression(Progression::Linear),
        );
        run(&mut step, &mut target, &[0.0, 0.5]);
        assert!((target.position.x - 1.0).abs() < 1e-4);
        assert!((target.scale.x - 1.5).abs() < 1e-4);
        assert!((target.color[0] - 0.5).abs() < 1e-4);
        step.next_frame(1.0, &mut target);
        assert!(step.is_finished());
        assert_eq!(target.position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn velocity_durations_in_lock_step() {
        let mut target = ElementProps::default();
        let end = ScenarioState::new().position(Vec2::new(4.0, 0.0)).scale(Vec2::splat(2.0));
        let mut step = Step::scenario(
            ScenarioOptions::to(end).velocity(ScenarioVelocity::transform(1.0)),
        );
        run(&mut step, &mut target, &[0.0]);
        // Position needs 4s, scale sqrt(2)s; both take 4s
        assert!((step.total_duration() - 4.0).abs() < 1e-6);
        let durations: Vec<f64> = step_children(&step).into_iter().map(Step::duration).collect();
        assert!(durations.iter().all(|d| (d - 4.0).abs() < 1e-6), "{:?}", durations);
    }

    #[test]
    fn independent_durations_when_not_same() {
        let mut target = ElementProps::default();
        let end = ScenarioState::new().position(Vec2::new(4.0, 0.0)).rotation(1.0);
        let mut step = Step::scenario(
            ScenarioOptions::to(end)
                .velocity(ScenarioVelocity::transform(1.0))
                .all_durations_same(false),
        );
        run(&mut step, &mut target, &[0.0]);
        let durations: Vec<f64> = step_children(&step).into_iter().map(Step::duration).collect();
        assert!((durations[0] - 4.0).abs() < 1e-6);
        assert!((durations[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_distance_is_zero_duration() {
        let mut target = ElementProps::default();
        target.position = Vec2::new(1.0, 1.0);
        let before = target.clone();
        let end = ScenarioState::new().position(Vec2::new(1.0, 1.0));
        let mut step = Step::scenario(
            ScenarioOptions::to(end).velocity(ScenarioVelocity::default().position(2.0)),
        );
        step.start(StartTime::At(0.0));
        let r = step.next_frame(0.0, &mut target);
        assert!(step.is_finished());
        assert_eq!(r, 0.0);
        assert_eq!(step.total_duration(), 0.0);
        assert_eq!(target, before);
    }

    #[test]
    fn velocity_duration_is_clamped() {
        let mut target = ElementProps::default();
        let end = ScenarioState::new().position(Vec2::new(10.0, 0.0));
        let mut step = Step::scenario(
            ScenarioOptions::to(end)
                .velocity(ScenarioVelocity::default().position(1.0))
                .max_duration(2.0),
        );
        run(&mut step, &mut target, &[0.0]);
        assert!((step.total_duration() - 2.0).abs() < 1e-9);

        let end = ScenarioState::new().position(Vec2::new(0.1, 0.0));
        let mut step = Step::scenario(
            ScenarioOptions::to(end)
                .velocity(ScenarioVelocity::default().position(1.0))
                .zero_duration_threshold(0.2),
        );
        run(&mut step, &mut target, &[0.0]);
        assert!(step.is_finished());
        assert!((target.position.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn visibility_change_dissolves() {
        let mut target = ElementProps::default();
        target.shown = false;
        let mut step = Step::scenario(
            ScenarioOptions::to(ScenarioState::new().shown(true)).duration(1.0),
        );
        run(&mut step, &mut target, &[0.0]);
        assert!(target.shown);
        step.next_frame(1.0, &mut target);
        assert_eq!(target.opacity, 1.0);
    }

    #[test]
    fn named_scenario_is_looked_up() {
        let mut target = ElementProps::default();
        target.scenarios.insert("right".into(), ScenarioState::new().position(Vec2::X));
        let mut step = Step::scenario(ScenarioOptions::to("right").duration(1.0));
        run(&mut step, &mut target, &[0.0, 1.0]);
        assert_eq!(target.position, Vec2::X);

        // Unknown names change nothing
        let mut step = Step::scenario(ScenarioOptions::to("nowhere").duration(1.0));
        run(&mut step, &mut target, &[2.0, 3.0]);
        assert!(step.is_finished());
        assert_eq!(target.position, Vec2::X);
    }

    #[test]
    fn cancel_before_first_frame_completes_to_end() {
        let mut target = ElementProps::default();
        let mut seq = Step::in_serial(vec![
            Step::delay(1.0),
            Step::scenario(ScenarioOptions::to(ScenarioState::new().rotation(1.0)).duration(1.0)),
        ]);
        seq.start(StartTime::At(0.0));
        seq.next_frame(0.5, &mut target);
        seq.cancel(Some(CancelForce::Complete), &mut target);
        assert!((target.rotation - 1.0).abs() < 1e-6);
    }

    fn step_children(step: &Step) -> Vec<&Step> {
        match &step.kind {
            StepKind::Scenario(s) => s
                .inner
                .as_ref()
                .and_then(|inner| inner.children())
                .map(|c| c.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
