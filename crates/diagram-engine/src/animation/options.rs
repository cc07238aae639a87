// animation/options.rs
//
// User-facing step parameters, and their normalisation into one canonical
// record per leaf before any step is created.

use crate::error::{AnimationError, Result};
use super::progression::Progression;
use super::target::AnimationTarget;
use super::transform::{ClipRotation, RotationDirection};
use super::value::Interpolate;

/// Parameters for an interpolation step.
///
/// Give exactly one of `target` / `delta`. A missing `start` is read from
/// the target when the step first runs. Give a `duration` or a `velocity`;
/// with neither, the configured default duration is used.
#[derive(Debug, Clone, Copy)]
pub struct TweenOptions<T> {
    pub start: Option<T>,
    pub target: Option<T>,
    pub delta: Option<T>,
    pub duration: Option<f64>,
    /// Units per second. Overrides `duration`.
    pub velocity: Option<f32>,
    /// Upper bound for a velocity-derived duration.
    pub max_duration: Option<f64>,
    pub delay: f64,
    pub progression: Option<Progression>,
    pub complete_on_cancel: Option<bool>,
    /// Rotation and transform steps only.
    pub direction: RotationDirection,
    /// Rotation and transform steps only.
    pub clip: ClipRotation,
}

impl<T> Default for TweenOptions<T> {
    fn default() -> Self {
        Self {
            start: None,
            target: None,
            delta: None,
            duration: None,
            velocity: None,
            max_duration: None,
            delay: 0.0,
            progression: None,
            complete_on_cancel: None,
            direction: RotationDirection::default(),
            clip: ClipRotation::default(),
        }
    }
}

impl<T> TweenOptions<T> {
    /// Animate to an absolute value.
    pub fn to(target: T) -> Self {
        Self { target: Some(target), ..Self::default() }
    }

    /// Animate by a relative amount.
    pub fn by(delta: T) -> Self {
        Self { delta: Some(delta), ..Self::default() }
    }

    pub fn starting_at(mut self, start: T) -> Self {
        self.start = Some(start);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn max_duration(mut self, max: f64) -> Self {
        self.max_duration = Some(max);
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

    pub fn complete_on_cancel(mut self, complete: bool) -> Self {
        self.complete_on_cancel = Some(complete);
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

    /// Fill in a duration if none was given.
    pub fn or_duration(mut self, duration: f64) -> Self {
        if self.duration.is_none() {
            self.duration = Some(duration);
        }
        self
    }
}

/// Where an interpolation ends.
#[derive(Clone, Copy)]
pub(crate) enum End<T> {
    Target(T),
    Delta(T),
    /// Resolved from the target when the step begins.
    FromTarget(fn(&dyn AnimationTarget) -> T),
}

/// How long an interpolation takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timing {
    Fixed(f64),
    Velocity { velocity: f32, max: Option<f64> },
}

impl Timing {
    /// Duration known before the step runs.
    pub(crate) fn initial(self) -> f64 {
        match self {
            Timing::Fixed(d) => d,
            Timing::Velocity { .. } => 0.0,
        }
    }

    pub(crate) fn resolve(self, distance: f32) -> Option<f64> {
        match self {
            Timing::Fixed(_) => None,
            Timing::Velocity { velocity, max } => {
                Some(duration_from_velocity(distance, velocity, max))
            }
        }
    }
}

/// Canonical interpolation record.
#[derive(Clone, Copy)]
pub(crate) struct Tween<T> {
    pub(crate) start: Option<T>,
    pub(crate) end: End<T>,
    pub(crate) timing: Timing,
    pub(crate) direction: RotationDirection,
    pub(crate) clip: ClipRotation,
}

impl<T: Interpolate> TweenOptions<T> {
    /// Resolve the endpoint and timing. Fails on conflicting or missing
    /// endpoints; bad durations and velocities fall back with a warning.
    pub(crate) fn normalize(&self, kind: &'static str, default_duration: f64) -> Result<Tween<T>> {
        let end = match (self.target, self.delta) {
            (Some(_), Some(_)) => return Err(AnimationError::ConflictingEndpoints { kind }),
            (None, None) => return Err(AnimationError::MissingEndpoint { kind }),
            (Some(t), None) => End::Target(t),
            (None, Some(d)) => End::Delta(d),
        };
        Ok(Tween {
            start: self.start,
            end,
            timing: self.timing(default_duration),
            direction: self.direction,
            clip: self.clip,
        })
    }
}

impl<T> TweenOptions<T> {
    pub(crate) fn timing(&self, default_duration: f64) -> Timing {
        match self.velocity {
            Some(v) if v.is_finite() && v > 0.0 => Timing::Velocity {
                velocity: v,
                max: self.max_duration,
            },
            Some(v) => {
                log::warn!("ignoring non-positive velocity {}", v);
                Timing::Fixed(self.duration.unwrap_or(default_duration))
            }
            None => Timing::Fixed(self.duration.unwrap_or(default_duration)),
        }
    }
}

/// `distance / velocity`, capped by `max`.
pub fn duration_from_velocity(distance: f32, velocity: f32, max: Option<f64>) -> f64 {
    let d = f64::from(distance.abs()) / f64::from(velocity);
    match max {
        Some(m) if d > m => m,
        _ => d,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use super::*;

    #[test]
    fn target_and_delta_conflict() {
        let opts = TweenOptions { delta: Some(Vec2::ONE), ..TweenOptions::to(Vec2::ZERO) };
        assert!(matches!(
            opts.normalize("position", 1.0),
            Err(AnimationError::ConflictingEndpoints { kind: "position" })
        ));
    }

    #[test]
    fn endpoint_required() {
        let opts: TweenOptions<f32> = TweenOptions::default();
        assert!(matches!(
            opts.normalize("rotation", 1.0),
            Err(AnimationError::MissingEndpoint { .. })
        ));
    }

    #[test]
    fn default_duration_applies() {
        let tween = TweenOptions::to(1.0_f32).normalize("opacity", 0.75).unwrap();
        assert_eq!(tween.timing, Timing::Fixed(0.75));
        let tween = TweenOptions::to(1.0_f32).duration(2.0).normalize("opacity", 0.75).unwrap();
        assert_eq!(tween.timing, Timing::Fixed(2.0));
    }

    #[test]
    fn velocity_overrides_duration() {
        let opts = TweenOptions::by(Vec2::new(3.0, 4.0)).duration(9.0).velocity(2.0);
        let tween = opts.normalize("position", 1.0).unwrap();
        assert_eq!(tween.timing.initial(), 0.0);
        assert_eq!(tween.timing.resolve(5.0), Some(2.5));
    }

    #[test]
    fn invalid_velocity_falls_back() {
        let tween = TweenOptions::to(Vec2::ONE).velocity(0.0).normalize("scale", 1.5).unwrap();
        assert_eq!(tween.timing, Timing::Fixed(1.5));
    }

    #[test]
    fn velocity_duration_is_capped() {
        assert_eq!(duration_from_velocity(10.0, 1.0, Some(3.0)), 3.0);
        assert_eq!(duration_from_velocity(2.0, 1.0, Some(3.0)), 2.0);
    }
}
