// animation/transform.rs
//
// Transform value type and the angle helpers rotation steps need.

use std::f32::consts::{PI, TAU};
use glam::Vec2;

/// Position, rotation and scale of a target, animated together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in diagram space.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Scale multiplier.
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

/// Which way a rotation travels from start to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    /// Plain `target - start`, no wrapping.
    #[default]
    Direct,
    /// Whichever way is shorter.
    Shortest,
    /// Counter-clockwise.
    Positive,
    /// Clockwise.
    Negative,
    /// Counter-clockwise if the target value is larger, clockwise otherwise.
    FromValue,
}

/// Range an interpolated angle is wrapped into after each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipRotation {
    #[default]
    None,
    /// [0, 2π)
    ZeroTo360,
    /// [-π, π)
    Neg180To180,
}

/// Normalise an angle into [0, 2π).
pub fn norm_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU { 0.0 } else { a }
}

/// Wrap an angle once into the range selected by `clip`.
pub fn clip_angle(angle: f32, clip: ClipRotation) -> f32 {
    let mut a = angle;
    match clip {
        ClipRotation::None => {}
        ClipRotation::ZeroTo360 => {
            if a < 0.0 {
                a += TAU;
            }
            if a >= TAU {
                a -= TAU;
            }
        }
        ClipRotation::Neg180To180 => {
            if a < -PI {
                a += TAU;
            }
            if a >= PI {
                a -= TAU;
            }
        }
    }
    a
}

/// Signed angle to travel from `start` to `target` in the given direction.
pub fn delta_angle(start: f32, target: f32, direction: RotationDirection) -> f32 {
    if direction == RotationDirection::Direct {
        return target - start;
    }
    let s = norm_angle(start);
    let t = norm_angle(target);
    if s == t {
        return 0.0;
    }
    match direction {
        RotationDirection::Direct => target - start,
        RotationDirection::Shortest => (t - s).sin().atan2((t - s).cos()),
        RotationDirection::Positive if s > t => TAU - s + t,
        RotationDirection::Negative if t > s => -s - (TAU - t),
        RotationDirection::Positive
        | RotationDirection::Negative
        | RotationDirection::FromValue => t - s,
    }
}
