// animation/value.rs
//
// Arithmetic shared by every interpolated quantity.

use glam::Vec2;
use crate::api::types::Color;
use super::transform::{clip_angle, delta_angle, ClipRotation, RotationDirection, Transform};

/// A value that can be interpolated as `start + delta * percent`.
pub trait Interpolate: Copy + std::fmt::Debug + 'static {
    /// `self - other`.
    fn difference(self, other: Self) -> Self;
    /// `self + delta * percent`.
    fn offset(self, delta: Self, percent: f32) -> Self;
    /// Size of a delta, used for velocity-derived durations.
    fn magnitude(self) -> f32;

    /// Delta from `self` to `target`. Angular values honour `direction`.
    fn delta_to(self, target: Self, _direction: RotationDirection) -> Self {
        target.difference(self)
    }

    /// Exact value reached at the end of a tween towards `target`, given the
    /// resolved `delta`. Equals `target` unless a rotation direction moved
    /// the end onto another turn.
    fn end_value(self, target: Self, _delta: Self, _direction: RotationDirection) -> Self {
        target
    }

    /// Wrap angular components into `clip`.
    fn clip(self, _clip: ClipRotation) -> Self {
        self
    }
}

fn rotation_end(start: f32, target: f32, delta: f32, direction: RotationDirection) -> f32 {
    if direction == RotationDirection::Direct {
        target
    } else {
        start + delta
    }
}

impl Interpolate for f32 {
    fn difference(self, other: Self) -> Self {
        self - other
    }
    fn offset(self, delta: Self, percent: f32) -> Self {
        self + delta * percent
    }
    fn magnitude(self) -> f32 {
        self.abs()
    }
    fn delta_to(self, target: Self, direction: RotationDirection) -> Self {
        delta_angle(self, target, direction)
    }
    fn end_value(self, target: Self, delta: Self, direction: RotationDirection) -> Self {
        rotation_end(self, target, delta, direction)
    }
    fn clip(self, clip: ClipRotation) -> Self {
        clip_angle(self, clip)
    }
}

impl Interpolate for Vec2 {
    fn difference(self, other: Self) -> Self {
        self - other
    }
    fn offset(self, delta: Self, percent: f32) -> Self {
        self + delta * percent
    }
    fn magnitude(self) -> f32 {
        self.length()
    }
}

impl Interpolate for Color {
    fn difference(self, other: Self) -> Self {
        std::array::from_fn(|i| self[i] - other[i])
    }
    fn offset(self, delta: Self, percent: f32) -> Self {
        std::array::from_fn(|i| self[i] + delta[i] * percent)
    }
    fn magnitude(self) -> f32 {
        self.iter().fold(0.0_f32, |m, c| m.max(c.abs()))
    }
}

impl Interpolate for Transform {
    fn difference(self, other: Self) -> Self {
        Transform {
            position: self.position - other.position,
            rotation: self.rotation - other.rotation,
            scale: self.scale - other.scale,
        }
    }
    fn offset(self, delta: Self, percent: f32) -> Self {
        Transform {
            position: self.position + delta.position * percent,
            rotation: self.rotation + delta.rotation * percent,
            scale: self.scale + delta.scale * percent,
        }
    }
    /// Largest component change, so the slowest component sets the pace.
    fn magnitude(self) -> f32 {
        self.position
            .length()
            .max(self.rotation.abs())
            .max(self.scale.length())
    }
    fn delta_to(self, target: Self, direction: RotationDirection) -> Self {
        Transform {
            position: target.position - self.position,
            rotation: delta_angle(self.rotation, target.rotation, direction),
            scale: target.scale - self.scale,
        }
    }
    fn end_value(self, target: Self, delta: Self, direction: RotationDirection) -> Self {
        Transform {
            rotation: rotation_end(self.rotation, target.rotation, delta.rotation, direction),
            ..target
        }
    }
    fn clip(self, clip: ClipRotation) -> Self {
        Transform { rotation: clip_angle(self.rotation, clip), ..self }
    }
}

/// Clamp every channel into [0, 1].
pub fn clamp_color(color: Color) -> Color {
    color.map(|c| c.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_offset() {
        let start = Vec2::new(1.0, 1.0);
        let delta = Vec2::new(2.0, -2.0).difference(start);
        let mid = start.offset(delta, 0.5);
        assert!((mid - Vec2::new(1.5, -0.5)).length() < 1e-6);
    }

    #[test]
    fn color_magnitude_is_largest_channel() {
        let a: Color = [0.1, -0.6, 0.2, 0.0];
        let d = a.difference([0.0; 4]);
        assert!((d.magnitude() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn clamp_color_channels() {
        assert_eq!(clamp_color([-0.5, 0.5, 1.5, 1.0]), [0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn end_value_is_exact_target() {
        let start: Color = [0.7, 0.7, 0.7, 1.0];
        let end: Color = [0.2, 0.2, 0.2, 1.0];
        let delta = start.delta_to(end, RotationDirection::Direct);
        assert_eq!(start.end_value(end, delta, RotationDirection::Direct), end);

        let delta = 0.1_f32.delta_to(-0.1, RotationDirection::Positive);
        let turned = 0.1_f32.end_value(-0.1, delta, RotationDirection::Positive);
        assert!((turned - (0.1 + delta)).abs() < 1e-6);
        assert!(turned > 0.1);
    }

    #[test]
    fn transform_magnitude() {
        let d = Transform {
            position: Vec2::new(3.0, 4.0),
            rotation: 1.0,
            scale: Vec2::ZERO,
        };
        assert!((d.magnitude() - 5.0).abs() < 1e-6);
    }
}
