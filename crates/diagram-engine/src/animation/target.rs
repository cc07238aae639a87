// animation/target.rs
//
// The property surface steps read from and write to.

use glam::Vec2;
use crate::api::types::{Color, Property, DIM_GREY, WHITE};
use super::scenario::ScenarioState;
use super::transform::Transform;

/// Anything a step can animate.
///
/// Targets are opaque to the engine: values are only read, interpolated
/// and written back. Composite accessors (`transform`, `set_transform`)
/// have default implementations built from the primitive ones.
pub trait AnimationTarget {
    /// A target that returns `false` here makes every leaf step resolve
    /// immediately without touching it.
    fn is_available(&self) -> bool {
        true
    }

    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);

    fn rotation(&self) -> f32;
    fn set_rotation(&mut self, rotation: f32);

    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, scale: Vec2);

    fn transform(&self) -> Transform {
        Transform {
            position: self.position(),
            rotation: self.rotation(),
            scale: self.scale(),
        }
    }

    fn set_transform(&mut self, transform: Transform) {
        self.set_position(transform.position);
        self.set_rotation(transform.rotation);
        self.set_scale(transform.scale);
    }

    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);

    /// Color used by `dim` steps.
    fn dim_color(&self) -> Color {
        DIM_GREY
    }

    /// Color used by `undim` steps.
    fn default_color(&self) -> Color {
        WHITE
    }

    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);

    fn is_shown(&self) -> bool;
    fn show(&mut self);
    fn hide(&mut self);

    /// Transient draw-time scale multiplier written by pulse steps.
    fn set_pulse_scale(&mut self, _multiplier: f32) {}

    /// Named target state used by scenario steps.
    fn scenario(&self, _name: &str) -> Option<ScenarioState> {
        None
    }

    /// Called after a step writes `property`.
    fn changed(&mut self, _property: Property) {}
}

/// A target that is no longer reachable. Steps driven against it finish
/// on their next frame without applying anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl AnimationTarget for Detached {
    fn is_available(&self) -> bool {
        false
    }

    fn position(&self) -> Vec2 {
        Vec2::ZERO
    }
    fn set_position(&mut self, _position: Vec2) {}

    fn rotation(&self) -> f32 {
        0.0
    }
    fn set_rotation(&mut self, _rotation: f32) {}

    fn scale(&self) -> Vec2 {
        Vec2::ONE
    }
    fn set_scale(&mut self, _scale: Vec2) {}

    fn color(&self) -> Color {
        WHITE
    }
    fn set_color(&mut self, _color: Color) {}

    fn opacity(&self) -> f32 {
        1.0
    }
    fn set_opacity(&mut self, _opacity: f32) {}

    fn is_shown(&self) -> bool {
        false
    }
    fn show(&mut self) {}
    fn hide(&mut self) {}
}
