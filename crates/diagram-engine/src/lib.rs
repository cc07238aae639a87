pub mod animation;
pub mod api;
pub mod components;
pub mod config;
pub mod core;
pub mod error;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::types::{Color, ElementId, Property, DIM_GREY, WHITE};
pub use components::element::{Element, ElementProps};
pub use config::{AnimationConfig, PulseDefaults, ScenarioDefaults};
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use error::{AnimationError, Result};
pub use systems::animation::{cancel_all, is_animating, remaining_animation_time, tick_animations};

// Animation engine
pub use animation::{
    Animation, AnimationBuilder, AnimationId, AnimationManager, AnimationTarget, CancelForce,
    ClipRotation, Detached, DissolveOptions, Interpolate, ManagerState, Progression, PulseOptions,
    RotationDirection, ScenarioOptions, ScenarioSource, ScenarioState, ScenarioVelocity,
    StartTime, Step, StepState, Transform, TweenOptions, Waveform, DISSOLVE_EPSILON, NO_STOP_PREFIX,
};
