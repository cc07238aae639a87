// animation/mod.rs
//
// Animation scheduling engine.
//
// Steps are small state machines advanced with absolute time. Leaves write
// one target property; serial and parallel composites schedule children;
// an Animation wraps a root serial step, and an AnimationManager owns every
// Animation running against one target.
//
// Usage:
//   let mut manager = AnimationManager::new();
//   manager.new_animation()
//       .position(TweenOptions::to(Vec2::new(1.0, 1.0)).duration(1.0))
//       .then(Step::in_parallel(vec![Step::dissolve_out(0.5), Step::dim(0.5)]))
//       .start();
//   manager.next_frame(now, &mut target);

pub mod builder;
pub mod leaf;
pub mod manager;
pub mod options;
pub mod parallel;
pub mod progression;
pub mod scenario;
pub mod serial;
pub mod step;
pub mod target;
pub mod transform;
pub mod value;

pub use builder::AnimationBuilder;
pub use leaf::opacity::{DissolveOptions, DISSOLVE_EPSILON};
pub use leaf::pulse::{PulseOptions, Waveform};
pub use manager::{Animation, AnimationId, AnimationManager, ManagerState, NO_STOP_PREFIX};
pub use options::{duration_from_velocity, TweenOptions};
pub use progression::Progression;
pub use scenario::{ScenarioOptions, ScenarioSource, ScenarioState, ScenarioVelocity};
pub use step::{CancelForce, StartTime, Step, StepState};
pub use target::{AnimationTarget, Detached};
pub use transform::{ClipRotation, RotationDirection, Transform};
pub use value::Interpolate;
