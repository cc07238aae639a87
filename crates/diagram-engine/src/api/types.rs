/// Unique identifier for an element in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// RGBA color, each channel nominally in [0, 1].
pub type Color = [f32; 4];

/// Opaque white, the default element color.
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

/// Default color an element fades to when dimmed.
pub const DIM_GREY: Color = [0.5, 0.5, 0.5, 1.0];

/// Which piece of target state a step just wrote.
/// Passed to [`AnimationTarget::changed`](crate::animation::AnimationTarget::changed)
/// so targets can keep dirty flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    Rotation,
    Scale,
    Color,
    Opacity,
    Visibility,
    Pulse,
}
