// animation/leaf/tween.rs
//
// Interpolation leaves: position, rotation, scale, transform and color.
// One generic leaf; each family only differs in which target property it
// reads and writes.

use glam::Vec2;
use crate::api::types::{Color, Property};
use crate::animation::options::{End, Timing, Tween, TweenOptions};
use crate::animation::progression::Progression;
use crate::animation::step::Step;
use crate::animation::target::AnimationTarget;
use crate::animation::transform::Transform;
use crate::animation::value::{clamp_color, Interpolate};
use super::{Frame, Leaf};

/// Default duration for steps built outside a manager.
pub(crate) const DEFAULT_DURATION: f64 = 1.0;

/// Read/write access to one target property.
pub(crate) struct Channel<T> {
    pub name: &'static str,
    pub property: Property,
    pub get: fn(&dyn AnimationTarget) -> T,
    pub set: fn(&mut dyn AnimationTarget, T),
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Channel<T> {}

pub(crate) const POSITION: Channel<Vec2> = Channel {
    name: "position",
    property: Property::Position,
    get: |t| t.position(),
    set: |t, v| t.set_position(v),
};

pub(crate) const ROTATION: Channel<f32> = Channel {
    name: "rotation",
    property: Property::Rotation,
    get: |t| t.rotation(),
    set: |t, v| t.set_rotation(v),
};

pub(crate) const SCALE: Channel<Vec2> = Channel {
    name: "scale",
    property: Property::Scale,
    get: |t| t.scale(),
    set: |t, v| t.set_scale(v),
};

pub(crate) const TRANSFORM: Channel<Transform> = Channel {
    name: "transform",
    property: Property::Position,
    get: |t| t.transform(),
    set: |t, v| {
        t.set_transform(v);
        t.changed(Property::Rotation);
        t.changed(Property::Scale);
    },
};

pub(crate) const COLOR: Channel<Color> = Channel {
    name: "color",
    property: Property::Color,
    get: |t| t.color(),
    set: |t, v| t.set_color(clamp_color(v)),
};

struct TweenLeaf<T: Interpolate> {
    channel: Channel<T>,
    tween: Tween<T>,
    /// Resolved on begin.
    start: Option<T>,
    delta: Option<T>,
    end: Option<T>,
}

impl<T: Interpolate> TweenLeaf<T> {
    fn value_at(&self, percent: f32) -> Option<T> {
        let value = if percent >= 1.0 {
            self.end?
        } else {
            self.start?.offset(self.delta?, percent)
        };
        Some(value.clip(self.tween.clip))
    }

    fn write(&self, percent: f32, target: &mut dyn AnimationTarget) {
        if let Some(value) = self.value_at(percent) {
            (self.channel.set)(target, value);
            target.changed(self.channel.property);
        }
    }
}

impl<T: Interpolate> Leaf for TweenLeaf<T> {
    fn name(&self) -> &'static str {
        self.channel.name
    }

    fn begin(&mut self, target: &mut dyn AnimationTarget) -> Option<f64> {
        let start = self
            .tween
            .start
            .unwrap_or_else(|| (self.channel.get)(&*target));
        let direction = self.tween.direction;
        let (delta, end) = match self.tween.end {
            End::Delta(d) => (d, start.offset(d, 1.0)),
            End::Target(t) => {
                let d = start.delta_to(t, direction);
                (d, start.end_value(t, d, direction))
            }
            End::FromTarget(f) => {
                let t = f(&*target);
                let d = start.delta_to(t, direction);
                (d, start.end_value(t, d, direction))
            }
        };
        self.start = Some(start);
        self.delta = Some(delta);
        self.end = Some(end);
        self.tween.timing.resolve(delta.magnitude())
    }

    fn apply(&mut self, frame: Frame, target: &mut dyn AnimationTarget) {
        self.write(frame.percent as f32, target);
    }

    fn set_to_end(&mut self, target: &mut dyn AnimationTarget) {
        self.write(1.0, target);
    }
}

/// Build a tween step, or a zero-duration no-op if the options are invalid.
pub(crate) fn tween_step<T: Interpolate>(
    channel: Channel<T>,
    options: TweenOptions<T>,
    default_duration: f64,
) -> Step {
    match options.normalize(channel.name, default_duration) {
        Ok(tween) => tween_from(channel, tween, &options),
        Err(err) => {
            log::warn!("{}; step skipped", err);
            Step::delay(0.0)
        }
    }
}

fn tween_from<T: Interpolate>(channel: Channel<T>, tween: Tween<T>, options: &TweenOptions<T>) -> Step {
    let duration = tween.timing.initial();
    let mut step = Step::leaf(
        TweenLeaf { channel, tween, start: None, delta: None, end: None },
        duration,
    )
    .with_delay(options.delay)
    .with_progression(options.progression.unwrap_or(Progression::EaseInOut));
    step.complete_on_cancel = options.complete_on_cancel;
    step
}

impl Step {
    /// Interpolate the target's position.
    pub fn position(options: TweenOptions<Vec2>) -> Step {
        tween_step(POSITION, options, DEFAULT_DURATION)
    }

    /// Interpolate the target's rotation (radians). Honours the options'
    /// rotation direction and clip mode.
    pub fn rotation(options: TweenOptions<f32>) -> Step {
        tween_step(ROTATION, options, DEFAULT_DURATION)
    }

    /// Interpolate the target's scale.
    pub fn scale(options: TweenOptions<Vec2>) -> Step {
        tween_step(SCALE, options, DEFAULT_DURATION)
    }

    /// Interpolate position, rotation and scale together.
    pub fn transform(options: TweenOptions<Transform>) -> Step {
        tween_step(TRANSFORM, options, DEFAULT_DURATION)
    }

    /// Interpolate the target's color. Channels are clamped to [0, 1].
    pub fn color(options: TweenOptions<Color>) -> Step {
        tween_step(COLOR, options, DEFAULT_DURATION)
    }

    /// Fade to the target's dim color.
    pub fn dim(duration: f64) -> Step {
        dim_step(duration, |t| t.dim_color())
    }

    /// Fade back to the target's default color.
    pub fn undim(duration: f64) -> Step {
        dim_step(duration, |t| t.default_color())
    }
}

fn dim_step(duration: f64, end: fn(&dyn AnimationTarget) -> Color) -> Step {
    let tween = Tween {
        start: None,
        end: End::FromTarget(end),
        timing: Timing::Fixed(duration),
        direction: Default::default(),
        clip: Default::default(),
    };
    let options = TweenOptions::<Color>::default()
        .duration(duration)
        .complete_on_cancel(true);
    tween_from(COLOR, tween, &options)
}
