// animation/leaf/pulse.rs
//
// Pulse: a transient scale multiplier the target composes at draw time.
// The persisted scale is never touched, and the multiplier returns to 1
// whenever the pulse finishes.

use std::f64::consts::PI;
use crate::api::types::Property;
use crate::config::PulseDefaults;
use crate::animation::progression::Progression;
use crate::animation::step::{StartTime, Step};
use crate::animation::target::AnimationTarget;
use super::{Frame, Leaf};

/// Shape of one pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sinusoid,
    Triangle,
}

/// Parameters for a pulse. Unset fields fall back to the configured
/// pulse defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseOptions {
    /// Peak multiplier.
    pub scale: Option<f32>,
    pub duration: Option<f64>,
    /// Pulses per second. Takes precedence over `num`.
    pub frequency: Option<f64>,
    /// Number of pulses over the duration. Defaults to 1.
    pub num: Option<f64>,
    pub waveform: Waveform,
    /// Phase origin. Pulses given the same `At` time stay in sync.
    pub when: StartTime,
    pub delay: f64,
}

impl PulseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn num(mut self, num: f64) -> Self {
        self.num = Some(num);
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn when(mut self, when: StartTime) -> Self {
        self.when = when;
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

struct PulseLeaf {
    scale: f32,
    frequency: f64,
    num: f64,
    waveform: Waveform,
    origin: Option<f64>,
}

impl PulseLeaf {
    fn multiplier(&self, cycles: f64) -> f32 {
        let wave = (PI * cycles).sin().abs();
        let shape = match self.waveform {
            Waveform::Sinusoid => wave,
            Waveform::Triangle => 2.0 / PI * wave.asin(),
        };
        1.0 + (self.scale - 1.0) * shape as f32
    }

    fn reset(&self, target: &mut dyn AnimationTarget) {
        target.set_pulse_scale(1.0);
        target.changed(Property::Pulse);
    }
}

impl Leaf for PulseLeaf {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn apply(&mut self, frame: Frame, target: &mut dyn AnimationTarget) {
        let cycles = if self.frequency > 0.0 {
            let origin = *self.origin.get_or_insert(frame.now);
            self.frequency * (frame.now - origin)
        } else {
            self.num * frame.percent
        };
        target.set_pulse_scale(self.multiplier(cycles));
        target.changed(Property::Pulse);
    }

    fn set_to_end(&mut self, target: &mut dyn AnimationTarget) {
        self.reset(target);
    }

    fn cancelled_without_complete(&mut self, target: &mut dyn AnimationTarget) {
        self.reset(target);
    }
}

pub(crate) fn pulse_with(options: PulseOptions, defaults: &PulseDefaults) -> Step {
    let frequency = options
        .frequency
        .unwrap_or(defaults.frequency)
        .max(0.0);
    let leaf = PulseLeaf {
        scale: options.scale.unwrap_or(defaults.scale),
        frequency,
        num: options.num.unwrap_or(1.0),
        waveform: options.waveform,
        origin: match options.when {
            StartTime::At(t) => Some(t),
            StartTime::NextFrame => None,
        },
    };
    Step::leaf(leaf, options.duration.unwrap_or(defaults.duration))
        .with_delay(options.delay)
        .with_progression(Progression::Linear)
}

impl Step {
    /// Pulse the target's draw-time scale.
    pub fn pulse(options: PulseOptions) -> Step {
        pulse_with(options, &PulseDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::step::CancelForce;
    use crate::components::element::ElementProps;
    use super::*;

    #[test]
    fn peaks_mid_way_and_resets() {
        let mut target = ElementProps::default();
        let mut step = Step::pulse(PulseOptions::new().scale(2.0).duration(1.0));
        step.start(StartTime::At(0.0));
        step.next_frame(0.0, &mut target);
        assert!((target.pulse_scale - 1.0).abs() < 1e-5);
        step.next_frame(0.5, &mut target);
        assert!((target.pulse_scale - 2.0).abs() < 1e-5);
        // Persisted scale is untouched
        assert_eq!(target.scale, glam::Vec2::ONE);
        step.next_frame(1.0, &mut target);
        assert_eq!(target.pulse_scale, 1.0);
    }

    #[test]
    fn triangle_is_linear_between_peaks() {
        let mut target = ElementProps::default();
        let mut step = Step::pulse(
            PulseOptions::new().scale(3.0).duration(1.0).waveform(Waveform::Triangle),
        );
        step.start(StartTime::At(0.0));
        step.next_frame(0.25, &mut target);
        assert!((target.pulse_scale - 2.0).abs() < 1e-4);
    }

    #[test]
    fn frequency_uses_phase_origin() {
        let mut target = ElementProps::default();
        let mut step = Step::pulse(
            PulseOptions::new()
                .scale(2.0)
                .duration(10.0)
                .frequency(1.0)
                .when(StartTime::At(-0.5)),
        );
        step.start(StartTime::At(0.0));
        // Half a cycle past the shared origin: a peak
        step.next_frame(0.0, &mut target);
        assert!((target.pulse_scale - 2.0).abs() < 1e-4);
    }

    #[test]
    fn freeze_cancel_still_resets() {
        let mut target = ElementProps::default();
        let mut step = Step::pulse(PulseOptions::new().scale(2.0));
        step.start(StartTime::At(0.0));
        step.next_frame(0.5, &mut target);
        step.cancel(Some(CancelForce::Freeze), &mut target);
        assert_eq!(target.pulse_scale, 1.0);
    }

    #[test]
    fn defaults_come_from_config() {
        let defaults = PulseDefaults { scale: 4.0, duration: 2.0, frequency: 0.0 };
        let step = pulse_with(PulseOptions::new(), &defaults);
        assert_eq!(step.duration(), 2.0);
    }
}
