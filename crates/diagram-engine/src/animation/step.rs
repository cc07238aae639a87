// animation/step.rs
//
// The step state machine. A step is a leaf (one property change), a serial
// or parallel composite, or a scenario that fans out into a parallel on its
// first frame. Every step is advanced with absolute time and returns the
// time left over once it finishes (negative while still running).

use std::fmt;
use std::str::FromStr;
use crate::error::AnimationError;
use super::leaf::{Frame, Leaf};
use super::parallel::Parallel;
use super::progression::Progression;
use super::scenario::Scenario;
use super::serial::Serial;
use super::target::AnimationTarget;

/// Lifecycle of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    /// Never started.
    #[default]
    Idle,
    /// Part of a started composite, waiting for its turn.
    Waiting,
    /// Started; frames are being applied.
    Animating,
    /// Terminal. Reached exactly once.
    Finished,
}

impl StepState {
    /// `Waiting` or `Animating`.
    pub fn is_active(self) -> bool {
        matches!(self, StepState::Waiting | StepState::Animating)
    }
}

/// How a cancelled step resolves its applied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelForce {
    /// Jump to the end value.
    Complete,
    /// Keep the value applied before the cancel.
    Freeze,
}

impl FromStr for CancelForce {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(CancelForce::Complete),
            "freeze" => Ok(CancelForce::Freeze),
            other => Err(AnimationError::InvalidForce(other.to_string())),
        }
    }
}

/// When a started step takes its start time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StartTime {
    /// The time passed to the first `next_frame`.
    #[default]
    NextFrame,
    /// An explicit logical time.
    At(f64),
}

pub(crate) enum StepKind {
    Leaf(Box<dyn Leaf>),
    Serial(Serial),
    Parallel(Parallel),
    Scenario(Scenario),
}

impl StepKind {
    fn name(&self) -> &'static str {
        match self {
            StepKind::Leaf(leaf) => leaf.name(),
            StepKind::Serial(_) => "serial",
            StepKind::Parallel(_) => "parallel",
            StepKind::Scenario(_) => "scenario",
        }
    }
}

/// A schedulable animation unit.
pub struct Step {
    pub(crate) state: StepState,
    pub(crate) start_time: Option<f64>,
    pub(crate) delay: f64,
    pub(crate) duration: f64,
    pub(crate) progression: Progression,
    pub(crate) complete_on_cancel: Option<bool>,
    pub(crate) on_finish: Option<Box<dyn FnMut(bool)>>,
    before_frame: Option<Box<dyn FnMut(f64)>>,
    after_frame: Option<Box<dyn FnMut(f64)>>,
    /// Leaf start values have been captured from the target.
    begun: bool,
    pub(crate) kind: StepKind,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Step");
        s.field("kind", &self.kind.name())
            .field("state", &self.state)
            .field("start_time", &self.start_time)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("complete_on_cancel", &self.complete_on_cancel);
        if let Some(children) = self.children() {
            s.field("steps", &children);
        }
        s.finish()
    }
}

/// Linear progress through `span`, in [0, 1]. An empty span is complete.
fn frame_percent(elapsed: f64, span: f64) -> f64 {
    if span > 0.0 {
        (elapsed / span).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Round a still-running remainder so float jitter at the end of a step
/// still finishes it on that frame.
fn round_remainder(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

impl Step {
    pub(crate) fn new(kind: StepKind) -> Self {
        Self {
            state: StepState::Idle,
            start_time: None,
            delay: 0.0,
            duration: 0.0,
            progression: Progression::Linear,
            complete_on_cancel: None,
            on_finish: None,
            before_frame: None,
            after_frame: None,
            begun: false,
            kind,
        }
    }

    pub(crate) fn leaf(leaf: impl Leaf + 'static, duration: f64) -> Self {
        let mut step = Self::new(StepKind::Leaf(Box::new(leaf)));
        step.duration = sanitize_duration(duration);
        step
    }

    // -- Builder methods --

    /// Wait `delay` seconds after starting before applying anything.
    /// Only leaves and scenarios honour a delay.
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = sanitize_duration(delay);
        self
    }

    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.progression = progression;
        self
    }

    /// Call `callback(cancelled)` when the step finishes.
    pub fn when_finished(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// Call `hook(percent)` just before each frame's values are applied.
    /// `percent` is the linear progress of this step, before easing.
    pub fn before_frame(mut self, hook: impl FnMut(f64) + 'static) -> Self {
        self.before_frame = Some(Box::new(hook));
        self
    }

    /// Call `hook(percent)` right after each frame's values are applied.
    pub fn after_frame(mut self, hook: impl FnMut(f64) + 'static) -> Self {
        self.after_frame = Some(Box::new(hook));
        self
    }

    pub fn if_canceled_then_complete(mut self) -> Self {
        self.complete_on_cancel = Some(true);
        self
    }

    pub fn if_canceled_then_stop(mut self) -> Self {
        self.complete_on_cancel = Some(false);
        self
    }

    // -- Introspection --

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Own duration, excluding delay. For velocity-driven leaves this is
    /// zero until the first frame resolves it.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Wait before the first value is applied.
    pub fn start_delay(&self) -> f64 {
        self.delay
    }

    pub fn is_finished(&self) -> bool {
        self.state == StepState::Finished
    }

    /// Short name of the step family (`"position"`, `"serial"`, ...).
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Child steps of a serial or parallel composite.
    pub fn children(&self) -> Option<&[Step]> {
        match &self.kind {
            StepKind::Serial(s) => Some(&s.steps),
            StepKind::Parallel(p) => Some(&p.steps),
            _ => None,
        }
    }

    /// Leaf: delay + duration. Serial: sum. Parallel: max.
    pub fn total_duration(&self) -> f64 {
        match &self.kind {
            StepKind::Leaf(_) => self.delay + self.duration,
            StepKind::Serial(s) => s.total_duration(),
            StepKind::Parallel(p) => p.total_duration(),
            StepKind::Scenario(s) => self.delay + s.total_duration(),
        }
    }

    /// Time left until this step finishes, given the current time.
    pub fn remaining_time(&self, now: f64) -> f64 {
        if !self.state.is_active() {
            return 0.0;
        }
        let total = self.total_duration();
        match self.start_time {
            None => total,
            Some(start) => total - (now - start),
        }
    }

    /// Move the start time (and every child's) by `delta` seconds.
    pub fn shift_start_time(&mut self, delta: f64) {
        if let Some(start) = self.start_time.as_mut() {
            *start += delta;
        }
        match &mut self.kind {
            StepKind::Serial(s) => s.steps.iter_mut().for_each(|c| c.shift_start_time(delta)),
            StepKind::Parallel(p) => p.steps.iter_mut().for_each(|c| c.shift_start_time(delta)),
            StepKind::Scenario(s) => {
                if let Some(inner) = s.inner.as_mut() {
                    inner.shift_start_time(delta);
                }
            }
            StepKind::Leaf(_) => {}
        }
    }

    // -- State machine --

    pub(crate) fn start_waiting(&mut self) {
        self.state = StepState::Waiting;
        match &mut self.kind {
            StepKind::Serial(s) => s.steps.iter_mut().for_each(Step::start_waiting),
            StepKind::Parallel(p) => p.steps.iter_mut().for_each(Step::start_waiting),
            _ => {}
        }
    }

    /// Start the step. Composites start their first (serial) or every
    /// (parallel) child with the same start time and queue the rest.
    /// Starting an already animating step does nothing.
    pub fn start(&mut self, when: StartTime) {
        if self.state == StepState::Animating {
            return;
        }
        self.start_time = match when {
            StartTime::NextFrame => None,
            StartTime::At(t) => Some(t),
        };
        // A restarted leaf captures its start values again
        self.begun = false;
        match &mut self.kind {
            StepKind::Serial(s) => {
                s.steps.iter_mut().for_each(Step::start_waiting);
                s.index = 0;
                if let Some(first) = s.steps.first_mut() {
                    first.start(when);
                }
            }
            StepKind::Parallel(p) => {
                p.steps.iter_mut().for_each(|c| c.start(when));
            }
            StepKind::Scenario(s) => s.inner = None,
            StepKind::Leaf(_) => {}
        }
        self.state = StepState::Animating;
    }

    /// Advance to absolute time `now` and apply the resulting values.
    ///
    /// Returns the remainder: negative while the step still runs, otherwise
    /// how far `now` lies past the step's end. Finished steps return 0.
    pub fn next_frame(&mut self, now: f64, target: &mut dyn AnimationTarget) -> f64 {
        match self.state {
            StepState::Finished => return 0.0,
            StepState::Idle | StepState::Waiting => self.start(StartTime::NextFrame),
            StepState::Animating => {}
        }
        let start = *self.start_time.get_or_insert(now);

        let composite_percent = match self.kind {
            StepKind::Leaf(_) => None,
            _ => Some(frame_percent(now - start - self.delay, self.total_duration() - self.delay)),
        };
        if let (Some(percent), Some(hook)) = (composite_percent, self.before_frame.as_mut()) {
            hook(percent);
        }

        let (remaining, done) = match &mut self.kind {
            StepKind::Leaf(leaf) => {
                if !target.is_available() {
                    // Resolve as if the step had no duration at all
                    self.delay = 0.0;
                    self.duration = 0.0;
                    self.begun = true;
                    (now - start, true)
                } else {
                    if !self.begun {
                        self.begun = true;
                        if let Some(d) = leaf.begin(target) {
                            self.duration = sanitize_duration(d);
                        }
                    }
                    let elapsed = now - start;
                    let mut remaining = round_remainder(elapsed - (self.delay + self.duration));
                    let mut done = false;
                    if elapsed >= self.delay {
                        let mut t = elapsed - self.delay;
                        if t >= self.duration {
                            remaining = t - self.duration;
                            t = self.duration;
                        }
                        let percent = frame_percent(t, self.duration);
                        let frame = Frame {
                            percent: self.progression.apply(percent),
                            now,
                        };
                        if let Some(hook) = self.before_frame.as_mut() {
                            hook(percent);
                        }
                        leaf.apply(frame, target);
                        if let Some(hook) = self.after_frame.as_mut() {
                            hook(percent);
                        }
                        done = remaining >= 0.0;
                    }
                    (remaining, done)
                }
            }
            StepKind::Serial(s) => s.frame(now, start, target),
            StepKind::Parallel(p) => p.frame(now, start, target),
            StepKind::Scenario(s) => s.frame(now, start + self.delay, self.progression, target),
        };

        if let (Some(percent), Some(hook)) = (composite_percent, self.after_frame.as_mut()) {
            hook(percent);
        }

        if done {
            self.finish(false, None, target);
        }
        remaining
    }

    /// Cancel the step. `force` overrides the step's own cancel policy.
    pub fn cancel(&mut self, force: Option<CancelForce>, target: &mut dyn AnimationTarget) {
        self.finish(true, force, target);
    }

    /// Move the step to `finished`, resolving its value per policy and
    /// firing the finish callback. Idle and finished steps are untouched.
    pub(crate) fn finish(
        &mut self,
        cancelled: bool,
        force: Option<CancelForce>,
        target: &mut dyn AnimationTarget,
    ) {
        if matches!(self.state, StepState::Idle | StepState::Finished) {
            return;
        }
        self.state = StepState::Finished;

        let complete = !cancelled
            || match force {
                Some(CancelForce::Complete) => true,
                Some(CancelForce::Freeze) => false,
                None => self.complete_on_cancel == Some(true),
            };
        let child_force = force.or(match self.complete_on_cancel {
            Some(true) => Some(CancelForce::Complete),
            Some(false) => Some(CancelForce::Freeze),
            None => None,
        });

        match &mut self.kind {
            StepKind::Leaf(leaf) => {
                if target.is_available() {
                    if complete {
                        if !self.begun {
                            self.begun = true;
                            if let Some(d) = leaf.begin(target) {
                                self.duration = sanitize_duration(d);
                            }
                        }
                        leaf.set_to_end(target);
                    } else {
                        leaf.cancelled_without_complete(target);
                    }
                }
            }
            StepKind::Serial(s) => s.finish_children(cancelled, child_force, target),
            StepKind::Parallel(p) => p.finish_children(cancelled, child_force, target),
            StepKind::Scenario(s) => {
                s.finish_inner(cancelled, child_force, complete, self.progression, target)
            }
        }

        if let Some(callback) = self.on_finish.as_mut() {
            callback(cancelled);
        }
    }
}

/// Negative or NaN durations become zero.
pub(crate) fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_nan() || duration < 0.0 {
        log::warn!("{}", AnimationError::InvalidDuration(duration));
        0.0
    } else {
        duration
    }
}
