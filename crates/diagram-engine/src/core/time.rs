/// Logical animation clock.
/// Turns wall-clock samples into the non-decreasing time animations are
/// driven with, optionally sped up, slowed down, or stepped by hand.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Current logical time in seconds.
    now: f64,
    /// Last wall-clock sample seen.
    last_sample: Option<f64>,
    /// Logical seconds per wall-clock second.
    speed: f64,
    /// When set, wall-clock samples are ignored and only `step` moves time.
    manual: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// A clock whose logical time starts at `now`.
    pub fn starting_at(now: f64) -> Self {
        Self {
            now,
            last_sample: None,
            speed: 1.0,
            manual: false,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    /// Change the speed factor. Must be finite and positive.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        } else {
            log::warn!("ignoring clock speed {} (must be finite and > 0)", speed);
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Switch between wall-clock and manual stepping.
    pub fn set_manual(&mut self, manual: bool) {
        self.manual = manual;
        // Resync so the first sample after switching back adds nothing
        self.last_sample = None;
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Feed a wall-clock sample (seconds). Returns the new logical time.
    /// Samples that go backwards advance nothing.
    pub fn sample(&mut self, wall: f64) -> f64 {
        if self.manual {
            return self.now;
        }
        if let Some(last) = self.last_sample {
            let dt = wall - last;
            if dt < 0.0 {
                log::warn!("clock sample went backwards by {:.4}s; holding time", -dt);
            } else {
                self.now += dt * self.speed;
            }
        }
        self.last_sample = Some(wall);
        self.now
    }

    /// Advance logical time by `dt` seconds (not scaled by speed).
    pub fn step(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt >= 0.0 {
            self.now += dt;
        } else {
            log::warn!("ignoring clock step of {}s", dt);
        }
        self.now
    }

    /// Current logical time.
    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
