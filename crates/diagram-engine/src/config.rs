use serde::{Deserialize, Serialize};
use crate::error::{AnimationError, Result};

/// Tunables shared by every builder created from a manager.
/// Loadable from JSON; every field falls back to its default when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration used by interpolation steps that give neither duration nor velocity.
    pub default_duration: f64,
    /// Opacity floor used by dissolves instead of exactly zero.
    pub dissolve_epsilon: f32,
    /// Pulse defaults.
    pub pulse: PulseDefaults,
    /// Scenario defaults.
    pub scenario: ScenarioDefaults,
}

/// Default pulse parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseDefaults {
    /// Peak scale multiplier.
    pub scale: f32,
    /// Pulse duration in seconds.
    pub duration: f64,
    /// Pulses per second. Zero means "derive from the pulse count".
    pub frequency: f64,
}

/// Default thresholds for velocity-derived scenario durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioDefaults {
    /// Duration when no velocity is given.
    pub duration: f64,
    /// Lower clamp for velocity-derived durations.
    pub min_duration: f64,
    /// Upper clamp for velocity-derived durations.
    pub max_duration: Option<f64>,
    /// Derived durations at or below this snap to zero.
    pub zero_duration_threshold: f64,
    /// Whether position, rotation and scale finish together.
    pub all_durations_same: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration: 1.0,
            dissolve_epsilon: 0.001,
            pulse: PulseDefaults::default(),
            scenario: ScenarioDefaults::default(),
        }
    }
}

impl Default for PulseDefaults {
    fn default() -> Self {
        Self {
            scale: 1.5,
            duration: 1.0,
            frequency: 0.0,
        }
    }
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            duration: 1.0,
            min_duration: 0.0,
            max_duration: None,
            zero_duration_threshold: 0.0,
            all_durations_same: true,
        }
    }
}

impl AnimationConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        non_negative("default_duration", self.default_duration)?;
        non_negative("pulse.duration", self.pulse.duration)?;
        non_negative("pulse.frequency", self.pulse.frequency)?;
        non_negative("scenario.duration", self.scenario.duration)?;
        non_negative("scenario.min_duration", self.scenario.min_duration)?;
        non_negative(
            "scenario.zero_duration_threshold",
            self.scenario.zero_duration_threshold,
        )?;
        if !(self.dissolve_epsilon > 0.0 && self.dissolve_epsilon < 1.0) {
            return Err(AnimationError::InvalidConfig {
                field: "dissolve_epsilon",
                reason: format!("{} is outside (0, 1)", self.dissolve_epsilon),
            });
        }
        if let Some(max) = self.scenario.max_duration {
            non_negative("scenario.max_duration", max)?;
            if max < self.scenario.min_duration {
                return Err(AnimationError::InvalidConfig {
                    field: "scenario.max_duration",
                    reason: format!(
                        "{} is below min_duration {}",
                        max, self.scenario.min_duration
                    ),
                });
            }
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidConfig {
            field,
            reason: format!("{} is not a finite non-negative number", value),
        })
    }
}
