//! Default constants and tunable configuration for the rig components.

use serde::{Deserialize, Serialize};

/// Default gravity vector applied to spring chains (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default share of the simulated position written back to nodes.
pub const DEFAULT_INFLUENCE: f32 = 0.8;

/// Default pull toward the rest pose per step.
pub const DEFAULT_STIFFNESS: f32 = 0.1;

/// Default fraction of carried velocity removed per step.
pub const DEFAULT_DAMPING: f32 = 0.85;

/// Default multiplier on world gravity for spring chains.
pub const DEFAULT_GRAVITY_SCALE: f32 = 0.3;

/// Default animation/physics blend duration (in seconds).
pub const DEFAULT_BLEND_DURATION: f32 = 0.3;

/// Animation trigger fired when a blend back to animation completes.
pub const DEFAULT_RECOVERY_TRIGGER: &str = "GetUp";

/// Tuning of a spring chain simulator.
///
/// ```
/// use rig_dynamics::config::SpringChainConfig;
///
/// let config = SpringChainConfig::default()
///     .with_influence(1.0)
///     .with_stiffness(0.25)
///     .with_damping(0.5);
/// assert_eq!(config.gravity_scale, 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringChainConfig {
    /// 0 leaves nodes untouched, 1 writes the simulated position verbatim.
    pub influence: f32,
    /// Higher values keep the chain closer to its rest pose. Range [0, 1].
    pub stiffness: f32,
    /// Higher values stop motion faster. Range [0, 1].
    pub damping: f32,
    /// Unitless multiplier on the world gravity vector.
    pub gravity_scale: f32,
}

impl Default for SpringChainConfig {
    fn default() -> Self {
        Self {
            influence: DEFAULT_INFLUENCE,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            gravity_scale: DEFAULT_GRAVITY_SCALE,
        }
    }
}

impl SpringChainConfig {
    pub fn with_influence(mut self, influence: f32) -> Self {
        self.influence = influence;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Clamps unit-range parameters into [0, 1] and replaces non-finite values with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let sanitized = Self {
            influence: unit_or(self.influence, defaults.influence),
            stiffness: unit_or(self.stiffness, defaults.stiffness),
            damping: unit_or(self.damping, defaults.damping),
            gravity_scale: if self.gravity_scale.is_finite() {
                self.gravity_scale
            } else {
                defaults.gravity_scale
            },
        };
        if sanitized != self {
            log::debug!("spring chain config adjusted from {self:?} to {sanitized:?}");
        }
        sanitized
    }
}

/// Tuning of an animation/physics blend controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Duration used when a transition is started without an explicit one (seconds, > 0).
    pub default_duration: f32,
    /// Animation trigger fired once a blend back to animation completes.
    pub recovery_trigger: String,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_BLEND_DURATION,
            recovery_trigger: DEFAULT_RECOVERY_TRIGGER.to_owned(),
        }
    }
}

impl BlendConfig {
    pub fn with_default_duration(mut self, seconds: f32) -> Self {
        self.default_duration = seconds;
        self
    }

    pub fn with_recovery_trigger(mut self, name: impl Into<String>) -> Self {
        self.recovery_trigger = name.into();
        self
    }

    /// Replaces a non-positive or non-finite default duration with [`DEFAULT_BLEND_DURATION`].
    pub fn sanitized(mut self) -> Self {
        if !(self.default_duration.is_finite() && self.default_duration > 0.0) {
            log::debug!(
                "blend default duration {} replaced with {}",
                self.default_duration,
                DEFAULT_BLEND_DURATION
            );
            self.default_duration = DEFAULT_BLEND_DURATION;
        }
        self
    }
}

fn unit_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_config_clamps_unit_ranges() {
        let config = SpringChainConfig::default()
            .with_influence(1.5)
            .with_stiffness(-0.2)
            .with_damping(f32::NAN)
            .with_gravity_scale(2.0)
            .sanitized();
        assert_eq!(config.influence, 1.0);
        assert_eq!(config.stiffness, 0.0);
        assert_eq!(config.damping, DEFAULT_DAMPING);
        assert_eq!(config.gravity_scale, 2.0);
    }

    #[test]
    fn blend_config_rejects_non_positive_duration() {
        let config = BlendConfig::default().with_default_duration(0.0).sanitized();
        assert_eq!(config.default_duration, DEFAULT_BLEND_DURATION);
        assert_eq!(config.recovery_trigger, "GetUp");
    }
}
