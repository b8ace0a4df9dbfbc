/*!
Per-pet tuning rules.

`Rules` is the effective, validated record a controller runs with. Callers
supply `RulesOverrides`, where every field is optional; `Rules::merge` fills each
missing field from the defaults independently, so a partial override never
drops the remaining defaults.

Each merge produces a fresh value. There is no shared default record that
could leak one pet's overrides into another.
*/

use serde::Deserialize;

use crate::error::ConfigurationError;

/// Effective rules for one pet instance. Immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    /// Beyond this distance from its destination the pet starts losing control budget;
    /// beyond twice this distance it is respawned.
    pub max_distance: f32,
    /// Distance scale of the speed law.
    pub keep_within_distance: f32,
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Maximum yaw rate.
    pub max_turn_rate: f32,
    /// Fly regardless of ground below the pet or the target.
    pub always_flying: bool,
    /// Minimum speed reported as moving.
    pub velocity_threshold: f32,
    /// Minimum speed reported as moving fast.
    pub velocity_fast: f32,
    /// Vertical velocity below which the pet is reported as falling.
    pub falling_threshold: f32,
    /// Vertical velocity above which the pet is reported as jumping.
    pub flight_velocity: f32,
    /// A pet with no ground this close below it flies.
    pub flight_distance: f32,
    /// Seconds between control cycles.
    pub tick_interval: f32,
    /// Verbose per-cycle logging and the velocity debug overlay.
    pub debug_enabled: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_distance: 20.0,
            keep_within_distance: 20.0,
            gravity: -9.0,
            max_turn_rate: 5.0,
            always_flying: true,
            velocity_threshold: 0.5,
            velocity_fast: 4.0,
            falling_threshold: -0.25,
            flight_velocity: 1.0,
            flight_distance: 5.0,
            tick_interval: 0.2,
            debug_enabled: false,
        }
    }
}

/// Caller-supplied overrides. Absent fields fall back to the defaults one by one.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesOverrides {
    pub max_distance: Option<f32>,
    pub keep_within_distance: Option<f32>,
    pub gravity: Option<f32>,
    #[serde(alias = "max_turnrate")]
    pub max_turn_rate: Option<f32>,
    pub always_flying: Option<bool>,
    pub velocity_threshold: Option<f32>,
    pub velocity_fast: Option<f32>,
    pub falling_threshold: Option<f32>,
    pub flight_velocity: Option<f32>,
    pub flight_distance: Option<f32>,
    #[serde(alias = "throttle")]
    pub tick_interval: Option<f32>,
    #[serde(alias = "debug")]
    pub debug_enabled: Option<bool>,
}

impl Rules {
    /// Merge `overrides` over the defaults and validate the result.
    pub fn merge(overrides: &RulesOverrides) -> Result<Self, ConfigurationError> {
        let d = Self::default();
        let rules = Self {
            max_distance: overrides.max_distance.unwrap_or(d.max_distance),
            keep_within_distance: overrides
                .keep_within_distance
                .unwrap_or(d.keep_within_distance),
            gravity: overrides.gravity.unwrap_or(d.gravity),
            max_turn_rate: overrides.max_turn_rate.unwrap_or(d.max_turn_rate),
            always_flying: overrides.always_flying.unwrap_or(d.always_flying),
            velocity_threshold: overrides.velocity_threshold.unwrap_or(d.velocity_threshold),
            velocity_fast: overrides.velocity_fast.unwrap_or(d.velocity_fast),
            falling_threshold: overrides.falling_threshold.unwrap_or(d.falling_threshold),
            flight_velocity: overrides.flight_velocity.unwrap_or(d.flight_velocity),
            flight_distance: overrides.flight_distance.unwrap_or(d.flight_distance),
            tick_interval: overrides.tick_interval.unwrap_or(d.tick_interval),
            debug_enabled: overrides.debug_enabled.unwrap_or(d.debug_enabled),
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Check that every numeric field is finite and the divisors are positive.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let numeric = [
            ("max_distance", self.max_distance),
            ("keep_within_distance", self.keep_within_distance),
            ("gravity", self.gravity),
            ("max_turn_rate", self.max_turn_rate),
            ("velocity_threshold", self.velocity_threshold),
            ("velocity_fast", self.velocity_fast),
            ("falling_threshold", self.falling_threshold),
            ("flight_velocity", self.flight_velocity),
            ("flight_distance", self.flight_distance),
            ("tick_interval", self.tick_interval),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(ConfigurationError::InvalidRule { field, value });
            }
        }

        for (field, value) in [
            ("tick_interval", self.tick_interval),
            ("keep_within_distance", self.keep_within_distance),
        ] {
            if value <= 0.0 {
                return Err(ConfigurationError::InvalidRule { field, value });
            }
        }

        if self.max_turn_rate < 0.0 {
            return Err(ConfigurationError::InvalidRule {
                field: "max_turn_rate",
                value: self.max_turn_rate,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_yield_defaults() {
        let rules = Rules::merge(&RulesOverrides::default()).unwrap();
        assert_eq!(rules, Rules::default());
    }

    #[test]
    fn overrides_win_per_field_and_keep_remaining_defaults() {
        let overrides = RulesOverrides {
            max_distance: Some(10.0),
            gravity: Some(0.0),
            always_flying: Some(true),
            ..Default::default()
        };
        let rules = Rules::merge(&overrides).unwrap();

        assert_eq!(rules.max_distance, 10.0);
        assert_eq!(rules.gravity, 0.0);
        assert_eq!(rules.keep_within_distance, 20.0);
        assert_eq!(rules.tick_interval, 0.2);
        assert!(!rules.debug_enabled);
    }

    #[test]
    fn merging_does_not_leak_between_instances() {
        let a = Rules::merge(&RulesOverrides {
            max_distance: Some(3.0),
            ..Default::default()
        })
        .unwrap();
        let b = Rules::merge(&RulesOverrides::default()).unwrap();

        assert_eq!(a.max_distance, 3.0);
        assert_eq!(b.max_distance, Rules::default().max_distance);
    }

    #[test]
    fn rejects_non_positive_tick_interval() {
        let err = Rules::merge(&RulesOverrides {
            tick_interval: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidRule {
                field: "tick_interval",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = Rules::merge(&RulesOverrides {
            gravity: Some(f32::NAN),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidRule {
                field: "gravity",
                ..
            }
        ));
    }

    #[test]
    fn overrides_parse_from_json_with_legacy_keys() {
        let json = r#"{ "max_distance": 10, "max_turnrate": 3, "throttle": 0.1, "debug": true }"#;
        let overrides: RulesOverrides = serde_json::from_str(json).unwrap();
        let rules = Rules::merge(&overrides).unwrap();

        assert_eq!(rules.max_distance, 10.0);
        assert_eq!(rules.max_turn_rate, 3.0);
        assert_eq!(rules.tick_interval, 0.1);
        assert!(rules.debug_enabled);
        assert_eq!(rules.flight_distance, 5.0);
    }
}
