//! Machine dimension settings.
//!
//! Server operators tune these in a JSON file (loaded by `cubespace-core`).
//! Every field has a default, so a partial file is valid input.
//!
//! ```
//! use cubespace_logic::config::{validate_config, MachinesConfig};
//!
//! let mut config = MachinesConfig::default();
//! assert!(validate_config(&config).is_empty());
//!
//! config.cube_spacing = 8.0; // rooms would overlap
//! assert!(!validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    machine_sizes::MAX_BOX_SIZE, CONFINEMENT_CHECK_INTERVAL, CONFINEMENT_EFFECT_AMPLIFIER,
    CONFINEMENT_EFFECT_TICKS, DEFAULT_CUBE_SPACING,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachinesConfig {
    /// Distance between neighbouring room origins along x.
    pub cube_spacing: f64,
    /// Drag occupants back into their room when they leave its bounds.
    pub keep_occupants_inside: bool,
    /// Host ticks between confinement checks.
    pub check_interval: u64,
    /// Length of the confinement debuffs.
    pub effect_duration_ticks: u32,
    pub effect_amplifier: u8,
}

impl Default for MachinesConfig {
    fn default() -> Self {
        Self {
            cube_spacing: DEFAULT_CUBE_SPACING,
            keep_occupants_inside: true,
            check_interval: CONFINEMENT_CHECK_INTERVAL,
            effect_duration_ticks: CONFINEMENT_EFFECT_TICKS,
            effect_amplifier: CONFINEMENT_EFFECT_AMPLIFIER,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Spacing does not leave room for the largest machine.
    SpacingTooSmall(f64),
    /// Spacing is NaN or infinite.
    SpacingNotFinite,
    ZeroCheckInterval,
    ZeroEffectDuration,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SpacingTooSmall(s) => write!(
                f,
                "cube_spacing {} must exceed the largest machine size {}",
                s, MAX_BOX_SIZE
            ),
            ConfigError::SpacingNotFinite => write!(f, "cube_spacing must be a finite number"),
            ConfigError::ZeroCheckInterval => write!(f, "check_interval must be at least 1"),
            ConfigError::ZeroEffectDuration => {
                write!(f, "effect_duration_ticks must be at least 1")
            }
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &MachinesConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !config.cube_spacing.is_finite() {
        errors.push(ConfigError::SpacingNotFinite);
    } else if config.cube_spacing <= MAX_BOX_SIZE as f64 {
        errors.push(ConfigError::SpacingTooSmall(config.cube_spacing));
    }
    if config.check_interval == 0 {
        errors.push(ConfigError::ZeroCheckInterval);
    }
    if config.effect_duration_ticks == 0 {
        errors.push(ConfigError::ZeroEffectDuration);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let errors = validate_config(&MachinesConfig::default());
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
    }

    #[test]
    fn spacing_must_exceed_max_size() {
        let config = MachinesConfig {
            cube_spacing: 13.0,
            ..Default::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::SpacingTooSmall(13.0)]
        );
    }

    #[test]
    fn nan_spacing_is_rejected() {
        let config = MachinesConfig {
            cube_spacing: f64::NAN,
            ..Default::default()
        };
        assert_eq!(validate_config(&config), vec![ConfigError::SpacingNotFinite]);
    }

    #[test]
    fn reports_every_error() {
        let config = MachinesConfig {
            cube_spacing: 1.0,
            check_interval: 0,
            effect_duration_ticks: 0,
            ..Default::default()
        };
        assert_eq!(validate_config(&config).len(), 3);
    }
}
