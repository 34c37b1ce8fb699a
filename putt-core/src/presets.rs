//! Physics configuration and the YAML preset loader.
//!
//! Every tunable coefficient of the roll model lives in one [`PhysicsConfig`]
//! record. Historical tunings are kept as named presets rather than as
//! diverging copies of the integration code.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── standard.yaml
//! └── legacy.yaml
//! ```
//!
//! A preset file may omit fields; missing fields take the standard values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PuttError;
use crate::types::constants;

/// Tunable coefficients of the roll model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub name: String,
    pub version: u32,

    /// Fraction of velocity retained each step.
    pub friction_coefficient: f64,

    /// Lateral acceleration per unit of left/right slope, per unit of speed (1/s).
    pub slope_curve_factor: f64,
    /// Continuous speed change per unit of up/down slope (1/s).
    pub slope_speed_factor: f64,
    /// Launch speed reduction per unit of up/down slope.
    pub slope_launch_factor: f64,
    pub launch_multiplier_min: f64,
    pub launch_multiplier_max: f64,

    /// Compensates the geometric friction series so flat rolls match intent.
    pub base_speed_multiplier: f64,
    /// Share of the kick covered by the first step before friction.
    pub launch_step_fraction: f64,

    /// Below this speed (units/s) the ball is at rest.
    pub min_speed_epsilon: f64,
    /// Below this speed (units/s) slopes no longer act on the ball.
    pub min_curve_epsilon: f64,

    pub max_steps: usize,
    pub fixed_timestep: f64,

    /// Green boundary beyond the furthest of ball and hole, in feet.
    pub green_margin_feet: f64,

    /// Cosmetic steps appended after a capture (ball sinking into the cup).
    pub drop_tail_steps: usize,
    /// Scale friction with the input's stimp rating.
    pub green_speed_scaling: bool,
    pub reference_stimp: f64,
}

impl PhysicsConfig {
    /// Current tuning. Uses the larger slope coefficients of the later
    /// revisions.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            version: 2,
            friction_coefficient: 0.98,
            slope_curve_factor: 0.02,
            slope_speed_factor: 0.03,
            slope_launch_factor: 0.02,
            launch_multiplier_min: 0.5,
            launch_multiplier_max: 1.5,
            base_speed_multiplier: 2.0,
            launch_step_fraction: 0.01,
            min_speed_epsilon: 0.05,
            min_curve_epsilon: 0.1,
            max_steps: 3600,
            fixed_timestep: constants::FIXED_TIMESTEP,
            green_margin_feet: 15.0,
            drop_tail_steps: 0,
            green_speed_scaling: false,
            reference_stimp: constants::REFERENCE_STIMP,
        }
    }

    /// Earlier tuning with weaker slope effects.
    pub fn legacy() -> Self {
        Self {
            name: "legacy".to_string(),
            version: 1,
            slope_curve_factor: 0.008,
            slope_speed_factor: 0.015,
            ..Self::standard()
        }
    }

    /// Reject coefficients that would make the model meaningless.
    pub fn validate(&self) -> Result<(), PuttError> {
        fn positive(name: &str, value: f64) -> Result<(), PuttError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(PuttError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        if !(self.friction_coefficient > 0.0 && self.friction_coefficient <= 1.0) {
            return Err(PuttError::InvalidConfig(format!(
                "friction_coefficient must be in (0, 1], got {}",
                self.friction_coefficient
            )));
        }
        positive("fixed_timestep", self.fixed_timestep)?;
        positive("base_speed_multiplier", self.base_speed_multiplier)?;
        positive("launch_step_fraction", self.launch_step_fraction)?;
        positive("min_speed_epsilon", self.min_speed_epsilon)?;
        positive("launch_multiplier_max", self.launch_multiplier_max)?;
        positive("reference_stimp", self.reference_stimp)?;
        if !(self.launch_multiplier_min >= 0.0
            && self.launch_multiplier_min <= self.launch_multiplier_max)
        {
            return Err(PuttError::InvalidConfig(format!(
                "launch multiplier bounds [{}, {}] are inverted",
                self.launch_multiplier_min, self.launch_multiplier_max
            )));
        }
        for (name, value) in [
            ("slope_curve_factor", self.slope_curve_factor),
            ("slope_speed_factor", self.slope_speed_factor),
            ("slope_launch_factor", self.slope_launch_factor),
            ("min_curve_epsilon", self.min_curve_epsilon),
            ("green_margin_feet", self.green_margin_feet),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PuttError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(PuttError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Friction for a green of the given stimp rating.
    ///
    /// Without `green_speed_scaling` this is `friction_coefficient`. With it,
    /// the per-step loss `1 - friction` shrinks on faster greens.
    pub fn effective_friction(&self, green_speed: f64) -> f64 {
        if !self.green_speed_scaling {
            return self.friction_coefficient;
        }
        let loss = (1.0 - self.friction_coefficient) * self.reference_stimp / green_speed;
        (1.0 - loss).clamp(0.0, 1.0)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate a preset by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("presets");
    /// let legacy = loader.load_preset("legacy")?;
    /// ```
    pub fn load_preset(&self, name: &str) -> Result<PhysicsConfig, PuttError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(PuttError::PresetNotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let config: PhysicsConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(preset = %config.name, version = config.version, "loaded physics preset");
        Ok(config)
    }

    /// Names of all presets in the directory, sorted.
    pub fn list_presets(&self) -> Result<Vec<String>, PuttError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn get_presets_path() -> PathBuf {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(manifest_dir).join("..").join("presets")
    }

    #[test]
    fn test_standard_compensates_friction() {
        let config = PhysicsConfig::standard();
        let per_step = config.base_speed_multiplier * config.launch_step_fraction;
        assert!((per_step - (1.0 - config.friction_coefficient)).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_has_weaker_slopes() {
        let legacy = PhysicsConfig::legacy();
        let standard = PhysicsConfig::standard();
        assert!(legacy.slope_curve_factor < standard.slope_curve_factor);
        assert!(legacy.slope_speed_factor < standard.slope_speed_factor);
        assert_eq!(legacy.friction_coefficient, standard.friction_coefficient);
    }

    #[test]
    fn test_validate_rejects_bad_friction() {
        let config = PhysicsConfig {
            friction_coefficient: 1.2,
            ..PhysicsConfig::standard()
        };
        assert!(matches!(config.validate(), Err(PuttError::InvalidConfig(_))));

        let config = PhysicsConfig {
            max_steps: 0,
            ..PhysicsConfig::standard()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_friction() {
        let mut config = PhysicsConfig::standard();
        assert_eq!(config.effective_friction(13.0), 0.98);

        config.green_speed_scaling = true;
        assert!((config.effective_friction(10.0) - 0.98).abs() < 1e-12);
        // Faster green loses less speed per step.
        assert!(config.effective_friction(13.0) > 0.98);
        assert!(config.effective_friction(7.0) < 0.98);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PhysicsConfig =
            serde_yaml::from_str("name: custom\nfriction_coefficient: 0.97\n").unwrap();
        assert_eq!(config.name, "custom");
        assert_eq!(config.friction_coefficient, 0.97);
        assert_eq!(config.max_steps, PhysicsConfig::standard().max_steps);
    }

    #[test]
    fn test_load_standard_preset() {
        let loader = PresetLoader::new(get_presets_path());
        let result = loader.load_preset("standard");

        assert!(result.is_ok(), "Should load standard: {:?}", result.err());
        assert_eq!(result.unwrap(), PhysicsConfig::standard());
    }

    #[test]
    fn test_load_legacy_preset() {
        let loader = PresetLoader::new(get_presets_path());
        let legacy = loader.load_preset("legacy").unwrap();
        assert_eq!(legacy, PhysicsConfig::legacy());
    }

    #[test]
    fn test_load_nonexistent_preset() {
        let loader = PresetLoader::new(get_presets_path());
        match loader.load_preset("nonexistent_preset_xyz") {
            Err(PuttError::PresetNotFound(name)) => assert_eq!(name, "nonexistent_preset_xyz"),
            other => panic!("Expected PresetNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_list_presets() {
        let loader = PresetLoader::new(get_presets_path());
        let presets = loader.list_presets().unwrap();
        assert!(presets.contains(&"standard".to_string()));
        assert!(presets.contains(&"legacy".to_string()));
    }

    #[test]
    fn test_list_missing_directory() {
        let loader = PresetLoader::new(get_presets_path().join("does_not_exist"));
        assert!(loader.list_presets().unwrap().is_empty());
    }
}
