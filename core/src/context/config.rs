//! Engine configuration
//!
//! This module re-exports the shared config types from telegraph-types and
//! provides persistence and validation for `EngineConfig`.

use std::path::{Path, PathBuf};

pub use telegraph_types::{EngineConfig, HazardPalette, hazard_colors};

use super::ConfigError;
use crate::world::MAX_DELAY_SECS;

const APP_NAME: &str = "telegraph";
const CONFIG_NAME: &str = "engine";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Where encounter definitions live unless the user points elsewhere
pub fn default_encounter_directory() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME).join("encounters"))
        .unwrap_or_else(|| PathBuf::from("encounters"))
}

// ─────────────────────────────────────────────────────────────────────────────
// EngineConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for EngineConfig persistence
pub trait EngineConfigExt: Sized {
    /// Load from the platform config dir, falling back to defaults
    fn load() -> Self;
    fn load_path(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_path(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl EngineConfigExt for EngineConfig {
    fn load() -> Self {
        let config = confy::load::<EngineConfig>(APP_NAME, CONFIG_NAME)
            .map_err(ConfigError::from)
            .and_then(|c| c.validate().map(|_| c));
        match config {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default engine configuration");
                EngineConfig::default()
            }
        }
    }

    fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = confy::load_path(path)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_path(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let grace = self.hazard_expiry_grace_secs;
        if !(0.0..=MAX_DELAY_SECS).contains(&grace) {
            return Err(ConfigError::Invalid {
                field: "hazard_expiry_grace_secs",
                reason: format!("{} is outside 0..={}", grace, MAX_DELAY_SECS),
            });
        }
        if self.circle_segments < 3 {
            return Err(ConfigError::Invalid {
                field: "circle_segments",
                reason: format!("{} is fewer than 3", self.circle_segments),
            });
        }
        if !self.arena_radius.is_finite() || self.arena_radius <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "arena_radius",
                reason: format!("{} is not positive", self.arena_radius),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("telegraph-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = scratch_file("partial.toml");
        std::fs::write(&path, "circle_segments = 12\n").unwrap();

        let config = EngineConfig::load_path(&path).unwrap();
        assert_eq!(config.circle_segments, 12);
        assert_eq!(config.palette, HazardPalette::default());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn saved_config_loads_back() {
        let path = scratch_file("saved.toml");
        let config = EngineConfig {
            hazard_expiry_grace_secs: 0.5,
            ai_hints_enabled: false,
            ..EngineConfig::default()
        };
        config.save_path(&path).unwrap();
        assert_eq!(EngineConfig::load_path(&path).unwrap(), config);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = EngineConfig {
            circle_segments: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "circle_segments", .. })
        ));

        let config = EngineConfig {
            hazard_expiry_grace_secs: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn unbounded_grace_is_rejected() {
        for grace in [f32::INFINITY, 1e13, MAX_DELAY_SECS + 1.0] {
            let config = EngineConfig {
                hazard_expiry_grace_secs: grace,
                ..EngineConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid { field: "hazard_expiry_grace_secs", .. })
                ),
                "grace {grace} should be rejected"
            );
        }

        let path = scratch_file("huge_grace.toml");
        std::fs::write(&path, "hazard_expiry_grace_secs = 1e13\n").unwrap();
        assert!(EngineConfig::load_path(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn encounter_directory_is_app_scoped() {
        let dir = default_encounter_directory();
        assert!(dir.ends_with("encounters"));
    }
}
