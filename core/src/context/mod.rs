mod config;
mod error;

pub use config::{
    EngineConfig, EngineConfigExt, HazardPalette, default_encounter_directory, hazard_colors,
};
pub use error::ConfigError;
