//! Error types for encounter definition loading and activation

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading an encounter definition or wiring its components
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid encounter '{encounter}': {reason}")]
    InvalidDefinition { encounter: String, reason: String },

    #[error("phase '{phase}' references unknown component '{component}'")]
    UnknownComponent { phase: String, component: String },

    #[error("component name '{0}' is used more than once")]
    DuplicateComponent(String),

    #[error("component '{component}' needs sibling '{sibling}', which is not active")]
    MissingSibling { component: String, sibling: String },

    #[error("component '{component}' expected sibling '{sibling}' to be a {expected}")]
    SiblingTypeMismatch {
        component: String,
        sibling: String,
        expected: &'static str,
    },
}
