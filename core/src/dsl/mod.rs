//! Encounter definitions
//!
//! Stateless definitions parsed from TOML files. An encounter file names the
//! mechanic components of a fight and groups them into phases:
//!
//! - **definition**: `[encounter]`, `[[component]]` and `[[phase]]` tables
//! - **build**: turning component definitions into live components
//! - **loader**: reading definition files and directories
//!
//! Runtime state (current phase, live components) lives in `Encounter`.

mod build;
mod definition;
mod error;
mod loader;

pub use build::build_registry;
pub use definition::*;
pub use error::EncounterError;
pub use loader::*;
