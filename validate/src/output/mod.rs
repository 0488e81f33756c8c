//! Output formatting for validation results
//!
//! Provides colored CLI output and a JSON report.

pub mod cli;
pub mod report;

pub use cli::{CliOutput, OutputLevel};
pub use report::Report;
