//! Checkpoint verification
//!
//! Defines expected hint output and verifies it against the engine.

pub mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointResult, CheckpointVerifier, VerificationResult};
