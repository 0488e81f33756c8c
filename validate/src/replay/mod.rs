//! Scenario replay
//!
//! Loads a scripted fight and paces it through virtual time.

pub mod clock;
pub mod scenario;

pub use clock::VirtualClock;
pub use scenario::{Scenario, ScriptedAction, ScriptedEvent};
