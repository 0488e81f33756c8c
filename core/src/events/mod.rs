//! Inbound event feed
//!
//! Events arrive from the host once, in non-decreasing timestamp order, and are
//! never replayed. Components react to them through the `Component` hooks.

mod event;

pub use event::{CastEvent, StatusInfo, WorldEvent};
