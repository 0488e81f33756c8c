//! Common serde default value functions
//!
//! Used across component and phase definitions to avoid duplication.

use crate::world::MAX_ALLIES;

/// Hazards activating within this many seconds of the first one are risky
pub fn default_risky_window_secs() -> f32 {
    1.0
}

pub fn default_min_stack_size() -> usize {
    2
}

/// Whole party
pub fn default_max_stack_size() -> usize {
    MAX_ALLIES
}

/// Default soaker count per tower
pub fn default_one() -> usize {
    1
}

/// A cast hint ends on the first resolution of an end action
pub fn default_end_count() -> u32 {
    1
}

pub fn default_hit_timeout_secs() -> f32 {
    crate::components::DEFAULT_HIT_TIMEOUT_SECS
}
