//! Shared configuration types for Telegraph
//!
//! This crate contains serializable configuration types that are shared between
//! the hazard engine (telegraph-core), the overlay rasterizer and the tooling.

use serde::{Deserialize, Serialize};

/// RGBA color, 0-255 per channel
pub type Color = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Party Roles
// ─────────────────────────────────────────────────────────────────────────────

/// Combat role of a party member, as assigned by the host client.
///
/// Encounter definitions use this to hand out mechanic roles (e.g. tanks take
/// the front of a wild charge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Tank,
    Healer,
    Melee,
    Ranged,
    #[default]
    Unassigned,
}

impl PartyRole {
    pub fn is_tank(&self) -> bool {
        matches!(self, PartyRole::Tank)
    }

    pub fn is_healer(&self) -> bool {
        matches!(self, PartyRole::Healer)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hazard Palette
// ─────────────────────────────────────────────────────────────────────────────

pub mod hazard_colors {
    use super::Color;

    pub const AOE: Color = [255, 0, 0, 80]; // Imminent damage
    pub const SAFE_FROM_AOE: Color = [0, 255, 0, 60]; // Stand here
    pub const FUTURE_AOE: Color = [255, 128, 0, 40]; // Resolves after the current set
    pub const TOWER: Color = [255, 255, 0, 70];
    pub const OUTLINE: Color = [255, 255, 255, 255];
}

/// Colors used when projecting hazards onto the arena overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardPalette {
    #[serde(default = "default_danger_color")]
    pub danger: Color,
    #[serde(default = "default_safe_color")]
    pub safe: Color,
    #[serde(default = "default_future_color")]
    pub future: Color,
    #[serde(default = "default_tower_color")]
    pub tower: Color,
}

impl Default for HazardPalette {
    fn default() -> Self {
        Self {
            danger: hazard_colors::AOE,
            safe: hazard_colors::SAFE_FROM_AOE,
            future: hazard_colors::FUTURE_AOE,
            tower: hazard_colors::TOWER,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables for the hazard engine.
///
/// Persisted through confy by telegraph-core; every field has a default so a
/// partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long past its activation a hazard may linger when its resolving
    /// event is never observed
    #[serde(default = "default_expiry_grace_secs")]
    pub hazard_expiry_grace_secs: f32,

    /// Segments used to approximate circles, donuts and cone arcs when drawing
    #[serde(default = "default_circle_segments")]
    pub circle_segments: u16,

    /// Half-extent of the square drawn behind inverted shapes
    #[serde(default = "default_arena_radius")]
    pub arena_radius: f32,

    #[serde(default)]
    pub palette: HazardPalette,

    /// Emit forbidden zones and predicted damage for the automated assistant
    #[serde(default = "default_true")]
    pub ai_hints_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hazard_expiry_grace_secs: default_expiry_grace_secs(),
            circle_segments: default_circle_segments(),
            arena_radius: default_arena_radius(),
            palette: HazardPalette::default(),
            ai_hints_enabled: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_expiry_grace_secs() -> f32 {
    2.0
}

fn default_circle_segments() -> u16 {
    64
}

fn default_arena_radius() -> f32 {
    60.0
}

fn default_danger_color() -> Color {
    hazard_colors::AOE
}

fn default_safe_color() -> Color {
    hazard_colors::SAFE_FROM_AOE
}

fn default_future_color() -> Color {
    hazard_colors::FUTURE_AOE
}

fn default_tower_color() -> Color {
    hazard_colors::TOWER
}
