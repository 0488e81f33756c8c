//! Hazard instances
//!
//! A `HazardInstance` is the atomic "this area will hurt you at time T" unit.
//! Components own their instances; the aggregator and render projection only
//! read them.

use chrono::NaiveDateTime;
use telegraph_types::{Color, HazardPalette};

use crate::geometry::{Angle, Shape, WPos, Zone};

/// Display color of a hazard, resolved against the palette at draw time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HazardColor {
    /// Imminent damage
    #[default]
    Danger,
    /// Area players should stand in
    Safe,
    /// Damage that resolves after the current set
    Future,
    /// Soak point
    Tower,
    Custom(Color),
}

impl HazardColor {
    pub fn resolve(self, palette: &HazardPalette) -> Color {
        match self {
            HazardColor::Danger => palette.danger,
            HazardColor::Safe => palette.safe,
            HazardColor::Future => palette.future,
            HazardColor::Tower => palette.tower,
            HazardColor::Custom(color) => color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardInstance {
    pub shape: Shape,
    pub origin: WPos,
    pub rotation: Angle,
    pub activation: NaiveDateTime,
    pub color: HazardColor,
    /// Whether standing inside is a mistake right now (false for hazards shown
    /// ahead of time behind the ones resolving first)
    pub risky: bool,
    /// The shape marks a safe spot: the forbidden zone is everything outside
    pub invert_forbidden: bool,
}

impl HazardInstance {
    pub fn new(shape: Shape, origin: WPos, rotation: Angle, activation: NaiveDateTime) -> Self {
        Self {
            shape,
            origin,
            rotation,
            activation,
            color: HazardColor::Danger,
            risky: true,
            invert_forbidden: false,
        }
    }

    pub fn with_color(mut self, color: HazardColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_risky(mut self, risky: bool) -> Self {
        self.risky = risky;
        self
    }

    pub fn safe_inside(mut self) -> Self {
        self.invert_forbidden = true;
        self.color = HazardColor::Safe;
        self
    }

    pub fn check(&self, point: WPos) -> bool {
        self.shape.contains_at(self.origin, self.rotation, point)
    }

    /// Forbidden-movement zone equivalent of this hazard
    pub fn forbidden_zone(&self) -> Zone {
        let zone = Zone::shape(self.shape.clone(), self.origin, self.rotation);
        if self.invert_forbidden {
            zone.invert()
        } else {
            zone
        }
    }

    /// Whether the hazard should have resolved by now, allowing `grace_secs`
    /// for a late resolution event
    pub fn is_stale(&self, now: NaiveDateTime, grace_secs: f32) -> bool {
        now > crate::world::add_secs(self.activation, grace_secs)
    }
}
