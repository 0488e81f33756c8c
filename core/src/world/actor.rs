use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ActionId, ActorId, add_secs};
use crate::geometry::{Angle, WDir, WPos};

/// An in-progress cast as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastInfo {
    pub action: ActionId,
    /// Targeted actor, if the action is actor-targeted
    #[serde(default)]
    pub target: Option<ActorId>,
    /// Ground target for location-targeted actions (caster position otherwise)
    #[serde(default)]
    pub location: WPos,
    /// Facing the cast is locked to
    #[serde(default)]
    pub rotation: Angle,
    pub started_at: NaiveDateTime,
    /// Announced cast duration in seconds
    pub total_time_secs: f32,
    #[serde(default)]
    pub interruptible: bool,
}

impl CastInfo {
    /// When the cast bar completes
    pub fn finish_at(&self) -> NaiveDateTime {
        add_secs(self.started_at, self.total_time_secs)
    }

    /// When the cast resolves into damage, allowing for mechanics whose visual
    /// precedes the real hit by `extra_delay_secs`
    pub fn activation(&self, extra_delay_secs: f32) -> NaiveDateTime {
        add_secs(self.started_at, self.total_time_secs + extra_delay_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Object (template) id shared by every instance of the same NPC
    #[serde(default)]
    pub oid: u32,
    #[serde(default)]
    pub name: String,
    pub position: WPos,
    #[serde(default)]
    pub rotation: Angle,
    #[serde(default = "default_hitbox")]
    pub hitbox_radius: f32,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub cast: Option<CastInfo>,
}

fn default_hitbox() -> f32 {
    0.5
}

impl Actor {
    pub fn new(id: u64, position: WPos) -> Self {
        Self {
            id: ActorId(id),
            oid: 0,
            name: String::new(),
            position,
            rotation: Angle::default(),
            hitbox_radius: default_hitbox(),
            is_dead: false,
            cast: None,
        }
    }

    pub fn with_oid(mut self, oid: u32) -> Self {
        self.oid = oid;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rotation(mut self, rotation: Angle) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_hitbox(mut self, radius: f32) -> Self {
        self.hitbox_radius = radius;
        self
    }

    pub fn distance_sq(&self, pos: WPos) -> f32 {
        self.position.distance_sq(pos)
    }

    /// Unit direction from this actor toward another
    pub fn direction_to(&self, other: &Actor) -> WDir {
        (other.position - self.position).normalized()
    }
}
