//! Per-component hint sinks
//!
//! Components write into these during hint collection. The aggregator creates
//! fresh sinks every tick.

use chrono::NaiveDateTime;

use crate::geometry::Zone;
use crate::world::{ActorId, PlayerMask};

/// One line of advice for a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHint {
    pub text: String,
    /// False for purely informational hints (the player is already doing the
    /// right thing)
    pub risk: bool,
}

/// Text hints for one player slot, in insertion order, duplicates kept
#[derive(Debug, Clone, Default)]
pub struct TextHints {
    hints: Vec<TextHint>,
}

impl TextHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: impl Into<String>) {
        self.add_with_risk(text, true);
    }

    pub fn add_with_risk(&mut self, text: impl Into<String>, risk: bool) {
        self.hints.push(TextHint {
            text: text.into(),
            risk,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextHint> {
        self.hints.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.hints.iter().any(|h| h.text == text)
    }

    pub fn into_vec(self) -> Vec<TextHint> {
        self.hints
    }
}

/// Hints that apply to the whole raid ("Raidwide", "Interrupt X!")
#[derive(Debug, Clone, Default)]
pub struct GlobalHints {
    hints: Vec<String>,
}

impl GlobalHints {
    pub fn add(&mut self, text: impl Into<String>) {
        self.hints.push(text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.hints.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.hints
    }
}

/// What kind of hit a predicted-damage record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageKind {
    /// Generic avoidable/unavoidable AOE hit
    Aoe,
    Raidwide,
    Tankbuster,
    /// Damage split between the players standing together
    Shared,
}

/// Predicted damage for downstream mitigation planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedDamage {
    pub activation: NaiveDateTime,
    pub players: PlayerMask,
    pub kind: DamageKind,
}

/// A forbidden-movement zone with the time it becomes dangerous
#[derive(Debug, Clone)]
pub struct ForbiddenZone {
    pub zone: Zone,
    pub activation: NaiveDateTime,
}

/// Hints for the automated assistant of one player slot
#[derive(Debug, Clone, Default)]
pub struct AiHints {
    forbidden: Vec<ForbiddenZone>,
    interrupt_targets: Vec<ActorId>,
}

impl AiHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_forbidden_zone(&mut self, zone: Zone, activation: NaiveDateTime) {
        self.forbidden.push(ForbiddenZone { zone, activation });
    }

    /// Ask the assistant to interrupt (or stun) an actor
    pub fn add_interrupt_target(&mut self, actor: ActorId) {
        if !self.interrupt_targets.contains(&actor) {
            self.interrupt_targets.push(actor);
        }
    }

    pub fn forbidden_zones(&self) -> &[ForbiddenZone] {
        &self.forbidden
    }

    pub fn interrupt_targets(&self) -> &[ActorId] {
        &self.interrupt_targets
    }

    pub(crate) fn into_parts(self) -> (Vec<ForbiddenZone>, Vec<ActorId>) {
        (self.forbidden, self.interrupt_targets)
    }
}
