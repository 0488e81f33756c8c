//! Shared plumbing for components whose state is a list of hazard instances

use chrono::NaiveDateTime;

use super::ModuleContext;
use crate::hazard::HazardInstance;
use crate::hints::{AiHints, DamageKind, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{Actor, PlayerMask};

pub(crate) const GTFO_FROM_AOE: &str = "GTFO from AOE!";

/// Drop entries whose activation passed more than the configured grace ago.
/// Returns how many were dropped.
pub(crate) fn expire_stale<T>(
    entries: &mut Vec<T>,
    now: NaiveDateTime,
    grace_secs: f32,
    activation: impl Fn(&T) -> NaiveDateTime,
) -> usize {
    let before = entries.len();
    entries.retain(|e| now <= crate::world::add_secs(activation(e), grace_secs));
    before - entries.len()
}

/// Whether the actor stands inside any hazard that is dangerous right now
pub(crate) fn in_risky_hazard(hazards: &[HazardInstance], actor: &Actor) -> bool {
    hazards
        .iter()
        .any(|h| h.risky && !h.invert_forbidden && h.check(actor.position))
}

pub(crate) fn add_gtfo_hint(hazards: &[HazardInstance], actor: &Actor, hints: &mut TextHints) {
    if in_risky_hazard(hazards, actor) {
        hints.add(GTFO_FROM_AOE);
    }
}

pub(crate) fn add_forbidden_zones(hazards: &[HazardInstance], hints: &mut AiHints) {
    for hazard in hazards.iter().filter(|h| h.risky) {
        hints.add_forbidden_zone(hazard.forbidden_zone(), hazard.activation);
    }
}

/// Party members currently standing inside the hazard
pub(crate) fn players_inside(ctx: &ModuleContext<'_>, hazard: &HazardInstance) -> PlayerMask {
    ctx.world
        .party_members()
        .filter(|(_, p)| hazard.check(p.position))
        .map(|(slot, _)| slot)
        .collect()
}

pub(crate) fn add_aoe_damage(ctx: &ModuleContext<'_>, hazards: &[HazardInstance], out: &mut Vec<PredictedDamage>) {
    for hazard in hazards.iter().filter(|h| h.risky && !h.invert_forbidden) {
        let players = players_inside(ctx, hazard);
        if players.any() {
            out.push(PredictedDamage {
                activation: hazard.activation,
                players,
                kind: DamageKind::Aoe,
            });
        }
    }
}

pub(crate) fn draw_hazards(hazards: &[HazardInstance], arena: &mut ArenaDraw) {
    for hazard in hazards {
        arena.hazard(hazard);
    }
}
