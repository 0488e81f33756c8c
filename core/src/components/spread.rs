use chrono::NaiveDateTime;

use super::aoe;
use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::{WPos, Zone};
use crate::hazard::HazardColor;
use crate::hints::{AiHints, DamageKind, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo, PlayerMask, WorldState};

/// A circle that will explode around its target
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub target: ActorId,
    pub radius: f32,
    pub activation: NaiveDateTime,
}

impl Spread {
    pub fn center(&self, world: &WorldState) -> Option<WPos> {
        world.actor(self.target).map(|a| a.position)
    }
}

/// Spread markers placed on the targets of a cast
#[derive(Debug, Clone)]
pub struct SpreadFromCastTargets {
    action: ActionId,
    radius: f32,
    spreads: Vec<Spread>,
}

impl SpreadFromCastTargets {
    pub fn new(action: ActionId, radius: f32) -> Self {
        Self {
            action,
            radius,
            spreads: Vec::new(),
        }
    }

    pub fn active_spreads(&self) -> &[Spread] {
        &self.spreads
    }

    fn earliest_activation(&self) -> Option<NaiveDateTime> {
        self.spreads.iter().map(|s| s.activation).min()
    }
}

impl Component for SpreadFromCastTargets {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action != self.action {
            return;
        }
        if let Some(target) = cast.target {
            self.spreads.push(Spread {
                target,
                radius: self.radius,
                activation: cast.activation(0.0),
            });
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.spreads.retain(|s| Some(s.target) != cast.target);
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if event.action == self.action {
            self.spreads.retain(|s| Some(s.target) != event.main_target);
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        aoe::expire_stale(&mut self.spreads, ctx.now(), ctx.config.hazard_expiry_grace_secs, |s| s.activation);
    }

    fn add_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        if let Some(own) = self.spreads.iter().find(|s| s.target == actor.id) {
            let crowded = ctx
                .world
                .party_members()
                .any(|(_, p)| p.id != actor.id && p.position.in_circle(actor.position, own.radius));
            if crowded {
                hints.add("Spread!");
            }
        } else if self.spreads.iter().any(|s| {
            s.center(ctx.world)
                .is_some_and(|c| actor.position.in_circle(c, s.radius))
        }) {
            hints.add("GTFO from spread markers!");
        }
    }

    fn add_ai_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut AiHints) {
        let Some(activation) = self.earliest_activation() else {
            return;
        };
        let zones: Vec<Zone> = if let Some(own) = self.spreads.iter().find(|s| s.target == actor.id) {
            ctx.world
                .party_members()
                .filter(|(_, p)| p.id != actor.id)
                .map(|(_, p)| Zone::circle(p.position, own.radius))
                .collect()
        } else {
            self.spreads
                .iter()
                .filter_map(|s| s.center(ctx.world).map(|c| Zone::circle(c, s.radius)))
                .collect()
        };
        if !zones.is_empty() {
            hints.add_forbidden_zone(Zone::Union(zones), activation);
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        for spread in &self.spreads {
            let Some(center) = spread.center(ctx.world) else {
                continue;
            };
            let players: PlayerMask = ctx
                .world
                .party_members()
                .filter(|(_, p)| p.position.in_circle(center, spread.radius))
                .map(|(slot, _)| slot)
                .collect();
            out.push(PredictedDamage {
                activation: spread.activation,
                players,
                kind: DamageKind::Aoe,
            });
        }
    }

    fn draw_arena(&self, ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        for spread in &self.spreads {
            if let Some(center) = spread.center(ctx.world) {
                arena.zone_circle(center, spread.radius, HazardColor::Danger);
            }
        }
    }
}
