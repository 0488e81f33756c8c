use chrono::NaiveDateTime;

use super::aoe;
use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::{WPos, Zone};
use crate::hazard::HazardColor;
use crate::hints::{AiHints, DamageKind, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo, PlayerMask, WorldState};

/// A shared-damage marker following its target
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub target: ActorId,
    pub radius: f32,
    pub min_size: usize,
    pub max_size: usize,
    pub activation: NaiveDateTime,
}

impl Stack {
    /// Current center, if the target is still around
    pub fn center(&self, world: &WorldState) -> Option<WPos> {
        world.actor(self.target).map(|a| a.position)
    }

    pub fn is_inside(&self, world: &WorldState, pos: WPos) -> bool {
        self.center(world).is_some_and(|c| pos.in_circle(c, self.radius))
    }

    /// Living party members inside the stack
    pub fn players_inside(&self, world: &WorldState) -> PlayerMask {
        let Some(center) = self.center(world) else {
            return PlayerMask::NONE;
        };
        world
            .party_members()
            .filter(|(_, p)| p.position.in_circle(center, self.radius))
            .map(|(slot, _)| slot)
            .collect()
    }

    fn zone(&self, world: &WorldState) -> Option<Zone> {
        self.center(world).map(|c| Zone::circle(c, self.radius))
    }
}

/// Stack markers placed on the targets of a cast
#[derive(Debug, Clone)]
pub struct StackWithCastTargets {
    action: ActionId,
    radius: f32,
    min_size: usize,
    max_size: usize,
    stacks: Vec<Stack>,
}

impl StackWithCastTargets {
    pub fn new(action: ActionId, radius: f32, min_size: usize, max_size: usize) -> Self {
        Self {
            action,
            radius,
            min_size,
            max_size,
            stacks: Vec::new(),
        }
    }

    pub fn active_stacks(&self) -> &[Stack] {
        &self.stacks
    }

    fn is_target(&self, actor: ActorId) -> bool {
        self.stacks.iter().any(|s| s.target == actor)
    }

    fn earliest_activation(&self) -> Option<NaiveDateTime> {
        self.stacks.iter().map(|s| s.activation).min()
    }
}

impl Component for StackWithCastTargets {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action != self.action {
            return;
        }
        let Some(target) = cast.target else {
            tracing::debug!(caster = caster.id.0, "Stack cast without a target, ignored");
            return;
        };
        self.stacks.push(Stack {
            target,
            radius: self.radius,
            min_size: self.min_size,
            max_size: self.max_size,
            activation: cast.activation(0.0),
        });
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.stacks.retain(|s| Some(s.target) != cast.target);
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if event.action == self.action {
            self.stacks.retain(|s| Some(s.target) != event.main_target);
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        aoe::expire_stale(&mut self.stacks, ctx.now(), ctx.config.hazard_expiry_grace_secs, |s| s.activation);
    }

    fn add_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        if self.stacks.is_empty() {
            return;
        }
        let world = ctx.world;

        if let Some(own) = self.stacks.iter().find(|s| s.target == actor.id) {
            let count = own.players_inside(world).count() as usize;
            if count < own.min_size {
                hints.add("Stack!");
            } else if count > own.max_size {
                hints.add("Too many in stack!");
            }
            if self
                .stacks
                .iter()
                .any(|s| s.target != actor.id && s.is_inside(world, actor.position))
            {
                hints.add("GTFO from other stacks!");
            }
            return;
        }

        let mut containing = self.stacks.iter().filter(|s| s.is_inside(world, actor.position));
        match (containing.next(), containing.next()) {
            (None, _) => hints.add("Stack!"),
            (Some(_), Some(_)) => hints.add("Stack with only one group!"),
            (Some(stack), None) => {
                if stack.players_inside(world).count() as usize > stack.max_size {
                    hints.add("Too many in stack!");
                }
            }
        }
    }

    fn add_ai_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut AiHints) {
        let Some(activation) = self.earliest_activation() else {
            return;
        };
        let world = ctx.world;
        if self.is_target(actor.id) {
            let others: Vec<Zone> = self
                .stacks
                .iter()
                .filter(|s| s.target != actor.id)
                .filter_map(|s| s.zone(world))
                .collect();
            if !others.is_empty() {
                hints.add_forbidden_zone(Zone::Union(others), activation);
            }
        } else {
            let outside_all: Vec<Zone> = self
                .stacks
                .iter()
                .filter_map(|s| s.zone(world))
                .map(Zone::invert)
                .collect();
            if !outside_all.is_empty() {
                hints.add_forbidden_zone(Zone::Intersection(outside_all), activation);
            }
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        for stack in &self.stacks {
            out.push(PredictedDamage {
                activation: stack.activation,
                players: stack.players_inside(ctx.world),
                kind: DamageKind::Shared,
            });
        }
    }

    fn draw_arena(&self, ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        for stack in &self.stacks {
            if let Some(center) = stack.center(ctx.world) {
                arena.zone_circle(center, stack.radius, HazardColor::Safe);
            }
        }
    }
}
