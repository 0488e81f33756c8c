use super::aoe;
use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::{Angle, Shape};
use crate::hazard::HazardInstance;
use crate::hints::{AiHints, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, CastInfo};

/// AOE that appears wherever an actor of a given kind spawns, going off after
/// a fixed delay
#[derive(Debug, Clone)]
pub struct ActorSpawnAoes {
    oid: u32,
    shape: Shape,
    delay_secs: f32,
    clear_action: Option<ActionId>,
    hazards: Vec<HazardInstance>,
}

impl ActorSpawnAoes {
    pub fn new(oid: u32, shape: Shape, delay_secs: f32) -> Self {
        Self {
            oid,
            shape,
            delay_secs,
            clear_action: None,
            hazards: Vec::new(),
        }
    }

    /// Clear every hazard when this action finishes casting or resolves
    pub fn cleared_by(mut self, action: ActionId) -> Self {
        self.clear_action = Some(action);
        self
    }

    fn is_clear_action(&self, action: ActionId) -> bool {
        self.clear_action == Some(action)
    }
}

impl Component for ActorSpawnAoes {
    fn on_actor_created(&mut self, ctx: &ModuleContext<'_>, actor: &Actor) {
        if actor.oid == self.oid {
            self.hazards.push(HazardInstance::new(
                self.shape.clone(),
                actor.position,
                Angle::default(),
                ctx.world.future_time(self.delay_secs),
            ));
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if self.is_clear_action(cast.action) {
            self.hazards.clear();
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if self.is_clear_action(event.action) {
            self.hazards.clear();
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        aoe::expire_stale(&mut self.hazards, ctx.now(), ctx.config.hazard_expiry_grace_secs, |h| h.activation);
    }

    fn active_hazards(&self, _ctx: &ModuleContext<'_>) -> Vec<HazardInstance> {
        self.hazards.clone()
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        aoe::add_gtfo_hint(&self.hazards, actor, hints);
    }

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut AiHints) {
        aoe::add_forbidden_zones(&self.hazards, hints);
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        aoe::add_aoe_damage(ctx, &self.hazards, out);
    }

    fn draw_arena(&self, _ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        aoe::draw_hazards(&self.hazards, arena);
    }
}
