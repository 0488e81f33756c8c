use chrono::NaiveDateTime;

use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::Zone;
use crate::hazard::HazardColor;
use crate::hints::{AiHints, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo};

const CORRIDOR_HALF_WIDTH: f32 = 0.5;
const EDGE_MARGIN: f32 = 0.1;

/// A charge at a protected NPC that a player has to body-block
#[derive(Debug, Clone)]
pub struct InterceptTether {
    action: ActionId,
    resolve_action: ActionId,
    protected_oid: u32,
    extra_delay_secs: f32,
    source: Option<ActorId>,
    activation: Option<NaiveDateTime>,
}

impl InterceptTether {
    /// `action` starts the charge; its resolution ends it unless
    /// `with_resolve_action` names a separate hit
    pub fn new(action: ActionId, protected_oid: u32) -> Self {
        Self {
            action,
            resolve_action: action,
            protected_oid,
            extra_delay_secs: 0.0,
            source: None,
            activation: None,
        }
    }

    pub fn with_resolve_action(mut self, action: ActionId) -> Self {
        self.resolve_action = action;
        self
    }

    pub fn with_extra_delay(mut self, secs: f32) -> Self {
        self.extra_delay_secs = secs;
        self
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Segment from the protected actor's edge to the charge source
    fn corridor(&self, ctx: &ModuleContext<'_>) -> Option<Zone> {
        let source = ctx.world.actor(self.source?)?;
        let protected = ctx.world.actors_by_oid(self.protected_oid).next()?;
        let from = protected.position + protected.direction_to(source) * (protected.hitbox_radius + EDGE_MARGIN);
        Some(Zone::rect_between(from, source.position, CORRIDOR_HALF_WIDTH))
    }

    fn clear(&mut self) {
        self.source = None;
        self.activation = None;
    }
}

impl Component for InterceptTether {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.source = Some(caster.id);
            self.activation = Some(cast.activation(self.extra_delay_secs));
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if event.action == self.resolve_action {
            self.clear();
        }
    }

    fn on_actor_removed(&mut self, _ctx: &ModuleContext<'_>, actor: ActorId) {
        if self.source == Some(actor) {
            self.clear();
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        if let Some(activation) = self.activation
            && ctx.now() > crate::world::add_secs(activation, ctx.config.hazard_expiry_grace_secs)
        {
            tracing::debug!(action = self.action.0, "Expired unresolved intercept");
            self.clear();
        }
    }

    fn add_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut TextHints) {
        let Some(corridor) = self.corridor(ctx) else {
            return;
        };
        if !ctx.world.party_members().any(|(_, p)| corridor.contains(p.position)) {
            hints.add("Intercept the charge!");
        }
    }

    fn add_ai_hints(&self, ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut AiHints) {
        if let (Some(corridor), Some(activation)) = (self.corridor(ctx), self.activation) {
            hints.add_forbidden_zone(corridor.invert(), activation);
        }
    }

    fn draw_arena(&self, ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        if let Some(Zone::Anchored {
            shape,
            origin,
            direction,
        }) = self.corridor(ctx)
        {
            arena.zone(&shape, origin, direction.to_angle(), HazardColor::Safe);
        }
    }
}
