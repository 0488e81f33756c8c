use super::{Component, ModuleContext};
use crate::hints::{AiHints, GlobalHints};
use crate::world::{ActionId, Actor, ActorId, CastInfo};

/// Advises interrupting (or stunning) casters of a watched action
#[derive(Debug, Clone)]
pub struct CastInterruptHint {
    action: ActionId,
    stun: bool,
    casters: Vec<ActorId>,
}

impl CastInterruptHint {
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            stun: false,
            casters: Vec::new(),
        }
    }

    /// The cast can only be stopped by a stun
    pub fn stun_only(mut self) -> Self {
        self.stun = true;
        self
    }

    pub fn casters(&self) -> &[ActorId] {
        &self.casters
    }

    fn is_casting(&self, ctx: &ModuleContext<'_>, id: ActorId) -> bool {
        ctx.world
            .actor(id)
            .and_then(|a| a.cast.as_ref())
            .is_some_and(|c| c.action == self.action)
    }
}

impl Component for CastInterruptHint {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action && !self.casters.contains(&caster.id) {
            self.casters.push(caster.id);
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.casters.retain(|id| *id != caster.id);
        }
    }

    fn on_actor_removed(&mut self, _ctx: &ModuleContext<'_>, actor: ActorId) {
        self.casters.retain(|id| *id != actor);
    }

    /// Drop casters the snapshot no longer shows casting
    fn update(&mut self, ctx: &ModuleContext<'_>) {
        let before = self.casters.len();
        let mut casters = std::mem::take(&mut self.casters);
        casters.retain(|id| self.is_casting(ctx, *id));
        self.casters = casters;
        if self.casters.len() != before {
            tracing::debug!(action = self.action.0, "Dropped stale interrupt targets");
        }
    }

    fn add_global_hints(&self, ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        let verb = if self.stun { "Stun" } else { "Interrupt" };
        for actor in self.casters.iter().filter_map(|id| ctx.world.actor(*id)) {
            hints.add(format!("{verb} {}!", actor.name));
        }
    }

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut AiHints) {
        for id in &self.casters {
            hints.add_interrupt_target(*id);
        }
    }
}
