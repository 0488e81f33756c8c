use super::{Component, ModuleContext};
use crate::events::StatusInfo;
use crate::hints::{GlobalHints, TextHints};
use crate::world::{Actor, ActorId, PlayerMask, StatusId};

/// Tracks party members carrying a debuff that healers should cleanse
#[derive(Debug, Clone)]
pub struct CleansableDebuff {
    status: StatusId,
    name: String,
    affected: PlayerMask,
}

impl CleansableDebuff {
    pub fn new(status: StatusId, name: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            affected: PlayerMask::NONE,
        }
    }

    pub fn affected(&self) -> PlayerMask {
        self.affected
    }
}

impl Component for CleansableDebuff {
    fn on_status_gained(&mut self, ctx: &ModuleContext<'_>, actor: &Actor, status: &StatusInfo) {
        if status.id == self.status
            && let Some(slot) = ctx.world.party.find_slot(actor.id)
        {
            self.affected.set(slot);
        }
    }

    fn on_status_lost(&mut self, ctx: &ModuleContext<'_>, actor: &Actor, status: &StatusInfo) {
        if status.id == self.status
            && let Some(slot) = ctx.world.party.find_slot(actor.id)
        {
            self.affected.clear(slot);
        }
    }

    fn on_actor_removed(&mut self, ctx: &ModuleContext<'_>, actor: ActorId) {
        if let Some(slot) = ctx.world.party.find_slot(actor) {
            self.affected.clear(slot);
        }
    }

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        if self.affected.any() {
            hints.add(format!("Cleanse {} ({})", self.name, self.affected.count()));
        }
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, slot: usize, _actor: &Actor, hints: &mut TextHints) {
        if self.affected.contains(slot) {
            hints.add_with_risk(format!("{} on you", self.name), false);
        }
    }
}
