use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::world::{ActionId, Actor};

/// Counts resolutions of one action. Phase triggers read the count.
#[derive(Debug, Clone)]
pub struct CastCounter {
    action: ActionId,
    num_casts: u32,
}

impl CastCounter {
    pub fn new(action: ActionId) -> Self {
        Self { action, num_casts: 0 }
    }

    pub fn num_casts(&self) -> u32 {
        self.num_casts
    }
}

impl Component for CastCounter {
    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if event.action == self.action {
            self.num_casts += 1;
        }
    }
}
