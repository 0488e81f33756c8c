use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::{Angle, Shape};
use crate::hazard::HazardInstance;
use crate::hints::{AiHints, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, CastInfo};

/// A shape players must stand inside (behind a shield, inside a bubble),
/// anchored to whoever used the trigger action.
///
/// Unlike cast-driven hazards this has no time fallback: it stays up until
/// the clear action finishes or resolves.
#[derive(Debug, Clone)]
pub struct SafeZone {
    trigger_action: ActionId,
    clear_action: ActionId,
    shape: Shape,
    rotation_offset: Angle,
    hint: String,
    zone: Option<HazardInstance>,
}

impl SafeZone {
    pub fn new(trigger_action: ActionId, clear_action: ActionId, shape: Shape) -> Self {
        Self {
            trigger_action,
            clear_action,
            shape,
            rotation_offset: Angle::default(),
            hint: "Go behind shield!".to_string(),
            zone: None,
        }
    }

    /// Facing of the zone relative to the anchoring actor
    pub fn with_rotation_offset(mut self, offset: Angle) -> Self {
        self.rotation_offset = offset;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

impl Component for SafeZone {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        // The clear cast tells us when standing outside starts to hurt
        if cast.action == self.clear_action
            && let Some(zone) = &mut self.zone
        {
            zone.activation = cast.activation(0.0);
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action == self.clear_action {
            self.zone = None;
        }
    }

    fn on_cast_resolved(&mut self, ctx: &ModuleContext<'_>, caster: &Actor, event: &CastEvent) {
        if event.action == self.trigger_action {
            self.zone = Some(
                HazardInstance::new(
                    self.shape.clone(),
                    caster.position,
                    caster.rotation + self.rotation_offset,
                    ctx.now(),
                )
                .safe_inside(),
            );
        } else if event.action == self.clear_action {
            self.zone = None;
        }
    }

    fn active_hazards(&self, _ctx: &ModuleContext<'_>) -> Vec<HazardInstance> {
        self.zone.iter().cloned().collect()
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        if let Some(zone) = &self.zone {
            hints.add_with_risk(self.hint.clone(), !zone.check(actor.position));
        }
    }

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut AiHints) {
        if let Some(zone) = &self.zone {
            hints.add_forbidden_zone(zone.forbidden_zone(), zone.activation);
        }
    }

    fn draw_arena(&self, _ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        if let Some(zone) = &self.zone {
            arena.hazard(zone);
        }
    }
}
