use serde::{Deserialize, Serialize};

use super::aoe;
use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::Shape;
use crate::hazard::{HazardColor, HazardInstance};
use crate::hints::{AiHints, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo};

/// Where a cast-driven AOE is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AoeOrigin {
    /// Caster position at cast start
    #[default]
    Caster,
    /// The cast's ground target
    CastLocation,
}

/// One hazard per in-progress cast of the watched action.
///
/// Hazards activating within `risky_window_secs` of the earliest one are
/// shown as imminent; later ones are shown as future and do not produce hints.
/// With `repeat_after_secs` set, a finished cast leaves a predicted repeat at
/// the same spot until the caster casts again or the prediction goes stale.
#[derive(Debug, Clone)]
pub struct SimpleAoes {
    action: ActionId,
    shape: Shape,
    origin: AoeOrigin,
    max_casts: Option<usize>,
    risky_window_secs: f32,
    extra_delay_secs: f32,
    safe_inside: bool,
    repeat_after_secs: Option<f32>,
    casts: Vec<(ActorId, HazardInstance)>,
}

impl SimpleAoes {
    pub fn new(action: ActionId, shape: Shape) -> Self {
        Self {
            action,
            shape,
            origin: AoeOrigin::Caster,
            max_casts: None,
            risky_window_secs: 1.0,
            extra_delay_secs: 0.0,
            safe_inside: false,
            repeat_after_secs: None,
            casts: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: AoeOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Show at most this many hazards at once
    pub fn with_max_casts(mut self, max_casts: usize) -> Self {
        self.max_casts = Some(max_casts);
        self
    }

    pub fn with_risky_window(mut self, secs: f32) -> Self {
        self.risky_window_secs = secs;
        self
    }

    /// Real hit lands this long after the cast bar completes
    pub fn with_extra_delay(mut self, secs: f32) -> Self {
        self.extra_delay_secs = secs;
        self
    }

    /// The shape marks where to stand rather than where not to
    pub fn safe_inside(mut self) -> Self {
        self.safe_inside = true;
        self
    }

    /// Expect the same AOE again this long after each cast finishes
    pub fn with_repeat_after(mut self, secs: f32) -> Self {
        self.repeat_after_secs = Some(secs.max(0.0));
        self
    }

    fn hazards(&self) -> Vec<HazardInstance> {
        let Some(first) = self.casts.first().map(|(_, h)| h.activation) else {
            return Vec::new();
        };
        let risky_until = crate::world::add_secs(first, self.risky_window_secs);
        self.casts
            .iter()
            .take(self.max_casts.unwrap_or(usize::MAX))
            .map(|(_, hazard)| {
                let risky = hazard.activation <= risky_until;
                let mut hazard = hazard.clone().with_risky(risky);
                hazard.color = match (self.safe_inside, risky) {
                    (true, _) => HazardColor::Safe,
                    (false, true) => HazardColor::Danger,
                    (false, false) => HazardColor::Future,
                };
                hazard
            })
            .collect()
    }

    fn remove_cast(&mut self, caster: ActorId) -> Option<HazardInstance> {
        let idx = self.casts.iter().position(|(id, _)| *id == caster)?;
        Some(self.casts.remove(idx).1)
    }

    fn insert(&mut self, caster: ActorId, hazard: HazardInstance) {
        // Stable insert keeps same-activation casts in arrival order
        let idx = self
            .casts
            .partition_point(|(_, h)| h.activation <= hazard.activation);
        self.casts.insert(idx, (caster, hazard));
    }
}

impl Component for SimpleAoes {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action != self.action {
            return;
        }
        let origin = match self.origin {
            AoeOrigin::Caster => caster.position,
            AoeOrigin::CastLocation => cast.location,
        };
        let mut hazard = HazardInstance::new(
            self.shape.clone(),
            origin,
            cast.rotation,
            cast.activation(self.extra_delay_secs),
        );
        if self.safe_inside {
            hazard = hazard.safe_inside();
        }
        if self.repeat_after_secs.is_some() {
            self.remove_cast(caster.id);
        }
        self.insert(caster.id, hazard);
    }

    fn on_cast_finished(&mut self, ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action != self.action {
            return;
        }
        let finished = self.remove_cast(caster.id);
        if let (Some(mut hazard), Some(repeat)) = (finished, self.repeat_after_secs) {
            hazard.activation = crate::world::add_secs(ctx.now(), repeat);
            self.insert(caster.id, hazard);
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, event: &CastEvent) {
        // Repeating AOEs keep their prediction until the next cast replaces it
        if event.action == self.action && self.repeat_after_secs.is_none() {
            self.remove_cast(caster.id);
        }
    }

    fn on_actor_removed(&mut self, _ctx: &ModuleContext<'_>, actor: ActorId) {
        self.casts.retain(|(id, _)| *id != actor);
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        let expired = aoe::expire_stale(
            &mut self.casts,
            ctx.now(),
            ctx.config.hazard_expiry_grace_secs,
            |(_, h)| h.activation,
        );
        if expired > 0 {
            tracing::debug!(action = self.action.0, expired, "Expired unresolved AOEs");
        }
    }

    fn active_hazards(&self, _ctx: &ModuleContext<'_>) -> Vec<HazardInstance> {
        self.hazards()
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        aoe::add_gtfo_hint(&self.hazards(), actor, hints);
    }

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, hints: &mut AiHints) {
        aoe::add_forbidden_zones(&self.hazards(), hints);
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        aoe::add_aoe_damage(ctx, &self.hazards(), out);
    }

    fn draw_arena(&self, _ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        aoe::draw_hazards(&self.hazards(), arena);
    }
}
