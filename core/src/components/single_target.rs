use chrono::NaiveDateTime;

use super::aoe;
use super::{Component, ModuleContext};
use crate::hints::{DamageKind, GlobalHints, PredictedDamage};
use crate::world::{ActionId, Actor, ActorId, CastInfo, PlayerMask};

#[derive(Debug, Clone)]
struct PendingHit {
    caster: ActorId,
    target: Option<ActorId>,
    activation: NaiveDateTime,
}

/// Heavy hit on one target (tankbuster)
#[derive(Debug, Clone)]
pub struct SingleTargetCast {
    action: ActionId,
    hint: String,
    casts: Vec<PendingHit>,
}

impl SingleTargetCast {
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            hint: "Tankbuster".to_string(),
            casts: Vec::new(),
        }
    }

    /// Tankbuster whose cast can be pushed back by the tank
    pub fn delayable(action: ActionId) -> Self {
        Self::new(action).with_hint("Delayable tankbuster")
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

impl Component for SingleTargetCast {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.casts.push(PendingHit {
                caster: caster.id,
                target: cast.target,
                activation: cast.activation(0.0),
            });
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.casts.retain(|c| c.caster != caster.id);
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        aoe::expire_stale(&mut self.casts, ctx.now(), ctx.config.hazard_expiry_grace_secs, |c| c.activation);
    }

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        if !self.casts.is_empty() {
            hints.add(self.hint.clone());
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        for hit in &self.casts {
            let players = hit
                .target
                .and_then(|t| ctx.world.party.find_slot(t))
                .map(PlayerMask::single)
                .unwrap_or_default();
            out.push(PredictedDamage {
                activation: hit.activation,
                players,
                kind: DamageKind::Tankbuster,
            });
        }
    }
}
