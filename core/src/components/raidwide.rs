use chrono::NaiveDateTime;

use super::aoe;
use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::hints::{DamageKind, GlobalHints, PredictedDamage};
use crate::world::{ActionId, Actor, ActorId, CastInfo, PlayerMask};

pub(crate) const DEFAULT_RAIDWIDE_HINT: &str = "Raidwide";

fn party_mask(ctx: &ModuleContext<'_>) -> PlayerMask {
    ctx.world.party_members().map(|(slot, _)| slot).collect()
}

/// Unavoidable damage to the whole party at the end of a cast
#[derive(Debug, Clone)]
pub struct RaidwideCast {
    action: ActionId,
    hint: String,
    casts: Vec<(ActorId, NaiveDateTime)>,
}

impl RaidwideCast {
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            hint: DEFAULT_RAIDWIDE_HINT.to_string(),
            casts: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn is_active(&self) -> bool {
        !self.casts.is_empty()
    }
}

impl Component for RaidwideCast {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.casts.push((caster.id, cast.activation(0.0)));
        }
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.casts.retain(|(id, _)| *id != caster.id);
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        if aoe::expire_stale(&mut self.casts, ctx.now(), ctx.config.hazard_expiry_grace_secs, |(_, t)| *t) > 0 {
            tracing::debug!(action = self.action.0, "Expired unresolved raidwide");
        }
    }

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        if self.is_active() {
            hints.add(self.hint.clone());
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        let players = party_mask(ctx);
        for &(_, activation) in &self.casts {
            out.push(PredictedDamage {
                activation,
                players,
                kind: DamageKind::Raidwide,
            });
        }
    }
}

/// Raidwide whose damage lands some time after a visual cast; cleared when
/// the damage action resolves.
#[derive(Debug, Clone)]
pub struct RaidwideCastDelay {
    visual_action: ActionId,
    damage_action: ActionId,
    delay_secs: f32,
    hint: String,
    activation: Option<NaiveDateTime>,
}

impl RaidwideCastDelay {
    pub fn new(visual_action: ActionId, damage_action: ActionId, delay_secs: f32) -> Self {
        Self {
            visual_action,
            damage_action,
            delay_secs,
            hint: DEFAULT_RAIDWIDE_HINT.to_string(),
            activation: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn activation(&self) -> Option<NaiveDateTime> {
        self.activation
    }
}

impl Component for RaidwideCastDelay {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action == self.visual_action {
            self.activation = Some(cast.activation(self.delay_secs));
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if event.action == self.damage_action {
            self.activation = None;
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        if let Some(activation) = self.activation
            && ctx.now() > crate::world::add_secs(activation, ctx.config.hazard_expiry_grace_secs)
        {
            tracing::debug!(action = self.damage_action.0, "Expired unresolved delayed raidwide");
            self.activation = None;
        }
    }

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        if self.activation.is_some() {
            hints.add(self.hint.clone());
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        if let Some(activation) = self.activation {
            out.push(PredictedDamage {
                activation,
                players: party_mask(ctx),
                kind: DamageKind::Raidwide,
            });
        }
    }
}
