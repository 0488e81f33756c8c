use chrono::NaiveDateTime;

use super::aoe;
use super::{Component, ModuleContext, StackWithCastTargets};
use crate::dsl::EncounterError;
use crate::events::CastEvent;
use crate::geometry::{WPos, Zone};
use crate::hazard::HazardColor;
use crate::hints::{AiHints, DamageKind, PredictedDamage, TextHints};
use crate::registry::{ComponentHandle, Siblings};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo, PlayerMask};

/// A soak point that needs between `min_soakers` and `max_soakers` players
#[derive(Debug, Clone, PartialEq)]
pub struct Tower {
    pub caster: ActorId,
    pub position: WPos,
    pub radius: f32,
    pub min_soakers: usize,
    pub max_soakers: usize,
    pub activation: NaiveDateTime,
    /// Players inside as of the last `update`
    pub soakers: PlayerMask,
}

impl Tower {
    pub fn is_inside(&self, pos: WPos) -> bool {
        pos.in_circle(self.position, self.radius)
    }

    pub fn num_soakers(&self) -> usize {
        self.soakers.count() as usize
    }

    pub fn needs_soakers(&self) -> bool {
        self.num_soakers() < self.min_soakers
    }

    pub fn is_overfull(&self) -> bool {
        self.num_soakers() > self.max_soakers
    }

    fn zone(&self) -> Zone {
        Zone::circle(self.position, self.radius)
    }
}

/// Towers spawned at the ground target of a cast.
///
/// Optionally tied to a sibling stack component: while that sibling has
/// stacks up, nobody may soak.
#[derive(Debug, Clone)]
pub struct CastTowers {
    action: ActionId,
    radius: f32,
    min_soakers: usize,
    max_soakers: usize,
    stack_sibling: Option<String>,
    stack_handle: Option<ComponentHandle>,
    towers: Vec<Tower>,
}

impl CastTowers {
    pub fn new(action: ActionId, radius: f32, min_soakers: usize, max_soakers: usize) -> Self {
        Self {
            action,
            radius,
            min_soakers,
            max_soakers,
            stack_sibling: None,
            stack_handle: None,
            towers: Vec::new(),
        }
    }

    /// Towers must be left empty while the named stack component has stacks
    pub fn suppressed_while_stacking(mut self, sibling: impl Into<String>) -> Self {
        self.stack_sibling = Some(sibling.into());
        self
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }
}

impl Component for CastTowers {
    fn resolve_siblings(&mut self, siblings: &Siblings<'_>) -> Result<(), EncounterError> {
        if let Some(name) = &self.stack_sibling {
            self.stack_handle = Some(siblings.require::<StackWithCastTargets>(name)?);
        }
        Ok(())
    }

    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action != self.action {
            return;
        }
        self.towers.push(Tower {
            caster: caster.id,
            position: cast.location,
            radius: self.radius,
            min_soakers: self.min_soakers,
            max_soakers: self.max_soakers,
            activation: cast.activation(0.0),
            soakers: PlayerMask::NONE,
        });
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if cast.action == self.action {
            self.towers.retain(|t| t.caster != caster.id);
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, event: &CastEvent) {
        if event.action == self.action {
            self.towers.retain(|t| t.caster != caster.id);
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        let expired = aoe::expire_stale(&mut self.towers, ctx.now(), ctx.config.hazard_expiry_grace_secs, |t| {
            t.activation
        });
        if expired > 0 {
            tracing::debug!(action = self.action.0, expired, "Expired unresolved towers");
        }
        if self.towers.is_empty() {
            return;
        }

        let stacking = self
            .stack_handle
            .and_then(|h| ctx.sibling::<StackWithCastTargets>(h))
            .is_some_and(|s| !s.active_stacks().is_empty());
        let (min, max) = if stacking {
            (0, 0)
        } else {
            (self.min_soakers, self.max_soakers)
        };

        for tower in &mut self.towers {
            tower.min_soakers = min;
            tower.max_soakers = max;
            tower.soakers = ctx
                .world
                .party_members()
                .filter(|(_, p)| tower.is_inside(p.position))
                .map(|(slot, _)| slot)
                .collect();
        }
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, actor: &Actor, hints: &mut TextHints) {
        if self.towers.is_empty() {
            return;
        }
        match self.towers.iter().find(|t| t.is_inside(actor.position)) {
            Some(tower) if tower.max_soakers == 0 => hints.add("GTFO from tower!"),
            Some(tower) if tower.is_overfull() => hints.add("Too many soakers in tower!"),
            Some(_) => {}
            None => {
                if self.towers.iter().any(Tower::needs_soakers) {
                    hints.add("Soak the tower!");
                }
            }
        }
    }

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, slot: usize, _actor: &Actor, hints: &mut AiHints) {
        let Some(activation) = self.towers.iter().map(|t| t.activation).min() else {
            return;
        };

        // Towers nobody else may enter: closed ones, and full ones we're not part of
        let closed: Vec<Zone> = self
            .towers
            .iter()
            .filter(|t| t.max_soakers == 0 || (!t.soakers.contains(slot) && t.num_soakers() >= t.max_soakers))
            .map(Tower::zone)
            .collect();
        if !closed.is_empty() {
            hints.add_forbidden_zone(Zone::Union(closed), activation);
        }

        let soaking_valid = self
            .towers
            .iter()
            .any(|t| t.max_soakers > 0 && t.soakers.contains(slot) && !t.is_overfull());
        let needy: Vec<Zone> = self
            .towers
            .iter()
            .filter(|t| t.needs_soakers())
            .map(|t| t.zone().invert())
            .collect();
        if !soaking_valid && !needy.is_empty() {
            hints.add_forbidden_zone(Zone::Intersection(needy), activation);
        }
    }

    fn add_predicted_damage(&self, _ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        for tower in self.towers.iter().filter(|t| t.soakers.any()) {
            out.push(PredictedDamage {
                activation: tower.activation,
                players: tower.soakers,
                kind: DamageKind::Shared,
            });
        }
    }

    fn draw_arena(&self, _ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        for tower in &self.towers {
            let color = if tower.max_soakers == 0 || tower.is_overfull() {
                HazardColor::Danger
            } else if tower.needs_soakers() {
                HazardColor::Tower
            } else {
                HazardColor::Safe
            };
            arena.zone_circle(tower.position, tower.radius, color);
        }
    }
}
