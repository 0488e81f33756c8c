//! Builders shared by the component test modules

use chrono::{NaiveDate, NaiveDateTime};
use telegraph_types::{EngineConfig, PartyRole};

use super::{Component, ModuleContext};
use crate::events::{CastEvent, StatusInfo, WorldEvent};
use crate::geometry::{Angle, WPos};
use crate::hints::{AiHints, GlobalHints, PredictedDamage, TextHints};
use crate::registry::Siblings;
use crate::world::{ActionId, Actor, ActorId, CastInfo, StatusId, WorldState, add_secs};

/// Boss actors use ids from here on, party members use 1..=24
pub const BOSS_ID: u64 = 100;

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap()
}

pub fn at(secs: f32) -> NaiveDateTime {
    add_secs(t0(), secs)
}

/// World at `t0` with one party member per position; slot `i` holds actor
/// `i + 1`
pub fn party_world(positions: &[(f32, f32)]) -> WorldState {
    let roles: Vec<PartyRole> = positions.iter().map(|_| PartyRole::Unassigned).collect();
    party_world_with_roles(positions, &roles)
}

pub fn party_world_with_roles(positions: &[(f32, f32)], roles: &[PartyRole]) -> WorldState {
    let mut world = WorldState::new(t0());
    for (slot, (&(x, z), &role)) in positions.iter().zip(roles).enumerate() {
        let id = slot as u64 + 1;
        world.add_actor(Actor::new(id, WPos::new(x, z)).with_name(format!("Player {}", slot + 1)));
        world.party.assign(slot, ActorId(id), role);
    }
    world
}

pub fn add_boss(world: &mut WorldState, id: u64, x: f32, z: f32) -> ActorId {
    world.add_actor(Actor::new(id, WPos::new(x, z)).with_name("Boss").with_hitbox(2.0));
    ActorId(id)
}

pub fn player(slot: usize) -> ActorId {
    ActorId(slot as u64 + 1)
}

pub fn move_player(world: &mut WorldState, slot: usize, x: f32, z: f32) {
    if let Some(actor) = world.actor_mut(player(slot)) {
        actor.position = WPos::new(x, z);
    }
}

pub fn cast(action: u32, started_secs: f32, total_secs: f32) -> CastInfo {
    CastInfo {
        action: ActionId(action),
        target: None,
        location: WPos::default(),
        rotation: Angle::default(),
        started_at: at(started_secs),
        total_time_secs: total_secs,
        interruptible: true,
    }
}

pub fn cast_at(action: u32, started_secs: f32, total_secs: f32, location: WPos, rotation: Angle) -> CastInfo {
    CastInfo {
        location,
        rotation,
        ..cast(action, started_secs, total_secs)
    }
}

pub fn targeted_cast(action: u32, started_secs: f32, total_secs: f32, target: ActorId) -> CastInfo {
    CastInfo {
        target: Some(target),
        ..cast(action, started_secs, total_secs)
    }
}

pub fn cast_started(caster: ActorId, cast: CastInfo) -> WorldEvent {
    WorldEvent::CastStarted {
        caster,
        timestamp: cast.started_at,
        cast,
    }
}

pub fn cast_finished(caster: ActorId, cast: CastInfo) -> WorldEvent {
    WorldEvent::CastFinished {
        caster,
        timestamp: cast.finish_at(),
        cast,
    }
}

pub fn cast_resolved(caster: ActorId, action: u32, secs: f32, target: Option<ActorId>) -> WorldEvent {
    WorldEvent::CastResolved {
        caster,
        event: CastEvent {
            action: ActionId(action),
            main_target: target,
            target_pos: WPos::default(),
            targets: target.into_iter().collect(),
        },
        timestamp: at(secs),
    }
}

pub fn status_gained(actor: ActorId, status: u32, secs: f32) -> WorldEvent {
    WorldEvent::StatusGained {
        actor,
        status: StatusInfo {
            id: StatusId(status),
            source: None,
            expires_at: None,
            extra: 0,
        },
        timestamp: at(secs),
    }
}

pub fn status_lost(actor: ActorId, status: u32, secs: f32) -> WorldEvent {
    WorldEvent::StatusLost {
        actor,
        status: StatusInfo {
            id: StatusId(status),
            source: None,
            expires_at: None,
            extra: 0,
        },
        timestamp: at(secs),
    }
}

/// Drives a single component the way the encounter does: the world snapshot
/// is updated first, then the component sees the event.
pub struct Harness<C: Component> {
    pub world: WorldState,
    pub config: EngineConfig,
    pub component: C,
}

impl<C: Component> Harness<C> {
    pub fn new(world: WorldState, component: C) -> Self {
        Self {
            world,
            config: EngineConfig::default(),
            component,
        }
    }

    pub fn ctx(&self) -> ModuleContext<'_> {
        ModuleContext::new(&self.world, &self.config, Siblings::empty())
    }

    pub fn deliver(&mut self, event: WorldEvent) {
        self.world.apply_event(&event);
        let ctx = ModuleContext::new(&self.world, &self.config, Siblings::empty());
        self.component.handle_event(&ctx, &event);
    }

    /// Advance the clock and run `update`
    pub fn tick(&mut self, secs: f32) {
        self.world.current_time = at(secs);
        let ctx = ModuleContext::new(&self.world, &self.config, Siblings::empty());
        self.component.update(&ctx);
    }

    pub fn hints(&self, slot: usize) -> Vec<String> {
        let mut hints = TextHints::new();
        if let Some(actor) = self.world.party_member(slot) {
            self.component.add_hints(&self.ctx(), slot, actor, &mut hints);
        }
        hints.iter().map(|h| h.text.clone()).collect()
    }

    pub fn global_hints(&self) -> Vec<String> {
        let mut hints = GlobalHints::default();
        self.component.add_global_hints(&self.ctx(), &mut hints);
        hints.into_vec()
    }

    pub fn ai_hints(&self, slot: usize) -> AiHints {
        let mut hints = AiHints::new();
        if let Some(actor) = self.world.party_member(slot) {
            self.component.add_ai_hints(&self.ctx(), slot, actor, &mut hints);
        }
        hints
    }

    /// Whether any forbidden zone the component reports for `slot` covers
    /// the point
    pub fn forbidden_at(&self, slot: usize, x: f32, z: f32) -> bool {
        self.ai_hints(slot)
            .forbidden_zones()
            .iter()
            .any(|f| f.zone.contains(WPos::new(x, z)))
    }

    pub fn predicted_damage(&self) -> Vec<PredictedDamage> {
        let mut out = Vec::new();
        self.component.add_predicted_damage(&self.ctx(), &mut out);
        out
    }
}
