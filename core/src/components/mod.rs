//! Mechanic components
//!
//! Each component is a small state machine tracking one mechanic against the
//! event feed. Components:
//! - react to cast / status / actor-lifecycle events,
//! - expire stale state in `update`,
//! - project their state into text hints, AI hints, predicted damage and
//!   arena draws when the aggregator asks.
//!
//! ```text
//! WorldEvent ──► Component::handle_event ──► (state) ──► add_hints / add_ai_hints
//!                                                    └─► draw_arena
//! ```
//!
//! All hooks default to no-ops so a component only implements what it needs.

mod aoe;
mod cast_counter;
mod cast_hint;
mod cleansable;
mod intercept;
mod interrupt;
mod raidwide;
mod safe_zone;
mod simple_aoes;
mod single_target;
mod spawn_aoes;
mod spread;
mod stack;
mod towers;
mod wild_charge;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod wild_charge_tests;

use std::any::Any;

use chrono::NaiveDateTime;
use telegraph_types::EngineConfig;

use crate::dsl::EncounterError;
use crate::events::{CastEvent, StatusInfo, WorldEvent};
use crate::hazard::HazardInstance;
use crate::hints::{AiHints, GlobalHints, PredictedDamage, TextHints};
use crate::registry::Siblings;
use crate::render::ArenaDraw;
use crate::world::{Actor, ActorId, CastInfo, WorldState};

pub use cast_counter::CastCounter;
pub use cast_hint::{CastHint, DEFAULT_HIT_TIMEOUT_SECS};
pub use cleansable::CleansableDebuff;
pub use intercept::InterceptTether;
pub use interrupt::CastInterruptHint;
pub use raidwide::{RaidwideCast, RaidwideCastDelay};
pub use safe_zone::SafeZone;
pub use simple_aoes::{AoeOrigin, SimpleAoes};
pub use single_target::SingleTargetCast;
pub use spawn_aoes::ActorSpawnAoes;
pub use spread::{Spread, SpreadFromCastTargets};
pub use stack::{Stack, StackWithCastTargets};
pub use towers::{CastTowers, Tower};
pub use wild_charge::{GenericWildCharge, Lane, PlayerRole, WildChargeRoles};

/// Read-only view handed to every component hook
#[derive(Clone, Copy)]
pub struct ModuleContext<'a> {
    pub world: &'a WorldState,
    pub config: &'a EngineConfig,
    siblings: Siblings<'a>,
}

impl<'a> ModuleContext<'a> {
    pub fn new(world: &'a WorldState, config: &'a EngineConfig, siblings: Siblings<'a>) -> Self {
        Self {
            world,
            config,
            siblings,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.world.current_time
    }

    pub fn siblings(&self) -> &Siblings<'a> {
        &self.siblings
    }

    /// Typed read access to a sibling resolved at activation
    pub fn sibling<T: Component>(&self, handle: crate::registry::ComponentHandle) -> Option<&'a T> {
        self.siblings.get_as::<T>(handle)
    }
}

/// Upcast helper so registries can downcast `dyn Component` to a concrete type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Event-feed listener implemented by every mechanic tracker.
///
/// Hooks run synchronously, once per delivered event, in timestamp order.
/// Output hooks take `&self` and must be idempotent: the aggregator may call
/// them any number of times per tick.
pub trait Component: AsAny {
    /// Resolve named sibling components. Called once when the registry is
    /// activated; a missing sibling is a configuration error.
    fn resolve_siblings(&mut self, _siblings: &Siblings<'_>) -> Result<(), EncounterError> {
        Ok(())
    }

    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, _cast: &CastInfo) {}

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, _cast: &CastInfo) {}

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, _event: &CastEvent) {}

    fn on_status_gained(&mut self, _ctx: &ModuleContext<'_>, _actor: &Actor, _status: &StatusInfo) {}

    fn on_status_lost(&mut self, _ctx: &ModuleContext<'_>, _actor: &Actor, _status: &StatusInfo) {}

    fn on_actor_created(&mut self, _ctx: &ModuleContext<'_>, _actor: &Actor) {}

    fn on_actor_removed(&mut self, _ctx: &ModuleContext<'_>, _actor: ActorId) {}

    /// Per-tick housekeeping, after all events of the tick were delivered
    fn update(&mut self, _ctx: &ModuleContext<'_>) {}

    /// Hazards currently tracked, ordered by activation
    fn active_hazards(&self, _ctx: &ModuleContext<'_>) -> Vec<HazardInstance> {
        Vec::new()
    }

    fn add_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, _hints: &mut TextHints) {}

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, _hints: &mut GlobalHints) {}

    fn add_ai_hints(&self, _ctx: &ModuleContext<'_>, _slot: usize, _actor: &Actor, _hints: &mut AiHints) {}

    fn add_predicted_damage(&self, _ctx: &ModuleContext<'_>, _out: &mut Vec<PredictedDamage>) {}

    fn draw_arena(&self, _ctx: &ModuleContext<'_>, _pc_slot: usize, _pc: &Actor, _arena: &mut ArenaDraw) {}

    /// Route an event to the matching hook. Events about actors the world
    /// snapshot does not know are dropped.
    fn handle_event(&mut self, ctx: &ModuleContext<'_>, event: &WorldEvent) {
        match event {
            WorldEvent::CastStarted { caster, cast, .. } => {
                if let Some(actor) = ctx.world.actor(*caster) {
                    self.on_cast_started(ctx, actor, cast);
                }
            }
            WorldEvent::CastFinished { caster, cast, .. } => {
                if let Some(actor) = ctx.world.actor(*caster) {
                    self.on_cast_finished(ctx, actor, cast);
                }
            }
            WorldEvent::CastResolved { caster, event, .. } => {
                if let Some(actor) = ctx.world.actor(*caster) {
                    self.on_cast_resolved(ctx, actor, event);
                }
            }
            WorldEvent::StatusGained { actor, status, .. } => {
                if let Some(actor) = ctx.world.actor(*actor) {
                    self.on_status_gained(ctx, actor, status);
                }
            }
            WorldEvent::StatusLost { actor, status, .. } => {
                if let Some(actor) = ctx.world.actor(*actor) {
                    self.on_status_lost(ctx, actor, status);
                }
            }
            WorldEvent::ActorCreated { actor, .. } => {
                if let Some(actor) = ctx.world.actor(*actor) {
                    self.on_actor_created(ctx, actor);
                }
            }
            WorldEvent::ActorRemoved { actor, .. } => self.on_actor_removed(ctx, *actor),
        }
    }
}

/// Downcast a component trait object to its concrete type
pub fn downcast<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}
