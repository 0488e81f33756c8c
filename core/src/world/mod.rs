//! Host world state
//!
//! The host client owns the authoritative actor list and party layout. The
//! engine only reads a `WorldState` snapshot; `WorldState::apply_event` is a
//! helper for hosts (and the replay tool) that want the snapshot kept in sync
//! with the event feed.

mod actor;
mod party;

use chrono::NaiveDateTime;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub use actor::{Actor, CastInfo};
pub use party::{MAX_ALLIES, PartyState, PlayerMask};

use crate::events::WorldEvent;

/// Host-side actor instance id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

/// Action (ability) id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u32);

/// Status effect id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub u32);

/// Snapshot of the world as seen by the hazard engine
#[derive(Debug, Clone)]
pub struct WorldState {
    pub current_time: NaiveDateTime,
    pub actors: HashMap<ActorId, Actor>,
    pub party: PartyState,
}

impl WorldState {
    pub fn new(current_time: NaiveDateTime) -> Self {
        Self {
            current_time,
            actors: HashMap::new(),
            party: PartyState::default(),
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    /// All living actors with the given object (template) id
    pub fn actors_by_oid(&self, oid: u32) -> impl Iterator<Item = &Actor> {
        self.actors.values().filter(move |a| a.oid == oid && !a.is_dead)
    }

    /// Living party members with their slot
    pub fn party_members(&self) -> impl Iterator<Item = (usize, &Actor)> {
        self.party
            .slots()
            .filter_map(|(slot, id)| self.actors.get(&id).map(|a| (slot, a)))
            .filter(|(_, a)| !a.is_dead)
    }

    /// Actor occupying a party slot (dead or alive)
    pub fn party_member(&self, slot: usize) -> Option<&Actor> {
        self.party.get(slot).and_then(|id| self.actors.get(&id))
    }

    /// Seconds from now, as a timestamp
    pub fn future_time(&self, secs: f32) -> NaiveDateTime {
        add_secs(self.current_time, secs)
    }

    /// Mirror the actor-level effects of an event into the snapshot.
    ///
    /// Actor creation needs a full `Actor`, which the event does not carry, so
    /// `ActorCreated` is a no-op here; hosts add the actor before delivering it.
    pub fn apply_event(&mut self, event: &WorldEvent) {
        if event.timestamp() > self.current_time {
            self.current_time = event.timestamp();
        }
        match event {
            WorldEvent::CastStarted { caster, cast, .. } => {
                if let Some(actor) = self.actors.get_mut(caster) {
                    actor.cast = Some(cast.clone());
                }
            }
            WorldEvent::CastFinished { caster, .. } => {
                if let Some(actor) = self.actors.get_mut(caster) {
                    actor.cast = None;
                }
            }
            WorldEvent::ActorRemoved { actor, .. } => {
                self.actors.remove(actor);
            }
            _ => {}
        }
    }
}

/// Upper bound for configured delays and phase timers; no fight runs longer
pub const MAX_DELAY_SECS: f32 = 3600.0;

/// `time + secs`, millisecond resolution. Saturates at the representable range
/// instead of overflowing.
pub fn add_secs(time: NaiveDateTime, secs: f32) -> NaiveDateTime {
    chrono::Duration::try_milliseconds((secs * 1000.0).round() as i64)
        .and_then(|delta| time.checked_add_signed(delta))
        .unwrap_or(if secs < 0.0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    #[test]
    fn add_secs_rounds_to_millis() {
        let t = add_secs(t0(), 1.25);
        assert_eq!((t - t0()).num_milliseconds(), 1250);
        assert_eq!(add_secs(t0(), -0.5), t0() - chrono::Duration::milliseconds(500));
    }

    #[test]
    fn add_secs_saturates_on_overflow() {
        assert_eq!(add_secs(t0(), 1e13), NaiveDateTime::MAX);
        assert_eq!(add_secs(t0(), f32::INFINITY), NaiveDateTime::MAX);
        assert_eq!(add_secs(t0(), f32::NEG_INFINITY), NaiveDateTime::MIN);
    }
}
