//! Phase trigger evaluation

use chrono::NaiveDateTime;

use crate::components::CastCounter;
use crate::dsl::PhaseTrigger;
use crate::events::WorldEvent;
use crate::registry::ComponentRegistry;
use crate::world::{WorldState, add_secs};

/// Emitted when the encounter moves into its next phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    pub encounter_id: String,
    pub old_phase: String,
    pub new_phase: String,
    pub timestamp: NaiveDateTime,
}

/// Event-driven triggers
pub(super) fn event_matches(trigger: &PhaseTrigger, event: &WorldEvent, world: &WorldState) -> bool {
    match (trigger, event) {
        (PhaseTrigger::CastStarted { action }, WorldEvent::CastStarted { cast, .. }) => {
            cast.action == *action
        }
        (PhaseTrigger::CastResolved { action }, WorldEvent::CastResolved { event, .. }) => {
            event.action == *action
        }
        (PhaseTrigger::ActorCreated { oid }, WorldEvent::ActorCreated { actor, .. }) => {
            world.actor(*actor).is_some_and(|a| a.oid == *oid)
        }
        (PhaseTrigger::StatusGained { status: id }, WorldEvent::StatusGained { status, .. }) => {
            status.id == *id
        }
        _ => false,
    }
}

/// `CounterReached` against a counter of the current registry
pub(super) fn counter_reached(trigger: &PhaseTrigger, registry: &ComponentRegistry) -> bool {
    let PhaseTrigger::CounterReached { counter, count } = trigger else {
        return false;
    };
    registry
        .handle(counter)
        .and_then(|handle| registry.get_as::<CastCounter>(handle))
        .is_some_and(|c| c.num_casts() >= *count)
}

/// Time-based triggers, relative to the start of the current phase
pub(super) fn elapsed(trigger: &PhaseTrigger, phase_started: NaiveDateTime, now: NaiveDateTime) -> bool {
    match trigger {
        PhaseTrigger::Elapsed { secs } => now >= add_secs(phase_started, *secs),
        _ => false,
    }
}
