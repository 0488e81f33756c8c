//! Encounter runtime
//!
//! An `Encounter` walks through the phases of its definition in order. Each
//! phase owns a freshly built component registry; entering the next phase
//! drops the previous registry with all of its tracked hazards.
//!
//! Per tick the host:
//! 1. delivers the tick's events (`handle_event`) in timestamp order,
//! 2. calls `update`,
//! 3. reads `collect_hints`.

mod phase;

#[cfg(test)]
mod encounter_tests;

use chrono::NaiveDateTime;
use telegraph_types::EngineConfig;

use crate::aggregator::{HintAggregator, TickHints};
use crate::dsl::{EncounterDefinition, EncounterError, PhaseDefinition, build_registry};
use crate::events::WorldEvent;
use crate::registry::ComponentRegistry;
use crate::world::WorldState;

pub use phase::PhaseChange;

pub struct Encounter {
    definition: EncounterDefinition,
    phases: Vec<PhaseDefinition>,
    phase_idx: usize,
    phase_started: NaiveDateTime,
    registry: ComponentRegistry,
    aggregator: HintAggregator,
}

impl Encounter {
    /// Validate the definition and enter its first phase at `start`
    pub fn new(definition: EncounterDefinition, start: NaiveDateTime) -> Result<Self, EncounterError> {
        definition.validate()?;
        let phases = definition.effective_phases();
        let registry = build_registry(&definition, &phases[0])?;

        tracing::debug!(
            encounter = %definition.info.id,
            phase = %phases[0].name,
            components = registry.len(),
            "Encounter started"
        );

        let aggregator = HintAggregator::new(definition.info.arena_center);
        Ok(Self {
            definition,
            phases,
            phase_idx: 0,
            phase_started: start,
            registry,
            aggregator,
        })
    }

    pub fn definition(&self) -> &EncounterDefinition {
        &self.definition
    }

    pub fn phase(&self) -> &PhaseDefinition {
        &self.phases[self.phase_idx]
    }

    pub fn phase_index(&self) -> usize {
        self.phase_idx
    }

    pub fn phase_started(&self) -> NaiveDateTime {
        self.phase_started
    }

    /// Components of the current phase
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn next_phase(&self) -> Option<&PhaseDefinition> {
        self.phases.get(self.phase_idx + 1)
    }

    /// Deliver one event.
    ///
    /// Event-driven triggers are checked first, so the event that opens a
    /// phase is seen by that phase's components. Counter triggers are checked
    /// after delivery, once the counter has seen the event.
    pub fn handle_event(
        &mut self,
        event: &WorldEvent,
        world: &WorldState,
        config: &EngineConfig,
    ) -> Result<Option<PhaseChange>, EncounterError> {
        let mut change = None;
        if let Some(next) = self.next_phase()
            && phase::event_matches(&next.trigger, event, world)
        {
            change = Some(self.advance(event.timestamp())?);
        }

        self.registry.dispatch_event(event, world, config);

        if change.is_none()
            && let Some(next) = self.next_phase()
            && phase::counter_reached(&next.trigger, &self.registry)
        {
            change = Some(self.advance(event.timestamp())?);
        }
        Ok(change)
    }

    /// Deliver a batch of events, returning every phase change they caused
    pub fn process_events(
        &mut self,
        events: &[WorldEvent],
        world: &WorldState,
        config: &EngineConfig,
    ) -> Result<Vec<PhaseChange>, EncounterError> {
        let mut changes = Vec::new();
        for event in events {
            changes.extend(self.handle_event(event, world, config)?);
        }
        Ok(changes)
    }

    /// Per-tick housekeeping: time-based phase triggers, then every
    /// component's `update`
    pub fn update(
        &mut self,
        world: &WorldState,
        config: &EngineConfig,
    ) -> Result<Option<PhaseChange>, EncounterError> {
        let mut change = None;
        if let Some(next) = self.next_phase()
            && phase::elapsed(&next.trigger, self.phase_started, world.current_time)
        {
            change = Some(self.advance(world.current_time)?);
        }
        self.registry.update(world, config);
        Ok(change)
    }

    /// Merged hints of the current phase. `viewer` selects the slot whose
    /// arena draw is projected.
    pub fn collect_hints(
        &self,
        world: &WorldState,
        config: &EngineConfig,
        viewer: Option<usize>,
    ) -> TickHints {
        self.aggregator.collect(&self.registry, world, config, viewer)
    }

    fn advance(&mut self, timestamp: NaiveDateTime) -> Result<PhaseChange, EncounterError> {
        let next_idx = self.phase_idx + 1;
        let registry = build_registry(&self.definition, &self.phases[next_idx])?;
        let change = PhaseChange {
            encounter_id: self.definition.info.id.clone(),
            old_phase: self.phases[self.phase_idx].name.clone(),
            new_phase: self.phases[next_idx].name.clone(),
            timestamp,
        };

        tracing::debug!(
            encounter = %change.encounter_id,
            old_phase = %change.old_phase,
            new_phase = %change.new_phase,
            "Phase changed"
        );

        self.registry = registry;
        self.phase_idx = next_idx;
        self.phase_started = timestamp;
        Ok(change)
    }
}

impl std::fmt::Debug for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encounter")
            .field("encounter", &self.definition.info.id)
            .field("phase", &self.phase().name)
            .field("phase_started", &self.phase_started)
            .field("registry", &self.registry)
            .finish()
    }
}
