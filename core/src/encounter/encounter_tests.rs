//! Tests for phase sequencing
//!
//! Verifies that:
//! - the first phase is active from the start
//! - each trigger kind moves the fight into the next phase only
//! - entering a phase starts from fresh component state

use telegraph_types::EngineConfig;

use super::*;
use crate::components::test_support::*;
use crate::components::{CastCounter, GenericWildCharge, SimpleAoes};
use crate::world::ActorId;

const DEFINITION: &str = r#"
    [encounter]
    id = "phased"
    name = "Phased Boss"

    [[component]]
    name = "puddles"
    type = "simple_aoes"
    action = 1
    shape = { type = "circle", radius = 5.0 }

    [[component]]
    name = "rounds"
    type = "cast_counter"
    action = 2

    [[component]]
    name = "charge"
    type = "wild_charge"
    action = 3
    half_width = 2.0

    [[component]]
    name = "raidwide"
    type = "raidwide_cast"
    action = 9

    [[phase]]
    name = "opening"
    components = ["puddles", "rounds"]

    [[phase]]
    name = "charges"
    components = ["charge"]
    trigger = { type = "counter_reached", counter = "rounds", count = 2 }

    [[phase]]
    name = "burn"
    components = ["raidwide"]
    trigger = { type = "cast_started", action = 9 }

    [[phase]]
    name = "enrage"
    components = ["puddles"]
    trigger = { type = "elapsed", secs = 30.0 }
"#;

struct Fight {
    world: WorldState,
    config: EngineConfig,
    encounter: Encounter,
}

impl Fight {
    fn new() -> Self {
        let definition: EncounterDefinition = toml::from_str(DEFINITION).unwrap();
        let mut world = party_world(&[(0.0, 0.0), (10.0, 0.0)]);
        add_boss(&mut world, BOSS_ID, 0.0, 0.0);
        Self {
            world,
            config: EngineConfig::default(),
            encounter: Encounter::new(definition, t0()).unwrap(),
        }
    }

    fn deliver(&mut self, event: WorldEvent) -> Option<PhaseChange> {
        self.world.apply_event(&event);
        self.encounter
            .handle_event(&event, &self.world, &self.config)
            .unwrap()
    }

    fn tick(&mut self, secs: f32) -> Option<PhaseChange> {
        self.world.current_time = at(secs);
        self.encounter.update(&self.world, &self.config).unwrap()
    }

    fn phase(&self) -> &str {
        &self.encounter.phase().name
    }

    fn boss(&self) -> ActorId {
        ActorId(BOSS_ID)
    }

    /// Resolve `rounds` twice to reach the charges phase
    fn reach_charges(&mut self) {
        let boss = self.boss();
        self.deliver(cast_resolved(boss, 2, 1.0, None));
        self.deliver(cast_resolved(boss, 2, 2.0, None));
        assert_eq!(self.phase(), "charges");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Phase entry
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn first_phase_is_active_from_the_start() {
    let fight = Fight::new();
    assert_eq!(fight.phase(), "opening");
    assert_eq!(fight.encounter.phase_index(), 0);
    assert_eq!(fight.encounter.phase_started(), t0());
    assert!(fight.encounter.registry().find::<SimpleAoes>().is_some());
    assert!(fight.encounter.registry().find::<CastCounter>().is_some());
}

#[test]
fn counter_moves_to_next_phase_and_drops_hazards() {
    let mut fight = Fight::new();
    let boss = fight.boss();
    fight.deliver(cast_started(boss, cast(1, 0.0, 10.0)));
    assert_eq!(fight.encounter.collect_hints(&fight.world, &fight.config, None).hazards.len(), 1);

    assert!(fight.deliver(cast_resolved(boss, 2, 1.0, None)).is_none());
    let change = fight.deliver(cast_resolved(boss, 2, 2.0, None)).unwrap();

    assert_eq!(
        change,
        PhaseChange {
            encounter_id: "phased".to_string(),
            old_phase: "opening".to_string(),
            new_phase: "charges".to_string(),
            timestamp: at(2.0),
        }
    );
    assert_eq!(fight.encounter.phase_started(), at(2.0));
    assert!(fight.encounter.registry().find::<SimpleAoes>().is_none());
    assert!(fight.encounter.registry().find::<GenericWildCharge>().is_some());

    let tick = fight.encounter.collect_hints(&fight.world, &fight.config, Some(0));
    assert!(tick.hazards.is_empty());
    assert!(tick.player(0).unwrap().hints.is_empty());
}

#[test]
fn triggering_cast_reaches_the_new_phase() {
    let mut fight = Fight::new();
    fight.reach_charges();

    let boss = fight.boss();
    let change = fight.deliver(cast_started(boss, cast(9, 5.0, 4.0))).unwrap();
    assert_eq!(change.new_phase, "burn");

    let tick = fight.encounter.collect_hints(&fight.world, &fight.config, None);
    assert_eq!(tick.global, vec!["Raidwide"]);
}

#[test]
fn triggers_of_later_phases_are_ignored() {
    let mut fight = Fight::new();
    let boss = fight.boss();
    assert!(fight.deliver(cast_started(boss, cast(9, 1.0, 4.0))).is_none());
    assert_eq!(fight.phase(), "opening");

    // Elapsed time only counts for the phase right after the current one
    assert!(fight.tick(60.0).is_none());
    assert_eq!(fight.phase(), "opening");
}

#[test]
fn elapsed_trigger_counts_from_phase_start() {
    let mut fight = Fight::new();
    fight.reach_charges();
    let boss = fight.boss();
    fight.deliver(cast_started(boss, cast(9, 10.0, 4.0)));
    assert_eq!(fight.phase(), "burn");

    assert!(fight.tick(39.9).is_none());
    let change = fight.tick(40.0).unwrap();
    assert_eq!(change.old_phase, "burn");
    assert_eq!(change.new_phase, "enrage");
    assert_eq!(fight.encounter.phase_started(), at(40.0));

    // Last phase: nothing left to enter
    assert!(fight.tick(500.0).is_none());
    assert_eq!(fight.phase(), "enrage");
}

#[test]
fn process_events_reports_every_change() {
    let mut fight = Fight::new();
    let boss = fight.boss();
    let events = vec![
        cast_resolved(boss, 2, 1.0, None),
        cast_resolved(boss, 2, 2.0, None),
        cast_started(boss, cast(9, 3.0, 4.0)),
    ];
    let changes = fight
        .encounter
        .process_events(&events, &fight.world, &fight.config)
        .unwrap();
    let entered: Vec<_> = changes.iter().map(|c| c.new_phase.as_str()).collect();
    assert_eq!(entered, vec!["charges", "burn"]);
}

#[test]
fn single_phase_encounter_runs_every_component() {
    let definition: EncounterDefinition = toml::from_str(
        r#"
        [encounter]
        id = "flat"

        [[component]]
        name = "puddles"
        type = "simple_aoes"
        action = 1
        shape = { type = "circle", radius = 5.0 }

        [[component]]
        name = "rounds"
        type = "cast_counter"
        action = 2
        "#,
    )
    .unwrap();
    let encounter = Encounter::new(definition, t0()).unwrap();
    assert_eq!(encounter.phase().name, "main");
    assert_eq!(encounter.registry().len(), 2);
}

#[test]
fn invalid_definition_is_rejected() {
    let mut definition: EncounterDefinition = toml::from_str(DEFINITION).unwrap();
    definition.phases[1].components.push("missing".to_string());
    let err = Encounter::new(definition, t0()).unwrap_err();
    assert!(matches!(err, EncounterError::UnknownComponent { ref component, .. } if component == "missing"));
}
