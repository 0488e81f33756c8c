//! Scripted fight scenarios
//!
//! A scenario is a TOML file describing the starting arena (actors and party
//! slots), a timeline of scripted events in seconds from the pull, and the
//! checkpoints to verify along the way:
//!
//! ```toml
//! [scenario]
//! name = "Stack into towers"
//! encounter = "test_boss"
//!
//! [[actor]]
//! id = 100
//! name = "Boss"
//! position = { x = 0.0, z = 0.0 }
//!
//! [[party]]
//! slot = 0
//! actor = 1
//! role = "tank"
//!
//! [[event]]
//! at_secs = 2.0
//! kind = "cast_started"
//! caster = 100
//! action = 31
//! cast_time = 4.0
//!
//! [[checkpoint]]
//! at_secs = 3.0
//! global_hints = ["Raidwide"]
//! ```

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use telegraph_core::world::add_secs;
use telegraph_core::{
    ActionId, Actor, ActorId, Angle, CastEvent, CastInfo, StatusId, StatusInfo, WPos, WorldEvent,
    WorldState,
};
use telegraph_types::PartyRole;

use crate::verification::Checkpoint;

/// Tail replayed after the last scripted moment when no duration is given
const DEFAULT_TAIL_SECS: f32 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(rename = "scenario", default)]
    pub meta: ScenarioMeta,

    #[serde(default, rename = "actor")]
    pub actors: Vec<Actor>,

    #[serde(default)]
    pub party: Vec<PartySlot>,

    #[serde(default, rename = "event")]
    pub events: Vec<ScriptedEvent>,

    #[serde(default, rename = "checkpoint")]
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub name: String,

    /// Encounter id this scenario was written for
    #[serde(default)]
    pub encounter: Option<String>,

    /// Pull time, e.g. "2025-01-01T20:00:00"
    #[serde(default = "default_start")]
    pub start: NaiveDateTime,

    /// Spacing of update ticks
    #[serde(default = "default_tick_secs")]
    pub tick_secs: f32,

    #[serde(default)]
    pub duration_secs: Option<f32>,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            encounter: None,
            start: default_start(),
            tick_secs: default_tick_secs(),
            duration_secs: None,
        }
    }
}

fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(20, 0, 0))
        .unwrap_or_default()
}

fn default_tick_secs() -> f32 {
    0.1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartySlot {
    pub slot: usize,
    pub actor: u64,
    #[serde(default)]
    pub role: PartyRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedEvent {
    /// Seconds since the pull
    pub at_secs: f32,
    #[serde(flatten)]
    pub action: ScriptedAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedAction {
    CastStarted {
        caster: u64,
        action: u32,
        cast_time: f32,
        #[serde(default)]
        target: Option<u64>,
        /// Ground target; the caster's position when omitted
        #[serde(default)]
        location: Option<WPos>,
        /// Locked facing in degrees; the caster's facing when omitted
        #[serde(default)]
        rotation_deg: Option<f32>,
        #[serde(default)]
        interruptible: bool,
    },
    /// Ends the caster's current cast bar
    CastFinished { caster: u64 },
    CastResolved {
        caster: u64,
        action: u32,
        #[serde(default)]
        target: Option<u64>,
        #[serde(default)]
        location: Option<WPos>,
        #[serde(default)]
        targets: Vec<u64>,
    },
    StatusGained {
        actor: u64,
        status: u32,
        #[serde(default)]
        source: Option<u64>,
        #[serde(default)]
        duration_secs: Option<f32>,
        #[serde(default)]
        extra: u16,
    },
    StatusLost { actor: u64, status: u32 },
    ActorCreated { actor: Actor },
    ActorRemoved { actor: u64 },
    /// Reposition an actor; produces no world event
    Move {
        actor: u64,
        position: WPos,
        #[serde(default)]
        rotation_deg: Option<f32>,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let scenario: Scenario = toml::from_str(content)?;
        if scenario.meta.tick_secs.is_nan() || scenario.meta.tick_secs <= 0.0 {
            return Err(format!("tick_secs must be positive, got {}", scenario.meta.tick_secs).into());
        }
        Ok(scenario)
    }

    /// Starting arena: every declared actor plus party slot assignments
    pub fn build_world(&self) -> WorldState {
        let mut world = WorldState::new(self.meta.start);
        for actor in &self.actors {
            world.add_actor(actor.clone());
        }
        for slot in &self.party {
            world.party.assign(slot.slot, ActorId(slot.actor), slot.role);
        }
        world
    }

    /// Events in replay order (stable for equal times)
    pub fn timeline(&self) -> Vec<ScriptedEvent> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        events
    }

    /// How far to replay
    pub fn duration_secs(&self) -> f32 {
        if let Some(duration) = self.meta.duration_secs {
            return duration;
        }
        let last_event = self.events.iter().map(|e| e.at_secs);
        let last_checkpoint = self.checkpoints.iter().map(|c| c.at_secs);
        last_event.chain(last_checkpoint).fold(0.0, f32::max) + DEFAULT_TAIL_SECS
    }

    /// Every moment the replay stops at: regular ticks plus exact checkpoint
    /// times, ascending and without duplicates
    pub fn tick_times(&self) -> Vec<f32> {
        let duration = self.duration_secs();
        let step = self.meta.tick_secs;
        let mut times: Vec<f32> = (0..)
            .map(|i| i as f32 * step)
            .take_while(|t| *t <= duration)
            .collect();
        times.extend(self.checkpoints.iter().map(|c| c.at_secs));
        times.sort_by(f32::total_cmp);
        times.dedup_by(|a, b| (*a - *b).abs() < 1e-4);
        times
    }

    pub fn time_at(&self, secs: f32) -> NaiveDateTime {
        add_secs(self.meta.start, secs)
    }
}

impl ScriptedEvent {
    /// Apply the scripted side effects that have no world event (spawn
    /// placement, movement) and build the event to deliver, if any
    pub fn realize(&self, world: &mut WorldState, start: NaiveDateTime) -> Option<WorldEvent> {
        let timestamp = add_secs(start, self.at_secs);
        match &self.action {
            ScriptedAction::CastStarted {
                caster,
                action,
                cast_time,
                target,
                location,
                rotation_deg,
                interruptible,
            } => {
                let source = world.actor(ActorId(*caster))?;
                let cast = CastInfo {
                    action: ActionId(*action),
                    target: target.map(ActorId),
                    location: location.unwrap_or(source.position),
                    rotation: rotation_deg.map(Angle::from_degrees).unwrap_or(source.rotation),
                    started_at: timestamp,
                    total_time_secs: *cast_time,
                    interruptible: *interruptible,
                };
                Some(WorldEvent::CastStarted {
                    caster: ActorId(*caster),
                    cast,
                    timestamp,
                })
            }
            ScriptedAction::CastFinished { caster } => {
                let cast = world.actor(ActorId(*caster))?.cast.clone()?;
                Some(WorldEvent::CastFinished {
                    caster: ActorId(*caster),
                    cast,
                    timestamp,
                })
            }
            ScriptedAction::CastResolved {
                caster,
                action,
                target,
                location,
                targets,
            } => {
                let target = target.map(ActorId);
                let target_pos = location
                    .or_else(|| target.and_then(|t| world.actor(t)).map(|a| a.position))
                    .or_else(|| world.actor(ActorId(*caster)).map(|a| a.position))
                    .unwrap_or_default();
                let mut hit: Vec<ActorId> = targets.iter().copied().map(ActorId).collect();
                if hit.is_empty() {
                    hit.extend(target);
                }
                Some(WorldEvent::CastResolved {
                    caster: ActorId(*caster),
                    event: CastEvent {
                        action: ActionId(*action),
                        main_target: target,
                        target_pos,
                        targets: hit,
                    },
                    timestamp,
                })
            }
            ScriptedAction::StatusGained {
                actor,
                status,
                source,
                duration_secs,
                extra,
            } => Some(WorldEvent::StatusGained {
                actor: ActorId(*actor),
                status: StatusInfo {
                    id: StatusId(*status),
                    source: source.map(ActorId),
                    expires_at: duration_secs.map(|d| add_secs(timestamp, d)),
                    extra: *extra,
                },
                timestamp,
            }),
            ScriptedAction::StatusLost { actor, status } => Some(WorldEvent::StatusLost {
                actor: ActorId(*actor),
                status: StatusInfo {
                    id: StatusId(*status),
                    source: None,
                    expires_at: None,
                    extra: 0,
                },
                timestamp,
            }),
            ScriptedAction::ActorCreated { actor } => {
                world.add_actor(actor.clone());
                Some(WorldEvent::ActorCreated {
                    actor: actor.id,
                    timestamp,
                })
            }
            ScriptedAction::ActorRemoved { actor } => Some(WorldEvent::ActorRemoved {
                actor: ActorId(*actor),
                timestamp,
            }),
            ScriptedAction::Move {
                actor,
                position,
                rotation_deg,
            } => {
                if let Some(moved) = world.actor_mut(ActorId(*actor)) {
                    moved.position = *position;
                    if let Some(deg) = rotation_deg {
                        moved.rotation = Angle::from_degrees(*deg);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        [scenario]
        name = "basic"
        encounter = "test_boss"
        tick_secs = 0.5

        [[actor]]
        id = 100
        oid = 7
        name = "Boss"
        position = { x = 0.0, z = 0.0 }

        [[actor]]
        id = 1
        position = { x = 5.0, z = 0.0 }

        [[party]]
        slot = 0
        actor = 1
        role = "tank"

        [[event]]
        at_secs = 3.0
        kind = "cast_resolved"
        caster = 100
        action = 10
        target = 1

        [[event]]
        at_secs = 1.0
        kind = "cast_started"
        caster = 100
        action = 10
        cast_time = 2.0
        rotation_deg = 90.0

        [[event]]
        at_secs = 2.0
        kind = "move"
        actor = 1
        position = { x = -5.0, z = 0.0 }

        [[checkpoint]]
        at_secs = 1.25
    "#;

    fn scenario() -> Scenario {
        Scenario::from_toml(SCENARIO).unwrap()
    }

    #[test]
    fn parses_world_and_party() {
        let scenario = scenario();
        assert_eq!(scenario.meta.encounter.as_deref(), Some("test_boss"));
        let world = scenario.build_world();
        assert_eq!(world.party_member(0).map(|a| a.id), Some(ActorId(1)));
        assert_eq!(world.party.role(0), PartyRole::Tank);
        assert_eq!(world.actor(ActorId(100)).map(|a| a.oid), Some(7));
        assert_eq!(world.current_time, default_start());
    }

    #[test]
    fn timeline_is_sorted() {
        let times: Vec<f32> = scenario().timeline().iter().map(|e| e.at_secs).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn tick_times_include_checkpoints() {
        let scenario = scenario();
        assert_eq!(scenario.duration_secs(), 4.0);
        let times = scenario.tick_times();
        assert!(times.contains(&1.25));
        assert_eq!(times.first(), Some(&0.0));
        assert_eq!(times.last(), Some(&4.0));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cast_started_defaults_to_caster_position() {
        let scenario = scenario();
        let mut world = scenario.build_world();
        let timeline = scenario.timeline();
        let Some(WorldEvent::CastStarted { cast, timestamp, .. }) =
            timeline[0].realize(&mut world, scenario.meta.start)
        else {
            panic!("expected a cast start");
        };
        assert_eq!(cast.location, WPos::new(0.0, 0.0));
        assert_eq!(cast.rotation, Angle::from_degrees(90.0));
        assert_eq!(timestamp, scenario.time_at(1.0));
    }

    #[test]
    fn resolution_targets_default_to_main_target() {
        let scenario = scenario();
        let mut world = scenario.build_world();
        let timeline = scenario.timeline();
        let Some(WorldEvent::CastResolved { event, .. }) =
            timeline[2].realize(&mut world, scenario.meta.start)
        else {
            panic!("expected a resolution");
        };
        assert_eq!(event.targets, vec![ActorId(1)]);
        assert_eq!(event.target_pos, WPos::new(5.0, 0.0));
    }

    #[test]
    fn move_updates_world_without_event() {
        let scenario = scenario();
        let mut world = scenario.build_world();
        let timeline = scenario.timeline();
        assert!(timeline[1].realize(&mut world, scenario.meta.start).is_none());
        assert_eq!(world.actor(ActorId(1)).unwrap().position, WPos::new(-5.0, 0.0));
    }

    #[test]
    fn cast_finished_without_cast_is_dropped() {
        let scenario = scenario();
        let mut world = scenario.build_world();
        let finished = ScriptedEvent {
            at_secs: 0.5,
            action: ScriptedAction::CastFinished { caster: 100 },
        };
        assert!(finished.realize(&mut world, scenario.meta.start).is_none());
    }

    #[test]
    fn rejects_non_positive_tick() {
        let err = Scenario::from_toml("[scenario]\ntick_secs = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("tick_secs"));
    }
}
