//! Encounter definition types
//!
//! Definitions are loaded from TOML files and describe one fight: the
//! mechanic components it uses and the phases that switch them on.
//!
//! ```toml
//! [encounter]
//! id = "the_dreamer"
//! name = "The Dreamer"
//!
//! [[component]]
//! name = "bladestorm"
//! type = "simple_aoes"
//! action = 39044
//! shape = { type = "circle", radius = 8.0 }
//!
//! [[phase]]
//! name = "opening"
//! components = ["bladestorm"]
//! ```

use serde::{Deserialize, Serialize};

use crate::components::{AoeOrigin, WildChargeRoles};
use crate::geometry::{Angle, Shape, WPos};
use crate::serde_defaults::{
    default_end_count, default_hit_timeout_secs, default_max_stack_size, default_min_stack_size,
    default_one, default_risky_window_secs,
};
use crate::world::{ActionId, StatusId};

// ═══════════════════════════════════════════════════════════════════════════
// Root Config Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Encounter header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterInfo {
    /// Stable identifier, used for lookups and file names
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Arena center, used as the backdrop for inverted shapes
    #[serde(default)]
    pub arena_center: WPos,
}

/// Root structure of an encounter file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterDefinition {
    #[serde(rename = "encounter")]
    pub info: EncounterInfo,

    #[serde(default, rename = "component")]
    pub components: Vec<ComponentDefinition>,

    /// Phases in the order the fight moves through them. With no phases, every
    /// component is active for the whole fight.
    #[serde(default, rename = "phase")]
    pub phases: Vec<PhaseDefinition>,
}

impl EncounterDefinition {
    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Phases as the encounter runs them, synthesizing a single phase holding
    /// every component when the file defines none
    pub fn effective_phases(&self) -> Vec<PhaseDefinition> {
        if !self.phases.is_empty() {
            return self.phases.clone();
        }
        vec![PhaseDefinition {
            name: "main".to_string(),
            trigger: PhaseTrigger::EncounterStart,
            components: self.components.iter().map(|c| c.name.clone()).collect(),
        }]
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Components
// ═══════════════════════════════════════════════════════════════════════════

/// A named mechanic component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Unique within the encounter; phases and siblings refer to it by name
    pub name: String,

    #[serde(flatten)]
    pub kind: ComponentKind,
}

/// Mechanic component parameters, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    /// One hazard per cast of `action`
    SimpleAoes {
        action: ActionId,
        shape: Shape,
        #[serde(default)]
        origin: AoeOrigin,
        #[serde(default)]
        max_casts: Option<usize>,
        #[serde(default = "default_risky_window_secs")]
        risky_window_secs: f32,
        #[serde(default)]
        extra_delay_secs: f32,
        /// Standing inside the shape is what keeps players alive
        #[serde(default)]
        safe_inside: bool,
        /// The caster repeats the AOE this long after each cast finishes
        #[serde(default)]
        repeat_after_secs: Option<f32>,
    },

    RaidwideCast {
        action: ActionId,
        #[serde(default)]
        hint: Option<String>,
    },

    /// Raidwide whose damage lands `delay_secs` after the visual cast ends
    RaidwideCastDelay {
        visual_action: ActionId,
        damage_action: ActionId,
        delay_secs: f32,
        #[serde(default)]
        hint: Option<String>,
    },

    Tankbuster {
        action: ActionId,
        #[serde(default)]
        delayable: bool,
        #[serde(default)]
        hint: Option<String>,
    },

    Stack {
        action: ActionId,
        radius: f32,
        #[serde(default = "default_min_stack_size")]
        min_size: usize,
        #[serde(default = "default_max_stack_size")]
        max_size: usize,
    },

    Spread {
        action: ActionId,
        radius: f32,
    },

    Towers {
        action: ActionId,
        radius: f32,
        #[serde(default = "default_one")]
        min_soakers: usize,
        #[serde(default = "default_one")]
        max_soakers: usize,
        /// Name of a `stack` component whose active stacks close the towers
        #[serde(default)]
        suppressed_by: Option<String>,
    },

    Interrupt {
        action: ActionId,
        /// The cast can only be stopped by a stun
        #[serde(default)]
        stun: bool,
    },

    Intercept {
        action: ActionId,
        protected_oid: u32,
        #[serde(default)]
        resolve_action: Option<ActionId>,
        #[serde(default)]
        extra_delay_secs: f32,
    },

    WildCharge {
        action: ActionId,
        half_width: f32,
        /// Lane length; 0 runs the lane up to the target
        #[serde(default)]
        fixed_length: f32,
        #[serde(default)]
        roles: WildChargeRoles,
    },

    SpawnAoes {
        oid: u32,
        shape: Shape,
        delay_secs: f32,
        #[serde(default)]
        clear_action: Option<ActionId>,
    },

    SafeZone {
        trigger_action: ActionId,
        clear_action: ActionId,
        shape: Shape,
        #[serde(default)]
        rotation_offset: Angle,
        #[serde(default)]
        hint: Option<String>,
    },

    Cleansable {
        status: StatusId,
        /// Debuff name shown in hints
        debuff: String,
    },

    CastHint {
        start_action: ActionId,
        hint: String,
        /// Actions whose resolutions end the hint; empty means the start
        /// action itself
        #[serde(default)]
        end_actions: Vec<ActionId>,
        #[serde(default = "default_end_count")]
        end_count: u32,
        /// Hide the hint when no counted hit arrives for this long
        #[serde(default = "default_hit_timeout_secs")]
        hit_timeout_secs: f32,
    },

    CastCounter {
        action: ActionId,
    },
}

impl ComponentKind {
    /// Short type label for logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::SimpleAoes { .. } => "simple_aoes",
            ComponentKind::RaidwideCast { .. } => "raidwide_cast",
            ComponentKind::RaidwideCastDelay { .. } => "raidwide_cast_delay",
            ComponentKind::Tankbuster { .. } => "tankbuster",
            ComponentKind::Stack { .. } => "stack",
            ComponentKind::Spread { .. } => "spread",
            ComponentKind::Towers { .. } => "towers",
            ComponentKind::Interrupt { .. } => "interrupt",
            ComponentKind::Intercept { .. } => "intercept",
            ComponentKind::WildCharge { .. } => "wild_charge",
            ComponentKind::SpawnAoes { .. } => "spawn_aoes",
            ComponentKind::SafeZone { .. } => "safe_zone",
            ComponentKind::Cleansable { .. } => "cleansable",
            ComponentKind::CastHint { .. } => "cast_hint",
            ComponentKind::CastCounter { .. } => "cast_counter",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Phases
// ═══════════════════════════════════════════════════════════════════════════

/// A named set of components that are active together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub name: String,

    /// What moves the fight from the previous phase into this one. Ignored for
    /// the first phase, which starts with the encounter.
    #[serde(default, alias = "start_trigger")]
    pub trigger: PhaseTrigger,

    #[serde(default)]
    pub components: Vec<String>,
}

/// Condition that enters a phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseTrigger {
    #[default]
    EncounterStart,

    CastStarted {
        action: ActionId,
    },

    CastResolved {
        action: ActionId,
    },

    /// An actor with this object id appears
    ActorCreated {
        oid: u32,
    },

    StatusGained {
        status: StatusId,
    },

    /// A `cast_counter` component of the current phase reached `count`
    CounterReached {
        counter: String,
        count: u32,
    },

    /// Seconds since the current phase started
    Elapsed {
        secs: f32,
    },
}
