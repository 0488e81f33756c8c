pub mod aggregator;
pub mod components;
pub mod context;
pub mod dsl;
pub mod encounter;
pub mod events;
pub mod geometry;
pub mod hazard;
pub mod hints;
pub mod registry;
pub mod render;
pub mod serde_defaults;
pub mod world;

// Re-exports for convenience
pub use aggregator::{HintAggregator, PlayerHints, SafetyPredicate, TickHints};
pub use components::{Component, ModuleContext};
pub use context::{ConfigError, EngineConfig, EngineConfigExt, default_encounter_directory};
pub use dsl::{
    ComponentDefinition, ComponentKind, EncounterDefinition, EncounterError, PhaseDefinition,
    PhaseTrigger, load_encounter_file, load_encounters_from_dir,
};
pub use encounter::{Encounter, PhaseChange};
pub use events::{CastEvent, StatusInfo, WorldEvent};
pub use geometry::{Angle, Shape, WDir, WPos, Zone};
pub use hazard::{HazardColor, HazardInstance};
pub use hints::{DamageKind, PredictedDamage, TextHint};
pub use registry::{ComponentHandle, ComponentRegistry};
pub use render::{ArenaDraw, DrawCommand};
pub use world::{ActionId, Actor, ActorId, CastInfo, MAX_ALLIES, PlayerMask, StatusId, WorldState};
