//! Hint aggregation
//!
//! Once per tick, after every event has been delivered and `update` has run,
//! the aggregator asks each active component for its outputs and merges them:
//!
//! - text hints per occupied party slot, in component activation order
//! - one `SafetyPredicate` per slot (unsafe wherever any forbidden zone is)
//! - global hints, predicted damage and interrupt targets
//! - draw commands for the viewing slot
//!
//! Nothing is carried over between ticks.

use chrono::NaiveDateTime;
use telegraph_types::EngineConfig;

use crate::components::ModuleContext;
use crate::geometry::WPos;
use crate::hazard::HazardInstance;
use crate::hints::{AiHints, ForbiddenZone, GlobalHints, PredictedDamage, TextHint, TextHints};
use crate::registry::ComponentRegistry;
use crate::render::{ArenaDraw, DrawCommand, project};
use crate::world::{ActorId, WorldState};

/// Where a player may stand, as the conjunction of every component's advice
#[derive(Debug, Clone, Default)]
pub struct SafetyPredicate {
    forbidden: Vec<ForbiddenZone>,
}

impl SafetyPredicate {
    pub fn new(forbidden: Vec<ForbiddenZone>) -> Self {
        Self { forbidden }
    }

    /// False if any forbidden zone contains `pos`
    pub fn is_safe(&self, pos: WPos) -> bool {
        !self.forbidden.iter().any(|f| f.zone.contains(pos))
    }

    /// Like `is_safe`, ignoring zones that only become dangerous after
    /// `deadline`
    pub fn is_safe_by(&self, pos: WPos, deadline: NaiveDateTime) -> bool {
        !self
            .forbidden
            .iter()
            .any(|f| f.activation <= deadline && f.zone.contains(pos))
    }

    pub fn zones(&self) -> &[ForbiddenZone] {
        &self.forbidden
    }

    /// No component restricts movement
    pub fn is_unconstrained(&self) -> bool {
        self.forbidden.is_empty()
    }

    pub fn earliest_activation(&self) -> Option<NaiveDateTime> {
        self.forbidden.iter().map(|f| f.activation).min()
    }
}

/// Everything one party member should know this tick
#[derive(Debug, Clone)]
pub struct PlayerHints {
    pub slot: usize,
    pub actor: ActorId,
    pub hints: Vec<TextHint>,
    pub safety: SafetyPredicate,
    pub interrupt_targets: Vec<ActorId>,
}

impl PlayerHints {
    /// Any hint that asks the player to act
    pub fn at_risk(&self) -> bool {
        self.hints.iter().any(|h| h.risk)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.hints.iter().map(|h| h.text.as_str())
    }
}

/// Merged output of every active component for one tick
#[derive(Debug, Clone, Default)]
pub struct TickHints {
    pub time: NaiveDateTime,
    pub players: Vec<PlayerHints>,
    pub global: Vec<String>,
    pub predicted_damage: Vec<PredictedDamage>,
    /// Tracked hazards of every component, ordered by activation
    pub hazards: Vec<HazardInstance>,
    /// Arena draw for the viewing slot (empty without a viewer)
    pub draw: Vec<DrawCommand>,
}

impl TickHints {
    pub fn player(&self, slot: usize) -> Option<&PlayerHints> {
        self.players.iter().find(|p| p.slot == slot)
    }
}

/// Collects per-tick hints from a component registry
#[derive(Debug, Clone, Copy, Default)]
pub struct HintAggregator {
    arena_center: WPos,
}

impl HintAggregator {
    pub fn new(arena_center: WPos) -> Self {
        Self { arena_center }
    }

    /// Query every component for the current world snapshot. `viewer` selects
    /// the slot whose arena draw is projected.
    pub fn collect(
        &self,
        registry: &ComponentRegistry,
        world: &WorldState,
        config: &EngineConfig,
        viewer: Option<usize>,
    ) -> TickHints {
        let ctx = ModuleContext::new(world, config, registry.siblings());
        let components: Vec<_> = registry.iter().map(|(_, c)| c).collect();

        let mut players = Vec::new();
        for (slot, actor) in world.party_members() {
            let mut text = TextHints::new();
            let mut ai = AiHints::new();
            for component in &components {
                component.add_hints(&ctx, slot, actor, &mut text);
                if config.ai_hints_enabled {
                    component.add_ai_hints(&ctx, slot, actor, &mut ai);
                }
            }
            let (forbidden, interrupt_targets) = ai.into_parts();
            players.push(PlayerHints {
                slot,
                actor: actor.id,
                hints: text.into_vec(),
                safety: SafetyPredicate::new(forbidden),
                interrupt_targets,
            });
        }
        players.sort_by_key(|p| p.slot);

        let mut global = GlobalHints::default();
        let mut predicted_damage = Vec::new();
        let mut hazards = Vec::new();
        for component in &components {
            component.add_global_hints(&ctx, &mut global);
            if config.ai_hints_enabled {
                component.add_predicted_damage(&ctx, &mut predicted_damage);
            }
            hazards.extend(component.active_hazards(&ctx));
        }
        hazards.sort_by_key(|h| h.activation);

        let draw = viewer
            .and_then(|slot| world.party_member(slot).map(|pc| (slot, pc)))
            .map(|(slot, pc)| {
                let mut arena = ArenaDraw::new();
                for component in &components {
                    component.draw_arena(&ctx, slot, pc, &mut arena);
                }
                project(&arena, config, self.arena_center)
            })
            .unwrap_or_default();

        TickHints {
            time: world.current_time,
            players,
            global: global.into_vec(),
            predicted_damage,
            hazards,
            draw,
        }
    }
}
