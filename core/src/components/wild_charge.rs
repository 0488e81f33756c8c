//! Wild charge: a line AOE from a source to one or more targets that other
//! players share by standing inside it.
//!
//! Some roles have to be the closest raid member to the source (usually
//! tanks), others have to hide behind them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::geometry::{WDir, WPos, Zone};
use crate::hazard::HazardColor;
use crate::hints::{AiHints, DamageKind, PredictedDamage, TextHints};
use crate::render::ArenaDraw;
use crate::world::{ActionId, Actor, ActorId, CastInfo, MAX_ALLIES, PlayerMask};

/// What a party slot has to do about the charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// Not involved; gets no hints
    #[default]
    Ignore,
    /// Charge target
    Target,
    /// Charge target that must hide behind another raid member
    TargetNotFirst,
    /// Must stay inside a lane
    Share,
    /// Must stay inside a lane, but not as the closest raid member
    ShareNotFirst,
    /// Must stay out of every lane
    Avoid,
}

impl PlayerRole {
    pub fn is_target(self) -> bool {
        matches!(self, PlayerRole::Target | PlayerRole::TargetNotFirst)
    }

    pub fn is_share(self) -> bool {
        matches!(self, PlayerRole::Share | PlayerRole::ShareNotFirst)
    }
}

/// Role handout used when a watched cast activates the charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildChargeRoles {
    /// Role of the cast target
    #[serde(default = "default_target_role")]
    pub target: PlayerRole,
    #[serde(default = "default_share_role")]
    pub tank: PlayerRole,
    #[serde(default = "default_share_role")]
    pub others: PlayerRole,
}

fn default_target_role() -> PlayerRole {
    PlayerRole::Target
}

fn default_share_role() -> PlayerRole {
    PlayerRole::Share
}

impl Default for WildChargeRoles {
    fn default() -> Self {
        Self {
            target: default_target_role(),
            tank: default_share_role(),
            others: default_share_role(),
        }
    }
}

/// Rectangular charge corridor, starting at the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub origin: WPos,
    pub direction: WDir,
    pub length: f32,
}

impl Lane {
    pub fn contains(&self, pos: WPos, half_width: f32) -> bool {
        pos.in_rect(self.origin, self.direction, self.length, 0.0, half_width)
    }

    pub fn zone(&self, half_width: f32) -> Zone {
        Zone::rect(self.origin, self.direction, self.length, 0.0, half_width)
    }
}

#[derive(Debug, Clone)]
pub struct GenericWildCharge {
    half_width: f32,
    /// 0 means the lane runs up to the target
    fixed_length: f32,
    action: Option<ActionId>,
    assignment: WildChargeRoles,
    source: Option<ActorId>,
    activation: NaiveDateTime,
    roles: [PlayerRole; MAX_ALLIES],
}

impl GenericWildCharge {
    pub fn new(half_width: f32) -> Self {
        Self {
            half_width,
            fixed_length: 0.0,
            action: None,
            assignment: WildChargeRoles::default(),
            source: None,
            activation: NaiveDateTime::default(),
            roles: [PlayerRole::Ignore; MAX_ALLIES],
        }
    }

    pub fn with_fixed_length(mut self, length: f32) -> Self {
        self.fixed_length = length;
        self
    }

    /// Activate automatically when `action` starts casting, handing out
    /// roles per `assignment`
    pub fn activated_by(mut self, action: ActionId, assignment: WildChargeRoles) -> Self {
        self.action = Some(action);
        self.assignment = assignment;
        self
    }

    pub fn source(&self) -> Option<ActorId> {
        self.source
    }

    pub fn activation(&self) -> NaiveDateTime {
        self.activation
    }

    /// Start (or stop, with `None`) the mechanic
    pub fn set_source(&mut self, source: Option<ActorId>, activation: NaiveDateTime) {
        self.source = source;
        self.activation = activation;
    }

    pub fn set_role(&mut self, slot: usize, role: PlayerRole) {
        if let Some(r) = self.roles.get_mut(slot) {
            *r = role;
        }
    }

    pub fn role(&self, slot: usize) -> PlayerRole {
        self.roles.get(slot).copied().unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.source = None;
        self.roles = [PlayerRole::Ignore; MAX_ALLIES];
    }

    fn source_position(&self, ctx: &ModuleContext<'_>) -> Option<WPos> {
        self.source.and_then(|id| ctx.world.actor(id)).map(|a| a.position)
    }

    fn lane_to(&self, source: WPos, target: WPos) -> Lane {
        let to_target = target - source;
        let length = if self.fixed_length > 0.0 {
            self.fixed_length
        } else {
            to_target.length()
        };
        Lane {
            origin: source,
            direction: to_target.normalized(),
            length,
        }
    }

    /// Lanes toward every target, optionally skipping one slot's own lane
    fn lanes(&self, ctx: &ModuleContext<'_>, skip_slot: Option<usize>) -> Vec<Lane> {
        let Some(source) = self.source_position(ctx) else {
            return Vec::new();
        };
        ctx.world
            .party_members()
            .filter(|(slot, _)| Some(*slot) != skip_slot && self.role(*slot).is_target())
            .map(|(_, p)| self.lane_to(source, p.position))
            .collect()
    }

    /// Whether a player with one of the given roles stands in the lane
    /// strictly closer to its origin than `threshold_sq`
    fn any_role_closer(&self, ctx: &ModuleContext<'_>, lane: &Lane, roles: [PlayerRole; 2], threshold_sq: f32) -> bool {
        ctx.world.party_members().any(|(slot, p)| {
            roles.contains(&self.role(slot))
                && lane.contains(p.position, self.half_width)
                && p.position.distance_sq(lane.origin) < threshold_sq
        })
    }
}

impl Component for GenericWildCharge {
    fn on_cast_started(&mut self, ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if self.action != Some(cast.action) {
            return;
        }
        self.roles = [PlayerRole::Ignore; MAX_ALLIES];
        for (slot, player) in ctx.world.party_members() {
            self.roles[slot] = if cast.target == Some(player.id) {
                self.assignment.target
            } else if ctx.world.party.role(slot).is_tank() {
                self.assignment.tank
            } else {
                self.assignment.others
            };
        }
        self.set_source(Some(caster.id), cast.activation(0.0));
    }

    fn on_cast_finished(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, cast: &CastInfo) {
        if self.action == Some(cast.action) && self.source == Some(caster.id) {
            self.reset();
        }
    }

    fn on_cast_resolved(&mut self, _ctx: &ModuleContext<'_>, caster: &Actor, event: &CastEvent) {
        if self.action == Some(event.action) && self.source == Some(caster.id) {
            self.reset();
        }
    }

    fn on_actor_removed(&mut self, _ctx: &ModuleContext<'_>, actor: ActorId) {
        if self.source == Some(actor) {
            self.reset();
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        if self.action.is_some()
            && self.source.is_some()
            && ctx.now() > crate::world::add_secs(self.activation, ctx.config.hazard_expiry_grace_secs)
        {
            tracing::debug!("Expired unresolved wild charge");
            self.reset();
        }
    }

    fn add_hints(&self, ctx: &ModuleContext<'_>, slot: usize, actor: &Actor, hints: &mut TextHints) {
        let Some(source) = self.source_position(ctx) else {
            return;
        };
        let own_distance_sq = actor.position.distance_sq(source);

        match self.role(slot) {
            PlayerRole::Ignore | PlayerRole::Target => {}
            PlayerRole::TargetNotFirst => {
                if self
                    .lanes(ctx, Some(slot))
                    .iter()
                    .any(|lane| lane.contains(actor.position, self.half_width))
                {
                    hints.add("GTFO from other charges!");
                } else {
                    let own = self.lane_to(source, actor.position);
                    if !self.any_role_closer(ctx, &own, [PlayerRole::Share, PlayerRole::Share], own_distance_sq) {
                        hints.add("Hide behind tank!");
                    }
                }
            }
            role @ (PlayerRole::Share | PlayerRole::ShareNotFirst) => {
                let mut num_shares = 0;
                let mut bad_share = false;
                for lane in self
                    .lanes(ctx, None)
                    .iter()
                    .filter(|lane| lane.contains(actor.position, self.half_width))
                {
                    num_shares += 1;
                    if num_shares > 1 {
                        break;
                    }
                    bad_share = if role == PlayerRole::Share {
                        self.any_role_closer(
                            ctx,
                            lane,
                            [PlayerRole::ShareNotFirst, PlayerRole::TargetNotFirst],
                            own_distance_sq,
                        )
                    } else {
                        !self.any_role_closer(ctx, lane, [PlayerRole::Share, PlayerRole::Target], own_distance_sq)
                    };
                }
                if num_shares == 0 {
                    hints.add("Stay inside charge!");
                } else if num_shares > 1 {
                    hints.add("Stay in single charge!");
                } else if bad_share {
                    hints.add(if role == PlayerRole::Share {
                        "Move closer to charge source!"
                    } else {
                        "Hide behind tank!"
                    });
                }
            }
            PlayerRole::Avoid => {
                if self
                    .lanes(ctx, None)
                    .iter()
                    .any(|lane| lane.contains(actor.position, self.half_width))
                {
                    hints.add("GTFO from charge!");
                }
            }
        }
    }

    fn add_ai_hints(&self, ctx: &ModuleContext<'_>, slot: usize, actor: &Actor, hints: &mut AiHints) {
        let Some(source) = self.source_position(ctx) else {
            return;
        };
        match self.role(slot) {
            PlayerRole::Ignore => {}
            PlayerRole::Target | PlayerRole::TargetNotFirst => {
                // Line up with the closest sharer
                let mut closest: Option<(f32, WPos)> = None;
                for (other, p) in ctx.world.party_members() {
                    if !self.role(other).is_share() {
                        continue;
                    }
                    let d = p.position.distance_sq(actor.position);
                    if closest.is_none_or(|(best, _)| d < best) {
                        closest = Some((d, p.position));
                    }
                }
                if let Some((_, pos)) = closest {
                    let lane = self.lane_to(source, pos);
                    hints.add_forbidden_zone(lane.zone(self.half_width * 0.5).invert(), self.activation);
                }
            }
            PlayerRole::Share | PlayerRole::ShareNotFirst => {
                let lanes = self.lanes(ctx, None);
                if !lanes.is_empty() {
                    let outside_all = lanes.iter().map(|l| l.zone(self.half_width).invert()).collect();
                    hints.add_forbidden_zone(Zone::Intersection(outside_all), self.activation);
                }
            }
            PlayerRole::Avoid => {
                let lanes = self.lanes(ctx, None);
                if !lanes.is_empty() {
                    let inside_any = lanes.iter().map(|l| l.zone(self.half_width)).collect();
                    hints.add_forbidden_zone(Zone::Union(inside_any), self.activation);
                }
            }
        }
    }

    fn add_predicted_damage(&self, ctx: &ModuleContext<'_>, out: &mut Vec<PredictedDamage>) {
        for lane in self.lanes(ctx, None) {
            let players: PlayerMask = ctx
                .world
                .party_members()
                .filter(|(_, p)| lane.contains(p.position, self.half_width))
                .map(|(slot, _)| slot)
                .collect();
            out.push(PredictedDamage {
                activation: self.activation,
                players,
                kind: DamageKind::Shared,
            });
        }
    }

    fn draw_arena(&self, ctx: &ModuleContext<'_>, pc_slot: usize, _pc: &Actor, arena: &mut ArenaDraw) {
        let role = self.role(pc_slot);
        if role == PlayerRole::Ignore {
            return;
        }
        let color = if role == PlayerRole::Avoid {
            HazardColor::Danger
        } else {
            HazardColor::Safe
        };
        for lane in self.lanes(ctx, None) {
            arena.zone_rect(lane.origin, lane.direction, lane.length, 0.0, self.half_width, color);
        }
    }
}
