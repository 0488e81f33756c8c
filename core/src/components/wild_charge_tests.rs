//! Tests for the wild charge component
//!
//! Verifies that:
//! - each role gets the right text hints for its position
//! - AI zones keep sharers inside and avoiders outside the lanes
//! - declarative activation hands out roles and clears them on resolution

use telegraph_types::PartyRole;

use crate::hazard::HazardColor;
use crate::hints::DamageKind;
use crate::render::ArenaDraw;
use crate::world::{ActionId, ActorId, PlayerMask};

use super::test_support::*;
use super::{Component, GenericWildCharge, PlayerRole, WildChargeRoles};

const CHARGE: u32 = 50;
const HALF_WIDTH: f32 = 2.0;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Source boss at the origin, charge armed with the given roles
fn make_charge(positions: &[(f32, f32)], roles: &[PlayerRole]) -> Harness<GenericWildCharge> {
    let mut world = party_world(positions);
    let boss = add_boss(&mut world, BOSS_ID, 0.0, 0.0);
    let mut charge = GenericWildCharge::new(HALF_WIDTH);
    for (slot, role) in roles.iter().enumerate() {
        charge.set_role(slot, *role);
    }
    charge.set_source(Some(boss), at(5.0));
    Harness::new(world, charge)
}

// ═══════════════════════════════════════════════════════════════════════════
// Text hints
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn target_hidden_behind_sharer_is_fine() {
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0)],
        &[PlayerRole::TargetNotFirst, PlayerRole::Share],
    );
    assert!(h.hints(0).is_empty());
    assert!(h.hints(1).is_empty());
}

#[test]
fn exposed_target_must_hide() {
    let h = make_charge(
        &[(0.0, 10.0), (20.0, 0.0)],
        &[PlayerRole::TargetNotFirst, PlayerRole::Share],
    );
    assert_eq!(h.hints(0), vec!["Hide behind tank!"]);
    assert_eq!(h.hints(1), vec!["Stay inside charge!"]);
}

#[test]
fn sharer_at_equal_distance_is_not_closer() {
    // Stacked exactly on the target: a tie does not count as cover
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 10.0)],
        &[PlayerRole::TargetNotFirst, PlayerRole::Share],
    );
    assert_eq!(h.hints(0), vec!["Hide behind tank!"]);
    assert!(h.hints(1).is_empty());
}

#[test]
fn sharer_in_two_lanes() {
    let h = make_charge(
        &[(0.0, 10.0), (1.0, 10.0), (0.5, 3.0)],
        &[PlayerRole::Target, PlayerRole::Target, PlayerRole::Share],
    );
    assert_eq!(h.hints(2), vec!["Stay in single charge!"]);
    assert!(h.hints(0).is_empty(), "plain targets get no advice");
}

#[test]
fn target_inside_another_charge() {
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0), (0.0, 3.0)],
        &[PlayerRole::Target, PlayerRole::TargetNotFirst, PlayerRole::Share],
    );
    assert_eq!(h.hints(1), vec!["GTFO from other charges!"]);
}

#[test]
fn share_order_within_a_lane() {
    // Tank further out than the player meant to hide behind them
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 8.0), (0.0, 4.0)],
        &[PlayerRole::Target, PlayerRole::Share, PlayerRole::ShareNotFirst],
    );
    assert_eq!(h.hints(1), vec!["Move closer to charge source!"]);
    assert_eq!(h.hints(2), vec!["Hide behind tank!"]);

    let h = make_charge(
        &[(0.0, 10.0), (0.0, 4.0), (0.0, 8.0)],
        &[PlayerRole::Target, PlayerRole::Share, PlayerRole::ShareNotFirst],
    );
    assert!(h.hints(1).is_empty());
    assert!(h.hints(2).is_empty());
}

#[test]
fn avoider_in_lane() {
    let mut h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0)],
        &[PlayerRole::Target, PlayerRole::Avoid],
    );
    assert_eq!(h.hints(1), vec!["GTFO from charge!"]);
    move_player(&mut h.world, 1, 5.0, 5.0);
    assert!(h.hints(1).is_empty());
}

#[test]
fn fixed_length_lane_runs_past_target() {
    let mut h = make_charge(
        &[(0.0, 10.0), (0.0, 15.0)],
        &[PlayerRole::Target, PlayerRole::Avoid],
    );
    assert!(h.hints(1).is_empty());
    h.component = {
        let mut charge = GenericWildCharge::new(HALF_WIDTH).with_fixed_length(20.0);
        charge.set_role(0, PlayerRole::Target);
        charge.set_role(1, PlayerRole::Avoid);
        charge.set_source(Some(ActorId(BOSS_ID)), at(5.0));
        charge
    };
    assert_eq!(h.hints(1), vec!["GTFO from charge!"]);
}

#[test]
fn inactive_charge_is_silent() {
    let mut h = make_charge(
        &[(0.0, 10.0), (20.0, 0.0)],
        &[PlayerRole::TargetNotFirst, PlayerRole::Share],
    );
    h.component.set_source(None, at(5.0));
    assert!(h.hints(0).is_empty());
    assert!(h.hints(1).is_empty());
    assert!(h.ai_hints(1).forbidden_zones().is_empty());
    assert!(h.predicted_damage().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// AI hints, damage and drawing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn sharer_must_stay_in_a_lane() {
    let h = make_charge(
        &[(0.0, 10.0), (10.0, 0.0)],
        &[PlayerRole::Target, PlayerRole::Share],
    );
    assert!(h.forbidden_at(1, 10.0, 0.0));
    assert!(!h.forbidden_at(1, 0.0, 5.0));
    assert!(!h.forbidden_at(1, 1.9, 5.0));
}

#[test]
fn avoider_must_leave_every_lane() {
    let h = make_charge(
        &[(0.0, 10.0), (10.0, 0.0), (3.0, 3.0)],
        &[PlayerRole::Target, PlayerRole::Target, PlayerRole::Avoid],
    );
    assert!(h.forbidden_at(2, 0.0, 5.0));
    assert!(h.forbidden_at(2, 5.0, 0.0));
    assert!(!h.forbidden_at(2, 5.0, 5.0));
}

#[test]
fn target_lines_up_with_closest_sharer() {
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0), (10.0, 0.0)],
        &[PlayerRole::Target, PlayerRole::Share, PlayerRole::ShareNotFirst],
    );
    // Corridor toward slot 1 at (0, 5), half of the lane width
    assert!(!h.forbidden_at(0, 0.5, 3.0));
    assert!(h.forbidden_at(0, 1.5, 3.0));
    assert!(h.forbidden_at(0, 0.0, 10.0), "corridor ends at the sharer");
}

#[test]
fn lanes_predict_shared_damage() {
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0), (10.0, 0.0)],
        &[PlayerRole::Target, PlayerRole::Share, PlayerRole::Share],
    );
    let damage = h.predicted_damage();
    assert_eq!(damage.len(), 1);
    assert_eq!(damage[0].kind, DamageKind::Shared);
    assert_eq!(damage[0].activation, at(5.0));
    assert_eq!(damage[0].players, [0, 1].into_iter().collect::<PlayerMask>());
}

#[test]
fn lane_color_depends_on_viewer_role() {
    let h = make_charge(
        &[(0.0, 10.0), (0.0, 5.0), (10.0, 0.0), (20.0, 0.0)],
        &[PlayerRole::Target, PlayerRole::Share, PlayerRole::Avoid, PlayerRole::Ignore],
    );
    let draw_for = |slot: usize| {
        let mut arena = ArenaDraw::new();
        let pc = h.world.party_member(slot).unwrap();
        h.component.draw_arena(&h.ctx(), slot, pc, &mut arena);
        arena
    };
    assert_eq!(draw_for(1).zones()[0].color, HazardColor::Safe);
    assert_eq!(draw_for(2).zones()[0].color, HazardColor::Danger);
    assert!(draw_for(3).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Declarative activation
// ═══════════════════════════════════════════════════════════════════════════

fn make_cast_driven() -> (Harness<GenericWildCharge>, ActorId) {
    let mut world = party_world_with_roles(
        &[(0.0, 5.0), (3.0, 0.0), (0.0, 10.0), (8.0, 8.0)],
        &[PartyRole::Tank, PartyRole::Healer, PartyRole::Ranged, PartyRole::Unassigned],
    );
    let boss = add_boss(&mut world, BOSS_ID, 0.0, 0.0);
    let charge = GenericWildCharge::new(HALF_WIDTH).activated_by(
        ActionId(CHARGE),
        WildChargeRoles {
            target: PlayerRole::TargetNotFirst,
            tank: PlayerRole::Share,
            others: PlayerRole::ShareNotFirst,
        },
    );
    (Harness::new(world, charge), boss)
}

#[test]
fn cast_assigns_roles_and_resolution_resets() {
    let (mut h, boss) = make_cast_driven();
    h.deliver(cast_started(boss, targeted_cast(CHARGE, 0.0, 5.0, player(2))));

    assert_eq!(h.component.source(), Some(boss));
    assert_eq!(h.component.activation(), at(5.0));
    assert_eq!(h.component.role(0), PlayerRole::Share);
    assert_eq!(h.component.role(1), PlayerRole::ShareNotFirst);
    assert_eq!(h.component.role(2), PlayerRole::TargetNotFirst);
    assert_eq!(h.component.role(3), PlayerRole::ShareNotFirst);
    assert_eq!(h.component.role(4), PlayerRole::Ignore, "empty slot");

    // Tank at (0, 5) covers the target at (0, 10)
    assert!(h.hints(0).is_empty());
    assert!(h.hints(2).is_empty());
    assert_eq!(h.hints(1), vec!["Stay inside charge!"]);

    h.deliver(cast_resolved(boss, CHARGE, 5.0, Some(player(2))));
    assert_eq!(h.component.source(), None);
    assert_eq!(h.component.role(0), PlayerRole::Ignore);
    assert!(h.hints(1).is_empty());
}

#[test]
fn cast_driven_charge_expires() {
    let (mut h, boss) = make_cast_driven();
    h.deliver(cast_started(boss, targeted_cast(CHARGE, 0.0, 5.0, player(2))));
    h.tick(7.0);
    assert!(h.component.source().is_some());
    h.tick(7.1);
    assert!(h.component.source().is_none());
}

#[test]
fn manual_charge_never_expires() {
    let mut h = make_charge(&[(0.0, 10.0)], &[PlayerRole::Target]);
    h.tick(60.0);
    assert!(h.component.source().is_some());
}
