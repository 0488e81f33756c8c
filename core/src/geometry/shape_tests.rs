//! Tests for shape containment and boolean composition
//!
//! Verifies that:
//! - Primitive shapes honor their closed-form bounds (inclusive edges)
//! - Union / Intersection / Invert behave as ||, && and !
//! - Facing rotates shapes around their anchor

use proptest::prelude::*;

use super::{Angle, Shape, WDir, WPos};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const NORTH: WDir = WDir::new(0.0, 1.0);

fn origin() -> WPos {
    WPos::new(0.0, 0.0)
}

fn primitive() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (0.5f32..20.0).prop_map(Shape::circle),
        (0.5f32..10.0, 0.5f32..10.0).prop_map(|(inner, extra)| Shape::donut(inner, inner + extra)),
        (0.5f32..20.0, 1.0f32..179.0)
            .prop_map(|(r, deg)| Shape::cone(r, Angle::from_degrees(deg))),
        (0.5f32..20.0, 0.0f32..5.0, 0.5f32..10.0).prop_map(|(front, back, hw)| Shape::Rect {
            length_front: front,
            length_back: back,
            half_width: hw,
        }),
    ]
}

fn point() -> impl Strategy<Value = WPos> {
    (-25.0f32..25.0, -25.0f32..25.0).prop_map(|(x, z)| WPos::new(x, z))
}

fn facing() -> impl Strategy<Value = WDir> {
    (-180.0f32..180.0).prop_map(|deg| Angle::from_degrees(deg).to_direction())
}

// ═══════════════════════════════════════════════════════════════════════════
// Primitive Shapes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rect_inclusive_edges() {
    let rect = Shape::rect(10.0, 2.0);
    assert!(rect.contains(origin(), NORTH, WPos::new(0.0, 0.0)));
    assert!(rect.contains(origin(), NORTH, WPos::new(2.0, 10.0)), "corner is inside");
    assert!(rect.contains(origin(), NORTH, WPos::new(-2.0, 5.0)), "side edge is inside");
    assert!(!rect.contains(origin(), NORTH, WPos::new(2.01, 5.0)));
    assert!(!rect.contains(origin(), NORTH, WPos::new(0.0, 10.01)));
    assert!(!rect.contains(origin(), NORTH, WPos::new(0.0, -0.01)), "no back length");
}

#[test]
fn test_rect_back_length() {
    let rect = Shape::Rect {
        length_front: 5.0,
        length_back: 3.0,
        half_width: 1.0,
    };
    assert!(rect.contains(origin(), NORTH, WPos::new(0.0, -3.0)));
    assert!(!rect.contains(origin(), NORTH, WPos::new(0.0, -3.5)));
}

#[test]
fn test_rect_follows_facing() {
    let rect = Shape::rect(10.0, 1.0);
    let east = Angle::from_degrees(90.0).to_direction();
    assert!(rect.contains(origin(), east, WPos::new(8.0, 0.5)));
    assert!(!rect.contains(origin(), east, WPos::new(0.5, 8.0)));
}

#[test]
fn test_circle_and_donut() {
    let circle = Shape::circle(5.0);
    assert!(circle.contains(origin(), NORTH, WPos::new(3.0, 4.0)), "edge is inside");
    assert!(!circle.contains(origin(), NORTH, WPos::new(3.0, 4.1)));

    let donut = Shape::donut(5.0, 40.0);
    assert!(!donut.contains(origin(), NORTH, WPos::new(1.0, 1.0)), "hole is safe");
    assert!(donut.contains(origin(), NORTH, WPos::new(5.0, 0.0)));
    assert!(donut.contains(origin(), NORTH, WPos::new(20.0, 0.0)));
    assert!(!donut.contains(origin(), NORTH, WPos::new(41.0, 0.0)));
}

#[test]
fn test_cone_uses_facing_as_zero_angle() {
    let cone = Shape::cone(20.0, Angle::from_degrees(45.0));
    assert!(cone.contains(origin(), NORTH, WPos::new(0.0, 10.0)));
    assert!(cone.contains(origin(), NORTH, WPos::new(4.0, 5.0)));
    assert!(!cone.contains(origin(), NORTH, WPos::new(6.0, 5.0)));
    assert!(!cone.contains(origin(), NORTH, WPos::new(5.0, -5.0)));
    assert!(!cone.contains(origin(), NORTH, WPos::new(0.0, 21.0)));

    let south = Angle::from_degrees(180.0).to_direction();
    assert!(cone.contains(origin(), south, WPos::new(0.0, -10.0)));
    assert!(!cone.contains(origin(), south, WPos::new(0.0, 10.0)));
}

#[test]
fn test_polygon_is_rotated_with_anchor() {
    // Triangle pointing forward
    let tri = Shape::Polygon {
        vertices: vec![WDir::new(-1.0, 0.0), WDir::new(1.0, 0.0), WDir::new(0.0, 4.0)],
    };
    assert!(tri.contains(origin(), NORTH, WPos::new(0.0, 2.0)));
    assert!(tri.contains(origin(), NORTH, WPos::new(1.0, 0.0)), "vertex is inside");
    assert!(!tri.contains(origin(), NORTH, WPos::new(0.0, -1.0)));

    let east = Angle::from_degrees(90.0).to_direction();
    assert!(tri.contains(origin(), east, WPos::new(2.0, 0.0)));
    assert!(!tri.contains(origin(), east, WPos::new(0.0, 2.0)));
}

#[test]
fn test_convexity() {
    assert!(Shape::circle(1.0).is_convex());
    assert!(Shape::cone(5.0, Angle::from_degrees(30.0)).is_convex());
    assert!(!Shape::cone(5.0, Angle::from_degrees(120.0)).is_convex());
    assert!(!Shape::donut(1.0, 2.0).is_convex());
}

// ═══════════════════════════════════════════════════════════════════════════
// Boolean Composition Laws
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn union_is_or(a in primitive(), b in primitive(), p in point(), dir in facing()) {
        let o = origin();
        let union = Shape::union(vec![a.clone(), b.clone()]);
        prop_assert_eq!(union.contains(o, dir, p), a.contains(o, dir, p) || b.contains(o, dir, p));
    }

    #[test]
    fn intersection_is_and(a in primitive(), b in primitive(), p in point(), dir in facing()) {
        let o = origin();
        let inter = Shape::intersection(vec![a.clone(), b.clone()]);
        prop_assert_eq!(inter.contains(o, dir, p), a.contains(o, dir, p) && b.contains(o, dir, p));
    }

    #[test]
    fn invert_is_not(a in primitive(), p in point(), dir in facing()) {
        let o = origin();
        let inv = Shape::invert(a.clone());
        prop_assert_eq!(inv.contains(o, dir, p), !a.contains(o, dir, p));
    }
}
