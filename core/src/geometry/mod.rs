//! Planar geometry for arena mechanics
//!
//! The arena is the horizontal X/Z plane. Angles are measured from +Z toward
//! +X, so an actor facing `Angle(0)` looks down +Z.
//!
//! - **WPos / WDir**: world positions and offsets
//! - **Shape**: unanchored hazard shapes (circle, cone, rect, ...) and their
//!   boolean composition
//! - **Zone**: anchored shape predicates used for forbidden-movement zones

mod shape;
mod zone;

#[cfg(test)]
mod shape_tests;

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

pub use shape::Shape;
pub use zone::Zone;

// ═══════════════════════════════════════════════════════════════════════════
// Directions and Angles
// ═══════════════════════════════════════════════════════════════════════════

/// An offset or direction in the arena plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WDir {
    pub x: f32,
    pub z: f32,
}

impl WDir {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn dot(self, other: WDir) -> f32 {
        self.x * other.x + self.z * other.z
    }

    /// 2D cross product (z-component of the 3D cross)
    pub fn cross(self, other: WDir) -> f32 {
        self.x * other.z - self.z * other.x
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn normalized(self) -> WDir {
        let len = self.length();
        if len > 0.0 {
            WDir::new(self.x / len, self.z / len)
        } else {
            self
        }
    }

    /// Perpendicular vector, rotated 90 degrees toward +X when facing +Z
    pub fn ortho_right(self) -> WDir {
        WDir::new(self.z, -self.x)
    }

    /// Rotate by the rotation represented by the unit direction `by`
    /// (forward stays forward, i.e. `(0, 1).rotate(by) == by`).
    pub fn rotate(self, by: WDir) -> WDir {
        WDir::new(
            self.x * by.z + self.z * by.x,
            self.z * by.z - self.x * by.x,
        )
    }

    pub fn to_angle(self) -> Angle {
        Angle(self.x.atan2(self.z))
    }
}

impl Add for WDir {
    type Output = WDir;
    fn add(self, rhs: WDir) -> WDir {
        WDir::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for WDir {
    type Output = WDir;
    fn sub(self, rhs: WDir) -> WDir {
        WDir::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Neg for WDir {
    type Output = WDir;
    fn neg(self) -> WDir {
        WDir::new(-self.x, -self.z)
    }
}

impl Mul<f32> for WDir {
    type Output = WDir;
    fn mul(self, rhs: f32) -> WDir {
        WDir::new(self.x * rhs, self.z * rhs)
    }
}

impl Mul<WDir> for f32 {
    type Output = WDir;
    fn mul(self, rhs: WDir) -> WDir {
        rhs * self
    }
}

/// Angle in radians, 0 = facing +Z
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub f32);

impl Angle {
    pub fn from_degrees(deg: f32) -> Self {
        Angle(deg.to_radians())
    }

    pub fn rad(self) -> f32 {
        self.0
    }

    pub fn deg(self) -> f32 {
        self.0.to_degrees()
    }

    pub fn to_direction(self) -> WDir {
        WDir::new(self.0.sin(), self.0.cos())
    }

    /// Normalized into (-PI, PI]
    pub fn normalized(self) -> Angle {
        let mut r = self.0 % std::f32::consts::TAU;
        if r > std::f32::consts::PI {
            r -= std::f32::consts::TAU;
        } else if r <= -std::f32::consts::PI {
            r += std::f32::consts::TAU;
        }
        Angle(r)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Positions
// ═══════════════════════════════════════════════════════════════════════════

/// A point in the arena plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WPos {
    pub x: f32,
    pub z: f32,
}

impl WPos {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance_sq(self, other: WPos) -> f32 {
        (self - other).length_sq()
    }

    pub fn in_circle(self, origin: WPos, radius: f32) -> bool {
        self.distance_sq(origin) <= radius * radius
    }

    /// Inclusive rectangle test; `dir` must be a unit vector.
    pub fn in_rect(
        self,
        origin: WPos,
        dir: WDir,
        length_front: f32,
        length_back: f32,
        half_width: f32,
    ) -> bool {
        let offset = self - origin;
        let along = offset.dot(dir);
        let across = offset.dot(dir.ortho_right());
        along >= -length_back && along <= length_front && across.abs() <= half_width
    }
}

impl Sub for WPos {
    type Output = WDir;
    fn sub(self, rhs: WPos) -> WDir {
        WDir::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Add<WDir> for WPos {
    type Output = WPos;
    fn add(self, rhs: WDir) -> WPos {
        WPos::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl AddAssign<WDir> for WPos {
    fn add_assign(&mut self, rhs: WDir) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl Sub<WDir> for WPos {
    type Output = WPos;
    fn sub(self, rhs: WDir) -> WPos {
        WPos::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl From<[f32; 2]> for WPos {
    fn from(v: [f32; 2]) -> Self {
        WPos::new(v[0], v[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn angle_zero_faces_positive_z() {
        let d = Angle(0.0).to_direction();
        assert!(close(d.x, 0.0) && close(d.z, 1.0));
        let d = Angle::from_degrees(90.0).to_direction();
        assert!(close(d.x, 1.0) && close(d.z, 0.0));
    }

    #[test]
    fn rotate_by_forward_is_identity() {
        let v = WDir::new(3.0, -2.0);
        let r = v.rotate(WDir::new(0.0, 1.0));
        assert!(close(r.x, 3.0) && close(r.z, -2.0));
    }

    #[test]
    fn rotate_forward_gives_rotation_direction() {
        let by = Angle::from_degrees(90.0).to_direction();
        let r = WDir::new(0.0, 1.0).rotate(by);
        assert!(close(r.x, by.x) && close(r.z, by.z));
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(WDir::default().normalized(), WDir::default());
    }

    #[test]
    fn angle_normalization() {
        let a = Angle::from_degrees(270.0).normalized();
        assert!(close(a.deg(), -90.0));
    }
}
