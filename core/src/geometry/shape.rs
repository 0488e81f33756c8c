//! Hazard shapes
//!
//! A `Shape` carries only its dimensions. Position and facing come from the
//! anchor supplied at evaluation time, so one shape definition can be reused by
//! every cast of the same ability.

use serde::{Deserialize, Serialize};

use super::{Angle, WDir, WPos};

/// Unanchored hazard shape.
///
/// `contains` is a pure function of (shape, origin, direction, point). All
/// boundaries are inclusive. `direction` is the anchor's forward vector and is
/// expected to be unit length; a zero or non-finite direction (or non-finite
/// dimensions) is a caller error and gives unspecified, but non-panicking,
/// results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        radius: f32,
    },
    Donut {
        inner_radius: f32,
        outer_radius: f32,
    },
    /// Cone of `radius` spreading `half_angle` to either side of forward
    Cone {
        radius: f32,
        half_angle: Angle,
    },
    /// Rectangle extending `length_front` ahead of the anchor and `length_back`
    /// behind it
    Rect {
        length_front: f32,
        #[serde(default)]
        length_back: f32,
        half_width: f32,
    },
    /// Polygon in anchor-local coordinates (+Z = forward)
    Polygon {
        vertices: Vec<WDir>,
    },
    Union {
        shapes: Vec<Shape>,
    },
    Intersection {
        shapes: Vec<Shape>,
    },
    Invert {
        shape: Box<Shape>,
    },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn donut(inner_radius: f32, outer_radius: f32) -> Self {
        Shape::Donut {
            inner_radius,
            outer_radius,
        }
    }

    pub fn cone(radius: f32, half_angle: Angle) -> Self {
        Shape::Cone { radius, half_angle }
    }

    pub fn rect(length_front: f32, half_width: f32) -> Self {
        Shape::Rect {
            length_front,
            length_back: 0.0,
            half_width,
        }
    }

    pub fn union(shapes: Vec<Shape>) -> Self {
        Shape::Union { shapes }
    }

    pub fn intersection(shapes: Vec<Shape>) -> Self {
        Shape::Intersection { shapes }
    }

    pub fn invert(shape: Shape) -> Self {
        Shape::Invert {
            shape: Box::new(shape),
        }
    }

    /// Check whether `point` lies inside this shape anchored at `origin`
    /// facing `direction`.
    pub fn contains(&self, origin: WPos, direction: WDir, point: WPos) -> bool {
        match self {
            Shape::Circle { radius } => point.in_circle(origin, *radius),
            Shape::Donut {
                inner_radius,
                outer_radius,
            } => {
                let d2 = point.distance_sq(origin);
                d2 >= inner_radius * inner_radius && d2 <= outer_radius * outer_radius
            }
            Shape::Cone { radius, half_angle } => {
                let offset = point - origin;
                let d2 = offset.length_sq();
                if d2 > radius * radius {
                    return false;
                }
                if d2 == 0.0 {
                    return true;
                }
                // Angle between forward and offset via atan2 of cross/dot
                let angle = offset.cross(direction).atan2(offset.dot(direction)).abs();
                angle <= half_angle.rad()
            }
            Shape::Rect {
                length_front,
                length_back,
                half_width,
            } => point.in_rect(origin, direction, *length_front, *length_back, *half_width),
            Shape::Polygon { vertices } => {
                let local = to_local(point - origin, direction);
                polygon_contains(vertices, local)
            }
            Shape::Union { shapes } => shapes.iter().any(|s| s.contains(origin, direction, point)),
            Shape::Intersection { shapes } => {
                shapes.iter().all(|s| s.contains(origin, direction, point))
            }
            Shape::Invert { shape } => !shape.contains(origin, direction, point),
        }
    }

    /// Convenience wrapper taking the anchor facing as an angle
    pub fn contains_at(&self, origin: WPos, rotation: Angle, point: WPos) -> bool {
        self.contains(origin, rotation.to_direction(), point)
    }

    /// Whether the area is convex (used by the render projection for clipping)
    pub fn is_convex(&self) -> bool {
        match self {
            Shape::Circle { .. } | Shape::Rect { .. } => true,
            Shape::Cone { half_angle, .. } => half_angle.rad() <= std::f32::consts::FRAC_PI_2,
            Shape::Polygon { vertices } => polygon_is_convex(vertices),
            Shape::Donut { .. }
            | Shape::Union { .. }
            | Shape::Intersection { .. }
            | Shape::Invert { .. } => false,
        }
    }
}

/// Express a world offset in anchor-local coordinates (+Z = `direction`)
pub(crate) fn to_local(offset: WDir, direction: WDir) -> WDir {
    WDir::new(offset.dot(direction.ortho_right()), offset.dot(direction))
}

/// Crossing-number test with an explicit on-edge check so that boundary points
/// count as inside.
fn polygon_contains(vertices: &[WDir], p: WDir) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if on_segment(a, b, p) {
            return true;
        }
        if (a.z > p.z) != (b.z > p.z) {
            let x_at = (b.x - a.x) * (p.z - a.z) / (b.z - a.z) + a.x;
            if p.x < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(a: WDir, b: WDir, p: WDir) -> bool {
    const EPS: f32 = 1e-5;
    let ab = b - a;
    let ap = p - a;
    if ab.cross(ap).abs() > EPS * ab.length().max(1.0) {
        return false;
    }
    let t = ap.dot(ab);
    t >= -EPS && t <= ab.length_sq() + EPS
}

fn polygon_is_convex(vertices: &[WDir]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let cross = (b - a).cross(c - b);
        if cross != 0.0 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    true
}
