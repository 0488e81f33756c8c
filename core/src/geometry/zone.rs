//! Anchored zone predicates
//!
//! Where `Shape` composes children sharing a single anchor, a `Zone` composes
//! already-anchored shapes. Forbidden-movement zones are built from these.

use super::{Angle, Shape, WDir, WPos};

#[derive(Debug, Clone, PartialEq)]
pub enum Zone {
    /// Always contains the point
    Everywhere,
    /// Never contains the point
    Nowhere,
    Anchored {
        shape: Shape,
        origin: WPos,
        direction: WDir,
    },
    /// Empty union contains nothing
    Union(Vec<Zone>),
    /// Empty intersection contains everything
    Intersection(Vec<Zone>),
    Invert(Box<Zone>),
}

impl Zone {
    pub fn shape(shape: Shape, origin: WPos, rotation: Angle) -> Self {
        Zone::Anchored {
            shape,
            origin,
            direction: rotation.to_direction(),
        }
    }

    pub fn circle(origin: WPos, radius: f32) -> Self {
        Zone::Anchored {
            shape: Shape::circle(radius),
            origin,
            direction: WDir::new(0.0, 1.0),
        }
    }

    /// Rectangle starting at `origin` and running `length` along `direction`
    pub fn rect(origin: WPos, direction: WDir, length: f32, length_back: f32, half_width: f32) -> Self {
        Zone::Anchored {
            shape: Shape::Rect {
                length_front: length,
                length_back,
                half_width,
            },
            origin,
            direction,
        }
    }

    /// Rectangle spanning the segment `from` → `to`
    pub fn rect_between(from: WPos, to: WPos, half_width: f32) -> Self {
        let offset = to - from;
        Zone::rect(from, offset.normalized(), offset.length(), 0.0, half_width)
    }

    pub fn invert(self) -> Self {
        Zone::Invert(Box::new(self))
    }

    pub fn contains(&self, point: WPos) -> bool {
        match self {
            Zone::Everywhere => true,
            Zone::Nowhere => false,
            Zone::Anchored {
                shape,
                origin,
                direction,
            } => shape.contains(*origin, *direction, point),
            Zone::Union(zones) => zones.iter().any(|z| z.contains(point)),
            Zone::Intersection(zones) => zones.iter().all(|z| z.contains(point)),
            Zone::Invert(zone) => !zone.contains(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_composites() {
        let p = WPos::new(3.0, 4.0);
        assert!(!Zone::Union(Vec::new()).contains(p));
        assert!(Zone::Intersection(Vec::new()).contains(p));
    }

    #[test]
    fn rect_between_covers_segment() {
        let zone = Zone::rect_between(WPos::new(0.0, 0.0), WPos::new(10.0, 0.0), 1.0);
        assert!(zone.contains(WPos::new(5.0, 0.5)));
        assert!(zone.contains(WPos::new(10.0, 0.0)));
        assert!(!zone.contains(WPos::new(11.0, 0.0)));
        assert!(!zone.contains(WPos::new(5.0, 1.5)));
    }

    #[test]
    fn inverted_circle() {
        let zone = Zone::circle(WPos::default(), 2.0).invert();
        assert!(!zone.contains(WPos::new(1.0, 1.0)));
        assert!(zone.contains(WPos::new(3.0, 0.0)));
    }
}
