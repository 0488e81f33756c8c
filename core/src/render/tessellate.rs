//! Shape → polygon tessellation

use std::f32::consts::TAU;

use telegraph_types::EngineConfig;

use crate::geometry::{Angle, Shape, WDir, WPos};

/// A fill region: `contours` combined with the even-odd rule, minus every
/// region in `holes` (each of those is itself even-odd).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub contours: Vec<Vec<WPos>>,
    pub holes: Vec<Vec<Vec<WPos>>>,
}

impl Region {
    fn solid(contours: Vec<Vec<WPos>>) -> Self {
        Self {
            contours,
            holes: Vec::new(),
        }
    }

    /// Whether the filled area covers `point`
    pub fn covers(&self, point: WPos) -> bool {
        even_odd(&self.contours, point) && !self.holes.iter().any(|hole| even_odd(hole, point))
    }
}

/// Tessellate an anchored shape into fill regions.
///
/// Unions yield one region per child. Inversions fill the arena backdrop with
/// every child region as a separate hole, so overlapping children stay
/// uncovered. Intersections are clipped when every operand after the first is
/// convex; otherwise they are skipped.
pub fn tessellate(
    shape: &Shape,
    origin: WPos,
    direction: WDir,
    config: &EngineConfig,
    arena_center: WPos,
) -> Vec<Region> {
    let segments = config.circle_segments.max(3) as usize;
    match shape {
        Shape::Circle { radius } => vec![Region::solid(vec![ring(origin, *radius, segments)])],
        Shape::Donut {
            inner_radius,
            outer_radius,
        } => vec![Region::solid(vec![
            ring(origin, *outer_radius, segments),
            ring(origin, *inner_radius, segments),
        ])],
        Shape::Cone { radius, half_angle } => {
            vec![Region::solid(vec![fan(origin, direction, *radius, *half_angle, segments)])]
        }
        Shape::Rect {
            length_front,
            length_back,
            half_width,
        } => {
            let right = direction.ortho_right() * *half_width;
            let front = origin + direction * *length_front;
            let back = origin - direction * *length_back;
            vec![Region::solid(vec![vec![
                front - right,
                front + right,
                back + right,
                back - right,
            ]])]
        }
        Shape::Polygon { vertices } => {
            vec![Region::solid(vec![
                vertices.iter().map(|v| origin + v.rotate(direction)).collect(),
            ])]
        }
        Shape::Union { shapes } => shapes
            .iter()
            .flat_map(|s| tessellate(s, origin, direction, config, arena_center))
            .collect(),
        Shape::Invert { shape } => {
            if let Shape::Invert { shape: inner } = shape.as_ref() {
                return tessellate(inner, origin, direction, config, arena_center);
            }
            let r = config.arena_radius;
            let backdrop = vec![
                arena_center + WDir::new(-r, -r),
                arena_center + WDir::new(r, -r),
                arena_center + WDir::new(r, r),
                arena_center + WDir::new(-r, r),
            ];
            let mut holes = Vec::new();
            for region in tessellate(shape, origin, direction, config, arena_center) {
                if !region.holes.is_empty() {
                    tracing::debug!("Drawing inverted region without its nested holes");
                }
                holes.push(region.contours);
            }
            vec![Region {
                contours: vec![backdrop],
                holes,
            }]
        }
        Shape::Intersection { shapes } => {
            match intersect_convex(shapes, origin, direction, config, arena_center) {
                Some(polygon) if polygon.len() >= 3 => vec![Region::solid(vec![polygon])],
                Some(_) => Vec::new(),
                None => {
                    tracing::debug!("Skipping draw of non-convex shape intersection");
                    Vec::new()
                }
            }
        }
    }
}

fn intersect_convex(
    shapes: &[Shape],
    origin: WPos,
    direction: WDir,
    config: &EngineConfig,
    arena_center: WPos,
) -> Option<Vec<WPos>> {
    let (first, rest) = shapes.split_first()?;
    let mut subject = single_contour(first, origin, direction, config, arena_center)?;
    for clip in rest {
        if !clip.is_convex() {
            return None;
        }
        let clip_poly = single_contour(clip, origin, direction, config, arena_center)?;
        subject = clip_convex(&subject, &clip_poly);
        if subject.is_empty() {
            break;
        }
    }
    Some(subject)
}

fn single_contour(
    shape: &Shape,
    origin: WPos,
    direction: WDir,
    config: &EngineConfig,
    arena_center: WPos,
) -> Option<Vec<WPos>> {
    let mut regions = tessellate(shape, origin, direction, config, arena_center);
    if regions.len() != 1 || regions[0].contours.len() != 1 || !regions[0].holes.is_empty() {
        return None;
    }
    regions.pop().and_then(|mut r| r.contours.pop())
}

fn ring(center: WPos, radius: f32, segments: usize) -> Vec<WPos> {
    (0..segments)
        .map(|i| center + Angle(TAU * i as f32 / segments as f32).to_direction() * radius)
        .collect()
}

fn fan(origin: WPos, direction: WDir, radius: f32, half_angle: Angle, segments: usize) -> Vec<WPos> {
    let center = direction.to_angle();
    let arc_segments = ((segments as f32 * 2.0 * half_angle.rad() / TAU).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(arc_segments + 2);
    points.push(origin);
    for i in 0..=arc_segments {
        let t = -half_angle.rad() + 2.0 * half_angle.rad() * i as f32 / arc_segments as f32;
        points.push(origin + (center + Angle(t)).to_direction() * radius);
    }
    points
}

/// Crossing-number test over every contour
fn even_odd(contours: &[Vec<WPos>], point: WPos) -> bool {
    let mut inside = false;
    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let a = contour[i];
            let b = contour[(i + 1) % n];
            if (a.z > point.z) != (b.z > point.z) {
                let x = a.x + (point.z - a.z) / (b.z - a.z) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

fn signed_area(poly: &[WPos]) -> f32 {
    let n = poly.len();
    (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            a.x * b.z - b.x * a.z
        })
        .sum::<f32>()
        * 0.5
}

/// Sutherland–Hodgman clip of `subject` against the convex polygon `clip`
/// (either winding).
pub fn clip_convex(subject: &[WPos], clip: &[WPos]) -> Vec<WPos> {
    if clip.len() < 3 {
        return Vec::new();
    }
    let orientation = signed_area(clip).signum();
    let inside = |a: WPos, b: WPos, p: WPos| (b - a).cross(p - a) * orientation >= 0.0;

    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let current = input[j];
            let previous = input[(j + input.len() - 1) % input.len()];
            let cur_in = inside(a, b, current);
            let prev_in = inside(a, b, previous);
            if cur_in {
                if !prev_in {
                    output.extend(segment_intersection(previous, current, a, b));
                }
                output.push(current);
            } else if prev_in {
                output.extend(segment_intersection(previous, current, a, b));
            }
        }
    }
    output
}

/// Intersection of segment p→q with the infinite line through a→b
fn segment_intersection(p: WPos, q: WPos, a: WPos, b: WPos) -> Option<WPos> {
    let r = q - p;
    let s = b - a;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let t = (a - p).cross(s) / denom;
    Some(p + r * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32, center: WPos) -> Vec<WPos> {
        vec![
            center + WDir::new(-half, -half),
            center + WDir::new(half, -half),
            center + WDir::new(half, half),
            center + WDir::new(-half, half),
        ]
    }

    #[test]
    fn clip_overlapping_squares() {
        let a = square(2.0, WPos::new(0.0, 0.0));
        let b = square(2.0, WPos::new(2.0, 2.0));
        let clipped = clip_convex(&a, &b);
        let area = signed_area(&clipped).abs();
        assert!((area - 4.0).abs() < 1e-4, "overlap is a 2x2 square, got {area}");
    }

    #[test]
    fn clip_disjoint_is_empty() {
        let a = square(1.0, WPos::new(0.0, 0.0));
        let b = square(1.0, WPos::new(10.0, 0.0));
        assert!(clip_convex(&a, &b).is_empty());
    }

    #[test]
    fn donut_has_hole_contour() {
        let config = EngineConfig::default();
        let regions = tessellate(
            &Shape::donut(5.0, 10.0),
            WPos::default(),
            WDir::new(0.0, 1.0),
            &config,
            WPos::default(),
        );
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].contours.len(), 2);
        assert!(!regions[0].covers(WPos::new(2.0, 0.0)));
        assert!(regions[0].covers(WPos::new(7.0, 0.0)));
    }

    #[test]
    fn invert_adds_backdrop() {
        let config = EngineConfig::default();
        let regions = tessellate(
            &Shape::invert(Shape::circle(3.0)),
            WPos::default(),
            WDir::new(0.0, 1.0),
            &config,
            WPos::default(),
        );
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].contours.len(), 1);
        assert_eq!(regions[0].contours[0].len(), 4);
        assert_eq!(regions[0].holes.len(), 1);
    }

    #[test]
    fn inverted_union_leaves_overlap_uncovered() {
        let config = EngineConfig::default();
        let shape = Shape::invert(Shape::union(vec![
            Shape::circle(5.0),
            Shape::Rect {
                length_front: 3.0,
                length_back: 3.0,
                half_width: 3.0,
            },
        ]));
        let origin = WPos::default();
        let direction = WDir::new(0.0, 1.0);
        let regions = tessellate(&shape, origin, direction, &config, origin);
        assert_eq!(regions.len(), 1);

        for point in [
            WPos::new(0.0, 0.0),
            WPos::new(2.0, 2.0),
            WPos::new(4.5, 0.0),
            WPos::new(8.0, 8.0),
        ] {
            assert_eq!(
                regions[0].covers(point),
                shape.contains(origin, direction, point),
                "fill disagrees with containment at {point:?}"
            );
        }
    }

    #[test]
    fn double_invert_draws_the_inner_shape() {
        let config = EngineConfig::default();
        let shape = Shape::invert(Shape::invert(Shape::circle(3.0)));
        let regions = tessellate(&shape, WPos::default(), WDir::new(0.0, 1.0), &config, WPos::default());
        assert_eq!(regions.len(), 1);
        assert!(regions[0].holes.is_empty());
        assert!(regions[0].covers(WPos::default()));
    }

    #[test]
    fn rect_corners_follow_facing() {
        let config = EngineConfig::default();
        let regions = tessellate(
            &Shape::rect(10.0, 1.0),
            WPos::default(),
            WDir::new(1.0, 0.0),
            &config,
            WPos::default(),
        );
        let xs: Vec<f32> = regions[0].contours[0].iter().map(|p| p.x).collect();
        assert!(xs.iter().any(|&x| (x - 10.0).abs() < 1e-5));
        assert!(xs.iter().all(|&x| x >= -1e-5));
    }

    #[test]
    fn non_convex_intersection_is_skipped() {
        let config = EngineConfig::default();
        let shape = Shape::intersection(vec![Shape::circle(5.0), Shape::donut(1.0, 3.0)]);
        let regions = tessellate(&shape, WPos::default(), WDir::new(0.0, 1.0), &config, WPos::default());
        assert!(regions.is_empty());
    }
}
