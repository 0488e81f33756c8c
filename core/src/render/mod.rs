//! Render projection
//!
//! Components describe what to draw as anchored shapes (`ArenaDraw`). The
//! projection turns those into filled polygons with resolved colors, ready for
//! any 2D rasterizer:
//!
//! ```text
//! Component::draw_arena ──► ArenaDraw (ZoneDraw: shape + anchor + HazardColor)
//!                                │
//!                           project()
//!                                ▼
//!                  DrawCommand (contours + holes, even-odd fill, RGBA)
//! ```

mod tessellate;

use telegraph_types::{Color, EngineConfig};

use crate::geometry::{Angle, Shape, WDir, WPos};
use crate::hazard::{HazardColor, HazardInstance};

pub use tessellate::{Region, clip_convex, tessellate};

/// One anchored shape to be filled
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDraw {
    pub shape: Shape,
    pub origin: WPos,
    pub rotation: Angle,
    pub color: HazardColor,
}

/// Draw sink handed to `Component::draw_arena`
#[derive(Debug, Clone, Default)]
pub struct ArenaDraw {
    zones: Vec<ZoneDraw>,
}

impl ArenaDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(&mut self, shape: &Shape, origin: WPos, rotation: Angle, color: HazardColor) {
        self.zones.push(ZoneDraw {
            shape: shape.clone(),
            origin,
            rotation,
            color,
        });
    }

    pub fn zone_rect(
        &mut self,
        origin: WPos,
        direction: WDir,
        length_front: f32,
        length_back: f32,
        half_width: f32,
        color: HazardColor,
    ) {
        self.zones.push(ZoneDraw {
            shape: Shape::Rect {
                length_front,
                length_back,
                half_width,
            },
            origin,
            rotation: direction.to_angle(),
            color,
        });
    }

    pub fn zone_circle(&mut self, origin: WPos, radius: f32, color: HazardColor) {
        self.zones.push(ZoneDraw {
            shape: Shape::circle(radius),
            origin,
            rotation: Angle::default(),
            color,
        });
    }

    pub fn hazard(&mut self, hazard: &HazardInstance) {
        self.zone(&hazard.shape, hazard.origin, hazard.rotation, hazard.color);
    }

    pub fn zones(&self) -> &[ZoneDraw] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Filled polygon region. Contours are combined with the even-odd rule, so a
/// contour nested in another cuts a hole. Each entry of `holes` is an even-odd
/// region cleared from the fill afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub contours: Vec<Vec<WPos>>,
    pub holes: Vec<Vec<Vec<WPos>>>,
    pub color: Color,
}

/// Project queued zone draws into draw commands.
///
/// `arena_center` anchors the backdrop square used for inverted shapes.
pub fn project(draw: &ArenaDraw, config: &EngineConfig, arena_center: WPos) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for zone in draw.zones() {
        let color = zone.color.resolve(&config.palette);
        let regions = tessellate(
            &zone.shape,
            zone.origin,
            zone.rotation.to_direction(),
            config,
            arena_center,
        );
        commands.extend(
            regions
                .into_iter()
                .map(|region| DrawCommand {
                    contours: region.contours,
                    holes: region.holes,
                    color,
                }),
        );
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_resolves_palette_colors() {
        let config = EngineConfig::default();
        let mut draw = ArenaDraw::new();
        draw.zone_circle(WPos::default(), 5.0, HazardColor::Safe);
        draw.zone_rect(WPos::default(), WDir::new(0.0, 1.0), 10.0, 0.0, 2.0, HazardColor::Danger);

        let commands = project(&draw, &config, WPos::default());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].color, config.palette.safe);
        assert_eq!(commands[0].contours[0].len(), config.circle_segments as usize);
        assert_eq!(commands[1].color, config.palette.danger);
        assert_eq!(commands[1].contours[0].len(), 4);
    }

    #[test]
    fn union_projects_one_command_per_child() {
        let config = EngineConfig::default();
        let mut draw = ArenaDraw::new();
        let shape = Shape::union(vec![Shape::circle(2.0), Shape::rect(5.0, 1.0)]);
        draw.zone(&shape, WPos::default(), Angle::default(), HazardColor::Future);
        assert_eq!(project(&draw, &config, WPos::default()).len(), 2);
    }
}
