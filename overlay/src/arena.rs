//! Top-down arena overlay
//!
//! Maps arena coordinates onto a square pixmap (+X right, +Z down) and draws,
//! back to front: the arena floor, projected hazard regions, party markers
//! and the viewer's hint text.

use std::path::Path;

use telegraph_core::{DrawCommand, TickHints, WPos, WorldState};
use tiny_skia::Pixmap;

use crate::colors;
use crate::error::OverlayError;
use crate::renderer::Renderer;

/// Pixel-space party marker radius floor
const MIN_MARKER_RADIUS: f32 = 3.0;
const HINT_FONT_SIZE: f32 = 14.0;
const HINT_MARGIN: f32 = 6.0;

/// Which part of the arena is visible and at what resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaView {
    pub center: WPos,
    /// World units from the center to the pixmap edge
    pub radius: f32,
    /// Pixmap edge length in pixels
    pub size: u32,
}

impl ArenaView {
    pub fn new(center: WPos, radius: f32, size: u32) -> Self {
        Self {
            center,
            radius,
            size,
        }
    }

    /// Pixels per world unit
    pub fn scale(&self) -> f32 {
        self.size as f32 / (2.0 * self.radius)
    }

    pub fn to_pixel(&self, pos: WPos) -> (f32, f32) {
        let half = self.size as f32 / 2.0;
        let scale = self.scale();
        (
            half + (pos.x - self.center.x) * scale,
            half + (pos.z - self.center.z) * scale,
        )
    }
}

pub struct ArenaOverlay {
    view: ArenaView,
    renderer: Renderer,
    show_hints: bool,
}

impl ArenaOverlay {
    pub fn new(view: ArenaView) -> Self {
        Self {
            view,
            renderer: Renderer::new(),
            show_hints: true,
        }
    }

    /// Skip text; only geometry is drawn
    pub fn without_hints(mut self) -> Self {
        self.show_hints = false;
        self
    }

    pub fn view(&self) -> &ArenaView {
        &self.view
    }

    /// Render one tick for `viewer` (the slot whose hints are shown and whose
    /// marker is highlighted)
    pub fn render(
        &mut self,
        tick: &TickHints,
        world: &WorldState,
        viewer: Option<usize>,
    ) -> Result<Pixmap, OverlayError> {
        let size = self.view.size;
        let mut pixmap = Pixmap::new(size, size).ok_or(OverlayError::InvalidSize {
            width: size,
            height: size,
        })?;
        pixmap.fill(colors::transparent());

        let half = size as f32 / 2.0;
        self.renderer
            .fill_circle(&mut pixmap, half, half, half, colors::arena_bg());
        self.renderer
            .stroke_circle(&mut pixmap, half, half, half - 1.0, 2.0, colors::arena_outline());

        for command in &tick.draw {
            self.draw_command(&mut pixmap, command);
        }

        self.draw_party(&mut pixmap, tick, world, viewer);

        if self.show_hints {
            self.draw_hints(&mut pixmap, tick, viewer);
        }

        Ok(pixmap)
    }

    /// Render and write a PNG file
    pub fn render_to_png(
        &mut self,
        tick: &TickHints,
        world: &WorldState,
        viewer: Option<usize>,
        path: &Path,
    ) -> Result<(), OverlayError> {
        let pixmap = self.render(tick, world, viewer)?;
        pixmap
            .save_png(path)
            .map_err(|e| OverlayError::Encode(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Arena frame written");
        Ok(())
    }

    fn draw_command(&self, pixmap: &mut Pixmap, command: &DrawCommand) {
        let contours = self.to_pixels(&command.contours);
        let holes: Vec<_> = command.holes.iter().map(|hole| self.to_pixels(hole)).collect();
        self.renderer
            .fill_region(pixmap, &contours, &holes, colors::from_rgba(command.color));
    }

    fn to_pixels(&self, contours: &[Vec<WPos>]) -> Vec<Vec<(f32, f32)>> {
        contours
            .iter()
            .map(|contour| contour.iter().map(|&p| self.view.to_pixel(p)).collect())
            .collect()
    }

    fn draw_party(&self, pixmap: &mut Pixmap, tick: &TickHints, world: &WorldState, viewer: Option<usize>) {
        let scale = self.view.scale();
        for (slot, actor) in world.party_members() {
            let (x, y) = self.view.to_pixel(actor.position);
            let radius = (actor.hitbox_radius * scale).max(MIN_MARKER_RADIUS);
            let color = if Some(slot) == viewer {
                colors::viewer()
            } else {
                colors::party_member()
            };
            self.renderer.fill_circle(pixmap, x, y, radius, color);

            let unsafe_here = tick
                .player(slot)
                .is_some_and(|p| !p.safety.is_safe(actor.position));
            if unsafe_here {
                self.renderer
                    .stroke_circle(pixmap, x, y, radius + 2.0, 2.0, colors::unsafe_ring());
            }
        }
    }

    fn draw_hints(&mut self, pixmap: &mut Pixmap, tick: &TickHints, viewer: Option<usize>) {
        let mut lines: Vec<(&str, tiny_skia::Color)> = tick
            .global
            .iter()
            .map(|h| (h.as_str(), colors::global_hint_text()))
            .collect();
        if let Some(player) = viewer.and_then(|slot| tick.player(slot)) {
            lines.extend(player.texts().map(|t| (t, colors::hint_text())));
        }

        let mut y = HINT_MARGIN;
        for (text, color) in lines {
            self.renderer
                .draw_text(pixmap, text, HINT_MARGIN, y, HINT_FONT_SIZE, color);
            let (_, height) = self.renderer.measure_text(text, HINT_FONT_SIZE);
            y += height.max(HINT_FONT_SIZE) + 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use telegraph_core::{
        Actor, ActorId, ArenaDraw, HazardColor, SafetyPredicate, WDir, Zone,
        aggregator::PlayerHints, hints::ForbiddenZone, render::project,
    };
    use telegraph_types::EngineConfig;

    fn world_with_player(x: f32, z: f32) -> WorldState {
        let t0 = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let mut world = WorldState::new(t0);
        world.add_actor(Actor::new(1, WPos::new(x, z)));
        world.party.assign(0, ActorId(1), Default::default());
        world
    }

    fn overlay() -> ArenaOverlay {
        ArenaOverlay::new(ArenaView::new(WPos::new(0.0, 0.0), 20.0, 200)).without_hints()
    }

    #[test]
    fn view_maps_world_to_pixels() {
        let view = ArenaView::new(WPos::new(100.0, 100.0), 20.0, 200);
        assert_eq!(view.scale(), 5.0);
        assert_eq!(view.to_pixel(WPos::new(100.0, 100.0)), (100.0, 100.0));
        assert_eq!(view.to_pixel(WPos::new(110.0, 90.0)), (150.0, 50.0));
    }

    #[test]
    fn hazards_are_filled_with_palette_colors() {
        let config = EngineConfig::default();
        let mut draw = ArenaDraw::new();
        draw.zone_rect(
            WPos::new(-10.0, 0.0),
            WDir::new(1.0, 0.0),
            10.0,
            0.0,
            2.0,
            HazardColor::Custom([255, 0, 0, 255]),
        );
        let tick = TickHints {
            draw: project(&draw, &config, WPos::default()),
            ..TickHints::default()
        };
        let world = world_with_player(15.0, 15.0);

        let pixmap = overlay().render(&tick, &world, Some(0)).unwrap();
        // Rect spans x in [-10, 0], z in [-2, 2] => pixels x 50..100, y 90..110
        let inside = pixmap.pixel(75, 100).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.alpha()), (255, 0, 255));
        let outside = pixmap.pixel(125, 100).unwrap();
        assert_ne!(outside.red(), 255);
    }

    #[test]
    fn inverted_union_keeps_overlap_clear() {
        use telegraph_core::{Angle, Shape};

        let config = EngineConfig::default();
        let mut draw = ArenaDraw::new();
        let safe_spots = Shape::union(vec![
            Shape::circle(5.0),
            Shape::Rect {
                length_front: 3.0,
                length_back: 3.0,
                half_width: 3.0,
            },
        ]);
        draw.zone(
            &Shape::invert(safe_spots),
            WPos::default(),
            Angle::default(),
            HazardColor::Custom([255, 0, 0, 255]),
        );
        let tick = TickHints {
            draw: project(&draw, &config, WPos::default()),
            ..TickHints::default()
        };
        let world = world_with_player(15.0, 15.0);

        let pixmap = overlay().render(&tick, &world, Some(0)).unwrap();
        // Origin is inside both children, (4.5, 0) only inside the circle
        for (x, y) in [(100, 100), (122, 100)] {
            let pixel = pixmap.pixel(x, y).unwrap();
            assert_ne!((pixel.red(), pixel.green()), (255, 0), "({x}, {y}) should be clear");
        }
        // World (12, 8) is outside every child
        let danger = pixmap.pixel(160, 140).unwrap();
        assert_eq!((danger.red(), danger.green(), danger.alpha()), (255, 0, 255));
    }

    #[test]
    fn unsafe_players_get_a_ring() {
        let world = world_with_player(0.0, 0.0);
        let forbidden = ForbiddenZone {
            zone: Zone::circle(WPos::new(0.0, 0.0), 5.0),
            activation: world.current_time,
        };
        let tick = TickHints {
            players: vec![PlayerHints {
                slot: 0,
                actor: ActorId(1),
                hints: Vec::new(),
                safety: SafetyPredicate::new(vec![forbidden]),
                interrupt_targets: Vec::new(),
            }],
            ..TickHints::default()
        };

        let pixmap = overlay().render(&tick, &world, None).unwrap();
        // Marker radius floor is 3px, the ring sits 2px outside it
        let ring = pixmap.pixel(105, 100).unwrap();
        assert!(ring.red() > ring.blue());
        let marker = pixmap.pixel(100, 100).unwrap();
        assert_eq!(marker.blue(), 255);
    }

    #[test]
    fn zero_size_is_an_error() {
        let mut overlay = ArenaOverlay::new(ArenaView::new(WPos::default(), 10.0, 0));
        let world = world_with_player(0.0, 0.0);
        assert_eq!(
            overlay.render(&TickHints::default(), &world, None).unwrap_err(),
            OverlayError::InvalidSize { width: 0, height: 0 }
        );
    }
}
