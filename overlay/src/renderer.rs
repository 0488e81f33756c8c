//! Software renderer using tiny-skia and cosmic-text
//!
//! All rendering happens on the CPU into a tiny-skia `Pixmap`
//! (premultiplied RGBA).

use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping, SwashCache};
use tiny_skia::{
    BlendMode, Color, FillRule, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Shaped strings kept around between frames; hint texts repeat a lot
const SHAPED_CACHE_LIMIT: usize = 256;

struct ShapedText {
    glyphs: Vec<LayoutGlyph>,
    width: f32,
    height: f32,
}

/// Key for shaped text: (text content, font size in tenths)
type ShapedKey = (String, u32);

pub struct Renderer {
    /// Loaded on first text draw so shape-only rendering never scans fonts
    font_system: Option<FontSystem>,
    swash_cache: SwashCache,
    shaped: HashMap<ShapedKey, ShapedText>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font_system: None,
            swash_cache: SwashCache::new(),
            shaped: HashMap::new(),
        }
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        paint
    }

    /// Fill a region made of closed contours with the even-odd rule, so nested
    /// contours cut holes
    pub fn fill_contours(&self, pixmap: &mut Pixmap, contours: &[Vec<(f32, f32)>], color: Color) {
        if let Some(path) = Self::contour_path(contours) {
            pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }
    }

    /// Fill `contours` minus every hole region.
    ///
    /// Holes are cleared on a scratch layer, so overlapping holes stay clear
    /// instead of toggling back on.
    pub fn fill_region(
        &self,
        pixmap: &mut Pixmap,
        contours: &[Vec<(f32, f32)>],
        holes: &[Vec<Vec<(f32, f32)>>],
        color: Color,
    ) {
        if holes.is_empty() {
            self.fill_contours(pixmap, contours, color);
            return;
        }
        let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
            return;
        };
        self.fill_contours(&mut layer, contours, color);

        let mut clear = Paint::default();
        clear.blend_mode = BlendMode::Clear;
        clear.anti_alias = true;
        for path in holes.iter().filter_map(|hole| Self::contour_path(hole)) {
            layer.fill_path(&path, &clear, FillRule::EvenOdd, Transform::identity(), None);
        }
        pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn contour_path(contours: &[Vec<(f32, f32)>]) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for contour in contours.iter().filter(|c| c.len() >= 3) {
            pb.move_to(contour[0].0, contour[0].1);
            for &(x, y) in &contour[1..] {
                pb.line_to(x, y);
            }
            pb.close();
        }
        pb.finish()
    }

    pub fn fill_circle(&self, pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn stroke_circle(
        &self,
        pixmap: &mut Pixmap,
        cx: f32,
        cy: f32,
        radius: f32,
        width: f32,
        color: Color,
    ) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &Self::paint(color), &stroke, Transform::identity(), None);
    }

    fn shape(&mut self, text: &str, font_size: f32) -> &ShapedText {
        let key = (text.to_string(), (font_size * 10.0).round() as u32);
        if !self.shaped.contains_key(&key) {
            if self.shaped.len() >= SHAPED_CACHE_LIMIT {
                self.shaped.clear();
            }
            let fonts = self.font_system.get_or_insert_with(FontSystem::new);
            let mut buffer = Buffer::new(fonts, Metrics::new(font_size, font_size * 1.2));
            buffer.set_text(
                fonts,
                text,
                &Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
                None,
            );
            buffer.shape_until_scroll(fonts, false);

            let mut shaped = ShapedText {
                glyphs: Vec::new(),
                width: 0.0,
                height: 0.0,
            };
            for run in buffer.layout_runs() {
                shaped.width = shaped.width.max(run.line_w);
                shaped.height += run.line_height;
                shaped.glyphs.extend(run.glyphs.iter().cloned());
            }
            self.shaped.insert(key.clone(), shaped);
        }
        &self.shaped[&key]
    }

    /// Text extent in pixels as (width, height)
    pub fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        let shaped = self.shape(text, font_size);
        (shaped.width, shaped.height)
    }

    /// Draw one line of text with its top-left corner at (x, y)
    pub fn draw_text(&mut self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let glyphs = self.shape(text, font_size).glyphs.clone();
        let Some(fonts) = self.font_system.as_mut() else {
            return;
        };
        let baseline = y + font_size;

        for glyph in &glyphs {
            let physical = glyph.physical((x, baseline), 1.0);
            if let Some(image) = self.swash_cache.get_image(fonts, physical.cache_key) {
                blend_mask(
                    pixmap,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    physical.x + image.placement.left,
                    physical.y - image.placement.top,
                    color,
                );
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Source-over blend of an 8-bit coverage mask in `color`
fn blend_mask(
    pixmap: &mut Pixmap,
    mask: &[u8],
    mask_width: u32,
    mask_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: Color,
) {
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let data = pixmap.data_mut();
    let rgba = color.to_color_u8();

    for my in 0..mask_height as i32 {
        let py = dest_y + my;
        if py < 0 || py >= height {
            continue;
        }
        for mx in 0..mask_width as i32 {
            let px = dest_x + mx;
            if px < 0 || px >= width {
                continue;
            }
            let Some(&coverage) = mask.get((my as u32 * mask_width + mx as u32) as usize) else {
                continue;
            };
            if coverage == 0 {
                continue;
            }

            let src_a = coverage as u32 * rgba.alpha() as u32 / 255;
            let inv = 255 - src_a;
            let idx = ((py * width + px) * 4) as usize;
            // Pixmap data is premultiplied
            let channels = [rgba.red(), rgba.green(), rgba.blue()];
            for (offset, &c) in channels.iter().enumerate() {
                let src = c as u32 * src_a / 255;
                data[idx + offset] = (src + data[idx + offset] as u32 * inv / 255) as u8;
            }
            data[idx + 3] = (src_a + data[idx + 3] as u32 * inv / 255) as u8;
        }
    }
}
