use tiny_skia::Color;

/// Convert an RGBA palette entry from the engine config
#[inline]
pub fn from_rgba(c: telegraph_types::Color) -> Color {
    Color::from_rgba8(c[0], c[1], c[2], c[3])
}

#[inline]
pub fn transparent() -> Color {
    Color::from_rgba8(0, 0, 0, 0)
}

/// Arena floor
#[inline]
pub fn arena_bg() -> Color {
    Color::from_rgba8(30, 30, 30, 200)
}

#[inline]
pub fn arena_outline() -> Color {
    Color::from_rgba8(200, 200, 200, 255)
}

#[inline]
pub fn party_member() -> Color {
    Color::from_rgba8(80, 160, 255, 255)
}

/// The player the frame is drawn for
#[inline]
pub fn viewer() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Ring around players standing somewhere their assistant considers unsafe
#[inline]
pub fn unsafe_ring() -> Color {
    Color::from_rgba8(255, 40, 40, 255)
}

#[inline]
pub fn hint_text() -> Color {
    Color::from_rgba8(255, 220, 120, 255)
}

#[inline]
pub fn global_hint_text() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}
