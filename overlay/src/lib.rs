//! Telegraph Overlay Library
//!
//! Software rendering of the hazard engine's output onto a top-down arena view.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      arena                          │
//! │     ArenaOverlay: draw commands, party markers,     │
//! │              hint text for one viewer               │
//! ├─────────────────────────────────────────────────────┤
//! │                     renderer                         │
//! │              tiny-skia + cosmic-text                 │
//! │     (even-odd polygon fills, circles, text)          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Windowing is left to the host; the overlay produces an RGBA pixmap that can
//! be blitted or written out as PNG.

pub mod arena;
pub mod colors;
mod error;
pub mod renderer;

pub use arena::{ArenaOverlay, ArenaView};
pub use error::OverlayError;
pub use renderer::Renderer;
