//! Platform abstraction layer
//!
//! The game loop talks to the outside world only through these traits:
//! - `Surface`: drawing and presenting frames
//! - `Clock`: elapsed time and frame pacing
//! - `InputSource`: discrete input events
//!
//! Native builds get a terminal frontend, web builds a canvas/WebGPU one.

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::color::Color;
use crate::error::Result;
use crate::sim::Bounds;

/// Input categories the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / quit; ends the loop in any phase
    CloseRequested,
    /// Mouse button or touch released
    PointerReleased,
    /// Anything else
    Other,
}

/// Foreground and background for a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub foreground: Color,
    pub background: Color,
}

impl TextStyle {
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
        }
    }
}

/// Something frames can be drawn to, in logical surface coordinates
pub trait Surface {
    /// Logical drawable size; constant for a session
    fn size(&self) -> Bounds;

    /// Height of one line of text in logical pixels
    fn font_height(&self) -> f32;

    fn clear(&mut self, background: Color);

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draw `text` with its top-left corner at `position`
    fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle);

    /// Show everything drawn since the last `clear`
    fn present(&mut self) -> Result<()>;
}

pub trait Clock {
    /// Seconds since the game started
    fn elapsed_seconds(&self) -> f64;

    /// Block until the next frame boundary at `frame_rate` frames per second.
    ///
    /// A late frame just starts the next one immediately; there is no catch-up.
    fn wait_for_next_frame(&mut self, frame_rate: u32);
}

pub trait InputSource {
    /// Drain all events that arrived since the previous poll
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;
}
