//! Poke the Dots - keep two bouncing dots from touching
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, bounces, collision, game state)
//! - `game_loop`: Fixed-rate poll/update/render loop
//! - `platform`: Surface, clock and input traits plus terminal/browser frontends
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences

pub mod color;
pub mod error;
pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::{Error, Result};
pub use game_loop::{GameLoop, LoopControl};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default target frame rate; dots move one velocity step per frame
    pub const FRAME_RATE: u32 = 90;

    /// Logical surface dimensions
    pub const SURFACE_WIDTH: f32 = 500.0;
    pub const SURFACE_HEIGHT: f32 = 400.0;

    /// Small (red) dot start
    pub const SMALL_DOT_CENTER: [f32; 2] = [50.0, 75.0];
    pub const SMALL_DOT_RADIUS: f32 = 30.0;
    pub const SMALL_DOT_VELOCITY: [f32; 2] = [1.0, 2.0];

    /// Big (blue) dot start
    pub const BIG_DOT_CENTER: [f32; 2] = [200.0, 100.0];
    pub const BIG_DOT_RADIUS: f32 = 40.0;
    pub const BIG_DOT_VELOCITY: [f32; 2] = [2.0, 1.0];

    /// HUD text height in logical pixels
    pub const FONT_SIZE: f32 = 64.0;
}
