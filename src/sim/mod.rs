//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Fixed update order (small dot before big dot)
//! - No rendering or platform dependencies

pub mod body;
pub mod geometry;
pub mod state;
pub mod tick;

pub use body::Dot;
pub use geometry::{Bounds, Circle, intersects};
pub use state::{GamePhase, GameState};
