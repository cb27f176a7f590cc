//! Moving dots
//!
//! A dot is a colored circle with a per-tick velocity. It knows how to bounce
//! off the surface edges and how to jump to a random spot, but it holds no
//! reference to the surface: callers pass the current bounds in.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Bounds, Circle};
use crate::color::Color;

/// A colored circle that moves a fixed amount every tick
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    color: Color,
    center: Vec2,
    radius: f32,
    /// Pixels per tick
    velocity: Vec2,
}

impl Dot {
    pub fn new(color: Color, center: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            color,
            center,
            radius,
            velocity,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    pub fn intersects(&self, other: &Dot) -> bool {
        self.circle().intersects(&other.circle())
    }

    /// Move one tick, bouncing off the edges.
    ///
    /// Each axis is moved and then checked on its own. An edge crossing flips
    /// that axis's velocity but leaves the position where it landed, so the dot
    /// may poke past the edge by up to one tick before heading back.
    pub fn advance(&mut self, bounds: Bounds) {
        for axis in 0..2 {
            self.center[axis] += self.velocity[axis];
            let coord = self.center[axis];
            if coord < self.radius || coord + self.radius > bounds.extent(axis) {
                self.velocity[axis] = -self.velocity[axis];
            }
        }
    }

    /// Teleport to a uniformly random integer point with the whole circle on
    /// the surface. Velocity is kept.
    ///
    /// # Panics
    ///
    /// If no whole-number center fits on some axis (see `Bounds::fits`).
    /// `GameState` rejects such dots at construction, so this only fires on
    /// misuse.
    pub fn randomize_position<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        for axis in 0..2 {
            let range = bounds.placement_range(axis, self.radius);
            assert!(
                !range.is_empty(),
                "dot of radius {} cannot be placed on a {}x{} surface",
                self.radius,
                bounds.width,
                bounds.height
            );
            self.center[axis] = rng.random_range(range) as f32;
        }
    }
}
