//! Circle geometry and surface bounds
//!
//! Everything here is pure: no state, no randomness.

use std::ops::RangeInclusive;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the drawable area. Both dots are confined to `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along an axis (0 = x, 1 = y)
    #[inline]
    pub fn extent(&self, axis: usize) -> f32 {
        match axis {
            0 => self.width,
            _ => self.height,
        }
    }

    /// Whole-number centers along `axis` that keep a circle of `radius`
    /// fully inside. Empty when no integer coordinate works.
    pub fn placement_range(&self, axis: usize, radius: f32) -> RangeInclusive<i64> {
        let low = radius.ceil() as i64;
        let high = (self.extent(axis) - radius).floor() as i64;
        low..=high
    }

    /// True if a circle of `radius` can be placed at some whole-number
    /// center fully inside on both axes
    pub fn fits(&self, radius: f32) -> bool {
        (0..2).all(|axis| !self.placement_range(axis, radius).is_empty())
    }
}

/// A circle in surface coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects(&self, other: &Circle) -> bool {
        intersects(self, other)
    }
}

/// Circle-circle overlap test. Touching counts as intersecting.
#[inline]
pub fn intersects(a: &Circle, b: &Circle) -> bool {
    a.center.distance(b.center) <= a.radius + b.radius
}
