//! Game state and setup
//!
//! One game is two dots, a score in whole seconds, and a phase that can only
//! move from Playing to GameOver.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::Dot;
use super::geometry::Bounds;
use crate::color::Color;
use crate::consts::*;
use crate::error::{Error, Result};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Dots moving, clock running
    Playing,
    /// Dots collided; terminal
    GameOver,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub(super) small: Dot,
    pub(super) big: Dot,
    pub(super) bounds: Bounds,
    /// Whole seconds since start
    pub(super) score: u64,
    pub(super) phase: GamePhase,
    seed: u64,
    pub(super) rng: Pcg32,
}

impl GameState {
    /// Start a game from two explicitly placed dots.
    ///
    /// Fails if either dot has a bad radius or cannot fit on the surface.
    pub fn new(small: Dot, big: Dot, bounds: Bounds, seed: u64) -> Result<Self> {
        validate_dot("small", &small, bounds)?;
        validate_dot("big", &big, bounds)?;

        Ok(Self {
            small,
            big,
            bounds,
            score: 0,
            phase: GamePhase::Playing,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// The standard red and blue pair, teleported once before the first frame.
    pub fn new_game(bounds: Bounds, seed: u64) -> Result<Self> {
        let small = Dot::new(
            Color::RED,
            Vec2::from(SMALL_DOT_CENTER),
            SMALL_DOT_RADIUS,
            Vec2::from(SMALL_DOT_VELOCITY),
        );
        let big = Dot::new(
            Color::BLUE,
            Vec2::from(BIG_DOT_CENTER),
            BIG_DOT_RADIUS,
            Vec2::from(BIG_DOT_VELOCITY),
        );

        let mut state = Self::new(small, big, bounds, seed)?;
        state.small.randomize_position(state.bounds, &mut state.rng);
        state.big.randomize_position(state.bounds, &mut state.rng);
        Ok(state)
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn small(&self) -> &Dot {
        &self.small
    }

    pub fn big(&self) -> &Dot {
        &self.big
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn validate_dot(name: &'static str, dot: &Dot, bounds: Bounds) -> Result<()> {
    let radius = dot.radius();
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius { name, radius });
    }
    if !bounds.fits(radius) {
        return Err(Error::BodyDoesNotFit {
            name,
            radius,
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Bounds {
        Bounds::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    #[test]
    fn test_new_game_starts_playing() {
        let state = GameState::new_game(surface(), 42).unwrap();
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(state.is_playing());
        assert_eq!(state.score(), 0);
        assert_eq!(state.seed(), 42);
        assert_eq!(state.small().color(), Color::RED);
        assert_eq!(state.big().color(), Color::BLUE);
        assert_eq!(state.small().radius(), SMALL_DOT_RADIUS);
        assert_eq!(state.big().radius(), BIG_DOT_RADIUS);
        // Teleporting never touches velocity
        assert_eq!(state.small().velocity(), Vec2::new(1.0, 2.0));
        assert_eq!(state.big().velocity(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_new_game_places_dots_on_surface() {
        for seed in 0..50 {
            let state = GameState::new_game(surface(), seed).unwrap();
            for dot in [state.small(), state.big()] {
                let c = dot.center();
                let r = dot.radius();
                assert!(c.x >= r && c.x <= SURFACE_WIDTH - r);
                assert!(c.y >= r && c.y <= SURFACE_HEIGHT - r);
            }
        }
    }

    #[test]
    fn test_same_seed_same_start() {
        let a = GameState::new_game(surface(), 99999).unwrap();
        let b = GameState::new_game(surface(), 99999).unwrap();
        assert_eq!(a.small(), b.small());
        assert_eq!(a.big(), b.big());
    }

    #[test]
    fn test_explicit_dots_keep_their_centers() {
        let small = Dot::new(Color::RED, Vec2::new(50.0, 75.0), 30.0, Vec2::new(1.0, 2.0));
        let big = Dot::new(Color::BLUE, Vec2::new(200.0, 100.0), 40.0, Vec2::new(2.0, 1.0));
        let state = GameState::new(small, big, surface(), 1).unwrap();
        assert_eq!(state.small().center(), Vec2::new(50.0, 75.0));
        assert_eq!(state.big().center(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_oversized_dot_rejected() {
        let small = Dot::new(Color::RED, Vec2::ZERO, 30.0, Vec2::ONE);
        let big = Dot::new(Color::BLUE, Vec2::ZERO, 210.0, Vec2::ONE);
        let err = GameState::new(small, big, surface(), 1).unwrap_err();
        assert!(matches!(err, Error::BodyDoesNotFit { name: "big", .. }));
    }

    #[test]
    fn test_fractional_radius_on_exact_fit_rejected() {
        let tight = Bounds::new(61.0, 61.0);
        let small = Dot::new(Color::RED, Vec2::new(30.5, 30.5), 30.5, Vec2::ONE);
        let big = Dot::new(Color::BLUE, Vec2::new(30.0, 30.0), 10.0, Vec2::ONE);
        let err = GameState::new(small, big, tight, 1).unwrap_err();
        assert!(matches!(err, Error::BodyDoesNotFit { name: "small", .. }));

        // One more pixel leaves room for a whole center, and teleporting works
        let roomy = Bounds::new(62.0, 62.0);
        let small = Dot::new(Color::RED, Vec2::new(31.0, 31.0), 30.5, Vec2::ONE);
        let big = Dot::new(Color::BLUE, Vec2::new(30.0, 30.0), 10.0, Vec2::ONE);
        let mut state = GameState::new(small, big, roomy, 1).unwrap();
        state.on_teleport_request();
        assert_eq!(state.small().center(), Vec2::new(31.0, 31.0));
    }

    #[test]
    fn test_bad_radius_rejected() {
        let small = Dot::new(Color::RED, Vec2::ZERO, 0.0, Vec2::ONE);
        let big = Dot::new(Color::BLUE, Vec2::ZERO, 40.0, Vec2::ONE);
        let err = GameState::new(small, big, surface(), 1).unwrap_err();
        assert!(matches!(err, Error::InvalidRadius { name: "small", .. }));

        let small = Dot::new(Color::RED, Vec2::ZERO, f32::NAN, Vec2::ONE);
        let big = Dot::new(Color::BLUE, Vec2::ZERO, 40.0, Vec2::ONE);
        assert!(GameState::new(small, big, surface(), 1).is_err());
    }
}
