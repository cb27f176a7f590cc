//! Per-frame update and player input
//!
//! Both operations are no-ops once the game is over.

use super::state::{GamePhase, GameState};

impl GameState {
    /// Advance one frame.
    ///
    /// Moves the small dot then the big one, sets the score from the elapsed
    /// wall-clock time, and ends the game if the dots now touch.
    pub fn on_frame(&mut self, elapsed_seconds: f64) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        self.small.advance(self.bounds);
        self.big.advance(self.bounds);
        self.score = elapsed_seconds.max(0.0).floor() as u64;

        if self.small.intersects(&self.big) {
            self.phase = GamePhase::GameOver;
            log::info!("Game over: dots collided, final score {}", self.score);
        }
    }

    /// Teleport both dots to independent random positions.
    pub fn on_teleport_request(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        self.small.randomize_position(self.bounds, &mut self.rng);
        self.big.randomize_position(self.bounds, &mut self.rng);
        log::debug!(
            "Teleported dots to {:?} and {:?}",
            self.small.center(),
            self.big.center()
        );
    }
}
