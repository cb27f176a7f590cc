//! Fixed-rate game loop
//!
//! poll input -> update -> render -> wait, until the player closes the game.
//! Reaching game over does not stop the loop; the last frame stays on screen
//! with a banner until close.

use glam::Vec2;

use crate::color::Color;
use crate::error::Result;
use crate::platform::{Clock, InputEvent, InputSource, Surface, TextStyle};
use crate::settings::Settings;
use crate::sim::GameState;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Whether the loop should keep going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Rolling frames-per-second estimate over the last `FPS_WINDOW` frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    recorded: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            recorded: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.recorded = (self.recorded + 1).min(FPS_WINDOW);

        if self.recorded == FPS_WINDOW {
            // frame_index now points at the oldest sample
            let elapsed = time - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Owns the game state and drives it through the platform traits
pub struct GameLoop {
    state: GameState,
    settings: Settings,
    close_requested: bool,
    fps: FpsCounter,
}

impl GameLoop {
    pub fn new(state: GameState, settings: Settings) -> Self {
        Self {
            state,
            settings,
            close_requested: false,
            fps: FpsCounter::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Run until close is requested
    pub fn run<S, C, I>(&mut self, surface: &mut S, clock: &mut C, input: &mut I) -> Result<()>
    where
        S: Surface + ?Sized,
        C: Clock + ?Sized,
        I: InputSource + ?Sized,
    {
        let bounds = self.state.bounds();
        log::info!(
            "Starting game: seed {}, {}x{} surface, {} fps",
            self.state.seed(),
            bounds.width,
            bounds.height,
            self.settings.frame_rate
        );

        while self.step(surface, clock, input)? == LoopControl::Continue {
            clock.wait_for_next_frame(self.settings.frame_rate);
        }

        log::info!("Close requested, final score {}", self.state.score());
        Ok(())
    }

    /// One full iteration. A close seen while polling still finishes this frame.
    pub fn step<S, C, I>(
        &mut self,
        surface: &mut S,
        clock: &mut C,
        input: &mut I,
    ) -> Result<LoopControl>
    where
        S: Surface + ?Sized,
        C: Clock + ?Sized,
        I: InputSource + ?Sized,
    {
        for event in input.poll_events()? {
            self.handle_event(event);
        }

        let elapsed = clock.elapsed_seconds();
        self.state.on_frame(elapsed);
        self.fps.record(elapsed);

        self.draw(surface)?;

        Ok(if self.close_requested {
            LoopControl::Exit
        } else {
            LoopControl::Continue
        })
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::CloseRequested => self.close_requested = true,
            InputEvent::PointerReleased if self.state.is_playing() => {
                self.state.on_teleport_request();
            }
            InputEvent::PointerReleased | InputEvent::Other => {}
        }
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        let hud = TextStyle::new(Color::WHITE, Color::BLACK);

        surface.clear(Color::BLACK);
        surface.draw_text(&format!("Score: {}", self.state.score()), Vec2::ZERO, hud);

        for dot in [self.state.small(), self.state.big()] {
            surface.draw_circle(dot.center(), dot.radius(), dot.color());
        }

        if !self.state.is_playing() {
            let banner = TextStyle::new(self.state.small().color(), self.state.big().color());
            let y = surface.size().height - surface.font_height();
            surface.draw_text("GAME OVER", Vec2::new(0.0, y), banner);
        }

        if self.settings.show_fps {
            let y = surface.font_height();
            surface.draw_text(&format!("FPS: {}", self.fps.fps()), Vec2::new(0.0, y), hud);
        }

        surface.present()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::consts::*;
    use crate::sim::{Bounds, Dot, GamePhase};

    #[derive(Debug, Clone, PartialEq)]
    enum DrawOp {
        Clear(Color),
        Circle(Vec2, f32, Color),
        Text(String, Vec2, TextStyle),
        Present,
    }

    struct RecordingSurface {
        ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self { ops: Vec::new() }
        }

        /// Ops of the most recent presented frame
        fn last_frame(&self) -> &[DrawOp] {
            let start = self
                .ops
                .iter()
                .rposition(|op| matches!(op, DrawOp::Clear(_)))
                .unwrap_or(0);
            &self.ops[start..]
        }

        fn presents(&self) -> usize {
            self.ops.iter().filter(|op| **op == DrawOp::Present).count()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Bounds {
            Bounds::new(SURFACE_WIDTH, SURFACE_HEIGHT)
        }

        fn font_height(&self) -> f32 {
            FONT_SIZE
        }

        fn clear(&mut self, background: Color) {
            self.ops.push(DrawOp::Clear(background));
        }

        fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.ops.push(DrawOp::Circle(center, radius, color));
        }

        fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle) {
            self.ops.push(DrawOp::Text(text.to_string(), position, style));
        }

        fn present(&mut self) -> Result<()> {
            self.ops.push(DrawOp::Present);
            Ok(())
        }
    }

    /// Advances a fixed step per frame wait
    struct ManualClock {
        now: f64,
        waits: usize,
    }

    impl ManualClock {
        fn new() -> Self {
            Self { now: 0.0, waits: 0 }
        }
    }

    impl Clock for ManualClock {
        fn elapsed_seconds(&self) -> f64 {
            self.now
        }

        fn wait_for_next_frame(&mut self, frame_rate: u32) {
            self.now += 1.0 / frame_rate as f64;
            self.waits += 1;
        }
    }

    /// One batch of events per poll; empty once exhausted
    struct ScriptedInput {
        polls: VecDeque<Vec<InputEvent>>,
    }

    impl ScriptedInput {
        fn new(polls: Vec<Vec<InputEvent>>) -> Self {
            Self {
                polls: polls.into(),
            }
        }

        /// `frames` quiet polls followed by a close
        fn close_after(frames: usize) -> Self {
            let mut polls = vec![Vec::new(); frames];
            polls.push(vec![InputEvent::CloseRequested]);
            Self::new(polls)
        }
    }

    impl InputSource for ScriptedInput {
        fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
            Ok(self.polls.pop_front().unwrap_or_default())
        }
    }

    fn surface() -> Bounds {
        Bounds::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    fn head_on() -> GameState {
        let small = Dot::new(Color::RED, Vec2::new(100.0, 200.0), 30.0, Vec2::new(2.0, 0.0));
        let big = Dot::new(Color::BLUE, Vec2::new(300.0, 200.0), 40.0, Vec2::new(-2.0, 0.0));
        GameState::new(small, big, surface(), 5).unwrap()
    }

    fn far_apart() -> GameState {
        let small = Dot::new(Color::RED, Vec2::new(50.0, 75.0), 30.0, Vec2::new(1.0, 2.0));
        let big = Dot::new(Color::BLUE, Vec2::new(200.0, 100.0), 40.0, Vec2::new(2.0, 1.0));
        GameState::new(small, big, surface(), 5).unwrap()
    }

    #[test]
    fn test_close_ends_loop_while_playing() {
        let mut game = GameLoop::new(far_apart(), Settings::default());
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::close_after(10);

        game.run(&mut surface, &mut clock, &mut input).unwrap();

        assert!(game.close_requested());
        assert!(game.state().is_playing());
        // Ten quiet frames plus the frame the close arrived in
        assert_eq!(surface.presents(), 11);
        assert_eq!(clock.waits, 10);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut game = GameLoop::new(far_apart(), Settings::default());
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::new(vec![]);

        let control = game.step(&mut surface, &mut clock, &mut input).unwrap();
        assert_eq!(control, LoopControl::Continue);

        let hud = TextStyle::new(Color::WHITE, Color::BLACK);
        assert_eq!(
            surface.last_frame(),
            &[
                DrawOp::Clear(Color::BLACK),
                DrawOp::Text("Score: 0".to_string(), Vec2::ZERO, hud),
                DrawOp::Circle(Vec2::new(51.0, 77.0), 30.0, Color::RED),
                DrawOp::Circle(Vec2::new(202.0, 101.0), 40.0, Color::BLUE),
                DrawOp::Present,
            ]
        );
    }

    #[test]
    fn test_close_still_finishes_frame() {
        let mut game = GameLoop::new(far_apart(), Settings::default());
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::new(vec![vec![InputEvent::CloseRequested]]);

        let control = game.step(&mut surface, &mut clock, &mut input).unwrap();
        assert_eq!(control, LoopControl::Exit);
        assert_eq!(game.state().small().center(), Vec2::new(51.0, 77.0));
        assert_eq!(surface.presents(), 1);
    }

    #[test]
    fn test_pointer_release_teleports_while_playing() {
        let mut game = GameLoop::new(far_apart(), Settings::default());
        let mut twin = far_apart();
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::new(vec![vec![
            InputEvent::Other,
            InputEvent::PointerReleased,
        ]]);

        game.step(&mut surface, &mut clock, &mut input).unwrap();
        twin.on_frame(0.0);

        let state = game.state();
        assert_ne!(state.small().center(), twin.small().center());
        assert_ne!(state.big().center(), twin.big().center());
        assert_eq!(state.small().velocity(), twin.small().velocity());
        assert_eq!(state.big().velocity(), twin.big().velocity());
    }

    #[test]
    fn test_other_events_ignored() {
        let mut game = GameLoop::new(far_apart(), Settings::default());
        let mut twin = far_apart();
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::new(vec![vec![InputEvent::Other; 5]]);

        let control = game.step(&mut surface, &mut clock, &mut input).unwrap();
        twin.on_frame(0.0);

        assert_eq!(control, LoopControl::Continue);
        assert_eq!(game.state().small(), twin.small());
        assert_eq!(game.state().big(), twin.big());
    }

    #[test]
    fn test_game_over_keeps_rendering_until_close() {
        let mut game = GameLoop::new(head_on(), Settings::default());
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();

        // Collides on frame 33; keep going well past it, poking all the way
        let mut polls: Vec<Vec<InputEvent>> = vec![Vec::new(); 40];
        polls.extend(vec![vec![InputEvent::PointerReleased]; 20]);
        polls.push(vec![InputEvent::CloseRequested]);
        let mut input = ScriptedInput::new(polls);

        game.run(&mut surface, &mut clock, &mut input).unwrap();

        assert_eq!(game.state().phase(), GamePhase::GameOver);
        assert_eq!(surface.presents(), 61);

        let frame = surface.last_frame();
        let banner = TextStyle::new(Color::RED, Color::BLUE);
        assert!(frame.contains(&DrawOp::Text(
            "GAME OVER".to_string(),
            Vec2::new(0.0, SURFACE_HEIGHT - FONT_SIZE),
            banner,
        )));
        // Frozen where they met
        assert!(frame.contains(&DrawOp::Circle(Vec2::new(166.0, 200.0), 30.0, Color::RED)));
        assert!(frame.contains(&DrawOp::Circle(Vec2::new(234.0, 200.0), 40.0, Color::BLUE)));
    }

    #[test]
    fn test_fps_readout_when_enabled() {
        let settings = Settings {
            show_fps: true,
            ..Default::default()
        };
        let mut game = GameLoop::new(far_apart(), settings);
        let mut surface = RecordingSurface::new();
        let mut clock = ManualClock::new();
        let mut input = ScriptedInput::close_after(100);

        game.run(&mut surface, &mut clock, &mut input).unwrap();

        let hud = TextStyle::new(Color::WHITE, Color::BLACK);
        assert!(surface.last_frame().contains(&DrawOp::Text(
            "FPS: 90".to_string(),
            Vec2::new(0.0, FONT_SIZE),
            hud,
        )));
    }

    #[test]
    fn test_fps_counter_needs_full_window() {
        let mut fps = FpsCounter::default();
        for i in 0..FPS_WINDOW - 1 {
            fps.record(i as f64 / 30.0);
        }
        assert_eq!(fps.fps(), 0);
        fps.record((FPS_WINDOW - 1) as f64 / 30.0);
        assert_eq!(fps.fps(), 30);
    }
}
