//! Poke the Dots entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::File;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use poke_the_dots::consts::*;
    use poke_the_dots::platform::terminal::{SystemClock, TerminalInput, TerminalSurface};
    use poke_the_dots::sim::{Bounds, GameState};
    use poke_the_dots::{GameLoop, Settings};

    /// Two dots bounce around; click to teleport them before they touch.
    #[derive(Parser)]
    #[command(name = "poke-the-dots")]
    #[command(version, about)]
    struct Cli {
        /// JSON settings file (defaults are used if it does not exist)
        #[arg(long, default_value = "poke-the-dots.json")]
        settings: PathBuf,

        /// RNG seed, overrides the settings file
        #[arg(long)]
        seed: Option<u64>,

        /// Target frames per second, overrides the settings file
        #[arg(long)]
        frame_rate: Option<u32>,
    }

    /// The terminal is the UI, so logs go to a file and only when asked for
    fn init_logging() -> Result<()> {
        if std::env::var_os("RUST_LOG").is_none() {
            return Ok(());
        }
        let file = File::create("poke-the-dots.log").context("Failed to create log file")?;
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        Ok(())
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        init_logging()?;

        let mut settings = Settings::load_from(&cli.settings)
            .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;
        if let Some(seed) = cli.seed {
            settings.seed = Some(seed);
        }
        if let Some(frame_rate) = cli.frame_rate {
            settings.frame_rate = frame_rate;
        }
        settings.validate().context("Invalid settings")?;

        let seed = settings.seed.unwrap_or_else(rand::random);
        let bounds = Bounds::new(SURFACE_WIDTH, SURFACE_HEIGHT);
        let state = GameState::new_game(bounds, seed).context("Failed to set up game")?;
        let mut game = GameLoop::new(state, settings);

        let mut surface = TerminalSurface::new(bounds).context("Failed to set up terminal")?;
        let result = game.run(
            &mut surface,
            &mut SystemClock::new(),
            &mut TerminalInput::new(),
        );
        surface.restore().context("Failed to restore terminal")?;
        result.context("Game loop failed")?;

        println!("Final score: {}", game.state().score());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = poke_the_dots::platform::web::run().await {
        log::error!("Poke the Dots failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
