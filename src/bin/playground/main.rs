//! gesture-playground - play the controls with the mouse in a terminal
//!
//! Run with: cargo run --bin gesture-playground
//! Logs go to gesture-playground.log (set RUST_LOG for more).

mod app;
mod konami;
mod ui;

use std::{fs::File, io::stdout};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use env_logger::{Env, Target};

use app::App;
use gesture_synth::{Playground, PlaygroundConfig};

const LOG_FILE: &str = "gesture-playground.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    // stderr belongs to the terminal UI
    let log = File::create(LOG_FILE).wrap_err("failed to create log file")?;
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(log)))
        .init();

    let playground = Playground::new(PlaygroundConfig::default());

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture, EnableFocusChange).wrap_err("failed to enable mouse capture")?;
    let result = App::new(playground).run(&mut terminal);
    let restored = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();

    result?;
    restored.wrap_err("failed to disable mouse capture")
}
