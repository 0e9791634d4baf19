mod app;
mod config;
mod game;
mod grid;
mod input;
mod render;
mod session;
mod snake;
mod term;
mod timer;

use std::fs::File;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::{Args, Config};

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> anyhow::Result<()> {
    let config = Config::from(Args::parse());
    let _guard = init_logging(&config)?;

    info!(tick = ?config.tick, touch_controls = ?config.touch_controls, "starting");

    let mut app = app::App::new(config).context("could not open the terminal")?;
    // The app restores the terminal before handing back any error
    app.run().context("the game stopped unexpectedly")?;

    Ok(())
}

/// Logs go to a file only, the terminal is busy drawing the game.
fn init_logging(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };

    let filter = match &config.log_level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level {:?}", level))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();

    Ok(Some(guard))
}
