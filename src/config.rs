//! Command line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::grid::{CellSize, Container, RESIZE_DEBOUNCE, TERMINAL_CELL};

pub const DEFAULT_TICK_MS: u64 = 100;

/// Terminals this narrow count as small screens. 768px at roughly 10px per column.
pub const SMALL_SCREEN_COLUMNS: u16 = 76;

/// Coming soon: a quick game of snake, then how to reach us.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// When to draw the clickable direction pad under the board.
    #[arg(long, value_enum, default_value_t = TouchControls::Auto, env = "SNAKE_TOUCH_CONTROLS")]
    pub touch_controls: TouchControls,

    /// Milliseconds between snake moves.
    #[arg(
        long = "tick-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(10..=2_000)
    )]
    pub tick_ms: u64,

    /// Share of the terminal width the board may use.
    #[arg(long, value_name = "PERCENT", default_value_t = 80, value_parser = clap::value_parser!(u8).range(10..=100))]
    pub width_percent: u8,

    /// Share of the terminal height the board may use.
    #[arg(long, value_name = "PERCENT", default_value_t = 40, value_parser = clap::value_parser!(u8).range(10..=100))]
    pub height_percent: u8,

    /// Largest board side, in cells.
    #[arg(long, value_name = "CELLS", default_value_t = 24, value_parser = clap::value_parser!(u16).range(1..=500))]
    pub max_cells: u16,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file. Nothing is logged otherwise, the screen belongs to the game.
    #[arg(long, value_name = "PATH", env = "SNAKE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug`. Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TouchControls {
    /// Only on small terminals.
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick: Duration,
    pub resize_debounce: Duration,
    pub cell: CellSize,
    pub container: Container,
    pub touch_controls: TouchControls,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl TouchControls {
    pub fn resolve(self, terminal_width: u16) -> bool {
        match self {
            TouchControls::Auto => terminal_width <= SMALL_SCREEN_COLUMNS,
            TouchControls::Always => true,
            TouchControls::Never => false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            tick: Duration::from_millis(args.tick_ms),
            resize_debounce: RESIZE_DEBOUNCE,
            cell: TERMINAL_CELL,
            container: Container {
                width_percent: args.width_percent,
                height_percent: args.height_percent,
                max_cells: args.max_cells,
            },
            touch_controls: args.touch_controls,
            seed: args.seed,
            log_file: args.log_file,
            log_level: args.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("coming-soon").chain(args.iter().copied());
        Args::try_parse_from(argv).map(Config::from)
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.tick, Duration::from_millis(100));
        assert_eq!(config.resize_debounce, Duration::from_millis(150));
        assert_eq!(config.container, Container::default());
        assert_eq!(config.cell, TERMINAL_CELL);
        assert_eq!(config.seed, None);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn overrides() {
        let config = parse(&["--tick-ms", "250", "--touch-controls", "always", "--seed", "9", "--max-cells", "12"])
            .unwrap();
        assert_eq!(config.tick, Duration::from_millis(250));
        assert_eq!(config.touch_controls, TouchControls::Always);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.container.max_cells, 12);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["--tick-ms", "5"]).is_err());
        assert!(parse(&["--width-percent", "150"]).is_err());
        assert!(parse(&["--max-cells", "0"]).is_err());
    }

    #[test]
    fn touch_controls_follow_screen_size_in_auto() {
        assert!(TouchControls::Auto.resolve(60));
        assert!(!TouchControls::Auto.resolve(120));
        assert!(TouchControls::Always.resolve(120));
        assert!(!TouchControls::Never.resolve(60));
    }
}
