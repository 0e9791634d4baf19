//! Which screen is up, the running game and the timers that drive it.
//!
//! Nothing here touches the terminal. Every transition returns a `Redraw`
//! telling the app what to put on screen next.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::Config;
use crate::game::{make_rng, SnakeGame};
use crate::grid::{CellSize, GridSize, GridSizer};
use crate::snake::Direction;
use crate::timer::{earliest, Interval};
use crate::Coords;

/// One step of the "Coming Soon" dots per tick of `DOTS_STEP`.
const DOTS: [&str; 4] = ["...", "", ".", ".."];
const DOTS_STEP: Duration = Duration::from_millis(500);
/// Extra wait on the last step before the dots start over.
const DOTS_REPEAT_DELAY: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Playing,
    Contact,
}

/// What has to be drawn after a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    /// Only the "Coming Soon" line changed.
    Dots,
    /// Landing screen from scratch.
    Landing,
    /// The board changed in place.
    Board,
    /// Clear, then draw the board if there is one.
    NewBoard,
    /// Clear, then the contact panel.
    Contact,
}

pub struct Session {
    config: Config,
    screen: Screen,
    sizer: GridSizer,
    game: Option<SnakeGame>,
    game_over: Rc<Cell<bool>>,
    ticks: Interval,
    dots: Interval,
    dots_phase: usize,
    show_touch_controls: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            sizer: GridSizer::new(config.cell, config.container, config.resize_debounce),
            ticks: Interval::new(config.tick),
            dots: Interval::new(DOTS_STEP),
            config,
            screen: Screen::Landing,
            game: None,
            game_over: Rc::new(Cell::new(false)),
            dots_phase: 0,
            show_touch_controls: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn game(&self) -> Option<&SnakeGame> {
        self.game.as_ref()
    }

    pub fn cell(&self) -> CellSize {
        self.config.cell
    }

    pub fn show_touch_controls(&self) -> bool {
        self.show_touch_controls
    }

    pub fn dots(&self) -> &'static str {
        DOTS[self.dots_phase]
    }

    /// The next moment any timer wants to run.
    pub fn deadline(&self) -> Option<Instant> {
        earliest([self.ticks.deadline(), self.dots.deadline(), self.sizer.deadline()])
    }

    pub fn show_landing(&mut self, now: Instant) -> Redraw {
        self.teardown();
        self.screen = Screen::Landing;
        self.dots_phase = 0;
        self.dots.start(now);
        Redraw::Landing
    }

    /// Play and Replay both land here. The pad is decided once per game.
    pub fn start_game(&mut self, viewport: Coords, now: Instant) -> Redraw {
        self.teardown();
        self.screen = Screen::Playing;
        self.show_touch_controls = self.config.touch_controls.resolve(viewport.0);
        let config = &self.config;
        self.sizer = GridSizer::new(config.cell, config.container, config.resize_debounce);
        info!(touch_controls = self.show_touch_controls, "starting game");

        match self.sizer.measure_now(viewport) {
            Some(grid) => self.remount(grid, now),
            None => {
                info!(?viewport, "no room for a board yet");
                Redraw::NewBoard
            }
        }
    }

    /// Only the game screen re-measures; the other screens just redraw.
    pub fn resize(&mut self, viewport: Coords, now: Instant) {
        if self.screen == Screen::Playing {
            self.sizer.on_resize(viewport, now);
        }
    }

    /// Keyboard and pad both land here.
    pub fn turn(&mut self, dir: Direction) {
        if let Some(game) = self.game.as_mut() {
            let accepted = game.set_heading(dir);
            debug!(?dir, accepted, heading = ?game.heading(), "heading requested");
        }
    }

    pub fn fire_dots(&mut self, now: Instant) -> Redraw {
        if !self.dots.fire(now) {
            return Redraw::Nothing;
        }

        self.dots_phase = (self.dots_phase + 1) % DOTS.len();
        if self.dots_phase == DOTS.len() - 1 {
            self.dots.postpone(DOTS_REPEAT_DELAY);
        }
        Redraw::Dots
    }

    pub fn fire_resize(&mut self, now: Instant) -> Redraw {
        let previous = self.sizer.grid();
        match self.sizer.poll(now) {
            Some(grid) => {
                info!(?previous, ?grid, "grid changed, restarting game");
                self.remount(grid, now)
            }
            None => Redraw::Nothing,
        }
    }

    pub fn fire_tick(&mut self, now: Instant) -> Redraw {
        if !self.ticks.fire(now) {
            return Redraw::Nothing;
        }
        let Some(game) = self.game.as_mut() else {
            return Redraw::Nothing;
        };

        let outcome = game.tick();
        debug!(?outcome, "tick");

        if self.game_over.get() {
            return self.end_game();
        }
        Redraw::Board
    }

    /// Cancels every timer so nothing fires after the screen it belongs to is gone.
    pub fn teardown(&mut self) {
        self.ticks.cancel();
        self.dots.cancel();
        self.sizer.cancel();
        self.game = None;
    }

    /// Throws away the current game and starts a fresh one on `grid`.
    fn remount(&mut self, grid: GridSize, now: Instant) -> Redraw {
        self.ticks.cancel();
        self.game_over.set(false);

        let flag = Rc::clone(&self.game_over);
        self.game = SnakeGame::new(grid, make_rng(self.config.seed), move || flag.set(true));

        if self.game.is_none() {
            info!(cols = grid.cols, rows = grid.rows, "no room for a board yet");
            return Redraw::NewBoard;
        }
        if self.game_over.get() {
            return self.end_game();
        }

        self.ticks.start(now);
        Redraw::NewBoard
    }

    fn end_game(&mut self) -> Redraw {
        if let Some(game) = &self.game {
            info!(status = ?game.status(), len = game.snake().len(), "showing contact panel");
        }

        self.teardown();
        self.show_touch_controls = false;
        self.screen = Screen::Contact;
        Redraw::Contact
    }
}
