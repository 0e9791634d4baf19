//! The page around the game: landing screen, the board, then the contact panel.

use std::time::{Duration, Instant};

use crossterm::event::Event;
use crossterm::style::Color;
use tracing::{error, info};

use crate::config::Config;
use crate::input::{left_click, Command, Hitbox};
use crate::render::{self, Layout};
use crate::session::{Redraw, Screen, Session};
use crate::term::{self, TermManager};
use crate::Coords;

const BRAND: &str = "N U R E M B E R G";
const BRAND_LINE: &str = "T E C H";
const LOGO_WIDTH: usize = 25;

const PLAY_BUTTON: &str = "[ Play a quick game ]";
const REPLAY_BUTTON: &str = "[ Replay ]";

const CONTACT: &[&str] = &[
    "Contact Us",
    "",
    "Email: info@nurembergtech.com",
    "Phone: +962 796-105-229",
    "Land-line: +962 62-227-913",
    "",
    "linkedin.com/company/nuremberg-group",
    "facebook.com/share/1DBDtKg3tv",
    "instagram.com/nuremberggroup.jo",
];

const HELP: &str = "Arrow keys or WASD to move, q to quit";

/// How long to wait for input when no timer is pending.
const IDLE_POLL: Duration = Duration::from_secs(1);

enum Flow {
    Continue,
    Quit,
}

/// Puts the session on screen and feeds it terminal events.
pub struct App {
    term: TermManager,
    session: Session,
    layout: Option<Layout>,
    button: Option<Hitbox>,
}

impl App {
    pub fn new(config: Config) -> term::Result<Self> {
        Ok(App {
            term: TermManager::new()?,
            session: Session::new(config),
            layout: None,
            button: None,
        })
    }

    /// Runs until the user quits. The terminal is restored on every exit path.
    pub fn run(&mut self) -> term::Result<()> {
        let res = self.term.setup().and_then(|_| self.event_loop());
        if let Err(err) = &res {
            error!(%err, "terminal failure");
        }

        self.session.teardown();
        let restored = self.term.restore();
        res.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn event_loop(&mut self) -> term::Result<()> {
        let redraw = self.session.show_landing(Instant::now());
        self.redraw(redraw)?;

        loop {
            let now = Instant::now();
            let timeout = self
                .session
                .deadline()
                .map_or(IDLE_POLL, |due| due.saturating_duration_since(now));

            if let Some(ev) = self.term.poll_event(timeout)? {
                if let Flow::Quit = self.handle_event(ev, Instant::now())? {
                    info!("quitting");
                    return Ok(());
                }
            }

            self.run_timers(Instant::now())?;
        }
    }

    fn handle_event(&mut self, ev: Event, now: Instant) -> term::Result<Flow> {
        match ev {
            Event::Key(key) => match Command::from_key_event(&key) {
                Some(Command::Quit) => return Ok(Flow::Quit),
                Some(Command::Turn(dir)) => self.session.turn(dir),
                Some(Command::Confirm) => self.press_button(now)?,
                None => {}
            },
            Event::Resize(width, height) => self.resize((width, height), now)?,
            ev => {
                if let Some(pos) = left_click(&ev) {
                    self.click(pos, now)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn run_timers(&mut self, now: Instant) -> term::Result<()> {
        let redraw = self.session.fire_dots(now);
        self.redraw(redraw)?;
        let redraw = self.session.fire_resize(now);
        self.redraw(redraw)?;
        let redraw = self.session.fire_tick(now);
        self.redraw(redraw)
    }

    fn click(&mut self, pos: Coords, now: Instant) -> term::Result<()> {
        match self.session.screen() {
            Screen::Playing => {
                let pad = self.layout.and_then(|layout| layout.pad);
                if let Some(dir) = pad.and_then(|pad| pad.button_at(pos)) {
                    self.session.turn(dir);
                }
                Ok(())
            }
            Screen::Landing | Screen::Contact => match self.button {
                Some(button) if button.contains(pos) => self.press_button(now),
                _ => Ok(()),
            },
        }
    }

    fn press_button(&mut self, now: Instant) -> term::Result<()> {
        match self.session.screen() {
            Screen::Landing | Screen::Contact => {
                let size = self.term.get_terminal_size();
                let redraw = self.session.start_game(size, now);
                self.redraw(redraw)
            }
            Screen::Playing => Ok(()),
        }
    }

    fn resize(&mut self, size: Coords, now: Instant) -> term::Result<()> {
        self.term.set_terminal_size(size);
        self.session.resize(size, now);
        self.term.clear()?;

        match self.session.screen() {
            Screen::Landing => self.draw_landing(),
            Screen::Contact => self.show_contact(),
            Screen::Playing => self.draw_game(),
        }
    }

    fn redraw(&mut self, redraw: Redraw) -> term::Result<()> {
        match redraw {
            Redraw::Nothing => Ok(()),
            Redraw::Dots => self.draw_landing(),
            Redraw::Board => self.draw_game(),
            Redraw::Landing => {
                self.layout = None;
                self.term.clear()?;
                self.draw_landing()
            }
            Redraw::NewBoard => {
                self.button = None;
                self.layout = None;
                self.term.clear()?;
                self.draw_game()
            }
            Redraw::Contact => {
                self.layout = None;
                self.term.clear()?;
                self.show_contact()
            }
        }
    }

    fn draw_game(&mut self) -> term::Result<()> {
        let Some(game) = self.session.game() else {
            return self.term.flush();
        };

        let size = self.term.get_terminal_size();
        let cell = self.session.cell();
        let layout = Layout::new(size, game.grid(), cell, self.session.show_touch_controls());
        render::draw_game(&mut self.term, &layout, &game.snapshot(), cell)?;

        if layout.board.1 >= 2 {
            let help_x = (size.0 as usize).saturating_sub(HELP.len()) / 2;
            self.term.print_str_at((help_x as u16, layout.board.1 - 2), HELP, Color::DarkGrey)?;
            self.term.flush()?;
        }

        self.layout = Some(layout);
        Ok(())
    }

    fn draw_landing(&mut self) -> term::Result<()> {
        let title = format!("Coming Soon{:<3}", self.session.dots());
        let mut lines = logo();
        lines.extend([String::new(), title, String::new(), PLAY_BUTTON.to_string()]);

        self.show_lines(&lines)
    }

    fn show_contact(&mut self) -> term::Result<()> {
        let mut lines: Vec<String> = CONTACT.iter().map(|line| line.to_string()).collect();
        lines.extend([String::new(), REPLAY_BUTTON.to_string()]);

        self.show_lines(&lines)
    }

    /// Shows a centered message whose last line is the screen's button.
    fn show_lines(&mut self, lines: &[String]) -> term::Result<()> {
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let msg = self.term.show_message(&lines)?;
        self.button = msg.line_hitbox(lines.len() - 1);
        self.term.flush()
    }
}

fn logo() -> Vec<String> {
    let bar = "═".repeat(LOGO_WIDTH - 2);
    vec![
        format!("╔{}╗", bar),
        format!("║{:^width$}║", BRAND, width = LOGO_WIDTH - 2),
        format!("║{:^width$}║", BRAND_LINE, width = LOGO_WIDTH - 2),
        format!("╚{}╝", bar),
    ]
}
