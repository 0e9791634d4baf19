use crate::input::Hitbox;
use crate::{Coords, TermInt};
use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("could not {action} the terminal")]
    Setup {
        action: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("could not read terminal events")]
    Input(#[source] io::Error),
    #[error("could not write to the terminal")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TermError>;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

/// A centered box of text lines, as last drawn.
pub struct Message {
    top_left: Coords,
    width: TermInt,
    lines: Vec<usize>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().map_err(|source| TermError::Setup { action: "measure", source })?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide, cursor::DisableBlinking)
            .map_err(|source| TermError::Setup { action: "set up", source })?;
        terminal::enable_raw_mode().map_err(|source| TermError::Setup { action: "enter raw mode on", source })
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().map_err(|source| TermError::Setup { action: "leave raw mode on", source })?;
        execute!(self.stdout, DisableMouseCapture, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .map_err(|source| TermError::Setup { action: "restore", source })
    }

    /// Waits up to `timeout` for the next event.
    pub fn poll_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout).map_err(TermError::Input)? {
            return Ok(None);
        }
        event::read().map(Some).map_err(TermError::Input)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn set_terminal_size(&mut self, size: Coords) {
        self.width = size.0;
        self.height = size.1;
    }

    /// Draws a frame around an inner area of `size` whose top-left cell is `inner`.
    pub fn draw_borders(&mut self, inner: Coords, size: Coords) -> Result<()> {
        let (width, height) = (size.0 + 2, size.1 + 2);
        let (x0, y0) = (inner.0.saturating_sub(1), inner.1.saturating_sub(1));
        let (end_x, end_y) = (x0 + width - 1, y0 + height - 1);

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    /// Prints `lines` centered on screen inside a padded box.
    pub fn show_message(&mut self, lines: &[&str]) -> Result<Message> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            self.print_str_at((top_left.0, y), &" ".repeat(msg_width as usize), Color::White)?;
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_str_at((top_left.0, y), &padded_line, Color::White)?;
        }

        let lines = lines.iter().map(|x| x.chars().count()).collect();
        Ok(Message { top_left, width: msg_width, lines })
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Coords, s: &str, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(s),
            style::ResetColor
        )?;
        Ok(())
    }

    pub fn print_styled_at(&mut self, pos: Coords, s: &str, fg: Color, bg: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(bg),
            style::Print(s),
            style::ResetColor
        )?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Message {
    /// Where line `i` sits on screen, for click tests.
    pub fn line_hitbox(&self, i: usize) -> Option<Hitbox> {
        let len = *self.lines.get(i)? as TermInt;
        let x = self.top_left.0 + (self.width.saturating_sub(len)) / 2;
        let y = self.top_left.1 + 1 + i as TermInt;
        Some(Hitbox::new((x, y), len, 1))
    }
}
