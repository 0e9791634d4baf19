//! Maps raw terminal events onto what the page and the game care about.
//!
//! Arrow keys and the on-screen pad both end up as `Command::Turn`, which the
//! app hands to `SnakeGame::set_heading`. Validation lives there, not here.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::snake::Direction::{self, *};
use crate::Coords;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Activate the button on screen (Enter or Space).
    Confirm,
    Quit,
}

/// A clickable rectangle in terminal cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub top_left: Coords,
    pub width: u16,
    pub height: u16,
}

/// The four directional buttons, laid out as a plus sign:
///
/// ```text
///       [ ↑ ]
/// [ ← ]       [ → ]
///       [ ↓ ]
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TouchPad {
    top_left: Coords,
}

const BUTTON_WIDTH: u16 = 5;
const BUTTON_GAP: u16 = 1;

impl Command {
    pub fn from_key_event(ev: &KeyEvent) -> Option<Command> {
        if ev.kind == KeyEventKind::Release {
            return None;
        }

        match ev.code {
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Up | KeyCode::Char('w') => Some(Command::Turn(Up)),
            KeyCode::Down | KeyCode::Char('s') => Some(Command::Turn(Down)),
            KeyCode::Left | KeyCode::Char('a') => Some(Command::Turn(Left)),
            KeyCode::Right | KeyCode::Char('d') => Some(Command::Turn(Right)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Confirm),
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Position of a left click, if `ev` is one.
pub fn left_click(ev: &Event) -> Option<Coords> {
    match ev {
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
            Some((*column, *row))
        }
        _ => None,
    }
}

impl Hitbox {
    pub fn new(top_left: Coords, width: u16, height: u16) -> Self {
        Hitbox { top_left, width, height }
    }

    pub fn contains(&self, pos: Coords) -> bool {
        let (x, y) = self.top_left;
        pos.0 >= x && pos.0 < x + self.width && pos.1 >= y && pos.1 < y + self.height
    }
}

impl TouchPad {
    pub const WIDTH: u16 = 3 * BUTTON_WIDTH + 2 * BUTTON_GAP;
    pub const HEIGHT: u16 = 3;

    pub fn new(top_left: Coords) -> Self {
        TouchPad { top_left }
    }

    pub fn buttons(&self) -> [(Direction, Hitbox); 4] {
        let (x, y) = self.top_left;
        let col = |i: u16| x + i * (BUTTON_WIDTH + BUTTON_GAP);
        let button = |i, j| Hitbox::new((col(i), y + j), BUTTON_WIDTH, 1);

        [(Up, button(1, 0)), (Left, button(0, 1)), (Right, button(2, 1)), (Down, button(1, 2))]
    }

    pub fn button_at(&self, pos: Coords) -> Option<Direction> {
        self.buttons().iter().find(|(_, hitbox)| hitbox.contains(pos)).map(|(dir, _)| *dir)
    }
}

pub fn button_label(dir: Direction) -> &'static str {
    match dir {
        Up => "[ ↑ ]",
        Down => "[ ↓ ]",
        Left => "[ ← ]",
        Right => "[ → ]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(Command::from_key_event(&key(KeyCode::Up)), Some(Command::Turn(Up)));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('a'))), Some(Command::Turn(Left)));
        assert_eq!(Command::from_key_event(&key(KeyCode::Right)), Some(Command::Turn(Right)));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('s'))), Some(Command::Turn(Down)));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quitting_and_confirming() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key_event(&ctrl_c), Some(Command::Quit));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('c'))), None);
        assert_eq!(Command::from_key_event(&key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(Command::from_key_event(&key(KeyCode::Enter)), Some(Command::Confirm));
    }

    #[test]
    fn key_releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(Command::from_key_event(&release), None);
    }

    #[test]
    fn pad_hit_test() {
        let pad = TouchPad::new((10, 20));
        assert_eq!(pad.button_at((16, 20)), Some(Up));
        assert_eq!(pad.button_at((20, 20)), Some(Up));
        assert_eq!(pad.button_at((10, 21)), Some(Left));
        assert_eq!(pad.button_at((26, 21)), Some(Right));
        assert_eq!(pad.button_at((18, 22)), Some(Down));
        // The middle of the plus and the corners are empty.
        assert_eq!(pad.button_at((18, 21)), None);
        assert_eq!(pad.button_at((10, 20)), None);
        assert_eq!(pad.button_at((27, 21)), None);
    }

    #[test]
    fn left_clicks_only() {
        let click = |kind| {
            Event::Mouse(MouseEvent { kind, column: 3, row: 4, modifiers: KeyModifiers::NONE })
        };
        assert_eq!(left_click(&click(MouseEventKind::Down(MouseButton::Left))), Some((3, 4)));
        assert_eq!(left_click(&click(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(left_click(&click(MouseEventKind::Moved)), None);
    }
}
