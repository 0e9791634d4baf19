use crossterm::style::Color;

use crate::game::Snapshot;
use crate::grid::{CellSize, GridSize};
use crate::input::{button_label, TouchPad};
use crate::term::{self, TermManager};
use crate::Coords;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_STR: &str = "()";
const SNAKE_COLOR: Color = Color::White;
const APPLE_COLOR: Color = Color::White;
const APPLE_BG: Color = Color::DarkGrey;
const BACKGROUND: Color = Color::Black;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellKind {
    Background,
    Snake,
    Food,
}

/// What every cell of the board shows, row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    grid: GridSize,
    cells: Vec<CellKind>,
}

/// Where the board and the pad go on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Top-left screen cell inside the border.
    pub board: Coords,
    /// Inner size of the board in screen cells.
    pub board_size: Coords,
    pub pad: Option<TouchPad>,
}

/// Pure projection of a snapshot. The snake wins over food if they ever share a cell.
pub fn project(snapshot: &Snapshot<'_>) -> Frame {
    let grid = snapshot.grid;
    let mut cells = vec![CellKind::Background; grid.area()];

    if let Some(food) = snapshot.food.filter(|pos| grid.contains(*pos)) {
        cells[index(grid, food)] = CellKind::Food;
    }
    for pos in snapshot.snake.body().iter().filter(|pos| grid.contains(**pos)) {
        cells[index(grid, *pos)] = CellKind::Snake;
    }

    Frame { grid, cells }
}

fn index(grid: GridSize, pos: Coords) -> usize {
    pos.1 as usize * grid.cols as usize + pos.0 as usize
}

impl Frame {
    pub fn get(&self, pos: Coords) -> Option<CellKind> {
        if !self.grid.contains(pos) {
            return None;
        }
        self.cells.get(index(self.grid, pos)).copied()
    }
}

impl Layout {
    /// Centers the bordered board, with the pad one row below it when shown.
    pub fn new(screen: Coords, grid: GridSize, cell: CellSize, show_pad: bool) -> Self {
        let board_size = (grid.cols * cell.width, grid.rows * cell.height);
        let pad_height = if show_pad { TouchPad::HEIGHT + 1 } else { 0 };
        let total_height = board_size.1 + 2 + pad_height;

        let x = screen.0.saturating_sub(board_size.0 + 2) / 2 + 1;
        let y = screen.1.saturating_sub(total_height) / 2 + 1;

        let pad = show_pad.then(|| {
            let pad_x = screen.0.saturating_sub(TouchPad::WIDTH) / 2;
            TouchPad::new((pad_x, y + board_size.1 + 2))
        });

        Layout { board: (x, y), board_size, pad }
    }
}

/// Draws the board: border, every cell, and the pad if there is one.
pub fn draw_game(
    term: &mut TermManager,
    layout: &Layout,
    snapshot: &Snapshot<'_>,
    cell: CellSize,
) -> term::Result<()> {
    let frame = project(snapshot);
    let head = snapshot.snake.head();
    let cell_width = cell.width as usize;

    term.draw_borders(layout.board, layout.board_size)?;

    for pos in frame.grid.cells() {
        let kind = frame.get(pos).unwrap_or(CellKind::Background);
        let screen_pos = (
            layout.board.0 + pos.0 * cell.width,
            layout.board.1 + pos.1 * cell.height,
        );

        for row in 0..cell.height {
            let at = (screen_pos.0, screen_pos.1 + row);
            match kind {
                CellKind::Snake if pos == head => {
                    let glyph = snapshot.snake.head_char().to_string().repeat(cell_width);
                    term.print_styled_at(at, &glyph, BACKGROUND, SNAKE_COLOR)?;
                }
                CellKind::Snake => {
                    let body = SNAKE_BODY_CHAR.to_string().repeat(cell_width);
                    term.print_str_at(at, &body, SNAKE_COLOR)?;
                }
                CellKind::Food => {
                    let marker = format!("{:^width$}", APPLE_STR, width = cell_width);
                    term.print_styled_at(at, &marker, APPLE_COLOR, APPLE_BG)?;
                }
                CellKind::Background => {
                    term.print_styled_at(at, &" ".repeat(cell_width), BACKGROUND, BACKGROUND)?;
                }
            }
        }
    }

    if let Some(pad) = &layout.pad {
        draw_pad(term, pad)?;
    }

    term.flush()
}

fn draw_pad(term: &mut TermManager, pad: &TouchPad) -> term::Result<()> {
    for (dir, hitbox) in pad.buttons() {
        term.print_styled_at(hitbox.top_left, button_label(dir), Color::Black, Color::White)?;
    }
    Ok(())
}
