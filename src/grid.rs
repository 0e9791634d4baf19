use std::time::{Duration, Instant};

use tracing::debug;

use crate::timer::Debounce;
use crate::Coords;

/// A game cell in the terminal: two columns by one row is close to square.
pub const TERMINAL_CELL: CellSize = CellSize { width: 2, height: 1 };

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

/// The part of the viewport the board may take, as fractions of the viewport
/// capped to a number of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub width_percent: u8,
    pub height_percent: u8,
    pub max_cells: u16,
}

/// Derives the grid from the container and recomputes it, debounced, when the
/// viewport changes size.
#[derive(Debug)]
pub struct GridSizer {
    cell: CellSize,
    container: Container,
    grid: GridSize,
    viewport: (u16, u16),
    debounce: Debounce,
}

impl GridSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        GridSize { cols, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 < self.cols && pos.1 < self.rows
    }

    pub fn area(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Every cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = Coords> {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| (x, y)))
    }
}

impl Container {
    /// Inner size of the container for a viewport, leaving room for a one
    /// unit border on each side.
    pub fn fit(&self, viewport: (u16, u16), cell: CellSize) -> (u16, u16) {
        let fit_axis = |total: u16, percent: u8, cell_side: u16| {
            let share = (total as u32 * percent as u32 / 100) as u16;
            let cap = self.max_cells.saturating_mul(cell_side);
            share.min(cap).min(total.saturating_sub(2))
        };

        (
            fit_axis(viewport.0, self.width_percent, cell.width),
            fit_axis(viewport.1, self.height_percent, cell.height),
        )
    }
}

impl Default for Container {
    fn default() -> Self {
        Container { width_percent: 80, height_percent: 40, max_cells: 24 }
    }
}

/// `floor(width / cell.width)` by `floor(height / cell.height)`.
pub fn measure(width: u16, height: u16, cell: CellSize) -> GridSize {
    GridSize {
        cols: width.checked_div(cell.width).unwrap_or(0),
        rows: height.checked_div(cell.height).unwrap_or(0),
    }
}

impl GridSizer {
    pub fn new(cell: CellSize, container: Container, debounce: Duration) -> Self {
        GridSizer {
            cell,
            container,
            grid: GridSize::default(),
            viewport: (0, 0),
            debounce: Debounce::new(debounce),
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Measures right away. Returns the new grid only if it differs from the
    /// current one.
    pub fn measure_now(&mut self, viewport: (u16, u16)) -> Option<GridSize> {
        self.viewport = viewport;
        let (width, height) = self.container.fit(viewport, self.cell);
        let grid = measure(width, height, self.cell);

        if grid == self.grid {
            return None;
        }

        debug!(cols = grid.cols, rows = grid.rows, "grid measured");
        self.grid = grid;
        Some(grid)
    }

    pub fn on_resize(&mut self, viewport: (u16, u16), now: Instant) {
        self.viewport = viewport;
        self.debounce.trigger(now);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Measures the last seen viewport once the debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<GridSize> {
        if self.debounce.fire(now) {
            self.measure_now(self.viewport)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }
}
