use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::grid::GridSize;
use crate::snake::{Direction, MoveResult, Snake};
use crate::Coords;

pub const INITIAL_SNAKE_LENGTH: u16 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Over(Ending),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    /// Hit a wall or its own body.
    Crashed,
    /// No free cell was left to put food on.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Over(Ending),
    /// The game was already over; nothing changed.
    Idle,
}

/// Read-only view of the game for drawing.
#[derive(Copy, Clone, Debug)]
pub struct Snapshot<'a> {
    pub grid: GridSize,
    pub snake: &'a Snake,
    pub food: Option<Coords>,
}

/// Owns every piece of mutable game state. Only `tick` and `set_heading`
/// change it.
pub struct SnakeGame<R = StdRng> {
    grid: GridSize,
    snake: Snake,
    apple: Coords,
    pending: Option<Direction>,
    status: Status,
    rng: R,
    on_game_over: Box<dyn FnMut()>,
}

/// Seeded when asked to, otherwise from entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl<R: Rng> SnakeGame<R> {
    /// Starts a game on `grid`, or returns `None` while the grid has no cells.
    /// `on_game_over` runs exactly once, when the game ends.
    pub fn new<F>(grid: GridSize, rng: R, on_game_over: F) -> Option<Self>
    where
        F: FnMut() + 'static,
    {
        if grid.is_empty() {
            return None;
        }

        let size = INITIAL_SNAKE_LENGTH.min(grid.cols);
        let snake = Snake::new((size - 1, grid.rows / 2), size, Direction::Right);
        let mut game = SnakeGame {
            grid,
            apple: snake.head(),
            snake,
            pending: None,
            status: Status::Running,
            rng,
            on_game_over: Box::new(on_game_over),
        };

        match game.spawn_apple() {
            Some(apple) => game.apple = apple,
            None => {
                game.finish(Ending::BoardFilled);
            }
        }

        info!(cols = grid.cols, rows = grid.rows, apple = ?game.apple, "game initialized");
        Some(game)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Idle;
        }

        if let Some(dir) = self.pending.take() {
            self.snake.set_direction(dir);
        }

        match self.snake.move_step(self.grid, self.apple) {
            MoveResult::Crashed => self.finish(Ending::Crashed),
            MoveResult::Moved { old_tail: Some(_), .. } => TickOutcome::Moved,
            MoveResult::Moved { old_tail: None, new_head, .. } => match self.spawn_apple() {
                Some(apple) => {
                    debug!(at = ?new_head, next = ?apple, len = self.snake.len(), "apple eaten");
                    self.apple = apple;
                    TickOutcome::Ate
                }
                None => self.finish(Ending::BoardFilled),
            },
        }
    }

    /// Queues a heading for the next tick. Refused once the game is over and
    /// when it would reverse the snake onto itself. The last accepted request
    /// before a tick wins.
    pub fn set_heading(&mut self, dir: Direction) -> bool {
        if self.is_over() || !self.snake.can_turn(dir) {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// The direction the snake is currently moving in.
    pub fn heading(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// `None` once the snake has filled the board.
    pub fn food(&self) -> Option<Coords> {
        match self.status {
            Status::Over(Ending::BoardFilled) => None,
            _ => Some(self.apple),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { grid: self.grid, snake: &self.snake, food: self.food() }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn finish(&mut self, ending: Ending) -> TickOutcome {
        self.status = Status::Over(ending);
        self.pending = None;
        info!(?ending, len = self.snake.len(), "game over");
        (self.on_game_over)();
        TickOutcome::Over(ending)
    }

    fn spawn_apple(&mut self) -> Option<Coords> {
        let snake = &self.snake;
        let choices: Vec<Coords> = self.grid.cells().filter(|pos| !snake.contains(*pos)).collect();
        choices.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::snake::Direction::*;

    fn game_on(cols: u16, rows: u16, seed: u64) -> (SnakeGame, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let game = SnakeGame::new(GridSize::new(cols, rows), StdRng::seed_from_u64(seed), move || {
            counter.set(counter.get() + 1)
        })
        .unwrap();
        (game, calls)
    }

    fn body(game: &SnakeGame) -> Vec<Coords> {
        game.snake().body().iter().copied().collect()
    }

    /// Moves the food somewhere harmless so ticks don't accidentally eat it.
    fn park_apple(game: &mut SnakeGame, pos: Coords) {
        assert!(!game.snake.contains(pos));
        game.apple = pos;
    }

    #[test]
    fn empty_grid_defers_initialization() {
        assert!(SnakeGame::new(GridSize::new(0, 10), make_rng(Some(1)), || {}).is_none());
        assert!(SnakeGame::new(GridSize::new(10, 0), make_rng(Some(1)), || {}).is_none());
    }

    #[test]
    fn initial_layout() {
        let (game, calls) = game_on(10, 10, 7);
        assert_eq!(body(&game), vec![(4, 5), (3, 5), (2, 5), (1, 5), (0, 5)]);
        assert_eq!(game.heading(), Right);
        assert_eq!(game.status(), Status::Running);
        assert!(!game.snake().contains(game.food().unwrap()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn narrow_grid_gets_a_shorter_snake() {
        let (game, _) = game_on(3, 4, 7);
        assert_eq!(body(&game), vec![(2, 2), (1, 2), (0, 2)]);
    }

    #[test]
    fn tick_moves_head_and_drops_tail() {
        let (mut game, _) = game_on(10, 10, 7);
        park_apple(&mut game, (9, 0));

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(game.snake().head(), (5, 5));
        assert!(!game.snake().contains((0, 5)));
        assert_eq!(game.snake().len(), 5);
    }

    #[test]
    fn eating_grows_by_one_and_replaces_food() {
        let (mut game, _) = game_on(10, 10, 7);
        park_apple(&mut game, (5, 5));

        assert_eq!(game.tick(), TickOutcome::Ate);
        assert_eq!(game.snake().len(), 6);
        assert!(game.snake().contains((0, 5)));
        let food = game.food().unwrap();
        assert!(!game.snake().contains(food));
        assert!(game.grid().contains(food));
    }

    #[test]
    fn reverse_heading_is_rejected() {
        let (mut game, _) = game_on(10, 10, 7);
        assert!(!game.set_heading(Left));
        assert_eq!(game.heading(), Right);
        assert_eq!(game.pending, None);
    }

    #[test]
    fn last_valid_request_before_a_tick_wins() {
        let (mut game, _) = game_on(10, 10, 7);
        park_apple(&mut game, (9, 0));

        assert!(game.set_heading(Up));
        assert!(game.set_heading(Down));
        // Still judged against the heading the snake actually moves in.
        assert!(!game.set_heading(Left));
        game.tick();
        assert_eq!(game.heading(), Down);
        assert_eq!(game.snake().head(), (4, 6));
    }

    #[test]
    fn quick_turns_cannot_reverse_within_one_tick() {
        let (mut game, _) = game_on(10, 10, 7);
        park_apple(&mut game, (9, 0));

        // Up then Left between two ticks would fold the snake back onto itself.
        assert!(game.set_heading(Up));
        assert!(!game.set_heading(Left));
        game.tick();
        assert_eq!(game.heading(), Up);
        assert_eq!(game.status(), Status::Running);
    }

    #[test]
    fn right_wall_ends_the_game_once() {
        let (mut game, calls) = game_on(10, 10, 7);
        park_apple(&mut game, (0, 0));

        for _ in 0..5 {
            assert_eq!(game.tick(), TickOutcome::Moved);
        }
        assert_eq!(game.snake().head(), (9, 5));
        let before = body(&game);

        assert_eq!(game.tick(), TickOutcome::Over(Ending::Crashed));
        assert_eq!(body(&game), before);
        assert_eq!(calls.get(), 1);

        assert_eq!(game.tick(), TickOutcome::Idle);
        assert!(!game.set_heading(Up));
        assert_eq!(body(&game), before);
        assert_eq!(game.food(), Some((0, 0)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn left_wall_ends_the_game() {
        let (mut game, calls) = game_on(10, 10, 7);
        park_apple(&mut game, (9, 9));
        game.snake = Snake::new((0, 3), 3, Left);
        let before = body(&game);

        assert_eq!(game.tick(), TickOutcome::Over(Ending::Crashed));
        assert_eq!(body(&game), before);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn running_into_own_body_ends_the_game() {
        let (mut game, calls) = game_on(10, 10, 7);
        park_apple(&mut game, (9, 9));
        game.snake = Snake::new((4, 5), 5, Right);

        game.set_heading(Up);
        game.tick();
        game.set_heading(Left);
        game.tick();
        game.set_heading(Down);
        assert_eq!(game.tick(), TickOutcome::Over(Ending::Crashed));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        // One row of six: the snake takes five cells, the food the last one.
        let (mut game, calls) = game_on(6, 1, 7);
        assert_eq!(game.food(), Some((5, 0)));

        assert_eq!(game.tick(), TickOutcome::Over(Ending::BoardFilled));
        assert_eq!(game.snake().len(), 6);
        assert_eq!(game.food(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn single_cell_board_starts_filled() {
        let (game, calls) = game_on(1, 1, 7);
        assert_eq!(game.status(), Status::Over(Ending::BoardFilled));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn food_never_lands_on_the_snake() {
        for seed in 0..20 {
            let (mut game, _) = game_on(6, 6, seed);
            let mut turns = [Down, Left, Up, Right].iter().cycle();

            for step in 0..200 {
                if game.is_over() {
                    break;
                }
                if step % 4 == 0 {
                    game.set_heading(*turns.next().unwrap());
                }

                let before = game.snake().len();
                let apple = game.food();
                let next = game.snake().get_direction();
                let expected_head = game.pending.unwrap_or(next);
                let ate = expected_head.step(game.snake().head(), game.grid()) == apple;

                match game.tick() {
                    TickOutcome::Ate => assert!(ate && game.snake().len() == before + 1),
                    TickOutcome::Moved => assert!(!ate && game.snake().len() == before),
                    _ => {}
                }
                if let Some(food) = game.food() {
                    assert!(!game.snake().contains(food), "seed {} step {}", seed, step);
                }
            }
        }
    }

    #[test]
    fn snapshot_reflects_state() {
        let (game, _) = game_on(10, 10, 7);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.grid, GridSize::new(10, 10));
        assert_eq!(snapshot.snake.head(), (4, 5));
        assert_eq!(snapshot.food, game.food());
    }
}
