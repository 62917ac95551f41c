//! Game state: playfield, active piece, gravity cadence, lock/clear/score/spawn cycle.

use crate::GameConfig;
use crate::controller::{ActivePiece, Direction, PieceController, SpawnError};
use crate::playfield::{Cell, Playfield};
use crate::scoring::points_for;

/// What one simulation tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Gravity not due yet.
    Idle,
    /// Piece fell one row.
    Fell,
    /// Piece locked, rows were cleared, and the next piece spawned.
    Locked { rows_cleared: usize, points: u32 },
    /// The next piece could not spawn.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub playfield: Playfield,
    controller: PieceController,
    pub score: u32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    /// Simulation ticks run so far.
    pub ticks: u64,
    pub game_over: bool,
    /// Why the game ended, when it ended on a blocked spawn.
    pub game_over_cause: Option<SpawnError>,
    soft_drop: bool,
    ticks_since_fall: u32,
    gravity_ticks: u32,
    soft_drop_ticks: u32,
}

impl GameState {
    /// Fresh grid with the first piece spawned.
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            playfield: Playfield::new(),
            controller: PieceController::new(config.seed),
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            ticks: 0,
            game_over: false,
            game_over_cause: None,
            soft_drop: false,
            ticks_since_fall: 0,
            gravity_ticks: config.gravity_ticks.max(1),
            soft_drop_ticks: config.soft_drop_ticks.max(1),
        };
        state.spawn_next();
        state
    }

    /// Empty grid and zeroed stats for a new game. The piece sequence continues from the
    /// same random source, so a seeded session does not replay its first game.
    pub fn restart(&mut self) {
        self.playfield = Playfield::new();
        self.score = 0;
        self.lines_cleared = 0;
        self.pieces_locked = 0;
        self.ticks = 0;
        self.game_over = false;
        self.game_over_cause = None;
        self.soft_drop = false;
        self.ticks_since_fall = 0;
        self.spawn_next();
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.controller.active()
    }

    /// Colour id to draw at (row, col): the active piece's colour for active cells,
    /// the stored colour for locked ones, `None` for empty or out-of-range cells.
    pub fn color_at(&self, row: i32, col: i32) -> Option<u8> {
        match self.playfield.get(row, col)? {
            Cell::Empty => None,
            Cell::Active => self.controller.current_color(),
            Cell::Locked(id) => Some(id),
        }
    }

    #[inline]
    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    /// Ticks between gravity steps right now.
    #[inline]
    pub fn gravity_interval(&self) -> u32 {
        if self.soft_drop {
            self.soft_drop_ticks
        } else {
            self.gravity_ticks
        }
    }

    pub fn set_soft_drop(&mut self, held: bool) {
        self.soft_drop = held;
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(Direction::Right)
    }

    pub fn rotate(&mut self) -> bool {
        if self.game_over || !self.controller.can_rotate() {
            return false;
        }
        self.controller.rotate(&mut self.playfield);
        true
    }

    fn try_move(&mut self, direction: Direction) -> bool {
        if self.game_over || !self.controller.can_move(&self.playfield, direction) {
            return false;
        }
        self.controller.shift(&mut self.playfield, direction);
        true
    }

    /// Run one simulation step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::GameOver;
        }
        self.ticks += 1;
        self.ticks_since_fall += 1;
        if self.ticks_since_fall < self.gravity_interval() {
            return TickOutcome::Idle;
        }
        self.ticks_since_fall = 0;
        self.gravity_step()
    }

    fn gravity_step(&mut self) -> TickOutcome {
        if self.controller.can_move(&self.playfield, Direction::Down) {
            self.controller.shift(&mut self.playfield, Direction::Down);
            return TickOutcome::Fell;
        }

        let Some(color) = self.controller.current_color() else {
            // No piece to lock; try to bring one in.
            return if self.spawn_next() {
                TickOutcome::Idle
            } else {
                TickOutcome::GameOver
            };
        };
        self.controller.lock_in_place(&mut self.playfield, color);
        self.pieces_locked += 1;

        let rows_cleared = self.playfield.clear_full_rows();
        let points = points_for(rows_cleared);
        self.score += points;
        self.lines_cleared += rows_cleared as u32;

        if self.spawn_next() {
            TickOutcome::Locked {
                rows_cleared,
                points,
            }
        } else {
            TickOutcome::GameOver
        }
    }

    fn spawn_next(&mut self) -> bool {
        match self.controller.spawn(&mut self.playfield) {
            Ok(_) => true,
            Err(err) => {
                self.game_over = true;
                self.game_over_cause = Some(err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playfield::{HEIGHT, WIDTH};

    fn config() -> GameConfig {
        GameConfig {
            gravity_ticks: 30,
            soft_drop_ticks: 2,
            seed: Some(2024),
        }
    }

    fn active_count(state: &GameState) -> usize {
        state.playfield.count(|c| c == Cell::Active)
    }

    #[test]
    fn test_new_game_has_active_piece() {
        let state = GameState::new(&config());
        assert!(!state.game_over);
        assert!(state.active().is_some());
        assert_eq!(active_count(&state), 4);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_gravity_cadence() {
        let mut state = GameState::new(&config());
        let start = state.active().unwrap().origin;
        for _ in 0..29 {
            assert_eq!(state.tick(), TickOutcome::Idle);
        }
        assert_eq!(state.active().unwrap().origin, start);
        assert_eq!(state.tick(), TickOutcome::Fell);
        assert_eq!(state.active().unwrap().origin, (start.0 + 1, start.1));
    }

    #[test]
    fn test_soft_drop_shortens_interval() {
        let mut state = GameState::new(&config());
        state.set_soft_drop(true);
        assert_eq!(state.gravity_interval(), 2);
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.tick(), TickOutcome::Fell);
        state.set_soft_drop(false);
        assert_eq!(state.gravity_interval(), 30);
    }

    #[test]
    fn test_piece_locks_and_next_spawns() {
        let mut state = GameState::new(&config());
        state.set_soft_drop(true);
        let outcome = loop {
            match state.tick() {
                TickOutcome::Idle | TickOutcome::Fell => {}
                other => break other,
            }
        };
        assert_eq!(
            outcome,
            TickOutcome::Locked {
                rows_cleared: 0,
                points: 0
            }
        );
        assert_eq!(state.pieces_locked, 1);
        assert_eq!(state.playfield.count(Cell::is_locked), 4);
        assert_eq!(active_count(&state), 4);
    }

    #[test]
    fn test_moves_respect_walls() {
        let mut state = GameState::new(&config());
        let mut moves = 0;
        while state.move_left() {
            moves += 1;
            assert!(moves <= WIDTH, "piece walked through the wall");
        }
        assert!(!state.move_left());
        assert!((0..HEIGHT as i32).any(|r| state.playfield.get(r, 0) == Some(Cell::Active)));
        while state.move_right() {}
        assert!(
            (0..HEIGHT as i32)
                .any(|r| state.playfield.get(r, WIDTH as i32 - 1) == Some(Cell::Active))
        );
        assert_eq!(active_count(&state), 4);
    }

    #[test]
    fn test_rotate_keeps_four_cells() {
        let mut state = GameState::new(&config());
        state.set_soft_drop(true);
        state.tick();
        state.tick();
        for _ in 0..4 {
            state.rotate();
            assert_eq!(active_count(&state), 4);
        }
    }

    #[test]
    fn test_color_at_tracks_active_and_locked() {
        let mut state = GameState::new(&config());
        let kind = state.active().unwrap().kind;
        let (row, col) = {
            let p = state.active().unwrap();
            let (r, c) = kind.cells(p.rotation).next().unwrap();
            (p.origin.0 + r as i32, p.origin.1 + c as i32)
        };
        assert_eq!(state.color_at(row, col), Some(kind.color_id()));
        state.playfield.set(24, 0, Cell::Locked(3));
        assert_eq!(state.color_at(24, 0), Some(3));
        assert_eq!(state.color_at(24, 1), None);
        assert_eq!(state.color_at(-1, 0), None);
    }

    #[test]
    fn test_stacking_without_clears_ends_the_game() {
        let mut state = GameState::new(&config());
        state.set_soft_drop(true);
        let mut guard = 0;
        while !state.game_over {
            state.tick();
            guard += 1;
            assert!(guard < 100_000, "game never ended");
        }
        assert_eq!(state.tick(), TickOutcome::GameOver);
        assert!(state.game_over_cause.is_some());
        assert_eq!(state.score, 0);
        assert!(!state.move_left());
        assert!(!state.rotate());
    }

    #[test]
    fn test_restart_continues_piece_sequence() {
        let mut state = GameState::new(&config());
        state.set_soft_drop(true);
        while !state.game_over {
            state.tick();
        }
        // First spawn, one per lock, the last one blocked.
        let draws = state.pieces_locked + 1;
        state.restart();

        let mut reference = PieceController::new(config().seed);
        for _ in 0..draws {
            let _ = reference.spawn(&mut Playfield::new());
        }
        let expected = reference.spawn(&mut Playfield::new()).unwrap();

        assert_eq!(state.active().unwrap().kind, expected);
        assert!(!state.game_over);
        assert!(state.game_over_cause.is_none());
        assert!(!state.soft_drop());
        assert_eq!((state.score, state.lines_cleared, state.pieces_locked), (0, 0, 0));
        assert_eq!(state.playfield.count(Cell::is_locked), 0);
        assert_eq!(active_count(&state), 4);
    }

    #[test]
    fn test_line_clear_scores() {
        let mut state = GameState::new(&config());
        // Leave only the piece's columns open on the bottom row so it completes it.
        let piece = *state.active().unwrap();
        let mut open = [false; WIDTH];
        let bottom = piece
            .kind
            .cells(0)
            .map(|(r, _)| r)
            .max()
            .unwrap();
        for (r, c) in piece.kind.cells(0) {
            if r == bottom {
                open[(piece.origin.1 + c as i32) as usize] = true;
            }
        }
        for (col, &is_open) in open.iter().enumerate() {
            if !is_open {
                state.playfield.set(24, col as i32, Cell::Locked(5));
            }
        }

        state.set_soft_drop(true);
        let outcome = loop {
            match state.tick() {
                TickOutcome::Idle | TickOutcome::Fell => {}
                other => break other,
            }
        };
        assert_eq!(
            outcome,
            TickOutcome::Locked {
                rows_cleared: 1,
                points: 100
            }
        );
        assert_eq!(state.score, 100);
        assert_eq!(state.lines_cleared, 1);
    }
}
