//! Active piece lifecycle: spawn, move, rotate, lock.
//!
//! The falling piece lives in the grid as `Cell::Active` cells inside a fixed 4x4
//! bounding box. The controller tracks the box origin, the piece kind and its rotation;
//! the grid is passed in by reference for every operation.

use crate::pieces::PieceKind;
use crate::playfield::{Cell, HEIGHT, Playfield, WIDTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Bounding box side length.
pub const BOX_SIZE: i32 = 4;

/// Top-left of the spawn box before the per-piece offset.
const SPAWN_ROW: i32 = 1;
const SPAWN_COL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Left,
    Right,
}

impl Direction {
    /// (d_row, d_col) for one step.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Spawn failed: the spawn area is occupied. Ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("spawn blocked at row {row}, column {col}")]
    Blocked { row: i32, col: i32 },
}

/// The falling piece: kind, rotation (0..4) and the grid position of its 4x4 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: usize,
    /// (row, col) of the box's top-left cell. The column can be negative when a sparse
    /// mask hugs the left wall.
    pub origin: (i32, i32),
}

impl ActivePiece {
    /// Grid rows and columns covered by the box, clipped to the playfield.
    fn box_span(&self) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let (row, col) = self.origin;
        (
            row.max(0)..(row + BOX_SIZE).min(HEIGHT as i32),
            col.max(0)..(col + BOX_SIZE).min(WIDTH as i32),
        )
    }
}

/// Owns the active piece and the random source that picks new ones.
#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<ActivePiece>,
    rng: StdRng,
}

impl PieceController {
    /// Seeded controller; `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { active: None, rng }
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// Colour id of the falling piece, for drawing `Cell::Active`.
    pub fn current_color(&self) -> Option<u8> {
        self.active.map(|p| p.kind.color_id())
    }

    /// Pick a kind uniformly at random and place it in the spawn area.
    pub fn spawn(&mut self, grid: &mut Playfield) -> Result<PieceKind, SpawnError> {
        let kind = PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())];
        self.spawn_kind(grid, kind)
    }

    /// Place `kind` at rotation 0 in the spawn area. On collision the cells written so far
    /// stay in the grid; the game ends anyway.
    pub fn spawn_kind(&mut self, grid: &mut Playfield, kind: PieceKind) -> Result<PieceKind, SpawnError> {
        let (row_offset, col_offset) = kind.spawn_offset();
        let origin = (SPAWN_ROW + row_offset, SPAWN_COL + col_offset);
        self.active = None;
        for (r, c) in kind.cells(0) {
            let (row, col) = (origin.0 + r as i32, origin.1 + c as i32);
            if grid.get(row, col) != Some(Cell::Empty) {
                return Err(SpawnError::Blocked { row, col });
            }
            grid.set(row, col, Cell::Active);
        }
        self.active = Some(ActivePiece {
            kind,
            rotation: 0,
            origin,
        });
        Ok(kind)
    }

    /// True when every active cell's neighbour in `direction` is inside the grid and not
    /// locked. Never mutates.
    pub fn can_move(&self, grid: &Playfield, direction: Direction) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let (dr, dc) = direction.delta();
        let (rows, cols) = piece.box_span();
        for row in rows {
            for col in cols.clone() {
                if grid.get(row, col) != Some(Cell::Active) {
                    continue;
                }
                match grid.get(row + dr, col + dc) {
                    None | Some(Cell::Locked(_)) => return false,
                    Some(Cell::Empty | Cell::Active) => {}
                }
            }
        }
        true
    }

    /// Move the piece one cell. Requires `can_move(direction)`.
    ///
    /// Cells are visited nearest-to-destination first so no cell is read after another
    /// moved cell has overwritten it.
    pub fn shift(&mut self, grid: &mut Playfield, direction: Direction) {
        debug_assert!(self.can_move(grid, direction), "shift without can_move");
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let (dr, dc) = direction.delta();
        let (rows, cols) = piece.box_span();
        let rows: Vec<i32> = match direction {
            Direction::Down => rows.rev().collect(),
            _ => rows.collect(),
        };
        let cols: Vec<i32> = match direction {
            Direction::Right => cols.rev().collect(),
            _ => cols.collect(),
        };
        for &row in &rows {
            for &col in &cols {
                if grid.get(row, col) == Some(Cell::Active) {
                    grid.set(row + dr, col + dc, Cell::Active);
                    grid.set(row, col, Cell::Empty);
                }
            }
        }
        piece.origin = (piece.origin.0 + dr, piece.origin.1 + dc);
    }

    /// True when the next rotation state, at the unchanged box origin, stays inside the
    /// playfield. Locked cells are not checked.
    pub fn can_rotate(&self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let (row, col) = piece.origin;
        piece.kind.cells(piece.rotation + 1).all(|(r, c)| {
            let (r, c) = (row + r as i32, col + c as i32);
            (0..HEIGHT as i32).contains(&r) && (0..WIDTH as i32).contains(&c)
        })
    }

    /// Advance to the next rotation state in place. Requires `can_rotate()`.
    pub fn rotate(&mut self, grid: &mut Playfield) {
        debug_assert!(self.can_rotate(), "rotate without can_rotate");
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        piece.rotation = (piece.rotation + 1) % crate::pieces::ROTATIONS;
        let (row, col) = piece.origin;
        let targets: Vec<(i32, i32)> = piece
            .kind
            .cells(piece.rotation)
            .map(|(r, c)| (row + r as i32, col + c as i32))
            .collect();

        let (rows, cols) = piece.box_span();
        for r in rows {
            for c in cols.clone() {
                if grid.get(r, c) == Some(Cell::Active) {
                    grid.set(r, c, Cell::Empty);
                }
            }
        }
        for (r, c) in targets {
            grid.set(r, c, Cell::Active);
        }
    }

    /// Commit the active cells as `Locked(color_id)`. The piece is consumed.
    pub fn lock_in_place(&mut self, grid: &mut Playfield, color_id: u8) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let (rows, cols) = piece.box_span();
        for r in rows {
            for c in cols.clone() {
                if grid.get(r, c) == Some(Cell::Active) {
                    grid.set(r, c, Cell::Locked(color_id));
                }
            }
        }
    }
}
