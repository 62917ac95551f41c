//! Playfield grid and line clearing.
//!
//! Row 0 is an off-screen spawn buffer; rows `1..HEIGHT` are drawn. Coordinates are
//! `(row, col)` with row 0 at the top.

/// Columns.
pub const WIDTH: usize = 10;
/// Rows, including the spawn buffer row.
pub const HEIGHT: usize = 25;
/// Hidden rows at the top of the grid.
pub const SPAWN_BUFFER_ROWS: usize = 1;
/// Rows shown on screen.
pub const VISIBLE_ROWS: usize = HEIGHT - SPAWN_BUFFER_ROWS;

/// Single cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Part of the falling piece; coloured with the piece's colour when drawn.
    Active,
    /// Committed block; colour id 1..=7.
    Locked(u8),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    #[cfg(test)]
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

/// Fixed-size grid, `rows[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    rows: [[Cell; WIDTH]; HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Cell at (row, col); `None` when outside the grid.
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = (usize::try_from(row).ok()?, usize::try_from(col).ok()?);
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Writes outside the grid are ignored.
    #[inline]
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return;
        };
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Number of cells matching `pred`.
    #[cfg(test)]
    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.rows.iter().flatten().filter(|&&c| pred(c)).count()
    }

    /// True iff no cell in the row is empty. Out-of-range rows are never full.
    pub fn row_is_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r.iter().all(|c| !c.is_empty()))
    }

    pub fn clear_row(&mut self, row: usize) {
        if let Some(r) = self.rows.get_mut(row) {
            *r = [Cell::Empty; WIDTH];
        }
    }

    /// Copy every row above `through_row` down by one: row i <- row i-1 for i in
    /// `through_row..=1`. Row 0 keeps its content.
    pub fn shift_rows_down(&mut self, through_row: usize) {
        let through_row = through_row.min(HEIGHT - 1);
        for i in (1..=through_row).rev() {
            self.rows[i] = self.rows[i - 1];
        }
    }

    /// Clear every full row below the spawn buffer and collapse the rows above them.
    /// Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut full = Vec::with_capacity(4);
        for row in SPAWN_BUFFER_ROWS..HEIGHT {
            if self.row_is_full(row) {
                self.clear_row(row);
                full.push(row);
            }
        }

        // Each shift moves the rows that are still pending down by one.
        for (offset, &row) in full.iter().rev().enumerate() {
            self.shift_rows_down(row + offset);
        }
        full.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(field: &mut Playfield, row: usize, color: u8) {
        for col in 0..WIDTH {
            field.set(row as i32, col as i32, Cell::Locked(color));
        }
    }

    #[test]
    fn test_get_set_bounds() {
        let mut field = Playfield::new();
        field.set(24, 9, Cell::Locked(3));
        assert_eq!(field.get(24, 9), Some(Cell::Locked(3)));
        assert_eq!(field.get(25, 0), None);
        assert_eq!(field.get(0, 10), None);
        assert_eq!(field.get(-1, 0), None);
        assert_eq!(field.get(0, -1), None);

        let before = field.clone();
        field.set(-1, 3, Cell::Active);
        field.set(3, 10, Cell::Active);
        assert_eq!(field, before);
    }

    #[test]
    fn test_row_is_full() {
        let mut field = Playfield::new();
        assert!(!field.row_is_full(24));
        fill_row(&mut field, 24, 1);
        assert!(field.row_is_full(24));
        field.set(24, 5, Cell::Empty);
        assert!(!field.row_is_full(24));
        field.set(24, 5, Cell::Active);
        assert!(field.row_is_full(24));
        assert!(!field.row_is_full(HEIGHT));
    }

    #[test]
    fn test_shift_rows_down_keeps_row_zero() {
        let mut field = Playfield::new();
        field.set(0, 0, Cell::Locked(1));
        field.set(5, 2, Cell::Locked(2));
        field.shift_rows_down(10);
        assert_eq!(field.get(0, 0), Some(Cell::Locked(1)));
        assert_eq!(field.get(1, 0), Some(Cell::Locked(1)));
        assert_eq!(field.get(5, 2), Some(Cell::Empty));
        assert_eq!(field.get(6, 2), Some(Cell::Locked(2)));
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut field = Playfield::new();
        field.set(24, 0, Cell::Locked(1));
        field.set(20, 4, Cell::Locked(2));
        let before = field.clone();
        assert_eq!(field.clear_full_rows(), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut field = Playfield::new();
        for col in 1..WIDTH {
            field.set(24, col as i32, Cell::Locked(5));
        }
        field.set(10, 4, Cell::Locked(2));
        field.set(24, 0, Cell::Locked(1));

        assert_eq!(field.clear_full_rows(), 1);
        assert!((0..WIDTH).all(|c| field.get(24, c as i32) == Some(Cell::Empty)));
        assert_eq!(field.get(10, 4), Some(Cell::Empty));
        assert_eq!(field.get(11, 4), Some(Cell::Locked(2)));
        assert!((0..WIDTH).all(|c| field.get(0, c as i32) == Some(Cell::Empty)));
        assert!((0..WIDTH).all(|c| field.get(1, c as i32) == Some(Cell::Empty)));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut field = Playfield::new();
        fill_row(&mut field, 24, 1);
        field.set(23, 0, Cell::Locked(2));
        fill_row(&mut field, 22, 3);
        field.set(21, 9, Cell::Locked(4));

        assert_eq!(field.clear_full_rows(), 2);
        assert_eq!(field.get(24, 0), Some(Cell::Locked(2)));
        assert_eq!(field.get(23, 9), Some(Cell::Locked(4)));
        assert_eq!(field.count(Cell::is_locked), 2);
    }

    #[test]
    fn test_clear_four_rows() {
        let mut field = Playfield::new();
        for row in 21..HEIGHT {
            fill_row(&mut field, row, 1);
        }
        field.set(20, 3, Cell::Locked(7));
        assert_eq!(field.clear_full_rows(), 4);
        assert_eq!(field.get(24, 3), Some(Cell::Locked(7)));
        assert_eq!(field.count(Cell::is_locked), 1);
    }

    #[test]
    fn test_spawn_buffer_row_is_never_cleared() {
        let mut field = Playfield::new();
        fill_row(&mut field, 0, 1);
        assert_eq!(field.clear_full_rows(), 0);
        assert!(field.row_is_full(0));
    }
}
