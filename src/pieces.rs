//! Piece catalog: the seven tetrominoes, their 4x4 rotation masks and spawn offsets.

/// 4x4 occupancy mask, indexed `[row][col]`.
pub type Mask = [[bool; 4]; 4];

/// Number of rotation states per piece.
pub const ROTATIONS: usize = 4;

/// Tetromino kinds in catalog order (I, J, L, O, S, T, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::T, Self::Z];

    /// Catalog index 0..7.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Colour id stored in locked cells (1..=7).
    #[inline]
    pub fn color_id(self) -> u8 {
        self as u8 + 1
    }

    /// Occupancy mask for a rotation state. Rotation wraps modulo 4.
    #[inline]
    pub fn mask(self, rotation: usize) -> &'static Mask {
        &MASKS[self.index()][rotation % ROTATIONS]
    }

    /// (row, col) adjustment applied to the spawn box.
    #[inline]
    pub fn spawn_offset(self) -> (i32, i32) {
        SPAWN_OFFSETS[self.index()]
    }

    /// The occupied (row, col) coordinates of a rotation state, row-major.
    pub fn cells(self, rotation: usize) -> impl Iterator<Item = (usize, usize)> {
        let mask = self.mask(rotation);
        (0..4).flat_map(move |r| (0..4).filter(move |&c| mask[r][c]).map(move |c| (r, c)))
    }
}

const SPAWN_OFFSETS: [(i32, i32); 7] = [(0, 0), (-1, 0), (-1, 0), (0, 1), (0, 0), (0, 0), (0, 0)];

const fn mask(rows: [[u8; 4]; 4]) -> Mask {
    let mut out = [[false; 4]; 4];
    let mut r = 0;
    while r < 4 {
        let mut c = 0;
        while c < 4 {
            out[r][c] = rows[r][c] != 0;
            c += 1;
        }
        r += 1;
    }
    out
}

#[rustfmt::skip]
const MASKS: [[Mask; ROTATIONS]; 7] = [
    // I
    [
        mask([[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]),
        mask([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]),
        mask([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    ],
    // J
    [
        mask([[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 1, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    ],
    // L
    [
        mask([[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]]),
    ],
    // O
    [
        mask([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    ],
    // S
    [
        mask([[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    ],
    // T
    [
        mask([[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
    ],
    // Z
    [
        mask([[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 1, 0], [0, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
        mask([[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]]),
        mask([[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]]),
    ],
];
