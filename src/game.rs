//! Game logic and game board.

use core::error::Error;
use core::fmt::{self, Formatter};
use core::str::FromStr;
use tracing::instrument;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Width (and height) of the square board.
const SIDE_LEN: usize = 3;

/// All lines that win the game, as row-major cell indices: rows, columns,
/// then the two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// One of the two players.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, derive_more::Display)]
pub enum Side {
    /// The human player, plays `X` and moves first.
    #[display("X")]
    A,
    /// The computer, plays `O`.
    #[display("O")]
    B,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Classification of a board. Derived on demand, never stored.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// Game continues.
    #[display("in progress")]
    InProgress,
    /// That side has three in a row.
    #[display("{_0} won")]
    Win(Side),
    /// The board is full without a winner.
    #[display("draw")]
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Rejected placement. The board is left untouched.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index is not in `0..9`.
    #[display("cell {_0} is not on the board")]
    InvalidIndex(usize),
    /// Cell is already taken.
    #[display("cell {_0} is already occupied")]
    CellOccupied(usize),
    /// The game is already decided.
    #[display("game is over ({_0})")]
    GameOver(Outcome),
    /// It is not this side's turn.
    #[display("it is not {_0}'s turn")]
    WrongTurn(Side),
}

impl Error for MoveError {}

#[derive(Debug, PartialEq, Clone, Copy, Eq, derive_more::Display)]
pub enum ParseBoardError {
    #[display("expected 9 cells, found {_0}")]
    InvalidLength(usize),
    #[display("unexpected character {_0:?}")]
    InvalidChar(char),
}

impl Error for ParseBoardError {}

/// Gameboard.
///
/// Cells are stored row-major: index 0 is the top left, index 8 the bottom
/// right. `None` is an empty cell.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Hash)]
pub struct Board([Option<Side>; CELLS]);

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub const fn new() -> Self {
        Self([None; CELLS])
    }

    /// Creates a board from arbitrary cells. The configuration does not have
    /// to be reachable by legal play.
    #[must_use]
    pub const fn from_cells(cells: [Option<Side>; CELLS]) -> Self {
        Self(cells)
    }

    #[must_use]
    pub const fn cells(&self) -> &[Option<Side>; CELLS] {
        &self.0
    }

    /// Returns the cell at `index`, `None` if the index is off the board.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Option<Side>> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn is_empty_cell(&self, index: usize) -> bool {
        matches!(self.get(index), Some(None))
    }

    /// Emits the indices of empty cells in ascending order.
    pub fn empty_cells_iter(&self) -> impl Iterator<Item = usize> {
        (0..CELLS).filter(|&index| self.0[index].is_none())
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn free_cells(&self) -> usize {
        self.empty_cells_iter().count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Check if `side` occupies all three cells of any line.
    #[must_use]
    pub fn has_line(&self, side: Side) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&index| self.0[index] == Some(side)))
    }

    /// Returns the first completed line in [`LINES`] order together with its
    /// owner.
    fn winning_line(&self) -> Option<(Side, [usize; 3])> {
        LINES.iter().find_map(|&[a, b, c]| match self.0[a] {
            Some(side) if self.0[b] == Some(side) && self.0[c] == Some(side) => {
                Some((side, [a, b, c]))
            }
            _ => None,
        })
    }

    /// Classifies the board. See [`evaluate`].
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if let Some((side, _)) = self.winning_line() {
            Outcome::Win(side)
        } else if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// Places a mark for `side` if that is a legal move.
    pub fn place(&mut self, index: usize, side: Side) -> Result<(), MoveError> {
        match self.get(index) {
            None => return Err(MoveError::InvalidIndex(index)),
            Some(Some(_)) => return Err(MoveError::CellOccupied(index)),
            Some(None) => {}
        }

        let outcome = self.outcome();
        if outcome.is_terminal() {
            return Err(MoveError::GameOver(outcome));
        }

        self.0[index] = Some(side);
        Ok(())
    }

    /// Returns a copy with `side`'s mark at `index`. No legality checks.
    ///
    /// # Panics
    /// If `index` is not on the board.
    #[must_use]
    pub fn with_mark(mut self, index: usize, side: Side) -> Self {
        self.0[index] = Some(side);
        self
    }

    /// Returns a copy where every `A` became `B` and vice versa.
    #[must_use]
    pub fn swap_sides(&self) -> Self {
        Self(self.0.map(|cell| cell.map(Side::opponent)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.0.chunks(SIDE_LEN).enumerate() {
            if row_index > 0 {
                writeln!(f)?;
                writeln!(f, "-+-+-")?;
            }
            for (col_index, cell) in row.iter().enumerate() {
                if col_index > 0 {
                    write!(f, "|")?;
                }
                match cell {
                    Some(side) => write!(f, "{side}")?,
                    // 1-based, as typed by the player
                    None => write!(f, "{}", row_index * SIDE_LEN + col_index + 1)?,
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses nine cells: `X`/`x` for [`Side::A`], `O`/`o` for [`Side::B`],
    /// and `.`, `_` or `-` for an empty cell. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; CELLS];
        let mut len = 0;

        for ch in s.chars().filter(|ch| !ch.is_whitespace()) {
            let cell = match ch {
                'X' | 'x' => Some(Side::A),
                'O' | 'o' => Some(Side::B),
                '.' | '_' | '-' => None,
                other => return Err(ParseBoardError::InvalidChar(other)),
            };
            if len < CELLS {
                cells[len] = cell;
            }
            len += 1;
        }

        if len != CELLS {
            return Err(ParseBoardError::InvalidLength(len));
        }
        Ok(Self(cells))
    }
}

/// Determines whether a side has won, the game is drawn, or play continues.
///
/// Lines are checked rows first, then columns, then diagonals; the first
/// completed line decides the winner. Total over every cell assignment,
/// including ones not reachable by legal play.
#[must_use]
#[instrument(level = "trace", ret)]
pub fn evaluate(board: &Board) -> Outcome {
    board.outcome()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Option<Side> = Some(Side::A);
    const B: Option<Side> = Some(Side::B);
    const E: Option<Side> = None;

    /// All 3^9 cell assignments.
    fn all_boards() -> impl Iterator<Item = Board> {
        (0..3usize.pow(CELLS as u32)).map(|mut code| {
            let mut cells = [None; CELLS];
            for cell in &mut cells {
                *cell = match code % 3 {
                    0 => None,
                    1 => A,
                    _ => B,
                };
                code /= 3;
            }
            Board::from_cells(cells)
        })
    }

    #[test]
    fn empty_board_in_progress() {
        let board = Board::new();
        assert_eq!(evaluate(&board), Outcome::InProgress);
        assert_eq!(board.free_cells(), CELLS);
        assert!(!board.is_full());
    }

    #[test]
    fn win_is_reported_regardless_of_empty_cells() {
        let board = Board::from_cells([A, A, A, B, B, E, E, E, E]);
        assert_eq!(evaluate(&board), Outcome::Win(Side::A));
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let board = Board::from_cells([A, B, A, A, B, B, B, A, A]);
        assert!(!board.has_line(Side::A));
        assert!(!board.has_line(Side::B));
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn alternating_full_board_completes_diagonal() {
        let board = Board::from_cells([A, B, A, B, A, B, A, B, A]);
        assert_eq!(evaluate(&board), Outcome::Win(Side::A));
    }

    #[test]
    fn every_line_wins() {
        for line in LINES {
            for side in [Side::A, Side::B] {
                let mut board = Board::new();
                for index in line {
                    assert_eq!(evaluate(&board), Outcome::InProgress);
                    board = board.with_mark(index, side);
                }
                assert!(board.has_line(side));
                assert!(!board.has_line(side.opponent()));
                assert_eq!(evaluate(&board), Outcome::Win(side));
            }
        }
    }

    #[test]
    fn first_line_in_order_is_reported() {
        // unreachable: both sides have a row, the top row is checked first
        let board = Board::from_cells([B, B, B, A, A, A, E, E, E]);
        assert_eq!(evaluate(&board), Outcome::Win(Side::B));
        assert_eq!(board.winning_line(), Some((Side::B, [0, 1, 2])));
    }

    #[test]
    fn evaluate_is_symmetric_under_swapping_sides() {
        for board in all_boards() {
            let swapped = board.swap_sides();
            let expected = match evaluate(&board) {
                Outcome::Win(side) => Outcome::Win(side.opponent()),
                other => other,
            };
            assert_eq!(evaluate(&swapped), expected, "board:\n{board}");
        }
    }

    #[test]
    fn place_rejects_illegal_moves() {
        let mut board = Board::new();
        board.place(4, Side::A).unwrap();
        assert_eq!(board.get(4), Some(A));

        let before = board;
        assert_eq!(board.place(9, Side::B), Err(MoveError::InvalidIndex(9)));
        assert_eq!(board.place(4, Side::B), Err(MoveError::CellOccupied(4)));
        assert_eq!(board, before);

        let mut won = Board::from_cells([A, A, A, B, B, E, E, E, E]);
        let before = won;
        assert_eq!(
            won.place(5, Side::B),
            Err(MoveError::GameOver(Outcome::Win(Side::A)))
        );
        assert_eq!(won, before);
    }

    #[test]
    fn test_empty_cells_iter() {
        let board = Board::from_cells([A, E, B, E, A, E, E, B, E]);
        assert_eq!(
            board.empty_cells_iter().collect::<Vec<_>>().as_slice(),
            &[1, 3, 5, 6, 8]
        );
        assert!(board.is_empty_cell(1));
        assert!(!board.is_empty_cell(0));
        assert!(!board.is_empty_cell(42));
        assert_eq!(board.free_cells(), 5);
    }

    #[test]
    fn parse_board() {
        let board: Board = "xx. _o_ ---".parse().unwrap();
        assert_eq!(board, Board::from_cells([A, A, E, E, B, E, E, E, E]));

        assert_eq!(
            "XXO".parse::<Board>(),
            Err(ParseBoardError::InvalidLength(3))
        );
        assert_eq!(
            "XXOOXXOOXX".parse::<Board>(),
            Err(ParseBoardError::InvalidLength(10))
        );
        assert_eq!(
            "XXOOXZOOX".parse::<Board>(),
            Err(ParseBoardError::InvalidChar('Z'))
        );
    }

    #[test]
    fn display_board() {
        let board: Board = "XO. .X. ..O".parse().unwrap();
        assert_eq!(board.to_string(), "X|O|3\n-+-+-\n4|X|6\n-+-+-\n7|8|O");
    }
}
