//! A single game between the human ([`Side::A`]) and the computer
//! ([`Side::B`]).

use crate::minmax::best_move;
use crate::{Board, MoveError, Outcome, Side};
use tracing::{debug, info, instrument};

/// Whose turn it is, or how the game ended.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum Phase {
    AwaitingHuman,
    AwaitingComputer,
    Finished(Outcome),
}

impl Phase {
    /// Phase after `board` was changed by `last_player`.
    fn after_move(board: &Board, last_player: Side) -> Self {
        match board.outcome() {
            Outcome::InProgress if last_player == Side::A => Self::AwaitingComputer,
            Outcome::InProgress => Self::AwaitingHuman,
            outcome => Self::Finished(outcome),
        }
    }
}

/// Game with all its state.
///
/// The human always opens. Rejected moves leave the session untouched.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Session {
    board: Board,
    phase: Phase,
    /// Cells in the order they were taken. Only kept for the current game.
    history: Vec<usize>,
}

impl Session {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: Board::new(),
            phase: Phase::AwaitingHuman,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Number of moves played so far.
    #[must_use]
    pub fn round(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    /// Checks that it is `player`'s turn in an unfinished game.
    fn expect_turn(&self, player: Side) -> Result<(), MoveError> {
        match (self.phase, player) {
            (Phase::Finished(outcome), _) => Err(MoveError::GameOver(outcome)),
            (Phase::AwaitingHuman, Side::A) | (Phase::AwaitingComputer, Side::B) => Ok(()),
            _ => Err(MoveError::WrongTurn(player)),
        }
    }

    fn apply(&mut self, index: usize, player: Side) -> Result<Phase, MoveError> {
        self.expect_turn(player)?;
        self.board.place(index, player)?;
        self.history.push(index);
        self.phase = Phase::after_move(&self.board, player);

        if let Phase::Finished(outcome) = self.phase {
            info!(%outcome, rounds = self.round(), "game finished");
        }
        Ok(self.phase)
    }

    /// Places the human's mark at `index` and returns the new phase.
    #[instrument(skip(self))]
    pub fn play_human(&mut self, index: usize) -> Result<Phase, MoveError> {
        self.apply(index, Side::A)
    }

    /// Searches and places the computer's mark. Returns the chosen cell.
    #[instrument(skip(self))]
    pub fn play_computer(&mut self) -> Result<usize, MoveError> {
        self.expect_turn(Side::B)?;
        let index = best_move(&self.board, Side::B)?;
        debug!(index, "computer move");
        self.apply(index, Side::B)?;
        Ok(index)
    }

    /// Starts over with an empty board and the human to move.
    pub fn reset(&mut self) {
        debug!(rounds = self.round(), "reset");
        *self = Self::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
