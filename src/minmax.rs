//! Exhaustive minmax search for the computer's move.
//!
//! The full game tree of Tic-Tac-Toe is small enough to be searched
//! completely, so there is no depth limit, no pruning and no heuristic
//! evaluation: only won, lost and drawn leaves are scored. The depth at which
//! a leaf is reached does not change its score. Among equally scored moves
//! the one with the lowest cell index is chosen.

use crate::{Board, CELLS, MoveError, Outcome, Side};
use core::error::Error;
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

/// Score of a leaf won by the side the search plays for.
pub const WIN_SCORE: i32 = 10;
/// Score of a leaf won by its opponent.
pub const LOSS_SCORE: i32 = -10;
/// Score of a drawn leaf.
pub const DRAW_SCORE: i32 = 0;

/// The search was asked for a move in a position without one.
#[derive(Debug, PartialEq, Clone, Copy, Eq, derive_more::Display)]
pub enum SearchError {
    /// The board is already won or full.
    #[display("no move to search for, game is over ({_0})")]
    TerminalPosition(Outcome),
}

impl Error for SearchError {}

impl From<SearchError> for MoveError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::TerminalPosition(outcome) => Self::GameOver(outcome),
        }
    }
}

/// minmax step of trying every empty cell for the current player and
/// keeping the best score according to `better_score`.
/// Recursively calls [`score`] again on a copy of the board for each cell.
fn minmax_step(
    board: &Board,
    target_player: Side,
    current_player: Side,
    initial_score: i32,
    better_score: impl Fn(i32, i32) -> bool,
) -> i32 {
    let mut best_score = initial_score;

    debug_assert_ne!(board.free_cells(), 0);

    for index in board.empty_cells_iter() {
        let child = board.with_mark(index, current_player);
        let score = score(&child, target_player, current_player.opponent());

        if better_score(score, best_score) {
            best_score = score;
        }
    }

    best_score
}

/// Minmax score of `board` from the point of view of `target_player`, with
/// `current_player` to move.
///
/// Terminal boards score [`WIN_SCORE`], [`LOSS_SCORE`] or [`DRAW_SCORE`].
/// Otherwise the score is the maximum over all moves when `current_player`
/// is `target_player` and the minimum when it is the opponent.
#[must_use]
pub fn score(board: &Board, target_player: Side, current_player: Side) -> i32 {
    // We start with the recursion tail: Can we stop the recursion?
    match board.outcome() {
        Outcome::Win(winner) if winner == target_player => return WIN_SCORE,
        Outcome::Win(_) => return LOSS_SCORE,
        Outcome::Draw => return DRAW_SCORE,
        Outcome::InProgress => {}
    }

    if current_player == target_player {
        minmax_step(board, target_player, current_player, i32::MIN, |new, best| {
            new > best
        })
    } else {
        minmax_step(board, target_player, current_player, i32::MAX, |new, best| {
            new < best
        })
    }
}

/// Scores every legal move of `player`; occupied cells yield `None`.
///
/// Each top-level branch is searched on its own board copy, in parallel.
pub fn move_scores(board: &Board, player: Side) -> Result<[Option<i32>; CELLS], SearchError> {
    let outcome = board.outcome();
    if outcome.is_terminal() {
        return Err(SearchError::TerminalPosition(outcome));
    }

    let branches = board
        .empty_cells_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|index| {
            let child = board.with_mark(index, player);
            (index, score(&child, player, player.opponent()))
        })
        .collect::<Vec<_>>();

    let mut scores = [None; CELLS];
    for (index, score) in branches {
        trace!(index, score, "scored branch");
        scores[index] = Some(score);
    }
    Ok(scores)
}

/// Returns the cell `player` should take.
///
/// The first cell (lowest index) with the maximal [`move_scores`] score is
/// chosen. Fails if the board is already won or full.
#[instrument(skip(board), fields(board = ?board.cells()), err)]
pub fn best_move(board: &Board, player: Side) -> Result<usize, SearchError> {
    let scores = move_scores(board, player)?;

    let mut best: Option<(usize, i32)> = None;
    for (index, score) in scores
        .iter()
        .enumerate()
        .filter_map(|(index, score)| score.map(|score| (index, score)))
    {
        // strict comparison: the first maximum wins
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    // an unfinished board always has an empty cell
    let (index, score) = best.ok_or(SearchError::TerminalPosition(board.outcome()))?;
    debug!(index, score, "found best move");
    Ok(index)
}
