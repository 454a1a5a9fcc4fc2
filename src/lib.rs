//! Tic-Tac-Toe against a computer that cannot be beaten.
//!
//! [`evaluate`] classifies a [`Board`]; [`best_move`] runs an exhaustive
//! minmax search for the side to move. [`Session`] ties both together for
//! a game where the human plays [`Side::A`] and opens.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from,
    clippy::multiple_crate_versions
)]
#![deny(missing_debug_implementations)]

mod game;
pub mod minmax;
mod session;

pub use game::{Board, CELLS, LINES, MoveError, Outcome, ParseBoardError, Side, evaluate};
pub use minmax::{SearchError, best_move, move_scores};
pub use session::{Phase, Session};
