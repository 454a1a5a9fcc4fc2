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

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use tictactoe_rs::{Board, Outcome, Phase, Session, Side, best_move, move_scores};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play Tic-Tac-Toe against the computer.
#[derive(Parser, Debug)]
#[command(name = "tictactoe-rs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Let the computer play against itself instead.
    #[arg(long)]
    self_play: bool,

    /// Milliseconds to wait before showing the computer's move.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Print the minmax score of every free cell before your move.
    #[arg(long)]
    hints: bool,
}

/// What the human typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Play(usize),
    Reset,
    Quit,
}

impl Command {
    /// Parses `1`-`9` (as printed on the board), `r` or `q`.
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "q" | "quit" => Some(Self::Quit),
            "r" | "reset" => Some(Self::Reset),
            other => match other.parse::<usize>() {
                // adapt to index
                Ok(cell @ 1..=9) => Some(Self::Play(cell - 1)),
                _ => None,
            },
        }
    }
}

fn print_board(board: &Board) {
    println!("{board}");
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Win(Side::A) => println!("You won!"),
        Outcome::Win(Side::B) => println!("Computer won!"),
        Outcome::Draw => println!("Gameover: draw"),
        Outcome::InProgress => {}
    }
}

fn print_hints(board: &Board) {
    let Ok(scores) = move_scores(board, Side::A) else {
        return;
    };
    print!("Scores for your moves: ");
    for (cell, score) in scores
        .iter()
        .enumerate()
        .filter_map(|(index, score)| score.map(|score| (index + 1, score)))
    {
        print!("{cell}={score},");
    }
    println!();
}

/// Reads one line; `None` on end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn self_play() -> Result<()> {
    let mut board = Board::new();
    let mut current_player = Side::A;

    while !board.outcome().is_terminal() {
        let best_move = best_move(&board, current_player)?;
        board.place(best_move, current_player)?;
        println!("{current_player} takes {}", best_move + 1);
        current_player = current_player.opponent();
    }

    println!("----------------");
    print_board(&board);
    println!("Gameover: {}", board.outcome());
    Ok(())
}

fn play(cli: &Cli) -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Let's play Tic-Tac-Toe against the computer. You are X.");
    loop {
        match session.phase() {
            Phase::AwaitingHuman => {
                println!("----------------");
                print_board(session.board());
                println!();
                if cli.hints {
                    print_hints(session.board());
                }

                {
                    print!("Choose your move (cell), r to reset, q to quit: ");
                    for cell in session.board().empty_cells_iter().map(|x| x + 1) {
                        print!("{cell},");
                    }
                    println!();
                    io::stdout().flush()?;
                }

                let Some(line) = read_line(&mut input)? else {
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Reset) => session.reset(),
                    Some(Command::Play(index)) => {
                        if let Err(err) = session.play_human(index) {
                            println!("Invalid move: {err}");
                        }
                    }
                    None => println!("Please enter a free cell between 1 and 9."),
                }
            }
            Phase::AwaitingComputer => {
                thread::sleep(Duration::from_millis(cli.delay_ms));
                let best_move = session.play_computer()?;
                println!("Computer chose cell {}", best_move + 1);
            }
            Phase::Finished(outcome) => {
                println!("----------------");
                print_board(session.board());
                print_outcome(outcome);

                print!("Play again? [y/N] ");
                io::stdout().flush()?;
                match read_line(&mut input)? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => session.reset(),
                    _ => break,
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    info!(?cli, "starting");

    if cli.self_play {
        self_play()
    } else {
        play(&cli)
    }
}
