//! xiangqi CLI - position inspector and move validator.
//!
//! A thin front end over the `xiangqi` rules crate:
//!
//! - **`moves`**: list the legal moves of a position.
//! - **`play <moves..>`**: apply moves in engine notation and print the FEN
//!   after each one. This is the "FEN after every prefix" contract that
//!   engine wrappers and dataset builders rely on.
//! - **`perft`**: count leaf nodes of the legal move tree, optionally split
//!   per root move.
//! - **`show`**: print a text diagram of the position.
//!
//! The position comes from `--fen`, else `XIANGQI_START_FEN`, else the
//! standard opening (see [`config`]). Logs go to stderr so stdout stays
//! machine-readable with `--json`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use xiangqi::{DisplayBoard, Game, GameStatus, HistoryEntry, Move, Position, Side};

mod config;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "xiangqi", about = "Xiangqi position inspector and move validator")]
struct Cli {
    /// Position to start from, as FEN.
    #[arg(long, global = true)]
    fen: Option<String>,

    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the legal moves of the position.
    Moves,
    /// Apply moves (e.g. `h2e2 h9g7`) and print the FEN after each one.
    Play {
        #[arg(required = true)]
        moves: Vec<String>,
    },
    /// Count leaf nodes of the legal move tree.
    Perft {
        /// Depth in plies. Defaults to `XIANGQI_PERFT_DEPTH` or 2.
        #[arg(short, long)]
        depth: Option<u32>,

        /// Report the node count under each root move.
        #[arg(long)]
        divide: bool,
    },
    /// Print a diagram of the position.
    Show,
}

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// The starting FEN did not parse.
    #[error("invalid position: {0}")]
    Position(#[from] xiangqi::FenError),

    /// A move in the `play` list was malformed or illegal.
    #[error("move {index} ({notation}) rejected: {source}")]
    Move {
        index: usize,
        notation: String,
        #[source]
        source: xiangqi::GameError,
    },
}

#[derive(Serialize)]
struct MovesReport {
    fen: String,
    side_to_move: Side,
    in_check: bool,
    status: GameStatus,
    moves: Vec<Move>,
}

#[derive(Serialize)]
struct ShowReport {
    fen: String,
    side_to_move: Option<Side>,
    /// Rank 9 first, files a to i.
    ranks: Vec<String>,
}

impl ShowReport {
    fn new(position: &Position) -> Self {
        let board = DisplayBoard::from(position);
        Self {
            fen: position.to_fen(),
            side_to_move: board.side_to_move(),
            ranks: board.rank_lines(),
        }
    }
}

#[derive(Serialize)]
struct PerftReport {
    fen: String,
    depth: u32,
    nodes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    divide: Vec<(Move, u64)>,
}

fn load_position(fen: Option<String>) -> Result<Position, CliError> {
    let fen = fen.unwrap_or_else(config::get_start_fen);
    tracing::debug!("Loading position {}", fen);
    Ok(Position::from_fen(&fen)?)
}

/// Play `moves` in order, stopping at the first one that is rejected.
fn play_moves(position: Position, moves: &[String]) -> Result<Vec<HistoryEntry>, CliError> {
    let mut game = Game::from_position(position);
    moves
        .iter()
        .enumerate()
        .map(|(i, notation)| {
            game.play_str(notation).map_err(|source| CliError::Move {
                index: i + 1,
                notation: notation.clone(),
                source,
            })
        })
        .collect()
}

fn perft_divide(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut counts: Vec<(Move, u64)> = position
        .legal_moves()
        .into_iter()
        .filter_map(|mv| {
            let next = position.make_move(mv).ok()?;
            Some((mv, next.perft(depth - 1)))
        })
        .collect();
    counts.sort_by_key(|(mv, _)| mv.to_algebraic());
    counts
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let position = load_position(cli.fen)?;

    match cli.command {
        Commands::Moves => {
            let game = Game::from_position(position.clone());
            let mut moves = position.legal_moves();
            moves.sort_by_key(Move::to_algebraic);
            let report = MovesReport {
                fen: position.to_fen(),
                side_to_move: position.side_to_move(),
                in_check: position.in_check(position.side_to_move()),
                status: game.status(),
                moves,
            };
            if cli.json {
                print_json(&report)?;
            } else {
                let list: Vec<String> = report.moves.iter().map(Move::to_algebraic).collect();
                println!("{} legal moves: {}", list.len(), list.join(" "));
                if report.in_check {
                    println!("{} is in check", report.side_to_move);
                }
            }
        }
        Commands::Play { moves } => {
            let entries = play_moves(position, &moves)?;
            if cli.json {
                print_json(&entries)?;
            } else {
                for entry in &entries {
                    let check = if entry.gives_check { " +" } else { "" };
                    println!("{} {}{}", entry.notation, entry.fen, check);
                }
            }
        }
        Commands::Perft { depth, divide } => {
            let depth = depth.unwrap_or_else(config::get_perft_depth);
            tracing::info!("Running perft to depth {}", depth);
            let divide = if divide {
                perft_divide(&position, depth)
            } else {
                Vec::new()
            };
            let nodes = if divide.is_empty() {
                position.perft(depth)
            } else {
                divide.iter().map(|(_, n)| n).sum()
            };
            let report = PerftReport {
                fen: position.to_fen(),
                depth,
                nodes,
                divide,
            };
            if cli.json {
                print_json(&report)?;
            } else {
                for (mv, count) in &report.divide {
                    println!("{}: {}", mv, count);
                }
                println!("Nodes searched: {}", report.nodes);
            }
        }
        Commands::Show => {
            if cli.json {
                print_json(&ShowReport::new(&position))?;
            } else {
                print!("{}", DisplayBoard::from(&position));
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::get_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
