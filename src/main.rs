//! Arrocco command line: search, perft and evaluation on a FEN position.

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use tracing_subscriber::EnvFilter;

use arrocco::eval::{evaluate_simple, evaluate_tapered, game_phase};
use arrocco::search::{format_pv, perft_divide};
use arrocco::{Board, EvalKind, SearchParams, START_FEN};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a position and print the best move
    Search {
        #[arg(short, long, default_value_t = String::from(START_FEN))]
        fen: String,

        #[arg(short, long, default_value_t = 6)]
        depth: u8,

        /// Transposition table size in MB
        #[arg(long, default_value_t = 16)]
        tt_mb: usize,

        /// Use the untapered material + piece-square evaluation
        #[arg(long)]
        simple_eval: bool,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = String::from(START_FEN))]
        fen: String,

        #[arg(short, long, default_value_t = 4)]
        depth: u32,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,

        /// Cross-check every root move against shakmaty
        #[arg(long)]
        verify: bool,
    },
    /// Print the static evaluation of a position
    Eval {
        #[arg(short, long, default_value_t = String::from(START_FEN))]
        fen: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Search {
            fen,
            depth,
            tt_mb,
            simple_eval,
        } => {
            let mut board = Board::from_fen(&fen)?;
            let evaluation = if simple_eval {
                EvalKind::Simple
            } else {
                EvalKind::Tapered
            };
            let params = SearchParams::new()
                .max_depth(depth)
                .tt_size_mb(tt_mb)
                .evaluation(evaluation);
            let mut search = arrocco::Search::new(params);
            let result = search.search(&mut board);
            match result.best_move {
                Some(mv) => println!(
                    "bestmove {mv} score {} depth {} nodes {} pv {}",
                    result.score,
                    result.depth,
                    result.nodes,
                    format_pv(&result.pv)
                ),
                None if board.in_check() => println!("checkmate"),
                None => println!("stalemate"),
            }
        }
        Command::Perft {
            fen,
            depth,
            divide,
            verify,
        } => {
            let mut board = Board::from_fen(&fen)?;
            let start = Instant::now();
            let counts = perft_divide(&mut board, depth);
            let elapsed = start.elapsed();
            let total: u64 = if depth == 0 {
                1
            } else {
                counts.iter().map(|(_, n)| n).sum()
            };

            if divide {
                for (mv, n) in &counts {
                    println!("{mv}: {n}");
                }
            }
            println!(
                "perft({depth}) = {total} nodes ({} ms, {:.2} Mnps)",
                elapsed.as_millis(),
                total as f64 / elapsed.as_micros().max(1) as f64
            );

            if verify {
                let mismatches = verify_against_shakmaty(&fen, depth, &counts)?;
                if mismatches > 0 {
                    return Err(format!("{mismatches} root moves disagree with shakmaty").into());
                }
                println!("verified against shakmaty");
            }
        }
        Command::Eval { fen } => {
            let board = Board::from_fen(&fen)?;
            println!("{board}");
            println!("phase    {}", game_phase(&board));
            println!("simple   {}", evaluate_simple(&board));
            println!("tapered  {}", evaluate_tapered(&board));
        }
    }
    Ok(())
}

/// Compares per-root-move counts with shakmaty and prints every difference.
fn verify_against_shakmaty(
    fen: &str,
    depth: u32,
    ours: &[(arrocco::Move, u64)],
) -> Result<usize, Box<dyn std::error::Error>> {
    let fen: Fen = fen.parse()?;
    let pos: Chess = fen.into_position(CastlingMode::Standard)?;

    let mut theirs = BTreeMap::new();
    if depth > 0 {
        for m in pos.legal_moves() {
            let mut child = pos.clone();
            child.play_unchecked(&m);
            theirs.insert(
                m.to_uci(CastlingMode::Standard).to_string(),
                shakmaty_perft(&child, depth - 1),
            );
        }
    }
    let ours: BTreeMap<String, u64> = ours.iter().map(|(mv, n)| (mv.to_uci(), *n)).collect();

    let mut mismatches = 0;
    for mv in ours.keys().chain(theirs.keys()).collect::<std::collections::BTreeSet<_>>() {
        let (a, b) = (ours.get(mv), theirs.get(mv));
        if a != b {
            mismatches += 1;
            println!("mismatch {mv}: arrocco {a:?} shakmaty {b:?}");
        }
    }
    Ok(mismatches)
}

fn shakmaty_perft(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += shakmaty_perft(&new_pos, depth - 1);
    }
    nodes
}
