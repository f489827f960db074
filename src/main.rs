use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use xiangqi_core::{BoardSnapshot, Move, Position, STARTING_FEN, divide, perft};
use xiangqi_engine::{Difficulty, Engine, EngineConfig};

#[derive(Debug, Parser)]
#[command(name = "xiangqi", version, about = "Xiangqi search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search a position and print the best move.
    Search {
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
        #[arg(long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Override the preset search depth.
        #[arg(long)]
        depth: Option<i32>,
        /// Override the preset time budget, in milliseconds.
        #[arg(long)]
        millis: Option<u64>,
        /// Transposition table size as a power of two.
        #[arg(long)]
        hash_level: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// ICCS moves to play from the FEN before searching.
        #[arg(long, value_delimiter = ',')]
        moves: Vec<String>,
    },
    /// Count leaf nodes of the move tree.
    Perft {
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
        #[arg(long)]
        depth: usize,
        /// Print the count below each root move.
        #[arg(long)]
        divide: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            fen,
            difficulty,
            depth,
            millis,
            hash_level,
            seed,
            moves,
        } => {
            let mut config = EngineConfig::from_difficulty(difficulty).with_seed(seed);
            if let Some(depth) = depth {
                config = config.with_max_depth(depth);
            }
            if let Some(millis) = millis {
                config = config.with_time_budget(Duration::from_millis(millis));
            }
            if let Some(level) = hash_level {
                config = config.with_hash_level(level);
            }
            run_search(&fen, config, &moves)
        }
        Command::Perft { fen, depth, divide } => run_perft(&fen, depth, divide),
    }
}

fn run_search(fen: &str, config: EngineConfig, moves: &[String]) -> Result<()> {
    let snapshot: BoardSnapshot = fen.parse().context("invalid FEN")?;
    let moves = moves
        .iter()
        .map(|text| {
            Move::from_iccs(text).with_context(|| format!("invalid move \"{text}\""))
        })
        .collect::<Result<Vec<_>>>()?;

    let engine = Engine::new(config)?;
    info!(max_depth = config.max_depth, replayed = moves.len(), "xiangqi starting");
    let analysis = engine.best_move_after(&snapshot, &moves)?;

    let (Some(best), Some(coords)) = (analysis.result.best_move, analysis.best_move) else {
        bail!("no legal move in this position");
    };
    println!("bestmove {best}");
    println!("from {:?} to {:?}", coords.from, coords.to);
    println!(
        "score {} depth {} nodes {} time {}ms knps {}",
        analysis.result.score,
        analysis.result.depth,
        analysis.result.nodes,
        analysis.result.elapsed.as_millis(),
        analysis.result.knps()
    );
    Ok(())
}

fn run_perft(fen: &str, depth: usize, show_divide: bool) -> Result<()> {
    let mut pos: Position = fen.parse().context("invalid FEN")?;
    if show_divide {
        let mut total = 0;
        for (mv, count) in divide(&mut pos, depth) {
            println!("{mv}: {count}");
            total += count;
        }
        println!();
        println!("total {total}");
    } else {
        println!("perft({depth}) = {}", perft(&mut pos, depth));
    }
    Ok(())
}
