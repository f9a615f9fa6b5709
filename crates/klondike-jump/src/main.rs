//! CLI entry point for the jump-board solver.
//!
//! Usage:
//!   klondike-jump solve [board.json] [options]
//!   klondike-jump solve --stdin [options]
//!   klondike-jump show [board.json] [--row R --col C]
//!
//! Without a file the embedded Back from the Klondike board is used,
//! starting from its centre cell.
//!
//! Options:
//!   --row <n> --col <n>     Starting position (default: the board's own start)
//!   --max-expansions <n>    Give up after this many expansions
//!   --timeout <seconds>     Give up after this much time
//!   --json                  Print the result as JSON
//!   --show                  Draw the board at every step of the solution

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use klondike_jump::logging::init_tracing;
use klondike_jump::{
    render, verify_path, Board, BoardConfig, Path, Position, Search, SearchBudget, SearchOutcome,
    SearchStats,
};

#[derive(Parser)]
#[command(name = "klondike-jump")]
#[command(about = "Greedy best-first solver for Back from the Klondike jump-board puzzles")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter, e.g. `debug` or `klondike_jump=trace`
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BoardSource {
    /// Path to board JSON file (defaults to the built-in board)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read the board from stdin instead of a file
    #[arg(long, conflicts_with = "file")]
    stdin: bool,

    /// Starting row
    #[arg(long, requires = "col")]
    row: Option<i32>,

    /// Starting column
    #[arg(long, requires = "row")]
    col: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a route from the start to an exit
    Solve {
        #[command(flatten)]
        source: BoardSource,

        /// Maximum number of expansions
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Draw the board at every step of the solution
        #[arg(long)]
        show: bool,
    },
    /// Draw the board, marking the start position
    Show {
        #[command(flatten)]
        source: BoardSource,
    },
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    board: &'a str,
    start: Position,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsOutput>,
    stats: &'a SearchStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsOutput {
    jumps: usize,
    distance: u32,
    longest_jump: u32,
    cells_visited: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Error initializing logging: {}", e);
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> klondike_jump::Result<ExitCode> {
    match command {
        Commands::Solve {
            source,
            max_expansions,
            timeout,
            json,
            show,
        } => {
            let (config, board) = load(&source)?;
            let Some(start) = start_position(&source, &config) else {
                eprintln!("Error: board has no start position; pass --row and --col");
                return Ok(ExitCode::FAILURE);
            };

            let budget = SearchBudget {
                max_expansions,
                timeout: timeout.map(Duration::from_secs),
            };
            let outcome = Search::new(&board, start)?.run_bounded(&budget);

            if json {
                print_json(&config, &board, start, &outcome)?;
            } else {
                print_text(&board, &outcome, show);
            }

            Ok(if outcome.is_found() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Show { source } => {
            let (config, board) = load(&source)?;
            print!("{}", render(&board, start_position(&source, &config)));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(source: &BoardSource) -> klondike_jump::Result<(BoardConfig, Board)> {
    let config = if source.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        BoardConfig::from_json(&buffer)?
    } else if let Some(path) = &source.file {
        BoardConfig::from_json(&fs::read_to_string(path)?)?
    } else {
        BoardConfig::reference()?
    };

    let board = config.board()?;
    tracing::debug!(board = %config.name, size = board.size(), "loaded board");
    Ok((config, board))
}

fn start_position(source: &BoardSource, config: &BoardConfig) -> Option<Position> {
    match (source.row, source.col) {
        (Some(row), Some(col)) => Some(Position::new(row, col)),
        _ => config.start,
    }
}

fn print_text(board: &Board, outcome: &SearchOutcome, show: bool) {
    match outcome {
        SearchOutcome::Found(solution) => {
            println!("Solution found!");
            for state in solution.path.iter() {
                if show {
                    println!("{}", render(board, Some(state.position)));
                }
                println!("({:2}, {:2}) -> {}", state.row(), state.col(), state.jump);
            }
        }
        SearchOutcome::Exhausted(_) => println!("No solution found"),
        SearchOutcome::Interrupted(stats) => {
            println!("No solution found within {} expansions", stats.expanded)
        }
    }
}

/// Machine-readable reason for a search that found no route.
fn failure_reason(outcome: &SearchOutcome) -> Option<&'static str> {
    match outcome {
        SearchOutcome::Found(_) => None,
        SearchOutcome::Exhausted(_) => Some("search_exhausted"),
        SearchOutcome::Interrupted(_) => Some("budget_exhausted"),
    }
}

fn print_json(
    config: &BoardConfig,
    board: &Board,
    start: Position,
    outcome: &SearchOutcome,
) -> klondike_jump::Result<()> {
    let solution = outcome.solution();
    let metrics = solution.map(|s| {
        let route: Vec<Position> = s.path.positions().collect();
        let m = verify_path(board, &route).metrics;
        MetricsOutput {
            jumps: m.jumps,
            distance: m.distance,
            longest_jump: m.longest_jump,
            cells_visited: m.cells_visited,
        }
    });

    let output = SolveOutput {
        board: &config.name,
        start,
        found: solution.is_some(),
        reason: failure_reason(outcome),
        path: solution.map(|s| &s.path),
        metrics,
        stats: outcome.stats(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
