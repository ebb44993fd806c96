use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use oreslide_solver::heuristics::Strategy;
use oreslide_solver::solver::{solve, DEFAULT_BUDGET};
use oreslide_solver::utils::parse_board_text;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Routing strategy for the solver
    #[clap(short, long, value_enum, default_value_t = Strategy::ThrowSweep)]
    strategy: Strategy,

    /// Wall-clock budget in milliseconds
    #[clap(long, default_value_t = DEFAULT_BUDGET.as_millis() as u64)]
    budget_ms: u64,

    /// Path to the board file ("N M" header plus N rows); read from stdin
    /// when omitted
    board_file: Option<PathBuf>,
}

fn read_board_text(board_file: Option<&PathBuf>) -> Result<String> {
    match board_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read board file {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read board from stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let started = Instant::now();

    let text = read_board_text(args.board_file.as_ref())?;
    let mut engine = parse_board_text(&text).context("invalid board description")?;

    let solution = solve(
        &mut engine,
        args.strategy,
        Duration::from_millis(args.budget_ms),
    );

    // The action log on stdout is the answer; everything else is stderr.
    let mut output = String::with_capacity(solution.actions.len() * 4);
    for action in &solution.actions {
        output.push_str(&action.to_string());
        output.push('\n');
    }
    print!("{}", output);

    eprintln!("Score: {}", solution.score);
    eprintln!("time: {:.2}", started.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
