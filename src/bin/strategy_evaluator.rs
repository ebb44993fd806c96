use std::collections::HashMap;

use clap::Parser;
use oreslide_solver::heuristics::Strategy;
use oreslide_solver::solver::{solve, DEFAULT_BUDGET};
use oreslide_solver::utils::random_engine;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Board side length for the generated boards
    #[clap(long, default_value_t = 15)]
    size: usize,
}

fn main() {
    let args = Args::parse();

    let mut all_scores: HashMap<&'static str, Vec<i64>> = HashMap::new();
    for strategy in Strategy::ALL {
        all_scores.insert(strategy.name(), Vec::new());
    }

    println!(
        "Starting strategy evaluation for {} boards of size {}...",
        args.boards, args.size
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx as u64;
        let base = random_engine(args.size, 4, 3, args.size, seed);

        println!("\nEvaluating board {} (seed: {})", board_idx, seed);

        for strategy in Strategy::ALL {
            let mut engine = base.clone();
            let solution = solve(&mut engine, strategy, DEFAULT_BUDGET);
            println!(
                "  Strategy: {:<16} Score: {:<9} Delivered: {}/{}, Actions: {}",
                strategy.name(),
                solution.score,
                solution.delivered,
                solution.total_ore,
                solution.actions.len()
            );
            all_scores
                .get_mut(strategy.name())
                .unwrap()
                .push(solution.score);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Average Scores ---");

    let mut sorted_averages: Vec<(&str, f64)> = Vec::new();
    for (strategy_name, scores) in &all_scores {
        if scores.is_empty() {
            println!("Strategy {}: no scores recorded.", strategy_name);
            continue;
        }
        let total: i64 = scores.iter().sum();
        sorted_averages.push((strategy_name, total as f64 / scores.len() as f64));
    }

    sorted_averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (strategy_name, average) in sorted_averages {
        println!("Strategy {:<16}: Average Score = {:.2}", strategy_name, average);
    }
}
