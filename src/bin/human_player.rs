use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use oreslide_solver::engine::{Direction, Engine};
use oreslide_solver::utils::{parse_board_text, random_engine};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the board file; a random board is generated when omitted
    board_file: Option<PathBuf>,

    /// Seed for the random board
    #[clap(long, default_value_t = 514514)]
    seed: u64,
}

fn load_engine(args: &Args) -> Result<Engine> {
    match &args.board_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read board file {}", path.display()))?;
            Ok(parse_board_text(&text)?)
        }
        None => Ok(random_engine(10, 3, 2, 8, args.seed)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut engine = load_engine(&args)?;
    println!("Welcome to the ore yard!");

    loop {
        println!("---------------------");
        println!(
            "Actions: {}, Delivered: {}/{}",
            engine.log().len(),
            engine.delivered_count(),
            engine.ore_total()
        );
        println!("{}", engine.render());

        if engine.ore_total() > 0 && engine.delivered_count() == engine.ore_total() {
            println!();
            println!("---------------------");
            println!("🎉 ALL ORE DELIVERED! 🎉");
            println!("Final score: {}", engine.score());
            println!("Total actions: {}", engine.log().len());
            println!("---------------------");
            break;
        }

        print!("Enter your action (m/c/t followed by R, D, L or U), or 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }
        let trimmed = input.trim();

        if trimmed == "q" {
            println!("Thanks for playing! Score so far: {}", engine.score());
            break;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 2 {
            println!("Invalid input format. Use '<m|c|t> <R|D|L|U>' or 'q'.");
            continue;
        }

        let direction = match parts[1].chars().next().and_then(Direction::from_symbol) {
            Some(direction) if parts[1].len() == 1 => direction,
            _ => {
                println!("Invalid direction '{}': use R, D, L or U.", parts[1]);
                continue;
            }
        };

        let succeeded = match parts[0] {
            "m" | "1" => engine.perform_move(direction),
            "c" | "2" => engine.perform_carry(direction),
            "t" | "3" => engine.perform_throw(direction),
            other => {
                println!("Unknown action '{}': use m (move), c (carry) or t (throw).", other);
                continue;
            }
        };

        if !succeeded {
            println!("That action is not possible here (boundary, no object, or blocked).");
        }
    }

    Ok(())
}
