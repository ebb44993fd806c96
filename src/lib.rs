//! # Oreslide Solver Library
//!
//! This library implements the single-agent ore-hauling puzzle: an agent on an
//! N×N board moves, pushes ("carries") and launches ("throws") objects so that
//! each ore instance ends up absorbed by its matching hole. A greedy router
//! sequences the three action primitives and emits the action log that is the
//! puzzle's answer.
//!
//! It is used by three binaries:
//! - `ore_solver`: reads a board description, runs the router and prints the
//!   action log (score and elapsed time go to stderr).
//! - `human_player`: interactive play on a rendered board.
//! - `strategy_evaluator`: compares the routing strategies over a batch of
//!   seeded random boards.
//!
//! ## Modules
//! - `engine`: board representation (`Board`), cell and direction types, the
//!   `Engine` session state with the three action primitives, and scoring.
//! - `heuristics`: the navigator and the selectable routing policies.
//! - `solver`: the router driving a policy over every ore kind under a
//!   wall-clock budget, producing a `Solution`.
//! - `utils`: board-text parsing, test fixtures and random board generation.

pub mod engine;
pub mod heuristics;
pub mod solver;
pub mod utils;
