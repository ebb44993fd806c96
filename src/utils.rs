//! Board-text parsing and board generation.
//!
//! The textual board format (consumed by `ore_solver`, produced by test
//! fixtures and the random generator) is:
//!
//! ```text
//! N M
//! <N rows of N symbols over {'.', '@', 'a'-'z', 'A'-'Z'}>
//! ```
//!
//! `@` marks a rock, lowercase letters mark ore, uppercase letters mark the
//! matching holes. `M` is accepted for compatibility and not used.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::engine::{Board, BoardError, Cell, Engine, Kind, Position, KIND_COUNT};

/// Errors raised while reading a textual board description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is empty, expected an 'N M' header line")]
    MissingHeader,
    #[error("malformed header line {0:?}, expected two integers 'N M'")]
    BadHeader(String),
    #[error("expected {expected} board rows, found {found}")]
    WrongRowCount { expected: usize, found: usize },
    #[error("row {row} has {found} symbols, expected {expected}")]
    WrongRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized symbol '{symbol}' at row {row} col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
}

fn cell_from_symbol(symbol: char) -> Option<Cell> {
    match symbol {
        '.' => Some(Cell::Empty),
        '@' => Some(Cell::Rock),
        'a'..='z' => Kind::from_symbol(symbol).map(Cell::Ore),
        'A'..='Z' => Kind::from_symbol(symbol).map(Cell::Hole),
        _ => None,
    }
}

fn board_from_rows(rows: &[&str], size: usize) -> Result<Board, ParseError> {
    if rows.len() != size {
        return Err(ParseError::WrongRowCount {
            expected: size,
            found: rows.len(),
        });
    }

    let mut board = Board::new_empty(size);
    for (r, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != size {
            return Err(ParseError::WrongRowLength {
                row: r,
                expected: size,
                found,
            });
        }
        for (c, symbol) in row.chars().enumerate() {
            let cell = cell_from_symbol(symbol).ok_or(ParseError::UnknownSymbol {
                symbol,
                row: r,
                col: c,
            })?;
            board.set_cell(Position::new(r as i32, c as i32), cell);
        }
    }
    Ok(board)
}

/// Parses a full board description (header line plus N rows) into an
/// [`Engine`] ready for the router.
///
/// Blank lines and surrounding whitespace on each row are tolerated; the `M`
/// header value is validated as an integer and discarded.
pub fn parse_board_text(text: &str) -> Result<Engine, ParseError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines.next().ok_or(ParseError::MissingHeader)?;
    let mut fields = header.split_whitespace();
    let size: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| ParseError::BadHeader(header.to_string()))?;
    let _m: i64 = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| ParseError::BadHeader(header.to_string()))?;

    let rows: Vec<&str> = lines.collect();
    let board = board_from_rows(&rows, size)?;
    Ok(Engine::new(board)?)
}

/// Builds an [`Engine`] directly from board rows, one string per row, with N
/// inferred from the row count. Intended for tests and small fixtures.
///
/// # Examples
/// ```
/// use oreslide_solver::utils::engine_from_rows;
/// let engine = engine_from_rows(&[
///     "Aa.",
///     ".@.",
///     "..b",
/// ]).unwrap();
/// assert_eq!(engine.ore_total(), 2);
/// ```
pub fn engine_from_rows(rows: &[&str]) -> Result<Engine, ParseError> {
    let board = board_from_rows(rows, rows.len())?;
    Ok(Engine::new(board)?)
}

/// Generates a deterministic random board: `kinds` holes, `ore_per_kind` ore
/// instances per kind and `rocks` rocks scattered over distinct cells of a
/// `size`×`size` board. The same seed always yields the same board.
///
/// # Panics
/// Panics if `kinds > KIND_COUNT` or the requested objects do not fit on the
/// board.
pub fn random_engine(
    size: usize,
    kinds: usize,
    ore_per_kind: usize,
    rocks: usize,
    seed: u64,
) -> Engine {
    assert!(kinds <= KIND_COUNT, "at most {} kinds", KIND_COUNT);
    let needed = kinds + kinds * ore_per_kind + rocks;
    assert!(
        needed <= size * size,
        "{} objects do not fit on a {}x{} board",
        needed,
        size,
        size
    );

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut positions: Vec<Position> = (0..size as i32)
        .flat_map(|r| (0..size as i32).map(move |c| Position::new(r, c)))
        .collect();
    positions.shuffle(&mut rng);
    let mut free = positions.into_iter();

    let mut board = Board::new_empty(size);
    for k in 0..kinds {
        let kind = Kind::from_index(k);
        board.set_cell(free.next().unwrap(), Cell::Hole(kind));
        for _ in 0..ore_per_kind {
            board.set_cell(free.next().unwrap(), Cell::Ore(kind));
        }
    }
    for _ in 0..rocks {
        board.set_cell(free.next().unwrap(), Cell::Rock);
    }

    // Holes are drawn from distinct cells, so construction cannot fail.
    Engine::new(board).expect("generated holes are unique")
}
