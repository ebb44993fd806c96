//! Core simulation engine for the ore-hauling puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Cell`, `Kind`, `Direction`, `Position`: value types shared by every layer.
//! - `Board`: the N×N cell array with bounds-checked access and rendering.
//! - `Engine`: the session state (board, agent, ore instances, hole registry,
//!   action log) together with the three action primitives Move, Carry and
//!   Throw. All board mutation goes through the primitives.
//! - `evaluate_score`: the pure scoring function over the final counters.

use std::fmt;

use thiserror::Error;

/// Number of distinct ore/hole kinds (`'a'..='z'` / `'A'..='Z'`).
pub const KIND_COUNT: usize = 26;

/// One of the 26 ore/hole kinds. Ore of kind `k` scores when absorbed by the
/// hole of kind `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind(u8);

impl Kind {
    /// Builds a kind from its index in `0..KIND_COUNT`.
    ///
    /// # Panics
    /// Panics if `index >= KIND_COUNT`.
    pub fn from_index(index: usize) -> Self {
        assert!(index < KIND_COUNT, "kind index {} out of range", index);
        Kind(index as u8)
    }

    /// Parses an ore (`'a'..='z'`) or hole (`'A'..='Z'`) symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'a'..='z' => Some(Kind(symbol as u8 - b'a')),
            'A'..='Z' => Some(Kind(symbol as u8 - b'A')),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Lowercase symbol used for ore of this kind.
    pub fn ore_symbol(self) -> char {
        (b'a' + self.0) as char
    }

    /// Uppercase symbol used for the hole of this kind.
    pub fn hole_symbol(self) -> char {
        (b'A' + self.0) as char
    }
}

/// State of one board cell. A cell holds at most one of Rock/Ore; holes are
/// fixed and never change kind or disappear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Nothing here; objects slide through and may land on it.
    Empty,
    /// An untyped obstacle. Blocks carries and throws, never scores.
    Rock,
    /// A collectible object of the given kind.
    Ore(Kind),
    /// A fixed absorbing target of the given kind.
    Hole(Kind),
}

impl Cell {
    /// True for the movable objects (Rock or Ore) that Carry and Throw act on.
    pub fn is_object(self) -> bool {
        matches!(self, Cell::Rock | Cell::Ore(_))
    }

    /// Converts the cell to its character representation ('.', '@', 'a'-'z',
    /// 'A'-'Z').
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Rock => '@',
            Cell::Ore(kind) => kind.ore_symbol(),
            Cell::Hole(kind) => kind.hole_symbol(),
        }
    }
}

/// The four movement directions, in the fixed order R, D, L, U used by the
/// action log and the sweep policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All directions in log order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Row/column delta of a single step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    /// Symbol used in the action log output.
    pub fn to_char(self) -> char {
        match self {
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Up => 'U',
        }
    }

    /// Parses an `R`/`D`/`L`/`U` symbol, case-insensitively.
    pub fn from_symbol(symbol: char) -> Option<Direction> {
        match symbol.to_ascii_uppercase() {
            'R' => Some(Direction::Right),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'U' => Some(Direction::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A board coordinate. Signed so that stepping past an edge is representable;
/// validity is checked against the board with [`Board::contains`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The adjacent position one step in `direction`, not bounds-checked.
    pub fn step(self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The three externally observable action kinds, with the numeric codes used
/// in the output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Carry,
    Throw,
}

impl ActionKind {
    /// Numeric code in the `<code> <dir>` output line.
    pub fn code(self) -> u8 {
        match self {
            ActionKind::Move => 1,
            ActionKind::Carry => 2,
            ActionKind::Throw => 3,
        }
    }
}

/// One entry of the append-only action log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub direction: Direction,
}

impl fmt::Display for Action {
    /// Formats the entry as the output line `<code> <dir>`, e.g. `2 R`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.code(), self.direction)
    }
}

/// Errors raised while assembling an [`Engine`] from a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("duplicate hole '{symbol}' at {second} (first at {first})")]
    DuplicateHole {
        symbol: char,
        first: Position,
        second: Position,
    },
}

/// The N×N grid of cells. Dimensions are fixed at construction; cell contents
/// mutate only through the [`Engine`] primitives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board with every cell set to `Cell::Empty`.
    pub fn new_empty(size: usize) -> Self {
        Board {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Board side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `pos` lies within `[0, N)` on both axes.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.size
            && (pos.col as usize) < self.size
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos));
        pos.row as usize * self.size + pos.col as usize
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn cell(&self, pos: Position) -> Cell {
        assert!(self.contains(pos), "position {} out of bounds", pos);
        self.cells[self.index(pos)]
    }

    /// Sets the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        assert!(self.contains(pos), "position {} out of bounds", pos);
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Renders the board with row/column headers for terminal output. If
    /// `agent` is `Some`, that cell is highlighted with ANSI reverse video.
    pub fn render_with_agent(&self, agent: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for c in 0..self.size {
            output.push_str(&format!("{:<2}", c % 100));
        }
        output.push('\n');

        for r in 0..self.size {
            output.push_str(&format!("{:<3}", r));
            for c in 0..self.size {
                let pos = Position::new(r as i32, c as i32);
                let symbol = self.cell(pos).to_char();
                let is_agent = agent == Some(pos);
                if is_agent {
                    output.push_str(&format!("\x1b[7m{}\x1b[m ", symbol));
                } else {
                    output.push(symbol);
                    output.push(' ');
                }
            }
            if r < self.size - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with_agent(None))
    }
}

/// One ore instance tracked from construction until delivery.
///
/// `position` is `Some` exactly while the instance sits on the board; it
/// becomes `None` when the instance is absorbed. `delivered` is monotonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OreInstance {
    pub kind: Kind,
    pub position: Option<Position>,
    pub delivered: bool,
}

/// The puzzle session: board, agent, ore bookkeeping, hole registry and the
/// action log, mutated only by the three primitives.
///
/// A failed primitive has zero side effects: log, board and agent are left
/// untouched, and the failure is reported through the `bool` return value.
#[derive(Clone, Debug)]
pub struct Engine {
    board: Board,
    agent: Position,
    instances: Vec<OreInstance>,
    holes: [Option<Position>; KIND_COUNT],
    delivered: usize,
    log: Vec<Action>,
}

impl Engine {
    /// Builds a session from an initial board: scans cells into the ore
    /// instance list and the hole registry, and places the agent on the hole
    /// of the first kind (`'A'`) when present, else at `(0,0)`.
    pub fn new(board: Board) -> Result<Self, BoardError> {
        let mut instances = Vec::new();
        let mut holes: [Option<Position>; KIND_COUNT] = [None; KIND_COUNT];

        for row in 0..board.size() as i32 {
            for col in 0..board.size() as i32 {
                let pos = Position::new(row, col);
                match board.cell(pos) {
                    Cell::Ore(kind) => instances.push(OreInstance {
                        kind,
                        position: Some(pos),
                        delivered: false,
                    }),
                    Cell::Hole(kind) => {
                        if let Some(first) = holes[kind.index()] {
                            return Err(BoardError::DuplicateHole {
                                symbol: kind.hole_symbol(),
                                first,
                                second: pos,
                            });
                        }
                        holes[kind.index()] = Some(pos);
                    }
                    Cell::Empty | Cell::Rock => {}
                }
            }
        }

        let agent = holes[0].unwrap_or(Position::new(0, 0));

        Ok(Engine {
            board,
            agent,
            instances,
            holes,
            delivered: 0,
            log: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    /// Position of the hole for `kind`, if the board has one.
    pub fn hole(&self, kind: Kind) -> Option<Position> {
        self.holes[kind.index()]
    }

    /// All ore instances, in board scan order.
    pub fn instances(&self) -> &[OreInstance] {
        &self.instances
    }

    /// Indices into [`Engine::instances`] for the given kind.
    pub fn instance_indices(&self, kind: Kind) -> Vec<usize> {
        self.instances
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// The distinct ore kinds present on the initial board, ascending.
    pub fn kinds(&self) -> Vec<Kind> {
        let mut seen = [false; KIND_COUNT];
        for inst in &self.instances {
            seen[inst.kind.index()] = true;
        }
        (0..KIND_COUNT)
            .filter(|&i| seen[i])
            .map(Kind::from_index)
            .collect()
    }

    /// Total number of ore instances on the initial board.
    pub fn ore_total(&self) -> usize {
        self.instances.len()
    }

    /// Number of ore instances absorbed so far.
    pub fn delivered_count(&self) -> usize {
        self.delivered
    }

    /// The action log produced so far.
    pub fn log(&self) -> &[Action] {
        &self.log
    }

    /// Score for the current counters and log length.
    pub fn score(&self) -> i64 {
        evaluate_score(self.ore_total(), self.delivered, self.log.len())
    }

    /// Whether a Move in `direction` would stay on the board.
    pub fn can_move(&self, direction: Direction) -> bool {
        self.board.contains(self.agent.step(direction))
    }

    /// Move: steps the agent one cell in `direction`.
    ///
    /// Fails only when the destination is outside the board. The destination
    /// cell's contents are deliberately not inspected: the agent and objects
    /// occupy cells independently, and the agent must be able to stand on an
    /// object's cell to Carry or Throw it.
    pub fn perform_move(&mut self, direction: Direction) -> bool {
        let next = self.agent.step(direction);
        if !self.board.contains(next) {
            return false;
        }
        self.agent = next;
        self.log.push(Action {
            kind: ActionKind::Move,
            direction,
        });
        true
    }

    /// Carry: pushes the object under the agent one cell in `direction`; the
    /// agent moves with it.
    ///
    /// Fails if the agent's cell holds no object, the target is outside the
    /// board, or the target holds another object. Pushing into a hole absorbs
    /// the object (the hole cell is unchanged); pushing into an empty cell
    /// relocates it.
    pub fn perform_carry(&mut self, direction: Direction) -> bool {
        let source = self.agent;
        let object = self.board.cell(source);
        if !object.is_object() {
            return false;
        }
        let target = source.step(direction);
        if !self.board.contains(target) {
            return false;
        }

        match self.board.cell(target) {
            Cell::Rock | Cell::Ore(_) => false,
            Cell::Hole(_) => {
                self.log.push(Action {
                    kind: ActionKind::Carry,
                    direction,
                });
                self.board.set_cell(source, Cell::Empty);
                if let Cell::Ore(kind) = object {
                    self.absorb_instance(source, kind);
                }
                self.agent = target;
                true
            }
            Cell::Empty => {
                self.log.push(Action {
                    kind: ActionKind::Carry,
                    direction,
                });
                self.board.set_cell(source, Cell::Empty);
                self.board.set_cell(target, object);
                if let Cell::Ore(kind) = object {
                    self.relocate_instance(source, target, kind);
                }
                self.agent = target;
                true
            }
        }
    }

    /// Throw: launches the object under the agent in `direction`; the agent
    /// stays put.
    ///
    /// Fails if the agent's cell holds no object. On success the object
    /// slides one cell at a time until exactly one of:
    /// - the next cell is outside the board: it lands in the last valid cell;
    /// - the next cell holds Rock or Ore: it lands in the last valid cell;
    /// - the next cell is a hole: it is absorbed (ore counts, rocks vanish);
    /// - otherwise the slide continues through the empty cell.
    ///
    /// The log entry is appended before the slide resolves, so a throw whose
    /// object lands back in the origin cell still costs one action.
    pub fn perform_throw(&mut self, direction: Direction) -> bool {
        let origin = self.agent;
        let object = self.board.cell(origin);
        if !object.is_object() {
            return false;
        }

        self.log.push(Action {
            kind: ActionKind::Throw,
            direction,
        });
        self.board.set_cell(origin, Cell::Empty);

        let mut landing = origin;
        loop {
            let next = landing.step(direction);
            if !self.board.contains(next) {
                self.settle_thrown(object, origin, landing);
                break;
            }
            match self.board.cell(next) {
                Cell::Rock | Cell::Ore(_) => {
                    self.settle_thrown(object, origin, landing);
                    break;
                }
                Cell::Hole(_) => {
                    if let Cell::Ore(kind) = object {
                        self.absorb_instance(origin, kind);
                    }
                    break;
                }
                Cell::Empty => landing = next,
            }
        }
        true
    }

    fn settle_thrown(&mut self, object: Cell, origin: Position, landing: Position) {
        self.board.set_cell(landing, object);
        if let Cell::Ore(kind) = object {
            if landing != origin {
                self.relocate_instance(origin, landing, kind);
            }
        }
    }

    fn instance_at(&mut self, pos: Position, kind: Kind) -> &mut OreInstance {
        let inst = self
            .instances
            .iter_mut()
            .find(|inst| inst.position == Some(pos))
            .expect("ore cell without a tracked instance");
        debug_assert_eq!(inst.kind, kind);
        inst
    }

    fn relocate_instance(&mut self, from: Position, to: Position, kind: Kind) {
        let inst = self.instance_at(from, kind);
        inst.position = Some(to);
    }

    fn absorb_instance(&mut self, pos: Position, kind: Kind) {
        let inst = self.instance_at(pos, kind);
        inst.position = None;
        inst.delivered = true;
        self.delivered += 1;
    }

    /// Renders the board with the agent highlighted.
    pub fn render(&self) -> String {
        self.board.render_with_agent(Some(self.agent))
    }
}

/// Computes the final score from the delivered/total ore counters and the
/// action log length. Pure and idempotent.
///
/// - No ore on the board: 0.
/// - Everything delivered: `round(1e6 * (1 + log2(10000 / max(actions, 1))))`,
///   rewarding brevity (and going negative for logs past 20000 actions).
/// - Partial delivery: `round(1e6 * delivered / total)`.
pub fn evaluate_score(total_ore: usize, delivered: usize, actions: usize) -> i64 {
    if total_ore == 0 {
        return 0;
    }
    if delivered == total_ore {
        let t = actions.max(1) as f64;
        (1e6 * (1.0 + (10000.0 / t).log2())).round() as i64
    } else {
        (1e6 * delivered as f64 / total_ore as f64).round() as i64
    }
}
