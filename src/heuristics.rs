//! Routing policies for the ore router.
//!
//! All policies share the same contract: given a mutable [`Engine`] and an
//! ore kind, issue primitives that move that kind's instances toward their
//! hole, giving up on anything that stalls. They differ in how they move the
//! objects:
//! - [`route_kind_by_carry`]: walk to each instance and push it step by step.
//! - [`route_kind_by_sweep`]: walk the four lines through the hole, throwing
//!   everything found back toward it.
//! - [`cleanup_home_region`]: a secondary pass that clears the quadrants
//!   around the home hole.
//!
//! The deadline parameter is checked between iterations only; a single
//! primitive is never interrupted.

use std::fmt;
use std::time::Instant;

use clap::ValueEnum;

use crate::engine::{Direction, Engine, Kind, Position};

/// Selectable routing strategy for the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Per-instance carry routing: navigate to each ore instance and push it
    /// toward its hole, row axis first.
    CarryStep,
    /// Directional throw sweeps: from each hole, walk to every boundary and
    /// throw objects back toward the hole.
    ThrowSweep,
    /// Throw sweeps followed by a cleanup pass over the quadrants around the
    /// home hole.
    QuadrantCleanup,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::CarryStep,
        Strategy::ThrowSweep,
        Strategy::QuadrantCleanup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::CarryStep => "CarryStep",
            Strategy::ThrowSweep => "ThrowSweep",
            Strategy::QuadrantCleanup => "QuadrantCleanup",
        }
    }
}

impl fmt::Display for Strategy {
    /// Writes the CLI value of the strategy, round-trippable through
    /// `ValueEnum` parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Strategy::CarryStep => "carry-step",
            Strategy::ThrowSweep => "throw-sweep",
            Strategy::QuadrantCleanup => "quadrant-cleanup",
        };
        f.write_str(value)
    }
}

/// Walks the agent to `target` with Move actions: the row gap is closed
/// first, then the column gap. No obstacle avoidance; a failed Move abandons
/// its axis. For in-bounds targets every Move succeeds, since Move fails only
/// at the boundary.
pub fn return_to_position(engine: &mut Engine, target: Position) {
    while engine.agent().row < target.row {
        if !engine.perform_move(Direction::Down) {
            break;
        }
    }
    while engine.agent().row > target.row {
        if !engine.perform_move(Direction::Up) {
            break;
        }
    }
    while engine.agent().col < target.col {
        if !engine.perform_move(Direction::Right) {
            break;
        }
    }
    while engine.agent().col > target.col {
        if !engine.perform_move(Direction::Left) {
            break;
        }
    }
}

/// Single-axis step from `from` toward `to`, row axis first. `None` when the
/// positions coincide.
fn step_toward(from: Position, to: Position) -> Option<Direction> {
    if from.row < to.row {
        Some(Direction::Down)
    } else if from.row > to.row {
        Some(Direction::Up)
    } else if from.col < to.col {
        Some(Direction::Right)
    } else if from.col > to.col {
        Some(Direction::Left)
    } else {
        None
    }
}

/// Carry-stepping policy for one kind: for each undelivered instance,
/// navigate onto it and push it toward the hole one Carry at a time. A failed
/// Carry stalls the instance where it sits and the policy moves on; stalled
/// instances are not retried.
pub fn route_kind_by_carry(engine: &mut Engine, kind: Kind, deadline: Instant) {
    let hole = match engine.hole(kind) {
        Some(hole) => hole,
        None => return, // nothing to aim at, leave the kind undelivered
    };

    for idx in engine.instance_indices(kind) {
        if Instant::now() >= deadline {
            return;
        }
        let instance = engine.instances()[idx];
        if instance.delivered {
            continue;
        }
        let start = match instance.position {
            Some(pos) => pos,
            None => continue,
        };

        return_to_position(engine, start);
        if engine.agent() != start {
            continue; // navigation cut short by malformed state
        }

        while engine.agent() != hole {
            let direction = match step_toward(engine.agent(), hole) {
                Some(direction) => direction,
                None => break,
            };
            if !engine.perform_carry(direction) {
                break;
            }
        }
    }
}

/// Throw-sweep policy for one kind: for each of the four directions, return
/// to the hole, then walk to the boundary throwing any object found under
/// the agent back toward the hole. Only objects on the hole's row and column
/// are reached; everything thrown at the hole line is absorbed or stacks up
/// along it.
pub fn route_kind_by_sweep(engine: &mut Engine, kind: Kind, deadline: Instant) {
    let hole = match engine.hole(kind) {
        Some(hole) => hole,
        None => return,
    };

    for direction in Direction::ALL {
        if Instant::now() >= deadline {
            return;
        }
        return_to_position(engine, hole);
        let throw_direction = direction.opposite();
        while engine.perform_move(direction) {
            if engine.board().cell(engine.agent()).is_object() {
                engine.perform_throw(throw_direction);
            }
        }
    }
}

/// Cleanup pass over the four diagonal quadrants around the home hole (the
/// hole of the first kind, or the origin without one).
///
/// Per quadrant: the region is 2×2 when the anchor touches a board edge,
/// else 3×3. While the region holds any object, the agent steps one cell per
/// axis toward the anchor, carries an object under it one step toward the
/// anchor, and throws toward the anchor along the dominant axis. An agent
/// that has reached the anchor with objects still in the region starts a
/// fresh approach from the quadrant's far corner. A quadrant that stops
/// making progress would spin, so each one is bounded by N² attempts on top
/// of the deadline. After a quadrant the pass retreats to its far walls.
pub fn cleanup_home_region(engine: &mut Engine, deadline: Instant) {
    let n = engine.board().size() as i32;
    let anchor = engine
        .hole(Kind::from_index(0))
        .unwrap_or(Position::new(0, 0));
    let on_edge =
        anchor.row == 0 || anchor.row == n - 1 || anchor.col == 0 || anchor.col == n - 1;
    let region = if on_edge { 2 } else { 3 };

    for (di, dj) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (row_start, row_end) = if di == 1 {
            (anchor.row, (anchor.row + region).min(n))
        } else {
            ((anchor.row - region + 1).max(0), anchor.row + 1)
        };
        let (col_start, col_end) = if dj == 1 {
            (anchor.col, (anchor.col + region).min(n))
        } else {
            ((anchor.col - region + 1).max(0), anchor.col + 1)
        };

        let corner = Position::new(
            if di == 1 { row_end - 1 } else { row_start },
            if dj == 1 { col_end - 1 } else { col_start },
        );

        let mut attempts = engine.board().size() * engine.board().size();
        loop {
            if Instant::now() >= deadline {
                return;
            }
            if attempts == 0 {
                break;
            }
            attempts -= 1;

            let found = (row_start..row_end).any(|r| {
                (col_start..col_end)
                    .any(|c| engine.board().cell(Position::new(r, c)).is_object())
            });
            if !found {
                break;
            }

            // Stuck on the anchor: approach again from the far corner.
            if engine.agent() == anchor {
                return_to_position(engine, corner);
            }

            // One step per axis toward the anchor.
            if engine.agent().row != anchor.row {
                let direction = if engine.agent().row < anchor.row {
                    Direction::Down
                } else {
                    Direction::Up
                };
                engine.perform_move(direction);
            }
            if engine.agent().col != anchor.col {
                let direction = if engine.agent().col < anchor.col {
                    Direction::Right
                } else {
                    Direction::Left
                };
                engine.perform_move(direction);
            }

            // Drag anything under the agent one step closer.
            if engine.board().cell(engine.agent()).is_object() {
                let carry_direction =
                    step_toward(engine.agent(), anchor).unwrap_or(Direction::Right);
                engine.perform_carry(carry_direction);
            }

            // Launch toward the anchor along the dominant axis.
            let dr = anchor.row - engine.agent().row;
            let dc = anchor.col - engine.agent().col;
            let throw_direction = if dr.abs() >= dc.abs() {
                if dr < 0 {
                    Direction::Up
                } else {
                    Direction::Down
                }
            } else if dc < 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            engine.perform_throw(throw_direction);
        }

        // Retreat to the quadrant's far walls before the next quadrant.
        let vertical = if di < 0 { Direction::Up } else { Direction::Down };
        let horizontal = if dj < 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        while engine.can_move(vertical) || engine.can_move(horizontal) {
            if engine.can_move(vertical) {
                engine.perform_move(vertical);
            }
            if engine.can_move(horizontal) {
                engine.perform_move(horizontal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActionKind, Cell};
    use crate::utils::engine_from_rows;
    use std::time::Duration;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    fn kind(symbol: char) -> Kind {
        Kind::from_symbol(symbol).unwrap()
    }

    #[test]
    fn test_navigator_closes_row_gap_first() {
        let mut engine = engine_from_rows(&[
            "A..", //
            "...", //
            "...",
        ])
        .unwrap();
        return_to_position(&mut engine, Position::new(2, 2));
        assert_eq!(engine.agent(), Position::new(2, 2));
        let dirs: Vec<Direction> = engine.log().iter().map(|a| a.direction).collect();
        assert_eq!(
            dirs,
            vec![
                Direction::Down,
                Direction::Down,
                Direction::Right,
                Direction::Right
            ]
        );
        assert!(engine.log().iter().all(|a| a.kind == ActionKind::Move));
    }

    #[test]
    fn test_navigator_noop_when_already_there() {
        let mut engine = engine_from_rows(&["A.", ".."]).unwrap();
        return_to_position(&mut engine, Position::new(0, 0));
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_carry_policy_delivers_straight_line() {
        let mut engine = engine_from_rows(&[
            "A.a", //
            "...", //
            "...",
        ])
        .unwrap();
        route_kind_by_carry(&mut engine, kind('a'), far_deadline());
        assert_eq!(engine.delivered_count(), 1);
        assert_eq!(engine.agent(), Position::new(0, 0));
        // Two moves out, two carries back.
        assert_eq!(engine.log().len(), 4);
    }

    #[test]
    fn test_carry_policy_routes_row_axis_first() {
        let mut engine = engine_from_rows(&[
            "A..", //
            "...", //
            "..a",
        ])
        .unwrap();
        route_kind_by_carry(&mut engine, kind('a'), far_deadline());
        assert_eq!(engine.delivered_count(), 1);
        let carries: Vec<Direction> = engine
            .log()
            .iter()
            .filter(|a| a.kind == ActionKind::Carry)
            .map(|a| a.direction)
            .collect();
        assert_eq!(
            carries,
            vec![
                Direction::Up,
                Direction::Up,
                Direction::Left,
                Direction::Left
            ]
        );
    }

    #[test]
    fn test_carry_policy_stalls_on_blocked_instance() {
        let mut engine = engine_from_rows(&[
            "Aa..", //
            "....", //
            ".@..", //
            ".a..",
        ])
        .unwrap();
        route_kind_by_carry(&mut engine, kind('a'), far_deadline());
        // First instance delivered; second stalls against the rock and stays.
        assert_eq!(engine.delivered_count(), 1);
        assert_eq!(
            engine.board().cell(Position::new(3, 1)),
            Cell::Ore(kind('a'))
        );
        let stalled = engine
            .instances()
            .iter()
            .find(|i| !i.delivered)
            .unwrap();
        assert_eq!(stalled.position, Some(Position::new(3, 1)));
    }

    #[test]
    fn test_carry_policy_skips_kind_without_hole() {
        let mut engine = engine_from_rows(&[
            "B.b", //
            "..a", //
            "...",
        ])
        .unwrap();
        route_kind_by_carry(&mut engine, kind('a'), far_deadline());
        assert!(engine.log().is_empty());
        assert_eq!(engine.delivered_count(), 0);
    }

    #[test]
    fn test_sweep_policy_collects_hole_lines() {
        let mut engine = engine_from_rows(&[
            "A.a.", //
            "....", //
            "a...", //
            "....",
        ])
        .unwrap();
        route_kind_by_sweep(&mut engine, kind('a'), far_deadline());
        assert_eq!(engine.delivered_count(), 2);
    }

    #[test]
    fn test_sweep_policy_ignores_off_line_ore() {
        let mut engine = engine_from_rows(&[
            "A...", //
            "....", //
            "..a.", //
            "....",
        ])
        .unwrap();
        route_kind_by_sweep(&mut engine, kind('a'), far_deadline());
        assert_eq!(engine.delivered_count(), 0);
        assert_eq!(
            engine.board().cell(Position::new(2, 2)),
            Cell::Ore(kind('a'))
        );
    }

    #[test]
    fn test_sweep_policy_absorbs_rocks_on_line_silently() {
        let mut engine = engine_from_rows(&[
            "A@a.", //
            "....", //
            "....", //
            "....",
        ])
        .unwrap();
        route_kind_by_sweep(&mut engine, kind('a'), far_deadline());
        // The rock is thrown into the hole and vanishes; the ore behind it
        // follows on the same sweep and scores.
        assert_eq!(engine.delivered_count(), 1);
        let rocks = (0..4)
            .flat_map(|r| (0..4).map(move |c| Position::new(r, c)))
            .filter(|&p| engine.board().cell(p) == Cell::Rock)
            .count();
        assert_eq!(rocks, 0);
    }

    #[test]
    fn test_cleanup_clears_object_near_home_hole() {
        let mut engine = engine_from_rows(&[
            "....", //
            ".A..", //
            "..@.", //
            "....",
        ])
        .unwrap();
        // Park the agent away from the anchor, as after a sweep pass.
        return_to_position(&mut engine, Position::new(3, 3));
        cleanup_home_region(&mut engine, far_deadline());
        let rocks = (0..4)
            .flat_map(|r| (0..4).map(move |c| Position::new(r, c)))
            .filter(|&p| engine.board().cell(p) == Cell::Rock)
            .count();
        assert_eq!(rocks, 0);
        // Rocks never score.
        assert_eq!(engine.delivered_count(), 0);
    }

    #[test]
    fn test_cleanup_terminates_on_unremovable_object() {
        // The agent sits on the anchor and can make no progress; the attempt
        // cap must end the pass with the rock still in place.
        let mut engine = engine_from_rows(&[
            "A@", //
            "..",
        ])
        .unwrap();
        cleanup_home_region(&mut engine, far_deadline());
        assert_eq!(engine.board().cell(Position::new(0, 1)), Cell::Rock);
    }

    #[test]
    fn test_policies_respect_expired_deadline() {
        let expired = Instant::now() - Duration::from_millis(1);
        let mut engine = engine_from_rows(&[
            "A.a", //
            "...", //
            "...",
        ])
        .unwrap();
        route_kind_by_carry(&mut engine, kind('a'), expired);
        assert!(engine.log().is_empty());
        route_kind_by_sweep(&mut engine, kind('a'), expired);
        assert!(engine.log().is_empty());
    }
}
