//! Grid coordinates and cardinal directions
//!
//! Directions are numbered 0..4 in cyclic order (North, East, South, West) so
//! that reversing a heading is `(d + 2) mod 4` and the mirror law in
//! [`super::piece`] can work on the index directly.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;

/// A cell coordinate, 0-indexed. May lie off the board (a beam stepping out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate lies inside `[0, BOARD_SIZE)` on both axes
    #[inline]
    pub fn in_bounds(self) -> bool {
        let n = BOARD_SIZE as i32;
        (0..n).contains(&self.row) && (0..n).contains(&self.col)
    }

    /// Adjacent coordinate in the given direction (may be off the board)
    #[inline]
    pub fn step(self, dir: Direction) -> Coord {
        Coord::from(self.as_ivec2() + dir.delta())
    }

    /// Screen-space vector: x is the column, y grows downward with the row
    #[inline]
    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.col, self.row)
    }
}

impl From<IVec2> for Coord {
    fn from(v: IVec2) -> Self {
        Coord::new(v.y, v.x)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Coord::new(row, col)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

/// Step vectors indexed by [`Direction::index`]
const DELTAS: [IVec2; 4] = [
    IVec2::new(0, -1), // North: row - 1
    IVec2::new(1, 0),  // East: col + 1
    IVec2::new(0, 1),  // South: row + 1
    IVec2::new(-1, 0), // West: col - 1
];

/// Labels used by the level and profile text formats
const LABELS: [&str; 4] = ["Észak", "Kelet", "Dél", "Nyugat"];

/// Which way to turn a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, reduced mod 4
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The opposite heading
    #[inline]
    pub fn invert(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    #[inline]
    pub fn rotate_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub fn rotate_ccw(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn rotate(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Clockwise => self.rotate_cw(),
            Rotation::CounterClockwise => self.rotate_ccw(),
        }
    }

    /// Grid offset of one step in this direction
    #[inline]
    pub fn delta(self) -> IVec2 {
        DELTAS[self.index()]
    }

    /// Heading of a single move from `from` to `to`.
    ///
    /// Rows are checked before columns; returns `None` when the two cells are
    /// equal. Only the sign of each axis is considered.
    pub fn from_delta(from: Coord, to: Coord) -> Option<Self> {
        let d = to.as_ivec2() - from.as_ivec2();
        if d.y > 0 {
            Some(Direction::South)
        } else if d.y < 0 {
            Some(Direction::North)
        } else if d.x > 0 {
            Some(Direction::East)
        } else if d.x < 0 {
            Some(Direction::West)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    /// Parse a level-file label or an English name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if let Some(i) = LABELS.iter().position(|l| l.to_lowercase() == s) {
            return Some(Self::from_index(i));
        }
        match s.as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_is_opposite() {
        assert_eq!(Direction::North.invert(), Direction::South);
        assert_eq!(Direction::East.invert(), Direction::West);
        for d in Direction::ALL {
            assert_eq!(d.invert().invert(), d);
        }
    }

    #[test]
    fn test_step_follows_row_col_convention() {
        let c = Coord::new(2, 2);
        assert_eq!(c.step(Direction::North), Coord::new(1, 2));
        assert_eq!(c.step(Direction::East), Coord::new(2, 3));
        assert_eq!(c.step(Direction::South), Coord::new(3, 2));
        assert_eq!(c.step(Direction::West), Coord::new(2, 1));
    }

    #[test]
    fn test_in_bounds() {
        assert!(Coord::new(0, 0).in_bounds());
        assert!(Coord::new(4, 4).in_bounds());
        assert!(!Coord::new(-1, 0).in_bounds());
        assert!(!Coord::new(0, 5).in_bounds());
    }

    #[test]
    fn test_from_delta_matches_step() {
        let c = Coord::new(2, 2);
        for d in Direction::ALL {
            assert_eq!(Direction::from_delta(c, c.step(d)), Some(d));
        }
        assert_eq!(Direction::from_delta(c, c), None);
    }

    #[test]
    fn test_rotation_cycles() {
        assert_eq!(Direction::West.rotate_cw(), Direction::North);
        assert_eq!(Direction::North.rotate_ccw(), Direction::West);
        assert_eq!(
            Direction::East.rotate(Rotation::Clockwise).rotate(Rotation::CounterClockwise),
            Direction::East
        );
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(Direction::parse("Észak"), Some(Direction::North));
        assert_eq!(Direction::parse(" nyugat "), Some(Direction::West));
        assert_eq!(Direction::parse("South"), Some(Direction::South));
        assert_eq!(Direction::parse("up"), None);
        for d in Direction::ALL {
            assert_eq!(Direction::parse(d.label()), Some(d));
        }
    }
}
