//! Board pieces and the mirror reflection law

use serde::{Deserialize, Serialize};

use super::direction::{Direction, Rotation};

/// Piece types without orientation or state (what a level file names)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Blocker,
    Mirror,
    SplittingMirror,
    Target,
}

impl PieceKind {
    /// Parse a level-file type name or an English alias
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "SpaceRock" | "Blocker" => Some(PieceKind::Blocker),
            "Tükör" | "Mirror" => Some(PieceKind::Mirror),
            "ÁteresztőTükör" | "SplittingMirror" => Some(PieceKind::SplittingMirror),
            "Rakéta" | "Target" => Some(PieceKind::Target),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PieceKind::Blocker => "SpaceRock",
            PieceKind::Mirror => "Tükör",
            PieceKind::SplittingMirror => "ÁteresztőTükör",
            PieceKind::Target => "Rakéta",
        }
    }

    /// A fresh piece of this kind (targets start deactivated)
    pub fn build(self, orientation: Direction) -> Piece {
        match self {
            PieceKind::Blocker => Piece::Blocker,
            PieceKind::Mirror => Piece::Mirror { orientation },
            PieceKind::SplittingMirror => Piece::SplittingMirror { orientation },
            PieceKind::Target => Piece::Target {
                orientation,
                activated: false,
            },
        }
    }
}

/// The occupant of a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Piece {
    /// Beam passes through untouched
    #[default]
    Empty,
    /// Absorbs any beam
    Blocker,
    /// Reflects the beam
    Mirror { orientation: Direction },
    /// Reflects the beam and lets a second beam through
    SplittingMirror { orientation: Direction },
    /// Absorbs any beam; activated when struck head-on
    Target {
        orientation: Direction,
        activated: bool,
    },
}

impl Piece {
    pub fn kind(&self) -> Option<PieceKind> {
        match self {
            Piece::Empty => None,
            Piece::Blocker => Some(PieceKind::Blocker),
            Piece::Mirror { .. } => Some(PieceKind::Mirror),
            Piece::SplittingMirror { .. } => Some(PieceKind::SplittingMirror),
            Piece::Target { .. } => Some(PieceKind::Target),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Piece::Empty)
    }

    /// Orientation, if the piece has a meaningful one
    pub fn orientation(&self) -> Option<Direction> {
        match *self {
            Piece::Empty | Piece::Blocker => None,
            Piece::Mirror { orientation }
            | Piece::SplittingMirror { orientation }
            | Piece::Target { orientation, .. } => Some(orientation),
        }
    }

    /// Turn the piece a quarter step; a no-op for empty cells and blockers
    pub fn rotate(&mut self, rotation: Rotation) {
        match self {
            Piece::Empty | Piece::Blocker => {}
            Piece::Mirror { orientation }
            | Piece::SplittingMirror { orientation }
            | Piece::Target { orientation, .. } => *orientation = orientation.rotate(rotation),
        }
    }
}

/// New heading of a beam travelling `incoming` after it hits a mirror.
///
/// Only the orientation parity matters: even orientations swap North/East and
/// South/West headings, odd orientations swap North/West and South/East.
pub fn reflect(orientation: Direction, incoming: Direction) -> Direction {
    // Heading the beam arrived from
    let approach = incoming.invert().index();
    let approach_is_vertical = approach % 2 == 0;
    let turn_back = if orientation.index() % 2 == 0 {
        approach_is_vertical
    } else {
        !approach_is_vertical
    };
    if turn_back {
        Direction::from_index(approach + 3)
    } else {
        Direction::from_index(approach + 1)
    }
}

/// `(reflected, transmitted)` headings after a splitting mirror.
///
/// The transmitted beam keeps travelling in the incoming direction.
pub fn split(orientation: Direction, incoming: Direction) -> (Direction, Direction) {
    (reflect(orientation, incoming), incoming)
}
