//! Beam tracing
//!
//! Walks the board cell by cell from the entry, applying each piece's rule.
//! The board is only read here; target activation is decided afterwards by
//! [`super::activation::resolve`].

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::direction::{Coord, Direction};
use super::piece::{Piece, reflect, split};
use crate::consts::BOARD_SIZE;

/// Ordered cells a beam occupies, starting at the cell it was emitted from
pub type Path = Vec<Coord>;

/// Where a beam starts and which way it heads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub position: Coord,
    pub heading: Direction,
}

impl Default for Beam {
    fn default() -> Self {
        Self {
            position: crate::consts::DEFAULT_ENTRY,
            heading: crate::consts::DEFAULT_ENTRY_DIRECTION,
        }
    }
}

/// Result of a trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamPaths {
    /// The beam emitted at the entry
    pub main: Path,
    /// One transmitted beam per splitting mirror hit by the main beam, in
    /// the order they were hit. Each starts on its splitting mirror.
    pub transmitted: Vec<Path>,
}

impl BeamPaths {
    /// All transmitted cells as one sequence (empty if nothing was split)
    pub fn split_path(&self) -> Path {
        self.transmitted.iter().flatten().copied().collect()
    }

    /// Main beam first, then each transmitted beam
    pub fn segments(&self) -> impl Iterator<Item = &[Coord]> {
        std::iter::once(self.main.as_slice()).chain(self.transmitted.iter().map(Vec::as_slice))
    }

    /// Whether any beam passes through a cell
    pub fn lit(&self, pos: Coord) -> bool {
        self.segments().any(|s| s.contains(&pos))
    }
}

/// Trace the beam through the board.
///
/// Every beam stops when it is absorbed (blocker or target), leaves the
/// board, or re-enters a cell with a heading it already had there.
pub fn trace(board: &Board, beam: Beam) -> BeamPaths {
    let mut transmitted = Vec::new();
    let main = walk(board, beam.position, beam.heading, Some(&mut transmitted));
    log::debug!(
        "traced main beam of {} cells, {} transmitted",
        main.len(),
        transmitted.len()
    );
    BeamPaths { main, transmitted }
}

/// Follow one beam. `splits` is `Some` only for the main beam; transmitted
/// beams treat splitting mirrors as plain mirrors and never split again.
fn walk(
    board: &Board,
    start: Coord,
    mut heading: Direction,
    mut splits: Option<&mut Vec<Path>>,
) -> Path {
    let transmitted = splits.is_none();
    let mut path = Vec::new();
    // Headings seen per cell, one bit per direction
    let mut seen = [[0u8; BOARD_SIZE]; BOARD_SIZE];
    let mut pos = start;

    while let Ok(piece) = board.piece_at(pos) {
        let bit = 1u8 << heading.index();
        let cell = &mut seen[pos.row as usize][pos.col as usize];
        if *cell & bit != 0 {
            log::debug!("beam loops at {pos} heading {heading:?}");
            return path;
        }
        *cell |= bit;
        path.push(pos);

        // A transmitted beam leaves its own splitting mirror straight through
        if transmitted && path.len() == 1 {
            pos = pos.step(heading);
            continue;
        }

        match *piece {
            Piece::Empty => {}
            Piece::Blocker => {
                log::debug!("beam absorbed by blocker at {pos}");
                return path;
            }
            Piece::Target { .. } => {
                log::debug!("beam absorbed by target at {pos}");
                return path;
            }
            Piece::Mirror { orientation } => heading = reflect(orientation, heading),
            Piece::SplittingMirror { orientation } => match splits.as_deref_mut() {
                Some(segments) => {
                    let (reflected, through) = split(orientation, heading);
                    let segment = walk(board, pos, through, None);
                    segments.push(segment);
                    heading = reflected;
                }
                None => heading = reflect(orientation, heading),
            },
        }
        pos = pos.step(heading);
    }

    log::debug!("beam left the board after {} cells", path.len());
    path
}
