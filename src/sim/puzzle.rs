//! Per-level puzzle state
//!
//! Owns the board, the pool of movable pieces and the latest beam paths.
//! Every accepted mutation re-traces the beam and re-resolves the targets,
//! so the activation state read from a `Puzzle` is always current.

use serde::{Deserialize, Serialize};

use super::activation::{all_activated, resolve};
use super::board::{Board, TargetState};
use super::direction::{Coord, Direction, Rotation};
use super::laser::{Beam, BeamPaths, trace};
use super::piece::PieceKind;
use crate::error::{BoardError, PuzzleError};

/// A piece the player may place, move and rotate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovablePiece {
    pub kind: PieceKind,
    pub orientation: Direction,
    /// `None` while the piece is still in the pool
    pub position: Option<Coord>,
}

impl MovablePiece {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            orientation: Direction::default(),
            position: None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }
}

/// A level in progress.
///
/// Only serializable one way: a puzzle is always built through
/// [`Puzzle::new`] so the pool and the board agree.
#[derive(Debug, Clone, Serialize)]
pub struct Puzzle {
    board: Board,
    beam: Beam,
    pool: Vec<MovablePiece>,
    paths: BeamPaths,
}

impl Puzzle {
    /// Start a puzzle from a board of fixed pieces and the movable pool
    pub fn new(board: Board, pool: impl IntoIterator<Item = PieceKind>, beam: Beam) -> Self {
        let mut puzzle = Self {
            board,
            beam,
            pool: pool.into_iter().map(MovablePiece::new).collect(),
            paths: BeamPaths::default(),
        };
        puzzle.recompute();
        puzzle
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn beam(&self) -> Beam {
        self.beam
    }

    pub fn pool(&self) -> &[MovablePiece] {
        &self.pool
    }

    /// Beam paths from the latest recomputation
    pub fn paths(&self) -> &BeamPaths {
        &self.paths
    }

    fn movable(&self, index: usize) -> Result<MovablePiece, PuzzleError> {
        self.pool
            .get(index)
            .copied()
            .ok_or(PuzzleError::UnknownPiece(index))
    }

    fn placed_at(&self, index: usize) -> Result<Coord, PuzzleError> {
        self.movable(index)?
            .position
            .ok_or(PuzzleError::NotPlaced(index))
    }

    /// Put a pooled piece on an empty cell
    pub fn place_movable(
        &mut self,
        index: usize,
        pos: Coord,
        orientation: Direction,
    ) -> Result<(), PuzzleError> {
        let piece = self.movable(index)?;
        if piece.is_placed() {
            return Err(PuzzleError::AlreadyPlaced(index));
        }
        if !self.board.is_empty_at(pos)? {
            return Err(BoardError::OccupiedCell {
                row: pos.row,
                col: pos.col,
            }
            .into());
        }
        self.board.place(piece.kind.build(orientation), pos)?;
        let entry = &mut self.pool[index];
        entry.orientation = orientation;
        entry.position = Some(pos);
        log::debug!("placed {:?} at {pos}", piece.kind);
        self.recompute();
        Ok(())
    }

    /// Move a placed movable piece to an empty cell
    pub fn move_movable(&mut self, index: usize, to: Coord) -> Result<(), PuzzleError> {
        let from = self.placed_at(index)?;
        self.board.move_to(from, to)?;
        self.pool[index].position = Some(to);
        log::debug!("moved piece {index} from {from} to {to}");
        self.recompute();
        Ok(())
    }

    /// Rotate a placed movable piece a quarter turn
    pub fn rotate_movable(&mut self, index: usize, rotation: Rotation) -> Result<(), PuzzleError> {
        let pos = self.placed_at(index)?;
        self.board.rotate(pos, rotation)?;
        let entry = &mut self.pool[index];
        entry.orientation = entry.orientation.rotate(rotation);
        self.recompute();
        Ok(())
    }

    /// Trace the beam and resolve every target from scratch
    pub fn recompute(&mut self) -> &BeamPaths {
        self.paths = trace(&self.board, self.beam);
        resolve(&mut self.board, &self.paths);
        &self.paths
    }

    pub fn targets(&self) -> Vec<TargetState> {
        self.board.targets().collect()
    }

    pub fn all_targets_activated(&self) -> bool {
        all_activated(&self.board)
    }

    pub fn all_pieces_placed(&self) -> bool {
        self.pool.iter().all(MovablePiece::is_placed)
    }

    /// All targets lit and the whole pool used
    pub fn is_solved(&self) -> bool {
        self.all_targets_activated() && self.all_pieces_placed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::Piece;

    fn c(row: i32, col: i32) -> Coord {
        Coord::new(row, col)
    }

    /// Target at (0,2) facing south; needs a mirror at (1,2) to turn the beam
    fn mirror_puzzle() -> Puzzle {
        let mut board = Board::new();
        board
            .place(
                Piece::Target {
                    orientation: Direction::South,
                    activated: false,
                },
                c(0, 2),
            )
            .unwrap();
        board.place(Piece::Blocker, c(3, 3)).unwrap();
        Puzzle::new(board, [PieceKind::Mirror], Beam::default())
    }

    #[test]
    fn test_new_puzzle_is_traced() {
        let puzzle = mirror_puzzle();
        assert_eq!(puzzle.paths().main.len(), 5);
        assert!(!puzzle.all_targets_activated());
        assert!(!puzzle.all_pieces_placed());
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_placing_mirror_solves() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(1, 2), Direction::North).unwrap();
        assert_eq!(puzzle.pool()[0].position, Some(c(1, 2)));
        assert_eq!(puzzle.paths().main, vec![c(1, 0), c(1, 1), c(1, 2), c(0, 2)]);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_wrong_orientation_then_rotate() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(1, 2), Direction::East).unwrap();
        assert!(!puzzle.is_solved());
        puzzle.rotate_movable(0, Rotation::Clockwise).unwrap();
        assert_eq!(puzzle.pool()[0].orientation, Direction::South);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_move_deactivates_target() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(1, 2), Direction::North).unwrap();
        assert!(puzzle.all_targets_activated());
        puzzle.move_movable(0, c(1, 3)).unwrap();
        assert!(puzzle.board().is_empty_at(c(1, 2)).unwrap());
        assert_eq!(puzzle.pool()[0].position, Some(c(1, 3)));
        assert!(!puzzle.all_targets_activated());
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut puzzle = mirror_puzzle();
        let err = puzzle.place_movable(0, c(3, 3), Direction::North).unwrap_err();
        assert_eq!(err, PuzzleError::Board(BoardError::OccupiedCell { row: 3, col: 3 }));
        assert_eq!(*puzzle.board().piece_at(c(3, 3)).unwrap(), Piece::Blocker);
        assert!(!puzzle.pool()[0].is_placed());
    }

    #[test]
    fn test_place_rejects_out_of_range() {
        let mut puzzle = mirror_puzzle();
        let err = puzzle.place_movable(0, c(0, 5), Direction::North).unwrap_err();
        assert_eq!(err, PuzzleError::Board(BoardError::OutOfRange { row: 0, col: 5 }));
    }

    #[test]
    fn test_pool_index_errors() {
        let mut puzzle = mirror_puzzle();
        assert_eq!(
            puzzle.place_movable(3, c(2, 2), Direction::North),
            Err(PuzzleError::UnknownPiece(3))
        );
        assert_eq!(
            puzzle.move_movable(0, c(2, 2)),
            Err(PuzzleError::NotPlaced(0))
        );
        puzzle.place_movable(0, c(2, 2), Direction::North).unwrap();
        assert_eq!(
            puzzle.place_movable(0, c(2, 3), Direction::North),
            Err(PuzzleError::AlreadyPlaced(0))
        );
    }

    #[test]
    fn test_move_onto_fixed_piece_refused() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(2, 2), Direction::North).unwrap();
        assert!(puzzle.move_movable(0, c(3, 3)).is_err());
        assert_eq!(puzzle.pool()[0].position, Some(c(2, 2)));
    }

    #[test]
    fn test_unplaced_target_never_activates() {
        let puzzle = Puzzle::new(Board::new(), [PieceKind::Target], Beam::default());
        assert!(puzzle.targets().is_empty());
        assert!(puzzle.all_targets_activated());
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(1, 2), Direction::North).unwrap();
        let first = puzzle.paths().clone();
        let targets = puzzle.targets();
        assert_eq!(*puzzle.recompute(), first);
        assert_eq!(puzzle.targets(), targets);
    }

    #[test]
    fn test_snapshot_reports_pool_and_board_together() {
        let mut puzzle = mirror_puzzle();
        puzzle.place_movable(0, c(1, 2), Direction::North).unwrap();
        let json = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(json["pool"][0]["position"], serde_json::json!({ "row": 1, "col": 2 }));
        assert_eq!(json["pool"][0]["orientation"], "North");
        assert_eq!(json["paths"]["main"].as_array().unwrap().len(), 4);
    }
}
