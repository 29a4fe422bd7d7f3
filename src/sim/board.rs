//! Fixed-size puzzle board
//!
//! Exactly one piece per cell. A piece's position is the index of the cell
//! that holds it, so placement and removal can never leave the two out of
//! sync.

use serde::{Deserialize, Serialize};

use super::direction::{Coord, Direction, Rotation};
use super::piece::Piece;
use crate::consts::BOARD_SIZE;
use crate::error::BoardError;

/// A target's externally visible state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    pub position: Coord,
    pub orientation: Direction,
    pub activated: bool,
}

/// The puzzle grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Piece; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an all-empty board
    pub fn new() -> Self {
        Self {
            cells: [[Piece::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    fn index(pos: Coord) -> Result<(usize, usize), BoardError> {
        if pos.in_bounds() {
            Ok((pos.row as usize, pos.col as usize))
        } else {
            Err(BoardError::OutOfRange {
                row: pos.row,
                col: pos.col,
            })
        }
    }

    /// The occupant of a cell
    pub fn piece_at(&self, pos: Coord) -> Result<&Piece, BoardError> {
        let (r, c) = Self::index(pos)?;
        Ok(&self.cells[r][c])
    }

    pub fn piece_at_mut(&mut self, pos: Coord) -> Result<&mut Piece, BoardError> {
        let (r, c) = Self::index(pos)?;
        Ok(&mut self.cells[r][c])
    }

    /// Put a piece on a cell, discarding whatever was there
    pub fn place(&mut self, piece: Piece, pos: Coord) -> Result<(), BoardError> {
        *self.piece_at_mut(pos)? = piece;
        Ok(())
    }

    /// Clear a cell, returning the piece that occupied it
    pub fn remove(&mut self, pos: Coord) -> Result<Piece, BoardError> {
        Ok(std::mem::take(self.piece_at_mut(pos)?))
    }

    /// Relocate the piece at `from` onto `to`, keeping its state.
    ///
    /// Both cells are validated before anything changes; `to` must be empty
    /// unless it is `from` itself.
    pub fn move_to(&mut self, from: Coord, to: Coord) -> Result<(), BoardError> {
        let (fr, fc) = Self::index(from)?;
        let (tr, tc) = Self::index(to)?;
        if from == to {
            return Ok(());
        }
        if !self.cells[tr][tc].is_empty() {
            return Err(BoardError::OccupiedCell {
                row: to.row,
                col: to.col,
            });
        }
        let piece = std::mem::take(&mut self.cells[fr][fc]);
        self.cells[tr][tc] = piece;
        Ok(())
    }

    /// Turn the piece on a cell a quarter step
    pub fn rotate(&mut self, pos: Coord, rotation: Rotation) -> Result<(), BoardError> {
        self.piece_at_mut(pos)?.rotate(rotation);
        Ok(())
    }

    pub fn is_empty_at(&self, pos: Coord) -> Result<bool, BoardError> {
        Ok(self.piece_at(pos)?.is_empty())
    }

    /// All cells in row-major order with their coordinates
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Piece)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, piece)| (Coord::new(r as i32, c as i32), piece))
        })
    }

    /// Every target on the board, row-major
    pub fn targets(&self) -> impl Iterator<Item = TargetState> + '_ {
        self.cells().filter_map(|(position, piece)| match *piece {
            Piece::Target {
                orientation,
                activated,
            } => Some(TargetState {
                position,
                orientation,
                activated,
            }),
            _ => None,
        })
    }

    /// Set a target's activation flag; ignored if the cell holds no target
    pub(crate) fn set_activated(&mut self, pos: Coord, value: bool) {
        if let Ok(Piece::Target { activated, .. }) = self.piece_at_mut(pos) {
            *activated = value;
        }
    }
}
