//! Puzzle simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Single-threaded, no I/O
//! - Beam paths are recomputed from scratch after every board change
//! - Only the resolver writes target activation flags
//! - No rendering or persistence dependencies

pub mod activation;
pub mod board;
pub mod direction;
pub mod laser;
pub mod piece;
pub mod puzzle;

pub use activation::{all_activated, resolve};
pub use board::{Board, TargetState};
pub use direction::{Coord, Direction, Rotation};
pub use laser::{Beam, BeamPaths, Path, trace};
pub use piece::{Piece, PieceKind, reflect, split};
pub use puzzle::{MovablePiece, Puzzle};
