//! Laser Maze - a grid puzzle about routing a light beam
//!
//! Core modules:
//! - `sim`: Beam tracing, target activation and the per-level puzzle state
//! - `level`: Level file loading
//! - `profile`: Player profiles, best times and the leaderboard
//! - `session`: Recording a solved level into the player's profile
//! - `settings`: Runtime configuration
//! - `error`: Structured error types

pub mod error;
pub mod level;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{BoardError, LevelError, ProfileError, PuzzleError, SettingsError};
pub use level::{Difficulty, Level};
pub use profile::{Leaderboard, Profile, ProfileStore};
pub use session::{SolveReport, record_solve};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use crate::sim::{Coord, Direction};

    /// Board dimension (the board is BOARD_SIZE x BOARD_SIZE)
    pub const BOARD_SIZE: usize = 5;

    /// Default beam entry cell: row 1 on the west edge
    pub const DEFAULT_ENTRY: Coord = Coord::new(1, 0);
    /// Default beam heading at the entry cell
    pub const DEFAULT_ENTRY_DIRECTION: Direction = Direction::East;

    /// Number of levels shipped with the game
    pub const LEVEL_COUNT: u32 = 20;

    /// Leaderboard bonus for every completed level
    pub const COMPLETION_BONUS: i64 = 100;
}
