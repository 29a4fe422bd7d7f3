use std::path::PathBuf;

/// Errors raised by board mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfRange { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: i32, col: i32 },
}

/// Errors raised by placement/move/rotate requests against a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("no movable piece with index {0}")]
    UnknownPiece(usize),

    #[error("movable piece {0} is not on the board")]
    NotPlaced(usize),

    #[error("movable piece {0} is already on the board")]
    AlreadyPlaced(usize),
}

/// Errors that can occur when loading a level file.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("level has no id line")]
    MissingId,

    #[error("invalid level id: {0:?}")]
    InvalidId(String),

    #[error("level has no difficulty line")]
    MissingDifficulty,

    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

/// Errors that can occur while reading or writing player profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed profile at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("gamertag {0:?} cannot be used as a profile name")]
    InvalidGamertag(String),
}

/// Errors that can occur when loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings validation error: {0}")]
    Validation(String),
}
