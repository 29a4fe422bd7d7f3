//! Level files
//!
//! Plain text, one entry per line:
//!
//! ```text
//! Pálya: 3
//! Nehézség: Közepes
//! Fix Bábuk:
//! Rakéta, Nyugat, 1;4
//! SpaceRock, Észak, 2;2
//! Felhasználható Bábuk:
//! Tükör, 2
//! ```
//!
//! Fixed entries are `type, orientation, row;col`; movable entries are
//! `type, count`. Entries that cannot be understood are skipped with a
//! warning so one bad line never prevents a level from loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;
use crate::error::LevelError;
use crate::sim::{Beam, Board, Coord, Direction, PieceKind, Puzzle};

/// Level difficulty, which also decides the points for solving it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Genius,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Genius,
    ];

    /// Label used in level and profile files
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Könnyű",
            Difficulty::Medium => "Közepes",
            Difficulty::Hard => "Nehéz",
            Difficulty::Genius => "Géniusz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(d) = Self::ALL.into_iter().find(|d| d.as_str() == s) {
            return Some(d);
        }
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "genius" => Some(Difficulty::Genius),
            _ => None,
        }
    }

    /// Points awarded for solving a level of this difficulty
    pub fn points(&self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Medium => 240,
            Difficulty::Hard => 360,
            Difficulty::Genius => 600,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: u32,
    pub difficulty: Difficulty,
    /// Fixed pieces, already placed
    pub board: Board,
    /// Pieces the player has to place, one entry per piece
    pub movable: Vec<PieceKind>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Fixed,
    Movable,
}

/// Value after a `key:` prefix, for either the file's key or its English alias
fn header_value<'a>(line: &'a str, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| line.strip_prefix(k))
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

fn parse_coord(s: &str) -> Option<Coord> {
    let (row, col) = s.trim().split_once(';')?;
    Some(Coord::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

impl Level {
    /// Read and parse a level file
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|e| LevelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let level = Self::parse(&text)?;
        log::info!(
            "Loaded level {} ({}) from {}",
            level.id,
            level.difficulty,
            path.display()
        );
        Ok(level)
    }

    /// Parse level text
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut id = None;
        let mut difficulty = None;
        let mut board = Board::new();
        let mut movable = Vec::new();
        let mut section = Section::Movable;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let lineno = lineno + 1;
            if line.is_empty() {
                continue;
            }
            if let Some(v) = header_value(line, &["Pálya", "Level"]) {
                id = Some(v.parse::<u32>().map_err(|_| LevelError::InvalidId(v.to_string()))?);
                continue;
            }
            if let Some(v) = header_value(line, &["Nehézség", "Difficulty"]) {
                difficulty =
                    Some(Difficulty::from_str(v).ok_or_else(|| LevelError::UnknownDifficulty(v.to_string()))?);
                continue;
            }
            if header_value(line, &["Fix Bábuk", "Fixed Pieces"]).is_some() {
                section = Section::Fixed;
                continue;
            }
            if header_value(line, &["Felhasználható Bábuk", "Movable Pieces"]).is_some() {
                section = Section::Movable;
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let Some(kind) = PieceKind::parse(fields[0]) else {
                log::warn!("line {lineno}: unknown piece type {:?}, skipped", fields[0]);
                continue;
            };

            match section {
                Section::Fixed => {
                    if fields.len() < 3 {
                        log::warn!("line {lineno}: fixed piece needs type, orientation and position");
                        continue;
                    }
                    let Some(orientation) = Direction::parse(fields[1]) else {
                        log::warn!("line {lineno}: unknown orientation {:?}, skipped", fields[1]);
                        continue;
                    };
                    let Some(pos) = parse_coord(fields[2]) else {
                        log::warn!("line {lineno}: bad position {:?}, skipped", fields[2]);
                        continue;
                    };
                    if !board.is_empty_at(pos).unwrap_or(true) {
                        log::warn!("line {lineno}: {pos} already holds a piece, replacing it");
                    }
                    if let Err(e) = board.place(kind.build(orientation), pos) {
                        log::warn!("line {lineno}: {e}, skipped");
                    }
                }
                Section::Movable => {
                    if fields.len() < 2 {
                        log::warn!("line {lineno}: movable piece needs type and count");
                        continue;
                    }
                    let Ok(count) = fields[1].parse::<usize>() else {
                        log::warn!("line {lineno}: bad count {:?}, skipped", fields[1]);
                        continue;
                    };
                    // The pool can never outgrow the board
                    let room = BOARD_SIZE * BOARD_SIZE - movable.len();
                    if count > room {
                        log::warn!("line {lineno}: count {count} exceeds the {room} free cells, skipped");
                        continue;
                    }
                    movable.extend(std::iter::repeat_n(kind, count));
                }
            }
        }

        Ok(Level {
            id: id.ok_or(LevelError::MissingId)?,
            difficulty: difficulty.ok_or(LevelError::MissingDifficulty)?,
            board,
            movable,
        })
    }

    /// Begin playing this level
    pub fn start(&self, beam: Beam) -> Puzzle {
        Puzzle::new(self.board.clone(), self.movable.iter().copied(), beam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Piece;

    const SAMPLE: &str = "Pálya: 3
Nehézség: Közepes
Fix Bábuk:
Rakéta, Dél, 0;2
SpaceRock, Észak, 3;3
Felhasználható Bábuk:
Tükör, 1
";

    #[test]
    fn test_parse_sample_level() {
        let level = Level::parse(SAMPLE).unwrap();
        assert_eq!(level.id, 3);
        assert_eq!(level.difficulty, Difficulty::Medium);
        assert_eq!(level.movable, vec![PieceKind::Mirror]);
        assert_eq!(
            *level.board.piece_at(Coord::new(0, 2)).unwrap(),
            Piece::Target {
                orientation: Direction::South,
                activated: false
            }
        );
        assert_eq!(*level.board.piece_at(Coord::new(3, 3)).unwrap(), Piece::Blocker);
    }

    #[test]
    fn test_parse_english_aliases() {
        let text = "Level: 7\nDifficulty: genius\nFixed Pieces:\nTarget, West, 1;4\nMovable Pieces:\nSplittingMirror, 2\nBlocker, 1\n";
        let level = Level::parse(text).unwrap();
        assert_eq!(level.id, 7);
        assert_eq!(level.difficulty, Difficulty::Genius);
        assert_eq!(
            level.movable,
            vec![PieceKind::SplittingMirror, PieceKind::SplittingMirror, PieceKind::Blocker]
        );
        assert_eq!(level.board.targets().count(), 1);
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let text = "Pálya: 1
Nehézség: Könnyű
Fix Bábuk:
Lézer, Észak, 1;1
Tükör, Fel, 1;1
Tükör, Észak, 9;9
Tükör, Észak
Tükör, Kelet, 2;2
Felhasználható Bábuk:
Portál, 3
Tükör, sok
Tükör, 2
";
        let level = Level::parse(text).unwrap();
        let placed: Vec<_> = level.board.cells().filter(|(_, p)| !p.is_empty()).collect();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, Coord::new(2, 2));
        assert_eq!(level.movable, vec![PieceKind::Mirror, PieceKind::Mirror]);
    }

    #[test]
    fn test_oversized_counts_are_skipped() {
        let text = "Pálya: 1
Nehézség: Könnyű
Felhasználható Bábuk:
Tükör, 18446744073709551615
Tükör, 1000000000
Tükör, 26
ÁteresztőTükör, 24
Tükör, 1
Rakéta, 1
";
        let level = Level::parse(text).unwrap();
        assert_eq!(level.movable.len(), BOARD_SIZE * BOARD_SIZE);
        assert_eq!(level.movable[0], PieceKind::SplittingMirror);
        assert_eq!(level.movable[24], PieceKind::Mirror);
    }

    #[test]
    fn test_missing_header_is_error() {
        assert!(matches!(
            Level::parse("Nehézség: Nehéz\n"),
            Err(LevelError::MissingId)
        ));
        assert!(matches!(
            Level::parse("Pálya: 2\n"),
            Err(LevelError::MissingDifficulty)
        ));
        assert!(matches!(
            Level::parse("Pálya: x\nNehézség: Nehéz\n"),
            Err(LevelError::InvalidId(_))
        ));
        assert!(matches!(
            Level::parse("Pálya: 2\nNehézség: Brutal\n"),
            Err(LevelError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_difficulty_points_table() {
        let points: Vec<u32> = Difficulty::ALL.iter().map(Difficulty::points).collect();
        assert_eq!(points, vec![120, 240, 360, 600]);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_start_solvable_level() {
        let mut puzzle = Level::parse(SAMPLE).unwrap().start(Beam::default());
        assert!(!puzzle.is_solved());
        puzzle
            .place_movable(0, Coord::new(1, 2), Direction::North)
            .unwrap();
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Level::load(&dir.path().join("palya99.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palya3.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let level = Level::load(&path).unwrap();
        assert_eq!(level.id, 3);
    }
}
