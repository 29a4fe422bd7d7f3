//! Player profiles and the leaderboard
//!
//! One text file per profile in the profiles directory, named after the
//! gamertag. The leaderboard ranks every stored profile by glory points.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::COMPLETION_BONUS;
use crate::error::ProfileError;
use crate::level::Difficulty;

/// Best result on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedLevel {
    pub id: u32,
    pub difficulty: Difficulty,
    /// Best solve time in seconds
    pub seconds: u64,
}

/// What recording a solve changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First solve of this level
    NewLevel,
    /// Faster than the stored best time
    ImprovedTime,
    /// Not faster; nothing changed
    NotImproved,
}

/// A player's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub gamertag: String,
    pub completed: Vec<CompletedLevel>,
    pub total_points: u32,
    pub total_seconds: u64,
}

impl Profile {
    pub fn new(gamertag: impl Into<String>) -> Self {
        Self {
            gamertag: gamertag.into(),
            completed: Vec::new(),
            total_points: 0,
            total_seconds: 0,
        }
    }

    /// Record a solve, keeping only the best time per level.
    ///
    /// Totals are not touched; call [`Profile::refresh_totals`] afterwards.
    pub fn record_result(&mut self, id: u32, difficulty: Difficulty, seconds: u64) -> RecordOutcome {
        match self.completed.iter_mut().find(|c| c.id == id) {
            Some(existing) if seconds < existing.seconds => {
                existing.seconds = seconds;
                RecordOutcome::ImprovedTime
            }
            Some(_) => RecordOutcome::NotImproved,
            None => {
                self.completed.push(CompletedLevel {
                    id,
                    difficulty,
                    seconds,
                });
                RecordOutcome::NewLevel
            }
        }
    }

    /// Recompute total points and total time from the completed levels
    pub fn refresh_totals(&mut self) {
        self.total_seconds = self.completed.iter().map(|c| c.seconds).sum();
        self.total_points = self.completed.iter().map(|c| c.difficulty.points()).sum();
    }

    /// Leaderboard score: points plus a bonus per level, minus time spent
    pub fn glory_points(&self) -> i64 {
        self.total_points as i64 + self.completed.len() as i64 * COMPLETION_BONUS
            - self.total_seconds as i64
    }

    /// The level to play next: the one after the highest completed level,
    /// or `None` once the last level is done
    pub fn next_level(&self, level_count: u32) -> Option<u32> {
        match self.completed.iter().map(|c| c.id).max() {
            None => Some(1),
            Some(last) if last < level_count => Some(last + 1),
            Some(_) => None,
        }
    }

    /// Render the profile file
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Gamertag: {}", self.gamertag);
        let _ = writeln!(out, "Összpontszám: {}", self.total_points);
        let _ = writeln!(out, "Összesen eltöltött idő: {} másodperc", self.total_seconds);
        out.push('\n');
        out.push_str("Teljesített pályák:\n");
        for c in &self.completed {
            let _ = writeln!(
                out,
                "  - Pálya ID: {}, Nehézség: {}, Idő: {} másodperc, Pontok: {}",
                c.id,
                c.difficulty,
                c.seconds,
                c.difficulty.points()
            );
        }
        out
    }

    /// Parse a profile file
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let lines: Vec<&str> = text.lines().collect();

        let mut profile = Profile::new(header(&lines, 0, "Gamertag")?);
        profile.total_points = number(1, header(&lines, 1, "Összpontszám")?)?;
        profile.total_seconds = number(2, header(&lines, 2, "Összesen eltöltött idő")?)?;

        for (index, line) in lines.iter().enumerate().skip(4) {
            let Some(rest) = line.trim_start().strip_prefix("- ") else {
                continue;
            };
            let parts: Vec<&str> = rest.split(", ").collect();
            let id = number(index, entry_value(&parts, 0, index)?)?;
            let difficulty = Difficulty::from_str(entry_value(&parts, 1, index)?).ok_or_else(|| {
                ProfileError::Malformed {
                    line: index + 1,
                    reason: "unknown difficulty".to_string(),
                }
            })?;
            let seconds = number(index, entry_value(&parts, 2, index)?)?;
            profile.completed.push(CompletedLevel {
                id,
                difficulty,
                seconds,
            });
        }
        Ok(profile)
    }
}

/// Value of a `key: value` header on line `index`
fn header<'a>(lines: &[&'a str], index: usize, key: &str) -> Result<&'a str, ProfileError> {
    lines
        .get(index)
        .copied()
        .and_then(|l| l.strip_prefix(key))
        .and_then(|rest| rest.strip_prefix(": "))
        .ok_or_else(|| ProfileError::Malformed {
            line: index + 1,
            reason: format!("expected {key:?}"),
        })
}

/// Value of the `i`-th `label: value` part of a level entry
fn entry_value<'a>(parts: &[&'a str], i: usize, index: usize) -> Result<&'a str, ProfileError> {
    parts
        .get(i)
        .copied()
        .and_then(|p| p.split_once(": "))
        .map(|(_, v)| v)
        .ok_or_else(|| ProfileError::Malformed {
            line: index + 1,
            reason: "incomplete level entry".to_string(),
        })
}

/// Leading integer of a value such as `135 másodperc`; out-of-range values
/// are malformed, never truncated
fn number<T: FromStr>(index: usize, value: &str) -> Result<T, ProfileError> {
    value
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| ProfileError::Malformed {
            line: index + 1,
            reason: format!("expected a number, got {value:?}"),
        })
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub gamertag: String,
    pub glory: i64,
    pub completed: usize,
    pub total_seconds: u64,
}

/// Profiles ranked by glory points, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank profiles; ties keep their input order
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> Self {
        let mut entries: Vec<LeaderboardEntry> = profiles
            .into_iter()
            .map(|p| LeaderboardEntry {
                gamertag: p.gamertag.clone(),
                glory: p.glory_points(),
                completed: p.completed.len(),
                total_seconds: p.total_seconds,
            })
            .collect();
        entries.sort_by(|a, b| b.glory.cmp(&a.glory));
        Self { entries }
    }

    /// Rank (1-indexed) of a gamertag, if listed
    pub fn rank_of(&self, gamertag: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.gamertag == gamertag)
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the leaderboard file
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(
                out,
                "{}: Dicsőségpontok: {}, Teljesített kihívások: {}, Összes elhasznált idő: {}mp",
                e.gamertag, e.glory, e.completed, e.total_seconds
            );
        }
        out
    }
}

/// Profile files on disk
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    const EXTENSION: &'static str = "txt";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, gamertag: &str) -> Result<PathBuf, ProfileError> {
        if gamertag.is_empty()
            || gamertag.contains(['/', '\\', ':'])
            || gamertag.chars().any(char::is_control)
            || gamertag.trim() != gamertag
            || gamertag == "."
            || gamertag == ".."
        {
            return Err(ProfileError::InvalidGamertag(gamertag.to_string()));
        }
        Ok(self.dir.join(format!("{gamertag}.{}", Self::EXTENSION)))
    }

    fn io_error(path: &Path, source: std::io::Error) -> ProfileError {
        ProfileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Gamertags of every stored profile, sorted
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(&self.dir, e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Self::io_error(&self.dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == Self::EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, gamertag: &str) -> Result<Profile, ProfileError> {
        let path = self.path_for(gamertag)?;
        let text = std::fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))?;
        Profile::parse(&text)
    }

    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        let path = self.path_for(&profile.gamertag)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        std::fs::write(&path, profile.to_text()).map_err(|e| Self::io_error(&path, e))?;
        log::info!("Profile saved ({} levels)", profile.completed.len());
        Ok(())
    }

    /// Every readable profile; unreadable ones are skipped with a warning
    pub fn load_all(&self) -> Result<Vec<Profile>, ProfileError> {
        let mut profiles = Vec::new();
        for name in self.list()? {
            match self.load(&name) {
                Ok(p) => profiles.push(p),
                Err(e) => log::warn!("Skipping profile {name}: {e}"),
            }
        }
        Ok(profiles)
    }

    /// Rank every stored profile and write the leaderboard file
    pub fn write_leaderboard(&self, path: &Path) -> Result<Leaderboard, ProfileError> {
        let profiles = self.load_all()?;
        let board = Leaderboard::from_profiles(&profiles);
        std::fs::write(path, board.to_text()).map_err(|e| Self::io_error(path, e))?;
        log::info!("Leaderboard refreshed ({} entries)", board.entries.len());
        Ok(board)
    }
}
