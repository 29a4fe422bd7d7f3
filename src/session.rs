//! Finishing a level run
//!
//! Ties a solved puzzle back to the player's profile: record the time,
//! refresh the totals, save the profile and rewrite the leaderboard.

use std::path::Path;

use crate::error::ProfileError;
use crate::level::Level;
use crate::profile::{Leaderboard, Profile, ProfileStore, RecordOutcome};
use crate::sim::Puzzle;

/// What a recorded solve changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub outcome: RecordOutcome,
    /// The profile as saved
    pub profile: Profile,
    pub leaderboard: Leaderboard,
}

/// Load a player's profile, starting a fresh one if none is stored yet
pub fn load_or_create(store: &ProfileStore, gamertag: &str) -> Result<Profile, ProfileError> {
    match store.load(gamertag) {
        Ok(profile) => Ok(profile),
        Err(ProfileError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            log::info!("Creating profile {gamertag}");
            Ok(Profile::new(gamertag))
        }
        Err(e) => Err(e),
    }
}

/// The level a player should play next, or `None` once every level is done
pub fn next_level_for(
    store: &ProfileStore,
    gamertag: &str,
    level_count: u32,
) -> Result<Option<u32>, ProfileError> {
    Ok(load_or_create(store, gamertag)?.next_level(level_count))
}

/// Record a finished run.
///
/// Returns `Ok(None)` without touching anything on disk unless the puzzle
/// is solved (every target lit, every movable piece placed).
pub fn record_solve(
    store: &ProfileStore,
    gamertag: &str,
    level: &Level,
    puzzle: &Puzzle,
    seconds: u64,
    leaderboard_file: &Path,
) -> Result<Option<SolveReport>, ProfileError> {
    if !puzzle.is_solved() {
        return Ok(None);
    }

    let mut profile = load_or_create(store, gamertag)?;
    let outcome = profile.record_result(level.id, level.difficulty, seconds);
    profile.refresh_totals();
    store.save(&profile)?;
    let leaderboard = store.write_leaderboard(leaderboard_file)?;
    log::info!(
        "{gamertag} solved level {} in {seconds}s ({outcome:?})",
        level.id
    );

    Ok(Some(SolveReport {
        outcome,
        profile,
        leaderboard,
    }))
}
