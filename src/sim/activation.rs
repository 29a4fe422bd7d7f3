//! Target activation
//!
//! The only place target flags are decided. Run after every trace.

use super::board::Board;
use super::direction::{Coord, Direction};
use super::laser::BeamPaths;

/// Heading of the beam when it entered `target` along `path`, for every
/// occurrence of the target past the first cell.
fn arrivals(path: &[Coord], target: Coord) -> impl Iterator<Item = Direction> + '_ {
    path.windows(2)
        .filter(move |w| w[1] == target)
        .filter_map(|w| Direction::from_delta(w[0], w[1]))
}

/// Recompute every target's `activated` flag from the traced beams.
///
/// A target is activated when some beam enters it travelling straight at
/// its face, i.e. the reverse of the arrival heading equals the target's
/// orientation. A beam that starts on a target never activates it.
pub fn resolve(board: &mut Board, paths: &BeamPaths) {
    let targets: Vec<_> = board.targets().collect();
    for target in targets {
        let activated = paths.segments().any(|segment| {
            arrivals(segment, target.position).any(|d| d.invert() == target.orientation)
        });
        if activated != target.activated {
            log::debug!(
                "target at {} {}",
                target.position,
                if activated { "activated" } else { "deactivated" }
            );
        }
        board.set_activated(target.position, activated);
    }
}

/// Whether every target on the board is activated (vacuously true with none)
pub fn all_activated(board: &Board) -> bool {
    board.targets().all(|t| t.activated)
}
