//! Property tests for beam tracing and target activation.
//!
//! Boards are generated cell by cell with every piece type, including targets
//! whose flags start in a random (stale) state.

use std::collections::HashSet;

use laser_maze::consts::BOARD_SIZE;
use laser_maze::sim::{
    Beam, BeamPaths, Board, Coord, Direction, Piece, PieceKind, Puzzle, reflect, resolve, split,
    trace,
};
use proptest::prelude::*;

const N: i32 = BOARD_SIZE as i32;

fn direction() -> impl Strategy<Value = Direction> {
    (0usize..4).prop_map(Direction::from_index)
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        4 => Just(Piece::Empty),
        1 => Just(Piece::Blocker),
        2 => direction().prop_map(|orientation| Piece::Mirror { orientation }),
        1 => direction().prop_map(|orientation| Piece::SplittingMirror { orientation }),
        1 => (direction(), any::<bool>())
            .prop_map(|(orientation, activated)| Piece::Target { orientation, activated }),
    ]
}

fn board() -> impl Strategy<Value = Board> {
    prop::collection::vec(piece(), BOARD_SIZE * BOARD_SIZE).prop_map(|cells| {
        let mut board = Board::new();
        for (i, piece) in cells.into_iter().enumerate() {
            let pos = Coord::new((i / BOARD_SIZE) as i32, (i % BOARD_SIZE) as i32);
            board.place(piece, pos).unwrap();
        }
        board
    })
}

fn beam() -> impl Strategy<Value = Beam> {
    (0..N, 0..N, direction()).prop_map(|(row, col, heading)| Beam {
        position: Coord::new(row, col),
        heading,
    })
}

fn assert_segment_well_formed(segment: &[Coord]) {
    // Each (cell, heading) state is entered at most once
    assert!(segment.len() <= 4 * BOARD_SIZE * BOARD_SIZE);
    let distinct: HashSet<_> = segment.iter().collect();
    assert!(distinct.len() <= BOARD_SIZE * BOARD_SIZE);
    for pos in segment {
        assert!(pos.in_bounds());
    }
    for w in segment.windows(2) {
        let d = Direction::from_delta(w[0], w[1]).expect("consecutive cells differ");
        assert_eq!(w[0].step(d), w[1], "cells {} and {} are not adjacent", w[0], w[1]);
    }
}

fn expected_activation(paths: &BeamPaths, pos: Coord, orientation: Direction) -> bool {
    paths.segments().any(|segment| {
        segment.windows(2).any(|w| {
            w[1] == pos
                && Direction::from_delta(w[0], w[1]).map(Direction::invert) == Some(orientation)
        })
    })
}

#[test]
fn reflection_never_passes_through() {
    for orientation in Direction::ALL {
        for incoming in Direction::ALL {
            let out = reflect(orientation, incoming);
            assert_ne!(out, incoming);
            // Same input twice gives the same answer
            assert_eq!(out, reflect(orientation, incoming));
        }
    }
}

#[test]
fn parity_families_give_distinct_outputs() {
    for incoming in Direction::ALL {
        assert_ne!(
            reflect(Direction::North, incoming),
            reflect(Direction::East, incoming)
        );
        let (reflected, transmitted) = split(Direction::North, incoming);
        assert_eq!(reflected, reflect(Direction::North, incoming));
        assert_eq!(transmitted, incoming);
    }
}

proptest! {
    #[test]
    fn every_beam_terminates_within_bounds(board in board(), beam in beam()) {
        let paths = trace(&board, beam);
        prop_assert_eq!(paths.main.first().copied(), Some(beam.position));
        for segment in paths.segments() {
            assert_segment_well_formed(segment);
        }
    }

    #[test]
    fn transmitted_beams_start_on_main_path_splitters(board in board(), beam in beam()) {
        let paths = trace(&board, beam);
        for segment in &paths.transmitted {
            let start = segment[0];
            prop_assert!(paths.main.contains(&start));
            prop_assert!(
                matches!(board.piece_at(start), Ok(Piece::SplittingMirror { .. })),
                "transmitted beam starts at {} which is not a splitting mirror",
                start
            );
        }
    }

    #[test]
    fn activation_matches_arrival_direction(mut board in board(), beam in beam()) {
        let paths = trace(&board, beam);
        resolve(&mut board, &paths);
        for target in board.targets() {
            prop_assert_eq!(
                target.activated,
                expected_activation(&paths, target.position, target.orientation),
                "target at {}", target.position
            );
        }
    }

    #[test]
    fn trace_and_resolve_are_idempotent(mut board in board(), beam in beam()) {
        let first = trace(&board, beam);
        resolve(&mut board, &first);
        let snapshot = board.clone();

        let second = trace(&board, beam);
        resolve(&mut board, &second);
        prop_assert_eq!(first, second);
        prop_assert_eq!(board, snapshot);
    }

    #[test]
    fn pooled_targets_are_never_activated(board in board(), beam in beam()) {
        let on_board = board.targets().count();
        let puzzle = Puzzle::new(board, [PieceKind::Target, PieceKind::Target], beam);
        prop_assert_eq!(puzzle.targets().len(), on_board);
        prop_assert!(!puzzle.all_pieces_placed());
        prop_assert!(!puzzle.is_solved());
    }
}
