//! Laser Maze entry point
//!
//! Loads a level, applies the given moves, traces the beam and prints the
//! board, the beams and the target states. With `--player` a solved run is
//! recorded into that player's profile and the leaderboard is rewritten.
//!
//! Usage: `laser-maze [--player NAME] [--place INDEX,ROW;COL,DIRECTION]...
//! [LEVEL_ID | LEVEL_FILE]`. Without a level the player's next level is
//! played, or level 1 without a player.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use laser_maze::consts::BOARD_SIZE;
use laser_maze::profile::RecordOutcome;
use laser_maze::session::{self, SolveReport};
use laser_maze::sim::{Coord, Direction, Piece, Puzzle};
use laser_maze::{Level, ProfileStore, Settings};

const SETTINGS_FILE: &str = "laser_maze.json";

/// One `--place` request: pool index (1-based on the command line)
#[derive(Debug, PartialEq, Eq)]
struct Placement {
    index: usize,
    position: Coord,
    orientation: Direction,
}

#[derive(Debug, Default)]
struct Args {
    player: Option<String>,
    placements: Vec<Placement>,
    level: Option<String>,
}

fn parse_placement(s: &str) -> Result<Placement, String> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    let [index, position, orientation] = fields.as_slice() else {
        return Err(format!("expected INDEX,ROW;COL,DIRECTION, got {s:?}"));
    };
    let index = index
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(|| format!("bad piece number {index:?}"))?;
    let (row, col) = position
        .split_once(';')
        .ok_or_else(|| format!("bad position {position:?}"))?;
    let position = match (row.trim().parse(), col.trim().parse()) {
        (Ok(row), Ok(col)) => Coord::new(row, col),
        _ => return Err(format!("bad position {position:?}")),
    };
    let orientation =
        Direction::parse(orientation).ok_or_else(|| format!("bad direction {orientation:?}"))?;
    Ok(Placement {
        index,
        position,
        orientation,
    })
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--player" => {
                parsed.player = Some(args.next().ok_or("--player needs a name")?);
            }
            "--place" => {
                let value = args.next().ok_or("--place needs INDEX,ROW;COL,DIRECTION")?;
                parsed.placements.push(parse_placement(&value)?);
            }
            _ if parsed.level.is_none() => parsed.level = Some(arg),
            _ => return Err(format!("unexpected argument {arg:?}")),
        }
    }
    Ok(parsed)
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    log::error!("{message}");
    eprintln!("error: {message}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Laser Maze starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => return fail(e),
    };
    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    let store = ProfileStore::new(&settings.profiles_dir);

    let path = match (&args.level, &args.player) {
        (Some(arg), _) => match arg.parse::<u32>() {
            Ok(id) => settings.level_path(id),
            Err(_) => PathBuf::from(arg),
        },
        (None, Some(player)) => match session::next_level_for(&store, player, settings.level_count) {
            Ok(Some(id)) => settings.level_path(id),
            Ok(None) => {
                println!("{player} has completed every level.");
                return ExitCode::SUCCESS;
            }
            Err(e) => return fail(e),
        },
        (None, None) => settings.level_path(1),
    };

    let level = match Level::load(&path) {
        Ok(level) => level,
        Err(e) => return fail(e),
    };

    println!(
        "Level {} | Difficulty: {} ({} points)",
        level.id,
        level.difficulty,
        level.difficulty.points()
    );
    let started = Instant::now();
    let mut puzzle = level.start(settings.entry);
    for p in &args.placements {
        if let Err(e) = puzzle.place_movable(p.index, p.position, p.orientation) {
            return fail(format!("piece {}: {e}", p.index + 1));
        }
    }
    print!("{}", render(&puzzle));

    let Some(player) = &args.player else {
        return ExitCode::SUCCESS;
    };
    let seconds = started.elapsed().as_secs();
    match session::record_solve(&store, player, &level, &puzzle, seconds, &settings.leaderboard_file) {
        Ok(Some(report)) => println!("{}", solve_message(&report)),
        Ok(None) if !puzzle.all_pieces_placed() => {
            println!("Every movable piece must be used to complete the level.")
        }
        Ok(None) => {}
        Err(e) => return fail(e),
    }
    ExitCode::SUCCESS
}

fn solve_message(report: &SolveReport) -> String {
    let verdict = match report.outcome {
        RecordOutcome::NewLevel => "Level completed!",
        RecordOutcome::ImprovedTime => "New best time!",
        RecordOutcome::NotImproved => "Level completed again, best time unchanged.",
    };
    let rank = report
        .leaderboard
        .rank_of(&report.profile.gamertag)
        .map_or_else(String::new, |r| format!(" Leaderboard rank: {r}."));
    format!(
        "{verdict} Glory points: {}.{rank}",
        report.profile.glory_points()
    )
}

fn arrow(d: Direction) -> char {
    match d {
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

fn mirror_glyph(orientation: Direction) -> char {
    if orientation.index() % 2 == 0 { '/' } else { '\\' }
}

/// Text view of the board, targets and movable pieces
fn render(puzzle: &Puzzle) -> String {
    let paths = puzzle.paths();
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..BOARD_SIZE {
        let _ = write!(out, " {col} ");
    }
    out.push('\n');
    let _ = writeln!(out, "  +{}+", "---".repeat(BOARD_SIZE));

    for row in 0..BOARD_SIZE {
        let _ = write!(out, "{row} |");
        for col in 0..BOARD_SIZE {
            let pos = Coord::new(row as i32, col as i32);
            let cell = match puzzle.board().piece_at(pos) {
                Ok(Piece::Blocker) => " # ".to_string(),
                Ok(Piece::Mirror { orientation }) => format!(" {} ", mirror_glyph(*orientation)),
                Ok(Piece::SplittingMirror { orientation }) => {
                    format!("[{}]", mirror_glyph(*orientation))
                }
                Ok(Piece::Target {
                    orientation,
                    activated,
                }) => {
                    if *activated {
                        format!("({})", arrow(*orientation))
                    } else {
                        format!(" {} ", arrow(*orientation))
                    }
                }
                Ok(Piece::Empty) if paths.lit(pos) => " + ".to_string(),
                _ => " . ".to_string(),
            };
            out.push_str(&cell);
        }
        out.push_str("|\n");
    }
    let _ = writeln!(out, "  +{}+", "---".repeat(BOARD_SIZE));

    out.push('\n');
    for (i, t) in puzzle.targets().iter().enumerate() {
        let _ = writeln!(
            out,
            "Target {}: {} facing {:>7} | activated: {}",
            i + 1,
            t.position,
            t.orientation.label(),
            if t.activated { "yes" } else { "no" }
        );
    }

    out.push_str("\nMovable pieces:\n");
    for (i, p) in puzzle.pool().iter().enumerate() {
        let position = p
            .position
            .map_or_else(|| "-".to_string(), |pos| pos.to_string());
        let _ = writeln!(
            out,
            "{:>5}) {:>15} | position: {:>8} | orientation: {:>7}",
            i + 1,
            p.kind.label(),
            position,
            p.orientation.label()
        );
    }

    let _ = writeln!(
        out,
        "\n{}",
        if puzzle.is_solved() { "Solved!" } else { "Not solved yet." }
    );
    out
}
