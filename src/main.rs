//! Byte Racer headless runner
//!
//! Loads a level directory, reports on each level and optionally plays every
//! level without input for a while, logging what happens.
//!
//! ```text
//! byte-racer <levels_dir> [--tuning <file>] [--dialogs <file>] [--simulate <seconds>]
//! ```

use std::path::PathBuf;

use byte_racer::consts::FRAME_DT;
use byte_racer::format_time;
use byte_racer::sim::{GameEvent, GameSession, Level, PickupKind, TickInput, tick};
use byte_racer::{DialogBook, PersistenceError, Tuning};

const USAGE: &str = "usage: byte-racer <levels_dir> [--tuning <file>] [--dialogs <file>] [--simulate <seconds>]";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Default)]
struct Args {
    levels_dir: PathBuf,
    tuning: Option<PathBuf>,
    dialogs: Option<PathBuf>,
    simulate: Option<f32>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut parsed = Args::default();
        let mut levels_dir = None;

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| CliError::Usage(format!("missing value for {flag}")))
            };
            match arg.as_str() {
                "--tuning" => parsed.tuning = Some(value("--tuning")?.into()),
                "--dialogs" => parsed.dialogs = Some(value("--dialogs")?.into()),
                "--simulate" => {
                    let raw = value("--simulate")?;
                    let seconds = raw
                        .parse::<f32>()
                        .ok()
                        .filter(|s| s.is_finite() && *s >= 0.0)
                        .ok_or_else(|| CliError::Usage(format!("invalid --simulate value '{raw}'")))?;
                    parsed.simulate = Some(seconds);
                }
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option {flag}")));
                }
                _ if levels_dir.is_none() => levels_dir = Some(PathBuf::from(&arg)),
                _ => return Err(CliError::Usage(format!("unexpected argument '{arg}'"))),
            }
        }

        parsed.levels_dir = levels_dir.ok_or_else(|| CliError::Usage("missing levels directory".into()))?;
        Ok(parsed)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let args = Args::parse(std::env::args().skip(1))?;

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let dialogs = match &args.dialogs {
        Some(path) => DialogBook::load(path)?,
        None => DialogBook::new(),
    };
    let levels = byte_racer::persistence::load_level_dir(&args.levels_dir)?;

    for (index, level) in levels.iter().enumerate() {
        log_summary(index, level, &dialogs);
    }

    if let Some(seconds) = args.simulate {
        let mut session = GameSession::new(levels, tuning).with_dialogs(dialogs);
        for index in 0..session.levels.len() {
            simulate(&mut session, index, seconds);
        }
    }
    Ok(())
}

fn log_summary(index: usize, level: &Level, dialogs: &DialogBook) {
    let keys = level.pickups.iter().filter(|p| p.kind == PickupKind::Key).count();
    let doors = level.walls.iter().filter(|w| w.is_door()).count();
    let dialog_count = match dialogs.sequence_count(&level.name) {
        0 => level.dialogs.len(),
        scripted => scripted,
    };
    log::info!(
        "[{}] '{}': {} walls ({} doors), {} zones, {} files, {} keys, needs {} files, author time {}, {} dialogs",
        index,
        level.name,
        level.walls.len(),
        doors,
        level.zones.len(),
        level.file_count(),
        keys,
        level.files_required,
        format_time(level.author_time),
        dialog_count
    );
}

/// Play one level with no input, skipping through dialogs
fn simulate(session: &mut GameSession, index: usize, seconds: f32) {
    if !session.set_level(index) {
        return;
    }
    let frames = (seconds / FRAME_DT).round() as u64;
    let input = TickInput::default();

    for _ in 0..frames {
        while session.advance_dialog() {}
        tick(session, &input, FRAME_DT);

        for event in session.drain_events() {
            match event {
                GameEvent::PlayerDied => log::info!("  died at {}", format_time(session.elapsed_time)),
                GameEvent::LevelUnlocked { level } => log::info!("  unlocked level {level}"),
                GameEvent::DoorOpened { wall } => log::debug!("  door {wall} opened"),
                _ => {}
            }
        }
    }

    match session.completion {
        Some(completion) => log::info!(
            "  completed in {} with {}/{} files",
            format_time(completion.time),
            completion.files_collected,
            completion.files_total
        ),
        None => log::info!(
            "  not completed after {}, health {:.2}",
            format_time(f64::from(seconds)),
            session.player.health
        ),
    }
}
