use anyhow::Context;
use clap::Parser;
use mineboard_core::*;
use serde::Serialize;
use std::io::{self, BufRead, Write};

use command::{Command, HELP};
use stopwatch::Stopwatch;
use view::{BoardView, HeaderView, VisibleCell};

mod command;
mod stopwatch;
mod view;

#[derive(Parser, Debug)]
#[command(version, about = "Clear the grid without setting off a mine", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Preset board: easy, medium or hard
    #[arg(short, long, conflicts_with_all = ["width", "height", "mines"])]
    level: Option<GameLevel>,

    /// Custom board width, needs --height and --mines too
    #[arg(long, requires_all = ["height", "mines"])]
    width: Option<Coord>,

    #[arg(long, requires_all = ["width", "mines"])]
    height: Option<Coord>,

    #[arg(long, requires_all = ["width", "height"])]
    mines: Option<CellCount>,

    /// Print every board state as a JSON line instead of a grid
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Snapshot {
    status: GameStatus,
    mines_left: isize,
    elapsed_secs: u64,
    board: Vec<Vec<VisibleCell>>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    let mut game = match (args.width, args.height, args.mines) {
        (Some(width), Some(height), Some(mines)) => {
            let config = BoardConfig::new(width, height, mines)
                .with_context(|| format!("invalid board {width}x{height} with {mines} mines"))?;
            Game::new(config, seed)?
        }
        _ => Game::from_level(args.level.unwrap_or_default(), seed)?,
    };
    let mut stopwatch = Stopwatch::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    render(&mut stdout, &game, &stopwatch, args.json)?;

    for line in stdin.lock().lines() {
        let line = line.context("could not read command")?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "{HELP}")?;
                continue;
            }
            Command::Reveal(coords) => game.reveal(coords).map(announce),
            Command::Chord(coords) => game.chord(coords).map(announce),
            Command::Flag(coords) => game.toggle_flag(coords).map(|_| None),
            Command::New => game.reset().map(|_| None),
            Command::Level(level) => game.set_level(level).map(|_| None),
        };

        match result {
            Ok(message) => {
                stopwatch.sync(game.status());
                render(&mut stdout, &game, &stopwatch, args.json)?;
                if let Some(message) = message {
                    writeln!(stdout, "{message}")?;
                }
            }
            Err(GameError::AlreadyEnded) => {
                eprintln!("error: game is over, type `n` for a new one");
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}

fn announce(outcome: RevealOutcome) -> Option<&'static str> {
    match outcome {
        RevealOutcome::HitMine => Some("Boom! You lose."),
        RevealOutcome::Won => Some("Board cleared, a winner is you!"),
        RevealOutcome::NoChange | RevealOutcome::Revealed => None,
    }
}

fn render(out: &mut impl Write, game: &Game, stopwatch: &Stopwatch, json: bool) -> anyhow::Result<()> {
    let elapsed_secs = stopwatch.elapsed_secs();
    if json {
        let snapshot = Snapshot {
            status: game.status(),
            mines_left: game.mines_left(),
            elapsed_secs,
            board: view::visible_rows(game.board()),
        };
        serde_json::to_writer(&mut *out, &snapshot)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", HeaderView { game, elapsed_secs })?;
        write!(out, "{}", BoardView(game.board()))?;
    }
    out.flush()?;
    Ok(())
}

fn clock_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
