use mineboard_core::{Coord, Coord2, GameLevel};
use std::str::FromStr;
use thiserror::Error;

/// One line typed by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Chord(Coord2),
    Flag(Coord2),
    New,
    Level(GameLevel),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("command not found: {0}")]
    Unknown(String),
    #[error("expected ROW and COL")]
    MissingCoords,
    #[error("could not parse {axis} from {value:?}, expected a number from 1")]
    BadCoord { axis: &'static str, value: String },
    #[error(transparent)]
    Level(#[from] mineboard_core::UnknownLevel),
}

pub const HELP: &str = "\
USAGE:
\tr, reveal ROW COL\tReveal a cell
\tc, chord  ROW COL\tReveal around a numbered cell once its mines are flagged
\tf, flag   ROW COL\tToggle a flag
\tn, new           \tStart over on the same board size
\tl, level  LEVEL  \tSwitch to easy, medium or hard
\th, help          \tPrint this help
\tq, quit          \tLeave the game";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };

        let command = match name {
            "r" | "reveal" => Command::Reveal(parse_coords(&mut words)?),
            "c" | "chord" => Command::Chord(parse_coords(&mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&mut words)?),
            "n" | "new" => Command::New,
            "l" | "level" => Command::Level(words.next().unwrap_or_default().parse()?),
            "h" | "help" => Command::Help,
            "q" | "quit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Reads 1-based `ROW COL` into zero-based board coordinates.
fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, CommandError> {
    let (Some(row), Some(column)) = (words.next(), words.next()) else {
        return Err(CommandError::MissingCoords);
    };
    Ok((parse_axis("row", row)?, parse_axis("col", column)?))
}

fn parse_axis(axis: &'static str, value: &str) -> Result<Coord, CommandError> {
    match value.parse::<Coord>() {
        Ok(x) if x > 0 => Ok(x - 1),
        _ => Err(CommandError::BadCoord {
            axis,
            value: value.to_string(),
        }),
    }
}
