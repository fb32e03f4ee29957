use std::str::FromStr;
use sweeper_core::{CellId, Coord};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r <id> | r <row> <col>   reveal a cell
  f <id> | f <row> <col>   flag or unflag a cell
  n [size]                 new game, keeps the current size if none given
  c                        toggle showing the mines
  v                        validate the board
  s                        save the game
  l                        load the saved game
  h                        this help
  q                        quit";

/// A cell named either by its sequential id or by row and column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Id(CellId),
    Coords(Coord, Coord),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Target),
    Flag(Target),
    New(Option<usize>),
    Cheat,
    Validate,
    Save,
    Load,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`, try `h`")]
    Unknown(String),
    #[error("Expected a cell id or a row and column")]
    MissingTarget,
    #[error("`{0}` is not a cell position")]
    NotANumber(String),
    #[error("Too many arguments")]
    TooManyArguments,
}

fn parse_number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::NotANumber(word.to_owned()))
}

fn parse_target(args: &[&str]) -> Result<Target, CommandError> {
    match args {
        [] => Err(CommandError::MissingTarget),
        [id] => Ok(Target::Id(parse_number(id)?)),
        [row, col] => Ok(Target::Coords(parse_number(row)?, parse_number(col)?)),
        _ => Err(CommandError::TooManyArguments),
    }
}

fn no_args(command: Command, args: &[&str]) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::TooManyArguments)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => parse_target(args).map(Command::Reveal),
            "f" | "flag" => parse_target(args).map(Command::Flag),
            // an unreadable size falls back to the current one
            "n" | "new" => match args {
                [] => Ok(Command::New(None)),
                [size] => Ok(Command::New(size.parse().ok())),
                _ => Err(CommandError::TooManyArguments),
            },
            "c" | "cheat" => no_args(Command::Cheat, args),
            "v" | "validate" => no_args(Command::Validate, args),
            "s" | "save" => no_args(Command::Save, args),
            "l" | "load" => no_args(Command::Load, args),
            "h" | "help" | "?" => no_args(Command::Help, args),
            "q" | "quit" | "exit" => no_args(Command::Quit, args),
            _ => Err(CommandError::Unknown(name.to_owned())),
        }
    }
}
