use alloc::string::String;
use thiserror::Error;

use crate::{CellCount, CommandKind, Coord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{}", describe_invalid_command(.0))]
    InvalidCommand(String),
    #[error("Invalid number of arguments for '{0}' command!")]
    InvalidArgumentCount(CommandKind),
    #[error("Specified position is invalid!")]
    InvalidPosition,
    #[error("Specified cell is already open!")]
    CellAlreadyOpen,
    #[error("Specified level is invalid!")]
    InvalidLevelName,
    #[error("Cannot fit {mines} mines into a {rows}x{cols} grid")]
    ConfigurationError { rows: Coord, cols: Coord, mines: CellCount },
}

fn describe_invalid_command(token: &str) -> String {
    if token.is_empty() {
        String::from("No command given!")
    } else {
        alloc::format!("Invalid command: {token}!")
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
