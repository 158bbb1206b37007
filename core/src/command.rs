use alloc::string::ToString;
use core::fmt;
use core::num::IntErrorKind;
use core::str::FromStr;

use crate::*;

/// The recognized command words.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Pick,
    Flag,
    Reset,
    Level,
    Quit,
}

impl CommandKind {
    pub const ALL: [Self; 5] = [Self::Pick, Self::Flag, Self::Reset, Self::Level, Self::Quit];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pick => "pick",
            Self::Flag => "flag",
            Self::Reset => "reset",
            Self::Level => "level",
            Self::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntactically valid player action. Positions are not yet checked against
/// any grid, that happens when the command is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Pick { row: i64, col: i64 },
    Flag { row: i64, col: i64 },
    Level(Difficulty),
    Reset,
    Quit,
}

impl Command {
    pub const fn kind(self) -> CommandKind {
        match self {
            Self::Pick { .. } => CommandKind::Pick,
            Self::Flag { .. } => CommandKind::Flag,
            Self::Level(_) => CommandKind::Level,
            Self::Reset => CommandKind::Reset,
            Self::Quit => CommandKind::Quit,
        }
    }

    /// Parses a tokenized command line: the command word followed by its arguments.
    ///
    /// `quit` and `reset` ignore trailing arguments.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let Some((word, rest)) = args.split_first() else {
            return Err(GameError::InvalidCommand(Default::default()));
        };
        let word = word.as_ref();
        let kind = CommandKind::from_name(word)
            .ok_or_else(|| GameError::InvalidCommand(word.to_string()))?;

        match kind {
            CommandKind::Quit => Ok(Self::Quit),
            CommandKind::Reset => Ok(Self::Reset),
            CommandKind::Pick | CommandKind::Flag => {
                let (row, col) = parse_position(kind, rest)?;
                Ok(if kind == CommandKind::Pick {
                    Self::Pick { row, col }
                } else {
                    Self::Flag { row, col }
                })
            }
            CommandKind::Level => match rest {
                [name] => Ok(Self::Level(name.as_ref().parse()?)),
                _ => Err(GameError::InvalidArgumentCount(kind)),
            },
        }
    }
}

fn parse_position<S: AsRef<str>>(kind: CommandKind, args: &[S]) -> Result<(i64, i64)> {
    let [row, col] = args else {
        return Err(GameError::InvalidArgumentCount(kind));
    };
    match (parse_coordinate(row.as_ref()), parse_coordinate(col.as_ref())) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(GameError::InvalidArgumentCount(kind)),
    }
}

/// Integers too large for `i64` saturate, so they still count as integers
/// and end up rejected as off-grid positions.
fn parse_coordinate(token: &str) -> Option<i64> {
    match token.parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

impl FromStr for Command {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let args: alloc::vec::Vec<&str> = s.split_whitespace().collect();
        Self::parse(args.as_slice())
    }
}
