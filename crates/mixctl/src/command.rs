//! Commands accepted by the interactive shell.
//!
//! Each line typed at the shell parses into one [`Command`]. Arguments are
//! checked here, so a non-numeric channel or percentage never reaches the
//! mixer session.

use std::str::FromStr;

use mixctl_core::Direction;
use thiserror::Error;

/// A mixer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the mixer and enumerate channels
    Connect,
    /// Release the mixer
    Disconnect,
    /// Show enumerated channels
    List,
    /// Show one channel's volume, or every channel's
    Get { channel: Option<u32> },
    /// Adjust every channel
    Set { percent: i64, direction: Direction },
    /// Adjust one channel
    SetChannel { channel: u32, percent: i64, direction: Direction },
    /// Silence every channel, remembering their volumes
    Mute,
    /// Restore volumes saved by `mute`
    Unmute,
    /// Show connection and mute state
    Status,
    /// Show available commands
    Help,
    /// Leave the shell
    Quit,
}

/// Shell command parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {what}: '{value}' is not an integer")]
    InvalidInteger { what: &'static str, value: String },

    #[error("Unexpected argument: {0}")]
    Unexpected(String),
}

/// Shell help text.
pub const HELP: &str = "\
Commands:
  connect                      open the mixer and enumerate channels
  disconnect | close           release the mixer
  list                         show channels
  get [CHANNEL]                show one channel or all channels
  set PERCENT [DIRECTION]      adjust all channels
  cset CHANNEL PERCENT [DIR]   adjust one channel
  mute                         silence all channels, remembering volumes
  unmute                       restore volumes saved by mute
  status                       show connection and mute state
  help                         show this text
  quit | exit                  leave the shell

DIRECTION is raise|up|increase, lower|down|decrease, or omitted to set
the volume to PERCENT of the channel maximum.";

fn parse_int<T: FromStr>(what: &'static str, value: Option<&str>) -> Result<T, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument(what))?;
    value
        .parse()
        .map_err(|_| ParseError::InvalidInteger { what, value: value.to_string() })
}

fn parse_direction(value: Option<&str>) -> Direction {
    value.map(Direction::from_tag).unwrap_or_default()
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();

        let command = match name.as_str() {
            "connect" | "open" => Self::Connect,
            "disconnect" | "close" => Self::Disconnect,
            "list" | "channels" => Self::List,
            "get" | "volume" => {
                let channel = match words.next() {
                    Some(value) => Some(parse_int("channel", Some(value))?),
                    None => None,
                };
                Self::Get { channel }
            }
            "set" => {
                let percent = parse_int("percent", words.next())?;
                Self::Set { percent, direction: parse_direction(words.next()) }
            }
            "cset" => {
                let channel = parse_int("channel", words.next())?;
                let percent = parse_int("percent", words.next())?;
                Self::SetChannel { channel, percent, direction: parse_direction(words.next()) }
            }
            "mute" => Self::Mute,
            "unmute" => Self::Unmute,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(ParseError::Unexpected(extra.to_string()));
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("connect".parse::<Command>(), Ok(Command::Connect));
        assert_eq!("close".parse::<Command>(), Ok(Command::Disconnect));
        assert_eq!("  LIST ".parse::<Command>(), Ok(Command::List));
        assert_eq!("mute".parse::<Command>(), Ok(Command::Mute));
        assert_eq!("unmute".parse::<Command>(), Ok(Command::Unmute));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_get() {
        assert_eq!("get".parse::<Command>(), Ok(Command::Get { channel: None }));
        assert_eq!("get 1".parse::<Command>(), Ok(Command::Get { channel: Some(1) }));
    }

    #[test]
    fn test_parse_set_directions() {
        assert_eq!(
            "set 10 up".parse::<Command>(),
            Ok(Command::Set { percent: 10, direction: Direction::Increase })
        );
        assert_eq!(
            "set 10 lower".parse::<Command>(),
            Ok(Command::Set { percent: 10, direction: Direction::Decrease })
        );
        assert_eq!("set 40".parse::<Command>(), Ok(Command::Set { percent: 40, direction: Direction::Absolute }));
        assert_eq!(
            "cset 1 5 raise".parse::<Command>(),
            Ok(Command::SetChannel { channel: 1, percent: 5, direction: Direction::Increase })
        );
    }

    #[test]
    fn test_non_integer_arguments_are_rejected() {
        assert_eq!(
            "set loud".parse::<Command>(),
            Err(ParseError::InvalidInteger { what: "percent", value: "loud".into() })
        );
        assert_eq!(
            "cset left 10".parse::<Command>(),
            Err(ParseError::InvalidInteger { what: "channel", value: "left".into() })
        );
        assert_eq!(
            "set 10.5".parse::<Command>(),
            Err(ParseError::InvalidInteger { what: "percent", value: "10.5".into() })
        );
        assert_eq!(
            "get -1".parse::<Command>(),
            Err(ParseError::InvalidInteger { what: "channel", value: "-1".into() })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("set".parse::<Command>(), Err(ParseError::MissingArgument("percent")));
        assert_eq!("cset 0".parse::<Command>(), Err(ParseError::MissingArgument("percent")));
        assert_eq!("louder".parse::<Command>(), Err(ParseError::Unknown("louder".into())));
        assert_eq!("mute now".parse::<Command>(), Err(ParseError::Unexpected("now".into())));
    }
}
