//! Line protocol for driving a running DHD from outside: one [`Action`] per line.

use crate::address::{ParseSymbolError, PresetName};
use crate::input::Action;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/dhd.sock";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Glyph(#[from] ParseSymbolError),
}

impl FromStr for Action {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "dial" => Ok(Action::Dial),
            "close" => Ok(Action::Close),
            "back" => Ok(Action::Back),
            "clear" => Ok(Action::Clear),
            "glyph" if arg.is_empty() => Err(ParseCommandError::MissingArgument("glyph")),
            "glyph" => Ok(Action::Glyph(arg.parse()?)),
            "preset" if arg.is_empty() => Err(ParseCommandError::MissingArgument("preset")),
            "preset" => Ok(Action::Preset(PresetName::new(arg))),
            _ => Err(ParseCommandError::Unknown(line.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Glyph(symbol) => write!(f, "glyph {symbol}"),
            Action::Dial => f.write_str("dial"),
            Action::Back => f.write_str("back"),
            Action::Clear => f.write_str("clear"),
            Action::Close => f.write_str("close"),
            Action::Preset(name) => write!(f, "preset {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Symbol;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("dial", Action::Dial),
            ("  CLOSE ", Action::Close),
            ("back", Action::Back),
            ("clear", Action::Clear),
            ("glyph S27", Action::Glyph(Symbol::new(26).unwrap())),
            ("glyph   s01", Action::Glyph(Symbol::new(0).unwrap())),
            ("preset Abydos", Action::Preset(PresetName::new("Abydos"))),
            ("preset P3X 888", Action::Preset(PresetName::new("P3X 888"))),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Action>(), Ok(expected), "line {line:?}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Action>(), Err(ParseCommandError::Empty));
        assert_eq!(
            "show".parse::<Action>(),
            Err(ParseCommandError::Unknown("show".to_string()))
        );
        assert_eq!(
            "glyph".parse::<Action>(),
            Err(ParseCommandError::MissingArgument("glyph"))
        );
        assert!(matches!(
            "glyph S77".parse::<Action>(),
            Err(ParseCommandError::Glyph(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        let actions = [
            Action::Dial,
            Action::Glyph(Symbol::new(38).unwrap()),
            Action::Preset(PresetName::new("Earth")),
        ];
        for action in actions {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }
}
