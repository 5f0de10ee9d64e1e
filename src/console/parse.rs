//! Operator input parsing

use crate::exchange::Command;
use thiserror::Error;

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exchange(Command),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid call number: {0}")]
    InvalidSelection(String),
}

/// Parse a trimmed, non-empty line. Command words and numeric aliases are
/// case-insensitive; identifiers are passed through untouched.
pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(ParseError::UnknownCommand(String::new()));
    };
    let args: Vec<&str> = words.collect();

    match keyword.to_lowercase().as_str() {
        "offhook" | "1" => match args.as_slice() {
            [phone] => Ok(Input::Exchange(Command::Offhook {
                phone: (*phone).to_string(),
            })),
            _ => Err(ParseError::Usage("offhook <phone|name>")),
        },
        "onhook" | "2" => match args.as_slice() {
            [phone] => Ok(Input::Exchange(Command::Onhook {
                phone: (*phone).to_string(),
            })),
            _ => Err(ParseError::Usage("onhook <phone|name>")),
        },
        "call" | "3" => match args.as_slice() {
            [target] => Ok(Input::Exchange(Command::Call {
                target: (*target).to_string(),
            })),
            _ => Err(ParseError::Usage("call <target>")),
        },
        "transfer" | "4" => match args.as_slice() {
            [from, target] => Ok(Input::Exchange(Command::Transfer {
                from: (*from).to_string(),
                target: (*target).to_string(),
            })),
            _ => Err(ParseError::Usage("transfer <phone|name> <target>")),
        },
        "conference" | "5" => match args.as_slice() {
            [target] => Ok(Input::Exchange(Command::Conference {
                target: (*target).to_string(),
                selection: None,
            })),
            [target, index] => {
                let selection = index
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidSelection((*index).to_string()))?;
                Ok(Input::Exchange(Command::Conference {
                    target: (*target).to_string(),
                    selection: Some(selection),
                }))
            }
            _ => Err(ParseError::Usage("conference <target> [call#]")),
        },
        "status" | "6" => Ok(Input::Status),
        "help" | "7" => Ok(Input::Help),
        "quit" | "exit" | "8" => Ok(Input::Quit),
        _ => Err(ParseError::UnknownCommand(keyword.to_string())),
    }
}

/// Trim a raw line and cut it to `max_chars` characters.
///
/// Returns the kept text and whether anything was cut.
pub fn truncate_input(raw: &str, max_chars: usize) -> (String, bool) {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        return (trimmed.to_string(), false);
    }
    (trimmed.chars().take(max_chars).collect(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_and_aliases() {
        assert_eq!(
            parse_line("offhook 12345"),
            Ok(Input::Exchange(Command::Offhook { phone: "12345".into() }))
        );
        assert_eq!(
            parse_line("1 Alice"),
            Ok(Input::Exchange(Command::Offhook { phone: "Alice".into() }))
        );
        assert_eq!(
            parse_line("ONHOOK bob"),
            Ok(Input::Exchange(Command::Onhook { phone: "bob".into() }))
        );
        assert_eq!(
            parse_line("3 Bob"),
            Ok(Input::Exchange(Command::Call { target: "Bob".into() }))
        );
        assert_eq!(
            parse_line("transfer Alice Carol"),
            Ok(Input::Exchange(Command::Transfer {
                from: "Alice".into(),
                target: "Carol".into()
            }))
        );
        assert_eq!(parse_line("6"), Ok(Input::Status));
        assert_eq!(parse_line("help"), Ok(Input::Help));
        assert_eq!(parse_line("7"), Ok(Input::Help));
        assert_eq!(parse_line("exit"), Ok(Input::Quit));
        assert_eq!(parse_line("8"), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_conference_selection() {
        assert_eq!(
            parse_line("conference Carol"),
            Ok(Input::Exchange(Command::Conference {
                target: "Carol".into(),
                selection: None
            }))
        );
        assert_eq!(
            parse_line("5 Carol 2"),
            Ok(Input::Exchange(Command::Conference {
                target: "Carol".into(),
                selection: Some(2)
            }))
        );
        assert_eq!(
            parse_line("conference Carol two"),
            Err(ParseError::InvalidSelection("two".into()))
        );
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert_eq!(parse_line("offhook"), Err(ParseError::Usage("offhook <phone|name>")));
        assert_eq!(parse_line("call"), Err(ParseError::Usage("call <target>")));
        assert_eq!(
            parse_line("transfer Carol"),
            Err(ParseError::Usage("transfer <phone|name> <target>"))
        );
        assert_eq!(
            parse_line("offhook Alice Bob").unwrap_err().to_string(),
            "Usage: offhook <phone|name>"
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_line("dial 12345").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: dial");
        assert!(parse_line("9").is_err());
    }

    #[test]
    fn test_truncate_input() {
        assert_eq!(truncate_input("  help  ", 50), ("help".to_string(), false));

        let long = "x".repeat(60);
        let (kept, cut) = truncate_input(&long, 50);
        assert!(cut);
        assert_eq!(kept.chars().count(), 50);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let (kept, cut) = truncate_input("ééééé", 3);
        assert!(cut);
        assert_eq!(kept, "ééé");
    }
}
