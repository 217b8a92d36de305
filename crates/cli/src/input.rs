//! Parsing of shell lines into intents.
//!
//! Only the shape of a line is checked here. Quantities stay raw text so the
//! ledger applies the same validation whatever the front end.

use thiserror::Error;

use stockflow_inventory::ItemStatus;

pub const HELP: &str = "\
commands:
  add <name> <qty>              add a lot to Stock In
  edit <id> <qty>               set a lot's quantity
  move <id> <in|packed|out> <qty>
                                move some or all of a lot to another status
  delete <id>                   remove a lot
  show <id>                     show a lot and its menu
  list                          show the board
  help                          show this text
  quit                          leave
ids may be shortened to any unique prefix";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Add { name: String, qty: String },
    Edit { id: String, qty: String },
    Move { id: String, target: ItemStatus, qty: String },
    Delete { id: String },
    Show { id: String },
    List,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    BadStatus(String),
}

impl Input {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            return Ok(Input::Empty);
        };

        match command.to_ascii_lowercase().as_str() {
            "add" => match args {
                [name @ .., qty] if !name.is_empty() => Ok(Input::Add {
                    name: name.join(" "),
                    qty: qty.to_string(),
                }),
                _ => Err(InputError::Usage("add <name> <qty>")),
            },
            "edit" => match args {
                [id, qty] => Ok(Input::Edit {
                    id: id.to_string(),
                    qty: qty.to_string(),
                }),
                _ => Err(InputError::Usage("edit <id> <qty>")),
            },
            "move" => match args {
                [id, target, qty] => Ok(Input::Move {
                    id: id.to_string(),
                    target: target
                        .parse()
                        .map_err(|e: stockflow_core::DomainError| InputError::BadStatus(e.to_string()))?,
                    qty: qty.to_string(),
                }),
                _ => Err(InputError::Usage("move <id> <in|packed|out> <qty>")),
            },
            "delete" | "rm" => match args {
                [id] => Ok(Input::Delete { id: id.to_string() }),
                _ => Err(InputError::Usage("delete <id>")),
            },
            "show" | "menu" => match args {
                [id] => Ok(Input::Show { id: id.to_string() }),
                _ => Err(InputError::Usage("show <id>")),
            },
            "list" | "ls" | "board" => Ok(Input::List),
            "help" | "?" => Ok(Input::Help),
            "quit" | "exit" | "q" => Ok(Input::Quit),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_takes_multiword_names() {
        assert_eq!(
            Input::parse("add Blue Widget 12").unwrap(),
            Input::Add {
                name: "Blue Widget".to_string(),
                qty: "12".to_string()
            }
        );
        assert_eq!(
            Input::parse("add 12"),
            Err(InputError::Usage("add <name> <qty>"))
        );
    }

    #[test]
    fn move_parses_status() {
        assert_eq!(
            Input::parse("move 0190ab packed 4").unwrap(),
            Input::Move {
                id: "0190ab".to_string(),
                target: ItemStatus::Packed,
                qty: "4".to_string()
            }
        );
        assert!(matches!(
            Input::parse("move 0190ab shipped 4"),
            Err(InputError::BadStatus(_))
        ));
    }

    #[test]
    fn quantities_stay_raw() {
        assert_eq!(
            Input::parse("edit abc zero").unwrap(),
            Input::Edit {
                id: "abc".to_string(),
                qty: "zero".to_string()
            }
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(Input::parse("   ").unwrap(), Input::Empty);
        assert_eq!(Input::parse("LIST").unwrap(), Input::List);
        assert_eq!(
            Input::parse("menu 0190ab").unwrap(),
            Input::Show {
                id: "0190ab".to_string()
            }
        );
        assert_eq!(
            Input::parse("sell 3"),
            Err(InputError::UnknownCommand("sell".to_string()))
        );
    }
}
