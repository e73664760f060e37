//! # Console Commands
//!
//! One command per input line. Row commands (`inc`, `dec`, `del`, `edit`) name a product
//! id and are resolved through the affordances of the table currently on screen, so a
//! product that is not shown cannot be acted on.

use crate::app::{AddForm, InventoryApp};
use crate::edit::{ClickTarget, EditField, Key, UnknownField};
use crate::view::ActionKind;
use inventory_api::{ProductApi, ProductId};
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  refresh                                   reload the table
  search [term]                             filter by name or category
  add <name>, <category>[, <qty>[, <price>]]
  inc <id> | dec <id>                       change quantity by one
  del <id>                                  delete (asks first)
  edit <id>                                 open the editor
  set <name|category|quantity|price> <value>
  save | cancel | esc | backdrop            editor controls
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh,
    Search(String),
    Add(AddForm),
    Row(ActionKind, ProductId),
    Set(EditField, String),
    Save,
    Cancel,
    Escape,
    Backdrop,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid product id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    InvalidField(#[from] UnknownField),
    #[error("Product {0} is not in the table")]
    NotOnScreen(ProductId),
    #[error("No product is being edited")]
    NotEditing,
}

fn parse_id(rest: &str) -> Result<ProductId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument("product id"));
    }
    rest.parse().map_err(|_| CommandError::InvalidId(rest.to_string()))
}

fn parse_add(rest: &str) -> AddForm {
    let mut parts = rest.splitn(4, ',').map(|part| part.trim().to_string());
    AddForm {
        name: parts.next().unwrap_or_default(),
        category: parts.next().unwrap_or_default(),
        quantity: parts.next().unwrap_or_default(),
        price: parts.next().unwrap_or_default(),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let row = |kind| parse_id(rest).map(|id| Command::Row(kind, id));
        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "refresh" => Ok(Command::Refresh),
            "search" => Ok(Command::Search(rest.to_string())),
            "add" => Ok(Command::Add(parse_add(rest))),
            "inc" => row(ActionKind::Increment),
            "dec" => row(ActionKind::Decrement),
            "del" => row(ActionKind::Delete),
            "edit" => row(ActionKind::Edit),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(CommandError::MissingArgument("field"));
                }
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "esc" => Ok(Command::Escape),
            "backdrop" => Ok(Command::Backdrop),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// What the input loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Runs `command` against `app`.
///
/// Remote failures are already reported by the handlers; the error here is only for
/// commands that could not be carried out at all.
pub async fn execute<A: ProductApi>(app: &InventoryApp<A>, command: Command) -> Result<Flow, CommandError> {
    match command {
        Command::Refresh => app.refresh_clicked().await,
        Command::Search(term) => {
            app.search(&term).await;
        }
        Command::Add(form) => app.add(&form).await,
        Command::Row(kind, id) => {
            let action = app.resolve(id, kind).ok_or(CommandError::NotOnScreen(id))?;
            app.row_action(action).await;
        }
        Command::Set(field, value) => {
            if !app.set_field(field, &value) {
                return Err(CommandError::NotEditing);
            }
        }
        Command::Save => app.save_edit().await,
        Command::Cancel => app.cancel_edit(),
        Command::Escape => app.key(Key::Escape),
        Command::Backdrop => app.click(ClickTarget::Backdrop),
        Command::Help => return Ok(Flow::ShowHelp),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
