//! Interactive shell state: one ledger, one line at a time.

use stockflow_core::ItemId;
use stockflow_infra::{Ledger, LedgerError, LiveDocumentStore};
use stockflow_inventory::Row;

use crate::input::{HELP, Input};

/// What to print after a line, and whether to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn show(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

pub struct Shell<S: LiveDocumentStore> {
    ledger: Ledger<S>,
}

impl<S: LiveDocumentStore> Shell<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Board plus the current notification, as printed after every command.
    pub fn view(&self) -> String {
        let mut out = String::new();
        if let Some(notification) = self.ledger.notification() {
            out.push_str(&format!(">> {}\n", notification.message));
        }
        out.push_str(&self.ledger.board().render_text());
        out
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        // Pick up writes made by other clients before acting on stale state.
        self.ledger.sync();

        let input = match Input::parse(line) {
            Ok(input) => input,
            Err(err) => return Reply::show(format!("error: {err}\n")),
        };

        let mut output = String::new();
        let result = match input {
            Input::Empty => return Reply::show(""),
            Input::Help => return Reply::show(format!("{HELP}\n")),
            Input::Quit => {
                return Reply {
                    output: String::new(),
                    quit: true,
                };
            }
            Input::List => Ok(()),
            Input::Add { name, qty } => self.ledger.add(&name, &qty).map(|_| ()).map_err(describe),
            Input::Edit { id, qty } => self.resolve(&id).and_then(|id| {
                output.push_str(&self.prompt(id, Row::edit_prompt));
                self.ledger.edit_quantity(id, &qty).map_err(describe)
            }),
            Input::Move { id, target, qty } => self.resolve(&id).and_then(|id| {
                output.push_str(&self.prompt(id, |row| row.transfer_prompt(target)));
                self.ledger.transfer(id, target, &qty).map_err(describe)
            }),
            Input::Show { id } => self
                .resolve(&id)
                .and_then(|id| self.menu(id))
                .map(|menu| output.push_str(&menu)),
            Input::Delete { id } => self
                .resolve(&id)
                .and_then(|id| self.ledger.delete(id).map_err(describe)),
        };

        // Not-found and store failures already surface through the notification.
        if let Err(Some(message)) = result.map_err(|e| e.into_message()) {
            output.push_str(&format!("error: {message}\n"));
        }
        output.push_str(&self.view());
        Reply::show(output)
    }

    /// Prompt heading for lot `id`, echoed before the command runs.
    fn prompt(&self, id: ItemId, heading: impl FnOnce(&Row) -> String) -> String {
        self.ledger
            .board()
            .row(id)
            .map(|row| format!("{}\n", heading(row)))
            .unwrap_or_default()
    }

    /// A lot's summary line followed by its numbered menu.
    fn menu(&self, id: ItemId) -> Result<String, Failure> {
        let board = self.ledger.board();
        let row = board
            .row(id)
            .ok_or_else(|| Failure::Message(format!("no item {id}")))?;

        let mut out = format!(
            "[{}] {} {} ({})\n",
            id.short(),
            row.item.name(),
            row.badge(),
            row.item.status().label()
        );
        for (n, action) in row.menu().iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", n + 1, action.label()));
        }
        Ok(out)
    }

    /// Find the lot whose id starts with `prefix`.
    fn resolve(&self, prefix: &str) -> Result<ItemId, Failure> {
        let prefix = prefix.to_ascii_lowercase();
        let matches: Vec<ItemId> = self
            .ledger
            .inventory()
            .ids()
            .filter(|id| {
                id.to_string().starts_with(&prefix)
                    || id.as_uuid().simple().to_string().starts_with(&prefix)
            })
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(Failure::Message(format!("no item matches '{prefix}'"))),
            _ => Err(Failure::Message(format!("'{prefix}' matches more than one item"))),
        }
    }
}

/// Why a line did not take effect.
enum Failure {
    /// Print this to the user.
    Message(String),
    /// Already reported via the notification.
    Notified,
}

impl Failure {
    fn into_message(self) -> Option<String> {
        match self {
            Failure::Message(message) => Some(message),
            Failure::Notified => None,
        }
    }
}

fn describe(err: LedgerError) -> Failure {
    match err {
        LedgerError::Validation(msg) => Failure::Message(format!("invalid input: {msg}")),
        LedgerError::Invariant(msg) => Failure::Message(msg),
        LedgerError::NotFound(_) | LedgerError::Persistence { .. } => Failure::Notified,
    }
}
