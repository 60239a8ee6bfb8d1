//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging clap
//! argument parsing with storage and the backup orchestrator. The same
//! `Command` set is used for one-shot invocations and inside `shell`.

pub mod backup;
pub mod expense;
pub mod history;
pub mod person;
pub mod session;
pub mod shell;

pub use backup::{handle_backup_command, handle_restore_command, TransferArgs};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use history::{handle_redo_command, handle_undo_command, HistoryArgs};
pub use person::{handle_person_command, PersonCommands};
pub use session::Session;
pub use shell::run_shell;

use clap::Subcommand;

/// Commands that act on the planner's books
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the address book
    #[command(subcommand)]
    Person(PersonCommands),

    /// Manage the expense book
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Undo the last change to a book
    Undo(HistoryArgs),

    /// Redo the last undone change to a book
    Redo(HistoryArgs),

    /// Back up books to a local file or GitHub Gists
    Backup(TransferArgs),

    /// Restore books from a local file or GitHub Gists
    Restore(TransferArgs),
}
