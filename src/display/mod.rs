//! Display formatting for terminal output
//!
//! Renders the books as tables for the `list` commands.

pub mod expense;
pub mod person;

pub use expense::format_expense_list;
pub use person::format_person_list;
