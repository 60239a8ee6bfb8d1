//! Core data models for the planner
//!
//! This module contains the entries the planner tracks (persons, expenses),
//! the books that hold them, and the document abstraction shared by the
//! history and backup layers.

pub mod book;
pub mod document;
pub mod expense;
pub mod ids;
pub mod money;
pub mod person;

pub use book::{AddressBook, ExpenseBook};
pub use document::{Document, DocumentKind, DocumentSnapshot};
pub use expense::Expense;
pub use ids::{ExpenseId, PersonId};
pub use money::Money;
pub use person::Person;
