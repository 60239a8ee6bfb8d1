//! Planner - terminal student planner with undoable books and backups
//!
//! The planner keeps an address book and an expense book. Every edit is a
//! new snapshot in a per-book history, so changes can be undone and redone.
//! Books can be backed up to local files or to GitHub Gists; remote work runs
//! on a background worker pool and reports back through an event bus.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and event-driven preferences
//! - `error`: Custom error types
//! - `models`: Persons, expenses, the two books and the document abstraction
//! - `history`: Snapshot history with undo/redo
//! - `events`: Store events and the publish/subscribe bus
//! - `storage`: Book histories plus JSON file persistence
//! - `remote`: Reference-based remote storage (GitHub Gists)
//! - `backup`: Local and remote backup/restore orchestration
//! - `cli`, `display`: Command handlers and table output
//!
//! # Example
//!
//! ```rust,ignore
//! use planner::cli::Session;
//! use planner::config::PlannerPaths;
//!
//! let mut session = Session::open(PlannerPaths::new()?)?;
//! session.execute(command)?;
//! session.finish()?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod history;
pub mod models;
pub mod remote;
pub mod storage;

pub use error::{PlannerError, PlannerResult};
