//! Backup and restore of the planner's books
//!
//! # Architecture
//!
//! - `BackupOrchestrator`: entry point for every backup and restore, local
//!   or remote, single book or all of them
//! - `BackupTarget`: which book, and which local file or remote reference
//! - `RequestLedger`: lifecycle of each submitted remote request
//!
//! # Backup Format
//!
//! A backup is the whole book as pretty-printed JSON, identical to the
//! primary data file. Locally there is one file per book; remotely one
//! sub-resource per book named `<Kind>.bak` under the issued reference.
//!
//! # Example
//!
//! ```rust,ignore
//! use planner::backup::BackupOrchestrator;
//!
//! let mut orchestrator = BackupOrchestrator::new(remote, bus.clone(), 2)?;
//! orchestrator.backup_local(&storage.snapshot(DocumentKind::AddressBook), &path)?;
//!
//! orchestrator.backup_remote(storage.snapshot(DocumentKind::AddressBook), &token)?;
//! orchestrator.wait_idle(&mut storage, Duration::from_secs(30))?;
//! ```

mod dispatch;
mod local;
mod orchestrator;
mod request;
mod target;

pub use local::{read_backup, write_backup};
pub use orchestrator::{BackupOrchestrator, BatchReport};
pub use request::{Operation, RequestId, RequestLedger, RequestRecord, RequestState, RestoreTracker};
pub use target::{BackupLocation, BackupTarget, Medium};
