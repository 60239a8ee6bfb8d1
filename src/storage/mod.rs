//! Storage layer for the planner
//!
//! `Storage` owns one `VersionedStore` per book, loads them from their data
//! files at start, and writes changed books back with atomic writes. Every
//! change to a book's current snapshot is announced on the event bus.

pub mod file_io;

pub use file_io::{read_json, read_text_required, write_json_atomic, write_text_atomic};

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::paths::PlannerPaths;
use crate::error::PlannerResult;
use crate::events::{ChangeKind, EventBus, StoreEvent};
use crate::history::VersionedStore;
use crate::models::{AddressBook, Document, DocumentKind, DocumentSnapshot, ExpenseBook};

/// Main storage coordinator holding the history of both books
pub struct Storage {
    paths: PlannerPaths,
    bus: EventBus,
    address_book: VersionedStore<AddressBook>,
    expense_book: VersionedStore<ExpenseBook>,
    dirty: BTreeSet<DocumentKind>,
}

impl Storage {
    /// Create storage with empty books
    pub fn new(paths: PlannerPaths, bus: EventBus) -> PlannerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            paths,
            bus,
            address_book: VersionedStore::default(),
            expense_book: VersionedStore::default(),
            dirty: BTreeSet::new(),
        })
    }

    /// Create storage seeded from the data files on disk
    pub fn load(paths: PlannerPaths, bus: EventBus) -> PlannerResult<Self> {
        let mut storage = Self::new(paths, bus)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    /// Replace both histories with the contents of the data files
    pub fn load_all(&mut self) -> PlannerResult<()> {
        let address_book: AddressBook = read_json(self.paths.data_file(DocumentKind::AddressBook))?;
        let expense_book: ExpenseBook = read_json(self.paths.data_file(DocumentKind::ExpenseBook))?;
        debug!(
            persons = address_book.entry_count(),
            expenses = expense_book.entry_count(),
            "Loaded books"
        );

        self.address_book = VersionedStore::new(address_book);
        self.expense_book = VersionedStore::new(expense_book);
        self.dirty.clear();
        Ok(())
    }

    pub fn address_book(&self) -> &AddressBook {
        self.address_book.current()
    }

    pub fn expense_book(&self) -> &ExpenseBook {
        self.expense_book.current()
    }

    /// History of the address book
    pub fn address_history(&self) -> &VersionedStore<AddressBook> {
        &self.address_book
    }

    /// History of the expense book
    pub fn expense_history(&self) -> &VersionedStore<ExpenseBook> {
        &self.expense_book
    }

    /// Shared handle to the current snapshot of `kind`
    pub fn snapshot(&self, kind: DocumentKind) -> DocumentSnapshot {
        match kind {
            DocumentKind::AddressBook => AddressBook::into_snapshot(self.address_book.current_arc()),
            DocumentKind::ExpenseBook => ExpenseBook::into_snapshot(self.expense_book.current_arc()),
        }
    }

    /// Record a new version of a book
    pub fn commit<D: Document>(&mut self, document: D) {
        match D::into_snapshot(Arc::new(document)) {
            DocumentSnapshot::AddressBook(book) => self.address_book.commit_shared(book),
            DocumentSnapshot::ExpenseBook(book) => self.expense_book.commit_shared(book),
        }
        self.changed(D::KIND, ChangeKind::Committed);
    }

    /// Step `kind` back one version
    pub fn undo(&mut self, kind: DocumentKind) -> PlannerResult<()> {
        match kind {
            DocumentKind::AddressBook => self.address_book.undo().map(|_| ())?,
            DocumentKind::ExpenseBook => self.expense_book.undo().map(|_| ())?,
        }
        self.changed(kind, ChangeKind::Undone);
        Ok(())
    }

    /// Step `kind` forward one version
    pub fn redo(&mut self, kind: DocumentKind) -> PlannerResult<()> {
        match kind {
            DocumentKind::AddressBook => self.address_book.redo().map(|_| ())?,
            DocumentKind::ExpenseBook => self.expense_book.redo().map(|_| ())?,
        }
        self.changed(kind, ChangeKind::Redone);
        Ok(())
    }

    /// Replace a book's whole history with a restored snapshot
    pub fn reset(&mut self, snapshot: DocumentSnapshot) {
        let kind = snapshot.kind();
        match snapshot {
            DocumentSnapshot::AddressBook(book) => self.address_book.reset_shared(book),
            DocumentSnapshot::ExpenseBook(book) => self.expense_book.reset_shared(book),
        }
        self.changed(kind, ChangeKind::Restored);
    }

    /// Whether `kind` has changes not yet written to its data file
    pub fn is_dirty(&self, kind: DocumentKind) -> bool {
        self.dirty.contains(&kind)
    }

    /// Write every changed book to its data file
    pub fn flush(&mut self) -> PlannerResult<Vec<DocumentKind>> {
        let mut written = Vec::new();
        while let Some(kind) = self.dirty.first().copied() {
            let path = self.paths.data_file(kind);
            match kind {
                DocumentKind::AddressBook => write_json_atomic(&path, self.address_book())?,
                DocumentKind::ExpenseBook => write_json_atomic(&path, self.expense_book())?,
            }
            self.dirty.remove(&kind);
            info!(kind = %kind, path = %path.display(), "Saved book");
            written.push(kind);
        }
        Ok(written)
    }

    fn changed(&mut self, kind: DocumentKind, change: ChangeKind) {
        self.dirty.insert(kind);
        self.bus.publish(StoreEvent::DocumentChanged { kind, change });
    }
}
