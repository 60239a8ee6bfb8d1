//! Document kinds and the snapshot types that flow through history and backups
//!
//! Each book the planner keeps is a `Document`. A `DocumentSnapshot` is a
//! type-erased, cheaply clonable handle to one immutable snapshot of either
//! book, which lets a single backup pipeline carry both kinds.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::book::{AddressBook, ExpenseBook};
use crate::error::{PlannerError, PlannerResult};

/// Which logical document an operation concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    AddressBook,
    ExpenseBook,
}

impl DocumentKind {
    /// Every kind, in a stable order
    pub const ALL: [DocumentKind; 2] = [DocumentKind::AddressBook, DocumentKind::ExpenseBook];

    /// Name of the remote sub-resource holding this document
    pub fn remote_file_name(&self) -> String {
        format!("{}.bak", self)
    }

    /// Description attached to a remote backup
    pub fn remote_description(&self) -> String {
        match self {
            DocumentKind::AddressBook => "Address Book Backup".to_string(),
            DocumentKind::ExpenseBook => "Expense Book Backup".to_string(),
        }
    }

    /// File name of the primary data file
    pub fn data_file_name(&self) -> &'static str {
        match self {
            DocumentKind::AddressBook => "addressbook.json",
            DocumentKind::ExpenseBook => "expensebook.json",
        }
    }

    /// File name of the default local backup
    pub fn backup_file_name(&self) -> &'static str {
        match self {
            DocumentKind::AddressBook => "addressbook.bak",
            DocumentKind::ExpenseBook => "expensebook.bak",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::AddressBook => write!(f, "AddressBook"),
            DocumentKind::ExpenseBook => write!(f, "ExpenseBook"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "addressbook" | "address" | "contacts" => Ok(DocumentKind::AddressBook),
            "expensebook" | "expense" | "expenses" => Ok(DocumentKind::ExpenseBook),
            other => Err(PlannerError::Validation(format!(
                "Unknown book '{}'. Valid books: address, expense",
                other
            ))),
        }
    }
}

/// A book whose full contents can be snapshotted, versioned and backed up
pub trait Document:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The kind this document type represents
    const KIND: DocumentKind;

    /// Number of entries held
    fn entry_count(&self) -> usize;

    /// Wrap a shared snapshot into the type-erased form
    fn into_snapshot(this: Arc<Self>) -> DocumentSnapshot;

    /// Serialize the whole document to text
    fn to_text(&self) -> PlannerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlannerError::Conversion(format!("Failed to serialize {}: {}", Self::KIND, e))
        })
    }

    /// Parse a whole document from text
    fn from_text(text: &str) -> PlannerResult<Self> {
        if text.trim().is_empty() {
            return Err(PlannerError::Conversion(format!(
                "{} backup is empty",
                Self::KIND
            )));
        }
        serde_json::from_str(text).map_err(|e| {
            PlannerError::Conversion(format!("Failed to parse {}: {}", Self::KIND, e))
        })
    }
}

/// A shared, immutable snapshot of either book
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSnapshot {
    AddressBook(Arc<AddressBook>),
    ExpenseBook(Arc<ExpenseBook>),
}

impl DocumentSnapshot {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentSnapshot::AddressBook(_) => DocumentKind::AddressBook,
            DocumentSnapshot::ExpenseBook(_) => DocumentKind::ExpenseBook,
        }
    }

    pub fn entry_count(&self) -> usize {
        match self {
            DocumentSnapshot::AddressBook(book) => book.entry_count(),
            DocumentSnapshot::ExpenseBook(book) => book.entry_count(),
        }
    }

    pub fn to_text(&self) -> PlannerResult<String> {
        match self {
            DocumentSnapshot::AddressBook(book) => book.to_text(),
            DocumentSnapshot::ExpenseBook(book) => book.to_text(),
        }
    }

    /// Parse text as the given kind of document
    pub fn from_text(kind: DocumentKind, text: &str) -> PlannerResult<Self> {
        Ok(match kind {
            DocumentKind::AddressBook => {
                DocumentSnapshot::AddressBook(Arc::new(AddressBook::from_text(text)?))
            }
            DocumentKind::ExpenseBook => {
                DocumentSnapshot::ExpenseBook(Arc::new(ExpenseBook::from_text(text)?))
            }
        })
    }
}

impl From<AddressBook> for DocumentSnapshot {
    fn from(book: AddressBook) -> Self {
        DocumentSnapshot::AddressBook(Arc::new(book))
    }
}

impl From<ExpenseBook> for DocumentSnapshot {
    fn from(book: ExpenseBook) -> Self {
        DocumentSnapshot::ExpenseBook(Arc::new(book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    #[test]
    fn test_kind_names() {
        assert_eq!(DocumentKind::AddressBook.to_string(), "AddressBook");
        assert_eq!(DocumentKind::ExpenseBook.remote_file_name(), "ExpenseBook.bak");
        assert_eq!("expense".parse::<DocumentKind>().unwrap(), DocumentKind::ExpenseBook);
        assert!("diary".parse::<DocumentKind>().unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_text_is_conversion_error() {
        let err = AddressBook::from_text("  \n").unwrap_err();
        assert!(matches!(err, PlannerError::Conversion(_)));
    }

    #[test]
    fn test_snapshot_text_round_trip_keeps_kind() {
        let book = AddressBook::default()
            .with_person(Person::new("Alex Yeoh"))
            .unwrap();
        let snapshot = DocumentSnapshot::from(book.clone());
        let text = snapshot.to_text().unwrap();

        let restored = DocumentSnapshot::from_text(DocumentKind::AddressBook, &text).unwrap();
        assert_eq!(restored.kind(), DocumentKind::AddressBook);
        assert_eq!(restored, DocumentSnapshot::from(book));
    }

    #[test]
    fn test_wrong_kind_text_is_rejected() {
        let err = DocumentSnapshot::from_text(DocumentKind::ExpenseBook, "[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PlannerError::Conversion(_)));
    }
}
