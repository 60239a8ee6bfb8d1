//! Event values published on the bus

use std::fmt;

use crate::backup::{BackupTarget, RequestId};
use crate::error::PlannerError;
use crate::models::DocumentKind;
use crate::remote::Reference;

/// Why a document's current contents changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Committed,
    Undone,
    Redone,
    Restored,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Committed => write!(f, "updated"),
            ChangeKind::Undone => write!(f, "undo"),
            ChangeKind::Redone => write!(f, "redo"),
            ChangeKind::Restored => write!(f, "restored"),
        }
    }
}

/// A completed or failed operation, or a change to a document
///
/// `request` is `None` for local operations, which never go through the
/// worker pool.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    DocumentChanged {
        kind: DocumentKind,
        change: ChangeKind,
    },
    BackupSucceeded {
        request: Option<RequestId>,
        target: BackupTarget,
        reference: Option<Reference>,
    },
    BackupFailed {
        request: Option<RequestId>,
        target: BackupTarget,
        error: PlannerError,
    },
    RestoreSucceeded {
        request: Option<RequestId>,
        target: BackupTarget,
        entries: usize,
    },
    RestoreFailed {
        request: Option<RequestId>,
        target: BackupTarget,
        error: PlannerError,
    },
    /// Every document of a multi-document restore came back
    RestoreComplete { documents: usize },
}

impl StoreEvent {
    /// The document this event concerns, if it is about a single one
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            StoreEvent::DocumentChanged { kind, .. } => Some(*kind),
            StoreEvent::BackupSucceeded { target, .. }
            | StoreEvent::BackupFailed { target, .. }
            | StoreEvent::RestoreSucceeded { target, .. }
            | StoreEvent::RestoreFailed { target, .. } => Some(target.kind()),
            StoreEvent::RestoreComplete { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StoreEvent::BackupFailed { .. } | StoreEvent::RestoreFailed { .. }
        )
    }

    /// One-line, user-facing description
    pub fn message(&self) -> String {
        match self {
            StoreEvent::DocumentChanged { kind, change } => format!("{} {}", kind, change),
            StoreEvent::BackupSucceeded {
                target,
                reference: Some(reference),
                ..
            } => format!("{} saved to {} ({})", target.kind(), target.medium(), reference),
            StoreEvent::BackupSucceeded { target, .. } => {
                format!("{} backed up to {}", target.kind(), target.medium())
            }
            StoreEvent::BackupFailed { target, error, .. } => format!(
                "Backup of {} to {} failed [{}]: {}",
                target.kind(),
                target.medium(),
                error.kind(),
                error
            ),
            StoreEvent::RestoreSucceeded {
                target, entries, ..
            } => format!(
                "{} restored from {} ({} entries)",
                target.kind(),
                target.medium(),
                entries
            ),
            StoreEvent::RestoreFailed { target, error, .. } => format!(
                "Restore of {} from {} failed [{}]: {}",
                target.kind(),
                target.medium(),
                error.kind(),
                error
            ),
            StoreEvent::RestoreComplete { documents } => {
                format!("Data restore successful ({} books)", documents)
            }
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
