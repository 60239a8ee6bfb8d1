//! Where a backup goes, or where a restore comes from

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentKind;
use crate::remote::Reference;

/// Local file or remote reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupLocation {
    Local(PathBuf),
    /// `reference` is absent for a save, which is issued a fresh one
    Remote { reference: Option<Reference> },
}

/// A document kind paired with its backup location
///
/// Credentials are never part of a target; they are passed alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTarget {
    kind: DocumentKind,
    location: BackupLocation,
}

impl BackupTarget {
    pub fn local(kind: DocumentKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            location: BackupLocation::Local(path.into()),
        }
    }

    pub fn remote(kind: DocumentKind, reference: Option<Reference>) -> Self {
        Self {
            kind,
            location: BackupLocation::Remote { reference },
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn reference(&self) -> Option<&Reference> {
        match &self.location {
            BackupLocation::Remote { reference } => reference.as_ref(),
            BackupLocation::Local(_) => None,
        }
    }

    /// Display form of the location, for messages
    pub fn medium(&self) -> Medium<'_> {
        Medium(&self.location)
    }

    /// The file path of a local target that can be written or read
    pub fn local_path(&self) -> PlannerResult<&Path> {
        let path = match &self.location {
            BackupLocation::Local(path) => path,
            BackupLocation::Remote { .. } => {
                return Err(PlannerError::Validation(format!(
                    "{} target is remote, not a local file",
                    self.kind
                )))
            }
        };

        if path.as_os_str().is_empty() {
            return Err(PlannerError::Validation("Backup path is empty".into()));
        }
        if path.is_dir() {
            return Err(PlannerError::Validation(format!(
                "{} is a directory, not a backup file",
                path.display()
            )));
        }
        Ok(path)
    }

    /// The reference a remote restore reads from
    pub fn required_reference(&self) -> PlannerResult<&Reference> {
        match self.reference() {
            Some(reference) if !reference.is_blank() => Ok(reference),
            _ => Err(PlannerError::Validation(format!(
                "No online backup recorded for {}. Please perform an online backup first",
                self.kind
            ))),
        }
    }
}

/// Borrowed display adapter returned by `BackupTarget::medium`
pub struct Medium<'a>(&'a BackupLocation);

impl fmt::Display for Medium<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            BackupLocation::Local(path) => write!(f, "{}", path.display()),
            BackupLocation::Remote { .. } => f.write_str("remote storage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_path_validation() {
        let temp_dir = TempDir::new().unwrap();

        let dir_target = BackupTarget::local(DocumentKind::AddressBook, temp_dir.path());
        assert!(dir_target.local_path().unwrap_err().is_validation());

        let empty = BackupTarget::local(DocumentKind::AddressBook, "");
        assert!(empty.local_path().unwrap_err().is_validation());

        let file = temp_dir.path().join("a.bak");
        let ok = BackupTarget::local(DocumentKind::AddressBook, &file);
        assert_eq!(ok.local_path().unwrap(), file.as_path());
        assert_eq!(ok.medium().to_string(), file.display().to_string());
    }

    #[test]
    fn test_remote_restore_needs_reference() {
        let missing = BackupTarget::remote(DocumentKind::ExpenseBook, None);
        let err = missing.required_reference().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("online backup"));

        let blank = BackupTarget::remote(DocumentKind::ExpenseBook, Some(Reference::new(" ")));
        assert!(blank.required_reference().is_err());

        let present = BackupTarget::remote(DocumentKind::ExpenseBook, Some(Reference::new("g1")));
        assert_eq!(present.required_reference().unwrap().as_str(), "g1");
        assert_eq!(present.medium().to_string(), "remote storage");
        assert!(present.local_path().is_err());
    }
}
