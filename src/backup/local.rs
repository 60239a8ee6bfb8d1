//! Local backup files
//!
//! One file per book, holding the whole document as JSON text. A backup
//! fully replaces the previous file.

use tracing::info;

use super::target::BackupTarget;
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentSnapshot;
use crate::storage::{read_text_required, write_text_atomic};

/// Write `snapshot` to the file named by `target`
pub fn write_backup(target: &BackupTarget, snapshot: &DocumentSnapshot) -> PlannerResult<()> {
    if target.kind() != snapshot.kind() {
        return Err(PlannerError::Validation(format!(
            "Cannot back up {} to a {} target",
            snapshot.kind(),
            target.kind()
        )));
    }
    let path = target.local_path()?;
    let text = snapshot.to_text()?;

    write_text_atomic(path, &text)?;
    info!(kind = %target.kind(), path = %path.display(), entries = snapshot.entry_count(), "Wrote local backup");
    Ok(())
}

/// Read the snapshot stored in the file named by `target`
///
/// A missing file is `NotFound`; an empty or malformed one is `Conversion`.
pub fn read_backup(target: &BackupTarget) -> PlannerResult<DocumentSnapshot> {
    let path = target.local_path()?;
    let text = read_text_required(path)?;
    DocumentSnapshot::from_text(target.kind(), &text)
}
