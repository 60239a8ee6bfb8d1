//! File I/O utilities with atomic writes
//!
//! Writes go to a sibling temp file that is synced and then renamed over the
//! destination, so a crash leaves either the old file or the new one.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> PlannerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let text = read_text_required(path)?;
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&text).map_err(|e| {
        PlannerError::Conversion(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Read a whole file as text, failing with `NotFound` if it is missing
pub fn read_text_required<P: AsRef<Path>>(path: P) -> PlannerResult<String> {
    let path = path.as_ref();

    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PlannerError::backup_not_found(path.display().to_string()),
        _ => PlannerError::Io(format!("Failed to read {}: {}", path.display(), e)),
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> PlannerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let text = serde_json::to_string_pretty(data)
        .map_err(|e| PlannerError::Conversion(format!("Failed to serialize data: {}", e)))?;
    write_text_atomic(path, &text)
}

/// Write text to a file atomically, creating parent directories as needed
pub fn write_text_atomic<P: AsRef<Path>>(path: P, text: &str) -> PlannerResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PlannerError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target, so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path).map_err(|e| {
        PlannerError::Io(format!("Failed to create {}: {}", temp_path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    let written = writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .and_then(|_| writer.get_ref().sync_all());

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(PlannerError::Io(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PlannerError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("addressbook.bak");

        write_text_atomic(&path, "{}").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("addressbook.bak.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("book.bak");

        write_text_atomic(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_read_text_required_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_text_required(temp_dir.path().join("missing.bak")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_json_is_conversion_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, PlannerError::Conversion(_)));
    }

    #[test]
    fn test_write_into_directory_path_fails_with_io() {
        let temp_dir = TempDir::new().unwrap();
        let err = write_text_atomic(temp_dir.path(), "{}").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
