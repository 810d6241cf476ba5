//! Per-batch scratch directory
//!
//! Each batch unpacks into `<root>/ingestguard-<uuid>`. The directory is
//! removed when the guard drops, on success, failure and unwind alike.
//! Parents of the root that the guard had to create go with it once empty.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::errors::{ArchiveError, BulkResult};
use crate::observability::Event;

const SCRATCH_PREFIX: &str = "ingestguard-";

/// Owned scratch directory, deleted on drop
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    /// Missing ancestors created along with the directory, deepest first
    created: Vec<PathBuf>,
}

impl ScratchDir {
    /// Creates a fresh, uniquely named directory under `root`
    pub fn create(root: &Path) -> BulkResult<Self> {
        let path = root.join(format!("{}{}", SCRATCH_PREFIX, Uuid::new_v4()));
        let created = root
            .ancestors()
            .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
            .map(Path::to_path_buf)
            .collect();

        fs::create_dir_all(&path).map_err(|source| ArchiveError::Scratch {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, created })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `reader` to the `/`-separated relative `name` under the
    /// directory and returns the written path.
    ///
    /// `..` components and names that resolve to the directory itself are
    /// rejected.
    pub fn write_entry(&self, name: &str, reader: &mut dyn Read) -> io::Result<PathBuf> {
        let mut path = self.path.clone();
        for part in name.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "path escapes the scratch directory",
                    ))
                }
                part => path.push(part),
            }
        }
        if path == self.path {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty entry name"));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&path)?;
        io::copy(reader, &mut file)?;

        Ok(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                let path = self.path.display().to_string();
                let error = e.to_string();
                Event::ScratchCleanupFailed
                    .emit(&[("path", path.as_str()), ("error", error.as_str())]);
                return;
            }
        }

        // Stops at the first ancestor still in use, e.g. by a concurrent batch
        for dir in &self.created {
            if fs::remove_dir(dir).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let root = TempDir::new().unwrap();

        let path = {
            let scratch = ScratchDir::create(root.path()).unwrap();
            fs::write(scratch.path().join("a.csv"), "x").unwrap();
            assert!(scratch.path().is_dir());
            scratch.path().to_path_buf()
        };

        assert!(!path.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scratch_dirs_are_unique() {
        let root = TempDir::new().unwrap();
        let a = ScratchDir::create(root.path()).unwrap();
        let b = ScratchDir::create(root.path()).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX));
    }

    #[test]
    fn test_scratch_root_is_created() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("deep").join("er");

        let scratch = ScratchDir::create(&nested).unwrap();
        assert!(scratch.path().starts_with(&nested));

        drop(scratch);
        assert!(!root.path().join("deep").exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_shared_created_root_outlives_first_guard() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("shared");

        let first = ScratchDir::create(&nested).unwrap();
        let second = ScratchDir::create(&nested).unwrap();

        drop(first);
        assert!(second.path().is_dir());
        drop(second);
        // Only the guard that created it may remove it, and it was busy then
        assert!(nested.is_dir());
        assert_eq!(fs::read_dir(&nested).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_root_is_kept() {
        let root = TempDir::new().unwrap();
        drop(ScratchDir::create(root.path()).unwrap());
        assert!(root.path().is_dir());
    }

    #[test]
    fn test_write_entry_creates_parents() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchDir::create(root.path()).unwrap();

        let path = scratch
            .write_entry("dimension/district.grammar.csv", &mut "PK\n".as_bytes())
            .unwrap();

        assert_eq!(path, scratch.path().join("dimension").join("district.grammar.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "PK\n");
    }

    #[test]
    fn test_write_entry_rejects_escaping_names() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchDir::create(root.path()).unwrap();

        let err = scratch
            .write_entry("dimension/../../outside.csv", &mut "x".as_bytes())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!root.path().join("outside.csv").exists());

        assert!(scratch.write_entry("./", &mut "x".as_bytes()).is_err());
    }

    #[test]
    fn test_unusable_root_is_scratch_error() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        let err = ScratchDir::create(&file).unwrap_err();
        assert_eq!(err.code(), "INGEST_ARCHIVE_SCRATCH");
    }
}
