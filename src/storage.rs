//! Object storage for CloudVault.
//!
//! Physical file bytes live here, keyed by file ID; everything else about
//! a file is metadata in the database. The store is constructed once at
//! startup and passed to the web layer explicitly, never through global
//! state.
//!
//! Files are stored in a sharded directory structure:
//! ```text
//! {base_path}/
//! ├── ab/
//! │   └── ab12cd34-5678-90ab-cdef-123456789012
//! └── cd/
//!     └── cd90ab12-3456-7890-abcd-ef1234567890
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Result, VaultError};

/// File storage service for managing physical file bytes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory is created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save content under a file ID.
    pub fn save(&self, id: Uuid, content: &[u8]) -> Result<()> {
        let file_path = self.object_path(id);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;

        Ok(())
    }

    /// Load the content stored under a file ID.
    pub fn load(&self, id: Uuid) -> Result<Vec<u8>> {
        let file_path = self.object_path(id);

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(VaultError::NotFound(format!("stored object {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the content stored under a file ID.
    ///
    /// Missing objects are treated as already deleted.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let file_path = self.object_path(id);

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Compute the sharded path for a file ID.
    fn object_path(&self, id: Uuid) -> PathBuf {
        let name = id.to_string();
        let shard = &name[..2];
        self.base_path.join(shard).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_save_load_delete_cycle() {
        let (_dir, storage) = storage();
        let id = Uuid::new_v4();

        storage.save(id, b"hello world").unwrap();
        assert_eq!(storage.load(id).unwrap(), b"hello world");

        storage.delete(id).unwrap();
        assert!(matches!(storage.load(id), Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, storage) = storage();
        assert!(matches!(
            storage.load(Uuid::new_v4()),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let (_dir, storage) = storage();
        storage.delete(Uuid::new_v4()).unwrap();
    }

    #[test]
    fn test_objects_are_sharded() {
        let (dir, storage) = storage();
        let id = Uuid::new_v4();
        storage.save(id, b"x").unwrap();

        let shard = &id.to_string()[..2];
        assert!(dir.path().join(shard).join(id.to_string()).exists());
    }
}
