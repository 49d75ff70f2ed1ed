//! Attachment file store
//!
//! Uploaded files live under `<uploads>/<directory>/<filename>`, one
//! directory per upload. Database rows only ever reference paths built
//! through this type, so sanitizing here keeps traversal out of the tree.

use crate::error::{HelpdeskError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Disk store rooted at the configured uploads directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the uploads root if it does not exist yet
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reduce a client-supplied name to a single safe path component
    #[must_use]
    pub fn sanitize(name: &str) -> String {
        let component = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
            .trim_start_matches('.')
            .trim();
        if component.is_empty() {
            "file".to_string()
        } else {
            component.to_string()
        }
    }

    fn path_for(&self, directory: &str, filename: &str) -> PathBuf {
        self.root
            .join(Self::sanitize(directory))
            .join(Self::sanitize(filename))
    }

    /// Write a file, creating its directory
    pub fn save(&self, directory: &str, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(directory, filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Whether the file is present on disk
    #[must_use]
    pub fn exists(&self, directory: &str, filename: &str) -> bool {
        self.path_for(directory, filename).is_file()
    }

    /// Read a stored file's bytes
    pub fn read(&self, directory: &str, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_for(directory, filename);
        if !path.is_file() {
            return Err(HelpdeskError::FileNotFound {
                uniqueid: directory.to_string(),
            });
        }
        Ok(fs::read(path)?)
    }

    /// Remove an upload directory and everything in it
    ///
    /// Missing directories are fine; destroy may run after a partial upload.
    pub fn delete_directory(&self, directory: &str) -> Result<()> {
        let path = self.root.join(Self::sanitize(directory));
        match fs::remove_dir_all(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
