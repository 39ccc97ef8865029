//! Native disk store rooted at the host content directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{ResolveError, ResourceStream};

/// The host's real on-disk tree, addressed by application-relative paths.
#[derive(Debug, Clone)]
pub struct NativeStore {
    root: PathBuf,
}

impl NativeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an application-relative path onto the disk root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = crate::path::normalize(path);
        self.root.join(relative.trim_start_matches('/'))
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    pub fn dir_exists(&self, path: &str) -> bool {
        self.resolve(path).is_dir()
    }

    pub fn open(&self, path: &str) -> Result<ResourceStream, ResolveError> {
        let disk = self.resolve(path);
        if !disk.is_file() {
            return Err(ResolveError::NotFound(path.to_string()));
        }
        fs::File::open(&disk)
            .map(ResourceStream::File)
            .map_err(|e| ResolveError::Io(path.to_string(), e))
    }

    pub fn modified_time(&self, path: &str) -> Option<SystemTime> {
        fs::metadata(self.resolve(path))
            .and_then(|m| m.modified())
            .ok()
    }

    /// Names of plain files directly inside a directory.
    pub fn list_files(&self, dir: &str) -> Vec<String> {
        self.list_entries(dir, false)
    }

    /// Names of subdirectories directly inside a directory.
    pub fn list_dirs(&self, dir: &str) -> Vec<String> {
        self.list_entries(dir, true)
    }

    fn list_entries(&self, dir: &str, want_dirs: bool) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.resolve(dir)) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| {
                e.file_type()
                    .map(|t| t.is_dir() == want_dirs)
                    .unwrap_or(false)
            })
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }
}
