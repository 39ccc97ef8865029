//! Embedded resource store with a flat, dot-separated namespace.
//!
//! Build tooling collapses a module's content hierarchy into flat resource
//! names: `Content/Styles/site.css` under namespace `Acme.Blog` becomes
//! `Acme.Blog.Content.Styles.site.css`. The directory part maps `/` to `.`
//! and `-` to `_`; the filename is appended literally. The reverse direction
//! is lossy, so directory listings report candidate names, never a single
//! asserted reconstruction.

use rustc_hash::FxHashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::SystemTime;

use super::{ResolveError, ResourceStream};

/// Per-module adapter over a flat list of embedded resource names.
#[derive(Debug, Clone)]
pub struct EmbeddedStore {
    namespace: String,
    origin: SystemTime,
    resources: FxHashMap<String, Arc<[u8]>>,
}

impl EmbeddedStore {
    /// Create an empty store for a namespace, stamped with the module's
    /// origin timestamp.
    pub fn new(namespace: impl Into<String>, origin: SystemTime) -> Self {
        Self {
            namespace: namespace.into(),
            origin,
            resources: FxHashMap::default(),
        }
    }

    /// Build a store from manifest entries: fully qualified flat names
    /// paired with their bytes.
    pub fn from_manifest<I, N, B>(namespace: impl Into<String>, origin: SystemTime, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<Arc<[u8]>>,
    {
        let mut store = Self::new(namespace, origin);
        for (name, bytes) in entries {
            store.resources.insert(name.into(), bytes.into());
        }
        store
    }

    /// Add a resource under its hierarchical content path.
    pub fn insert_path(&mut self, path: &str, bytes: impl Into<Arc<[u8]>>) {
        let flat = self.flat_name(path);
        self.resources.insert(flat, bytes.into());
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Shared origin timestamp; every entry reports it as modification time.
    pub fn origin(&self) -> SystemTime {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Map a hierarchical content path to its flat resource name.
    pub fn flat_name(&self, path: &str) -> String {
        let trimmed = path.replace('\\', "/");
        let trimmed = trimmed.trim_start_matches('/');
        match trimmed.rsplit_once('/') {
            Some((dir, name)) => {
                let mapped = dir.replace('/', ".").replace('-', "_");
                format!("{}.{mapped}.{name}", self.namespace)
            }
            None => format!("{}.{trimmed}", self.namespace),
        }
    }

    /// Flat prefix covering everything inside a directory.
    fn dir_prefix(&self, dir: &str) -> String {
        let trimmed = dir.replace('\\', "/");
        let trimmed = trimmed.trim_matches('/');
        if trimmed.is_empty() {
            format!("{}.", self.namespace)
        } else {
            let mapped = trimmed.replace('/', ".").replace('-', "_");
            format!("{}.{mapped}.", self.namespace)
        }
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.resources.contains_key(&self.flat_name(path))
    }

    /// A directory exists when at least one resource lives under it.
    pub fn dir_exists(&self, dir: &str) -> bool {
        let prefix = self.dir_prefix(dir);
        self.resources.keys().any(|k| k.starts_with(&prefix))
    }

    pub fn open(&self, path: &str) -> Result<ResourceStream, ResolveError> {
        match self.resources.get(&self.flat_name(path)) {
            Some(bytes) => Ok(ResourceStream::Memory(Cursor::new(Arc::clone(bytes)))),
            None => Err(ResolveError::NotFound(path.to_string())),
        }
    }

    /// Modification time of an entry; the whole store shares the module's
    /// origin timestamp.
    pub fn modified_time(&self, path: &str) -> Option<SystemTime> {
        self.file_exists(path).then_some(self.origin)
    }

    /// Flat remainders of every resource under a directory.
    ///
    /// Each remainder is a candidate filename; embedded filenames keep
    /// their dots, so a remainder with dots may equally be nested content.
    pub fn list_files(&self, dir: &str) -> Vec<String> {
        let prefix = self.dir_prefix(dir);
        let mut files: Vec<String> = self
            .resources
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(str::to_string)
            .collect();
        files.sort();
        files
    }

    /// Candidate subdirectory names under a directory.
    ///
    /// Every `.` in a remainder is a possible break point between a
    /// directory name and nested content, so each prefix up to a `.` is
    /// reported once. The set is candidates only; flattening lost the
    /// original hierarchy.
    pub fn list_dirs(&self, dir: &str) -> Vec<String> {
        let prefix = self.dir_prefix(dir);
        let mut seen: Vec<String> = Vec::new();
        for key in self.resources.keys() {
            let Some(remainder) = key.strip_prefix(&prefix) else {
                continue;
            };
            for (pos, ch) in remainder.char_indices() {
                if ch == '.' {
                    let candidate = &remainder[..pos];
                    if !candidate.is_empty() && !seen.iter().any(|s| s == candidate) {
                        seen.push(candidate.to_string());
                    }
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn store() -> EmbeddedStore {
        let origin = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let mut store = EmbeddedStore::new("Acme.Blog", origin);
        store.insert_path("Content/Styles/site.css", b"body{}".as_slice());
        store.insert_path("Content/Styles/print.css", b"@media print{}".as_slice());
        store.insert_path("Views/Shared/_Layout.cshtml", b"<html>".as_slice());
        store.insert_path("Scripts/app-main.js", b"init()".as_slice());
        store
    }

    #[test]
    fn test_flat_name_mapping() {
        let s = store();
        assert_eq!(
            s.flat_name("Content/Styles/site.css"),
            "Acme.Blog.Content.Styles.site.css"
        );
        // hyphens map to underscores in the directory part only
        assert_eq!(
            s.flat_name("sub-dir/file-name.js"),
            "Acme.Blog.sub_dir.file-name.js"
        );
        assert_eq!(s.flat_name("/rooted.txt"), "Acme.Blog.rooted.txt");
    }

    #[test]
    fn test_file_exists_and_open() {
        let s = store();
        assert!(s.file_exists("Content/Styles/site.css"));
        assert!(!s.file_exists("Content/Styles/missing.css"));

        let bytes = s.open("Content/Styles/site.css").unwrap().read_to_vec().unwrap();
        assert_eq!(bytes, b"body{}");
        assert!(matches!(
            s.open("nope.css"),
            Err(ResolveError::NotFound(_))
        ));
    }

    #[test]
    fn test_shared_origin_timestamp() {
        let s = store();
        let t1 = s.modified_time("Content/Styles/site.css").unwrap();
        let t2 = s.modified_time("Scripts/app-main.js").unwrap();
        assert_eq!(t1, t2);
        assert_eq!(t1, s.origin());
        assert_eq!(s.modified_time("missing.txt"), None);
    }

    #[test]
    fn test_dir_exists() {
        let s = store();
        assert!(s.dir_exists("Content/Styles"));
        assert!(s.dir_exists("Content"));
        assert!(s.dir_exists(""));
        assert!(!s.dir_exists("Images"));
    }

    #[test]
    fn test_list_files() {
        let s = store();
        let files = s.list_files("Content/Styles");
        assert_eq!(files, vec!["print.css", "site.css"]);
    }

    #[test]
    fn test_list_dirs_candidates_are_lossy() {
        let s = store();
        // remainder "Styles.site.css" yields candidates at every dot
        let dirs = s.list_dirs("Content");
        assert!(dirs.contains(&"Styles".to_string()));
        assert!(dirs.contains(&"Styles.site".to_string()));
        // deduplicated across the two stylesheets
        assert_eq!(dirs.iter().filter(|d| *d == "Styles").count(), 1);
    }

    #[test]
    fn test_list_root() {
        let s = store();
        let dirs = s.list_dirs("");
        assert!(dirs.contains(&"Content".to_string()));
        assert!(dirs.contains(&"Views".to_string()));
        assert!(dirs.contains(&"Scripts".to_string()));
    }
}
