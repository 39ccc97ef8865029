//! The overlay filesystem: native layer first, embedded module layer after.

use std::sync::Arc;
use std::time::SystemTime;

use crate::cache::{ContentHash, compute_file_hash, compute_stream_hash};
use crate::debug;
use crate::log;
use crate::module::{ModuleRegistry, ParsedContentPath};
use crate::store::{NativeStore, ResolveError, ResourceStream};

use super::DirNode;

/// Read-only union of the host's disk tree and every registered module's
/// embedded store.
///
/// All lookups take virtual paths (`~/`-rooted or root-expanded). The
/// native layer always answers first; module content only fills holes.
#[derive(Debug)]
pub struct OverlayFs {
    native: NativeStore,
    registry: Arc<ModuleRegistry>,
}

impl OverlayFs {
    pub fn new(native: NativeStore, registry: Arc<ModuleRegistry>) -> Self {
        Self { native, registry }
    }

    pub fn native(&self) -> &NativeStore {
        &self.native
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Disk-relative form of a virtual path: root-expanded, root stripped.
    pub(crate) fn native_rel(&self, parsed: &ParsedContentPath) -> String {
        parsed
            .full_path
            .strip_prefix(self.registry.app_root())
            .unwrap_or(&parsed.full_path)
            .to_string()
    }

    fn parse(&self, virtual_path: &str) -> ParsedContentPath {
        self.registry.parse_content_path(virtual_path)
    }

    pub fn file_exists(&self, virtual_path: &str) -> bool {
        let parsed = self.parse(virtual_path);
        if self.native.file_exists(&self.native_rel(&parsed)) {
            return true;
        }
        parsed
            .module
            .as_deref()
            .and_then(|m| m.store())
            .is_some_and(|s| s.file_exists(&parsed.content_path))
    }

    pub fn dir_exists(&self, virtual_path: &str) -> bool {
        let parsed = self.parse(virtual_path);
        if self.native.dir_exists(&self.native_rel(&parsed)) {
            return true;
        }
        parsed
            .module
            .as_deref()
            .and_then(|m| m.store())
            .is_some_and(|s| s.dir_exists(&parsed.content_path))
    }

    /// Open a resource, native layer first.
    pub fn open(&self, virtual_path: &str) -> Result<ResourceStream, ResolveError> {
        let parsed = self.parse(virtual_path);
        let rel = self.native_rel(&parsed);
        if self.native.file_exists(&rel) {
            return self.native.open(&rel);
        }

        match parsed.module.as_deref().and_then(|m| m.store()) {
            Some(store) => store.open(&parsed.content_path),
            None => {
                self.warn_unresolved(&parsed);
                Err(ResolveError::NotFound(virtual_path.to_string()))
            }
        }
    }

    /// Modification time: disk mtime for native files, the module origin
    /// timestamp for embedded ones.
    pub fn modified_time(&self, virtual_path: &str) -> Option<SystemTime> {
        let parsed = self.parse(virtual_path);
        let rel = self.native_rel(&parsed);
        if self.native.file_exists(&rel) {
            return self.native.modified_time(&rel);
        }
        parsed
            .module
            .as_deref()
            .and_then(|m| m.store())
            .and_then(|s| s.modified_time(&parsed.content_path))
    }

    /// Union view of a directory; see [`DirNode`].
    pub fn list_dir<'a>(&'a self, virtual_path: &str) -> DirNode<'a> {
        DirNode::new(self, virtual_path)
    }

    /// Content hash of a resource.
    ///
    /// Native files digest the file plus its native-resolvable dependencies
    /// (sorted, so the combined hash is stable); embedded files digest the
    /// resource stream alone.
    pub fn content_hash(
        &self,
        virtual_path: &str,
        dependencies: &[String],
    ) -> Result<ContentHash, ResolveError> {
        let parsed = self.parse(virtual_path);
        let rel = self.native_rel(&parsed);

        if self.native.file_exists(&rel) {
            let mut hasher = blake3::Hasher::new();
            let own = compute_file_hash(&self.native.resolve(&rel))
                .map_err(|e| ResolveError::Io(virtual_path.to_string(), e))?;
            hasher.update(own.as_bytes());

            let mut deps = self.cache_dependencies(virtual_path, dependencies);
            deps.sort();
            for dep in deps {
                let dep_parsed = self.parse(&dep);
                let dep_rel = self.native_rel(&dep_parsed);
                // directory dependencies join the watch set, not the digest
                if !self.native.file_exists(&dep_rel) {
                    continue;
                }
                let hash = compute_file_hash(&self.native.resolve(&dep_rel))
                    .map_err(|e| ResolveError::Io(dep.clone(), e))?;
                hasher.update(hash.as_bytes());
            }
            return Ok(ContentHash::new(*hasher.finalize().as_bytes()));
        }

        match parsed.module.as_deref().and_then(|m| m.store()) {
            Some(store) => {
                let stream = store.open(&parsed.content_path)?;
                compute_stream_hash(stream)
                    .map_err(|e| ResolveError::Io(virtual_path.to_string(), e))
            }
            None => Err(ResolveError::NotFound(virtual_path.to_string())),
        }
    }

    /// Dependencies that can join a change-watch graph.
    ///
    /// Embedded resources never change underneath a running host, so only
    /// native-resolvable dependencies (files or directories) survive the
    /// filter.
    pub fn cache_dependencies(&self, virtual_path: &str, dependencies: &[String]) -> Vec<String> {
        let kept: Vec<String> = dependencies
            .iter()
            .filter(|dep| {
                let parsed = self.parse(dep);
                let rel = self.native_rel(&parsed);
                self.native.file_exists(&rel) || self.native.dir_exists(&rel)
            })
            .cloned()
            .collect();
        debug!(
            "overlay";
            "{virtual_path}: {}/{} dependencies watchable",
            kept.len(),
            dependencies.len()
        );
        kept
    }

    fn warn_unresolved(&self, parsed: &ParsedContentPath) {
        // App_-prefixed names are framework plumbing, not missing modules
        if !parsed.module_name.is_empty() && !parsed.module_name.starts_with("App_") {
            log!(
                "overlay";
                "no module '{}' registered for {}",
                parsed.module_name,
                parsed.raw_path
            );
        }
    }
}
