//! Per-request union view of one directory across both layers.

use crate::path::normalize;
use crate::store::Backend;

use super::OverlayFs;

/// What a merged entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One child of a merged directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntry {
    /// Child name as listed by its layer. Embedded directory names are
    /// candidates reconstructed from the flat namespace.
    pub name: String,
    /// Virtual path of the child under the listed directory.
    pub virtual_path: String,
    pub kind: EntryKind,
    /// Layer that contributed the entry.
    pub layer: Backend,
}

/// Transient union view of one directory.
///
/// Every accessor recomputes from the live layers; nothing is cached and
/// no shared state is touched. On a virtual-path collision the native
/// entry wins and the embedded one is dropped.
pub struct DirNode<'a> {
    overlay: &'a OverlayFs,
    virtual_path: String,
}

impl<'a> DirNode<'a> {
    pub(crate) fn new(overlay: &'a OverlayFs, virtual_path: &str) -> Self {
        Self {
            overlay,
            virtual_path: virtual_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// Whether either layer has this directory.
    pub fn exists(&self) -> bool {
        self.overlay.dir_exists(&self.virtual_path)
    }

    /// Merged files of the directory.
    pub fn files(&self) -> Vec<MergedEntry> {
        self.merge(EntryKind::File)
    }

    /// Merged subdirectories of the directory.
    pub fn directories(&self) -> Vec<MergedEntry> {
        self.merge(EntryKind::Dir)
    }

    /// Subdirectories followed by files.
    pub fn children(&self) -> Vec<MergedEntry> {
        let mut entries = self.directories();
        entries.extend(self.files());
        entries
    }

    fn merge(&self, kind: EntryKind) -> Vec<MergedEntry> {
        let parsed = self
            .overlay
            .registry()
            .parse_content_path(&self.virtual_path);

        let native_rel = self.overlay.native_rel(&parsed);
        let native_names = match kind {
            EntryKind::File => self.overlay.native().list_files(&native_rel),
            EntryKind::Dir => self.overlay.native().list_dirs(&native_rel),
        };

        let embedded_names = parsed
            .module
            .as_deref()
            .and_then(|m| m.store())
            .map(|store| match kind {
                EntryKind::File => store.list_files(&parsed.content_path),
                EntryKind::Dir => store.list_dirs(&parsed.content_path),
            })
            .unwrap_or_default();

        let mut entries: Vec<MergedEntry> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for (names, layer) in [
            (native_names, Backend::Native),
            (embedded_names, Backend::Embedded),
        ] {
            for name in names {
                let virtual_path = format!("{}/{name}", self.virtual_path);
                // dedup keyed by the final virtual path, root-expanded so
                // both layers compare in the same namespace
                let key = normalize(&self.overlay.registry().expand_root(&virtual_path));
                if seen.contains(&key) {
                    continue;
                }
                seen.push(key);
                entries.push(MergedEntry {
                    name,
                    virtual_path,
                    kind,
                    layer,
                });
            }
        }

        entries
    }
}
