//! Module registration and virtual-path parsing.

mod content_path;
mod registry;

pub use content_path::{ContentPrefix, ParsedContentPath};
pub use registry::{ModuleRegistry, RegisterError};

use crate::store::EmbeddedStore;

/// A registered content module.
///
/// A module without a store contributes no files; it still occupies its
/// name so path parsing can recognize it.
#[derive(Debug)]
pub struct Module {
    name: String,
    store: Option<EmbeddedStore>,
}

impl Module {
    pub fn new(name: impl Into<String>, store: EmbeddedStore) -> Self {
        Self {
            name: name.into(),
            store: Some(store),
        }
    }

    /// A name-only module with no embedded content.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> Option<&EmbeddedStore> {
        self.store.as_ref()
    }
}
