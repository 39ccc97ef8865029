//! Overlay of the native disk tree and module-embedded content.

mod fs;
mod node;

pub use fs::OverlayFs;
pub use node::{DirNode, EntryKind, MergedEntry};
