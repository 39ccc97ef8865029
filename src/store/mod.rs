//! Resource backends: native disk and embedded module stores.

mod embedded;
mod native;

pub use embedded::EmbeddedStore;
pub use native::NativeStore;

use std::io::{Cursor, Read};
use std::sync::Arc;
use thiserror::Error;

/// Which layer of the overlay a resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// The host's real on-disk tree.
    Native,
    /// A module's embedded resource store.
    Embedded,
}

/// Resolution failures surfaced by stores and the overlay.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No layer provides the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path resolved but the underlying read failed.
    #[error("failed to open {0}")]
    Io(String, #[source] std::io::Error),
}

/// Readable handle to a resolved resource.
///
/// Callers consume and drop the stream; no store state is retained.
pub enum ResourceStream {
    File(std::fs::File),
    Memory(Cursor<Arc<[u8]>>),
}

impl ResourceStream {
    /// Which layer produced this stream.
    pub fn backend(&self) -> Backend {
        match self {
            Self::File(_) => Backend::Native,
            Self::Memory(_) => Backend::Embedded,
        }
    }

    /// Read the whole stream into memory.
    pub fn read_to_vec(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for ResourceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::File(f) => f.read(buf),
            Self::Memory(c) => c.read(buf),
        }
    }
}

impl std::fmt::Debug for ResourceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(_) => f.write_str("ResourceStream::File"),
            Self::Memory(c) => write!(f, "ResourceStream::Memory({} bytes)", c.get_ref().len()),
        }
    }
}
