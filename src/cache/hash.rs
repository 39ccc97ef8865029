//! Content hashing using blake3.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// A hash representing "no content" (all zeros).
    #[inline]
    pub const fn empty() -> Self {
        Self([0; 32])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Lowercase hex rendering.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 32 {
            return None;
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Some(Self(arr))
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // first 16 hex chars for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Hash everything a reader yields.
pub fn compute_stream_hash<R: Read>(reader: R) -> io::Result<ContentHash> {
    let mut reader = BufReader::with_capacity(64 * 1024, reader);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}

/// Hash a file's contents.
pub fn compute_file_hash(path: &Path) -> io::Result<ContentHash> {
    compute_stream_hash(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_display_is_short_hex() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(format!("{}", hash), "abababababababab");
    }

    #[test]
    fn test_hex_roundtrip() {
        let original = ContentHash::new([0x12; 32]);
        assert_eq!(ContentHash::from_hex(&original.to_hex()), Some(original));
        assert_eq!(ContentHash::from_hex("zz"), None);
        assert_eq!(ContentHash::from_hex("abcd"), None);
    }

    #[test]
    fn test_stream_and_file_agree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "hello world").unwrap();

        let from_file = compute_file_hash(&path).unwrap();
        let from_stream = compute_stream_hash(&b"hello world"[..]).unwrap();
        assert_eq!(from_file, from_stream);
        assert!(!from_file.is_empty());
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = compute_stream_hash(&b"one"[..]).unwrap();
        let b = compute_stream_hash(&b"two"[..]).unwrap();
        assert_ne!(a, b);
    }
}
