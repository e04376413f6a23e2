use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Stores attachment blobs under the upload directory and hands out stable
/// reference strings. The core only ever stores and counts the references.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Writes one named blob, returning its reference. The original filename
    /// only contributes its extension; the reference is UUID-based so two
    /// uploads never collide.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let file_ref = format!("{}.{}", Uuid::new_v4(), ext);

        std::fs::write(self.root.join(&file_ref), bytes)?;
        debug!(file_ref, size = bytes.len(), "Stored attachment");
        Ok(file_ref)
    }

    pub fn path_of(&self, file_ref: &str) -> PathBuf {
        self.root.join(file_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_returns_unique_refs_and_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        let a = store.save("certificate.pdf", b"pdf-bytes").unwrap();
        let b = store.save("certificate.pdf", b"other-bytes").unwrap();

        assert_ne!(a, b);
        assert!(a.ends_with(".pdf"));
        assert_eq!(std::fs::read(store.path_of(&a)).unwrap(), b"pdf-bytes");
    }

    #[test]
    fn missing_extension_falls_back_to_bin() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let r = store.save("README", b"x").unwrap();
        assert!(r.ends_with(".bin"));
    }
}
