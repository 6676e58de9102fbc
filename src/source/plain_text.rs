//! Plain-text file source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{SourceError, TextSource};

// ---------------------------------------------------------------------------
// PlainTextSource
// ---------------------------------------------------------------------------

/// Loads a UTF-8 text file from disk.
///
/// ```rust,no_run
/// use swiftread::source::{PlainTextSource, TextSource};
///
/// let source = PlainTextSource::new("book.txt");
/// let text = source.load().expect("readable UTF-8 file");
/// ```
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    path: PathBuf,
}

impl PlainTextSource {
    /// Create a source over `path`. The file is not touched until
    /// [`load`](TextSource::load).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for PlainTextSource {
    fn load(&self) -> Result<String, SourceError> {
        let path = self.path.display().to_string();
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                log::debug!("source: read {} bytes from {path}", text.len());
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SourceError::NotFound(path)),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(SourceError::NotText(path)),
            Err(e) => Err(SourceError::Unreadable {
                path,
                reason: e.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_file_contents() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "the quick brown fox").expect("write");

        let source = PlainTextSource::new(&path);
        assert_eq!(source.load().unwrap(), "the quick brown fox");
    }

    #[test]
    fn empty_file_is_a_successful_empty_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").expect("write");

        let source = PlainTextSource::new(&path);
        assert_eq!(source.load().unwrap(), "");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().expect("temp dir");
        let source = PlainTextSource::new(dir.path().join("nope.txt"));
        assert!(matches!(source.load(), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn non_utf8_bytes_are_rejected_as_not_text() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("binary.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).expect("write");

        let source = PlainTextSource::new(&path);
        assert!(matches!(source.load(), Err(SourceError::NotText(_))));
    }
}
