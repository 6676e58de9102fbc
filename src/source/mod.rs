//! Text sources — where the words come from.
//!
//! [`TextSource`] is the boundary between the playback engine and whatever
//! produces the raw text. It is object-safe and `Send + Sync` so it can be
//! held behind an `Arc<dyn TextSource>` and swapped per front-end: the
//! shipped implementation is [`PlainTextSource`] (a UTF-8 file on disk), and
//! a document-format extractor would slot in the same way.
//!
//! Source failures are reported to the user at this boundary; the engine is
//! only ever handed already-loaded text, so a failed load simply means the
//! tokenizer is never called.

pub mod plain_text;

pub use plain_text::PlainTextSource;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SourceError
// ---------------------------------------------------------------------------

/// All errors that can arise while loading text.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The file does not exist at the given path.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The file exists but is not valid UTF-8 text.
    #[error("{0} is not valid UTF-8 text")]
    NotText(String),

    /// Any other I/O failure (permissions, device errors, ...).
    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

// ---------------------------------------------------------------------------
// TextSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text extraction.
///
/// # Contract
///
/// - `load` yields the complete text as a single string; the caller
///   tokenizes it into a `Document`.
/// - An empty file is a successful load of an empty string, not an error —
///   the empty-document condition belongs to playback, not the source.
pub trait TextSource: Send + Sync {
    /// Load the full text.
    fn load(&self) -> Result<String, SourceError>;
}

// Compile-time assertion: Box<dyn TextSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TextSource>) {}
};

// ---------------------------------------------------------------------------
// MockTextSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that yields a pre-configured result without touching disk.
#[cfg(test)]
pub struct MockTextSource {
    result: Result<String, SourceError>,
}

#[cfg(test)]
impl MockTextSource {
    /// A source that loads `text` successfully.
    pub fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_owned()),
        }
    }

    /// A source that always fails with `error`.
    pub fn fail(error: SourceError) -> Self {
        Self { result: Err(error) }
    }
}

#[cfg(test)]
impl TextSource for MockTextSource {
    fn load(&self) -> Result<String, SourceError> {
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
