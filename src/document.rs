//! Document tokenization — words, lines, and the line-to-word-offset mapping.
//!
//! [`Document`] is the immutable result of tokenizing a block of source text:
//! an ordered word sequence (split on runs of whitespace) and an ordered line
//! sequence (split on `\n`). A Document is created once per load and replaced
//! wholesale when new text is loaded; there is no incremental edit support.
//!
//! [`Document::word_offset_for_line`] is the single place where a line index
//! is converted into a word offset, so the seek control and the tokenizer can
//! never drift apart.

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Immutable tokenized representation of loaded text.
///
/// # Invariant
///
/// The concatenation of every line's words, in order, equals the word
/// sequence. This holds because `\n` is itself whitespace: splitting the full
/// text on whitespace runs and splitting each line on whitespace runs yield
/// exactly the same tokens.
#[derive(Debug, Clone)]
pub struct Document {
    words: Vec<String>,
    lines: Vec<String>,
}

impl Document {
    /// Tokenize `text` into a [`Document`].
    ///
    /// Never fails: an empty string yields a Document with zero words (the
    /// empty-document condition surfaces later, when playback is started).
    /// Splitting on whitespace runs means no empty word tokens are ever
    /// produced; an empty trailing line is kept and contributes zero words.
    pub fn tokenize(text: &str) -> Self {
        let words = text.split_whitespace().map(str::to_owned).collect();
        let lines = text.split('\n').map(str::to_owned).collect();
        Self { words, lines }
    }

    /// The ordered word sequence.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The ordered line sequence.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` when the document contains no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Up to `size` consecutive words starting at word offset `start`.
    ///
    /// The returned slice is shorter than `size` near the end of the
    /// document, and empty when `start` is at or past the word count.
    pub fn chunk(&self, start: usize, size: usize) -> &[String] {
        let start = start.min(self.words.len());
        let end = start.saturating_add(size).min(self.words.len());
        &self.words[start..end]
    }

    /// Word offset of the start of line `line` (0-based): the sum of the
    /// word counts of all lines strictly before it.
    ///
    /// Out-of-range indices clamp to the nearest bound instead of failing,
    /// so `word_offset_for_line(0) == 0` and
    /// `word_offset_for_line(line_count()) == word_count()` always hold.
    pub fn word_offset_for_line(&self, line: usize) -> usize {
        let line = line.min(self.lines.len());
        self.lines[..line]
            .iter()
            .map(|l| l.split_whitespace().count())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
