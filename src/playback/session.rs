//! Playback state machine and per-tick progress accounting.
//!
//! [`PlaybackSession`] owns the current word position, the playback state and
//! the pace settings. It is a plain synchronous state machine: the async
//! runner calls [`tick`](PlaybackSession::tick) on schedule and forwards the
//! outcome to the presentation layer, so the session itself has no dependency
//! on any runtime or rendering toolkit.
//!
//! The state machine transitions are:
//!
//! ```text
//! (construct / load) ──▶ Idle ──start──▶ Running ──pause──▶ Paused
//!                                   ▲                        │
//!                                   └────────start───────────┘
//! Running ──tick with no words left──▶ Finished
//! start on an empty document ─────────▶ Finished (terminal event, no Running)
//! ```
//!
//! Pausing doubles as the user-facing "stop": position stays where playback
//! left off and there is no separate reset-to-start operation. Loading a new
//! document (or an explicit seek) is the only way back to an earlier offset.

use thiserror::Error;

use crate::document::Document;
use crate::pace::PaceController;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Local, recoverable playback faults. The session never enters a state it
/// cannot resume from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Playback was started on a document with zero words. The session
    /// transitions straight to [`PlaybackState::Finished`] instead of
    /// entering `Running`.
    #[error("document contains no words")]
    EmptyDocument,

    /// A seek was requested while playback is running. Callers must pause
    /// first; the runner does this implicitly for boundary seek commands.
    #[error("cannot seek while playback is running")]
    SeekWhileRunning,
}

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// States of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Fresh session or freshly loaded document; position is at the start.
    #[default]
    Idle,
    /// The tick loop is active and chunks are being emitted.
    Running,
    /// The user halted playback; position stays where it left off.
    Paused,
    /// The position reached the end of the document.
    Finished,
}

impl PlaybackState {
    /// Short human-readable label for the status display.
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Running => "Reading",
            PlaybackState::Paused => "Paused",
            PlaybackState::Finished => "Finished",
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressSnapshot
// ---------------------------------------------------------------------------

/// Derived progress metrics, recomputed on every tick and on every pace
/// change. All fields describe the state after the chunk currently on
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Fraction of the document read, as a percentage in `[0, 100]`.
    pub percent: f64,
    /// Words left to read.
    pub remaining_words: usize,
    /// Estimated seconds left at the current pace; `None` when unavailable.
    pub remaining_secs: Option<f64>,
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// Outcome of one scheduled tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// A chunk of words to display, with progress computed after the advance.
    Chunk {
        text: String,
        progress: ProgressSnapshot,
    },
    /// No words remained; the session transitioned to `Finished`.
    Finished,
    /// The session was not running. A tick that was already scheduled when
    /// `pause` arrived lands here and must not advance the position.
    Ignored,
}

// ---------------------------------------------------------------------------
// PlaybackSession
// ---------------------------------------------------------------------------

/// The playback state machine: document, position, state and pace.
///
/// Position invariant: `0 <= position <= word_count`, and position never
/// decreases except through [`seek`](Self::seek) or
/// [`load`](Self::load).
#[derive(Debug)]
pub struct PlaybackSession {
    document: Document,
    pace: PaceController,
    position: usize,
    state: PlaybackState,
}

impl PlaybackSession {
    /// Create an idle session over `document` with the given pace.
    pub fn new(document: Document, pace: PaceController) -> Self {
        Self {
            document,
            pace,
            position: 0,
            state: PlaybackState::Idle,
        }
    }

    /// Replace the document wholesale: any state becomes `Idle` and the
    /// position resets to the start.
    pub fn load(&mut self, document: Document) {
        self.document = document;
        self.position = 0;
        self.state = PlaybackState::Idle;
    }

    /// Begin or resume playback.
    ///
    /// No-op when already running. Starting with zero words returns
    /// [`PlaybackError::EmptyDocument`] and leaves the session `Finished`;
    /// starting with the position already at the end transitions to
    /// `Finished` without an error.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.document.is_empty() {
            self.state = PlaybackState::Finished;
            return Err(PlaybackError::EmptyDocument);
        }
        if self.state == PlaybackState::Running {
            return Ok(());
        }
        if self.position >= self.document.word_count() {
            self.state = PlaybackState::Finished;
            return Ok(());
        }
        self.state = PlaybackState::Running;
        Ok(())
    }

    /// Halt playback, keeping the current position. Also serves as the user
    /// "stop"; no-op unless running.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    /// Move the position to `word_offset`, clamped to the word count.
    ///
    /// Not permitted while running; a `Finished` session that seeks back
    /// before the end becomes `Paused` so it can be started again.
    pub fn seek(&mut self, word_offset: usize) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Running {
            return Err(PlaybackError::SeekWhileRunning);
        }
        self.position = word_offset.min(self.document.word_count());
        if self.state == PlaybackState::Finished && self.position < self.document.word_count() {
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    /// Advance by one chunk.
    ///
    /// Returns [`Tick::Ignored`] when the session is not running, so a
    /// stale scheduled tick after `pause` is safe. The final chunk may be
    /// shorter than the chunk size; the position never overshoots the word
    /// count. When no words remain the session becomes `Finished` and
    /// [`Tick::Finished`] is returned in place of a chunk.
    pub fn tick(&mut self) -> Tick {
        if self.state != PlaybackState::Running {
            return Tick::Ignored;
        }
        let count = self.document.word_count();
        if self.position >= count {
            self.state = PlaybackState::Finished;
            return Tick::Finished;
        }
        let text = self
            .document
            .chunk(self.position, self.pace.chunk_size())
            .join(" ");
        self.position = (self.position + self.pace.chunk_size()).min(count);
        Tick::Chunk {
            text,
            progress: self.snapshot(),
        }
    }

    /// Progress metrics for the current position and pace.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let count = self.document.word_count();
        let remaining = count - self.position;
        let percent = if count == 0 {
            100.0
        } else {
            (self.position as f64 / count as f64 * 100.0).min(100.0)
        };
        ProgressSnapshot {
            percent,
            remaining_words: remaining,
            remaining_secs: self.pace.estimate_remaining_secs(remaining),
        }
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current word offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The loaded document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The pace settings.
    pub fn pace(&self) -> &PaceController {
        &self.pace
    }

    /// Mutable access to the pace settings. A change takes effect the next
    /// time a tick is scheduled; it is never retroactive.
    pub fn pace_mut(&mut self) -> &mut PaceController {
        &mut self.pace
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str, speed: f64, chunk: usize) -> PlaybackSession {
        PlaybackSession::new(
            Document::tokenize(text),
            PaceController::new(speed, chunk).unwrap(),
        )
    }

    /// Drive a running session to completion, collecting chunk texts.
    fn drain(session: &mut PlaybackSession) -> Vec<String> {
        let mut chunks = Vec::new();
        loop {
            match session.tick() {
                Tick::Chunk { text, .. } => chunks.push(text),
                Tick::Finished => return chunks,
                Tick::Ignored => panic!("session stopped running mid-drain"),
            }
        }
    }

    // --- five-word walkthrough: chunks of 2 at 120 wpm ---

    #[test]
    fn five_word_scenario_chunks_and_progress() {
        let mut s = session("the quick brown fox jumps", 120.0, 2);
        assert_eq!(s.pace().step_delay(), std::time::Duration::from_millis(500));
        s.start().unwrap();

        match s.tick() {
            Tick::Chunk { text, progress } => {
                assert_eq!(text, "the quick");
                assert_eq!(progress.percent, 40.0);
                assert_eq!(progress.remaining_words, 3);
                // 3 words at an effective 60 wpm: 3 seconds left.
                assert_eq!(progress.remaining_secs, Some(3.0));
            }
            other => panic!("expected chunk, got {other:?}"),
        }
        match s.tick() {
            Tick::Chunk { text, progress } => {
                assert_eq!(text, "brown fox");
                assert_eq!(progress.percent, 80.0);
            }
            other => panic!("expected chunk, got {other:?}"),
        }
        match s.tick() {
            Tick::Chunk { text, progress } => {
                assert_eq!(text, "jumps");
                assert_eq!(progress.percent, 100.0);
                assert_eq!(progress.remaining_words, 0);
            }
            other => panic!("expected chunk, got {other:?}"),
        }
        assert_eq!(s.tick(), Tick::Finished);
        assert_eq!(s.state(), PlaybackState::Finished);
    }

    // --- visitation ---

    #[test]
    fn every_word_is_visited_exactly_once_in_order() {
        let text = "one two three four five six seven";
        for chunk_size in 1..=8 {
            let mut s = session(text, 600.0, chunk_size);
            s.start().unwrap();
            let visited: Vec<String> = drain(&mut s)
                .iter()
                .flat_map(|c| c.split_whitespace().map(str::to_owned))
                .collect();
            let expected: Vec<String> =
                text.split_whitespace().map(str::to_owned).collect();
            assert_eq!(visited, expected, "chunk_size {chunk_size}");
        }
    }

    #[test]
    fn chunk_size_larger_than_document_emits_one_short_chunk() {
        let mut s = session("only three words", 200.0, 10);
        s.start().unwrap();
        assert_eq!(drain(&mut s), vec!["only three words"]);
    }

    // --- progress ---

    #[test]
    fn progress_is_monotonic_and_ends_at_exactly_100() {
        let mut s = session("a b c d e f g h i j k", 300.0, 3);
        s.start().unwrap();
        let mut last = 0.0;
        loop {
            match s.tick() {
                Tick::Chunk { progress, .. } => {
                    assert!(progress.percent >= last);
                    last = progress.percent;
                }
                Tick::Finished => break,
                Tick::Ignored => unreachable!(),
            }
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn remaining_words_are_counted_after_the_displayed_chunk() {
        let mut s = session("a b c d e", 200.0, 2);
        s.start().unwrap();
        match s.tick() {
            Tick::Chunk { progress, .. } => assert_eq!(progress.remaining_words, 3),
            other => panic!("expected chunk, got {other:?}"),
        }
    }

    // --- start ---

    #[test]
    fn start_on_empty_document_errors_and_finishes() {
        let mut s = session("", 200.0, 1);
        assert_eq!(s.start().unwrap_err(), PlaybackError::EmptyDocument);
        assert_eq!(s.state(), PlaybackState::Finished);
    }

    #[test]
    fn start_is_a_no_op_while_running() {
        let mut s = session("a b c", 200.0, 1);
        s.start().unwrap();
        let _ = s.tick();
        s.start().unwrap();
        assert_eq!(s.position(), 1, "restart must not reset the position");
        assert_eq!(s.state(), PlaybackState::Running);
    }

    #[test]
    fn start_at_end_of_document_finishes_without_error() {
        let mut s = session("a b c", 200.0, 1);
        s.seek(3).unwrap();
        s.start().unwrap();
        assert_eq!(s.state(), PlaybackState::Finished);
    }

    // --- pause / resume ---

    #[test]
    fn stale_tick_after_pause_is_ignored() {
        let mut s = session("a b c d", 200.0, 1);
        s.start().unwrap();
        let _ = s.tick();
        s.pause();
        assert_eq!(s.tick(), Tick::Ignored);
        assert_eq!(s.position(), 1, "ignored tick must not advance");
    }

    #[test]
    fn resume_reproduces_the_uninterrupted_chunk_sequence() {
        let text = "one two three four five six seven eight nine";

        let mut uninterrupted = session(text, 200.0, 2);
        uninterrupted.start().unwrap();
        let full = drain(&mut uninterrupted);

        let mut interrupted = session(text, 200.0, 2);
        interrupted.start().unwrap();
        let mut chunks = Vec::new();
        for _ in 0..2 {
            match interrupted.tick() {
                Tick::Chunk { text, .. } => chunks.push(text),
                other => panic!("expected chunk, got {other:?}"),
            }
        }
        interrupted.pause();
        assert_eq!(interrupted.tick(), Tick::Ignored);
        interrupted.start().unwrap();
        chunks.extend(drain(&mut interrupted));

        assert_eq!(chunks, full);
    }

    // --- seek ---

    #[test]
    fn seek_while_running_is_rejected() {
        let mut s = session("a b c d", 200.0, 1);
        s.start().unwrap();
        assert_eq!(s.seek(2).unwrap_err(), PlaybackError::SeekWhileRunning);
    }

    #[test]
    fn seek_clamps_to_word_count() {
        let mut s = session("a b c", 200.0, 1);
        s.seek(999).unwrap();
        assert_eq!(s.position(), 3);
    }

    #[test]
    fn seek_to_line_start_of_single_line_document_is_offset_zero() {
        let mut s = session("the quick brown fox jumps", 200.0, 1);
        // Line 1 in the 1-based control maps to the line index 0 here.
        let offset = s.document().word_offset_for_line(0);
        s.seek(offset).unwrap();
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn seeking_back_from_finished_allows_restart() {
        let mut s = session("a b c", 600.0, 3);
        s.start().unwrap();
        let _ = s.tick();
        assert_eq!(s.tick(), Tick::Finished);
        s.seek(0).unwrap();
        assert_eq!(s.state(), PlaybackState::Paused);
        s.start().unwrap();
        assert_eq!(drain(&mut s), vec!["a b c"]);
    }

    // --- load ---

    #[test]
    fn load_resets_position_and_state() {
        let mut s = session("a b c d", 200.0, 1);
        s.start().unwrap();
        let _ = s.tick();
        s.pause();
        s.load(Document::tokenize("fresh text"));
        assert_eq!(s.state(), PlaybackState::Idle);
        assert_eq!(s.position(), 0);
        assert_eq!(s.document().word_count(), 2);
    }

    // --- snapshot ---

    #[test]
    fn pace_change_is_reflected_in_the_next_snapshot() {
        let mut s = session("a b c d e f", 120.0, 1);
        s.seek(2).unwrap();
        let before = s.snapshot();
        s.pace_mut().set_speed(240.0).unwrap();
        let after = s.snapshot();
        assert_eq!(before.remaining_words, after.remaining_words);
        assert!((before.remaining_secs.unwrap() - 2.0 * after.remaining_secs.unwrap()).abs() < 1e-9);
    }
}
