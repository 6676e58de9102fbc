//! Playback engine — state machine, command/event surface and async runner.
//!
//! # Architecture
//!
//! ```text
//! PlaybackCommand (mpsc)
//!        │
//!        ▼
//! PlaybackRunner::run()  ← async tokio task, sole owner of the session
//!        │
//!        ├─ Start        → session.start(), first tick fires immediately
//!        ├─ Pause        → session.pause(), pending tick canceled
//!        ├─ SeekToLine   → pause if running, line → word offset, seek
//!        ├─ SetSpeed /
//!        │  SetChunkSize → validated by PaceController; rejects reported
//!        └─ (timer)      → session.tick() → chunk / finished
//!        │
//!        ▼
//! PlaybackEvent (mpsc) ──▶ presentation layer (terminal front-end, tests)
//! ```
//!
//! The runner task is the single mutator of session state; the presentation
//! layer interacts with it exclusively through the two channels, so no lock
//! is needed. The inter-tick delay is a `sleep_until` raced against command
//! receipt: a `Pause` arriving mid-delay drops the pending sleep, which makes
//! cancellation effective before the next tick can fire.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tokio::sync::mpsc;
//! use swiftread::document::Document;
//! use swiftread::pace::PaceController;
//! use swiftread::playback::{
//!     PlaybackCommand, PlaybackEvent, PlaybackRunner, PlaybackSession,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = PlaybackSession::new(
//!         Document::tokenize("the quick brown fox jumps"),
//!         PaceController::default(),
//!     );
//!
//!     let (command_tx, command_rx) = mpsc::channel::<PlaybackCommand>(16);
//!     let (event_tx, mut event_rx) = mpsc::channel::<PlaybackEvent>(32);
//!
//!     tokio::spawn(PlaybackRunner::new(session, event_tx).run(command_rx));
//!
//!     command_tx.send(PlaybackCommand::Start).await.unwrap();
//!     while let Some(event) = event_rx.recv().await {
//!         if let PlaybackEvent::Chunk { text, .. } = event {
//!             println!("{text}");
//!         }
//!     }
//! }
//! ```

pub mod runner;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::PlaybackRunner;
pub use session::{PlaybackError, PlaybackSession, PlaybackState, ProgressSnapshot, Tick};

// ---------------------------------------------------------------------------
// Command / event surface
// ---------------------------------------------------------------------------

/// Commands sent from the presentation layer to the playback runner.
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    /// Begin or resume playback from the current position.
    Start,
    /// Halt playback, keeping the position. Doubles as "stop".
    Pause,
    /// Replace the loaded text wholesale and reset to the start.
    Load { text: String },
    /// Move to the start of a line, given as the 1-based number shown in the
    /// line control. Out-of-range numbers clamp instead of failing. Pauses
    /// first when playback is running.
    SeekToLine(usize),
    /// Move to an explicit word offset (used when resuming saved progress).
    /// Clamped to the word count; pauses first when playback is running.
    SeekToWord(usize),
    /// Change the reading speed in words per minute. Rejected values are
    /// reported as [`PlaybackEvent::Error`] and leave the prior speed intact.
    SetSpeed(f64),
    /// Change the number of words shown per step. Rejected values are
    /// reported as [`PlaybackEvent::Error`] and leave the prior size intact.
    SetChunkSize(usize),
}

/// Events delivered from the playback runner to the presentation layer.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Playback entered the running state.
    Started,
    /// One chunk of words to display, with progress measured after it.
    Chunk {
        text: String,
        progress: ProgressSnapshot,
    },
    /// Playback halted; `word_offset` is where it will resume.
    Paused { word_offset: usize },
    /// The pace or position changed outside the tick loop: new estimates for
    /// the whole document and for the remainder.
    EstimateChanged {
        speed_wpm: f64,
        chunk_size: usize,
        total_secs: Option<f64>,
        progress: ProgressSnapshot,
    },
    /// End of document. Terminal: the runner stops ticking.
    Finished,
    /// A command was rejected; playback state is unchanged.
    Error { message: String },
}
