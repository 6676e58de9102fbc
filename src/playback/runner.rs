//! Async playback runner — the timed tick loop behind the channel surface.
//!
//! [`PlaybackRunner`] wraps a [`PlaybackSession`] in a tokio task. It is the
//! session's sole owner: every mutation goes through the command channel and
//! is applied sequentially, so position and state need no lock and at most
//! one tick is ever in flight.
//!
//! The inter-tick delay is a `sleep_until` on a stored deadline, raced
//! against command receipt with `tokio::select!`. `Pause` clears the
//! deadline, which cancels the pending tick outright instead of leaving a
//! stale timer to be ignored later; the `Tick::Ignored` check in the session
//! remains as the second line of defence.

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::document::Document;
use crate::playback::session::{PlaybackSession, PlaybackState, Tick};
use crate::playback::{PlaybackCommand, PlaybackEvent};

// ---------------------------------------------------------------------------
// PlaybackRunner
// ---------------------------------------------------------------------------

/// Drives a [`PlaybackSession`] on a timed schedule.
///
/// Create with [`PlaybackRunner::new`], then call [`run`](Self::run) inside a
/// tokio task. Events are delivered over the sender passed at construction;
/// the runner exits when the command channel closes and, if playback is still
/// running at that point, finishes the document first.
pub struct PlaybackRunner {
    session: PlaybackSession,
    events: mpsc::Sender<PlaybackEvent>,
    /// Deadline of the next scheduled tick. `None` while not running.
    next_tick: Option<Instant>,
}

impl PlaybackRunner {
    /// Create a runner over `session`, emitting events to `events`.
    pub fn new(session: PlaybackSession, events: mpsc::Sender<PlaybackEvent>) -> Self {
        Self {
            session,
            events,
            next_tick: None,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the playback loop until `commands` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from the
    /// presentation layer. A command arriving while a tick delay is pending
    /// is handled immediately; the delay itself is not restarted, so the tick
    /// still fires at the time it was scheduled for.
    pub async fn run(mut self, mut commands: mpsc::Receiver<PlaybackCommand>) {
        let mut commands_open = true;

        while commands_open || self.next_tick.is_some() {
            match self.next_tick {
                Some(deadline) if commands_open => {
                    tokio::select! {
                        command = commands.recv() => match command {
                            Some(command) => self.handle(command).await,
                            None => commands_open = false,
                        },
                        _ = time::sleep_until(deadline) => self.fire_tick().await,
                    }
                }
                // Presentation side hung up mid-playback: play the document
                // out to the end before exiting.
                Some(deadline) => {
                    time::sleep_until(deadline).await;
                    self.fire_tick().await;
                }
                None => match commands.recv().await {
                    Some(command) => self.handle(command).await,
                    None => commands_open = false,
                },
            }
        }

        log::info!("playback: command channel closed, runner shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    async fn handle(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Start => self.handle_start().await,
            PlaybackCommand::Pause => self.handle_pause().await,
            PlaybackCommand::Load { text } => self.handle_load(&text).await,
            PlaybackCommand::SeekToLine(line) => {
                // The line control is 1-based; the document mapping counts
                // lines strictly before a 0-based index.
                let offset = self
                    .session
                    .document()
                    .word_offset_for_line(line.saturating_sub(1));
                self.handle_seek(offset).await;
            }
            PlaybackCommand::SeekToWord(offset) => self.handle_seek(offset).await,
            PlaybackCommand::SetSpeed(speed_wpm) => {
                match self.session.pace_mut().set_speed(speed_wpm) {
                    Ok(()) => {
                        log::debug!("playback: speed set to {speed_wpm} wpm");
                        self.emit_estimate().await;
                    }
                    Err(e) => self.emit_error(e.to_string()).await,
                }
            }
            PlaybackCommand::SetChunkSize(chunk_size) => {
                match self.session.pace_mut().set_chunk_size(chunk_size) {
                    Ok(()) => {
                        log::debug!("playback: chunk size set to {chunk_size}");
                        self.emit_estimate().await;
                    }
                    Err(e) => self.emit_error(e.to_string()).await,
                }
            }
        }
    }

    async fn handle_start(&mut self) {
        if self.session.state() == PlaybackState::Running {
            return;
        }
        match self.session.start() {
            Ok(()) => {
                if self.session.state() == PlaybackState::Finished {
                    // Position was already at the end of the document.
                    let _ = self.events.send(PlaybackEvent::Finished).await;
                    return;
                }
                let _ = self.events.send(PlaybackEvent::Started).await;
                // The first chunk shows immediately; the delay runs between
                // chunks, not before the first one.
                self.fire_tick().await;
            }
            Err(e) => {
                log::warn!("playback: start rejected: {e}");
                let _ = self.events.send(PlaybackEvent::Finished).await;
            }
        }
    }

    async fn handle_pause(&mut self) {
        // Clearing the deadline cancels the pending tick before it can fire.
        self.next_tick = None;
        if self.session.state() == PlaybackState::Running {
            self.session.pause();
            let _ = self
                .events
                .send(PlaybackEvent::Paused {
                    word_offset: self.session.position(),
                })
                .await;
        }
    }

    async fn handle_load(&mut self, text: &str) {
        self.next_tick = None;
        self.session.load(Document::tokenize(text));
        log::info!(
            "playback: loaded {} words across {} lines",
            self.session.document().word_count(),
            self.session.document().line_count()
        );
        self.emit_estimate().await;
    }

    async fn handle_seek(&mut self, word_offset: usize) {
        // A seek arriving mid-playback is the slider being dragged: halt
        // first, then move.
        if self.session.state() == PlaybackState::Running {
            self.handle_pause().await;
        }
        match self.session.seek(word_offset) {
            Ok(()) => {
                log::debug!("playback: seek to word {}", self.session.position());
                self.emit_estimate().await;
            }
            Err(e) => self.emit_error(e.to_string()).await,
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    async fn fire_tick(&mut self) {
        match self.session.tick() {
            Tick::Chunk { text, progress } => {
                let _ = self.events.send(PlaybackEvent::Chunk { text, progress }).await;
                // Schedule with the pace current right now; a speed change
                // arriving later applies from the following tick.
                self.next_tick = Some(Instant::now() + self.session.pace().step_delay());
            }
            Tick::Finished => {
                self.next_tick = None;
                let _ = self.events.send(PlaybackEvent::Finished).await;
            }
            Tick::Ignored => {
                self.next_tick = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn emit_estimate(&mut self) {
        let pace = self.session.pace();
        let event = PlaybackEvent::EstimateChanged {
            speed_wpm: pace.speed_wpm(),
            chunk_size: pace.chunk_size(),
            total_secs: pace.estimate_total_secs(self.session.document().word_count()),
            progress: self.session.snapshot(),
        };
        let _ = self.events.send(event).await;
    }

    async fn emit_error(&mut self, message: String) {
        log::warn!("playback: command rejected: {message}");
        let _ = self.events.send(PlaybackEvent::Error { message }).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
