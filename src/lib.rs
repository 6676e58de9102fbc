//! swiftread — a terminal speed-reading aid.
//!
//! Loads a block of text and plays it back one chunk of words at a time at a
//! controllable pace, tracking progress and estimated completion time.
//!
//! # Modules
//!
//! * [`document`] — tokenization into words and lines, line-to-word mapping.
//! * [`pace`]     — reading speed, chunk size, delays and time estimates.
//! * [`playback`] — the playback state machine and its async runner.
//! * [`source`]   — pluggable text sources (plain-text files, test doubles).
//! * [`config`]   — TOML settings and platform paths.
//! * [`progress`] — saved reading position, persisted as JSON.

pub mod config;
pub mod document;
pub mod pace;
pub mod playback;
pub mod progress;
pub mod source;
