//! Saved reading progress, persisted as JSON.
//!
//! [`ProgressStore`] keeps the word offset and pace of an interrupted read in
//! the platform config directory:
//!
//! | Platform | Path |
//! |----------|------|
//! | Windows  | `%APPDATA%\swiftread\progress.json` |
//! | macOS    | `~/Library/Application Support/swiftread/progress.json` |
//! | Linux    | `~/.config/swiftread/progress.json` |
//!
//! The front-end saves on pause and clears when the document is finished, so
//! `--resume` only ever lands inside an unfinished read.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::AppPaths;

// ---------------------------------------------------------------------------
// SavedProgress
// ---------------------------------------------------------------------------

/// The position and pace of an interrupted read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Word offset playback will resume from.
    pub word_offset: usize,
    /// Reading speed at the time of the save, in words per minute.
    pub speed_wpm: f64,
    /// Words per step at the time of the save.
    pub chunk_size: usize,
}

// ---------------------------------------------------------------------------
// ProgressStore
// ---------------------------------------------------------------------------

/// Reads and writes [`SavedProgress`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Store in the platform-appropriate config directory.
    pub fn new() -> Self {
        Self {
            path: AppPaths::new().progress_file,
        }
    }

    /// Store at an explicit path (useful for tests).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved progress, or `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SavedProgress>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let progress = serde_json::from_str(&data)?;
        Ok(Some(progress))
    }

    /// Save `progress`, creating parent directories as needed.
    pub fn save(&self, progress: &SavedProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(progress)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Remove the saved progress. A no-op when nothing is saved.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
