//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// PaceConfig
// ---------------------------------------------------------------------------

/// Startup reading pace. Command-line flags override these, and both are
/// validated into a `PaceController` before playback sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceConfig {
    /// Reading speed in words per minute. The interactive control range is
    /// 100–2500.
    pub speed_wpm: f64,
    /// Words displayed per step (1–10 in the interactive control).
    pub chunk_size: usize,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            speed_wpm: 200.0,
            chunk_size: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Front-end display and persistence behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Print the progress percentage alongside each chunk.
    pub show_progress: bool,
    /// Print the estimated remaining time alongside each chunk.
    pub show_remaining_time: bool,
    /// Save the reading position whenever playback pauses, so `--resume`
    /// can pick up where it left off.
    pub save_progress: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_remaining_time: true,
            save_progress: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use swiftread::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Startup reading pace.
    pub pace: PaceConfig,
    /// Display and persistence behaviour.
    pub reader: ReaderConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
