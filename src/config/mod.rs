//! Configuration module for swiftread.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for pace and
//! front-end behaviour, `AppPaths` for cross-platform data directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, PaceConfig, ReaderConfig};
