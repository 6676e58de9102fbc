//! Reading pace — speed, chunk size, inter-step delay and time estimates.
//!
//! [`PaceController`] holds the two user-adjustable pace settings:
//!
//! * `speed_wpm`  — reading speed in words-equivalent per minute (the
//!   interactive control range is 100–2500, but the model is not
//!   hard-bounded);
//! * `chunk_size` — how many words are displayed per step (1–10 in the
//!   interactive control).
//!
//! Both must stay positive for the time math to be defined, so the setters
//! reject non-positive values with [`PaceError`] and leave the prior value
//! intact. Callers are expected to validate raw user input before calling;
//! a rejected runtime command is reported back over the event channel rather
//! than propagated into the scheduler.
//!
//! Pace is measured in chunks per minute by construction: each step consumes
//! one chunk in [`step_delay`](PaceController::step_delay) regardless of the
//! chunk size, so the effective words-per-minute is `speed / chunk_size`.

use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PaceError
// ---------------------------------------------------------------------------

/// Rejected pace settings. The controller keeps its prior value on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaceError {
    /// Speed must be a positive, finite number of words per minute.
    #[error("invalid speed: {0} (must be a positive number of words per minute)")]
    InvalidSpeed(f64),

    /// Chunk size must be at least one word.
    #[error("invalid chunk size: {0} (must be at least 1 word per step)")]
    InvalidChunkSize(usize),
}

// ---------------------------------------------------------------------------
// PaceController
// ---------------------------------------------------------------------------

/// Current pace settings and the timing math derived from them.
#[derive(Debug, Clone)]
pub struct PaceController {
    speed_wpm: f64,
    chunk_size: usize,
}

impl Default for PaceController {
    /// 200 words per minute, one word per step.
    fn default() -> Self {
        Self {
            speed_wpm: 200.0,
            chunk_size: 1,
        }
    }
}

impl PaceController {
    /// Build a controller from validated settings.
    ///
    /// # Errors
    ///
    /// [`PaceError::InvalidSpeed`] or [`PaceError::InvalidChunkSize`] when a
    /// value is non-positive.
    pub fn new(speed_wpm: f64, chunk_size: usize) -> Result<Self, PaceError> {
        let mut pace = Self::default();
        pace.set_speed(speed_wpm)?;
        pace.set_chunk_size(chunk_size)?;
        Ok(pace)
    }

    /// Current speed in words-equivalent per minute.
    pub fn speed_wpm(&self) -> f64 {
        self.speed_wpm
    }

    /// Current chunk size in words per step.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Set the speed. Non-positive or non-finite values are rejected and the
    /// prior speed is kept.
    pub fn set_speed(&mut self, speed_wpm: f64) -> Result<(), PaceError> {
        if !speed_wpm.is_finite() || speed_wpm <= 0.0 {
            return Err(PaceError::InvalidSpeed(speed_wpm));
        }
        self.speed_wpm = speed_wpm;
        Ok(())
    }

    /// Set the chunk size. Zero is rejected and the prior size is kept.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> Result<(), PaceError> {
        if chunk_size == 0 {
            return Err(PaceError::InvalidChunkSize(chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(())
    }

    /// Wall-clock delay between successive chunk advances: `60 / speed`
    /// seconds, independent of chunk size.
    pub fn step_delay(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.speed_wpm)
    }

    /// Estimated seconds to read `total_words` from the beginning:
    /// `total_words / (speed / chunk_size) * 60`.
    ///
    /// Independent of the current position. Returns `None` when the speed is
    /// not positive; that state is unreachable through the setters, so the
    /// sentinel exists only for the "estimate unavailable" display case.
    pub fn estimate_total_secs(&self, total_words: usize) -> Option<f64> {
        if self.speed_wpm <= 0.0 {
            return None;
        }
        Some(total_words as f64 / (self.speed_wpm / self.chunk_size as f64) * 60.0)
    }

    /// Estimated seconds to read the `remaining_words` left after the chunk
    /// currently on display. Same formula as
    /// [`estimate_total_secs`](Self::estimate_total_secs) over the remainder.
    pub fn estimate_remaining_secs(&self, remaining_words: usize) -> Option<f64> {
        self.estimate_total_secs(remaining_words)
    }
}

// ---------------------------------------------------------------------------
// Time formatting
// ---------------------------------------------------------------------------

/// Format a second count as `H:MM:SS` for the status display.
///
/// Fractional seconds are truncated; negative inputs render as `0:00:00`.
pub fn format_hms(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- defaults ---

    #[test]
    fn default_is_200_wpm_one_word_chunks() {
        let pace = PaceController::default();
        assert_eq!(pace.speed_wpm(), 200.0);
        assert_eq!(pace.chunk_size(), 1);
    }

    // --- setters ---

    #[test]
    fn zero_speed_is_rejected_and_prior_value_kept() {
        let mut pace = PaceController::new(120.0, 2).unwrap();
        let err = pace.set_speed(0.0).unwrap_err();
        assert_eq!(err, PaceError::InvalidSpeed(0.0));
        assert_eq!(pace.speed_wpm(), 120.0);
    }

    #[test]
    fn negative_speed_is_rejected_and_prior_value_kept() {
        let mut pace = PaceController::new(120.0, 2).unwrap();
        assert!(pace.set_speed(-5.0).is_err());
        assert_eq!(pace.speed_wpm(), 120.0);
    }

    #[test]
    fn nan_speed_is_rejected() {
        let mut pace = PaceController::default();
        assert!(pace.set_speed(f64::NAN).is_err());
        assert_eq!(pace.speed_wpm(), 200.0);
    }

    #[test]
    fn zero_chunk_size_is_rejected_and_prior_value_kept() {
        let mut pace = PaceController::new(200.0, 3).unwrap();
        let err = pace.set_chunk_size(0).unwrap_err();
        assert_eq!(err, PaceError::InvalidChunkSize(0));
        assert_eq!(pace.chunk_size(), 3);
    }

    #[test]
    fn new_rejects_invalid_settings() {
        assert!(PaceController::new(0.0, 1).is_err());
        assert!(PaceController::new(200.0, 0).is_err());
    }

    // --- step delay ---

    #[test]
    fn delay_at_120_wpm_is_half_a_second() {
        let pace = PaceController::new(120.0, 2).unwrap();
        assert_eq!(pace.step_delay(), Duration::from_millis(500));
    }

    #[test]
    fn delay_is_independent_of_chunk_size() {
        let one = PaceController::new(240.0, 1).unwrap();
        let ten = PaceController::new(240.0, 10).unwrap();
        assert_eq!(one.step_delay(), ten.step_delay());
    }

    // --- estimates ---

    #[test]
    fn total_estimate_matches_formula() {
        // 100 words at 200 wpm in 2-word chunks: 100 / (200 / 2) * 60 = 60 s.
        let pace = PaceController::new(200.0, 2).unwrap();
        assert_eq!(pace.estimate_total_secs(100), Some(60.0));
    }

    #[test]
    fn doubling_speed_halves_the_estimate() {
        let slow = PaceController::new(150.0, 2).unwrap();
        let fast = PaceController::new(300.0, 2).unwrap();
        let slow_secs = slow.estimate_total_secs(500).unwrap();
        let fast_secs = fast.estimate_total_secs(500).unwrap();
        assert!((slow_secs - 2.0 * fast_secs).abs() < 1e-9);
    }

    #[test]
    fn doubling_chunk_size_doubles_the_estimate() {
        let small = PaceController::new(200.0, 2).unwrap();
        let large = PaceController::new(200.0, 4).unwrap();
        let small_secs = small.estimate_total_secs(500).unwrap();
        let large_secs = large.estimate_total_secs(500).unwrap();
        assert!((large_secs - 2.0 * small_secs).abs() < 1e-9);
    }

    #[test]
    fn remaining_estimate_uses_same_formula() {
        let pace = PaceController::new(120.0, 2).unwrap();
        assert_eq!(
            pace.estimate_remaining_secs(3),
            pace.estimate_total_secs(3)
        );
    }

    #[test]
    fn non_positive_speed_yields_unavailable_estimate() {
        // The setters forbid this state; force it to cover the sentinel.
        let mut pace = PaceController::default();
        pace.speed_wpm = 0.0;
        assert_eq!(pace.estimate_total_secs(100), None);
        assert_eq!(pace.estimate_remaining_secs(10), None);
    }

    // --- format_hms ---

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_hms(0.0), "0:00:00");
        assert_eq!(format_hms(59.9), "0:00:59");
        assert_eq!(format_hms(61.0), "0:01:01");
        assert_eq!(format_hms(3_661.0), "1:01:01");
    }

    #[test]
    fn negative_and_non_finite_render_as_zero() {
        assert_eq!(format_hms(-5.0), "0:00:00");
        assert_eq!(format_hms(f64::NAN), "0:00:00");
        assert_eq!(format_hms(f64::INFINITY), "0:00:00");
    }
}
