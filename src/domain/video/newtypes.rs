// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback tuning values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// LagGrace
// =============================================================================

/// Lag grace bounds, in milliseconds per lagged frame.
pub mod lag_grace_bounds {
    /// No extension: lagged frames keep the plain frame interval.
    pub const MIN: u64 = 0;
    /// Maximum extension per lagged frame.
    pub const MAX: u64 = 100;
    /// Default extension (1/100 s per lagged frame).
    pub const DEFAULT: u64 = 10;
}

/// Extra wait granted per lagged frame in audio-synced playback.
///
/// Each frame the video falls behind widens the next presentation window by
/// this amount, giving the audio signal time to catch up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagGrace(u64);

impl LagGrace {
    /// Creates a new lag grace, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(lag_grace_bounds::MIN, lag_grace_bounds::MAX))
    }

    /// Returns the grace in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    /// Total extension for `lagged` frames.
    #[must_use]
    pub fn for_lagged(self, lagged: u32) -> Duration {
        Duration::from_millis(self.0.saturating_mul(u64::from(lagged)))
    }
}

impl Default for LagGrace {
    fn default() -> Self {
        Self(lag_grace_bounds::DEFAULT)
    }
}

// =============================================================================
// SeekStep
// =============================================================================

/// Seek step bounds (0.1 to 30.0 seconds).
pub mod seek_step_bounds {
    /// Minimum seek step in seconds.
    pub const MIN: f64 = 0.1;
    /// Maximum seek step in seconds.
    pub const MAX: f64 = 30.0;
    /// Default backward step in seconds.
    pub const DEFAULT_BACK: f64 = 2.0;
    /// Default forward step in seconds.
    pub const DEFAULT_FORWARD: f64 = 1.0;
}

/// Seek step in seconds for directional input during playback.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (0.1–30.0 seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekStep(f64);

impl SeekStep {
    /// Creates a new seek step value, clamping to valid range. A value that
    /// is not a finite number yields the forward default.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self::new_or(value, Self::forward())
    }

    /// Like [`new`](Self::new), with `fallback` for non-finite values.
    #[must_use]
    pub fn new_or(value: f64, fallback: Self) -> Self {
        if value.is_finite() {
            Self(value.clamp(seek_step_bounds::MIN, seek_step_bounds::MAX))
        } else {
            fallback
        }
    }

    /// Default step for seeking backward.
    #[must_use]
    pub fn back() -> Self {
        Self(seek_step_bounds::DEFAULT_BACK)
    }

    /// Default step for seeking forward.
    #[must_use]
    pub fn forward() -> Self {
        Self(seek_step_bounds::DEFAULT_FORWARD)
    }

    /// Returns the step as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }
}

// =============================================================================
// ClipBudget
// =============================================================================

/// Bounds for the number of clips that may play at once.
pub mod clip_budget_bounds {
    /// At least one clip must be playable.
    pub const MIN: usize = 1;
    /// Upper bound on simultaneous playback tasks.
    pub const MAX: usize = 16;
    /// Default number of simultaneous clips.
    pub const DEFAULT: usize = 4;
}

/// Maximum number of playback tasks alive at the same time.
///
/// Starting a clip beyond this budget fails like an exhausted scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBudget(usize);

impl ClipBudget {
    /// Creates a new budget, clamping to valid range.
    #[must_use]
    pub fn new(clips: usize) -> Self {
        Self(clips.clamp(clip_budget_bounds::MIN, clip_budget_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for ClipBudget {
    fn default() -> Self {
        Self(clip_budget_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // LagGrace tests
    // -------------------------------------------------------------------------

    #[test]
    fn lag_grace_clamps_to_valid_range() {
        assert_eq!(LagGrace::new(1_000).millis(), lag_grace_bounds::MAX);
        assert_eq!(LagGrace::new(25).millis(), 25);
    }

    #[test]
    fn lag_grace_default_is_one_hundredth_second() {
        assert_eq!(LagGrace::default().millis(), 10);
    }

    #[test]
    fn lag_grace_scales_with_lagged_frames() {
        let grace = LagGrace::new(10);
        assert_eq!(grace.for_lagged(0), Duration::ZERO);
        assert_eq!(grace.for_lagged(3), Duration::from_millis(30));
    }

    // -------------------------------------------------------------------------
    // SeekStep tests
    // -------------------------------------------------------------------------

    #[test]
    fn seek_step_clamps_to_valid_range() {
        assert_eq!(
            SeekStep::new(0.0).as_duration(),
            Duration::from_secs_f64(seek_step_bounds::MIN)
        );
        assert_eq!(
            SeekStep::new(100.0).as_duration(),
            Duration::from_secs_f64(seek_step_bounds::MAX)
        );
        assert_eq!(SeekStep::new(5.0).as_duration(), Duration::from_secs(5));
    }

    #[test]
    fn seek_step_defaults_are_asymmetric() {
        assert!(SeekStep::back().as_duration() > SeekStep::forward().as_duration());
    }

    #[test]
    fn seek_step_rejects_non_finite_values() {
        assert_eq!(SeekStep::new(f64::NAN), SeekStep::forward());
        assert_eq!(SeekStep::new_or(f64::NAN, SeekStep::back()), SeekStep::back());
        assert_eq!(
            SeekStep::new_or(f64::INFINITY, SeekStep::back()),
            SeekStep::back()
        );
        assert_eq!(
            SeekStep::new_or(f64::NEG_INFINITY, SeekStep::forward()).as_duration(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn seek_step_as_duration() {
        let step = SeekStep::new(2.5);
        assert_eq!(step.as_duration(), Duration::from_secs_f64(2.5));
    }

    // -------------------------------------------------------------------------
    // ClipBudget tests
    // -------------------------------------------------------------------------

    #[test]
    fn clip_budget_never_drops_to_zero() {
        assert_eq!(ClipBudget::new(0).value(), clip_budget_bounds::MIN);
        assert_eq!(ClipBudget::new(64).value(), clip_budget_bounds::MAX);
        assert_eq!(ClipBudget::default().value(), clip_budget_bounds::DEFAULT);
    }
}
