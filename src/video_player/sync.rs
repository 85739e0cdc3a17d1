// SPDX-License-Identifier: MPL-2.0
//! Audio/Video synchronization for clip playback.
//!
//! The soundtrack is the master clock. The audio engine's callbacks publish
//! the frame that should be on screen; the playback task waits for that
//! number to move past the frame it is showing and then decides whether to
//! advance, seek, or count a lag frame.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ queue/tag ┌──────────────┐ want_frame ┌─────────────┐
//! │ AudioEngine │──────────▶│ SyncBridge   │───────────▶│ ClipShared  │
//! └─────────────┘           └──────────────┘            └─────────────┘
//!                                                              │
//!                                                              ▼
//! ┌─────────────┐  decode   ┌──────────────┐  SyncStep  ┌─────────────┐
//! │ VideoDecoder│◀──────────│ PlaybackTask │◀───────────│ FrameSync   │
//! └─────────────┘           └──────────────┘            └─────────────┘
//! ```
//!
//! # Lag handling
//!
//! When the deadline passes and the audio has not moved on, the task shows
//! the next frame anyway and counts it as lagged. Each lagged frame widens
//! the following deadline by [`LagGrace`], giving the audio room to catch
//! up. The counter has no upper bound.

use crate::domain::video::{resolve_sync_step, LagGrace, SyncStep};
use std::time::Duration;
use tokio::time::Instant;

/// Per-task synchronization state: the lag counter and the current frame
/// deadline.
#[derive(Debug, Clone, Copy)]
pub struct FrameSync {
    clagged: u32,
    grace: LagGrace,
    timeout: Instant,
}

impl FrameSync {
    /// Creates the state with a deadline one frame interval from `now`.
    #[must_use]
    pub fn new(grace: LagGrace, now: Instant, frame_wait: Duration) -> Self {
        Self {
            clagged: 0,
            grace,
            timeout: now + frame_wait,
        }
    }

    /// Frames counted as lagged since the last in-sequence frame.
    #[must_use]
    pub fn clagged(&self) -> u32 {
        self.clagged
    }

    /// Deadline for presenting the next frame without new audio progress.
    #[must_use]
    pub fn timeout(&self) -> Instant {
        self.timeout
    }

    /// True while the audio still wants the frame already accounted for.
    #[must_use]
    pub fn is_waiting(&self, want: i64, cur: i64) -> bool {
        want == cur - i64::from(self.clagged)
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.timeout <= now
    }

    /// Decides the next step and updates the lag counter accordingly.
    pub fn step(&mut self, want: i64, cur: i64) -> SyncStep {
        let step = resolve_sync_step(want, cur, self.clagged);
        self.clagged = match step {
            SyncStep::LagFrame => self.clagged.saturating_add(1),
            SyncStep::CatchUp { clagged } => clagged,
            SyncStep::Seek { .. } | SyncStep::Advance => 0,
        };
        step
    }

    /// Sets the next deadline: one frame interval plus the lag grace for
    /// every lagged frame.
    pub fn rearm(&mut self, now: Instant, frame_wait: Duration) {
        self.timeout = now + frame_wait + self.grace.for_lagged(self.clagged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(40);

    #[tokio::test(start_paused = true)]
    async fn new_deadline_is_one_frame_away() {
        let now = Instant::now();
        let sync = FrameSync::new(LagGrace::default(), now, WAIT);
        assert_eq!(sync.timeout(), now + WAIT);
        assert!(!sync.is_expired(now));
        assert!(sync.is_expired(now + WAIT));
    }

    #[tokio::test(start_paused = true)]
    async fn lag_frames_widen_the_deadline() {
        let now = Instant::now();
        let mut sync = FrameSync::new(LagGrace::new(10), now, WAIT);

        assert_eq!(sync.step(4, 4), SyncStep::LagFrame);
        assert_eq!(sync.step(4, 5), SyncStep::LagFrame);
        assert_eq!(sync.clagged(), 2);

        sync.rearm(now, WAIT);
        assert_eq!(sync.timeout(), now + Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn catch_up_then_advance_clears_lag() {
        let now = Instant::now();
        let mut sync = FrameSync::new(LagGrace::default(), now, WAIT);
        sync.step(4, 4);
        sync.step(4, 5);
        assert!(sync.is_waiting(4, 6));

        assert_eq!(sync.step(5, 6), SyncStep::CatchUp { clagged: 1 });
        assert!(sync.is_waiting(5, 6));

        assert_eq!(sync.step(7, 6), SyncStep::Advance);
        assert_eq!(sync.clagged(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn seek_clears_lag() {
        let now = Instant::now();
        let mut sync = FrameSync::new(LagGrace::default(), now, WAIT);
        sync.step(2, 2);
        assert_eq!(sync.step(9, 3), SyncStep::Seek { target: 9 });
        assert_eq!(sync.clagged(), 0);
    }
}
