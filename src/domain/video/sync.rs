// SPDX-License-Identifier: MPL-2.0
//! Frame-step decision for audio-synchronized playback.
//!
//! Audio is the master clock: the audio side publishes the frame that should
//! be on screen ("want frame") and the video side reconciles its current
//! frame against it. The reconciliation is a pure function of three numbers,
//! kept here so it can be tested without any runtime.
//!
//! Frame numbers are signed; `-1` stands for "nothing decoded / no demand
//! yet".

/// Frame number meaning "none yet".
pub const NO_FRAME: i64 = -1;

/// What the playback loop should do after its wait for a new want frame
/// has ended (deadline reached or want frame changed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// Deadline passed without the audio moving on: count one more lag
    /// frame and present the next decoded frame anyway.
    LagFrame,

    /// Audio has caught up to a frame that is already on screen. The lag
    /// counter is reset to the remaining distance and the decision is
    /// retried without decoding.
    CatchUp { clagged: u32 },

    /// Audio asks for a frame out of sequence; the decoder must seek.
    Seek { target: i64 },

    /// Audio asks for exactly the next frame.
    Advance,
}

/// Decides the next step given the wanted frame, the current frame and the
/// accumulated lag counter.
///
/// The thresholds are evaluated in order:
/// 1. `want == cur - clagged` → [`SyncStep::LagFrame`]
/// 2. `cur - clagged < want <= cur` → [`SyncStep::CatchUp`]
/// 3. `want != cur + 1` → [`SyncStep::Seek`]
/// 4. otherwise → [`SyncStep::Advance`]
#[must_use]
pub fn resolve_sync_step(want: i64, cur: i64, clagged: u32) -> SyncStep {
    let lagged_base = cur - i64::from(clagged);

    if want == lagged_base {
        SyncStep::LagFrame
    } else if want > lagged_base && want <= cur {
        // Distance is bounded by `clagged`, so it fits.
        let remaining = u32::try_from(cur - want).unwrap_or(clagged);
        SyncStep::CatchUp { clagged: remaining }
    } else if want != cur + 1 {
        SyncStep::Seek { target: want }
    } else {
        SyncStep::Advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stalled_audio_counts_a_lag_frame() {
        assert_eq!(resolve_sync_step(4, 4, 0), SyncStep::LagFrame);
        assert_eq!(resolve_sync_step(2, 4, 2), SyncStep::LagFrame);
    }

    #[test]
    fn next_frame_advances() {
        assert_eq!(resolve_sync_step(5, 4, 0), SyncStep::Advance);
        assert_eq!(resolve_sync_step(0, NO_FRAME, 0), SyncStep::Advance);
    }

    #[test]
    fn audio_catching_up_shrinks_lag() {
        // Two frames ahead of audio; audio moved one frame forward.
        assert_eq!(
            resolve_sync_step(3, 4, 2),
            SyncStep::CatchUp { clagged: 1 }
        );
        // Audio reached the frame on screen.
        assert_eq!(
            resolve_sync_step(4, 4, 2),
            SyncStep::CatchUp { clagged: 0 }
        );
    }

    #[test]
    fn jump_forward_seeks() {
        assert_eq!(resolve_sync_step(5, 2, 0), SyncStep::Seek { target: 5 });
    }

    #[test]
    fn jump_backward_seeks() {
        assert_eq!(resolve_sync_step(1, 6, 0), SyncStep::Seek { target: 1 });
        // Further back than the lag window.
        assert_eq!(resolve_sync_step(1, 6, 3), SyncStep::Seek { target: 1 });
    }

    #[test]
    fn lagging_video_with_audio_one_ahead_advances() {
        // cur - clagged < want == cur + 1
        assert_eq!(resolve_sync_step(5, 4, 3), SyncStep::Advance);
    }

    #[test]
    fn lag_counter_is_unbounded() {
        let mut clagged = 0;
        for _ in 0..1_000 {
            let want = 10 - i64::from(clagged);
            match resolve_sync_step(want, 10, clagged) {
                SyncStep::LagFrame => clagged += 1,
                other => panic!("unexpected step {other:?}"),
            }
        }
        assert_eq!(clagged, 1_000);
    }
}
