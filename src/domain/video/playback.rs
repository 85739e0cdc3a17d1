// SPDX-License-Identifier: MPL-2.0
//! Clip lifecycle states.

/// Where a clip is in its start/stop lifecycle, as seen by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipStatus {
    /// Never started, or stopped and fully reclaimed.
    #[default]
    Idle,
    /// A playback task owns the clip and is presenting frames.
    Playing,
    /// The playback task has ended on its own; `stop` still has to
    /// reclaim the decoder and release the frame.
    Finished,
}

impl ClipStatus {
    /// Returns true if the clip is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if a playback task still holds the clip's resources.
    #[must_use]
    pub fn needs_reclaim(self) -> bool {
        matches!(self, Self::Playing | Self::Finished)
    }
}
