// SPDX-License-Identifier: MPL-2.0
//! Errors surfaced synchronously by clip start-up.
//!
//! Reaching the end of a clip is not an error: the decoder reports it
//! through [`DecodeStatus::Exhausted`](crate::application::port::video::DecodeStatus)
//! and the playback task winds down on its own.

use std::fmt;

/// Reasons a clip could not be started.
///
/// Every variant implies a full rollback: no frame image, audio handle or
/// background task is left alive when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The clip is empty or does not intersect the visible screen area.
    GeometryRejected,

    /// An audio-synced clip has no loadable soundtrack.
    MissingAudioTrack(String),

    /// No playback task could be scheduled (clip budget exhausted).
    TaskSpawnFailed,

    /// The clip still owns a playback task; call `stop` before restarting it.
    ClipBusy,

    /// The clip's decoder is not available.
    NoDecoder,
}

impl PlaybackError {
    /// Short machine-readable label, used as a structured logging field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackError::GeometryRejected => "geometry-rejected",
            PlaybackError::MissingAudioTrack(_) => "missing-audio-track",
            PlaybackError::TaskSpawnFailed => "task-spawn-failed",
            PlaybackError::ClipBusy => "clip-busy",
            PlaybackError::NoDecoder => "no-decoder",
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::GeometryRejected => {
                write!(f, "Clip does not intersect the visible screen area")
            }
            PlaybackError::MissingAudioTrack(name) => {
                write!(f, "Cannot load sound-track for audio-synced video: {}", name)
            }
            PlaybackError::TaskSpawnFailed => write!(f, "Failed to spawn playback task"),
            PlaybackError::ClipBusy => write!(f, "Clip is already owned by a playback task"),
            PlaybackError::NoDecoder => write!(f, "Clip has no decoder attached"),
        }
    }
}

impl std::error::Error for PlaybackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_audio_track_names_the_file() {
        let err = PlaybackError::MissingAudioTrack("intro.duk".to_string());
        assert!(err.to_string().contains("intro.duk"));
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            PlaybackError::GeometryRejected.kind(),
            PlaybackError::MissingAudioTrack(String::new()).kind(),
            PlaybackError::TaskSpawnFailed.kind(),
            PlaybackError::ClipBusy.kind(),
            PlaybackError::NoDecoder.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
