// SPDX-License-Identifier: MPL-2.0
//! Clip state shared between the controlling thread, the playback task and
//! the audio engine's callbacks.

use crate::application::port::audio::MusicHandle;
use crate::application::port::video::VideoDecoder;
use crate::domain::geometry::{BlitGeometry, Extent};
use crate::domain::video::{ClipStatus, NO_FRAME};
use crate::video_player::task::PlaybackTask;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Timing fields protected by the clip guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    /// Frame currently on screen (`-1` before the first present).
    pub cur_frame: i64,
    /// Frame the audio side (or timer) wants on screen (`-1` = no demand).
    pub want_frame: i64,
    /// When the next frame is due, as last requested by the decoder.
    pub frame_time: Option<Instant>,
    /// Decoder playback position after the latest decode.
    pub position: Duration,
}

impl Default for ClipTiming {
    fn default() -> Self {
        Self {
            cur_frame: NO_FRAME,
            want_frame: NO_FRAME,
            frame_time: None,
            position: Duration::ZERO,
        }
    }
}

/// The guarded record plus the lock-free `playing` flag.
///
/// Every write to `want_frame` raises a wakeup so a playback task waiting
/// for the audio to move on re-reads it.
#[derive(Debug, Default)]
pub struct ClipShared {
    guard: Mutex<ClipTiming>,
    playing: AtomicBool,
    want_changed: Notify,
}

impl ClipShared {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the timing record. Never hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, ClipTiming> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resets timing for a fresh start.
    pub fn reset(&self) {
        *self.lock() = ClipTiming::default();
    }

    #[must_use]
    pub fn want_frame(&self) -> i64 {
        self.lock().want_frame
    }

    pub fn set_want_frame(&self, frame: i64) {
        self.lock().want_frame = frame;
        self.want_changed.notify_one();
    }

    /// Resolves once `want_frame` has been written since the last wakeup.
    pub fn want_changed(&self) -> Notified<'_> {
        self.want_changed.notified()
    }

    #[must_use]
    pub fn cur_frame(&self) -> i64 {
        self.lock().cur_frame
    }

    pub fn set_cur_frame(&self, frame: i64) {
        self.lock().cur_frame = frame;
    }

    #[must_use]
    pub fn frame_time(&self) -> Option<Instant> {
        self.lock().frame_time
    }

    pub fn set_frame_time(&self, at: Instant) {
        self.lock().frame_time = Some(at);
    }

    #[must_use]
    pub fn position(&self) -> Duration {
        self.lock().position
    }

    pub fn set_position(&self, position: Duration) {
        self.lock().position = position;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub(crate) fn mark_playing(&self) {
        self.playing.store(true, Ordering::Release);
    }

    /// Clears `playing`. Returns true only for the caller that performed
    /// the true-to-false transition.
    pub(crate) fn mark_stopped(&self) -> bool {
        self.playing.swap(false, Ordering::AcqRel)
    }
}

/// Controller-side handle to one clip.
///
/// While a playback task runs, the decoder lives inside the task; `stop`
/// hands it back.
pub struct VideoClip {
    pub(crate) decoder: Option<Box<dyn VideoDecoder>>,
    pub(crate) shared: Arc<ClipShared>,
    pub(crate) music: Option<MusicHandle>,
    pub(crate) geometry: Option<BlitGeometry>,
    pub(crate) task: Option<PlaybackTask>,
    filename: String,
    extent: Extent,
    audio_synced: bool,
    frame_count: i64,
}

impl VideoClip {
    /// Wraps a decoder that has not been started yet.
    pub fn new(decoder: Box<dyn VideoDecoder>) -> Self {
        Self {
            filename: decoder.filename().to_string(),
            extent: decoder.extent(),
            audio_synced: decoder.is_audio_synced(),
            frame_count: decoder.frame_count(),
            decoder: Some(decoder),
            shared: Arc::new(ClipShared::new()),
            music: None,
            geometry: None,
            task: None,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[must_use]
    pub fn is_audio_synced(&self) -> bool {
        self.audio_synced
    }

    #[must_use]
    pub fn frame_count(&self) -> i64 {
        self.frame_count
    }

    /// Whether the clip's task is still presenting frames.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.shared.is_playing()
    }

    #[must_use]
    pub fn status(&self) -> ClipStatus {
        match (&self.task, self.is_playing()) {
            (None, _) => ClipStatus::Idle,
            (Some(_), true) => ClipStatus::Playing,
            (Some(_), false) => ClipStatus::Finished,
        }
    }

    /// Source and destination rectangles computed by the last start.
    #[must_use]
    pub fn geometry(&self) -> Option<BlitGeometry> {
        self.geometry
    }

    /// The guarded timing record.
    #[must_use]
    pub fn shared(&self) -> &Arc<ClipShared> {
        &self.shared
    }

    /// Whether the decoder is back in the clip's hands.
    #[must_use]
    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    /// Asks the playback task to exit without waiting for it.
    pub fn request_stop(&self) {
        if let Some(task) = &self.task {
            task.request_stop();
        }
    }
}

impl std::fmt::Debug for VideoClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoClip")
            .field("filename", &self.filename)
            .field("extent", &self.extent)
            .field("audio_synced", &self.audio_synced)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timing_has_no_frames() {
        let shared = ClipShared::new();
        assert_eq!(shared.cur_frame(), NO_FRAME);
        assert_eq!(shared.want_frame(), NO_FRAME);
        assert!(shared.frame_time().is_none());
        assert!(!shared.is_playing());
    }

    #[test]
    fn playing_clears_only_once() {
        let shared = ClipShared::new();
        shared.mark_playing();
        assert!(shared.mark_stopped());
        assert!(!shared.mark_stopped());
        assert!(!shared.is_playing());
    }

    #[test]
    fn reset_restores_defaults() {
        let shared = ClipShared::new();
        shared.set_want_frame(7);
        shared.set_cur_frame(6);
        shared.set_position(Duration::from_secs(1));
        shared.reset();
        assert_eq!(*shared.lock(), ClipTiming::default());
    }

    #[tokio::test(start_paused = true)]
    async fn want_write_before_wait_is_not_lost() {
        let shared = ClipShared::new();
        shared.set_want_frame(3);
        // The stored permit resolves the next wait immediately.
        tokio::time::timeout(Duration::from_millis(1), shared.want_changed())
            .await
            .expect("wakeup should be pending");
        assert_eq!(shared.want_frame(), 3);
    }
}
