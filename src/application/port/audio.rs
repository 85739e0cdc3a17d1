// SPDX-License-Identifier: MPL-2.0
//! Audio engine port definition.
//!
//! The engine plays a clip's soundtrack on its own thread and reports buffer
//! progress back through [`AudioSyncCallbacks`]. Buffer tagging lets the
//! player associate each queued buffer with the video frame it belongs to,
//! so the frame on screen can follow what is actually audible.

use std::sync::Arc;
use std::time::Duration;

/// Opaque handle to a loaded soundtrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MusicHandle(pub u64);

/// Identity of one audio buffer inside the engine's streaming ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// View of the playing sample handed to every callback.
pub trait SoundSample {
    /// Video frame matching the audio decoder's current position.
    fn decoder_frame(&self) -> i64;

    /// Number of buffers the engine streams through.
    fn buffer_count(&self) -> usize;
}

/// Buffer-lifecycle callbacks invoked on the audio engine's thread.
///
/// Implementations must return quickly and never block on anything the
/// engine itself may be waiting for.
pub trait AudioSyncCallbacks: Send + Sync {
    /// Playback of the first buffer begins.
    fn on_start(&self, sample: &dyn SoundSample) -> bool;

    /// The stream is exhausted.
    fn on_end(&self, sample: &dyn SoundSample);

    /// A previously queued buffer has become the one currently audible.
    fn on_buffer_tag(&self, sample: &dyn SoundSample, buffer: BufferId);

    /// A buffer is about to be queued for playback.
    fn on_queue_buffer(&self, sample: &dyn SoundSample, buffer: BufferId);
}

/// Port for the audio engine that plays clip soundtracks.
pub trait AudioEngine: Send + Sync {
    /// Loads the soundtrack stored under `filename`.
    fn load_music(&self, filename: &str) -> Option<MusicHandle>;

    /// Starts playing a loaded soundtrack once through.
    fn play_music(&self, handle: MusicHandle);

    /// Stops whatever music is playing.
    fn stop_music(&self);

    /// Releases a loaded soundtrack and any callbacks attached to it.
    fn destroy_music(&self, handle: MusicHandle);

    /// Moves the music stream to `position` from its start.
    fn seek_music(&self, position: Duration);

    /// Number of streaming buffers of the sample behind `handle`.
    fn buffer_slots(&self, handle: MusicHandle) -> usize;

    /// Installs sync callbacks on the sample behind `handle`, under the
    /// engine's buffer-metadata lock. Returns false for unknown handles.
    fn attach_sync(&self, handle: MusicHandle, callbacks: Arc<dyn AudioSyncCallbacks>) -> bool;
}
