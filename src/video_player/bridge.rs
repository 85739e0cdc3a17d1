// SPDX-License-Identifier: MPL-2.0
//! Audio-to-video synchronization bridge.
//!
//! The audio engine queues buffers ahead of what is audible. When a buffer is
//! queued, the bridge stamps it with the video frame matching the audio
//! decoder position at that moment; when the buffer later becomes audible,
//! the stamped frame is published as the clip's want frame. The queue of
//! stamps compensates for the engine's pipeline latency.

use crate::application::port::audio::{AudioSyncCallbacks, BufferId, SoundSample};
use crate::video_player::clip::ClipShared;
use log::trace;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Frame stamps for buffers queued but not yet audible, oldest first.
#[derive(Debug, Default)]
pub struct PendingTags {
    tags: VecDeque<(BufferId, i64)>,
    capacity: usize,
}

impl PendingTags {
    /// One slot per engine buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tags: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Stamps `buffer` with `frame`. A buffer that is re-queued replaces its
    /// old stamp; past capacity the oldest stamp is dropped.
    pub fn stamp(&mut self, buffer: BufferId, frame: i64) {
        self.tags.retain(|(id, _)| *id != buffer);
        if self.tags.len() == self.capacity {
            self.tags.pop_front();
        }
        self.tags.push_back((buffer, frame));
    }

    /// Removes and returns the stamp for `buffer`.
    pub fn take(&mut self, buffer: BufferId) -> Option<i64> {
        let index = self.tags.iter().position(|(id, _)| *id == buffer)?;
        self.tags.remove(index).map(|(_, frame)| frame)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Sync callbacks installed on an audio-synced clip's soundtrack.
pub struct AudioSyncBridge {
    shared: Arc<ClipShared>,
    frame_count: i64,
    tags: Mutex<PendingTags>,
}

impl AudioSyncBridge {
    pub fn new(shared: Arc<ClipShared>, frame_count: i64, buffer_slots: usize) -> Self {
        Self {
            shared,
            frame_count,
            tags: Mutex::new(PendingTags::with_capacity(buffer_slots)),
        }
    }

    fn tags(&self) -> std::sync::MutexGuard<'_, PendingTags> {
        self.tags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioSyncCallbacks for AudioSyncBridge {
    fn on_start(&self, sample: &dyn SoundSample) -> bool {
        self.shared.set_want_frame(sample.decoder_frame());
        true
    }

    fn on_end(&self, _sample: &dyn SoundSample) {
        // Asking for the frame past the end makes the task seek into
        // exhaustion.
        self.shared.set_want_frame(self.frame_count);
    }

    fn on_buffer_tag(&self, _sample: &dyn SoundSample, buffer: BufferId) {
        let stamped = self.tags().take(buffer);
        match stamped {
            Some(frame) => self.shared.set_want_frame(frame),
            None => trace!("audible buffer {:?} carries no frame stamp", buffer),
        }
    }

    fn on_queue_buffer(&self, sample: &dyn SoundSample, buffer: BufferId) {
        self.tags().stamp(buffer, sample.decoder_frame());
    }
}
