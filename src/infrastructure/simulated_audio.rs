// SPDX-License-Identifier: MPL-2.0
//! Simulated audio engine implementing the [`AudioEngine`] port trait.
//!
//! No sound is produced. The engine keeps track of loaded soundtracks and
//! drives attached sync callbacks in one of two ways:
//!
//! - **Manual**: the owner fires buffer events explicitly
//!   ([`announce`](SimulatedAudio::announce), [`emit_end`](SimulatedAudio::emit_end), ...)
//! - **Paced**: `play_music` spawns a driver task that streams one buffer per
//!   video frame through a fixed-depth pipeline, tagging each buffer when it
//!   is queued and announcing it when it becomes audible
//!
//! Callbacks are always invoked without holding the engine's own lock.
//!
//! [`AudioEngine`]: crate::application::port::audio::AudioEngine

use crate::application::port::audio::{
    AudioEngine, AudioSyncCallbacks, BufferId, MusicHandle, SoundSample,
};
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Streaming buffers per soundtrack.
pub const DEFAULT_BUFFER_SLOTS: u32 = 4;

/// Timing of the paced driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioPacing {
    /// Audio covered by one buffer, equal to one video frame.
    pub frame_interval: Duration,
    /// Frames in the soundtrack.
    pub frame_count: i64,
    /// Buffers queued ahead of the audible one.
    pub latency_buffers: u32,
}

/// Engine calls, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Loaded(String),
    Played(MusicHandle),
    Stopped,
    Destroyed(MusicHandle),
    Seeked(Duration),
}

struct SampleView {
    frame: i64,
    slots: u32,
}

impl SoundSample for SampleView {
    fn decoder_frame(&self) -> i64 {
        self.frame
    }

    fn buffer_count(&self) -> usize {
        self.slots as usize
    }
}

#[derive(Default)]
struct AudioState {
    available: HashSet<String>,
    loaded: HashMap<MusicHandle, Option<Arc<dyn AudioSyncCallbacks>>>,
    next_handle: u64,
    current: Option<MusicHandle>,
    driver: Option<CancellationToken>,
    next_buffer: u32,
    events: Vec<AudioEvent>,
}

pub struct SimulatedAudio {
    state: Mutex<AudioState>,
    /// Audio decoder position, in video frames.
    cursor: Arc<AtomicI64>,
    slots: u32,
    paced: Option<(Handle, AudioPacing)>,
}

impl SimulatedAudio {
    /// Engine whose buffer events are fired by hand.
    pub fn manual() -> Self {
        Self {
            state: Mutex::new(AudioState::default()),
            cursor: Arc::new(AtomicI64::new(0)),
            slots: DEFAULT_BUFFER_SLOTS,
            paced: None,
        }
    }

    /// Engine that streams synced soundtracks on `runtime` in real time.
    pub fn paced(runtime: Handle, pacing: AudioPacing) -> Self {
        Self {
            slots: pacing.latency_buffers.max(DEFAULT_BUFFER_SLOTS),
            paced: Some((runtime, pacing)),
            ..Self::manual()
        }
    }

    /// Makes a soundtrack available under `filename`.
    pub fn add_track(&self, filename: &str) {
        self.state().available.insert(filename.to_string());
    }

    /// Loaded soundtracks not yet destroyed.
    #[must_use]
    pub fn live_tracks(&self) -> usize {
        self.state().loaded.len()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AudioEvent> {
        self.state().events.clone()
    }

    #[must_use]
    pub fn seeks(&self) -> Vec<Duration> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                AudioEvent::Seeked(position) => Some(*position),
                _ => None,
            })
            .collect()
    }

    /// Fires the start callback as if playback began at `frame`.
    pub fn emit_start(&self, frame: i64) -> bool {
        self.active_callbacks()
            .is_some_and(|callbacks| callbacks.on_start(&self.sample(frame)))
    }

    /// Queues a buffer holding audio for `frame`; returns its identity.
    pub fn queue_buffer(&self, frame: i64) -> Option<BufferId> {
        let callbacks = self.active_callbacks()?;
        let buffer = {
            let mut state = self.state();
            let id = BufferId(state.next_buffer % self.slots);
            state.next_buffer = state.next_buffer.wrapping_add(1);
            id
        };
        callbacks.on_queue_buffer(&self.sample(frame), buffer);
        Some(buffer)
    }

    /// Reports `buffer` as the one now audible.
    pub fn play_buffer(&self, buffer: BufferId) {
        if let Some(callbacks) = self.active_callbacks() {
            callbacks.on_buffer_tag(&self.sample(self.cursor.load(Ordering::Acquire)), buffer);
        }
    }

    /// Queues a buffer for `frame` and makes it audible at once.
    pub fn announce(&self, frame: i64) {
        if let Some(buffer) = self.queue_buffer(frame) {
            self.play_buffer(buffer);
        }
    }

    /// Fires the end-of-stream callback.
    pub fn emit_end(&self) {
        if let Some(callbacks) = self.active_callbacks() {
            callbacks.on_end(&self.sample(self.cursor.load(Ordering::Acquire)));
        }
    }

    fn state(&self) -> MutexGuard<'_, AudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sample(&self, frame: i64) -> SampleView {
        SampleView {
            frame,
            slots: self.slots,
        }
    }

    /// Callbacks of the playing soundtrack, or of the newest synced one.
    fn active_callbacks(&self) -> Option<Arc<dyn AudioSyncCallbacks>> {
        let state = self.state();
        if let Some(Some(callbacks)) = state.current.and_then(|h| state.loaded.get(&h)) {
            return Some(Arc::clone(callbacks));
        }
        state
            .loaded
            .iter()
            .filter_map(|(handle, callbacks)| callbacks.as_ref().map(|c| (handle.0, c)))
            .max_by_key(|(handle, _)| *handle)
            .map(|(_, callbacks)| Arc::clone(callbacks))
    }
}

impl AudioEngine for SimulatedAudio {
    fn load_music(&self, filename: &str) -> Option<MusicHandle> {
        let mut state = self.state();
        if !state.available.contains(filename) {
            return None;
        }
        state.next_handle += 1;
        let handle = MusicHandle(state.next_handle);
        state.loaded.insert(handle, None);
        state.events.push(AudioEvent::Loaded(filename.to_string()));
        Some(handle)
    }

    fn play_music(&self, handle: MusicHandle) {
        let (callbacks, previous) = {
            let mut state = self.state();
            let Some(callbacks) = state.loaded.get(&handle).cloned() else {
                return;
            };
            state.current = Some(handle);
            state.events.push(AudioEvent::Played(handle));
            (callbacks, state.driver.take())
        };
        if let Some(previous) = previous {
            previous.cancel();
        }
        self.cursor.store(0, Ordering::Release);

        let (Some((runtime, pacing)), Some(callbacks)) = (&self.paced, callbacks) else {
            return;
        };
        let cancel = CancellationToken::new();
        self.state().driver = Some(cancel.clone());
        runtime.spawn(drive(
            callbacks,
            Arc::clone(&self.cursor),
            *pacing,
            self.slots,
            cancel,
        ));
    }

    fn stop_music(&self) {
        let mut state = self.state();
        if let Some(driver) = state.driver.take() {
            driver.cancel();
        }
        state.current = None;
        state.events.push(AudioEvent::Stopped);
    }

    fn destroy_music(&self, handle: MusicHandle) {
        let mut state = self.state();
        if state.loaded.remove(&handle).is_some() {
            state.events.push(AudioEvent::Destroyed(handle));
        }
    }

    fn seek_music(&self, position: Duration) {
        self.state().events.push(AudioEvent::Seeked(position));
        if let Some((_, pacing)) = &self.paced {
            #[allow(clippy::cast_possible_truncation)]
            let frame = (position.as_secs_f64() / pacing.frame_interval.as_secs_f64()) as i64;
            self.cursor.store(frame, Ordering::Release);
        }
    }

    fn buffer_slots(&self, _handle: MusicHandle) -> usize {
        self.slots as usize
    }

    fn attach_sync(&self, handle: MusicHandle, callbacks: Arc<dyn AudioSyncCallbacks>) -> bool {
        match self.state().loaded.get_mut(&handle) {
            Some(slot) => {
                *slot = Some(callbacks);
                true
            }
            None => false,
        }
    }
}

/// Streams the soundtrack one buffer per frame until exhausted or cancelled.
async fn drive(
    callbacks: Arc<dyn AudioSyncCallbacks>,
    cursor: Arc<AtomicI64>,
    pacing: AudioPacing,
    slots: u32,
    cancel: CancellationToken,
) {
    let sample = |frame| SampleView { frame, slots };
    let depth = pacing.latency_buffers.clamp(1, slots) as usize;
    let mut in_flight: VecDeque<BufferId> = VecDeque::with_capacity(depth);
    let mut next_id: u32 = 0;

    callbacks.on_start(&sample(cursor.load(Ordering::Acquire)));

    loop {
        while in_flight.len() < depth {
            let frame = cursor.load(Ordering::Acquire);
            if frame >= pacing.frame_count {
                break;
            }
            let buffer = BufferId(next_id % slots);
            next_id = next_id.wrapping_add(1);
            callbacks.on_queue_buffer(&sample(frame), buffer);
            in_flight.push_back(buffer);
            cursor.fetch_add(1, Ordering::AcqRel);
        }

        let Some(buffer) = in_flight.pop_front() else {
            debug!("simulated soundtrack exhausted");
            callbacks.on_end(&sample(cursor.load(Ordering::Acquire)));
            return;
        };
        callbacks.on_buffer_tag(&sample(cursor.load(Ordering::Acquire)), buffer);

        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(pacing.frame_interval) => {}
        }
    }
}
