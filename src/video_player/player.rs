// SPDX-License-Identifier: MPL-2.0
//! Clip lifecycle: start, stop and the screen fade used between clips.

use crate::application::port::audio::{AudioEngine, MusicHandle};
use crate::application::port::draw::{lock_screen, Fade, SharedScreen, BLACK};
use crate::config::Config;
use crate::domain::error::PlaybackError;
use crate::domain::geometry::{compute_blit_geometry, Point, Rect};
use crate::domain::media::FrameImage;
use crate::domain::video::LagGrace;
use crate::error::Result;
use crate::video_player::adapter::Clock;
use crate::video_player::bridge::AudioSyncBridge;
use crate::video_player::clip::VideoClip;
use crate::video_player::task::{ClipResources, PlaybackTask, TaskContext};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

/// Composition root for clip playback.
///
/// Owns the collaborators every clip needs and spawns one playback task per
/// started clip on the supplied runtime.
pub struct VideoPlayer {
    runtime: Handle,
    audio: Arc<dyn AudioEngine>,
    screen: SharedScreen,
    clock: Clock,
    clip_slots: Arc<Semaphore>,
    lag_grace: LagGrace,
    fade: Duration,
}

impl VideoPlayer {
    pub fn new(
        runtime: Handle,
        audio: Arc<dyn AudioEngine>,
        screen: SharedScreen,
        config: &Config,
    ) -> Self {
        Self {
            runtime,
            audio,
            screen,
            clock: Clock::new(),
            clip_slots: Arc::new(Semaphore::new(config.playback.clip_budget().value())),
            lag_grace: config.playback.lag_grace(),
            fade: config.playback.fade(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub fn screen(&self) -> &SharedScreen {
        &self.screen
    }

    /// Starts `clip` with its top-left corner at (`x`, `y`) relative to the
    /// active drawing context.
    ///
    /// On success the clip is playing and a background task owns its
    /// decoder until [`stop`](Self::stop). On failure nothing stays
    /// allocated: no frame, no soundtrack, no task.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::ClipBusy`] if the clip still has a task to reclaim
    /// - [`PlaybackError::NoDecoder`] if the decoder was lost
    /// - [`PlaybackError::GeometryRejected`] if nothing would be visible
    /// - [`PlaybackError::MissingAudioTrack`] for an audio-synced clip
    ///   without a soundtrack
    /// - [`PlaybackError::TaskSpawnFailed`] when the clip budget is spent
    pub fn start(&self, clip: &mut VideoClip, x: i32, y: i32) -> Result<()> {
        if clip.task.is_some() {
            return Err(PlaybackError::ClipBusy.into());
        }
        if clip.decoder.is_none() {
            return Err(PlaybackError::NoDecoder.into());
        }

        let (context_clip, screen_extent) = {
            let screen = lock_screen(&self.screen);
            (screen.context_clip(), screen.extent())
        };
        let geometry =
            compute_blit_geometry(clip.extent(), Point::new(x, y), context_clip, screen_extent)
                .inspect_err(|_| {
                    warn!(
                        "clip '{}' at ({}, {}) is outside the visible area",
                        clip.filename(),
                        x,
                        y
                    );
                })?;

        let extent = clip.extent();
        let frame = FrameImage::new(
            u32::try_from(extent.width).unwrap_or(0),
            u32::try_from(extent.height).unwrap_or(0),
        );
        clip.shared.reset();

        let music = self.audio.load_music(clip.filename());
        self.audio.stop_music();

        if clip.is_audio_synced() {
            let Some(handle) = music else {
                error!("cannot load sound-track for audio-synced clip '{}'", clip.filename());
                return Err(PlaybackError::MissingAudioTrack(clip.filename().to_string()).into());
            };
            let bridge = AudioSyncBridge::new(
                Arc::clone(&clip.shared),
                clip.frame_count(),
                self.audio.buffer_slots(handle),
            );
            if !self.audio.attach_sync(handle, Arc::new(bridge)) {
                self.release_music(handle);
                return Err(PlaybackError::MissingAudioTrack(clip.filename().to_string()).into());
            }
        }

        let Ok(permit) = Arc::clone(&self.clip_slots).try_acquire_owned() else {
            warn!("no playback slot left for clip '{}'", clip.filename());
            if let Some(handle) = music {
                self.release_music(handle);
            }
            return Err(PlaybackError::TaskSpawnFailed.into());
        };

        let Some(decoder) = clip.decoder.take() else {
            if let Some(handle) = music {
                self.release_music(handle);
            }
            return Err(PlaybackError::NoDecoder.into());
        };
        clip.shared.mark_playing();
        let ctx = TaskContext {
            shared: Arc::clone(&clip.shared),
            filename: clip.filename().to_string(),
            resources: Some(ClipResources { decoder, frame }),
            geometry,
            screen: Arc::clone(&self.screen),
            audio: Arc::clone(&self.audio),
            music,
            clock: self.clock,
            lag_grace: self.lag_grace,
            permit,
        };
        clip.task = Some(PlaybackTask::spawn(&self.runtime, ctx));
        clip.music = music;
        clip.geometry = Some(geometry);

        info!(
            "started {} clip '{}' at {:?}",
            if clip.is_audio_synced() { "audio-synced" } else { "timed" },
            clip.filename(),
            geometry.dst
        );
        Ok(())
    }

    /// Boolean form of [`start`](Self::start); failures are logged.
    pub fn play(&self, clip: &mut VideoClip, x: i32, y: i32) -> bool {
        match self.start(clip, x, y) {
            Ok(()) => true,
            Err(err) => {
                debug!("clip '{}' not started: {}", clip.filename(), err);
                false
            }
        }
    }

    /// Stops `clip`, waits for its task to exit and releases the soundtrack
    /// and frame. Safe on a clip that was never started or already stopped.
    ///
    /// A decoder that never returns blocks this call.
    pub async fn stop(&self, clip: &mut VideoClip) {
        clip.shared.mark_stopped();

        if let Some(task) = clip.task.take() {
            task.request_stop();
            if let Some(resources) = task.join().await {
                clip.decoder = Some(resources.decoder);
                drop(resources.frame);
            }
            info!("stopped clip '{}'", clip.filename());
        }

        if let Some(handle) = clip.music.take() {
            self.release_music(handle);
        }
    }

    /// Whether `clip` is still presenting frames.
    #[must_use]
    pub fn is_playing(&self, clip: &VideoClip) -> bool {
        clip.is_playing()
    }

    /// Asks the clip's task to exit without waiting; call
    /// [`stop`](Self::stop) later to reclaim its resources.
    pub fn request_stop(&self, clip: &VideoClip) {
        clip.request_stop();
    }

    /// Moves a playing audio-synced clip's soundtrack to `position`.
    /// Returns false for clips without sync, where seeking is unsupported.
    pub fn seek_audio(&self, clip: &VideoClip, position: Duration) -> bool {
        if !clip.is_audio_synced() || clip.music.is_none() {
            return false;
        }
        debug!("seeking '{}' soundtrack to {:?}", clip.filename(), position);
        self.audio.seek_music(position);
        true
    }

    /// Fades the palette to black, clears the screen, then restores the
    /// palette instantly.
    pub async fn fade_clear_screen(&self) {
        let fading = lock_screen(&self.screen).start_fade(Fade::ToBlack, self.fade);
        tokio::time::sleep(fading).await;

        {
            let mut screen = lock_screen(&self.screen);
            let whole = Rect::from_extent(screen.extent());
            screen.select_screen_context();
            screen.fill_rect(whole, BLACK);
        }

        lock_screen(&self.screen).start_fade(Fade::ToColor, Duration::ZERO);
    }

    fn release_music(&self, handle: MusicHandle) {
        self.audio.stop_music();
        self.audio.destroy_music(handle);
    }
}
