// SPDX-License-Identifier: MPL-2.0
//! Background playback loops.
//!
//! A playback task owns the clip's decoder and destination frame for as long
//! as it runs and hands both back through its join handle. Decoder calls are
//! run on Tokio's blocking pool, so a slow codec never stalls the async
//! workers that also drive the soundtrack and input. Cancellation is
//! cooperative: the token is checked at every suspension point, so a stop
//! request takes effect within one decode-and-wait cycle.

use crate::application::port::audio::{AudioEngine, MusicHandle};
use crate::application::port::draw::{lock_screen, SharedScreen};
use crate::application::port::video::{DecodeStatus, DecoderHost, VideoDecoder};
use crate::domain::geometry::BlitGeometry;
use crate::domain::media::FrameImage;
use crate::domain::video::{LagGrace, SyncStep};
use crate::video_player::adapter::{Clock, DecoderAdapter};
use crate::video_player::clip::ClipShared;
use crate::video_player::sync::FrameSync;
use log::{debug, error, trace, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Resources a finished task returns to its clip.
pub struct ClipResources {
    pub decoder: Box<dyn VideoDecoder>,
    pub frame: FrameImage,
}

/// Everything a playback loop needs, moved into the task at spawn time.
pub(crate) struct TaskContext {
    pub shared: Arc<ClipShared>,
    pub filename: String,
    /// Out of the task only while a decoder call runs on the blocking pool;
    /// `None` afterwards means that call panicked and the decoder is gone.
    pub resources: Option<ClipResources>,
    pub geometry: BlitGeometry,
    pub screen: SharedScreen,
    pub audio: Arc<dyn AudioEngine>,
    pub music: Option<MusicHandle>,
    pub clock: Clock,
    pub lag_grace: LagGrace,
    /// Held for the task's lifetime; returns the clip slot when dropped.
    pub permit: OwnedSemaphorePermit,
}

impl TaskContext {
    /// Runs `job` against the decoder on the blocking pool, with a host
    /// bound to this clip's frame and timing record.
    async fn with_decoder<T, F>(&mut self, job: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn VideoDecoder, &mut dyn DecoderHost) -> T + Send + 'static,
    {
        let mut resources = self.resources.take()?;
        let shared = Arc::clone(&self.shared);
        let clock = self.clock;

        let outcome = tokio::task::spawn_blocking(move || {
            let mut host = DecoderAdapter::bound(&shared, &mut resources.frame, &clock);
            let value = job(resources.decoder.as_mut(), &mut host);
            (resources, value)
        })
        .await;

        match outcome {
            Ok((resources, value)) => {
                self.resources = Some(resources);
                Some(value)
            }
            Err(err) => {
                error!("decoder for '{}' crashed: {}", self.filename, err);
                None
            }
        }
    }

    async fn decode(&mut self) -> DecodeStatus {
        let status = self
            .with_decoder(|decoder, host| decoder.decode(host))
            .await
            .unwrap_or_else(|| DecodeStatus::Failed("decoder unavailable".to_string()));

        if let Some(resources) = &self.resources {
            self.shared.set_position(resources.decoder.position());
        }
        if let DecodeStatus::Failed(reason) = &status {
            warn!(
                "decoding '{}' failed at frame {}: {}",
                self.filename,
                self.shared.cur_frame(),
                reason
            );
        }
        status
    }

    async fn seek(&mut self, target: i64) -> Option<i64> {
        self.with_decoder(move |decoder, host| decoder.seek_frame(target, host))
            .await
    }

    /// Longest wait before the next frame; decoders may change it on seek.
    fn frame_wait(&self) -> Duration {
        self.resources
            .as_ref()
            .map_or(Duration::ZERO, |r| r.decoder.max_frame_wait())
    }

    /// Draws the frame under the drawing lock.
    fn present(&self) {
        let Some(resources) = &self.resources else {
            return;
        };
        let mut screen = lock_screen(&self.screen);
        screen.select_screen_context();
        screen.draw_image(&resources.frame, self.geometry.src, self.geometry.dst.corner);
        screen.flush();
    }

    fn publish_cur_frame(&self) -> i64 {
        let Some(resources) = &self.resources else {
            return self.shared.cur_frame();
        };
        let cur = resources.decoder.current_frame();
        self.shared.set_cur_frame(cur);
        cur
    }

    fn finish(self) -> Option<ClipResources> {
        if self.shared.mark_stopped() {
            debug!("clip '{}' stopped playing", self.filename);
        }
        if self.music.is_some() {
            self.audio.stop_music();
        }
        drop(self.permit);
        self.resources
    }
}

/// Handle to a running playback loop.
pub struct PlaybackTask {
    cancel: CancellationToken,
    handle: JoinHandle<Option<ClipResources>>,
}

impl PlaybackTask {
    /// Spawns the loop matching the decoder's sync mode.
    pub(crate) fn spawn(runtime: &Handle, ctx: TaskContext) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let synced = ctx
            .resources
            .as_ref()
            .is_some_and(|r| r.decoder.is_audio_synced());
        let handle = if synced {
            runtime.spawn(run_audio_synced(ctx, token))
        } else {
            runtime.spawn(run_unsynced(ctx, token))
        };
        Self { cancel, handle }
    }

    /// Signals the loop to exit at its next suspension point.
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop to exit. Returns `None` if the task or its decoder
    /// panicked, in which case the resources are lost.
    pub async fn join(self) -> Option<ClipResources> {
        match self.handle.await {
            Ok(resources) => resources,
            Err(err) => {
                error!("playback task ended abnormally: {}", err);
                None
            }
        }
    }
}

/// Timer-paced loop for clips without an audio sync source.
///
/// The decoder reports each frame's due time through `set_timer`; the loop
/// sleeps until then, presents, and decodes the next frame.
async fn run_unsynced(mut ctx: TaskContext, cancel: CancellationToken) -> Option<ClipResources> {
    if let Some(music) = ctx.music {
        ctx.audio.play_music(music);
    }

    let mut status = ctx.decode().await;
    while status.is_decoded() && !cancel.is_cancelled() {
        let deadline = ctx.shared.frame_time().unwrap_or_else(Instant::now);
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = sleep_until(deadline) => {}
        }

        let cur = ctx.publish_cur_frame();
        trace!("presenting frame {}", cur);
        ctx.present();

        status = ctx.decode().await;
    }

    ctx.finish()
}

/// Audio-paced loop: presentation follows the want frame published by the
/// audio sync bridge.
async fn run_audio_synced(
    mut ctx: TaskContext,
    cancel: CancellationToken,
) -> Option<ClipResources> {
    // Read before the music starts: the engine may call back synchronously.
    let mut want = ctx.shared.want_frame();
    if let Some(music) = ctx.music {
        ctx.audio.play_music(music);
    }

    let mut status = ctx.decode().await;
    let mut sync = FrameSync::new(ctx.lag_grace, Instant::now(), ctx.frame_wait());
    let mut cur = ctx.shared.cur_frame();

    while status.is_decoded() && !cancel.is_cancelled() {
        while sync.is_waiting(want, cur) && !sync.is_expired(Instant::now()) {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = ctx.shared.want_changed() => {}
                () = sleep_until(sync.timeout()) => {}
            }
            want = ctx.shared.want_frame();
        }
        if cancel.is_cancelled() {
            break;
        }

        match sync.step(want, cur) {
            SyncStep::CatchUp { clagged } => {
                trace!("audio caught up to frame {} ({} lagged)", want, clagged);
                continue;
            }
            SyncStep::Seek { target } => {
                debug!("seeking from frame {} to {}", cur, target);
                let Some(landed) = ctx.seek(target).await else {
                    break;
                };
                ctx.shared.set_cur_frame(landed);
                status = ctx.decode().await;
            }
            SyncStep::LagFrame => trace!("frame {} lagging ({})", cur, sync.clagged()),
            SyncStep::Advance => {}
        }

        cur = ctx.publish_cur_frame();
        if status.is_decoded() {
            ctx.present();
        }

        sync.rearm(Instant::now(), ctx.frame_wait());
        status = ctx.decode().await;
    }

    ctx.finish()
}
