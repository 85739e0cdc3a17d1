// SPDX-License-Identifier: MPL-2.0
//! Test fixtures shared by the unit tests.
//!
//! A fixture wires a [`VideoPlayer`] to a manual [`SimulatedAudio`] and a
//! 320×240 [`Framebuffer`] on the current Tokio runtime, so tests must run
//! inside `#[tokio::test]`.

use crate::application::port::audio::AudioEngine;
use crate::config::Config;
use crate::infrastructure::framebuffer::Framebuffer;
use crate::infrastructure::simulated_audio::SimulatedAudio;
use crate::infrastructure::synthetic::TestPatternDecoder;
use crate::video_player::{VideoClip, VideoPlayer};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;

pub struct Fixture {
    pub player: VideoPlayer,
    pub audio: Arc<SimulatedAudio>,
    pub framebuffer: Arc<Mutex<Framebuffer>>,
}

impl Fixture {
    pub fn framebuffer(&self) -> MutexGuard<'_, Framebuffer> {
        Framebuffer::inspect(&self.framebuffer)
    }
}

pub fn fixture() -> Fixture {
    fixture_with(&Config::default())
}

pub fn fixture_with(config: &Config) -> Fixture {
    let audio = Arc::new(SimulatedAudio::manual());
    let (framebuffer, screen) = Framebuffer::shared(config.screen.extent());
    let engine: Arc<dyn AudioEngine> = audio.clone();
    let player = VideoPlayer::new(Handle::current(), engine, screen, config);
    Fixture {
        player,
        audio,
        framebuffer,
    }
}

/// Timer-paced clip named `timed.duk`; no soundtrack is registered for it.
pub fn timed_clip(frames: i64, interval_ms: u64) -> VideoClip {
    named_clip("timed.duk", false, frames, interval_ms)
}

/// Audio-synced clip named `synced.duk`.
pub fn synced_clip(frames: i64, interval_ms: u64) -> VideoClip {
    named_clip("synced.duk", true, frames, interval_ms)
}

pub fn named_clip(name: &str, synced: bool, frames: i64, interval_ms: u64) -> VideoClip {
    let decoder = TestPatternDecoder::new(name, frames)
        .with_frame_interval(Duration::from_millis(interval_ms))
        .audio_synced(synced);
    VideoClip::new(Box::new(decoder))
}
