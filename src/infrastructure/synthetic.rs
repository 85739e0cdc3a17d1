// SPDX-License-Identifier: MPL-2.0
//! Synthetic decoder implementing the [`VideoDecoder`] port trait.
//!
//! [`TestPatternDecoder`] produces frames without any codec: every pixel of
//! frame `n` carries `n` in its red and green channels, so whoever receives
//! a blit can tell exactly which frame it shows.
//!
//! # Design Notes
//!
//! - Pacing follows the decoder contract: the presentation clock starts at
//!   the first decode (or a seek) and each frame asks for the time left
//!   until its slot via `set_timer`
//! - A shared [`DecoderProbe`] records decodes and seeks, readable while the
//!   decoder itself is owned by a playback task
//!
//! [`VideoDecoder`]: crate::application::port::VideoDecoder

use crate::application::port::video::{DecodeStatus, DecoderHost, VideoDecoder};
use crate::domain::geometry::Extent;
use crate::domain::media::frame::BYTES_PER_PIXEL;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Blue channel used when no marker is set.
pub const DEFAULT_MARKER: u8 = 0x40;

/// Pixel that encodes `frame` with the given marker.
#[must_use]
pub fn tag_pixel(frame: i64, marker: u8) -> [u8; 4] {
    let [lo, hi, ..] = frame.to_le_bytes();
    [lo, hi, marker, 255]
}

/// Frame number stamped into a test-pattern pixel.
#[must_use]
pub fn frame_of(pixel: [u8; 4]) -> Option<i64> {
    (pixel[3] == 255).then(|| i64::from(u16::from_le_bytes([pixel[0], pixel[1]])))
}

/// Observations shared between a decoder and the test or tool watching it.
#[derive(Debug, Default)]
pub struct DecoderProbe {
    decoded: AtomicUsize,
    seeks: Mutex<Vec<i64>>,
}

impl DecoderProbe {
    /// Frames decoded so far.
    #[must_use]
    pub fn decoded(&self) -> usize {
        self.decoded.load(Ordering::Acquire)
    }

    /// Requested seek targets, in order.
    #[must_use]
    pub fn seeks(&self) -> Vec<i64> {
        self.seeks.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub struct TestPatternDecoder {
    filename: String,
    extent: Extent,
    frame_count: i64,
    frame_interval: Duration,
    audio_synced: bool,
    marker: u8,
    current: i64,
    next: i64,
    clock_base: Option<i64>,
    probe: Arc<DecoderProbe>,
}

impl TestPatternDecoder {
    /// A 64×48 timed clip at 25 fps.
    pub fn new(filename: impl Into<String>, frame_count: i64) -> Self {
        Self {
            filename: filename.into(),
            extent: Extent::new(64, 48),
            frame_count: frame_count.max(0),
            frame_interval: Duration::from_millis(40),
            audio_synced: false,
            marker: DEFAULT_MARKER,
            current: -1,
            next: 0,
            clock_base: None,
            probe: Arc::new(DecoderProbe::default()),
        }
    }

    #[must_use]
    pub fn with_extent(mut self, width: i32, height: i32) -> Self {
        self.extent = Extent::new(width, height);
        self
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    #[must_use]
    pub fn audio_synced(mut self, synced: bool) -> Self {
        self.audio_synced = synced;
        self
    }

    /// Sets the blue channel stamped into every pixel.
    #[must_use]
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// Handle to this decoder's observations.
    #[must_use]
    pub fn probe(&self) -> Arc<DecoderProbe> {
        Arc::clone(&self.probe)
    }

    fn interval_ms(&self) -> i64 {
        i64::try_from(self.frame_interval.as_millis()).unwrap_or(i64::MAX)
    }

    /// Clock value at which frame zero would have been due; negative when
    /// the clock started after that.
    fn restart_clock(&mut self, ticks: u64, frame: i64) {
        let ticks = i64::try_from(ticks).unwrap_or(i64::MAX);
        self.clock_base = Some(ticks - frame.max(0) * self.interval_ms());
    }
}

impl VideoDecoder for TestPatternDecoder {
    fn decode(&mut self, host: &mut dyn DecoderHost) -> DecodeStatus {
        if self.next >= self.frame_count {
            return DecodeStatus::Exhausted;
        }

        let pixel = tag_pixel(self.next, self.marker);
        let height = u32::try_from(self.extent.height).unwrap_or(0);
        for y in 0..height {
            let Some(line) = host.canvas_line(y) else {
                return DecodeStatus::Failed(format!("no canvas for line {}", y));
            };
            for chunk in line.chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk.copy_from_slice(&pixel);
            }
        }

        self.current = self.next;
        self.next += 1;
        self.probe.decoded.fetch_add(1, Ordering::AcqRel);

        let ticks = host.ticks();
        if self.clock_base.is_none() {
            self.restart_clock(ticks, self.current);
        }
        let base = self.clock_base.unwrap_or_default();
        let due = base + (self.current + 1) * self.interval_ms();
        let now = i64::try_from(ticks).unwrap_or(i64::MAX);
        host.set_timer(u64::try_from(due - now).unwrap_or(0));

        DecodeStatus::Decoded
    }

    fn seek_frame(&mut self, frame: i64, host: &mut dyn DecoderHost) -> i64 {
        self.probe
            .seeks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);

        let target = frame.clamp(0, self.frame_count);
        self.next = target;
        self.restart_clock(host.ticks(), target);
        target
    }

    fn current_frame(&self) -> i64 {
        self.current
    }

    fn frame_count(&self) -> i64 {
        self.frame_count
    }

    fn max_frame_wait(&self) -> Duration {
        self.frame_interval
    }

    fn is_audio_synced(&self) -> bool {
        self.audio_synced
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn position(&self) -> Duration {
        self.frame_interval * u32::try_from(self.current.max(0)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::FrameImage;
    use crate::video_player::adapter::{Clock, DecoderAdapter};
    use crate::video_player::clip::ClipShared;

    #[test]
    fn tag_round_trips_through_pixel() {
        assert_eq!(frame_of(tag_pixel(300, DEFAULT_MARKER)), Some(300));
        assert_eq!(frame_of([0, 0, 0, 0]), None);
    }

    #[tokio::test(start_paused = true)]
    async fn decodes_every_frame_then_exhausts() {
        let clock = Clock::new();
        let shared = ClipShared::new();
        let mut frame = FrameImage::new(8, 4);
        let mut decoder = TestPatternDecoder::new("pattern", 2).with_extent(8, 4);

        let mut host = DecoderAdapter::bound(&shared, &mut frame, &clock);
        assert_eq!(decoder.decode(&mut host), DecodeStatus::Decoded);
        assert_eq!(decoder.decode(&mut host), DecodeStatus::Decoded);
        assert_eq!(decoder.decode(&mut host), DecodeStatus::Exhausted);
        drop(host);

        assert_eq!(decoder.current_frame(), 1);
        assert_eq!(frame.pixel(7, 3).and_then(frame_of), Some(1));
        assert_eq!(decoder.probe().decoded(), 2);
    }

    #[test]
    fn decode_without_canvas_fails() {
        let clock = Clock::new();
        let mut host = DecoderAdapter::unbound(&clock);
        let mut decoder = TestPatternDecoder::new("pattern", 5);
        assert!(matches!(decoder.decode(&mut host), DecodeStatus::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_restarts_presentation_clock() {
        let clock = Clock::new();
        let shared = ClipShared::new();
        let mut frame = FrameImage::new(64, 48);
        let mut decoder = TestPatternDecoder::new("pattern", 100);

        tokio::time::advance(Duration::from_millis(500)).await;
        let mut host = DecoderAdapter::bound(&shared, &mut frame, &clock);
        assert_eq!(decoder.seek_frame(50, &mut host), 50);
        decoder.decode(&mut host);
        drop(host);

        assert_eq!(decoder.current_frame(), 50);
        assert_eq!(decoder.probe().seeks(), vec![50]);
        assert_eq!(
            shared.frame_time(),
            Some(clock.now() + Duration::from_millis(40))
        );
    }

    #[test]
    fn seek_past_end_is_clamped() {
        let clock = Clock::new();
        let mut host = DecoderAdapter::unbound(&clock);
        let mut decoder = TestPatternDecoder::new("pattern", 10);
        assert_eq!(decoder.seek_frame(25, &mut host), 10);
    }
}
