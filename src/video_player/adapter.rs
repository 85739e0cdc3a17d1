// SPDX-License-Identifier: MPL-2.0
//! Decoder callback surface.
//!
//! A [`DecoderAdapter`] is built for the duration of a single decode or seek
//! call. It lends the decoder the clip's frame image and forwards pacing
//! requests into the clip's guarded record.

use crate::application::port::video::DecoderHost;
use crate::domain::media::FrameImage;
use crate::video_player::clip::ClipShared;
use std::time::Duration;
use tokio::time::Instant;

/// Monotonic millisecond clock shared by the decoder and the player.
///
/// Built on Tokio's clock so paused-time tests drive it too.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        Instant::now()
    }

    /// Milliseconds since the clock was created.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // u128 millis won't overflow u64 for a process lifetime
    pub fn ticks(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DecoderAdapter<'a> {
    shared: Option<&'a ClipShared>,
    frame: Option<&'a mut FrameImage>,
    clock: &'a Clock,
}

impl<'a> DecoderAdapter<'a> {
    /// Adapter bound to a clip and its destination frame.
    pub fn bound(shared: &'a ClipShared, frame: &'a mut FrameImage, clock: &'a Clock) -> Self {
        Self {
            shared: Some(shared),
            frame: Some(frame),
            clock,
        }
    }

    /// Adapter with no clip attached; canvas and timer requests fail.
    pub fn unbound(clock: &'a Clock) -> Self {
        Self {
            shared: None,
            frame: None,
            clock,
        }
    }
}

impl DecoderHost for DecoderAdapter<'_> {
    fn canvas_line(&mut self, line: u32) -> Option<&mut [u8]> {
        self.frame.as_deref_mut()?.line_mut(line)
    }

    fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    fn set_timer(&mut self, millis: u64) -> bool {
        let Some(shared) = self.shared else {
            return false;
        };
        shared.set_frame_time(self.clock.now() + Duration::from_millis(millis));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_adapter_refuses_canvas_and_timer() {
        let clock = Clock::new();
        let mut adapter = DecoderAdapter::unbound(&clock);
        assert!(adapter.canvas_line(0).is_none());
        assert!(!adapter.set_timer(40));
    }

    #[test]
    fn bound_adapter_lends_scanlines() {
        let clock = Clock::new();
        let shared = ClipShared::new();
        let mut frame = FrameImage::new(4, 2);
        {
            let mut adapter = DecoderAdapter::bound(&shared, &mut frame, &clock);
            let line = adapter.canvas_line(1).expect("line in range");
            line[0] = 0xAB;
            assert!(adapter.canvas_line(2).is_none());
        }
        assert_eq!(frame.pixel(0, 1).map(|p| p[0]), Some(0xAB));
    }

    #[tokio::test(start_paused = true)]
    async fn set_timer_records_absolute_deadline() {
        let clock = Clock::new();
        let shared = ClipShared::new();
        let mut frame = FrameImage::new(1, 1);
        let before = Instant::now();
        let mut adapter = DecoderAdapter::bound(&shared, &mut frame, &clock);
        assert!(adapter.set_timer(40));
        assert_eq!(
            shared.frame_time(),
            Some(before + Duration::from_millis(40))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_tokio_time() {
        let clock = Clock::new();
        tokio::time::advance(Duration::from_millis(125)).await;
        assert_eq!(clock.ticks(), 125);
    }
}
