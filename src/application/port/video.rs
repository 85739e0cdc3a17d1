// SPDX-License-Identifier: MPL-2.0
//! Video decoding port definition.
//!
//! This module defines the [`VideoDecoder`] trait implemented by codec
//! adapters, and the [`DecoderHost`] callback surface the player hands to the
//! decoder on every call.
//!
//! # Design Notes
//!
//! - The decoder is **stateful** - it maintains the current frame position
//! - The decoder never owns the destination image; it writes scanlines
//!   through [`DecoderHost::canvas_line`] while the host lends it the frame
//! - Presentation pacing is reported back through [`DecoderHost::set_timer`]
//! - Uses domain types only (`Extent`)

use crate::domain::geometry::Extent;
use std::time::Duration;

// =============================================================================
// DecodeStatus
// =============================================================================

/// Outcome of one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// A frame was decoded into the canvas.
    Decoded,
    /// The stream has no more frames. Normal end of clip.
    Exhausted,
    /// The decoder gave up; the clip ends like an exhausted one.
    Failed(String),
}

impl DecodeStatus {
    /// Returns true if a frame is ready to present.
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded)
    }
}

// =============================================================================
// DecoderHost Trait
// =============================================================================

/// Callbacks a decoder may invoke while decoding or seeking.
pub trait DecoderHost {
    /// Destination bytes for scanline `line` of the clip's frame, or `None`
    /// when no clip frame is bound (or the line is out of range).
    fn canvas_line(&mut self, line: u32) -> Option<&mut [u8]>;

    /// Monotonic free-running clock in milliseconds.
    fn ticks(&self) -> u64;

    /// Requests that the frame being decoded be shown `millis` from now.
    ///
    /// Returns false when no clip is bound to receive the deadline.
    fn set_timer(&mut self, millis: u64) -> bool;
}

// =============================================================================
// VideoDecoder Trait
// =============================================================================

/// Port for clip decoders.
///
/// # Thread Safety
///
/// Implementations must be `Send`: a decoder is handed to the playback task
/// for the clip's lifetime and handed back when the clip stops.
///
/// # Frame Numbering
///
/// Frames are numbered from zero. [`current_frame`](Self::current_frame)
/// returns `-1` before the first decode.
pub trait VideoDecoder: Send {
    /// Decodes the next frame into the host canvas.
    fn decode(&mut self, host: &mut dyn DecoderHost) -> DecodeStatus;

    /// Positions the decoder so the next decode yields `frame`, and returns
    /// the frame it actually landed on. Decoders re-query
    /// [`DecoderHost::ticks`] here to restart their presentation clock.
    fn seek_frame(&mut self, frame: i64, host: &mut dyn DecoderHost) -> i64;

    /// Number of the last decoded frame.
    fn current_frame(&self) -> i64;

    /// Total number of frames in the clip.
    fn frame_count(&self) -> i64;

    /// Longest time a single frame should stay on screen.
    fn max_frame_wait(&self) -> Duration;

    /// Whether presentation follows the soundtrack instead of a timer.
    fn is_audio_synced(&self) -> bool;

    /// Source name; the soundtrack is looked up under the same name.
    fn filename(&self) -> &str;

    /// Frame dimensions in pixels.
    fn extent(&self) -> Extent;

    /// Playback position of the last decoded frame.
    fn position(&self) -> Duration;
}
