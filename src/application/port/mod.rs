// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces for the collaborators the clip
//! player drives. These traits use only domain types, ensuring the player
//! remains independent of concrete codecs, mixers and framebuffers.
//!
//! # Available Ports
//!
//! - [`audio`]: Soundtrack playback and buffer-progress callbacks
//! - [`draw`]: Screen drawing behind the global drawing lock
//! - [`input`]: Per-tick menu gestures
//! - [`video`]: Frame decoding and the decoder callback surface
//!
//! # Design Notes
//!
//! - All traits use domain types only
//! - Traits are `Send + Sync` where they cross into the audio thread
//! - No `async fn` - collaborators are called from inside playback tasks
//!   and must not suspend them
//!
//! # Example
//!
//! ```ignore
//! use clip_player::application::port::video::{DecodeStatus, DecoderHost, VideoDecoder};
//!
//! fn count_frames(decoder: &mut dyn VideoDecoder, host: &mut dyn DecoderHost) -> usize {
//!     let mut frames = 0;
//!     while decoder.decode(host) == DecodeStatus::Decoded {
//!         frames += 1;
//!     }
//!     frames
//! }
//! ```

pub mod audio;
pub mod draw;
pub mod input;
pub mod video;

// Re-export main types for convenience
pub use audio::{AudioEngine, AudioSyncCallbacks, BufferId, MusicHandle, SoundSample};
pub use draw::{Fade, Screen, SharedScreen};
pub use input::{InputSource, MenuInput, SeekDirection};
pub use video::{DecodeStatus, DecoderHost, VideoDecoder};
