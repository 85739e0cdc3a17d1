// SPDX-License-Identifier: MPL-2.0
//! Video clip playback engine.
//!
//! This module plays clips on async Tokio tasks: one task per clip decodes
//! frames and blits them to the shared screen, paced either by the decoder's
//! own timer or by the soundtrack's buffer progress.

pub mod adapter;
pub mod bridge;
pub mod clip;
pub mod input;
pub mod player;
pub mod sync;
pub mod task;

pub use adapter::{Clock, DecoderAdapter};
pub use bridge::{AudioSyncBridge, PendingTags};
pub use clip::{ClipShared, ClipTiming, VideoClip};
pub use input::{InputOutcome, PlaybackInput};
pub use player::VideoPlayer;
pub use sync::FrameSync;
pub use task::{ClipResources, PlaybackTask};
