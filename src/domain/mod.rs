// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core playback rules with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and decision rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`error`]: Domain error types ([`PlaybackError`](error::PlaybackError))
//! - [`geometry`]: Screen rectangles and blit placement
//!   ([`Rect`](geometry::Rect), [`BlitGeometry`](geometry::BlitGeometry))
//! - [`media`]: Frame storage ([`FrameImage`](media::FrameImage))
//! - [`video`]: Playback types ([`SyncStep`](video::SyncStep),
//!   [`LagGrace`](video::LagGrace), [`ClipStatus`](video::ClipStatus))

pub mod error;
pub mod geometry;
pub mod media;
pub mod video;
