// SPDX-License-Identifier: MPL-2.0
//! Media domain types.
//!
//! This module contains the pixel buffers shared between the decoder and
//! the drawing code, independent of any presentation backend.

pub mod frame;

pub use frame::FrameImage;
