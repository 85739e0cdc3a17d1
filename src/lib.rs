// SPDX-License-Identifier: MPL-2.0
//! `clip_player` plays short video clips inside a game engine, either paced
//! by the decoder's own timer or locked to the soundtrack's buffer progress.
//!
//! Codecs, mixers and displays are reached only through the traits in
//! [`application::port`]; the [`infrastructure`] module ships in-memory
//! implementations of each.

#![doc(html_root_url = "https://docs.rs/clip_player/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod video_player;

#[cfg(test)]
mod test_utils;
