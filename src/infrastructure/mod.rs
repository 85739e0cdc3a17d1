// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. None of them touch real hardware: they stand in for
//! the codec, mixer, display and controller of a host engine, which makes
//! them suitable both for the demo binary and for deterministic tests.
//!
//! # Available Adapters
//!
//! - [`synthetic`]: Test-pattern decoder (implements [`VideoDecoder`])
//! - [`simulated_audio`]: Soundtrack engine with buffer callbacks (implements [`AudioEngine`])
//! - [`framebuffer`]: In-memory screen recording every blit (implements [`Screen`])
//! - [`input`]: Scripted menu gestures (implements [`InputSource`])
//!
//! [`VideoDecoder`]: crate::application::port::VideoDecoder
//! [`AudioEngine`]: crate::application::port::AudioEngine
//! [`Screen`]: crate::application::port::Screen
//! [`InputSource`]: crate::application::port::InputSource

pub mod framebuffer;
pub mod input;
pub mod simulated_audio;
pub mod synthetic;

pub use framebuffer::{BlitRecord, FadeRecord, Framebuffer};
pub use input::ScriptedInput;
pub use simulated_audio::{AudioEvent, AudioPacing, SimulatedAudio};
pub use synthetic::{DecoderProbe, TestPatternDecoder};
