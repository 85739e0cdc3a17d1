// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Screen**: Native framebuffer dimensions
//! - **Playback**: Lag grace, clip budget, fade timing
//! - **Input**: Seek steps and polling cadence
//! - **Logging**: Fallback log filter

use crate::domain::video::newtypes::{clip_budget_bounds, lag_grace_bounds, seek_step_bounds};

// ==========================================================================
// Screen Defaults
// ==========================================================================

/// Native screen width in pixels.
pub const DEFAULT_SCREEN_WIDTH: i32 = 320;

/// Native screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: i32 = 240;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Per-lag-frame timeout extension in milliseconds.
pub const DEFAULT_LAG_GRACE_MS: u64 = lag_grace_bounds::DEFAULT;

/// Number of clips that may play simultaneously.
pub const DEFAULT_MAX_ACTIVE_CLIPS: usize = clip_budget_bounds::DEFAULT;

/// Duration of the fade to black before a clip starts (milliseconds).
pub const DEFAULT_FADE_MS: u64 = 500;

/// Longest allowed fade (milliseconds).
pub const MAX_FADE_MS: u64 = 5_000;

// ==========================================================================
// Input Defaults
// ==========================================================================

/// Seconds to jump back on a left gesture.
pub const DEFAULT_SEEK_BACK_SECS: f64 = seek_step_bounds::DEFAULT_BACK;

/// Seconds to jump forward on a right gesture.
pub const DEFAULT_SEEK_FORWARD_SECS: f64 = seek_step_bounds::DEFAULT_FORWARD;

/// Input polling interval (roughly one game tick at 30 fps).
pub const DEFAULT_INPUT_POLL_MS: u64 = 33;

/// Fastest allowed input polling interval.
pub const MIN_INPUT_POLL_MS: u64 = 1;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";
