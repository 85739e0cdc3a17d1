// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains playback value objects and the frame-step decision
//! that are independent of any runtime or infrastructure concerns.

pub mod newtypes;
pub mod playback;
pub mod sync;

// Re-export commonly used types
pub use newtypes::{ClipBudget, LagGrace, SeekStep};
pub use playback::ClipStatus;
pub use sync::{resolve_sync_step, SyncStep, NO_FRAME};
