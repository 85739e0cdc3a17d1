// SPDX-License-Identifier: MPL-2.0
//! Scripted input source implementing the [`InputSource`] port trait.
//!
//! [`InputSource`]: crate::application::port::input::InputSource

use crate::application::port::input::{InputSource, MenuInput};
use std::collections::VecDeque;

/// Replays a fixed sequence of gestures, one per poll, then reports no
/// input forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<MenuInput>,
    polls: usize,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = MenuInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
            polls: 0,
        }
    }

    /// A source that never presses anything.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Number of times the source was polled.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> MenuInput {
        self.polls += 1;
        self.script.pop_front().unwrap_or_default()
    }
}
