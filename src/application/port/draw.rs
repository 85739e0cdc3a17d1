// SPDX-License-Identifier: MPL-2.0
//! Drawing port definition.
//!
//! [`SharedScreen`] wraps the screen in the global drawing lock: every draw
//! call, from the game loop or from a playback task, happens while holding
//! it, so frame blits never interleave with other drawing.

use crate::domain::geometry::{Extent, Point, Rect};
use crate::domain::media::FrameImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Palette fade targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    ToBlack,
    ToColor,
}

/// Opaque black.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Port for the main screen.
pub trait Screen: Send {
    /// Screen dimensions.
    fn extent(&self) -> Extent;

    /// Clip rectangle of the active drawing context. An empty rectangle
    /// means the context does not clip.
    fn context_clip(&self) -> Rect;

    /// Makes the main screen the active drawing context.
    fn select_screen_context(&mut self);

    /// Draws the `src` region of `image` with its top-left corner at `at`.
    fn draw_image(&mut self, image: &FrameImage, src: Rect, at: Point);

    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]);

    /// Pushes pending drawing to the display.
    fn flush(&mut self);

    /// Starts a palette fade and returns how long it will take to finish.
    fn start_fade(&mut self, fade: Fade, duration: Duration) -> Duration;
}

/// The screen behind the global drawing lock.
pub type SharedScreen = Arc<Mutex<dyn Screen>>;

/// Takes the drawing lock. A poisoned lock still guards a usable screen.
pub fn lock_screen(screen: &SharedScreen) -> MutexGuard<'_, dyn Screen + 'static> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn Screen) {}

    #[test]
    fn black_is_opaque() {
        assert_eq!(BLACK[3], 255);
    }
}
