// SPDX-License-Identifier: MPL-2.0
//! In-memory screen implementing the [`Screen`] port trait.
//!
//! [`Framebuffer`] keeps an RGBA pixel buffer and a history of every blit and
//! palette fade, stamped with Tokio time so tests can check presentation
//! cadence.
//!
//! [`Screen`]: crate::application::port::draw::Screen

use crate::application::port::draw::{Fade, Screen, SharedScreen};
use crate::domain::geometry::{Extent, Point, Rect};
use crate::domain::media::frame::BYTES_PER_PIXEL;
use crate::domain::media::FrameImage;
use crate::infrastructure::synthetic::frame_of;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// One frame blit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitRecord {
    pub at: Instant,
    pub src: Rect,
    pub dst: Point,
    /// Source pixel at the top-left of the drawn region.
    pub corner_pixel: Option<[u8; 4]>,
}

impl BlitRecord {
    /// Frame number, for images produced by the test-pattern decoder.
    #[must_use]
    pub fn frame(&self) -> Option<i64> {
        self.corner_pixel.and_then(frame_of)
    }

    /// Marker channel, for images produced by the test-pattern decoder.
    #[must_use]
    pub fn marker(&self) -> Option<u8> {
        self.corner_pixel.map(|p| p[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRecord {
    pub at: Instant,
    pub fade: Fade,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct Framebuffer {
    extent: Extent,
    pixels: Vec<u8>,
    context_clip: Rect,
    blits: Vec<BlitRecord>,
    fades: Vec<FadeRecord>,
    flushes: usize,
}

impl Framebuffer {
    pub fn new(extent: Extent) -> Self {
        let width = usize::try_from(extent.width).unwrap_or(0);
        let height = usize::try_from(extent.height).unwrap_or(0);
        Self {
            extent,
            pixels: vec![0; width * height * BYTES_PER_PIXEL],
            context_clip: Rect::default(),
            blits: Vec::new(),
            fades: Vec::new(),
            flushes: 0,
        }
    }

    /// Creates a framebuffer and returns it both concretely, for
    /// inspection, and as the shared screen handed to the player.
    pub fn shared(extent: Extent) -> (Arc<Mutex<Framebuffer>>, SharedScreen) {
        let framebuffer = Arc::new(Mutex::new(Self::new(extent)));
        let screen: SharedScreen = framebuffer.clone();
        (framebuffer, screen)
    }

    /// Locks a shared framebuffer for inspection.
    pub fn inspect(framebuffer: &Mutex<Framebuffer>) -> MutexGuard<'_, Framebuffer> {
        framebuffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restricts drawing contexts to `rect`; an empty rect removes the limit.
    pub fn set_context_clip(&mut self, rect: Rect) {
        self.context_clip = rect;
    }

    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let bytes = self.pixels.get(offset..offset + BYTES_PER_PIXEL)?;
        bytes.try_into().ok()
    }

    #[must_use]
    pub fn blits(&self) -> &[BlitRecord] {
        &self.blits
    }

    /// Frame numbers of every blit, in presentation order.
    #[must_use]
    pub fn presented_frames(&self) -> Vec<i64> {
        self.blits.iter().filter_map(BlitRecord::frame).collect()
    }

    #[must_use]
    pub fn fades(&self) -> &[FadeRecord] {
        &self.fades
    }

    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        let index = usize::try_from(y * self.extent.width + x).ok()?;
        Some(index * BYTES_PER_PIXEL)
    }

    fn put(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }
}

impl Screen for Framebuffer {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn context_clip(&self) -> Rect {
        self.context_clip
    }

    fn select_screen_context(&mut self) {}

    fn draw_image(&mut self, image: &FrameImage, src: Rect, at: Point) {
        for row in 0..src.extent.height {
            for col in 0..src.extent.width {
                let (sx, sy) = (src.corner.x + col, src.corner.y + row);
                let (Ok(sx), Ok(sy)) = (u32::try_from(sx), u32::try_from(sy)) else {
                    continue;
                };
                if let Some(rgba) = image.pixel(sx, sy) {
                    self.put(at.x + col, at.y + row, rgba);
                }
            }
        }

        let corner_pixel = match (u32::try_from(src.corner.x), u32::try_from(src.corner.y)) {
            (Ok(x), Ok(y)) => image.pixel(x, y),
            _ => None,
        };
        self.blits.push(BlitRecord {
            at: Instant::now(),
            src,
            dst: at,
            corner_pixel,
        });
    }

    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        let Some(visible) = rect.intersect(&Rect::from_extent(self.extent)) else {
            return;
        };
        for row in 0..visible.extent.height {
            for col in 0..visible.extent.width {
                self.put(visible.corner.x + col, visible.corner.y + row, rgba);
            }
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn start_fade(&mut self, fade: Fade, duration: Duration) -> Duration {
        self.fades.push(FadeRecord {
            at: Instant::now(),
            fade,
            duration,
        });
        duration
    }
}
