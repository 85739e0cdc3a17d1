// SPDX-License-Identifier: MPL-2.0
//! Destination frame image for video playback.

use crate::domain::geometry::Extent;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// RGBA frame buffer a decoder writes scanlines into.
///
/// One image is allocated per started clip. The decoder fills it line by
/// line through the decoder host, and the playback task draws it to the
/// screen between decodes; the two never overlap.
///
/// # Example
///
/// ```
/// use clip_player::domain::media::FrameImage;
///
/// let mut frame = FrameImage::new(4, 2);
/// frame.line_mut(1).unwrap().fill(0xff);
///
/// assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
/// assert_eq!(frame.pixel(3, 1), Some([0xff; 4]));
/// assert!(frame.line_mut(2).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    width: u32,
    height: u32,
    rgba_bytes: Vec<u8>,
}

impl FrameImage {
    /// Allocates a blank (transparent black) frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            rgba_bytes: vec![0; len],
        }
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width as i32, self.height as i32)
    }

    /// Returns the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Returns scanline `line`, or `None` past the last line.
    #[must_use]
    pub fn line(&self, line: u32) -> Option<&[u8]> {
        if line >= self.height {
            return None;
        }
        let start = line as usize * self.stride();
        self.rgba_bytes.get(start..start + self.stride())
    }

    /// Returns scanline `line` for writing, or `None` past the last line.
    pub fn line_mut(&mut self, line: u32) -> Option<&mut [u8]> {
        if line >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = line as usize * stride;
        self.rgba_bytes.get_mut(start..start + stride)
    }

    /// Returns the RGBA value at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }
        let offset = x as usize * BYTES_PER_PIXEL;
        let px = self.line(y)?.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Total size of the pixel data in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.rgba_bytes.len()
    }
}
