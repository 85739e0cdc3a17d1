// SPDX-License-Identifier: MPL-2.0
//! Screen-space geometry for clip placement.
//!
//! Rectangles use a top-left corner plus an extent, in screen pixels.
//! Coordinates are signed so a clip may be placed partially off-screen.

use crate::domain::error::PlaybackError;

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero or negative.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub corner: Point,
    pub extent: Extent,
}

impl Rect {
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            corner: Point::new(x, y),
            extent: Extent::new(width, height),
        }
    }

    /// Rectangle anchored at the origin.
    #[must_use]
    pub fn from_extent(extent: Extent) -> Self {
        Self {
            corner: Point::default(),
            extent,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    /// Exclusive right edge. Widened so far-off placements cannot overflow.
    #[must_use]
    pub fn right(&self) -> i64 {
        i64::from(self.corner.x) + i64::from(self.extent.width)
    }

    #[must_use]
    pub fn bottom(&self) -> i64 {
        i64::from(self.corner.y) + i64::from(self.extent.height)
    }

    /// Returns the overlapping area, or `None` when the rectangles are
    /// disjoint or merely touch.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.corner.x.max(other.corner.x);
        let y0 = self.corner.y.max(other.corner.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        let width = i32::try_from(x1 - i64::from(x0)).ok()?;
        let height = i32::try_from(y1 - i64::from(y0)).ok()?;
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Rect::new(x0, y0, width, height))
    }

    /// Returns a copy moved by `offset`, or `None` if the corner would
    /// leave the coordinate range.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Option<Rect> {
        Some(Rect::new(
            self.corner.x.checked_add(offset.x)?,
            self.corner.y.checked_add(offset.y)?,
            self.extent.width,
            self.extent.height,
        ))
    }
}

/// Where a clip's frames are read from and drawn to.
///
/// `src` is expressed in frame-image coordinates, `dst` in screen
/// coordinates; both share the same extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitGeometry {
    pub src: Rect,
    pub dst: Rect,
}

/// Computes the clipped source and destination rectangles for a clip of
/// size `clip` drawn at `at`, relative to the active drawing context.
///
/// A degenerate context clip rectangle means "no clipping" and the whole
/// screen is used instead. Otherwise the context clip rectangle is first
/// narrowed to the screen, and `at` is interpreted relative to its corner.
///
/// # Errors
///
/// Returns [`PlaybackError::GeometryRejected`] if the clip is empty or any
/// stage of the clipping leaves nothing visible.
pub fn compute_blit_geometry(
    clip: Extent,
    at: Point,
    context_clip: Rect,
    screen: Extent,
) -> Result<BlitGeometry, PlaybackError> {
    let screen_rect = Rect::from_extent(screen);

    let visible = if context_clip.is_empty() {
        screen_rect
    } else {
        context_clip
            .intersect(&screen_rect)
            .ok_or(PlaybackError::GeometryRejected)?
    };

    if clip.is_empty() {
        return Err(PlaybackError::GeometryRejected);
    }

    let placed = Rect {
        corner: at,
        extent: clip,
    }
    .translated(visible.corner)
    .ok_or(PlaybackError::GeometryRejected)?;
    let dst = visible
        .intersect(&placed)
        .ok_or(PlaybackError::GeometryRejected)?;

    // Frame-image coordinates of the visible part.
    let src = Rect {
        corner: Point::new(dst.corner.x - placed.corner.x, dst.corner.y - placed.corner.y),
        extent: dst.extent,
    };

    Ok(BlitGeometry { src, dst })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Extent = Extent {
        width: 320,
        height: 240,
    };

    #[test]
    fn intersect_overlapping() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edges_is_none() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn full_screen_clip_at_origin() {
        let geometry = compute_blit_geometry(
            Extent::new(320, 240),
            Point::new(0, 0),
            Rect::default(),
            SCREEN,
        )
        .unwrap();
        assert_eq!(geometry.dst, Rect::new(0, 0, 320, 240));
        assert_eq!(geometry.src, Rect::new(0, 0, 320, 240));
    }

    #[test]
    fn clip_hanging_off_the_left_is_cropped() {
        let geometry = compute_blit_geometry(
            Extent::new(100, 50),
            Point::new(-30, 10),
            Rect::default(),
            SCREEN,
        )
        .unwrap();
        assert_eq!(geometry.dst, Rect::new(0, 10, 70, 50));
        assert_eq!(geometry.src, Rect::new(30, 0, 70, 50));
    }

    #[test]
    fn context_clip_offsets_destination() {
        let context = Rect::new(16, 8, 200, 100);
        let geometry =
            compute_blit_geometry(Extent::new(50, 50), Point::new(10, 10), context, SCREEN)
                .unwrap();
        assert_eq!(geometry.dst, Rect::new(26, 18, 50, 50));
        assert_eq!(geometry.src.corner, Point::new(0, 0));
        assert_eq!(geometry.src.extent, geometry.dst.extent);
    }

    #[test]
    fn clip_placed_past_its_own_width_is_still_visible() {
        let geometry = compute_blit_geometry(
            Extent::new(64, 64),
            Point::new(200, 100),
            Rect::default(),
            SCREEN,
        )
        .unwrap();
        assert_eq!(geometry.dst, Rect::new(200, 100, 64, 64));
        assert_eq!(geometry.src, Rect::new(0, 0, 64, 64));
    }

    #[test]
    fn clip_hanging_off_the_bottom_right_keeps_source_origin() {
        let geometry = compute_blit_geometry(
            Extent::new(64, 64),
            Point::new(300, 220),
            Rect::default(),
            SCREEN,
        )
        .unwrap();
        assert_eq!(geometry.dst, Rect::new(300, 220, 20, 20));
        assert_eq!(geometry.src, Rect::new(0, 0, 20, 20));
    }

    #[test]
    fn clip_outside_screen_is_rejected() {
        let result = compute_blit_geometry(
            Extent::new(64, 64),
            Point::new(400, 0),
            Rect::default(),
            SCREEN,
        );
        assert_eq!(result, Err(PlaybackError::GeometryRejected));
    }

    #[test]
    fn extreme_placements_are_rejected_without_overflow() {
        let clip = Extent::new(64, 64);
        let context = Rect::new(16, 16, 288, 208);
        for at in [
            Point::new(i32::MAX - 10, 0),
            Point::new(0, i32::MAX),
            Point::new(i32::MIN, 0),
            Point::new(i32::MIN, i32::MIN),
        ] {
            assert_eq!(
                compute_blit_geometry(clip, at, Rect::default(), SCREEN),
                Err(PlaybackError::GeometryRejected)
            );
            assert_eq!(
                compute_blit_geometry(clip, at, context, SCREEN),
                Err(PlaybackError::GeometryRejected)
            );
        }
    }

    #[test]
    fn huge_clip_extent_is_cropped_to_screen() {
        let geometry = compute_blit_geometry(
            Extent::new(i32::MAX, i32::MAX),
            Point::new(10, 10),
            Rect::default(),
            SCREEN,
        )
        .unwrap();
        assert_eq!(geometry.dst, Rect::new(10, 10, 310, 230));
        assert_eq!(geometry.src, Rect::new(0, 0, 310, 230));
    }

    #[test]
    fn empty_clip_is_rejected() {
        let result =
            compute_blit_geometry(Extent::new(0, 64), Point::new(0, 0), Rect::default(), SCREEN);
        assert_eq!(result, Err(PlaybackError::GeometryRejected));
    }

    #[test]
    fn context_clip_off_screen_is_rejected() {
        let context = Rect::new(500, 500, 10, 10);
        let result =
            compute_blit_geometry(Extent::new(64, 64), Point::new(0, 0), context, SCREEN);
        assert_eq!(result, Err(PlaybackError::GeometryRejected));
    }
}
