//! Window clip-region bookkeeping.
//!
//! A shape handed to the window is a list of rectangles. The region keeps
//! the rectangles clipped to the window's own rectangle, but only its
//! bounding box ever goes on the wire: the compositor's region command
//! takes a single rectangle, so the advertisement is deliberately lossy.

use crate::util::geometry::Rect;

/// A clip region: shape rectangles clipped to the window rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipRegion {
    rects: Vec<Rect>,
}

impl ClipRegion {
    /// Build a region from shape rectangles, clipped against `clip`.
    /// Rectangles that fall entirely outside the clip are discarded.
    pub fn from_shape(shape: &[Rect], clip: Rect) -> Self {
        let rects = shape
            .iter()
            .map(|r| r.intersect(&clip))
            .filter(|r| !r.is_empty())
            .collect();
        Self { rects }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bounding box of the region; the only thing that is transmitted.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.union(r))
    }
}
