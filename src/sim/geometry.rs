//! Pixel-grid rectangles and line segments

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle covering pixels `[x, x+w) x [y, y+h)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A rect of `size` whose centre is `center` rounded to the nearest pixel
    pub fn centered_at(center: Vec2, size: UVec2) -> Self {
        let c = center.round().as_ivec2();
        let size = size.as_ivec2();
        Self::new(c.x - size.x / 2, c.y - size.y / 2, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }
    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }
    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }
    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
    #[inline]
    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Overlapping area of two rects, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (left < right && top < bottom).then(|| Rect::new(left, top, right - left, bottom - top))
    }

    /// Clip a segment to the pixels this rect covers.
    ///
    /// Returns the clipped endpoints, or `None` if the segment misses the rect.
    /// The rect is treated as the closed box `[x, x+w-1] x [y, y+h-1]`.
    pub fn clip_line(&self, segment: &Segment) -> Option<(Vec2, Vec2)> {
        if self.is_empty() {
            return None;
        }
        let min = Vec2::new(self.left() as f32, self.top() as f32);
        let max = Vec2::new((self.right() - 1) as f32, (self.bottom() - 1) as f32);

        // Liang-Barsky
        let p0 = segment.start.as_vec2();
        let d = segment.end.as_vec2() - p0;
        let checks = [
            (-d.x, p0.x - min.x),
            (d.x, max.x - p0.x),
            (-d.y, p0.y - min.y),
            (d.y, max.y - p0.y),
        ];

        let (mut t0, mut t1) = (0.0f32, 1.0f32);
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
                if t0 > t1 {
                    return None;
                }
            }
        }

        Some((p0 + d * t0, p0 + d * t1))
    }
}

/// A straight line segment between two pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: IVec2,
    pub end: IVec2,
}

impl Segment {
    pub const fn new(start: IVec2, end: IVec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
