//! Vehicle silhouette
//!
//! The base footprint is the unrotated sprite mask (nose along +X). Each tick
//! it is rotated to the candidate heading and centred on the candidate
//! position to give the `CollisionShape` the detector tests.

use glam::{UVec2, Vec2};

use super::geometry::Rect;
use super::mask::Mask;

/// Slack so that exact right angles do not grow the rotated size by a pixel
const EXTENT_EPSILON: f32 = 1e-3;

/// Unrotated vehicle occupancy mask
#[derive(Debug, Clone)]
pub struct Footprint {
    pub mask: Mask,
}

impl Footprint {
    /// Solid rectangular body
    pub fn rectangle(width: u32, height: u32) -> Self {
        Self {
            mask: Mask::filled(width, height),
        }
    }
}

/// Size of the bounding box of a `size` sprite rotated by `heading` degrees
pub fn rotated_size(size: UVec2, heading: f32) -> UVec2 {
    let (sin, cos) = heading.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = size.x as f32;
    let h = size.y as f32;
    UVec2::new(
        (w * cos + h * sin - EXTENT_EPSILON).ceil().max(0.0) as u32,
        (w * sin + h * cos - EXTENT_EPSILON).ceil().max(0.0) as u32,
    )
}

/// Rotate `base` counter-clockwise on screen by `heading` degrees.
///
/// The result is sized to the rotated bounding box. Every destination pixel
/// centre is mapped back into the base mask and copies the bit it lands on.
pub fn rotate_footprint(base: &Mask, heading: f32) -> Mask {
    let src_size = UVec2::new(base.width(), base.height());
    let dst_size = rotated_size(src_size, heading);
    let src_center = src_size.as_vec2() * 0.5;
    let dst_center = dst_size.as_vec2() * 0.5;
    let (sin, cos) = heading.to_radians().sin_cos();

    Mask::from_fn(dst_size.x, dst_size.y, |x, y| {
        let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
        // Inverse of the on-screen CCW rotation (Y down)
        let s = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + src_center;
        if s.x < 0.0 || s.y < 0.0 {
            return false;
        }
        base.get(s.x.floor() as u32, s.y.floor() as u32)
    })
}

/// The vehicle silhouette placed in world space for one tick
#[derive(Debug, Clone)]
pub struct CollisionShape {
    pub mask: Mask,
    /// World-space rect of `mask`, centred on the pose
    pub rect: Rect,
}

impl CollisionShape {
    pub fn at(footprint: &Footprint, pos: Vec2, heading: f32) -> Self {
        let mask = rotate_footprint(&footprint.mask, heading);
        let rect = Rect::centered_at(pos, UVec2::new(mask.width(), mask.height()));
        Self { mask, rect }
    }
}
