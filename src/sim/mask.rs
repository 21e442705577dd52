//! Occupancy masks
//!
//! A `Mask` is a fixed-size 2D bit grid, true where a shape is solid.
//! Overlap tests translate one mask into the other's local frame and AND the
//! bits inside the intersection of their extents.

use glam::IVec2;

use super::geometry::Rect;

const WORD_BITS: usize = u64::BITS as usize;

/// A 2D boolean occupancy grid stored as a flat bitset (row-major)
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<u64>,
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("set", &self.count())
            .finish()
    }
}

impl Mask {
    /// An empty mask (no bits set)
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize * height as usize).div_ceil(WORD_BITS);
        Self {
            width,
            height,
            bits: vec![0; len],
        }
    }

    /// A mask with every bit set
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by evaluating `solid(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from per-pixel alpha values (row-major).
    ///
    /// A pixel is solid when its alpha is strictly above `threshold`.
    /// Returns `None` if `alpha` does not hold exactly `width * height` values.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        if alpha.len() != width as usize * height as usize {
            return None;
        }
        Some(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty_size(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u64) {
        let i = y as usize * self.width as usize + x as usize;
        (i / WORD_BITS, 1u64 << (i % WORD_BITS))
    }

    /// Bit at (x, y); out-of-range reads are unset
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.index(x, y);
        self.bits[word] & bit != 0
    }

    /// Set or clear the bit at (x, y); out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.index(x, y);
        if value {
            self.bits[word] |= bit;
        } else {
            self.bits[word] &= !bit;
        }
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Smallest rect containing every set bit (None when nothing is set)
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut min = IVec2::MAX;
        let mut max = IVec2::MIN;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    let p = IVec2::new(x as i32, y as i32);
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        (min.x <= max.x).then(|| Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1))
    }

    /// First pixel (in this mask's frame) where `other`, placed with its
    /// top-left at `offset`, shares a set bit with this mask.
    ///
    /// Scans row by row, left to right.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let ours = Rect::new(0, 0, self.width as i32, self.height as i32);
        let theirs = Rect::new(offset.x, offset.y, other.width as i32, other.height as i32);
        // Disjoint extents never need a per-pixel pass
        let area = ours.intersection(&theirs)?;

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if self.get(x as u32, y as u32)
                    && other.get((x - offset.x) as u32, (y - offset.y) as u32)
                {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// Whether any set bit overlaps `other` placed at `offset`
    #[inline]
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap(other, offset).is_some()
    }
}
