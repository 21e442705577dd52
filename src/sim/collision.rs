//! Collision detection against static track geometry
//!
//! Two tests, both fatal: the collision rectangle clipped against the straight
//! rails, then the rotated vehicle mask overlapped with every off-track region.
//! Rails are straight, so rectangle clipping is exact there; grass edges are
//! irregular, so regions need the per-pixel test.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::footprint::{CollisionShape, Footprint};
use super::track::TrackGeometry;

/// What the vehicle ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Collision {
    /// Candidate position left the screen
    OutOfBounds,
    /// Collision rect touches boundary segment `index`
    Boundary { index: usize },
    /// Vehicle mask overlaps off-track region `region` at `point`
    /// (region-local pixel coordinates)
    OffTrack { region: usize, point: IVec2 },
}

/// Outcome of checking a candidate pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Clear,
    Collided(Collision),
}

impl Verdict {
    #[inline]
    pub fn is_clear(&self) -> bool {
        matches!(self, Verdict::Clear)
    }

    #[inline]
    pub fn collision(&self) -> Option<Collision> {
        match self {
            Verdict::Clear => None,
            Verdict::Collided(c) => Some(*c),
        }
    }
}

/// Check a candidate pose against the track.
///
/// Boundaries are tested before regions, each in registration order; the first
/// hit is reported.
pub fn check(
    candidate: Vec2,
    heading: f32,
    footprint: &Footprint,
    track: &TrackGeometry,
) -> Verdict {
    let shape = CollisionShape::at(footprint, candidate, heading);
    check_shape(&shape, track)
}

/// Same as [`check`] for an already placed shape
pub fn check_shape(shape: &CollisionShape, track: &TrackGeometry) -> Verdict {
    if let Some(index) = boundary_hit(shape, track) {
        log::debug!("Boundary {} hit by rect {:?}", index, shape.rect);
        return Verdict::Collided(Collision::Boundary { index });
    }
    if let Some((region, point)) = off_track_hit(shape, track) {
        log::debug!(
            "Off-track region {} ({}) hit at {}",
            region,
            track.regions[region].name,
            point
        );
        return Verdict::Collided(Collision::OffTrack { region, point });
    }
    Verdict::Clear
}

/// Index of the first boundary segment crossing the collision rect
pub fn boundary_hit(shape: &CollisionShape, track: &TrackGeometry) -> Option<usize> {
    track
        .boundaries
        .iter()
        .position(|segment| shape.rect.clip_line(segment).is_some())
}

/// First off-track region overlapping the vehicle mask, with the overlapping
/// pixel in the region's frame
pub fn off_track_hit(shape: &CollisionShape, track: &TrackGeometry) -> Option<(usize, IVec2)> {
    track.regions.iter().enumerate().find_map(|(i, region)| {
        let offset = shape.rect.top_left() - region.offset;
        region.mask.overlap(&shape.mask, offset).map(|p| (i, p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CAR_HEIGHT, CAR_WIDTH, START_X, START_Y};
    use crate::sim::geometry::Segment;
    use crate::sim::mask::Mask;
    use crate::sim::track::OffTrackRegion;
    use std::sync::Arc;

    fn car() -> Footprint {
        Footprint::rectangle(CAR_WIDTH, CAR_HEIGHT)
    }

    fn rail_at(y: i32) -> TrackGeometry {
        TrackGeometry {
            boundaries: vec![Segment::new(IVec2::new(0, y), IVec2::new(1500, y))],
            regions: Vec::new(),
        }
    }

    #[test]
    fn test_start_pose_is_clear() {
        let verdict = check(
            Vec2::new(START_X, START_Y),
            0.0,
            &car(),
            &TrackGeometry::standard(),
        );
        assert_eq!(verdict, Verdict::Clear);
    }

    #[test]
    fn test_rect_over_rail_collides() {
        // Car centred 5px below a rail at y=100: rect spans y 90..120
        let verdict = check(Vec2::new(300.0, 105.0), 0.0, &car(), &rail_at(100));
        assert_eq!(verdict, Verdict::Collided(Collision::Boundary { index: 0 }));
    }

    #[test]
    fn test_rail_just_clear() {
        // Rect spans y 101..131, one pixel below the rail
        let verdict = check(Vec2::new(300.0, 116.0), 0.0, &car(), &rail_at(100));
        assert!(verdict.is_clear());
        // Turning sideways grows the rect vertically into the rail
        let verdict = check(Vec2::new(300.0, 116.0), 90.0, &car(), &rail_at(100));
        assert!(!verdict.is_clear());
    }

    #[test]
    fn test_region_far_away_is_clear() {
        let track = TrackGeometry {
            boundaries: Vec::new(),
            regions: vec![OffTrackRegion {
                name: "grass".into(),
                mask: Arc::new(Mask::filled(100, 100)),
                offset: IVec2::new(1000, 100),
            }],
        };
        assert!(check(Vec2::new(100.0, 650.0), 0.0, &car(), &track).is_clear());
    }

    #[test]
    fn test_region_pixel_overlap() {
        // Only the lower-left corner pixel of a 100x100 region is grass
        let mut mask = Mask::new(100, 100);
        mask.set(0, 99, true);
        let track = TrackGeometry {
            boundaries: Vec::new(),
            regions: vec![OffTrackRegion {
                name: "corner".into(),
                mask: Arc::new(mask),
                offset: IVec2::new(500, 500),
            }],
        };

        // Rect overlaps the region's box but not the grass pixel
        let inside_box = Vec2::new(560.0, 560.0);
        assert!(check(inside_box, 0.0, &car(), &track).is_clear());

        // Rect 475..525 x 585..615 covers pixel (500, 599)
        let verdict = check(Vec2::new(500.0, 600.0), 0.0, &car(), &track);
        assert_eq!(
            verdict,
            Verdict::Collided(Collision::OffTrack {
                region: 0,
                point: IVec2::new(0, 99)
            })
        );
    }

    #[test]
    fn test_box_overlap_without_grass_is_clear() {
        // Grass fills the lower-right triangle of a 60x60 tile
        let tile = crate::sim::track::rasterize_polygon(
            60,
            60,
            &[Vec2::new(60.0, 0.0), Vec2::new(60.0, 60.0), Vec2::new(0.0, 60.0)],
        );
        let track = TrackGeometry {
            boundaries: Vec::new(),
            regions: vec![OffTrackRegion {
                name: "diag".into(),
                mask: Arc::new(tile),
                offset: IVec2::ZERO,
            }],
        };
        // A small square in the empty upper-left corner: its bounding box
        // overlaps the tile but no grass pixel
        let small = Footprint::rectangle(10, 10);
        assert!(check(Vec2::new(15.0, 15.0), 0.0, &small, &track).is_clear());
        assert!(!check(Vec2::new(45.0, 45.0), 0.0, &small, &track).is_clear());
    }

    #[test]
    fn test_boundaries_checked_before_regions() {
        let mut track = rail_at(650);
        track.regions.push(OffTrackRegion {
            name: "under".into(),
            mask: Arc::new(Mask::filled(200, 200)),
            offset: IVec2::new(0, 550),
        });
        let verdict = check(Vec2::new(100.0, 650.0), 0.0, &car(), &track);
        assert_eq!(verdict, Verdict::Collided(Collision::Boundary { index: 0 }));
        assert_eq!(verdict.collision(), Some(Collision::Boundary { index: 0 }));
        assert_eq!(Verdict::Clear.collision(), None);
    }
}
