//! Static track geometry
//!
//! The drivable corridor is bounded by straight rails; inside it, off-track
//! regions (grass) are positioned occupancy masks. Geometry is built once at
//! startup, either from the built-in layout or from a JSON `TrackSpec`, and is
//! never mutated afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Rect, Segment};
use super::mask::Mask;
use crate::assets;
use crate::consts::*;

/// Alpha strictly above this counts as solid when reading images
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

/// Largest accepted magnitude for region offsets and mask dimensions, so that
/// placed extents stay well inside `i32`
pub const MAX_COORDINATE: i32 = 1 << 20;

/// Startup-time geometry problems
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid track description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode {path}: {source}")]
    Png {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },
    #[error("unsupported image {path}: {reason}")]
    UnsupportedImage { path: PathBuf, reason: String },
    #[error("region {region} refers to unknown mask '{mask}'")]
    UnknownMask { region: usize, mask: String },
    #[error("mask '{0}' has zero width or height")]
    EmptyMask(String),
    #[error("polygon mask '{0}' needs at least 3 points")]
    BadPolygon(String),
    #[error("boundary {0} has zero length")]
    DegenerateBoundary(usize),
    #[error("{0} is outside the supported coordinate range")]
    OutOfRange(String),
}

/// A positioned non-drivable area
#[derive(Debug, Clone)]
pub struct OffTrackRegion {
    pub name: String,
    /// Solid where the surface is not drivable
    pub mask: Arc<Mask>,
    /// World-space position of the mask's top-left pixel
    pub offset: IVec2,
}

impl OffTrackRegion {
    /// World-space extent of the mask
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.mask.width() as i32,
            self.mask.height() as i32,
        )
    }
}

/// Everything the collision detector tests against
#[derive(Debug, Clone, Default)]
pub struct TrackGeometry {
    /// Straight rails, typically the top and bottom edge of the corridor
    pub boundaries: Vec<Segment>,
    /// Tested in order; all of them every tick
    pub regions: Vec<OffTrackRegion>,
}

impl TrackGeometry {
    /// The built-in track: rails at y=100 and y=700, and two rows of grass
    /// wedges anchored at x=0 and x=800.
    pub fn standard() -> Self {
        let top = Arc::new(rasterize_polygon(
            700,
            200,
            &[Vec2::new(0.0, 0.0), Vec2::new(700.0, 0.0), Vec2::new(700.0, 200.0)],
        ));
        let bottom = Arc::new(rasterize_polygon(
            700,
            200,
            &[Vec2::new(700.0, 0.0), Vec2::new(700.0, 200.0), Vec2::new(0.0, 200.0)],
        ));
        let region = |name: &str, mask: &Arc<Mask>, x, y| OffTrackRegion {
            name: name.to_string(),
            mask: Arc::clone(mask),
            offset: IVec2::new(x, y),
        };

        let width = SCREEN_WIDTH as i32;
        Self {
            boundaries: vec![
                Segment::new(IVec2::new(0, TOP_RAIL_Y), IVec2::new(width, TOP_RAIL_Y)),
                Segment::new(IVec2::new(0, BOTTOM_RAIL_Y), IVec2::new(width, BOTTOM_RAIL_Y)),
            ],
            regions: vec![
                region("top_grass_1", &top, 0, 200),
                region("top_grass_2", &top, 800, 200),
                region("bottom_grass_1", &bottom, 0, 400),
                region("bottom_grass_2", &bottom, 800, 400),
            ],
        }
    }

    /// Load a JSON track description; relative image paths resolve against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let text = std::fs::read_to_string(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: TrackSpec = serde_json::from_str(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let track = spec.build(base_dir)?;
        log::info!(
            "Loaded track {} ({} boundaries, {} regions)",
            path.display(),
            track.boundaries.len(),
            track.regions.len()
        );
        Ok(track)
    }
}

/// Where a region mask comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskSource {
    /// Image file; alpha above `threshold` is solid, opaque images are fully solid
    Png {
        path: PathBuf,
        #[serde(default = "default_threshold")]
        threshold: u8,
    },
    /// Filled polygon in mask-local pixel coordinates
    Polygon {
        width: u32,
        height: u32,
        points: Vec<Vec2>,
    },
    /// Fully solid rectangle
    Rect { width: u32, height: u32 },
}

fn default_threshold() -> u8 {
    DEFAULT_ALPHA_THRESHOLD
}

/// One placement of a named mask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSpec {
    pub mask: String,
    pub offset: IVec2,
}

/// Serialized track description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSpec {
    pub boundaries: Vec<Segment>,
    /// Named masks; a mask placed several times is loaded once
    pub masks: BTreeMap<String, MaskSource>,
    pub regions: Vec<RegionSpec>,
}

impl TrackSpec {
    /// Resolve every mask and check the geometry preconditions
    pub fn build(&self, base_dir: &Path) -> Result<TrackGeometry, TrackError> {
        if let Some(i) = self.boundaries.iter().position(Segment::is_degenerate) {
            return Err(TrackError::DegenerateBoundary(i));
        }
        for (i, segment) in self.boundaries.iter().enumerate() {
            if !in_range(segment.start) || !in_range(segment.end) {
                return Err(TrackError::OutOfRange(format!("boundary {}", i)));
            }
        }

        let mut masks = BTreeMap::new();
        for (name, source) in &self.masks {
            let fits = match source {
                MaskSource::Polygon { width, height, .. } | MaskSource::Rect { width, height } => {
                    size_in_range(*width, *height)
                }
                MaskSource::Png { .. } => true,
            };
            if !fits {
                return Err(TrackError::OutOfRange(format!("mask '{}' size", name)));
            }
            let mask = match source {
                MaskSource::Png { path, threshold } => {
                    let path = if path.is_absolute() {
                        path.clone()
                    } else {
                        base_dir.join(path)
                    };
                    assets::load_png_mask(&path, *threshold)?
                }
                MaskSource::Polygon {
                    width,
                    height,
                    points,
                } => {
                    if points.len() < 3 {
                        return Err(TrackError::BadPolygon(name.clone()));
                    }
                    rasterize_polygon(*width, *height, points)
                }
                MaskSource::Rect { width, height } => Mask::filled(*width, *height),
            };
            if mask.is_empty_size() {
                return Err(TrackError::EmptyMask(name.clone()));
            }
            if !size_in_range(mask.width(), mask.height()) {
                return Err(TrackError::OutOfRange(format!("mask '{}' size", name)));
            }
            masks.insert(name.as_str(), Arc::new(mask));
        }

        let regions = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let mask = masks
                    .get(spec.mask.as_str())
                    .ok_or_else(|| TrackError::UnknownMask {
                        region: i,
                        mask: spec.mask.clone(),
                    })?;
                if !in_range(spec.offset) {
                    return Err(TrackError::OutOfRange(format!("region {} offset", i)));
                }
                let region = OffTrackRegion {
                    name: format!("{}#{}", spec.mask, i),
                    mask: Arc::clone(mask),
                    offset: spec.offset,
                };
                log::debug!("Region {} covers {:?}", region.name, region.rect());
                Ok::<_, TrackError>(region)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackGeometry {
            boundaries: self.boundaries.clone(),
            regions,
        })
    }
}

#[inline]
fn in_range(p: IVec2) -> bool {
    (-MAX_COORDINATE..=MAX_COORDINATE).contains(&p.x)
        && (-MAX_COORDINATE..=MAX_COORDINATE).contains(&p.y)
}

#[inline]
fn size_in_range(width: u32, height: u32) -> bool {
    width <= MAX_COORDINATE as u32 && height <= MAX_COORDINATE as u32
}

/// Fill a polygon into a `width` x `height` mask (even-odd rule, sampled at
/// pixel centres)
pub fn rasterize_polygon(width: u32, height: u32, points: &[Vec2]) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let mut inside = false;
        let mut j = points.len().wrapping_sub(1);
        for (i, a) in points.iter().enumerate() {
            let b = points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_triangle() {
        let mask = rasterize_polygon(
            10,
            10,
            &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
        );
        // Upper-right half, diagonal included
        assert!(mask.get(9, 0));
        assert!(!mask.get(0, 9));
        assert_eq!(mask.count(), 55);
    }

    #[test]
    fn test_standard_layout() {
        let track = TrackGeometry::standard();
        assert_eq!(track.boundaries.len(), 2);
        assert_eq!(track.regions.len(), 4);
        // The same wedge is shared by both placements
        assert!(Arc::ptr_eq(&track.regions[0].mask, &track.regions[1].mask));
        assert_eq!(track.regions[3].rect(), Rect::new(800, 400, 700, 200));
    }

    #[test]
    fn test_track_spec_shares_masks() {
        let json = r#"{
            "boundaries": [{"start": [0, 50], "end": [400, 50]}],
            "masks": {
                "block": {"kind": "rect", "width": 20, "height": 10},
                "tri": {"kind": "polygon", "width": 8, "height": 8,
                        "points": [[0, 0], [8, 0], [0, 8]]}
            },
            "regions": [
                {"mask": "block", "offset": [10, 60]},
                {"mask": "block", "offset": [100, 60]},
                {"mask": "tri", "offset": [200, 60]}
            ]
        }"#;
        let spec: TrackSpec = serde_json::from_str(json).unwrap();
        let track = spec.build(Path::new(".")).unwrap();

        assert_eq!(track.regions.len(), 3);
        assert!(Arc::ptr_eq(&track.regions[0].mask, &track.regions[1].mask));
        assert_eq!(track.regions[1].offset, IVec2::new(100, 60));
        assert_eq!(track.regions[0].mask.count(), 200);
    }

    #[test]
    fn test_track_spec_rejects_bad_geometry() {
        let unknown = TrackSpec {
            regions: vec![RegionSpec {
                mask: "missing".into(),
                offset: IVec2::ZERO,
            }],
            ..Default::default()
        };
        assert!(matches!(
            unknown.build(Path::new(".")),
            Err(TrackError::UnknownMask { region: 0, .. })
        ));

        let degenerate = TrackSpec {
            boundaries: vec![Segment::new(IVec2::new(5, 5), IVec2::new(5, 5))],
            ..Default::default()
        };
        assert!(matches!(
            degenerate.build(Path::new(".")),
            Err(TrackError::DegenerateBoundary(0))
        ));

        let mut masks = BTreeMap::new();
        masks.insert("flat".to_string(), MaskSource::Rect { width: 0, height: 4 });
        let empty = TrackSpec {
            masks,
            ..Default::default()
        };
        assert!(matches!(
            empty.build(Path::new(".")),
            Err(TrackError::EmptyMask(_))
        ));

        let mut masks = BTreeMap::new();
        masks.insert(
            "line".to_string(),
            MaskSource::Polygon {
                width: 4,
                height: 4,
                points: vec![Vec2::ZERO, Vec2::ONE],
            },
        );
        let line = TrackSpec {
            masks,
            ..Default::default()
        };
        assert!(matches!(
            line.build(Path::new(".")),
            Err(TrackError::BadPolygon(_))
        ));
    }

    #[test]
    fn test_track_spec_rejects_extreme_coordinates() {
        let json = r#"{
            "masks": {"block": {"kind": "rect", "width": 20, "height": 10}},
            "regions": [
                {"mask": "block", "offset": [10, 60]},
                {"mask": "block", "offset": [2147483647, -2147483648]}
            ]
        }"#;
        let spec: TrackSpec = serde_json::from_str(json).unwrap();
        assert!(matches!(
            spec.build(Path::new(".")),
            Err(TrackError::OutOfRange(what)) if what == "region 1 offset"
        ));

        // Rejected before anything is allocated
        let mut masks = BTreeMap::new();
        masks.insert(
            "huge".to_string(),
            MaskSource::Rect {
                width: u32::MAX,
                height: u32::MAX,
            },
        );
        let huge = TrackSpec {
            masks,
            ..Default::default()
        };
        assert!(matches!(
            huge.build(Path::new(".")),
            Err(TrackError::OutOfRange(_))
        ));

        let far_rail = TrackSpec {
            boundaries: vec![Segment::new(IVec2::new(0, 100), IVec2::new(i32::MAX, 100))],
            ..Default::default()
        };
        assert!(matches!(
            far_rail.build(Path::new(".")),
            Err(TrackError::OutOfRange(_))
        ));

        // The limit itself is accepted
        let edge = TrackSpec {
            regions: vec![RegionSpec {
                mask: "block".into(),
                offset: IVec2::splat(-MAX_COORDINATE),
            }],
            masks: spec.masks.clone(),
            ..Default::default()
        };
        assert!(edge.build(Path::new(".")).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = TrackGeometry::load(Path::new("/nonexistent/track.json")).unwrap_err();
        assert!(matches!(err, TrackError::Io { .. }));
    }
}
