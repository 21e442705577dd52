//! Deterministic simulation module
//!
//! Vehicle kinematics and collision detection. This module must stay pure:
//! - One fixed tick per call, no wall-clock time
//! - Track geometry is read-only after startup
//! - No rendering, input polling or platform dependencies

pub mod collision;
pub mod footprint;
pub mod geometry;
pub mod mask;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use collision::{Collision, Verdict, check, check_shape};
pub use footprint::{CollisionShape, Footprint, rotate_footprint};
pub use geometry::{Rect, Segment};
pub use mask::Mask;
pub use state::{SimPhase, SimulationState};
pub use tick::step;
pub use track::{OffTrackRegion, TrackError, TrackGeometry, TrackSpec};
pub use vehicle::{ControlInput, Vehicle, VehicleParams, integrate};
