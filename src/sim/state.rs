//! Simulation state
//!
//! Everything one run needs, passed explicitly to `tick::step`. No globals.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collision::Collision;
use super::footprint::Footprint;
use super::track::TrackGeometry;
use super::vehicle::Vehicle;
use crate::config::SimConfig;

/// Whether the run is still going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimPhase {
    Running,
    /// The vehicle left the track; it stays frozen at its last committed pose
    Terminated(Collision),
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub vehicle: Vehicle,
    /// Shared read-only by every tick
    pub track: Arc<TrackGeometry>,
    /// Unrotated vehicle silhouette
    pub footprint: Footprint,
    /// Ticks simulated so far
    pub tick: u64,
    pub phase: SimPhase,
}

impl SimulationState {
    pub fn new(config: &SimConfig, track: Arc<TrackGeometry>) -> Self {
        let mut vehicle = Vehicle::new(config.start_pos, config.screen, config.vehicle);
        vehicle.heading = crate::normalize_degrees(config.start_heading);
        Self {
            vehicle,
            track,
            footprint: Footprint::rectangle(config.car_size.x, config.car_size.y),
            tick: 0,
            phase: SimPhase::Running,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }
}
