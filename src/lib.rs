//! Trackside - a steerable car on a bounded 2D track
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, occupancy masks, collision verdicts)
//! - `assets`: Image files to occupancy masks
//! - `config`: Data-driven vehicle and screen setup
//! - `script`: Recorded control input for headless runs

pub mod assets;
pub mod config;
pub mod script;
pub mod sim;

pub use config::SimConfig;
pub use script::InputScript;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Maximum ticks per frame when pacing in real time
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen (world) dimensions, origin top-left, Y down
    pub const SCREEN_WIDTH: f32 = 1500.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Vehicle sprite size in pixels (nose points along +X)
    pub const CAR_WIDTH: u32 = 50;
    pub const CAR_HEIGHT: u32 = 30;

    /// Start pose
    pub const START_X: f32 = 100.0;
    pub const START_Y: f32 = 650.0;

    /// Vehicle defaults (per tick, not per second)
    pub const MAX_SPEED: f32 = 10.0;
    pub const ACCELERATION: f32 = 0.1;
    pub const BRAKE_DECELERATION: f32 = 0.2;
    pub const NATURAL_DECELERATION: f32 = 0.05;
    /// Degrees per tick at full speed
    pub const MAX_ROTATION_SPEED: f32 = 3.0;
    /// Below this magnitude a coasting car snaps to rest
    pub const REST_SPEED: f32 = 0.1;

    /// Track rails (top and bottom edge of the corridor)
    pub const TOP_RAIL_Y: i32 = 100;
    pub const BOTTOM_RAIL_Y: i32 = 700;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed shortest rotation from `from` to `to`, in degrees within [-180, 180)
#[cfg(test)]
pub(crate) fn angle_delta_degrees(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}
