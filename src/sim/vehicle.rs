//! Vehicle kinematics
//!
//! Speed/heading integration with exponential coast-down and a trigonometric
//! position update. The model knows nothing about the track: `update` only
//! proposes a candidate position, the caller decides whether to commit it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::normalize_degrees;

/// Control flags for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl ControlInput {
    /// No flags held
    pub const IDLE: Self = Self {
        accelerate: false,
        brake: false,
        steer_left: false,
        steer_right: false,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Per-vehicle constants (all rates are per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub max_speed: f32,
    pub acceleration: f32,
    pub brake_deceleration: f32,
    /// Fraction of speed lost per coasting tick
    pub natural_deceleration: f32,
    /// Degrees per tick at `max_speed`
    pub max_rotation_speed: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            brake_deceleration: BRAKE_DECELERATION,
            natural_deceleration: NATURAL_DECELERATION,
            max_rotation_speed: MAX_ROTATION_SPEED,
        }
    }
}

impl VehicleParams {
    /// Fastest reverse speed (a negative number)
    #[inline]
    pub fn max_reverse_speed(&self) -> f32 {
        -self.max_speed / 3.0
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Committed position (screen space, Y down)
    pub pos: Vec2,
    /// Heading in degrees, 0 = +X, counter-clockwise on screen
    pub heading: f32,
    /// Signed speed in pixels per tick (negative = reversing)
    pub speed: f32,
    pub params: VehicleParams,
    /// Screen extent used by the cheap out-of-bounds pre-check
    pub bounds: Vec2,
}

impl Vehicle {
    pub fn new(pos: Vec2, bounds: Vec2, params: VehicleParams) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            params,
            bounds,
        }
    }

    /// Advance speed and heading from `input` and return the candidate position.
    ///
    /// Speed and heading are updated in place; the position is not.
    pub fn update(&mut self, input: ControlInput) -> Vec2 {
        let p = self.params;

        if input.accelerate {
            self.speed = (self.speed + p.acceleration).min(p.max_speed);
        } else if input.brake {
            self.speed = (self.speed - p.brake_deceleration).max(p.max_reverse_speed());
        } else if self.speed.abs() > REST_SPEED {
            self.speed *= 1.0 - p.natural_deceleration;
        } else {
            self.speed = 0.0;
        }

        let rate = self.rotation_rate();
        // Both flags may fire in the same tick and partially cancel
        let reversing = self.speed < 0.0;
        if input.steer_left {
            self.heading += if reversing { -rate } else { rate };
        }
        if input.steer_right {
            self.heading += if reversing { rate } else { -rate };
        }
        self.heading = normalize_degrees(self.heading);

        integrate(self.pos, self.speed, self.heading)
    }

    /// Degrees per tick the car can turn at its current speed
    #[inline]
    pub fn rotation_rate(&self) -> f32 {
        let p = &self.params;
        if p.max_speed <= 0.0 {
            return 0.0;
        }
        (p.max_rotation_speed * self.speed.abs() / p.max_speed).min(p.max_rotation_speed)
    }

    /// Screen-bounds pre-check, inclusive on both edges
    #[inline]
    pub fn in_bounds(&self, candidate: Vec2) -> bool {
        candidate.x >= 0.0
            && candidate.x <= self.bounds.x
            && candidate.y >= 0.0
            && candidate.y <= self.bounds.y
    }

    /// Accept a candidate position that passed every collision test
    #[inline]
    pub fn commit(&mut self, candidate: Vec2) {
        self.pos = candidate;
    }
}

/// Next position for a pose moving at `speed` along `heading` (degrees).
///
/// Y is subtracted because screen space grows downward.
#[inline]
pub fn integrate(pos: Vec2, speed: f32, heading: f32) -> Vec2 {
    let rad = heading.to_radians();
    Vec2::new(pos.x + speed * rad.cos(), pos.y - speed * rad.sin())
}
