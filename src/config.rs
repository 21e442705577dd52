//! Simulation setup
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! built-in constants.

use std::path::{Path, PathBuf};

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::VehicleParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Screen, start pose and vehicle constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World extent used for the out-of-bounds pre-check
    pub screen: Vec2,
    /// Ticks per second when pacing in real time
    pub tick_rate: u32,
    pub start_pos: Vec2,
    /// Degrees
    pub start_heading: f32,
    /// Unrotated sprite size
    pub car_size: UVec2,
    pub vehicle: VehicleParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            tick_rate: TICK_RATE,
            start_pos: Vec2::new(START_X, START_Y),
            start_heading: 0.0,
            car_size: UVec2::new(CAR_WIDTH, CAR_HEIGHT),
            vehicle: VehicleParams::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Seconds per tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be > 0".into()));
        }
        if self.vehicle.max_speed <= 0.0 {
            return Err(ConfigError::Invalid("vehicle.max_speed must be > 0".into()));
        }
        if self.car_size.x == 0 || self.car_size.y == 0 {
            return Err(ConfigError::Invalid("car_size must be non-zero".into()));
        }
        if self.screen.x <= 0.0 || self.screen.y <= 0.0 {
            return Err(ConfigError::Invalid("screen must be positive".into()));
        }
        let on_screen = (0.0..=self.screen.x).contains(&self.start_pos.x)
            && (0.0..=self.screen.y).contains(&self.start_pos.y);
        if !on_screen {
            return Err(ConfigError::Invalid(format!(
                "start_pos ({}, {}) is outside the {}x{} screen",
                self.start_pos.x, self.start_pos.y, self.screen.x, self.screen.y
            )));
        }
        if !(0.0..=1.0).contains(&self.vehicle.natural_deceleration) {
            log::warn!(
                "natural_deceleration {} outside [0, 1], coasting will not settle",
                self.vehicle.natural_deceleration
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimConfig::default();
        assert_eq!(config.vehicle.max_speed, 10.0);
        assert_eq!(config.vehicle.acceleration, 0.1);
        assert_eq!(config.start_pos, Vec2::new(100.0, 650.0));
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{"vehicle": {"max_speed": 6.0}}"#).unwrap();
        assert_eq!(config.vehicle.max_speed, 6.0);
        assert_eq!(config.vehicle.brake_deceleration, BRAKE_DECELERATION);
        assert_eq!(config.screen, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = SimConfig::from_json(r#"{"tick_rate": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_start_off_screen() {
        let err = SimConfig::from_json(r#"{"start_pos": [1600.0, 650.0]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SimConfig::from_json(r#"{"start_pos": [100.0, -1.0]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SimConfig::from_json(r#"{"screen": [0.0, 800.0]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        // Edges are on screen, matching the inclusive bounds pre-check
        let config = SimConfig::from_json(r#"{"start_pos": [1500.0, 0.0]}"#).unwrap();
        assert_eq!(config.start_pos, Vec2::new(1500.0, 0.0));
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("trackside-config-{}.json", std::process::id()));
        let mut config = SimConfig::default();
        config.start_heading = 45.0;
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }
}
