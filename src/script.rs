//! Recorded control input
//!
//! A script is a list of held-input segments, e.g.
//! `[{"accelerate": true, "ticks": 60}, {"ticks": 30}]`, expanded to one
//! `ControlInput` per tick.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::sim::ControlInput;

/// Hold `input` for `ticks` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(flatten)]
    pub input: ControlInput,
    pub ticks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        log::info!(
            "Loaded script {} ({} steps, {} ticks)",
            path.display(),
            script.steps.len(),
            script.total_ticks()
        );
        Ok(script)
    }

    /// Append a segment
    pub fn hold(mut self, input: ControlInput, ticks: u32) -> Self {
        self.steps.push(ScriptStep { input, ticks });
        self
    }

    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| s.ticks as u64).sum()
    }

    /// One input per tick, in order
    pub fn inputs(&self) -> impl Iterator<Item = ControlInput> + '_ {
        self.steps
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.input, s.ticks as usize))
    }
}
