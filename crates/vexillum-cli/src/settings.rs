//! On-disk simulation file: cloth parameters plus how to drive them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vexillum_engine::GridSizing;
use vexillum_solver::ClothConfig;
use vexillum_types::constants::{DEFAULT_DT, MAX_STABLE_DT};
use vexillum_types::{VexillumError, VexillumResult};

/// Top-level TOML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationFile {
    pub cloth: ClothConfig,
    pub run: RunSettings,
}

/// How the headless driver feeds the stepper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub steps: u32,
    /// Requested timestep (seconds).
    pub dt: f32,
    /// Upper bound applied to `dt` before stepping.
    pub max_dt: f32,
    /// UI wind slider value (0 = calm).
    pub wind_force: f32,
    pub pole_rotation_degrees: f32,
    /// Rebuild the grid for this `width / height` before running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
    pub sizing: GridSizing,
    /// Record every n-th frame when exporting.
    pub frame_stride: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            steps: 300,
            dt: DEFAULT_DT,
            max_dt: MAX_STABLE_DT,
            wind_force: 1.0,
            pole_rotation_degrees: 0.0,
            aspect_ratio: None,
            sizing: GridSizing::default(),
            frame_stride: 1,
        }
    }
}

impl RunSettings {
    /// The timestep actually passed to the stepper.
    pub fn effective_dt(&self) -> f32 {
        self.dt.min(self.max_dt)
    }

    pub fn validate(&self) -> VexillumResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "run.dt must be positive, got {}",
                self.dt
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "run.max_dt must be positive, got {}",
                self.max_dt
            )));
        }
        if !(self.wind_force.is_finite() && self.wind_force >= 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "run.wind_force must be non-negative, got {}",
                self.wind_force
            )));
        }
        if !self.pole_rotation_degrees.is_finite() {
            return Err(VexillumError::InvalidConfig(
                "run.pole_rotation_degrees must be finite".into(),
            ));
        }
        if let Some(aspect) = self.aspect_ratio {
            if !(aspect.is_finite() && aspect > 0.0) {
                return Err(VexillumError::InvalidConfig(format!(
                    "run.aspect_ratio must be positive, got {aspect}"
                )));
            }
        }
        Ok(())
    }
}

impl SimulationFile {
    pub fn from_toml(content: &str) -> VexillumResult<Self> {
        let file: Self =
            toml::from_str(content).map_err(|e| VexillumError::Serialization(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> VexillumResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> VexillumResult<String> {
        toml::to_string_pretty(self).map_err(|e| VexillumError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> VexillumResult<()> {
        self.cloth.validate()?;
        self.run.validate()
    }
}
