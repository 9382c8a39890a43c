//! Simulation settings, loadable from YAML.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! ```yaml
//! gravitational_constant: 0.1   # user-editable at runtime
//! delta_time: 0.1               # fixed step, not editable at runtime
//! max_bodies: 10                # sun included
//! frame_rate: 24                # ticks per second of the driver
//! telemetry_capacity: 2000
//! system_file: solar_system.csv
//! sun:
//!   mass: 10000.0
//!   radius: 10.0
//! new_planet:
//!   mass: 0.01
//!   radius: 1.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::integrator::{DELTA_TIME, G};

/// Mass and radius of a body created by the system itself
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BodyPreset {
    pub mass: f64,
    pub radius: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub gravitational_constant: f64,
    pub delta_time: f64,
    pub max_bodies: usize,
    pub frame_rate: u32,
    pub telemetry_capacity: usize,
    pub system_file: PathBuf,
    pub sun: BodyPreset,
    pub new_planet: BodyPreset,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            delta_time: DELTA_TIME,
            max_bodies: 10,
            frame_rate: 24,
            telemetry_capacity: 2000,
            system_file: PathBuf::from("solar_system.csv"),
            sun: BodyPreset {
                mass: 10000.0,
                radius: 10.0,
            },
            new_planet: BodyPreset {
                mass: 0.01,
                radius: 1.0,
            },
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.gravitational_constant.is_finite() {
            return Err(config_error("gravitational_constant has to be finite"));
        }
        if !self.delta_time.is_finite() || self.delta_time <= 0.0 {
            return Err(config_error("delta_time has to be finite and positive"));
        }
        if self.max_bodies == 0 {
            return Err(config_error("max_bodies has to leave room for the sun"));
        }
        if self.frame_rate == 0 {
            return Err(config_error("frame_rate has to be positive"));
        }
        for (name, preset) in [("sun", &self.sun), ("new_planet", &self.new_planet)] {
            if !preset.mass.is_finite() || preset.mass <= 0.0 {
                return Err(config_error(format!("{}.mass has to be finite and positive", name)));
            }
            if !preset.radius.is_finite() || preset.radius < 0.0 {
                return Err(config_error(format!("{}.radius cannot be negative", name)));
            }
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> SimError {
    SimError::Config(message.into())
}
