//! Saving and loading planets as headerless CSV
//!
//! One row per planet in registry order, the sun excluded:
//! `xpos, ypos, zpos, xvel, yvel, zvel, radius, mass`

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::body::{validate_planet_baseline, Body};
use crate::error::{SimError, SimResult};
use crate::registry::BodyRegistry;

/// Baseline of one planet as stored on disk
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PlanetRecord {
    pub xpos: f64,
    pub ypos: f64,
    pub zpos: f64,
    pub xvel: f64,
    pub yvel: f64,
    pub zvel: f64,
    pub radius: f64,
    pub mass: f64,
}

impl PlanetRecord {
    pub fn from_body(body: &Body) -> Self {
        let [xpos, ypos, zpos, xvel, yvel, zvel, radius, mass] = body.baseline();
        Self {
            xpos,
            ypos,
            zpos,
            xvel,
            yvel,
            zvel,
            radius,
            mass,
        }
    }

    pub fn position(&self) -> DVec3 {
        DVec3::new(self.xpos, self.ypos, self.zpos)
    }

    pub fn velocity(&self) -> DVec3 {
        DVec3::new(self.xvel, self.yvel, self.zvel)
    }
}

/// Write every planet of `registry` to `path`, replacing the file
pub fn save_planets(registry: &BodyRegistry, path: &Path) -> SimResult<usize> {
    let csv_error = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    for planet in registry.planets() {
        writer
            .serialize(PlanetRecord::from_body(planet))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Saved {} planets to {}", registry.planet_count(), path.display());
    Ok(registry.planet_count())
}

/// Read and validate every row of `path`.
///
/// Any unreadable or malformed row fails the whole read.
pub fn read_planets(path: &Path) -> SimResult<Vec<PlanetRecord>> {
    let csv_error = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<PlanetRecord>().enumerate() {
        let record = result.map_err(csv_error)?;
        validate_planet_baseline(record.radius, record.mass, record.position(), record.velocity())
            .map_err(|err| SimError::MalformedRow {
                path: path.to_path_buf(),
                row: row + 1,
                reason: err.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}

/// Append every planet from `path` to `registry`, or none of them
pub fn load_planets(registry: &mut BodyRegistry, path: &Path) -> SimResult<usize> {
    let records = read_planets(path)?;
    registry.check_room(records.len())?;

    for record in &records {
        registry.add_planet(record.position(), record.velocity(), record.radius, record.mass, None)?;
    }

    log::info!("Loaded {} planets from {}", records.len(), path.display());
    Ok(records.len())
}
