//! Sun-and-planets N-body simulation core
//!
//! A registry of bodies (the sun at index 0, planets after it), an Euler-Cromer
//! gravity integrator and a controller that runs, stops, resets, saves and loads
//! the system. Nothing here depends on a windowing or GUI toolkit; a front-end
//! reads body state and calls the controller's operations.

pub mod body;
pub mod config;
pub mod error;
pub mod integrator;
pub mod persistence;
pub mod registry;
pub mod simulation;

pub use body::{parse_number, Body, BodyField, Role};
pub use config::{BodyPreset, SimConfig};
pub use error::{SimError, SimResult};
pub use integrator::{accumulate_forces, gravitational_force, Integrator, DELTA_TIME, G};
pub use persistence::{load_planets, read_planets, save_planets, PlanetRecord};
pub use registry::BodyRegistry;
pub use simulation::{RunState, Sample, SimEvent, Simulation};
