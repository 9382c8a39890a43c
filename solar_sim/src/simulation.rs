//! The simulation controller
//!
//! Owns the registry, integrator and clock, and exposes the operations a front-end
//! calls: edits, run/stop/reset, save/load and a `tick` driven once per frame.

use std::collections::VecDeque;
use std::path::Path;

use glam::DVec3;

use crate::body::{parse_number, Body, BodyField};
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::integrator::Integrator;
use crate::persistence;
use crate::registry::BodyRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Notifications for the front-end, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    BodyAdded(usize),
    BodyRemoved(usize),
    /// Bodies are back on their baselines; trails and plots should be cleared
    Reset,
    Started,
    Stopped,
    /// A step hit a divergent state and the run was stopped
    Halted(String),
    GravityChanged(f64),
    Saved(usize),
    Loaded(usize),
}

/// One telemetry point for the first planet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub force: f64,
    pub distance: f64,
}

pub struct Simulation {
    config: SimConfig,
    registry: BodyRegistry,
    integrator: Integrator,
    state: RunState,
    time: f64,
    telemetry: VecDeque<Sample>,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let integrator = Integrator::new(config.gravitational_constant, config.delta_time)?;
        let registry = BodyRegistry::with_sun(config.max_bodies, config.sun.mass, config.sun.radius);

        Ok(Self {
            telemetry: VecDeque::with_capacity(config.telemetry_capacity),
            config,
            registry,
            integrator,
            state: RunState::Stopped,
            time: 0.0,
            events: Vec::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn bodies(&self) -> &[Body] {
        self.registry.bodies()
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.registry.get(index)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.integrator.gravitational_constant()
    }

    pub fn delta_time(&self) -> f64 {
        self.integrator.delta_time()
    }

    pub fn total_energy(&self) -> f64 {
        self.integrator.total_energy(&self.registry)
    }

    pub fn total_momentum(&self) -> DVec3 {
        self.registry.total_momentum()
    }

    pub fn telemetry(&self) -> impl Iterator<Item = &Sample> {
        self.telemetry.iter()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Registry edits
    // ---------------------------------------------------------------------

    pub fn add_planet(
        &mut self,
        position: DVec3,
        velocity: DVec3,
        radius: f64,
        mass: f64,
    ) -> SimResult<usize> {
        let index = self.registry.add_planet(position, velocity, radius, mass, None)?;
        self.events.push(SimEvent::BodyAdded(index));
        Ok(index)
    }

    /// Reset, then add a planet one sun radius further out than the last one,
    /// moving on a circular orbit around the sun.
    pub fn add_default_planet(&mut self) -> SimResult<usize> {
        self.registry.check_room(1)?;

        let (sun_mass, sun_radius) = match self.registry.sun() {
            Some(sun) => (sun.mass, sun.radius),
            None => (self.config.sun.mass, self.config.sun.radius),
        };
        let nplanets = self.registry.planet_count() as f64;
        let distance = sun_radius * (nplanets + 2.0);
        if distance <= 0.0 {
            return Err(SimError::invalid("sun radius", "has to be positive to place planets"));
        }
        let speed = (self.gravitational_constant() * sun_mass / distance).sqrt();
        if !speed.is_finite() {
            return Err(SimError::invalid("G", "no circular orbit exists for a negative G"));
        }

        self.reset();
        let preset = self.config.new_planet;
        self.add_planet(
            DVec3::new(distance, 0.0, 0.0),
            DVec3::new(0.0, 0.0, speed),
            preset.radius,
            preset.mass,
        )
    }

    pub fn delete_last_planet(&mut self) -> Option<Body> {
        let index = self.registry.len().checked_sub(1)?;
        let removed = self.registry.delete_last_planet()?;
        self.events.push(SimEvent::BodyRemoved(index));
        if self.registry.len() < 2 {
            self.stop();
        }
        Some(removed)
    }

    /// Overwrite one baseline field and reset so the displayed state follows it
    pub fn set_parameter(&mut self, index: usize, field: BodyField, value: f64) -> SimResult<()> {
        self.registry.set_parameter(index, field, value)?;
        self.reset();
        Ok(())
    }

    /// `set_parameter` from raw text input
    pub fn set_parameter_text(&mut self, index: usize, field: BodyField, input: &str) -> SimResult<()> {
        let value = parse_number(input)?;
        self.set_parameter(index, field, value)
    }

    pub fn set_gravitational_constant(&mut self, g: f64) -> SimResult<()> {
        if let Err(err) = self.integrator.set_gravitational_constant(g) {
            log::warn!("Rejected G = {}: {}", g, err);
            return Err(err);
        }
        log::info!("Gravitational constant set to {}", g);
        self.events.push(SimEvent::GravityChanged(g));
        Ok(())
    }

    pub fn set_gravitational_constant_text(&mut self, input: &str) -> SimResult<()> {
        let g = parse_number(input)?;
        self.set_gravitational_constant(g)
    }

    // ---------------------------------------------------------------------
    // Run state
    // ---------------------------------------------------------------------

    /// Start integrating. Refused while the sun is alone.
    pub fn start(&mut self) -> bool {
        if self.registry.len() < 2 {
            log::debug!("Nothing orbits the sun yet, not starting");
            return false;
        }
        if self.state == RunState::Stopped {
            self.state = RunState::Running;
            self.events.push(SimEvent::Started);
            log::info!("Simulation started at t = {:.2}", self.time);
        }
        true
    }

    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            self.events.push(SimEvent::Stopped);
            log::info!("Simulation stopped at t = {:.2}", self.time);
        }
    }

    /// Start when stopped, stop when running
    pub fn toggle(&mut self) -> RunState {
        match self.state {
            RunState::Running => self.stop(),
            RunState::Stopped => {
                self.start();
            }
        }
        self.state
    }

    /// Stop, put every body back on its baseline and rewind the clock
    pub fn reset(&mut self) {
        self.stop();
        self.registry.reset_all();
        self.time = 0.0;
        self.telemetry.clear();
        self.events.push(SimEvent::Reset);
        log::debug!("Simulation reset");
    }

    /// Advance one step if running. Returns whether a step was taken.
    ///
    /// A divergent state stops the run and leaves every body as it was.
    pub fn tick(&mut self) -> SimResult<bool> {
        if self.state != RunState::Running {
            return Ok(false);
        }

        if let Err(err) = self.integrator.step(&mut self.registry) {
            log::error!("Step at t = {:.2} failed: {}", self.time, err);
            self.state = RunState::Stopped;
            self.events.push(SimEvent::Halted(err.to_string()));
            return Err(err);
        }

        self.time += self.integrator.delta_time();
        self.record_sample();
        Ok(true)
    }

    fn record_sample(&mut self) {
        let (Some(sun), Some(planet)) = (self.registry.get(0), self.registry.get(1)) else {
            return;
        };
        if self.config.telemetry_capacity == 0 {
            return;
        }
        let sample = Sample {
            time: self.time,
            force: planet.force.length(),
            distance: (planet.position - sun.position).length(),
        };
        if self.telemetry.len() == self.config.telemetry_capacity {
            self.telemetry.pop_front();
        }
        self.telemetry.push_back(sample);
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    pub fn save(&mut self, path: &Path) -> SimResult<usize> {
        let saved = persistence::save_planets(&self.registry, path)?;
        self.events.push(SimEvent::Saved(saved));
        Ok(saved)
    }

    /// Append the planets stored in `path`; on any error nothing is added
    pub fn load(&mut self, path: &Path) -> SimResult<usize> {
        let first = self.registry.len();
        let loaded = persistence::load_planets(&mut self.registry, path)?;
        self.reset();
        for index in first..self.registry.len() {
            self.events.push(SimEvent::BodyAdded(index));
        }
        self.events.push(SimEvent::Loaded(loaded));
        Ok(loaded)
    }

    pub fn save_default(&mut self) -> SimResult<usize> {
        let path = self.config.system_file.clone();
        self.save(&path)
    }

    pub fn load_default(&mut self) -> SimResult<usize> {
        let path = self.config.system_file.clone();
        self.load(&path)
    }
}
