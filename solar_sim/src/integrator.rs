//! Euler-Cromer gravity integrator
//!
//! One step evaluates every pairwise force at the current positions, then updates
//! all momenta, then all positions from the new momenta. Nothing is written until
//! every force is known, so a divergent pair leaves the registry untouched.

use glam::DVec3;

use crate::body::Body;
use crate::error::{SimError, SimResult};
use crate::registry::BodyRegistry;

/// Default gravitational constant (scaled for the sun/planet sizes used here)
pub const G: f64 = 0.1;

/// Default fixed time step
pub const DELTA_TIME: f64 = 0.1;

/// Gravitational force exerted on `p1` by `p2`, attractive toward `p2`
pub fn gravitational_force(g: f64, p1: &Body, p2: &Body) -> Option<DVec3> {
    let r_vec = p1.position - p2.position;
    let r_mag = r_vec.length();
    if r_mag == 0.0 {
        return None;
    }
    let r_hat = r_vec / r_mag;
    let force_mag = g * p1.mass * p2.mass / (r_mag * r_mag);
    Some(-force_mag * r_hat)
}

/// Total force on every body, in registry order
pub fn accumulate_forces(g: f64, bodies: &[Body]) -> SimResult<Vec<DVec3>> {
    let n = bodies.len();
    let mut forces = vec![DVec3::ZERO; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let force = gravitational_force(g, &bodies[i], &bodies[j])
                .ok_or(SimError::DivergentState { first: i, second: j })?;
            forces[i] += force;
            forces[j] -= force;
        }
    }

    Ok(forces)
}

/// Fixed-step integrator with a user-editable gravitational constant
#[derive(Debug, Clone)]
pub struct Integrator {
    g: f64,
    dt: f64,
}

impl Integrator {
    pub fn new(g: f64, dt: f64) -> SimResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::invalid("time step", "has to be finite and positive"));
        }
        let mut integrator = Self { g: G, dt };
        integrator.set_gravitational_constant(g)?;
        Ok(integrator)
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn delta_time(&self) -> f64 {
        self.dt
    }

    /// Replace `G`; rejected values leave the previous one in place
    pub fn set_gravitational_constant(&mut self, g: f64) -> SimResult<()> {
        if !g.is_finite() {
            return Err(SimError::invalid("G", "has to be integer or float"));
        }
        self.g = g;
        Ok(())
    }

    /// Advance every body in the registry by one step of `dt`
    pub fn step(&self, registry: &mut BodyRegistry) -> SimResult<()> {
        let forces = accumulate_forces(self.g, registry.bodies())?;
        let bodies = registry.bodies_mut();

        for (body, force) in bodies.iter_mut().zip(&forces) {
            body.force = *force;
            body.momentum += *force * self.dt;
        }

        for body in bodies.iter_mut() {
            body.position += body.momentum * self.dt / body.mass;
        }

        Ok(())
    }

    /// Kinetic plus pairwise potential energy of the registry
    pub fn total_energy(&self, registry: &BodyRegistry) -> f64 {
        let bodies = registry.bodies();
        let mut kinetic = 0.0;
        let mut potential = 0.0;

        for (i, body_i) in bodies.iter().enumerate() {
            kinetic += body_i.kinetic_energy();

            for body_j in bodies.iter().skip(i + 1) {
                let r = (body_j.position - body_i.position).length();
                if r > 0.0 {
                    potential -= self.g * body_i.mass * body_j.mass / r;
                }
            }
        }

        kinetic + potential
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self { g: G, dt: DELTA_TIME }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn pair(distance: f64, m1: f64, m2: f64) -> BodyRegistry {
        let mut registry = BodyRegistry::with_sun(10, m1, 1.0);
        registry
            .add_planet(DVec3::new(distance, 0.0, 0.0), DVec3::ZERO, 1.0, m2, None)
            .unwrap();
        registry
    }

    #[test]
    fn force_follows_inverse_square_law() {
        let registry = pair(4.0, 3.0, 5.0);
        let bodies = registry.bodies();
        let force = gravitational_force(2.0, &bodies[1], &bodies[0]).unwrap();
        let expected = 2.0 * 3.0 * 5.0 / 16.0;
        assert!((force.length() - expected).abs() < EPS);
        // Planet sits on +x, so it is pulled toward -x
        assert!(force.x < 0.0);
        assert!(force.y.abs() < EPS && force.z.abs() < EPS);
    }

    #[test]
    fn newton_third_law_holds() {
        let registry = pair(3.0, 7.0, 2.0);
        let bodies = registry.bodies();
        let f12 = gravitational_force(1.0, &bodies[0], &bodies[1]).unwrap();
        let f21 = gravitational_force(1.0, &bodies[1], &bodies[0]).unwrap();
        assert!((f12 + f21).length() < EPS);
    }

    #[test]
    fn coincident_bodies_fail_without_mutation() {
        let mut registry = pair(5.0, 10.0, 1.0);
        registry.bodies_mut()[1].position = DVec3::ZERO;
        let before: Vec<_> = registry.iter().map(|b| (b.position, b.momentum)).collect();

        let err = Integrator::default().step(&mut registry).unwrap_err();
        assert!(matches!(err, SimError::DivergentState { first: 0, second: 1 }));

        let after: Vec<_> = registry.iter().map(|b| (b.position, b.momentum)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn positions_use_updated_momentum() {
        let mut registry = pair(10.0, 100.0, 1.0);
        let integrator = Integrator::new(1.0, 0.5).unwrap();
        integrator.step(&mut registry).unwrap();

        // F = 1 * 100 * 1 / 100 = 1 toward the sun, p = -0.5, x = 10 - 0.25
        let planet = &registry.bodies()[1];
        assert!((planet.momentum.x + 0.5).abs() < EPS);
        assert!((planet.position.x - 9.75).abs() < EPS);
        assert!((planet.force.x + 1.0).abs() < EPS);
    }

    #[test]
    fn all_forces_come_from_positions_before_the_step() {
        let mut registry = BodyRegistry::with_sun(10, 50.0, 1.0);
        registry
            .add_planet(DVec3::new(4.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0), 1.0, 2.0, None)
            .unwrap();
        registry
            .add_planet(DVec3::new(-6.0, 1.0, 0.0), DVec3::new(0.5, 0.0, 0.0), 1.0, 3.0, None)
            .unwrap();

        let integrator = Integrator::new(1.0, 0.1).unwrap();
        let expected = accumulate_forces(1.0, registry.bodies()).unwrap();
        integrator.step(&mut registry).unwrap();

        for (body, force) in registry.iter().zip(&expected) {
            assert!((body.force - *force).length() < EPS);
        }
    }

    #[test]
    fn rejected_gravitational_constant_is_kept() {
        let mut integrator = Integrator::default();
        assert!(integrator.set_gravitational_constant(f64::NAN).is_err());
        assert_eq!(integrator.gravitational_constant(), G);
        integrator.set_gravitational_constant(1.0).unwrap();
        assert_eq!(integrator.gravitational_constant(), 1.0);
    }

    #[test]
    fn time_step_must_be_positive() {
        assert!(Integrator::new(1.0, 0.0).is_err());
        assert!(Integrator::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn energy_of_resting_pair_is_potential_only() {
        let registry = pair(2.0, 4.0, 3.0);
        let integrator = Integrator::new(1.0, 0.1).unwrap();
        assert!((integrator.total_energy(&registry) + 6.0).abs() < EPS);
    }
}
