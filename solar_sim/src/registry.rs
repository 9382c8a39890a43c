//! Ordered collection of the bodies in the system
//!
//! Index 0 always holds the sun. Planets follow in insertion order, which is also
//! the display, edit and integration order. Only the last planet can be removed.

use glam::DVec3;

use crate::body::{validate_baseline, validate_planet_baseline, Body, BodyField};
use crate::error::{SimError, SimResult};

pub struct BodyRegistry {
    bodies: Vec<Body>,
    max_bodies: usize,
    /// Number given to the next planet; never rewound on delete
    next_planet_number: usize,
}

impl BodyRegistry {
    /// Empty registry holding at most `max_bodies` bodies, sun included
    pub fn new(max_bodies: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(max_bodies),
            max_bodies,
            next_planet_number: 1,
        }
    }

    /// Registry seeded with a sun at the origin
    pub fn with_sun(max_bodies: usize, sun_mass: f64, sun_radius: f64) -> Self {
        let mut registry = Self::new(max_bodies);
        registry.add_sun(sun_mass, sun_radius);
        registry
    }

    /// Insert the sun at index 0.
    ///
    /// # Panics
    /// If a sun is already present or the values are not a valid body.
    pub fn add_sun(&mut self, mass: f64, radius: f64) {
        assert!(self.bodies.is_empty(), "the system already has a sun");
        assert!(
            validate_baseline(radius, mass, DVec3::ZERO, DVec3::ZERO).is_ok(),
            "sun needs a positive finite mass and a non-negative radius"
        );
        self.bodies.push(Body::sun(mass, radius));
        log::info!("Created sun (mass {}, radius {})", mass, radius);
    }

    /// Append a planet and return its index.
    ///
    /// Without a `name` the planet is called `Planet N`, N counting every planet ever added.
    pub fn add_planet(
        &mut self,
        position: DVec3,
        velocity: DVec3,
        radius: f64,
        mass: f64,
        name: Option<&str>,
    ) -> SimResult<usize> {
        self.check_room(1)?;
        validate_planet_baseline(radius, mass, position, velocity)?;

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Planet {}", self.next_planet_number),
        };
        self.next_planet_number += 1;
        self.bodies
            .push(Body::planet(position, velocity, radius, mass, &name));
        log::info!("Created {}", name);
        Ok(self.bodies.len() - 1)
    }

    /// Fail with `CapacityExceeded` unless `extra` more bodies fit
    pub fn check_room(&self, extra: usize) -> SimResult<()> {
        if self.bodies.len() + extra > self.max_bodies {
            log::warn!("Maximum number of bodies in the system ({})", self.max_bodies);
            return Err(SimError::CapacityExceeded {
                max: self.max_bodies,
            });
        }
        Ok(())
    }

    /// Remove the most recently added planet. The sun is never removed.
    pub fn delete_last_planet(&mut self) -> Option<Body> {
        if self.bodies.len() <= 1 {
            log::debug!("Only the sun is left, nothing to delete");
            return None;
        }
        let removed = self.bodies.pop();
        if let Some(body) = &removed {
            log::info!("Deleted {}", body.label());
        }
        removed
    }

    pub fn set_parameter(&mut self, index: usize, field: BodyField, value: f64) -> SimResult<()> {
        let body = self
            .bodies
            .get_mut(index)
            .ok_or_else(|| SimError::invalid("body index", format!("no body at index {}", index)))?;

        match body.set_field(field, value) {
            Ok(()) => {
                log::debug!("Set {} of {} to {}", field, body.label(), value);
                Ok(())
            }
            Err(err) => {
                log::warn!("Rejected edit of {} on {}: {}", field, body.label(), err);
                Err(err)
            }
        }
    }

    /// Put every body back on its baseline without changing membership
    pub fn reset_all(&mut self) {
        for body in &mut self.bodies {
            body.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    pub fn is_full(&self) -> bool {
        self.bodies.len() >= self.max_bodies
    }

    pub fn planet_count(&self) -> usize {
        self.bodies.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn sun(&self) -> Option<&Body> {
        self.bodies.first()
    }

    pub fn planets(&self) -> &[Body] {
        self.bodies.get(1..).unwrap_or(&[])
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn total_momentum(&self) -> DVec3 {
        self.bodies.iter().map(|b| b.momentum).sum()
    }

    pub fn center_of_mass(&self) -> DVec3 {
        let mut total_mass = 0.0;
        let mut com = DVec3::ZERO;

        for body in &self.bodies {
            com += body.position * body.mass;
            total_mass += body.mass;
        }

        if total_mass > 0.0 {
            com / total_mass
        } else {
            DVec3::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BodyRegistry {
        BodyRegistry::with_sun(3, 10000.0, 10.0)
    }

    fn add(registry: &mut BodyRegistry, x: f64) -> SimResult<usize> {
        registry.add_planet(DVec3::new(x, 0.0, 0.0), DVec3::new(0.0, 0.0, 1.0), 1.0, 0.01, None)
    }

    #[test]
    fn sun_is_seeded_at_index_zero() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.sun().unwrap().is_sun());
        assert!(registry.planets().is_empty());
    }

    #[test]
    #[should_panic(expected = "already has a sun")]
    fn second_sun_is_a_programming_error() {
        let mut registry = registry();
        registry.add_sun(1.0, 1.0);
    }

    #[test]
    fn planets_append_in_order() {
        let mut registry = registry();
        assert_eq!(add(&mut registry, 20.0).unwrap(), 1);
        assert_eq!(add(&mut registry, 30.0).unwrap(), 2);
        assert_eq!(registry.get(1).unwrap().label(), "Planet 1");
        assert_eq!(registry.get(2).unwrap().label(), "Planet 2");
        assert_eq!(registry.planet_count(), 2);
    }

    #[test]
    fn add_beyond_capacity_leaves_registry_unchanged() {
        let mut registry = registry();
        add(&mut registry, 20.0).unwrap();
        add(&mut registry, 30.0).unwrap();
        let err = add(&mut registry, 40.0).unwrap_err();
        assert!(matches!(err, SimError::CapacityExceeded { max: 3 }));
        assert_eq!(registry.len(), 3);
        assert!(registry.is_full());
    }

    #[test]
    fn add_with_invalid_mass_is_rejected() {
        let mut registry = registry();
        let err = registry
            .add_planet(DVec3::X * 20.0, DVec3::ZERO, 1.0, 0.0, None)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn planet_on_the_origin_is_rejected() {
        let mut registry = registry();
        let err = registry
            .add_planet(DVec3::ZERO, DVec3::Z, 1.0, 0.01, None)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn center_of_mass_is_mass_weighted() {
        let mut registry = BodyRegistry::with_sun(3, 3.0, 1.0);
        registry
            .add_planet(DVec3::new(4.0, 0.0, 0.0), DVec3::ZERO, 1.0, 1.0, None)
            .unwrap();
        assert_eq!(registry.center_of_mass(), DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn delete_with_only_sun_is_a_no_op() {
        let mut registry = registry();
        assert!(registry.delete_last_planet().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_removes_the_tail_and_names_are_not_reused() {
        let mut registry = registry();
        add(&mut registry, 20.0).unwrap();
        add(&mut registry, 30.0).unwrap();
        let removed = registry.delete_last_planet().unwrap();
        assert_eq!(removed.label(), "Planet 2");

        add(&mut registry, 40.0).unwrap();
        assert_eq!(registry.get(2).unwrap().label(), "Planet 3");
    }

    #[test]
    fn rejected_mass_edit_keeps_prior_value() {
        let mut registry = registry();
        add(&mut registry, 20.0).unwrap();
        assert!(registry.set_parameter(1, BodyField::Mass, -1.0).is_err());
        assert_eq!(registry.get(1).unwrap().mass, 0.01);
        assert!(registry.set_parameter(0, BodyField::Mass, 0.0).is_err());
        assert_eq!(registry.sun().unwrap().mass, 10000.0);
    }

    #[test]
    fn edit_of_missing_body_is_rejected() {
        let mut registry = registry();
        assert!(registry.set_parameter(5, BodyField::Radius, 1.0).is_err());
    }

    #[test]
    fn reset_restores_baseline_momentum() {
        let mut registry = registry();
        add(&mut registry, 20.0).unwrap();
        registry.set_parameter(1, BodyField::Mass, 2.0).unwrap();
        {
            let body = &mut registry.bodies_mut()[1];
            body.position = DVec3::new(1.0, 2.0, 3.0);
            body.momentum = DVec3::new(9.0, 9.0, 9.0);
        }
        registry.reset_all();
        let body = registry.get(1).unwrap();
        assert_eq!(body.position, DVec3::new(20.0, 0.0, 0.0));
        assert_eq!(body.momentum, DVec3::new(0.0, 0.0, 2.0));
    }
}
