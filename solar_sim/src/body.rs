//! Bodies taking part in the simulation: the sun and its planets

use std::fmt;

use glam::DVec3;

use crate::error::{SimError, SimResult};

/// What a body is. Behaviour differences between the two are data, not dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sun,
    Planet,
}

/// A point mass with an editable baseline and a derived dynamical state
#[derive(Debug, Clone)]
pub struct Body {
    pub role: Role,
    pub name: Option<String>,
    pub radius: f64,
    pub mass: f64,
    /// Current position, advanced every step
    pub position: DVec3,
    /// Current momentum (mass * velocity), advanced every step
    pub momentum: DVec3,
    pub initial_position: DVec3,
    pub initial_velocity: DVec3,
    /// Total force from the most recent step, zero after a reset
    pub force: DVec3,
}

impl Body {
    pub fn sun(mass: f64, radius: f64) -> Self {
        Self::with_role(Role::Sun, None, DVec3::ZERO, DVec3::ZERO, radius, mass)
    }

    pub fn planet(position: DVec3, velocity: DVec3, radius: f64, mass: f64, name: &str) -> Self {
        Self::with_role(
            Role::Planet,
            Some(name.to_string()),
            position,
            velocity,
            radius,
            mass,
        )
    }

    fn with_role(
        role: Role,
        name: Option<String>,
        position: DVec3,
        velocity: DVec3,
        radius: f64,
        mass: f64,
    ) -> Self {
        Self {
            role,
            name,
            radius,
            mass,
            position,
            momentum: velocity * mass,
            initial_position: position,
            initial_velocity: velocity,
            force: DVec3::ZERO,
        }
    }

    pub fn is_sun(&self) -> bool {
        self.role == Role::Sun
    }

    /// Suns glow, planets are lit
    pub fn emissive(&self) -> bool {
        self.is_sun()
    }

    pub fn label(&self) -> &str {
        match (&self.name, self.role) {
            (Some(name), _) => name,
            (None, Role::Sun) => "Sun",
            (None, Role::Planet) => "Planet",
        }
    }

    pub fn velocity(&self) -> DVec3 {
        self.momentum / self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.momentum.length_squared() / (2.0 * self.mass)
    }

    /// Put the body back on its baseline
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.momentum = self.initial_velocity * self.mass;
        self.force = DVec3::ZERO;
    }

    /// Baseline values in persisted column order
    pub fn baseline(&self) -> [f64; 8] {
        let p = self.initial_position;
        let v = self.initial_velocity;
        [p.x, p.y, p.z, v.x, v.y, v.z, self.radius, self.mass]
    }

    pub fn summary(&self) -> String {
        let p = self.initial_position;
        let v = self.initial_velocity;
        format!(
            "pos: ({}, {}, {})  vel: ({}, {}, {}) radius: {}, mass: {}",
            p.x, p.y, p.z, v.x, v.y, v.z, self.radius, self.mass
        )
    }

    /// Overwrite one baseline field, leaving the body untouched on rejection
    pub fn set_field(&mut self, field: BodyField, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            return Err(SimError::invalid(field.label(), "has to be a finite number"));
        }

        match field {
            BodyField::PositionX | BodyField::PositionY | BodyField::PositionZ => {
                let mut position = self.initial_position;
                position[field.axis()] = value;
                if position.length() == 0.0 {
                    return Err(SimError::invalid(
                        field.label(),
                        "position cannot be moved onto the origin",
                    ));
                }
                self.initial_position = position;
            }
            BodyField::VelocityX | BodyField::VelocityY | BodyField::VelocityZ => {
                self.initial_velocity[field.axis()] = value;
            }
            BodyField::Radius => {
                if value < 0.0 {
                    return Err(SimError::invalid(field.label(), "radius cannot be negative"));
                }
                self.radius = value;
            }
            BodyField::Mass => {
                if value <= 0.0 {
                    return Err(SimError::invalid(field.label(), "mass has to be positive"));
                }
                self.mass = value;
            }
        }
        Ok(())
    }
}

/// Check the values a new body would be built from
pub fn validate_baseline(radius: f64, mass: f64, position: DVec3, velocity: DVec3) -> SimResult<()> {
    if !position.is_finite() {
        return Err(SimError::invalid("position", "has to be finite"));
    }
    if !velocity.is_finite() {
        return Err(SimError::invalid("velocity", "has to be finite"));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(SimError::invalid("radius", "has to be finite and not negative"));
    }
    if !mass.is_finite() || mass <= 0.0 {
        return Err(SimError::invalid("mass", "has to be finite and positive"));
    }
    Ok(())
}

/// Like [`validate_baseline`], and the planet may not start on the origin where the sun sits
pub fn validate_planet_baseline(
    radius: f64,
    mass: f64,
    position: DVec3,
    velocity: DVec3,
) -> SimResult<()> {
    validate_baseline(radius, mass, position, velocity)?;
    if position.length() == 0.0 {
        return Err(SimError::invalid("position", "a planet cannot start on the origin"));
    }
    Ok(())
}

/// The user-editable baseline fields of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyField {
    PositionX,
    PositionY,
    PositionZ,
    VelocityX,
    VelocityY,
    VelocityZ,
    Radius,
    Mass,
}

impl BodyField {
    pub const ALL: [BodyField; 8] = [
        BodyField::PositionX,
        BodyField::PositionY,
        BodyField::PositionZ,
        BodyField::VelocityX,
        BodyField::VelocityY,
        BodyField::VelocityZ,
        BodyField::Radius,
        BodyField::Mass,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BodyField::PositionX => "xpos",
            BodyField::PositionY => "ypos",
            BodyField::PositionZ => "zpos",
            BodyField::VelocityX => "xvel",
            BodyField::VelocityY => "yvel",
            BodyField::VelocityZ => "zvel",
            BodyField::Radius => "radius",
            BodyField::Mass => "mass",
        }
    }

    fn axis(self) -> usize {
        match self {
            BodyField::PositionX | BodyField::VelocityX => 0,
            BodyField::PositionY | BodyField::VelocityY => 1,
            _ => 2,
        }
    }

    /// Current baseline value of this field on `body`
    pub fn read(self, body: &Body) -> f64 {
        match self {
            BodyField::PositionX | BodyField::PositionY | BodyField::PositionZ => {
                body.initial_position[self.axis()]
            }
            BodyField::VelocityX | BodyField::VelocityY | BodyField::VelocityZ => {
                body.initial_velocity[self.axis()]
            }
            BodyField::Radius => body.radius,
            BodyField::Mass => body.mass,
        }
    }
}

impl fmt::Display for BodyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse raw text input into a finite number
pub fn parse_number(input: &str) -> SimResult<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| SimError::invalid("input", format!("{:?} has to be integer or float", input.trim())))?;
    if !value.is_finite() {
        return Err(SimError::invalid("input", "has to be a finite number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> Body {
        Body::planet(DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 2.0), 1.0, 0.5, "Planet 1")
    }

    #[test]
    fn new_planet_derives_momentum_from_velocity() {
        let body = earth();
        assert_eq!(body.momentum, DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(body.velocity(), DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(body.label(), "Planet 1");
        assert!(!body.emissive());
    }

    #[test]
    fn sun_sits_at_origin_at_rest() {
        let sun = Body::sun(10000.0, 10.0);
        assert!(sun.is_sun());
        assert!(sun.emissive());
        assert_eq!(sun.position, DVec3::ZERO);
        assert_eq!(sun.momentum, DVec3::ZERO);
        assert_eq!(sun.label(), "Sun");
    }

    #[test]
    fn non_positive_mass_keeps_previous_value() {
        let mut body = earth();
        assert!(body.set_field(BodyField::Mass, 0.0).is_err());
        assert!(body.set_field(BodyField::Mass, -3.0).is_err());
        assert_eq!(body.mass, 0.5);
        body.set_field(BodyField::Mass, 2.0).unwrap();
        assert_eq!(body.mass, 2.0);
    }

    #[test]
    fn position_edit_onto_origin_is_rejected() {
        let mut body = earth();
        let err = body.set_field(BodyField::PositionX, 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }));
        assert_eq!(body.initial_position, DVec3::new(10.0, 0.0, 0.0));

        // Zeroing one component is fine while another keeps the body off the origin
        body.set_field(BodyField::PositionY, 4.0).unwrap();
        body.set_field(BodyField::PositionX, 0.0).unwrap();
        assert_eq!(body.initial_position, DVec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut body = earth();
        assert!(body.set_field(BodyField::VelocityY, f64::NAN).is_err());
        assert!(body.set_field(BodyField::Radius, f64::INFINITY).is_err());
        assert!(body.set_field(BodyField::Radius, -1.0).is_err());
        assert_eq!(body.initial_velocity, DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(body.radius, 1.0);
    }

    #[test]
    fn edits_touch_the_baseline_only() {
        let mut body = earth();
        body.set_field(BodyField::VelocityX, 3.0).unwrap();
        assert_eq!(body.initial_velocity.x, 3.0);
        assert_eq!(BodyField::VelocityX.read(&body), 3.0);
        assert_eq!(body.momentum, DVec3::new(0.0, 0.0, 1.0));

        body.reset();
        assert_eq!(body.momentum, DVec3::new(1.5, 0.0, 1.0));
    }

    #[test]
    fn parse_number_accepts_integers_and_floats() {
        assert_eq!(parse_number("3").unwrap(), 3.0);
        assert_eq!(parse_number(" -2.5e1 ").unwrap(), -25.0);
        assert!(parse_number("ten").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn summary_lists_baseline() {
        let body = earth();
        assert_eq!(
            body.summary(),
            "pos: (10, 0, 0)  vel: (0, 0, 2) radius: 1, mass: 0.5"
        );
    }
}
