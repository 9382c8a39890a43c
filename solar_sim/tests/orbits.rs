use glam::DVec3;
use solar_sim::{BodyField, RunState, SimConfig, SimError, SimEvent, Simulation};

/// Sun of mass 10000 at the origin with G = 1 and dt = 0.1
fn unit_gravity_system() -> Simulation {
    let config = SimConfig {
        gravitational_constant: 1.0,
        delta_time: 0.1,
        ..SimConfig::default()
    };
    Simulation::new(config).unwrap()
}

/// Planet on a circular orbit of radius 10 around the unit-gravity sun
fn circular_orbit() -> Simulation {
    let mut sim = unit_gravity_system();
    let speed = (1.0_f64 * 10000.0 / 10.0).sqrt();
    sim.add_planet(DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 0.0, speed), 1.0, 1.0)
        .unwrap();
    sim
}

fn run(sim: &mut Simulation, steps: usize) {
    assert!(sim.start());
    for _ in 0..steps {
        assert!(sim.tick().unwrap());
    }
}

fn scratch_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("solar_sim_it_{}_{}.csv", name, std::process::id()))
}

// ==================================================================================
// Orbits
// ==================================================================================

#[test]
fn first_step_bends_toward_the_sun() {
    let mut sim = circular_orbit();
    run(&mut sim, 1);

    let planet = sim.body(1).unwrap();
    // Centripetal pull along -x, tangential drift along +z
    assert!(planet.position.x < 10.0);
    assert!((planet.position.x - 9.0).abs() < 1e-9);
    assert!((planet.position.z - 0.1 * 1000.0_f64.sqrt()).abs() < 1e-9);
    assert_eq!(planet.position.y, 0.0);
}

#[test]
fn circular_orbit_stays_near_its_radius() {
    let mut sim = circular_orbit();
    assert!(sim.start());
    for _ in 0..2000 {
        sim.tick().unwrap();
        let sun = sim.body(0).unwrap().position;
        let planet = sim.body(1).unwrap().position;
        let distance = (planet - sun).length();
        assert!(distance > 7.0 && distance < 13.0, "distance drifted to {}", distance);
    }
}

#[test]
fn energy_stays_bounded() {
    let mut sim = circular_orbit();
    let initial = sim.total_energy();
    run(&mut sim, 2000);
    let relative = ((sim.total_energy() - initial) / initial).abs();
    assert!(relative < 0.15, "energy drifted by {}", relative);
}

#[test]
fn total_momentum_is_conserved() {
    let mut sim = unit_gravity_system();
    sim.add_planet(DVec3::new(20.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 22.0), 1.0, 3.0)
        .unwrap();
    sim.add_planet(DVec3::new(0.0, 5.0, -35.0), DVec3::new(15.0, 0.0, 0.0), 2.0, 8.0)
        .unwrap();
    sim.add_planet(DVec3::new(-50.0, 0.0, 3.0), DVec3::new(0.0, 4.0, -14.0), 1.0, 0.5)
        .unwrap();

    let initial = sim.total_momentum();
    run(&mut sim, 500);
    let drift = (sim.total_momentum() - initial).length();
    assert!(drift < 1e-8 * initial.length().max(1.0), "momentum drifted by {}", drift);
}

#[test]
fn reset_reproduces_baseline_momentum() {
    let mut sim = circular_orbit();
    sim.add_default_planet().unwrap();
    run(&mut sim, 50);
    sim.reset();

    for body in sim.bodies() {
        assert_eq!(body.position, body.initial_position);
        assert_eq!(body.momentum, body.mass * body.initial_velocity);
        assert_eq!(body.force, DVec3::ZERO);
    }
}

// ==================================================================================
// Registry edits
// ==================================================================================

#[test]
fn add_beyond_maximum_reports_capacity() {
    let mut sim = unit_gravity_system();
    for _ in 1..sim.config().max_bodies {
        sim.add_default_planet().unwrap();
    }
    let before = sim.bodies().len();
    let err = sim.add_default_planet().unwrap_err();
    assert!(matches!(err, SimError::CapacityExceeded { max: 10 }));
    assert_eq!(sim.bodies().len(), before);
}

#[test]
fn non_positive_mass_keeps_previous_mass() {
    let mut sim = circular_orbit();
    for bad in [0.0, -1.0] {
        assert!(sim.set_parameter(1, BodyField::Mass, bad).is_err());
        assert!(sim.set_parameter(0, BodyField::Mass, bad).is_err());
    }
    assert_eq!(sim.body(1).unwrap().mass, 1.0);
    assert_eq!(sim.body(0).unwrap().mass, 10000.0);
}

#[test]
fn delete_never_removes_the_sun() {
    let mut sim = circular_orbit();
    assert!(sim.delete_last_planet().is_some());
    assert!(sim.delete_last_planet().is_none());
    assert_eq!(sim.bodies().len(), 1);
    assert!(sim.body(0).unwrap().is_sun());
}

#[test]
fn edits_notify_the_front_end() {
    let mut sim = unit_gravity_system();
    sim.drain_events();
    sim.add_default_planet().unwrap();
    assert_eq!(sim.drain_events(), vec![SimEvent::Reset, SimEvent::BodyAdded(1)]);

    sim.start();
    sim.delete_last_planet();
    assert_eq!(
        sim.drain_events(),
        vec![SimEvent::Started, SimEvent::BodyRemoved(1), SimEvent::Stopped]
    );
}

// ==================================================================================
// Persistence
// ==================================================================================

#[test]
fn save_then_load_round_trips_planets() {
    let mut original = unit_gravity_system();
    original.add_default_planet().unwrap();
    original.add_default_planet().unwrap();
    original
        .add_planet(DVec3::new(-12.5, 3.25, 0.1), DVec3::new(1.0 / 3.0, -2.0, 7.5), 0.75, 42.0)
        .unwrap();
    run(&mut original, 10);

    let path = scratch_file("round_trip");
    assert_eq!(original.save(&path).unwrap(), 3);

    let mut restored = unit_gravity_system();
    let loaded = restored.load(&path);
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.unwrap(), 3);

    assert_eq!(restored.bodies().len(), original.bodies().len());
    for (a, b) in original.bodies().iter().zip(restored.bodies()).skip(1) {
        assert!((a.initial_position - b.initial_position).length() < 1e-12);
        assert!((a.initial_velocity - b.initial_velocity).length() < 1e-12);
        assert!((a.radius - b.radius).abs() < 1e-12);
        assert!((a.mass - b.mass).abs() < 1e-12);
        assert_eq!(a.label(), b.label());
    }
    assert_eq!(restored.state(), RunState::Stopped);
}

#[test]
fn failed_load_leaves_registry_unchanged() {
    let path = scratch_file("bad_load");
    std::fs::write(&path, "20,0,0,0,0,1,1,0.01\nnot,a,planet\n").unwrap();

    let mut sim = circular_orbit();
    let result = sim.load(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.unwrap_err().is_persistence());
    assert_eq!(sim.bodies().len(), 2);
}
