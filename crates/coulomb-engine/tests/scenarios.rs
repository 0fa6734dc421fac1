//! End-to-end behaviour of the simulation lifecycle.

use std::fs;
use std::thread;

use coulomb_core::{DVec3, ParticleParams};
use coulomb_engine::{EngineError, RunState, Simulation, SimulationConfig, POLL_INTERVAL};
use coulomb_format::FormatError;
use coulomb_test_utils::{
    dipole_params, dipole_simulation, lone_particle_simulation, random_simulation, scratch_dir,
    MICRO_DIPOLE_CHARGE,
};

fn run_to_end(sim: &mut Simulation) {
    assert!(sim.begin_calculations().unwrap());
    sim.wait().unwrap();
}

// ── Validity ───────────────────────────────────────────────────────

#[test]
fn empty_simulation_is_invalid() {
    let sim = Simulation::new(SimulationConfig::default()).unwrap();
    assert!(!sim.validate());
}

#[test]
fn single_particle_needs_a_field() {
    let mut sim = lone_particle_simulation();
    assert!(!sim.validate());
    sim.set_electric(1.0, 0.0).unwrap();
    assert!(sim.validate());

    let mut sim = lone_particle_simulation();
    sim.set_magnetic(1.0).unwrap();
    assert!(sim.validate());
}

#[test]
fn all_stationary_is_invalid() {
    let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
    for params in dipole_params(1.0) {
        sim.add_particle(params.stationary(true)).unwrap();
    }
    sim.set_electric(1.0, 1.0).unwrap();
    assert!(!sim.validate());
}

#[test]
fn two_moving_charges_are_valid() {
    assert!(dipole_simulation(1.0).validate());
}

// ── Scenarios ──────────────────────────────────────────────────────

#[test]
fn lone_particle_does_not_run() {
    let mut sim = lone_particle_simulation();
    assert!(!sim.begin_calculations().unwrap());
    assert_eq!(sim.state(), RunState::Idle);
    assert_eq!(sim.progress(), 0);
    assert!(!sim.is_active());
    // Still editable.
    sim.set_time(2.0).unwrap();
}

#[test]
fn unit_dipole_overshoots_after_first_kick() {
    let mut sim = dipole_simulation(1.0);
    run_to_end(&mut sim);
    // At ±1 C and dt = 0.1 the first kick carries both charges far past
    // each other, so the separation at step 9 does NOT shrink. Only the
    // direction of the initial pull holds; `dipole_contracts` checks the
    // shrinking separation at a charge the step size can resolve.
    let p0 = sim.particle(0).unwrap();
    let p1 = sim.particle(1).unwrap();
    assert!(p0.point(1).unwrap().x > -1.0);
    assert!(p1.point(1).unwrap().x < 1.0);
    assert!(p0.point(9).unwrap().distance(p1.point(9).unwrap()) > 2.0);
}

#[test]
fn dipole_contracts() {
    let mut sim = dipole_simulation(MICRO_DIPOLE_CHARGE);
    run_to_end(&mut sim);

    let distance = |step| {
        let a = sim.particle(0).unwrap().point(step).unwrap();
        let b = sim.particle(1).unwrap().point(step).unwrap();
        a.distance(b)
    };
    assert_eq!(distance(0), 2.0);
    assert!(distance(9) < distance(0));
}

#[test]
fn loading_without_header_leaves_collection_empty() {
    let dir = scratch_dir("no-header");
    fs::write(
        dir.join("broken.txt"),
        "PARTICLE M:1 C:1 R:[0,0,0] V:[0,0,0] S:0\n",
    )
    .unwrap();

    let mut sim = dipole_simulation(1.0);
    let err = sim.load(&dir, "broken.txt").unwrap_err();
    assert!(matches!(
        err,
        EngineError::Format(FormatError::MissingSimulationHeader)
    ));
    assert!(sim.is_empty());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn duplicate_particle_is_rejected() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let params = ParticleParams::new(1.0, 1.0, DVec3::new(3.0, 4.0, 0.0), DVec3::X);
    sim.add_particle(params).unwrap();
    assert!(matches!(
        sim.add_particle(params),
        Err(EngineError::DuplicateParticle { index: 0 })
    ));
    assert_eq!(sim.len(), 1);
}

// ── Progress ───────────────────────────────────────────────────────

#[test]
fn progress_is_monotone_and_ends_at_100() {
    let mut sim = random_simulation(SimulationConfig::new(2.0, 0.001), 24, 3);
    assert!(sim.begin_calculations().unwrap());

    let mut last = 0;
    loop {
        let progress = sim.progress();
        assert!(progress >= last, "progress went from {last} to {progress}");
        assert!(progress <= 100);
        if progress == 100 {
            assert!(!sim.is_active());
        }
        last = progress;
        if sim.collect().unwrap() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
    assert_eq!(sim.progress(), 100);
    assert!(!sim.is_active());
    assert!(sim.is_finished());
}

#[test]
fn trajectories_are_readable_once_inactive() {
    let mut sim = dipole_simulation(MICRO_DIPOLE_CHARGE);
    assert!(sim.begin_calculations().unwrap());
    while sim.is_active() {
        thread::sleep(POLL_INTERVAL);
    }
    assert_eq!(sim.progress(), 100);
    assert!(sim.is_finished());

    let seen = sim.particle(0).unwrap().point(9).unwrap();
    assert!(seen.x > -1.0);
    assert!(sim.particle(1).unwrap().point(9).unwrap().x < 1.0);

    assert!(sim.collect().unwrap());
    assert_eq!(sim.particle(0).unwrap().point(9), Some(seen));
}

#[test]
fn collect_before_start_is_false() {
    let mut sim = dipole_simulation(1.0);
    assert!(!sim.collect().unwrap());
    sim.wait().unwrap();
    assert_eq!(sim.state(), RunState::Idle);
}

// ── Determinism ────────────────────────────────────────────────────

#[test]
fn identical_runs_are_bit_identical() {
    let config = SimulationConfig::new(1.0, 0.005);
    let mut a = random_simulation(config, 20, 11);
    a.set_electric(0.5, -0.25).unwrap();
    a.set_magnetic(0.1).unwrap();
    let mut b = a.reset();

    run_to_end(&mut a);
    run_to_end(&mut b);

    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        let bits = |t: &[DVec3]| t.iter().map(|v| v.to_array().map(f64::to_bits)).collect::<Vec<_>>();
        assert_eq!(bits(pa.trajectory()), bits(pb.trajectory()));
    }
}

#[test]
fn reset_after_run_reproduces_it() {
    let mut sim = dipole_simulation(MICRO_DIPOLE_CHARGE);
    run_to_end(&mut sim);
    let mut again = sim.reset();
    assert_eq!(again.state(), RunState::Idle);
    run_to_end(&mut again);
    assert_eq!(
        sim.particle(0).unwrap().trajectory(),
        again.particle(0).unwrap().trajectory()
    );
}

// ── Physics ────────────────────────────────────────────────────────

#[test]
fn interactions_off_leaves_charges_at_rest() {
    let mut sim = dipole_simulation(1.0);
    sim.set_interactions(false).unwrap();
    run_to_end(&mut sim);
    for p in sim.particles() {
        assert!(p.trajectory().iter().all(|&r| r == p.initial_position()));
    }
}

#[test]
fn magnetic_field_curves_a_lone_particle() {
    let mut sim = lone_particle_simulation();
    sim.set_magnetic(1.0).unwrap();
    run_to_end(&mut sim);
    let p = sim.particle(0).unwrap();
    let end = p.point(sim.step_count() - 1).unwrap();
    // v × B with v = +X and B = +Z pushes toward -Y.
    assert!(end.y < 0.0);
    assert_eq!(end.z, 0.0);
}

#[test]
fn stationary_particle_keeps_its_place() {
    let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
    let [a, b] = dipole_params(MICRO_DIPOLE_CHARGE);
    sim.add_particle(a).unwrap();
    sim.add_particle(b.stationary(true)).unwrap();
    run_to_end(&mut sim);
    let anchor = sim.particle(1).unwrap();
    for step in 0..sim.step_count() {
        assert_eq!(anchor.point(step), Some(DVec3::new(1.0, 0.0, 0.0)));
    }
    assert!(sim.particle(0).unwrap().point(9).unwrap().x > -1.0);
}

// ── Persistence ────────────────────────────────────────────────────

#[test]
fn save_load_round_trip() {
    let dir = scratch_dir("engine-round-trip");
    let mut sim = dipole_simulation(1.0);
    sim.set_electric(0.25, -4.0).unwrap();
    sim.set_magnetic(2.5).unwrap();
    sim.set_interactions(false).unwrap();
    sim.add_particle(ParticleParams::new(3.0, 1e-6, DVec3::new(0.1, 0.2, 0.0), DVec3::Y).stationary(true))
        .unwrap();
    let path = sim.save(&dir, "state.txt").unwrap();
    assert!(path.ends_with("state.txt"));

    let mut loaded = Simulation::new(SimulationConfig::default()).unwrap();
    loaded.add_particle(ParticleParams::new(9.0, 9.0, DVec3::ZERO, DVec3::ZERO)).unwrap();
    loaded.load(&dir, "state.txt").unwrap();

    assert_eq!(loaded.particles(), sim.particles());
    assert_eq!(loaded.field_vectors(), sim.field_vectors());
    assert_eq!(loaded.time(), sim.time());
    assert_eq!(loaded.precision(), sim.precision());
    assert_eq!(loaded.interactions(), sim.interactions());
    assert_eq!(loaded.step_count(), sim.step_count());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_is_allowed_after_a_run() {
    let dir = scratch_dir("save-finished");
    let mut sim = dipole_simulation(MICRO_DIPOLE_CHARGE);
    run_to_end(&mut sim);
    let path = sim.save(&dir, "").unwrap();
    assert!(path.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn loaded_fields_stay_in_the_plane() {
    let dir = scratch_dir("out-of-plane");
    fs::write(
        dir.join("skewed.txt"),
        "SIMULATION T:1 P:0.1 I:1\n\
         FIELD E:[1,2,3] M:[4,5,6]\n\
         PARTICLE M:1 C:1 R:[0,0,0] V:[1,0,0] S:0\n",
    )
    .unwrap();

    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.load(&dir, "skewed.txt").unwrap();
    assert_eq!(
        sim.field_vectors(),
        (DVec3::new(1.0, 2.0, 0.0), DVec3::new(0.0, 0.0, 6.0))
    );
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn form_edit_keeps_particle_stationary() {
    let mut sim = dipole_simulation(MICRO_DIPOLE_CHARGE);
    let anchor = ParticleParams::new(1.0, 1.0, DVec3::new(0.0, 3.0, 0.0), DVec3::ZERO);
    let index = sim.add_particle(anchor.stationary(true)).unwrap();

    let edit = ParticleParams::parse("2", "1", "[0,3,0]", "[0,0,0]").unwrap();
    sim.edit_particle(edit, index).unwrap();
    assert!(sim.particle(index).unwrap().is_stationary());
    assert_eq!(sim.statics(), vec![index]);
}

#[test]
fn load_missing_file_clears_particles() {
    let dir = scratch_dir("load-missing");
    let mut sim = dipole_simulation(1.0);
    assert!(matches!(
        sim.load(&dir, "absent.txt"),
        Err(EngineError::Format(FormatError::FileNotFound { .. }))
    ));
    assert!(sim.is_empty());
    fs::remove_dir_all(&dir).unwrap();
}
