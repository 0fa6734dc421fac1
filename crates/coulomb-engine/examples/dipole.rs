//! Coulomb dipole: build, run, poll and save a two-charge simulation.
//!
//! Demonstrates:
//!   1. Building a Simulation and adding two opposite charges
//!   2. Starting the background run and polling progress
//!   3. Collecting trajectories and reading per-step positions
//!   4. Saving the configuration to the temp directory
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example dipole

use std::thread;

use coulomb_core::{DVec3, ParticleParams};
use coulomb_engine::{Simulation, SimulationConfig, POLL_INTERVAL};

// ─── Scenario ───────────────────────────────────────────────────

const TIME: f64 = 1.0;
const PRECISION: f64 = 0.001;
const CHARGE: f64 = 1e-5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Coulomb dipole ===\n");

    let mut sim = Simulation::new(SimulationConfig::new(TIME, PRECISION))?;
    sim.add_particle(ParticleParams::new(
        1.0,
        CHARGE,
        DVec3::new(-1.0, 0.0, 0.0),
        DVec3::ZERO,
    ))?;
    sim.add_particle(ParticleParams::new(
        1.0,
        -CHARGE,
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::ZERO,
    ))?;
    println!(
        "{} particles, {} steps of {} ms",
        sim.len(),
        sim.step_count(),
        sim.precision_millis()
    );

    if !sim.begin_calculations()? {
        println!("Configuration is not runnable.");
        return Ok(());
    }

    let mut shown = 0;
    while !sim.collect()? {
        let progress = sim.progress();
        if progress >= shown + 20 {
            println!("  progress {progress:>3}%");
            shown = progress;
        }
        thread::sleep(POLL_INTERVAL);
    }
    println!("  progress 100%\n");

    let last = sim.step_count() - 1;
    let separation = |step| -> Result<f64, Box<dyn std::error::Error>> {
        let a = sim.particle(0)?.point(step).ok_or("step out of range")?;
        let b = sim.particle(1)?.point(step).ok_or("step out of range")?;
        Ok(a.distance(b))
    };
    println!("Separation at step 0:    {:.6}", separation(0)?);
    println!("Separation at step {last}: {:.6}", separation(last)?);

    let path = sim.save(&std::env::temp_dir(), "")?;
    println!("\nSaved to {}", path.display());
    Ok(())
}
