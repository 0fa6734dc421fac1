//! Background integration worker.
//!
//! The worker owns a copy of the particle collection (moved in via
//! `thread::Builder::spawn`). No locks are taken during the run:
//! progress goes out through an atomic counter. The finished particles
//! are published once into a shared `OnceLock` before progress reaches
//! 100, and a bounded crossbeam channel signals the end of the thread.

use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, trace};

use coulomb_core::{ChargeEnvironment, ChargeSource, DVec3, Particle};

use crate::error::EngineError;
use crate::progress::Progress;

/// Progress values at which a trace line is logged.
const TRACE_EVERY_PERCENT: u8 = 10;

// ── World ──────────────────────────────────────────────────────────

/// Charges and fields every particle sees during force evaluation.
pub(crate) struct World {
    sources: Vec<ChargeSource>,
    electric: DVec3,
    magnetic: DVec3,
}

impl World {
    fn refresh(&mut self, particles: &[Particle]) {
        self.sources.clear();
        self.sources.extend(particles.iter().map(Particle::as_source));
    }
}

impl ChargeEnvironment for World {
    fn sources(&self) -> &[ChargeSource] {
        &self.sources
    }

    fn electric(&self) -> DVec3 {
        self.electric
    }

    fn magnetic(&self) -> DVec3 {
        self.magnetic
    }
}

// ── WorkerState ────────────────────────────────────────────────────

/// Everything the worker thread needs for one run.
pub(crate) struct WorkerState {
    particles: Vec<Particle>,
    /// Indices of non-stationary particles, fixed for the run.
    kinetic: Vec<usize>,
    world: World,
    interactions: bool,
    dt: f64,
    steps: usize,
    progress: Arc<Progress>,
}

impl WorkerState {
    /// Prepare a run over `particles`, resetting each to its initial state.
    pub fn new(
        mut particles: Vec<Particle>,
        electric: DVec3,
        magnetic: DVec3,
        interactions: bool,
        dt: f64,
        steps: usize,
        progress: Arc<Progress>,
    ) -> Self {
        for p in &mut particles {
            p.reset();
        }
        let kinetic: Vec<usize> = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_stationary())
            .map(|(i, _)| i)
            .collect();
        debug!(
            "partitioned {} particles: {} kinetic, {} static",
            particles.len(),
            kinetic.len(),
            particles.len() - kinetic.len()
        );
        Self {
            particles,
            kinetic,
            world: World {
                sources: Vec::new(),
                electric,
                magnetic,
            },
            interactions,
            dt,
            steps,
            progress,
        }
    }

    /// Advance every kinetic particle by one kick-drift-kick step,
    /// recording positions as sample `step`.
    pub fn step(&mut self, step: usize) {
        let dt = self.dt;
        for &i in &self.kinetic {
            let p = &mut self.particles[i];
            p.update_velocity(dt);
            p.update_position(dt, step);
        }

        self.world.refresh(&self.particles);
        for &i in &self.kinetic {
            let p = &mut self.particles[i];
            p.update_acceleration(&self.world, i, self.interactions);
            p.update_velocity(dt);
        }
    }

    /// Run all steps, publishing progress after each one.
    ///
    /// Consumes self and returns the particles with their completed
    /// trajectories.
    pub fn run(mut self) -> Vec<Particle> {
        debug!(
            "run started: {} steps at dt={}",
            self.steps, self.dt
        );
        let mut last = 0;
        for iteration in 0..self.steps {
            self.step(iteration);
            let percent = self.progress.publish(iteration, self.steps);
            if percent != last && percent % TRACE_EVERY_PERCENT == 0 {
                trace!("progress {percent}%");
            }
            last = percent;
        }
        debug!("run finished after {} steps", self.steps);
        self.particles
    }
}

// ── RunHandle ──────────────────────────────────────────────────────

/// Owned handle to a run in progress.
///
/// Dropping the handle detaches the worker; it runs to completion and
/// its results are discarded.
pub(crate) struct RunHandle {
    thread: Option<JoinHandle<()>>,
    done: Receiver<()>,
    results: Arc<OnceLock<Vec<Particle>>>,
    progress: Arc<Progress>,
}

impl RunHandle {
    /// Spawn a named worker thread running `state`.
    pub fn spawn(name: &str, state: WorkerState) -> Result<Self, EngineError> {
        let progress = Arc::clone(&state.progress);
        let results = Arc::new(OnceLock::new());
        let (tx, rx): (Sender<()>, Receiver<()>) = crossbeam_channel::bounded(1);
        let worker_progress = Arc::clone(&progress);
        let worker_results = Arc::clone(&results);
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let particles = state.run();
                // Results must be readable before progress reads 100.
                let _ = worker_results.set(particles);
                worker_progress.finish();
                // The receiver is gone if the run was discarded.
                let _ = tx.send(());
            })
            .map_err(EngineError::WorkerSpawnFailed)?;
        Ok(Self {
            thread: Some(thread),
            done: rx,
            results,
            progress,
        })
    }

    /// Shared progress counter of this run.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// The finished particles, once the worker has published them.
    pub fn delivered(&self) -> Option<&[Particle]> {
        self.results.get().map(Vec::as_slice)
    }

    /// Take the results if the worker has delivered them.
    pub fn try_collect(&mut self) -> Result<Option<Vec<Particle>>, EngineError> {
        match self.done.try_recv() {
            Ok(()) => self.take().map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => self.take().map(Some),
        }
    }

    /// Block until the worker delivers its results.
    pub fn wait(&mut self) -> Result<Vec<Particle>, EngineError> {
        // A disconnect without a signal means the worker panicked;
        // `take` reports it.
        let _ = self.done.recv();
        self.take()
    }

    /// Join the worker and move its results out.
    fn take(&mut self) -> Result<Vec<Particle>, EngineError> {
        self.join()?;
        // The worker's clone is dropped once joined.
        let taken = match Arc::get_mut(&mut self.results) {
            Some(cell) => cell.take(),
            None => self.results.get().cloned(),
        };
        taken.ok_or(EngineError::WorkerPanicked)
    }

    fn join(&mut self) -> Result<(), EngineError> {
        match self.thread.take() {
            Some(handle) => handle.join().map_err(|_| EngineError::WorkerPanicked),
            None => Ok(()),
        }
    }
}
