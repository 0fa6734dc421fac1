//! The user-facing simulation: particle collection, fields, time domain
//! and run lifecycle.
//!
//! A [`Simulation`] moves through three states:
//!
//! ```text
//! Idle --begin_calculations--> Running --worker done--> Finished
//! ```
//!
//! Every mutator requires [`RunState::Idle`]. A finished simulation is
//! never rewound; [`reset()`](Simulation::reset) builds a fresh idle one
//! with the same configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use coulomb_core::{
    AxialMagnetic, DVec3, Field, FieldKind, Particle, ParticleParams, PlanarElectric,
};
use coulomb_format::{files, Document, FieldsRecord, SimulationHeader};

use crate::config::{RunOptions, SimulationConfig};
use crate::error::EngineError;
use crate::progress::Progress;
use crate::worker::{RunHandle, WorkerState};

// ── RunState ───────────────────────────────────────────────────────

/// Lifecycle state of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Editable; no run has been started.
    Idle,
    /// The worker is integrating.
    Running,
    /// The run is complete.
    Finished,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

// ── Simulation ─────────────────────────────────────────────────────

/// A set of charged particles in uniform external fields, integrated
/// over a fixed time domain on a background worker.
///
/// # Examples
///
/// ```
/// use coulomb_core::{DVec3, ParticleParams};
/// use coulomb_engine::{Simulation, SimulationConfig};
///
/// let mut sim = Simulation::new(SimulationConfig::new(1.0, 0.1)).unwrap();
/// let q = 1e-5;
/// sim.add_particle(ParticleParams::new(1.0, q, DVec3::new(-1.0, 0.0, 0.0), DVec3::ZERO)).unwrap();
/// sim.add_particle(ParticleParams::new(1.0, -q, DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO)).unwrap();
///
/// assert!(sim.begin_calculations().unwrap());
/// sim.wait().unwrap();
/// assert_eq!(sim.progress(), 100);
/// assert!(!sim.is_active());
///
/// let a = sim.particle(0).unwrap().point(9).unwrap();
/// let b = sim.particle(1).unwrap().point(9).unwrap();
/// assert!(a.distance(b) < 2.0);
/// ```
pub struct Simulation {
    config: SimulationConfig,
    steps: usize,
    particles: Vec<Particle>,
    electric: Field,
    magnetic: Field,
    options: RunOptions,
    run: Option<RunHandle>,
    finished: bool,
}

impl Simulation {
    /// Create an empty simulation with zero fields.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        Self::with_options(config, RunOptions::default())
    }

    /// Create an empty simulation with explicit run options.
    pub fn with_options(config: SimulationConfig, options: RunOptions) -> Result<Self, EngineError> {
        let steps = config.step_count()?;
        Ok(Self {
            config,
            steps,
            particles: Vec::new(),
            electric: Field::zero(FieldKind::Electric),
            magnetic: Field::zero(FieldKind::Magnetic),
            options,
            run: None,
            finished: false,
        })
    }

    // ── Lifecycle queries ──────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        if self.finished {
            return RunState::Finished;
        }
        match &self.run {
            None => RunState::Idle,
            Some(run) if run.progress().is_complete() => RunState::Finished,
            Some(_) => RunState::Running,
        }
    }

    /// Percentage of the run completed, 0 to 100.
    pub fn progress(&self) -> u8 {
        if self.finished {
            return crate::progress::COMPLETE;
        }
        self.run.as_ref().map_or(0, |run| run.progress().get())
    }

    /// `true` while a run has started and progress is below 100.
    ///
    /// Once this turns `false` after a run, the finished trajectories
    /// are readable through [`particles()`](Self::particles) without a
    /// call to [`collect()`](Self::collect).
    pub fn is_active(&self) -> bool {
        self.state() == RunState::Running
    }

    /// `true` once the run has reached 100.
    pub fn is_finished(&self) -> bool {
        self.state() == RunState::Finished
    }

    /// Whether the configuration may run.
    ///
    /// A simulation cannot run with no particles, with a single
    /// particle and no external field, or with only stationary
    /// particles.
    pub fn validate(&self) -> bool {
        let empty = self.particles.is_empty();
        let lone_in_vacuum =
            self.particles.len() == 1 && self.electric.is_zero() && self.magnetic.is_zero();
        let all_static = self.particles.iter().all(Particle::is_stationary);
        !(empty || lone_in_vacuum || all_static)
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        match self.state() {
            RunState::Idle => Ok(()),
            state => Err(EngineError::NotIdle { state }),
        }
    }

    // ── Run control ────────────────────────────────────────────────

    /// Start integrating on a background worker and return immediately.
    ///
    /// Returns `Ok(false)` without starting anything when
    /// [`validate()`](Self::validate) fails.
    pub fn begin_calculations(&mut self) -> Result<bool, EngineError> {
        self.ensure_idle()?;
        if !self.validate() {
            warn!(
                "refusing to run an invalid configuration ({} particles)",
                self.particles.len()
            );
            return Ok(false);
        }
        let state = WorkerState::new(
            self.particles.clone(),
            self.electric.vector(),
            self.magnetic.vector(),
            self.config.interactions,
            self.config.precision,
            self.steps,
            Arc::new(Progress::new()),
        );
        self.run = Some(RunHandle::spawn(&self.options.worker_name, state)?);
        Ok(true)
    }

    /// Install the worker's trajectories if the run is over and join
    /// the worker thread.
    ///
    /// Never blocks. Returns `Ok(true)` once results are installed.
    pub fn collect(&mut self) -> Result<bool, EngineError> {
        if self.finished {
            return Ok(true);
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(false);
        };
        match run.try_collect()? {
            Some(particles) => {
                self.install(particles);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Block until the run is over and install its trajectories.
    ///
    /// Returns immediately on a simulation that was never started.
    pub fn wait(&mut self) -> Result<(), EngineError> {
        if self.finished {
            return Ok(());
        }
        if let Some(run) = self.run.as_mut() {
            let particles = run.wait()?;
            self.install(particles);
        }
        Ok(())
    }

    fn install(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.run = None;
        self.finished = true;
    }

    /// A fresh idle simulation with the same configuration, fields and
    /// particles.
    ///
    /// A run in progress on `self` is unaffected; its results stay
    /// with `self`.
    pub fn reset(&self) -> Simulation {
        let particles = self
            .particles()
            .iter()
            .map(|p| {
                let mut copy = p.clone();
                copy.reset();
                copy
            })
            .collect();
        Simulation {
            config: self.config,
            steps: self.steps,
            particles,
            electric: self.electric,
            magnetic: self.magnetic,
            options: self.options.clone(),
            run: None,
            finished: false,
        }
    }

    // ── Configuration ──────────────────────────────────────────────

    /// The time domain and interaction flag.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Total simulated time.
    pub fn time(&self) -> f64 {
        self.config.time
    }

    /// Integration step size.
    pub fn precision(&self) -> f64 {
        self.config.precision
    }

    /// Step size in whole milliseconds.
    pub fn precision_millis(&self) -> u64 {
        self.config.precision_millis()
    }

    /// Number of integration steps, `round(time / precision)`.
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Whether particles interact.
    pub fn interactions(&self) -> bool {
        self.config.interactions
    }

    /// The electric field.
    pub fn electric(&self) -> &Field {
        &self.electric
    }

    /// The magnetic field.
    pub fn magnetic(&self) -> &Field {
        &self.magnetic
    }

    /// Set the total time and resize every trajectory.
    pub fn set_time(&mut self, time: f64) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.apply_config(SimulationConfig { time, ..self.config })
    }

    /// Set the step size and resize every trajectory.
    pub fn set_precision(&mut self, precision: f64) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.apply_config(SimulationConfig {
            precision,
            ..self.config
        })
    }

    /// Enable or disable pairwise interactions.
    pub fn set_interactions(&mut self, interactions: bool) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.config.interactions = interactions;
        Ok(())
    }

    fn apply_config(&mut self, config: SimulationConfig) -> Result<(), EngineError> {
        let steps = config.step_count()?;
        for p in &mut self.particles {
            p.set_steps(steps)?;
        }
        self.config = config;
        self.steps = steps;
        Ok(())
    }

    /// Replace the electric field. Motion is planar, so the field lies
    /// in the XY plane.
    pub fn set_electric(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.electric = PlanarElectric::new(x, y)?.into();
        Ok(())
    }

    /// Replace the magnetic field. Motion is planar, so the field lies
    /// along Z.
    pub fn set_magnetic(&mut self, z: f64) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.magnetic = AxialMagnetic::new(z)?.into();
        Ok(())
    }

    // ── Particle queries ───────────────────────────────────────────

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` if there are no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particles in collection order.
    ///
    /// After a finished run these carry the computed trajectories, even
    /// before the worker has been collected.
    pub fn particles(&self) -> &[Particle] {
        self.run
            .as_ref()
            .and_then(RunHandle::delivered)
            .unwrap_or(&self.particles)
    }

    /// The particle at `index`.
    pub fn particle(&self, index: usize) -> Result<&Particle, EngineError> {
        let particles = self.particles();
        particles.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: particles.len(),
        })
    }

    /// Index of the first particle equal to `particle`.
    pub fn particle_index(&self, particle: &Particle) -> Option<usize> {
        self.particles().iter().position(|p| p == particle)
    }

    /// Smallest and largest absolute charge, or `None` when empty.
    pub fn min_max_charge(&self) -> Option<(f64, f64)> {
        self.particles()
            .iter()
            .map(|p| p.charge().abs())
            .fold(None, |acc, q| match acc {
                None => Some((q, q)),
                Some((lo, hi)) => Some((lo.min(q), hi.max(q))),
            })
    }

    /// Indices of moving particles.
    pub fn kinetic(&self) -> Vec<usize> {
        self.indices_where(|p| !p.is_stationary())
    }

    /// Indices of stationary particles.
    pub fn statics(&self) -> Vec<usize> {
        self.indices_where(Particle::is_stationary)
    }

    fn indices_where(&self, pred: impl Fn(&Particle) -> bool) -> Vec<usize> {
        self.particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| pred(*p))
            .map(|(i, _)| i)
            .collect()
    }

    // ── Particle mutators ──────────────────────────────────────────

    /// Append a particle and return its index.
    ///
    /// Fails with [`EngineError::DuplicateParticle`] if an equal
    /// particle exists, and with [`EngineError::Overlap`] if
    /// interactions are on and another particle starts at the same
    /// position.
    pub fn add_particle(&mut self, params: ParticleParams) -> Result<usize, EngineError> {
        self.ensure_idle()?;
        let particle = Particle::new(params, self.steps)?;
        if let Some(index) = self.particle_index(&particle) {
            return Err(EngineError::DuplicateParticle { index });
        }
        if self.config.interactions {
            if let Some(index) = self.particles.iter().position(|p| p.is_overlapping(&particle)) {
                return Err(EngineError::Overlap { index });
            }
        }
        self.particles.push(particle);
        Ok(self.particles.len() - 1)
    }

    /// Replace the mass, charge, initial position and initial velocity
    /// of the particle at `index`.
    ///
    /// The particle keeps its stationary flag whatever `params` says;
    /// use [`replace_particle()`](Self::replace_particle) to change it.
    /// Parameters are validated before anything changes.
    pub fn edit_particle(&mut self, params: ParticleParams, index: usize) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let len = self.particles.len();
        let particle = self
            .particles
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfRange { index, len })?;
        particle.apply(params.stationary(particle.is_stationary()))?;
        Ok(())
    }

    /// Put `particle` at `index`, returning the particle it replaces.
    ///
    /// The new particle is resized to this simulation's step count.
    pub fn replace_particle(
        &mut self,
        mut particle: Particle,
        index: usize,
    ) -> Result<Particle, EngineError> {
        self.ensure_idle()?;
        let len = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfRange { index, len })?;
        particle.set_steps(self.steps)?;
        Ok(std::mem::replace(slot, particle))
    }

    /// Remove the first particle equal to `particle` and return it.
    pub fn remove_particle(&mut self, particle: &Particle) -> Result<Particle, EngineError> {
        self.ensure_idle()?;
        let index = self
            .particle_index(particle)
            .ok_or(EngineError::ParticleNotFound)?;
        Ok(self.particles.remove(index))
    }

    /// Remove every particle.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.particles.clear();
        Ok(())
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Snapshot of the saved state: configuration, fields and particle
    /// parameters.
    pub fn document(&self) -> Document {
        Document {
            header: SimulationHeader {
                time: self.config.time,
                precision: self.config.precision,
                interactions: self.config.interactions,
            },
            fields: FieldsRecord {
                electric: self.electric.vector(),
                magnetic: self.magnetic.vector(),
            },
            particles: self.particles().iter().map(Particle::params).collect(),
        }
    }

    /// Replace configuration, fields and particles with `doc`.
    ///
    /// The electric field keeps only its X and Y components and the
    /// magnetic field only its Z component. Particles are cleared
    /// first; on error the collection stays empty and the rest of the
    /// state is unchanged.
    pub fn apply_document(&mut self, doc: &Document) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.particles.clear();

        let config = SimulationConfig {
            time: doc.header.time,
            precision: doc.header.precision,
            interactions: doc.header.interactions,
        };
        let steps = config.step_count()?;
        let (e, m) = (doc.fields.electric, doc.fields.magnetic);
        if e.z != 0.0 || m.x != 0.0 || m.y != 0.0 {
            warn!("dropping out-of-plane field components: E={e} M={m}");
        }
        let electric: Field = PlanarElectric::new(e.x, e.y)?.into();
        let magnetic: Field = AxialMagnetic::new(m.z)?.into();
        let particles = doc
            .particles
            .iter()
            .map(|&params| Particle::new(params, steps))
            .collect::<Result<Vec<_>, _>>()?;

        self.config = config;
        self.steps = steps;
        self.electric = electric;
        self.magnetic = magnetic;
        self.particles = particles;
        Ok(())
    }

    /// Save as `name` in `dir`, returning the path written.
    ///
    /// An empty or already taken name is replaced by a timestamped one.
    /// Allowed in any state.
    pub fn save(&self, dir: &Path, name: &str) -> Result<PathBuf, EngineError> {
        Ok(files::save(dir, name, &self.document())?)
    }

    /// Load `name` from `dir`, replacing the whole simulation state.
    ///
    /// The particle collection is cleared first, so a failed load
    /// leaves it empty.
    pub fn load(&mut self, dir: &Path, name: &str) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.particles.clear();
        let doc = files::load(dir, name)?;
        self.apply_document(&doc)?;
        debug!(
            "loaded simulation: T={} dt={} with {} particles",
            self.config.time,
            self.config.precision,
            self.particles.len()
        );
        Ok(())
    }

    /// Field vectors as `(electric, magnetic)`.
    pub fn field_vectors(&self) -> (DVec3, DVec3) {
        (self.electric.vector(), self.magnetic.vector())
    }
}
