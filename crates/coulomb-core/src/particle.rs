//! Charged point particles and the per-particle integration kernels.
//!
//! A [`Particle`] carries its identity parameters (mass, charge,
//! initial state, stationary flag), its current kinematic state and a
//! trajectory buffer with one position sample per integration step.
//!
//! The kernels [`update_velocity`](Particle::update_velocity),
//! [`update_position`](Particle::update_position) and
//! [`update_acceleration`](Particle::update_acceleration) are the
//! building blocks of the kick-drift-kick step the engine runs:
//!
//! ```text
//! v += a·dt/2        (half kick)
//! r += v·dt          (drift, recorded into trajectory[step])
//! a  = a(r, v)       (force evaluation)
//! v += a·dt/2        (half kick)
//! ```

use crate::constants::{COULOMB_K, SOFTENING};
use crate::error::{Quantity, ValidationError};
use crate::vector::{ensure_finite, DVec3};

// ── ParticleParams ──────────────────────────────────────────────

/// The user-editable parameters of a particle.
///
/// This is what the editing collaborator supplies to add or edit a
/// particle, and what the persistence format stores per `PARTICLE` line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleParams {
    /// Mass. Must be positive and finite.
    pub mass: f64,
    /// Charge. Must be non-zero and finite.
    pub charge: f64,
    /// Initial position `r0`.
    pub position: DVec3,
    /// Initial velocity `v0`.
    pub velocity: DVec3,
    /// Excluded from integration when `true`.
    pub stationary: bool,
}

impl ParticleParams {
    /// Parameters for a moving particle.
    pub fn new(mass: f64, charge: f64, position: DVec3, velocity: DVec3) -> Self {
        Self {
            mass,
            charge,
            position,
            velocity,
            stationary: false,
        }
    }

    /// Set the stationary flag.
    pub fn stationary(mut self, stationary: bool) -> Self {
        self.stationary = stationary;
        self
    }

    /// Check every parameter without constructing a particle.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_mass(self.mass)?;
        check_charge(self.charge)?;
        ensure_finite(Quantity::Position, self.position)?;
        ensure_finite(Quantity::Velocity, self.velocity)?;
        Ok(())
    }
}

fn check_mass(mass: f64) -> Result<f64, ValidationError> {
    if !mass.is_finite() {
        return Err(ValidationError::NonFinite {
            quantity: Quantity::Mass,
            value: mass,
        });
    }
    if mass <= 0.0 {
        return Err(ValidationError::NonPositiveMass { value: mass });
    }
    Ok(mass)
}

fn check_charge(charge: f64) -> Result<f64, ValidationError> {
    if !charge.is_finite() {
        return Err(ValidationError::NonFinite {
            quantity: Quantity::Charge,
            value: charge,
        });
    }
    if charge == 0.0 {
        return Err(ValidationError::ZeroCharge);
    }
    Ok(charge)
}

// ── Force environment ───────────────────────────────────────────

/// A point charge as seen by other particles during force evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeSource {
    /// Current position of the charge.
    pub position: DVec3,
    /// Charge magnitude and sign.
    pub charge: f64,
}

impl ChargeSource {
    /// Softened Coulomb field of this charge at `r`:
    /// `k·q·(r − r_q) / (|r − r_q|³ + ε)`.
    pub fn field_at(&self, r: DVec3) -> DVec3 {
        let delta = r - self.position;
        let distance = delta.length();
        delta * (COULOMB_K * self.charge / (distance.powi(3) + SOFTENING))
    }
}

/// Everything a particle needs to evaluate its acceleration.
///
/// Implemented by the engine's worker state. `sources()` lists every
/// particle of the world in collection order, including the particle
/// being updated; callers pass their own index so it can be skipped.
pub trait ChargeEnvironment {
    /// All charges in the world, indexed like the particle collection.
    fn sources(&self) -> &[ChargeSource];
    /// Uniform external electric field.
    fn electric(&self) -> DVec3;
    /// Uniform external magnetic field.
    fn magnetic(&self) -> DVec3;
}

// ── Particle ────────────────────────────────────────────────────

/// A charged point particle with a recorded trajectory.
///
/// Equality compares identity parameters only: mass, charge, stationary
/// flag, `r0` and `v0`. Kinematic state and trajectory are ignored.
#[derive(Clone, Debug)]
pub struct Particle {
    mass: f64,
    charge: f64,
    /// Cached `charge / mass`.
    coefficient: f64,
    r0: DVec3,
    v0: DVec3,
    stationary: bool,
    steps: usize,
    r: DVec3,
    v: DVec3,
    a: DVec3,
    trajectory: Vec<DVec3>,
}

impl Particle {
    /// Build a particle sized for `steps` integration steps.
    pub fn new(params: ParticleParams, steps: usize) -> Result<Self, ValidationError> {
        params.validate()?;
        if steps == 0 {
            return Err(ValidationError::ZeroSteps);
        }
        let mut particle = Self {
            mass: params.mass,
            charge: params.charge,
            coefficient: params.charge / params.mass,
            r0: params.position,
            v0: params.velocity,
            stationary: params.stationary,
            steps,
            r: params.position,
            v: params.velocity,
            a: DVec3::ZERO,
            trajectory: Vec::new(),
        };
        particle.reset();
        Ok(particle)
    }

    /// The particle's identity parameters.
    pub fn params(&self) -> ParticleParams {
        ParticleParams {
            mass: self.mass,
            charge: self.charge,
            position: self.r0,
            velocity: self.v0,
            stationary: self.stationary,
        }
    }

    /// Restore the kinematic state and trajectory from `r0`/`v0`.
    pub fn reset(&mut self) {
        self.r = self.r0;
        self.v = self.v0;
        self.a = DVec3::ZERO;
        self.trajectory.clear();
        if self.stationary {
            self.trajectory.push(self.r0);
        } else {
            self.trajectory.resize(self.steps, DVec3::ZERO);
            self.trajectory[0] = self.r0;
        }
    }

    /// Replace every identity parameter at once.
    ///
    /// All parameters are validated before any is applied, so a
    /// rejected edit leaves the particle exactly as it was.
    pub fn apply(&mut self, params: ParticleParams) -> Result<(), ValidationError> {
        params.validate()?;
        self.mass = params.mass;
        self.charge = params.charge;
        self.coefficient = params.charge / params.mass;
        self.r0 = params.position;
        self.v0 = params.velocity;
        self.stationary = params.stationary;
        self.reset();
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Charge.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Charge-to-mass ratio.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Initial position `r0`.
    pub fn initial_position(&self) -> DVec3 {
        self.r0
    }

    /// Initial velocity `v0`.
    pub fn initial_velocity(&self) -> DVec3 {
        self.v0
    }

    /// Whether the particle is excluded from integration.
    pub fn is_stationary(&self) -> bool {
        self.stationary
    }

    /// Number of integration steps the trajectory is sized for.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current position.
    pub fn position(&self) -> DVec3 {
        self.r
    }

    /// Current velocity.
    pub fn velocity(&self) -> DVec3 {
        self.v
    }

    /// Current acceleration.
    pub fn acceleration(&self) -> DVec3 {
        self.a
    }

    /// Recorded samples: `steps` entries, or one for a stationary particle.
    pub fn trajectory(&self) -> &[DVec3] {
        &self.trajectory
    }

    /// Position at step `index`.
    ///
    /// A stationary particle returns `r0` for every step. Returns `None`
    /// when `index` is not below the step count.
    pub fn point(&self, index: usize) -> Option<DVec3> {
        if index >= self.steps {
            return None;
        }
        if self.stationary {
            self.trajectory.first().copied()
        } else {
            self.trajectory.get(index).copied()
        }
    }

    /// `true` iff both particles start at the same position.
    pub fn is_overlapping(&self, other: &Particle) -> bool {
        self.r0 == other.r0
    }

    /// The particle as a charge source at its current position.
    pub fn as_source(&self) -> ChargeSource {
        ChargeSource {
            position: self.r,
            charge: self.charge,
        }
    }

    // ── Mutators ────────────────────────────────────────────────

    /// Set the mass and refresh the cached coefficient.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), ValidationError> {
        self.mass = check_mass(mass)?;
        self.coefficient = self.charge / self.mass;
        Ok(())
    }

    /// Set the charge and refresh the cached coefficient.
    pub fn set_charge(&mut self, charge: f64) -> Result<(), ValidationError> {
        self.charge = check_charge(charge)?;
        self.coefficient = self.charge / self.mass;
        Ok(())
    }

    /// Set `r0`; the kinematic state and sample 0 follow.
    pub fn set_initial_position(&mut self, position: DVec3) -> Result<(), ValidationError> {
        self.r0 = ensure_finite(Quantity::Position, position)?;
        self.reset();
        Ok(())
    }

    /// Set `v0`; the kinematic state follows.
    pub fn set_initial_velocity(&mut self, velocity: DVec3) -> Result<(), ValidationError> {
        self.v0 = ensure_finite(Quantity::Velocity, velocity)?;
        self.reset();
        Ok(())
    }

    /// Mark the particle stationary or moving and reshape the trajectory.
    pub fn set_stationary(&mut self, stationary: bool) {
        self.stationary = stationary;
        self.reset();
    }

    /// Resize the trajectory for `steps` steps and reseed sample 0.
    pub fn set_steps(&mut self, steps: usize) -> Result<(), ValidationError> {
        if steps == 0 {
            return Err(ValidationError::ZeroSteps);
        }
        self.steps = steps;
        self.reset();
        Ok(())
    }

    // ── Integration kernels ─────────────────────────────────────

    /// Recompute `a` from the environment at the current position.
    ///
    /// `own` is this particle's index in `env.sources()`; it is skipped
    /// when summing pairwise Coulomb terms. Pairwise terms are included
    /// only when `interactions` is set.
    pub fn update_acceleration(
        &mut self,
        env: &dyn ChargeEnvironment,
        own: usize,
        interactions: bool,
    ) {
        let mut superposition = DVec3::ZERO;
        if interactions {
            for (j, source) in env.sources().iter().enumerate() {
                if j != own {
                    superposition += source.field_at(self.r);
                }
            }
        }
        superposition += env.electric();
        superposition += self.v.cross(env.magnetic());
        self.a = superposition * self.coefficient;
    }

    /// Half kick: `v += a·dt/2`.
    pub fn update_velocity(&mut self, dt: f64) {
        self.v += self.a * (dt / 2.0);
    }

    /// Drift: `r += v·dt`, then record `r` as sample `step`.
    pub fn update_position(&mut self, dt: f64, step: usize) {
        self.r += self.v * dt;
        debug_assert!(step < self.trajectory.len(), "step {step} out of range");
        if let Some(sample) = self.trajectory.get_mut(step) {
            *sample = self.r;
        }
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.mass == other.mass
            && self.charge == other.charge
            && self.stationary == other.stationary
            && self.r0 == other.r0
            && self.v0 == other.v0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Env {
        sources: Vec<ChargeSource>,
        electric: DVec3,
        magnetic: DVec3,
    }

    impl ChargeEnvironment for Env {
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

    fn moving(mass: f64, charge: f64, r0: DVec3, v0: DVec3) -> Particle {
        Particle::new(ParticleParams::new(mass, charge, r0, v0), 10).unwrap()
    }

    #[test]
    fn new_seeds_trajectory() {
        let p = moving(1.0, 2.0, DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO);
        assert_eq!(p.trajectory().len(), 10);
        assert_eq!(p.trajectory()[0], DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.coefficient(), 2.0);
    }

    #[test]
    fn stationary_has_single_sample() {
        let params = ParticleParams::new(1.0, 1.0, DVec3::X, DVec3::Y).stationary(true);
        let p = Particle::new(params, 50).unwrap();
        assert_eq!(p.trajectory().len(), 1);
        assert_eq!(p.point(0), Some(DVec3::X));
        assert_eq!(p.point(49), Some(DVec3::X));
        assert_eq!(p.point(50), None);
    }

    #[test]
    fn rejects_bad_mass_and_charge() {
        let zero_mass = ParticleParams::new(0.0, 1.0, DVec3::ZERO, DVec3::ZERO);
        assert_eq!(
            Particle::new(zero_mass, 10).unwrap_err(),
            ValidationError::NonPositiveMass { value: 0.0 }
        );
        let zero_charge = ParticleParams::new(1.0, 0.0, DVec3::ZERO, DVec3::ZERO);
        assert_eq!(
            Particle::new(zero_charge, 10).unwrap_err(),
            ValidationError::ZeroCharge
        );
    }

    #[test]
    fn failed_setter_leaves_state() {
        let mut p = moving(2.0, 4.0, DVec3::ZERO, DVec3::ZERO);
        assert!(p.set_mass(-1.0).is_err());
        assert!(p.set_charge(f64::NAN).is_err());
        assert_eq!(p.mass(), 2.0);
        assert_eq!(p.coefficient(), 2.0);
    }

    #[test]
    fn setters_refresh_coefficient() {
        let mut p = moving(2.0, 4.0, DVec3::ZERO, DVec3::ZERO);
        p.set_mass(4.0).unwrap();
        assert_eq!(p.coefficient(), 1.0);
        p.set_charge(-8.0).unwrap();
        assert_eq!(p.coefficient(), -2.0);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut p = moving(1.0, 1.0, DVec3::ZERO, DVec3::ZERO);
        let bad = ParticleParams::new(5.0, 0.0, DVec3::X, DVec3::X);
        assert!(p.apply(bad).is_err());
        assert_eq!(p.mass(), 1.0);
        assert_eq!(p.initial_position(), DVec3::ZERO);
    }

    #[test]
    fn set_steps_resizes_and_reseeds() {
        let mut p = moving(1.0, 1.0, DVec3::Y, DVec3::ZERO);
        p.set_steps(25).unwrap();
        assert_eq!(p.trajectory().len(), 25);
        assert_eq!(p.trajectory()[0], DVec3::Y);
        assert_eq!(p.set_steps(0), Err(ValidationError::ZeroSteps));
        assert_eq!(p.steps(), 25);
    }

    #[test]
    fn equality_ignores_kinematics() {
        let mut a = moving(1.0, 1.0, DVec3::ZERO, DVec3::X);
        let b = moving(1.0, 1.0, DVec3::ZERO, DVec3::X);
        a.update_position(0.1, 1);
        assert_eq!(a, b);
        let c = moving(1.0, -1.0, DVec3::ZERO, DVec3::X);
        assert_ne!(a, c);
        assert!(a.is_overlapping(&c));
    }

    #[test]
    fn half_kicks_and_drift() {
        let mut p = moving(1.0, 1.0, DVec3::ZERO, DVec3::X);
        p.update_position(0.5, 1);
        assert_eq!(p.position(), DVec3::new(0.5, 0.0, 0.0));
        assert_eq!(p.point(1), Some(DVec3::new(0.5, 0.0, 0.0)));
        p.a = DVec3::new(0.0, 2.0, 0.0);
        p.update_velocity(0.5);
        assert_eq!(p.velocity(), DVec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn electric_field_scales_by_coefficient() {
        let mut p = moving(2.0, 1.0, DVec3::ZERO, DVec3::ZERO);
        let env = Env {
            sources: vec![p.as_source()],
            electric: DVec3::new(4.0, 0.0, 0.0),
            magnetic: DVec3::ZERO,
        };
        p.update_acceleration(&env, 0, true);
        assert_eq!(p.acceleration(), DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn lorentz_term_is_v_cross_b() {
        let mut p = moving(1.0, 1.0, DVec3::ZERO, DVec3::X);
        let env = Env {
            sources: vec![p.as_source()],
            electric: DVec3::ZERO,
            magnetic: DVec3::Z,
        };
        p.update_acceleration(&env, 0, false);
        // x × z = -y
        assert_eq!(p.acceleration(), DVec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn opposite_charges_attract() {
        let mut p = moving(1.0, 1.0, DVec3::new(-1.0, 0.0, 0.0), DVec3::ZERO);
        let other = ChargeSource {
            position: DVec3::new(1.0, 0.0, 0.0),
            charge: -1.0,
        };
        let env = Env {
            sources: vec![p.as_source(), other],
            electric: DVec3::ZERO,
            magnetic: DVec3::ZERO,
        };
        p.update_acceleration(&env, 0, true);
        assert!(p.acceleration().x > 0.0);
        assert_eq!(p.acceleration().y, 0.0);

        p.update_acceleration(&env, 0, false);
        assert_eq!(p.acceleration(), DVec3::ZERO);
    }

    #[test]
    fn softening_keeps_coincident_force_finite() {
        let source = ChargeSource {
            position: DVec3::ZERO,
            charge: 1.0,
        };
        let field = source.field_at(DVec3::ZERO);
        assert_eq!(field, DVec3::ZERO);
        assert!(source.field_at(DVec3::splat(1e-9)).is_finite());
    }
}
