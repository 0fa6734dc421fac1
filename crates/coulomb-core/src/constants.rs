//! Physical constants used by the force model.

/// Coulomb constant `k = 1 / (4πε₀)` in N·m²/C².
pub const COULOMB_K: f64 = 8.9875e9;

/// Softening term added to `|r|³` in the Coulomb denominator.
///
/// Keeps the pairwise force finite as two particles approach each other.
/// There is no collision handling at runtime; coincident starting
/// positions are rejected when particles are added.
pub const SOFTENING: f64 = 1e-5;
